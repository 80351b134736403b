//! Read-only catalog snapshot loaded from the storefront's JSON data files

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::cart::Cart;
use crate::domain::{find_agent, find_product, Agent, AgentId, CartItem, Product, ProductId};
use crate::errors::DomainError;

pub const AGENTS_FILE: &str = "agents.json";
pub const PRODUCTS_FILE: &str = "products.json";
pub const CATEGORIES_FILE: &str = "categories.json";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    ParseFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid cart in {path}: {source}")]
    InvalidCart {
        path: PathBuf,
        #[source]
        source: DomainError,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Catalog {
    pub agents: Vec<Agent>,
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
}

impl Catalog {
    /// Load `agents.json` and `products.json` from `data_dir`. The categories
    /// file is optional.
    pub fn load(data_dir: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let data_dir = data_dir.as_ref();
        let agents: Vec<Agent> = read_json(&data_dir.join(AGENTS_FILE))?;
        let products: Vec<Product> = read_json(&data_dir.join(PRODUCTS_FILE))?;

        let categories_path = data_dir.join(CATEGORIES_FILE);
        let categories: Vec<Category> =
            if categories_path.exists() { read_json(&categories_path)? } else { Vec::new() };

        info!(
            event_name = "catalog.loaded",
            data_dir = %data_dir.display(),
            agent_count = agents.len(),
            product_count = products.len(),
            category_count = categories.len(),
            "catalog snapshot loaded"
        );

        Ok(Self { agents, products, categories })
    }

    pub fn product_by_slug(&self, slug: &str) -> Option<&Product> {
        self.products.iter().find(|product| product.slug == slug)
    }

    pub fn product_by_id(&self, id: &str) -> Option<&Product> {
        find_product(&self.products, &ProductId::from(id))
    }

    pub fn agent_by_id(&self, id: &str) -> Option<&Agent> {
        find_agent(&self.agents, &AgentId::from(id))
    }

    pub fn category_by_id(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    /// Newest products first.
    pub fn featured_products(&self, limit: usize) -> Vec<&Product> {
        let mut products: Vec<&Product> = self.products.iter().collect();
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        products.truncate(limit);
        products
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CartFile {
    Bare(Vec<CartItem>),
    Wrapped { items: Vec<CartItem> },
}

/// Read a persisted cart, either a bare item array or `{"items": [...]}`.
pub fn load_cart(path: impl AsRef<Path>) -> Result<Cart, CatalogError> {
    let path = path.as_ref();
    let items = match read_json::<CartFile>(path)? {
        CartFile::Bare(items) | CartFile::Wrapped { items } => items,
    };
    Cart::from_items(items)
        .map_err(|source| CatalogError::InvalidCart { path: path.to_path_buf(), source })
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CatalogError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| CatalogError::ReadFile { path: path.to_path_buf(), source })?;
    serde_json::from_str(&raw)
        .map_err(|source| CatalogError::ParseFile { path: path.to_path_buf(), source })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    const AGENTS: &str = r#"[
        { "id": "kakobuy", "name": "KakoBuy", "slug": "kakobuy", "rating": 4.8, "badges": [],
          "speedTag": "fast", "logo": "/agents/kakobuy.png", "siteUrl": "https://www.kakobuy.com" },
        { "id": "mulebuy", "name": "MuleBuy", "slug": "mulebuy", "rating": 4.3, "badges": ["new"],
          "speedTag": "standard", "logo": "", "siteUrl": "https://mulebuy.com",
          "promoText": "10% off" }
    ]"#;

    const PRODUCTS: &str = r#"[
        { "id": "p1", "slug": "retro-sneaker", "title": "Retro Sneaker",
          "createdAt": "2024-03-01T00:00:00Z",
          "offers": [{ "agentId": "kakobuy", "price": 199, "shipFee": 35 }] },
        { "id": "p2", "slug": "wool-scarf", "title": "Wool Scarf",
          "createdAt": "2024-06-01T00:00:00Z", "offers": [] },
        { "id": "p3", "slug": "canvas-tote", "title": "Canvas Tote",
          "createdAt": "2024-01-15T00:00:00Z", "offers": [] }
    ]"#;

    fn write_catalog(dir: &Path, with_categories: bool) {
        fs::write(dir.join(AGENTS_FILE), AGENTS).expect("write agents");
        fs::write(dir.join(PRODUCTS_FILE), PRODUCTS).expect("write products");
        if with_categories {
            let categories =
                r#"[{ "id": "shoes", "name": "Shoes", "slug": "shoes", "icon": "👟" }]"#;
            fs::write(dir.join(CATEGORIES_FILE), categories).expect("write categories");
        }
    }

    #[test]
    fn loads_snapshot_and_looks_up_records() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_catalog(dir.path(), true);

        let catalog = Catalog::load(dir.path()).expect("catalog should load");
        assert_eq!(catalog.agents.len(), 2);
        assert_eq!(
            catalog.product_by_slug("wool-scarf").map(|product| product.id.as_str()),
            Some("p2")
        );
        assert_eq!(catalog.product_by_id("p1").map(|product| product.offers.len()), Some(1));
        assert!(catalog.agent_by_id("mulebuy").is_some_and(Agent::has_promo));
        assert_eq!(
            catalog.category_by_id("shoes").map(|category| category.name.as_str()),
            Some("Shoes")
        );
        assert!(catalog.product_by_slug("missing").is_none());
    }

    #[test]
    fn categories_file_is_optional() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_catalog(dir.path(), false);

        let catalog = Catalog::load(dir.path()).expect("catalog should load");
        assert!(catalog.categories.is_empty());
    }

    #[test]
    fn featured_products_are_newest_first() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_catalog(dir.path(), false);
        let catalog = Catalog::load(dir.path()).expect("catalog should load");

        let featured = catalog.featured_products(2);
        let slugs: Vec<&str> = featured.iter().map(|product| product.slug.as_str()).collect();
        assert_eq!(slugs, vec!["wool-scarf", "retro-sneaker"]);
    }

    #[test]
    fn missing_and_malformed_files_are_reported_with_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = Catalog::load(dir.path()).expect_err("agents.json is missing");
        assert!(matches!(
            missing,
            CatalogError::ReadFile { ref path, .. } if path.ends_with(AGENTS_FILE)
        ));

        fs::write(dir.path().join(AGENTS_FILE), "[{").expect("write agents");
        let malformed = Catalog::load(dir.path()).expect_err("agents.json is malformed");
        assert!(matches!(malformed, CatalogError::ParseFile { .. }));
    }

    #[test]
    fn cart_file_accepts_both_layouts() {
        let dir = tempfile::tempdir().expect("tempdir");
        let line = r#"{ "productId": "p1", "offerId": "p1-0", "agentId": "kakobuy",
            "price": 199, "shipFee": 35 }"#;

        let bare = dir.path().join("bare.json");
        fs::write(&bare, format!("[{line}]")).expect("write cart");
        assert_eq!(load_cart(&bare).expect("bare array").item_count(), 1);

        let wrapped = dir.path().join("wrapped.json");
        fs::write(&wrapped, format!(r#"{{ "items": [{line}] }}"#)).expect("write cart");
        assert_eq!(load_cart(&wrapped).expect("items object").total(), 234.0);

        let duplicated = dir.path().join("duplicated.json");
        fs::write(&duplicated, format!("[{line}, {line}]")).expect("write cart");
        assert!(matches!(load_cart(&duplicated), Err(CatalogError::InvalidCart { .. })));
    }
}

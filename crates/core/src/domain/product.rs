use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::agent::AgentId;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(pub String);

impl ProductId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for ProductId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Line identifier shared by cart and compare lists, `{product id}-{offer index}`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OfferId(pub String);

impl OfferId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OfferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OfferId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for OfferId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// One agent's listing of a product.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub agent_id: AgentId,
    #[serde(default)]
    pub title: String,
    pub price: f64,
    pub ship_fee: f64,
    #[serde(default)]
    pub est_days: u32,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub in_stock: bool,
}

impl Offer {
    pub fn landed_cost(&self) -> f64 {
        self.price + self.ship_fee
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceGuide {
    pub min: f64,
    pub max: f64,
    pub currency: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSpecs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    #[serde(default)]
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub category_id: String,
    #[serde(default)]
    pub cover: String,
    #[serde(default)]
    pub gallery: Vec<String>,
    #[serde(default)]
    pub price_guide: PriceGuide,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub specs: ProductSpecs,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    /// Display order, not rank order.
    #[serde(default)]
    pub offers: Vec<Offer>,
}

impl Product {
    pub fn new(id: impl Into<ProductId>, title: impl Into<String>, offers: Vec<Offer>) -> Self {
        let id = id.into();
        Self {
            slug: id.0.clone(),
            id,
            title: title.into(),
            brand: String::new(),
            category_id: String::new(),
            cover: String::new(),
            gallery: Vec::new(),
            price_guide: PriceGuide::default(),
            tags: Vec::new(),
            description: None,
            specs: ProductSpecs::default(),
            created_at: DateTime::<Utc>::default(),
            offers,
        }
    }

    pub fn offer_for_agent(&self, agent_id: &AgentId) -> Option<&Offer> {
        self.offers.iter().find(|offer| offer.agent_id == *agent_id)
    }

    pub fn offer_id(&self, index: usize) -> OfferId {
        OfferId(format!("{}-{index}", self.id))
    }
}

pub fn find_product<'a>(products: &'a [Product], id: &ProductId) -> Option<&'a Product> {
    products.iter().find(|product| product.id == *id)
}

pub mod cart;
pub mod config;
pub mod rank;
pub mod score;
pub mod suggest;

use serde::Serialize;
use serde_json::Value;
use xfinds_core::catalog::{load_cart, Catalog};
use xfinds_core::config::{AppConfig, LoadOptions};
use xfinds_core::{ApplicationError, Cart, DomainError, Product, ProductId};

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl CommandResult {
    pub fn success_with_data(
        command: &str,
        message: impl Into<String>,
        data: impl Serialize,
    ) -> Self {
        let data = match serde_json::to_value(data) {
            Ok(Value::Null) => None,
            Ok(value) => Some(value),
            Err(error) => {
                return Self::failure(command, "serialization", error.to_string(), 1);
            }
        };
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            data,
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            data: None,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    pub fn from_error(command: &str, error: &ApplicationError) -> Self {
        let exit_code = match error {
            ApplicationError::Configuration(_) => 2,
            ApplicationError::Catalog(_) => 3,
            ApplicationError::Domain(_) => 4,
        };
        Self::failure(command, error.error_class(), error.to_string(), exit_code)
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\
             \"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

/// Validated config plus the catalog snapshot it points at.
pub(crate) struct Session {
    pub config: AppConfig,
    pub catalog: Catalog,
}

impl Session {
    pub fn open(options: &LoadOptions) -> Result<Self, ApplicationError> {
        let config = AppConfig::load(options.clone())?;
        let catalog = Catalog::load(&config.catalog.data_dir)?;
        Ok(Self { config, catalog })
    }

    /// Product by slug first, then by id.
    pub fn product(&self, key: &str) -> Result<&Product, DomainError> {
        self.catalog
            .product_by_slug(key)
            .or_else(|| self.catalog.product_by_id(key))
            .ok_or_else(|| DomainError::ProductNotFound(ProductId::from(key)))
    }

    pub fn cart(&self) -> Result<Cart, ApplicationError> {
        let path = self.config.catalog.cart_path.as_ref().ok_or_else(|| {
            ApplicationError::Configuration(
                "no cart file given; pass --cart or set catalog.cart_path".to_string(),
            )
        })?;
        Ok(load_cart(path)?)
    }
}

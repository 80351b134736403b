use thiserror::Error;

use crate::catalog::CatalogError;
use crate::domain::{AgentId, OfferId, ProductId};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("offer {0} is already in the cart")]
    DuplicateCartItem(OfferId),
    #[error("offer {0} is not in the cart")]
    CartItemNotFound(OfferId),
    #[error("product {0} not found in catalog")]
    ProductNotFound(ProductId),
    #[error("agent {agent_id} has no offer for product {product_id}")]
    OfferNotFound { product_id: ProductId, agent_id: AgentId },
    #[error("agent {0} not found in directory")]
    AgentNotFound(AgentId),
}

impl DomainError {
    /// Whether the failure is a catalog or directory miss rather than a cart
    /// invariant violation.
    pub fn is_lookup(&self) -> bool {
        !matches!(self, Self::DuplicateCartItem(_))
    }
}

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("configuration failure: {0}")]
    Configuration(String),
}

impl ApplicationError {
    /// Stable machine-readable class for command envelopes.
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Domain(error) if error.is_lookup() => "lookup",
            Self::Domain(_) => "domain",
            Self::Catalog(_) => "catalog",
            Self::Configuration(_) => "configuration",
        }
    }
}

use serde::{Deserialize, Serialize};

use crate::domain::agent::AgentId;
use crate::domain::product::{Offer, OfferId, Product, ProductId};

/// A user-selected offer as persisted by the client-side cart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: ProductId,
    pub offer_id: OfferId,
    pub agent_id: AgentId,
    pub price: f64,
    pub ship_fee: f64,
    #[serde(default)]
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
}

impl CartItem {
    /// Builds the cart line for the product's offer at `index` in display order.
    pub fn from_offer(product: &Product, index: usize) -> Option<Self> {
        let offer = product.offers.get(index)?;
        Some(Self {
            product_id: product.id.clone(),
            offer_id: product.offer_id(index),
            agent_id: offer.agent_id.clone(),
            price: offer.price,
            ship_fee: offer.ship_fee,
            link: offer.link.clone(),
            weight: None,
            volume: None,
            title: Some(offer.title.clone()),
            thumbnail: (!product.cover.is_empty()).then(|| product.cover.clone()),
            sku: None,
        })
    }

    pub fn line_total(&self) -> f64 {
        self.price + self.ship_fee
    }

    /// Copy of this line moved to `agent_id`, with price, shipping and link
    /// taken wholesale from that agent's offer.
    pub fn reassigned(&self, agent_id: &AgentId, offer: &Offer) -> Self {
        Self {
            agent_id: agent_id.clone(),
            price: offer.price,
            ship_fee: offer.ship_fee,
            link: offer.link.clone(),
            ..self.clone()
        }
    }
}

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{find_product, Agent, AgentId, CartItem, OfferId, Product};
use crate::errors::DomainError;
use crate::suggestions::{generate_suggestions, Suggestion};

use super::grouping::{group_cart_items_by_agent, AgentGroup};

/// The shopper's cart. Offer ids are unique within it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    #[serde(default)]
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from persisted lines, rejecting duplicate offer ids.
    pub fn from_items(items: impl IntoIterator<Item = CartItem>) -> Result<Self, DomainError> {
        let mut cart = Self::new();
        for item in items {
            cart.add_item(item)?;
        }
        Ok(cart)
    }

    pub fn add_item(&mut self, item: CartItem) -> Result<(), DomainError> {
        if self.contains(&item.offer_id) {
            return Err(DomainError::DuplicateCartItem(item.offer_id));
        }
        self.items.push(item);
        Ok(())
    }

    /// Returns whether a line was removed.
    pub fn remove_item(&mut self, offer_id: &OfferId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.offer_id != *offer_id);
        self.items.len() != before
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn contains(&self, offer_id: &OfferId) -> bool {
        self.items.iter().any(|item| item.offer_id == *offer_id)
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of price and shipping over every line.
    pub fn total(&self) -> f64 {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Move a line to another agent, taking price, shipping and link from
    /// that agent's offer for the same product. The cart is untouched on error.
    pub fn switch_agent(
        &mut self,
        offer_id: &OfferId,
        agent_id: &AgentId,
        products: &[Product],
    ) -> Result<(), DomainError> {
        let position = self
            .items
            .iter()
            .position(|item| item.offer_id == *offer_id)
            .ok_or_else(|| DomainError::CartItemNotFound(offer_id.clone()))?;

        let current = &self.items[position];
        let product = find_product(products, &current.product_id)
            .ok_or_else(|| DomainError::ProductNotFound(current.product_id.clone()))?;
        let offer = product.offer_for_agent(agent_id).ok_or_else(|| DomainError::OfferNotFound {
            product_id: product.id.clone(),
            agent_id: agent_id.clone(),
        })?;

        debug!(
            event_name = "cart.item.agent_switched",
            offer_id = %offer_id,
            from_agent = %current.agent_id,
            to_agent = %agent_id,
            "cart line moved to another agent"
        );
        let moved = current.reassigned(agent_id, offer);
        self.items[position] = moved;
        Ok(())
    }

    /// Move every affected line to the suggestion's target agent.
    ///
    /// All moves are checked against the catalog before any is applied.
    pub fn apply_suggestion(
        &mut self,
        suggestion: &Suggestion,
        products: &[Product],
    ) -> Result<(), DomainError> {
        let mut staged = self.clone();
        for offer_id in &suggestion.affected_items {
            staged.switch_agent(offer_id, &suggestion.after.agent_id, products)?;
        }
        *self = staged;
        Ok(())
    }

    pub fn groups(&self, agents: &[Agent]) -> Vec<AgentGroup> {
        group_cart_items_by_agent(&self.items, agents)
    }

    pub fn suggestions(&self, agents: &[Agent], products: &[Product]) -> Vec<Suggestion> {
        generate_suggestions(&self.items, agents, products)
    }
}

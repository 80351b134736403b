use std::collections::HashMap;

use icu_collator::{Collator, CollatorOptions};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::{find_agent, Agent, AgentId, CartItem};

/// Pricing currency of the catalog. Shipping estimates are always quoted in it.
pub const DEFAULT_CURRENCY: &str = "CNY";

/// Shipping range for one agent parcel. `min` and `max` are both the flat
/// sum of the items' shipping fees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingEstimate {
    pub min: f64,
    pub max: f64,
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ShippingEstimate {
    fn flat(amount: f64) -> Self {
        Self { min: amount, max: amount, currency: DEFAULT_CURRENCY.to_owned(), note: None }
    }
}

/// Cart items routed through a single agent, with aggregate costs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentGroup {
    pub agent_id: AgentId,
    pub agent: Option<Agent>,
    pub items: Vec<CartItem>,
    pub estimated_shipping: ShippingEstimate,
    /// Item prices only.
    pub subtotal: f64,
    pub total: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promo_text: Option<String>,
}

impl AgentGroup {
    fn build(agent_id: AgentId, items: Vec<CartItem>, agents: &[Agent]) -> Self {
        let agent = find_agent(agents, &agent_id).cloned();
        let subtotal = items.iter().map(|item| item.price).sum::<f64>();
        let estimated_shipping =
            ShippingEstimate::flat(items.iter().map(|item| item.ship_fee).sum());
        let total = subtotal + estimated_shipping.min;
        let promo_text = agent.as_ref().and_then(|agent| agent.promo_text.clone());

        Self { agent_id, agent, items, estimated_shipping, subtotal, total, promo_text }
    }

    /// Agent name, or the raw id when the agent is not in the directory.
    pub fn display_name(&self) -> &str {
        match &self.agent {
            Some(agent) if !agent.name.is_empty() => &agent.name,
            _ => self.agent_id.as_str(),
        }
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn total_weight(&self) -> f64 {
        self.items.iter().filter_map(|item| item.weight).sum()
    }

    pub fn total_volume(&self) -> f64 {
        self.items.iter().filter_map(|item| item.volume).sum()
    }
}

/// Partition `items` by agent and sort the groups by display name.
///
/// Groups and the items inside them keep first-seen order until the name
/// sort, which is stable.
pub fn group_cart_items_by_agent(items: &[CartItem], agents: &[Agent]) -> Vec<AgentGroup> {
    let mut order: Vec<AgentId> = Vec::new();
    let mut buckets: HashMap<AgentId, Vec<CartItem>> = HashMap::new();

    for item in items {
        buckets
            .entry(item.agent_id.clone())
            .or_insert_with(|| {
                order.push(item.agent_id.clone());
                Vec::new()
            })
            .push(item.clone());
    }

    let mut groups: Vec<AgentGroup> = order
        .into_iter()
        .map(|agent_id| {
            let items = buckets.remove(&agent_id).unwrap_or_default();
            AgentGroup::build(agent_id, items, agents)
        })
        .collect();

    sort_by_display_name(&mut groups);
    groups
}

/// Grand total across groups.
pub fn calculate_cart_total(groups: &[AgentGroup]) -> f64 {
    groups.iter().map(|group| group.total).sum()
}

/// Root-locale collation: base letters first, then accents, then case with
/// lowercase ahead.
fn sort_by_display_name(groups: &mut [AgentGroup]) {
    match Collator::try_new(&Default::default(), CollatorOptions::new()) {
        Ok(collator) => {
            groups.sort_by(|a, b| collator.compare(a.display_name(), b.display_name()))
        }
        Err(error) => {
            warn!(
                event_name = "cart.grouping.collator_unavailable",
                error = ?error,
                "collator unavailable, ordering groups by code point"
            );
            groups.sort_by(|a, b| a.display_name().cmp(b.display_name()));
        }
    }
}

//! Cart Optimization Advisor implementation

use tracing::debug;

use crate::cart::{calculate_cart_total, group_cart_items_by_agent, AgentGroup, DEFAULT_CURRENCY};
use crate::domain::{find_product, Agent, AgentId, CartItem, Offer, Product};

use super::types::*;

/// Suggest savings with the default advisor settings.
pub fn generate_suggestions(
    items: &[CartItem],
    agents: &[Agent],
    products: &[Product],
) -> Vec<Suggestion> {
    CartAdvisor::new().suggest(items, agents, products)
}

/// Generates money-saving reassignments for a cart snapshot
#[derive(Debug, Clone, Default)]
pub struct CartAdvisor {
    settings: AdvisorSettings,
}

/// Cart snapshot shared by both generators
struct Baseline<'a> {
    items: &'a [CartItem],
    agents: &'a [Agent],
    products: &'a [Product],
    groups: Vec<AgentGroup>,
    total: f64,
}

/// Regrouped cart after moving one item
struct Simulation {
    groups: Vec<AgentGroup>,
    savings: f64,
}

impl CartAdvisor {
    /// Create an advisor with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom settings
    pub fn with_settings(settings: AdvisorSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &AdvisorSettings {
        &self.settings
    }

    /// Up to `max_suggestions` reassignments, largest saving first.
    pub fn suggest(
        &self,
        items: &[CartItem],
        agents: &[Agent],
        products: &[Product],
    ) -> Vec<Suggestion> {
        if items.is_empty() {
            return Vec::new();
        }

        let groups = group_cart_items_by_agent(items, agents);
        let total = calculate_cart_total(&groups);
        let baseline = Baseline { items, agents, products, groups, total };

        let mut suggestions = self.promo_suggestions(&baseline);
        let promo_count = suggestions.len();
        suggestions.extend(self.consolidation_suggestions(&baseline));

        debug!(
            event_name = "advisor.suggestions.generated",
            item_count = items.len(),
            promo_count,
            consolidation_count = suggestions.len() - promo_count,
            "cart suggestions generated"
        );

        suggestions.sort_by(|a, b| b.savings.total_cmp(&a.savings));
        suggestions.truncate(self.settings.max_suggestions);
        suggestions
    }

    /// Moves toward agents running a promo. Candidates are pre-filtered by a
    /// flat share of the item price, then verified by simulation.
    fn promo_suggestions(&self, baseline: &Baseline<'_>) -> Vec<Suggestion> {
        let mut suggestions = Vec::new();

        for agent in baseline.agents.iter().filter(|agent| agent.has_promo()) {
            for item in baseline.items {
                if item.agent_id == agent.id {
                    continue;
                }
                let Some(offer) = target_offer(baseline.products, item, &agent.id) else {
                    continue;
                };

                let estimated = item.price * self.settings.promo_discount_rate;
                if estimated <= self.settings.min_promo_saving {
                    continue;
                }

                let simulation = simulate_move(baseline, item, &agent.id, offer);
                if simulation.savings > 0.0 {
                    suggestions.push(Suggestion {
                        id: format!("promo-{}-{}", item.offer_id, agent.id),
                        kind: SuggestionType::PromoOptimization,
                        title: format!("Move item to {}", agent.name),
                        reason: format!(
                            "{} current promo can save {} {DEFAULT_CURRENCY}",
                            agent.name,
                            whole_units(simulation.savings)
                        ),
                        before: snapshot(&baseline.groups, &item.agent_id),
                        after: snapshot(&simulation.groups, &agent.id),
                        savings: simulation.savings,
                        affected_items: vec![item.offer_id.clone()],
                    });
                }
            }
        }

        debug!(
            event_name = "advisor.promo.evaluated",
            emitted = suggestions.len(),
            "promo candidates evaluated"
        );
        suggestions
    }

    /// Moves into the group holding the most items. Nothing to do with a
    /// single group.
    fn consolidation_suggestions(&self, baseline: &Baseline<'_>) -> Vec<Suggestion> {
        let Some(largest) = largest_group(&baseline.groups) else {
            return Vec::new();
        };
        if baseline.groups.len() < 2 {
            return Vec::new();
        }

        let mut suggestions = Vec::new();
        for item in baseline.items {
            if item.agent_id == largest.agent_id {
                continue;
            }
            let Some(offer) = target_offer(baseline.products, item, &largest.agent_id) else {
                continue;
            };

            let simulation = simulate_move(baseline, item, &largest.agent_id, offer);
            if simulation.savings > 0.0 {
                suggestions.push(Suggestion {
                    id: format!("consolidate-{}-{}", item.offer_id, largest.agent_id),
                    kind: SuggestionType::AgentSwitch,
                    title: format!("Move item to {}", largest.display_name()),
                    reason: format!(
                        "Consolidate shipping to save {} {DEFAULT_CURRENCY}",
                        whole_units(simulation.savings)
                    ),
                    before: snapshot(&baseline.groups, &item.agent_id),
                    after: snapshot(&simulation.groups, &largest.agent_id),
                    savings: simulation.savings,
                    affected_items: vec![item.offer_id.clone()],
                });
            }
        }

        debug!(
            event_name = "advisor.consolidation.evaluated",
            target_agent = %largest.agent_id,
            emitted = suggestions.len(),
            "consolidation candidates evaluated"
        );
        suggestions
    }
}

/// The target agent's offer for the item's product, if the catalog has both.
fn target_offer<'a>(
    products: &'a [Product],
    item: &CartItem,
    agent_id: &AgentId,
) -> Option<&'a Offer> {
    find_product(products, &item.product_id)?.offer_for_agent(agent_id)
}

fn simulate_move(
    baseline: &Baseline<'_>,
    moved: &CartItem,
    agent_id: &AgentId,
    offer: &Offer,
) -> Simulation {
    let items: Vec<CartItem> = baseline
        .items
        .iter()
        .map(|item| {
            if item.offer_id == moved.offer_id {
                item.reassigned(agent_id, offer)
            } else {
                item.clone()
            }
        })
        .collect();
    let groups = group_cart_items_by_agent(&items, baseline.agents);
    let savings = baseline.total - calculate_cart_total(&groups);

    Simulation { groups, savings }
}

/// First group with the highest item count, in display order.
fn largest_group(groups: &[AgentGroup]) -> Option<&AgentGroup> {
    groups.iter().fold(None, |largest: Option<&AgentGroup>, group| match largest {
        Some(current) if group.item_count() <= current.item_count() => Some(current),
        _ => Some(group),
    })
}

fn snapshot(groups: &[AgentGroup], agent_id: &AgentId) -> CostSnapshot {
    let group = groups.iter().find(|group| group.agent_id == *agent_id);
    CostSnapshot {
        agent_id: agent_id.clone(),
        shipping_cost: group.map_or(0.0, |group| group.estimated_shipping.min),
        total_cost: group.map_or(0.0, |group| group.total),
    }
}

/// Whole currency units, exact halves rounded away from zero.
fn whole_units(amount: f64) -> i64 {
    amount.round() as i64
}

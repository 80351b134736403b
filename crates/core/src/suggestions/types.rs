//! Types for the Cart Optimization Advisor

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{AgentId, OfferId};

/// Kind of reassignment a suggestion proposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionType {
    /// Move an item into the cart's largest parcel
    AgentSwitch,
    /// Reserved; no generator emits it yet
    SplitParcel,
    /// Move an item to an agent running a promotion
    PromoOptimization,
}

impl SuggestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionType::AgentSwitch => "agent_switch",
            SuggestionType::SplitParcel => "split_parcel",
            SuggestionType::PromoOptimization => "promo_optimization",
        }
    }
}

impl fmt::Display for SuggestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Costs of one agent group, before or after a move
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostSnapshot {
    pub agent_id: AgentId,
    pub shipping_cost: f64,
    pub total_cost: f64,
}

/// A proposed reassignment with its verified saving
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    /// Stable id built from the offer id and target agent id
    pub id: String,
    #[serde(rename = "type")]
    pub kind: SuggestionType,
    pub title: String,
    pub reason: String,
    pub before: CostSnapshot,
    pub after: CostSnapshot,
    /// Current grand total minus simulated grand total, always positive
    pub savings: f64,
    pub affected_items: Vec<OfferId>,
}

/// Tunables for the advisor heuristics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdvisorSettings {
    /// Maximum suggestions returned (default: 5)
    pub max_suggestions: usize,
    /// Assumed promo discount as a share of item price (default: 0.1)
    pub promo_discount_rate: f64,
    /// Estimated promo saving a candidate must exceed (default: 5.0)
    pub min_promo_saving: f64,
}

impl Default for AdvisorSettings {
    fn default() -> Self {
        Self {
            max_suggestions: super::MAX_SUGGESTIONS,
            promo_discount_rate: super::PROMO_DISCOUNT_RATE,
            min_promo_saving: super::MIN_PROMO_SAVING,
        }
    }
}

//! Types for the Offer Ranking Engine

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::Offer;

/// Weights for the five scoring components.
///
/// Weights are applied as given. Totals only stay on a 0-100 scale when the
/// weights sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankingWeights {
    /// Weight for the price score (default: 0.40)
    pub price: f64,
    /// Weight for the shipping score (default: 0.30)
    pub shipping: f64,
    /// Weight for the promo score (default: 0.10)
    pub promo: f64,
    /// Weight for the rating score (default: 0.15)
    pub rating: f64,
    /// Weight for the speed score (default: 0.05)
    pub speed: f64,
}

impl Default for RankingWeights {
    fn default() -> Self {
        super::DEFAULT_WEIGHTS
    }
}

impl RankingWeights {
    pub fn sum(&self) -> f64 {
        self.price + self.shipping + self.promo + self.rating + self.speed
    }
}

/// Individual component scores, each rounded to the nearest integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub price_score: i64,
    pub shipping_score: i64,
    pub promo_score: i64,
    pub rating_score: i64,
    pub speed_score: i64,
}

/// Why an offer stands out. The first matching rule wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreReason {
    /// Cheap on both price and shipping
    BestValue,
    /// Fast agent with a strong rating
    FastDelivery,
    /// Agent is running a promotion
    PromoAvailable,
    /// Agent rating is near the top of the scale
    HighRating,
    /// Fallback when nothing else applies
    GoodOption,
}

impl ScoreReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreReason::BestValue => "best_value",
            ScoreReason::FastDelivery => "fast_delivery",
            ScoreReason::PromoAvailable => "promo_available",
            ScoreReason::HighRating => "high_rating",
            ScoreReason::GoodOption => "good_option",
        }
    }
}

impl fmt::Display for ScoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of scoring a single offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingResult {
    /// Weighted total, rounded half-up
    pub score: i64,
    pub breakdown: ScoreBreakdown,
    pub reason: ScoreReason,
}

/// An offer with its score, reason tag and 1-based rank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedOffer {
    #[serde(flatten)]
    pub offer: Offer,
    pub rank: usize,
    pub score: i64,
    pub score_reason: ScoreReason,
}

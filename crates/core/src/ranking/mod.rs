//! Offer Ranking Engine
//!
//! Scores every offer for one product against the rest of the offer set on
//! price, shipping, promo availability, agent rating and delivery speed, then
//! orders the set by the weighted total.

mod ranker;
mod scoring;
mod types;

pub use ranker::{rank_offers, rank_offers_with_weights, OfferRanker};
pub use scoring::calculate_ranking_score;
pub use types::*;

/// Default component weights. They sum to 1 so totals land on a 0-100 scale.
pub const DEFAULT_WEIGHTS: RankingWeights =
    RankingWeights { price: 0.40, shipping: 0.30, promo: 0.10, rating: 0.15, speed: 0.05 };

/// Price and shipping scores at or above this mark count as strong.
pub const BEST_VALUE_THRESHOLD: f64 = 80.0;

/// Rating score needed for a fast agent to earn `fast_delivery`.
pub const FAST_DELIVERY_RATING_THRESHOLD: f64 = 80.0;

/// Rating score needed for `high_rating`.
pub const HIGH_RATING_THRESHOLD: f64 = 90.0;

/// Rating score for an agent missing from the directory, and speed score for
/// any agent not tagged `fast`.
pub const NEUTRAL_SCORE: f64 = 50.0;

//! Scoring algorithms for reseller offers

use crate::domain::{Agent, Offer};

use super::types::*;
use super::{
    BEST_VALUE_THRESHOLD, FAST_DELIVERY_RATING_THRESHOLD, HIGH_RATING_THRESHOLD, NEUTRAL_SCORE,
};

const MAX_SCORE: f64 = 100.0;
const MAX_RATING: f64 = 5.0;

/// Score one offer relative to `all_offers`, the full set it competes in.
///
/// Price and shipping are normalized within `all_offers` only. The agent is
/// optional; a missing agent scores neutral on rating and speed and never
/// counts as having a promo.
pub fn calculate_ranking_score(
    offer: &Offer,
    agent: Option<&Agent>,
    all_offers: &[Offer],
    weights: &RankingWeights,
) -> RankingResult {
    let price_score = inverse_normalize(offer.price, all_offers.iter().map(|o| o.price));
    let shipping_score = inverse_normalize(offer.ship_fee, all_offers.iter().map(|o| o.ship_fee));
    let promo_score = if agent.is_some_and(Agent::has_promo) { MAX_SCORE } else { 0.0 };
    let rating_score = agent.map_or(NEUTRAL_SCORE, |agent| agent.rating / MAX_RATING * MAX_SCORE);
    let is_fast = agent.is_some_and(Agent::is_fast);
    let speed_score = if is_fast { MAX_SCORE } else { NEUTRAL_SCORE };

    let total = price_score * weights.price
        + shipping_score * weights.shipping
        + promo_score * weights.promo
        + rating_score * weights.rating
        + speed_score * weights.speed;

    let reason = if price_score >= BEST_VALUE_THRESHOLD && shipping_score >= BEST_VALUE_THRESHOLD {
        ScoreReason::BestValue
    } else if is_fast && rating_score >= FAST_DELIVERY_RATING_THRESHOLD {
        ScoreReason::FastDelivery
    } else if promo_score > 0.0 {
        ScoreReason::PromoAvailable
    } else if rating_score >= HIGH_RATING_THRESHOLD {
        ScoreReason::HighRating
    } else {
        ScoreReason::GoodOption
    };

    RankingResult {
        score: round_half_up(total),
        breakdown: ScoreBreakdown {
            price_score: round_half_up(price_score),
            shipping_score: round_half_up(shipping_score),
            promo_score: round_half_up(promo_score),
            rating_score: round_half_up(rating_score),
            speed_score: round_half_up(speed_score),
        },
        reason,
    }
}

/// Linear inverse normalization: the set minimum scores 100, the maximum 0.
///
/// A zero range is replaced by 1 rather than treated specially, so a set of
/// identical values scores 100 across the board. An empty set has no finite
/// range and also scores 100.
fn inverse_normalize(value: f64, set: impl Iterator<Item = f64>) -> f64 {
    let (min, max) =
        set.fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), v| (min.min(v), max.max(v)));

    let range = max - min;
    let range = if range == 0.0 || range.is_nan() { 1.0 } else { range };

    if range > 0.0 {
        (MAX_SCORE - (value - min) / range * MAX_SCORE).max(0.0)
    } else {
        MAX_SCORE
    }
}

/// Rounds to the nearest integer with exact halves going toward +infinity.
pub(crate) fn round_half_up(value: f64) -> i64 {
    let floor = value.floor();
    let rounded = if value - floor >= 0.5 { floor + 1.0 } else { floor };
    rounded as i64
}

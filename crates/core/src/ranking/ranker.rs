//! Offer ranking over a product's full offer set

use tracing::debug;

use crate::domain::{find_agent, Agent, Offer};

use super::scoring::calculate_ranking_score;
use super::types::*;

/// Rank offers with the default weights.
pub fn rank_offers(offers: &[Offer], agents: &[Agent]) -> Vec<RankedOffer> {
    rank_offers_with_weights(offers, agents, &RankingWeights::default())
}

/// Score every offer against the whole set and order by score, highest first.
///
/// The sort is stable, so offers with equal scores keep their input order.
pub fn rank_offers_with_weights(
    offers: &[Offer],
    agents: &[Agent],
    weights: &RankingWeights,
) -> Vec<RankedOffer> {
    let mut ranked: Vec<RankedOffer> = offers
        .iter()
        .map(|offer| {
            let agent = find_agent(agents, &offer.agent_id);
            let result = calculate_ranking_score(offer, agent, offers, weights);
            RankedOffer {
                offer: offer.clone(),
                rank: 0,
                score: result.score,
                score_reason: result.reason,
            }
        })
        .collect();

    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    for (index, offer) in ranked.iter_mut().enumerate() {
        offer.rank = index + 1;
    }

    debug!(
        event_name = "ranking.offers.ranked",
        offer_count = ranked.len(),
        top_score = ?ranked.first().map(|offer| offer.score),
        "offers ranked"
    );

    ranked
}

/// Ranks and scores offers with a fixed set of weights.
#[derive(Debug, Clone, Default)]
pub struct OfferRanker {
    weights: RankingWeights,
}

impl OfferRanker {
    /// Create a ranker with default weights
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom weights
    pub fn with_weights(weights: RankingWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &RankingWeights {
        &self.weights
    }

    pub fn rank(&self, offers: &[Offer], agents: &[Agent]) -> Vec<RankedOffer> {
        rank_offers_with_weights(offers, agents, &self.weights)
    }

    /// Score a single offer from `offers`, looking its agent up in `agents`.
    pub fn score(&self, offer: &Offer, agents: &[Agent], offers: &[Offer]) -> RankingResult {
        calculate_ranking_score(offer, find_agent(agents, &offer.agent_id), offers, &self.weights)
    }
}

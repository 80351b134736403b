use serde::Serialize;
use xfinds_core::config::LoadOptions;
use xfinds_core::{AgentId, ApplicationError, DomainError, Offer, OfferRanker, RankingResult};

use super::{CommandResult, Session};

const COMMAND: &str = "score";

#[derive(Debug, Serialize)]
struct ScoreReport<'a> {
    product_id: &'a str,
    agent_id: &'a str,
    agent_found: bool,
    offer: &'a Offer,
    result: RankingResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    tracking_url: Option<String>,
}

pub fn run(options: &LoadOptions, product: &str, agent: &str) -> CommandResult {
    execute(options, product, agent)
        .unwrap_or_else(|error| CommandResult::from_error(COMMAND, &error))
}

fn execute(
    options: &LoadOptions,
    product_key: &str,
    agent_id: &str,
) -> Result<CommandResult, ApplicationError> {
    let session = Session::open(options)?;
    let product = session.product(product_key)?;
    let agent_id = AgentId::from(agent_id);
    let agent = session.catalog.agent_by_id(agent_id.as_str());
    let offer = product.offer_for_agent(&agent_id).ok_or_else(|| match agent {
        Some(_) => DomainError::OfferNotFound {
            product_id: product.id.clone(),
            agent_id: agent_id.clone(),
        },
        None => DomainError::AgentNotFound(agent_id.clone()),
    })?;

    let ranker = OfferRanker::with_weights(session.config.ranking_weights());
    let result = ranker.score(offer, &session.catalog.agents, &product.offers);

    let message =
        format!("{} scores {} on {} ({})", agent_id, result.score, product.title, result.reason);
    let report = ScoreReport {
        product_id: product.id.as_str(),
        agent_id: agent_id.as_str(),
        agent_found: agent.is_some(),
        offer,
        result,
        tracking_url: agent.map(|agent| agent.tracking_url(Some(offer.link.as_str()))),
    };

    Ok(CommandResult::success_with_data(COMMAND, message, report))
}

use serde::Serialize;
use xfinds_core::config::LoadOptions;
use xfinds_core::{ApplicationError, OfferRanker, RankedOffer};

use super::{CommandResult, Session};

const COMMAND: &str = "rank";

#[derive(Debug, Serialize)]
struct RankReport<'a> {
    product_id: &'a str,
    slug: &'a str,
    title: &'a str,
    offers: Vec<RankedOffer>,
}

pub fn run(options: &LoadOptions, product: &str) -> CommandResult {
    execute(options, product).unwrap_or_else(|error| CommandResult::from_error(COMMAND, &error))
}

fn execute(options: &LoadOptions, product_key: &str) -> Result<CommandResult, ApplicationError> {
    let session = Session::open(options)?;
    let product = session.product(product_key)?;

    let ranker = OfferRanker::with_weights(session.config.ranking_weights());
    let offers = ranker.rank(&product.offers, &session.catalog.agents);

    let message = match offers.first() {
        Some(top) => format!(
            "ranked {} offers for {}; top pick {} ({})",
            offers.len(),
            product.title,
            top.offer.agent_id,
            top.score_reason
        ),
        None => format!("{} has no offers to rank", product.title),
    };
    let report = RankReport {
        product_id: product.id.as_str(),
        slug: &product.slug,
        title: &product.title,
        offers,
    };

    Ok(CommandResult::success_with_data(COMMAND, message, report))
}

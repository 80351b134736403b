use serde::Serialize;
use xfinds_core::config::LoadOptions;
use xfinds_core::{ApplicationError, CartAdvisor, Suggestion};

use super::{CommandResult, Session};

const COMMAND: &str = "suggest";

#[derive(Debug, Serialize)]
struct SuggestReport {
    current_total: f64,
    suggestions: Vec<Suggestion>,
}

pub fn run(options: &LoadOptions) -> CommandResult {
    execute(options).unwrap_or_else(|error| CommandResult::from_error(COMMAND, &error))
}

fn execute(options: &LoadOptions) -> Result<CommandResult, ApplicationError> {
    let session = Session::open(options)?;
    let cart = session.cart()?;

    let advisor = CartAdvisor::with_settings(session.config.advisor_settings());
    let suggestions =
        advisor.suggest(cart.items(), &session.catalog.agents, &session.catalog.products);

    let message = match suggestions.first() {
        Some(best) => {
            format!("{} suggestions; best saves {:.2} CNY", suggestions.len(), best.savings)
        }
        None => "no cheaper agent assignment found".to_string(),
    };

    Ok(CommandResult::success_with_data(
        COMMAND,
        message,
        SuggestReport { current_total: cart.total(), suggestions },
    ))
}

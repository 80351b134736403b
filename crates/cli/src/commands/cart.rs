use serde::Serialize;
use xfinds_core::config::LoadOptions;
use xfinds_core::{calculate_cart_total, AgentGroup, ApplicationError};

use super::{CommandResult, Session};

const COMMAND: &str = "cart";

#[derive(Debug, Serialize)]
struct CartReport {
    item_count: usize,
    groups: Vec<AgentGroup>,
    total: f64,
}

pub fn run(options: &LoadOptions) -> CommandResult {
    execute(options).unwrap_or_else(|error| CommandResult::from_error(COMMAND, &error))
}

fn execute(options: &LoadOptions) -> Result<CommandResult, ApplicationError> {
    let session = Session::open(options)?;
    let cart = session.cart()?;

    let groups = cart.groups(&session.catalog.agents);
    let total = calculate_cart_total(&groups);
    let message = format!(
        "{} items across {} agents, total {total:.2} CNY",
        cart.item_count(),
        groups.len()
    );

    Ok(CommandResult::success_with_data(
        COMMAND,
        message,
        CartReport { item_count: cart.item_count(), groups, total },
    ))
}

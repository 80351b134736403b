//! Cart state and per-agent grouping
//!
//! Groups are derived views, recomputed from the item list on every read.

mod grouping;
mod store;

pub use grouping::{
    calculate_cart_total, group_cart_items_by_agent, AgentGroup, ShippingEstimate, DEFAULT_CURRENCY,
};
pub use store::Cart;

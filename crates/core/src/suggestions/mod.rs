//! Cart Optimization Advisor
//!
//! Proposes single-item agent switches that lower the cart's grand total.
//! Each candidate is checked by regrouping a simulated cart, never by
//! estimate alone.

mod engine;
mod types;

pub use engine::{generate_suggestions, CartAdvisor};
pub use types::*;

/// Share of an item's price assumed recoverable through an agent promo
pub const PROMO_DISCOUNT_RATE: f64 = 0.1;

/// Promo candidates at or below this estimated saving are not simulated
pub const MIN_PROMO_SAVING: f64 = 5.0;

/// Maximum suggestions to return
pub const MAX_SUGGESTIONS: usize = 5;

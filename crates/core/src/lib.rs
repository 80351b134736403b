pub mod cart;
pub mod catalog;
pub mod compare;
pub mod config;
pub mod domain;
pub mod errors;
pub mod ranking;
pub mod suggestions;

pub use cart::{
    calculate_cart_total, group_cart_items_by_agent, AgentGroup, Cart, ShippingEstimate,
};
pub use catalog::{load_cart, Catalog, CatalogError, Category};
pub use compare::{compare_total, CompareList, CompareOffer};
pub use domain::{Agent, AgentId, CartItem, Offer, OfferId, Product, ProductId};
pub use errors::{ApplicationError, DomainError};
pub use ranking::{
    calculate_ranking_score, rank_offers, rank_offers_with_weights, OfferRanker, RankedOffer,
    RankingResult, RankingWeights, ScoreBreakdown, ScoreReason,
};
pub use suggestions::{
    generate_suggestions, AdvisorSettings, CartAdvisor, CostSnapshot, Suggestion, SuggestionType,
};

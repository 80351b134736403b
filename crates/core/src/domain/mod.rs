pub mod agent;
pub mod cart_item;
pub mod product;

pub use agent::{find_agent, Agent, AgentId};
pub use cart_item::CartItem;
pub use product::{find_product, Offer, OfferId, PriceGuide, Product, ProductId, ProductSpecs};

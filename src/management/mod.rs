mod aggregation;
mod auth;
mod hub;

pub use aggregation::Aggregator;
pub use aggregation::DEFAULT_MARKET;
pub use aggregation::DEFAULT_TASTE_LIMIT;
pub use auth::TokenManager;
pub use hub::Hub;

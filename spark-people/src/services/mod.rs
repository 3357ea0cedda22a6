pub mod decisions;
pub mod feed;
pub mod seed;

pub use decisions::DecisionService;
pub use feed::RecommendationFeed;

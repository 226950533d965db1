pub mod planner;
pub mod providers;
pub mod recommendations;
pub mod reviews;

pub use planner::{suggest_watch_times, PlannerError};
pub use providers::{MetadataProvider, TmdbProvider};
pub use recommendations::{Recommendation, RecommendationEngine};
pub use reviews::{ReviewGenerator, ReviewLength};

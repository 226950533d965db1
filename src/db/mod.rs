pub mod cache;
pub mod macros;
pub mod movies;
pub mod party;
pub mod sqlite;

pub use cache::{Cache, CacheKey};
pub use movies::MovieRepo;
pub use party::PartyRepo;
pub use sqlite::create_pool;

//! Storage for murmur: the three chat tables, their repository traits, and
//! two interchangeable backends (in-memory and SQLite).

pub mod memory;
pub mod pagination;
pub mod pair;
pub mod repository;
pub mod sqlite;

pub use memory::MemoryStore;
pub use pair::PairKey;
pub use repository::{AuthRepository, PrivateRepository, PublicRepository};
pub use sqlite::Database;

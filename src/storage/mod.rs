//! Storage mechanisms for persisting and retrieving user records

pub mod memory;
pub mod traits;

// Re-export the storage interface and the in-memory backend
pub use memory::MemoryUserStorage;
pub use traits::{SharedUserStorage, UserStorage};

//! Session storage handlers
//!
//! Only the in-memory store ships here. A database-backed store is expected
//! to implement `SessionStoreEffects` in the embedding application.

pub mod memory;

pub use memory::MemorySessionStore;

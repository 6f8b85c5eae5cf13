//! Pub/sub handlers

pub mod memory;

pub use memory::{InMemoryPubSub, Published};

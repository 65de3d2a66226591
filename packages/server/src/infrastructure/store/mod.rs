//! Code-block definition store implementations.

mod inmemory;

pub use inmemory::InMemoryCodeBlockStore;

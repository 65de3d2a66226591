//! Session registry implementations.

mod inmemory;

pub use inmemory::InMemorySessionRegistry;

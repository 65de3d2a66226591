//! Shared library for the codesync workspace.
//!
//! Cross-cutting utilities used by the server: time handling with a clock
//! abstraction, and logging setup.

pub mod logger;
pub mod time;

//! Data loading
//!
//! Game tunables read from external RON files, so depth balance can be
//! changed without recompiling.

pub mod loader;

pub use loader::GameConfig;

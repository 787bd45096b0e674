//! Item system

pub mod tool;

pub use tool::{Tool, ToolKind, ToolType};

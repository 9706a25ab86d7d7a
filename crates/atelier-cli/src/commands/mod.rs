//! Command implementations

pub mod build;
pub mod engine;
pub mod module;
pub mod project;
pub mod render;

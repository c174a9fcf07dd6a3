//! # Runtime Module
//!
//! Process runtime for the provider plugin: tracing initialization.

pub mod initialization;

pub use initialization::*;

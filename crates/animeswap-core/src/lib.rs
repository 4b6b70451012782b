//! animeswap-core: Shared types, errors, configuration and decimal helpers
//!
//! This crate provides the foundational types used across the AnimeSwap workspace.

pub mod config;
pub mod errors;
pub mod number;
pub mod types;

pub use config::*;
pub use errors::*;
pub use types::*;

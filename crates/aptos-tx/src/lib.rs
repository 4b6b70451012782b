//! aptos-tx: Transaction payload utilities for Aptos
//!
//! Provides the entry-function payload structure handed to wallets for signing,
//! Move type-string composition, and deadline helpers.

pub mod deadline;
pub mod payload;
pub mod type_tag;

pub use deadline::*;
pub use payload::*;
pub use type_tag::*;

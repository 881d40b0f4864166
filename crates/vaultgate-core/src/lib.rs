//! # vaultgate-core
//!
//! Core types, traits, and abstractions for the vaultgate API gateway.
//!
//! This crate provides the error taxonomy, domain models, and backend trait
//! definitions that the other vaultgate crates depend on.

pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod tokenizer;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use tokenizer::{estimate_tokens, TiktokenTokenizer, Tokenizer};
pub use traits::*;

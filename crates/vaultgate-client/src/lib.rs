//! # vaultgate-client
//!
//! Reqwest-based clients for the downstream chat, history, vault, and
//! answer-generation services. All failure normalization happens in one
//! place, the [`http::ServiceClient`] wrapper; the per-service clients only
//! describe endpoints and payload shapes.
//!
//! The [`mock`] module provides in-process backends with call logs and
//! scripted failures for deterministic testing.

pub mod answer;
pub mod chats;
pub mod endpoints;
pub mod history;
pub mod http;
pub mod mock;
pub mod vaults;

pub use answer::HttpAnswerClient;
pub use chats::HttpChatsClient;
pub use endpoints::Endpoints;
pub use history::HttpHistoryClient;
pub use http::ServiceClient;
pub use vaults::HttpVaultsClient;

//! Structured logging field name constants for vaultgate.
//!
//! All crates use these constants for consistent structured logging fields so
//! log aggregation tools can query by standardized names across subsystems.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Saga compensation failures, aggregate fan-out failures |
//! | WARN  | Cache errors (operation proceeds), captured sub-failures |
//! | INFO  | Lifecycle events, completed orchestrations |
//! | DEBUG | Cache hits/misses, dispatch decisions, truncation results |

/// Subsystem originating the log event.
/// Values: "cache", "client", "messaging", "vaults", "answer"
pub const SUBSYSTEM: &str = "subsystem";

/// Logical operation name.
/// Examples: "create_chat", "delete_vault_and_chats", "generate"
pub const OPERATION: &str = "op";

/// Downstream service display name ("Chat", "History", "Vault", "RAG").
pub const SERVICE: &str = "service";

/// Chat UUID being operated on.
pub const CHAT_ID: &str = "chat_id";

/// Vault UUID being operated on.
pub const VAULT_ID: &str = "vault_id";

/// User UUID owning the entity.
pub const USER_ID: &str = "user_id";

/// Cache key touched by an operation.
pub const CACHE_KEY: &str = "cache_key";

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of history entries kept after truncation.
pub const KEPT_MESSAGES: &str = "kept_messages";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

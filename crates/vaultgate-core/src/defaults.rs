//! Centralized default constants for the vaultgate gateway.
//!
//! Single source of truth for shared default values. All crates reference
//! these constants instead of defining their own magic numbers.

// =============================================================================
// CACHE
// =============================================================================

/// Default cache TTL in seconds. Individual writers cannot override this;
/// the cache layer applies it to every `set`.
pub const CACHE_TTL_SECS: u64 = 3600;

/// Default Redis URL.
pub const REDIS_URL: &str = "redis://127.0.0.1:6379";

/// Key namespace for chat entities.
pub const CHAT_NAMESPACE: &str = "messaging";

/// Key namespace for vault entities.
pub const VAULT_NAMESPACE: &str = "vaults";

// =============================================================================
// DOWNSTREAM SERVICES
// =============================================================================

/// Default chat service base URL.
pub const CHATS_SERVICE_URL: &str = "http://127.0.0.1:8001";

/// Default history service base URL.
pub const HISTORY_SERVICE_URL: &str = "http://127.0.0.1:8002";

/// Default vault service base URL.
pub const VAULTS_SERVICE_URL: &str = "http://127.0.0.1:8003";

/// Default answer-generation service base URL.
pub const RAG_SERVICE_URL: &str = "http://127.0.0.1:8004";

/// Timeout for ordinary downstream calls in seconds.
pub const CALL_TIMEOUT_SECS: u64 = 30;

/// Timeout for answer-generation calls in seconds (5 minutes).
pub const ANSWER_TIMEOUT_SECS: u64 = 300;

/// Timeout for vault creation / document upload calls in seconds.
pub const UPLOAD_TIMEOUT_SECS: u64 = 120;

// =============================================================================
// ANSWER GENERATION
// =============================================================================

/// Token budget for the chat history passed to an answer backend.
/// History is truncated newest-backward to fit under this budget.
pub const HISTORY_TOKEN_BUDGET: usize = 3000;

//! # vaultgate-cache
//!
//! Cache-aside layer for the vaultgate gateway: a Redis-backed key-value
//! store plus typed cache managers for chat and vault entities.
//!
//! Every operation is fire-and-forget from the caller's perspective. A cache
//! failure never aborts an orchestration: reads degrade to a miss, writes and
//! invalidations to a no-op, with the error logged.

pub mod chats;
pub mod store;
pub mod vaults;

pub use chats::ChatCache;
pub use store::KeyValueCache;
pub use vaults::VaultCache;

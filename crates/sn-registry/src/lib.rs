//! sn-registry
//!
//! Star registry core:
//! - Star creation, sale listing, purchase, transfer, exchange
//! - Exact fixed-point value settlement (micros)
//! - Account balance ledger with conservation guarantees
//! - Pure deterministic logic (no IO, no time, no environment wiring)

mod money;
mod types;

pub mod registry;
pub mod settlement;

pub use money::{Amount, ParseAmountError};
pub use registry::{Registry, RegistryError, RegistryEvent, RegistryMetadata};
pub use settlement::{Accounts, SettlementError};
pub use types::{AccountId, CallerContext, Star, StarId};

/// Price/value scale: micros (1e-6).
pub const MICROS_SCALE: i64 = 1_000_000;

//! Serialization boundary types.
//!
//! Amounts cross this boundary as decimal strings ("0.010000"); the core's
//! fixed-point representation never serializes directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered star as persisted in the state snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StarRecord {
    pub id: u64,
    pub name: String,
    pub owner: String,
    /// Active listing price, decimal string; absent when unlisted.
    pub price: Option<String>,
}

/// An account balance as persisted in the state snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountRecord {
    pub id: String,
    pub balance: String,
}

/// The full persisted state: registry metadata, environment cost, stars,
/// and balances.  Written and read by the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub captured_at_utc: DateTime<Utc>,
    pub registry_name: String,
    pub registry_symbol: String,
    /// Per-operation processing cost charged by the environment,
    /// decimal string.
    pub processing_cost: String,
    pub stars: Vec<StarRecord>,
    pub accounts: Vec<AccountRecord>,
}

/// Journaled payload for each successful mutating operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum OperationEvent {
    StarCreated {
        id: u64,
        name: String,
        owner: String,
    },
    StarListed {
        id: u64,
        price: String,
    },
    StarSold {
        id: u64,
        seller: String,
        buyer: String,
        price: String,
    },
    StarTransferred {
        id: u64,
        from: String,
        to: String,
        listing_cleared: bool,
    },
    StarsExchanged {
        id_a: u64,
        id_b: u64,
        new_owner_a: String,
        new_owner_b: String,
    },
}

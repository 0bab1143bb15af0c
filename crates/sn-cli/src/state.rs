//! File-backed registry state: snapshot load/store plus journaling.
//!
//! The state directory holds two artifacts:
//! - `state.json`: the full [`StateSnapshot`] (metadata, stars, balances)
//! - `journal.jsonl`: the hash-chained operation journal
//!
//! Restoring a snapshot replays creations and listings through the public
//! registry API, so a loaded state always satisfies the registry's own
//! invariants; a hand-edited snapshot that violates them fails to load.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;

use sn_registry::{
    AccountId, Accounts, Amount, CallerContext, Registry, RegistryError, RegistryEvent,
    RegistryMetadata, StarId,
};
use sn_schemas::{AccountRecord, OperationEvent, StarRecord, StateSnapshot};

pub struct Workspace {
    dir: PathBuf,
}

/// In-memory registry state between load and store.
pub struct LoadedState {
    pub registry: Registry,
    pub accounts: Accounts,
    pub processing_cost: Amount,
}

impl LoadedState {
    /// Charge the environment's processing cost to `caller`, then apply one
    /// operation. The caller of this function persists the state only on
    /// success, so a rejected operation leaves the state file untouched.
    pub fn submit<F>(&mut self, caller: &AccountId, op: F) -> Result<RegistryEvent>
    where
        F: FnOnce(&mut Registry, &mut Accounts) -> Result<RegistryEvent, RegistryError>,
    {
        if self.processing_cost > Amount::ZERO {
            self.accounts
                .withdraw(caller, self.processing_cost)
                .context("collect processing cost")?;
        }
        match op(&mut self.registry, &mut self.accounts) {
            Ok(event) => Ok(event),
            Err(e) => {
                tracing::warn!(caller = %caller, error = %e, "operation rejected");
                Err(e.into())
            }
        }
    }
}

impl Workspace {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn state_path(&self) -> PathBuf {
        self.dir.join("state.json")
    }

    pub fn journal_path(&self) -> PathBuf {
        self.dir.join("journal.jsonl")
    }

    pub fn exists(&self) -> bool {
        self.state_path().exists()
    }

    /// Write a fresh snapshot (no stars, genesis balances).
    pub fn write_initial(&self, cfg: &sn_config::RegistryConfig) -> Result<()> {
        let snapshot = StateSnapshot {
            captured_at_utc: Utc::now(),
            registry_name: cfg.name.clone(),
            registry_symbol: cfg.symbol.clone(),
            processing_cost: Amount::new(cfg.processing_cost_micros).to_string(),
            stars: Vec::new(),
            accounts: cfg
                .genesis
                .iter()
                .map(|g| AccountRecord {
                    id: g.id.clone(),
                    balance: Amount::new(g.balance_micros).to_string(),
                })
                .collect(),
        };
        self.store_snapshot(&snapshot)
    }

    pub fn load(&self) -> Result<LoadedState> {
        let raw = std::fs::read_to_string(self.state_path())
            .with_context(|| format!("read state {:?} (run `sn init` first?)", self.state_path()))?;
        let snapshot: StateSnapshot =
            serde_json::from_str(&raw).context("parse state snapshot")?;
        restore(&snapshot)
    }

    pub fn store(&self, state: &LoadedState) -> Result<()> {
        self.store_snapshot(&capture(state))
    }

    /// Append one operation event to the journal, resuming the hash chain.
    pub fn journal(&self, registry_name: &str, event: &RegistryEvent) -> Result<()> {
        let path = self.journal_path();
        let (last_hash, seq) = sn_journal::chain_tail(&path)?;
        let mut writer = sn_journal::JournalWriter::new(&path, true)?
            .with_chain_state(last_hash, seq);
        let payload = serde_json::to_value(to_operation_event(event))
            .context("serialize operation event")?;
        writer.append(registry_name, event.kind(), payload)?;
        Ok(())
    }

    fn store_snapshot(&self, snapshot: &StateSnapshot) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create_dir_all {:?}", self.dir))?;
        let raw = serde_json::to_string_pretty(snapshot).context("serialize state snapshot")?;
        write_atomically(&self.state_path(), &raw)
    }
}

// Write via a sibling temp file + rename so a crash mid-write cannot leave a
// truncated state file.
fn write_atomically(path: &Path, contents: &str) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, contents).with_context(|| format!("write {:?}", tmp))?;
    std::fs::rename(&tmp, path).with_context(|| format!("rename {:?} -> {:?}", tmp, path))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Snapshot <-> core conversions
// ---------------------------------------------------------------------------

fn restore(snapshot: &StateSnapshot) -> Result<LoadedState> {
    let processing_cost: Amount = snapshot
        .processing_cost
        .parse()
        .context("parse processing_cost")?;

    let mut registry = Registry::new(RegistryMetadata::new(
        snapshot.registry_name.as_str(),
        snapshot.registry_symbol.as_str(),
    ));
    for star in &snapshot.stars {
        let ctx = CallerContext::of(star.owner.as_str());
        registry
            .create_star(star.name.as_str(), StarId(star.id), &ctx)
            .with_context(|| format!("restore star {}", star.id))?;
        if let Some(price) = &star.price {
            let price: Amount = price
                .parse()
                .with_context(|| format!("parse listing price of star {}", star.id))?;
            registry
                .put_star_up_for_sale(StarId(star.id), price, &ctx)
                .with_context(|| format!("restore listing of star {}", star.id))?;
        }
    }

    let mut accounts = Accounts::new();
    for account in &snapshot.accounts {
        let id = AccountId::new(account.id.as_str());
        accounts.open(id.clone());
        let balance: Amount = account
            .balance
            .parse()
            .with_context(|| format!("parse balance of account {}", account.id))?;
        accounts
            .deposit(&id, balance)
            .with_context(|| format!("restore balance of account {}", account.id))?;
    }

    Ok(LoadedState {
        registry,
        accounts,
        processing_cost,
    })
}

fn capture(state: &LoadedState) -> StateSnapshot {
    StateSnapshot {
        captured_at_utc: Utc::now(),
        registry_name: state.registry.name().to_string(),
        registry_symbol: state.registry.symbol().to_string(),
        processing_cost: state.processing_cost.to_string(),
        stars: state
            .registry
            .iter()
            .map(|(id, star, price)| StarRecord {
                id: id.0,
                name: star.name.clone(),
                owner: star.owner.to_string(),
                price: price.map(|p| p.to_string()),
            })
            .collect(),
        accounts: state
            .accounts
            .iter()
            .map(|(id, balance)| AccountRecord {
                id: id.to_string(),
                balance: balance.to_string(),
            })
            .collect(),
    }
}

/// Core effect record -> journal payload DTO.
pub fn to_operation_event(event: &RegistryEvent) -> OperationEvent {
    match event {
        RegistryEvent::StarCreated { id, name, owner } => OperationEvent::StarCreated {
            id: id.0,
            name: name.clone(),
            owner: owner.to_string(),
        },
        RegistryEvent::StarListed { id, price } => OperationEvent::StarListed {
            id: id.0,
            price: price.to_string(),
        },
        RegistryEvent::StarSold {
            id,
            seller,
            buyer,
            price,
        } => OperationEvent::StarSold {
            id: id.0,
            seller: seller.to_string(),
            buyer: buyer.to_string(),
            price: price.to_string(),
        },
        RegistryEvent::StarTransferred {
            id,
            from,
            to,
            listing_cleared,
        } => OperationEvent::StarTransferred {
            id: id.0,
            from: from.to_string(),
            to: to.to_string(),
            listing_cleared: *listing_cleared,
        },
        RegistryEvent::StarsExchanged {
            id_a,
            id_b,
            new_owner_a,
            new_owner_b,
        } => OperationEvent::StarsExchanged {
            id_a: id_a.0,
            id_b: id_b.0,
            new_owner_a: new_owner_a.to_string(),
            new_owner_b: new_owner_b.to_string(),
        },
    }
}

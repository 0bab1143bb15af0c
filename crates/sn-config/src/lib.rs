//! Layered YAML configuration for a registry deployment.
//!
//! Later files override earlier ones (base -> environment -> overrides).
//! The effective config is canonicalized to compact JSON and hashed so a
//! deployment can be identified by its `config_hash`.
//!
//! Monetary fields are carried as integer micros (1e-6 units), the same
//! scale the core uses, so no floating point touches any value on its way
//! into the settlement path.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::fs;

/// The merged, canonicalized, hashed configuration.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config_hash: String,
    pub canonical_json: String,
    pub config_json: Value,
}

/// A genesis account allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisAccount {
    pub id: String,
    pub balance_micros: i64,
}

/// Typed view of the registry-relevant config sections.
///
/// Required fields:
/// - registry.name
/// - registry.symbol
///
/// Optional:
/// - environment.processing_cost_micros (default 0)
/// - genesis.accounts (default empty)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    pub name: String,
    pub symbol: String,
    pub processing_cost_micros: i64,
    pub genesis: Vec<GenesisAccount>,
}

impl RegistryConfig {
    /// Build from canonical config JSON (produced by [`load_layered_yaml`]).
    pub fn from_config_json(cfg: &Value) -> Result<Self> {
        let name = cfg
            .pointer("/registry/name")
            .and_then(Value::as_str)
            .context("config missing registry.name")?;

        let symbol = cfg
            .pointer("/registry/symbol")
            .and_then(Value::as_str)
            .context("config missing registry.symbol")?;

        let processing_cost_micros = match cfg.pointer("/environment/processing_cost_micros") {
            Some(v) => v
                .as_i64()
                .context("environment.processing_cost_micros must be an integer")?,
            None => 0,
        };
        if processing_cost_micros < 0 {
            bail!("environment.processing_cost_micros must be >= 0 (got {processing_cost_micros})");
        }

        let genesis: Vec<GenesisAccount> = match cfg.pointer("/genesis/accounts") {
            Some(v) => serde_json::from_value(v.clone())
                .context("genesis.accounts must be a list of {id, balance_micros}")?,
            None => Vec::new(),
        };

        let mut seen: BTreeSet<String> = BTreeSet::new();
        for account in &genesis {
            if account.id.trim().is_empty() {
                bail!("genesis account id must not be empty");
            }
            if account.balance_micros < 0 {
                bail!(
                    "genesis balance must be >= 0 (account '{}' has {})",
                    account.id,
                    account.balance_micros
                );
            }
            if !seen.insert(account.id.clone()) {
                bail!("duplicate genesis account id '{}'", account.id);
            }
        }

        Ok(Self {
            name: name.to_string(),
            symbol: symbol.to_string(),
            processing_cost_micros,
            genesis,
        })
    }
}

pub fn load_layered_yaml(paths: &[&str]) -> Result<LoadedConfig> {
    let mut docs: Vec<String> = Vec::new();
    for p in paths {
        let raw =
            fs::read_to_string(p).with_context(|| format!("failed to read yaml path: {p}"))?;
        docs.push(raw);
    }

    let doc_refs: Vec<&str> = docs.iter().map(|s| s.as_str()).collect();
    load_layered_yaml_from_strings(&doc_refs)
}

pub fn load_layered_yaml_from_strings(yaml_docs: &[&str]) -> Result<LoadedConfig> {
    // Merge YAML docs in order: earlier docs are base, later docs override.
    let mut merged = serde_json::json!({});
    for raw in yaml_docs {
        let v_yaml: serde_yaml::Value = serde_yaml::from_str(raw).context("invalid yaml")?;
        let v_json = serde_json::to_value(v_yaml).context("yaml->json conversion failed")?;
        merged = deep_merge(merged, v_json);
    }

    let canonical_json = canonicalize_json(&merged)?;
    let config_hash = sha256_hex(canonical_json.as_bytes());
    Ok(LoadedConfig {
        config_hash,
        canonical_json,
        config_json: merged,
    })
}

fn deep_merge(a: Value, b: Value) -> Value {
    match (a, b) {
        (Value::Object(mut a_map), Value::Object(b_map)) => {
            for (k, b_val) in b_map {
                let a_val = a_map.remove(&k).unwrap_or(Value::Null);
                a_map.insert(k, deep_merge(a_val, b_val));
            }
            Value::Object(a_map)
        }
        (_, b_other) => b_other,
    }
}

fn canonicalize_json(v: &Value) -> Result<String> {
    // Compact serialization with recursively sorted keys, so identical
    // effective configs hash identically regardless of YAML key order.
    let sorted = sort_keys(v);
    serde_json::to_string(&sorted).context("canonical json serialize failed")
}

fn sort_keys(v: &Value) -> Value {
    match v {
        Value::Object(map) => {
            let mut keys: Vec<_> = map.keys().cloned().collect();
            keys.sort();
            let mut new = serde_json::Map::new();
            for k in keys {
                new.insert(k.clone(), sort_keys(&map[&k]));
            }
            Value::Object(new)
        }
        Value::Array(arr) => Value::Array(arr.iter().map(sort_keys).collect()),
        _ => v.clone(),
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let out = hasher.finalize();
    hex::encode(out)
}

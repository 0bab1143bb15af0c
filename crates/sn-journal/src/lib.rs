use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Append-only operation journal. Writes JSON Lines (one event per line).
/// Optional hash chain: each event can include hash_prev + hash_self.
pub struct JournalWriter {
    path: PathBuf,
    hash_chain: bool,
    last_hash: Option<String>,
    /// Monotonic sequence counter, also the input to `event_id` derivation.
    /// Starts at 0 and increments on every `append` call.
    seq: u64,
}

impl JournalWriter {
    /// Creates the journal writer and ensures parent dirs exist.
    pub fn new(path: impl AsRef<Path>, hash_chain: bool) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("create_dir_all {:?}", parent))?;
        }

        Ok(Self {
            path,
            hash_chain,
            last_hash: None,
            seq: 0,
        })
    }

    /// Resume an existing journal: restore the chain tail and the number of
    /// events already written (the next event's seq = that count).
    pub fn with_chain_state(mut self, last_hash: Option<String>, seq: u64) -> Self {
        self.last_hash = last_hash;
        self.seq = seq;
        self
    }

    pub fn last_hash(&self) -> Option<String> {
        self.last_hash.clone()
    }

    /// Current sequence counter (equals the number of events appended so far).
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Append one event.
    pub fn append(
        &mut self,
        registry: &str,
        event_type: &str,
        payload: Value,
    ) -> Result<JournalEvent> {
        let ts_utc = Utc::now();
        // Event id derived deterministically from chain state + payload +
        // seq. No RNG, so replaying the same operations reproduces the same
        // ids.
        let event_id = derive_event_id(self.last_hash.as_deref(), &payload, self.seq)?;

        let mut ev = JournalEvent {
            event_id,
            seq: self.seq,
            registry: registry.to_string(),
            ts_utc,
            event_type: event_type.to_string(),
            payload,
            hash_prev: None,
            hash_self: None,
        };
        self.seq += 1;

        if self.hash_chain {
            let prev = self.last_hash.clone();
            ev.hash_prev = prev;

            let self_hash = compute_event_hash(&ev)?;
            ev.hash_self = Some(self_hash.clone());
            self.last_hash = Some(self_hash);
        }

        let line = canonical_json_line(&ev)?;
        append_line(&self.path, &line)?;

        Ok(ev)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEvent {
    pub event_id: Uuid,
    pub seq: u64,
    pub registry: String,
    pub ts_utc: DateTime<Utc>,
    pub event_type: String,
    pub payload: Value,
    pub hash_prev: Option<String>,
    pub hash_self: Option<String>,
}

/// Derive the event id from the chain tail, the canonical payload, and the
/// sequence number: the first 16 bytes of a SHA-256 over all three.
fn derive_event_id(last_hash: Option<&str>, payload: &Value, seq: u64) -> Result<Uuid> {
    let canonical_payload = canonical_json_line(payload)?;
    let mut hasher = Sha256::new();
    hasher.update(last_hash.unwrap_or("").as_bytes());
    hasher.update(b"\n");
    hasher.update(canonical_payload.as_bytes());
    hasher.update(b"\n");
    hasher.update(seq.to_be_bytes());
    let digest = hasher.finalize();

    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&digest[..16]);
    Ok(Uuid::from_bytes(bytes))
}

/// Write a single line to file (with trailing newline).
fn append_line(path: &Path, line: &str) -> Result<()> {
    let mut f = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open journal {:?}", path))?;
    f.write_all(line.as_bytes())
        .context("write journal line failed")?;
    f.write_all(b"\n").context("write newline failed")?;
    Ok(())
}

/// Canonicalize by sorting keys recursively and emitting compact JSON.
/// One event == one JSON line.
fn canonical_json_line<T: Serialize>(v: &T) -> Result<String> {
    let raw = serde_json::to_value(v).context("serialize journal event failed")?;
    let sorted = sort_keys(&raw);
    serde_json::to_string(&sorted).context("json stringify failed")
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

/// Hash chain is computed from canonical JSON of the event WITHOUT
/// hash_self (to avoid self-reference).
pub fn compute_event_hash(ev: &JournalEvent) -> Result<String> {
    let mut clone = ev.clone();
    clone.hash_self = None;

    let canonical = canonical_json_line(&clone)?;
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Verify the hash chain integrity of a journal file.
///
/// Returns Ok(VerifyResult) describing whether the chain is intact or where
/// it breaks.
pub fn verify_hash_chain(path: impl AsRef<Path>) -> Result<VerifyResult> {
    let content = fs::read_to_string(path.as_ref())
        .with_context(|| format!("read journal {:?}", path.as_ref()))?;
    verify_hash_chain_str(&content)
}

/// Verify the hash chain integrity of journal content (JSONL) in memory.
pub fn verify_hash_chain_str(content: &str) -> Result<VerifyResult> {
    let mut prev_hash: Option<String> = None;
    let mut line_count = 0usize;

    for (i, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let ev: JournalEvent = serde_json::from_str(trimmed)
            .with_context(|| format!("parse journal event at line {}", i + 1))?;

        line_count += 1;

        // 1. Verify hash_prev matches the previous event's hash_self
        if ev.hash_prev != prev_hash {
            return Ok(VerifyResult::Broken {
                line: i + 1,
                reason: format!(
                    "hash_prev mismatch: expected {:?}, got {:?}",
                    prev_hash, ev.hash_prev
                ),
            });
        }

        // 2. Verify hash_self is correct for this event's content
        if let Some(ref claimed_hash) = ev.hash_self {
            let recomputed = compute_event_hash(&ev)?;
            if *claimed_hash != recomputed {
                return Ok(VerifyResult::Broken {
                    line: i + 1,
                    reason: format!(
                        "hash_self mismatch: claimed {}, recomputed {}",
                        claimed_hash, recomputed
                    ),
                });
            }
        }

        prev_hash = ev.hash_self.clone();
    }

    Ok(VerifyResult::Valid { lines: line_count })
}

/// Read the chain tail of an existing journal file: (last hash, event
/// count). Missing files resume from an empty chain.
pub fn chain_tail(path: impl AsRef<Path>) -> Result<(Option<String>, u64)> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok((None, 0));
    }
    let content = fs::read_to_string(path).with_context(|| format!("read journal {:?}", path))?;
    let mut last_hash = None;
    let mut count = 0u64;
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let ev: JournalEvent = serde_json::from_str(trimmed).context("parse journal tail")?;
        last_hash = ev.hash_self;
        count += 1;
    }
    Ok((last_hash, count))
}

/// Result of hash chain verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyResult {
    /// The entire chain is valid.
    Valid { lines: usize },
    /// The chain is broken at the given line.
    Broken { line: usize, reason: String },
}

use anyhow::{bail, Result};
use tracing::info;

use crate::state::Workspace;

/// Build a fresh state file from layered config.
///
/// Guardrail: refuses to overwrite an existing state file unless --force is
/// provided; re-initializing discards every registered star and balance.
pub fn run(ws: &Workspace, config_paths: &[String], force: bool) -> Result<()> {
    if ws.exists() && !force {
        bail!(
            "state file {:?} already exists; pass --force to discard it",
            ws.state_path()
        );
    }

    let paths: Vec<&str> = config_paths.iter().map(|s| s.as_str()).collect();
    let loaded = sn_config::load_layered_yaml(&paths)?;
    let cfg = sn_config::RegistryConfig::from_config_json(&loaded.config_json)?;

    ws.write_initial(&cfg)?;
    info!(
        config_hash = %loaded.config_hash,
        registry = %cfg.name,
        genesis_accounts = cfg.genesis.len(),
        "state initialized"
    );
    println!("{}", serde_json::json!({ "config_hash": loaded.config_hash }));
    Ok(())
}

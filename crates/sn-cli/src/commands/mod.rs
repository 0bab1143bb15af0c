use anyhow::Result;
use serde_json::json;

use crate::state::Workspace;

pub mod account;
pub mod init;
pub mod journal;
pub mod star;

/// Print the registry's constant metadata.
pub fn meta(ws: &Workspace) -> Result<()> {
    let state = ws.load()?;
    println!(
        "{}",
        json!({
            "name": state.registry.name(),
            "symbol": state.registry.symbol(),
        })
    );
    Ok(())
}

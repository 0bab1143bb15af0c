use anyhow::{Context, Result};
use serde_json::json;
use tracing::info;

use sn_registry::{AccountId, Amount};

use crate::state::Workspace;

pub fn balance(ws: &Workspace, id: &str) -> Result<()> {
    let state = ws.load()?;
    let balance = state.accounts.balance(&AccountId::new(id))?;
    println!(
        "{}",
        json!({
            "id": id,
            "balance": balance.to_string(),
        })
    );
    Ok(())
}

/// Environment provisioning: open (if needed) and credit an account.
/// Not a registry operation, so it is not journaled.
pub fn fund(ws: &Workspace, id: &str, amount: &str) -> Result<()> {
    let amount: Amount = amount.parse().context("parse --amount")?;
    let mut state = ws.load()?;
    let account = AccountId::new(id);
    state.accounts.open(account.clone());
    state.accounts.deposit(&account, amount)?;
    ws.store(&state)?;
    info!(id, amount = %amount, "account funded");
    Ok(())
}

use anyhow::{bail, Result};
use serde_json::json;

use sn_journal::VerifyResult;

use crate::state::Workspace;

pub fn verify(ws: &Workspace) -> Result<()> {
    let path = ws.journal_path();
    if !path.exists() {
        println!("{}", json!({ "valid": true, "events": 0 }));
        return Ok(());
    }

    match sn_journal::verify_hash_chain(&path)? {
        VerifyResult::Valid { lines } => {
            println!("{}", json!({ "valid": true, "events": lines }));
            Ok(())
        }
        VerifyResult::Broken { line, reason } => {
            bail!("journal chain broken at line {line}: {reason}");
        }
    }
}

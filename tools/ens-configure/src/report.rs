//! JSON report of configured resolutions, updated in place across runs.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde_json::{json, Value};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use ens_resolution::WorkflowOutcome;

/// Upsert `outcome` under `resolutions[<name>]` in the report at `path`.
pub fn write_resolution_report(
    path: &Path,
    network: &str,
    rpc_url: &str,
    outcome: &WorkflowOutcome,
) -> Result<()> {
    let now = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string());

    let existing = if path.exists() {
        fs::read_to_string(path).with_context(|| format!("failed reading {}", path.display()))?
    } else {
        String::new()
    };

    let mut root: Value = if existing.trim().is_empty() {
        json!({})
    } else {
        serde_json::from_str(&existing)
            .with_context(|| format!("failed parsing JSON in {}", path.display()))?
    };

    if !root.is_object() {
        root = json!({});
    }

    root["network"] = json!(network);
    root["updated_at"] = json!(now);

    if root.get("resolutions").and_then(Value::as_object).is_none() {
        root["resolutions"] = json!({});
    }

    let summary = outcome.summary();
    let status = if outcome.is_completed() {
        "completed"
    } else {
        "aborted"
    };
    let entry = json!({
        "address": summary.address,
        "address_kind": summary.kind,
        "status": status,
        "transactions": summary.transactions,
        "rpc_url": rpc_url,
        "configured_at": now,
    });

    root["resolutions"][&summary.name] = entry;

    write_json_atomic(path, &root)
}

fn write_json_atomic(path: &Path, value: &Value) -> Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    if !parent.as_os_str().is_empty() && !parent.exists() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed creating directory {}", parent.display()))?;
    }

    let serialised = serde_json::to_string_pretty(value).context("failed serialising report JSON")?;
    let tmp_path = tmp_path_for(path);
    fs::write(&tmp_path, serialised.as_bytes())
        .with_context(|| format!("failed writing temp file {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("failed replacing {}", path.display()))?;
    Ok(())
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_os_string();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, B256};
    use ens_resolution::{AddressKind, ResolutionSummary, ResolutionTarget, StepKind};

    fn outcome(name: &str, completed: bool) -> WorkflowOutcome {
        let mut summary = ResolutionSummary::new(&ResolutionTarget {
            name: name.to_string(),
            address: Address::repeat_byte(0xca),
            kind: AddressKind::Eoa,
        });
        summary.record(StepKind::SetResolver, B256::with_last_byte(1));
        if completed {
            WorkflowOutcome::Completed(summary)
        } else {
            WorkflowOutcome::Aborted(summary)
        }
    }

    #[test]
    fn test_report_keeps_previous_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("ens.json");

        write_resolution_report(&path, "devnet", "http://localhost:8545", &outcome("a.eth", true))
            .unwrap();
        write_resolution_report(&path, "devnet", "http://localhost:8545", &outcome("b.eth", false))
            .unwrap();

        let root: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(root["network"], "devnet");
        assert_eq!(root["resolutions"]["a.eth"]["status"], "completed");
        assert_eq!(root["resolutions"]["b.eth"]["status"], "aborted");
        assert_eq!(root["resolutions"]["b.eth"]["address_kind"], "EOA");
        assert!(root["resolutions"]["a.eth"]["transactions"]["set_resolver"].is_string());
        assert!(!tmp_path_for(&path).exists());
    }
}

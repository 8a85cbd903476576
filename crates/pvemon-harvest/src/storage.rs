//! Storage backend facts: the configured backend list from `pvesh`, plus
//! capacity figures for the primary local backend probed with `df`.

use crate::{round2, truthy, CommandRunner};
use pvemon_common::facts::Facts;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

const STORAGE_LIST_CMD: &str = "pvesh get /storage --output-format json 2>/dev/null";

/// Mount path backing the default "local" storage.
pub const LOCAL_MOUNT_ROOT: &str = "/var/lib/vz";

/// Backend types that live on local block devices or filesystems and are
/// therefore worth probing with `df`.
const LOCAL_TYPES: [&str; 5] = ["dir", "lvm", "lvmthin", "zfspool", "zfs"];

const KIB_PER_GIB: f64 = (1024u64 * 1024) as f64;

/// Harvests the storage backend listing, augmenting local backends with
/// capacity figures when the local mount root exists.
pub async fn harvest(runner: &dyn CommandRunner) -> Facts {
    harvest_with_root(runner, Path::new(LOCAL_MOUNT_ROOT)).await
}

/// Same as [`harvest`] with an explicit mount root, for tests.
pub async fn harvest_with_root(runner: &dyn CommandRunner, mount_root: &Path) -> Facts {
    let mut facts = Facts::new();
    facts.set("storage.names", Vec::<String>::new());

    let Some(payload) = runner.run(STORAGE_LIST_CMD).await else {
        return facts;
    };
    let entries: Vec<StorageEntry> = match serde_json::from_str(&payload) {
        Ok(entries) => entries,
        Err(error) => {
            tracing::debug!(%error, "storage listing not parseable");
            return facts;
        }
    };

    let mut names = Vec::new();
    for entry in entries {
        let name = entry.storage;
        let kind = entry.kind.unwrap_or_else(|| "unknown".to_string());

        facts.set(format!("storage.{name}.type"), kind.clone());
        facts.set(format!("storage.{name}.content"), entry.content.join(", "));
        facts.set(format!("storage.{name}.enabled"), flag(entry.enabled));
        facts.set(format!("storage.{name}.shared"), flag(entry.shared));

        // Only the primary local backend gets a capacity probe; pvesh status
        // queries are unreliable for it, df on the mount root is not.
        if LOCAL_TYPES.contains(&kind.as_str())
            && name.to_lowercase().contains("local")
            && mount_root.exists()
        {
            if let Some(df_line) = runner.run(&df_command(mount_root)).await {
                record_capacity(&df_line, &name, &mut facts);
            }
        }

        names.push(name);
    }
    facts.set("storage.names", names);

    facts
}

#[derive(Debug, Deserialize)]
struct StorageEntry {
    storage: String,
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    content: Vec<String>,
    enabled: Option<Value>,
    shared: Option<Value>,
}

fn flag(value: Option<Value>) -> i64 {
    value.as_ref().map(truthy).unwrap_or(false) as i64
}

fn df_command(mount_root: &Path) -> String {
    format!("df -k {} | tail -1", mount_root.display())
}

/// Parses the last line of `df -k` output into capacity facts.
///
/// Expects the usual filesystem/total/used/available/percent columns; any
/// other shape is skipped silently and the backend simply carries no
/// capacity facts.
pub(crate) fn record_capacity(df_line: &str, name: &str, facts: &mut Facts) {
    let parts: Vec<&str> = df_line.split_whitespace().collect();
    if parts.len() < 5 {
        return;
    }
    let (total_kb, used_kb, available_kb) = match (
        parts[1].parse::<u64>(),
        parts[2].parse::<u64>(),
        parts[3].parse::<u64>(),
    ) {
        (Ok(total), Ok(used), Ok(available)) => (total, used, available),
        _ => return,
    };

    facts.set(
        format!("storage.{name}.total_gb"),
        round2(total_kb as f64 / KIB_PER_GIB),
    );
    facts.set(
        format!("storage.{name}.used_gb"),
        round2(used_kb as f64 / KIB_PER_GIB),
    );
    facts.set(
        format!("storage.{name}.available_gb"),
        round2(available_kb as f64 / KIB_PER_GIB),
    );
    if total_kb > 0 {
        facts.set(
            format!("storage.{name}.used_percent"),
            round2(used_kb as f64 / total_kb as f64 * 100.0),
        );
    }
}

//! Ceph subsystem facts: health token, OSD counts, pool and filesystem
//! listings. Everything is gated on the Ceph config file existing.

use crate::CommandRunner;
use pvemon_common::facts::Facts;
use serde::Deserialize;
use std::path::Path;

/// Presence of this file is the sole installation signal; when it is absent
/// no Ceph command is invoked at all.
pub const CEPH_CONF: &str = "/etc/ceph/ceph.conf";

const HEALTH_CMD: &str = "ceph health --format json 2>/dev/null || ceph health 2>/dev/null";
const OSD_STAT_CMD: &str = "ceph osd stat 2>/dev/null || echo '0 osds: 0 up, 0 in'";
const POOL_LS_CMD: &str = "ceph osd pool ls 2>/dev/null";
const FS_LS_CMD: &str = "ceph fs ls 2>/dev/null";

pub fn is_installed() -> bool {
    Path::new(CEPH_CONF).exists()
}

/// Harvests Ceph facts, short-circuiting to zeroed defaults when the
/// subsystem is not installed.
pub async fn harvest(runner: &dyn CommandRunner) -> Facts {
    harvest_gated(runner, is_installed()).await
}

/// Same as [`harvest`] with the installation gate supplied by the caller,
/// for tests.
pub async fn harvest_gated(runner: &dyn CommandRunner, installed: bool) -> Facts {
    let mut facts = Facts::new();
    facts.set("ceph.installed", installed);
    facts.set("ceph.health", "NOT_INSTALLED");
    facts.set("ceph.osd_total", 0i64);
    facts.set("ceph.osd_up", 0i64);
    facts.set("ceph.osd_down", 0i64);
    if !installed {
        return facts;
    }

    facts.set("ceph.health", "UNKNOWN");
    if let Some(payload) = runner.run(HEALTH_CMD).await {
        facts.set("ceph.health", parse_health(&payload));
    }

    if let Some(line) = runner.run(OSD_STAT_CMD).await {
        if let Some((total, up)) = parse_osd_stat(&line) {
            facts.set("ceph.osd_total", total);
            facts.set("ceph.osd_up", up);
            facts.set("ceph.osd_down", total - up);
        }
    }

    if let Some(listing) = runner.run(POOL_LS_CMD).await {
        let pools = non_empty_lines(&listing);
        facts.set("ceph.pools_total", pools.len() as i64);
        facts.set("ceph.pools", pools);
    }

    if let Some(listing) = runner.run(FS_LS_CMD).await {
        // "No filesystem is configured" means none; skip the facts entirely
        // so the CephFS module is suppressed.
        if !listing.contains("No filesystem") {
            let filesystems = non_empty_lines(&listing);
            facts.set("ceph.fs_total", filesystems.len() as i64);
            facts.set("ceph.fs", filesystems);
        }
    }

    facts
}

#[derive(Debug, Deserialize)]
struct HealthSummary {
    status: Option<String>,
}

/// Extracts the health token, preferring the JSON `status` field and falling
/// back to the first whitespace-delimited token of plain-text output.
pub(crate) fn parse_health(payload: &str) -> String {
    if let Ok(summary) = serde_json::from_str::<HealthSummary>(payload) {
        return summary.status.unwrap_or_else(|| "UNKNOWN".to_string());
    }
    payload
        .split_whitespace()
        .next()
        .unwrap_or("UNKNOWN")
        .to_string()
}

/// Parses `"<total> osds: <up> up, <in> in"` into (total, up).
pub(crate) fn parse_osd_stat(line: &str) -> Option<(i64, i64)> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 5 {
        return None;
    }
    let total = parts[0].parse::<i64>().ok()?;
    let up = parts[2].trim_end_matches(',').parse::<i64>().ok()?;
    Some((total, up))
}

fn non_empty_lines(listing: &str) -> Vec<String> {
    listing
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

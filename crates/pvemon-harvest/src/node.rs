//! Node-level facts: identity, memory usage, guest inventories, and cluster
//! quorum/membership, all read from `pvesh`.

use crate::{round2, truthy, CommandRunner};
use pvemon_common::facts::Facts;
use serde::Deserialize;
use serde_json::Value;

const NODE_STATUS_CMD: &str = "pvesh get /nodes/localhost/status --output-format json 2>/dev/null";
const VM_LIST_CMD: &str = "pvesh get /nodes/localhost/qemu --output-format json 2>/dev/null";
const CT_LIST_CMD: &str = "pvesh get /nodes/localhost/lxc --output-format json 2>/dev/null";
const CLUSTER_STATUS_CMD: &str = "pvesh get /cluster/status --output-format json 2>/dev/null";

const GIB: f64 = (1024u64 * 1024 * 1024) as f64;

/// Harvests node identity, memory, VM/container counts and cluster state.
///
/// The four sub-queries are independent: a missing tool or malformed payload
/// degrades only that sub-query's facts.
pub async fn harvest(runner: &dyn CommandRunner) -> Facts {
    let mut facts = Facts::new();

    if let Some(payload) = runner.run(NODE_STATUS_CMD).await {
        record_node_status(&payload, &mut facts);
    }
    if let Some(payload) = runner.run(VM_LIST_CMD).await {
        record_guest_counts(&payload, "vm", &mut facts);
    }
    if let Some(payload) = runner.run(CT_LIST_CMD).await {
        record_guest_counts(&payload, "ct", &mut facts);
    }
    if let Some(payload) = runner.run(CLUSTER_STATUS_CMD).await {
        record_cluster_status(&payload, &mut facts);
    }

    facts
}

#[derive(Debug, Deserialize)]
struct NodeStatus {
    node: Option<String>,
    status: Option<String>,
    #[serde(default)]
    memory: MemoryUsage,
}

#[derive(Debug, Default, Deserialize)]
struct MemoryUsage {
    #[serde(default)]
    total: u64,
    #[serde(default)]
    used: u64,
}

/// Records name, online state and memory figures from the node status JSON.
///
/// On parse failure the node is reported as "unknown"/"unknown" and the
/// memory facts are omitted entirely, which suppresses the memory module.
pub(crate) fn record_node_status(payload: &str, facts: &mut Facts) {
    let parsed: NodeStatus = match serde_json::from_str(payload) {
        Ok(parsed) => parsed,
        Err(error) => {
            tracing::debug!(%error, "node status payload not parseable");
            facts.set("node.name", "unknown");
            facts.set("node.status", "unknown");
            return;
        }
    };

    facts.set(
        "node.name",
        parsed.node.unwrap_or_else(|| "unknown".to_string()),
    );
    let status = if parsed.status.as_deref() == Some("online") {
        "online"
    } else {
        "offline"
    };
    facts.set("node.status", status);

    // Percentage is computed from the already-rounded GiB figures so the
    // reported values stay mutually consistent.
    let total_gb = round2(parsed.memory.total as f64 / GIB);
    let used_gb = round2(parsed.memory.used as f64 / GIB);
    facts.set("node.memory_total_gb", total_gb);
    facts.set("node.memory_used_gb", used_gb);
    let used_percent = if total_gb > 0.0 {
        round2(used_gb / total_gb * 100.0)
    } else {
        0.0
    };
    facts.set("node.memory_used_percent", used_percent);
}

#[derive(Debug, Deserialize)]
struct Guest {
    status: Option<String>,
}

/// Counts total/running/stopped guests from a VM or container listing.
/// A malformed listing counts as zero guests.
pub(crate) fn record_guest_counts(payload: &str, prefix: &str, facts: &mut Facts) {
    let guests: Vec<Guest> = serde_json::from_str(payload).unwrap_or_else(|error| {
        tracing::debug!(%error, prefix, "guest listing not parseable");
        Vec::new()
    });

    let running = guests
        .iter()
        .filter(|g| g.status.as_deref() == Some("running"))
        .count();
    let stopped = guests
        .iter()
        .filter(|g| g.status.as_deref() == Some("stopped"))
        .count();

    facts.set(format!("{prefix}.total"), guests.len() as i64);
    facts.set(format!("{prefix}.running"), running as i64);
    facts.set(format!("{prefix}.stopped"), stopped as i64);
}

#[derive(Debug, Deserialize)]
struct ClusterEntry {
    #[serde(rename = "type")]
    kind: Option<String>,
    quorate: Option<Value>,
    online: Option<Value>,
}

/// Records quorum state and node membership counts from the cluster status
/// listing.
///
/// A node entry without an `online` flag counts towards the total and is
/// excluded from the offline count, but only entries with an explicitly
/// truthy flag count as online. The asymmetry is inherited behavior the
/// monitoring side depends on; do not "fix" it.
pub(crate) fn record_cluster_status(payload: &str, facts: &mut Facts) {
    let entries: Vec<ClusterEntry> = match serde_json::from_str(payload) {
        Ok(entries) => entries,
        Err(error) => {
            tracing::debug!(%error, "cluster status payload not parseable");
            facts.set("cluster.quorate", false);
            facts.set("cluster.nodes_total", 0i64);
            facts.set("cluster.nodes_online", 0i64);
            facts.set("cluster.nodes_offline", 0i64);
            return;
        }
    };

    let quorate = entries
        .iter()
        .find(|e| e.kind.as_deref() == Some("quorum"))
        .and_then(|e| e.quorate.as_ref())
        .map(truthy)
        .unwrap_or(false);

    let nodes: Vec<&ClusterEntry> = entries
        .iter()
        .filter(|e| e.kind.as_deref() == Some("node"))
        .collect();
    let online = nodes
        .iter()
        .filter(|n| n.online.as_ref().map(truthy).unwrap_or(false))
        .count();
    let offline = nodes
        .iter()
        .filter(|n| n.online.as_ref().map(|v| !truthy(v)).unwrap_or(false))
        .count();

    facts.set("cluster.quorate", quorate);
    facts.set("cluster.nodes_total", nodes.len() as i64);
    facts.set("cluster.nodes_online", online as i64);
    facts.set("cluster.nodes_offline", offline as i64);
}

//! End-to-end pipeline scenarios: canned command output through the
//! harvesters, the assembler, and the XML serializer.

use async_trait::async_trait;
use chrono::{Local, TimeZone};
use pvemon_common::facts::Facts;
use pvemon_harvest::{ceph, node, services, storage, CommandRunner};
use pvemon_report::{assemble, render};
use std::collections::HashMap;

struct CannedRunner {
    responses: HashMap<&'static str, String>,
}

impl CannedRunner {
    fn new() -> Self {
        Self {
            responses: HashMap::new(),
        }
    }

    fn on(mut self, needle: &'static str, output: &str) -> Self {
        self.responses.insert(needle, output.to_string());
        self
    }
}

#[async_trait]
impl CommandRunner for CannedRunner {
    async fn run(&self, command: &str) -> Option<String> {
        self.responses
            .iter()
            .find(|(needle, _)| command.contains(*needle))
            .map(|(_, output)| output.clone())
    }
}

/// Every external tool is missing or hangs.
struct DeadHost;

#[async_trait]
impl CommandRunner for DeadHost {
    async fn run(&self, _command: &str) -> Option<String> {
        None
    }
}

fn render_report(node: &Facts, storage: &Facts, ceph: &Facts, services: &Facts) -> String {
    let modules = assemble(node, storage, ceph, services);
    let when = Local.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
    render(&modules, when).unwrap()
}

fn module_count(report: &str) -> usize {
    report.matches("<module>\n").count()
}

#[tokio::test]
async fn scenario_healthy_node_without_ceph() {
    let runner = CannedRunner::new()
        .on(
            "/nodes/localhost/status",
            r#"{"node":"pve1","status":"online","memory":{"total":17179869184,"used":8589934592}}"#,
        )
        .on("/nodes/localhost/qemu", r#"[{"status":"running"},{"status":"stopped"}]"#)
        .on("/nodes/localhost/lxc", "[]")
        .on(
            "/cluster/status",
            r#"[{"type":"quorum","quorate":1},{"type":"node","name":"pve1","online":1}]"#,
        )
        .on(
            "pvesh get /storage",
            r#"[{"storage":"local","type":"dir","content":["iso"],"enabled":1,"shared":0}]"#,
        )
        .on("is-active pve-cluster", "active")
        .on("is-active pvedaemon", "active")
        .on("is-active pveproxy", "active")
        .on("is-active pvestatd", "active");

    let node_facts = node::harvest(&runner).await;
    let storage_facts =
        storage::harvest_with_root(&runner, std::path::Path::new("/nonexistent")).await;
    let ceph_facts = ceph::harvest_gated(&runner, false).await;
    let service_facts = services::harvest(&runner, false).await;

    let report = render_report(&node_facts, &storage_facts, &ceph_facts, &service_facts);

    // Node, storage and service modules are present; no Ceph block at all.
    assert!(report.contains("<name><![CDATA[Node_Name]]></name>"));
    assert!(report.contains("<![CDATA[pve1]]>"));
    assert!(report.contains("<![CDATA[online]]>"));
    assert!(report.contains("<name><![CDATA[Storage_local_Info]]></name>"));
    assert!(report.contains("<name><![CDATA[Service_pve-cluster]]></name>"));
    assert!(!report.contains("Ceph_Status"));
    assert!(!report.contains("Service_ceph"));

    // Memory percentage renders with two-decimal rounding semantics.
    let memory = report
        .split("<module>\n")
        .find(|block| block.contains("Memory_Used_Percent"))
        .unwrap();
    assert!(memory.contains("<data><![CDATA[50.0]]></data>"));
    assert!(memory.contains("<max_warning>85</max_warning>"));
    assert!(memory.contains("<max_critical>95</max_critical>"));
}

#[tokio::test]
async fn scenario_osd_down_counts_and_thresholds() {
    let runner = CannedRunner::new()
        .on("ceph health", "HEALTH_WARN 2 osds down")
        .on("ceph osd stat", "6 osds: 4 up, 4 in")
        .on("ceph osd pool ls", "rbd")
        .on("ceph fs ls", "No filesystem is configured");

    let ceph_facts = ceph::harvest_gated(&runner, true).await;
    let empty = Facts::new();
    let report = render_report(&empty, &empty, &ceph_facts, &empty);

    let osd_total = report
        .split("<module>\n")
        .find(|block| block.contains("Ceph_OSD_Total"))
        .unwrap();
    assert!(osd_total.contains("<data><![CDATA[6]]></data>"));

    let osd_down = report
        .split("<module>\n")
        .find(|block| block.contains("Ceph_OSD_Down"))
        .unwrap();
    assert!(osd_down.contains("<data><![CDATA[2]]></data>"));
    // Thresholds are emitted because the block is, not because OSDs are down.
    assert!(osd_down.contains("<max_warning>0</max_warning>"));
    assert!(osd_down.contains("<max_critical>0</max_critical>"));

    assert!(report.contains("Ceph_Pools_Total"));
    assert!(!report.contains("CephFS_Total"));
}

#[tokio::test]
async fn scenario_dead_host_still_produces_complete_report() {
    let node_facts = node::harvest(&DeadHost).await;
    let storage_facts = storage::harvest(&DeadHost).await;
    let ceph_facts = ceph::harvest_gated(&DeadHost, false).await;
    let service_facts = services::harvest(&DeadHost, false).await;

    let report = render_report(&node_facts, &storage_facts, &ceph_facts, &service_facts);

    // Node block (without memory) plus four platform services.
    assert_eq!(module_count(&report), 16);
    assert!(report.starts_with("# Agent: Proxmox_Ceph_Monitor\n# Version: 1.1\n# Date: "));
    assert!(report.contains("<name><![CDATA[Node_Name]]></name>"));
    assert!(report.contains("<![CDATA[unknown]]>"));
    let vms = report
        .split("<module>\n")
        .find(|block| block.contains("VMs_Total"))
        .unwrap();
    assert!(vms.contains("<data><![CDATA[0]]></data>"));
    assert!(!report.contains("Memory_Used_Percent"));
    assert!(!report.contains("Ceph_Status"));

    // Every opened block is closed; the document stays well-formed.
    assert_eq!(
        report.matches("<module>\n").count(),
        report.matches("</module>\n").count()
    );
}

#[tokio::test]
async fn scenario_ceph_installed_with_failing_commands_keeps_block_at_defaults() {
    let ceph_facts = ceph::harvest_gated(&DeadHost, true).await;
    let service_facts = services::harvest(&DeadHost, true).await;
    let empty = Facts::new();

    let report = render_report(&empty, &empty, &ceph_facts, &service_facts);

    let status = report
        .split("<module>\n")
        .find(|block| block.contains("Ceph_Status"))
        .unwrap();
    assert!(status.contains("<data><![CDATA[UNKNOWN]]></data>"));
    let inactive = report
        .split("<module>\n")
        .find(|block| block.contains("Service_ceph-mon"))
        .unwrap();
    assert!(inactive.contains("<data><![CDATA[inactive]]></data>"));
    assert!(!report.contains("Ceph_Pools_Total"));
}

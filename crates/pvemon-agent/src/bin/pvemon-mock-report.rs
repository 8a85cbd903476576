//! Renders a sample agent report from canned facts, for inspecting the XML
//! without a Proxmox host. Usage: `pvemon-mock-report [scenario]`.

use anyhow::{bail, Result};
use chrono::Local;
use pvemon_common::catalog::{CEPH_SERVICES, PLATFORM_SERVICES};
use pvemon_common::facts::Facts;
use std::env;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Scenario {
    /// Quorate three-node cluster, healthy Ceph, everything active.
    Healthy,
    /// One cluster node offline, Ceph warning with OSDs down.
    Degraded,
    /// Standalone node without Ceph, minimal tooling.
    Bare,
}

impl Scenario {
    fn parse(value: &str) -> Result<Self> {
        match value {
            "healthy" => Ok(Self::Healthy),
            "degraded" => Ok(Self::Degraded),
            "bare" => Ok(Self::Bare),
            _ => bail!("unknown scenario: {value} (expected one of: healthy, degraded, bare)"),
        }
    }
}

fn node_facts(scenario: Scenario) -> Facts {
    let mut facts = Facts::new();
    facts.set("node.name", "pve1");
    facts.set("node.status", "online");
    match scenario {
        Scenario::Healthy => {
            facts.set("node.memory_used_percent", 42.5f64);
            facts.set("vm.total", 8i64);
            facts.set("vm.running", 7i64);
            facts.set("vm.stopped", 1i64);
            facts.set("ct.total", 3i64);
            facts.set("ct.running", 3i64);
            facts.set("ct.stopped", 0i64);
            facts.set("cluster.quorate", true);
            facts.set("cluster.nodes_total", 3i64);
            facts.set("cluster.nodes_online", 3i64);
            facts.set("cluster.nodes_offline", 0i64);
        }
        Scenario::Degraded => {
            facts.set("node.memory_used_percent", 91.3f64);
            facts.set("vm.total", 8i64);
            facts.set("vm.running", 5i64);
            facts.set("vm.stopped", 3i64);
            facts.set("ct.total", 3i64);
            facts.set("ct.running", 1i64);
            facts.set("ct.stopped", 2i64);
            facts.set("cluster.quorate", true);
            facts.set("cluster.nodes_total", 3i64);
            facts.set("cluster.nodes_online", 2i64);
            facts.set("cluster.nodes_offline", 1i64);
        }
        Scenario::Bare => {
            facts.set("vm.total", 2i64);
            facts.set("vm.running", 2i64);
            facts.set("vm.stopped", 0i64);
            facts.set("ct.total", 0i64);
            facts.set("ct.running", 0i64);
            facts.set("ct.stopped", 0i64);
        }
    }
    facts
}

fn storage_facts(scenario: Scenario) -> Facts {
    let mut facts = Facts::new();
    let mut names = vec!["local".to_string()];
    facts.set("storage.local.type", "dir");
    facts.set("storage.local.content", "iso, vztmpl, backup");
    facts.set("storage.local.enabled", 1i64);
    facts.set("storage.local.shared", 0i64);
    facts.set("storage.local.total_gb", 97.66f64);
    facts.set("storage.local.used_gb", 48.83f64);
    facts.set("storage.local.available_gb", 48.83f64);
    facts.set(
        "storage.local.used_percent",
        if scenario == Scenario::Degraded { 93.1 } else { 50.0 },
    );
    if scenario != Scenario::Bare {
        names.push("ceph-rbd".to_string());
        facts.set("storage.ceph-rbd.type", "rbd");
        facts.set("storage.ceph-rbd.content", "images");
        facts.set("storage.ceph-rbd.enabled", 1i64);
        facts.set("storage.ceph-rbd.shared", 1i64);
    }
    facts.set("storage.names", names);
    facts
}

fn ceph_facts(scenario: Scenario) -> Facts {
    let mut facts = Facts::new();
    facts.set("ceph.installed", scenario != Scenario::Bare);
    facts.set("ceph.osd_total", 0i64);
    facts.set("ceph.osd_up", 0i64);
    facts.set("ceph.osd_down", 0i64);
    match scenario {
        Scenario::Healthy => {
            facts.set("ceph.health", "HEALTH_OK");
            facts.set("ceph.osd_total", 6i64);
            facts.set("ceph.osd_up", 6i64);
            facts.set("ceph.pools_total", 3i64);
            facts.set("ceph.fs_total", 1i64);
        }
        Scenario::Degraded => {
            facts.set("ceph.health", "HEALTH_WARN");
            facts.set("ceph.osd_total", 6i64);
            facts.set("ceph.osd_up", 4i64);
            facts.set("ceph.osd_down", 2i64);
            facts.set("ceph.pools_total", 3i64);
        }
        Scenario::Bare => {
            facts.set("ceph.health", "NOT_INSTALLED");
        }
    }
    facts
}

fn service_facts(scenario: Scenario) -> Facts {
    let mut facts = Facts::new();
    for service in PLATFORM_SERVICES {
        let state = match scenario {
            Scenario::Degraded if service == "pvestatd" => "unknown",
            _ => "active",
        };
        facts.set(format!("service.{service}"), state);
    }
    if scenario != Scenario::Bare {
        for service in CEPH_SERVICES {
            let state = match scenario {
                Scenario::Degraded if service == "ceph-osd" => "inactive",
                _ => "active",
            };
            facts.set(format!("service.{service}"), state);
        }
    }
    facts
}

fn main() -> Result<()> {
    let scenario = match env::args().nth(1) {
        Some(arg) => Scenario::parse(&arg)?,
        None => Scenario::Healthy,
    };

    let modules = pvemon_report::assemble(
        &node_facts(scenario),
        &storage_facts(scenario),
        &ceph_facts(scenario),
        &service_facts(scenario),
    );
    let report = pvemon_report::render(&modules, Local::now())?;
    print!("{report}");
    Ok(())
}

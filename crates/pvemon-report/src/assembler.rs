//! Maps harvested facts onto the fixed, ordered module list.
//!
//! Assembly is total: every module field has a documented default, so a fact
//! mapping degraded by missing tooling still yields a complete report. The
//! emission order is significant and must not change: node identity/status,
//! memory, VM counts, container counts, cluster state, storage backends,
//! platform services, then the Ceph block when that subsystem is installed.

use crate::module::{Module, ModuleType, ModuleValue};
use pvemon_common::catalog::{service_key, CEPH_SERVICES, PLATFORM_SERVICES};
use pvemon_common::facts::Facts;

const GROUP_NODE: &str = "Proxmox Node";
const GROUP_VMS: &str = "Proxmox VMs";
const GROUP_CONTAINERS: &str = "Proxmox Containers";
const GROUP_CLUSTER: &str = "Proxmox Cluster";
const GROUP_STORAGE: &str = "Proxmox Storage";
const GROUP_SERVICES: &str = "Proxmox Services";
const GROUP_CEPH: &str = "Ceph";
const GROUP_CEPH_OSD: &str = "Ceph OSD";
const GROUP_CEPH_POOLS: &str = "Ceph Pools";
const GROUP_CEPHFS: &str = "CephFS";
const GROUP_CEPH_SERVICES: &str = "Ceph Services";

/// Builds the ordered module list from the four harvester fact mappings.
pub fn assemble(node: &Facts, storage: &Facts, ceph: &Facts, services: &Facts) -> Vec<Module> {
    let mut modules = Vec::new();
    push_node_modules(node, &mut modules);
    push_storage_modules(storage, &mut modules);
    push_platform_service_modules(services, &mut modules);
    push_ceph_modules(ceph, services, &mut modules);
    modules
}

fn push_node_modules(node: &Facts, modules: &mut Vec<Module>) {
    modules.push(
        Module::new(
            "Node_Name",
            ModuleType::GenericDataString,
            "Proxmox node name",
            node.str_or("node.name", "unknown"),
        )
        .group(GROUP_NODE),
    );
    modules.push(
        Module::new(
            "Node_Status",
            ModuleType::GenericDataString,
            "Proxmox node status",
            node.str_or("node.status", "unknown"),
        )
        .str_thresholds("!online", "!online")
        .group(GROUP_NODE),
    );

    // Memory is reported only when the status query parsed; a degraded node
    // query must not produce a misleading 0% gauge.
    if let Some(used_percent) = node.float("node.memory_used_percent") {
        modules.push(
            Module::new(
                "Memory_Used_Percent",
                ModuleType::GenericData,
                "Percent of node memory in use",
                ModuleValue::Float(used_percent),
            )
            .max_warning(85.0)
            .max_critical(95.0)
            .group(GROUP_NODE),
        );
    }

    modules.push(
        Module::new(
            "VMs_Total",
            ModuleType::GenericData,
            "Total number of VMs on this node",
            node.int_or("vm.total", 0),
        )
        .group(GROUP_VMS),
    );
    modules.push(
        Module::new(
            "VMs_Running",
            ModuleType::GenericData,
            "Number of running VMs on this node",
            node.int_or("vm.running", 0),
        )
        .group(GROUP_VMS),
    );
    modules.push(
        Module::new(
            "VMs_Stopped",
            ModuleType::GenericData,
            "Number of stopped VMs on this node",
            node.int_or("vm.stopped", 0),
        )
        .group(GROUP_VMS),
    );

    modules.push(
        Module::new(
            "Containers_Total",
            ModuleType::GenericData,
            "Total number of containers on this node",
            node.int_or("ct.total", 0),
        )
        .group(GROUP_CONTAINERS),
    );
    modules.push(
        Module::new(
            "Containers_Running",
            ModuleType::GenericData,
            "Number of running containers on this node",
            node.int_or("ct.running", 0),
        )
        .group(GROUP_CONTAINERS),
    );
    modules.push(
        Module::new(
            "Containers_Stopped",
            ModuleType::GenericData,
            "Number of stopped containers on this node",
            node.int_or("ct.stopped", 0),
        )
        .group(GROUP_CONTAINERS),
    );

    modules.push(
        Module::new(
            "Cluster_Quorate",
            ModuleType::GenericProc,
            "Cluster quorum state (1=quorate, 0=no quorum)",
            node.bool_or("cluster.quorate", false) as i64,
        )
        .group(GROUP_CLUSTER),
    );
    modules.push(
        Module::new(
            "Cluster_Nodes_Total",
            ModuleType::GenericData,
            "Total number of nodes in the cluster",
            node.int_or("cluster.nodes_total", 0),
        )
        .group(GROUP_CLUSTER),
    );
    modules.push(
        Module::new(
            "Cluster_Nodes_Online",
            ModuleType::GenericData,
            "Number of online nodes in the cluster",
            node.int_or("cluster.nodes_online", 0),
        )
        .group(GROUP_CLUSTER),
    );
    modules.push(
        Module::new(
            "Cluster_Nodes_Offline",
            ModuleType::GenericData,
            "Number of offline nodes in the cluster",
            node.int_or("cluster.nodes_offline", 0),
        )
        .max_warning(0.0)
        .max_critical(1.0)
        .group(GROUP_CLUSTER),
    );
}

fn push_storage_modules(storage: &Facts, modules: &mut Vec<Module>) {
    let Some(names) = storage.list("storage.names") else {
        return;
    };

    for name in names {
        let kind = storage.str_or(&format!("storage.{name}.type"), "unknown");
        let content = storage.str_or(&format!("storage.{name}.content"), "");
        let enabled = storage.int_or(&format!("storage.{name}.enabled"), 0);
        let shared = storage.int_or(&format!("storage.{name}.shared"), 0);

        modules.push(
            Module::new(
                format!("Storage_{name}_Info"),
                ModuleType::GenericDataString,
                format!("Configuration of storage backend {name}"),
                format!("type={kind} content={content} enabled={enabled} shared={shared}"),
            )
            .group(GROUP_STORAGE),
        );

        if let Some(used_percent) = storage.float(&format!("storage.{name}.used_percent")) {
            modules.push(
                Module::new(
                    format!("Storage_{name}_Used_Percent"),
                    ModuleType::GenericData,
                    format!("Percent of storage {name} in use"),
                    ModuleValue::Float(used_percent),
                )
                .max_warning(85.0)
                .max_critical(95.0)
                .group(GROUP_STORAGE),
            );
        }
    }
}

fn push_platform_service_modules(services: &Facts, modules: &mut Vec<Module>) {
    for service in PLATFORM_SERVICES {
        modules.push(
            Module::new(
                format!("Service_{service}"),
                ModuleType::GenericDataString,
                format!("Activation state of the {service} service"),
                services.str_or(&service_key(service), "unknown"),
            )
            .str_thresholds("!active", "!active")
            .group(GROUP_SERVICES),
        );
    }
}

fn push_ceph_modules(ceph: &Facts, services: &Facts, modules: &mut Vec<Module>) {
    if !ceph.bool_or("ceph.installed", false) {
        return;
    }

    modules.push(
        Module::new(
            "Ceph_Status",
            ModuleType::GenericDataString,
            "Overall Ceph health status",
            ceph.str_or("ceph.health", "UNKNOWN"),
        )
        .str_thresholds("HEALTH_WARN", "HEALTH_ERR")
        .group(GROUP_CEPH),
    );

    modules.push(
        Module::new(
            "Ceph_OSD_Total",
            ModuleType::GenericData,
            "Total number of Ceph OSDs",
            ceph.int_or("ceph.osd_total", 0),
        )
        .group(GROUP_CEPH_OSD),
    );
    modules.push(
        Module::new(
            "Ceph_OSD_Up",
            ModuleType::GenericData,
            "Number of Ceph OSDs up",
            ceph.int_or("ceph.osd_up", 0),
        )
        .group(GROUP_CEPH_OSD),
    );
    // The down-count thresholds are unconditional: any OSD down warrants
    // attention, so the tags ride along even when the count is zero.
    modules.push(
        Module::new(
            "Ceph_OSD_Down",
            ModuleType::GenericData,
            "Number of Ceph OSDs down",
            ceph.int_or("ceph.osd_down", 0),
        )
        .max_warning(0.0)
        .max_critical(0.0)
        .group(GROUP_CEPH_OSD),
    );

    if ceph.contains("ceph.pools_total") {
        modules.push(
            Module::new(
                "Ceph_Pools_Total",
                ModuleType::GenericData,
                "Total number of Ceph pools",
                ceph.int_or("ceph.pools_total", 0),
            )
            .group(GROUP_CEPH_POOLS),
        );
    }

    if ceph.int_or("ceph.fs_total", 0) > 0 {
        modules.push(
            Module::new(
                "CephFS_Total",
                ModuleType::GenericData,
                "Number of CephFS filesystems",
                ceph.int_or("ceph.fs_total", 0),
            )
            .group(GROUP_CEPHFS),
        );
    }

    for service in CEPH_SERVICES {
        modules.push(
            Module::new(
                format!("Service_{service}"),
                ModuleType::GenericDataString,
                format!("Activation state of the {service} service"),
                services.str_or(&service_key(service), "unknown"),
            )
            .str_thresholds("!active", "!active")
            .group(GROUP_CEPH_SERVICES),
        );
    }
}

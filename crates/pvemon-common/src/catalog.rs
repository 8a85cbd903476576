//! Fixed enumeration order for the services the agent reports on.
//!
//! The report emits one module per service in exactly this order, so the
//! lists live here rather than in the harvester: both the harvester and the
//! assembler iterate the same arrays.

/// Proxmox platform services checked on every pass.
pub const PLATFORM_SERVICES: [&str; 4] = ["pve-cluster", "pvedaemon", "pveproxy", "pvestatd"];

/// Ceph service unit prefixes, checked only when Ceph is installed.
pub const CEPH_SERVICES: [&str; 3] = ["ceph-mon", "ceph-mgr", "ceph-osd"];

/// Fact key for a service's activation state.
pub fn service_key(service: &str) -> String {
    format!("service.{service}")
}

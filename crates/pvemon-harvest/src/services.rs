//! systemd activation state for the fixed platform service list, plus Ceph
//! service units when that subsystem is installed.

use crate::CommandRunner;
use pvemon_common::catalog::{service_key, CEPH_SERVICES, PLATFORM_SERVICES};
use pvemon_common::facts::Facts;

/// Harvests per-service activation states. Each query is independent; a
/// fault on one service leaves the others untouched.
///
/// `systemctl is-active` exits non-zero for anything but an active unit, so
/// the shim yields `None` and the fact degrades to "unknown" for inactive or
/// missing services alike.
pub async fn harvest(runner: &dyn CommandRunner, ceph_installed: bool) -> Facts {
    let mut facts = Facts::new();

    for service in PLATFORM_SERVICES {
        let command = format!("systemctl is-active {service} 2>/dev/null");
        let state = runner
            .run(&command)
            .await
            .unwrap_or_else(|| "unknown".to_string());
        facts.set(service_key(service), state);
    }

    if ceph_installed {
        for service in CEPH_SERVICES {
            // Ceph runs several instantiated units per prefix (ceph-osd@0,
            // ceph-osd@1, ...); any matching running unit counts as active.
            let command = format!(
                "systemctl list-units --all 'ceph*' 2>/dev/null | grep {service} | grep running || echo ''"
            );
            let state = match runner.run(&command).await {
                Some(listing) if listing.contains("running") => "active",
                _ => "inactive",
            };
            facts.set(service_key(service), state);
        }
    }

    facts
}

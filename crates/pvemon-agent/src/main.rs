use anyhow::Result;
use chrono::Local;
use pvemon_harvest::{ceph, node, services, storage, ShellRunner};
use tracing_subscriber::EnvFilter;

/// One harvesting pass: query the node, its storage, the optional Ceph
/// subsystem and the platform services, then print the assembled report.
///
/// Harvest failures degrade individual facts and never abort the pass; only
/// an unrenderable report reaches the error path (one-line diagnostic on
/// stderr, exit code 1).
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("pvemon=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let runner = ShellRunner::new();

    let node_facts = node::harvest(&runner).await;
    tracing::debug!(count = node_facts.len(), "node facts harvested");
    let storage_facts = storage::harvest(&runner).await;
    tracing::debug!(count = storage_facts.len(), "storage facts harvested");
    let ceph_facts = ceph::harvest(&runner).await;
    tracing::debug!(
        installed = ceph_facts.bool_or("ceph.installed", false),
        "ceph facts harvested"
    );
    let service_facts =
        services::harvest(&runner, ceph_facts.bool_or("ceph.installed", false)).await;
    tracing::debug!(count = service_facts.len(), "service facts harvested");

    let modules = pvemon_report::assemble(&node_facts, &storage_facts, &ceph_facts, &service_facts);
    tracing::info!(modules = modules.len(), "report assembled");
    let report = pvemon_report::render(&modules, Local::now())?;
    print!("{report}");

    Ok(())
}

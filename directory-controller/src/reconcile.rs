//! The poll-and-rebuild loop.

use std::path::PathBuf;
use std::time::Duration;

use tokio::time;
use tracing::{info, warn};

use homeport_directory_controller_core::{build, Settings};
use homeport_directory_controller_k8s::{self as k8s, Client, ClusterClient};

use crate::output;

pub(crate) struct Reconciler {
    pub client: Client,
    pub lookups: ClusterClient,
    pub settings: Settings,
    pub output: Option<PathBuf>,
    pub interval: Duration,
}

// === impl Reconciler ===

impl Reconciler {
    /// Rebuilds the directory every interval until shutdown is signaled.
    ///
    /// A failed cycle is logged and retried on the next tick; the last
    /// successfully written output keeps serving in the meantime. The drain
    /// signal interrupts a cycle at its await points, so shutdown never
    /// waits out an in-flight build.
    pub(crate) async fn run(self, drain: drain::Watch) {
        let work = async {
            loop {
                if let Err(error) = self.cycle().await {
                    warn!(%error, "Failed to refresh service directory");
                }
                time::sleep(self.interval).await;
            }
        };
        tokio::pin!(work);

        tokio::select! {
            _ = &mut work => unreachable!(),
            release = drain.signaled() => {
                info!("Shutdown signaled; stopping reconciliation");
                drop(release);
            }
        }
    }

    async fn cycle(&self) -> anyhow::Result<()> {
        let snapshot = k8s::snapshot(self.client.clone()).await?;

        let directory = build(&snapshot, &self.settings, &self.lookups).await?;
        let rendered = output::render(&directory)?;
        output::emit(&rendered, self.output.as_deref()).await?;

        info!(
            ingresses = snapshot.len(),
            groups = directory.len(),
            "Refreshed service directory",
        );
        Ok(())
    }
}

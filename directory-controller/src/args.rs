use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::Parser;
use tracing::{info_span, Instrument};

use homeport_directory_controller_core::{LinkTarget, Settings};
use homeport_directory_controller_k8s::ClusterClient;

use crate::reconcile::Reconciler;

#[derive(Debug, Parser)]
#[clap(
    name = "directory-controller",
    about = "Derives a grouped dashboard directory from ingress annotations"
)]
pub struct Args {
    #[clap(long, default_value = "homeport=info,warn", env = "HOMEPORT_LOG")]
    log_level: kubert::LogFilter,

    #[clap(long, default_value = "plain")]
    log_format: kubert::LogFormat,

    #[clap(flatten)]
    client: kubert::ClientArgs,

    #[clap(flatten)]
    admin: kubert::AdminArgs,

    /// Include ingresses that carry no enable annotation.
    #[clap(long, action = clap::ArgAction::Set, default_value_t = true)]
    include_by_default: bool,

    /// Link target applied to entries without a target annotation.
    #[clap(long, default_value = "unset")]
    default_target: LinkTarget,

    /// Path the rendered directory is written to on every cycle. The
    /// rendered document is always echoed to stdout.
    #[clap(long)]
    output: Option<PathBuf>,

    /// Seconds to sleep between reconciliation cycles.
    #[clap(long, default_value = "10")]
    poll_interval_secs: u64,
}

// === impl Args ===

impl Args {
    #[inline]
    pub async fn parse_and_run() -> Result<()> {
        Self::parse().run().await
    }

    pub async fn run(self) -> Result<()> {
        let Self {
            log_level,
            log_format,
            client,
            admin,
            include_by_default,
            default_target,
            output,
            poll_interval_secs,
        } = self;

        let runtime = kubert::Runtime::builder()
            .with_log(log_level, log_format)
            .with_admin(admin)
            .with_client(client)
            .build()
            .await?;

        let reconciler = Reconciler {
            client: runtime.client(),
            lookups: ClusterClient::new(runtime.client()),
            settings: Settings {
                include_by_default,
                default_target,
            },
            output,
            interval: Duration::from_secs(poll_interval_secs),
        };
        tokio::spawn(
            reconciler
                .run(runtime.shutdown_handle())
                .instrument(info_span!("reconcile")),
        );

        // Block the main thread on the shutdown signal. Once it fires, wait
        // for the loop to release its drain handle before exiting.
        if runtime.run().await.is_err() {
            bail!("aborted");
        }
        Ok(())
    }
}

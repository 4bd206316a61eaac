//! Renders and emits the directory in the dashboard's file format.

use std::path::Path;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use tracing::info;

use homeport_directory_controller_core::{Directory, ServiceEntry};

/// Renders the directory as a sequence of single-key group mappings, each
/// holding a sequence of single-key service mappings, in emitted order.
pub(crate) fn render(directory: &Directory) -> Result<String> {
    let documents: Vec<IndexMap<&str, Vec<IndexMap<&str, &ServiceEntry>>>> = directory
        .groups()
        .map(|(group, services)| {
            let services = services
                .iter()
                .map(|(name, entry)| IndexMap::from([(name.as_str(), entry)]))
                .collect();
            IndexMap::from([(group, services)])
        })
        .collect();
    serde_yaml::to_string(&documents).context("serializing service directory")
}

/// Echoes the rendered document to stdout and, when configured, rewrites the
/// output file.
pub(crate) async fn emit(rendered: &str, path: Option<&Path>) -> Result<()> {
    println!("{rendered}");

    if let Some(path) = path {
        tokio::fs::write(path, rendered)
            .await
            .with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "Wrote service directory");
    }
    Ok(())
}

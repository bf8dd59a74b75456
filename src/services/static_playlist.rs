//! Offline generation of the aggregated playlist file
//!
//! Same fetch, parse and render steps as the endpoint, without the cache.

use anyhow::{Context, Result};
use std::path::Path;

use crate::services::aggregator::Aggregator;
use crate::services::m3u_parser::render_m3u;
use crate::services::store::SourceRegistry;

/// Aggregate active sources and write the rendered playlist to `output`.
/// Returns the number of channels written.
pub async fn write_static_playlist(
    registry: &dyn SourceRegistry,
    aggregator: &Aggregator,
    output: &Path,
) -> Result<usize> {
    let sources = registry
        .list_active_sources()
        .await
        .context("Failed to fetch sources from database")?;
    tracing::info!("Found {} active sources", sources.len());

    let snapshot = aggregator.aggregate(&sources).await;
    let content = render_m3u(&snapshot.channels);

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    tokio::fs::write(output, content)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;

    tracing::info!("M3U file saved to {}", output.display());
    Ok(snapshot.total_channels())
}

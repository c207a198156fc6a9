//! Webpage build command.

use anyhow::{Context, Result};
use samplepage_static::{DeployConfig, DeployPipeline};

/// Run the build command.
pub async fn run(config: DeployConfig) -> Result<()> {
    tracing::info!("Building samples webpage...");

    let pipeline = DeployPipeline::new(config);
    let result = tokio::task::spawn_blocking(move || pipeline.run())
        .await
        .context("Deploy task failed")??;

    tracing::info!(
        "Built {} pages for {} samples ({} artifacts copied, {} missing) in {}ms",
        result.pages,
        result.samples,
        result.copied,
        result.skipped,
        result.duration_ms
    );

    tracing::info!("Generated samples web page under {}", result.output_dir.display());

    Ok(())
}

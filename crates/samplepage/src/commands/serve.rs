//! Preview server command.

use std::path::PathBuf;

use anyhow::Result;
use samplepage_server::PageServer;

/// Run the serve command.
pub async fn run(deploy_dir: PathBuf) -> Result<()> {
    PageServer::new(deploy_dir).run().await?;

    Ok(())
}

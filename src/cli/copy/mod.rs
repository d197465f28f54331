//! Copy command - mirrors a directory tree

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use crate::infrastructure::fs;

#[derive(Args, Debug)]
pub struct CopyArgs {
    /// Directory to copy from
    pub source: PathBuf,

    /// Directory to copy into (created if missing)
    pub target: PathBuf,
}

/// Run the copy on the blocking pool
pub async fn run(args: CopyArgs) -> anyhow::Result<()> {
    if !fs::is_dir(&args.source)? {
        anyhow::bail!("source '{}' is not a directory", args.source.display());
    }

    info!(source = %args.source.display(), target = %args.target.display(), "Starting copy");

    let CopyArgs { source, target } = args;
    tokio::task::spawn_blocking(move || fs::copy_directory(&source, &target)).await??;

    info!("Copy complete");
    Ok(())
}

//! Clean command
//!
//! Remove the build workspace left behind by a kept or aborted build

use anyhow::{Context, Result};
use pickle::{Config, Package, Workspace};

pub(crate) fn run(dir: &str, config: &Config) -> Result<()> {
    let package = Package::from_manifest(dir)
        .with_context(|| format!("Failed to load extension in {dir}"))?;
    let workspace = Workspace::new_in(config.temp_root(), package.name(), package.version());

    if !workspace.exists() {
        println!("No workspace for {} {}", package.name(), package.version());
        return Ok(());
    }

    workspace.release()?;
    println!("Removed {}", workspace.path().display());
    Ok(())
}

//! Pack command - build an .agxb file from an agx.toml manifest

use std::path::{Path, PathBuf};

use agx_format::write_document;
use agx_shared::AGX_FORMAT;
use anyhow::{Context, Result};
use clap::Args;

use crate::manifest::AgxManifest;

/// Arguments for the pack command
#[derive(Args)]
pub struct PackArgs {
    /// Path to agx.toml manifest file
    #[arg(default_value = "agx.toml")]
    pub manifest: PathBuf,

    /// Output .agxb file path (defaults to the manifest name with .agxb)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute the pack command
pub fn execute(args: PackArgs) -> Result<()> {
    let manifest = AgxManifest::load(&args.manifest)?;
    let doc = manifest
        .to_document()
        .with_context(|| format!("Invalid manifest: {}", args.manifest.display()))?;

    let output = args
        .output
        .unwrap_or_else(|| default_output(&args.manifest));
    write_document(&doc, &output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    tracing::info!(
        "Packed {:?} -> {:?} ({} constants, {} time steps)",
        args.manifest,
        output,
        doc.constants().len(),
        doc.time_step_count()
    );
    Ok(())
}

fn default_output(manifest: &Path) -> PathBuf {
    manifest.with_extension(AGX_FORMAT.extension)
}

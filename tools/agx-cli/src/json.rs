//! Json command - convert an .agxb file to its JSON projection

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use agx_format::{AgxReader, json};
use anyhow::{Context, Result};
use clap::Args;

/// Arguments for the json command
#[derive(Args)]
pub struct JsonArgs {
    /// Input .agxb file
    pub input: PathBuf,

    /// Output .json file (prints to stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute the json command
pub fn execute(args: JsonArgs) -> Result<()> {
    let mut reader = AgxReader::open(&args.input)
        .with_context(|| format!("Failed to open {}", args.input.display()))?;
    let doc = reader
        .read_document()
        .with_context(|| format!("Failed to read {}", args.input.display()))?;

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            json::write_json(&doc, &mut writer).context("Failed to write JSON")?;
            writeln!(writer)?;
            writer.flush()?;
            tracing::info!("Converted {:?} -> {:?}", args.input, path);
        }
        None => {
            let text = json::to_json_string(&doc).context("Failed to serialize JSON")?;
            println!("{text}");
        }
    }
    Ok(())
}

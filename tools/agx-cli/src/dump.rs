//! Dump command - stream every parameter of an .agxb file
//!
//! Uses the reader cursors directly, so only one record is held in memory.

use std::fmt::Write as _;
use std::io::{Read, Seek};
use std::path::PathBuf;

use agx_format::{AgxReader, Next, ParamView};
use anyhow::{Context, Result};
use clap::Args;

/// Arguments for the dump command
#[derive(Args)]
pub struct DumpArgs {
    /// Path to the .agxb file
    pub file: PathBuf,

    /// Skip time step parameters and only list constants
    #[arg(long)]
    pub constants_only: bool,
}

/// Execute the dump command
pub fn execute(args: DumpArgs) -> Result<()> {
    let mut reader = AgxReader::open(&args.file)
        .with_context(|| format!("Failed to open {}", args.file.display()))?;
    print!("{}", dump_to_string(&mut reader, args.constants_only)?);
    Ok(())
}

/// Render the whole listing into a string.
pub fn dump_to_string<R: Read + Seek>(
    reader: &mut AgxReader<R>,
    constants_only: bool,
) -> Result<String> {
    let mut out = String::new();
    let header = *reader.header();

    let _ = writeln!(
        out,
        "AGXB v{}: timeSteps={} constants={} (swap={})",
        header.version,
        header.time_steps,
        header.constant_param_count,
        u8::from(header.need_byte_swap)
    );
    let _ = writeln!(out, "   Type: '{}'", header.object_type);
    let _ = writeln!(out, "Subtype: '{}'", reader.subtype());

    reader.reset_constants();
    loop {
        match reader.next_constant() {
            Next::Produced(param) => write_param(&mut out, "CONST:", &param),
            Next::End => break,
            Next::Error(err) => return Err(err).context("Error reading constants"),
        }
    }

    if constants_only {
        return Ok(out);
    }

    reader.reset_time_steps();
    loop {
        let step = match reader.begin_next_time_step() {
            Next::Produced(step) => step,
            Next::End => break,
            Next::Error(err) => return Err(err).context("Error reading time steps"),
        };
        let _ = writeln!(out, "Time step {}: {} params", step.index, step.param_count);

        while let Some(param) = reader
            .next_time_step_param()
            .into_result()
            .with_context(|| format!("Error reading parameters of time step {}", step.index))?
        {
            write_param(&mut out, "STEP :", &param);
        }
    }

    Ok(out)
}

fn write_param(out: &mut String, prefix: &str, param: &ParamView<'_>) {
    let _ = write!(
        out,
        "{} name='{}' isArray={} ",
        prefix,
        param.name_str(),
        u8::from(param.is_array())
    );
    let _ = if param.is_array() {
        writeln!(
            out,
            "elemType={} elemCount={} bytes={}",
            param.data_type(),
            param.element_count(),
            param.data().len()
        )
    } else {
        writeln!(
            out,
            "type={} bytes={}",
            param.data_type(),
            param.data().len()
        )
    };
}

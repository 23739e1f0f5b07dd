//! Info command - print the header of an .agxb file
//!
//! Exit codes:
//! - 0: header printed
//! - 1: usage error (reported by clap)
//! - 2: file could not be opened or read
//! - 3: file too short to hold the magic
//! - 4: bad magic
//! - 5: incomplete header
//! - 6: bad endian marker
//! - 7: unsupported version

use std::path::PathBuf;
use std::process::ExitCode;

use agx_format::{AgxError, AgxHeader, AgxReader};
use agx_shared::endian_label;
use clap::Args;

/// Arguments for the info command
#[derive(Args)]
pub struct InfoArgs {
    /// Path to the .agxb file
    pub file: PathBuf,
}

/// Execute the info command
pub fn execute(args: InfoArgs) -> ExitCode {
    match AgxReader::open(&args.file) {
        Ok(reader) => {
            print!("{}", render_header(reader.header(), reader.subtype()));
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::from(exit_code(&err))
        }
    }
}

/// Process exit status for a failed open.
pub fn exit_code(err: &AgxError) -> u8 {
    match err {
        AgxError::TruncatedMagic => 3,
        AgxError::BadMagic => 4,
        AgxError::TruncatedHeader => 5,
        AgxError::BadEndianMarker(_) => 6,
        AgxError::UnsupportedVersion(_) => 7,
        _ => 2,
    }
}

fn render_header(header: &AgxHeader, subtype: &str) -> String {
    format!(
        "AGXB header information\n\
         \x20 magic                 : AGXB\n\
         \x20 version               : {}\n\
         \x20 endian marker         : 0x{:08X}\n\
         \x20 host endianness       : {}\n\
         \x20 file endianness       : {}\n\
         \x20 byte swap needed      : {}\n\
         \x20 objectType            : {}\n\
         \x20 timeSteps             : {}\n\
         \x20 constantParamCount    : {}\n\
         \x20 subtype               : '{}'\n",
        header.version,
        header.normalized_marker(),
        endian_label(header.host_little_endian),
        endian_label(header.file_little_endian),
        if header.need_byte_swap { "yes" } else { "no" },
        header.object_type,
        header.time_steps,
        header.constant_param_count,
        subtype,
    )
}

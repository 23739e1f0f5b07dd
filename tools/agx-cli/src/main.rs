//! AGX CLI - Inspect and build AGXB parameter dumps
//!
//! # Commands
//!
//! - `agx info` - Print the header of an .agxb file
//! - `agx dump` - Stream every constant and time step parameter
//! - `agx json` - Convert an .agxb file to JSON
//! - `agx demo` - Write the animated quad sample dump
//! - `agx pack` - Build an .agxb file from an agx.toml manifest
//!
//! # Usage
//!
//! ```bash
//! # Write the sample and look at it
//! agx demo -o quad.agxb
//! agx info quad.agxb
//! agx dump quad.agxb
//!
//! # Human readable copy
//! agx json quad.agxb -o quad.json
//!
//! # Build a dump from a manifest
//! agx pack agx.toml -o out.agxb
//! ```
//!
//! Set `RUST_LOG=debug` for reader and writer diagnostics.

mod demo;
mod dump;
mod info;
mod json;
mod manifest;
mod pack;

use std::process::ExitCode;

use clap::{Parser, Subcommand};

/// AGX CLI - Inspect and build AGXB parameter dumps
#[derive(Parser)]
#[command(name = "agx")]
#[command(about = "Inspect and build AGXB parameter dumps")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the header of an .agxb file
    Info(info::InfoArgs),

    /// Stream every constant and time step parameter
    Dump(dump::DumpArgs),

    /// Convert an .agxb file to JSON
    Json(json::JsonArgs),

    /// Write the animated quad sample dump
    Demo(demo::DemoArgs),

    /// Build an .agxb file from a TOML manifest
    Pack(pack::PackArgs),
}

fn main() -> ExitCode {
    // Initialize logging (stderr keeps stdout clean for dump/json output)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Usage errors exit with 1 rather than clap's default
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let result = match cli.command {
        Commands::Info(args) => return info::execute(args),
        Commands::Dump(args) => dump::execute(args),
        Commands::Json(args) => json::execute(args),
        Commands::Demo(args) => demo::execute(args),
        Commands::Pack(args) => pack::execute(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

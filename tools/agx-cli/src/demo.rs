//! Demo command - write the animated quad sample dump
//!
//! Constants: `bbox.min`, `bbox.max` and a triangle index array. Each time
//! step carries four vertex `positions` and a normalized `time` value.

use std::path::PathBuf;

use agx_format::{AnimationDocument, ElementType, write_document};
use anyhow::{Context, Result};
use clap::Args;
use glam::Vec3;

/// Default output file name
pub const DEFAULT_OUTPUT: &str = "animated_geometry_dump.agxb";

/// Arguments for the demo command
#[derive(Args)]
pub struct DemoArgs {
    /// Output .agxb file
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Number of time steps to generate
    #[arg(long, default_value_t = 4)]
    pub steps: u32,
}

/// Execute the demo command
pub fn execute(args: DemoArgs) -> Result<()> {
    let doc = build_demo(args.steps);
    write_document(&doc, &args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    tracing::info!(
        "Wrote {:?} ({} time steps, {} constants)",
        args.output,
        doc.time_step_count(),
        doc.constants().len()
    );
    Ok(())
}

/// Quad vertices for one time step; `phase` animates the z coordinates.
fn quad_positions(phase: f32) -> [Vec3; 4] {
    [
        Vec3::new(0.0, 0.0, phase.sin()),
        Vec3::new(1.0, 0.0, phase.cos()),
        Vec3::new(1.0, 1.0, (phase + 0.3).sin()),
        Vec3::new(0.0, 1.0, (phase + 0.3).cos()),
    ]
}

/// Build the sample document with `steps` time steps.
pub fn build_demo(steps: u32) -> AnimationDocument {
    let mut doc = AnimationDocument::new();
    doc.set_object_type(ElementType::GEOMETRY);
    doc.set_subtype("triangle");

    doc.set_constant_value("bbox.min", ElementType::FLOAT32_VEC3, &Vec3::ZERO);
    doc.set_constant_value("bbox.max", ElementType::FLOAT32_VEC3, &Vec3::ONE);
    let indices = [0u32, 1, 2, 2, 3, 0];
    doc.set_constant_slice("indices", ElementType::UINT32, &indices);

    doc.set_time_step_count(steps);
    let denom = steps.saturating_sub(1).max(1) as f32;
    for t in 0..steps {
        doc.begin_time_step(t);
        let positions = quad_positions(0.5 * t as f32);
        doc.set_time_step_slice(t, "positions", ElementType::FLOAT32_VEC3, &positions);
        doc.set_time_step_value(t, "time", ElementType::FLOAT32, &(t as f32 / denom));
        doc.end_time_step(t);
    }
    doc
}

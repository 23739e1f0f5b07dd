//! AGXB binary writer
//!
//! # Layout
//! ```text
//! Header:
//!   char[4]  magic = "AGXB"
//!   u32      version = 1
//!   u32      endian_marker = 0x01020304 (host byte order)
//!   u32      object_type
//!   u32      time_step_count
//!   u32      constant_param_count
//!   u32      subtype_len, then subtype bytes (no terminator)
//!
//! constant_param_count parameter records
//!
//! Per time step, in index order:
//!   u32      time_step_index
//!   u32      param_count
//!   param_count parameter records
//!
//! Parameter record:
//!   u32 name_len, name bytes
//!   u8  is_array
//!   scalar: u32 type, u32 value_bytes, value
//!   array:  u32 element_type, u64 element_count, u64 data_bytes, data
//! ```
//!
//! All integers use the writer's native byte order; the endian marker lets
//! a reader on the other byte order detect and compensate. Payload bytes are
//! written untouched.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use agx_shared::AGX_FORMAT;

use crate::document::AnimationDocument;
use crate::error::AgxError;
use crate::io::{write_lp_bytes, write_u8, write_u32, write_u64};
use crate::value::{ParameterSet, ParameterValue};

/// Write `doc` to `path`, creating or truncating the file.
///
/// Only failing to open the destination is reported as [`AgxError::Open`].
/// An error after that leaves a partial file behind.
pub fn write_document(doc: &AnimationDocument, path: impl AsRef<Path>) -> Result<(), AgxError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| AgxError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    write_to(doc, &mut writer)?;
    writer.flush()?;

    tracing::debug!(
        "Wrote {:?}: {} constants, {} time steps",
        path,
        doc.constants().len(),
        doc.time_step_count()
    );
    Ok(())
}

/// Serialize `doc` into any byte sink.
pub fn write_to<W: Write>(doc: &AnimationDocument, w: &mut W) -> Result<(), AgxError> {
    // ========== Header ==========
    w.write_all(AGX_FORMAT.magic)?;
    write_u32(w, AGX_FORMAT.version)?;
    write_u32(w, AGX_FORMAT.endian_marker)?;
    write_u32(w, doc.object_type().raw())?;
    write_u32(w, doc.time_step_count())?;
    write_u32(w, doc.constants().len() as u32)?;
    write_lp_bytes(w, doc.subtype().as_bytes())?;

    // ========== Constants ==========
    write_parameter_set(w, doc.constants())?;

    // ========== Time steps ==========
    for (index, params) in doc.time_steps().iter().enumerate() {
        write_u32(w, index as u32)?;
        write_u32(w, params.len() as u32)?;
        write_parameter_set(w, params)?;
    }

    Ok(())
}

/// Serialize `doc` into a fresh buffer.
pub fn to_bytes(doc: &AnimationDocument) -> Vec<u8> {
    let mut out = Vec::new();
    // Writing into a Vec cannot fail
    let _ = write_to(doc, &mut out);
    out
}

fn write_parameter_set<W: Write>(w: &mut W, params: &ParameterSet) -> Result<(), AgxError> {
    for (name, value) in params {
        write_record(w, name, value)?;
    }
    Ok(())
}

fn write_record<W: Write>(w: &mut W, name: &str, value: &ParameterValue) -> Result<(), AgxError> {
    write_lp_bytes(w, name.as_bytes())?;
    match value {
        ParameterValue::Scalar { ty, bytes } => {
            write_u8(w, 0)?;
            write_u32(w, ty.raw())?;
            write_lp_bytes(w, bytes)?;
        }
        ParameterValue::Array {
            element_type,
            element_count,
            bytes,
        } => {
            write_u8(w, 1)?;
            write_u32(w, element_type.raw())?;
            write_u64(w, *element_count)?;
            write_u64(w, bytes.len() as u64)?;
            w.write_all(bytes)?;
        }
    }
    Ok(())
}

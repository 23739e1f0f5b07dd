//! Shared types for AGX parameter dumps.
//!
//! This crate provides the pieces used by both the format crate and the tools:
//!
//! - [`data_type`] - Element type table (byte widths, names, scalar layouts)
//! - [`file_format`] - Container constants (magic, version, endian marker)

pub mod data_type;
pub mod file_format;

pub use data_type::{ElementType, KNOWN_TYPES, ScalarKind, size_of, type_name};
pub use file_format::{AGX_FORMAT, FileFormat, endian_label, host_is_little_endian};

//! AGX-Format: binary container for animated parameter dumps
//!
//! This crate stores named, typed parameter values for an animated object
//! (constants plus one bucket per time step), writes them to the AGXB binary
//! container and streams them back without loading the whole file.
//!
//! # Key Features
//!
//! - **Total mutation API**: setters never fail; bad indices are clamped
//! - **Deterministic output**: parameters are written in insertion order
//! - **Endian aware reader**: files from a host of the other byte order are
//!   detected through the header marker and their integer fields swapped
//! - **Streaming**: only the current record is held in memory
//!
//! # Usage
//!
//! ```ignore
//! use agx_format::{AgxReader, AnimationDocument, ElementType, write_document};
//!
//! let mut doc = AnimationDocument::new();
//! doc.set_time_step_count(2);
//! doc.set_constant_slice("indices", ElementType::UINT32, &[0u32, 1, 2]);
//! doc.set_time_step_value(1, "time", ElementType::FLOAT32, &1.0f32);
//! write_document(&doc, "dump.agxb").unwrap();
//!
//! let mut reader = AgxReader::open("dump.agxb").unwrap();
//! while let Some(param) = reader.next_constant().into_result().unwrap() {
//!     println!("{} {}", param.name_str(), param.data_type());
//! }
//! ```
//!
//! # Payload byte order
//!
//! Payload bytes are never swapped. A reader on a host of the other byte
//! order sees the producer's bytes and must convert them itself.

mod document;
mod error;
mod io;
pub mod json;
pub mod reader;
mod value;
pub mod writer;

pub use agx_shared::{AGX_FORMAT, ElementType, ScalarKind};
pub use document::AnimationDocument;
pub use error::AgxError;
pub use reader::{AgxHeader, AgxReader, Next, ParamView, TimeStepInfo};
pub use value::{ParameterSet, ParameterValue};
pub use writer::{to_bytes, write_document, write_to};

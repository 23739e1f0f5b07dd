//! Human readable JSON projection of a document
//!
//! ```text
//! {
//!   "timeSteps": n,
//!   "constants": { name: P, ... },
//!   "timeStepData": [ { "index": i, "params": { name: P, ... } }, ... ]
//! }
//! ```
//!
//! A scalar `P` is `{"type": "ANARI_...", "value": [components]}`, an array
//! `P` is `{"arrayElementType": "ANARI_...", "elementCount": n, "data":
//! [[components], ...]}`. Parameters keep their document order.

use std::io::Write;

use agx_shared::{ElementType, ScalarKind};
use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

use crate::document::AnimationDocument;
use crate::value::{ParameterSet, ParameterValue};

/// One decoded component.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Component {
    Unsigned(u64),
    Signed(i64),
    /// Rounded to 7 significant digits; `None` for NaN and infinities
    Float(Option<f64>),
}

#[derive(Serialize)]
struct DocumentJson<'a> {
    #[serde(rename = "timeSteps")]
    time_steps: u32,
    constants: ParamsJson<'a>,
    #[serde(rename = "timeStepData")]
    time_step_data: Vec<StepJson<'a>>,
}

#[derive(Serialize)]
struct StepJson<'a> {
    index: u32,
    params: ParamsJson<'a>,
}

/// Serializes a parameter set as a map in insertion order.
struct ParamsJson<'a>(&'a ParameterSet);

impl Serialize for ParamsJson<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in self.0 {
            map.serialize_entry(name, &ParamJson::from(value))?;
        }
        map.end()
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum ParamJson {
    Scalar {
        #[serde(rename = "type")]
        ty: &'static str,
        value: Vec<Component>,
    },
    Array {
        #[serde(rename = "arrayElementType")]
        element_type: &'static str,
        #[serde(rename = "elementCount")]
        element_count: u64,
        data: Vec<Vec<Component>>,
    },
}

impl From<&ParameterValue> for ParamJson {
    fn from(value: &ParameterValue) -> Self {
        match value {
            ParameterValue::Scalar { ty, bytes } => ParamJson::Scalar {
                ty: ty.name(),
                value: decode_components(*ty, bytes),
            },
            ParameterValue::Array {
                element_type,
                element_count,
                bytes,
            } => {
                let elem_bytes = element_type.size_of();
                let data = if elem_bytes == 0 || *element_count == 0 {
                    Vec::new()
                } else {
                    bytes
                        .chunks(elem_bytes)
                        .take(*element_count as usize)
                        .map(|elem| decode_components(*element_type, elem))
                        .collect()
                };
                ParamJson::Array {
                    element_type: element_type.name(),
                    element_count: *element_count,
                    data,
                }
            }
        }
    }
}

fn document_json(doc: &AnimationDocument) -> DocumentJson<'_> {
    DocumentJson {
        time_steps: doc.time_step_count(),
        constants: ParamsJson(doc.constants()),
        time_step_data: doc
            .time_steps()
            .iter()
            .enumerate()
            .map(|(index, params)| StepJson {
                index: index as u32,
                params: ParamsJson(params),
            })
            .collect(),
    }
}

/// Project `doc` into a JSON value.
///
/// `serde_json::Value` maps are key-sorted; use [`to_json_string`] or
/// [`write_json`] when parameter order matters.
pub fn to_json(doc: &AnimationDocument) -> serde_json::Result<serde_json::Value> {
    serde_json::to_value(document_json(doc))
}

/// Pretty-printed JSON text, parameters in document order.
pub fn to_json_string(doc: &AnimationDocument) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&document_json(doc))
}

/// Write pretty-printed JSON to `writer`.
pub fn write_json<W: Write>(doc: &AnimationDocument, writer: W) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(writer, &document_json(doc))
}

/// Decode one value of type `ty` from `bytes` (host byte order).
///
/// Components are read at their stored width and widened to the display
/// kind. Unknown layouts and empty input fall back to the raw bytes.
pub fn decode_components(ty: ElementType, bytes: &[u8]) -> Vec<Component> {
    let (count, kind) = ty.scalar_layout();
    let width = ty.component_width();
    if count == 0 || width == 0 || bytes.is_empty() {
        return raw_bytes(bytes);
    }

    bytes
        .chunks_exact(width)
        .take(count)
        .map(|chunk| decode_component(kind, chunk))
        .collect()
}

fn raw_bytes(bytes: &[u8]) -> Vec<Component> {
    bytes
        .iter()
        .map(|&b| Component::Unsigned(u64::from(b)))
        .collect()
}

fn decode_component(kind: ScalarKind, chunk: &[u8]) -> Component {
    match kind {
        ScalarKind::F32 | ScalarKind::F64 => {
            Component::Float(read_float(chunk).and_then(round_sig7))
        }
        ScalarKind::I32 | ScalarKind::I64 => Component::Signed(read_signed(chunk)),
        ScalarKind::U8 | ScalarKind::U32 | ScalarKind::U64 | ScalarKind::Unknown => {
            Component::Unsigned(read_unsigned(chunk))
        }
    }
}

fn read_unsigned(chunk: &[u8]) -> u64 {
    match chunk.len() {
        1 => u64::from(chunk[0]),
        2 => u64::from(bytemuck::pod_read_unaligned::<u16>(chunk)),
        4 => u64::from(bytemuck::pod_read_unaligned::<u32>(chunk)),
        8 => bytemuck::pod_read_unaligned::<u64>(chunk),
        _ => 0,
    }
}

fn read_signed(chunk: &[u8]) -> i64 {
    match chunk.len() {
        1 => i64::from(chunk[0] as i8),
        2 => i64::from(bytemuck::pod_read_unaligned::<i16>(chunk)),
        4 => i64::from(bytemuck::pod_read_unaligned::<i32>(chunk)),
        8 => bytemuck::pod_read_unaligned::<i64>(chunk),
        _ => 0,
    }
}

fn read_float(chunk: &[u8]) -> Option<f64> {
    match chunk.len() {
        4 => Some(f64::from(bytemuck::pod_read_unaligned::<f32>(chunk))),
        8 => Some(bytemuck::pod_read_unaligned::<f64>(chunk)),
        _ => None,
    }
}

/// Round to 7 significant digits (matches a `%.7g` style printout).
fn round_sig7(v: f64) -> Option<f64> {
    if !v.is_finite() {
        return None;
    }
    format!("{v:.6e}").parse().ok()
}

//! agx.toml manifest parsing
//!
//! A manifest describes a whole document in TOML: metadata, constants and
//! per-time-step parameters. Values are written as plain number lists and
//! encoded according to the element type.
//!
//! ```toml
//! object_type = "GEOMETRY"
//! subtype = "triangle"
//! time_steps = 2
//!
//! [[constants]]
//! name = "bbox.min"
//! type = "FLOAT32_VEC3"
//! value = [0.0, 0.0, 0.0]
//!
//! [[constants]]
//! name = "indices"
//! type = "UINT32"
//! array = [0, 1, 2]
//!
//! [[time_step]]
//! index = 0
//! [[time_step.params]]
//! name = "time"
//! type = "FLOAT32"
//! value = [0.0]
//! ```

use std::path::Path;

use agx_format::{AnimationDocument, ElementType, ParameterValue};
use anyhow::{Context, Result, bail};
use serde::Deserialize;

/// Largest time step count a manifest may ask for
pub const MAX_TIME_STEPS: u32 = 1 << 20;

/// agx.toml manifest structure
#[derive(Debug, Default, Deserialize)]
pub struct AgxManifest {
    /// Object kind tag, by name or numeric id
    #[serde(default)]
    pub object_type: Option<TypeRef>,
    #[serde(default)]
    pub subtype: String,
    /// Minimum time step count; grown to fit every `[[time_step]]` index
    #[serde(default)]
    pub time_steps: Option<u32>,
    #[serde(default)]
    pub constants: Vec<ParamEntry>,
    #[serde(default)]
    pub time_step: Vec<TimeStepEntry>,
}

/// Element type given by name (`"FLOAT32_VEC3"`, `"ANARI_UINT32"`) or raw id
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TypeRef {
    Id(u32),
    Name(String),
}

impl TypeRef {
    pub fn resolve(&self) -> Result<ElementType> {
        match self {
            TypeRef::Id(id) => Ok(ElementType(*id)),
            TypeRef::Name(name) => ElementType::from_name(name)
                .with_context(|| format!("Unknown element type '{name}'")),
        }
    }
}

/// One `[[time_step]]` table
#[derive(Debug, Deserialize)]
pub struct TimeStepEntry {
    pub index: u32,
    #[serde(default)]
    pub params: Vec<ParamEntry>,
}

/// Single parameter; exactly one of `value` (scalar) or `array` is set
#[derive(Debug, Deserialize)]
pub struct ParamEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default)]
    pub value: Option<Vec<Number>>,
    #[serde(default)]
    pub array: Option<Vec<Number>>,
}

/// TOML number; integers stay exact
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl AgxManifest {
    /// Load manifest from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
        Self::parse(&content)
    }

    /// Parse manifest from string
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse agx.toml")
    }

    /// Time step count after growing to fit every listed index
    pub fn time_step_count(&self) -> u32 {
        let needed = self
            .time_step
            .iter()
            .map(|step| step.index.saturating_add(1))
            .max()
            .unwrap_or(0);
        self.time_steps.unwrap_or(0).max(needed)
    }

    /// Build the in-memory document described by this manifest.
    pub fn to_document(&self) -> Result<AnimationDocument> {
        let mut doc = AnimationDocument::new();
        if let Some(object_type) = &self.object_type {
            doc.set_object_type(object_type.resolve().context("Invalid object_type")?);
        }
        doc.set_subtype(self.subtype.as_str());

        let count = self.time_step_count();
        if count > MAX_TIME_STEPS {
            bail!("Manifest asks for {count} time steps, the limit is {MAX_TIME_STEPS}");
        }
        doc.set_time_step_count(count);

        for entry in &self.constants {
            doc.insert_constant(&entry.name, entry.to_value()?);
        }
        for step in &self.time_step {
            for entry in &step.params {
                let value = entry
                    .to_value()
                    .with_context(|| format!("In time step {}", step.index))?;
                doc.insert_time_step_parameter(step.index, &entry.name, value);
            }
        }
        Ok(doc)
    }
}

impl ParamEntry {
    /// Encode the listed numbers into a parameter value.
    pub fn to_value(&self) -> Result<ParameterValue> {
        if self.name.is_empty() {
            bail!("Parameter with empty name");
        }
        let name = &self.name;
        let ty = self
            .ty
            .resolve()
            .with_context(|| format!("Parameter '{name}'"))?;
        let (components, _) = ty.scalar_layout();
        if components == 0 {
            bail!("Parameter '{name}': type {ty} has no numeric layout");
        }

        match (&self.value, &self.array) {
            (Some(value), None) => {
                if value.len() != components {
                    bail!(
                        "Parameter '{name}': {ty} takes {components} numbers, got {}",
                        value.len()
                    );
                }
                let bytes = encode_numbers(ty, value)
                    .with_context(|| format!("Parameter '{name}'"))?;
                Ok(ParameterValue::scalar(ty, Some(&bytes)))
            }
            (None, Some(array)) => {
                if array.len() % components != 0 {
                    bail!(
                        "Parameter '{name}': {} numbers is not a multiple of {components}",
                        array.len()
                    );
                }
                let bytes = encode_numbers(ty, array)
                    .with_context(|| format!("Parameter '{name}'"))?;
                let count = (array.len() / components) as u64;
                Ok(ParameterValue::array(ty, Some(&bytes), count))
            }
            (Some(_), Some(_)) => {
                bail!("Parameter '{name}': set either 'value' or 'array', not both")
            }
            (None, None) => bail!("Parameter '{name}': missing 'value' or 'array'"),
        }
    }
}

/// Encode numbers at the component width of `ty` in host byte order.
pub fn encode_numbers(ty: ElementType, numbers: &[Number]) -> Result<Vec<u8>> {
    let (_, kind) = ty.scalar_layout();
    let width = ty.component_width();
    // 8-bit signed data displays as bytes but is still entered as signed
    let signed = kind.is_signed() || ty == ElementType::INT8;

    let mut out = Vec::with_capacity(numbers.len() * width);
    for (i, &number) in numbers.iter().enumerate() {
        match (kind, number) {
            (kind, n) if kind.is_float() => {
                let v = match n {
                    Number::Int(v) => v as f64,
                    Number::Float(v) => v,
                };
                if width == 4 {
                    out.extend_from_slice(bytemuck::bytes_of(&(v as f32)));
                } else {
                    out.extend_from_slice(bytemuck::bytes_of(&v));
                }
            }
            (_, Number::Float(v)) => bail!("Component {i}: {ty} expects integers, got {v}"),
            (_, Number::Int(v)) => {
                if !push_int(&mut out, v, width, signed) {
                    bail!("Component {i}: {v} out of range for {ty}");
                }
            }
        }
    }
    Ok(out)
}

/// Append `v` as a `width`-byte integer; false when it does not fit.
fn push_int(out: &mut Vec<u8>, v: i64, width: usize, signed: bool) -> bool {
    fn push<T: bytemuck::NoUninit>(out: &mut Vec<u8>, v: Option<T>) -> bool {
        match v {
            Some(v) => {
                out.extend_from_slice(bytemuck::bytes_of(&v));
                true
            }
            None => false,
        }
    }

    match (width, signed) {
        (1, true) => push(out, i8::try_from(v).ok()),
        (1, false) => push(out, u8::try_from(v).ok()),
        (2, true) => push(out, i16::try_from(v).ok()),
        (2, false) => push(out, u16::try_from(v).ok()),
        (4, true) => push(out, i32::try_from(v).ok()),
        (4, false) => push(out, u32::try_from(v).ok()),
        (8, true) => push(out, Some(v)),
        (8, false) => push(out, u64::try_from(v).ok()),
        _ => false,
    }
}

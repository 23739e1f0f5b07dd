//! In-memory parameter document
//!
//! An [`AnimationDocument`] collects constants and per-time-step parameters
//! before they are written out. Every mutation is total: invalid input
//! (an empty name) is ignored and out-of-range time step indices are
//! clamped to the last valid bucket.


use agx_shared::ElementType;

use crate::value::{ParameterSet, ParameterValue};

/// Root aggregate of a parameter dump.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationDocument {
    object_type: ElementType,
    subtype: String,
    constants: ParameterSet,
    /// One bucket per time step; its length is the time step count
    time_steps: Vec<ParameterSet>,
}

impl AnimationDocument {
    /// Create an empty document (no constants, zero time steps)
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Document metadata
    // ========================================================================

    /// Kind of object the dump describes (opaque to the format)
    pub fn object_type(&self) -> ElementType {
        self.object_type
    }

    pub fn set_object_type(&mut self, object_type: ElementType) {
        self.object_type = object_type;
    }

    /// Free-form discriminator, empty by default
    pub fn subtype(&self) -> &str {
        &self.subtype
    }

    pub fn set_subtype(&mut self, subtype: impl Into<String>) {
        self.subtype = subtype.into();
    }

    // ========================================================================
    // Time steps
    // ========================================================================

    pub fn time_step_count(&self) -> u32 {
        self.time_steps.len() as u32
    }

    /// Resize the time step buckets.
    ///
    /// Existing buckets keep their index, new ones start empty and
    /// shrinking drops trailing buckets.
    pub fn set_time_step_count(&mut self, count: u32) {
        self.time_steps.resize_with(count as usize, ParameterSet::default);
    }

    /// Bracket marker; carries no semantics
    pub fn begin_time_step(&mut self, _time_step_index: u32) {}

    /// Bracket marker; carries no semantics
    pub fn end_time_step(&mut self, _time_step_index: u32) {}

    // ========================================================================
    // Constants
    // ========================================================================

    /// Set (or overwrite) a constant scalar, copying `type.size_of()` bytes.
    pub fn set_constant(&mut self, name: &str, ty: ElementType, value: Option<&[u8]>) {
        self.insert_constant(name, ParameterValue::scalar(ty, value));
    }

    /// Set (or overwrite) a constant 1-D array.
    pub fn set_constant_array(
        &mut self,
        name: &str,
        element_type: ElementType,
        data: Option<&[u8]>,
        element_count: u64,
    ) {
        self.insert_constant(
            name,
            ParameterValue::array(element_type, data, element_count),
        );
    }

    /// Typed form of [`AnimationDocument::set_constant`].
    pub fn set_constant_value<T: bytemuck::NoUninit>(
        &mut self,
        name: &str,
        ty: ElementType,
        value: &T,
    ) {
        self.set_constant(name, ty, Some(bytemuck::bytes_of(value)));
    }

    /// Typed form of [`AnimationDocument::set_constant_array`].
    ///
    /// The element count is derived from the slice's byte length.
    pub fn set_constant_slice<T: bytemuck::NoUninit>(
        &mut self,
        name: &str,
        element_type: ElementType,
        data: &[T],
    ) {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        let count = element_count_for(element_type, bytes.len(), data.len());
        self.set_constant_array(name, element_type, Some(bytes), count);
    }

    /// Store an already built value under `name` in the constants bucket.
    pub fn insert_constant(&mut self, name: &str, value: ParameterValue) {
        if name.is_empty() {
            return;
        }
        self.constants.insert(name.to_owned(), value);
    }

    pub fn constants(&self) -> &ParameterSet {
        &self.constants
    }

    // ========================================================================
    // Per-time-step parameters
    // ========================================================================

    /// Set (or overwrite) a scalar in bucket `time_step_index` (clamped).
    pub fn set_time_step_parameter(
        &mut self,
        time_step_index: u32,
        name: &str,
        ty: ElementType,
        value: Option<&[u8]>,
    ) {
        self.insert_time_step_parameter(time_step_index, name, ParameterValue::scalar(ty, value));
    }

    /// Set (or overwrite) an array in bucket `time_step_index` (clamped).
    pub fn set_time_step_parameter_array(
        &mut self,
        time_step_index: u32,
        name: &str,
        element_type: ElementType,
        data: Option<&[u8]>,
        element_count: u64,
    ) {
        self.insert_time_step_parameter(
            time_step_index,
            name,
            ParameterValue::array(element_type, data, element_count),
        );
    }

    /// Typed form of [`AnimationDocument::set_time_step_parameter`].
    pub fn set_time_step_value<T: bytemuck::NoUninit>(
        &mut self,
        time_step_index: u32,
        name: &str,
        ty: ElementType,
        value: &T,
    ) {
        self.set_time_step_parameter(time_step_index, name, ty, Some(bytemuck::bytes_of(value)));
    }

    /// Typed form of [`AnimationDocument::set_time_step_parameter_array`].
    pub fn set_time_step_slice<T: bytemuck::NoUninit>(
        &mut self,
        time_step_index: u32,
        name: &str,
        element_type: ElementType,
        data: &[T],
    ) {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        let count = element_count_for(element_type, bytes.len(), data.len());
        self.set_time_step_parameter_array(time_step_index, name, element_type, Some(bytes), count);
    }

    /// Store an already built value in bucket `time_step_index` (clamped).
    ///
    /// A document without time steps is grown to one bucket first.
    pub fn insert_time_step_parameter(
        &mut self,
        time_step_index: u32,
        name: &str,
        value: ParameterValue,
    ) {
        if name.is_empty() {
            return;
        }
        let index = self.clamp_time_step(time_step_index);
        self.time_steps[index].insert(name.to_owned(), value);
    }

    /// Parameters of one time step, `None` past the end.
    pub fn time_step(&self, index: u32) -> Option<&ParameterSet> {
        self.time_steps.get(index as usize)
    }

    /// All time step buckets in index order
    pub fn time_steps(&self) -> &[ParameterSet] {
        &self.time_steps
    }

    /// Returns the bucket index a write to `requested` lands in.
    /// Constants bucket without the empty-name filter, for loading files.
    pub(crate) fn constants_mut(&mut self) -> &mut ParameterSet {
        &mut self.constants
    }

    /// Bucket `time_step_index` (clamped) without the empty-name filter.
    pub(crate) fn time_step_mut(&mut self, time_step_index: u32) -> &mut ParameterSet {
        let index = self.clamp_time_step(time_step_index);
        &mut self.time_steps[index]
    }

    fn clamp_time_step(&mut self, requested: u32) -> usize {
        if self.time_steps.is_empty() {
            tracing::warn!(
                "Time step parameter set on a document without time steps; growing to 1"
            );
            self.time_steps.push(ParameterSet::default());
        }
        let last = self.time_steps.len() - 1;
        let index = (requested as usize).min(last);
        if index != requested as usize {
            tracing::warn!(
                "Time step index {} out of range, clamped to {}",
                requested,
                index
            );
        }
        index
    }
}

/// Element count for a typed slice; unknown element types fall back to the slice length.
fn element_count_for(element_type: ElementType, byte_len: usize, slice_len: usize) -> u64 {
    match element_type.size_of() {
        0 => slice_len as u64,
        size => (byte_len / size) as u64,
    }
}

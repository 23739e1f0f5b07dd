//! Borrowed views and iteration results produced by the reader

use std::borrow::Cow;

use agx_shared::ElementType;

use crate::error::AgxError;
use crate::value::{ParameterValue, decode_slice};

/// Outcome of one cursor step.
///
/// Keeps "no more items" apart from "failure" at the type level.
#[derive(Debug)]
pub enum Next<T> {
    /// An item was read
    Produced(T),
    /// The cursor is exhausted; repeated calls keep returning `End`
    End,
    /// Reading failed; the cursor stays failed until it is reset
    Error(AgxError),
}

impl<T> Next<T> {
    /// Integer status: `1` produced, `0` end, `-1` error.
    pub fn code(&self) -> i32 {
        match self {
            Next::Produced(_) => 1,
            Next::End => 0,
            Next::Error(_) => -1,
        }
    }

    pub fn is_end(&self) -> bool {
        matches!(self, Next::End)
    }

    /// Convert into a `Result` so `?` can be used in read loops.
    pub fn into_result(self) -> Result<Option<T>, AgxError> {
        match self {
            Next::Produced(item) => Ok(Some(item)),
            Next::End => Ok(None),
            Next::Error(err) => Err(err),
        }
    }
}

/// Header of one time step as stored in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeStepInfo {
    /// Index written by the producer
    pub index: u32,
    /// Number of parameter records that follow
    pub param_count: u32,
}

/// One parameter record, borrowing the reader's buffers.
///
/// Valid until the next call that advances the reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamView<'a> {
    pub(crate) name: &'a [u8],
    pub(crate) is_array: bool,
    pub(crate) data_type: ElementType,
    pub(crate) element_count: u64,
    pub(crate) data: &'a [u8],
}

impl<'a> ParamView<'a> {
    /// Raw name bytes (no terminator)
    pub fn name(&self) -> &'a [u8] {
        self.name
    }

    /// Name as text; invalid UTF-8 is replaced
    pub fn name_str(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.name)
    }

    pub fn is_array(&self) -> bool {
        self.is_array
    }

    /// Scalar type or array element type
    pub fn data_type(&self) -> ElementType {
        self.data_type
    }

    /// Element count (1 for scalars)
    pub fn element_count(&self) -> u64 {
        self.element_count
    }

    /// Payload bytes exactly as written, in the producer's byte order
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Decode the payload as host-order `T` values.
    pub fn to_vec<T: bytemuck::AnyBitPattern>(&self) -> Vec<T> {
        decode_slice(self.data)
    }

    /// Copy the record into an owned [`ParameterValue`].
    pub fn to_owned_value(&self) -> ParameterValue {
        ParameterValue::from_raw(
            self.is_array,
            self.data_type,
            self.element_count,
            self.data.to_vec(),
        )
    }
}

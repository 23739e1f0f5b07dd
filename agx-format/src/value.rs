//! Parameter values and parameter sets

use agx_shared::ElementType;
use indexmap::IndexMap;

/// Named parameters of one bucket (constants or a single time step).
///
/// Insertion ordered; overwriting a name keeps its original position.
pub type ParameterSet = IndexMap<String, ParameterValue>;

/// One stored parameter. Owns a private copy of its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterValue {
    /// Single value; `bytes.len() == ty.size_of()`
    Scalar { ty: ElementType, bytes: Vec<u8> },
    /// 1-D array; `bytes.len() == element_count * element_type.size_of()`
    Array {
        element_type: ElementType,
        element_count: u64,
        bytes: Vec<u8>,
    },
}

impl ParameterValue {
    /// Build a scalar, copying exactly `ty.size_of()` bytes from `value`.
    ///
    /// A missing or short `value` is zero-padded, a long one is truncated.
    pub fn scalar(ty: ElementType, value: Option<&[u8]>) -> Self {
        Self::Scalar {
            ty,
            bytes: copy_bytes(value, ty.size_of()),
        }
    }

    /// Build an array of `element_count` elements of `element_type`.
    ///
    /// Copies `element_count * element_type.size_of()` bytes with the same
    /// padding rules as [`ParameterValue::scalar`].
    pub fn array(element_type: ElementType, data: Option<&[u8]>, element_count: u64) -> Self {
        let total = (element_count as usize).saturating_mul(element_type.size_of());
        Self::Array {
            element_type,
            element_count,
            bytes: copy_bytes(data, total),
        }
    }

    /// Build a parameter from bytes read back from a file, without resizing.
    pub(crate) fn from_raw(
        is_array: bool,
        ty: ElementType,
        element_count: u64,
        bytes: Vec<u8>,
    ) -> Self {
        if is_array {
            Self::Array {
                element_type: ty,
                element_count,
                bytes,
            }
        } else {
            Self::Scalar { ty, bytes }
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array { .. })
    }

    /// Scalar type or array element type.
    pub fn data_type(&self) -> ElementType {
        match self {
            Self::Scalar { ty, .. } => *ty,
            Self::Array { element_type, .. } => *element_type,
        }
    }

    /// Number of elements (1 for scalars).
    pub fn element_count(&self) -> u64 {
        match self {
            Self::Scalar { .. } => 1,
            Self::Array { element_count, .. } => *element_count,
        }
    }

    /// Raw payload in the producer's byte order.
    pub fn bytes(&self) -> &[u8] {
        match self {
            Self::Scalar { bytes, .. } | Self::Array { bytes, .. } => bytes,
        }
    }

    /// Decode the payload as a sequence of `T` (host byte order).
    ///
    /// Trailing bytes that do not fill a whole `T` are ignored.
    pub fn to_vec<T: bytemuck::AnyBitPattern>(&self) -> Vec<T> {
        decode_slice(self.bytes())
    }
}

/// Length-checked copy into a fresh buffer of exactly `len` bytes.
fn copy_bytes(src: Option<&[u8]>, len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    if let Some(src) = src {
        let n = src.len().min(len);
        bytes[..n].copy_from_slice(&src[..n]);
    }
    bytes
}

/// Decode unaligned bytes into a vector of `T`.
pub(crate) fn decode_slice<T: bytemuck::AnyBitPattern>(bytes: &[u8]) -> Vec<T> {
    let size = std::mem::size_of::<T>();
    if size == 0 {
        return Vec::new();
    }
    bytes
        .chunks_exact(size)
        .map(bytemuck::pod_read_unaligned::<T>)
        .collect()
}

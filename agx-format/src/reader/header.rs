//! AGXB header parsing
//!
//! The endian marker is checked before the subtype is read: the subtype
//! length can only be interpreted once the byte order is known. A file with
//! a bad marker therefore reports `BadEndianMarker` even when its subtype is
//! also cut short. The version is checked after the marker for the same
//! reason.

use std::io::{Read, Seek};

use agx_shared::{AGX_FORMAT, ElementType, host_is_little_endian};

use crate::error::AgxError;
use crate::io::WireReader;

/// Fixed header fields of an opened AGXB file.
///
/// All integer fields are already converted to host byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgxHeader {
    pub version: u32,
    pub object_type: ElementType,
    pub time_steps: u32,
    pub constant_param_count: u32,
    /// Marker exactly as stored, before any swap
    pub endian_marker: u32,
    pub host_little_endian: bool,
    pub file_little_endian: bool,
    /// True when the file was written on a host of the other byte order
    pub need_byte_swap: bool,
}

impl AgxHeader {
    /// The endian marker as the writer saw it (always `0x01020304` for a valid file)
    pub fn normalized_marker(&self) -> u32 {
        if self.need_byte_swap {
            self.endian_marker.swap_bytes()
        } else {
            self.endian_marker
        }
    }
}

fn truncated_header(err: std::io::Error) -> AgxError {
    AgxError::from_read(err, AgxError::TruncatedHeader)
}

/// Parse the header and subtype, leaving `wire` at the first constant record.
///
/// On success the swap flag of `wire` is set for the rest of the file.
pub(crate) fn parse_header<R: Read + Seek>(
    wire: &mut WireReader<R>,
) -> Result<(AgxHeader, String), AgxError> {
    let mut magic = [0u8; 4];
    wire.read_exact(&mut magic)
        .map_err(|err| AgxError::from_read(err, AgxError::TruncatedMagic))?;
    if &magic != AGX_FORMAT.magic {
        return Err(AgxError::BadMagic);
    }

    // Header words are read raw; the marker decides how to interpret them
    let mut words = [0u32; 5];
    for word in &mut words {
        *word = wire.read_u32_raw().map_err(truncated_header)?;
    }
    let [version, endian_marker, object_type, time_steps, constant_param_count] = words;

    let need_byte_swap = AGX_FORMAT
        .classify_marker(endian_marker)
        .ok_or(AgxError::BadEndianMarker(endian_marker))?;
    let fix = |v: u32| if need_byte_swap { v.swap_bytes() } else { v };

    let version = fix(version);
    if version != AGX_FORMAT.version {
        return Err(AgxError::UnsupportedVersion(version));
    }

    wire.set_swap(need_byte_swap);
    let subtype_len = wire.read_u32().map_err(truncated_header)?;
    let mut subtype = Vec::new();
    wire.read_into(&mut subtype, u64::from(subtype_len))
        .map_err(truncated_header)?;

    let host_little_endian = host_is_little_endian();
    let header = AgxHeader {
        version,
        object_type: ElementType(fix(object_type)),
        time_steps: fix(time_steps),
        constant_param_count: fix(constant_param_count),
        endian_marker,
        host_little_endian,
        file_little_endian: host_little_endian != need_byte_swap,
        need_byte_swap,
    };

    Ok((header, String::from_utf8_lossy(&subtype).into_owned()))
}

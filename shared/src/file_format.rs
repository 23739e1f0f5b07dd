//! File format specification for AGX parameter dumps.
//!
//! This module defines the `FileFormat` struct which serves as the single source of truth
//! for all container constants (file extension, magic bytes, version, endian marker).
//!
//! # Example
//!
//! ```
//! use agx_shared::AGX_FORMAT;
//!
//! assert_eq!(AGX_FORMAT.extension, "agxb");
//! assert_eq!(AGX_FORMAT.magic, b"AGXB");
//! assert_eq!(AGX_FORMAT.endian_marker, 0x0102_0304);
//! ```

/// Container format specification.
///
/// Defines the constants shared by the writer, the reader and the tools.
#[derive(Debug, Clone, Copy)]
pub struct FileFormat {
    /// File extension without dot (e.g., "agxb")
    pub extension: &'static str,

    /// Magic bytes at start of the file (4 bytes)
    pub magic: &'static [u8; 4],

    /// Format version written into every header
    pub version: u32,

    /// Marker written in the writer's native byte order
    pub endian_marker: u32,
}

impl FileFormat {
    /// Create a new format specification.
    pub const fn new(
        extension: &'static str,
        magic: &'static [u8; 4],
        version: u32,
        endian_marker: u32,
    ) -> Self {
        Self {
            extension,
            magic,
            version,
            endian_marker,
        }
    }

    /// Returns `Some(need_swap)` if `raw` is this format's marker in either byte order.
    pub const fn classify_marker(&self, raw: u32) -> Option<bool> {
        if raw == self.endian_marker {
            Some(false)
        } else if raw.swap_bytes() == self.endian_marker {
            Some(true)
        } else {
            None
        }
    }
}

/// AGX binary format specification.
///
/// - File extension: `.agxb`
/// - Magic bytes: `AGXB`
/// - Version: 1
/// - Endian marker: `0x01020304`
pub const AGX_FORMAT: FileFormat = FileFormat::new("agxb", b"AGXB", 1, 0x0102_0304);

/// True when the running host stores integers least-significant byte first.
#[inline]
pub const fn host_is_little_endian() -> bool {
    cfg!(target_endian = "little")
}

/// Human readable byte order label.
pub const fn endian_label(little: bool) -> &'static str {
    if little { "little-endian" } else { "big-endian" }
}

//! AGXB error types

use std::io;
use std::path::PathBuf;

/// Errors produced while writing or reading AGXB files.
///
/// The mutation API of [`crate::AnimationDocument`] never fails, so nothing
/// here describes invalid parameter input.
#[derive(Debug, thiserror::Error)]
pub enum AgxError {
    /// File ends before the four magic bytes
    #[error("File too short to hold the AGXB magic")]
    TruncatedMagic,

    /// First four bytes are not `AGXB`
    #[error("Not an AGXB file (bad magic)")]
    BadMagic,

    /// Endian marker matches neither byte order
    #[error("Bad endian marker: 0x{0:08X}")]
    BadEndianMarker(u32),

    /// Header declares a format version other than 1
    #[error("Unsupported AGXB version: {0}")]
    UnsupportedVersion(u32),

    /// File ended inside the header or subtype string
    #[error("Incomplete AGXB header")]
    TruncatedHeader,

    /// File ended inside a parameter record or time step header
    #[error("Truncated parameter record")]
    TruncatedRecord,

    /// Source or destination file could not be opened
    #[error("Failed to open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A previous iteration call failed; reset the cursor first
    #[error("Reader is in a failed state after an earlier error")]
    Poisoned,

    /// Any other IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl AgxError {
    /// Maps an unexpected EOF to `truncated`, keeps other IO errors as `Io`.
    pub(crate) fn from_read(err: io::Error, truncated: AgxError) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            truncated
        } else {
            AgxError::Io(err)
        }
    }
}

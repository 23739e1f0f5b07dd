//! I/O helper functions for reading and writing binary data
//!
//! Integers are written in the host's native byte order. The reader side
//! tracks its stream position and applies a byte swap to every integer
//! field when the file came from a host of the other endianness.

use std::io::{self, Read, Seek, SeekFrom, Write};

/// Write a single byte
pub(crate) fn write_u8<W: Write>(output: &mut W, val: u8) -> io::Result<()> {
    output.write_all(&[val])
}

/// Write a u32 in native byte order
pub(crate) fn write_u32<W: Write>(output: &mut W, val: u32) -> io::Result<()> {
    output.write_all(&val.to_ne_bytes())
}

/// Write a u64 in native byte order
pub(crate) fn write_u64<W: Write>(output: &mut W, val: u64) -> io::Result<()> {
    output.write_all(&val.to_ne_bytes())
}

/// Write a length-prefixed byte string (u32 length, no terminator)
pub(crate) fn write_lp_bytes<W: Write>(output: &mut W, bytes: &[u8]) -> io::Result<()> {
    write_u32(output, bytes.len() as u32)?;
    output.write_all(bytes)
}

/// Position-tracking reader with optional integer byte swapping.
pub(crate) struct WireReader<R> {
    inner: R,
    pos: u64,
    swap: bool,
}

impl<R: Read + Seek> WireReader<R> {
    pub(crate) fn new(mut inner: R) -> io::Result<Self> {
        let pos = inner.stream_position()?;
        Ok(Self {
            inner,
            pos,
            swap: false,
        })
    }

    /// Enable swapping for all integer fields read from now on
    pub(crate) fn set_swap(&mut self, swap: bool) {
        self.swap = swap;
    }

    pub(crate) fn position(&self) -> u64 {
        self.pos
    }

    /// Move to an absolute offset (no-op if already there)
    pub(crate) fn seek_to(&mut self, offset: u64) -> io::Result<()> {
        if offset != self.pos {
            self.inner.seek(SeekFrom::Start(offset))?;
            self.pos = offset;
        }
        Ok(())
    }

    pub(crate) fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        self.inner.read_exact(buf)?;
        self.pos += buf.len() as u64;
        Ok(())
    }

    pub(crate) fn read_u8(&mut self) -> io::Result<u8> {
        let mut buf = [0u8; 1];
        self.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    /// Read a u32 exactly as stored, ignoring the swap flag
    pub(crate) fn read_u32_raw(&mut self) -> io::Result<u32> {
        let mut buf = [0u8; 4];
        self.read_exact(&mut buf)?;
        Ok(u32::from_ne_bytes(buf))
    }

    pub(crate) fn read_u32(&mut self) -> io::Result<u32> {
        let v = self.read_u32_raw()?;
        Ok(if self.swap { v.swap_bytes() } else { v })
    }

    pub(crate) fn read_u64(&mut self) -> io::Result<u64> {
        let mut buf = [0u8; 8];
        self.read_exact(&mut buf)?;
        let v = u64::from_ne_bytes(buf);
        Ok(if self.swap { v.swap_bytes() } else { v })
    }

    /// Replace `buf` with the next `len` bytes.
    ///
    /// Grows incrementally, so a corrupt length cannot force a huge
    /// allocation before the short read is detected.
    pub(crate) fn read_into(&mut self, buf: &mut Vec<u8>, len: u64) -> io::Result<()> {
        buf.clear();
        let n = (&mut self.inner).take(len).read_to_end(buf)? as u64;
        self.pos += n;
        if n != len {
            return Err(io::ErrorKind::UnexpectedEof.into());
        }
        Ok(())
    }

    /// Consume and discard `len` bytes, failing if the stream ends first
    pub(crate) fn skip(&mut self, len: u64) -> io::Result<()> {
        let n = io::copy(&mut (&mut self.inner).take(len), &mut io::sink())?;
        self.pos += n;
        if n != len {
            return Err(io::ErrorKind::UnexpectedEof.into());
        }
        Ok(())
    }
}

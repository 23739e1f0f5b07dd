//! Streaming AGXB reader
//!
//! [`AgxReader`] parses the header at construction and then exposes two
//! pull-based cursors over the file:
//!
//! - the constants cursor ([`AgxReader::next_constant`])
//! - the time step cursor ([`AgxReader::begin_next_time_step`]) with a nested
//!   parameter cursor for the current step ([`AgxReader::next_time_step_param`])
//!
//! Only the current record is held in memory. Each cursor remembers its own
//! byte offset, so constants and time steps can be iterated in any interleaving.
//!
//! Integer fields are byte-swapped when the file came from a host of the other
//! byte order. Payload bytes are handed out exactly as stored.

mod header;
mod view;

#[cfg(test)]
mod tests;

pub use header::AgxHeader;
pub use view::{Next, ParamView, TimeStepInfo};

use std::fs::File;
use std::io::{self, BufReader, Read, Seek};
use std::path::Path;

use agx_shared::ElementType;

use crate::document::AnimationDocument;
use crate::error::AgxError;
use crate::io::WireReader;

fn truncated_record(err: io::Error) -> AgxError {
    AgxError::from_read(err, AgxError::TruncatedRecord)
}

/// Fixed part of a record; the variable parts live in the reader's buffers.
#[derive(Debug, Clone, Copy)]
struct RecordMeta {
    is_array: bool,
    data_type: ElementType,
    element_count: u64,
}

#[derive(Debug, Default)]
struct ConstantCursor {
    offset: u64,
    remaining: u32,
    failed: bool,
}

#[derive(Debug, Default)]
struct TimeStepCursor {
    /// Next unread byte; `None` until the first step is located
    offset: Option<u64>,
    steps_remaining: u32,
    params_remaining: u32,
    failed: bool,
}

/// Reader session over one AGXB stream.
pub struct AgxReader<R> {
    wire: WireReader<R>,
    header: AgxHeader,
    subtype: String,
    /// Offset of the first constant record
    records_start: u64,
    /// Offset of the first time step, found by skipping the constants once
    steps_start: Option<u64>,
    constants: ConstantCursor,
    steps: TimeStepCursor,
    name_buf: Vec<u8>,
    data_buf: Vec<u8>,
}

impl AgxReader<BufReader<File>> {
    /// Open `path` and parse its header.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AgxError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| AgxError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let reader = Self::new(BufReader::new(file))?;

        tracing::debug!(
            "Opened {:?}: {} constants, {} time steps, swap={}",
            path,
            reader.header.constant_param_count,
            reader.header.time_steps,
            reader.header.need_byte_swap
        );
        Ok(reader)
    }
}

impl<R: Read + Seek> AgxReader<R> {
    /// Parse the header from the current position of `inner`.
    ///
    /// Structural problems (magic, endian marker, version, short header) fail
    /// here; no partially usable reader is returned.
    pub fn new(inner: R) -> Result<Self, AgxError> {
        let mut wire = WireReader::new(inner)?;
        let (header, subtype) = header::parse_header(&mut wire)?;
        let records_start = wire.position();

        let mut reader = Self {
            wire,
            header,
            subtype,
            records_start,
            steps_start: (header.constant_param_count == 0).then_some(records_start),
            constants: ConstantCursor::default(),
            steps: TimeStepCursor::default(),
            name_buf: Vec::new(),
            data_buf: Vec::new(),
        };
        reader.reset_constants();
        reader.reset_time_steps();
        Ok(reader)
    }

    pub fn header(&self) -> &AgxHeader {
        &self.header
    }

    /// Subtype string from the header (lossy UTF-8)
    pub fn subtype(&self) -> &str {
        &self.subtype
    }

    // ========================================================================
    // Constants
    // ========================================================================

    /// Rewind the constants cursor and clear a previous error.
    pub fn reset_constants(&mut self) {
        self.constants = ConstantCursor {
            offset: self.records_start,
            remaining: self.header.constant_param_count,
            failed: false,
        };
    }

    /// Read the next constant parameter.
    pub fn next_constant(&mut self) -> Next<ParamView<'_>> {
        if self.constants.failed {
            return Next::Error(AgxError::Poisoned);
        }
        if self.constants.remaining == 0 {
            return Next::End;
        }

        match self.read_record_at(self.constants.offset) {
            Ok((meta, offset)) => {
                self.constants.offset = offset;
                self.constants.remaining -= 1;
                if self.constants.remaining == 0 {
                    self.steps_start.get_or_insert(offset);
                }
                Next::Produced(self.view(meta))
            }
            Err(err) => {
                self.constants.failed = true;
                Next::Error(err)
            }
        }
    }

    // ========================================================================
    // Time steps
    // ========================================================================

    /// Rewind to before the first time step and clear a previous error.
    pub fn reset_time_steps(&mut self) {
        self.steps = TimeStepCursor {
            offset: None,
            steps_remaining: self.header.time_steps,
            params_remaining: 0,
            failed: false,
        };
    }

    /// Advance to the next time step.
    ///
    /// Unread parameters of the current step are skipped first, so this is
    /// safe to call at any point.
    pub fn begin_next_time_step(&mut self) -> Next<TimeStepInfo> {
        if self.steps.failed {
            return Next::Error(AgxError::Poisoned);
        }
        match self.advance_time_step() {
            Ok(Some(info)) => Next::Produced(info),
            Ok(None) => Next::End,
            Err(err) => {
                self.steps.failed = true;
                Next::Error(err)
            }
        }
    }

    /// Read the next parameter of the current time step.
    ///
    /// Returns `End` when the step is exhausted or no step has been begun.
    pub fn next_time_step_param(&mut self) -> Next<ParamView<'_>> {
        if self.steps.failed {
            return Next::Error(AgxError::Poisoned);
        }
        if self.steps.params_remaining == 0 {
            return Next::End;
        }

        let result = self
            .step_offset()
            .and_then(|offset| self.read_record_at(offset));
        match result {
            Ok((meta, offset)) => {
                self.steps.offset = Some(offset);
                self.steps.params_remaining -= 1;
                Next::Produced(self.view(meta))
            }
            Err(err) => {
                self.steps.failed = true;
                Next::Error(err)
            }
        }
    }

    /// Skip the unread parameters of the current time step.
    pub fn skip_remaining_time_step(&mut self) -> Result<(), AgxError> {
        if self.steps.failed {
            return Err(AgxError::Poisoned);
        }
        if let Err(err) = self.skip_step_params() {
            self.steps.failed = true;
            return Err(err);
        }
        Ok(())
    }

    // ========================================================================
    // Whole-file loading
    // ========================================================================

    /// Drain the file into an owned document.
    ///
    /// Both cursors are reset first and left exhausted afterwards. Records
    /// with an empty name are kept, unlike the document setters.
    pub fn read_document(&mut self) -> Result<AnimationDocument, AgxError> {
        let mut doc = AnimationDocument::new();
        doc.set_object_type(self.header.object_type);
        doc.set_subtype(self.subtype.clone());
        doc.set_time_step_count(self.header.time_steps);

        self.reset_constants();
        while let Some(param) = self.next_constant().into_result()? {
            doc.constants_mut()
                .insert(param.name_str().into_owned(), param.to_owned_value());
        }

        self.reset_time_steps();
        while let Some(step) = self.begin_next_time_step().into_result()? {
            while let Some(param) = self.next_time_step_param().into_result()? {
                doc.time_step_mut(step.index)
                    .insert(param.name_str().into_owned(), param.to_owned_value());
            }
        }

        Ok(doc)
    }

    // ========================================================================
    // Record plumbing
    // ========================================================================

    fn view(&self, meta: RecordMeta) -> ParamView<'_> {
        ParamView {
            name: &self.name_buf,
            is_array: meta.is_array,
            data_type: meta.data_type,
            element_count: meta.element_count,
            data: &self.data_buf,
        }
    }

    /// Read one record starting at `offset`; returns it with the offset after it.
    fn read_record_at(&mut self, offset: u64) -> Result<(RecordMeta, u64), AgxError> {
        self.wire.seek_to(offset)?;
        let meta = self.read_record()?;
        Ok((meta, self.wire.position()))
    }

    fn read_record(&mut self) -> Result<RecordMeta, AgxError> {
        let wire = &mut self.wire;

        let name_len = wire.read_u32().map_err(truncated_record)?;
        wire.read_into(&mut self.name_buf, u64::from(name_len))
            .map_err(truncated_record)?;

        let is_array = wire.read_u8().map_err(truncated_record)? != 0;
        let data_type = ElementType(wire.read_u32().map_err(truncated_record)?);
        let (element_count, byte_len) = if is_array {
            let count = wire.read_u64().map_err(truncated_record)?;
            let bytes = wire.read_u64().map_err(truncated_record)?;
            (count, bytes)
        } else {
            (1, u64::from(wire.read_u32().map_err(truncated_record)?))
        };
        wire.read_into(&mut self.data_buf, byte_len)
            .map_err(truncated_record)?;

        let expected = (data_type.size_of() as u64).saturating_mul(element_count);
        if data_type.is_known() && expected != byte_len {
            tracing::debug!(
                "Parameter {:?}: {} payload bytes, {} expected for {}",
                String::from_utf8_lossy(&self.name_buf),
                byte_len,
                expected,
                data_type
            );
        }

        Ok(RecordMeta {
            is_array,
            data_type,
            element_count,
        })
    }

    /// Skip one record at the current position without buffering it.
    fn skip_record(&mut self) -> Result<(), AgxError> {
        let wire = &mut self.wire;

        let name_len = wire.read_u32().map_err(truncated_record)?;
        wire.skip(u64::from(name_len)).map_err(truncated_record)?;

        let is_array = wire.read_u8().map_err(truncated_record)? != 0;
        wire.read_u32().map_err(truncated_record)?;
        let byte_len = if is_array {
            wire.read_u64().map_err(truncated_record)?;
            wire.read_u64().map_err(truncated_record)?
        } else {
            u64::from(wire.read_u32().map_err(truncated_record)?)
        };
        wire.skip(byte_len).map_err(truncated_record)
    }

    /// Offset of the first time step header.
    fn time_steps_start(&mut self) -> Result<u64, AgxError> {
        if let Some(start) = self.steps_start {
            return Ok(start);
        }
        self.wire.seek_to(self.records_start)?;
        for _ in 0..self.header.constant_param_count {
            self.skip_record()?;
        }
        let start = self.wire.position();
        self.steps_start = Some(start);
        Ok(start)
    }

    fn step_offset(&mut self) -> Result<u64, AgxError> {
        match self.steps.offset {
            Some(offset) => Ok(offset),
            None => {
                let start = self.time_steps_start()?;
                self.steps.offset = Some(start);
                Ok(start)
            }
        }
    }

    fn skip_step_params(&mut self) -> Result<(), AgxError> {
        if self.steps.params_remaining == 0 {
            return Ok(());
        }
        let offset = self.step_offset()?;
        self.wire.seek_to(offset)?;
        while self.steps.params_remaining > 0 {
            self.skip_record()?;
            self.steps.params_remaining -= 1;
            self.steps.offset = Some(self.wire.position());
        }
        Ok(())
    }

    fn advance_time_step(&mut self) -> Result<Option<TimeStepInfo>, AgxError> {
        self.skip_step_params()?;
        if self.steps.steps_remaining == 0 {
            return Ok(None);
        }

        let offset = self.step_offset()?;
        self.wire.seek_to(offset)?;
        let index = self.wire.read_u32().map_err(truncated_record)?;
        let param_count = self.wire.read_u32().map_err(truncated_record)?;

        self.steps.offset = Some(self.wire.position());
        self.steps.steps_remaining -= 1;
        self.steps.params_remaining = param_count;
        Ok(Some(TimeStepInfo { index, param_count }))
    }
}

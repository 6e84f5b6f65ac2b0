//! Bounded byte source
//!
//! [`ByteSource`] wraps a borrowed seekable reader for the duration of a
//! single inspection. It knows the total length of the content and enforces
//! a read budget: the sum of all bytes read through it can never exceed the
//! budget the caller declared, no matter what lengths the container claims.

use log::debug;
use std::io::SeekFrom;

use crate::format::errors::{InspectionError, InspectionResult};
use crate::io::seekable::{stream_length, SeekableReader};

/// A seekable, bounded-read view over file content
pub struct ByteSource<'a> {
    /// Borrowed reader; never retained past the call that created the source
    reader: &'a mut dyn SeekableReader,
    /// Total length of the content
    len: u64,
    /// Maximum number of bytes that may be read
    budget: u64,
    /// Bytes read so far
    consumed: u64,
}

impl<'a> ByteSource<'a> {
    /// Creates a byte source, measuring the reader's length
    ///
    /// # Arguments
    /// * `reader` - The reader to inspect
    /// * `budget` - Maximum number of bytes that may be read
    pub fn new(reader: &'a mut dyn SeekableReader, budget: u64) -> InspectionResult<Self> {
        let len = stream_length(reader)?;
        Ok(Self::with_length(reader, len, budget))
    }

    /// Creates a byte source when the length is already known
    pub fn with_length(reader: &'a mut dyn SeekableReader, len: u64, budget: u64) -> Self {
        ByteSource {
            reader,
            len,
            budget,
            consumed: 0,
        }
    }

    /// Total length of the content
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Whether the content is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bytes read so far
    pub fn bytes_read(&self) -> u64 {
        self.consumed
    }

    /// Bytes that may still be read
    pub fn remaining_budget(&self) -> u64 {
        self.budget.saturating_sub(self.consumed)
    }

    /// Whether a read of `count` bytes fits in the remaining budget
    pub fn can_read(&self, count: usize) -> bool {
        count as u64 <= self.remaining_budget()
    }

    /// Reads up to `buf.len()` bytes starting at `offset`
    ///
    /// Returns the number of bytes read, which is short when the content ends
    /// first. A read that would exceed the budget fails with `Unreadable`:
    /// the content may be fine, it was just not read.
    pub fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> InspectionResult<usize> {
        if !self.can_read(buf.len()) {
            return Err(InspectionError::Unreadable(format!(
                "read budget of {} bytes exhausted at offset {}",
                self.budget, offset
            )));
        }
        if offset >= self.len || buf.is_empty() {
            return Ok(0);
        }

        let available = (self.len - offset).min(buf.len() as u64) as usize;
        let target = &mut buf[..available];
        self.reader.seek(SeekFrom::Start(offset))?;

        let mut filled = 0;
        while filled < target.len() {
            let n = self.reader.read(&mut target[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }

        self.consumed += filled as u64;
        Ok(filled)
    }

    /// Reads the first `count` bytes (or fewer if the content is shorter)
    pub fn read_prefix(&mut self, count: usize) -> InspectionResult<Vec<u8>> {
        let mut buf = vec![0u8; count.min(self.len as usize)];
        let n = self.read_at(0, &mut buf)?;
        buf.truncate(n);
        debug!("Read {} prefix bytes of {}", n, self.len);
        Ok(buf)
    }

    /// Reads exactly `buf.len()` bytes at `offset`
    ///
    /// Fails with `TooSmall` when the content ends before the buffer is full.
    pub fn read_exact_at(&mut self, offset: u64, buf: &mut [u8]) -> InspectionResult<()> {
        let n = self.read_at(offset, buf)?;
        if n < buf.len() {
            return Err(InspectionError::TooSmall {
                needed: offset + buf.len() as u64,
                actual: self.len,
            });
        }
        Ok(())
    }
}

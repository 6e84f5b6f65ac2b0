//! Seekable reader trait
//!
//! Combines `Read` and `Seek` so the inspector can work over files,
//! in-memory cursors, or anything else a caller hands in.

use std::io::{self, Read, Seek, SeekFrom};

/// Trait for readers that can both read and seek
pub trait SeekableReader: Read + Seek + Send + Sync {}

// Blanket implementation for any type that implements the required traits
impl<T: Read + Seek + Send + Sync> SeekableReader for T {}

/// Measures the total length of a seekable stream
///
/// The reader's position is restored before returning.
pub fn stream_length(reader: &mut dyn SeekableReader) -> io::Result<u64> {
    let current_position = reader.stream_position()?;
    let length = reader.seek(SeekFrom::End(0))?;
    reader.seek(SeekFrom::Start(current_position))?;
    Ok(length)
}

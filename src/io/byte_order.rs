//! Byte order handling for header fields
//!
//! Image containers disagree on endianness: PNG and JPEG store multi-byte
//! fields big-endian, GIF, BMP and WEBP little-endian. Parsers pick a
//! strategy from [`ByteOrder`] and decode fields out of header buffers with
//! bounds-checked reads, so a short buffer yields `None` instead of a panic.

use byteorder::{BigEndian, ByteOrder as _, LittleEndian};

/// Represents the byte order of a container's header fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Little-endian byte order (GIF, BMP, RIFF)
    LittleEndian,
    /// Big-endian byte order (PNG, JPEG)
    BigEndian,
}

impl ByteOrder {
    /// Returns a string representation of this byte order
    pub fn name(&self) -> &'static str {
        match self {
            ByteOrder::LittleEndian => "Little Endian",
            ByteOrder::BigEndian => "Big Endian",
        }
    }

    /// Returns the handler for this byte order
    pub fn handler(&self) -> &'static dyn ByteOrderHandler {
        match self {
            ByteOrder::LittleEndian => &LittleEndianHandler,
            ByteOrder::BigEndian => &BigEndianHandler,
        }
    }
}

/// Trait for byte order handling strategies
///
/// Every read takes a buffer and an offset and returns `None` when the field
/// would run past the end of the buffer.
pub trait ByteOrderHandler: Send + Sync {
    /// Read a u16 value
    fn read_u16(&self, buf: &[u8], offset: usize) -> Option<u16>;

    /// Read a 24-bit value into a u32
    fn read_u24(&self, buf: &[u8], offset: usize) -> Option<u32>;

    /// Read a u32 value
    fn read_u32(&self, buf: &[u8], offset: usize) -> Option<u32>;

    /// Read an i32 value
    fn read_i32(&self, buf: &[u8], offset: usize) -> Option<i32>;
}

fn field(buf: &[u8], offset: usize, len: usize) -> Option<&[u8]> {
    let end = offset.checked_add(len)?;
    buf.get(offset..end)
}

/// Little-endian byte order handler
pub struct LittleEndianHandler;

impl ByteOrderHandler for LittleEndianHandler {
    fn read_u16(&self, buf: &[u8], offset: usize) -> Option<u16> {
        field(buf, offset, 2).map(LittleEndian::read_u16)
    }

    fn read_u24(&self, buf: &[u8], offset: usize) -> Option<u32> {
        field(buf, offset, 3).map(LittleEndian::read_u24)
    }

    fn read_u32(&self, buf: &[u8], offset: usize) -> Option<u32> {
        field(buf, offset, 4).map(LittleEndian::read_u32)
    }

    fn read_i32(&self, buf: &[u8], offset: usize) -> Option<i32> {
        field(buf, offset, 4).map(LittleEndian::read_i32)
    }
}

/// Big-endian byte order handler
pub struct BigEndianHandler;

impl ByteOrderHandler for BigEndianHandler {
    fn read_u16(&self, buf: &[u8], offset: usize) -> Option<u16> {
        field(buf, offset, 2).map(BigEndian::read_u16)
    }

    fn read_u24(&self, buf: &[u8], offset: usize) -> Option<u32> {
        field(buf, offset, 3).map(BigEndian::read_u24)
    }

    fn read_u32(&self, buf: &[u8], offset: usize) -> Option<u32> {
        field(buf, offset, 4).map(BigEndian::read_u32)
    }

    fn read_i32(&self, buf: &[u8], offset: usize) -> Option<i32> {
        field(buf, offset, 4).map(BigEndian::read_i32)
    }
}

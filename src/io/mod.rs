//! I/O utilities for bounded inspection
//!
//! This module provides the seekable reader abstraction, the budgeted
//! byte source the parsers read through, and endian-aware field decoding.

pub mod seekable;
pub mod byte_order;
pub mod byte_source;

pub use byte_source::ByteSource;

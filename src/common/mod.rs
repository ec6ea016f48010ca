//! Utilities shared by the record codecs.

pub mod binary;

pub use binary::{BinaryError, BinaryResult, ByteCursor, ByteWriter};

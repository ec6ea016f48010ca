//! biffstream - A lossless codec for BIFF8 record streams
//!
//! This library reads the record stream of legacy Excel workbooks (the
//! `Workbook` stream inside an `.xls` OLE2 container) into an ordered list of
//! records and writes it back byte-for-byte.
//!
//! # Features
//!
//! - **Lossless round trip**: unknown records are kept as opaque payloads and
//!   CONTINUE splits are reproduced exactly
//! - **Typed records**: BOF, EOF, CODEPAGE, DATE1904, BOUNDSHEET8, DIMENSIONS,
//!   custom view brackets and HEADERFOOTER
//! - **View scoping**: resolve which custom view a HEADERFOOTER record
//!   belongs to
//! - **Parallel decoding**: decode many independent streams with rayon
//!   (`parallel` feature, on by default)
//!
//! # Example - Round trip
//!
//! ```
//! use biffstream::RecordStream;
//!
//! # fn main() -> Result<(), biffstream::BiffError> {
//! let bytes = [
//!     0x09, 0x08, 0x08, 0x00, 0x00, 0x06, 0x10, 0x00, 0xBB, 0x0D, 0xCC, 0x07, // BOF
//!     0x99, 0x7F, 0x03, 0x00, 0x01, 0x02, 0x03, // unknown record
//!     0x0A, 0x00, 0x00, 0x00, // EOF
//! ];
//!
//! let stream = RecordStream::decode_all(&bytes)?;
//! assert_eq!(stream.len(), 3);
//! assert_eq!(stream.encode_all()?, bytes);
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Editing a stream
//!
//! ```
//! use biffstream::{BiffRecord, BoundSheetRecord, Record, RecordStream, consts};
//!
//! # fn main() -> Result<(), biffstream::BiffError> {
//! let mut stream = RecordStream::new();
//! stream.push(Record::Bof(biffstream::BofRecord::biff8(consts::BOF_WORKBOOK_GLOBALS)));
//! stream.push(Record::BoundSheet(BoundSheetRecord::new(0, "Sheet1")?));
//! stream.push(Record::Eof(biffstream::EofRecord));
//!
//! let bytes = stream.encode_all()?;
//! let decoded = RecordStream::decode_all(&bytes)?;
//! let sheet = decoded.get(1).and_then(Record::as_bound_sheet).unwrap();
//! assert_eq!(sheet.name(), "Sheet1");
//! assert_eq!(sheet.sid(), consts::BOUNDSHEET);
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`biff`]: framing, the record registry, typed records and streams
//! - [`common`]: little-endian byte cursor and writer

pub mod biff;
pub mod common;

pub use biff::{
    BiffError, BiffRecord, BiffResult, BofRecord, BoundSheetRecord, CodecOptions, EofRecord,
    OpaqueRecord, Record, RecordStream, ViewScope, consts,
};

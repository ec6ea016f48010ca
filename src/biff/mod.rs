//! BIFF8 record stream codec.
//!
//! The workbook stream of a legacy `.xls` file is a flat sequence of
//! variable-length records. This module turns such a byte stream into an
//! ordered [`RecordStream`] and back.
//!
//! # Architecture
//!
//! - [`frame`]: physical envelopes (sid + length + payload) and the merging
//!   of CONTINUE envelopes into one logical payload
//! - [`registry`]: sid to decoder lookup; unknown sids become [`OpaqueRecord`]s
//! - [`records`]: the typed records and the [`Record`] enum
//! - [`stream`]: whole-stream decode/encode and view scoping
//!
//! # Example
//!
//! ```
//! use biffstream::biff::{BiffRecord, Record, RecordStream, consts};
//!
//! # fn main() -> Result<(), biffstream::biff::BiffError> {
//! let bytes = [
//!     0x42, 0x00, 0x02, 0x00, 0xB0, 0x04, // CODEPAGE 1200
//!     0xFC, 0x00, 0x01, 0x00, 0x07, // SST, split ...
//!     0x3C, 0x00, 0x01, 0x00, 0x08, // ... over a CONTINUE
//!     0x0A, 0x00, 0x00, 0x00, // EOF
//! ];
//!
//! let stream = RecordStream::decode_all(&bytes)?;
//! assert_eq!(stream.len(), 3);
//! assert!(matches!(stream.get(0), Some(Record::Codepage(_))));
//!
//! let sst = stream.get(1).and_then(Record::as_opaque).unwrap();
//! assert_eq!(sst.sid(), consts::SST);
//! assert_eq!(sst.raw_data(), &[0x07, 0x08]);
//!
//! // Unmodified streams encode back to the same bytes.
//! assert_eq!(stream.encode_all()?, bytes);
//! # Ok(())
//! # }
//! ```

pub mod consts;
pub mod error;
pub mod frame;
pub mod opaque;
pub mod options;
pub mod records;
pub mod registry;
pub mod stream;

pub use consts::record_name;
pub use error::{BiffError, BiffResult};
pub use frame::{FrameReader, LogicalRecord, SegmentLayout};
pub use opaque::{BLANK_GUID, Guid, OpaqueRecord};
pub use options::CodecOptions;
pub use records::{
    BiffRecord, BofRecord, BoundSheetRecord, CodepageRecord, Date1904Record, DimensionsRecord,
    EofRecord, HeaderFooterRecord, Record, SheetType, SheetVisibility, UserSViewBeginRecord,
    UserSViewEndRecord,
};
pub use registry::{decode_record, decode_record_with, is_registered};
pub use stream::{RecordStream, ViewScope, decode_many, encode_records};

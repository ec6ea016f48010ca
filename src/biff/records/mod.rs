//! Typed BIFF8 records.
//!
//! [`Record`] is a closed set: one variant per record type the codec
//! understands, plus [`Record::Opaque`] for everything else. All variants
//! implement [`BiffRecord`], which is all the stream needs to write them back.

use std::borrow::Cow;
use std::fmt;

use crate::biff::consts::record_name;
use crate::biff::opaque::OpaqueRecord;
use crate::common::binary::ByteWriter;

mod bof;
mod sheet;
mod view;
mod workbook;

pub use bof::BofRecord;
pub use sheet::DimensionsRecord;
pub use view::{HeaderFooterRecord, UserSViewBeginRecord, UserSViewEndRecord};
pub use workbook::{
    BoundSheetRecord, CodepageRecord, Date1904Record, EofRecord, SheetType, SheetVisibility,
};

/// Capabilities shared by every record.
pub trait BiffRecord {
    /// Record type identifier
    fn sid(&self) -> u16;

    /// Length of the logical payload in bytes, excluding framing
    fn data_size(&self) -> usize;

    /// Write the logical payload (no header, no continuation framing)
    fn serialize(&self, out: &mut ByteWriter);

    /// The logical payload as bytes.
    fn payload(&self) -> Cow<'_, [u8]> {
        let mut out = ByteWriter::with_capacity(self.data_size());
        self.serialize(&mut out);
        Cow::Owned(out.into_vec())
    }
}

/// A decoded record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Bof(BofRecord),
    Eof(EofRecord),
    Codepage(CodepageRecord),
    Date1904(Date1904Record),
    BoundSheet(BoundSheetRecord),
    Dimensions(DimensionsRecord),
    UserSViewBegin(UserSViewBeginRecord),
    UserSViewEnd(UserSViewEndRecord),
    HeaderFooter(HeaderFooterRecord),
    /// Any record without a typed decoder
    Opaque(OpaqueRecord),
}

macro_rules! each_variant {
    ($value:expr, $inner:ident => $body:expr) => {
        match $value {
            Record::Bof($inner) => $body,
            Record::Eof($inner) => $body,
            Record::Codepage($inner) => $body,
            Record::Date1904($inner) => $body,
            Record::BoundSheet($inner) => $body,
            Record::Dimensions($inner) => $body,
            Record::UserSViewBegin($inner) => $body,
            Record::UserSViewEnd($inner) => $body,
            Record::HeaderFooter($inner) => $body,
            Record::Opaque($inner) => $body,
        }
    };
}

impl BiffRecord for Record {
    fn sid(&self) -> u16 {
        each_variant!(self, r => r.sid())
    }

    fn data_size(&self) -> usize {
        each_variant!(self, r => r.data_size())
    }

    fn serialize(&self, out: &mut ByteWriter) {
        each_variant!(self, r => r.serialize(out))
    }

    fn payload(&self) -> Cow<'_, [u8]> {
        each_variant!(self, r => r.payload())
    }
}

impl Record {
    /// Deep copy of this record; the copy owns a fresh payload buffer.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Display name of the record type, if it is a well-known one.
    pub fn name(&self) -> Option<&'static str> {
        record_name(self.sid())
    }

    pub fn is_opaque(&self) -> bool {
        matches!(self, Record::Opaque(_))
    }

    pub fn as_opaque(&self) -> Option<&OpaqueRecord> {
        match self {
            Record::Opaque(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_header_footer(&self) -> Option<&HeaderFooterRecord> {
        match self {
            Record::HeaderFooter(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_user_sview_begin(&self) -> Option<&UserSViewBeginRecord> {
        match self {
            Record::UserSViewBegin(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_bof(&self) -> Option<&BofRecord> {
        match self {
            Record::Bof(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_bound_sheet(&self) -> Option<&BoundSheetRecord> {
        match self {
            Record::BoundSheet(r) => Some(r),
            _ => None,
        }
    }
}

impl From<OpaqueRecord> for Record {
    fn from(record: OpaqueRecord) -> Self {
        Record::Opaque(record)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Record::Opaque(r) => fmt::Display::fmt(r, f),
            Record::HeaderFooter(r) => fmt::Display::fmt(r, f),
            other => {
                let name = other.name().unwrap_or("UNKNOWN");
                writeln!(f, "[{}] (0x{:04X})", name, other.sid())?;
                each_variant!(other, r => writeln!(f, "  {:?}", r))?;
                writeln!(f, "[/{}]", name)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biff::consts;

    #[test]
    fn test_record_delegates_to_variant() {
        let record = Record::Codepage(CodepageRecord { codepage: 1200 });
        assert_eq!(record.sid(), consts::CODEPAGE);
        assert_eq!(record.data_size(), 2);
        assert_eq!(record.payload().as_ref(), &[0xB0, 0x04]);
        assert_eq!(record.name(), Some("CODEPAGE"));
        assert!(!record.is_opaque());
    }

    #[test]
    fn test_opaque_payload_is_borrowed() {
        let record = Record::from(OpaqueRecord::new(0x7777, vec![1, 2, 3]));
        assert!(matches!(record.payload(), Cow::Borrowed(_)));
        assert!(record.is_opaque());
        assert_eq!(record.as_opaque().map(|r| r.sid()), Some(0x7777));
        assert!(record.as_header_footer().is_none());
    }

    #[test]
    fn test_copy_is_deep() {
        let original = Record::from(OpaqueRecord::new(0x7777, vec![1, 2, 3]));
        let mut copy = original.copy();
        if let Record::Opaque(r) = &mut copy {
            r.raw_data_mut().push(4);
        }
        assert_eq!(original.data_size(), 3);
        assert_eq!(copy.data_size(), 4);
        assert_ne!(original, copy);
    }

    #[test]
    fn test_display_typed() {
        let record = Record::Eof(EofRecord);
        assert_eq!(record.to_string(), "[EOF] (0x000A)\n  EofRecord\n[/EOF]\n");
    }
}

//! BOF (Beginning of File) record, sid 0x0809.

use crate::biff::consts::{self, BIFF8_VERSION};
use crate::biff::error::BiffResult;
use crate::biff::records::BiffRecord;
use crate::common::binary::{ByteCursor, ByteWriter};

/// BOF record: opens every substream (globals, worksheet, chart, macro).
///
/// BIFF8 writes 16 bytes. Older writers stop after the year field or after
/// the history flags, so the trailing fields are optional and only written
/// back when they were present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BofRecord {
    pub version: u16,
    /// Substream type (`BOF_WORKBOOK_GLOBALS`, `BOF_WORKSHEET`, ...)
    pub substream_type: u16,
    pub build: u16,
    pub year: u16,
    pub history_flags: Option<u32>,
    pub lowest_version: Option<u32>,
}

impl BofRecord {
    /// BIFF8 BOF for the given substream type, with the build values Excel
    /// 97-2003 and Apache POI write.
    pub fn biff8(substream_type: u16) -> Self {
        BofRecord {
            version: BIFF8_VERSION,
            substream_type,
            build: 0x0DBB,
            year: 0x07CC,
            history_flags: Some(0x0000_0041),
            lowest_version: Some(0x0000_0006),
        }
    }

    pub fn read(cursor: &mut ByteCursor<'_>) -> BiffResult<Self> {
        let version = cursor.read_u16()?;
        let substream_type = cursor.read_u16()?;
        let build = cursor.read_u16()?;
        let year = cursor.read_u16()?;
        let history_flags = if cursor.remaining() >= 4 {
            Some(cursor.read_u32()?)
        } else {
            None
        };
        let lowest_version = if history_flags.is_some() && cursor.remaining() >= 4 {
            Some(cursor.read_u32()?)
        } else {
            None
        };

        Ok(BofRecord {
            version,
            substream_type,
            build,
            year,
            history_flags,
            lowest_version,
        })
    }

    pub fn is_workbook_globals(&self) -> bool {
        self.substream_type == consts::BOF_WORKBOOK_GLOBALS
    }

    pub fn is_worksheet(&self) -> bool {
        self.substream_type == consts::BOF_WORKSHEET
    }
}

impl BiffRecord for BofRecord {
    fn sid(&self) -> u16 {
        consts::BOF
    }

    fn data_size(&self) -> usize {
        match (self.history_flags, self.lowest_version) {
            (Some(_), Some(_)) => 16,
            (Some(_), None) => 12,
            _ => 8,
        }
    }

    fn serialize(&self, out: &mut ByteWriter) {
        out.write_u16(self.version);
        out.write_u16(self.substream_type);
        out.write_u16(self.build);
        out.write_u16(self.year);
        if let Some(flags) = self.history_flags {
            out.write_u32(flags);
            if let Some(lowest) = self.lowest_version {
                out.write_u32(lowest);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_biff8_bof() {
        let bof = BofRecord::biff8(consts::BOF_WORKSHEET);
        assert!(bof.is_worksheet());
        assert!(!bof.is_workbook_globals());

        let bytes = bof.payload();
        assert_eq!(bytes.len(), 16);
        assert_eq!(&bytes[..4], &[0x00, 0x06, 0x10, 0x00]);

        let decoded = BofRecord::read(&mut ByteCursor::new(&bytes)).unwrap();
        assert_eq!(decoded, bof);
    }

    #[test]
    fn test_short_bof_keeps_its_length() {
        let data = [0x00, 0x05, 0x05, 0x00, 0x01, 0x00, 0x02, 0x00];
        let mut cursor = ByteCursor::new(&data);
        let bof = BofRecord::read(&mut cursor).unwrap();
        assert!(cursor.is_empty());
        assert_eq!(bof.history_flags, None);
        assert_eq!(bof.data_size(), 8);
        assert_eq!(bof.payload().as_ref(), &data);
    }

    #[test]
    fn test_twelve_byte_bof() {
        let data = [0x00, 0x06, 0x10, 0x00, 0, 0, 0, 0, 0x41, 0, 0, 0];
        let bof = BofRecord::read(&mut ByteCursor::new(&data)).unwrap();
        assert_eq!(bof.history_flags, Some(0x41));
        assert_eq!(bof.lowest_version, None);
        assert_eq!(bof.payload().as_ref(), &data);
    }

    #[test]
    fn test_too_short_bof_fails() {
        assert!(BofRecord::read(&mut ByteCursor::new(&[0x00, 0x06, 0x10])).is_err());
    }
}

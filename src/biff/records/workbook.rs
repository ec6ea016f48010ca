//! Workbook globals records: EOF, CODEPAGE, DATE1904 and BOUNDSHEET8.

use crate::biff::consts;
use crate::biff::error::{BiffError, BiffResult};
use crate::biff::records::BiffRecord;
use crate::common::binary::{ByteCursor, ByteWriter, decode_compressed, decode_utf16le};

/// EOF record, sid 0x000A. Closes a substream; has no payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EofRecord;

impl EofRecord {
    pub fn read(_cursor: &mut ByteCursor<'_>) -> BiffResult<Self> {
        Ok(EofRecord)
    }
}

impl BiffRecord for EofRecord {
    fn sid(&self) -> u16 {
        consts::EOF
    }

    fn data_size(&self) -> usize {
        0
    }

    fn serialize(&self, _out: &mut ByteWriter) {}
}

/// CODEPAGE record, sid 0x0042. BIFF8 files use 1200 (UTF-16LE).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodepageRecord {
    pub codepage: u16,
}

impl CodepageRecord {
    pub fn read(cursor: &mut ByteCursor<'_>) -> BiffResult<Self> {
        Ok(CodepageRecord {
            codepage: cursor.read_u16()?,
        })
    }
}

impl BiffRecord for CodepageRecord {
    fn sid(&self) -> u16 {
        consts::CODEPAGE
    }

    fn data_size(&self) -> usize {
        2
    }

    fn serialize(&self, out: &mut ByteWriter) {
        out.write_u16(self.codepage);
    }
}

/// DATE1904 record, sid 0x0022.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Date1904Record {
    /// Raw flag; 1 selects the 1904 date system
    pub value: u16,
}

impl Date1904Record {
    pub fn read(cursor: &mut ByteCursor<'_>) -> BiffResult<Self> {
        Ok(Date1904Record {
            value: cursor.read_u16()?,
        })
    }

    pub fn is_1904(&self) -> bool {
        self.value == 1
    }
}

impl BiffRecord for Date1904Record {
    fn sid(&self) -> u16 {
        consts::DATE1904
    }

    fn data_size(&self) -> usize {
        2
    }

    fn serialize(&self, out: &mut ByteWriter) {
        out.write_u16(self.value);
    }
}

/// Sheet visibility types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetVisibility {
    Visible = 0x00,
    Hidden = 0x01,
    VeryHidden = 0x02,
}

/// Sheet types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetType {
    WorkSheet,
    MacroSheet,
    ChartSheet,
    VBModule,
}

/// BOUNDSHEET8 record, sid 0x0085: one per sheet in the workbook globals.
///
/// The state and type bytes are kept raw so reserved bits survive a round
/// trip; [`visibility`](Self::visibility) and [`sheet_type`](Self::sheet_type)
/// interpret them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundSheetRecord {
    /// Stream offset of the sheet's BOF record
    pub position: u32,
    /// hsState byte (visibility in the low two bits)
    pub state: u8,
    /// dt byte
    pub kind: u8,
    name: String,
    /// ShortXLUnicodeString flags; bit 0 set means UTF-16LE characters
    name_flags: u8,
}

impl BoundSheetRecord {
    pub fn new(position: u32, name: &str) -> BiffResult<Self> {
        let mut record = BoundSheetRecord {
            position,
            state: SheetVisibility::Visible as u8,
            kind: 0x00,
            name: String::new(),
            name_flags: 0,
        };
        record.set_name(name)?;
        Ok(record)
    }

    pub fn read(cursor: &mut ByteCursor<'_>) -> BiffResult<Self> {
        let start = cursor.position();
        let position = cursor.read_u32()?;
        let state = cursor.read_u8()?;
        let kind = cursor.read_u8()?;
        let cch = cursor.read_u8()? as usize;
        let name_flags = cursor.read_u8()?;

        let name = if name_flags & 0x01 != 0 {
            let bytes = cursor.read_bytes(cch * 2)?;
            decode_utf16le(bytes).ok_or_else(|| {
                BiffError::malformed(consts::BOUNDSHEET, start, "sheet name is not valid UTF-16")
            })?
        } else {
            decode_compressed(cursor.read_bytes(cch)?)
        };

        Ok(BoundSheetRecord {
            position,
            state,
            kind,
            name,
            name_flags,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replace the sheet name, switching to UTF-16 storage when a character
    /// does not fit in one byte.
    pub fn set_name(&mut self, name: &str) -> BiffResult<()> {
        let wide = name.chars().any(|c| c as u32 > 0xFF);
        let units = if wide {
            name.encode_utf16().count()
        } else {
            name.chars().count()
        };
        if units > u8::MAX as usize {
            return Err(BiffError::InvalidValue {
                sid: consts::BOUNDSHEET,
                reason: format!("sheet name has {} characters, at most 255 fit", units),
            });
        }
        self.name = name.to_string();
        self.name_flags = (self.name_flags & !0x01) | u8::from(wide);
        Ok(())
    }

    fn is_wide(&self) -> bool {
        self.name_flags & 0x01 != 0
    }

    fn name_units(&self) -> usize {
        if self.is_wide() {
            self.name.encode_utf16().count()
        } else {
            self.name.chars().count()
        }
    }

    pub fn visibility(&self) -> Option<SheetVisibility> {
        match self.state & 0x03 {
            0x00 => Some(SheetVisibility::Visible),
            0x01 => Some(SheetVisibility::Hidden),
            0x02 => Some(SheetVisibility::VeryHidden),
            _ => None,
        }
    }

    pub fn set_visibility(&mut self, visibility: SheetVisibility) {
        self.state = (self.state & !0x03) | visibility as u8;
    }

    pub fn sheet_type(&self) -> Option<SheetType> {
        match self.kind {
            0x00 => Some(SheetType::WorkSheet),
            0x01 => Some(SheetType::MacroSheet),
            0x02 => Some(SheetType::ChartSheet),
            0x06 => Some(SheetType::VBModule),
            _ => None,
        }
    }
}

impl BiffRecord for BoundSheetRecord {
    fn sid(&self) -> u16 {
        consts::BOUNDSHEET
    }

    fn data_size(&self) -> usize {
        let chars = self.name_units();
        8 + if self.is_wide() { chars * 2 } else { chars }
    }

    fn serialize(&self, out: &mut ByteWriter) {
        out.write_u32(self.position);
        out.write_u8(self.state);
        out.write_u8(self.kind);
        out.write_u8(self.name_units() as u8);
        out.write_u8(self.name_flags);
        if self.is_wide() {
            for unit in self.name.encode_utf16() {
                out.write_u16(unit);
            }
        } else {
            for c in self.name.chars() {
                out.write_u8(c as u32 as u8);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eof_and_codepage() {
        assert_eq!(EofRecord.data_size(), 0);
        assert!(EofRecord.payload().is_empty());

        let cp = CodepageRecord::read(&mut ByteCursor::new(&[0xB0, 0x04])).unwrap();
        assert_eq!(cp.codepage, 1200);
        assert_eq!(cp.payload().as_ref(), &[0xB0, 0x04]);
    }

    #[test]
    fn test_date1904() {
        let rec = Date1904Record::read(&mut ByteCursor::new(&[0x01, 0x00])).unwrap();
        assert!(rec.is_1904());
        assert!(!Date1904Record { value: 0 }.is_1904());
    }

    #[test]
    fn test_bound_sheet_compressed_name() {
        let data = [
            0x00, 0x10, 0x00, 0x00, // position
            0x01, 0x00, // hidden worksheet
            0x06, 0x00, // cch, flags
            b'S', b'h', b'e', b'e', b't', b'1',
        ];
        let mut cursor = ByteCursor::new(&data);
        let rec = BoundSheetRecord::read(&mut cursor).unwrap();
        assert!(cursor.is_empty());
        assert_eq!(rec.position, 0x1000);
        assert_eq!(rec.name(), "Sheet1");
        assert_eq!(rec.visibility(), Some(SheetVisibility::Hidden));
        assert_eq!(rec.sheet_type(), Some(SheetType::WorkSheet));
        assert_eq!(rec.data_size(), data.len());
        assert_eq!(rec.payload().as_ref(), &data);
    }

    #[test]
    fn test_bound_sheet_wide_name_round_trip() {
        // Wide storage is kept even when every character would fit in a byte.
        let data = [
            0, 0, 0, 0, 0x00, 0x00, 0x02, 0x01, b'A', 0x00, b'B', 0x00,
        ];
        let rec = BoundSheetRecord::read(&mut ByteCursor::new(&data)).unwrap();
        assert_eq!(rec.name(), "AB");
        assert_eq!(rec.payload().as_ref(), &data);
    }

    #[test]
    fn test_bound_sheet_set_name() {
        let mut rec = BoundSheetRecord::new(0, "Data").unwrap();
        assert_eq!(rec.data_size(), 12);

        rec.set_name("\u{6570}\u{636E}").unwrap();
        assert_eq!(rec.data_size(), 12);
        let payload = rec.payload();
        assert_eq!(payload[6], 2);
        assert_eq!(payload[7] & 0x01, 0x01);

        let decoded = BoundSheetRecord::read(&mut ByteCursor::new(&payload)).unwrap();
        assert_eq!(decoded, rec);

        let err = rec.set_name(&"x".repeat(256)).unwrap_err();
        assert!(matches!(err, BiffError::InvalidValue { sid: consts::BOUNDSHEET, .. }));
        assert_eq!(err.offset(), None);
        assert_eq!(rec.name(), "\u{6570}\u{636E}");
        assert!(BoundSheetRecord::new(0, &"y".repeat(255)).is_ok());
    }

    #[test]
    fn test_bound_sheet_visibility_bits() {
        let mut rec = BoundSheetRecord::new(0, "S").unwrap();
        rec.state = 0xF0;
        rec.set_visibility(SheetVisibility::VeryHidden);
        assert_eq!(rec.state, 0xF2);
        assert_eq!(rec.visibility(), Some(SheetVisibility::VeryHidden));
        rec.state = 0x03;
        assert_eq!(rec.visibility(), None);
    }

    #[test]
    fn test_bound_sheet_truncated_name() {
        let data = [0, 0, 0, 0, 0, 0, 0x05, 0x00, b'a'];
        assert!(BoundSheetRecord::read(&mut ByteCursor::new(&data)).is_err());
    }
}

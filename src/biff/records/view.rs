//! Custom sheet view records and the view-scoped HEADERFOOTER record.
//!
//! A custom view is bracketed by USERSVIEWBEGIN / USERSVIEWEND. A
//! HEADERFOOTER record either belongs to the current sheet (blank GUID) or
//! carries the GUID of the preceding USERSVIEWBEGIN it applies to.

use std::borrow::Cow;
use std::fmt;

use crate::biff::consts;
use crate::biff::error::BiffResult;
use crate::biff::opaque::{Guid, OpaqueRecord};
use crate::biff::records::BiffRecord;
use crate::common::binary::{ByteCursor, ByteWriter};

/// HEADERFOOTER record, sid 0x089C (added in Excel 2007).
///
/// No fields are interpreted; the payload is written back as read. The
/// sheet view GUID sits at payload offset 12.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderFooterRecord {
    raw: OpaqueRecord,
}

impl HeaderFooterRecord {
    pub fn new(raw_data: Vec<u8>) -> Self {
        HeaderFooterRecord {
            raw: OpaqueRecord::new(consts::HEADERFOOTER, raw_data),
        }
    }

    pub fn read(cursor: &mut ByteCursor<'_>) -> BiffResult<Self> {
        Ok(Self::new(cursor.read_remainder().to_vec()))
    }

    pub fn raw_data(&self) -> &[u8] {
        self.raw.raw_data()
    }

    /// The GUID of the sheet view this header/footer belongs to.
    pub fn guid(&self) -> BiffResult<Guid> {
        self.raw.guid()
    }

    /// Whether this header/footer belongs to the current sheet.
    pub fn is_current_sheet(&self) -> BiffResult<bool> {
        self.raw.is_current_sheet()
    }
}

impl BiffRecord for HeaderFooterRecord {
    fn sid(&self) -> u16 {
        consts::HEADERFOOTER
    }

    fn data_size(&self) -> usize {
        self.raw.data_size()
    }

    fn serialize(&self, out: &mut ByteWriter) {
        self.raw.serialize(out);
    }

    fn payload(&self) -> Cow<'_, [u8]> {
        self.raw.payload()
    }
}

impl fmt::Display for HeaderFooterRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.raw, f)
    }
}

/// USERSVIEWBEGIN record, sid 0x01AA: opens the settings of a custom view.
///
/// Only the GUID and the tab id are interpreted; the rest of the payload is
/// kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSViewBeginRecord {
    pub guid: Guid,
    /// Sheet tab the view belongs to
    pub tab_id: u32,
    pub rest: Vec<u8>,
}

impl UserSViewBeginRecord {
    pub fn read(cursor: &mut ByteCursor<'_>) -> BiffResult<Self> {
        let guid = cursor.read_array::<16>()?;
        let tab_id = cursor.read_u32()?;
        let rest = cursor.read_remainder().to_vec();
        Ok(UserSViewBeginRecord { guid, tab_id, rest })
    }
}

impl BiffRecord for UserSViewBeginRecord {
    fn sid(&self) -> u16 {
        consts::USERSVIEWBEGIN
    }

    fn data_size(&self) -> usize {
        20 + self.rest.len()
    }

    fn serialize(&self, out: &mut ByteWriter) {
        out.write_bytes(&self.guid);
        out.write_u32(self.tab_id);
        out.write_bytes(&self.rest);
    }
}

/// USERSVIEWEND record, sid 0x01AB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UserSViewEndRecord {
    pub unused: u16,
}

impl UserSViewEndRecord {
    pub fn read(cursor: &mut ByteCursor<'_>) -> BiffResult<Self> {
        Ok(UserSViewEndRecord {
            unused: cursor.read_u16()?,
        })
    }
}

impl BiffRecord for UserSViewEndRecord {
    fn sid(&self) -> u16 {
        consts::USERSVIEWEND
    }

    fn data_size(&self) -> usize {
        2
    }

    fn serialize(&self, out: &mut ByteWriter) {
        out.write_u16(self.unused);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biff::opaque::{BLANK_GUID, SCOPE_GUID_OFFSET};

    #[test]
    fn test_header_footer_guid() {
        let mut data = vec![0u8; 38];
        data[0] = 0x9C;
        data[1] = 0x08;
        let rec = HeaderFooterRecord::new(data.clone());
        assert!(rec.is_current_sheet().unwrap());

        data[SCOPE_GUID_OFFSET + 3] = 0x42;
        let rec = HeaderFooterRecord::read(&mut ByteCursor::new(&data)).unwrap();
        assert!(!rec.is_current_sheet().unwrap());
        assert_ne!(rec.guid().unwrap(), BLANK_GUID);
        assert_eq!(rec.payload().as_ref(), data.as_slice());
    }

    #[test]
    fn test_header_footer_short_payload() {
        let rec = HeaderFooterRecord::new(vec![0u8; 12]);
        assert!(rec.guid().is_err());
        assert_eq!(rec.data_size(), 12);
    }

    #[test]
    fn test_user_sview_begin() {
        let mut data = vec![0u8; 64];
        data[..16].copy_from_slice(&[0xAB; 16]);
        data[16] = 0x02;
        let mut cursor = ByteCursor::new(&data);
        let rec = UserSViewBeginRecord::read(&mut cursor).unwrap();
        assert!(cursor.is_empty());
        assert_eq!(rec.guid, [0xAB; 16]);
        assert_eq!(rec.tab_id, 2);
        assert_eq!(rec.rest.len(), 44);
        assert_eq!(rec.payload().as_ref(), data.as_slice());
    }

    #[test]
    fn test_user_sview_end() {
        let rec = UserSViewEndRecord::read(&mut ByteCursor::new(&[0x01, 0x00])).unwrap();
        assert_eq!(rec.unused, 1);
        assert_eq!(rec.payload().as_ref(), &[0x01, 0x00]);
    }
}

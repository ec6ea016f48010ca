//! Records kept as raw payload bytes.
//!
//! Any sid without a typed decoder ends up here. The payload is written back
//! exactly as it was read; the accessors below only look at it.

use std::borrow::Cow;
use std::fmt;

use crate::biff::consts::record_name;
use crate::biff::error::{BiffError, BiffResult};
use crate::biff::records::BiffRecord;
use crate::common::binary::ByteWriter;

/// Offset of the sheet view GUID in records that carry one (after the
/// 12-byte FrtHeader).
pub const SCOPE_GUID_OFFSET: usize = 12;

/// Size of a GUID in bytes
pub const GUID_SIZE: usize = 16;

/// A sheet view GUID. All zero means "the current sheet".
pub type Guid = [u8; GUID_SIZE];

/// The all-zero GUID.
pub const BLANK_GUID: Guid = [0u8; GUID_SIZE];

/// A record whose payload is stored and re-emitted verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpaqueRecord {
    sid: u16,
    raw_data: Vec<u8>,
}

impl OpaqueRecord {
    pub fn new(sid: u16, raw_data: Vec<u8>) -> Self {
        OpaqueRecord { sid, raw_data }
    }

    pub fn raw_data(&self) -> &[u8] {
        &self.raw_data
    }

    /// Mutable access to the payload, for consumers that patch records in
    /// place.
    pub fn raw_data_mut(&mut self) -> &mut Vec<u8> {
        &mut self.raw_data
    }

    pub fn into_raw_data(self) -> Vec<u8> {
        self.raw_data
    }

    /// Read a 16-byte GUID at `offset` in the payload.
    ///
    /// Fails with [`BiffError::MalformedRecord`] when the payload is too
    /// short; the reported offset is the payload offset of the field.
    pub fn guid_at(&self, offset: usize) -> BiffResult<Guid> {
        read_guid(self.sid, &self.raw_data, offset)
    }

    /// The sheet view GUID this record is scoped to.
    pub fn guid(&self) -> BiffResult<Guid> {
        self.guid_at(SCOPE_GUID_OFFSET)
    }

    /// Whether the record applies to the current sheet rather than to a
    /// named custom view.
    ///
    /// # Examples
    ///
    /// ```
    /// use biffstream::biff::OpaqueRecord;
    /// let record = OpaqueRecord::new(0x089C, vec![0u8; 40]);
    /// assert!(record.is_current_sheet().unwrap());
    /// assert!(OpaqueRecord::new(0x089C, vec![0u8; 20]).is_current_sheet().is_err());
    /// ```
    pub fn is_current_sheet(&self) -> BiffResult<bool> {
        Ok(self.guid()? == BLANK_GUID)
    }
}

pub(crate) fn read_guid(sid: u16, data: &[u8], offset: usize) -> BiffResult<Guid> {
    let field = offset
        .checked_add(GUID_SIZE)
        .and_then(|end| data.get(offset..end))
        .ok_or_else(|| {
            BiffError::malformed(
                sid,
                offset,
                format!(
                    "payload of {} bytes is too short for a GUID at offset {}",
                    data.len(),
                    offset
                ),
            )
        })?;
    let mut guid = BLANK_GUID;
    guid.copy_from_slice(field);
    Ok(guid)
}

impl BiffRecord for OpaqueRecord {
    fn sid(&self) -> u16 {
        self.sid
    }

    fn data_size(&self) -> usize {
        self.raw_data.len()
    }

    fn serialize(&self, out: &mut ByteWriter) {
        out.write_bytes(&self.raw_data);
    }

    fn payload(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(&self.raw_data)
    }
}

/// Uppercase hex with no separators.
pub(crate) fn to_hex(data: &[u8]) -> String {
    use std::fmt::Write;

    let mut out = String::with_capacity(data.len() * 2);
    for byte in data {
        let _ = write!(out, "{:02X}", byte);
    }
    out
}

impl fmt::Display for OpaqueRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = record_name(self.sid).unwrap_or("UNKNOWN");
        writeln!(f, "[{}] (0x{:04X})", name, self.sid)?;
        writeln!(f, "  rawData={}", to_hex(&self.raw_data))?;
        writeln!(f, "[/{}]", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_guid(guid: Guid, len: usize) -> OpaqueRecord {
        let mut data = vec![0xEE; len];
        data[SCOPE_GUID_OFFSET..SCOPE_GUID_OFFSET + GUID_SIZE].copy_from_slice(&guid);
        OpaqueRecord::new(0x089C, data)
    }

    #[test]
    fn test_blank_guid_is_current_sheet() {
        let record = with_guid(BLANK_GUID, 38);
        assert_eq!(record.guid().unwrap(), BLANK_GUID);
        assert!(record.is_current_sheet().unwrap());
    }

    #[test]
    fn test_non_zero_guid_is_named_view() {
        let mut guid = BLANK_GUID;
        guid[15] = 1;
        let record = with_guid(guid, 28);
        assert_eq!(record.guid().unwrap(), guid);
        assert!(!record.is_current_sheet().unwrap());
    }

    #[test]
    fn test_short_payload_fails() {
        let record = OpaqueRecord::new(0x089C, vec![0u8; 27]);
        let err = record.is_current_sheet().unwrap_err();
        assert!(matches!(
            err,
            BiffError::MalformedRecord {
                sid: 0x089C,
                offset: SCOPE_GUID_OFFSET,
                ..
            }
        ));
        assert!(OpaqueRecord::new(0x089C, Vec::new()).guid().is_err());
    }

    #[test]
    fn test_guid_at_huge_offset_fails() {
        let record = OpaqueRecord::new(0x089C, vec![0u8; 40]);
        let err = record.guid_at(usize::MAX - 3).unwrap_err();
        assert_eq!(err.sid(), Some(0x089C));
        assert_eq!(err.offset(), Some(usize::MAX - 3));
        assert!(record.guid_at(25).is_err());
        assert!(record.guid_at(24).is_ok());
    }

    #[test]
    fn test_accessors_do_not_change_serialization() {
        let record = with_guid([7u8; 16], 40);
        let before = record.raw_data().to_vec();
        let _ = record.guid();
        let _ = record.is_current_sheet();
        let _ = record.guid_at(30);

        let mut out = ByteWriter::new();
        record.serialize(&mut out);
        assert_eq!(out.as_slice(), before.as_slice());
        assert_eq!(record.data_size(), 40);
    }

    #[test]
    fn test_clone_is_independent() {
        let original = OpaqueRecord::new(0x1234, vec![1, 2, 3]);
        let mut copy = original.clone();
        copy.raw_data_mut()[0] = 9;
        assert_eq!(original.raw_data(), &[1, 2, 3]);
        assert_eq!(copy.raw_data(), &[9, 2, 3]);
    }

    #[test]
    fn test_display() {
        let record = OpaqueRecord::new(0x089C, vec![0x0A, 0xFF]);
        assert_eq!(
            record.to_string(),
            "[HEADERFOOTER] (0x089C)\n  rawData=0AFF\n[/HEADERFOOTER]\n"
        );
        let record = OpaqueRecord::new(0x7777, Vec::new());
        assert!(record.to_string().starts_with("[UNKNOWN] (0x7777)"));
    }
}

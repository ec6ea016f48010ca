//! Worksheet substream records.

use crate::biff::consts;
use crate::biff::error::BiffResult;
use crate::biff::records::BiffRecord;
use crate::common::binary::{ByteCursor, ByteWriter};

/// DIMENSIONS record, sid 0x0200: the used range of a worksheet.
///
/// `last_row` and `last_col` are exclusive, as stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimensionsRecord {
    pub first_row: u32,
    pub last_row: u32,
    pub first_col: u16,
    pub last_col: u16,
    pub reserved: u16,
}

impl DimensionsRecord {
    pub fn new(first_row: u32, last_row: u32, first_col: u16, last_col: u16) -> Self {
        DimensionsRecord {
            first_row,
            last_row,
            first_col,
            last_col,
            reserved: 0,
        }
    }

    pub fn read(cursor: &mut ByteCursor<'_>) -> BiffResult<Self> {
        Ok(DimensionsRecord {
            first_row: cursor.read_u32()?,
            last_row: cursor.read_u32()?,
            first_col: cursor.read_u16()?,
            last_col: cursor.read_u16()?,
            reserved: cursor.read_u16()?,
        })
    }

    /// Whether the sheet has no used cells.
    pub fn is_empty(&self) -> bool {
        self.first_row >= self.last_row || self.first_col >= self.last_col
    }
}

impl BiffRecord for DimensionsRecord {
    fn sid(&self) -> u16 {
        consts::DIMENSIONS
    }

    fn data_size(&self) -> usize {
        14
    }

    fn serialize(&self, out: &mut ByteWriter) {
        out.write_u32(self.first_row);
        out.write_u32(self.last_row);
        out.write_u16(self.first_col);
        out.write_u16(self.last_col);
        out.write_u16(self.reserved);
    }
}

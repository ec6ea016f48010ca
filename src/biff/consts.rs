//! BIFF8 framing constants and record type identifiers.
//!
//! Reference: [MS-XLS] 2.1.4 (Record) and 2.3 (Record Enumeration).

use phf::phf_map;

/// Size of a record header: sid (2 bytes) + length (2 bytes)
pub const RECORD_HEADER_SIZE: usize = 4;

/// Largest payload a single BIFF8 envelope may carry
pub const MAX_RECORD_DATA: usize = 8224;

/// Reserved sid of a continuation envelope
pub const CONTINUE: u16 = 0x003C;

// Stream structure
pub const BOF: u16 = 0x0809;
pub const EOF: u16 = 0x000A;

// Workbook globals
pub const CODEPAGE: u16 = 0x0042;
pub const DATE1904: u16 = 0x0022;
pub const BOUNDSHEET: u16 = 0x0085;
/// Shared string table; the usual record to span CONTINUE envelopes
pub const SST: u16 = 0x00FC;

// Sheet structure
pub const DIMENSIONS: u16 = 0x0200;

// Custom views
pub const USERSVIEWBEGIN: u16 = 0x01AA;
pub const USERSVIEWEND: u16 = 0x01AB;
pub const HEADERFOOTER: u16 = 0x089C;

// BOF substream types (the `dt` field)
pub const BOF_WORKBOOK_GLOBALS: u16 = 0x0005;
pub const BOF_WORKSHEET: u16 = 0x0010;
pub const BOF_CHART: u16 = 0x0020;
pub const BOF_MACRO: u16 = 0x0040;

/// BIFF8 version stored in BOF records
pub const BIFF8_VERSION: u16 = 0x0600;

/// Display names of well-known sids, including ones without a typed decoder.
static RECORD_NAMES: phf::Map<u16, &'static str> = phf_map! {
    0x0809u16 => "BOF",
    0x000Au16 => "EOF",
    0x003Cu16 => "CONTINUE",
    0x0042u16 => "CODEPAGE",
    0x0022u16 => "DATE1904",
    0x0085u16 => "BOUNDSHEET",
    0x00FCu16 => "SST",
    0x00FFu16 => "EXTSST",
    0x0031u16 => "FONT",
    0x041Eu16 => "FORMAT",
    0x00E0u16 => "XF",
    0x0293u16 => "STYLE",
    0x003Du16 => "WINDOW1",
    0x0200u16 => "DIMENSIONS",
    0x0208u16 => "ROW",
    0x007Du16 => "COLINFO",
    0x023Eu16 => "WINDOW2",
    0x0041u16 => "PANE",
    0x001Du16 => "SELECTION",
    0x0014u16 => "HEADER",
    0x0015u16 => "FOOTER",
    0x0006u16 => "FORMULA",
    0x0203u16 => "NUMBER",
    0x0204u16 => "LABEL",
    0x00FDu16 => "LABELSST",
    0x027Eu16 => "RK",
    0x0201u16 => "BLANK",
    0x0205u16 => "BOOLERR",
    0x01AAu16 => "USERSVIEWBEGIN",
    0x01ABu16 => "USERSVIEWEND",
    0x089Cu16 => "HEADERFOOTER",
    0x00ECu16 => "MSODRAWING",
    0x005Du16 => "OBJ",
    0x01B6u16 => "TXO",
};

/// Look up the display name of a record type.
///
/// # Examples
///
/// ```
/// use biffstream::biff::record_name;
/// assert_eq!(record_name(0x089C), Some("HEADERFOOTER"));
/// assert_eq!(record_name(0x7777), None);
/// ```
pub fn record_name(sid: u16) -> Option<&'static str> {
    RECORD_NAMES.get(&sid).copied()
}

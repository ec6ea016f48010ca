//! Record type registry.
//!
//! Maps a sid to the decoder of its typed record. Sids without an entry are
//! not an error: they become [`OpaqueRecord`]s so records from newer format
//! revisions pass through untouched. The table is a compile-time perfect hash
//! map, so lookups are pure and safe to share across threads.

use phf::phf_map;

use crate::biff::consts::RECORD_HEADER_SIZE;
use crate::biff::error::{BiffError, BiffResult};
use crate::biff::opaque::OpaqueRecord;
use crate::biff::options::CodecOptions;
use crate::biff::records::{
    BofRecord, BoundSheetRecord, CodepageRecord, Date1904Record, DimensionsRecord, EofRecord,
    HeaderFooterRecord, Record, UserSViewBeginRecord, UserSViewEndRecord,
};
use crate::common::binary::ByteCursor;

fn decode_bof(cursor: &mut ByteCursor<'_>) -> BiffResult<Record> {
    BofRecord::read(cursor).map(Record::Bof)
}

fn decode_eof(cursor: &mut ByteCursor<'_>) -> BiffResult<Record> {
    EofRecord::read(cursor).map(Record::Eof)
}

fn decode_codepage(cursor: &mut ByteCursor<'_>) -> BiffResult<Record> {
    CodepageRecord::read(cursor).map(Record::Codepage)
}

fn decode_date1904(cursor: &mut ByteCursor<'_>) -> BiffResult<Record> {
    Date1904Record::read(cursor).map(Record::Date1904)
}

fn decode_bound_sheet(cursor: &mut ByteCursor<'_>) -> BiffResult<Record> {
    BoundSheetRecord::read(cursor).map(Record::BoundSheet)
}

fn decode_dimensions(cursor: &mut ByteCursor<'_>) -> BiffResult<Record> {
    DimensionsRecord::read(cursor).map(Record::Dimensions)
}

fn decode_user_sview_begin(cursor: &mut ByteCursor<'_>) -> BiffResult<Record> {
    UserSViewBeginRecord::read(cursor).map(Record::UserSViewBegin)
}

fn decode_user_sview_end(cursor: &mut ByteCursor<'_>) -> BiffResult<Record> {
    UserSViewEndRecord::read(cursor).map(Record::UserSViewEnd)
}

fn decode_header_footer(cursor: &mut ByteCursor<'_>) -> BiffResult<Record> {
    HeaderFooterRecord::read(cursor).map(Record::HeaderFooter)
}

type DecoderMap = phf::Map<u16, fn(&mut ByteCursor<'_>) -> BiffResult<Record>>;

/// Perfect hash map of sids to decoder functions
static DECODERS: DecoderMap = phf_map! {
    0x0809u16 => decode_bof,
    0x000Au16 => decode_eof,
    0x0042u16 => decode_codepage,
    0x0022u16 => decode_date1904,
    0x0085u16 => decode_bound_sheet,
    0x0200u16 => decode_dimensions,
    0x01AAu16 => decode_user_sview_begin,
    0x01ABu16 => decode_user_sview_end,
    0x089Cu16 => decode_header_footer,
};

/// Whether `sid` has a typed decoder.
pub fn is_registered(sid: u16) -> bool {
    DECODERS.contains_key(&sid)
}

/// All sids with a typed decoder, in ascending order.
pub fn registered_sids() -> Vec<u16> {
    let mut sids: Vec<u16> = DECODERS.keys().copied().collect();
    sids.sort_unstable();
    sids
}

/// Decode a logical payload with the default (strict) options.
///
/// `offset` is the stream offset of the record header; it is only used for
/// error reporting.
pub fn decode_record(sid: u16, data: &[u8], offset: usize) -> BiffResult<Record> {
    decode_record_with(sid, data, offset, &CodecOptions::default())
}

/// Decode a logical payload into a typed record, or an opaque one when the
/// sid is unknown.
///
/// A typed decoder must consume the whole payload. In strict mode a payload
/// that is too short or too long is a [`BiffError::MalformedRecord`];
/// otherwise the record is kept opaque so its bytes still round-trip.
pub fn decode_record_with(
    sid: u16,
    data: &[u8],
    offset: usize,
    options: &CodecOptions,
) -> BiffResult<Record> {
    let Some(decoder) = DECODERS.get(&sid) else {
        tracing::trace!(sid, offset, len = data.len(), "no decoder, keeping record opaque");
        return Ok(Record::Opaque(OpaqueRecord::new(sid, data.to_vec())));
    };

    match run_decoder(*decoder, sid, data, offset) {
        Ok(record) => Ok(record),
        Err(e) if !options.strict => {
            tracing::warn!(sid, offset, error = %e, "malformed record kept opaque");
            Ok(Record::Opaque(OpaqueRecord::new(sid, data.to_vec())))
        },
        Err(e) => Err(e),
    }
}

fn run_decoder(
    decoder: fn(&mut ByteCursor<'_>) -> BiffResult<Record>,
    sid: u16,
    data: &[u8],
    offset: usize,
) -> BiffResult<Record> {
    let mut cursor = ByteCursor::with_base(data, offset + RECORD_HEADER_SIZE);
    let record = decoder(&mut cursor).map_err(|e| e.within_record(sid, offset))?;
    if !cursor.is_empty() {
        return Err(BiffError::malformed(
            sid,
            offset,
            format!(
                "decoder left {} of {} payload bytes unread",
                cursor.remaining(),
                data.len()
            ),
        ));
    }
    Ok(record)
}

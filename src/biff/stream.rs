//! Whole-stream decoding and encoding.
//!
//! A [`RecordStream`] is the ordered list of records of one BIFF stream.
//! The codec never reorders it: records such as HEADERFOOTER refer to an
//! earlier USERSVIEWBEGIN purely by position.
//!
//! Decoding then encoding an unmodified stream reproduces the input exactly,
//! including where payloads were split into CONTINUE records.

use std::ops::Range;

use crate::biff::consts;
use crate::biff::error::BiffResult;
use crate::biff::frame::{self, FrameReader, SegmentLayout};
use crate::biff::opaque::{BLANK_GUID, Guid};
use crate::biff::options::CodecOptions;
use crate::biff::records::{BiffRecord, Record};
use crate::biff::registry;
use crate::common::binary::ByteWriter;

/// A record and the segment layout it was read with.
#[derive(Debug, Clone, PartialEq, Eq)]
struct StreamEntry {
    record: Record,
    layout: Option<SegmentLayout>,
}

/// Which view a view-scoped record (HEADERFOOTER) applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewScope {
    /// Blank GUID: the currently active sheet
    CurrentSheet,
    /// Index of the matching USERSVIEWBEGIN record
    View(usize),
    /// No preceding USERSVIEWBEGIN carries this GUID
    Unmatched(Guid),
}

/// Ordered sequence of decoded records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordStream {
    entries: Vec<StreamEntry>,
    options: CodecOptions,
}

impl RecordStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty stream that encodes with `options`.
    pub fn with_options(options: CodecOptions) -> Self {
        RecordStream {
            entries: Vec::new(),
            options,
        }
    }

    /// Decode a complete stream with the default options.
    ///
    /// # Examples
    ///
    /// ```
    /// use biffstream::biff::RecordStream;
    ///
    /// let bytes = [0x42, 0x00, 0x02, 0x00, 0xB0, 0x04, 0x0A, 0x00, 0x00, 0x00];
    /// let stream = RecordStream::decode_all(&bytes).unwrap();
    /// assert_eq!(stream.len(), 2);
    /// assert_eq!(stream.encode_all().unwrap(), bytes);
    /// ```
    pub fn decode_all(data: &[u8]) -> BiffResult<Self> {
        Self::decode_all_with(data, CodecOptions::default())
    }

    /// Decode a complete stream.
    ///
    /// Stops cleanly at the exact end of `data`. A partial envelope at the
    /// end is a truncation error; nothing decoded so far is returned.
    pub fn decode_all_with(data: &[u8], options: CodecOptions) -> BiffResult<Self> {
        let mut entries = Vec::new();
        let mut opaque = 0usize;

        for logical in FrameReader::new(data) {
            let logical = logical?;
            let record =
                registry::decode_record_with(logical.sid, &logical.data, logical.offset, &options)?;
            if record.is_opaque() {
                opaque += 1;
            }
            entries.push(StreamEntry {
                record,
                layout: Some(logical.layout),
            });
        }

        tracing::debug!(
            records = entries.len(),
            opaque,
            bytes = data.len(),
            "decoded record stream"
        );

        Ok(RecordStream { entries, options })
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: CodecOptions) {
        self.options = options;
    }

    /// Encode the stream with its own options.
    pub fn encode_all(&self) -> BiffResult<Vec<u8>> {
        self.encode_all_with(&self.options)
    }

    /// Encode the stream; the output length equals
    /// [`encoded_len_with`](Self::encoded_len_with).
    pub fn encode_all_with(&self, options: &CodecOptions) -> BiffResult<Vec<u8>> {
        let mut out = ByteWriter::with_capacity(self.encoded_len_with(options));
        self.encode_into(&mut out, options)?;
        tracing::debug!(records = self.entries.len(), bytes = out.len(), "encoded record stream");
        Ok(out.into_vec())
    }

    /// Append the encoded stream to `out`.
    pub fn encode_into(&self, out: &mut ByteWriter, options: &CodecOptions) -> BiffResult<()> {
        for entry in &self.entries {
            let payload = entry.record.payload();
            frame::write_record(
                out,
                entry.record.sid(),
                &payload,
                entry.layout.as_ref(),
                options,
            )?;
        }
        Ok(())
    }

    /// Size of the encoded stream in bytes.
    pub fn encoded_len(&self) -> usize {
        self.encoded_len_with(&self.options)
    }

    pub fn encoded_len_with(&self, options: &CodecOptions) -> usize {
        self.entries
            .iter()
            .map(|e| frame::framed_size(e.record.data_size(), e.layout.as_ref(), options))
            .sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.entries.iter().map(|e| &e.record)
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.entries.get(index).map(|e| &e.record)
    }

    /// Mutable access to a record.
    ///
    /// The record keeps its segment layout only while its payload length is
    /// unchanged; otherwise it is re-split on encode.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Record> {
        self.entries.get_mut(index).map(|e| &mut e.record)
    }

    /// Segment layout a record was read with, if it came from the input.
    pub fn layout(&self, index: usize) -> Option<&SegmentLayout> {
        self.entries.get(index).and_then(|e| e.layout.as_ref())
    }

    /// Append a record; it is framed with the default split.
    pub fn push(&mut self, record: Record) {
        self.entries.push(StreamEntry {
            record,
            layout: None,
        });
    }

    /// Insert a record before `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert(&mut self, index: usize, record: Record) {
        self.entries.insert(
            index,
            StreamEntry {
                record,
                layout: None,
            },
        );
    }

    /// Remove and return the record at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn remove(&mut self, index: usize) -> Record {
        self.entries.remove(index).record
    }

    pub fn into_records(self) -> Vec<Record> {
        self.entries.into_iter().map(|e| e.record).collect()
    }

    /// Indices and records of every record with the given sid.
    pub fn records_with_sid(&self, sid: u16) -> impl Iterator<Item = (usize, &Record)> {
        self.iter().enumerate().filter(move |(_, r)| r.sid() == sid)
    }

    /// Index ranges of the top-level BOF..EOF substreams.
    ///
    /// Nested substreams (a chart inside a worksheet) stay inside their
    /// parent's range. An unterminated substream runs to the end.
    pub fn substreams(&self) -> Vec<Range<usize>> {
        let mut ranges = Vec::new();
        let mut depth = 0usize;
        let mut start = 0usize;

        for (i, record) in self.iter().enumerate() {
            match record.sid() {
                consts::BOF => {
                    if depth == 0 {
                        start = i;
                    }
                    depth += 1;
                },
                consts::EOF if depth > 0 => {
                    depth -= 1;
                    if depth == 0 {
                        ranges.push(start..i + 1);
                    }
                },
                _ => {},
            }
        }
        if depth > 0 {
            ranges.push(start..self.len());
        }
        ranges
    }

    /// Resolve which view the HEADERFOOTER record at `index` belongs to.
    ///
    /// Returns `Ok(None)` when the record is not a HEADERFOOTER record. A
    /// HEADERFOOTER payload too short to hold its GUID is an error.
    pub fn view_scope(&self, index: usize) -> BiffResult<Option<ViewScope>> {
        let guid = match self.get(index) {
            Some(Record::HeaderFooter(r)) => r.guid()?,
            Some(Record::Opaque(r)) if r.sid() == consts::HEADERFOOTER => r.guid()?,
            _ => return Ok(None),
        };
        if guid == BLANK_GUID {
            return Ok(Some(ViewScope::CurrentSheet));
        }

        let view = self.entries[..index]
            .iter()
            .rposition(|e| matches!(&e.record, Record::UserSViewBegin(v) if v.guid == guid));
        Ok(Some(match view {
            Some(i) => ViewScope::View(i),
            None => ViewScope::Unmatched(guid),
        }))
    }
}

impl FromIterator<Record> for RecordStream {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        let mut stream = RecordStream::new();
        stream.extend(iter);
        stream
    }
}

impl Extend<Record> for RecordStream {
    fn extend<I: IntoIterator<Item = Record>>(&mut self, iter: I) {
        for record in iter {
            self.push(record);
        }
    }
}

/// Encode a plain sequence of records with the default split.
pub fn encode_records<'a, I>(records: I, options: &CodecOptions) -> BiffResult<Vec<u8>>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut out = ByteWriter::new();
    for record in records {
        frame::write_record(&mut out, record.sid(), &record.payload(), None, options)?;
    }
    Ok(out.into_vec())
}

/// Decode several independent streams.
///
/// Streams share nothing but the immutable registry, so they are decoded in
/// parallel when the `parallel` feature is enabled. Results keep the order
/// of `inputs`.
pub fn decode_many<T>(inputs: &[T], options: &CodecOptions) -> Vec<BiffResult<RecordStream>>
where
    T: AsRef<[u8]> + Sync,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        inputs
            .par_iter()
            .map(|data| RecordStream::decode_all_with(data.as_ref(), options.clone()))
            .collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        inputs
            .iter()
            .map(|data| RecordStream::decode_all_with(data.as_ref(), options.clone()))
            .collect()
    }
}

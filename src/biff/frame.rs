//! BIFF record framing.
//!
//! Each physical record (envelope) is laid out as:
//!
//! ```text
//! +--------+--------+---------------------+
//! |  sid   | length | payload             |
//! | 2 bytes| 2 bytes| `length` bytes      |
//! +--------+--------+---------------------+
//! ```
//!
//! A payload longer than [`MAX_RECORD_DATA`] is split into a primary envelope
//! followed by CONTINUE (0x003C) envelopes. Continuations carry no back-link;
//! they belong to whatever record precedes them. The reader concatenates them
//! into one logical payload and remembers the segment lengths so the writer
//! can reproduce the original split.

use smallvec::SmallVec;

use crate::biff::consts::{CONTINUE, MAX_RECORD_DATA, RECORD_HEADER_SIZE};
use crate::biff::error::{BiffError, BiffResult};
use crate::biff::options::CodecOptions;
use crate::common::binary::{ByteCursor, ByteWriter};

/// BIFF record header (4 bytes: type + length)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    pub sid: u16,
    pub data_len: u16,
}

impl RecordHeader {
    /// Parse a record header from the cursor
    pub fn read(cursor: &mut ByteCursor<'_>) -> BiffResult<Self> {
        let sid = cursor.read_u16()?;
        let data_len = cursor.read_u16()?;
        Ok(RecordHeader { sid, data_len })
    }

    pub fn write(&self, out: &mut ByteWriter) {
        out.write_u16(self.sid);
        out.write_u16(self.data_len);
    }
}

/// Lengths of the physical segments one logical payload is split into.
///
/// The first entry belongs to the primary envelope; every further entry is a
/// CONTINUE envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentLayout(SmallVec<[u16; 2]>);

impl SegmentLayout {
    /// Layout of a record that fits in one envelope.
    pub fn single(len: u16) -> Self {
        let mut segments = SmallVec::new();
        segments.push(len);
        SegmentLayout(segments)
    }

    /// Default split: full segments of [`MAX_RECORD_DATA`] bytes, then the rest.
    ///
    /// An empty payload still occupies one zero-length envelope.
    pub fn chunked(len: usize) -> Self {
        if len == 0 {
            return Self::single(0);
        }
        let segments = (0..len)
            .step_by(MAX_RECORD_DATA)
            .map(|start| (len - start).min(MAX_RECORD_DATA) as u16)
            .collect();
        SegmentLayout(segments)
    }

    /// Build a layout from explicit segment lengths.
    ///
    /// Returns `None` if the list is empty or a segment exceeds
    /// [`MAX_RECORD_DATA`].
    pub fn from_segments(segments: &[u16]) -> Option<Self> {
        if segments.is_empty() || segments.iter().any(|&s| s as usize > MAX_RECORD_DATA) {
            return None;
        }
        Some(SegmentLayout(SmallVec::from_slice(segments)))
    }

    fn push(&mut self, len: u16) {
        self.0.push(len);
    }

    pub fn segments(&self) -> &[u16] {
        &self.0
    }

    /// Sum of all segment lengths.
    pub fn total(&self) -> usize {
        self.0.iter().map(|&s| s as usize).sum()
    }

    /// Number of CONTINUE envelopes in this layout.
    pub fn continuations(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    /// Bytes this layout occupies on the wire, headers included.
    pub fn framed_size(&self) -> usize {
        self.0.len() * RECORD_HEADER_SIZE + self.total()
    }

    /// Whether this layout can frame a payload of `len` bytes.
    pub fn fits(&self, len: usize) -> bool {
        self.total() == len
    }
}

/// One record as read from the stream: its sid, where it started, the
/// concatenated payload and the segments that payload was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalRecord {
    pub sid: u16,
    /// Absolute offset of the primary envelope header
    pub offset: usize,
    pub data: Vec<u8>,
    pub layout: SegmentLayout,
}

/// Reads logical records, merging CONTINUE envelopes into their predecessor.
///
/// The iterator yields at most one error and then stops, so callers never
/// see records decoded past a framing failure.
#[derive(Debug, Clone)]
pub struct FrameReader<'a> {
    cursor: ByteCursor<'a>,
    failed: bool,
}

impl<'a> FrameReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        FrameReader {
            cursor: ByteCursor::new(data),
            failed: false,
        }
    }

    /// Absolute offset of the next envelope.
    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    /// Read the next logical record, or `None` at exact end of input.
    pub fn read_record(&mut self) -> BiffResult<Option<LogicalRecord>> {
        if self.cursor.is_empty() {
            return Ok(None);
        }

        let offset = self.cursor.position();
        let header = RecordHeader::read(&mut self.cursor)?;
        if header.sid == CONTINUE {
            return Err(BiffError::malformed(
                CONTINUE,
                offset,
                "continuation without a preceding record",
            ));
        }
        let first = self.read_segment(&header, offset)?;

        let mut data = first.to_vec();
        let mut layout = SegmentLayout::single(header.data_len);
        while self.cursor.peek_u16() == Some(CONTINUE) {
            let cont_offset = self.cursor.position();
            let cont = RecordHeader::read(&mut self.cursor)?;
            let chunk = self.read_segment(&cont, cont_offset)?;
            tracing::trace!(
                sid = header.sid,
                offset = cont_offset,
                len = cont.data_len,
                "CONTINUE segment"
            );
            data.extend_from_slice(chunk);
            layout.push(cont.data_len);
        }

        if layout.continuations() > 0 {
            tracing::debug!(
                sid = header.sid,
                offset,
                continuations = layout.continuations(),
                total = data.len(),
                "merged continuation segments"
            );
        } else {
            tracing::trace!(sid = header.sid, offset, len = header.data_len, "record");
        }

        Ok(Some(LogicalRecord {
            sid: header.sid,
            offset,
            data,
            layout,
        }))
    }

    fn read_segment(&mut self, header: &RecordHeader, offset: usize) -> BiffResult<&'a [u8]> {
        if header.data_len as usize > MAX_RECORD_DATA {
            return Err(BiffError::malformed(
                header.sid,
                offset,
                format!(
                    "segment length {} exceeds the maximum of {}",
                    header.data_len, MAX_RECORD_DATA
                ),
            ));
        }
        Ok(self.cursor.read_bytes(header.data_len as usize)?)
    }
}

impl Iterator for FrameReader<'_> {
    type Item = BiffResult<LogicalRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.read_record() {
            Ok(record) => record.map(Ok),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            },
        }
    }
}

/// Pick the layout a payload will be written with.
///
/// A preserved layout is only honoured while it still describes the payload;
/// after an edit that changes the length the default split is used.
pub fn choose_layout(
    data_len: usize,
    layout: Option<&SegmentLayout>,
    options: &CodecOptions,
) -> SegmentLayout {
    match layout {
        Some(layout) if options.preserve_layout && layout.fits(data_len) => layout.clone(),
        _ => SegmentLayout::chunked(data_len),
    }
}

/// Bytes a payload of `data_len` occupies once framed.
pub fn framed_size(
    data_len: usize,
    layout: Option<&SegmentLayout>,
    options: &CodecOptions,
) -> usize {
    choose_layout(data_len, layout, options).framed_size()
}

/// Write one logical record as a primary envelope plus CONTINUE envelopes.
pub fn write_record(
    out: &mut ByteWriter,
    sid: u16,
    data: &[u8],
    layout: Option<&SegmentLayout>,
    options: &CodecOptions,
) -> BiffResult<()> {
    if sid == CONTINUE {
        return Err(BiffError::malformed(
            sid,
            out.len(),
            "CONTINUE cannot be written as a record of its own",
        ));
    }

    let layout = choose_layout(data.len(), layout, options);
    if layout.continuations() > options.max_continuations {
        return Err(BiffError::OversizedPayload {
            sid,
            size: data.len(),
            limit: options
                .max_continuations
                .saturating_add(1)
                .saturating_mul(MAX_RECORD_DATA),
        });
    }

    let mut pos = 0;
    for (i, &len) in layout.segments().iter().enumerate() {
        let header = RecordHeader {
            sid: if i == 0 { sid } else { CONTINUE },
            data_len: len,
        };
        header.write(out);
        out.write_bytes(&data[pos..pos + len as usize]);
        pos += len as usize;
    }

    Ok(())
}

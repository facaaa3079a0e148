//! JPEG marker scanning
//!
//! Classifies a JPEG byte stream as baseline or progressive by walking its
//! segments until the frame header is found. No pixel data is decoded.

use std::io::{ErrorKind, Read, Seek, SeekFrom};

use thiserror::Error;

/// Marker prefix byte
const MARKER_PREFIX: u8 = 0xFF;

/// Start Of Image
const SOI: u8 = 0xD8;
/// End Of Image
const EOI: u8 = 0xD9;
/// Start Of Scan
const SOS: u8 = 0xDA;
/// Baseline DCT frame header
const SOF0: u8 = 0xC0;
/// Progressive DCT frame header
const SOF2: u8 = 0xC2;
const RST0: u8 = 0xD0;
const RST7: u8 = 0xD7;

/// Encoding mode of a JPEG image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanResult {
    Baseline,
    Progressive,
}

/// The byte stream could not be interpreted as a JPEG
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("expected marker prefix, found 0x{found:02X} at offset {offset}")]
    ExpectedMarkerPrefix { found: u8, offset: u64 },

    #[error("truncated stream")]
    Truncated,

    #[error("invalid segment length {length} for marker 0x{marker:02X}")]
    InvalidSegmentLength { marker: u8, length: u16 },

    #[error("I/O error while scanning: {0}")]
    Io(#[source] std::io::Error),
}

impl From<std::io::Error> for ScanError {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == ErrorKind::UnexpectedEof {
            ScanError::Truncated
        } else {
            ScanError::Io(err)
        }
    }
}

/// One marker and the location of its payload
///
/// Payload-less markers (SOI, EOI, RSTn) report a zero length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JpegSegment {
    pub marker: u8,
    pub payload_len: u16,
    pub payload_offset: u64,
}

impl JpegSegment {
    fn has_payload(marker: u8) -> bool {
        !matches!(marker, SOI | EOI | SOF0 | SOF2 | SOS | RST0..=RST7)
    }
}

/// Forward-only walker over the segments of a JPEG stream
///
/// Each call to [`MarkerScanner::next_segment`] consumes one marker and
/// seeks past its payload, so segments are never held in memory.
pub struct MarkerScanner<R> {
    reader: R,
    offset: u64,
}

impl<R: Read + Seek> MarkerScanner<R> {
    /// Wrap a reader positioned at the first byte of the image
    pub fn new(reader: R) -> Self {
        Self { reader, offset: 0 }
    }

    fn read_u8(&mut self) -> Result<u8, ScanError> {
        let mut buf = [0u8; 1];
        self.reader.read_exact(&mut buf)?;
        self.offset += 1;
        Ok(buf[0])
    }

    fn read_u16_be(&mut self) -> Result<u16, ScanError> {
        let mut buf = [0u8; 2];
        self.reader.read_exact(&mut buf)?;
        self.offset += 2;
        Ok(u16::from_be_bytes(buf))
    }

    /// Read the next marker and skip its payload
    ///
    /// Frame headers and SOS are returned without consuming their payload,
    /// since scanning stops there.
    pub fn next_segment(&mut self) -> Result<JpegSegment, ScanError> {
        let prefix_offset = self.offset;
        let prefix = self.read_u8()?;
        if prefix != MARKER_PREFIX {
            return Err(ScanError::ExpectedMarkerPrefix {
                found: prefix,
                offset: prefix_offset,
            });
        }

        let marker = self.read_u8()?;
        if !JpegSegment::has_payload(marker) {
            return Ok(JpegSegment {
                marker,
                payload_len: 0,
                payload_offset: self.offset,
            });
        }

        let length = self.read_u16_be()?;
        if length < 2 {
            return Err(ScanError::InvalidSegmentLength { marker, length });
        }
        let payload_len = length - 2;
        let payload_offset = self.offset;

        // Seeking past the end is allowed; the next read reports truncation.
        self.reader.seek(SeekFrom::Current(i64::from(payload_len)))?;
        self.offset += u64::from(payload_len);

        Ok(JpegSegment {
            marker,
            payload_len,
            payload_offset,
        })
    }

    /// Walk segments until the encoding mode is known
    pub fn classify(mut self) -> Result<ScanResult, ScanError> {
        loop {
            let segment = self.next_segment()?;
            match segment.marker {
                SOI | RST0..=RST7 => continue,
                SOF0 => return Ok(ScanResult::Baseline),
                SOF2 => return Ok(ScanResult::Progressive),
                EOI => {
                    log::debug!("Reached end of image without a frame header, assuming baseline");
                    return Ok(ScanResult::Baseline);
                }
                SOS => {
                    // Entropy-coded data follows and is not segment-structured.
                    log::debug!(
                        "Reached start of scan at offset {} without a frame header, assuming baseline",
                        segment.payload_offset
                    );
                    return Ok(ScanResult::Baseline);
                }
                other => {
                    log::trace!(
                        "Skipped marker 0x{:02X} ({} bytes at offset {})",
                        other,
                        segment.payload_len,
                        segment.payload_offset
                    );
                }
            }
        }
    }
}

/// Classify a JPEG stream read from offset 0
pub fn scan_jpeg<R: Read + Seek>(reader: R) -> Result<ScanResult, ScanError> {
    MarkerScanner::new(reader).classify()
}

/// Classify an in-memory JPEG
pub fn scan_jpeg_bytes(data: &[u8]) -> Result<ScanResult, ScanError> {
    scan_jpeg(std::io::Cursor::new(data))
}

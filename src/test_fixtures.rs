//! Test fixtures for artwork normalization tests
//!
//! Builds tiny but well-formed MP3 and FLAC files with embedded pictures,
//! plus JPEG payloads in the encodings the scanner distinguishes.

#![cfg(test)]

use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use std::path::{Path, PathBuf};

/// A real baseline JPEG of the given size, as produced by the image crate
pub fn baseline_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, 85)
        .encode_image(&img)
        .expect("Failed to encode fixture JPEG");
    buffer
}

/// A real 493x58 progressive JPEG the codec can decode
pub fn progressive_jpeg() -> Vec<u8> {
    include_bytes!("../fixtures/progressive_493x58.jpg").to_vec()
}

/// Header segments of an 800x600 progressive JPEG
///
/// Only the marker structure is real; the codec cannot decode it.
pub fn progressive_jpeg_stub() -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8];
    // APP0 / JFIF
    data.extend_from_slice(&[0xFF, 0xE0, 0x00, 0x10]);
    data.extend_from_slice(b"JFIF\0");
    data.extend_from_slice(&[0x01, 0x01, 0x00, 0x00, 0x48, 0x00, 0x48, 0x00, 0x00]);
    // COM
    data.extend_from_slice(&[0xFF, 0xFE, 0x00, 0x07]);
    data.extend_from_slice(b"stub\xFF");
    // SOF2: 8-bit, 600 rows, 800 columns, 3 components
    data.extend_from_slice(&[0xFF, 0xC2, 0x00, 0x11, 0x08, 0x02, 0x58, 0x03, 0x20, 0x03]);
    data.extend_from_slice(&[0x01, 0x22, 0x00, 0x02, 0x11, 0x01, 0x03, 0x11, 0x01]);
    data.extend_from_slice(&[0xFF, 0xD9]);
    data
}

/// A JPEG cut off inside its first segment, before any frame header
pub fn truncated_jpeg() -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8, 0xFF, 0xE1, 0x01, 0x00];
    data.extend_from_slice(b"Exif\0\0");
    data
}

fn syncsafe(size: u32) -> [u8; 4] {
    [
        ((size >> 21) & 0x7F) as u8,
        ((size >> 14) & 0x7F) as u8,
        ((size >> 7) & 0x7F) as u8,
        (size & 0x7F) as u8,
    ]
}

/// Picture type of the fixture picture at `index`: front cover first, then back covers
fn picture_type(index: usize) -> u8 {
    if index == 0 { 3 } else { 4 }
}

/// One raw ID3v2.3 frame: header plus `body`
pub fn id3v23_frame(id: &[u8; 4], body: &[u8]) -> Vec<u8> {
    let mut frame = id.to_vec();
    frame.extend_from_slice(&(body.len() as u32).to_be_bytes());
    frame.extend_from_slice(&[0x00, 0x00]);
    frame.extend_from_slice(body);
    frame
}

/// An ID3v2.3 tag holding `extra_frames` followed by one APIC frame per picture
fn id3v23_tag(extra_frames: &[Vec<u8>], pictures: &[&Vec<u8>]) -> Vec<u8> {
    let mut frames = extra_frames.concat();
    for (index, data) in pictures.iter().enumerate() {
        let mut body = vec![0x00]; // ISO-8859-1
        body.extend_from_slice(b"image/jpeg\0");
        body.push(picture_type(index));
        body.extend_from_slice(format!("Picture {}\0", index).as_bytes());
        body.extend_from_slice(data);
        frames.extend_from_slice(&id3v23_frame(b"APIC", &body));
    }

    let mut tag = b"ID3".to_vec();
    tag.extend_from_slice(&[0x03, 0x00, 0x00]);
    tag.extend_from_slice(&syncsafe(frames.len() as u32));
    tag.extend_from_slice(&frames);
    tag
}

/// A few silent MPEG-1 Layer III frames (128 kbps, 44.1 kHz)
fn mpeg_frames() -> Vec<u8> {
    const FRAME_LEN: usize = 417;
    let mut data = Vec::with_capacity(FRAME_LEN * 8);
    for _ in 0..8 {
        let mut frame = vec![0u8; FRAME_LEN];
        frame[..4].copy_from_slice(&[0xFF, 0xFB, 0x90, 0x64]);
        data.extend_from_slice(&frame);
    }
    data
}

/// Write an MP3 to `dir/name`; no ID3 tag is written when `pictures` is empty
pub fn write_mp3(dir: &Path, name: &str, pictures: &[&Vec<u8>]) -> PathBuf {
    write_mp3_with_frames(dir, name, &[], pictures)
}

/// Write an MP3 whose tag also carries the raw `extra_frames`
pub fn write_mp3_with_frames(
    dir: &Path,
    name: &str,
    extra_frames: &[Vec<u8>],
    pictures: &[&Vec<u8>],
) -> PathBuf {
    let mut bytes = Vec::new();
    if !extra_frames.is_empty() || !pictures.is_empty() {
        bytes.extend_from_slice(&id3v23_tag(extra_frames, pictures));
    }
    bytes.extend_from_slice(&mpeg_frames());

    let path = dir.join(name);
    std::fs::write(&path, bytes).expect("Failed to write MP3 fixture");
    path
}

fn flac_block_header(block_type: u8, last: bool, len: usize) -> [u8; 4] {
    let len = len as u32;
    [
        if last { 0x80 | block_type } else { block_type },
        (len >> 16) as u8,
        (len >> 8) as u8,
        len as u8,
    ]
}

/// STREAMINFO for 44.1 kHz stereo 16-bit audio of unknown length
fn flac_stream_info() -> Vec<u8> {
    let mut info = Vec::with_capacity(34);
    info.extend_from_slice(&4096u16.to_be_bytes());
    info.extend_from_slice(&4096u16.to_be_bytes());
    info.extend_from_slice(&[0, 0, 0, 0, 0, 0]);
    let packed: u64 = (44_100u64 << 44) | (1u64 << 41) | (15u64 << 36);
    info.extend_from_slice(&packed.to_be_bytes());
    info.extend_from_slice(&[0u8; 16]);
    info
}

/// A PICTURE block body recorded as 800x600, 24-bit
fn flac_picture(index: usize, data: &[u8]) -> Vec<u8> {
    let mime = b"image/jpeg";
    let description = format!("Picture {}", index).into_bytes();
    let mut body = Vec::new();
    body.extend_from_slice(&u32::from(picture_type(index)).to_be_bytes());
    body.extend_from_slice(&(mime.len() as u32).to_be_bytes());
    body.extend_from_slice(mime);
    body.extend_from_slice(&(description.len() as u32).to_be_bytes());
    body.extend_from_slice(&description);
    body.extend_from_slice(&800u32.to_be_bytes());
    body.extend_from_slice(&600u32.to_be_bytes());
    body.extend_from_slice(&24u32.to_be_bytes());
    body.extend_from_slice(&0u32.to_be_bytes());
    body.extend_from_slice(&(data.len() as u32).to_be_bytes());
    body.extend_from_slice(data);
    body
}

/// Write a FLAC to `dir/name` with one PICTURE block per picture
pub fn write_flac(dir: &Path, name: &str, pictures: &[&Vec<u8>]) -> PathBuf {
    let mut bytes = b"fLaC".to_vec();

    let stream_info = flac_stream_info();
    bytes.extend_from_slice(&flac_block_header(0, pictures.is_empty(), stream_info.len()));
    bytes.extend_from_slice(&stream_info);

    for (index, data) in pictures.iter().enumerate() {
        let body = flac_picture(index, data);
        let last = index + 1 == pictures.len();
        bytes.extend_from_slice(&flac_block_header(6, last, body.len()));
        bytes.extend_from_slice(&body);
    }

    // Stand-in for the first audio frame
    bytes.extend_from_slice(&[0xFF, 0xF8, 0x69, 0x08, 0x00, 0x00, 0x00, 0x00]);

    let path = dir.join(name);
    std::fs::write(&path, bytes).expect("Failed to write FLAC fixture");
    path
}

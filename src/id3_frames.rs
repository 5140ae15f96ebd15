//! Frame-by-frame ID3v2 reading.
//!
//! The tag is split into raw frames here and `id3` decodes each frame on its own, so a frame that
//! fails to decode is reported as [`Id3v2Frame::Corrupt`] while the frames around it are kept.

use crate::source::{Id3v2Frame, Id3v2Tag, TagSlot};
use crate::stream::AudioStream;
use std::io::{self, Cursor, Read, SeekFrom};
use tracing::debug;

const HEADER_LEN: usize = 10;
const FLAG_UNSYNCHRONISATION: u8 = 0x80;
/// Extended header in v2.3/v2.4, compression in v2.2.
const FLAG_EXTENDED_HEADER: u8 = 0x40;
const FLAG_FOOTER: u8 = 0x10;

fn syncsafe(bytes: &[u8]) -> u32 {
    bytes.iter().fold(0, |acc, &b| (acc << 7) | u32::from(b & 0x7f))
}

fn to_syncsafe(n: u32) -> [u8; 4] {
    [(n >> 21) as u8 & 0x7f, (n >> 14) as u8 & 0x7f, (n >> 7) as u8 & 0x7f, n as u8 & 0x7f]
}

/// Length of the tag that starts with `header`, footer included. `None` when it is not an ID3v2
/// header.
pub fn tag_len(header: &[u8]) -> Option<u64> {
    if header.len() < HEADER_LEN || &header[..3] != b"ID3" {
        return None;
    }
    let footer = if header[5] & FLAG_FOOTER != 0 { HEADER_LEN as u64 } else { 0 };
    Some(HEADER_LEN as u64 + u64::from(syncsafe(&header[6..10])) + footer)
}

/// Reads the ID3v2 tag at the current position of the stream, if there is one.
pub fn read_at(stream: &mut dyn AudioStream) -> TagSlot<Id3v2Tag> {
    match tag_bytes_at(stream) {
        Ok(Some(bytes)) => parse(&bytes),
        Ok(None) => TagSlot::Absent,
        Err(e) => TagSlot::Corrupt(e.to_string()),
    }
}

fn tag_bytes_at(stream: &mut dyn AudioStream) -> io::Result<Option<Vec<u8>>> {
    let mut header = [0u8; HEADER_LEN];
    match stream.read_exact(&mut header) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e),
    }
    if &header[..3] != b"ID3" {
        return Ok(None);
    }
    let size = u64::from(syncsafe(&header[6..10]));
    let mut bytes = header.to_vec();
    // A truncated tag keeps whatever is there; frames running past the end are reported.
    (&mut *stream).take(size).read_to_end(&mut bytes)?;
    Ok(Some(bytes))
}

/// Reads the `id3 ` chunk of a RIFF/WAVE stream.
pub fn read_riff_chunk(stream: &mut dyn AudioStream) -> TagSlot<Id3v2Tag> {
    match riff_chunk_bytes(stream) {
        Ok(Some(bytes)) => parse(&bytes),
        Ok(None) => TagSlot::Absent,
        Err(e) => TagSlot::Corrupt(e.to_string()),
    }
}

fn riff_chunk_bytes(stream: &mut dyn AudioStream) -> io::Result<Option<Vec<u8>>> {
    stream.seek(SeekFrom::Start(0))?;
    let mut riff = [0u8; 12];
    stream.read_exact(&mut riff)?;
    if &riff[..4] != b"RIFF" || &riff[8..12] != b"WAVE" {
        return Ok(None);
    }
    let mut chunk_header = [0u8; 8];
    loop {
        match stream.read_exact(&mut chunk_header) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e),
        }
        let size = u32::from_le_bytes([chunk_header[4], chunk_header[5], chunk_header[6], chunk_header[7]]);
        if chunk_header[..4].eq_ignore_ascii_case(b"id3 ") {
            let mut bytes = Vec::new();
            (&mut *stream).take(u64::from(size)).read_to_end(&mut bytes)?;
            return Ok(Some(bytes));
        }
        // Chunks are padded to an even length.
        stream.seek(SeekFrom::Current(i64::from(size) + i64::from(size % 2)))?;
    }
}

/// Splits a complete tag (header included) into frames.
pub fn parse(bytes: &[u8]) -> TagSlot<Id3v2Tag> {
    if bytes.len() < HEADER_LEN || &bytes[..3] != b"ID3" {
        return TagSlot::Absent;
    }
    let major = bytes[3];
    let flags = bytes[5];
    if !(2..=4).contains(&major) {
        return TagSlot::Corrupt(format!("unsupported ID3v2.{} tag", major));
    }
    if major == 2 && flags & FLAG_EXTENDED_HEADER != 0 {
        return TagSlot::Corrupt("compressed ID3v2.2 tag".to_string());
    }

    let end = (HEADER_LEN + syncsafe(&bytes[6..10]) as usize).min(bytes.len());
    let mut body = bytes[HEADER_LEN..end].to_vec();
    // v2.4 unsynchronises per frame instead.
    if major < 4 && flags & FLAG_UNSYNCHRONISATION != 0 {
        body = resync(&body);
    }
    let start = if major > 2 && flags & FLAG_EXTENDED_HEADER != 0 {
        match extended_header_len(major, &body) {
            Some(len) if len <= body.len() => len,
            _ => return TagSlot::Corrupt("bad extended header".to_string()),
        }
    } else {
        0
    };
    TagSlot::Present(Id3v2Tag { frames: split_frames(major, &body[start..]) })
}

fn extended_header_len(major: u8, body: &[u8]) -> Option<usize> {
    let size = body.get(..4)?;
    match major {
        // v2.3 does not count the size field itself.
        3 => Some(4 + u32::from_be_bytes([size[0], size[1], size[2], size[3]]) as usize),
        _ => Some(syncsafe(size) as usize),
    }
}

/// Undoes tag-level unsynchronisation: every `FF 00` becomes `FF`.
fn resync(body: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(body.len());
    let mut prev = 0u8;
    for &b in body {
        if !(prev == 0xFF && b == 0x00) {
            out.push(b);
        }
        prev = b;
    }
    out
}

fn split_frames(major: u8, body: &[u8]) -> Vec<Id3v2Frame> {
    let (header_len, id_len) = if major == 2 { (6, 3) } else { (10, 4) };
    let mut frames = Vec::new();
    let mut pos = 0;
    while body.len() - pos >= header_len {
        let header = &body[pos..pos + header_len];
        if header[0] == 0 {
            break; // padding
        }
        let id = String::from_utf8_lossy(&header[..id_len]).into_owned();
        let size = match major {
            2 => u32::from_be_bytes([0, header[3], header[4], header[5]]),
            3 => u32::from_be_bytes([header[4], header[5], header[6], header[7]]),
            _ => syncsafe(&header[4..8]),
        } as usize;
        let Some(end) = (pos + header_len).checked_add(size).filter(|&end| end <= body.len()) else {
            frames.push(Id3v2Frame::Corrupt { id, reason: "frame overruns tag".to_string() });
            break;
        };
        let frame = if !header[..id_len].iter().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()) {
            Id3v2Frame::Corrupt { id, reason: "invalid frame id".to_string() }
        } else if size == 0 {
            Id3v2Frame::Corrupt { id, reason: "empty frame".to_string() }
        } else {
            decode_frame(major, &body[pos..end], id)
        };
        frames.push(frame);
        pos = end;
    }
    frames
}

/// Decodes one raw frame by wrapping it in a tag of its own.
fn decode_frame(major: u8, raw: &[u8], id: String) -> Id3v2Frame {
    let mut single = Vec::with_capacity(HEADER_LEN + raw.len());
    single.extend_from_slice(b"ID3");
    single.extend_from_slice(&[major, 0, 0]);
    single.extend_from_slice(&to_syncsafe(raw.len() as u32));
    single.extend_from_slice(raw);
    match id3::Tag::read_from2(Cursor::new(single)) {
        Ok(tag) => match tag.frames().next() {
            Some(frame) => convert(frame),
            None => Id3v2Frame::Other { id },
        },
        Err(e) => {
            debug!("Skipping undecodable {} frame: {}", id, e);
            Id3v2Frame::Corrupt { id, reason: e.to_string() }
        }
    }
}

fn convert(frame: &id3::Frame) -> Id3v2Frame {
    let id = frame.id().to_string();
    match frame.content() {
        id3::Content::ExtendedText(ext) => {
            let fields = std::iter::once(ext.description.clone()).chain(split_nul(&ext.value)).collect();
            Id3v2Frame::UserText { id, fields }
        }
        id3::Content::Text(text) => Id3v2Frame::Text { id, values: split_nul(text) },
        id3::Content::Picture(pic) => {
            Id3v2Frame::Picture { id, picture_type: u8::from(pic.picture_type), mime_type: pic.mime_type.clone(), data: pic.data.clone() }
        }
        _ => Id3v2Frame::Other { id },
    }
}

/// ID3v2.4 separates multiple values with NUL.
fn split_nul(text: &str) -> Vec<String> {
    text.split('\0').filter(|s| !s.is_empty()).map(str::to_string).collect()
}

//! Raw Vorbis comment blocks, as stored in FLAC metadata and Ogg comment packets.
//!
//! Field names are kept exactly as written and fields keep their file order. Pictures are decoded
//! with `lofty`, which bounds-checks the FLAC picture layout.

use crate::source::{NativePicture, XiphComment};
use lofty::config::ParsingMode;
use lofty::picture::Picture;
use tracing::warn;

const PICTURE_FIELD: &str = "METADATA_BLOCK_PICTURE";
const LEGACY_COVER_FIELD: &str = "COVERART";

struct BlockReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> BlockReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn u32(&mut self) -> Result<u32, String> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], String> {
        let end = self.pos.checked_add(len).filter(|&end| end <= self.bytes.len()).ok_or_else(|| format!("comment block truncated at byte {}", self.pos))?;
        let out = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(out)
    }

    /// A length-prefixed string.
    fn chunk(&mut self) -> Result<&'a [u8], String> {
        let len = self.u32()? as usize;
        self.take(len)
    }
}

/// Parses a comment block without its packet signature. Trailing bytes (the Vorbis framing bit)
/// are ignored.
pub fn parse(block: &[u8]) -> Result<XiphComment, String> {
    let mut reader = BlockReader::new(block);
    let vendor = String::from_utf8_lossy(reader.chunk()?).into_owned();
    let count = reader.u32()?;

    let mut comment = XiphComment { vendor: Some(vendor), ..XiphComment::default() };
    for _ in 0..count {
        let raw = reader.chunk()?;
        let Some(split) = raw.iter().position(|&b| b == b'=') else {
            warn!("Skipping comment field without '='");
            continue;
        };
        let name = String::from_utf8_lossy(&raw[..split]).into_owned();
        let value = &raw[split + 1..];
        if name.is_empty() {
            continue;
        }
        if name.eq_ignore_ascii_case(PICTURE_FIELD) {
            match Picture::from_flac_bytes(value, true, ParsingMode::BestAttempt) {
                Ok((picture, _)) => comment.pictures.push(native(&picture)),
                Err(e) => warn!("Skipping unreadable {}: {}", PICTURE_FIELD, e),
            }
            continue;
        }
        if name.eq_ignore_ascii_case(LEGACY_COVER_FIELD) {
            match data_encoding::BASE64.decode(value) {
                Ok(data) => comment.pictures.push(NativePicture { picture_type: 0, mime_type: None, data }),
                Err(e) => warn!("Skipping unreadable {}: {}", LEGACY_COVER_FIELD, e),
            }
            continue;
        }
        let value = String::from_utf8_lossy(value).into_owned();
        match comment.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, values)) => values.push(value),
            None => comment.fields.push((name, vec![value])),
        }
    }
    Ok(comment)
}

/// Decodes the body of a FLAC `PICTURE` metadata block.
pub fn flac_picture(block: &[u8]) -> Result<NativePicture, String> {
    Picture::from_flac_bytes(block, false, ParsingMode::BestAttempt).map(|(picture, _)| native(&picture)).map_err(|e| e.to_string())
}

fn native(picture: &Picture) -> NativePicture {
    NativePicture {
        picture_type: picture.pic_type().as_u8(),
        mime_type: picture.mime_type().map(|m| m.as_str().to_string()),
        data: picture.data().to_vec(),
    }
}

//! The bundled container reader.
//!
//! `lofty` detects the container and reads the stream properties. Native tags are read without
//! its tag layer: ID3v2 frame by frame (decoded with `id3`), ID3v1 with `id3`, FLAC metadata blocks
//! and Ogg comment packets (`ogg_pager`) as raw Vorbis comments, and MP4 atoms with `mp4ameta`.

use crate::error::OpenError;
use crate::id3_frames;
use crate::source::{
    AudioProperties, ContainerKind, ContainerReader, CoverFormat, Id3v1Block, Mp4CoverArt, Mp4Data, Mp4Item, Mp4Tag, NativePicture, ParsedFile,
    TagSlot, XiphComment,
};
use crate::stream::AudioStream;
use crate::vorbis_comment;
use lofty::config::ParseOptions;
use lofty::file::{AudioFile, FileType, TaggedFile};
use lofty::probe::Probe;
use std::fmt::Display;
use std::io::{self, Read, SeekFrom};
use tracing::{debug, warn};

const FLAC_MARKER: &[u8; 4] = b"fLaC";
const FLAC_VORBIS_COMMENT: u8 = 4;
const FLAC_PICTURE: u8 = 6;
const VORBIS_COMMENT_SIGNATURE: &[u8] = b"\x03vorbis";
const OPUS_TAGS_SIGNATURE: &[u8] = b"OpusTags";

/// One-byte atoms that are flags rather than numbers.
const BOOL_ATOMS: [&str; 5] = ["cpil", "pgap", "pcst", "hdvd", "shwm"];
/// Four-byte atoms that are unsigned.
const UINT_ATOMS: [&str; 7] = ["tves", "tvsn", "sfID", "cnID", "atID", "geID", "cmID"];

#[derive(Debug, Clone, Copy, Default)]
pub struct TagReader;

impl TagReader {
    pub fn new() -> Self {
        TagReader
    }
}

impl ContainerReader for TagReader {
    fn open_container(&self, stream: &mut dyn AudioStream) -> Result<ParsedFile, OpenError> {
        rewind(stream)?;
        // Tags are read below; lofty only has to get through the audio stream.
        let probe = Probe::new(&mut *stream).options(ParseOptions::new().read_tags(false).read_cover_art(false)).guess_file_type().map_err(unreadable)?;
        let kind = match probe.file_type() {
            Some(FileType::Mpeg) => ContainerKind::Mpeg,
            Some(FileType::Mp4) => ContainerKind::Mp4,
            Some(FileType::Flac) => ContainerKind::Flac,
            Some(FileType::Opus) => ContainerKind::OggOpus,
            Some(FileType::Vorbis) => ContainerKind::OggVorbis,
            Some(FileType::Wav) => ContainerKind::RiffWav,
            Some(other) => return Err(OpenError::UnsupportedContainer(format!("{:?}", other))),
            None => return Err(OpenError::UnsupportedContainer("unrecognized file format".to_string())),
        };
        let tagged_file = probe.read().map_err(unreadable)?;
        debug!("Detected {:?} in {}", kind, stream.name());

        let mut parsed = ParsedFile { properties: properties(&tagged_file), ..ParsedFile::empty(kind) };
        match kind {
            ContainerKind::Mpeg => {
                rewind(stream)?;
                parsed.id3v2 = id3_frames::read_at(stream);
                rewind(stream)?;
                parsed.id3v1 = read_id3v1(stream);
            }
            ContainerKind::Flac => {
                rewind(stream)?;
                parsed.id3v2 = id3_frames::read_at(stream);
                rewind(stream)?;
                parsed.id3v1 = read_id3v1(stream);
                let (xiph, pictures) = read_flac(stream);
                parsed.xiph = xiph;
                parsed.flac_pictures = pictures;
            }
            ContainerKind::Mp4 => {
                rewind(stream)?;
                parsed.mp4 = read_mp4(stream);
            }
            ContainerKind::OggOpus => {
                rewind(stream)?;
                parsed.xiph = read_ogg_comment(stream, OPUS_TAGS_SIGNATURE);
            }
            ContainerKind::OggVorbis => {
                rewind(stream)?;
                parsed.xiph = read_ogg_comment(stream, VORBIS_COMMENT_SIGNATURE);
            }
            ContainerKind::RiffWav => parsed.id3v2 = id3_frames::read_riff_chunk(stream),
        }
        Ok(parsed)
    }
}

fn unreadable(e: impl Display) -> OpenError {
    OpenError::UnreadableStream(e.to_string())
}

fn rewind(stream: &mut dyn AudioStream) -> Result<(), OpenError> {
    stream.seek(SeekFrom::Start(0)).map(|_| ()).map_err(unreadable)
}

/// A stream with no sample rate is treated as having no audio properties at all.
fn properties(tagged_file: &TaggedFile) -> Option<AudioProperties> {
    let props = tagged_file.properties();
    let sample_rate = props.sample_rate().filter(|&rate| rate > 0)?;
    Some(AudioProperties {
        duration_millis: i64::try_from(props.duration().as_millis()).unwrap_or(i64::MAX),
        bitrate_kbps: props.audio_bitrate().or(props.overall_bitrate()).map(|b| b as i32).unwrap_or(0),
        sample_rate_hz: sample_rate as i32,
        channels: props.channels().map(i32::from).unwrap_or(0),
    })
}

// ID3v1

fn read_id3v1(stream: &mut dyn AudioStream) -> TagSlot<Id3v1Block> {
    match id3::v1::Tag::read_from(&mut *stream) {
        Ok(tag) => TagSlot::Present(Id3v1Block {
            title: tag.title,
            artist: tag.artist,
            album: tag.album,
            year: tag.year,
            comment: tag.comment,
            track: tag.track,
            genre_index: tag.genre_id,
        }),
        Err(id3::Error { kind: id3::ErrorKind::NoTag, .. }) => TagSlot::Absent,
        Err(e) => TagSlot::Corrupt(e.to_string()),
    }
}

// FLAC

fn read_flac(stream: &mut dyn AudioStream) -> (TagSlot<XiphComment>, TagSlot<Vec<NativePicture>>) {
    let blocks = match flac_blocks(stream) {
        Ok(blocks) => blocks,
        Err(e) => return (TagSlot::Corrupt(e), TagSlot::Absent),
    };

    let mut xiph = TagSlot::Absent;
    let mut pictures = Vec::new();
    for (block_type, body) in blocks {
        match block_type {
            FLAC_VORBIS_COMMENT if matches!(xiph, TagSlot::Absent) => {
                xiph = match vorbis_comment::parse(&body) {
                    Ok(comment) => TagSlot::Present(comment),
                    Err(e) => TagSlot::Corrupt(e),
                };
            }
            FLAC_VORBIS_COMMENT => debug!("Ignoring extra comment block"),
            _ => match vorbis_comment::flac_picture(&body) {
                Ok(picture) => pictures.push(picture),
                Err(e) => warn!("Skipping unreadable picture block: {}", e),
            },
        }
    }
    let pictures = if pictures.is_empty() { TagSlot::Absent } else { TagSlot::Present(pictures) };
    (xiph, pictures)
}

/// Comment and picture blocks of a FLAC stream, in file order. A leading ID3v2 tag is skipped.
fn flac_blocks(stream: &mut dyn AudioStream) -> Result<Vec<(u8, Vec<u8>)>, String> {
    let io_err = |e: io::Error| e.to_string();
    stream.seek(SeekFrom::Start(0)).map_err(io_err)?;
    let mut head = [0u8; 10];
    stream.read_exact(&mut head).map_err(io_err)?;
    let start = id3_frames::tag_len(&head).unwrap_or(0);
    stream.seek(SeekFrom::Start(start)).map_err(io_err)?;

    let mut marker = [0u8; 4];
    stream.read_exact(&mut marker).map_err(io_err)?;
    if &marker != FLAC_MARKER {
        return Err("missing fLaC marker".to_string());
    }

    let mut blocks = Vec::new();
    loop {
        let mut header = [0u8; 4];
        stream.read_exact(&mut header).map_err(io_err)?;
        let last = header[0] & 0x80 != 0;
        let block_type = header[0] & 0x7f;
        let len = u32::from_be_bytes([0, header[1], header[2], header[3]]);
        if block_type == FLAC_VORBIS_COMMENT || block_type == FLAC_PICTURE {
            let mut body = Vec::new();
            (&mut *stream).take(u64::from(len)).read_to_end(&mut body).map_err(io_err)?;
            if body.len() < len as usize {
                return Err(format!("metadata block {} truncated", block_type));
            }
            blocks.push((block_type, body));
        } else {
            stream.seek(SeekFrom::Current(i64::from(len))).map_err(io_err)?;
        }
        if last {
            return Ok(blocks);
        }
    }
}

// Ogg

/// Reads the comment header, which is always the second packet of the logical stream.
fn read_ogg_comment(stream: &mut dyn AudioStream, signature: &[u8]) -> TagSlot<XiphComment> {
    let mut reader: &mut dyn AudioStream = stream;
    let packets = match ogg_pager::Packets::read_count(&mut reader, 2) {
        Ok(packets) => packets,
        Err(e) => return TagSlot::Corrupt(e.to_string()),
    };
    match packets.get(1) {
        Some(packet) if packet.starts_with(signature) => match vorbis_comment::parse(&packet[signature.len()..]) {
            Ok(comment) => TagSlot::Present(comment),
            Err(e) => TagSlot::Corrupt(e),
        },
        _ => TagSlot::Corrupt("missing comment header".to_string()),
    }
}

// MP4

fn read_mp4(stream: &mut dyn AudioStream) -> TagSlot<Mp4Tag> {
    let mut reader: &mut dyn AudioStream = stream;
    let tag = match mp4ameta::Tag::read_from(&mut reader) {
        Ok(tag) => tag,
        Err(e) => return TagSlot::Corrupt(e.to_string()),
    };

    let mut items: Vec<Mp4Item> = Vec::new();
    for (ident, data) in tag.data() {
        let name = match ident {
            mp4ameta::DataIdent::Fourcc(fourcc) => fourcc.0.iter().map(|&b| b as char).collect(),
            mp4ameta::DataIdent::Freeform { mean, name } => format!("----:{}:{}", mean, name),
        };
        let data = match data {
            mp4ameta::Data::Utf8(s) | mp4ameta::Data::Utf16(s) => {
                // Atoms with several data children come through as consecutive entries.
                if let Some(Mp4Item { name: last, data: Mp4Data::StringList(values) }) = items.last_mut() {
                    if *last == name {
                        values.push(s.clone());
                        continue;
                    }
                }
                Mp4Data::StringList(vec![s.clone()])
            }
            mp4ameta::Data::Jpeg(b) => Mp4Data::CoverArt(vec![Mp4CoverArt { format: CoverFormat::Jpeg, data: b.clone() }]),
            mp4ameta::Data::Png(b) => Mp4Data::CoverArt(vec![Mp4CoverArt { format: CoverFormat::Png, data: b.clone() }]),
            mp4ameta::Data::Bmp(b) => Mp4Data::CoverArt(vec![Mp4CoverArt { format: CoverFormat::Bmp, data: b.clone() }]),
            mp4ameta::Data::BeSigned(b) => be_signed(&name, b),
            mp4ameta::Data::Reserved(b) => reserved(&name, b),
            #[allow(unreachable_patterns)]
            _ => Mp4Data::Void,
        };
        if let Mp4Data::CoverArt(arts) = &data {
            if let Some(Mp4Item { name: last, data: Mp4Data::CoverArt(previous) }) = items.last_mut() {
                if *last == name {
                    previous.extend(arts.iter().cloned());
                    continue;
                }
            }
        }
        items.push(Mp4Item { name, data });
    }
    TagSlot::Present(Mp4Tag { items })
}

fn be_signed(name: &str, bytes: &[u8]) -> Mp4Data {
    match *bytes {
        [b] if BOOL_ATOMS.contains(&name) => Mp4Data::Bool(b != 0),
        [b] => Mp4Data::Byte(b),
        [a, b] => Mp4Data::Int(i32::from(i16::from_be_bytes([a, b]))),
        [a, b, c, d] if UINT_ATOMS.contains(&name) => Mp4Data::UInt(u32::from_be_bytes([a, b, c, d])),
        [a, b, c, d] => Mp4Data::Int(i32::from_be_bytes([a, b, c, d])),
        [a, b, c, d, e, f, g, h] => Mp4Data::LongLong(i64::from_be_bytes([a, b, c, d, e, f, g, h])),
        _ => Mp4Data::ByteVectorList(vec![bytes.to_vec()]),
    }
}

/// Implicitly typed atoms. Track and disc numbers are stored as `[0, 0, n, n, t, t, ..]`.
fn reserved(name: &str, bytes: &[u8]) -> Mp4Data {
    match (name, bytes) {
        ("trkn" | "disk", [_, _, a, b, c, d, ..]) => Mp4Data::IntPair(i32::from(u16::from_be_bytes([*a, *b])), i32::from(u16::from_be_bytes([*c, *d]))),
        ("gnre", [a, b]) => Mp4Data::Int(i32::from(u16::from_be_bytes([*a, *b]))),
        _ => Mp4Data::ByteVectorList(vec![bytes.to_vec()]),
    }
}

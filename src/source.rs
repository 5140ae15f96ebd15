//! Format-native tag objects as handed over by a container reader.
//!
//! These types mirror what the low-level decoders expose, before any normalization happens. A
//! `ContainerReader` turns a stream into a `ParsedFile`; the builder then runs the adapters that apply
//! to the detected container.

use crate::error::OpenError;
use crate::stream::AudioStream;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ContainerKind {
    Mpeg,
    Mp4,
    Flac,
    OggOpus,
    OggVorbis,
    RiffWav,
}

impl ContainerKind {
    pub fn mime_type(self) -> &'static str {
        match self {
            ContainerKind::Mpeg => "audio/mpeg",
            ContainerKind::Mp4 => "audio/mp4",
            ContainerKind::Flac => "audio/flac",
            ContainerKind::OggOpus => "audio/opus",
            ContainerKind::OggVorbis => "audio/vorbis",
            ContainerKind::RiffWav => "audio/wav",
        }
    }

    /// Best guess from a file extension, used to filter directory scans. The container is always
    /// detected from content when a file is actually read.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "mp3" | "mp2" | "mpga" => Some(ContainerKind::Mpeg),
            "m4a" | "m4b" | "mp4" | "aac" | "alac" => Some(ContainerKind::Mp4),
            "flac" => Some(ContainerKind::Flac),
            "opus" => Some(ContainerKind::OggOpus),
            "ogg" | "oga" => Some(ContainerKind::OggVorbis),
            "wav" | "wave" => Some(ContainerKind::RiffWav),
            _ => None,
        }
    }
}

/// Stream properties of the audio itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AudioProperties {
    pub duration_millis: i64,
    pub bitrate_kbps: i32,
    pub sample_rate_hz: i32,
    pub channels: i32,
}

/// How a reader reports one native tag of a file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TagSlot<T> {
    #[default]
    Absent,
    Present(T),
    /// The tag exists but could not be decoded.
    Corrupt(String),
}

impl<T> TagSlot<T> {
    pub fn is_present(&self) -> bool {
        matches!(self, TagSlot::Present(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Id3v1Block {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub year: String,
    pub comment: String,
    pub track: Option<u8>,
    /// Index into the ID3v1 genre table, 255 when unset.
    pub genre_index: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Id3v2Frame {
    /// A text information frame (`TIT2`, `TPE1`, ...). Multiple values are already split.
    Text { id: String, values: Vec<String> },
    /// A user-defined text frame (`TXXX`). The first field is the description.
    UserText { id: String, fields: Vec<String> },
    Picture { id: String, picture_type: u8, mime_type: String, data: Vec<u8> },
    /// Frames that carry nothing the engine maps (comments, lyrics, chapters, ...).
    Other { id: String },
    /// A frame the decoder could not read.
    Corrupt { id: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Id3v2Tag {
    pub frames: Vec<Id3v2Frame>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativePicture {
    /// APIC/FLAC picture type code.
    pub picture_type: u8,
    pub mime_type: Option<String>,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XiphComment {
    pub vendor: Option<String>,
    /// Field names as they appear in the file, each with its values in order.
    pub fields: Vec<(String, Vec<String>)>,
    /// `METADATA_BLOCK_PICTURE` entries embedded in the comment.
    pub pictures: Vec<NativePicture>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverFormat {
    Jpeg,
    Png,
    Bmp,
    Gif,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mp4CoverArt {
    pub format: CoverFormat,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mp4Data {
    StringList(Vec<String>),
    Int(i32),
    UInt(u32),
    LongLong(i64),
    IntPair(i32, i32),
    Bool(bool),
    Byte(u8),
    CoverArt(Vec<Mp4CoverArt>),
    ByteVectorList(Vec<Vec<u8>>),
    Void,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mp4Item {
    /// Atom name, or `----:mean:name` for freeform atoms.
    pub name: String,
    pub data: Mp4Data,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Mp4Tag {
    pub items: Vec<Mp4Item>,
}

/// Everything a reader found in one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFile {
    pub kind: ContainerKind,
    pub properties: Option<AudioProperties>,
    pub id3v1: TagSlot<Id3v1Block>,
    pub id3v2: TagSlot<Id3v2Tag>,
    pub xiph: TagSlot<XiphComment>,
    pub flac_pictures: TagSlot<Vec<NativePicture>>,
    pub mp4: TagSlot<Mp4Tag>,
}

impl ParsedFile {
    /// A file of the given kind with no tags and no properties.
    pub fn empty(kind: ContainerKind) -> Self {
        Self {
            kind,
            properties: None,
            id3v1: TagSlot::Absent,
            id3v2: TagSlot::Absent,
            xiph: TagSlot::Absent,
            flac_pictures: TagSlot::Absent,
            mp4: TagSlot::Absent,
        }
    }
}

/// Detects the container of a stream and decodes its native tags.
pub trait ContainerReader {
    fn open_container(&self, stream: &mut dyn AudioStream) -> Result<ParsedFile, OpenError>;
}

//! Orchestrates one extraction: open the container, capture its audio properties, run the adapters
//! that apply to it and assemble the result.
//!
//! The pipeline is expressed as a chain of state types (`Opened`, `PropertiesCaptured`,
//! `TagsExtracted`) so the steps can only run in order. Most callers want [`extract`] or
//! [`extract_path`] instead of driving the states by hand.

use crate::config::ExtractConfig;
use crate::cover::CoverSelector;
use crate::error::{Diagnostics, ExtractError, Result, SubTagKind, TagError};
use crate::probe::TagReader;
use crate::source::{AudioProperties, ContainerKind, ContainerReader, ParsedFile, TagSlot};
use crate::stream::{AudioStream, FileStream};
use crate::tagmap::TagMap;
use crate::{id3v1, id3v2, mp4, xiph};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::Path;
use tracing::{debug, info};

/// The canonical metadata of one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub mime_type: String,
    pub id3_like: TagMap,
    pub vorbis_like: TagMap,
    pub mp4_like: TagMap,
    #[serde(skip)]
    pub cover: Option<Vec<u8>>,
    pub properties: AudioProperties,
}

impl Metadata {
    /// Lowercase hex SHA-256 of the cover, usable as a stable cover identity.
    pub fn cover_digest(&self) -> Option<String> {
        self.cover.as_ref().map(|data| format!("{:x}", Sha256::digest(data)))
    }
}

/// Metadata together with the recoverable problems met while building it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub metadata: Metadata,
    pub diagnostics: Vec<TagError>,
}

/// Per-call settings handed to the builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildContext {
    pub name: String,
    pub read_covers: bool,
    pub max_cover_bytes: Option<usize>,
}

impl BuildContext {
    pub fn new(name: impl Into<String>, config: &ExtractConfig) -> Self {
        Self { name: name.into(), read_covers: config.read_covers, max_cover_bytes: config.max_cover_bytes }
    }
}

/// Everything the adapters write into during one extraction.
#[derive(Debug, Default)]
pub struct TagSink {
    pub id3_like: TagMap,
    pub vorbis_like: TagMap,
    pub mp4_like: TagMap,
    pub covers: CoverSelector,
    pub diagnostics: Diagnostics,
}

impl TagSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn for_context(ctx: &BuildContext) -> Self {
        let covers = if ctx.read_covers { CoverSelector::new().with_max_bytes(ctx.max_cover_bytes) } else { CoverSelector::disabled() };
        Self { covers, ..Self::default() }
    }
}

pub struct MetadataBuilder;

impl MetadataBuilder {
    /// Detects the container. Fails with `UnreadableStream` or `UnsupportedContainer`.
    pub fn open(stream: &mut dyn AudioStream, reader: &dyn ContainerReader, ctx: BuildContext) -> Result<Opened> {
        let parsed = reader.open_container(stream).map_err(|e| ExtractError::from_open(&ctx.name, e))?;
        debug!("Opened {} as {:?}", ctx.name, parsed.kind);
        Ok(Opened { ctx, parsed })
    }
}

pub struct Opened {
    ctx: BuildContext,
    parsed: ParsedFile,
}

impl Opened {
    pub fn kind(&self) -> ContainerKind {
        self.parsed.kind
    }

    pub fn capture_properties(self) -> Result<PropertiesCaptured> {
        let properties = self.parsed.properties.ok_or_else(|| ExtractError::MissingAudioProperties { name: self.ctx.name.clone() })?;
        Ok(PropertiesCaptured { ctx: self.ctx, parsed: self.parsed, properties })
    }
}

pub struct PropertiesCaptured {
    ctx: BuildContext,
    parsed: ParsedFile,
    properties: AudioProperties,
}

impl PropertiesCaptured {
    pub fn properties(&self) -> AudioProperties {
        self.properties
    }

    /// Runs the adapters that apply to the detected container. Native tags of any other format that
    /// the reader happened to report are ignored.
    pub fn extract_tags(self) -> TagsExtracted {
        let mut sink = TagSink::for_context(&self.ctx);
        let parsed = self.parsed;
        match parsed.kind {
            ContainerKind::Mpeg => {
                run(parsed.id3v1, SubTagKind::Id3v1, &mut sink, id3v1::adapt);
                run(parsed.id3v2, SubTagKind::Id3v2, &mut sink, id3v2::adapt);
            }
            ContainerKind::Flac => {
                run(parsed.id3v1, SubTagKind::Id3v1, &mut sink, id3v1::adapt);
                run(parsed.id3v2, SubTagKind::Id3v2, &mut sink, id3v2::adapt);
                run(parsed.xiph, SubTagKind::Xiph, &mut sink, xiph::adapt);
                run(parsed.flac_pictures, SubTagKind::FlacPictures, &mut sink, xiph::adapt_flac_pictures);
            }
            ContainerKind::Mp4 => run(parsed.mp4, SubTagKind::Mp4, &mut sink, mp4::adapt),
            ContainerKind::OggOpus | ContainerKind::OggVorbis => run(parsed.xiph, SubTagKind::Xiph, &mut sink, xiph::adapt),
            ContainerKind::RiffWav => run(parsed.id3v2, SubTagKind::Id3v2, &mut sink, id3v2::adapt),
        }
        TagsExtracted { ctx: self.ctx, kind: parsed.kind, properties: self.properties, sink }
    }
}

fn run<T>(slot: TagSlot<T>, tag: SubTagKind, sink: &mut TagSink, adapter: fn(T, &mut TagSink)) {
    match slot {
        TagSlot::Absent => {}
        TagSlot::Present(native) => adapter(native, sink),
        TagSlot::Corrupt(reason) => sink.diagnostics.record(TagError::malformed(tag, reason)),
    }
}

pub struct TagsExtracted {
    ctx: BuildContext,
    kind: ContainerKind,
    properties: AudioProperties,
    sink: TagSink,
}

impl TagsExtracted {
    pub fn build(self) -> Extraction {
        let sink = self.sink;
        let metadata = Metadata {
            mime_type: self.kind.mime_type().to_string(),
            id3_like: sink.id3_like,
            vorbis_like: sink.vorbis_like,
            mp4_like: sink.mp4_like,
            cover: sink.covers.select(),
            properties: self.properties,
        };
        info!(
            "Extracted {} ({}): {} ID3, {} Vorbis, {} MP4 keys, {} diagnostics",
            self.ctx.name,
            metadata.mime_type,
            metadata.id3_like.len(),
            metadata.vorbis_like.len(),
            metadata.mp4_like.len(),
            sink.diagnostics.len()
        );
        Extraction { metadata, diagnostics: sink.diagnostics.into_vec() }
    }
}

/// Runs the full pipeline and keeps the recoverable diagnostics.
pub fn extract_with_diagnostics(stream: &mut dyn AudioStream, reader: &dyn ContainerReader, config: &ExtractConfig) -> Result<Extraction> {
    let ctx = BuildContext::new(stream.name(), config);
    Ok(MetadataBuilder::open(stream, reader, ctx)?.capture_properties()?.extract_tags().build())
}

pub fn extract(stream: &mut dyn AudioStream, reader: &dyn ContainerReader, config: &ExtractConfig) -> Result<Metadata> {
    extract_with_diagnostics(stream, reader, config).map(|e| e.metadata)
}

/// Opens `path` and extracts it with the bundled [`TagReader`].
pub fn extract_path(path: impl AsRef<Path>, config: &ExtractConfig) -> Result<Metadata> {
    let path = path.as_ref();
    let mut stream = FileStream::open(path)
        .map_err(|e| ExtractError::UnreadableStream { name: path.display().to_string(), reason: e.to_string() })?;
    extract(&mut stream, &TagReader::new(), config)
}

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use tracing::warn;

/// Failures reported by a container reader while opening a stream.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OpenError {
    #[error("Stream could not be read: {0}")]
    UnreadableStream(String),
    #[error("Unsupported container: {0}")]
    UnsupportedContainer(String),
}

/// Fatal extraction failures. None of these ever produce a `Metadata`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("Failed to read {name}: {reason}")]
    UnreadableStream { name: String, reason: String },
    #[error("Unsupported container in {name}: {reason}")]
    UnsupportedContainer { name: String, reason: String },
    #[error("No audio properties available for {name}")]
    MissingAudioProperties { name: String },
}

impl ExtractError {
    pub(crate) fn from_open(name: &str, err: OpenError) -> Self {
        match err {
            OpenError::UnreadableStream(reason) => ExtractError::UnreadableStream { name: name.to_string(), reason },
            OpenError::UnsupportedContainer(reason) => ExtractError::UnsupportedContainer { name: name.to_string(), reason },
        }
    }
}

/// Which native tag a recoverable problem came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubTagKind {
    Id3v1,
    Id3v2,
    Xiph,
    FlacPictures,
    Mp4,
}

impl fmt::Display for SubTagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SubTagKind::Id3v1 => "ID3v1",
            SubTagKind::Id3v2 => "ID3v2",
            SubTagKind::Xiph => "Xiph comment",
            SubTagKind::FlacPictures => "FLAC picture",
            SubTagKind::Mp4 => "MP4",
        };
        f.write_str(name)
    }
}

/// Recoverable problems. The offending field or sub-tag is skipped and extraction continues.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TagError {
    #[error("Malformed {tag} data: {reason}")]
    MalformedSubTag { tag: SubTagKind, reason: String },
    #[error("Unsupported {variant} value in {tag} field {field}")]
    UnsupportedValueType { tag: SubTagKind, field: String, variant: &'static str },
}

impl TagError {
    pub fn malformed(tag: SubTagKind, reason: impl Into<String>) -> Self {
        TagError::MalformedSubTag { tag, reason: reason.into() }
    }
}

/// Recoverable errors collected over one extraction, in the order they happened.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    errors: Vec<TagError>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, err: TagError) {
        warn!("{}", err);
        self.errors.push(err);
    }

    pub fn iter(&self) -> impl Iterator<Item = &TagError> {
        self.errors.iter()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_vec(self) -> Vec<TagError> {
        self.errors
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("Failed to decode config file {path}: {source}")]
    Decode { path: PathBuf, source: toml::de::Error },
}

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("Failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, ExtractError>;

pub mod batch;
pub mod builder;
pub mod config;
pub mod cover;
pub mod error;
pub mod fields;
pub mod genres;
pub mod id3_frames;
pub mod id3v1;
pub mod id3v2;
pub mod key;
pub mod logging;
pub mod mp4;
pub mod probe;
pub mod source;
pub mod stream;
pub mod tagmap;
pub mod value;
pub mod vorbis_comment;
pub mod xiph;

pub use builder::{extract, extract_path, extract_with_diagnostics, Extraction, Metadata, MetadataBuilder};
pub use error::{ExtractError, OpenError, Result, TagError};
pub use key::CanonicalKey;
pub use probe::TagReader;
pub use source::{AudioProperties, ContainerKind, ContainerReader, ParsedFile};
pub use stream::{AudioStream, FileStream, MemoryStream};
pub use tagmap::TagMap;

#[cfg(test)]
mod fields_test;
#[cfg(test)]
mod testing;

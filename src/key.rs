//! Canonical tag keys and the rules that derive them from format-native identifiers.

use crate::error::{SubTagKind, TagError};
use serde::Serialize;
use std::fmt;

/// Prefix iTunes uses for freeform `----:mean:name` atoms.
pub const FREEFORM_PREFIX: &str = "----:";

/// Key of a `TagMap` entry. Two keys are equal only when every component is equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum CanonicalKey {
    /// A bare identifier such as `TIT2`, `ARTIST` or `©nam`.
    Id(String),
    /// An identifier qualified by a free-text description, such as `TXXX` + `REPLAYGAIN_TRACK_GAIN`.
    Combined(String, String),
}

impl CanonicalKey {
    pub fn id(name: impl Into<String>) -> Self {
        CanonicalKey::Id(name.into())
    }

    pub fn combined(id: impl Into<String>, description: impl Into<String>) -> Self {
        CanonicalKey::Combined(id.into(), description.into())
    }

    /// The identifier part of the key, shared by both variants.
    pub fn ident(&self) -> &str {
        match self {
            CanonicalKey::Id(id) | CanonicalKey::Combined(id, _) => id,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            CanonicalKey::Id(_) => None,
            CanonicalKey::Combined(_, desc) => Some(desc),
        }
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CanonicalKey::Id(id) => write!(f, "{}", id),
            CanonicalKey::Combined(id, desc) => write!(f, "{}:{}", id, desc),
        }
    }
}

/// ID3v2 text frames are keyed by their four-character frame id.
pub fn id3v2_text(frame_id: &str) -> CanonicalKey {
    CanonicalKey::id(frame_id)
}

/// Splits a user text frame (TXXX-style) into its key and remaining values. The first field is the
/// description and is removed from the values.
pub fn id3v2_user_text(frame_id: &str, mut fields: Vec<String>) -> Result<(CanonicalKey, Vec<String>), TagError> {
    if fields.is_empty() {
        return Err(TagError::malformed(SubTagKind::Id3v2, format!("{} frame has no fields", frame_id)));
    }
    let description = fields.remove(0);
    Ok((CanonicalKey::combined(frame_id, description), fields))
}

/// Xiph field names are case-insensitive, so they are stored upper-cased.
pub fn xiph_field(name: &str) -> CanonicalKey {
    CanonicalKey::id(name.to_uppercase())
}

/// Normalizes an MP4 item name. Standard atoms become `Id` with leading padding removed, freeform atoms
/// (`----:mean:name`) become `Combined("----:" + mean, name)`.
pub fn mp4_atom(name: &str) -> Result<CanonicalKey, TagError> {
    match name.strip_prefix(FREEFORM_PREFIX) {
        Some(rest) => {
            let (mean, desc) = rest
                .split_once(':')
                .ok_or_else(|| TagError::malformed(SubTagKind::Mp4, format!("freeform atom {:?} has no name", name)))?;
            if mean.is_empty() || desc.is_empty() {
                return Err(TagError::malformed(SubTagKind::Mp4, format!("freeform atom {:?} has an empty mean or name", name)));
            }
            Ok(CanonicalKey::combined(format!("{}{}", FREEFORM_PREFIX, mean), desc))
        }
        None => {
            let trimmed = name.trim_start_matches(|c: char| c.is_control() || c == '\u{feff}');
            if trimmed.is_empty() {
                return Err(TagError::malformed(SubTagKind::Mp4, format!("atom name {:?} is empty", name)));
            }
            Ok(CanonicalKey::id(trimmed))
        }
    }
}

/// Fixed ID3v1 field slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Id3v1Field {
    Title,
    Artist,
    Album,
    Track,
    Year,
    Genre,
}

/// ID3v1 fields are mapped onto the ID3v2 frame they correspond to.
pub fn id3v1_field(field: Id3v1Field) -> CanonicalKey {
    let frame = match field {
        Id3v1Field::Title => "TIT2",
        Id3v1Field::Artist => "TPE1",
        Id3v1Field::Album => "TALB",
        Id3v1Field::Track => "TRCK",
        Id3v1Field::Year => "TYER",
        Id3v1Field::Genre => "TCON",
    };
    CanonicalKey::id(frame)
}

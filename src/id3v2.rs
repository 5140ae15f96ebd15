use crate::builder::TagSink;
use crate::cover::{Picture, PictureClass};
use crate::error::{SubTagKind, TagError};
use crate::key::{id3v2_text, id3v2_user_text};
use crate::source::{Id3v2Frame, Id3v2Tag};
use tracing::debug;

/// Walks ID3v2 frames in order. Text frames go to the ID3-family map and pictures to the cover
/// selector. A bad frame is recorded and skipped without affecting its neighbours.
pub fn adapt(tag: Id3v2Tag, sink: &mut TagSink) {
    for frame in tag.frames {
        match frame {
            Id3v2Frame::Text { id, values } => {
                if values.is_empty() {
                    sink.diagnostics.record(TagError::malformed(SubTagKind::Id3v2, format!("{} frame has no fields", id)));
                    continue;
                }
                sink.id3_like.add_list(id3v2_text(&id), values);
            }
            Id3v2Frame::UserText { id, fields } => match id3v2_user_text(&id, fields) {
                Ok((key, values)) => {
                    if values.is_empty() {
                        debug!("Skipping {} with no values", key);
                    }
                    sink.id3_like.add_list(key, values);
                }
                Err(e) => sink.diagnostics.record(e),
            },
            Id3v2Frame::Picture { picture_type, data, .. } => {
                sink.covers.offer(Picture::new(PictureClass::from_type_code(picture_type), data));
            }
            Id3v2Frame::Other { id } => debug!("Ignoring unmapped {} frame", id),
            Id3v2Frame::Corrupt { id, reason } => {
                sink.diagnostics.record(TagError::malformed(SubTagKind::Id3v2, format!("{} frame: {}", id, reason)));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::CanonicalKey;

    fn text(id: &str, values: &[&str]) -> Id3v2Frame {
        Id3v2Frame::Text { id: id.into(), values: values.iter().map(|s| s.to_string()).collect() }
    }

    #[test]
    fn test_text_and_user_text() {
        let tag = Id3v2Tag {
            frames: vec![
                text("TIT2", &["Song"]),
                text("TPE1", &["A", "B"]),
                Id3v2Frame::UserText { id: "TXXX".into(), fields: vec!["REPLAYGAIN_TRACK_GAIN".into(), "-6.5 dB".into()] },
            ],
        };
        let mut sink = TagSink::new();
        adapt(tag, &mut sink);
        assert_eq!(sink.id3_like.get_id("TIT2").unwrap(), ["Song"]);
        assert_eq!(sink.id3_like.get_id("TPE1").unwrap(), ["A", "B"]);
        assert_eq!(sink.id3_like.get(&CanonicalKey::combined("TXXX", "REPLAYGAIN_TRACK_GAIN")).unwrap(), ["-6.5 dB"]);
        assert!(sink.diagnostics.is_empty());
    }

    #[test]
    fn test_repeated_frames_append() {
        let tag = Id3v2Tag { frames: vec![text("TCON", &["Rock"]), text("TCON", &["Pop"])] };
        let mut sink = TagSink::new();
        adapt(tag, &mut sink);
        assert_eq!(sink.id3_like.get_id("TCON").unwrap(), ["Rock", "Pop"]);
    }

    #[test]
    fn test_bad_frames_are_isolated() {
        let tag = Id3v2Tag {
            frames: vec![
                text("TIT2", &["Song"]),
                Id3v2Frame::Corrupt { id: "TPE1".into(), reason: "bad encoding".into() },
                text("TALB", &[]),
                Id3v2Frame::UserText { id: "TXXX".into(), fields: vec![] },
                text("TRCK", &["2"]),
            ],
        };
        let mut sink = TagSink::new();
        adapt(tag, &mut sink);
        let keys: Vec<String> = sink.id3_like.keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["TIT2", "TRCK"]);
        assert_eq!(sink.diagnostics.len(), 3);
    }

    #[test]
    fn test_user_text_with_only_description_is_skipped() {
        let tag = Id3v2Tag { frames: vec![Id3v2Frame::UserText { id: "TXXX".into(), fields: vec!["EMPTY".into()] }] };
        let mut sink = TagSink::new();
        adapt(tag, &mut sink);
        assert!(sink.id3_like.is_empty());
        assert!(sink.diagnostics.is_empty());
    }

    #[test]
    fn test_pictures_feed_cover_selector() {
        let tag = Id3v2Tag {
            frames: vec![
                Id3v2Frame::Picture { id: "APIC".into(), picture_type: 0, mime_type: "image/png".into(), data: vec![1] },
                Id3v2Frame::Picture { id: "APIC".into(), picture_type: 3, mime_type: "image/jpeg".into(), data: vec![2] },
                Id3v2Frame::Other { id: "COMM".into() },
            ],
        };
        let mut sink = TagSink::new();
        adapt(tag, &mut sink);
        assert!(sink.id3_like.is_empty());
        assert_eq!(sink.covers.select(), Some(vec![2]));
    }
}

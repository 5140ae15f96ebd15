use crate::builder::TagSink;
use crate::cover::{Picture, PictureClass};
use crate::error::{SubTagKind, TagError};
use crate::key::mp4_atom;
use crate::source::{Mp4Data, Mp4Tag};
use crate::value::{coerce, Value};
use tracing::debug;

impl From<Mp4Data> for Value {
    fn from(data: Mp4Data) -> Self {
        match data {
            Mp4Data::StringList(l) => Value::StrList(l),
            Mp4Data::Int(i) => Value::Int(i),
            Mp4Data::UInt(u) => Value::UInt(u),
            Mp4Data::LongLong(l) => Value::LongLong(l),
            Mp4Data::IntPair(a, b) => Value::IntPair(a, b),
            Mp4Data::Bool(_) => Value::Other("bool"),
            Mp4Data::Byte(_) => Value::Other("byte"),
            Mp4Data::CoverArt(_) => Value::Other("cover art"),
            Mp4Data::ByteVectorList(_) => Value::Other("byte vector list"),
            Mp4Data::Void => Value::Other("void"),
        }
    }
}

/// Maps MP4 items. String items land in the MP4 map, while integer items (track/disc pairs, tempo,
/// ids) are coerced and land in the ID3-family map. `covr` art goes to the cover selector.
pub fn adapt(tag: Mp4Tag, sink: &mut TagSink) {
    for item in tag.items {
        let key = match mp4_atom(&item.name) {
            Ok(key) => key,
            Err(e) => {
                sink.diagnostics.record(e);
                continue;
            }
        };
        if let Mp4Data::CoverArt(arts) = item.data {
            // covr is the artwork atom, so everything in it counts as a front cover.
            for art in arts {
                sink.covers.offer(Picture::new(PictureClass::FrontCover, art.data));
            }
            continue;
        }
        let value = Value::from(item.data);
        let numeric = value.is_numeric();
        let variant = value.type_name();
        match coerce(value) {
            Some(coerced) if numeric => sink.id3_like.add(key, coerced),
            Some(coerced) => sink.mp4_like.add(key, coerced),
            None => {
                debug!("Skipping {} with {} value", key, variant);
                sink.diagnostics.record(TagError::UnsupportedValueType { tag: SubTagKind::Mp4, field: key.to_string(), variant });
            }
        }
    }
}

use crate::builder::TagSink;
use crate::cover::{Picture, PictureClass};
use crate::key::xiph_field;
use crate::source::{NativePicture, XiphComment};
use tracing::debug;

/// Maps Xiph comment fields into the Vorbis-family map and offers embedded pictures to the selector.
pub fn adapt(comment: XiphComment, sink: &mut TagSink) {
    for (name, values) in comment.fields {
        if values.is_empty() {
            debug!("Skipping Xiph field {} with no values", name);
            continue;
        }
        sink.vorbis_like.add_list(xiph_field(&name), values);
    }
    offer_pictures(comment.pictures, sink);
}

/// FLAC stores artwork in its own metadata blocks, separate from the Xiph comment.
pub fn adapt_flac_pictures(pictures: Vec<NativePicture>, sink: &mut TagSink) {
    offer_pictures(pictures, sink);
}

fn offer_pictures(pictures: Vec<NativePicture>, sink: &mut TagSink) {
    for picture in pictures {
        sink.covers.offer(Picture::new(PictureClass::from_type_code(picture.picture_type), picture.data));
    }
}

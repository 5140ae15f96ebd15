use crate::builder::TagSink;
use crate::key::{id3v1_field, Id3v1Field};
use crate::source::Id3v1Block;
use tracing::debug;

/// Genre index ID3v1 uses for "no genre".
pub const NO_GENRE: u8 = 255;

/// Maps the fixed ID3v1 fields into the ID3-family map.
///
/// ID3v1 blocks always carry every slot, so blank text, a zero track and the 255 genre sentinel are
/// read as unset and dropped.
pub fn adapt(block: Id3v1Block, sink: &mut TagSink) {
    let texts = [(Id3v1Field::Title, block.title), (Id3v1Field::Artist, block.artist), (Id3v1Field::Album, block.album)];
    for (field, text) in texts {
        add_text(sink, field, text);
    }
    match block.track {
        Some(track) if track > 0 => sink.id3_like.add_single(id3v1_field(Id3v1Field::Track), track.to_string()),
        _ => {}
    }
    add_text(sink, Id3v1Field::Year, block.year);
    if block.genre_index != NO_GENRE {
        sink.id3_like.add_single(id3v1_field(Id3v1Field::Genre), block.genre_index.to_string());
    } else {
        debug!("Dropping unset ID3v1 genre");
    }
}

fn add_text(sink: &mut TagSink, field: Id3v1Field, text: String) {
    let text = text.trim_end_matches(['\0', ' ']);
    if !text.is_empty() {
        sink.id3_like.add_single(id3v1_field(field), text);
    }
}

use crate::builder::Metadata;
use crate::fields::*;
use crate::key::CanonicalKey;
use crate::tagmap::TagMap;
use crate::testing;

fn metadata() -> Metadata {
    Metadata {
        mime_type: "audio/mpeg".to_string(),
        id3_like: TagMap::new(),
        vorbis_like: TagMap::new(),
        mp4_like: TagMap::new(),
        cover: None,
        properties: testing::properties(),
    }
}

#[test]
fn test_parse_slash_position() {
    assert_eq!(parse_slash_position("3/12"), Some(Position { number: 3, total: Some(12) }));
    assert_eq!(parse_slash_position("3"), Some(Position { number: 3, total: None }));
    assert_eq!(parse_slash_position("3/0"), Some(Position { number: 3, total: None }));
    assert_eq!(parse_slash_position("0/12"), None);
    assert_eq!(parse_slash_position("A"), None);
}

#[test]
fn test_parse_xiph_position() {
    assert_eq!(parse_xiph_position(Some("3"), Some("12")), Some(Position { number: 3, total: Some(12) }));
    assert_eq!(parse_xiph_position(Some("3/10"), Some("12")), Some(Position { number: 3, total: Some(10) }));
    assert_eq!(parse_xiph_position(None, Some("12")), None);
}

#[test]
fn test_title_prefers_xiph() {
    let mut m = metadata();
    m.id3_like.add_single(CanonicalKey::id("TIT2"), "From ID3");
    assert_eq!(m.title(), Some("From ID3"));
    m.mp4_like.add_single(CanonicalKey::id("\u{a9}nam"), "From MP4");
    assert_eq!(m.title(), Some("From MP4"));
    m.vorbis_like.add_single(CanonicalKey::id("TITLE"), "From Xiph");
    assert_eq!(m.title(), Some("From Xiph"));
}

#[test]
fn test_track_from_mp4_pair_in_id3_map() {
    let mut m = metadata();
    m.id3_like.add_single(CanonicalKey::id("trkn"), "3/12");
    m.id3_like.add_single(CanonicalKey::id("disk"), "1/0");
    assert_eq!(m.track(), Some(Position { number: 3, total: Some(12) }));
    assert_eq!(m.disc(), Some(Position { number: 1, total: None }));
}

#[test]
fn test_track_from_xiph_fields() {
    let mut m = metadata();
    m.vorbis_like.add_single(CanonicalKey::id("TRACKNUMBER"), "5");
    m.vorbis_like.add_single(CanonicalKey::id("TRACKTOTAL"), "9");
    m.id3_like.add_single(CanonicalKey::id("TRCK"), "1/2");
    assert_eq!(m.track(), Some(Position { number: 5, total: Some(9) }));
}

#[test]
fn test_txxx_lookup_ignores_case() {
    let mut m = metadata();
    m.id3_like.add_single(CanonicalKey::combined("TXXX", "MusicBrainz Album Id"), "abc");
    m.id3_like.add_single(CanonicalKey::combined("TXXX", "replaygain_track_gain"), "-6.50 dB");
    assert_eq!(m.album_musicbrainz_id(), Some("abc"));
    assert_eq!(m.replay_gain_track(), Some(-6.5));
    assert_eq!(m.replay_gain_album(), None);
}

#[test]
fn test_r128_gain() {
    let mut m = metadata();
    m.vorbis_like.add_single(CanonicalKey::id("R128_TRACK_GAIN"), "-512");
    assert_eq!(m.replay_gain_track(), Some(3.0));
}

#[test]
fn test_artists_chain() {
    let mut m = metadata();
    m.id3_like.add_list(CanonicalKey::id("TPE1"), vec!["A", "B"]);
    assert_eq!(m.artists().unwrap(), ["A", "B"]);
    m.mp4_like.add_single(CanonicalKey::combined("----:com.apple.iTunes", "ARTISTS"), "C");
    assert_eq!(m.artists().unwrap(), ["C"]);
}

#[test]
fn test_genres() {
    let mut m = metadata();
    assert!(m.genres().is_empty());
    m.id3_like.add_single(CanonicalKey::id("TCON"), "(17)(CR)");
    assert_eq!(m.genres(), vec!["Rock", "Cover"]);
    m.id3_like.add_single(CanonicalKey::id("gnre"), "14");
    assert_eq!(m.genres(), vec!["Pop"]);
    m.vorbis_like.add_list(CanonicalKey::id("GENRE"), vec!["Shoegaze", "Dream Pop"]);
    assert_eq!(m.genres(), vec!["Shoegaze", "Dream Pop"]);
}

#[test]
fn test_compilation() {
    let mut m = metadata();
    assert_eq!(m.is_compilation(), None);
    m.id3_like.add_single(CanonicalKey::id("TCMP"), "1");
    assert_eq!(m.is_compilation(), Some(true));

    let mut m = metadata();
    m.vorbis_like.add_single(CanonicalKey::id("COMPILATION"), "yes");
    assert_eq!(m.is_compilation(), Some(false));
}

#[test]
fn test_date() {
    let mut m = metadata();
    assert_eq!(m.date(), None);
    m.id3_like.add_single(CanonicalKey::id("TYER"), "1999");
    assert_eq!(m.date(), Some("1999".to_string()));
    m.id3_like.add_single(CanonicalKey::id("TDAT"), "2503");
    assert_eq!(m.date(), Some("1999-03-25".to_string()));
    m.id3_like.add_single(CanonicalKey::id("TIME"), "1342");
    assert_eq!(m.date(), Some("1999-03-25T13:42".to_string()));
    m.id3_like.add_single(CanonicalKey::id("TDRC"), "2001-02-03");
    assert_eq!(m.date(), Some("2001-02-03".to_string()));
    m.vorbis_like.add_single(CanonicalKey::id("ORIGINALDATE"), "1990");
    assert_eq!(m.date(), Some("1990".to_string()));
}

#[test]
fn test_title_from_work_atom() {
    let mut m = metadata();
    m.id3_like.add_single(CanonicalKey::id("TIT2"), "From ID3");
    m.mp4_like.add_single(CanonicalKey::id("\u{a9}trk"), "From MP4 track atom");
    assert_eq!(m.title(), Some("From MP4 track atom"));
}

#[test]
fn test_release_types_from_grouping_atom() {
    let mut m = metadata();
    m.id3_like.add_single(CanonicalKey::id("GRP1"), "single");
    m.mp4_like.add_single(CanonicalKey::id("\u{a9}grp"), "album");
    assert_eq!(m.release_types().unwrap(), ["album"]);
    m.mp4_like.add_single(CanonicalKey::combined("----:com.apple.iTunes", "RELEASETYPE"), "ep");
    assert_eq!(m.release_types().unwrap(), ["ep"]);
}

#[test]
fn test_itunes_artist_variants() {
    let mut m = metadata();
    m.id3_like.add_single(CanonicalKey::id("TPE1"), "ID3 Artist");
    m.mp4_like.add_single(CanonicalKey::combined("----:com.apple.iTunes", "ARTIST"), "iTunes Artist");
    assert_eq!(m.artists().unwrap(), ["iTunes Artist"]);
    m.mp4_like.add_single(CanonicalKey::id("\u{a9}ART"), "Atom Artist");
    assert_eq!(m.artists().unwrap(), ["Atom Artist"]);

    m.mp4_like.add_single(CanonicalKey::combined("----:com.apple.iTunes", "ARTISTSORT"), "Artist, The");
    assert_eq!(m.artist_sort().unwrap(), ["Artist, The"]);
    m.mp4_like.add_single(CanonicalKey::id("soar"), "Atom Sort");
    assert_eq!(m.artist_sort().unwrap(), ["Atom Sort"]);
    m.mp4_like.add_single(CanonicalKey::combined("----:com.apple.iTunes", "ARTISTS SORT"), "Many Sort");
    assert_eq!(m.artist_sort().unwrap(), ["Many Sort"]);

    m.mp4_like.add_single(CanonicalKey::combined("----:com.apple.iTunes", "album artist sort"), "Band, The");
    assert_eq!(m.album_artist_sort().unwrap(), ["Band, The"]);
    m.mp4_like.add_single(CanonicalKey::combined("----:com.apple.iTunes", "ALBUMARTISTSORT"), "Band Sort");
    assert_eq!(m.album_artist_sort().unwrap(), ["Band Sort"]);
}

#[test]
fn test_xiph_spaced_artist_variants() {
    let mut m = metadata();
    m.vorbis_like.add_single(CanonicalKey::id("ALBUMARTIST"), "One");
    m.vorbis_like.add_list(CanonicalKey::id("ALBUM ARTISTS"), vec!["One", "Two"]);
    assert_eq!(m.album_artists().unwrap(), ["One", "Two"]);
    m.vorbis_like.add_single(CanonicalKey::id("ARTISTS SORT"), "Sorted");
    m.vorbis_like.add_single(CanonicalKey::id("ARTISTSORT"), "Single Sort");
    assert_eq!(m.artist_sort().unwrap(), ["Sorted"]);
    m.vorbis_like.add_single(CanonicalKey::id("ALBUMARTISTS SORT"), "Band Sort");
    assert_eq!(m.album_artist_sort().unwrap(), ["Band Sort"]);
}

#[test]
fn test_album_artists_itunes_before_atom() {
    let mut m = metadata();
    m.id3_like.add_single(CanonicalKey::id("TPE2"), "ID3 Band");
    m.mp4_like.add_single(CanonicalKey::combined("----:com.apple.iTunes", "ALBUM ARTIST"), "iTunes Band");
    assert_eq!(m.album_artists().unwrap(), ["iTunes Band"]);
    m.mp4_like.add_single(CanonicalKey::id("aART"), "Atom Band");
    assert_eq!(m.album_artists().unwrap(), ["Atom Band"]);
    m.mp4_like.add_list(CanonicalKey::combined("----:com.apple.iTunes", "ALBUMARTISTS"), vec!["A", "B"]);
    assert_eq!(m.album_artists().unwrap(), ["A", "B"]);
}

#[test]
fn test_artist_musicbrainz_ids() {
    let mut m = metadata();
    assert_eq!(m.artist_musicbrainz_ids(), None);
    assert_eq!(m.album_artist_musicbrainz_ids(), None);
    m.id3_like.add_list(CanonicalKey::combined("TXXX", "MusicBrainz Artist Id"), vec!["a1", "a2"]);
    m.id3_like.add_single(CanonicalKey::combined("TXXX", "MUSICBRAINZ_ALBUMARTISTID"), "b1");
    assert_eq!(m.artist_musicbrainz_ids().unwrap(), ["a1", "a2"]);
    assert_eq!(m.album_artist_musicbrainz_ids().unwrap(), ["b1"]);

    m.mp4_like.add_single(CanonicalKey::combined("----:com.apple.iTunes", "MusicBrainz Album Artist Id"), "b2");
    assert_eq!(m.album_artist_musicbrainz_ids().unwrap(), ["b2"]);
    m.vorbis_like.add_single(CanonicalKey::id("MUSICBRAINZ_ARTISTID"), "a3");
    assert_eq!(m.artist_musicbrainz_ids().unwrap(), ["a3"]);
}

#[test]
fn test_musicbrainz_ids_with_underscored_itunes_names() {
    let mut m = metadata();
    m.mp4_like.add_single(CanonicalKey::combined("----:com.apple.iTunes", "MUSICBRAINZ_RELEASETRACKID"), "t1");
    m.mp4_like.add_single(CanonicalKey::combined("----:com.apple.iTunes", "MUSICBRAINZ_ALBUMID"), "r1");
    assert_eq!(m.musicbrainz_id(), Some("t1"));
    assert_eq!(m.album_musicbrainz_id(), Some("r1"));
}

#[test]
fn test_compilation_from_mp4() {
    let mut m = metadata();
    m.id3_like.add_single(CanonicalKey::id("cpil"), "1");
    assert_eq!(m.is_compilation(), Some(true));

    let mut m = metadata();
    m.id3_like.add_single(CanonicalKey::id("TCMP"), "1");
    m.mp4_like.add_single(CanonicalKey::combined("----:com.apple.iTunes", "COMPILATION"), "0");
    assert_eq!(m.is_compilation(), Some(false));
}

//! Field-level queries over `Metadata`.
//!
//! The three tag maps keep keys as the file spelled them. These accessors resolve a common field by
//! trying the usual keys in order: Xiph comments first, then MP4 atoms, then ID3 frames.

use crate::builder::Metadata;
use crate::genres::{resolve_id3_genres, ID3V1_GENRES};
use once_cell::sync::Lazy;
use regex::Regex;

const ITUNES_MEAN: &str = "----:com.apple.iTunes";

static GAIN_FILTER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\d.-]").unwrap());

/// Where to look for one spelling of a field.
#[derive(Debug, Clone, Copy)]
enum Field {
    /// Xiph comment name, upper-case.
    Xiph(&'static str),
    /// MP4 atom. Integer atoms are kept in the ID3-family map, so both maps are searched.
    Mp4(&'static str),
    /// iTunes freeform atom description, matched ignoring case.
    Itunes(&'static str),
    Id3(&'static str),
    /// TXXX description, matched ignoring case.
    Txxx(&'static str),
}

/// A track or disc position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub number: u32,
    pub total: Option<u32>,
}

fn parse_count(s: &str) -> Option<u32> {
    s.trim().parse::<u32>().ok().filter(|&n| n > 0)
}

/// Parses `N` or `N/T`. Zero counts as unset.
pub fn parse_slash_position(s: &str) -> Option<Position> {
    match s.split_once('/') {
        Some((number, total)) => Some(Position { number: parse_count(number)?, total: parse_count(total) }),
        None => Some(Position { number: parse_count(s)?, total: None }),
    }
}

/// Xiph keeps number and total in separate fields, though the number field sometimes holds `N/T`.
pub fn parse_xiph_position(number: Option<&str>, total: Option<&str>) -> Option<Position> {
    let mut position = parse_slash_position(number?)?;
    if position.total.is_none() {
        position.total = total.and_then(parse_count);
    }
    Some(position)
}

fn parse_gain(s: &str) -> Option<f32> {
    GAIN_FILTER_RE.replace_all(s, "").parse::<f32>().ok().filter(|&g| g != 0.0)
}

/// R128 gains are Q7.8 fixed point relative to -23 LUFS. Shift them onto the ReplayGain scale.
fn parse_r128_gain(s: &str) -> Option<f32> {
    parse_gain(s).map(|g| g / 256.0 + 5.0)
}

impl Metadata {
    fn lookup(&self, field: Field) -> Option<&[String]> {
        match field {
            Field::Xiph(name) => self.vorbis_like.get_id(name),
            Field::Mp4(atom) => self.mp4_like.get_id(atom).or_else(|| self.id3_like.get_id(atom)),
            Field::Itunes(desc) => self.mp4_like.get_combined_ignore_case(ITUNES_MEAN, desc),
            Field::Id3(frame) => self.id3_like.get_id(frame),
            Field::Txxx(desc) => self.id3_like.get_combined_ignore_case("TXXX", desc),
        }
    }

    fn first_of(&self, chain: &[Field]) -> Option<&[String]> {
        chain.iter().find_map(|&field| self.lookup(field))
    }

    fn first_value(&self, chain: &[Field]) -> Option<&str> {
        self.first_of(chain).and_then(|values| values.first()).map(String::as_str)
    }

    pub fn musicbrainz_id(&self) -> Option<&str> {
        self.first_value(&[
            Field::Xiph("MUSICBRAINZ_RELEASETRACKID"),
            Field::Xiph("MUSICBRAINZ RELEASE TRACK ID"),
            Field::Itunes("MusicBrainz Release Track Id"),
            Field::Itunes("MUSICBRAINZ_RELEASETRACKID"),
            Field::Txxx("MusicBrainz Release Track Id"),
            Field::Txxx("MUSICBRAINZ_RELEASETRACKID"),
        ])
    }

    pub fn title(&self) -> Option<&str> {
        self.first_value(&[Field::Xiph("TITLE"), Field::Mp4("\u{a9}nam"), Field::Mp4("\u{a9}trk"), Field::Id3("TIT2")])
    }

    pub fn sort_title(&self) -> Option<&str> {
        self.first_value(&[Field::Xiph("TITLESORT"), Field::Mp4("sonm"), Field::Id3("TSOT")])
    }

    pub fn track(&self) -> Option<Position> {
        let xiph = parse_xiph_position(
            self.first_value(&[Field::Xiph("TRACKNUMBER")]),
            self.first_value(&[Field::Xiph("TOTALTRACKS"), Field::Xiph("TRACKTOTAL"), Field::Xiph("TRACKC")]),
        );
        xiph.or_else(|| self.first_value(&[Field::Mp4("trkn"), Field::Id3("TRCK")]).and_then(parse_slash_position))
    }

    pub fn disc(&self) -> Option<Position> {
        let xiph = parse_xiph_position(
            self.first_value(&[Field::Xiph("DISCNUMBER")]),
            self.first_value(&[Field::Xiph("TOTALDISCS"), Field::Xiph("DISCTOTAL"), Field::Xiph("DISCC")]),
        );
        xiph.or_else(|| self.first_value(&[Field::Mp4("disk"), Field::Id3("TPOS")]).and_then(parse_slash_position))
    }

    pub fn subtitle(&self) -> Option<&str> {
        self.first_value(&[Field::Xiph("DISCSUBTITLE"), Field::Itunes("DISCSUBTITLE"), Field::Id3("TSST")])
    }

    /// The most specific date the tags carry, as written. Original dates are preferred over release
    /// dates. ID3v2.3 year/day/time frames are combined into `YYYY[-MM-DD[THH:MM]]`.
    pub fn date(&self) -> Option<String> {
        let raw = self.first_value(&[
            Field::Xiph("ORIGINALDATE"),
            Field::Xiph("DATE"),
            Field::Xiph("YEAR"),
            Field::Mp4("\u{a9}day"),
            Field::Id3("TDOR"),
            Field::Id3("TDRC"),
            Field::Id3("TDRL"),
        ]);
        match raw {
            Some(date) => Some(date.to_string()),
            None => self.id3v23_date(),
        }
    }

    fn id3v23_date(&self) -> Option<String> {
        let year: u32 = self.first_value(&[Field::Id3("TORY"), Field::Id3("TYER")])?.trim().parse().ok()?;
        let four_digits = |frame: &'static str| self.first_value(&[Field::Id3(frame)]).filter(|s| s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()));
        let Some(tdat) = four_digits("TDAT") else {
            return Some(format!("{:04}", year));
        };
        // TDAT is DDMM and TIME is HHMM.
        let date = format!("{:04}-{}-{}", year, &tdat[2..4], &tdat[0..2]);
        match four_digits("TIME") {
            Some(time) => Some(format!("{}T{}:{}", date, &time[0..2], &time[2..4])),
            None => Some(date),
        }
    }

    pub fn album(&self) -> Option<&str> {
        self.first_value(&[Field::Xiph("ALBUM"), Field::Mp4("\u{a9}alb"), Field::Id3("TALB")])
    }

    pub fn album_sort(&self) -> Option<&str> {
        self.first_value(&[Field::Xiph("ALBUMSORT"), Field::Mp4("soal"), Field::Id3("TSOA")])
    }

    pub fn album_musicbrainz_id(&self) -> Option<&str> {
        self.first_value(&[
            Field::Xiph("MUSICBRAINZ_ALBUMID"),
            Field::Xiph("MUSICBRAINZ ALBUM ID"),
            Field::Itunes("MusicBrainz Album Id"),
            Field::Itunes("MUSICBRAINZ_ALBUMID"),
            Field::Txxx("MusicBrainz Album Id"),
            Field::Txxx("MUSICBRAINZ_ALBUMID"),
        ])
    }

    pub fn release_types(&self) -> Option<&[String]> {
        self.first_of(&[
            Field::Xiph("RELEASETYPE"),
            Field::Xiph("MUSICBRAINZ ALBUM TYPE"),
            Field::Itunes("MusicBrainz Album Type"),
            Field::Itunes("RELEASETYPE"),
            Field::Mp4("\u{a9}grp"),
            Field::Txxx("MusicBrainz Album Type"),
            Field::Txxx("RELEASETYPE"),
            Field::Id3("GRP1"),
        ])
    }

    pub fn artist_musicbrainz_ids(&self) -> Option<&[String]> {
        self.first_of(&[
            Field::Xiph("MUSICBRAINZ_ARTISTID"),
            Field::Xiph("MUSICBRAINZ ARTIST ID"),
            Field::Itunes("MusicBrainz Artist Id"),
            Field::Itunes("MUSICBRAINZ_ARTISTID"),
            Field::Txxx("MusicBrainz Artist Id"),
            Field::Txxx("MUSICBRAINZ_ARTISTID"),
        ])
    }

    pub fn artists(&self) -> Option<&[String]> {
        self.first_of(&[
            Field::Xiph("ARTISTS"),
            Field::Xiph("ARTIST"),
            Field::Itunes("ARTISTS"),
            Field::Mp4("\u{a9}ART"),
            Field::Itunes("ARTIST"),
            Field::Txxx("ARTISTS"),
            Field::Id3("TPE1"),
            Field::Txxx("ARTIST"),
        ])
    }

    pub fn artist_sort(&self) -> Option<&[String]> {
        self.first_of(&[
            Field::Xiph("ARTISTSSORT"),
            Field::Xiph("ARTISTS_SORT"),
            Field::Xiph("ARTISTS SORT"),
            Field::Xiph("ARTISTSORT"),
            Field::Xiph("ARTIST SORT"),
            Field::Itunes("ARTISTSSORT"),
            Field::Itunes("ARTISTS_SORT"),
            Field::Itunes("ARTISTS SORT"),
            Field::Mp4("soar"),
            Field::Itunes("ARTISTSORT"),
            Field::Itunes("ARTIST SORT"),
            Field::Txxx("ARTISTSSORT"),
            Field::Txxx("ARTISTS_SORT"),
            Field::Txxx("ARTISTS SORT"),
            Field::Id3("TSOP"),
            Field::Txxx("ARTISTSORT"),
            Field::Txxx("ARTIST SORT"),
        ])
    }

    pub fn album_artist_musicbrainz_ids(&self) -> Option<&[String]> {
        self.first_of(&[
            Field::Xiph("MUSICBRAINZ_ALBUMARTISTID"),
            Field::Xiph("MUSICBRAINZ ALBUM ARTIST ID"),
            Field::Itunes("MusicBrainz Album Artist Id"),
            Field::Itunes("MUSICBRAINZ_ALBUMARTISTID"),
            Field::Txxx("MusicBrainz Album Artist Id"),
            Field::Txxx("MUSICBRAINZ_ALBUMARTISTID"),
        ])
    }

    pub fn album_artists(&self) -> Option<&[String]> {
        self.first_of(&[
            Field::Xiph("ALBUMARTISTS"),
            Field::Xiph("ALBUM_ARTISTS"),
            Field::Xiph("ALBUM ARTISTS"),
            Field::Xiph("ALBUMARTIST"),
            Field::Xiph("ALBUM ARTIST"),
            Field::Itunes("ALBUMARTISTS"),
            Field::Itunes("ALBUM_ARTISTS"),
            Field::Itunes("ALBUM ARTISTS"),
            Field::Mp4("aART"),
            Field::Itunes("ALBUMARTIST"),
            Field::Itunes("ALBUM ARTIST"),
            Field::Txxx("ALBUMARTISTS"),
            Field::Txxx("ALBUM_ARTISTS"),
            Field::Txxx("ALBUM ARTISTS"),
            Field::Id3("TPE2"),
            Field::Txxx("ALBUMARTIST"),
            Field::Txxx("ALBUM ARTIST"),
        ])
    }

    pub fn album_artist_sort(&self) -> Option<&[String]> {
        self.first_of(&[
            Field::Xiph("ALBUMARTISTSSORT"),
            Field::Xiph("ALBUMARTISTS_SORT"),
            Field::Xiph("ALBUMARTISTS SORT"),
            Field::Xiph("ALBUMARTISTSORT"),
            Field::Xiph("ALBUM ARTIST SORT"),
            Field::Itunes("ALBUMARTISTSSORT"),
            Field::Itunes("ALBUMARTISTS_SORT"),
            Field::Itunes("ALBUMARTISTS SORT"),
            Field::Itunes("ALBUMARTISTSORT"),
            Field::Mp4("soaa"),
            Field::Itunes("ALBUM ARTIST SORT"),
            Field::Txxx("ALBUMARTISTSSORT"),
            Field::Txxx("ALBUMARTISTS_SORT"),
            Field::Txxx("ALBUMARTISTS SORT"),
            Field::Txxx("ALBUMARTISTSORT"),
            Field::Id3("TSO2"),
            Field::Txxx("ALBUM ARTIST SORT"),
        ])
    }

    /// Genre names. ID3 numeric references (`17`, `(17)`, `(CR)`) are resolved through the ID3v1
    /// table, as is the one-based MP4 `gnre` atom.
    pub fn genres(&self) -> Vec<String> {
        if let Some(values) = self.first_of(&[Field::Xiph("GENRE"), Field::Mp4("\u{a9}gen")]) {
            return values.to_vec();
        }
        if let Some(index) = self.first_value(&[Field::Mp4("gnre")]).and_then(|v| v.parse::<usize>().ok()) {
            if let Some(genre) = index.checked_sub(1).and_then(|i| ID3V1_GENRES.get(i)) {
                return vec![genre.to_string()];
            }
        }
        self.lookup(Field::Id3("TCON")).map(resolve_id3_genres).unwrap_or_default()
    }

    /// Only an exact `"1"` marks a compilation. Anything else present counts as `false`.
    pub fn is_compilation(&self) -> Option<bool> {
        self.first_of(&[
            Field::Xiph("COMPILATION"),
            Field::Xiph("ITUNESCOMPILATION"),
            Field::Mp4("cpil"),
            Field::Itunes("COMPILATION"),
            Field::Itunes("ITUNESCOMPILATION"),
            Field::Id3("TCMP"),
            Field::Txxx("COMPILATION"),
            Field::Txxx("ITUNESCOMPILATION"),
        ])
        .map(|values| values == ["1"])
    }

    /// Track gain in dB on the ReplayGain scale.
    pub fn replay_gain_track(&self) -> Option<f32> {
        self.first_value(&[Field::Xiph("R128_TRACK_GAIN")]).and_then(parse_r128_gain).or_else(|| {
            self.first_value(&[Field::Xiph("REPLAYGAIN_TRACK_GAIN"), Field::Itunes("replaygain_track_gain"), Field::Txxx("REPLAYGAIN_TRACK_GAIN")])
                .and_then(parse_gain)
        })
    }

    /// Album gain in dB on the ReplayGain scale.
    pub fn replay_gain_album(&self) -> Option<f32> {
        self.first_value(&[Field::Xiph("R128_ALBUM_GAIN")]).and_then(parse_r128_gain).or_else(|| {
            self.first_value(&[Field::Xiph("REPLAYGAIN_ALBUM_GAIN"), Field::Itunes("replaygain_album_gain"), Field::Txxx("REPLAYGAIN_ALBUM_GAIN")])
                .and_then(parse_gain)
        })
    }
}

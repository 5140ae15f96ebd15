//! The ID3v1 genre table and the ID3 genre string conventions built on it.

use once_cell::sync::Lazy;
use regex::Regex;

/// ID3v1 genres by index: the 80 standard genres followed by the Winamp extensions.
pub const ID3V1_GENRES: [&str; 192] = [
    "Blues", "Classic Rock", "Country", "Dance", "Disco", "Funk", "Grunge", "Hip-Hop", "Jazz", "Metal", "New Age", "Oldies", "Other", "Pop", "R&B",
    "Rap", "Reggae", "Rock", "Techno", "Industrial", "Alternative", "Ska", "Death Metal", "Pranks", "Soundtrack", "Euro-Techno", "Ambient",
    "Trip-Hop", "Vocal", "Jazz+Funk", "Fusion", "Trance", "Classical", "Instrumental", "Acid", "House", "Game", "Sound Clip", "Gospel", "Noise",
    "AlternRock", "Bass", "Soul", "Punk", "Space", "Meditative", "Instrumental Pop", "Instrumental Rock", "Ethnic", "Gothic", "Darkwave",
    "Techno-Industrial", "Electronic", "Pop-Folk", "Eurodance", "Dream", "Southern Rock", "Comedy", "Cult", "Gangsta", "Top 40", "Christian Rap",
    "Pop/Funk", "Jungle", "Native American", "Cabaret", "New Wave", "Psychadelic", "Rave", "Showtunes", "Trailer", "Lo-Fi", "Tribal", "Acid Punk",
    "Acid Jazz", "Polka", "Retro", "Musical", "Rock & Roll", "Hard Rock", "Folk", "Folk-Rock", "National Folk", "Swing", "Fast Fusion", "Bebob",
    "Latin", "Revival", "Celtic", "Bluegrass", "Avantgarde", "Gothic Rock", "Progressive Rock", "Psychedelic Rock", "Symphonic Rock", "Slow Rock",
    "Big Band", "Chorus", "Easy Listening", "Acoustic", "Humour", "Speech", "Chanson", "Opera", "Chamber Music", "Sonata", "Symphony", "Booty Bass",
    "Primus", "Porn Groove", "Satire", "Slow Jam", "Club", "Tango", "Samba", "Folklore", "Ballad", "Power Ballad", "Rhythmic Soul", "Freestyle",
    "Duet", "Punk Rock", "Drum Solo", "A capella", "Euro-House", "Dance Hall", "Goa", "Drum & Bass", "Club-House", "Hardcore", "Terror", "Indie",
    "Britpop", "Negerpunk", "Polsk Punk", "Beat", "Christian Gangsta", "Heavy Metal", "Black Metal", "Crossover", "Contemporary Christian",
    "Christian Rock", "Merengue", "Salsa", "Thrash Metal", "Anime", "JPop", "Synthpop", "Abstract", "Art Rock", "Baroque", "Bhangra", "Big Beat",
    "Breakbeat", "Chillout", "Downtempo", "Dub", "EBM", "Eclectic", "Electro", "Electroclash", "Emo", "Experimental", "Garage", "Global", "IDM",
    "Illbient", "Industro-Goth", "Jam Band", "Krautrock", "Leftfield", "Lounge", "Math Rock", "New Romantic", "Nu-Breakz", "Post-Punk", "Post-Rock",
    "Psytrance", "Shoegaze", "Space Rock", "Trop Rock", "World Music", "Neoclassical", "Audiobook", "Audio Theatre", "Neue Deutsche Welle",
    "Podcast", "Indie Rock", "G-Funk", "Dubstep", "Garage Rock", "Psybient",
];

static ID3V2_GENRE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^((?:\((?:\d+|RX|CR)\))*)(.+)?$").unwrap());

/// Looks up a bare ID3v1 genre reference: a table index, or the `CR`/`RX` shorthands.
pub fn id3v1_genre(code: &str) -> Option<&'static str> {
    match code {
        "CR" => Some("Cover"),
        "RX" => Some("Remix"),
        _ => code.parse::<usize>().ok().and_then(|i| ID3V1_GENRES.get(i).copied()),
    }
}

/// Resolves the values of a `TCON` frame into genre names.
///
/// A single value may use the ID3v2.3 `(17)(CR)Name` form. Multiple values are already split, so only
/// bare numeric references are resolved in them.
pub fn resolve_id3_genres(values: &[String]) -> Vec<String> {
    if let [single] = values {
        if let Some(genre) = id3v1_genre(single) {
            return vec![genre.to_string()];
        }
        return parse_id3v2_genre(single).unwrap_or_else(|| vec![single.clone()]);
    }
    values.iter().map(|v| id3v1_genre(v).map(str::to_string).unwrap_or_else(|| v.clone())).collect()
}

fn parse_id3v2_genre(value: &str) -> Option<Vec<String>> {
    let caps = ID3V2_GENRE_RE.captures(value)?;
    let mut genres: Vec<String> = Vec::new();
    let mut push = |genre: &str| {
        if !genres.iter().any(|g| g == genre) {
            genres.push(genre.to_string());
        }
    };

    if let Some(ids) = caps.get(1).map(|m| m.as_str()).filter(|s| !s.is_empty()) {
        for id in ids[1..ids.len() - 1].split(")(") {
            if let Some(genre) = id3v1_genre(id) {
                push(genre);
            }
        }
    }
    if let Some(name) = caps.get(2).map(|m| m.as_str()).filter(|s| !s.is_empty()) {
        // "((" escapes a name that starts with a parenthesis.
        push(name.strip_prefix('(').filter(|_| name.starts_with("((")).unwrap_or(name));
    }

    if genres.len() == 1 && genres[0] == value {
        return None;
    }
    Some(genres)
}

//! Record parsing for multi-field query output
//!
//! Record lines join their fields with `|||`. Parsing never fails: missing
//! trailing fields become empty strings and surplus fields are dropped.

/// Field separator used by the automation scripts
pub const FIELD_SEPARATOR: &str = "|||";

/// Split `line` into exactly `count` fields
pub fn split_fields(line: &str, count: usize) -> Vec<String> {
    let mut fields: Vec<String> = line
        .split(FIELD_SEPARATOR)
        .take(count)
        .map(str::to_string)
        .collect();
    fields.resize(count, String::new());
    fields
}

/// A typed row reconstructed from one line of query output
pub trait Record: Sized {
    /// Column names in wire order
    const COLUMNS: &'static [&'static str];

    /// Build a record from exactly `COLUMNS.len()` fields
    fn from_fields(fields: Vec<String>) -> Self;

    /// Field value by column name
    fn field(&self, name: &str) -> Option<&str>;

    fn from_line(line: &str) -> Self {
        Self::from_fields(split_fields(line, Self::COLUMNS.len()))
    }

    /// All field values in column order
    fn values(&self) -> Vec<&str> {
        Self::COLUMNS
            .iter()
            .map(|c| self.field(c).unwrap_or_default())
            .collect()
    }
}

/// Parse a batch of lines; malformed lines degrade to blank fields
pub fn parse_lines<R: Record>(lines: &[String]) -> Vec<R> {
    lines.iter().map(|l| R::from_line(l)).collect()
}

/// Pops fields front to back
fn take_fields<const N: usize>(fields: Vec<String>) -> [String; N] {
    let mut iter = fields.into_iter();
    std::array::from_fn(|_| iter.next().unwrap_or_default())
}

/// One library track from the detailed query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackRecord {
    pub title: String,
    pub artist: String,
    pub album_artist: String,
    pub album: String,
}

impl Record for TrackRecord {
    const COLUMNS: &'static [&'static str] = &["title", "artist", "album_artist", "album"];

    fn from_fields(fields: Vec<String>) -> Self {
        let [title, artist, album_artist, album] = take_fields(fields);
        Self {
            title,
            artist,
            album_artist,
            album,
        }
    }

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "title" => Some(&self.title),
            "artist" => Some(&self.artist),
            "album_artist" => Some(&self.album_artist),
            "album" => Some(&self.album),
            _ => None,
        }
    }
}

/// One track membership of a user playlist
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistTrackRecord {
    pub playlist: String,
    pub track: String,
    pub artist: String,
    pub album: String,
}

impl Record for PlaylistTrackRecord {
    const COLUMNS: &'static [&'static str] = &["playlist", "track", "artist", "album"];

    fn from_fields(fields: Vec<String>) -> Self {
        let [playlist, track, artist, album] = take_fields(fields);
        Self {
            playlist,
            track,
            artist,
            album,
        }
    }

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "playlist" => Some(&self.playlist),
            "track" => Some(&self.track),
            "artist" => Some(&self.artist),
            "album" => Some(&self.album),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlbumRecord {
    pub album: String,
    pub album_artist: String,
}

impl Record for AlbumRecord {
    const COLUMNS: &'static [&'static str] = &["album", "album_artist"];

    fn from_fields(fields: Vec<String>) -> Self {
        let [album, album_artist] = take_fields(fields);
        Self {
            album,
            album_artist,
        }
    }

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "album" => Some(&self.album),
            "album_artist" => Some(&self.album_artist),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongRecord {
    pub title: String,
    pub artist: String,
    pub album: String,
}

impl Record for SongRecord {
    const COLUMNS: &'static [&'static str] = &["title", "artist", "album"];

    fn from_fields(fields: Vec<String>) -> Self {
        let [title, artist, album] = take_fields(fields);
        Self {
            title,
            artist,
            album,
        }
    }

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "title" => Some(&self.title),
            "artist" => Some(&self.artist),
            "album" => Some(&self.album),
            _ => None,
        }
    }
}

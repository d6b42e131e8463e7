//! Query kinds and the automation script registry
//!
//! Each query kind is bound to exactly one embedded AppleScript. Scripts are
//! parameterised by the target application name and emit one value (or one
//! `|||`-joined record) per line.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

/// Placeholder replaced with the target application name
const APP_PLACEHOLDER: &str = "{{APP}}";

/// Default target application
pub const DEFAULT_APP: &str = "Music";

/// Which metadata extraction to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QueryKind {
    Artists,
    Albums,
    Tracks,
    Playlists,
    PlaylistTracks,
    Detailed,
}

impl QueryKind {
    pub const ALL: [QueryKind; 6] = [
        QueryKind::Artists,
        QueryKind::Albums,
        QueryKind::Tracks,
        QueryKind::Playlists,
        QueryKind::PlaylistTracks,
        QueryKind::Detailed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKind::Artists => "artists",
            QueryKind::Albums => "albums",
            QueryKind::Tracks => "tracks",
            QueryKind::Playlists => "playlists",
            QueryKind::PlaylistTracks => "playlist-tracks",
            QueryKind::Detailed => "detailed",
        }
    }

    /// Column names of the raw output, in wire order
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            QueryKind::Artists => &["artist"],
            QueryKind::Playlists => &["playlist"],
            QueryKind::Albums => &["album", "album_artist"],
            QueryKind::Tracks => &["title", "artist", "album"],
            QueryKind::PlaylistTracks => &["playlist", "track", "artist", "album"],
            QueryKind::Detailed => &["title", "artist", "album_artist", "album"],
        }
    }

    /// Whether each line is a single value rather than a delimited record
    pub fn is_scalar(&self) -> bool {
        matches!(self, QueryKind::Artists | QueryKind::Playlists)
    }

    fn script_file(&self) -> String {
        format!("{}.applescript", self.as_str())
    }
}

impl std::fmt::Display for QueryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for QueryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QueryKind::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s.to_ascii_lowercase())
            .ok_or_else(|| format!("unknown query kind '{}'", s))
    }
}

/// Script bodies compiled into the binary, keyed by query kind
static EMBEDDED_SCRIPTS: Lazy<HashMap<QueryKind, &'static str>> = Lazy::new(|| {
    let mut scripts = HashMap::new();
    scripts.insert(QueryKind::Artists, include_str!("../scripts/artists.applescript"));
    scripts.insert(QueryKind::Albums, include_str!("../scripts/albums.applescript"));
    scripts.insert(QueryKind::Tracks, include_str!("../scripts/tracks.applescript"));
    scripts.insert(QueryKind::Playlists, include_str!("../scripts/playlists.applescript"));
    scripts.insert(
        QueryKind::PlaylistTracks,
        include_str!("../scripts/playlist-tracks.applescript"),
    );
    scripts.insert(QueryKind::Detailed, include_str!("../scripts/detailed.applescript"));
    scripts
});

/// Read-only table mapping each query kind to the script that answers it
#[derive(Debug, Clone)]
pub struct ScriptRegistry {
    scripts: HashMap<QueryKind, String>,
}

impl Default for ScriptRegistry {
    fn default() -> Self {
        Self::for_app(DEFAULT_APP)
    }
}

impl ScriptRegistry {
    /// Embedded scripts targeting the given application
    pub fn for_app(app: &str) -> Self {
        let escaped = escape_app(app);
        let scripts = EMBEDDED_SCRIPTS
            .iter()
            .map(|(kind, body)| (*kind, body.replace(APP_PLACEHOLDER, &escaped)))
            .collect();
        Self { scripts }
    }

    /// Registry with no scripts; pair with [`ScriptRegistry::with_script`]
    pub fn empty() -> Self {
        Self {
            scripts: HashMap::new(),
        }
    }

    /// Replace the script bound to `kind`
    pub fn with_script(mut self, kind: QueryKind, body: impl Into<String>) -> Self {
        self.scripts.insert(kind, body.into());
        self
    }

    /// Override embedded scripts with `<kind>.applescript` files found in `dir`
    ///
    /// Kinds without a file in `dir` keep the embedded script.
    pub fn with_overrides_from(mut self, dir: &Path, app: &str) -> std::io::Result<Self> {
        for kind in QueryKind::ALL {
            let path = dir.join(kind.script_file());
            if path.is_file() {
                let body = std::fs::read_to_string(&path)?;
                tracing::debug!("Loaded {} script override from {}", kind, path.display());
                self.scripts
                    .insert(kind, body.replace(APP_PLACEHOLDER, &escape_app(app)));
            }
        }
        Ok(self)
    }

    pub fn get(&self, kind: QueryKind) -> Option<&str> {
        self.scripts.get(&kind).map(String::as_str)
    }

    pub fn exists(&self, kind: QueryKind) -> bool {
        self.scripts.contains_key(&kind)
    }
}

/// Escape an application name for use inside an AppleScript string literal
fn escape_app(app: &str) -> String {
    app.replace('\\', "\\\\").replace('"', "\\\"")
}

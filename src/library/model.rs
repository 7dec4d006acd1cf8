use std::borrow::Cow;
use std::path::PathBuf;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub path: PathBuf,
    pub title: String,
}

/// Ordered tracks produced by one scan.
///
/// Indices are discovery order and stay stable until the next scan replaces
/// the whole playlist.
#[derive(Debug, Clone, Default)]
pub struct Playlist {
    tracks: Vec<Track>,
}

#[derive(Serialize)]
struct PlaylistDocument<'a> {
    playlist: Vec<&'a str>,
}

impl Playlist {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn track(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// Path of the track at `index`, or `""` when the index is out of range.
    /// Non-UTF-8 paths come back lossily converted, never empty.
    pub fn get_track(&self, index: i64) -> Cow<'_, str> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.tracks.get(i))
            .map_or(Cow::Borrowed(""), |t| t.path.to_string_lossy())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    pub fn titles(&self) -> Vec<String> {
        self.tracks.iter().map(|t| t.title.clone()).collect()
    }

    /// One `index: path` line per track, for startup logs.
    pub fn describe(&self) -> String {
        self.tracks
            .iter()
            .enumerate()
            .map(|(i, t)| format!("{}: {}", i, t.path.display()))
            .collect::<Vec<String>>()
            .join("\n")
    }

    /// `{"playlist": [titles...]}` as served to the browser UI.
    pub fn to_json(&self) -> String {
        let doc = PlaylistDocument {
            playlist: self.tracks.iter().map(|t| t.title.as_str()).collect(),
        };
        serde_json::to_string(&doc).unwrap_or_else(|_| r#"{"playlist":[]}"#.to_string())
    }
}

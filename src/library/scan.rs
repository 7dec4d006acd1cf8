use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::config::LibrarySettings;

use super::display::title_from_path;
use super::model::{Playlist, Track};

/// Hidden-file marker (`.DS_Store`, `.hidden.mp3`).
const HIDDEN_PREFIX: &str = ".";
/// macOS resource-fork companions (`._Song.mp3`).
const METADATA_PREFIX: &str = "._";

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("storage volume unavailable at {}: {source}", .path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("scan root is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
}

fn normalized_extensions(settings: &LibrarySettings) -> Vec<String> {
    settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

fn is_audio_file(path: &Path, exts: &[String]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden_or_metadata(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with(HIDDEN_PREFIX) || name.starts_with(METADATA_PREFIX))
        .unwrap_or(false)
}

/// Directories are only entered when their own name is on the allow-list.
fn may_descend(entry: &DirEntry, settings: &LibrarySettings) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return true;
    }
    entry
        .file_name()
        .to_str()
        .map(|name| settings.music_dirs.iter().any(|d| d == name))
        .unwrap_or(false)
}

/// Name-only check; the walk has already ruled out directories.
fn is_track(path: &Path, exts: &[String]) -> bool {
    !is_hidden_or_metadata(path) && is_audio_file(path, exts)
}

pub fn scan(root: &Path, settings: &LibrarySettings) -> Result<Playlist, ScanError> {
    let meta = fs::metadata(root).map_err(|source| ScanError::Unavailable {
        path: root.to_path_buf(),
        source,
    })?;
    if !meta.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    let exts = normalized_extensions(settings);
    let mut tracks: Vec<Track> = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(settings.follow_links)
        .sort_by_file_name();

    for entry in walker.into_iter().filter_entry(|e| may_descend(e, settings)) {
        if tracks.len() >= settings.max_tracks {
            debug!(capacity = settings.max_tracks, "playlist full, ignoring remaining entries");
            break;
        }

        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                warn!(error = %err, "skipping unreadable entry");
                continue;
            }
        };

        let path = entry.path();
        if entry.file_type().is_dir() || !is_track(path, &exts) {
            continue;
        }

        tracks.push(Track {
            path: path.to_path_buf(),
            title: title_from_path(path),
        });
    }

    info!(root = %root.display(), tracks = tracks.len(), "scan complete");
    Ok(Playlist::new(tracks))
}

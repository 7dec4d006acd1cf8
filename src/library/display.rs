use std::path::Path;

/// Display title for a track: the file name without directories or extension.
///
/// Falls back to the full file name when there is no stem (e.g. `"..mp3"`),
/// and to the whole path when there is no file name at all.
pub fn title_from_path(path: &Path) -> String {
    if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
        if !stem.trim().is_empty() {
            return stem.to_string();
        }
    }
    match path.file_name().and_then(|s| s.to_str()) {
        Some(name) => name.to_string(),
        None => path.display().to_string(),
    }
}

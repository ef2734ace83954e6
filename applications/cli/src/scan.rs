/// Directory import
use crate::error::{CliError, Result};
use groove_core::Track;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Artist used for files without tags
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Import configuration
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Supported audio file extensions (lowercase)
    pub extensions: Vec<String>,

    /// Follow symbolic links while walking (default: false)
    pub follow_links: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: ["mp3", "flac", "ogg", "opus", "wav", "m4a", "aac"]
                .iter()
                .map(|e| (*e).to_string())
                .collect(),
            follow_links: false,
        }
    }
}

/// Result of scanning a directory
#[derive(Debug, Default)]
pub struct ScanReport {
    /// New tracks, in path order
    pub tracks: Vec<Track>,

    /// Files whose URL is already in the library
    pub skipped: usize,
}

/// Walks a directory tree and builds library tracks from audio files
pub struct DirectoryScanner {
    config: ScanConfig,
}

impl DirectoryScanner {
    pub fn new() -> Self {
        Self::with_config(ScanConfig::default())
    }

    pub fn with_config(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Scan `path` (a file or directory)
    ///
    /// `known_urls` are the URLs already in the library; matching files are
    /// counted as skipped rather than imported twice.
    pub fn scan(&self, path: &Path, known_urls: &HashSet<String>) -> Result<ScanReport> {
        let mut report = ScanReport::default();

        for file in self.discover_files(path)? {
            let url = file_url(&file);
            if known_urls.contains(&url) {
                report.skipped += 1;
                continue;
            }
            report.tracks.push(track_from_path(&file, url));
        }

        Ok(report)
    }

    fn discover_files(&self, path: &Path) -> Result<Vec<PathBuf>> {
        if !path.exists() {
            return Err(CliError::PathNotFound(path.display().to_string()));
        }

        if path.is_file() {
            return Ok(if self.is_supported_file(path) {
                vec![path.to_path_buf()]
            } else {
                Vec::new()
            });
        }

        let mut files: Vec<PathBuf> = walkdir::WalkDir::new(path)
            .follow_links(self.config.follow_links)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && self.is_supported_file(e.path()))
            .map(|e| e.into_path())
            .collect();
        files.sort();

        Ok(files)
    }

    fn is_supported_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.config.extensions.contains(&e.to_lowercase()))
            .unwrap_or(false)
    }
}

impl Default for DirectoryScanner {
    fn default() -> Self {
        Self::new()
    }
}

fn file_url(path: &Path) -> String {
    let absolute = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    format!("file://{}", absolute.display())
}

// Title from the file stem, album from the containing directory
fn track_from_path(path: &Path, url: String) -> Track {
    let title = path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| url.clone());

    let mut track = Track::new(url, title, UNKNOWN_ARTIST);
    track.album = path
        .parent()
        .and_then(|p| p.file_name())
        .and_then(|n| n.to_str())
        .map(str::to_string);
    track
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(dir: &Path, relative: &str) -> PathBuf {
        let path = dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, b"not really audio").unwrap();
        path
    }

    #[test]
    fn finds_audio_files_recursively() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "Blue Train/01 Blue Train.mp3");
        touch(dir.path(), "Blue Train/02 Moment's Notice.FLAC");
        touch(dir.path(), "Blue Train/cover.jpg");
        touch(dir.path(), "notes.txt");

        let report = DirectoryScanner::new()
            .scan(dir.path(), &HashSet::new())
            .unwrap();

        let titles: Vec<&str> = report.tracks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["01 Blue Train", "02 Moment's Notice"]);
        assert_eq!(report.tracks[0].album.as_deref(), Some("Blue Train"));
        assert_eq!(report.tracks[0].artist, UNKNOWN_ARTIST);
        assert!(report.tracks[0].url.starts_with("file://"));
        assert_eq!(report.skipped, 0);
    }

    #[test]
    fn known_urls_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let existing = touch(dir.path(), "a.mp3");
        touch(dir.path(), "b.mp3");

        let known: HashSet<String> = [file_url(&existing)].into_iter().collect();
        let report = DirectoryScanner::new().scan(dir.path(), &known).unwrap();

        assert_eq!(report.tracks.len(), 1);
        assert_eq!(report.tracks[0].title, "b");
        assert_eq!(report.skipped, 1);
    }

    #[test]
    fn single_file_can_be_imported() {
        let dir = tempfile::tempdir().unwrap();
        let file = touch(dir.path(), "single.ogg");

        let report = DirectoryScanner::new().scan(&file, &HashSet::new()).unwrap();
        assert_eq!(report.tracks.len(), 1);
    }

    #[test]
    fn missing_path_is_an_error() {
        let result = DirectoryScanner::new().scan(Path::new("/no/such/dir"), &HashSet::new());
        assert!(matches!(result, Err(CliError::PathNotFound(_))));
    }
}

//! Source resolution and decoding

use crate::error::{AudioError, Result};
use rodio::{Decoder, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Decoder over a buffered local file
pub(crate) type FileDecoder = Decoder<BufReader<File>>;

/// Map a track URL to a local path
///
/// Accepts plain paths and `file://` URLs.
pub fn resolve_path(url: &str) -> PathBuf {
    PathBuf::from(url.strip_prefix("file://").unwrap_or(url))
}

/// Open and decode `path`, returning the decoder and its total duration
/// when the container reports one
pub(crate) fn open_source(path: &Path) -> Result<(FileDecoder, Option<Duration>)> {
    let file = File::open(path).map_err(|source| AudioError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let decoder = Decoder::new(BufReader::new(file)).map_err(|err| AudioError::Decode {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;
    let duration = decoder.total_duration();

    Ok((decoder, duration))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn strips_file_scheme() {
        assert_eq!(
            resolve_path("file:///music/song.flac"),
            PathBuf::from("/music/song.flac")
        );
        assert_eq!(resolve_path("/music/song.mp3"), PathBuf::from("/music/song.mp3"));
    }

    #[test]
    fn missing_file_is_open_error() {
        let result = open_source(Path::new("/definitely/not/here.mp3"));
        assert!(matches!(result, Err(AudioError::Open { .. })));
    }

    #[test]
    fn garbage_is_decode_error() {
        let mut file = tempfile::Builder::new().suffix(".mp3").tempfile().unwrap();
        file.write_all(b"this is not audio").unwrap();

        let result = open_source(file.path());

        assert!(matches!(result, Err(AudioError::Decode { .. })));
    }
}

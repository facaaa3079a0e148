use std::path::Path;

/// Audio containers whose embedded artwork can be normalized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    /// MPEG audio with an ID3v2 tag
    Mp3,
    /// FLAC with METADATA_BLOCK_PICTURE blocks
    Flac,
}

impl ContainerKind {
    /// Detect the container from the file extension
    ///
    /// Matching is case-sensitive: `song.MP3` is not picked up.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "mp3" => Some(ContainerKind::Mp3),
            "flac" => Some(ContainerKind::Flac),
            _ => None,
        }
    }
}

/// Check if a file is an audio file whose artwork can be normalized
pub fn is_supported_audio_file(path: &Path) -> bool {
    ContainerKind::from_path(path).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognizes_supported_formats() {
        assert_eq!(ContainerKind::from_path(Path::new("test.mp3")), Some(ContainerKind::Mp3));
        assert_eq!(ContainerKind::from_path(Path::new("a/b/test.flac")), Some(ContainerKind::Flac));
        assert!(is_supported_audio_file(Path::new("test.mp3")));
    }

    #[test]
    fn test_extension_match_is_case_sensitive() {
        assert!(!is_supported_audio_file(Path::new("test.MP3")));
        assert!(!is_supported_audio_file(Path::new("test.Flac")));
    }

    #[test]
    fn test_rejects_other_files() {
        assert!(!is_supported_audio_file(Path::new("test.ogg")));
        assert!(!is_supported_audio_file(Path::new("cover.jpg")));
        assert!(!is_supported_audio_file(Path::new("mp3")));
        assert!(!is_supported_audio_file(Path::new("test")));
    }
}

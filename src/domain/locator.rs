//! Storage keys and the locators handed back to callers.

use std::path::Path;

/// Extracts a storage key from a locator.
///
/// Bare keys are returned as-is. For `http(s)` URLs the key is the path suffix
/// starting at the first `segment` component that is not the last one
/// (`https://pub-x.r2.dev/videos/a/b.mp4` -> `videos/a/b.mp4`). URLs without
/// that segment are returned unchanged.
pub fn extract_key(locator: &str, segment: &str) -> String {
    let locator = locator.trim();
    if !locator.starts_with("http") {
        return locator.to_string();
    }

    let parts: Vec<&str> = locator.split('/').collect();
    parts
        .iter()
        .enumerate()
        .find(|(i, part)| **part == segment && *i < parts.len() - 1)
        .map(|(i, _)| parts[i..].join("/"))
        .unwrap_or_else(|| locator.to_string())
}

/// Joins the public base URL and a key. An empty base yields the bare key.
pub fn public_url(base: &str, key: &str) -> String {
    let base = base.trim_end_matches('/');
    let key = key.trim_start_matches('/');
    if base.is_empty() {
        key.to_string()
    } else {
        format!("{}/{}", base, key)
    }
}

/// `thumbnails/<file stem>.jpg` for a source video key.
pub fn default_thumbnail_key(video_key: &str) -> String {
    let stem = Path::new(video_key)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("thumbnail");
    format!("thumbnails/{}.jpg", stem)
}

/// `<base without .jpg>_<index>.jpg`
pub fn batch_thumbnail_key(base: &str, index: usize) -> String {
    format!("{}_{}.jpg", base.strip_suffix(".jpg").unwrap_or(base), index)
}

/// True for a non-empty identifier usable as a single key segment.
pub fn is_safe_segment(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= 128
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Short alphanumeric extension of a key, used to name the staged input.
pub fn source_extension(key: &str) -> Option<&str> {
    Path::new(key)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_keys_pass_through() {
        assert_eq!(extract_key("videos/abc/video.mp4", "videos"), "videos/abc/video.mp4");
        assert_eq!(extract_key("  raw.mp4 ", "videos"), "raw.mp4");
    }

    #[test]
    fn extracts_key_from_public_url() {
        assert_eq!(
            extract_key("https://pub-xxx.r2.dev/videos/abc/video.mp4", "videos"),
            "videos/abc/video.mp4"
        );
        assert_eq!(
            extract_key("https://cdn.example.com/media/videos/1.mp4", "videos"),
            "videos/1.mp4"
        );
    }

    #[test]
    fn url_without_segment_is_unchanged() {
        let url = "https://cdn.example.com/uploads/1.mp4";
        assert_eq!(extract_key(url, "videos"), url);
        // trailing segment has nothing after it
        let url = "https://cdn.example.com/videos";
        assert_eq!(extract_key(url, "videos"), url);
    }

    #[test]
    fn joins_public_urls() {
        assert_eq!(
            public_url("https://pub.r2.dev/", "/videos/1/audio.mp3"),
            "https://pub.r2.dev/videos/1/audio.mp3"
        );
        assert_eq!(public_url("", "videos/1/audio.mp3"), "videos/1/audio.mp3");
    }

    #[test]
    fn thumbnail_keys() {
        assert_eq!(default_thumbnail_key("videos/abc/clip.mov"), "thumbnails/clip.jpg");
        assert_eq!(batch_thumbnail_key("thumbnails/clip.jpg", 2), "thumbnails/clip_2.jpg");
        assert_eq!(batch_thumbnail_key("thumbs/clip", 0), "thumbs/clip_0.jpg");
    }

    #[test]
    fn safe_segments() {
        assert!(is_safe_segment("video_42-a"));
        assert!(!is_safe_segment(""));
        assert!(!is_safe_segment("../etc"));
        assert!(!is_safe_segment("a/b"));
    }

    #[test]
    fn source_extensions() {
        assert_eq!(source_extension("videos/a.mp4"), Some("mp4"));
        assert_eq!(source_extension("videos/a"), None);
        assert_eq!(source_extension("videos/a.m p4"), None);
    }
}

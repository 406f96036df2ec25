//! Embeddable forms of classified links.
//!
//! Share links are rewritten to the provider's embed form; anything that
//! cannot be rewritten passes through untouched, and it is up to the
//! renderer to offer it as an external link instead.

use lazy_static::lazy_static;
use mime::Mime;

use crate::classify::{self, Kind};

lazy_static! {
    /// Source types offered for a direct video, after the detected one.
    static ref FALLBACK_VIDEO_TYPES: Vec<Mime> = ["video/mp4", "video/webm", "video/ogg"]
        .iter()
        .map(|s| s.parse().unwrap())
        .collect();
}

/// Canonical embed URL for `url`.
pub fn to_embed_url(url: &str) -> String {
    match classify::classify(url) {
        Kind::DriveLink => match classify::extract_drive_file_id(url) {
            Some(id) => format!("https://drive.google.com/file/d/{}/preview", id),
            None => url.to_string(),
        },
        Kind::YouTubeLink => match classify::extract_youtube_id(url) {
            Some(id) => format!("https://www.youtube.com/embed/{}", id),
            None => url.to_string(),
        },
        _ => url.to_string(),
    }
}

/// Drive-generated thumbnail for a Drive share link. Callers supply their
/// own placeholder when this is [None].
pub fn to_thumbnail_url(drive_url: &str) -> Option<String> {
    if !classify::is_drive_link(drive_url) {
        return None;
    }
    classify::extract_drive_file_id(drive_url)
        .map(|id| format!("https://drive.google.com/thumbnail?id={}&sz=w400-h300", id))
}

/// MIME type of a direct video link, judged by its extension.
pub fn video_mime(url: &str) -> Option<Mime> {
    let essence = match classify::matched_extension(url, &classify::VIDEO_EXTENSIONS)? {
        ".mp4" => "video/mp4",
        ".webm" => "video/webm",
        ".ogg" => "video/ogg",
        ".mov" => "video/quicktime",
        ".avi" => "video/x-msvideo",
        ".wmv" => "video/x-ms-wmv",
        ".flv" => "video/x-flv",
        ".mkv" => "video/x-matroska",
        _ => return None,
    };
    essence.parse().ok()
}

/// Candidate `<source>` types for a direct video: the detected type first,
/// then the common browser formats, without repeats.
pub fn video_source_types(url: &str) -> Vec<Mime> {
    let mut types: Vec<Mime> = video_mime(url).into_iter().collect();
    for fallback in FALLBACK_VIDEO_TYPES.iter() {
        if !types.contains(fallback) {
            types.push(fallback.clone());
        }
    }
    types
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn drive_preview() {
        assert_eq!(
            to_embed_url("https://drive.google.com/file/d/1A2b3C/view?usp=sharing"),
            "https://drive.google.com/file/d/1A2b3C/preview"
        );
    }

    #[test]
    fn youtube_embed() {
        assert_eq!(
            to_embed_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            "https://www.youtube.com/embed/dQw4w9WgXcQ"
        );
        assert_eq!(
            to_embed_url("https://youtu.be/dQw4w9WgXcQ?t=10"),
            "https://www.youtube.com/embed/dQw4w9WgXcQ"
        );
    }

    #[test]
    fn pass_through() {
        assert_eq!(to_embed_url("not-a-url"), "not-a-url");
        assert_eq!(
            to_embed_url("https://cdn.example.com/a.webm"),
            "https://cdn.example.com/a.webm"
        );
        // Recognized as YouTube, but there is no id to pull out.
        assert_eq!(
            to_embed_url("https://www.youtube.com/channel/xyz"),
            "https://www.youtube.com/channel/xyz"
        );
    }

    #[test]
    fn embed_urls_are_stable() {
        for url in &[
            "https://drive.google.com/file/d/1A2b3C/view",
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
        ] {
            let once = to_embed_url(url);
            assert_eq!(to_embed_url(&once), once);
        }
    }

    #[test]
    fn drive_thumbnail() {
        assert_eq!(
            to_thumbnail_url("https://drive.google.com/file/d/1A2b3C/view").as_deref(),
            Some("https://drive.google.com/thumbnail?id=1A2b3C&sz=w400-h300")
        );
        assert_eq!(to_thumbnail_url("https://youtu.be/abc"), None);
    }

    #[test]
    fn source_types() {
        let types = video_source_types("https://example.com/movie.mkv");
        let names: Vec<String> = types.iter().map(|m| m.to_string()).collect();
        assert_eq!(
            names,
            vec!["video/x-matroska", "video/mp4", "video/webm", "video/ogg"]
        );
        assert_eq!(video_source_types("https://example.com/a.webm").len(), 3);
    }
}

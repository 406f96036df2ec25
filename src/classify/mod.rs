//! Classification of user-supplied video and image links.
//!
//! Every check here is a plain string or pattern test. None of them fail:
//! a link that cannot be parsed is simply not of the kind being asked about.

use std::fmt::{self, Display, Formatter};

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use url::Url;

/// Host marker that every Google Drive share link carries.
const DRIVE_HOST: &str = "drive.google.com";

/// Path segment in front of a Drive file id.
const DRIVE_FILE_SEGMENT: &str = "/file/d/";

/// Extensions recognized as directly playable video files.
pub const VIDEO_EXTENSIONS: [&str; 8] = [
    ".mp4", ".webm", ".ogg", ".avi", ".mov", ".wmv", ".flv", ".mkv",
];

/// Extensions recognized as image files.
pub const IMAGE_EXTENSIONS: [&str; 6] = [".jpg", ".jpeg", ".png", ".gif", ".webp", ".svg"];

lazy_static! {
    static ref YOUTUBE_LINK: Regex =
        Regex::new(r"^(https?://)?(www\.)?(youtube\.com|youtu\.be)/.+").unwrap();

    // First capture group is always the file ID.
    static ref DRIVE_FILE_ID: Regex = Regex::new(r"/file/d/([a-zA-Z0-9_-]+)").unwrap();

    // First capture group is always the video ID.
    static ref YOUTUBE_ID: Regex =
        Regex::new(r"(?:youtube\.com/watch\?v=|youtu\.be/)([a-zA-Z0-9_-]+)").unwrap();
}

/// What a link points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    DriveLink,
    YouTubeLink,
    DirectVideoLink,
    ImageLink,
    Unknown,
}

impl Kind {
    /// Whether a link of this kind can be submitted as a video.
    pub fn is_playable(self) -> bool {
        matches!(
            self,
            Kind::DriveLink | Kind::YouTubeLink | Kind::DirectVideoLink
        )
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Kind::DriveLink => write!(f, "drive"),
            Kind::YouTubeLink => write!(f, "youtube"),
            Kind::DirectVideoLink => write!(f, "direct video"),
            Kind::ImageLink => write!(f, "image"),
            Kind::Unknown => write!(f, "unknown"),
        }
    }
}

/// Classify `url`. The first matching kind in declaration order wins.
pub fn classify(url: &str) -> Kind {
    let kind = if is_drive_link(url) {
        Kind::DriveLink
    } else if is_youtube_link(url) {
        Kind::YouTubeLink
    } else if is_direct_video_link(url) {
        Kind::DirectVideoLink
    } else if is_image_link(url) {
        Kind::ImageLink
    } else {
        Kind::Unknown
    };
    debug!("Classified {:?} as {}", url, kind);
    kind
}

pub fn is_drive_link(url: &str) -> bool {
    url.contains(DRIVE_HOST) && url.contains(DRIVE_FILE_SEGMENT)
}

pub fn is_youtube_link(url: &str) -> bool {
    YOUTUBE_LINK.is_match(url)
}

/// A well-formed URL mentioning one of [VIDEO_EXTENSIONS] anywhere.
pub fn is_direct_video_link(url: &str) -> bool {
    is_well_formed(url) && matched_extension(url, &VIDEO_EXTENSIONS).is_some()
}

/// A well-formed URL mentioning one of [IMAGE_EXTENSIONS], or any
/// well-formed URL containing "thumbnail".
pub fn is_image_link(url: &str) -> bool {
    is_well_formed(url)
        && (matched_extension(url, &IMAGE_EXTENSIONS).is_some() || url.contains("thumbnail"))
}

/// Acceptance test for an optional image field: empty is fine.
pub fn is_valid_image_field(value: &str) -> bool {
    value.is_empty() || is_image_link(value)
}

/// The first extension of `set` found in the lowercased `url`.
pub fn matched_extension(url: &str, set: &[&'static str]) -> Option<&'static str> {
    let lowered = url.to_lowercase();
    set.iter().copied().find(|ext| lowered.contains(ext))
}

/// Google Drive file ID, as found after `/file/d/`.
pub fn extract_drive_file_id(url: &str) -> Option<&str> {
    DRIVE_FILE_ID
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// YouTube video ID from a `watch?v=` or `youtu.be/` link.
pub fn extract_youtube_id(url: &str) -> Option<&str> {
    YOUTUBE_ID
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn is_well_formed(url: &str) -> bool {
    Url::parse(url).is_ok()
}

/// Tone of a [UrlHint].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Neutral,
    Success,
    Error,
}

/// Live feedback for the video link field of the upload form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlHint {
    Empty,
    Drive,
    YouTube,
    DirectVideo,
    Invalid,
}

impl UrlHint {
    pub fn for_url(url: &str) -> Self {
        if url.is_empty() {
            return UrlHint::Empty;
        }
        match classify(url) {
            Kind::DriveLink => UrlHint::Drive,
            Kind::YouTubeLink => UrlHint::YouTube,
            Kind::DirectVideoLink => UrlHint::DirectVideo,
            _ => UrlHint::Invalid,
        }
    }

    pub fn tone(self) -> Tone {
        match self {
            UrlHint::Empty => Tone::Neutral,
            UrlHint::Invalid => Tone::Error,
            _ => Tone::Success,
        }
    }

    /// Whether the hinted link would be accepted on submit.
    pub fn is_valid(self) -> bool {
        self.tone() == Tone::Success
    }

    pub fn message(self) -> &'static str {
        match self {
            UrlHint::Empty => "Paste the shareable link from Google Drive",
            UrlHint::Drive => "✓ Valid Google Drive URL",
            UrlHint::YouTube => "✓ Valid YouTube URL",
            UrlHint::DirectVideo => "✓ Valid video URL",
            UrlHint::Invalid => {
                "⚠ Please enter a valid Google Drive, YouTube, or direct video URL"
            }
        }
    }
}

impl Display for UrlHint {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn drive_share_link() {
        let url = "https://drive.google.com/file/d/1A2b3C/view?usp=sharing";
        assert_eq!(classify(url), Kind::DriveLink);
        assert_eq!(extract_drive_file_id(url), Some("1A2b3C"));
    }

    #[test]
    fn drive_needs_both_markers() {
        assert_eq!(
            classify("https://drive.google.com/drive/folders/abc"),
            Kind::Unknown
        );
        assert_eq!(classify("https://example.com/file/d/abc"), Kind::Unknown);
    }

    #[test]
    fn youtube_links() {
        for url in &[
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "http://youtube.com/watch?v=dQw4w9WgXcQ",
            "youtu.be/dQw4w9WgXcQ",
            "www.youtube.com/embed/dQw4w9WgXcQ",
        ] {
            assert_eq!(classify(url), Kind::YouTubeLink, "{}", url);
        }
        assert_eq!(classify("https://youtube.com/"), Kind::Unknown);
        assert_eq!(classify("https://m.youtube.com/watch?v=x"), Kind::Unknown);
    }

    #[test]
    fn youtube_ids() {
        assert_eq!(
            extract_youtube_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42"),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(extract_youtube_id("https://youtu.be/abc_-1"), Some("abc_-1"));
        assert_eq!(
            extract_youtube_id("https://www.youtube.com/embed/dQw4w9WgXcQ"),
            None
        );
    }

    #[test]
    fn direct_video_needs_a_real_url() {
        assert_eq!(
            classify("https://cdn.example.com/films/Trailer.MP4"),
            Kind::DirectVideoLink
        );
        assert_eq!(classify("clip.mp4"), Kind::Unknown);
        assert_eq!(classify("https://example.com/page.html"), Kind::Unknown);
    }

    #[test]
    fn image_links() {
        assert_eq!(classify("https://example.com/poster.JPG"), Kind::ImageLink);
        assert_eq!(
            classify("https://example.com/api/thumbnail?id=1"),
            Kind::ImageLink
        );
        assert!(!is_image_link("poster.png"));
        assert!(is_valid_image_field(""));
        assert!(!is_valid_image_field("not an image"));
    }

    #[test]
    fn unknown_never_panics() {
        for input in &["", "not-a-url", "://", "http://", "file/d/"] {
            assert_eq!(classify(input), Kind::Unknown, "{}", input);
        }
    }

    #[test]
    fn drive_id_extraction_is_idempotent() {
        let id = extract_drive_file_id("https://drive.google.com/file/d/1A2b3C/view").unwrap();
        assert_eq!(extract_drive_file_id(id), None);
    }

    #[test]
    fn hints() {
        assert_eq!(UrlHint::for_url(""), UrlHint::Empty);
        assert_eq!(UrlHint::for_url("").tone(), Tone::Neutral);
        assert!(UrlHint::for_url("https://youtu.be/abc").is_valid());
        assert_eq!(
            UrlHint::for_url("https://example.com/poster.png"),
            UrlHint::Invalid
        );
        assert_eq!(UrlHint::Drive.to_string(), "✓ Valid Google Drive URL");
    }
}

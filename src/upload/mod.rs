//! Submitting new videos to the catalog.
//!
//! An [UploadForm] holds what the user typed. It can be checked field by
//! field as the user goes, parked as a draft, and finally handed to an
//! [Uploader], which turns it into a [VideoRecord] and stores it.

use chrono::Utc;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::{
    catalog,
    classify::{self, UrlHint},
    embed,
    error::{Field, Result, StorageError, ValidationErrors},
    record::{self, Origin, VideoRecord, DEFAULT_THUMBNAIL},
    store::{Store, DRAFT_KEY},
};

pub const TITLE_MIN_CHARS: usize = 3;
pub const TITLE_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 500;

/// The upload form's fields. Values are trimmed as they are read, and the
/// same shape doubles as the saved draft.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadForm {
    #[serde(
        rename = "driveUrl",
        default,
        deserialize_with = "crate::serde::trimmed::deserialize"
    )]
    pub drive_url: String,

    #[serde(default, deserialize_with = "crate::serde::trimmed::deserialize")]
    pub title: String,

    #[serde(default, deserialize_with = "crate::serde::trimmed::deserialize")]
    pub description: String,

    #[serde(
        rename = "thumbnailUrl",
        default,
        deserialize_with = "crate::serde::trimmed::deserialize"
    )]
    pub thumbnail_url: String,
}

impl UploadForm {
    pub fn new(drive_url: &str, title: &str, description: &str, thumbnail_url: &str) -> Self {
        Self {
            drive_url: drive_url.trim().to_string(),
            title: title.trim().to_string(),
            description: description.trim().to_string(),
            thumbnail_url: thumbnail_url.trim().to_string(),
        }
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::DriveUrl => &self.drive_url,
            Field::Title => &self.title,
            Field::Description => &self.description,
            Field::ThumbnailUrl => &self.thumbnail_url,
        }
    }

    /// Live feedback for the video link.
    pub fn url_hint(&self) -> UrlHint {
        UrlHint::for_url(&self.drive_url)
    }

    /// Fill an empty thumbnail from a Drive link. Returns whether the
    /// thumbnail changed.
    pub fn autofill_thumbnail(&mut self) -> bool {
        if !self.thumbnail_url.is_empty() {
            return false;
        }
        match embed::to_thumbnail_url(&self.drive_url) {
            Some(thumbnail) => {
                self.thumbnail_url = thumbnail;
                true
            }
            None => false,
        }
    }

    /// Check every field, collecting all problems.
    pub fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        if self.drive_url.is_empty() {
            errors.push(Field::DriveUrl, "Video URL is required", "Video URL is required");
        } else if !classify::classify(&self.drive_url).is_playable() {
            errors.push(
                Field::DriveUrl,
                "Please enter a valid video URL",
                "Invalid video URL",
            );
        }

        let title_len = self.title.chars().count();
        if self.title.is_empty() {
            errors.push(Field::Title, "Title is required", "Title is required");
        } else if title_len < TITLE_MIN_CHARS {
            errors.push(
                Field::Title,
                "Title must be at least 3 characters long",
                "Title too short",
            );
        } else if title_len > TITLE_MAX_CHARS {
            errors.push(
                Field::Title,
                "Title must be less than 100 characters",
                "Title too long",
            );
        }

        if self.description.chars().count() > DESCRIPTION_MAX_CHARS {
            errors.push(
                Field::Description,
                "Description must be less than 500 characters",
                "Description too long",
            );
        }

        if !classify::is_valid_image_field(&self.thumbnail_url) {
            errors.push(
                Field::ThumbnailUrl,
                "Please enter a valid image URL",
                "Invalid thumbnail URL",
            );
        }

        errors.into_result()
    }

    /// The lighter check run when the user leaves a field: empty values
    /// pass, only what was typed is judged. Returns the inline message.
    pub fn validate_field(&self, field: Field) -> Option<&'static str> {
        let value = self.value(field);
        if value.is_empty() {
            return None;
        }
        match field {
            Field::DriveUrl if !UrlHint::for_url(value).is_valid() => {
                Some("Please enter a valid video URL")
            }
            Field::Title if value.chars().count() < TITLE_MIN_CHARS => {
                Some("Title must be at least 3 characters long")
            }
            Field::ThumbnailUrl if !classify::is_image_link(value) => {
                Some("Please enter a valid image URL")
            }
            _ => None,
        }
    }
}

/// Park `form` as the draft, replacing any earlier one.
pub fn save_draft(
    store: &mut dyn Store,
    form: &UploadForm,
) -> std::result::Result<(), StorageError> {
    store.set(DRAFT_KEY, &serde_json::to_string(form)?)
}

/// The parked draft, if any. A draft that no longer parses is dropped with
/// a warning.
pub fn load_draft(store: &dyn Store) -> std::result::Result<Option<UploadForm>, StorageError> {
    let raw = match store.get(DRAFT_KEY)? {
        Some(raw) => raw,
        None => return Ok(None),
    };
    match serde_json::from_str(&raw) {
        Ok(form) => Ok(Some(form)),
        Err(e) => {
            warn!("Error loading draft: {}", e);
            Ok(None)
        }
    }
}

pub fn clear_draft(store: &mut dyn Store) -> std::result::Result<(), StorageError> {
    store.remove(DRAFT_KEY)
}

/// Turns completed forms into stored records.
pub struct Uploader<'s> {
    store: &'s mut dyn Store,
    placeholder: String,
}

impl<'s> Uploader<'s> {
    pub fn new(store: &'s mut dyn Store) -> Self {
        Self {
            store,
            placeholder: DEFAULT_THUMBNAIL.to_string(),
        }
    }

    /// Use `placeholder` for records submitted without a thumbnail.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Validate `form`, store the resulting record, and discard the draft.
    /// Nothing is written when validation fails.
    pub fn submit(&mut self, mut form: UploadForm) -> Result<VideoRecord> {
        form.autofill_thumbnail();
        form.validate()?;

        let now = Utc::now();
        let record = VideoRecord {
            id: record::generate_id(now),
            title: form.title,
            description: form.description,
            thumbnail: if form.thumbnail_url.is_empty() {
                self.placeholder.clone()
            } else {
                form.thumbnail_url
            },
            video_url: embed::to_embed_url(&form.drive_url),
            source_url: form.drive_url,
            date_added: Some(now),
            origin: Origin::User,
        };

        let count = catalog::append_user_record(&mut *self.store, &record)?;
        clear_draft(&mut *self.store)?;
        info!("Added video {} ({} user videos)", record.id, count);
        Ok(record)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        error::Error,
        store::{MemoryStore, USER_VIDEOS_KEY, USER_VIDEO_COUNT_KEY},
    };

    const DRIVE: &str = "https://drive.google.com/file/d/1A2b3C/view?usp=sharing";

    fn form_with_title(title: &str) -> UploadForm {
        UploadForm::new(DRIVE, title, "", "")
    }

    #[test]
    fn title_boundaries() {
        let rejected = form_with_title("ab").validate().unwrap_err();
        assert_eq!(
            rejected.message_for(Field::Title),
            Some("Title must be at least 3 characters long")
        );
        assert!(form_with_title("abc").validate().is_ok());
        assert!(form_with_title(&"a".repeat(100)).validate().is_ok());
        let rejected = form_with_title(&"a".repeat(101)).validate().unwrap_err();
        assert_eq!(rejected.errors()[0].summary, "Title too long");
    }

    #[test]
    fn title_counts_characters() {
        assert!(form_with_title("日本語").validate().is_ok());
        assert!(form_with_title(&"é".repeat(100)).validate().is_ok());
    }

    #[test]
    fn collects_every_error() {
        let form = UploadForm::new(
            "",
            "",
            &"d".repeat(501),
            "https://example.com/page.html",
        );
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 4);
        assert_eq!(
            errors.to_string(),
            "Please fix the following errors: Video URL is required, Title is required, \
             Description too long, Invalid thumbnail URL"
        );
    }

    #[test]
    fn rejects_unplayable_links() {
        let form = UploadForm::new("https://example.com/poster.png", "Poster", "", "");
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.message_for(Field::DriveUrl),
            Some("Please enter a valid video URL")
        );
    }

    #[test]
    fn field_checks_skip_empty_values() {
        let form = UploadForm::new("", "ab", "", "nope");
        assert_eq!(form.validate_field(Field::DriveUrl), None);
        assert_eq!(
            form.validate_field(Field::Title),
            Some("Title must be at least 3 characters long")
        );
        assert_eq!(
            form.validate_field(Field::ThumbnailUrl),
            Some("Please enter a valid image URL")
        );
    }

    #[test]
    fn thumbnail_autofill() {
        let mut form = form_with_title("Clip");
        assert!(form.autofill_thumbnail());
        assert_eq!(
            form.thumbnail_url,
            "https://drive.google.com/thumbnail?id=1A2b3C&sz=w400-h300"
        );
        assert!(!form.autofill_thumbnail());

        let mut form = UploadForm::new("https://youtu.be/abc", "Clip", "", "");
        assert!(!form.autofill_thumbnail());
        assert!(form.thumbnail_url.is_empty());
    }

    #[test]
    fn drafts() {
        let mut store = MemoryStore::new();
        assert_eq!(load_draft(&store).unwrap(), None);

        let form = UploadForm::new("https://youtu.be/abc", "  Half done ", "", "");
        save_draft(&mut store, &form).unwrap();
        assert_eq!(load_draft(&store).unwrap(), Some(form));

        clear_draft(&mut store).unwrap();
        assert_eq!(load_draft(&store).unwrap(), None);
    }

    #[test]
    fn corrupt_draft_is_ignored() {
        let mut store = MemoryStore::new();
        store.set(DRAFT_KEY, "{not json").unwrap();
        assert_eq!(load_draft(&store).unwrap(), None);
    }

    #[test]
    fn draft_values_are_trimmed_on_read() {
        let mut store = MemoryStore::new();
        store
            .set(DRAFT_KEY, r#"{"driveUrl": " https://youtu.be/abc ", "title": "x "}"#)
            .unwrap();
        let draft = load_draft(&store).unwrap().unwrap();
        assert_eq!(draft.drive_url, "https://youtu.be/abc");
        assert_eq!(draft.title, "x");
        assert_eq!(draft.description, "");
    }

    #[test]
    fn submit_stores_record() {
        let mut store = MemoryStore::new();
        save_draft(&mut store, &form_with_title("Draft")).unwrap();

        let record = Uploader::new(&mut store)
            .submit(UploadForm::new(DRIVE, "Sunset timelapse", "Shot on a hill", ""))
            .unwrap();

        assert!(record.id.starts_with("user_"));
        assert_eq!(record.video_url, "https://drive.google.com/file/d/1A2b3C/preview");
        assert_eq!(record.source_url, DRIVE);
        assert_eq!(
            record.thumbnail,
            "https://drive.google.com/thumbnail?id=1A2b3C&sz=w400-h300"
        );
        assert_eq!(record.origin, Origin::User);
        assert!(record.date_added.is_some());

        let stored = catalog::user_records(&store).unwrap();
        assert_eq!(stored, vec![record]);
        assert_eq!(store.get(USER_VIDEO_COUNT_KEY).unwrap().as_deref(), Some("1"));
        assert_eq!(store.get(DRAFT_KEY).unwrap(), None);
    }

    #[test]
    fn submit_uses_placeholder() {
        let mut store = MemoryStore::new();
        let record = Uploader::new(&mut store)
            .with_placeholder("/blank.svg")
            .submit(UploadForm::new(
                "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
                "Classic",
                "",
                "",
            ))
            .unwrap();
        assert_eq!(record.thumbnail, "/blank.svg");
        assert_eq!(record.video_url, "https://www.youtube.com/embed/dQw4w9WgXcQ");
    }

    #[test]
    fn invalid_submit_writes_nothing() {
        let mut store = MemoryStore::new();
        let draft = form_with_title("ab");
        save_draft(&mut store, &draft).unwrap();

        let err = Uploader::new(&mut store).submit(draft.clone()).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(store.get(USER_VIDEOS_KEY).unwrap(), None);
        assert_eq!(load_draft(&store).unwrap(), Some(draft));
    }

    #[test]
    fn storage_failure_surfaces() {
        let mut store = MemoryStore::with_quota(64);
        let err = Uploader::new(&mut store)
            .submit(form_with_title("Too big to store"))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Storage(StorageError::QuotaExceeded { .. })
        ));
    }
}

//! Free-text notes kept alongside each video.

use log::debug;

use crate::{
    error::StorageError,
    store::{notes_key, Store},
};

/// Saved notes for `video_id`.
pub fn load(store: &dyn Store, video_id: &str) -> Result<Option<String>, StorageError> {
    store.get(&notes_key(video_id))
}

/// Save `text` as the notes for `video_id`. Surrounding whitespace is
/// dropped, and saving nothing removes the notes altogether.
pub fn save(store: &mut dyn Store, video_id: &str, text: &str) -> Result<(), StorageError> {
    let key = notes_key(video_id);
    let text = text.trim();
    if text.is_empty() {
        debug!("Removing notes for {}", video_id);
        store.remove(&key)
    } else {
        debug!("Saving {} bytes of notes for {}", text.len(), video_id);
        store.set(&key, text)
    }
}

/// Placeholder shown in an empty notes panel.
pub fn placeholder(title: &str) -> String {
    format!("Add your personal notes about \"{}\"...", title)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn save_and_load() {
        let mut store = MemoryStore::new();
        assert_eq!(load(&store, "v1").unwrap(), None);
        save(&mut store, "v1", "  great pacing\n").unwrap();
        assert_eq!(load(&store, "v1").unwrap().as_deref(), Some("great pacing"));
        assert_eq!(store.get("notes_v1").unwrap().as_deref(), Some("great pacing"));
        assert_eq!(load(&store, "v2").unwrap(), None);
    }

    #[test]
    fn blank_notes_are_removed() {
        let mut store = MemoryStore::new();
        save(&mut store, "v1", "keep").unwrap();
        save(&mut store, "v1", " \t\n").unwrap();
        assert_eq!(load(&store, "v1").unwrap(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn placeholder_names_the_video() {
        assert_eq!(
            placeholder("Sunset"),
            "Add your personal notes about \"Sunset\"..."
        );
    }
}

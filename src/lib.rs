//! # filmcat
//!
//! A small video catalog: users submit links to videos hosted on Google
//! Drive, YouTube, or anywhere a plain video file can be fetched from, and
//! a player page shows any catalog entry with a notes panel beside it.
//!
//! ## Features
//!
//! The core of filmcat is [classify] and [embed]: recognizing what a link
//! points at and rewriting share links into their embeddable form. Both are
//! pure functions over strings and never fail.
//!
//! Around them, [upload] validates and stores new entries, and [player]
//! resolves an id against the built-in [catalog] plus the user's own
//! entries. All user state lives in a [store::Store], which callers inject;
//! [store::MemoryStore] is handy for tests and [store::FileStore] keeps it
//! on disk.
//!
//! ## Example
//!
//! ```
//! use filmcat::{embed, store::MemoryStore, upload::{UploadForm, Uploader}};
//!
//! assert_eq!(
//!     embed::to_embed_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
//!     "https://www.youtube.com/embed/dQw4w9WgXcQ",
//! );
//!
//! let mut store = MemoryStore::new();
//! let record = Uploader::new(&mut store).submit(UploadForm::new(
//!     "https://drive.google.com/file/d/1A2b3C/view?usp=sharing",
//!     "Sunset timelapse",
//!     "",
//!     "",
//! ))?;
//! assert_eq!(record.video_url, "https://drive.google.com/file/d/1A2b3C/preview");
//! # Ok::<(), filmcat::Error>(())
//! ```

pub mod catalog;
pub mod classify;
pub mod config;
pub mod embed;
pub mod error;
pub mod notes;
pub mod player;
pub mod query;
pub mod record;
pub mod serde;
pub mod store;
pub mod upload;

pub use crate::{
    classify::{classify, Kind},
    embed::{to_embed_url, to_thumbnail_url},
    error::{Error, Result},
    record::{Origin, VideoRecord},
};

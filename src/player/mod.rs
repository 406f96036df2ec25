//! The player page: look a video up, decide how to play it, and render the
//! markup for the player, the notes panel, and the error states.

use std::fmt::Write;

use log::{info, warn};
use mime::Mime;
use serde::Serialize;

use crate::{
    catalog::{Catalog, CatalogSource},
    classify::{self, Kind},
    embed,
    error::{CatalogError, Error, Result},
    notes,
    record::VideoRecord,
    store::Store,
};

/// Default site name, shown after the video title in the page title.
pub const SITE_NAME: &str = "Film Catalog";

const IFRAME_ALLOW: &str =
    "accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture";

/// One `<source>` of a `<video>` element.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Source {
    pub src: String,

    #[serde(rename = "type", serialize_with = "crate::serde::mime::to_str")]
    pub mime: Mime,
}

/// How a video is played.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Embed {
    /// A provider player in an iframe.
    Frame { src: String },
    /// A file played by the browser itself.
    Video { sources: Vec<Source> },
    /// Nothing we can play inline; offer the link instead.
    External { href: String },
}

impl Embed {
    /// Choose a player for `url`. Provider links are rewritten to their
    /// embed form first.
    pub fn for_url(url: &str) -> Self {
        match classify::classify(url) {
            Kind::DriveLink | Kind::YouTubeLink => Embed::Frame {
                src: embed::to_embed_url(url),
            },
            Kind::DirectVideoLink => Embed::Video {
                sources: embed::video_source_types(url)
                    .into_iter()
                    .map(|mime| Source {
                        src: url.to_string(),
                        mime,
                    })
                    .collect(),
            },
            _ => Embed::External {
                href: url.to_string(),
            },
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        match self {
            Embed::Frame { src } => {
                let _ = write!(
                    out,
                    "<iframe src=\"{}\" frameborder=\"0\" allowfullscreen allow=\"{}\" class=\"video-iframe\"></iframe>",
                    escape(src),
                    IFRAME_ALLOW
                );
            }
            Embed::Video { sources } => {
                out.push_str("<video controls preload=\"metadata\" class=\"video-element\">");
                for source in sources {
                    let _ = write!(
                        out,
                        "<source src=\"{}\" type=\"{}\">",
                        escape(&source.src),
                        escape(source.mime.as_ref())
                    );
                }
                out.push_str("Your browser does not support the video tag.</video>");
            }
            Embed::External { href } => {
                let _ = write!(
                    out,
                    "<div class=\"video-error\"><h3>Unable to load video</h3>\
                     <p>The video format is not supported or the URL is invalid.</p>\
                     <a href=\"{}\" target=\"_blank\" class=\"external-link\">Open in new tab</a></div>",
                    escape(href)
                );
            }
        }
        out
    }
}

/// Everything the player page shows for one video.
#[derive(Serialize, Debug, Clone)]
pub struct PlayerPage {
    pub video: VideoRecord,
    pub page_title: String,
    pub embed: Embed,
    pub notes: Option<String>,
    pub notes_placeholder: String,
}

impl PlayerPage {
    pub fn new(video: VideoRecord, notes: Option<String>, site_name: &str) -> Self {
        let embed = Embed::for_url(video.playable_url());
        Self {
            page_title: format!("{} - {}", video.title, site_name),
            notes_placeholder: notes::placeholder(&video.title),
            embed,
            notes,
            video,
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = write!(
            out,
            "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{}</title></head>\n<body>\n",
            escape(&self.page_title)
        );
        let _ = write!(
            out,
            "<div id=\"videoPlayer\" class=\"fade-in\">{}</div>\n",
            self.embed.render()
        );
        let _ = write!(
            out,
            "<h1 id=\"videoTitle\">{}</h1>\n<p id=\"videoDescription\">{}</p>\n",
            escape(&self.video.title),
            escape(&self.video.description)
        );
        let _ = write!(
            out,
            "<textarea id=\"notesTextarea\" placeholder=\"{}\">{}</textarea>\n</body>\n</html>\n",
            escape(&self.notes_placeholder),
            escape(self.notes.as_deref().unwrap_or(""))
        );
        out
    }
}

/// Full-page error state, with a retry and a way back to the catalog.
pub fn render_error(message: &str, site_name: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>Error - {site}</title></head>\n<body>\n\
         <div id=\"videoPlayer\"><div class=\"video-error\"><h3>Oops! Something went wrong</h3>\
         <p>{message}</p>\
         <button class=\"retry-button\" onclick=\"location.reload()\">Try Again</button>\
         <a href=\"index.html\" class=\"back-link\">Back to Catalog</a></div></div>\n\
         <h1 id=\"videoTitle\">Error</h1>\n<p id=\"videoDescription\">{message}</p>\n</body>\n</html>\n",
        site = escape(site_name),
        message = escape(message),
    )
}

/// Loads videos for the player page.
pub struct Player<'a> {
    source: &'a dyn CatalogSource,
    store: &'a dyn Store,
    site_name: String,
}

impl<'a> Player<'a> {
    pub fn new(source: &'a dyn CatalogSource, store: &'a dyn Store) -> Self {
        Self {
            source,
            store,
            site_name: SITE_NAME.to_string(),
        }
    }

    pub fn with_site_name(mut self, site_name: impl Into<String>) -> Self {
        self.site_name = site_name.into();
        self
    }

    pub fn site_name(&self) -> &str {
        &self.site_name
    }

    /// Look `video_id` up across the built-in and user catalogs, along
    /// with its notes.
    pub async fn load(&self, video_id: &str) -> Result<PlayerPage> {
        let catalog = Catalog::load(self.source, self.store)
            .await
            .map_err(|e| match e {
                Error::Storage(e) => Error::Catalog(CatalogError::UserVideos(e)),
                e => e,
            })?;
        let video = match catalog.find(video_id) {
            Some(video) => video.clone(),
            None => {
                warn!("Video {} not found", video_id);
                return Err(Error::NotFound(video_id.to_string()));
            }
        };
        let notes = notes::load(self.store, video_id)?;
        info!("Loaded video {} ({})", video.id, video.title);
        Ok(PlayerPage::new(video, notes, &self.site_name))
    }

    /// The page for `video_id`, or the error page if it cannot be shown.
    pub async fn render(&self, video_id: &str) -> std::result::Result<String, String> {
        match self.load(video_id).await {
            Ok(page) => Ok(page.render()),
            Err(e) => Err(render_error(&e.to_string(), &self.site_name)),
        }
    }
}

/// Escape text for use in HTML content and quoted attributes.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

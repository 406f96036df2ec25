//! The combined catalog: built-in entries fetched from a [CatalogSource],
//! followed by the user's own submissions from a [Store].

use std::path::PathBuf;

use async_trait::async_trait;
use hyper::{self, body};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{
    error::{CatalogError, Error, StorageError},
    record::VideoRecord,
    store::{Store, USER_VIDEOS_KEY, USER_VIDEO_COUNT_KEY},
};

/// On-the-wire shape of a built-in catalog document.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct CatalogDocument {
    #[serde(default)]
    pub videos: Vec<VideoRecord>,
}

#[async_trait]
/// Somewhere the built-in catalog can be fetched from. Type signatures may
/// be imposing, but this is an [async_trait].
pub trait CatalogSource: Send + Sync {
    /// Fetch every built-in record, in catalog order.
    async fn fetch(&self) -> Result<Vec<VideoRecord>, CatalogError>;
}

/// A catalog document on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileCatalog(pub PathBuf);

#[async_trait]
impl CatalogSource for FileCatalog {
    async fn fetch(&self) -> Result<Vec<VideoRecord>, CatalogError> {
        debug!("Reading catalog from {}", self.0.display());
        let raw = tokio::fs::read(&self.0).await?;
        let doc: CatalogDocument = serde_json::from_slice(&raw)?;
        Ok(doc.videos)
    }
}

/// A catalog document served over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpCatalog(pub String);

#[async_trait]
impl CatalogSource for HttpCatalog {
    async fn fetch(&self) -> Result<Vec<VideoRecord>, CatalogError> {
        let uri: hyper::Uri = self.0.parse()?;
        let https = hyper_tls::HttpsConnector::new();
        let client = hyper::Client::builder().build::<_, hyper::Body>(https);

        debug!("Fetching catalog from {}", uri);
        let mut res = client.get(uri).await?;
        if !res.status().is_success() {
            return Err(CatalogError::Status(res.status().as_u16()));
        }
        let bytes = body::to_bytes(res.body_mut()).await?;
        let doc: CatalogDocument = serde_json::from_slice(&bytes)?;
        Ok(doc.videos)
    }
}

/// A fixed set of records held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog(pub Vec<VideoRecord>);

#[async_trait]
impl CatalogSource for StaticCatalog {
    async fn fetch(&self) -> Result<Vec<VideoRecord>, CatalogError> {
        Ok(self.0.clone())
    }
}

/// Pick a source for `location`: HTTP for `http://` and `https://`, a
/// local file otherwise.
pub fn source_for(location: &str) -> Box<dyn CatalogSource> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Box::new(HttpCatalog(location.to_string()))
    } else {
        Box::new(FileCatalog(PathBuf::from(location)))
    }
}

/// User submissions, oldest first. An absent list is empty.
pub fn user_records(store: &dyn Store) -> Result<Vec<VideoRecord>, StorageError> {
    match store.get(USER_VIDEOS_KEY)? {
        Some(raw) => Ok(serde_json::from_str(&raw)?),
        None => Ok(Vec::new()),
    }
}

/// Append `record` to the user submissions and refresh their count.
pub fn append_user_record(
    store: &mut dyn Store,
    record: &VideoRecord,
) -> Result<usize, StorageError> {
    let mut records = user_records(&*store)?;
    records.push(record.clone());
    store.set(USER_VIDEOS_KEY, &serde_json::to_string(&records)?)?;
    store.set(USER_VIDEO_COUNT_KEY, &records.len().to_string())?;
    Ok(records.len())
}

/// Built-in and user records, fetched together.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub built_in: Vec<VideoRecord>,
    pub user: Vec<VideoRecord>,
}

impl Catalog {
    /// Fetch the built-in records once and read the user records.
    pub async fn load(source: &dyn CatalogSource, store: &dyn Store) -> Result<Self, Error> {
        let built_in = source.fetch().await?;
        let user = user_records(store)?;
        info!(
            "Loaded catalog with {} built-in and {} user videos",
            built_in.len(),
            user.len()
        );
        Ok(Self { built_in, user })
    }

    /// Every record, built-in first.
    pub fn iter(&self) -> impl Iterator<Item = &VideoRecord> {
        self.built_in.iter().chain(self.user.iter())
    }

    pub fn len(&self) -> usize {
        self.built_in.len() + self.user.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First record with `id`, searching built-in records before the
    /// user's.
    pub fn find(&self, id: &str) -> Option<&VideoRecord> {
        self.iter().find(|v| v.id == id)
    }

    /// Ids appearing more than once across both sets.
    pub fn duplicate_ids(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        let mut dupes = Vec::new();
        for record in self.iter() {
            if !seen.insert(record.id.as_str()) && !dupes.contains(&record.id.as_str()) {
                dupes.push(record.id.as_str());
            }
        }
        dupes
    }

    pub fn ids_are_unique(&self) -> bool {
        self.duplicate_ids().is_empty()
    }
}

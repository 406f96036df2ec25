use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;

use crate::{player::SITE_NAME, record::DEFAULT_THUMBNAIL};

/// Where the built-in catalog is read from when nothing else is configured.
pub const DEFAULT_CATALOG: &str = "data/videos.json";

/// Where user state is kept when nothing else is configured.
pub const DEFAULT_STORE: &str = "filmcat-store.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// File backing the key-value store.
    pub store: PathBuf,
    /// Path or http(s) URL of the built-in catalog.
    pub catalog: String,
    pub placeholder_thumbnail: String,
    pub site_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: PathBuf::from(DEFAULT_STORE),
            catalog: DEFAULT_CATALOG.to_string(),
            placeholder_thumbnail: DEFAULT_THUMBNAIL.to_string(),
            site_name: SITE_NAME.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    store: Option<String>,
    catalog: Option<String>,
    placeholder_thumbnail: Option<String>,
    site_name: Option<String>,
}

impl Config {
    /// Read a TOML config file. Keys left out keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        let file: ConfigFile = toml::from_str(raw)?;
        let mut config = Self::default();
        if let Some(store) = file.store {
            config.store = PathBuf::from(store);
        }
        config.override_with(file.catalog, file.placeholder_thumbnail, file.site_name);
        Ok(config)
    }

    /// Replace values with whichever of the given ones are set.
    pub fn override_with(
        &mut self,
        catalog: Option<String>,
        placeholder_thumbnail: Option<String>,
        site_name: Option<String>,
    ) {
        if let Some(catalog) = catalog {
            self.catalog = catalog;
        }
        if let Some(placeholder) = placeholder_thumbnail {
            self.placeholder_thumbnail = placeholder;
        }
        if let Some(site_name) = site_name {
            self.site_name = site_name;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = Config::from_toml("catalog = \"https://example.com/videos.json\"\n").unwrap();
        assert_eq!(config.catalog, "https://example.com/videos.json");
        assert_eq!(config.store, PathBuf::from(DEFAULT_STORE));
        assert_eq!(config.site_name, "Film Catalog");
    }

    #[test]
    fn full_file() {
        let config = Config::from_toml(
            r#"
store = "/var/lib/filmcat/store.json"
catalog = "/srv/videos.json"
placeholder_thumbnail = "/blank.svg"
site_name = "Home Movies"
"#,
        )
        .unwrap();
        assert_eq!(config.store, PathBuf::from("/var/lib/filmcat/store.json"));
        assert_eq!(config.placeholder_thumbnail, "/blank.svg");
        assert_eq!(config.site_name, "Home Movies");
    }

    #[test]
    fn overrides() {
        let mut config = Config::default();
        config.override_with(None, None, Some("Mine".into()));
        assert_eq!(config.catalog, DEFAULT_CATALOG);
        assert_eq!(config.site_name, "Mine");
    }

    #[test]
    fn bad_files() {
        assert!(Config::from_toml("store = 3").is_err());
        assert!(matches!(
            Config::load("/nonexistent/filmcat.toml"),
            Err(ConfigError::Read { .. })
        ));
    }
}

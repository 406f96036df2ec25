//! Query resolved by the player page.
//!
//! The player is opened with `?id=<video id>`; this parses that query string
//! into the id it selects.

use std::str::FromStr;

use crate::error::Error;

/// The player page's query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageQuery {
    id: Option<String>,
}

impl PageQuery {
    /// Parse a query string, with or without its leading `?`. Unknown
    /// parameters are ignored, and of repeated `id`s the first one counts.
    /// A malformed string selects nothing.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query).unwrap_or_default();
        Self {
            id: pairs
                .into_iter()
                .find(|(key, _)| key == "id")
                .map(|(_, value)| value),
        }
    }

    /// The selected video id. Missing and empty ids are both an error.
    pub fn video_id(&self) -> Result<&str, Error> {
        match self.id.as_deref() {
            Some(id) if !id.is_empty() => Ok(id),
            _ => Err(Error::MissingId),
        }
    }
}

impl FromStr for PageQuery {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let query = Self::parse(s);
        query.video_id()?;
        Ok(query)
    }
}

/// Accept either a bare video id or a `?id=` query string.
pub fn resolve_video_id(input: &str) -> Result<String, Error> {
    if input.starts_with('?') || input.contains("id=") {
        input.parse::<PageQuery>()?.video_id().map(str::to_string)
    } else if input.trim().is_empty() {
        Err(Error::MissingId)
    } else {
        Ok(input.trim().to_string())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn simple_ids() {
        assert_eq!(PageQuery::parse("?id=v1").video_id().unwrap(), "v1");
        assert_eq!(
            PageQuery::parse("autoplay=1&id=user_1_abc").video_id().unwrap(),
            "user_1_abc"
        );
        assert_eq!(PageQuery::parse("?id=a%20b").video_id().unwrap(), "a b");
    }

    #[test]
    fn duplicate_ids_take_first() {
        assert_eq!(PageQuery::parse("?id=a&id=b").video_id().unwrap(), "a");
        assert_eq!(resolve_video_id("?id=a&id=b").unwrap(), "a");
        assert!(matches!(
            PageQuery::parse("?id=&id=b").video_id(),
            Err(Error::MissingId)
        ));
    }

    #[test]
    fn missing_ids() {
        for q in &["", "?", "?id=", "?other=1"] {
            assert!(
                matches!(PageQuery::parse(q).video_id(), Err(Error::MissingId)),
                "{}",
                q
            );
        }
        assert!("?id=".parse::<PageQuery>().is_err());
    }

    #[test]
    fn bare_or_query() {
        assert_eq!(resolve_video_id("v1").unwrap(), "v1");
        assert_eq!(resolve_video_id("?id=v2").unwrap(), "v2");
        assert!(resolve_video_id("  ").is_err());
    }
}

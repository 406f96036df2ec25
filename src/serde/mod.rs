//! Extensions to serde for the catalog's foreign and hand-entered types.
//!
//! Provides (de)serializers for [mime::Mime](::mime::Mime), and a
//! deserializer that trims free-form text typed into a form.

use serde::{de::Error, Deserialize, Deserializer, Serializer};

pub mod mime {
    //! Extensions for serializing and deserializing [mime::Mime](::mime::Mime).

    use super::*;
    use ::mime;
    use std::str::FromStr;

    pub fn to_mime<'de, D>(d: D) -> Result<mime::Mime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = Deserialize::deserialize(d)?;
        mime::Mime::from_str(&s).map_err(Error::custom)
    }

    pub fn to_str<S>(m: &mime::Mime, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(m.as_ref())
    }
}

pub mod trimmed {
    //! Text fields that ignore surrounding whitespace, the way a form reads
    //! its inputs. `null` reads as empty.

    use super::*;

    pub fn deserialize<'de, D>(d: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: Option<String> = Deserialize::deserialize(d)?;
        Ok(s.map(|s| s.trim().to_string()).unwrap_or_default())
    }
}

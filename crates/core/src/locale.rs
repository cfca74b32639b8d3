//! Locale identifiers for translatable entities.
//!
//! A locale selects one translation row per entity. Tags are normalized to
//! lowercase so `"EN"`, `"en"` and `"En"` address the same row.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A normalized locale tag: `"en"`, `"de"`, `"pt-br"`.
///
/// Accepts a two-letter language code with an optional two-letter region
/// suffix. Anything else is rejected at the edge so repositories never see
/// a malformed tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Locale(String);

impl Locale {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Construct from a trusted source (configuration defaults).
    ///
    /// Panics on malformed input, which is acceptable for compile-time
    /// constants and startup configuration only.
    pub fn from_static(tag: &str) -> Self {
        tag.parse()
            .unwrap_or_else(|_| panic!("invalid default locale {tag:?}"))
    }
}

impl FromStr for Locale {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_lowercase();
        let valid = match tag.split_once('-') {
            None => is_alpha2(&tag),
            Some((lang, region)) => is_alpha2(lang) && is_alpha2(region),
        };
        if valid {
            Ok(Locale(tag))
        } else {
            Err(CoreError::Validation(format!("invalid locale `{s}`")))
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Locale {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

fn is_alpha2(s: &str) -> bool {
    s.len() == 2 && s.bytes().all(|b| b.is_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_language_only() {
        assert_eq!("en".parse::<Locale>().unwrap().as_str(), "en");
    }

    #[test]
    fn normalizes_case() {
        assert_eq!("PT-BR".parse::<Locale>().unwrap().as_str(), "pt-br");
    }

    #[test]
    fn rejects_malformed_tags() {
        assert!("english".parse::<Locale>().is_err());
        assert!("e".parse::<Locale>().is_err());
        assert!("en-".parse::<Locale>().is_err());
        assert!("".parse::<Locale>().is_err());
    }
}

//! Foundation types shared by every content kind.
//!
//! All user-facing text in canonical entities is a [`LocalizedText`]: one
//! string per supported [`Locale`]. The three keys are struct fields rather
//! than map entries, so a canonical entity cannot be missing a translation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A supported site language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Hu,
    De,
}

impl Locale {
    pub const ALL: [Locale; 3] = [Locale::En, Locale::Hu, Locale::De];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Hu => "hu",
            Self::De => "de",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "hu" => Ok(Self::Hu),
            "de" => Ok(Self::De),
            other => Err(format!("unsupported locale '{other}' (expected en, hu or de)")),
        }
    }
}

/// Text in all three site languages.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LocalizedText {
    pub en: String,
    pub hu: String,
    pub de: String,
}

impl LocalizedText {
    pub fn new(en: impl Into<String>, hu: impl Into<String>, de: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            hu: hu.into(),
            de: de.into(),
        }
    }

    pub fn get(&self, locale: Locale) -> &str {
        match locale {
            Locale::En => &self.en,
            Locale::Hu => &self.hu,
            Locale::De => &self.de,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        [self.en.as_str(), self.hu.as_str(), self.de.as_str()].into_iter()
    }

    /// Case-insensitive substring match against any of the three translations.
    ///
    /// `needle` must already be lower-cased.
    pub fn contains_lowercase(&self, needle: &str) -> bool {
        self.iter().any(|t| t.to_lowercase().contains(needle))
    }
}

/// A predefined content author, shared by reference across entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: String,
    pub name: String,
    pub role: LocalizedText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl Author {
    /// Resolve to a single-locale byline for post rendering.
    pub fn byline(&self, locale: Locale) -> Byline {
        Byline {
            name: self.name.clone(),
            role: Some(self.role.get(locale).to_string()).filter(|r| !r.is_empty()),
            avatar: self.avatar.clone(),
        }
    }
}

/// Author as shown on a single-locale [`Post`](crate::post::Post).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Byline {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl Byline {
    pub const DEFAULT_NAME: &'static str = "Flair-Plastic Team";
    pub const DEFAULT_ROLE: &'static str = "Manufacturing Specialists";

    /// The house byline used when legacy content names no author.
    pub fn house() -> Self {
        Self {
            name: Self::DEFAULT_NAME.to_string(),
            role: Some(Self::DEFAULT_ROLE.to_string()),
            avatar: None,
        }
    }
}

//! The generic post consumed by the template factory.
//!
//! A [`Post`] is already resolved to one locale. Its `content` is kept as a
//! raw JSON payload whose shape depends on the declared [`PostTypeTag`];
//! [`PostContent::narrow`] turns it into one of the six typed payloads.
//!
//! ```text
//! postType      content payload
//! ───────────   ─────────────────────────────────────────────────
//! article       { introduction?, sections[], conclusion? }
//! slideshow     [ { image, alt, text, title?, type? } ]
//! case-study    { client, challenge, solution, implementation[], results[], testimonial? }
//! infographic   { infographicUrl, sections[], downloadUrl? }
//! video         { videoUrl, thumbnail?, transcript?, chapters[] }
//! tutorial      { steps[], prerequisites[], estimatedTime? }
//! ```

use crate::types::Byline;
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The six known post templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PostType {
    Slideshow,
    Article,
    CaseStudy,
    Infographic,
    Video,
    Tutorial,
}

impl PostType {
    pub const ALL: [PostType; 6] = [
        PostType::Slideshow,
        PostType::Article,
        PostType::CaseStudy,
        PostType::Infographic,
        PostType::Video,
        PostType::Tutorial,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Slideshow => "slideshow",
            Self::Article => "article",
            Self::CaseStudy => "case-study",
            Self::Infographic => "infographic",
            Self::Video => "video",
            Self::Tutorial => "tutorial",
        }
    }

    /// Listing category given to converted posts that do not name one.
    pub fn default_category(self) -> &'static str {
        match self {
            Self::Slideshow => "presentations",
            Self::Article => "articles",
            Self::CaseStudy => crate::case_study::CASE_STUDY_CATEGORY,
            Self::Infographic => "infographics",
            Self::Video => "videos",
            Self::Tutorial => "tutorials",
        }
    }
}

impl fmt::Display for PostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A declared post type as found in data: either one of the known
/// variants or an unrecognized string kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostTypeTag {
    Known(PostType),
    Unknown(String),
}

impl PostTypeTag {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(t) => t.as_str(),
            Self::Unknown(s) => s,
        }
    }

    pub fn known(&self) -> Option<PostType> {
        match self {
            Self::Known(t) => Some(*t),
            Self::Unknown(_) => None,
        }
    }
}

impl From<PostType> for PostTypeTag {
    fn from(t: PostType) -> Self {
        Self::Known(t)
    }
}

/// A single-locale content unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub slug: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// ISO 8601 date. Kept as text; unparseable values sort as the epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Byline>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_time: Option<u32>,
    #[serde(default)]
    pub category: String,
    pub post_type: PostTypeTag,
    #[serde(default)]
    pub content: serde_json::Value,
}

impl Post {
    /// Build a post whose declared type matches its typed content.
    pub fn new(
        slug: impl Into<String>,
        title: impl Into<String>,
        category: impl Into<String>,
        content: PostContent,
    ) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
            summary: None,
            image: None,
            date: None,
            author: None,
            tags: Vec::new(),
            read_time: None,
            category: category.into(),
            post_type: content.post_type().into(),
            content: content.to_value(),
        }
    }

    /// Parsed `date`, or the epoch when missing or unparseable.
    pub fn date_or_epoch(&self) -> NaiveDate {
        self.date
            .as_deref()
            .and_then(parse_iso_date)
            .unwrap_or_default()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Parse `YYYY-MM-DD` or a full RFC 3339 timestamp into a calendar date.
pub fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|d| d.date_naive()))
}

// ============================================================================
// Typed payloads
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionKind {
    Text,
    ImageText,
    Quote,
    List,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ArticleSection {
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<SectionKind>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ArticleContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub introduction: Option<String>,
    pub sections: Vec<ArticleSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conclusion: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SlideKind {
    Intro,
    Content,
    Conclusion,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SlideContent {
    pub image: String,
    pub alt: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<SlideKind>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientSummary {
    pub name: String,
    pub industry: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResultMetric {
    pub label: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub improvement: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QuoteTestimonial {
    pub quote: String,
    pub author: String,
    pub position: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CaseStudyContent {
    pub client: ClientSummary,
    pub challenge: String,
    pub solution: String,
    pub implementation: Vec<String>,
    pub results: Vec<ResultMetric>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub testimonial: Option<QuoteTestimonial>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub technologies: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_duration: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InfographicSection {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InfographicContent {
    pub infographic_url: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<InfographicSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VideoChapter {
    pub title: String,
    pub timestamp: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VideoContent {
    pub video_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub chapters: Vec<VideoChapter>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TutorialStep {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tips: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TutorialContent {
    pub steps: Vec<TutorialStep>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub prerequisites: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<String>,
}

/// A payload narrowed to the shape its post type expects.
#[derive(Debug, Clone, PartialEq)]
pub enum PostContent {
    Article(ArticleContent),
    Slideshow(Vec<SlideContent>),
    CaseStudy(CaseStudyContent),
    Infographic(InfographicContent),
    Video(VideoContent),
    Tutorial(TutorialContent),
}

impl PostContent {
    pub fn post_type(&self) -> PostType {
        match self {
            Self::Article(_) => PostType::Article,
            Self::Slideshow(_) => PostType::Slideshow,
            Self::CaseStudy(_) => PostType::CaseStudy,
            Self::Infographic(_) => PostType::Infographic,
            Self::Video(_) => PostType::Video,
            Self::Tutorial(_) => PostType::Tutorial,
        }
    }

    /// Serialize back to the raw payload stored on a [`Post`].
    pub fn to_value(&self) -> serde_json::Value {
        let value = match self {
            Self::Article(c) => serde_json::to_value(c),
            Self::Slideshow(c) => serde_json::to_value(c),
            Self::CaseStudy(c) => serde_json::to_value(c),
            Self::Infographic(c) => serde_json::to_value(c),
            Self::Video(c) => serde_json::to_value(c),
            Self::Tutorial(c) => serde_json::to_value(c),
        };
        // All payloads are plain structs with string keys.
        value.unwrap_or_default()
    }

    /// Interpret a raw payload as the shape `post_type` expects.
    ///
    /// A `null` payload yields the empty default for that type.
    pub fn narrow(
        post_type: PostType,
        value: &serde_json::Value,
    ) -> Result<Self, serde_json::Error> {
        fn typed<T: serde::de::DeserializeOwned + Default>(
            value: &serde_json::Value,
        ) -> Result<T, serde_json::Error> {
            if value.is_null() {
                Ok(T::default())
            } else {
                T::deserialize(value)
            }
        }

        Ok(match post_type {
            PostType::Article => Self::Article(typed(value)?),
            PostType::Slideshow => Self::Slideshow(typed(value)?),
            PostType::CaseStudy => Self::CaseStudy(typed(value)?),
            PostType::Infographic => Self::Infographic(typed(value)?),
            PostType::Video => Self::Video(typed(value)?),
            PostType::Tutorial => Self::Tutorial(typed(value)?),
        })
    }
}

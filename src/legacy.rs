//! Legacy content normalization.
//!
//! Older content was authored as loosely-shaped JSON objects: optional fields,
//! titles that are either plain strings or per-locale maps, and type-specific
//! extras (`data`, `client`, `steps`, `videoUrl`, ...) with no declared type.
//! This module classifies such a record and converts it into a canonical
//! [`Post`].
//!
//! ## Detection
//!
//! [`discover`] evaluates ordered predicates; the first match wins:
//!
//! | # | Predicate | Shape |
//! |---|-----------|-------|
//! | 1 | `data` is an array whose first element has `image` and `text` | slideshow |
//! | 2 | has `client`, `challenge` or `solution` | case study |
//! | 3 | has `videoUrl` or `embedUrl` | video |
//! | 4 | `steps` is an array | tutorial |
//! | 5 | has `infographicUrl`, or has `image` with neither `content` nor `sections` | infographic |
//! | 6 | anything else | article |
//!
//! A field "exists" when it is present and not `null`. Slideshow detection
//! outranks case-study detection even when a record carries both.
//!
//! ## Conversion
//!
//! [`convert_legacy_post`] is total: every missing field gets a default.
//!
//! - **Author**: "Flair-Plastic Team", "Manufacturing Specialists"
//! - **Date**: the conversion date, `YYYY-MM-DD`
//! - **Tags**: inferred from the title by [`infer_tags`]
//! - **Slug**: [`slugify`] of the resolved title
//! - **Category**: the post type's default listing category
//!
//! Read time is estimated for slideshows (words / 200, min 1) and articles
//! (summary characters / 200, min 3), fixed at 8 for case studies, and taken
//! from `readTime` (default 5) for the remaining types.

use crate::naming::{read_time_from_summary, read_time_from_words, slugify, word_count};
use crate::post::{
    ArticleContent, ArticleSection, CaseStudyContent, ClientSummary, InfographicContent,
    InfographicSection, Post, PostContent, PostType, QuoteTestimonial, ResultMetric,
    SectionKind, SlideContent, SlideKind, TutorialContent, TutorialStep, VideoChapter,
    VideoContent,
};
use crate::types::{Byline, Locale};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const CASE_STUDY_READ_TIME: u32 = 8;
const DEFAULT_READ_TIME: u32 = 5;
const FALLBACK_TAG: &str = "manufacturing";

/// Title keywords (matched case-insensitively as substrings) and the tag
/// each group contributes.
const TAG_KEYWORDS: &[(&[&str], &str)] = &[
    (&["injection", "molding"], "injection-molding"),
    (&["sustainab", "eco"], "sustainability"),
    (&["energy", "efficiency"], "energy-efficiency"),
    (&["contract", "manufacturing"], "contract-manufacturing"),
    (&["plastic", "polymer"], "plastics"),
    (&["quality", "control"], "quality-control"),
    (&["innovation", "technology"], "innovation"),
    (&["industry", "market"], "industry-trends"),
];

const DEFAULT_IMPLEMENTATION: [&str; 4] = [
    "Initial assessment and requirements analysis",
    "Design, tooling and prototyping",
    "Production rollout and process validation",
    "Continuous monitoring and optimization",
];

/// An untyped legacy content object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LegacyRecord(Map<String, Value>);

impl From<Value> for LegacyRecord {
    /// Non-object values become an empty record.
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }
}

impl From<Map<String, Value>> for LegacyRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl LegacyRecord {
    /// A present, non-null field.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    pub fn has(&self, key: &str) -> bool {
        self.field(key).is_some()
    }

    fn array(&self, key: &str) -> Option<&[Value]> {
        self.field(key).and_then(Value::as_array).map(Vec::as_slice)
    }

    fn text(&self, key: &str, locale: Locale) -> Option<String> {
        self.field(key).and_then(|v| text_of(v, locale))
    }

    fn first_text(&self, keys: &[&str], locale: Locale) -> Option<String> {
        keys.iter().find_map(|k| self.text(k, locale))
    }

    fn read_time(&self) -> Option<u32> {
        self.field("readTime")
            .and_then(Value::as_u64)
            .and_then(|n| u32::try_from(n).ok())
            .filter(|n| *n >= 1)
    }
}

/// A non-empty string, or the best translation from a per-locale map:
/// requested locale, then `en`, then any non-empty value.
fn text_of(value: &Value, locale: Locale) -> Option<String> {
    let non_empty = |v: &Value| {
        v.as_str()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
    };
    match value {
        Value::String(_) => non_empty(value),
        Value::Object(map) => map
            .get(locale.as_str())
            .and_then(non_empty)
            .or_else(|| map.get("en").and_then(non_empty))
            .or_else(|| map.values().find_map(non_empty)),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn strings(values: Option<&[Value]>, locale: Locale) -> Vec<String> {
    values
        .unwrap_or_default()
        .iter()
        .filter_map(|v| text_of(v, locale))
        .collect()
}

// ============================================================================
// Detection
// ============================================================================

/// The shape a legacy record was recognized as, borrowing the fields that
/// decided it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LegacyShape<'a> {
    Slideshow { slides: &'a [Value] },
    CaseStudy,
    Video { url: &'a Value },
    Tutorial { steps: &'a [Value] },
    Infographic,
    Article,
}

impl LegacyShape<'_> {
    pub fn post_type(&self) -> PostType {
        match self {
            Self::Slideshow { .. } => PostType::Slideshow,
            Self::CaseStudy => PostType::CaseStudy,
            Self::Video { .. } => PostType::Video,
            Self::Tutorial { .. } => PostType::Tutorial,
            Self::Infographic => PostType::Infographic,
            Self::Article => PostType::Article,
        }
    }
}

/// Classify a legacy record by the ordered predicates in the module docs.
pub fn discover(record: &LegacyRecord) -> LegacyShape<'_> {
    if let Some(slides) = record.array("data") {
        let first_is_slide = slides.first().is_some_and(|first| {
            let has = |k: &str| first.get(k).is_some_and(|v| !v.is_null());
            has("image") && has("text")
        });
        if first_is_slide {
            return LegacyShape::Slideshow { slides };
        }
    }
    if ["client", "challenge", "solution"].iter().any(|k| record.has(k)) {
        return LegacyShape::CaseStudy;
    }
    if let Some(url) = record.field("videoUrl").or_else(|| record.field("embedUrl")) {
        return LegacyShape::Video { url };
    }
    if let Some(steps) = record.array("steps") {
        return LegacyShape::Tutorial { steps };
    }
    if record.has("infographicUrl")
        || (record.has("image") && !record.has("content") && !record.has("sections"))
    {
        return LegacyShape::Infographic;
    }
    LegacyShape::Article
}

pub fn detect_post_type(record: &LegacyRecord) -> PostType {
    discover(record).post_type()
}

// ============================================================================
// Tag inference
// ============================================================================

/// Tags implied by title keywords, in table order. Falls back to
/// `["manufacturing"]` when nothing matches.
pub fn infer_tags(title: &str) -> Vec<String> {
    let title = title.to_lowercase();
    let mut tags: Vec<String> = TAG_KEYWORDS
        .iter()
        .filter(|(keywords, _)| keywords.iter().any(|k| title.contains(k)))
        .map(|(_, tag)| tag.to_string())
        .collect();
    if tags.is_empty() {
        tags.push(FALLBACK_TAG.to_string());
    }
    tags
}

// ============================================================================
// Conversion
// ============================================================================

/// Settings applied while converting legacy records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Which translation to pick from per-locale text.
    pub locale: Locale,
    /// Date given to records that carry none.
    pub today: NaiveDate,
}

impl ConvertOptions {
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            today: chrono::Local::now().date_naive(),
        }
    }
}

/// Fields shared by every converted post.
struct Header {
    slug: String,
    title: String,
    summary: Option<String>,
    image: Option<String>,
    date: String,
    author: Byline,
    tags: Vec<String>,
    category: Option<String>,
}

impl Header {
    fn read(record: &LegacyRecord, opts: &ConvertOptions) -> Self {
        let locale = opts.locale;
        let title = record
            .text("title", locale)
            .unwrap_or_else(|| "Untitled".to_string());
        let slug = record
            .text("slug", locale)
            .map(|s| slugify(&s))
            .filter(|s| !s.is_empty())
            .or_else(|| Some(slugify(&title)).filter(|s| !s.is_empty()))
            .unwrap_or_else(|| "untitled".to_string());
        let tags = strings(record.array("tags"), locale);
        let tags = if tags.is_empty() {
            infer_tags(&title)
        } else {
            tags
        };

        Self {
            slug,
            summary: record.first_text(&["summary", "excerpt", "description"], locale),
            image: record.text("image", locale),
            date: record
                .text("date", locale)
                .unwrap_or_else(|| opts.today.format("%Y-%m-%d").to_string()),
            author: byline(record.field("author"), locale),
            tags,
            category: record.text("category", locale),
            title,
        }
    }

    fn into_post(self, content: PostContent, read_time: u32) -> Post {
        let category = self
            .category
            .unwrap_or_else(|| content.post_type().default_category().to_string());
        let mut post = Post::new(self.slug, self.title, category, content);
        post.summary = self.summary;
        post.image = self.image;
        post.date = Some(self.date);
        post.author = Some(self.author);
        post.tags = self.tags;
        post.read_time = Some(read_time);
        post
    }
}

fn byline(value: Option<&Value>, locale: Locale) -> Byline {
    match value {
        Some(Value::String(name)) if !name.trim().is_empty() => Byline {
            name: name.trim().to_string(),
            role: None,
            avatar: None,
        },
        Some(Value::Object(map)) => match map.get("name").and_then(|n| text_of(n, locale)) {
            Some(name) => Byline {
                name,
                role: map.get("role").and_then(|r| text_of(r, locale)),
                avatar: map.get("avatar").and_then(|a| text_of(a, locale)),
            },
            None => Byline::house(),
        },
        _ => Byline::house(),
    }
}

/// Normalize any legacy record into a canonical post. Never fails.
pub fn convert_legacy_post(record: &LegacyRecord, opts: &ConvertOptions) -> Post {
    match discover(record) {
        LegacyShape::Slideshow { slides } => convert_slideshow(record, slides, opts),
        LegacyShape::CaseStudy => convert_case_study(record, opts),
        LegacyShape::Video { url } => convert_video(record, url, opts),
        LegacyShape::Tutorial { steps } => convert_tutorial(record, steps, opts),
        LegacyShape::Infographic => convert_infographic(record, opts),
        LegacyShape::Article => convert_article(record, opts),
    }
}

/// Slide `i` of `n`: the first is the intro, the last the conclusion. A
/// single slide is an intro.
fn slide_kind(i: usize, n: usize) -> SlideKind {
    if i == 0 {
        SlideKind::Intro
    } else if i + 1 == n {
        SlideKind::Conclusion
    } else {
        SlideKind::Content
    }
}

fn convert_slideshow(record: &LegacyRecord, slides: &[Value], opts: &ConvertOptions) -> Post {
    let locale = opts.locale;
    let mut header = Header::read(record, opts);

    let content: Vec<SlideContent> = slides
        .iter()
        .enumerate()
        .map(|(i, slide)| {
            let get = |k: &str| slide.get(k).and_then(|v| text_of(v, locale));
            let alt = get("alt");
            // Later slides show their alt text as a heading; the intro never does.
            let title = get("title").or_else(|| if i > 0 { alt.clone() } else { None });
            SlideContent {
                image: get("image").unwrap_or_default(),
                alt: alt.unwrap_or_else(|| header.title.clone()),
                text: get("text").unwrap_or_default(),
                title,
                kind: Some(slide_kind(i, slides.len())),
            }
        })
        .collect();

    let words: usize = content.iter().map(|s| word_count(&s.text)).sum();
    if header.summary.is_none() {
        header.summary = content.first().map(|s| s.text.clone()).filter(|t| !t.is_empty());
    }
    if header.image.is_none() {
        header.image = content.first().map(|s| s.image.clone()).filter(|i| !i.is_empty());
    }
    header.into_post(PostContent::Slideshow(content), read_time_from_words(words))
}

fn convert_article(record: &LegacyRecord, opts: &ConvertOptions) -> Post {
    let locale = opts.locale;
    let header = Header::read(record, opts);

    let sections: Vec<ArticleSection> = match record.array("sections") {
        Some(sections) => sections
            .iter()
            .enumerate()
            .map(|(i, s)| match s {
                Value::Object(_) => ArticleSection {
                    title: s
                        .get("title")
                        .and_then(|v| text_of(v, locale))
                        .unwrap_or_else(|| format!("Section {}", i + 1)),
                    content: s
                        .get("content")
                        .and_then(|v| text_of(v, locale))
                        .unwrap_or_default(),
                    image: s.get("image").and_then(|v| text_of(v, locale)),
                    kind: s
                        .get("type")
                        .and_then(|v| SectionKind::deserialize(v).ok())
                        .or(Some(SectionKind::Text)),
                },
                other => numbered_section(i, text_of(other, locale).unwrap_or_default()),
            })
            .collect(),
        None => {
            let paragraphs = match record.field("content") {
                Some(Value::Array(items)) => strings(Some(items.as_slice()), locale),
                Some(other) => text_of(other, locale).into_iter().collect(),
                None => Vec::new(),
            };
            paragraphs
                .into_iter()
                .enumerate()
                .map(|(i, p)| numbered_section(i, p))
                .collect()
        }
    };

    let conclusion = record.text("conclusion", locale).unwrap_or_else(|| {
        format!(
            "These are the key points of \"{}\". Contact the Flair-Plastic team to discuss how they apply to your production.",
            header.title
        )
    });
    let read_time = read_time_from_summary(header.summary.as_deref().unwrap_or_default());
    let content = ArticleContent {
        introduction: header.summary.clone(),
        sections,
        conclusion: Some(conclusion),
    };
    header.into_post(PostContent::Article(content), read_time)
}

fn numbered_section(i: usize, content: String) -> ArticleSection {
    ArticleSection {
        title: format!("Section {}", i + 1),
        content,
        image: None,
        kind: Some(SectionKind::Text),
    }
}

fn convert_video(record: &LegacyRecord, url: &Value, opts: &ConvertOptions) -> Post {
    let locale = opts.locale;
    let header = Header::read(record, opts);
    let chapters = record
        .array("chapters")
        .unwrap_or_default()
        .iter()
        .map(|c| {
            let get = |k: &str| c.get(k).and_then(|v| text_of(v, locale)).unwrap_or_default();
            VideoChapter {
                title: get("title"),
                timestamp: get("timestamp"),
                description: get("description"),
            }
        })
        .collect();
    let content = VideoContent {
        video_url: text_of(url, locale).unwrap_or_default(),
        thumbnail: record
            .text("thumbnail", locale)
            .or_else(|| header.image.clone()),
        transcript: record.text("transcript", locale),
        chapters,
    };
    let read_time = record.read_time().unwrap_or(DEFAULT_READ_TIME);
    header.into_post(PostContent::Video(content), read_time)
}

fn convert_tutorial(record: &LegacyRecord, steps: &[Value], opts: &ConvertOptions) -> Post {
    let locale = opts.locale;
    let header = Header::read(record, opts);
    let steps = steps
        .iter()
        .enumerate()
        .map(|(i, step)| match step {
            Value::Object(_) => {
                let get = |k: &str| step.get(k).and_then(|v| text_of(v, locale));
                TutorialStep {
                    title: get("title").unwrap_or_else(|| format!("Step {}", i + 1)),
                    description: get("description").unwrap_or_default(),
                    image: get("image"),
                    tips: strings(
                        step.get("tips").and_then(Value::as_array).map(Vec::as_slice),
                        locale,
                    ),
                }
            }
            other => TutorialStep {
                title: format!("Step {}", i + 1),
                description: text_of(other, locale).unwrap_or_default(),
                image: None,
                tips: Vec::new(),
            },
        })
        .collect();
    let estimated_time = match record.field("estimatedTime") {
        Some(Value::Number(n)) => Some(format!("{n} minutes")),
        Some(other) => text_of(other, locale),
        None => None,
    };
    let content = TutorialContent {
        steps,
        prerequisites: strings(record.array("prerequisites"), locale),
        estimated_time,
    };
    let read_time = record.read_time().unwrap_or(DEFAULT_READ_TIME);
    header.into_post(PostContent::Tutorial(content), read_time)
}

fn convert_infographic(record: &LegacyRecord, opts: &ConvertOptions) -> Post {
    let locale = opts.locale;
    let header = Header::read(record, opts);
    let sections = record
        .array("sections")
        .unwrap_or_default()
        .iter()
        .map(|s| {
            let get = |k: &str| s.get(k).and_then(|v| text_of(v, locale)).unwrap_or_default();
            InfographicSection {
                title: get("title"),
                description: get("description"),
            }
        })
        .collect();
    let content = InfographicContent {
        infographic_url: record
            .text("infographicUrl", locale)
            .or_else(|| header.image.clone())
            .unwrap_or_default(),
        sections,
        download_url: record.text("downloadUrl", locale),
    };
    let read_time = record.read_time().unwrap_or(DEFAULT_READ_TIME);
    header.into_post(PostContent::Infographic(content), read_time)
}

// ============================================================================
// Case studies
// ============================================================================

/// Minimal inputs for synthesizing a case-study post.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaseStudyInput {
    pub title: String,
    pub client_name: String,
    pub industry: String,
    pub challenge: String,
    pub solution: String,
    pub metrics: Vec<ResultMetric>,
    pub implementation: Vec<String>,
    pub testimonial: Option<QuoteTestimonial>,
}

/// Build a complete case-study post from minimal inputs.
///
/// The slug is synthesized from the title. A four-step implementation plan
/// and a testimonial attributed to "{client} Representative" fill in when
/// the input has none. Read time is fixed at 8 minutes.
pub fn create_case_study(input: CaseStudyInput, opts: &ConvertOptions) -> Post {
    let implementation = if input.implementation.is_empty() {
        DEFAULT_IMPLEMENTATION.iter().map(|s| s.to_string()).collect()
    } else {
        input.implementation
    };
    let testimonial = input.testimonial.unwrap_or_else(|| QuoteTestimonial {
        quote: format!(
            "Working with Flair-Plastic gave {} a dependable partner from the first prototype to full-scale production.",
            input.client_name
        ),
        author: format!("{} Representative", input.client_name),
        position: format!("{} client", input.industry),
    });
    let content = CaseStudyContent {
        client: ClientSummary {
            name: input.client_name,
            industry: input.industry,
        },
        challenge: input.challenge,
        solution: input.solution,
        implementation,
        results: input.metrics,
        testimonial: Some(testimonial),
        technologies: Vec::new(),
        project_duration: None,
    };

    let header = Header {
        slug: slugify(&input.title),
        tags: infer_tags(&input.title),
        summary: Some(content.challenge.clone()).filter(|c| !c.is_empty()),
        image: None,
        date: opts.today.format("%Y-%m-%d").to_string(),
        author: Byline::house(),
        category: None,
        title: input.title,
    };
    header.into_post(PostContent::CaseStudy(content), CASE_STUDY_READ_TIME)
}

fn convert_case_study(record: &LegacyRecord, opts: &ConvertOptions) -> Post {
    let locale = opts.locale;
    let header = Header::read(record, opts);

    let (client_name, client_industry) = match record.field("client") {
        Some(Value::Object(map)) => (
            map.get("name").and_then(|v| text_of(v, locale)),
            map.get("industry").and_then(|v| text_of(v, locale)),
        ),
        Some(other) => (text_of(other, locale), None),
        None => (None, None),
    };
    let metrics = record
        .array("metrics")
        .or_else(|| record.array("results"))
        .unwrap_or_default()
        .iter()
        .filter_map(|m| {
            let get = |k: &str| m.get(k).and_then(|v| text_of(v, locale));
            Some(ResultMetric {
                label: get("label")?,
                value: get("value").unwrap_or_default(),
                improvement: get("improvement"),
            })
        })
        .collect();
    let testimonial = record.field("testimonial").and_then(|t| {
        let get = |k: &str| t.get(k).and_then(|v| text_of(v, locale));
        Some(QuoteTestimonial {
            quote: get("quote")?,
            author: get("author").unwrap_or_default(),
            position: get("position").unwrap_or_default(),
        })
    });

    let input = CaseStudyInput {
        title: header.title.clone(),
        client_name: client_name.unwrap_or_else(|| "Our client".to_string()),
        industry: record
            .text("industry", locale)
            .or(client_industry)
            .unwrap_or_else(|| "Manufacturing".to_string()),
        challenge: record.text("challenge", locale).unwrap_or_default(),
        solution: record.text("solution", locale).unwrap_or_default(),
        metrics,
        implementation: strings(record.array("implementation"), locale),
        testimonial,
    };

    // Explicit record fields win over the synthesized ones.
    let mut post = create_case_study(input, opts);
    post.slug = header.slug;
    post.tags = header.tags;
    post.date = Some(header.date);
    post.author = Some(header.author);
    post.image = header.image;
    if header.summary.is_some() {
        post.summary = header.summary;
    }
    if let Some(category) = header.category {
        post.category = category;
    }
    post
}

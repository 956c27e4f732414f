//! Case studies: the canonical trilingual entity and its hand-authored override.
//!
//! Regular case studies are fully data-driven. A [`CustomCaseStudy`] describes
//! a bespoke page that lives at its own `customUrl`; it carries only the fields
//! a listing needs. When both share an `id`, the custom entry replaces the
//! regular one wholesale in aggregated views (see [`crate::registry`]).

use crate::post::{
    CaseStudyContent, ClientSummary, Post, PostContent, QuoteTestimonial, ResultMetric,
};
use crate::registry::{Entry, Listing, Registry};
use crate::types::{Author, Locale, LocalizedText};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Listing category of every case study, canonical or converted from legacy data.
pub const CASE_STUDY_CATEGORY: &str = "case-study";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub name: String,
    pub industry: String,
    pub size: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metric {
    pub label: LocalizedText,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub improvement: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    pub quote: LocalizedText,
    pub author: String,
    pub position: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseStudyResults {
    pub metrics: Vec<Metric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub testimonial: Option<Testimonial>,
}

/// A complete, data-driven case study.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseStudy {
    pub id: String,
    pub slug: String,
    pub title: LocalizedText,
    pub description: LocalizedText,
    pub content: LocalizedText,
    pub challenge: LocalizedText,
    pub solution: LocalizedText,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_image: Option<String>,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<NaiveDate>,
    pub author: Author,
    pub read_time: u32,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_url: Option<String>,
    pub client: Client,
    pub results: CaseStudyResults,
    pub industry: String,
    pub project_duration: String,
    #[serde(default)]
    pub technologies: Vec<String>,
}

impl CaseStudy {
    /// Project into a single-locale post for the case-study template.
    pub fn to_post(&self, locale: Locale) -> Post {
        let content = CaseStudyContent {
            client: ClientSummary {
                name: self.client.name.clone(),
                industry: self.client.industry.clone(),
            },
            challenge: self.challenge.get(locale).to_string(),
            solution: self.solution.get(locale).to_string(),
            implementation: self
                .content
                .get(locale)
                .split("\n\n")
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(String::from)
                .collect(),
            results: self
                .results
                .metrics
                .iter()
                .map(|m| ResultMetric {
                    label: m.label.get(locale).to_string(),
                    value: m.value.clone(),
                    improvement: m.improvement.clone(),
                })
                .collect(),
            testimonial: self.results.testimonial.as_ref().map(|t| QuoteTestimonial {
                quote: t.quote.get(locale).to_string(),
                author: t.author.clone(),
                position: t.position.clone(),
            }),
            technologies: self.technologies.clone(),
            project_duration: Some(self.project_duration.clone()),
        };

        let mut post = Post::new(
            self.slug.clone(),
            self.title.get(locale),
            CASE_STUDY_CATEGORY,
            PostContent::CaseStudy(content),
        );
        post.summary = Some(self.description.get(locale).to_string());
        post.image = Some(self.image.clone());
        post.date = Some(self.date.format("%Y-%m-%d").to_string());
        post.author = Some(self.author.byline(locale));
        post.tags = self.tags.clone();
        post.read_time = Some(self.read_time);
        post
    }
}

/// A hand-authored case study backed by its own bespoke page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomCaseStudy {
    pub id: String,
    pub slug: String,
    pub custom_url: String,
    pub title: LocalizedText,
    pub description: LocalizedText,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_time: Option<u32>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<Client>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
}

impl Listing for CaseStudy {
    fn id(&self) -> &str {
        &self.id
    }
    fn slug(&self) -> &str {
        &self.slug
    }
    fn date(&self) -> NaiveDate {
        self.date
    }
    fn is_featured(&self) -> bool {
        self.featured
    }
    fn tags(&self) -> &[String] {
        &self.tags
    }
    fn title(&self) -> &LocalizedText {
        &self.title
    }
    fn description(&self) -> &LocalizedText {
        &self.description
    }
    fn group(&self) -> Option<&str> {
        Some(&self.industry)
    }
    fn url(&self) -> Option<&str> {
        self.custom_url.as_deref()
    }
}

impl Listing for CustomCaseStudy {
    fn id(&self) -> &str {
        &self.id
    }
    fn slug(&self) -> &str {
        &self.slug
    }
    fn date(&self) -> NaiveDate {
        self.date
    }
    fn is_featured(&self) -> bool {
        self.featured
    }
    fn tags(&self) -> &[String] {
        &self.tags
    }
    fn title(&self) -> &LocalizedText {
        &self.title
    }
    fn description(&self) -> &LocalizedText {
        &self.description
    }
    fn group(&self) -> Option<&str> {
        self.industry.as_deref()
    }
    fn url(&self) -> Option<&str> {
        Some(&self.custom_url)
    }
}

pub type CaseStudyRegistry = Registry<CaseStudy, CustomCaseStudy>;

impl CaseStudyRegistry {
    /// Merged entries whose industry matches, case-insensitively. Custom
    /// entries without an industry never match.
    pub fn by_industry(&self, industry: &str) -> Vec<Entry<CaseStudy, CustomCaseStudy>> {
        let needle = industry.to_lowercase();
        self.all_with_custom()
            .into_iter()
            .filter(|e| e.group().is_some_and(|g| g.to_lowercase() == needle))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::post::PostType;
    use crate::registry::StaticSource;
    use crate::test_helpers::{case_study, custom_case_study, uniform_text};

    #[test]
    fn deserializes_camel_case_json() {
        let json = serde_json::to_value(case_study("packaging-innovation", "2024-05-01")).unwrap();
        assert!(json.get("projectDuration").is_some());
        assert!(json.get("readTime").is_some());
        let back: CaseStudy = serde_json::from_value(json).unwrap();
        assert_eq!(back.id, "packaging-innovation");
    }

    #[test]
    fn custom_entry_requires_custom_url() {
        let json = serde_json::json!({
            "id": "x",
            "slug": "x",
            "title": {"en": "X", "hu": "X", "de": "X"},
            "description": {"en": "", "hu": "", "de": ""},
            "date": "2024-01-01"
        });
        assert!(serde_json::from_value::<CustomCaseStudy>(json).is_err());
    }

    #[test]
    fn to_post_resolves_locale() {
        let study = case_study("packaging-innovation", "2024-05-01");
        let post = study.to_post(Locale::De);
        assert_eq!(post.title, study.title.de);
        assert_eq!(post.post_type.known(), Some(PostType::CaseStudy));
        assert_eq!(post.category, CASE_STUDY_CATEGORY);
        assert_eq!(post.date.as_deref(), Some("2024-05-01"));

        let PostContent::CaseStudy(content) =
            PostContent::narrow(PostType::CaseStudy, &post.content).unwrap()
        else {
            panic!("expected case-study payload");
        };
        assert_eq!(content.challenge, study.challenge.de);
        assert_eq!(content.results.len(), study.results.metrics.len());
        assert_eq!(content.results[0].label, study.results.metrics[0].label.de);
    }

    #[test]
    fn to_post_splits_content_into_implementation_steps() {
        let mut study = case_study("a", "2024-01-01");
        study.content = uniform_text("First phase.\n\nSecond phase.\n\n");
        let post = study.to_post(Locale::En);
        let PostContent::CaseStudy(content) =
            PostContent::narrow(PostType::CaseStudy, &post.content).unwrap()
        else {
            panic!("expected case-study payload");
        };
        assert_eq!(content.implementation, vec!["First phase.", "Second phase."]);
    }

    #[test]
    fn listing_group_is_industry() {
        let study = case_study("a", "2024-01-01");
        assert_eq!(study.group(), Some(study.industry.as_str()));
        let custom = custom_case_study("b", "2024-01-01");
        assert_eq!(custom.url(), Some(custom.custom_url.as_str()));
    }

    #[test]
    fn by_industry_ignores_case_and_skips_custom_without_industry() {
        let mut automotive = case_study("automotive", "2024-01-01");
        automotive.industry = "Automotive".to_string();
        let mut food = case_study("food", "2024-01-05");
        food.industry = "Élelmiszeripar".to_string();
        let mut custom_automotive = custom_case_study("custom-automotive", "2024-02-01");
        custom_automotive.industry = Some("AUTOMOTIVE".to_string());
        let no_industry = custom_case_study("no-industry", "2024-03-01");
        assert!(no_industry.industry.is_none());

        let reg: CaseStudyRegistry = Registry::new(
            StaticSource(vec![automotive, food]),
            vec![custom_automotive, no_industry],
        );

        let ids = |entries: Vec<Entry<CaseStudy, CustomCaseStudy>>| {
            entries.iter().map(|e| e.id().to_string()).collect::<Vec<_>>()
        };
        assert_eq!(ids(reg.by_industry("automotive")), vec!["custom-automotive", "automotive"]);
        assert_eq!(ids(reg.by_industry("ÉLELMISZERIPAR")), vec!["food"]);
        assert!(reg.by_industry("").is_empty());
        assert!(reg.by_industry("Medical").is_empty());
    }
}

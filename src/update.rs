//! Product updates, release notes and maintenance announcements.
//!
//! Structurally parallel to [`crate::case_study`]: a canonical trilingual
//! [`UpdateItem`] and a hand-authored [`CustomUpdate`] override, merged by
//! [`UpdateRegistry`].

use crate::registry::{Entry, Listing, Registry};
use crate::types::{Author, LocalizedText};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UpdateCategory {
    ProductUpdate,
    FeatureRelease,
    VersionUpdate,
    Maintenance,
    Enhancement,
}

impl UpdateCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ProductUpdate => "product-update",
            Self::FeatureRelease => "feature-release",
            Self::VersionUpdate => "version-update",
            Self::Maintenance => "maintenance",
            Self::Enhancement => "enhancement",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeType {
    NewFeature,
    Improvement,
    BugFix,
    Security,
    BreakingChange,
}

impl ChangeType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NewFeature => "new-feature",
            Self::Improvement => "improvement",
            Self::BugFix => "bug-fix",
            Self::Security => "security",
            Self::BreakingChange => "breaking-change",
        }
    }
}

/// A complete, data-driven update announcement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItem {
    pub id: String,
    pub slug: String,
    pub title: LocalizedText,
    pub description: LocalizedText,
    pub content: LocalizedText,
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
    pub update_category: UpdateCategory,
    pub version: String,
    pub priority: Priority,
    #[serde(default)]
    pub affected_products: Vec<String>,
    pub change_type: ChangeType,
}

/// A hand-authored update backed by its own bespoke page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomUpdate {
    pub id: String,
    pub slug: String,
    pub custom_url: String,
    pub title: LocalizedText,
    pub description: LocalizedText,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_category: Option<UpdateCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_type: Option<ChangeType>,
    #[serde(default)]
    pub affected_products: Vec<String>,
}

impl Listing for UpdateItem {
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
        Some(self.update_category.as_str())
    }
    fn url(&self) -> Option<&str> {
        self.custom_url.as_deref()
    }
    fn search_terms(&self) -> Vec<&str> {
        vec![
            self.update_category.as_str(),
            self.change_type.as_str(),
            self.version.as_str(),
        ]
    }
}

impl Listing for CustomUpdate {
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
        self.update_category.map(UpdateCategory::as_str)
    }
    fn url(&self) -> Option<&str> {
        Some(&self.custom_url)
    }
    fn search_terms(&self) -> Vec<&str> {
        self.update_category
            .map(UpdateCategory::as_str)
            .into_iter()
            .chain(self.change_type.map(ChangeType::as_str))
            .chain(self.version.as_deref())
            .collect()
    }
}

pub type UpdateEntry = Entry<UpdateItem, CustomUpdate>;

impl UpdateEntry {
    pub fn priority(&self) -> Option<Priority> {
        match self {
            Self::Regular(u) => Some(u.priority),
            Self::Custom(c) => c.priority,
        }
    }

    pub fn update_category(&self) -> Option<UpdateCategory> {
        match self {
            Self::Regular(u) => Some(u.update_category),
            Self::Custom(c) => c.update_category,
        }
    }
}

pub type UpdateRegistry = Registry<UpdateItem, CustomUpdate>;

impl UpdateRegistry {
    pub fn critical(&self) -> Vec<UpdateEntry> {
        self.by_priority(Priority::Critical)
    }

    pub fn by_priority(&self, priority: Priority) -> Vec<UpdateEntry> {
        self.all_with_custom()
            .into_iter()
            .filter(|e| e.priority() == Some(priority))
            .collect()
    }

    pub fn by_category(&self, category: UpdateCategory) -> Vec<UpdateEntry> {
        self.all_with_custom()
            .into_iter()
            .filter(|e| e.update_category() == Some(category))
            .collect()
    }

    /// The `count` most recent entries.
    pub fn latest(&self, count: usize) -> Vec<UpdateEntry> {
        let mut all = self.all_with_custom();
        all.truncate(count);
        all
    }
}

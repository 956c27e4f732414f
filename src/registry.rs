//! Content registries: regular and custom collections merged into one view.
//!
//! Each content kind keeps two collections:
//!
//! - **Regular** entries, fully data-driven and always trilingual, read from a
//!   [`ContentSource`] (a JSON file in production, an in-memory vector in tests).
//! - **Custom** entries, hand-authored overrides that point at a bespoke page.
//!
//! ## Merge
//!
//! [`Registry::all_with_custom`] builds the listing view:
//!
//! ```text
//! regular ─┬─ drop ids present in custom ─┐
//!          │                              ├─ concat ─ sort by date desc ─→ Vec<Entry>
//! custom ──┴──────────────────────────────┘
//! ```
//!
//! A custom entry replaces the regular entry with the same id entirely; there
//! is no field-level merge. If the regular source fails to load, the failure
//! is logged and the view degrades to the custom entries alone.
//!
//! Every query is a read-only projection over that merged view.

use crate::types::LocalizedText;
use chrono::NaiveDate;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_RELATED_LIMIT: usize = 3;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Content source unavailable: {0}")]
    Unavailable(String),
}

/// Fields every listable content entry exposes, regular or custom.
pub trait Listing {
    fn id(&self) -> &str;
    fn slug(&self) -> &str;
    fn date(&self) -> NaiveDate;
    fn is_featured(&self) -> bool;
    fn tags(&self) -> &[String];
    fn title(&self) -> &LocalizedText;
    fn description(&self) -> &LocalizedText;
    /// Grouping key used for relatedness: industry or update category.
    fn group(&self) -> Option<&str>;

    /// Bespoke page location, if the entry has one.
    fn url(&self) -> Option<&str> {
        None
    }

    /// Extra plain fields searched besides title, description and tags.
    fn search_terms(&self) -> Vec<&str> {
        Vec::new()
    }

    /// Case-insensitive substring match. `needle` must be lower-cased.
    fn matches(&self, needle: &str) -> bool {
        self.title().contains_lowercase(needle)
            || self.description().contains_lowercase(needle)
            || self.tags().iter().any(|t| t.to_lowercase().contains(needle))
            || self
                .search_terms()
                .iter()
                .any(|t| t.to_lowercase().contains(needle))
    }
}

/// One row of a merged view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Entry<R, C> {
    Regular(R),
    Custom(C),
}

impl<R, C> Entry<R, C> {
    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }

    pub fn as_custom(&self) -> Option<&C> {
        match self {
            Self::Regular(_) => None,
            Self::Custom(c) => Some(c),
        }
    }
}

impl<R: Listing, C: Listing> Listing for Entry<R, C> {
    fn id(&self) -> &str {
        match self {
            Self::Regular(r) => r.id(),
            Self::Custom(c) => c.id(),
        }
    }
    fn slug(&self) -> &str {
        match self {
            Self::Regular(r) => r.slug(),
            Self::Custom(c) => c.slug(),
        }
    }
    fn date(&self) -> NaiveDate {
        match self {
            Self::Regular(r) => r.date(),
            Self::Custom(c) => c.date(),
        }
    }
    fn is_featured(&self) -> bool {
        match self {
            Self::Regular(r) => r.is_featured(),
            Self::Custom(c) => c.is_featured(),
        }
    }
    fn tags(&self) -> &[String] {
        match self {
            Self::Regular(r) => r.tags(),
            Self::Custom(c) => c.tags(),
        }
    }
    fn title(&self) -> &LocalizedText {
        match self {
            Self::Regular(r) => r.title(),
            Self::Custom(c) => c.title(),
        }
    }
    fn description(&self) -> &LocalizedText {
        match self {
            Self::Regular(r) => r.description(),
            Self::Custom(c) => c.description(),
        }
    }
    fn group(&self) -> Option<&str> {
        match self {
            Self::Regular(r) => r.group(),
            Self::Custom(c) => c.group(),
        }
    }
    fn url(&self) -> Option<&str> {
        match self {
            Self::Regular(r) => r.url(),
            Self::Custom(c) => c.url(),
        }
    }
    fn search_terms(&self) -> Vec<&str> {
        match self {
            Self::Regular(r) => r.search_terms(),
            Self::Custom(c) => c.search_terms(),
        }
    }
}

// ============================================================================
// Sources
// ============================================================================

/// Where a registry's regular collection comes from.
pub trait ContentSource<T>: Send + Sync {
    fn load(&self) -> Result<Vec<T>, ContentError>;
}

/// An in-memory collection, cloned on every load.
#[derive(Debug, Clone, Default)]
pub struct StaticSource<T>(pub Vec<T>);

impl<T: Clone + Send + Sync> ContentSource<T> for StaticSource<T> {
    fn load(&self) -> Result<Vec<T>, ContentError> {
        Ok(self.0.clone())
    }
}

/// A JSON array on disk, read on every load.
#[derive(Debug, Clone)]
pub struct JsonFileSource<T> {
    path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonFileSource<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }
}

impl<T: DeserializeOwned> ContentSource<T> for JsonFileSource<T> {
    fn load(&self) -> Result<Vec<T>, ContentError> {
        let content = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Read an optional JSON array: a missing file is an empty collection.
pub fn load_optional_json<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, ContentError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

// ============================================================================
// Registry
// ============================================================================

/// Regular and custom entries of one content kind.
pub struct Registry<R, C> {
    regular: Box<dyn ContentSource<R>>,
    custom: Vec<C>,
}

impl<R, C> Registry<R, C>
where
    R: Listing + Clone + 'static,
    C: Listing + Clone,
{
    pub fn new(regular: impl ContentSource<R> + 'static, custom: Vec<C>) -> Self {
        Self {
            regular: Box::new(regular),
            custom,
        }
    }

    pub fn custom(&self) -> &[C] {
        &self.custom
    }

    /// Merged, de-duplicated view sorted newest first.
    ///
    /// Custom entries shadow regular entries with the same id. Ties in date
    /// keep concatenation order (regular survivors, then custom).
    pub fn all_with_custom(&self) -> Vec<Entry<R, C>> {
        let regular = match self.regular.load() {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!("Regular collection failed to load, listing custom entries only: {e}");
                Vec::new()
            }
        };

        let custom_ids: HashSet<&str> = self.custom.iter().map(|c| c.id()).collect();
        let mut merged: Vec<Entry<R, C>> = regular
            .into_iter()
            .filter(|r| !custom_ids.contains(r.id()))
            .map(Entry::Regular)
            .chain(self.custom.iter().cloned().map(Entry::Custom))
            .collect();

        merged.sort_by(|a, b| b.date().cmp(&a.date()));
        merged
    }

    pub fn featured(&self) -> Vec<Entry<R, C>> {
        self.all_with_custom()
            .into_iter()
            .filter(|e| e.is_featured())
            .collect()
    }

    /// Case-insensitive substring search over titles and descriptions in all
    /// locales, tags, and kind-specific search terms.
    pub fn search(&self, query: &str) -> Vec<Entry<R, C>> {
        let needle = query.trim().to_lowercase();
        self.all_with_custom()
            .into_iter()
            .filter(|e| e.matches(&needle))
            .collect()
    }

    /// Entries sharing a group or any tag with `id`, newest first.
    ///
    /// Unknown ids yield an empty list.
    pub fn related(&self, id: &str, limit: usize) -> Vec<Entry<R, C>> {
        related_entries(&self.all_with_custom(), id, limit)
    }

    pub fn find_by_id(&self, id: &str) -> Option<Entry<R, C>> {
        self.all_with_custom().into_iter().find(|e| e.id() == id)
    }

    pub fn find_by_slug(&self, slug: &str) -> Option<Entry<R, C>> {
        self.all_with_custom().into_iter().find(|e| e.slug() == slug)
    }

    /// Entries carrying `tag` exactly.
    pub fn by_tag(&self, tag: &str) -> Vec<Entry<R, C>> {
        self.all_with_custom()
            .into_iter()
            .filter(|e| e.tags().iter().any(|t| t == tag))
            .collect()
    }
}

/// [`Registry::related`] over an already merged view.
///
/// Lets callers that need relatedness for every entry load the view once.
pub fn related_entries<E: Listing + Clone>(all: &[E], id: &str, limit: usize) -> Vec<E> {
    let Some(reference) = all.iter().find(|e| e.id() == id) else {
        return Vec::new();
    };

    let mut related: Vec<E> = all
        .iter()
        .filter(|e| e.id() != id)
        .filter(|e| {
            let same_group = matches!(
                (e.group(), reference.group()),
                (Some(a), Some(b)) if a == b
            );
            same_group || e.tags().iter().any(|t| reference.tags().contains(t))
        })
        .cloned()
        .collect();

    related.sort_by(|a, b| b.date().cmp(&a.date()));
    related.truncate(limit);
    related
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case_study::{CaseStudy, CaseStudyRegistry, CustomCaseStudy};
    use crate::test_helpers::{case_study, custom_case_study};
    use crate::types::LocalizedText;
    use tempfile::TempDir;

    struct FailingSource;

    impl ContentSource<CaseStudy> for FailingSource {
        fn load(&self) -> Result<Vec<CaseStudy>, ContentError> {
            Err(ContentError::Unavailable("module failed to load".into()))
        }
    }

    fn ids<R: Listing, C: Listing>(entries: &[Entry<R, C>]) -> Vec<&str> {
        entries.iter().map(|e| e.id()).collect()
    }

    fn registry(regular: Vec<CaseStudy>, custom: Vec<CustomCaseStudy>) -> CaseStudyRegistry {
        Registry::new(StaticSource(regular), custom)
    }

    #[test]
    fn merge_sorts_newest_first() {
        let reg = registry(
            vec![case_study("old", "2023-01-01"), case_study("new", "2024-06-01")],
            vec![custom_case_study("mid", "2023-09-01")],
        );
        assert_eq!(ids(&reg.all_with_custom()), vec!["new", "mid", "old"]);
    }

    #[test]
    fn custom_entry_replaces_regular_with_same_id() {
        let custom = custom_case_study("packaging-innovation", "2022-01-01");
        let reg = registry(
            vec![
                case_study("packaging-innovation", "2024-01-01"),
                case_study("other", "2023-01-01"),
            ],
            vec![custom.clone()],
        );

        let all = reg.all_with_custom();
        let matching: Vec<_> = all
            .iter()
            .filter(|e| e.id() == "packaging-innovation")
            .collect();
        assert_eq!(matching, vec![&Entry::Custom(custom)]);
    }

    #[test]
    fn failed_load_degrades_to_custom_only() {
        let reg: CaseStudyRegistry = Registry::new(
            FailingSource,
            vec![
                custom_case_study("a", "2023-01-01"),
                custom_case_study("b", "2024-01-01"),
            ],
        );
        let all = reg.all_with_custom();
        assert_eq!(ids(&all), vec!["b", "a"]);
        assert!(all.iter().all(Entry::is_custom));
    }

    #[test]
    fn equal_dates_keep_concatenation_order() {
        let reg = registry(
            vec![case_study("r1", "2024-01-01"), case_study("r2", "2024-01-01")],
            vec![custom_case_study("c1", "2024-01-01")],
        );
        assert_eq!(ids(&reg.all_with_custom()), vec!["r1", "r2", "c1"]);
    }

    #[test]
    fn featured_filters_flag() {
        let mut a = case_study("a", "2024-01-01");
        a.featured = true;
        let mut c = custom_case_study("c", "2024-02-01");
        c.featured = true;
        let reg = registry(vec![a, case_study("b", "2024-01-02")], vec![c]);
        assert_eq!(ids(&reg.featured()), vec!["c", "a"]);
    }

    #[test]
    fn search_is_case_insensitive_across_locales() {
        let mut a = case_study("a", "2024-01-01");
        a.title = LocalizedText::new("Packaging", "Csomagolás", "Verpackung");
        let mut b = case_study("b", "2024-01-01");
        b.tags = vec!["Sustainability".to_string()];
        let reg = registry(vec![a, b], vec![]);

        assert_eq!(ids(&reg.search("VERPACK")), vec!["a"]);
        assert_eq!(ids(&reg.search("sustain")), vec!["b"]);
        assert!(reg.search("no-such-term").is_empty());
    }

    #[test]
    fn related_shares_group_or_tag() {
        let mut reference = case_study("ref", "2024-01-01");
        reference.industry = "Automotive".to_string();
        reference.tags = vec!["injection-molding".to_string()];

        let mut same_industry = case_study("industry", "2023-01-01");
        same_industry.industry = "Automotive".to_string();
        same_industry.tags = vec![];

        let mut same_tag = case_study("tag", "2024-03-01");
        same_tag.industry = "Medical".to_string();
        same_tag.tags = vec!["injection-molding".to_string()];

        let mut unrelated = case_study("none", "2024-05-01");
        unrelated.industry = "Food".to_string();
        unrelated.tags = vec!["packaging".to_string()];

        let reg = registry(vec![reference, same_industry, same_tag, unrelated], vec![]);
        assert_eq!(ids(&reg.related("ref", 3)), vec!["tag", "industry"]);
        assert_eq!(ids(&reg.related("ref", 1)), vec!["tag"]);
    }

    #[test]
    fn by_tag_spans_regular_and_custom() {
        let mut regular = case_study("regular", "2024-01-01");
        regular.tags = vec!["recycling".to_string(), "plastics".to_string()];
        let mut custom = custom_case_study("custom", "2024-03-01");
        custom.tags = vec!["recycling".to_string()];
        let untagged = custom_case_study("untagged", "2024-04-01");

        let reg = registry(
            vec![regular, case_study("other", "2024-02-01")],
            vec![custom, untagged],
        );
        assert_eq!(ids(&reg.by_tag("recycling")), vec!["custom", "regular"]);
        assert_eq!(ids(&reg.by_tag("plastics")), vec!["other", "regular"]);
        assert!(reg.by_tag("Recycling").is_empty());
    }

    #[test]
    fn related_entries_over_a_loaded_view() {
        let mut a = case_study("a", "2024-01-01");
        a.tags = vec!["x".to_string()];
        a.industry = "One".to_string();
        let mut b = case_study("b", "2024-02-01");
        b.tags = vec!["x".to_string()];
        b.industry = "Two".to_string();
        let mut c = case_study("c", "2024-03-01");
        c.tags = vec![];
        c.industry = "Three".to_string();

        let reg = registry(vec![a, b, c], vec![]);
        let all = reg.all_with_custom();
        assert_eq!(ids(&related_entries(&all, "a", 3)), vec!["b"]);
        assert_eq!(related_entries(&all, "a", 3), reg.related("a", 3));
        assert!(related_entries(&all, "missing", 3).is_empty());
    }

    #[test]
    fn related_unknown_id_is_empty() {
        let reg = registry(vec![case_study("a", "2024-01-01")], vec![]);
        assert!(reg.related("missing", DEFAULT_RELATED_LIMIT).is_empty());
    }

    #[test]
    fn lookups_return_none_on_miss() {
        let reg = registry(vec![case_study("a", "2024-01-01")], vec![]);
        assert!(reg.find_by_id("a").is_some());
        assert!(reg.find_by_id("b").is_none());
        assert!(reg.find_by_slug("a").is_some());
        assert!(reg.find_by_slug("nope").is_none());
    }

    #[test]
    fn find_by_id_prefers_custom() {
        let reg = registry(
            vec![case_study("a", "2024-01-01")],
            vec![custom_case_study("a", "2024-01-01")],
        );
        assert!(reg.find_by_id("a").unwrap().is_custom());
    }

    #[test]
    fn json_file_source_reads_array() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("case-studies.json");
        let items = vec![case_study("a", "2024-01-01")];
        std::fs::write(&path, serde_json::to_string(&items).unwrap()).unwrap();

        let source = JsonFileSource::<CaseStudy>::new(&path);
        assert_eq!(source.load().unwrap(), items);
    }

    #[test]
    fn json_file_source_missing_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let source = JsonFileSource::<CaseStudy>::new(tmp.path().join("missing.json"));
        assert!(matches!(source.load(), Err(ContentError::Io(_))));
    }

    #[test]
    fn load_optional_json_missing_is_empty() {
        let tmp = TempDir::new().unwrap();
        let items: Vec<CustomCaseStudy> =
            load_optional_json(&tmp.path().join("missing.json")).unwrap();
        assert!(items.is_empty());
    }
}

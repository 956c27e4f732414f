//! In-memory queries over a flat list of posts.
//!
//! [`PostCollection`] backs generic "resources" listings. It is independent
//! of the registries: it sees only single-locale [`Post`]s and never merges
//! custom entries. Every query is a pure function of the collection.
//!
//! Dates are compared as parsed calendar dates; a missing or unparseable
//! date counts as the epoch, and a missing read time counts as zero.

use crate::post::{Post, PostType};
use crate::types::Locale;
use chrono::{Duration, NaiveDate};
use icu_collator::{Collator, CollatorOptions, Strength};
use icu_locid::locale;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

pub const DEFAULT_RELATED_LIMIT: usize = 3;
pub const DEFAULT_POPULAR_TAGS_LIMIT: usize = 10;

/// Inclusive date bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

/// Criteria for [`PostCollection::filter_posts`]. Unset criteria match
/// everything; set criteria must all match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    pub category: Option<String>,
    pub post_type: Option<PostType>,
    /// Matches when the post carries at least one of these.
    pub tags: Vec<String>,
    pub date_range: Option<DateRange>,
    /// Exact author name.
    pub author: Option<String>,
}

impl PostFilter {
    pub fn matches(&self, post: &Post) -> bool {
        self.category.as_ref().is_none_or(|c| &post.category == c)
            && self.post_type.is_none_or(|t| post.post_type.known() == Some(t))
            && (self.tags.is_empty() || self.tags.iter().any(|t| post.has_tag(t)))
            && self
                .date_range
                .is_none_or(|range| range.contains(post.date_or_epoch()))
            && self.author.as_ref().is_none_or(|name| {
                post.author.as_ref().is_some_and(|a| &a.name == name)
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Date,
    Title,
    ReadTime,
    Category,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortOptions {
    pub field: SortField,
    pub direction: SortDirection,
    /// Collation used for [`SortField::Title`].
    pub locale: Locale,
}

/// Case-insensitive collator for titles in `locale`.
fn title_collator(locale: Locale) -> Option<Collator> {
    let mut options = CollatorOptions::new();
    options.strength = Some(Strength::Secondary);
    let tag = match locale {
        Locale::En => locale!("en"),
        Locale::Hu => locale!("hu"),
        Locale::De => locale!("de"),
    };
    match Collator::try_new(&tag.into(), options) {
        Ok(collator) => Some(collator),
        Err(e) => {
            tracing::warn!("No collation data for '{locale}', sorting titles by code point: {e}");
            None
        }
    }
}

fn compare_titles(collator: Option<&Collator>, a: &str, b: &str) -> Ordering {
    match collator {
        Some(collator) => collator.compare(a, b),
        None => a.to_lowercase().cmp(&b.to_lowercase()),
    }
}

/// Stable sort by one field. Titles use the collation of `options.locale`
/// and ignore case.
pub fn sort_posts<'a>(posts: impl IntoIterator<Item = &'a Post>, options: SortOptions) -> Vec<&'a Post> {
    let mut posts: Vec<&Post> = posts.into_iter().collect();
    let collator = match options.field {
        SortField::Title => title_collator(options.locale),
        _ => None,
    };
    let compare = |a: &&Post, b: &&Post| -> Ordering {
        match options.field {
            SortField::Date => a.date_or_epoch().cmp(&b.date_or_epoch()),
            SortField::Title => compare_titles(collator.as_ref(), &a.title, &b.title),
            SortField::ReadTime => a.read_time.unwrap_or(0).cmp(&b.read_time.unwrap_or(0)),
            SortField::Category => a.category.cmp(&b.category),
        }
    };
    match options.direction {
        SortDirection::Asc => posts.sort_by(compare),
        SortDirection::Desc => posts.sort_by(|a, b| compare(b, a)),
    }
    posts
}

/// The "worth promoting" heuristic: recent OR a medium read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeaturedRules {
    pub recent_days: u32,
    pub min_read_time: u32,
    pub max_read_time: u32,
}

impl Default for FeaturedRules {
    fn default() -> Self {
        Self {
            recent_days: 30,
            min_read_time: 5,
            max_read_time: 15,
        }
    }
}

impl FeaturedRules {
    pub fn qualifies(&self, post: &Post, today: NaiveDate) -> bool {
        let cutoff = today - Duration::days(i64::from(self.recent_days));
        let recent = post.date_or_epoch() >= cutoff;
        let medium_read = post
            .read_time
            .is_some_and(|m| (self.min_read_time..=self.max_read_time).contains(&m));
        recent || medium_read
    }
}

/// Aggregate counts over a collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total: usize,
    pub by_type: BTreeMap<String, usize>,
    pub by_category: BTreeMap<String, usize>,
    /// Mean read time rounded to the nearest minute; 0 for an empty collection.
    pub average_read_time: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostCollection {
    posts: Vec<Post>,
}

impl From<Vec<Post>> for PostCollection {
    fn from(posts: Vec<Post>) -> Self {
        Self { posts }
    }
}

impl PostCollection {
    pub fn new(posts: Vec<Post>) -> Self {
        Self { posts }
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn find_by_slug(&self, slug: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.slug == slug)
    }

    pub fn filter_posts(&self, filter: &PostFilter) -> Vec<&Post> {
        self.posts.iter().filter(|p| filter.matches(p)).collect()
    }

    pub fn sort_posts(&self, options: SortOptions) -> Vec<&Post> {
        sort_posts(&self.posts, options)
    }

    pub fn featured_posts_at(&self, today: NaiveDate, rules: &FeaturedRules) -> Vec<&Post> {
        self.posts
            .iter()
            .filter(|p| rules.qualifies(p, today))
            .collect()
    }

    /// Featured posts as of the local date, with the stock rules.
    pub fn featured_posts(&self) -> Vec<&Post> {
        self.featured_posts_at(chrono::Local::now().date_naive(), &FeaturedRules::default())
    }

    /// Posts scored by similarity to `post`: +2 for the same category, +1 per
    /// shared tag. A post with no tags gets same-category posts instead.
    /// `post` itself is never included.
    pub fn related_posts(&self, post: &Post, limit: usize) -> Vec<&Post> {
        let others = self.posts.iter().filter(|p| p.slug != post.slug);

        if post.tags.is_empty() {
            return others
                .filter(|p| p.category == post.category)
                .take(limit)
                .collect();
        }

        let mut scored: Vec<(usize, &Post)> = others
            .map(|p| {
                let category = if p.category == post.category { 2 } else { 0 };
                let shared = p.tags.iter().filter(|t| post.has_tag(t)).count();
                (category + shared, p)
            })
            .filter(|(score, _)| *score > 0)
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.into_iter().take(limit).map(|(_, p)| p).collect()
    }

    /// Case-insensitive substring match on title, summary and tags.
    pub fn search_posts(&self, query: &str) -> Vec<&Post> {
        let needle = query.to_lowercase();
        self.posts
            .iter()
            .filter(|p| {
                p.title.to_lowercase().contains(&needle)
                    || p.summary
                        .as_deref()
                        .is_some_and(|s| s.to_lowercase().contains(&needle))
                    || p.tags.iter().any(|t| t.to_lowercase().contains(&needle))
            })
            .collect()
    }

    pub fn statistics(&self) -> Statistics {
        let mut stats = Statistics {
            total: self.posts.len(),
            ..Default::default()
        };
        for post in &self.posts {
            *stats
                .by_type
                .entry(post.post_type.as_str().to_string())
                .or_default() += 1;
            *stats.by_category.entry(post.category.clone()).or_default() += 1;
        }
        if !self.posts.is_empty() {
            let sum: u64 = self
                .posts
                .iter()
                .map(|p| u64::from(p.read_time.unwrap_or(0)))
                .sum();
            stats.average_read_time = (sum as f64 / self.posts.len() as f64).round() as u32;
        }
        stats
    }

    /// Tags by descending frequency; ties keep first-seen order.
    pub fn popular_tags(&self, limit: usize) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();
        for tag in self.posts.iter().flat_map(|p| &p.tags) {
            match index.get(tag.as_str()) {
                Some(&i) => counts[i].1 += 1,
                None => {
                    index.insert(tag, counts.len());
                    counts.push((tag.clone(), 1));
                }
            }
        }
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts.truncate(limit);
        counts
    }
}

//! CLI output formatting for all commands.
//!
//! # Entities First
//!
//! Every post, case study and update is listed by position and title, with
//! its type or priority in brackets. Where it came from (source file, custom
//! URL, summary) follows on indented lines.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Posts
//! 001 Sustainable Injection Molding [article]
//!     Source: posts/sustainable.json
//!
//! Case studies (2, 1 custom)
//! 001 Packaging Innovation
//!     Custom: /case-studies/custom/packaging-innovation
//! 002 Mould Tooling Upgrade
//!
//! Updates (1)
//! 001 Cooling Line 2.0 [critical]
//!
//! Config
//!     config.toml
//! ```
//!
//! ## Build
//!
//! ```text
//! Home → index.html
//! Resources
//!     001 → resources/mould-care.html
//! Case studies
//!     001 → en/case-studies/mould-tooling-upgrade.html
//!
//! Generated 4 resource pages, 3 case study pages
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::case_study::{CaseStudy, CustomCaseStudy};
use crate::collection::Statistics;
use crate::config::CONFIG_FILE;
use crate::generate::GeneratedSite;
use crate::post::Post;
use crate::registry::{Entry, Listing};
use crate::scan::Manifest;
use crate::types::Locale;
use crate::update::{Priority, UpdateEntry};
use std::path::Path;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// 1-based position, zero-padded to three digits.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Four spaces per level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Index + title, with an optional bracketed detail.
///
/// ```text
/// 001 Mould care [tutorial]
/// 002 Packaging Innovation
/// ```
fn entity_header(index: usize, title: &str, detail: Option<&str>) -> String {
    match detail {
        Some(d) => format!("{} {} [{}]", format_index(index), title, d),
        None => format!("{} {}", format_index(index), title),
    }
}

/// At most `max` characters, with `...` when cut.
fn truncate_desc(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let head: String = text.chars().take(max).collect();
        format!("{}...", head)
    }
}

fn plural(n: usize, one: &str, many: &str) -> String {
    format!("{} {}", n, if n == 1 { one } else { many })
}

// ============================================================================
// Check
// ============================================================================

fn post_lines(index: usize, post: &Post, source: Option<&Path>) -> Vec<String> {
    let mut lines = vec![entity_header(index, &post.title, Some(post.post_type.as_str()))];
    if let Some(source) = source {
        lines.push(format!("{}Source: {}", indent(1), source.display()));
    }
    lines
}

fn case_study_lines(index: usize, entry: &Entry<CaseStudy, CustomCaseStudy>, locale: Locale) -> Vec<String> {
    let mut lines = vec![entity_header(
        index,
        entry.title().get(locale),
        entry.is_featured().then_some("featured"),
    )];
    if let Some(custom) = entry.as_custom() {
        lines.push(format!("{}Custom: {}", indent(1), custom.custom_url));
    }
    lines
}

fn update_lines(index: usize, entry: &UpdateEntry, locale: Locale) -> Vec<String> {
    let priority = entry.priority().map(Priority::as_str);
    let mut lines = vec![entity_header(index, entry.title().get(locale), priority)];
    if let Some(url) = entry.url() {
        lines.push(format!("{}Custom: {}", indent(1), url));
    }
    lines
}

pub fn format_check_output(manifest: &Manifest) -> Vec<String> {
    let locale = manifest.locale;
    let mut lines = Vec::new();

    lines.push("Posts".to_string());
    for (i, post) in manifest.posts.posts().iter().enumerate() {
        let source = manifest.post_sources.get(&post.slug).map(|p| p.as_path());
        lines.extend(post_lines(i + 1, post, source));
    }

    let studies = manifest.case_studies.all_with_custom();
    let custom = studies.iter().filter(|e| e.is_custom()).count();
    lines.push(String::new());
    lines.push(format!("Case studies ({}, {} custom)", studies.len(), custom));
    for (i, entry) in studies.iter().enumerate() {
        lines.extend(case_study_lines(i + 1, entry, locale));
    }

    let updates = manifest.updates.all_with_custom();
    lines.push(String::new());
    lines.push(format!("Updates ({})", updates.len()));
    for (i, entry) in updates.iter().enumerate() {
        lines.extend(update_lines(i + 1, entry, locale));
    }

    lines.push(String::new());
    lines.push("Config".to_string());
    if manifest.root.join(CONFIG_FILE).exists() {
        lines.push(format!("{}{}", indent(1), CONFIG_FILE));
    } else {
        lines.push(format!("{}(defaults)", indent(1)));
    }
    lines
}

pub fn print_check_output(manifest: &Manifest) {
    for line in format_check_output(manifest) {
        println!("{}", line);
    }
}

// ============================================================================
// Build
// ============================================================================

pub fn format_build_output(site: &GeneratedSite) -> Vec<String> {
    let mut lines = vec![format!("Home → {}", site.index.display())];

    if !site.resource_pages.is_empty() {
        lines.push("Resources".to_string());
        for (i, path) in site.resource_pages.iter().enumerate() {
            lines.push(format!("{}{} → {}", indent(1), format_index(i + 1), path.display()));
        }
    }
    if !site.case_study_pages.is_empty() {
        lines.push("Case studies".to_string());
        for (i, path) in site.case_study_pages.iter().enumerate() {
            lines.push(format!("{}{} → {}", indent(1), format_index(i + 1), path.display()));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Generated {}, {}",
        plural(site.resource_pages.len(), "resource page", "resource pages"),
        plural(site.case_study_pages.len(), "case study page", "case study pages"),
    ));
    lines
}

pub fn print_build_output(site: &GeneratedSite) {
    for line in format_build_output(site) {
        println!("{}", line);
    }
}

// ============================================================================
// Stats
// ============================================================================

pub fn format_stats_output(stats: &Statistics, popular: &[(String, usize)]) -> Vec<String> {
    let mut lines = vec![
        format!("Posts: {}", stats.total),
        format!("Average read time: {} min", stats.average_read_time),
    ];

    lines.push("By type".to_string());
    for (post_type, count) in &stats.by_type {
        lines.push(format!("{}{}: {}", indent(1), post_type, count));
    }
    lines.push("By category".to_string());
    for (category, count) in &stats.by_category {
        lines.push(format!("{}{}: {}", indent(1), category, count));
    }
    if !popular.is_empty() {
        lines.push("Popular tags".to_string());
        for (i, (tag, count)) in popular.iter().enumerate() {
            lines.push(format!("{}{} {} ({})", indent(1), format_index(i + 1), tag, count));
        }
    }
    lines
}

pub fn print_stats_output(stats: &Statistics, popular: &[(String, usize)]) {
    for line in format_stats_output(stats, popular) {
        println!("{}", line);
    }
}

// ============================================================================
// Search
// ============================================================================

/// Search hits across posts and both registries.
pub struct SearchResults<'a> {
    pub query: &'a str,
    pub locale: Locale,
    pub posts: Vec<&'a Post>,
    pub case_studies: Vec<Entry<CaseStudy, CustomCaseStudy>>,
    pub updates: Vec<UpdateEntry>,
}

impl SearchResults<'_> {
    pub fn total(&self) -> usize {
        self.posts.len() + self.case_studies.len() + self.updates.len()
    }
}

pub fn format_search_output(results: &SearchResults<'_>) -> Vec<String> {
    let locale = results.locale;
    let mut lines = vec![format!(
        "{} for \"{}\"",
        plural(results.total(), "result", "results"),
        results.query
    )];

    if !results.posts.is_empty() {
        lines.push(String::new());
        lines.push("Posts".to_string());
        for (i, post) in results.posts.iter().enumerate() {
            lines.push(entity_header(i + 1, &post.title, Some(post.post_type.as_str())));
            if let Some(summary) = &post.summary {
                lines.push(format!("{}{}", indent(1), truncate_desc(summary, 80)));
            }
        }
    }
    if !results.case_studies.is_empty() {
        lines.push(String::new());
        lines.push("Case studies".to_string());
        for (i, entry) in results.case_studies.iter().enumerate() {
            lines.extend(case_study_lines(i + 1, entry, locale));
        }
    }
    if !results.updates.is_empty() {
        lines.push(String::new());
        lines.push("Updates".to_string());
        for (i, entry) in results.updates.iter().enumerate() {
            lines.extend(update_lines(i + 1, entry, locale));
        }
    }
    lines
}

pub fn print_search_output(results: &SearchResults<'_>) {
    for line in format_search_output(results) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{custom_case_study, custom_update, post, setup_fixtures, update_item};
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    #[test]
    fn format_index_zero_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn entity_header_with_detail() {
        assert_eq!(entity_header(1, "Mould care", Some("tutorial")), "001 Mould care [tutorial]");
        assert_eq!(entity_header(2, "Plain", None), "002 Plain");
    }

    #[test]
    fn truncate_desc_respects_char_boundaries() {
        assert_eq!(truncate_desc("short", 10), "short");
        assert_eq!(truncate_desc("fröccsöntés", 5), "fröcc...");
    }

    #[test]
    fn post_lines_include_source() {
        let p = post("a", "Alpha", "articles", &[]);
        let lines = post_lines(1, &p, Some(Path::new("posts/a.json")));
        assert_eq!(lines, vec!["001 Alpha [article]", "    Source: posts/a.json"]);
    }

    #[test]
    fn custom_entries_show_their_url() {
        let entry = Entry::Custom(custom_case_study("x", "2024-01-01"));
        let lines = case_study_lines(1, &entry, Locale::En);
        assert_eq!(lines[1], "    Custom: /case-studies/custom/x");

        let update: UpdateEntry = Entry::Custom(custom_update("u", "2024-01-01"));
        let lines = update_lines(1, &update, Locale::En);
        assert_eq!(lines[0], "001 Custom update u");
        assert_eq!(lines[1], "    Custom: /updates/custom/u");
    }

    #[test]
    fn update_lines_show_priority() {
        let update: UpdateEntry = Entry::Regular(update_item("u", "2024-01-01", Priority::Critical));
        assert_eq!(update_lines(1, &update, Locale::En)[0], "001 Update u [critical]");
    }

    #[test]
    fn check_output_lists_every_section() {
        let tmp = setup_fixtures();
        let manifest = crate::scan::scan(tmp.path(), None).unwrap();
        let lines = format_check_output(&manifest);
        assert_eq!(lines[0], "Posts");
        assert!(lines.iter().any(|l| l.starts_with("Case studies (")));
        assert!(lines.iter().any(|l| l.starts_with("Updates (")));
        assert!(lines.iter().any(|l| l.contains("Source: posts")));
        assert_eq!(lines.last().unwrap(), "    config.toml");
    }

    #[test]
    fn build_output_counts_pages() {
        let site = GeneratedSite {
            resource_pages: vec![PathBuf::from("resources/a.html")],
            case_study_pages: vec![
                PathBuf::from("en/case-studies/x.html"),
                PathBuf::from("hu/case-studies/x.html"),
            ],
            index: PathBuf::from("index.html"),
        };
        let lines = format_build_output(&site);
        assert_eq!(lines[0], "Home → index.html");
        assert!(lines.contains(&"    001 → resources/a.html".to_string()));
        assert_eq!(
            lines.last().unwrap(),
            "Generated 1 resource page, 2 case study pages"
        );
    }

    #[test]
    fn stats_output_lists_counts_and_tags() {
        let stats = Statistics {
            total: 3,
            by_type: BTreeMap::from([("article".to_string(), 2), ("video".to_string(), 1)]),
            by_category: BTreeMap::from([("articles".to_string(), 3)]),
            average_read_time: 6,
        };
        let lines = format_stats_output(&stats, &[("plastics".to_string(), 2)]);
        assert_eq!(lines[0], "Posts: 3");
        assert_eq!(lines[1], "Average read time: 6 min");
        assert!(lines.contains(&"    video: 1".to_string()));
        assert_eq!(lines.last().unwrap(), "    001 plastics (2)");
    }

    #[test]
    fn search_output_groups_results() {
        let p = post("a", "Sustainability basics", "articles", &[]);
        let results = SearchResults {
            query: "sustain",
            locale: Locale::En,
            posts: vec![&p],
            case_studies: vec![],
            updates: vec![],
        };
        let lines = format_search_output(&results);
        assert_eq!(lines[0], "1 result for \"sustain\"");
        assert!(lines.contains(&"001 Sustainability basics [article]".to_string()));
        assert!(!lines.contains(&"Case studies".to_string()));
    }
}

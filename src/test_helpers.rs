//! Shared test utilities for the flair-content test suite.
//!
//! Provides fixture-directory setup plus builders for canonical entities,
//! so tests only spell out the fields they care about.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let mut study = case_study("packaging-innovation", "2024-05-01");
//! study.featured = true;
//!
//! let posts = vec![
//!     post("a", "Sustainability report", "articles", &["sustainability"]),
//!     post("b", "Mould maintenance", "tutorials", &[]),
//! ];
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::case_study::{CaseStudy, CaseStudyResults, Client, CustomCaseStudy, Metric, Testimonial};
use crate::post::{ArticleContent, Post, PostContent};
use crate::types::{Author, LocalizedText};
use crate::update::{ChangeType, CustomUpdate, Priority, UpdateCategory, UpdateItem};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Entity builders
// =========================================================================

fn date(iso: &str) -> chrono::NaiveDate {
    chrono::NaiveDate::parse_from_str(iso, "%Y-%m-%d")
        .unwrap_or_else(|e| panic!("bad fixture date '{iso}': {e}"))
}

/// The same text in all three locales.
pub fn uniform_text(text: impl Into<String>) -> LocalizedText {
    let text = text.into();
    LocalizedText::new(text.clone(), text.clone(), text)
}

pub fn author() -> Author {
    Author {
        id: "flair-team".to_string(),
        name: "Flair-Plastic Team".to_string(),
        role: LocalizedText::new("Engineering", "Mérnökség", "Technik"),
        avatar: Some("/images/team.jpg".to_string()),
    }
}

/// A complete regular case study with trilingual text derived from `id`.
pub fn case_study(id: &str, iso_date: &str) -> CaseStudy {
    CaseStudy {
        id: id.to_string(),
        slug: id.to_string(),
        title: LocalizedText::new(
            format!("Case {id}"),
            format!("Esettanulmány {id}"),
            format!("Fallstudie {id}"),
        ),
        description: LocalizedText::new("Description", "Leírás", "Beschreibung"),
        content: LocalizedText::new("Body", "Törzs", "Inhalt"),
        challenge: LocalizedText::new("Challenge", "Kihívás", "Herausforderung"),
        solution: LocalizedText::new("Solution", "Megoldás", "Lösung"),
        image: format!("/images/{id}.jpg"),
        thumbnail_image: None,
        date: date(iso_date),
        updated_at: None,
        author: author(),
        read_time: 6,
        tags: vec!["plastics".to_string()],
        featured: false,
        custom_url: None,
        client: Client {
            name: "Acme".to_string(),
            industry: "Packaging".to_string(),
            size: "Enterprise".to_string(),
        },
        results: CaseStudyResults {
            metrics: vec![Metric {
                label: LocalizedText::new("Scrap rate", "Selejtarány", "Ausschussquote"),
                value: "-35%".to_string(),
                improvement: Some("35%".to_string()),
            }],
            testimonial: Some(Testimonial {
                quote: uniform_text("Great partner."),
                author: "J. Doe".to_string(),
                position: "COO".to_string(),
            }),
        },
        industry: "Packaging".to_string(),
        project_duration: "6 months".to_string(),
        technologies: vec!["Injection molding".to_string()],
    }
}

pub fn custom_case_study(id: &str, iso_date: &str) -> CustomCaseStudy {
    CustomCaseStudy {
        id: id.to_string(),
        slug: id.to_string(),
        custom_url: format!("/case-studies/custom/{id}"),
        title: uniform_text(format!("Custom {id}")),
        description: uniform_text("Bespoke page"),
        date: date(iso_date),
        image: None,
        author: None,
        read_time: None,
        tags: Vec::new(),
        featured: false,
        client: None,
        industry: None,
    }
}

pub fn update_item(id: &str, iso_date: &str, priority: Priority) -> UpdateItem {
    UpdateItem {
        id: id.to_string(),
        slug: id.to_string(),
        title: LocalizedText::new(
            format!("Update {id}"),
            format!("Frissítés {id}"),
            format!("Aktualisierung {id}"),
        ),
        description: LocalizedText::new("What changed", "Mi változott", "Was sich geändert hat"),
        content: uniform_text("Details"),
        image: format!("/images/updates/{id}.jpg"),
        thumbnail_image: None,
        date: date(iso_date),
        updated_at: None,
        author: author(),
        read_time: 2,
        tags: vec!["release".to_string()],
        featured: false,
        custom_url: None,
        update_category: UpdateCategory::FeatureRelease,
        version: "1.0.0".to_string(),
        priority,
        affected_products: vec!["Moulding line".to_string()],
        change_type: ChangeType::NewFeature,
    }
}

pub fn custom_update(id: &str, iso_date: &str) -> CustomUpdate {
    CustomUpdate {
        id: id.to_string(),
        slug: id.to_string(),
        custom_url: format!("/updates/custom/{id}"),
        title: uniform_text(format!("Custom update {id}")),
        description: uniform_text("Bespoke announcement"),
        date: date(iso_date),
        image: None,
        tags: Vec::new(),
        featured: false,
        update_category: None,
        version: None,
        priority: None,
        change_type: None,
        affected_products: Vec::new(),
    }
}

/// An article post with the given slug, title, category and tags.
pub fn post(slug: &str, title: &str, category: &str, tags: &[&str]) -> Post {
    let mut post = Post::new(
        slug,
        title,
        category,
        PostContent::Article(ArticleContent::default()),
    );
    post.tags = tags.iter().map(|t| t.to_string()).collect();
    post
}

// =========================================================================
// Lookups (panic with the available slugs on a miss)
// =========================================================================

/// Find a post by slug. Panics if not found.
pub fn find_post<'a>(posts: &'a [Post], slug: &str) -> &'a Post {
    posts.iter().find(|p| p.slug == slug).unwrap_or_else(|| {
        let slugs: Vec<&str> = posts.iter().map(|p| p.slug.as_str()).collect();
        panic!("post '{slug}' not found. Available: {slugs:?}")
    })
}

/// Slugs in collection order.
pub fn slugs<'a>(posts: impl IntoIterator<Item = &'a Post>) -> Vec<&'a str> {
    posts.into_iter().map(|p| p.slug.as_str()).collect()
}

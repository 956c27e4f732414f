//! HTML site generation.
//!
//! Stage 2 of the build. Takes a scanned [`Manifest`] and writes a static
//! site: one page per resource post, one page per regular case study in
//! every locale, and an index linking everything.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html                         # Resources, case studies, updates
//! ├── resources/
//! │   └── {slug}.html                    # Resource posts (scan locale)
//! ├── en/case-studies/{slug}.html        # Regular case studies, per locale
//! ├── hu/case-studies/{slug}.html
//! └── de/case-studies/{slug}.html
//! ```
//!
//! Custom case studies and updates have bespoke pages elsewhere; the index
//! links them to their `customUrl`.
//!
//! ## Rendering
//!
//! Page bodies come from [`PostTemplateFactory`]. Pages are rendered in
//! parallel with rayon and written once all of them succeed. The stylesheet
//! in `static/style.css` is embedded at compile time and inlined.

use crate::case_study::{CaseStudy, CustomCaseStudy};
use crate::collection::{SortOptions, sort_posts};
use crate::post::Post;
use crate::registry::{Entry, Listing, related_entries};
use crate::scan::Manifest;
use crate::template::PostTemplateFactory;
use crate::types::Locale;
use crate::update::Priority;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Output directory {0} is inside the content directory")]
    OutputInsideContent(PathBuf),
}

const CSS: &str = include_str!("../static/style.css");

pub const RESOURCES_DIR: &str = "resources";

/// What a generate run wrote, relative to the output directory.
#[derive(Debug, Default)]
pub struct GeneratedSite {
    pub resource_pages: Vec<PathBuf>,
    pub case_study_pages: Vec<PathBuf>,
    pub index: PathBuf,
}

impl GeneratedSite {
    pub fn page_count(&self) -> usize {
        self.resource_pages.len() + self.case_study_pages.len() + 1
    }
}

/// A rendered page waiting to be written.
struct Page {
    path: PathBuf,
    html: String,
}

pub fn generate(manifest: &Manifest, output_dir: &Path) -> Result<GeneratedSite, GenerateError> {
    fs::create_dir_all(output_dir)?;
    if let (Ok(out), Ok(root)) = (output_dir.canonicalize(), manifest.root.canonicalize()) {
        if out.starts_with(&root) {
            return Err(GenerateError::OutputInsideContent(output_dir.to_path_buf()));
        }
    }

    let factory = PostTemplateFactory::new(manifest.locale);
    let related_limit = manifest.config.listing.related_limit;

    let resource_pages: Vec<Page> = manifest
        .posts
        .posts()
        .par_iter()
        .map(|post| {
            let related = manifest.posts.related_posts(post, related_limit);
            Page {
                path: Path::new(RESOURCES_DIR).join(format!("{}.html", post.slug)),
                html: render_resource_page(&factory, post, &related).into_string(),
            }
        })
        .collect();

    // One load of the merged view serves every page and the index.
    let all_studies = manifest.case_studies.all_with_custom();
    let studies: Vec<&CaseStudy> = all_studies
        .iter()
        .filter_map(|e| match e {
            Entry::Regular(study) => Some(study),
            Entry::Custom(_) => None,
        })
        .collect();

    let jobs: Vec<(&CaseStudy, Locale)> = studies
        .iter()
        .flat_map(|&s| Locale::ALL.into_iter().map(move |l| (s, l)))
        .collect();
    let case_study_pages: Vec<Page> = jobs
        .par_iter()
        .map(|&(study, locale)| {
            let related = related_entries(&all_studies, &study.id, related_limit);
            Page {
                path: Path::new(locale.as_str())
                    .join("case-studies")
                    .join(format!("{}.html", study.slug)),
                html: render_case_study_page(study, locale, &related).into_string(),
            }
        })
        .collect();

    let index = Page {
        path: PathBuf::from("index.html"),
        html: render_index(manifest, &all_studies).into_string(),
    };

    let mut site = GeneratedSite {
        index: index.path.clone(),
        ..Default::default()
    };
    for page in &resource_pages {
        write_page(output_dir, page)?;
        site.resource_pages.push(page.path.clone());
    }
    for page in &case_study_pages {
        write_page(output_dir, page)?;
        site.case_study_pages.push(page.path.clone());
    }
    write_page(output_dir, &index)?;
    Ok(site)
}

fn write_page(output_dir: &Path, page: &Page) -> std::io::Result<()> {
    let path = output_dir.join(&page.path);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, &page.html)
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(title: &str, locale: Locale, home: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang=(locale.as_str()) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " · Flair-Plastic" }
                style { (PreEscaped(CSS)) }
            }
            body {
                header.site-header {
                    a.home href=(home) { "Flair-Plastic" }
                }
                main { (content) }
            }
        }
    }
}

fn related_list(heading: &str, links: &[(String, String)]) -> Markup {
    html! {
        @if !links.is_empty() {
            aside.related {
                h2 { (heading) }
                ul {
                    @for (href, title) in links {
                        li { a href=(href) { (title) } }
                    }
                }
            }
        }
    }
}

fn related_heading(locale: Locale) -> &'static str {
    match locale {
        Locale::En => "Related",
        Locale::Hu => "Kapcsolódó",
        Locale::De => "Verwandt",
    }
}

fn render_resource_page(factory: &PostTemplateFactory, post: &Post, related: &[&Post]) -> Markup {
    let links: Vec<(String, String)> = related
        .iter()
        .map(|p| (format!("{}.html", p.slug), p.title.clone()))
        .collect();
    let content = html! {
        (factory.render(post))
        (related_list(related_heading(factory.locale()), &links))
    };
    base_document(&post.title, factory.locale(), "../index.html", content)
}

/// Link target for a case-study entry from a page inside
/// `{locale}/case-studies/`.
fn sibling_case_study_href(entry: &Entry<CaseStudy, CustomCaseStudy>) -> String {
    match entry.url() {
        Some(url) => url.to_string(),
        None => format!("{}.html", entry.slug()),
    }
}

fn render_case_study_page(
    study: &CaseStudy,
    locale: Locale,
    related: &[Entry<CaseStudy, CustomCaseStudy>],
) -> Markup {
    let post = study.to_post(locale);
    let links: Vec<(String, String)> = related
        .iter()
        .map(|e| (sibling_case_study_href(e), e.title().get(locale).to_string()))
        .collect();
    let factory = PostTemplateFactory::new(locale);
    let content = html! {
        (factory.render(&post))
        (related_list(related_heading(locale), &links))
    };
    base_document(&post.title, locale, "../../index.html", content)
}

fn render_index(manifest: &Manifest, studies: &[Entry<CaseStudy, CustomCaseStudy>]) -> Markup {
    let locale = manifest.locale;
    let posts = sort_posts(
        manifest.posts.posts(),
        SortOptions {
            locale,
            ..Default::default()
        },
    );
    let featured = manifest
        .posts
        .featured_posts_at(chrono::Local::now().date_naive(), &manifest.config.featured.rules());
    let updates = manifest.updates.all_with_custom();

    fn post_href(p: &Post) -> String {
        format!("{RESOURCES_DIR}/{}.html", p.slug)
    }

    let content = html! {
        @if !featured.is_empty() {
            section.featured {
                h2 { "Featured" }
                ul.card-list {
                    @for post in &featured {
                        li { a href=(post_href(post)) { (post.title) } }
                    }
                }
            }
        }
        section.resources {
            h2 { "Resources" }
            ul.card-list {
                @for post in &posts {
                    li.card data-type=(post.post_type.as_str()) {
                        a href=(post_href(post)) { (post.title) }
                        @if let Some(summary) = &post.summary {
                            p { (summary) }
                        }
                    }
                }
            }
        }
        section.case-studies {
            h2 { "Case Studies" }
            ul.card-list {
                @for entry in studies {
                    @let href = match entry.url() {
                        Some(url) => url.to_string(),
                        None => format!("{}/case-studies/{}.html", locale, entry.slug()),
                    };
                    li.card.custom[entry.is_custom()] {
                        a href=(href) { (entry.title().get(locale)) }
                        p { (entry.description().get(locale)) }
                    }
                }
            }
        }
        section.updates {
            h2 { "Updates" }
            ul.card-list {
                @for entry in &updates {
                    li.card.critical[entry.priority() == Some(Priority::Critical)] {
                        @let date = entry.date().to_string();
                        time datetime=(date) { (date) }
                        " "
                        @if let Some(url) = entry.url() {
                            a href=(url) { (entry.title().get(locale)) }
                        } @else {
                            strong { (entry.title().get(locale)) }
                        }
                        p { (entry.description().get(locale)) }
                    }
                }
            }
        }
    };
    base_document("Resources", locale, "index.html", content)
}

// ============================================================================
// Tests
// ============================================================================

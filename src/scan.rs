//! Content directory scanning.
//!
//! Stage 1 of the build. Reads a content directory into a [`Manifest`]: the
//! config, every legacy post normalized to a canonical [`Post`], and the two
//! registries wired to their JSON files.
//!
//! ## Directory Structure
//!
//! ```text
//! content/                         # Content root
//! ├── config.toml                  # Configuration (optional)
//! ├── case-studies.json            # Regular case studies
//! ├── case-studies.custom.json     # Custom case studies (optional)
//! ├── updates.json                 # Regular updates
//! ├── updates.custom.json          # Custom updates (optional)
//! └── posts/                       # Legacy records, any depth
//!     ├── mould-care.json          # One record...
//!     └── 2023/
//!         └── archive.json         # ...or an array of records
//! ```
//!
//! ## Loading Rules
//!
//! - Regular collections are read lazily through a [`JsonFileSource`]. A
//!   missing or malformed file does not fail the scan; the registry lists
//!   custom entries only and logs a warning.
//! - A missing custom file is an empty collection. A malformed one is an error.
//! - Every record under `posts/` is converted with
//!   [`convert_legacy_post`]; conversion never fails, but unreadable JSON does.
//! - Two posts may not share a slug.

use crate::case_study::{CaseStudyRegistry, CustomCaseStudy};
use crate::collection::PostCollection;
use crate::config::{self, ContentConfig};
use crate::legacy::{ConvertOptions, LegacyRecord, convert_legacy_post};
use crate::post::Post;
use crate::registry::{ContentError, JsonFileSource, load_optional_json};
use crate::types::Locale;
use crate::update::{CustomUpdate, UpdateRegistry};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

pub const CASE_STUDIES_FILE: &str = "case-studies.json";
pub const CUSTOM_CASE_STUDIES_FILE: &str = "case-studies.custom.json";
pub const UPDATES_FILE: &str = "updates.json";
pub const CUSTOM_UPDATES_FILE: &str = "updates.custom.json";
pub const POSTS_DIR: &str = "posts";

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Invalid JSON in {path}: {source}")]
    InvalidPost {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Could not load custom collection {path}: {source}")]
    CustomCollection { path: PathBuf, source: ContentError },
    #[error("Duplicate post slug '{0}' in {1}")]
    DuplicateSlug(String, PathBuf),
}

/// Everything a build needs, loaded once.
pub struct Manifest {
    pub root: PathBuf,
    pub config: ContentConfig,
    /// Locale the legacy posts were resolved to.
    pub locale: Locale,
    pub posts: PostCollection,
    /// Source file of each post, relative to the content root, by slug.
    pub post_sources: HashMap<String, PathBuf>,
    pub case_studies: CaseStudyRegistry,
    pub updates: UpdateRegistry,
}

/// Scan `root`. Legacy posts resolve to `locale`, or to the configured
/// default locale when `None`.
pub fn scan(root: &Path, locale: Option<Locale>) -> Result<Manifest, ScanError> {
    let config = config::load_config(root)?;
    let locale = locale.unwrap_or(config.site.default_locale);
    tracing::debug!(root = %root.display(), %locale, "scanning content");

    let opts = ConvertOptions::new(locale);
    let (posts, post_sources) = scan_posts(root, &opts)?;

    let custom_case_studies: Vec<CustomCaseStudy> =
        load_custom(&root.join(CUSTOM_CASE_STUDIES_FILE))?;
    let custom_updates: Vec<CustomUpdate> = load_custom(&root.join(CUSTOM_UPDATES_FILE))?;
    tracing::debug!(
        custom_case_studies = custom_case_studies.len(),
        custom_updates = custom_updates.len(),
        "loaded custom collections"
    );

    Ok(Manifest {
        root: root.to_path_buf(),
        config,
        locale,
        posts: PostCollection::new(posts),
        post_sources,
        case_studies: CaseStudyRegistry::new(
            JsonFileSource::new(root.join(CASE_STUDIES_FILE)),
            custom_case_studies,
        ),
        updates: UpdateRegistry::new(
            JsonFileSource::new(root.join(UPDATES_FILE)),
            custom_updates,
        ),
    })
}

fn load_custom<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>, ScanError> {
    load_optional_json(path).map_err(|source| ScanError::CustomCollection {
        path: path.to_path_buf(),
        source,
    })
}

/// Convert every `*.json` record under `posts/`, in path order.
///
/// A file holds either one record or an array of records.
fn scan_posts(
    root: &Path,
    opts: &ConvertOptions,
) -> Result<(Vec<Post>, HashMap<String, PathBuf>), ScanError> {
    let dir = root.join(POSTS_DIR);
    let mut posts = Vec::new();
    let mut sources: HashMap<String, PathBuf> = HashMap::new();
    if !dir.is_dir() {
        return Ok((posts, sources));
    }

    for entry in WalkDir::new(&dir).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type().is_file() || !is_json(path) {
            continue;
        }

        let content = fs::read_to_string(path)?;
        let value: Value =
            serde_json::from_str(&content).map_err(|source| ScanError::InvalidPost {
                path: path.to_path_buf(),
                source,
            })?;
        let records = match value {
            Value::Array(items) => items,
            other => vec![other],
        };

        let rel = path.strip_prefix(root).unwrap_or(path).to_path_buf();
        for record in records {
            let post = convert_legacy_post(&LegacyRecord::from(record), opts);
            tracing::debug!(
                slug = %post.slug,
                post_type = %post.post_type.as_str(),
                source = %rel.display(),
                "converted legacy post"
            );
            if sources.contains_key(&post.slug) {
                return Err(ScanError::DuplicateSlug(post.slug, rel));
            }
            sources.insert(post.slug.clone(), rel.clone());
            posts.push(post);
        }
    }

    Ok((posts, sources))
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

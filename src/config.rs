//! Content configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! the base layer; a `config.toml` in the content root overrides any subset
//! of them.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! default_locale = "en"     # en | hu | de
//!
//! [listing]
//! related_limit = 3         # Related entries returned by default
//! popular_tags_limit = 10   # Tags returned by default
//!
//! [featured]
//! recent_days = 30          # A post this recent is featured
//! min_read_time = 5         # ...as is one whose read time falls
//! max_read_time = 15        # within [min, max] minutes
//!
//! [processing]
//! max_processes = 4         # Max parallel render workers (omit for auto = CPU cores)
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [featured]
//! recent_days = 14
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::collection::{DEFAULT_POPULAR_TAGS_LIMIT, DEFAULT_RELATED_LIMIT, FeaturedRules};
use crate::types::Locale;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Content configuration loaded from `config.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContentConfig {
    pub site: SiteConfig,
    /// Default limits for listing queries.
    pub listing: ListingConfig,
    /// The featured-post heuristic.
    pub featured: FeaturedConfig,
    /// Parallel rendering settings.
    pub processing: ProcessingConfig,
}

impl ContentConfig {
    /// Reject limits of zero and an inverted read-time range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.listing.related_limit == 0 {
            return Err(ConfigError::Validation(
                "listing.related_limit must be at least 1".into(),
            ));
        }
        if self.listing.popular_tags_limit == 0 {
            return Err(ConfigError::Validation(
                "listing.popular_tags_limit must be at least 1".into(),
            ));
        }
        if self.featured.min_read_time > self.featured.max_read_time {
            return Err(ConfigError::Validation(
                "featured.min_read_time must not exceed featured.max_read_time".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Locale used when a command does not name one.
    pub default_locale: Locale,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ListingConfig {
    pub related_limit: usize,
    pub popular_tags_limit: usize,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            related_limit: DEFAULT_RELATED_LIMIT,
            popular_tags_limit: DEFAULT_POPULAR_TAGS_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeaturedConfig {
    pub recent_days: u32,
    pub min_read_time: u32,
    pub max_read_time: u32,
}

impl Default for FeaturedConfig {
    fn default() -> Self {
        let rules = FeaturedRules::default();
        Self {
            recent_days: rules.recent_days,
            min_read_time: rules.min_read_time,
            max_read_time: rules.max_read_time,
        }
    }
}

impl FeaturedConfig {
    pub fn rules(&self) -> FeaturedRules {
        FeaturedRules {
            recent_days: self.recent_days,
            min_read_time: self.min_read_time,
            max_read_time: self.max_read_time,
        }
    }
}

/// Render parallelism.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Upper bound on rayon workers. `None` means one per core; larger
    /// values are clamped to the core count.
    pub max_processes: Option<usize>,
}

/// Worker count for the global rayon pool: the configured cap, never more
/// than the available cores.
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    match config.max_processes {
        Some(n) => n.min(cores),
        None => cores,
    }
}

// =============================================================================
// Loading
// =============================================================================

pub const CONFIG_FILE: &str = "config.toml";

/// [`ContentConfig::default`] as a TOML table.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(ContentConfig::default())?)
}

/// Deep-merge two TOML values. Tables merge per key; any other overlay value
/// wins outright.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut merged), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                let value = match merged.remove(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => value,
                };
                merged.insert(key, value);
            }
            toml::Value::Table(merged)
        }
        (_, overlay) => overlay,
    }
}

/// The content root's `config.toml`, parsed but not yet typed. `None` when
/// the file does not exist.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let path = root.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(None);
    }
    Ok(Some(toml::from_str(&fs::read_to_string(&path)?)?))
}

/// Apply `overlay` (if any) to `base`, deserialize, validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ContentConfig, ConfigError> {
    let value = match overlay {
        Some(overlay) => merge_toml(base, overlay),
        None => base,
    };
    let config: ContentConfig = value.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Stock defaults overlaid with the content root's `config.toml`.
pub fn load_config(root: &Path) -> Result<ContentConfig, ConfigError> {
    resolve_config(stock_defaults_value()?, load_raw_config(root)?)
}

/// A fully-commented stock `config.toml`. Printed by `gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# Flair Content Configuration
# ===========================
# Every key is optional and the values below are the built-in defaults.
# Keep only the ones you change.
#
# Lives at <content>/config.toml. Misspelled keys are reported as errors.

# ---------------------------------------------------------------------------
# Site
# ---------------------------------------------------------------------------
[site]
# Locale used when a command is not given --locale: "en", "hu" or "de".
default_locale = "en"

# ---------------------------------------------------------------------------
# Listings
# ---------------------------------------------------------------------------
[listing]
# How many related entries to show for a post, case study or update.
related_limit = 3

# How many tags `stats` reports as popular.
popular_tags_limit = 10

# ---------------------------------------------------------------------------
# Featured posts
# ---------------------------------------------------------------------------
# A resource post is featured when it was published within `recent_days`
# OR its read time is within [min_read_time, max_read_time] minutes.
[featured]
recent_days = 30
min_read_time = 5
max_read_time = 15

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel render workers. Omit for auto (= number of CPU cores).
# Values larger than the core count are clamped down.
# max_processes = 4
"##
}

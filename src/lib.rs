//! # Flair Content
//!
//! The content core of the Flair-Plastic website: a multilingual (English,
//! Hungarian, German) content model for resource posts, case studies and
//! product updates, plus the logic that turns loosely-shaped legacy records
//! into canonical posts and merges hand-authored overrides into listings.
//!
//! # Architecture: Two-Stage Pipeline
//!
//! ```text
//! 1. Scan      content/  →  Manifest   (JSON files → normalized posts + registries)
//! 2. Generate  Manifest  →  dist/      (template factory → static HTML)
//! ```
//!
//! Everything between the two stages is in-memory and pure. The listing
//! queries ([`collection`], [`registry`]) and the converters ([`legacy`])
//! never fail and never touch the filesystem, so unit tests exercise them
//! with plain values.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | `Locale`, `LocalizedText`, `Author`, `Byline` |
//! | [`post`] | Canonical `Post`, the six post types and their typed payloads |
//! | [`case_study`] | Trilingual case studies and their custom overrides |
//! | [`update`] | Product updates, priorities, categories and custom overrides |
//! | [`naming`] | Slug synthesis and read-time estimation |
//! | [`legacy`] | Legacy record detection and conversion |
//! | [`template`] | `PostTemplateFactory`: template selection and Maud rendering |
//! | [`registry`] | Regular + custom collections merged into one sorted view |
//! | [`collection`] | Filter, sort, featured, related, search and statistics over posts |
//! | [`config`] | `config.toml` loading, validation and stock defaults |
//! | [`scan`] | Stage 1: reads a content directory into a `Manifest` |
//! | [`generate`] | Stage 2: renders the manifest to HTML |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Custom Entries Replace, Never Merge
//!
//! A custom case study or update with the same `id` as a regular one hides
//! the regular entry completely. Partial field merging would make it unclear
//! which page a listing card leads to; a custom entry always leads to its own
//! `customUrl`.
//!
//! ## Unknown Types Degrade to Articles
//!
//! Posts are data, and data drifts. A post whose declared type is unknown,
//! or whose payload does not match its type, still renders: it falls back to
//! the article template and logs a warning instead of failing the build.
//!
//! ## Content Is Injected
//!
//! Regular collections are read through the [`registry::ContentSource`]
//! trait. Production reads JSON files; tests hand in vectors. A source that
//! fails to load leaves the listing with its custom entries only.

pub mod case_study;
pub mod collection;
pub mod config;
pub mod generate;
pub mod legacy;
pub mod naming;
pub mod output;
pub mod post;
pub mod registry;
pub mod scan;
pub mod template;
pub mod types;
pub mod update;

#[cfg(test)]
pub(crate) mod test_helpers;

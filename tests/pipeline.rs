//! End-to-end tests: scan the fixture content, render it, and drive the CLI.

use flair_content::post::PostType;
use flair_content::registry::Listing;
use flair_content::types::Locale;
use flair_content::{generate, scan};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;
use walkdir::WalkDir;

// ---------------------------------------------------------------------------
// Setup helpers
// ---------------------------------------------------------------------------

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/content")
}

/// Copy the fixture tree into a fresh temp directory.
fn content_copy() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let src = fixtures();
    for entry in WalkDir::new(&src) {
        let entry = entry.unwrap();
        let dst = tmp.path().join(entry.path().strip_prefix(&src).unwrap());
        if entry.file_type().is_dir() {
            fs::create_dir_all(&dst).unwrap();
        } else {
            fs::copy(entry.path(), &dst).unwrap();
        }
    }
    tmp
}

fn run(args: &[&str], source: &Path) -> (bool, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_flair-content"))
        .args(args)
        .arg("--source")
        .arg(source)
        .output()
        .expect("failed to run flair-content");
    (
        output.status.success(),
        String::from_utf8_lossy(&output.stdout).into_owned(),
    )
}

// ---------------------------------------------------------------------------
// Library pipeline
// ---------------------------------------------------------------------------

#[test]
fn scan_then_generate_writes_every_page() {
    let content = content_copy();
    let out = TempDir::new().unwrap();

    let manifest = scan::scan(content.path(), None).unwrap();
    let site = generate::generate(&manifest, out.path()).unwrap();

    let html_files = WalkDir::new(out.path())
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().is_some_and(|x| x == "html"))
        .count();
    assert_eq!(html_files, site.page_count());

    // One regular case study survives the custom override, in three locales.
    assert_eq!(site.case_study_pages.len(), Locale::ALL.len());
}

#[test]
fn every_template_is_rendered() {
    let content = content_copy();
    let out = TempDir::new().unwrap();
    let manifest = scan::scan(content.path(), None).unwrap();
    generate::generate(&manifest, out.path()).unwrap();

    for post in manifest.posts.posts() {
        let html = fs::read_to_string(
            out.path()
                .join(generate::RESOURCES_DIR)
                .join(format!("{}.html", post.slug)),
        )
        .unwrap();
        assert!(
            html.contains(&format!(r#"data-template="{}""#, post.post_type.as_str())),
            "{} rendered with the wrong template",
            post.slug
        );
    }
}

#[test]
fn hungarian_scan_renders_hungarian_titles() {
    let content = content_copy();
    let out = TempDir::new().unwrap();
    let manifest = scan::scan(content.path(), Some(Locale::Hu)).unwrap();
    generate::generate(&manifest, out.path()).unwrap();

    let html = fs::read_to_string(
        out.path()
            .join(generate::RESOURCES_DIR)
            .join("sustainable-injection-molding.html"),
    )
    .unwrap();
    assert!(html.contains("Fenntartható fröccsöntés"));
    assert!(html.contains(r#"lang="hu""#));
}

#[test]
fn legacy_case_study_is_detected() {
    let content = content_copy();
    let manifest = scan::scan(content.path(), None).unwrap();
    let post = manifest
        .posts
        .find_by_slug("automotive-clip-redesign")
        .unwrap();
    assert_eq!(post.post_type.known(), Some(PostType::CaseStudy));
    assert_eq!(post.read_time, Some(8));
}

#[test]
fn critical_updates_come_from_the_merged_view() {
    let content = content_copy();
    let manifest = scan::scan(content.path(), None).unwrap();
    let critical = manifest.updates.critical();
    assert_eq!(critical.len(), 1);
    assert_eq!(critical[0].id(), "cooling-line-2");
}

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

#[test]
fn cli_check_accepts_fixtures() {
    let content = content_copy();
    let (ok, stdout) = run(&["check"], content.path());
    assert!(ok);
    assert!(stdout.contains("==> Content is valid"));
    assert!(stdout.contains("Custom: /case-studies/custom/packaging-innovation"));
}

#[test]
fn cli_check_rejects_malformed_custom_file() {
    let content = content_copy();
    fs::write(content.path().join("case-studies.custom.json"), "{").unwrap();
    let (ok, _) = run(&["check"], content.path());
    assert!(!ok);
}

#[test]
fn cli_stats_prints_totals() {
    let content = content_copy();
    let (ok, stdout) = run(&["stats"], content.path());
    assert!(ok);
    let manifest = scan::scan(content.path(), None).unwrap();
    assert!(stdout.starts_with(&format!("Posts: {}", manifest.posts.len())));
    assert!(stdout.contains("Popular tags"));
}

#[test]
fn cli_search_spans_all_collections() {
    let content = content_copy();
    let (ok, stdout) = run(&["search", "packaging"], content.path());
    assert!(ok);
    assert!(stdout.contains("Case studies"));
    assert!(stdout.contains("Packaging Innovation: 30% Lighter Containers"));
}

#[test]
fn cli_gen_config_prints_stock_file() {
    let content = content_copy();
    let (ok, stdout) = run(&["gen-config"], content.path());
    assert!(ok);
    assert!(stdout.contains("[featured]"));
    assert!(stdout.contains("related_limit"));
}

use clap::{Parser, Subcommand};
use flair_content::output::SearchResults;
use flair_content::types::Locale;
use flair_content::{config, generate, output, scan};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "flair-content")]
#[command(about = "Content core for the Flair-Plastic website")]
#[command(long_about = "\
Content core for the Flair-Plastic website

Loads trilingual (en/hu/de) content from a directory, normalizes legacy
post records into canonical posts, merges regular and custom case studies
and updates, and renders everything through the post templates.

Content structure:

  content/
  ├── config.toml                  # Listing and featured settings (optional)
  ├── case-studies.json            # Regular case studies
  ├── case-studies.custom.json     # Custom overrides (same id wins)
  ├── updates.json                 # Regular updates
  ├── updates.custom.json          # Custom overrides (same id wins)
  └── posts/                       # Legacy post records, any depth
      ├── mould-care.json          # One record per file...
      └── archive.json             # ...or an array of records

Post type detection (first match wins):
  data[] of {image, text}          → slideshow
  client, challenge or solution    → case-study
  videoUrl or embedUrl             → video
  steps[]                          → tutorial
  infographicUrl, or bare image    → infographic
  otherwise                        → article

Run 'flair-content gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Locale for legacy posts (en, hu, de); defaults to site.default_locale
    #[arg(long, global = true)]
    locale: Option<Locale>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate content directory without building
    Check,
    /// Render posts, case studies and the index to the output directory
    Build,
    /// Print post statistics and popular tags
    Stats,
    /// Search posts, case studies and updates
    Search {
        /// Case-insensitive text to look for
        query: String,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let manifest = scan::scan(&cli.source, cli.locale)?;
            output::print_check_output(&manifest);
            println!("==> Content is valid");
        }
        Command::Build => {
            println!("==> Scanning {}", cli.source.display());
            let manifest = scan::scan(&cli.source, cli.locale)?;
            init_thread_pool(&manifest.config.processing);

            println!("==> Generating HTML → {}", cli.output.display());
            let site = generate::generate(&manifest, &cli.output)?;
            output::print_build_output(&site);
            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Stats => {
            let manifest = scan::scan(&cli.source, cli.locale)?;
            let stats = manifest.posts.statistics();
            let popular = manifest
                .posts
                .popular_tags(manifest.config.listing.popular_tags_limit);
            output::print_stats_output(&stats, &popular);
        }
        Command::Search { query } => {
            let manifest = scan::scan(&cli.source, cli.locale)?;
            let results = SearchResults {
                query: &query,
                locale: manifest.locale,
                posts: manifest.posts.search_posts(&query),
                case_studies: manifest.case_studies.search(&query),
                updates: manifest.updates.search(&query),
            };
            output::print_search_output(&results);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; the user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

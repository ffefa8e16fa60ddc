use clap::{Parser, Subcommand};
use learn_pages::{config, generate, output, page, scan, schema};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Shared flags for commands that write output.
#[derive(clap::Args, Clone)]
struct CacheArgs {
    /// Disable the render cache and rewrite every output file
    #[arg(long)]
    no_cache: bool,
}

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
#[command(name = "learn-pages")]
#[command(about = "Static generator for SEO learn pages with schema.org JSON-LD")]
#[command(long_about = "\
Static generator for SEO learn pages with schema.org JSON-LD

Each page is one TOML file. The same file feeds the JSON-LD graph in the
document head (Article, BreadcrumbList, FAQPage, speakable WebPage, Person,
HowTo) and the visible page shell (hero, TL;DR, sections, FAQ accordion),
so the two can never disagree.

Content structure:

  content/
  ├── config.toml                      # Site, publisher, author, reveal timings
  ├── about.toml                       # Root page → /about
  ├── 010-learn/                       # Section (numbered = listed on home)
  │   ├── 010-what-is-xrp.toml         # Page (numbered = listed on section index)
  │   ├── 020-xrp-escrow.toml
  │   └── xrp-glossary.toml            # No number prefix = reachable, not listed
  └── 020-answers/
      └── 010-xrp-price-prediction-2026.toml

Run 'learn-pages gen-config' to generate a documented config.toml.
Set RUST_LOG=debug for per-file render and cache decisions.")]
#[command(version = version_string())]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan content and write the site: pages, indexes, sitemap, robots.txt
    Build(CacheArgs),
    /// Validate the content directory without writing anything
    Check,
    /// Print the JSON-LD graph of one page
    Schema {
        /// Page file, relative to the content directory or as given on disk
        page: PathBuf,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Command::Build(cache_args) => {
            println!("==> Scanning {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            output::print_scan_output(&manifest, &cli.source);

            init_thread_pool(&manifest.config.build);
            println!("==> Generating HTML \u{2192} {}", cli.output.display());
            let report = generate::generate(&manifest, &cli.output, !cache_args.no_cache)?;
            output::print_generate_output(&report);

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            output::print_scan_output(&manifest, &cli.source);
            println!("==> Content is valid");
        }
        Command::Schema { page: page_file } => {
            let (found, config) = scan::scan_page(&cli.source, &page_file)?;
            let graph = page::schema_graph(&found, &config.identity());
            println!("{}", schema::to_json_ld_pretty(&graph)?);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Log to stderr so stdout stays clean for `schema` and `gen-config`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Initialize the rayon thread pool based on build config.
///
/// Caps at the number of available CPU cores; user can constrain down, not up.
fn init_thread_pool(build: &config::BuildConfig) {
    let threads = config::effective_threads(build);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

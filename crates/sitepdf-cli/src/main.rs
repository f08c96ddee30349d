//! sitepdf CLI - Export a static documentation site to a single PDF.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use sitepdf_core::{
    ExportConfig, NavigationInjector, PaperSize, SiteExporter, SiteReport, prepare_page,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PaperOption {
    A4,
    A3,
    Letter,
    Legal,
}

impl From<PaperOption> for PaperSize {
    fn from(opt: PaperOption) -> Self {
        match opt {
            PaperOption::A4 => Self::A4,
            PaperOption::A3 => Self::A3,
            PaperOption::Letter => Self::Letter,
            PaperOption::Legal => Self::Legal,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "sitepdf")]
#[command(author, version, about = "Export a static documentation site to PDF", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Site root directory
    #[arg(short, long, global = true, env = "SITEPDF_SITE_DIR")]
    site: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Combine the site pages and render them to PDF
    Export(ExportArgs),

    /// Compare the page list with the site contents
    Check,

    /// Replace static site headers with the navigation placeholder and add
    /// previous/next buttons
    Prepare,

    /// Write the shared navigation into every page's placeholder
    InjectNav {
        /// Write pages here instead of updating them in place
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct ExportArgs {
    /// Output PDF file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Fail when a configured page is missing
    #[arg(long)]
    strict: bool,

    /// Chrome/Chromium binary
    #[arg(long, env = "CHROME_PATH")]
    chrome: Option<PathBuf>,

    /// Directory for the temporary combined document
    #[arg(long)]
    work_dir: Option<PathBuf>,

    /// Paper size
    #[arg(long, value_enum)]
    paper: Option<PaperOption>,

    /// Document title (also used for the page header)
    #[arg(long)]
    title: Option<String>,

    /// Write the combined HTML here instead of rendering a PDF
    #[arg(long)]
    html_only: Option<PathBuf>,
}

fn load_config(cli: &Cli) -> Result<ExportConfig> {
    let mut config = if let Some(config_path) = &cli.config {
        ExportConfig::from_file(config_path).context("Failed to load config file")?
    } else {
        ExportConfig::load()
    };

    if let Some(site) = &cli.site {
        config.site_dir.clone_from(site);
    }

    Ok(config)
}

async fn export(mut config: ExportConfig, args: ExportArgs) -> Result<()> {
    if let Some(output) = args.output {
        config.output = output;
    }
    if args.strict {
        config.strict = true;
    }
    if args.chrome.is_some() {
        config.engine.chrome_path = args.chrome;
    }
    if args.work_dir.is_some() {
        config.work_dir = args.work_dir;
    }
    if let Some(paper) = args.paper {
        config.pdf.paper = paper.into();
    }
    if let Some(title) = args.title {
        config.title = title;
    }

    let exporter = SiteExporter::new(config).context("Invalid configuration")?;

    info!("Building combined HTML...");
    let combined = exporter
        .assemble()
        .await
        .context("Failed to assemble site pages")?;

    if let Some(path) = args.html_only {
        std::fs::write(&path, &combined.html)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        #[allow(clippy::print_stdout)]
        {
            println!("Combined HTML saved to: {}", path.display());
        }
        return Ok(());
    }

    let pb = ProgressBar::new_spinner();
    // Template is hardcoded and valid, unwrap is safe
    #[allow(clippy::unwrap_used)]
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap(),
    );
    pb.set_message(format!("Rendering {} pages with {}", combined.pages.len(), exporter.engine_name()));
    pb.enable_steady_tick(Duration::from_millis(120));

    let result = exporter.render(&combined).await;
    pb.finish_and_clear();
    let report = result.context("Failed to render PDF")?;

    // CLI output is intentional
    #[allow(clippy::print_stdout)]
    {
        if !combined.skipped.is_empty() {
            println!("Skipped missing pages: {}", combined.skipped.join(", "));
        }
        println!("\nDone! PDF saved to: {}", report.output.display());
        println!("File size: {} MB", report.size_mb());
    }

    Ok(())
}

fn check(config: &ExportConfig) -> Result<()> {
    let report = SiteReport::scan(&config.site_dir, &config.pages)
        .with_context(|| format!("Failed to scan {}", config.site_dir.display()))?;
    let stylesheet = config.stylesheet_path();
    let has_stylesheet = stylesheet.is_file();

    #[allow(clippy::print_stdout)]
    {
        println!("Site: {}", config.site_dir.display());
        for page in &report.present {
            println!("  ok       {page}");
        }
        for page in &report.missing {
            println!("  missing  {page}");
        }
        for page in &report.unlisted {
            println!("  unlisted {page}");
        }
        if has_stylesheet {
            println!("Stylesheet: {}", stylesheet.display());
        } else {
            println!("Stylesheet missing: {}", stylesheet.display());
        }
    }

    if !has_stylesheet {
        anyhow::bail!("Stylesheet not found: {}", stylesheet.display());
    }
    report.ensure_complete()?;
    Ok(())
}

/// Prepare every navigation page in link order. Returns the number of files rewritten.
fn prepare(config: &ExportConfig) -> Result<usize> {
    let links = &config.navigation.links;
    let mut updated = 0;

    for (i, link) in links.iter().enumerate() {
        let path = config.site_dir.join(&link.href);
        if !path.is_file() {
            warn!("Skipping {} - file not found", link.href);
            continue;
        }

        let prev = i.checked_sub(1).and_then(|p| links.get(p));
        let next = links.get(i + 1);

        let html = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let Some(prepared) = prepare_page(&html, prev, next, &config.navigation.placeholder_id)? else {
            info!("{} already prepared", link.href);
            continue;
        };

        std::fs::write(&path, prepared).with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Updated {}", link.href);
        updated += 1;
    }

    #[allow(clippy::print_stdout)]
    {
        println!("\nPrepared {updated} of {} pages", links.len());
    }
    Ok(updated)
}

/// Bake the navigation into each configured page. Returns the number of pages written.
fn inject_nav(config: &ExportConfig, out_dir: Option<PathBuf>) -> Result<usize> {
    let injector = NavigationInjector::new(config.navigation.clone())
        .context("Failed to render navigation markup")?;
    let target_dir = out_dir.unwrap_or_else(|| config.site_dir.clone());
    std::fs::create_dir_all(&target_dir)
        .with_context(|| format!("Failed to create {}", target_dir.display()))?;

    let mut injected = 0;
    for page in &config.pages {
        let path = config.site_dir.join(page);
        let Ok(html) = std::fs::read_to_string(&path) else {
            warn!("Skipping missing file: {}", page);
            continue;
        };

        let Some(updated) = injector.inject(&html, page) else {
            info!("{} has no navigation placeholder", page);
            continue;
        };

        let target = target_dir.join(page);
        std::fs::write(&target, updated).with_context(|| format!("Failed to write {}", target.display()))?;
        info!("Injected navigation into {} (active: {})", page, injector.page_key(page));
        injected += 1;
    }

    #[allow(clippy::print_stdout)]
    {
        println!("\nInjected navigation into {injected} of {} pages", config.pages.len());
    }
    Ok(injected)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (before parsing args so env vars are available)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    let config = load_config(&cli)?;

    match cli.command {
        Command::Export(args) => export(config, args).await,
        Command::Check => check(&config),
        Command::Prepare => prepare(&config).map(|_| ()),
        Command::InjectNav { out_dir } => inject_nav(&config, out_dir).map(|_| ()),
    }
}

//! streamgrid - render a grid of embedded video streams, and export recent
//! Icelandic earthquakes as CSV.

/// Application configuration (TOML).
mod config;
/// Terminal UI components.
mod tui;

use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

use crate::config::AppConfig;
use crate::tui::run_grid_preview;
use streamgrid_core::quakes::DEFAULT_QUAKES_URL;
use streamgrid_core::{
    GridLayout, GridRenderer, HtmlPage, LoadReport, Quake, QuakeClient, QuakeSummary,
    RenderedGrid, SourceFile, Traced, ValidationPolicy, YouTubeEmbed, load_sources,
    parse_quake_page, validate, write_csv,
};

/// Version string including the git revision.
const APP_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (rev:", env!("GIT_HASH"), ")");

/// CLI argument parser.
#[derive(Parser)]
#[command(name = "streamgrid", about, version = APP_VERSION)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Sources file (JSON, or TOML by extension). Overrides the config.
    #[arg(long, global = true)]
    sources: Option<PathBuf>,

    /// Validation policy: "strict" or "lenient". Overrides the config.
    #[arg(long, global = true)]
    policy: Option<ValidationPolicy>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Write a default config and a sample sources file.
    Init(InitArgs),
    /// Validate the sources file.
    Check,
    /// List streams in grid order.
    List,
    /// Render the grid as an HTML page.
    Render(RenderArgs),
    /// Render the grid and open it in the browser.
    Open(PageArgs),
    /// Preview the grid in the terminal.
    Preview(PageArgs),
    /// Fetch recent Icelandic earthquakes and save them as CSV.
    Quakes(QuakesArgs),
    /// Print a shell completion script.
    Completions(CompletionsArgs),
}

/// Arguments for the `init` subcommand.
#[derive(clap::Args)]
struct InitArgs {
    /// Overwrite existing files.
    #[arg(long)]
    force: bool,
}

/// Page layout overrides.
#[derive(clap::Args)]
struct PageArgs {
    /// Grid column count (default: config `page.columns`).
    #[arg(long)]
    columns: Option<usize>,

    /// Page title (default: config `page.title`).
    #[arg(long)]
    title: Option<String>,
}

/// Arguments for the `render` subcommand.
#[derive(clap::Args)]
struct RenderArgs {
    /// Output file, or "-" for stdout (default: config `page.output`).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Page layout overrides.
    #[command(flatten)]
    page: PageArgs,
}

/// Arguments for the `quakes` subcommand.
#[derive(clap::Args)]
struct QuakesArgs {
    /// CSV output file, or "-" for stdout (default: config `quakes.output`).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Page to fetch (default: config `quakes.url`, else the Reykjanes page).
    #[arg(long, conflicts_with = "page")]
    url: Option<Url>,

    /// Parse a saved copy of the page instead of fetching it.
    #[arg(long)]
    page: Option<PathBuf>,
}

/// Arguments for the `completions` subcommand.
#[derive(clap::Args)]
struct CompletionsArgs {
    /// Target shell.
    shell: Shell,
}

/// Resolved configuration for one invocation.
#[derive(Debug)]
struct Session {
    config: AppConfig,
    config_path: PathBuf,
    config_dir: PathBuf,
    sources_path: PathBuf,
    policy: ValidationPolicy,
}

impl Session {
    /// Loads the config file and applies CLI overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the config path cannot be resolved or the file is invalid.
    fn resolve(cli: &Cli) -> Result<Self> {
        let config_path =
            AppConfig::resolve_path(cli.dir.as_deref()).context("failed to resolve config path")?;
        let config = AppConfig::load(&config_path).context("failed to load config")?;
        let config_dir = config_path
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        let sources_path = cli
            .sources
            .clone()
            .unwrap_or_else(|| config.sources_path(&config_dir));
        let policy = cli.policy.unwrap_or(config.validation.policy);
        Ok(Self {
            config,
            config_path,
            config_dir,
            sources_path,
            policy,
        })
    }

    /// Reads and validates the sources file once.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if validation
    /// fails under the strict policy.
    fn load_streams(&self) -> Result<LoadReport> {
        let source = load_sources(&self.sources_path)?;
        let report = validate(source, self.policy).with_context(|| {
            format!(
                "{} failed {} validation",
                self.sources_path.display(),
                self.policy
            )
        })?;
        tracing::info!(
            "Loaded {} stream(s) from {} ({} skipped)",
            report.config.len(),
            self.sources_path.display(),
            report.skipped.len()
        );
        Ok(report)
    }

    /// Builds the embed player from `[page]` settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the player cannot be built.
    fn player(&self) -> Result<YouTubeEmbed> {
        YouTubeEmbed::builder()
            .privacy_enhanced(self.config.page.privacy_enhanced)
            .build()
            .context("failed to build embed player")
    }

    /// Page title, preferring the CLI override.
    fn title<'a>(&'a self, page: &'a PageArgs) -> &'a str {
        page.title.as_deref().unwrap_or(&self.config.page.title)
    }

    /// Loads, validates and renders the grid.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails, the column count is out of range,
    /// or two cells would share a key.
    fn render_grid(&self, page: &PageArgs) -> Result<RenderedGrid> {
        let report = self.load_streams()?;
        let layout = GridLayout::new(page.columns.unwrap_or(self.config.page.columns))
            .context("invalid column count")?;
        let renderer = GridRenderer::new(&report.config, Traced::new(self.player()?), layout);
        let duplicates = renderer.duplicate_keys();
        if !duplicates.is_empty() {
            bail!("cell keys are not unique: {}", duplicates.join(", "));
        }
        Ok(renderer.render())
    }

    /// Earthquake page URL from `[quakes]`, or the default page.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured URL does not parse.
    fn quakes_url(&self) -> Result<Url> {
        let raw = self
            .config
            .quakes
            .url
            .as_deref()
            .unwrap_or(DEFAULT_QUAKES_URL);
        Url::parse(raw).with_context(|| format!("invalid quakes.url '{raw}'"))
    }
}

/// Creates the parent directory of `path` if it is missing.
///
/// # Errors
///
/// Returns an error if directory creation fails.
fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    Ok(())
}

/// Writes `content` to `path`, creating parent directories if needed.
///
/// # Errors
///
/// Returns an error if directory creation or the write fails.
fn write_page(path: &Path, content: &str) -> Result<()> {
    ensure_parent_dir(path)?;
    std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}

/// Runs the `init` subcommand.
///
/// # Errors
///
/// Returns an error if the config or sources file cannot be written.
#[instrument(skip_all)]
fn run_init(session: &Session, args: &InitArgs) -> Result<()> {
    if session.config_path.exists() && !args.force {
        tracing::info!("Config already exists: {}", session.config_path.display());
    } else {
        AppConfig::default()
            .save(&session.config_path)
            .context("failed to save config")?;
        tracing::info!("Wrote config to {}", session.config_path.display());
    }

    if session.sources_path.exists() && !args.force {
        tracing::info!("Sources already exist: {}", session.sources_path.display());
    } else {
        SourceFile::sample()
            .save(&session.sources_path)
            .context("failed to save sample sources")?;
        tracing::info!("Wrote sample sources to {}", session.sources_path.display());
    }

    Ok(())
}

/// Runs the `check` subcommand.
///
/// # Errors
///
/// Returns an error if the sources file is unreadable or fails strict validation.
#[instrument(skip_all)]
fn run_check(session: &Session) -> Result<()> {
    let report = session.load_streams()?;

    for record in report.config.streams() {
        if !YouTubeEmbed::looks_like_video_id(record.id()) {
            tracing::warn!(
                "'{}' ({}) does not look like a YouTube video id",
                record.id(),
                record.title()
            );
        }
    }

    if report.skipped.is_empty() {
        tracing::info!("OK: {} stream(s)", report.config.len());
    } else {
        tracing::warn!(
            "{} stream(s) usable, {} issue(s) skipped under {} policy",
            report.config.len(),
            report.skipped.len(),
            session.policy
        );
    }
    Ok(())
}

/// Runs the `list` subcommand.
///
/// # Errors
///
/// Returns an error if loading fails.
#[instrument(skip_all)]
fn run_list(session: &Session) -> Result<()> {
    let report = session.load_streams()?;
    if report.config.is_empty() {
        tracing::info!(
            "No streams configured. Add entries to {}.",
            session.sources_path.display()
        );
        return Ok(());
    }

    let layout = GridLayout::new(session.config.page.columns).context("invalid column count")?;
    tracing::info!("Row\tCol\tID\t\tTitle\tDescription");
    for (index, record) in report.config.streams().iter().enumerate() {
        let pos = layout.position(index);
        tracing::info!(
            "{}\t{}\t{}\t{}\t{}",
            pos.row,
            pos.column,
            record.id(),
            record.title(),
            record.description()
        );
    }
    tracing::info!("Total: {} streams", report.config.len());

    Ok(())
}

/// Runs the `render` subcommand.
///
/// # Errors
///
/// Returns an error if loading, rendering or writing the page fails.
#[instrument(skip_all)]
fn run_render(session: &Session, args: &RenderArgs) -> Result<()> {
    let grid = session.render_grid(&args.page)?;
    let html = HtmlPage::new(session.title(&args.page), &grid).to_string();

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| session.config.output_path(&session.config_dir));
    if output.as_os_str() == "-" {
        let mut stdout = io::stdout().lock();
        stdout
            .write_all(html.as_bytes())
            .context("failed to write page to stdout")?;
        stdout.flush().context("failed to flush stdout")?;
        return Ok(());
    }

    write_page(&output, &html)?;
    tracing::info!(
        "Wrote {} cell(s) in {} row(s) to {}",
        grid.cells().len(),
        grid.rows(),
        output.display()
    );
    Ok(())
}

/// Runs the `open` subcommand.
///
/// # Errors
///
/// Returns an error if rendering fails or no browser can be launched.
#[instrument(skip_all)]
fn run_open(session: &Session, args: &PageArgs) -> Result<()> {
    let grid = session.render_grid(args)?;
    let html = HtmlPage::new(session.title(args), &grid).to_string();
    let output = session.config.output_path(&session.config_dir);
    write_page(&output, &html)?;
    tracing::info!("Opening {}", output.display());
    open::that(&output).with_context(|| format!("failed to open {}", output.display()))
}

/// Runs the `preview` subcommand.
///
/// # Errors
///
/// Returns an error if rendering fails or the TUI fails.
#[instrument(skip_all)]
fn run_preview(session: &Session, args: &PageArgs) -> Result<()> {
    let grid = session.render_grid(args)?;
    tracing::info!("Launching preview of {} cell(s)...", grid.cells().len());
    run_grid_preview(&grid, session.title(args)).context("grid preview TUI failed")
}

/// Runs the `quakes` subcommand.
///
/// # Errors
///
/// Returns an error if the page cannot be fetched, read or parsed, or the
/// CSV cannot be written.
#[instrument(skip_all)]
async fn run_quakes(session: &Session, args: &QuakesArgs) -> Result<()> {
    let quakes = if let Some(page) = &args.page {
        let html = std::fs::read_to_string(page)
            .with_context(|| format!("failed to read {}", page.display()))?;
        parse_quake_page(&html).with_context(|| format!("failed to parse {}", page.display()))?
    } else {
        let url = match &args.url {
            Some(url) => url.clone(),
            None => session.quakes_url()?,
        };
        let client = QuakeClient::builder().page_url(url).build()?;
        tracing::info!("Fetching earthquake data from {}...", client.page_url());
        client.fetch().await?
    };
    tracing::info!("Scraped {} earthquake(s)", quakes.len());

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| session.config.quakes_output_path(&session.config_dir));
    if output.as_os_str() == "-" {
        write_csv(&quakes, io::stdout().lock())?;
    } else {
        ensure_parent_dir(&output)?;
        let file = std::fs::File::create(&output)
            .with_context(|| format!("failed to create {}", output.display()))?;
        write_csv(&quakes, BufWriter::new(file))
            .with_context(|| format!("failed to write {}", output.display()))?;
        tracing::info!("Saved CSV to {}", output.display());
    }

    log_quake_summary(&quakes);
    Ok(())
}

/// Logs the most recent quakes and overall statistics.
fn log_quake_summary(quakes: &[Quake]) {
    let summary = QuakeSummary::new(quakes);
    if summary.count == 0 {
        tracing::info!("No earthquakes in the feed.");
        return;
    }

    tracing::info!("Most recent earthquakes:");
    for quake in &summary.most_recent {
        tracing::info!(
            "{}\tM{:.2}\t{:.1} km\t{}",
            quake.timestamp,
            quake.magnitude,
            quake.depth_km,
            quake.location.as_deref().unwrap_or("-")
        );
    }
    if let (Some(mean), Some(max), Some(depth)) = (
        summary.mean_magnitude,
        summary.max_magnitude,
        summary.mean_depth_km,
    ) {
        tracing::info!("Average magnitude: {mean:.2}");
        tracing::info!("Maximum magnitude: {max:.2}");
        tracing::info!("Average depth: {depth:.2} km");
    }
    tracing::info!("Most active areas:");
    for (place, count) in &summary.most_active {
        tracing::info!("{place}: {count} earthquakes");
    }
}

/// Runs the `completions` subcommand.
fn run_completions(args: &CompletionsArgs) {
    let mut cmd = Cli::command();
    let name = String::from(cmd.get_name());
    clap_complete::generate(args.shell, &mut cmd, name, &mut io::stdout());
}

/// Installs the tracing subscriber. Logs go to stderr so that stdout can
/// carry rendered output.
fn init_tracing() {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .with_writer(io::stderr)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(io::stderr);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    if let Commands::Completions(args) = &cli.command {
        run_completions(args);
        return Ok(());
    }

    let session = Session::resolve(&cli)?;
    match &cli.command {
        Commands::Init(args) => run_init(&session, args),
        Commands::Check => run_check(&session),
        Commands::List => run_list(&session),
        Commands::Render(args) => run_render(&session, args),
        Commands::Open(args) => run_open(&session, args),
        Commands::Preview(args) => run_preview(&session, args),
        Commands::Quakes(args) => run_quakes(&session, args).await,
        Commands::Completions(args) => {
            run_completions(args);
            Ok(())
        }
    }
}

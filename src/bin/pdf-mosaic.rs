//! CLI binary for pdf-mosaic.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `MosaicConfig`, prompts for whatever grid parameters were not given as
//! flags, and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use pdf_mosaic::{
    create_mosaic_to_file, inspect, Alignment, BackgroundColor, FallbackParameters,
    InteractivePrompt, MosaicConfig, MosaicProgressCallback, PageSelection, ProgressCallback,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback. The bar stays hidden until rendering starts
/// so it never draws over the interactive prompts.
struct CliProgressCallback {
    bar: ProgressBar,
    /// Print the page count when the document opens.
    announce: bool,
    /// Draw the bar while rendering.
    show_bar: bool,
}

impl CliProgressCallback {
    fn new(announce: bool, show_bar: bool) -> Arc<Self> {
        Arc::new(Self {
            bar: ProgressBar::hidden(),
            announce,
            show_bar,
        })
    }

    /// Make the bar visible once we know `total`.
    fn activate_bar(&self, total: usize) {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} pages  \
             ⏱ {elapsed_precise}  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        self.bar.set_draw_target(ProgressDrawTarget::stderr());
        self.bar.set_length(total as u64);
        self.bar.set_style(style);
        self.bar.set_prefix("Rendering");
        self.bar.enable_steady_tick(Duration::from_millis(80));
    }
}

impl MosaicProgressCallback for CliProgressCallback {
    fn on_document_opened(&self, page_count: usize) {
        if self.announce {
            eprintln!(
                "{} {}",
                cyan("◆"),
                bold(&format!("PDF has {page_count} pages."))
            );
        }
    }

    fn on_render_start(&self, total_pages: usize) {
        if self.show_bar {
            self.activate_bar(total_pages);
        }
    }

    fn on_page_rendered(&self, page_num: usize, _total: usize, width: u32, height: u32) {
        self.bar
            .set_message(dim(&format!("page {page_num} → {width}x{height} px")));
        self.bar.inc(1);
    }

    fn on_render_complete(&self, _total_pages: usize) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Interactive: asks for columns and page width
  pdf-mosaic rulebook.pdf

  # Non-interactive, 4 columns of 300 px pages, default output rulebook.png
  pdf-mosaic rulebook.pdf --columns 4 --width 300

  # JPEG output on a black background, centred rows
  pdf-mosaic rulebook.pdf -c 6 -w 240 --background black --center -o overview.jpg

  # Only the first eight pages
  pdf-mosaic rulebook.pdf --pages 1-8 -c 4 -w 300

  # Page count and page sizes, no rendering
  pdf-mosaic --inspect-only rulebook.pdf

  # Machine-readable run summary
  pdf-mosaic rulebook.pdf -c 4 -w 300 --json

OUTPUT:
  The image format follows the output extension: .png (default) or .jpg/.jpeg.
  Without -o the mosaic is written to <input stem>.png in the current directory.

PDFIUM:
  pdfium is loaded at runtime from --pdfium-lib, else from the current
  directory, else from the system library path. Pre-built libraries:
  https://github.com/bblanchon/pdfium-binaries/releases
"#;

/// Tile every page of a PDF into one grid image.
#[derive(Parser, Debug)]
#[command(
    name = "pdf-mosaic",
    version,
    about = "Tile every page of a PDF into one grid image",
    long_about = "Render each page of a PDF at a chosen pixel width and arrange the pages \
row by row into a single PNG or JPEG mosaic. Column count and page width are asked for \
interactively unless given with --columns and --width.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Path to the PDF file.
    #[arg(value_hint = clap::ValueHint::FilePath)]
    input: PathBuf,

    /// Output image file (.png, .jpg, .jpeg). Default: <input stem>.png.
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    output: Option<PathBuf>,

    /// Number of grid columns. Prompted for if omitted.
    #[arg(short, long)]
    columns: Option<u32>,

    /// Width of each page in pixels. Prompted for if omitted.
    #[arg(short, long)]
    width: Option<u32>,

    /// Page selection: all, 5, 3-15, 1,3,5,7 or 1-3,5.
    #[arg(long, default_value = "all", value_parser = parse_pages)]
    pages: PageSelection,

    /// Canvas background: white, black, or #RRGGBB.
    #[arg(long, default_value = "white", value_parser = parse_background)]
    background: BackgroundColor,

    /// Centre short rows horizontally and short pages vertically.
    #[arg(long)]
    center: bool,

    /// JPEG quality (1–100). Ignored for PNG.
    #[arg(long, default_value_t = 95,
          value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: u8,

    /// PDF user password for encrypted documents.
    #[arg(long)]
    password: Option<String>,

    /// Path to the pdfium shared library.
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pdfium_lib: Option<PathBuf>,

    /// Print page count and page sizes only, no rendering.
    #[arg(long)]
    inspect_only: bool,

    /// Print the run summary (or inspection result) as JSON on stdout.
    #[arg(long)]
    json: bool,

    /// Disable progress bar.
    #[arg(long)]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors and prompts.
    #[arg(short, long)]
    quiet: bool,
}

fn parse_pages(s: &str) -> Result<PageSelection, String> {
    s.parse().map_err(|e: pdf_mosaic::MosaicError| e.to_string())
}

fn parse_background(s: &str) -> Result<BackgroundColor, String> {
    s.parse().map_err(|e: pdf_mosaic::MosaicError| e.to_string())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let config = build_config(&cli, None)?;
        let info = inspect(&cli.input, &config).context("Failed to inspect PDF")?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&info).context("Failed to serialise inspection")?
            );
        } else {
            println!("File:         {}", info.path.display());
            println!("Pages:        {}", info.page_count);
            println!("PDF Version:  {}", info.pdf_version);
            for page in &info.pages {
                println!(
                    "  page {:>4}:  {:>7.1} x {:<7.1} pt",
                    page.page, page.width_pt, page.height_pt
                );
            }
        }
        return Ok(());
    }

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: ProgressCallback =
        CliProgressCallback::new(!cli.quiet && !cli.json, show_progress);
    let config = build_config(&cli, Some(progress_cb))?;

    // Prompts go to stdout, unless stdout is reserved for JSON.
    let prompt_out: Box<dyn Write> = if cli.json {
        Box::new(io::stderr())
    } else {
        Box::new(io::stdout())
    };
    let prompt = InteractivePrompt::new(io::stdin().lock(), prompt_out);
    let parameters = FallbackParameters::new(cli.columns, cli.width, prompt);

    // ── Run ──────────────────────────────────────────────────────────────
    let summary = create_mosaic_to_file(&cli.input, cli.output.as_deref(), parameters, &config)
        .context("Failed to create mosaic")?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("Failed to serialise summary")?
        );
    } else if !cli.quiet {
        let s = &summary.stats;
        eprintln!(
            "{}  {} pages  {} rows × {} columns  {}x{} px  →  {}",
            green("✔"),
            s.rendered_pages,
            s.rows,
            s.columns,
            s.canvas_width,
            s.canvas_height,
            bold(&summary.output.display().to_string()),
        );
        eprintln!(
            "   {}",
            dim(&format!(
                "render {}ms  /  compose {}ms  /  encode {}ms  —  {} bytes {}",
                s.render_duration_ms,
                s.compose_duration_ms,
                summary.encode_duration_ms,
                summary.file_size,
                summary.format
            )),
        );
    }

    Ok(())
}

/// Map CLI args to `MosaicConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<MosaicConfig> {
    let mut builder = MosaicConfig::builder()
        .pages(cli.pages.clone())
        .background(cli.background)
        .alignment(if cli.center {
            Alignment::Center
        } else {
            Alignment::Start
        })
        .jpeg_quality(cli.quality);

    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd.clone());
    }
    if let Some(ref lib) = cli.pdfium_lib {
        builder = builder.pdfium_library(lib.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

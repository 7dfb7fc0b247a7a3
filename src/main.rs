use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod charspec;
mod config;
mod error;
mod grid;
mod output;
mod run;

use error::GridError;
use grid::steps::morphology::MorphOp;
use grid::steps::threshold::Method;

#[derive(Parser, Debug)]
#[command(name = "img2grid")]
#[command(about = "Convert an image to a binary text grid of two characters (default: '0' and space)")]
#[command(version)]
pub struct Args {
    /// Path to input image
    pub input: PathBuf,

    /// Path to output .txt file (defaults to <input>.txt)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Target character width (columns)
    #[arg(long)]
    pub width: Option<u32>,

    /// Target character height (rows) before y-aspect compression
    #[arg(long)]
    pub height: Option<u32>,

    /// Uniform scale factor if width/height not provided
    #[arg(long, value_parser = config::parse_positive)]
    pub scale: Option<f64>,

    /// Vertical compression factor compensating for tall glyph cells
    #[arg(long, default_value = "0.5", value_parser = config::parse_positive)]
    pub y_aspect: f64,

    /// Enable CLAHE contrast enhancement
    #[arg(long)]
    pub clahe: bool,

    /// CLAHE clip limit
    #[arg(long, default_value = "2.0")]
    pub clahe_clip: f32,

    /// CLAHE tile grid size
    #[arg(long, default_value = "8")]
    pub clahe_grid: u32,

    /// Gaussian blur kernel size (made odd), 0 disables
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    pub blur: i32,

    /// Binarization method: otsu, adaptive_mean, adaptive_gaussian, canny
    #[arg(long, default_value = "otsu")]
    pub method: Method,

    /// Adaptive threshold block size (made odd, at least 3)
    #[arg(long, default_value = "31", allow_negative_numbers = true)]
    pub adaptive_block: i32,

    /// Adaptive threshold constant subtracted from the local average
    #[arg(long, default_value = "5", allow_negative_numbers = true)]
    pub adaptive_c: i32,

    /// Canny lower hysteresis threshold
    #[arg(long, default_value = "100")]
    pub canny_lo: f32,

    /// Canny upper hysteresis threshold
    #[arg(long, default_value = "200")]
    pub canny_hi: f32,

    /// Morphological operation: none, open, close, erode, dilate
    #[arg(long, default_value = "none")]
    pub morph: MorphOp,

    /// Morphology kernel size (made odd)
    #[arg(long, default_value = "3", allow_negative_numbers = true)]
    pub morph_ksize: i32,

    /// Morphology iterations, 0 or less disables
    #[arg(long, default_value = "1", allow_negative_numbers = true)]
    pub morph_iters: i32,

    /// Invert after binarization (swap ON/OFF)
    #[arg(long)]
    pub invert: bool,

    /// Character for ON pixels, supports aliases (tab, emspace, ...) and escapes like '\t' or '\u2003'
    #[arg(long, default_value = "0", value_parser = charspec::resolve)]
    pub on_char: String,

    /// Character for OFF pixels, same syntax as --on-char
    #[arg(long, default_value = "space", value_parser = charspec::resolve)]
    pub off_char: String,

    /// Use only whitespace characters: ON=tab, OFF=space
    #[arg(long)]
    pub whitespace_only: bool,

    /// Save the processed binary image for sanity-checking
    #[arg(long, value_name = "PNG_PATH")]
    pub save_preview: Option<PathBuf>,

    /// Print a JSON run report instead of the summary lines
    #[arg(long)]
    pub report: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match try_main(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(exit_code_for(&err))
        }
    }
}

const OUTPUT_FAILURE: u8 = 4;

/// Failures outside `GridError` (report serialization, ...) count as output failures
fn exit_code_for(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<GridError>()
        .map_or(OUTPUT_FAILURE, GridError::exit_code)
}

fn try_main(args: Args) -> anyhow::Result<()> {
    let config = config::Config::try_from(args)?;
    let report_json = config.report;
    let preview = config.preview.clone();

    tracing::debug!("img2grid v{} starting", env!("CARGO_PKG_VERSION"));

    let mut conversion = run::run(config)?;

    // the text file exists from here on, announce it before the preview can fail
    if !report_json {
        let report = &conversion.report;
        println!(
            "Wrote text grid: {}  (shape: {}x{})",
            report.output.display(),
            report.rows,
            report.cols
        );
    }

    if let Some(path) = preview {
        conversion.save_preview(path.clone())?;
        if !report_json {
            println!("Saved preview PNG: {}", path.display());
        }
    }

    if report_json {
        println!("{}", serde_json::to_string_pretty(&conversion.report)?);
    }

    Ok(())
}

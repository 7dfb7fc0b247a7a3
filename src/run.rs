use crate::config::Config;
use crate::error::GridError;
use crate::grid::{render, Pipeline, StepTiming};
use crate::output;
use image::{DynamicImage, GrayImage, ImageError, ImageReader};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Summary of a completed conversion
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub rows: u32,
    pub cols: u32,
    pub method: &'static str,
    pub steps: Vec<StepTiming>,
    pub total_time_ms: u64,
    pub preview: Option<PathBuf>,
}

/// Text grid already on disk, binary image kept for an optional preview
#[derive(Debug)]
pub struct Conversion {
    pub report: RunReport,
    binary: GrayImage,
}

impl Conversion {
    /// Save the binary grid as a preview image and record it in the report
    pub fn save_preview(&mut self, path: PathBuf) -> Result<(), GridError> {
        output::save_preview(&path, &self.binary)?;
        self.report.preview = Some(path);
        Ok(())
    }
}

/// Convert `config.input` and write the text grid to `config.output`
pub fn run(config: Config) -> Result<Conversion, GridError> {
    let start = Instant::now();

    if !config.input.exists() {
        return Err(GridError::InputNotFound(config.input));
    }

    let image = load_image(&config.input)?;
    tracing::debug!(
        "Loaded {} ({}x{})",
        config.input.display(),
        image.width(),
        image.height()
    );

    let method = config.pipeline.threshold.method.as_str();
    let result = Pipeline::new(config.pipeline).process(image)?;

    if result.image.pixels().all(|p| p.0[0] == result.image.get_pixel(0, 0).0[0]) {
        tracing::warn!("Binarized grid is uniform, output will contain a single character");
    }

    let text = render::to_text(&result.image, config.glyphs);
    output::write_text(&config.output, &text)?;

    Ok(Conversion {
        report: RunReport {
            input: config.input,
            output: config.output,
            rows: result.rows,
            cols: result.cols,
            method,
            steps: result.steps,
            total_time_ms: start.elapsed().as_millis() as u64,
            preview: None,
        },
        binary: result.image,
    })
}

/// Decode by file contents, the extension is only a fallback hint
fn load_image(path: &Path) -> Result<DynamicImage, GridError> {
    let decode_err = |source: ImageError| GridError::Decode {
        path: path.to_path_buf(),
        source,
    };

    ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| decode_err(ImageError::IoError(e)))?
        .decode()
        .map_err(decode_err)
}

use crate::error::GridError;
use crate::grid::steps::morphology::MorphParams;
use crate::grid::steps::threshold::ThresholdParams;
use crate::grid::{ClaheParams, Glyphs, PipelineConfig, SizeRequest};
use crate::Args;
use std::path::PathBuf;

/// Run configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub input: PathBuf,
    pub output: PathBuf,
    pub pipeline: PipelineConfig,
    pub glyphs: Glyphs,
    pub preview: Option<PathBuf>,
    pub report: bool,
}

impl TryFrom<Args> for Config {
    type Error = GridError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        let output = args
            .output
            .unwrap_or_else(|| args.input.with_extension("txt"));

        let glyphs = if args.whitespace_only {
            Glyphs::whitespace_only()
        } else {
            Glyphs::from_resolved(&args.on_char, &args.off_char)?
        };

        let pipeline = PipelineConfig {
            size: SizeRequest {
                width: args.width,
                height: args.height,
                scale: args.scale,
                y_aspect: args.y_aspect,
            },
            clahe: args.clahe.then_some(ClaheParams {
                clip_limit: args.clahe_clip,
                grid: args.clahe_grid,
            }),
            blur: args.blur,
            threshold: ThresholdParams {
                method: args.method,
                adaptive_block: args.adaptive_block,
                adaptive_c: args.adaptive_c,
                canny_lo: args.canny_lo,
                canny_hi: args.canny_hi,
            },
            morph: MorphParams {
                op: args.morph,
                ksize: args.morph_ksize,
                iterations: args.morph_iters,
            },
            invert: args.invert,
        };

        Ok(Self {
            input: args.input,
            output,
            pipeline,
            glyphs,
            preview: args.save_preview,
            report: args.report,
        })
    }
}

/// Value parser for strictly positive, finite factors
pub fn parse_positive(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("{}: {}", s, e))?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("must be a positive number, got {}", s))
    }
}

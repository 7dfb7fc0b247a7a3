use crate::error::GridError;
use image::{DynamicImage, GrayImage};
use serde::Serialize;
use std::time::Instant;

use super::size::SizeRequest;
use super::steps;
use super::steps::morphology::MorphParams;
use super::steps::threshold::ThresholdParams;

/// CLAHE settings, present only when enhancement is enabled
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClaheParams {
    pub clip_limit: f32,
    pub grid: u32,
}

impl Default for ClaheParams {
    fn default() -> Self {
        Self {
            clip_limit: steps::clahe::DEFAULT_CLIP_LIMIT,
            grid: steps::clahe::DEFAULT_GRID,
        }
    }
}

/// Everything the pipeline needs to turn an image into a binary grid
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub size: SizeRequest,
    pub clahe: Option<ClaheParams>,
    pub blur: i32,
    pub threshold: ThresholdParams,
    pub morph: MorphParams,
    pub invert: bool,
}

/// Timing information for a single pipeline step
#[derive(Debug, Clone, Serialize)]
pub struct StepTiming {
    pub name: String,
    pub time_ms: u64,
}

/// Binary grid plus timing stats
#[derive(Debug, Clone, Serialize)]
pub struct GridResult {
    /// Binary image, one pixel per output character (not serialized)
    #[serde(skip)]
    pub image: GrayImage,
    pub rows: u32,
    pub cols: u32,
    /// Total pipeline time in milliseconds
    pub total_time_ms: u64,
    pub steps: Vec<StepTiming>,
}

/// Grayscale, resize, enhance, binarize, smooth
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run every configured step on `image`
    pub fn process(&self, image: DynamicImage) -> Result<GridResult, GridError> {
        let start = Instant::now();
        let mut timings = Vec::new();
        let cfg = &self.config;

        let mut img = self.run_step("grayscale", image, &mut timings, steps::grayscale::apply)?;

        let (h, w) = (img.height(), img.width());
        let target = cfg.size.resolve(h, w);
        if target != (h, w) {
            tracing::debug!("Resizing {}x{} to {}x{}", h, w, target.0, target.1);
            img = self.run_step("resize", img, &mut timings, |i| steps::resize::apply(i, target))?;
        }

        if let Some(clahe) = cfg.clahe {
            img = self.run_step("clahe", img, &mut timings, |i| {
                steps::clahe::apply(i, clahe.clip_limit, clahe.grid)
            })?;
        }

        if cfg.blur > 0 {
            img = self.run_step("blur", img, &mut timings, |i| steps::blur::apply(i, cfg.blur))?;
        }

        img = self.run_step(cfg.threshold.method.as_str(), img, &mut timings, |i| {
            steps::threshold::apply(i, &cfg.threshold)
        })?;

        if !cfg.morph.is_noop() {
            img = self.run_step(cfg.morph.op.as_str(), img, &mut timings, |i| {
                steps::morphology::apply(i, &cfg.morph)
            })?;
        }

        if cfg.invert {
            img = self.run_step("invert", img, &mut timings, steps::invert::apply)?;
        }

        Ok(GridResult {
            rows: img.height(),
            cols: img.width(),
            image: img,
            total_time_ms: start.elapsed().as_millis() as u64,
            steps: timings,
        })
    }

    fn run_step<I, F>(
        &self,
        name: &str,
        input: I,
        timings: &mut Vec<StepTiming>,
        step_fn: F,
    ) -> Result<GrayImage, GridError>
    where
        F: FnOnce(I) -> Result<GrayImage, GridError>,
    {
        let step_start = Instant::now();
        let result = step_fn(input)?;
        let time_ms = step_start.elapsed().as_millis() as u64;
        tracing::debug!("step {} took {}ms", name, time_ms);
        timings.push(StepTiming {
            name: name.to_string(),
            time_ms,
        });
        Ok(result)
    }
}

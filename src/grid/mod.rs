//! Image to binary text grid conversion
//!
//! A linear pipeline of image steps produces a binary buffer with one pixel per
//! output character, which `render` then maps to text.

pub mod pipeline;
pub mod render;
pub mod size;
pub mod steps;

pub use pipeline::{ClaheParams, Pipeline, PipelineConfig, StepTiming};
pub use render::Glyphs;
pub use size::SizeRequest;

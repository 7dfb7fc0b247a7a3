//! Target grid size resolution
//!
//! Monospace glyph cells are roughly twice as tall as they are wide, so the
//! vertical axis is compressed by `y_aspect` to keep shapes looking right.

/// Default vertical compression for typical terminal fonts
pub const DEFAULT_Y_ASPECT: f64 = 0.5;

/// Requested output size, any combination of fields may be absent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeRequest {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub scale: Option<f64>,
    pub y_aspect: f64,
}

impl Default for SizeRequest {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            scale: None,
            y_aspect: DEFAULT_Y_ASPECT,
        }
    }
}

impl SizeRequest {
    /// Compute `(target_h, target_w)` for a source image of `(h, w)`
    pub fn resolve(&self, h: u32, w: u32) -> (u32, u32) {
        let (hf, wf) = (h as f64, w as f64);
        let y_aspect = self.y_aspect;

        match (self.width, self.height, self.scale) {
            (Some(width), Some(height), _) => floor_one(height as f64 * y_aspect, width as f64),
            (Some(width), None, _) => {
                let ratio = width as f64 / wf;
                floor_one(hf * ratio * y_aspect, width as f64)
            }
            (None, Some(height), _) => {
                let tw = height as f64 * (wf / hf) / y_aspect.max(1e-9);
                floor_one(height as f64 * y_aspect, tw)
            }
            (None, None, Some(scale)) => floor_one(hf * scale * y_aspect, wf * scale),
            // Nothing requested: keep the source size regardless of y_aspect
            (None, None, None) => (h, w),
        }
    }
}

fn floor_one(th: f64, tw: f64) -> (u32, u32) {
    (round_dim(th), round_dim(tw))
}

fn round_dim(v: f64) -> u32 {
    let rounded = v.round_ties_even();
    if rounded.is_nan() || rounded < 1.0 {
        1
    } else if rounded > u32::MAX as f64 {
        u32::MAX
    } else {
        rounded as u32
    }
}

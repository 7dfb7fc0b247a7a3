//! Binary image to text grid

use crate::error::GridError;
use image::GrayImage;

/// Pixels at or above this value map to the ON character
const ON_THRESHOLD: u8 = 128;

/// ON / OFF character pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyphs {
    pub on: char,
    pub off: char,
}

impl Default for Glyphs {
    fn default() -> Self {
        Self { on: '0', off: ' ' }
    }
}

impl Glyphs {
    pub fn new(on: char, off: char) -> Self {
        Self { on, off }
    }

    /// Tab for ON and space for OFF
    pub fn whitespace_only() -> Self {
        Self { on: '\t', off: ' ' }
    }

    /// Build from already resolved strings, each must hold exactly one character
    pub fn from_resolved(on: &str, off: &str) -> Result<Self, GridError> {
        Ok(Self::new(single_char(on)?, single_char(off)?))
    }
}

fn single_char(s: &str) -> Result<char, GridError> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(ch),
        _ => Err(GridError::Glyph(s.to_string())),
    }
}

/// One line per image row, one character per pixel, every line newline-terminated
pub fn to_text(image: &GrayImage, glyphs: Glyphs) -> String {
    let (width, height) = image.dimensions();
    let per_char = glyphs.on.len_utf8().max(glyphs.off.len_utf8());
    let mut out = String::with_capacity(height as usize * (width as usize * per_char + 1));

    for row in image.rows() {
        for pixel in row {
            out.push(if pixel.0[0] >= ON_THRESHOLD {
                glyphs.on
            } else {
                glyphs.off
            });
        }
        out.push('\n');
    }

    out
}

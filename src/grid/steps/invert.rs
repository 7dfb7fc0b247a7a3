use crate::error::GridError;
use image::{imageops, GrayImage};

/// Swap ON and OFF pixels (`255 - v`)
pub fn apply(mut image: GrayImage) -> Result<GrayImage, GridError> {
    imageops::invert(&mut image);
    Ok(image)
}

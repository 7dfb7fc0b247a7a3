use crate::error::GridError;
use image::{
    imageops::{self, FilterType},
    GrayImage,
};

/// Resize to `(target_h, target_w)`
/// Shrinking averages source pixels per output cell, anything else is interpolated
pub fn apply(image: GrayImage, target: (u32, u32)) -> Result<GrayImage, GridError> {
    let (target_h, target_w) = target;
    let (width, height) = image.dimensions();

    if (target_w, target_h) == (width, height) {
        return Ok(image);
    }

    if target_w <= width && target_h <= height {
        return Ok(imageops::thumbnail(&image, target_w, target_h));
    }

    Ok(imageops::resize(&image, target_w, target_h, FilterType::Triangle))
}

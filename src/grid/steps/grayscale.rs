use crate::error::GridError;
use image::{DynamicImage, GrayImage};

/// Convert the decoded image to an 8-bit luma buffer
/// Alpha is dropped, everything downstream works on intensities only
pub fn apply(image: DynamicImage) -> Result<GrayImage, GridError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(GridError::Processing("image has no pixels".to_string()));
    }
    Ok(image.to_luma8())
}

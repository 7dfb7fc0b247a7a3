use super::oddize;
use crate::error::GridError;
use image::GrayImage;
use imageproc::filter::gaussian_blur_f32;

/// Gaussian blur with an odd kernel size, 0 or negative disables it
/// Denoises before thresholding
pub fn apply(image: GrayImage, ksize: i32) -> Result<GrayImage, GridError> {
    if ksize <= 0 {
        return Ok(image);
    }

    let k = oddize(ksize, 1);
    if k == 1 {
        return Ok(image);
    }

    Ok(gaussian_blur_f32(&image, sigma_for_kernel(k)))
}

/// Sigma implied by a kernel size when none is given explicitly
pub fn sigma_for_kernel(ksize: u32) -> f32 {
    0.3 * ((ksize as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

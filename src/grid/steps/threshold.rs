use super::{blur::sigma_for_kernel, oddize};
use crate::error::GridError;
use image::{GrayImage, Luma};
use imageproc::contrast::otsu_level;
use imageproc::edges::canny;
use imageproc::filter::{box_filter, gaussian_blur_f32};
use std::str::FromStr;

pub const DEFAULT_ADAPTIVE_BLOCK: i32 = 31;
pub const DEFAULT_ADAPTIVE_C: i32 = 5;
pub const DEFAULT_CANNY_LO: f32 = 100.0;
pub const DEFAULT_CANNY_HI: f32 = 200.0;

/// Binarization method names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    /// Global threshold chosen by Otsu's method
    #[default]
    Otsu,
    /// Threshold against the local block mean
    AdaptiveMean,
    /// Threshold against a Gaussian-weighted local average
    AdaptiveGaussian,
    /// Canny edges instead of filled regions
    Canny,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Otsu => "otsu",
            Self::AdaptiveMean => "adaptive_mean",
            Self::AdaptiveGaussian => "adaptive_gaussian",
            Self::Canny => "canny",
        }
    }
}

impl FromStr for Method {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "otsu" => Ok(Self::Otsu),
            "adaptive_mean" => Ok(Self::AdaptiveMean),
            "adaptive_gaussian" => Ok(Self::AdaptiveGaussian),
            "canny" => Ok(Self::Canny),
            _ => Err(GridError::UnknownMethod(s.to_string())),
        }
    }
}

/// Binarization settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdParams {
    pub method: Method,
    pub adaptive_block: i32,
    pub adaptive_c: i32,
    pub canny_lo: f32,
    pub canny_hi: f32,
}

impl Default for ThresholdParams {
    fn default() -> Self {
        Self {
            method: Method::Otsu,
            adaptive_block: DEFAULT_ADAPTIVE_BLOCK,
            adaptive_c: DEFAULT_ADAPTIVE_C,
            canny_lo: DEFAULT_CANNY_LO,
            canny_hi: DEFAULT_CANNY_HI,
        }
    }
}

/// Binarize to {0, 255} with the configured method
pub fn apply(image: GrayImage, params: &ThresholdParams) -> Result<GrayImage, GridError> {
    let binarized = match params.method {
        Method::Otsu => {
            let level = otsu_level(&image);
            tracing::debug!("Otsu level {}", level);
            threshold_above(&image, level)
        }
        Method::AdaptiveMean => {
            let block = oddize(params.adaptive_block, 3);
            let local = box_filter(&image, block / 2, block / 2);
            compare_local(&image, &local, params.adaptive_c)
        }
        Method::AdaptiveGaussian => {
            let block = oddize(params.adaptive_block, 3);
            let local = gaussian_blur_f32(&image, sigma_for_kernel(block));
            compare_local(&image, &local, params.adaptive_c)
        }
        Method::Canny => {
            // hysteresis needs lo <= hi
            let (lo, hi) = if params.canny_lo <= params.canny_hi {
                (params.canny_lo, params.canny_hi)
            } else {
                (params.canny_hi, params.canny_lo)
            };
            canny(&image, lo, hi)
        }
    };

    Ok(binarized)
}

/// 255 where the pixel is strictly above `level`, 0 elsewhere
pub fn threshold_above(image: &GrayImage, level: u8) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        if image.get_pixel(x, y).0[0] > level {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    })
}

/// 255 where `pixel > local - c`
fn compare_local(image: &GrayImage, local: &GrayImage, c: i32) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let pixel = image.get_pixel(x, y).0[0] as i32;
        let reference = local.get_pixel(x, y).0[0] as i32;
        if pixel > reference - c {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(method: Method) -> ThresholdParams {
        ThresholdParams {
            method,
            ..ThresholdParams::default()
        }
    }

    fn assert_binary(img: &GrayImage) {
        for pixel in img.pixels() {
            assert!(
                pixel.0[0] == 0 || pixel.0[0] == 255,
                "Expected binary pixel, got {}",
                pixel.0[0]
            );
        }
    }

    #[test]
    fn test_method_names_parse() {
        assert_eq!("otsu".parse::<Method>().unwrap(), Method::Otsu);
        assert_eq!("ADAPTIVE_MEAN".parse::<Method>().unwrap(), Method::AdaptiveMean);
        assert_eq!("adaptive_gaussian".parse::<Method>().unwrap(), Method::AdaptiveGaussian);
        assert_eq!("canny".parse::<Method>().unwrap(), Method::Canny);
        assert!(matches!("sobel".parse::<Method>(), Err(GridError::UnknownMethod(_))));
    }

    #[test]
    fn test_every_method_binarizes() {
        let img = GrayImage::from_fn(50, 50, |x, y| Luma([((x * 5 + y) % 256) as u8]));
        for method in [Method::Otsu, Method::AdaptiveMean, Method::AdaptiveGaussian, Method::Canny] {
            let result = apply(img.clone(), &params(method)).unwrap();
            assert_eq!(result.dimensions(), (50, 50));
            assert_binary(&result);
        }
    }

    #[test]
    fn test_otsu_splits_two_levels() {
        let img = GrayImage::from_fn(20, 10, |x, _| if x < 10 { Luma([30]) } else { Luma([220]) });
        let result = apply(img, &params(Method::Otsu)).unwrap();
        assert_eq!(result.get_pixel(2, 5).0[0], 0);
        assert_eq!(result.get_pixel(17, 5).0[0], 255);
    }

    #[test]
    fn test_adaptive_mean_picks_out_dark_text() {
        // dark line on light background
        let mut img = GrayImage::from_pixel(50, 20, Luma([240]));
        for x in 10..40 {
            img.put_pixel(x, 10, Luma([20]));
        }

        let mut p = params(Method::AdaptiveMean);
        p.adaptive_block = 14; // corrected to 15
        let result = apply(img, &p).unwrap();

        assert_eq!(result.get_pixel(25, 10).0[0], 0);
        assert_eq!(result.get_pixel(25, 3).0[0], 255);
    }

    #[test]
    fn test_canny_marks_edges_only() {
        let img = GrayImage::from_fn(40, 40, |x, _| if x < 20 { Luma([0]) } else { Luma([255]) });
        let result = apply(img, &params(Method::Canny)).unwrap();

        let on_edge = (18..22).any(|x| result.get_pixel(x, 20).0[0] == 255);
        assert!(on_edge, "expected an edge near the step");
        assert_eq!(result.get_pixel(5, 20).0[0], 0);
        assert_eq!(result.get_pixel(35, 20).0[0], 0);
    }

    #[test]
    fn test_threshold_above_is_strict() {
        let img = GrayImage::from_fn(3, 1, |x, _| Luma([127 + x as u8]));
        let result = threshold_above(&img, 128);
        assert_eq!(result.get_pixel(0, 0).0[0], 0);
        assert_eq!(result.get_pixel(1, 0).0[0], 0);
        assert_eq!(result.get_pixel(2, 0).0[0], 255);
    }
}

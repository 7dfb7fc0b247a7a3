use super::oddize;
use crate::error::GridError;
use image::GrayImage;
use imageproc::distance_transform::Norm;
use imageproc::morphology::{dilate, erode};
use std::str::FromStr;

pub const DEFAULT_KSIZE: i32 = 3;
pub const DEFAULT_ITERATIONS: i32 = 1;

/// Morphological operation applied after binarization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MorphOp {
    #[default]
    None,
    /// Erode then dilate, removes specks
    Open,
    /// Dilate then erode, fills small holes
    Close,
    Erode,
    Dilate,
}

impl MorphOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Open => "open",
            Self::Close => "close",
            Self::Erode => "erode",
            Self::Dilate => "dilate",
        }
    }
}

impl FromStr for MorphOp {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "open" => Ok(Self::Open),
            "close" => Ok(Self::Close),
            "erode" => Ok(Self::Erode),
            "dilate" => Ok(Self::Dilate),
            _ => Err(GridError::UnknownMorph(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MorphParams {
    pub op: MorphOp,
    pub ksize: i32,
    pub iterations: i32,
}

impl Default for MorphParams {
    fn default() -> Self {
        Self {
            op: MorphOp::None,
            ksize: DEFAULT_KSIZE,
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

impl MorphParams {
    pub fn is_noop(&self) -> bool {
        self.op == MorphOp::None || self.iterations <= 0
    }
}

/// Apply the operation with a square kernel, repeated `iterations` times
pub fn apply(image: GrayImage, params: &MorphParams) -> Result<GrayImage, GridError> {
    if params.is_noop() {
        return Ok(image);
    }

    let k = oddize(params.ksize, 1);
    // LInf ball of radius r is a (2r + 1) square
    let radius = u8::try_from(k / 2).map_err(|_| {
        GridError::Processing(format!("morphology kernel size {} is too large", k))
    })?;
    let n = params.iterations as usize;

    let result = match params.op {
        MorphOp::None => image,
        MorphOp::Erode => repeat(image, n, |img| erode(img, Norm::LInf, radius)),
        MorphOp::Dilate => repeat(image, n, |img| dilate(img, Norm::LInf, radius)),
        MorphOp::Open => {
            let eroded = repeat(image, n, |img| erode(img, Norm::LInf, radius));
            repeat(eroded, n, |img| dilate(img, Norm::LInf, radius))
        }
        MorphOp::Close => {
            let dilated = repeat(image, n, |img| dilate(img, Norm::LInf, radius));
            repeat(dilated, n, |img| erode(img, Norm::LInf, radius))
        }
    };

    Ok(result)
}

fn repeat<F>(image: GrayImage, times: usize, op: F) -> GrayImage
where
    F: Fn(&GrayImage) -> GrayImage,
{
    (0..times).fold(image, |img, _| op(&img))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn count_on(img: &GrayImage) -> usize {
        img.pixels().filter(|p| p.0[0] == 255).count()
    }

    fn single_dot() -> GrayImage {
        let mut img = GrayImage::new(11, 11);
        img.put_pixel(5, 5, Luma([255]));
        img
    }

    fn with_op(op: MorphOp, ksize: i32, iterations: i32) -> MorphParams {
        MorphParams { op, ksize, iterations }
    }

    #[test]
    fn test_morph_names_parse() {
        assert_eq!("open".parse::<MorphOp>().unwrap(), MorphOp::Open);
        assert_eq!("Close".parse::<MorphOp>().unwrap(), MorphOp::Close);
        assert_eq!("none".parse::<MorphOp>().unwrap(), MorphOp::None);
        assert!(matches!("blur".parse::<MorphOp>(), Err(GridError::UnknownMorph(_))));
    }

    #[test]
    fn test_dilate_grows_square() {
        let result = apply(single_dot(), &with_op(MorphOp::Dilate, 3, 1)).unwrap();
        assert_eq!(count_on(&result), 9);
    }

    #[test]
    fn test_even_kernel_rounded_up() {
        // ksize 4 behaves as 5
        let result = apply(single_dot(), &with_op(MorphOp::Dilate, 4, 1)).unwrap();
        assert_eq!(count_on(&result), 25);
    }

    #[test]
    fn test_iterations_repeat_operation() {
        let result = apply(single_dot(), &with_op(MorphOp::Dilate, 3, 2)).unwrap();
        assert_eq!(count_on(&result), 25);
    }

    #[test]
    fn test_erode_and_open_remove_isolated_pixel() {
        assert_eq!(count_on(&apply(single_dot(), &with_op(MorphOp::Erode, 3, 1)).unwrap()), 0);
        assert_eq!(count_on(&apply(single_dot(), &with_op(MorphOp::Open, 3, 1)).unwrap()), 0);
    }

    #[test]
    fn test_open_keeps_solid_block() {
        let img = GrayImage::from_fn(15, 15, |x, y| {
            if (5..10).contains(&x) && (5..10).contains(&y) {
                Luma([255])
            } else {
                Luma([0])
            }
        });
        let result = apply(img.clone(), &with_op(MorphOp::Open, 3, 1)).unwrap();
        assert_eq!(result, img);
    }

    #[test]
    fn test_close_fills_pinhole() {
        let mut img = GrayImage::from_fn(15, 15, |x, y| {
            if (3..12).contains(&x) && (3..12).contains(&y) {
                Luma([255])
            } else {
                Luma([0])
            }
        });
        img.put_pixel(7, 7, Luma([0]));
        let result = apply(img, &with_op(MorphOp::Close, 3, 1)).unwrap();
        assert_eq!(result.get_pixel(7, 7).0[0], 255);
    }

    #[test]
    fn test_none_or_non_positive_iterations_pass_through() {
        let img = single_dot();
        assert_eq!(apply(img.clone(), &with_op(MorphOp::None, 3, 1)).unwrap(), img);
        assert_eq!(apply(img.clone(), &with_op(MorphOp::Dilate, 3, 0)).unwrap(), img);
        assert_eq!(apply(img.clone(), &with_op(MorphOp::Erode, 3, -2)).unwrap(), img);
    }
}

//! Individual pipeline steps

pub mod blur;
pub mod clahe;
pub mod grayscale;
pub mod invert;
pub mod morphology;
pub mod resize;
pub mod threshold;

/// Force a kernel size to be odd and at least `minimum`, rounding up
pub fn oddize(n: i32, minimum: i32) -> u32 {
    let n = n.max(minimum).max(0);
    let n = if n % 2 == 0 { n + 1 } else { n };
    n as u32
}

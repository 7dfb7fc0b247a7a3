use crate::error::GridError;
use image::{GrayImage, Luma};

pub const DEFAULT_CLIP_LIMIT: f32 = 2.0;
pub const DEFAULT_GRID: u32 = 8;

/// Contrast-limited adaptive histogram equalization
///
/// The image is split into a `grid` x `grid` set of tiles. Each tile gets its own
/// equalization lookup table from a histogram clipped at `clip_limit` times the
/// average bin height, with the clipped excess spread evenly across all bins.
/// Pixels are mapped by bilinear interpolation between the four nearest tile
/// tables so tile borders do not show. A non-positive `clip_limit` disables clipping.
pub fn apply(image: GrayImage, clip_limit: f32, grid: u32) -> Result<GrayImage, GridError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Ok(image);
    }

    let tiling = Tiling::new(width, height, grid.max(1));
    let luts = tile_luts(&image, &tiling, clip_limit);

    let inv_tw = 1.0 / tiling.tile_w as f32;
    let inv_th = 1.0 / tiling.tile_h as f32;

    let result = GrayImage::from_fn(width, height, |x, y| {
        let (ty1, ty2, ya) = neighbours(y as f32 * inv_th - 0.5, tiling.tiles_y);
        let (tx1, tx2, xa) = neighbours(x as f32 * inv_tw - 0.5, tiling.tiles_x);
        let v = image.get_pixel(x, y).0[0] as usize;

        let lut = |tx: u32, ty: u32| luts[(ty * tiling.tiles_x + tx) as usize][v] as f32;
        let top = lut(tx1, ty1) * (1.0 - xa) + lut(tx2, ty1) * xa;
        let bottom = lut(tx1, ty2) * (1.0 - xa) + lut(tx2, ty2) * xa;
        let value = top * (1.0 - ya) + bottom * ya;

        Luma([value.round().clamp(0.0, 255.0) as u8])
    });

    Ok(result)
}

struct Tiling {
    tiles_x: u32,
    tiles_y: u32,
    tile_w: u32,
    tile_h: u32,
}

impl Tiling {
    /// Tiles never outnumber pixels along an axis, and none is empty
    fn new(width: u32, height: u32, grid: u32) -> Self {
        let tile_w = width.div_ceil(grid.min(width));
        let tile_h = height.div_ceil(grid.min(height));
        Self {
            tiles_x: width.div_ceil(tile_w),
            tiles_y: height.div_ceil(tile_h),
            tile_w,
            tile_h,
        }
    }
}

fn tile_luts(image: &GrayImage, tiling: &Tiling, clip_limit: f32) -> Vec<[u8; 256]> {
    let (width, height) = image.dimensions();
    let mut luts = Vec::with_capacity((tiling.tiles_x * tiling.tiles_y) as usize);

    for ty in 0..tiling.tiles_y {
        for tx in 0..tiling.tiles_x {
            let x0 = tx * tiling.tile_w;
            let y0 = ty * tiling.tile_h;
            let x1 = (x0 + tiling.tile_w).min(width);
            let y1 = (y0 + tiling.tile_h).min(height);
            let area = (x1 - x0) * (y1 - y0);

            let mut hist = [0u32; 256];
            for y in y0..y1 {
                for x in x0..x1 {
                    hist[image.get_pixel(x, y).0[0] as usize] += 1;
                }
            }

            if clip_limit > 0.0 {
                let clip = ((clip_limit * area as f32 / 256.0) as u32).max(1);
                clip_histogram(&mut hist, clip);
            }

            luts.push(equalization_lut(&hist, area));
        }
    }

    luts
}

fn clip_histogram(hist: &mut [u32; 256], clip: u32) {
    let mut excess = 0u32;
    for bin in hist.iter_mut() {
        if *bin > clip {
            excess += *bin - clip;
            *bin = clip;
        }
    }

    let per_bin = excess / 256;
    let mut residual = excess % 256;
    for bin in hist.iter_mut() {
        *bin += per_bin;
    }

    if residual > 0 {
        let step = (256 / residual as usize).max(1);
        for bin in hist.iter_mut().step_by(step) {
            if residual == 0 {
                break;
            }
            *bin += 1;
            residual -= 1;
        }
    }
}

fn equalization_lut(hist: &[u32; 256], area: u32) -> [u8; 256] {
    let scale = 255.0 / area.max(1) as f32;
    let mut lut = [0u8; 256];
    let mut cdf = 0u32;
    for (entry, &count) in lut.iter_mut().zip(hist.iter()) {
        cdf += count;
        *entry = (cdf as f32 * scale).round().min(255.0) as u8;
    }
    lut
}

/// Tile indices on either side of a fractional tile coordinate plus the blend weight
fn neighbours(pos: f32, tiles: u32) -> (u32, u32, f32) {
    let floor = pos.floor();
    let weight = pos - floor;
    let lo = (floor as i64).max(0) as u32;
    let hi = ((floor as i64 + 1).max(0) as u32).min(tiles - 1);
    (lo.min(tiles - 1), hi, weight)
}

use crate::processing::frame::{crop_region, paste_region, BoundingBox, Frame};
use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use std::fmt;

/// Default Gaussian sigma for the tracked-region blur (heavy on purpose)
pub const DEFAULT_BLUR_SIGMA: f32 = 12.0;

/// Default pixelation block edge in pixels
pub const DEFAULT_BLOCK_SIZE: u32 = 10;

// Sepia colour matrix, rows produce R, G, B from (R, G, B).
// Expects RGB channel order; BGR data comes out tinted blue.
const SEPIA_MATRIX: [[f32; 3]; 3] = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];

/// Effect applied to every successfully tracked region
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RegionEffect {
    Blur { sigma: f32 },
    Pixelate { block_size: u32 },
    Sepia,
}

impl Default for RegionEffect {
    fn default() -> Self {
        RegionEffect::Blur {
            sigma: DEFAULT_BLUR_SIGMA,
        }
    }
}

impl fmt::Display for RegionEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionEffect::Blur { sigma } => write!(f, "blur (sigma {:.1})", sigma),
            RegionEffect::Pixelate { block_size } => write!(f, "pixelate ({}px blocks)", block_size),
            RegionEffect::Sepia => write!(f, "sepia"),
        }
    }
}

impl RegionEffect {
    /// Short name used in reports
    pub fn name(&self) -> &'static str {
        match self {
            RegionEffect::Blur { .. } => "blur",
            RegionEffect::Pixelate { .. } => "pixelate",
            RegionEffect::Sepia => "sepia",
        }
    }

    /// Transform a region, returning an image of the same size
    pub fn apply(&self, region: &RgbImage) -> RgbImage {
        match *self {
            RegionEffect::Blur { sigma } => imageops::blur(region, sigma),
            RegionEffect::Pixelate { block_size } => pixelate(region, block_size),
            RegionEffect::Sepia => sepia(region),
        }
    }

    /// Apply the effect to the part of `frame` under `bbox`, in place.
    ///
    /// Returns false when the box does not overlap the frame.
    pub fn apply_in_place(&self, frame: &mut Frame, bbox: &BoundingBox) -> bool {
        let Some(clipped) = bbox.clip(frame.width(), frame.height()) else {
            return false;
        };

        let region = crop_region(frame, &clipped);
        let transformed = self.apply(&region);
        paste_region(frame, &transformed, &clipped);
        true
    }
}

/// Downsample by `block_size` then scale back up with nearest-neighbour
pub fn pixelate(region: &RgbImage, block_size: u32) -> RgbImage {
    let (width, height) = region.dimensions();
    if width == 0 || height == 0 {
        return region.clone();
    }

    let block_size = block_size.max(1);
    let small_width = (width / block_size).max(1);
    let small_height = (height / block_size).max(1);

    let small = imageops::resize(region, small_width, small_height, FilterType::Triangle);
    imageops::resize(&small, width, height, FilterType::Nearest)
}

/// Apply the sepia colour matrix to every pixel
pub fn sepia(region: &RgbImage) -> RgbImage {
    let mut out = region.clone();
    for pixel in out.pixels_mut() {
        let input = [pixel[0] as f32, pixel[1] as f32, pixel[2] as f32];
        let mut result = [0u8; 3];
        for (channel, row) in SEPIA_MATRIX.iter().enumerate() {
            let value = row[0] * input[0] + row[1] * input[1] + row[2] * input[2];
            result[channel] = value.round().clamp(0.0, 255.0) as u8;
        }
        *pixel = Rgb(result);
    }
    out
}

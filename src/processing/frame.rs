//! Frame type and bounding-box geometry shared by the pipeline stages.

use anyhow::{Context, Result};
use image::imageops::{self, FilterType};
use image::RgbImage;
use std::fmt;
use std::str::FromStr;

/// A decoded video frame (8-bit RGB, row-major)
pub type Frame = RgbImage;

/// Axis-aligned box in frame pixel coordinates (top-left + size)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Center point, rounded down like the trail renderer expects
    pub fn center(&self) -> (i32, i32) {
        (
            self.x + (self.width / 2) as i32,
            self.y + (self.height / 2) as i32,
        )
    }

    /// Intersect with a `width` x `height` frame.
    ///
    /// Returns `None` when nothing of the box lies inside the frame.
    pub fn clip(&self, width: u32, height: u32) -> Option<BoundingBox> {
        let left = i64::from(self.x).max(0);
        let top = i64::from(self.y).max(0);
        let right = (i64::from(self.x) + i64::from(self.width)).min(i64::from(width));
        let bottom = (i64::from(self.y) + i64::from(self.height)).min(i64::from(height));

        if right <= left || bottom <= top {
            return None;
        }

        Some(BoundingBox {
            x: left as i32,
            y: top as i32,
            width: (right - left) as u32,
            height: (bottom - top) as u32,
        })
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.x, self.y, self.width, self.height)
    }
}

/// Parse `x,y,w,h` (whitespace around fields is ignored)
impl FromStr for BoundingBox {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let fields: Vec<&str> = s.split(',').map(str::trim).collect();
        if fields.len() != 4 {
            anyhow::bail!("Expected x,y,w,h but got {:?}", s);
        }

        let x = fields[0]
            .parse()
            .with_context(|| format!("Invalid x in {:?}", s))?;
        let y = fields[1]
            .parse()
            .with_context(|| format!("Invalid y in {:?}", s))?;
        let width = fields[2]
            .parse()
            .with_context(|| format!("Invalid width in {:?}", s))?;
        let height = fields[3]
            .parse()
            .with_context(|| format!("Invalid height in {:?}", s))?;

        Ok(Self::new(x, y, width, height))
    }
}

/// Rescale a frame to exactly `width` x `height`, leaving it untouched if it
/// already matches.
pub fn fit_to_dimensions(frame: Frame, width: u32, height: u32) -> Frame {
    if frame.dimensions() == (width, height) {
        return frame;
    }

    tracing::trace!(
        from_width = frame.width(),
        from_height = frame.height(),
        width,
        height,
        "rescaling frame to sink dimensions"
    );
    // Triangle is the closest filter the image crate has to area averaging
    imageops::resize(&frame, width, height, FilterType::Triangle)
}

/// Copy the pixels under `bbox` out of the frame. `bbox` must already be clipped.
pub fn crop_region(frame: &Frame, bbox: &BoundingBox) -> RgbImage {
    imageops::crop_imm(frame, bbox.x as u32, bbox.y as u32, bbox.width, bbox.height).to_image()
}

/// Paste `region` back into the frame with its top-left at the box origin
pub fn paste_region(frame: &mut Frame, region: &RgbImage, bbox: &BoundingBox) {
    imageops::replace(frame, region, i64::from(bbox.x), i64::from(bbox.y));
}

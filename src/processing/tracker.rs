//! Single-object trackers.
//!
//! The pipeline only relies on the [`Tracker`] / [`TrackerFactory`] traits.
//! [`TemplateTracker`] is the built-in implementation: it remembers the pixels
//! of the initial box and finds the best matching position (mean absolute
//! luma difference) in a window around the previous position.

use crate::processing::frame::{BoundingBox, Frame};

/// Follows one object from frame to frame
pub trait Tracker {
    /// Locate the object in `frame`. `None` means the object was lost this frame.
    fn update(&mut self, frame: &Frame) -> Option<BoundingBox>;
}

/// Creates a tracker bound to the object under `bbox` in `frame`
pub trait TrackerFactory {
    fn create(&self, frame: &Frame, bbox: BoundingBox) -> Box<dyn Tracker>;
}

impl<F> TrackerFactory for F
where
    F: Fn(&Frame, BoundingBox) -> Box<dyn Tracker>,
{
    fn create(&self, frame: &Frame, bbox: BoundingBox) -> Box<dyn Tracker> {
        self(frame, bbox)
    }
}

/// Configuration for template tracking
#[derive(Debug, Clone)]
pub struct TemplateTrackerConfig {
    /// How far (pixels) the object may move between two frames
    pub search_margin: u32,
    /// Stride of the coarse search pass; refined with stride 1 afterwards
    pub coarse_step: u32,
    /// Best match must have a mean absolute luma difference at or below this
    pub max_mean_difference: f32,
}

impl Default for TemplateTrackerConfig {
    fn default() -> Self {
        Self {
            search_margin: 24,
            coarse_step: 2,
            max_mean_difference: 40.0,
        }
    }
}

/// Builds [`TemplateTracker`]s sharing one configuration
#[derive(Debug, Clone, Default)]
pub struct TemplateTrackerFactory {
    pub config: TemplateTrackerConfig,
}

impl TrackerFactory for TemplateTrackerFactory {
    fn create(&self, frame: &Frame, bbox: BoundingBox) -> Box<dyn Tracker> {
        Box::new(TemplateTracker::new(frame, bbox, self.config.clone()))
    }
}

pub struct TemplateTracker {
    template: Vec<u8>,
    bbox: BoundingBox,
    config: TemplateTrackerConfig,
}

impl TemplateTracker {
    pub fn new(frame: &Frame, bbox: BoundingBox, config: TemplateTrackerConfig) -> Self {
        let bbox = bbox
            .clip(frame.width(), frame.height())
            .unwrap_or_default();
        let template = if bbox.is_empty() {
            Vec::new()
        } else {
            luma_window(frame, bbox.x as u32, bbox.y as u32, bbox.width, bbox.height)
        };

        Self {
            template,
            bbox,
            config,
        }
    }

    /// Last position where the object was found
    #[cfg(test)]
    pub fn last_position(&self) -> BoundingBox {
        self.bbox
    }
}

impl Tracker for TemplateTracker {
    fn update(&mut self, frame: &Frame) -> Option<BoundingBox> {
        if self.template.is_empty() {
            return None;
        }

        let (tw, th) = (self.bbox.width, self.bbox.height);
        if frame.width() < tw || frame.height() < th {
            return None;
        }

        // Range of candidate top-left corners that keep the template inside the frame
        let margin = self.config.search_margin as i64;
        let max_x = i64::from(frame.width() - tw);
        let max_y = i64::from(frame.height() - th);
        let min_cx = (i64::from(self.bbox.x) - margin).clamp(0, max_x) as u32;
        let max_cx = (i64::from(self.bbox.x) + margin).clamp(0, max_x) as u32;
        let min_cy = (i64::from(self.bbox.y) - margin).clamp(0, max_y) as u32;
        let max_cy = (i64::from(self.bbox.y) + margin).clamp(0, max_y) as u32;

        let window_width = max_cx - min_cx + tw;
        let window_height = max_cy - min_cy + th;
        let window = luma_window(frame, min_cx, min_cy, window_width, window_height);
        let search = SearchWindow {
            luma: &window,
            width: window_width,
            template: &self.template,
            template_width: tw,
            template_height: th,
        };

        let step = self.config.coarse_step.max(1);
        let mut best: Option<(u64, u32, u32)> = None;

        let mut oy = 0;
        while oy <= max_cy - min_cy {
            let mut ox = 0;
            while ox <= max_cx - min_cx {
                best = search.consider(ox, oy, best);
                ox += step;
            }
            oy += step;
        }

        // Refine around the coarse winner
        if step > 1 {
            if let Some((_, bx, by)) = best {
                let spread = step;
                let y_end = (by + spread).min(max_cy - min_cy);
                let x_end = (bx + spread).min(max_cx - min_cx);
                for oy in by.saturating_sub(spread)..=y_end {
                    for ox in bx.saturating_sub(spread)..=x_end {
                        best = search.consider(ox, oy, best);
                    }
                }
            }
        }

        let (sum, bx, by) = best?;
        let mean = sum as f32 / (tw * th) as f32;
        if mean > self.config.max_mean_difference {
            tracing::trace!(mean, "template match too weak");
            return None;
        }

        self.bbox = BoundingBox::new((min_cx + bx) as i32, (min_cy + by) as i32, tw, th);
        Some(self.bbox)
    }
}

struct SearchWindow<'a> {
    luma: &'a [u8],
    width: u32,
    template: &'a [u8],
    template_width: u32,
    template_height: u32,
}

impl SearchWindow<'_> {
    /// Score the template at (ox, oy); keep whichever of this and `best` is lower
    fn consider(&self, ox: u32, oy: u32, best: Option<(u64, u32, u32)>) -> Option<(u64, u32, u32)> {
        let limit = best.map_or(u64::MAX, |(sum, _, _)| sum);
        match self.difference(ox, oy, limit) {
            Some(sum) if sum < limit => Some((sum, ox, oy)),
            _ => best,
        }
    }

    /// Sum of absolute differences, giving up once it exceeds `limit`
    fn difference(&self, ox: u32, oy: u32, limit: u64) -> Option<u64> {
        let tw = self.template_width as usize;
        let mut sum = 0u64;

        for row in 0..self.template_height as usize {
            let start = (oy as usize + row) * self.width as usize + ox as usize;
            let candidate = &self.luma[start..start + tw];
            let template = &self.template[row * tw..(row + 1) * tw];

            sum += candidate
                .iter()
                .zip(template)
                .map(|(a, b)| u64::from(a.abs_diff(*b)))
                .sum::<u64>();

            if sum > limit {
                return None;
            }
        }

        Some(sum)
    }
}

/// Row-major luma of a sub-rectangle (which must lie inside the frame)
fn luma_window(frame: &Frame, x: u32, y: u32, width: u32, height: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity((width * height) as usize);
    for py in y..y + height {
        for px in x..x + width {
            let p = frame.get_pixel(px, py);
            let luma = (299 * u32::from(p[0]) + 587 * u32::from(p[1]) + 114 * u32::from(p[2])) / 1000;
            out.push(luma as u8);
        }
    }
    out
}

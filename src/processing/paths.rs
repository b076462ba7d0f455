//! Motion trails for tracked objects.
//!
//! Each object keeps its most recent center points; the trail is drawn as
//! connected line segments on the composited frame.

use crate::processing::frame::Frame;
use image::Rgb;
use imageproc::drawing::draw_line_segment_mut;
use std::collections::{BTreeMap, VecDeque};

/// Maximum number of points kept per object
pub const MAX_PATH_LEN: usize = 50;

/// Configuration for trail rendering
pub struct TrailStyle {
    pub color: Rgb<u8>,
    /// Stroke thickness in pixels
    pub thickness: u32,
}

impl Default for TrailStyle {
    fn default() -> Self {
        Self {
            color: Rgb([0, 255, 0]),
            thickness: 2,
        }
    }
}

/// Capped center-point history for every tracked object, keyed by object id
#[derive(Debug, Clone, Default)]
pub struct PathHistory {
    paths: BTreeMap<u32, VecDeque<(i32, i32)>>,
}

impl PathHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a point, evicting the oldest once the cap is reached
    pub fn push(&mut self, object_id: u32, point: (i32, i32)) {
        let path = self
            .paths
            .entry(object_id)
            .or_insert_with(|| VecDeque::with_capacity(MAX_PATH_LEN));
        if path.len() == MAX_PATH_LEN {
            path.pop_front();
        }
        path.push_back(point);
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &VecDeque<(i32, i32)>)> {
        self.paths.iter().map(|(id, path)| (*id, path))
    }

    /// Draw every object's trail onto the frame
    pub fn draw(&self, frame: &mut Frame, style: &TrailStyle) {
        for path in self.paths.values() {
            for (start, end) in path.iter().zip(path.iter().skip(1)) {
                draw_thick_segment(frame, *start, *end, style);
            }
        }
    }
}

#[cfg(test)]
impl PathHistory {
    pub fn get(&self, object_id: u32) -> Option<&VecDeque<(i32, i32)>> {
        self.paths.get(&object_id)
    }

    pub fn len(&self, object_id: u32) -> usize {
        self.paths.get(&object_id).map_or(0, VecDeque::len)
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Line segment widened by stacking 1px lines offset along both axes
fn draw_thick_segment(frame: &mut Frame, start: (i32, i32), end: (i32, i32), style: &TrailStyle) {
    let thickness = style.thickness.max(1) as i32;
    let first = -(thickness - 1) / 2;

    for offset in first..first + thickness {
        let o = offset as f32;
        draw_line_segment_mut(
            frame,
            (start.0 as f32 + o, start.1 as f32),
            (end.0 as f32 + o, end.1 as f32),
            style.color,
        );
        draw_line_segment_mut(
            frame,
            (start.0 as f32, start.1 as f32 + o),
            (end.0 as f32, end.1 as f32 + o),
            style.color,
        );
    }
}

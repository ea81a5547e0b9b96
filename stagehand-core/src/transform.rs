//! Time-sampled transforms carried by group nodes

use glam::Mat4;
use serde::{Deserialize, Serialize};

/// A single keyframe: rotation in degrees at a frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSample {
    pub frame: i32,
    pub degrees: f32,
}

/// Transform of a group node. Only a Y rotation op is authored by stagehand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    rotate_y: Vec<TimeSample>,
}

impl Transform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Author a Y rotation sample, replacing any sample already at `frame`
    pub fn set_rotate_y(&mut self, frame: i32, degrees: f32) {
        match self.rotate_y.binary_search_by_key(&frame, |s| s.frame) {
            Ok(index) => self.rotate_y[index].degrees = degrees,
            Err(index) => self.rotate_y.insert(index, TimeSample { frame, degrees }),
        }
    }

    /// Samples sorted by frame
    pub fn rotate_y_samples(&self) -> &[TimeSample] {
        &self.rotate_y
    }

    pub fn is_animated(&self) -> bool {
        self.rotate_y.len() > 1
    }

    /// Y rotation at `frame`, linearly interpolated between samples and held
    /// outside the sampled range
    pub fn rotate_y_at(&self, frame: f32) -> f32 {
        let (first, last) = match (self.rotate_y.first(), self.rotate_y.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return 0.0,
        };

        if frame <= first.frame as f32 {
            return first.degrees;
        }
        if frame >= last.frame as f32 {
            return last.degrees;
        }

        for pair in self.rotate_y.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if frame >= a.frame as f32 && frame <= b.frame as f32 {
                let t = (frame - a.frame as f32) / (b.frame - a.frame) as f32;
                return a.degrees + (b.degrees - a.degrees) * t;
            }
        }

        last.degrees
    }

    /// Local matrix at `frame`
    pub fn matrix_at(&self, frame: f32) -> Mat4 {
        Mat4::from_rotation_y(self.rotate_y_at(frame).to_radians())
    }
}

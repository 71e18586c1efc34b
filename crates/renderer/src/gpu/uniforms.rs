use bytemuck::{Pod, Zeroable};
use tracing::trace;

use crate::runtime::TimeSample;

/// CPU mirror of the `QuadParams` uniform block injected by `compile.rs`.
///
/// The std140 layout packs `_iTime` into the padding slot after the vec3
/// resolution, so the struct is exactly 32 bytes with no implicit padding.
#[repr(C, align(16))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct QuadUniforms {
    resolution: [f32; 3],
    time: f32,
    time_delta: f32,
    frame: i32,
    frame_rate: u32,
    _padding0: f32,
}

unsafe impl Zeroable for QuadUniforms {}
unsafe impl Pod for QuadUniforms {}

impl QuadUniforms {
    pub(crate) fn new(width: u32, height: u32) -> Self {
        Self {
            resolution: [width as f32, height as f32, 1.0],
            time: 0.0,
            time_delta: 0.0,
            frame: 0,
            frame_rate: 0,
            _padding0: 0.0,
        }
    }

    /// Updates the resolution; the third component stays pinned at 1.0.
    pub(crate) fn set_resolution(&mut self, width: f32, height: f32) {
        self.resolution = [width, height, 1.0];
    }

    pub(crate) fn resolution(&self) -> [f32; 3] {
        self.resolution
    }

    /// Applies a frame's time sample to the block.
    pub(crate) fn update_time(&mut self, sample: TimeSample, delta_seconds: f32) {
        self.set_float("iTime", sample.seconds);
        self.set_float("iTimeDelta", delta_seconds);
        self.set_int("iFrame", sample.frame_index.min(i32::MAX as u64) as i32);
    }

    /// Uploads a boolean uniform as a 0/1 integer, GL style.
    pub(crate) fn set_bool(&mut self, name: &str, value: bool) {
        self.set_int(name, i32::from(value));
    }

    pub(crate) fn set_int(&mut self, name: &str, value: i32) {
        match name {
            "iFrame" => self.frame = value,
            other => Self::ignore(other),
        }
    }

    pub(crate) fn set_unsigned_int(&mut self, name: &str, value: u32) {
        match name {
            "iFrameRate" => self.frame_rate = value,
            other => Self::ignore(other),
        }
    }

    pub(crate) fn set_float(&mut self, name: &str, value: f32) {
        match name {
            "iTime" => self.time = value,
            "iTimeDelta" => self.time_delta = value,
            other => Self::ignore(other),
        }
    }

    /// A name with no active uniform is a silent no-op, matching how GL
    /// treats `glGetUniformLocation` misses.
    fn ignore(name: &str) {
        trace!(name, "no active uniform with this name; ignoring");
    }
}

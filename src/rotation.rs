//! Rotation Model
//!
//! The polygon is rotated about a configurable center either by a fixed angle
//! (absolute mode) or by a continuously accumulating angle (spin mode, where the
//! rotation parameter is a rate in degrees per second). Spin mode picks up
//! from whatever angle is current when it is entered, so the outline never
//! jumps on that transition. Every angle is kept normalized to `(-360, 360]`.

use crate::geometry::Point;
use core::f32::consts::PI;
use libm::{cosf, roundf, sinf};
use serde::{Deserialize, Serialize};

const FULL_TURN_DEG: f32 = 360.0;

/// Rotation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RotationMode {
    /// The rotation parameter is an angle in degrees
    #[default]
    Absolute,
    /// The rotation parameter is a spin rate in degrees per second
    Spin,
}

/// Wrap an angle into `(-360, 360]` by removing the nearest whole number of turns
pub fn normalize_degrees(degrees: f32) -> f32 {
    if degrees > FULL_TURN_DEG || degrees <= -FULL_TURN_DEG {
        let turns = roundf(degrees.abs() / FULL_TURN_DEG);
        if degrees >= 0.0 {
            degrees - turns * FULL_TURN_DEG
        } else {
            degrees + turns * FULL_TURN_DEG
        }
    } else {
        degrees
    }
}

/// Current rotation angle and mode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    mode: RotationMode,
    degrees: f32,
    radians: f32,
}

impl Default for Rotation {
    fn default() -> Self {
        Self::new()
    }
}

impl Rotation {
    pub const fn new() -> Self {
        Self {
            mode: RotationMode::Absolute,
            degrees: 0.0,
            radians: 0.0,
        }
    }

    pub fn mode(&self) -> RotationMode {
        self.mode
    }

    pub fn is_absolute(&self) -> bool {
        self.mode == RotationMode::Absolute
    }

    /// Normalized angle in degrees
    pub fn degrees(&self) -> f32 {
        self.degrees
    }

    pub fn radians(&self) -> f32 {
        self.radians
    }

    /// Set the effective angle, normalizing it and refreshing the radian cache
    pub fn set_degrees(&mut self, degrees: f32) {
        self.degrees = normalize_degrees(degrees);
        self.radians = self.degrees / 180.0 * PI;
    }

    /// Handle a change of the rotation parameter.
    ///
    /// The parameter is sign-inverted: positive values turn clockwise. In spin
    /// mode the change itself also counts as one sample period of rotation.
    pub fn on_param_changed(&mut self, param_deg: f32, sample_rate: f32) {
        let target = -param_deg;
        match self.mode {
            RotationMode::Absolute => self.set_degrees(target),
            RotationMode::Spin => self.spin_by(target / sample_rate),
        }
    }

    /// Switch mode. Entering absolute mode snaps to `param_deg`; entering spin
    /// mode keeps the current angle and accumulates from there.
    pub fn set_mode(&mut self, mode: RotationMode, param_deg: f32) {
        self.mode = mode;
        if mode == RotationMode::Absolute {
            self.set_degrees(-param_deg);
        }
    }

    /// Advance the spin angle by one sample period. No-op in absolute mode.
    pub fn advance(&mut self, rate_deg_per_sec: f32, sample_rate: f32) {
        if self.mode == RotationMode::Spin {
            self.spin_by(-rate_deg_per_sec / sample_rate);
        }
    }

    fn spin_by(&mut self, delta_deg: f32) {
        self.set_degrees(self.degrees + delta_deg);
    }

    /// Whether the transform is exactly the identity
    pub fn is_identity(&self) -> bool {
        self.degrees == 0.0 || self.degrees == FULL_TURN_DEG
    }

    /// Rotate `point` about `center`
    pub fn apply(&self, point: Point, center: Point) -> Point {
        if self.is_identity() {
            return point;
        }

        let sin = sinf(self.radians);
        let cos = cosf(self.radians);
        let d = point - center;
        Point::new(
            d.x * cos - d.y * sin + center.x,
            d.x * sin + d.y * cos + center.y,
        )
    }
}

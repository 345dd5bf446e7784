//! Geometry Engine
//!
//! The per-sample polygon tracer. Each call to [`EngineState::tick`] advances
//! the phase accumulators by one sample period and returns the next (X, Y)
//! point on the polygon outline.
//!
//! # Cyclic counters
//!
//! - `phase` - progress along the current outer edge, soft reset on wrap
//! - `inner_phase` - progress used for star interpolation, hard reset on wrap
//! - `curr_vertex` / `next_vertex` - the outer vertices bounding the edge
//!
//! All counters are re-validated every sample so that live changes to the
//! vertex count can never leave them pointing outside the polygon.

use crate::effective_sample_rate;
use crate::geometry::{Point, Shape};
use crate::rotation::Rotation;
use libm::{floorf, powf};
use serde::{Deserialize, Serialize};

/// Frequency at 0V pitch (C4)
pub const BASE_FREQ_HZ: f32 = 261.6256;

/// Lowest pitch voltage after summing CV and the frequency parameter
pub const MIN_PITCH_V: f32 = -5.0;

/// Highest pitch voltage after summing CV and the frequency parameter
pub const MAX_PITCH_V: f32 = 5.0;

/// Complete mutable state of one polygon voice
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineState {
    /// Progress along the current outer edge, `[0, 1)`
    pub phase: f32,
    /// Progress used for star interpolation, `[0, 1)`
    pub inner_phase: f32,
    pub curr_vertex: usize,
    pub next_vertex: usize,
    /// Which half of the edge is active: 0 before the inner vertex, 1 after
    pub inner_side: u8,

    pub shape: Shape,
    /// Post-rotation DC offset
    pub offset: Point,
    pub rotation_center: Point,
    pub rotation: Rotation,
    /// Live rotation parameter in degrees (absolute) or degrees/second (spin)
    pub rotation_param_deg: f32,

    /// Base pitch in volts, summed with the pitch CV input
    pub frequency_param_v: f32,
    /// Whether the host should keep its status bar visible over the preview
    pub top_bar_on: bool,
}

impl Default for EngineState {
    fn default() -> Self {
        Self {
            phase: 0.0,
            inner_phase: 0.0,
            curr_vertex: 0,
            next_vertex: 1,
            inner_side: 0,
            shape: Shape::default(),
            offset: Point::ORIGIN,
            rotation_center: Point::ORIGIN,
            rotation: Rotation::new(),
            rotation_param_deg: 0.0,
            frequency_param_v: 0.0,
            top_bar_on: true,
        }
    }
}

impl EngineState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the tracer to vertex 0 without touching any parameter-derived field
    pub fn reset(&mut self) {
        self.phase = 0.0;
        self.inner_phase = 0.0;
        self.curr_vertex = 0;
        self.next_vertex = 1 % self.shape.vertex_count();
        self.inner_side = 0;
    }

    /// Instantaneous frequency in Hz of edge traversal for the given pitch CV.
    ///
    /// One full polygon per pitch period, so the edge rate scales with the
    /// vertex count.
    pub fn frequency(&self, pitch_cv: f32) -> f32 {
        let voltage = (pitch_cv + self.frequency_param_v).clamp(MIN_PITCH_V, MAX_PITCH_V);
        powf(2.0, voltage) * BASE_FREQ_HZ * self.shape.vertex_count() as f32
    }

    /// Advance one sample period and return the output point
    pub fn tick(&mut self, pitch_cv: f32, sample_rate: f32) -> Point {
        let sample_rate = effective_sample_rate(sample_rate);

        self.rotation.advance(self.rotation_param_deg, sample_rate);

        let dt = self.frequency(pitch_cv) / sample_rate;
        self.phase += dt;
        self.inner_phase += dt;

        if self.inner_phase >= 1.0 {
            self.inner_phase = 0.0;
        }

        let new_corner = self.phase >= 1.0;
        if new_corner {
            self.phase -= 1.0;
            if self.phase >= 1.0 {
                // More than one edge per sample; keep only the fractional overshoot
                self.phase -= floorf(self.phase);
            }
            self.curr_vertex += 1;
            self.inner_phase = 0.0;
            self.inner_side = 0;
        }

        let n = self.shape.vertex_count();
        if self.curr_vertex >= n {
            self.curr_vertex = 0;
        }
        self.next_vertex = self.curr_vertex + 1;
        if self.next_vertex >= n {
            self.next_vertex = 0;
        }

        let point = self.edge_point(new_corner);
        self.rotation.apply(point, self.rotation_center) + self.offset
    }

    /// Unrotated point on the current edge
    fn edge_point(&mut self, new_corner: bool) -> Point {
        let this_outer = self.shape.outer_vertex(self.curr_vertex);
        let next_outer = self.shape.outer_vertex(self.next_vertex);

        let (this, next, fraction) = if self.shape.use_inner_vertices {
            let inner = self
                .shape
                .inner_vertex_between(self.curr_vertex, this_outer, next_outer);
            let inner_pos = self.shape.inner_position();
            let local = self.inner_phase.clamp(0.0, 1.0);

            if local < 0.5 {
                self.inner_side = 0;
                let fraction = if inner_pos > 0.0 {
                    local / inner_pos
                } else {
                    1.0
                };
                (this_outer, inner, fraction)
            } else {
                self.inner_side = 1;
                (inner, next_outer, (local - 0.5) / 0.5)
            }
        } else {
            (this_outer, next_outer, self.phase)
        };

        if new_corner {
            this
        } else {
            this.lerp(next, fraction.clamp(0.0, 1.0))
        }
    }
}

//! Polygon Geometry
//!
//! Shared vertex math for the audio path and the preview renderer. Outer
//! vertices sit on the ellipse `(ax·sin θ, ay·cos θ)`; an optional inner vertex
//! is injected between each pair of outer vertices to draw a star outline.

use core::f32::consts::TAU;
use core::ops::{Add, Sub};
use libm::{cosf, sinf, sqrtf};
use serde::{Deserialize, Serialize};

/// Minimum number of polygon sides
pub const MIN_VERTICES: u8 = 3;

/// Maximum number of polygon sides
pub const MAX_VERTICES: u8 = 36;

/// Inner radius multipliers closer than this to 1.0 disable the star outline
pub const INNER_RADIUS_THRESHOLD: f32 = 0.0005;

/// A 2D point in volts
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Linear interpolation towards `other`; `t` is not clamped
    pub fn lerp(self, other: Point, t: f32) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    pub fn midpoint(self, other: Point) -> Point {
        self.lerp(other, 0.5)
    }

    /// Distance from the origin
    pub fn length(self) -> f32 {
        sqrtf(self.x * self.x + self.y * self.y)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Point on the ellipse with per-axis amplitude `ampl` at normalized angle `t`
/// (one full turn per unit).
pub fn ellipse_point(t: f32, ampl: Point, angle_offset_rad: f32) -> Point {
    let angle = TAU * t + angle_offset_rad;
    Point::new(ampl.x * sinf(angle), ampl.y * cosf(angle))
}

fn sign(value: f32) -> f32 {
    if value < 0.0 {
        -1.0
    } else {
        1.0
    }
}

/// How the radius of an injected inner vertex is derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InnerRadiusMode {
    /// Radius multiplier scales the distance from the origin to the midpoint
    /// of the straight edge between the two outer vertices
    #[default]
    MidPoint,
    /// Radius multiplier scales the outer amplitude directly
    OuterAmplitude,
}

impl InnerRadiusMode {
    /// Per-axis amplitude of the inner vertex injected between `this` and `next`
    pub fn amplitude(self, outer_ampl: Point, this: Point, next: Point, radius_mult: f32) -> Point {
        match self {
            InnerRadiusMode::MidPoint => {
                let radius = this.midpoint(next).length() * radius_mult;
                Point::new(radius * sign(outer_ampl.x), radius * sign(outer_ampl.y))
            }
            InnerRadiusMode::OuterAmplitude => {
                Point::new(outer_ampl.x * radius_mult, outer_ampl.y * radius_mult)
            }
        }
    }
}

/// Static description of the polygon outline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    /// Number of outer vertices, `MIN_VERTICES..=MAX_VERTICES`
    pub num_vertices: u8,
    /// Per-axis amplitude (radius) in volts
    pub amplitude: Point,
    /// Angular offset of vertex 0
    pub angle_offset_rad: f32,
    /// Inner vertex radius multiplier (1.0 = on the straight edge)
    pub inner_radius_mult: f32,
    /// Inner vertex angular shift; 0.0 places it halfway between outer vertices
    pub inner_angle_mult: f32,
    /// Whether inner vertices are injected at all
    pub use_inner_vertices: bool,
    pub inner_radius_mode: InnerRadiusMode,
}

impl Default for Shape {
    fn default() -> Self {
        Self {
            num_vertices: MIN_VERTICES,
            amplitude: Point::new(5.0, 5.0),
            angle_offset_rad: 0.0,
            inner_radius_mult: 1.0,
            inner_angle_mult: 0.0,
            use_inner_vertices: false,
            inner_radius_mode: InnerRadiusMode::MidPoint,
        }
    }
}

impl Shape {
    /// Number of outer vertices as an index bound, never below `MIN_VERTICES`
    pub fn vertex_count(&self) -> usize {
        self.num_vertices.clamp(MIN_VERTICES, MAX_VERTICES) as usize
    }

    /// Number of corners in one full cycle, counting inner vertices
    pub fn corner_count(&self) -> usize {
        if self.use_inner_vertices {
            self.vertex_count() * 2
        } else {
            self.vertex_count()
        }
    }

    /// Set the inner radius multiplier and re-evaluate the star gate
    pub fn set_inner_radius_mult(&mut self, mult: f32) {
        self.inner_radius_mult = mult;
        let diff = 1.0 - mult;
        self.use_inner_vertices = diff < -INNER_RADIUS_THRESHOLD || diff > INNER_RADIUS_THRESHOLD;
    }

    /// Fraction of an edge at which the inner vertex sits
    pub fn inner_position(&self) -> f32 {
        0.5 * (1.0 + self.inner_angle_mult)
    }

    pub fn outer_vertex(&self, index: usize) -> Point {
        let n = self.vertex_count() as f32;
        ellipse_point(index as f32 / n, self.amplitude, self.angle_offset_rad)
    }

    /// Inner vertex following outer vertex `index`, given both bounding outer vertices
    pub fn inner_vertex_between(&self, index: usize, this: Point, next: Point) -> Point {
        let n = self.vertex_count() as f32;
        let ampl =
            self.inner_radius_mode
                .amplitude(self.amplitude, this, next, self.inner_radius_mult);
        let t = index as f32 / n + self.inner_position() / n;
        ellipse_point(t, ampl, self.angle_offset_rad)
    }

    /// Inner vertex following outer vertex `index`
    pub fn inner_vertex(&self, index: usize) -> Point {
        let next = (index + 1) % self.vertex_count();
        self.inner_vertex_between(index, self.outer_vertex(index), self.outer_vertex(next))
    }
}

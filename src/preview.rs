//! Preview Renderer
//!
//! Draws a static picture of the full polygon on the host's display. The vertex
//! buffer is rebuilt from the engine's current parameters on every redraw,
//! independently of the live phase, so the preview never disturbs the audio
//! path.
//!
//! Everything lives in fixed-size buffers sized for the largest star outline.

use crate::engine::EngineState;
use crate::geometry::{Point, MAX_VERTICES};
use crate::params::VOLTAGE_LIMIT;
use serde::{Deserialize, Serialize};

/// Largest number of points in one full cycle (outer + inner vertices)
pub const MAX_PREVIEW_POINTS: usize = 2 * MAX_VERTICES as usize;

/// Caption drawn in the corner of the preview
pub const PREVIEW_TITLE: &str = "polyGen";

/// Host drawing primitives
pub trait Canvas {
    /// Draw an antialiased line between two points in screen coordinates
    fn draw_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: u8);

    /// Draw a line of text with its baseline at `(x, y)`
    fn draw_text(&mut self, x: i32, y: i32, text: &str);
}

/// Preview canvas geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreviewConfig {
    /// Canvas width in pixels
    pub width: f32,
    /// Canvas height in pixels
    pub height: f32,
    /// Margin kept clear around the drawing
    pub padding: f32,
    /// Line brightness
    pub line_color: u8,
    /// Caption position
    pub title_x: i32,
    pub title_y: i32,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            width: 256.0,
            height: 64.0,
            padding: 2.0,
            line_color: 17,
            title_x: 10,
            title_y: 40,
        }
    }
}

impl PreviewConfig {
    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_line_color(mut self, color: u8) -> Self {
        self.line_color = color;
        self
    }

    /// Radius in pixels that the full ±10V range maps onto
    pub fn canvas_radius(&self) -> f32 {
        (self.width.min(self.height) - 2.0 * self.padding).max(0.0) / 2.0
    }
}

/// One full cycle of rotated vertices, in volts
#[derive(Debug, Clone, Copy)]
pub struct VertexBuffer {
    points: [Point; MAX_PREVIEW_POINTS],
    len: usize,
}

impl VertexBuffer {
    /// Build the outline for the state's current shape and rotation.
    ///
    /// Inner vertices are interleaved after the outer vertex they follow.
    pub fn from_state(state: &EngineState) -> Self {
        let mut buffer = Self {
            points: [Point::ORIGIN; MAX_PREVIEW_POINTS],
            len: 0,
        };

        let shape = &state.shape;
        let center = state.rotation_center;
        for v in 0..shape.vertex_count() {
            buffer.push(state.rotation.apply(shape.outer_vertex(v), center));
            if shape.use_inner_vertices {
                buffer.push(state.rotation.apply(shape.inner_vertex(v), center));
            }
        }
        buffer
    }

    fn push(&mut self, point: Point) {
        if self.len < MAX_PREVIEW_POINTS {
            self.points[self.len] = point;
            self.len += 1;
        }
    }

    pub fn as_slice(&self) -> &[Point] {
        &self.points[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Maps volts onto canvas pixels, Y pointing down
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    origin: Point,
    scale: f32,
}

impl Projection {
    /// Projection centered on the canvas, with `offset` (volts) applied first
    pub fn new(config: &PreviewConfig, offset: Point) -> Self {
        let scale = config.canvas_radius() / VOLTAGE_LIMIT;
        Self {
            origin: Point::new(
                config.width / 2.0 + offset.x * scale,
                config.height / 2.0 - offset.y * scale,
            ),
            scale,
        }
    }

    pub fn project(&self, point: Point) -> Point {
        Point::new(
            self.origin.x + point.x * self.scale,
            self.origin.y - point.y * self.scale,
        )
    }
}

/// Draw a closed polyline through `points`, starting with the closing segment
pub fn draw_closed<C: Canvas>(canvas: &mut C, points: &[Point], projection: &Projection, color: u8) {
    let Some(&last) = points.last() else {
        return;
    };

    let mut prev = projection.project(last);
    for &point in points {
        let p = projection.project(point);
        canvas.draw_line(prev.x, prev.y, p.x, p.y, color);
        prev = p;
    }
}

/// Render one preview frame of `state`
pub fn render<C: Canvas>(state: &EngineState, config: &PreviewConfig, canvas: &mut C) {
    canvas.draw_text(config.title_x, config.title_y, PREVIEW_TITLE);

    let buffer = VertexBuffer::from_state(state);
    let projection = Projection::new(config, state.offset);
    draw_closed(canvas, buffer.as_slice(), &projection, config.line_color);
}

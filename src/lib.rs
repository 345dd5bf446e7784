//! # polyGen: Polygon Waveform Generator
//!
//! `polygen` generates a pair of audio-rate X/Y control signals that trace a
//! regular polygon, optionally a star, around a configurable ellipse. Fed to
//! an oscilloscope in XY mode the outputs draw the shape; fed to anything else
//! they are a family of pitched waveforms whose timbre follows the geometry.
//!
//! ## Architecture
//!
//! The crate is organized in three layers:
//!
//! - **Geometry** - vertex math shared by the audio path and the preview
//!   ([`geometry`], [`rotation`])
//! - **Engine** - the per-sample tracer and the parameter mapper
//!   ([`engine`], [`params`])
//! - **Host** - block processing over the host's bus buffer, the parameter
//!   table and preview drawing ([`host`], [`preview`])
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use polygen::prelude::*;
//!
//! let sample_rate = 48000.0_f32;
//! let mut poly = PolyGen::new();
//!
//! // Five-pointed star on buses 2 and 3, pitch CV on bus 1
//! poly.set_parameter(&sample_rate, ParamId::NumSides, 5);
//! poly.set_parameter(&sample_rate, ParamId::InnerRadius, 40);
//! poly.set_parameter(&sample_rate, ParamId::OutputX, 2);
//! poly.set_parameter(&sample_rate, ParamId::OutputY, 3);
//!
//! let frames = 64;
//! let mut bus = vec![0.0_f32; 3 * frames];
//! poly.step(&sample_rate, &mut bus, frames).unwrap();
//! ```

pub mod engine;
pub mod error;
pub mod geometry;
pub mod host;
pub mod params;
pub mod preview;
pub mod rotation;

/// Sample rate assumed whenever the host reports a non-positive one
pub const FALLBACK_SAMPLE_RATE: f32 = 1000.0;

/// The host's sample rate, or [`FALLBACK_SAMPLE_RATE`] if it is not positive
pub fn effective_sample_rate(raw: f32) -> f32 {
    if raw > 0.0 {
        raw
    } else {
        FALLBACK_SAMPLE_RATE
    }
}

/// Prelude module for convenient imports
pub mod prelude {
    // Geometry
    pub use crate::geometry::{InnerRadiusMode, Point, Shape, MAX_VERTICES, MIN_VERTICES};
    pub use crate::rotation::{normalize_degrees, Rotation, RotationMode};

    // Engine
    pub use crate::engine::{EngineState, BASE_FREQ_HZ};
    pub use crate::params::{ParamDef, ParamId, ParamPage, ParamUnit, ParamValues, PARAMETERS};

    // Host
    pub use crate::error::PolyGenError;
    pub use crate::host::{
        FactoryInfo, HostEnvironment, OutputMode, PolyGen, PolyGenConfig, Requirements, FACTORY,
    };
    pub use crate::preview::{Canvas, PreviewConfig, VertexBuffer};

    pub use crate::{effective_sample_rate, FALLBACK_SAMPLE_RATE};
}

pub use prelude::*;

//! Host Integration
//!
//! The collaboration surface between a plugin host and one polygon voice:
//!
//! - requirement query and construction
//! - parameter table, pages and change notification
//! - block processing over the host's channel-major bus buffer
//! - preview drawing
//!
//! The host owns audio buffers, parameter storage semantics and the sample
//! rate; the voice re-reads the sample rate through [`HostEnvironment`] on
//! every call rather than caching it.

use crate::engine::EngineState;
use crate::error::PolyGenError;
use crate::geometry::InnerRadiusMode;
use crate::params::{self, ParamDef, ParamId, ParamPage, ParamValues, PAGES, PARAMETERS};
use crate::preview::{self, Canvas, PreviewConfig};
use crate::FALLBACK_SAMPLE_RATE;
use serde::{Deserialize, Serialize};

/// Values the host exposes globally
pub trait HostEnvironment {
    /// Current sample rate in Hz; may change between calls
    fn sample_rate(&self) -> f32;
}

impl HostEnvironment for f32 {
    fn sample_rate(&self) -> f32 {
        *self
    }
}

/// Memory the host must reserve for one instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requirements {
    pub num_parameters: usize,
    /// Bytes of general-purpose memory for the instance state
    pub sram: usize,
    pub dram: usize,
    pub dtc: usize,
    pub itc: usize,
}

/// Factory metadata presented to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FactoryInfo {
    pub guid: u32,
    pub name: &'static str,
    pub description: &'static str,
}

/// Pack four ASCII bytes into a host identifier, first byte most significant
pub const fn multichar(a: u8, b: u8, c: u8, d: u8) -> u32 {
    ((a as u32) << 24) | ((b as u32) << 16) | ((c as u32) << 8) | d as u32
}

pub const FACTORY: FactoryInfo = FactoryInfo {
    guid: multichar(b't', b'S', b'p', b'G'),
    name: "polyGen",
    description: "Generates a polygon",
};

/// How an output bus receives the generated signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputMode {
    /// Sum into whatever is already on the bus
    Add,
    /// Overwrite the bus
    Replace,
}

impl OutputMode {
    pub fn from_raw(raw: i16) -> Self {
        if raw > 0 {
            OutputMode::Replace
        } else {
            OutputMode::Add
        }
    }
}

/// Per-instance configuration fixed at construction
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PolyGenConfig {
    pub inner_radius_mode: InnerRadiusMode,
    pub preview: PreviewConfig,
}

impl PolyGenConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_inner_radius_mode(mut self, mode: InnerRadiusMode) -> Self {
        self.inner_radius_mode = mode;
        self
    }

    pub fn with_preview(mut self, preview: PreviewConfig) -> Self {
        self.preview = preview;
        self
    }
}

/// Resolved bus offsets for one processing block
struct Routing {
    input: usize,
    x: usize,
    y: usize,
    x_mode: OutputMode,
    y_mode: OutputMode,
}

/// One polygon generator voice as seen by the host
pub struct PolyGen {
    state: EngineState,
    values: ParamValues,
    config: PolyGenConfig,
}

impl PolyGen {
    pub fn new() -> Self {
        Self::with_config(PolyGenConfig::default())
    }

    pub fn with_config(config: PolyGenConfig) -> Self {
        let mut state = EngineState::default();
        state.shape.inner_radius_mode = config.inner_radius_mode;
        let values = ParamValues::default();
        params::apply_all(&mut state, &values, FALLBACK_SAMPLE_RATE);

        tracing::debug!(
            guid = FACTORY.guid,
            inner_radius_mode = ?config.inner_radius_mode,
            "constructed polygon generator"
        );

        Self {
            state,
            values,
            config,
        }
    }

    /// Memory needed per instance; no memory beyond the instance itself
    pub fn requirements() -> Requirements {
        Requirements {
            num_parameters: PARAMETERS.len(),
            sram: std::mem::size_of::<PolyGen>(),
            dram: 0,
            dtc: 0,
            itc: 0,
        }
    }

    pub fn parameters() -> &'static [ParamDef] {
        &PARAMETERS
    }

    pub fn pages() -> &'static [ParamPage] {
        &PAGES
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn values(&self) -> &ParamValues {
        &self.values
    }

    /// Raw parameter mirror, for hosts that write values before notifying
    pub fn values_mut(&mut self) -> &mut ParamValues {
        &mut self.values
    }

    pub fn config(&self) -> &PolyGenConfig {
        &self.config
    }

    /// Store a raw value and apply it
    pub fn set_parameter<E: HostEnvironment>(&mut self, env: &E, id: ParamId, raw: i16) {
        self.values.set(id, raw);
        params::apply(&mut self.state, &self.values, id, env.sample_rate());
    }

    /// Notification that the host changed parameter `index` in the mirror
    pub fn parameter_changed<E: HostEnvironment>(
        &mut self,
        env: &E,
        index: u8,
    ) -> Result<(), PolyGenError> {
        let id = ParamId::try_from(index)?;
        params::apply(&mut self.state, &self.values, id, env.sample_rate());
        Ok(())
    }

    fn routing(&self, bus_len: usize, num_frames: usize) -> Result<Routing, PolyGenError> {
        if bus_len % num_frames != 0 {
            return Err(PolyGenError::FrameCountMismatch {
                expected: num_frames,
                actual: bus_len,
            });
        }
        let available = bus_len / num_frames;

        let offset = |id: ParamId| -> Result<usize, PolyGenError> {
            let bus = self.values.get(id);
            if bus < 1 || bus as usize > available {
                return Err(PolyGenError::BusOutOfRange { bus, available });
            }
            Ok((bus as usize - 1) * num_frames)
        };

        Ok(Routing {
            input: offset(ParamId::FrequencyInput)?,
            x: offset(ParamId::OutputX)?,
            y: offset(ParamId::OutputY)?,
            x_mode: OutputMode::from_raw(self.values.get(ParamId::OutputXMode)),
            y_mode: OutputMode::from_raw(self.values.get(ParamId::OutputYMode)),
        })
    }

    /// Process `num_frames` samples over the host's bus buffer.
    ///
    /// `bus` holds consecutive channels of `num_frames` samples each; routing
    /// parameters select channels by 1-based bus number. Input and output buses
    /// may coincide: each frame's input is read before its outputs are written.
    pub fn step<E: HostEnvironment>(
        &mut self,
        env: &E,
        bus: &mut [f32],
        num_frames: usize,
    ) -> Result<(), PolyGenError> {
        if num_frames == 0 {
            return Ok(());
        }

        let routing = self.routing(bus.len(), num_frames).map_err(|err| {
            tracing::warn!(%err, "cannot route polygon outputs");
            err
        })?;
        let sample_rate = env.sample_rate();

        for frame in 0..num_frames {
            let cv = bus[routing.input + frame];
            let point = self.state.tick(cv, sample_rate);
            write_sample(&mut bus[routing.x + frame], point.x, routing.x_mode);
            write_sample(&mut bus[routing.y + frame], point.y, routing.y_mode);
        }
        Ok(())
    }

    /// Render the preview; returns whether the host's top bar should stay visible
    pub fn draw<C: Canvas>(&self, canvas: &mut C) -> bool {
        preview::render(&self.state, &self.config.preview, canvas);
        self.state.top_bar_on
    }

    /// Parameter table and pages as JSON
    #[cfg(feature = "json")]
    pub fn describe_json() -> serde_json::Result<String> {
        serde_json::to_string_pretty(&serde_json::json!({
            "name": FACTORY.name,
            "description": FACTORY.description,
            "parameters": &PARAMETERS[..],
            "pages": &PAGES[..],
        }))
    }
}

impl Default for PolyGen {
    fn default() -> Self {
        Self::new()
    }
}

fn write_sample(slot: &mut f32, value: f32, mode: OutputMode) {
    match mode {
        OutputMode::Add => *slot += value,
        OutputMode::Replace => *slot = value,
    }
}

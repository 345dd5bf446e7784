//! Parameter Mapper
//!
//! The host stores every parameter as a raw `i16` in host units (tenths of a
//! volt, percent, degrees, bus numbers). This module owns the declarative
//! parameter table the host displays, the mirror of raw values, and the mapping
//! that converts one changed raw value into engine-native floats.
//!
//! # Scaling
//!
//! | Parameter | Raw unit | Engine value |
//! |-----------|----------|--------------|
//! | Frequency | 1/100 V | volts, clamped to ±5 |
//! | Amplitude, offset, rotation center | 1/10 V | volts, clamped to ±10 |
//! | Inner radius / angle | percent | multiplier |
//! | Angle offset | degrees | radians |
//! | Rotation | degrees or deg/s | normalized degrees |

use crate::effective_sample_rate;
use crate::engine::{EngineState, MAX_PITCH_V, MIN_PITCH_V};
use crate::error::PolyGenError;
use crate::geometry::{MAX_VERTICES, MIN_VERTICES};
use crate::rotation::RotationMode;
use core::f32::consts::PI;
use serde::{Deserialize, Serialize};

/// Number of host parameters
pub const PARAM_COUNT: usize = 19;

/// Highest bus number a routing parameter may select
pub const MAX_BUS: i16 = 28;

/// Amplitude, offset and rotation center limit in volts
pub const VOLTAGE_LIMIT: f32 = 10.0;

const VOLTAGE_SCALING: f32 = 10.0;
const VOLTAGE_LIMIT_RAW: i16 = 100;
const FREQ_SCALING: f32 = 100.0;
const PERCENT_SCALING: f32 = 100.0;

/// Host parameter identifiers, in host index order
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParamId {
    FrequencyInput = 0,
    OutputX,
    OutputXMode,
    OutputY,
    OutputYMode,
    Frequency,
    NumSides,
    AngleOffset,
    InnerRadius,
    InnerAngle,
    XAmplitude,
    YAmplitude,
    XOffset,
    YOffset,
    XRotationCenter,
    YRotationCenter,
    Rotation,
    Spin,
    TopBar,
}

impl ParamId {
    pub const ALL: [ParamId; PARAM_COUNT] = [
        ParamId::FrequencyInput,
        ParamId::OutputX,
        ParamId::OutputXMode,
        ParamId::OutputY,
        ParamId::OutputYMode,
        ParamId::Frequency,
        ParamId::NumSides,
        ParamId::AngleOffset,
        ParamId::InnerRadius,
        ParamId::InnerAngle,
        ParamId::XAmplitude,
        ParamId::YAmplitude,
        ParamId::XOffset,
        ParamId::YOffset,
        ParamId::XRotationCenter,
        ParamId::YRotationCenter,
        ParamId::Rotation,
        ParamId::Spin,
        ParamId::TopBar,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Static definition from the parameter table
    pub fn def(self) -> &'static ParamDef {
        &PARAMETERS[self.index()]
    }
}

impl TryFrom<u8> for ParamId {
    type Error = PolyGenError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        ParamId::ALL
            .get(index as usize)
            .copied()
            .ok_or(PolyGenError::UnknownParameter(index))
    }
}

/// Display unit hint for the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamUnit {
    None,
    Volts,
    Percent,
    /// Bus number of an input
    AudioInput,
    /// Bus number of an output
    AudioOutput,
    /// Index into `enum_strings`
    Enum,
}

const ON_OFF: &[&str] = &["Off", "On"];
const OUTPUT_MODES: &[&str] = &["Add", "Replace"];

/// Declarative parameter metadata
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParamDef {
    pub name: &'static str,
    pub min: i16,
    pub max: i16,
    pub default: i16,
    pub unit: ParamUnit,
    /// Number of implied decimal places in the raw value
    pub scaling: u8,
    pub enum_strings: Option<&'static [&'static str]>,
}

impl ParamDef {
    const fn new(name: &'static str, min: i16, max: i16, default: i16, unit: ParamUnit) -> Self {
        Self {
            name,
            min,
            max,
            default,
            unit,
            scaling: 0,
            enum_strings: None,
        }
    }

    const fn scaled(mut self, scaling: u8) -> Self {
        self.scaling = scaling;
        self
    }

    const fn with_enum(mut self, strings: &'static [&'static str]) -> Self {
        self.enum_strings = Some(strings);
        self.unit = ParamUnit::Enum;
        self
    }

    const fn volts(name: &'static str, default: i16) -> Self {
        Self::new(
            name,
            -VOLTAGE_LIMIT_RAW,
            VOLTAGE_LIMIT_RAW,
            default,
            ParamUnit::Volts,
        )
        .scaled(1)
    }

    /// Clamp a raw value into this parameter's domain
    pub fn clamp(&self, raw: i16) -> i16 {
        raw.clamp(self.min, self.max)
    }
}

/// The parameter table, indexed by [`ParamId`]
pub static PARAMETERS: [ParamDef; PARAM_COUNT] = [
    ParamDef::new("Frequency Input", 1, MAX_BUS, 1, ParamUnit::AudioInput),
    ParamDef::new("Output X", 1, MAX_BUS, 13, ParamUnit::AudioOutput),
    ParamDef::new("Output X mode", 0, 1, 0, ParamUnit::Enum).with_enum(OUTPUT_MODES),
    ParamDef::new("Output Y", 1, MAX_BUS, 14, ParamUnit::AudioOutput),
    ParamDef::new("Output Y mode", 0, 1, 0, ParamUnit::Enum).with_enum(OUTPUT_MODES),
    ParamDef::new("Frequency", -500, 500, 0, ParamUnit::Volts).scaled(2),
    ParamDef::new(
        "# Sides",
        MIN_VERTICES as i16,
        MAX_VERTICES as i16,
        MIN_VERTICES as i16,
        ParamUnit::None,
    ),
    ParamDef::new("Angle Offset", -180, 180, 0, ParamUnit::None),
    ParamDef::new("Inner Radius Size", -500, 500, 100, ParamUnit::Percent),
    ParamDef::new("Inner Radius Angle Offset", -500, 500, 0, ParamUnit::Percent),
    ParamDef::volts("X Radius/Amplitude", 50),
    ParamDef::volts("Y Radius/Amplitude", 50),
    ParamDef::volts("X Offset", 0),
    ParamDef::volts("Y Offset", 0),
    ParamDef::volts("X Center of Rotation", 0),
    ParamDef::volts("Y Center of Rotation", 0),
    ParamDef::new("Rotation", -720, 720, 0, ParamUnit::None),
    ParamDef::new("Spin", 0, 1, 0, ParamUnit::None).with_enum(ON_OFF),
    ParamDef::new("Top Bar", 0, 1, 1, ParamUnit::None).with_enum(ON_OFF),
];

/// A named group of parameters shown together by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParamPage {
    pub name: &'static str,
    pub params: &'static [ParamId],
}

pub static PAGES: [ParamPage; 2] = [
    ParamPage {
        name: "Polygon",
        params: &[
            ParamId::Frequency,
            ParamId::NumSides,
            ParamId::AngleOffset,
            ParamId::InnerRadius,
            ParamId::InnerAngle,
            ParamId::XAmplitude,
            ParamId::YAmplitude,
            ParamId::XOffset,
            ParamId::YOffset,
            ParamId::Rotation,
            ParamId::XRotationCenter,
            ParamId::YRotationCenter,
            ParamId::Spin,
            ParamId::TopBar,
        ],
    },
    ParamPage {
        name: "Routing",
        params: &[
            ParamId::FrequencyInput,
            ParamId::OutputX,
            ParamId::OutputXMode,
            ParamId::OutputY,
            ParamId::OutputYMode,
        ],
    },
];

/// Mirror of the host's raw parameter values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamValues {
    values: [i16; PARAM_COUNT],
}

impl Default for ParamValues {
    fn default() -> Self {
        let mut values = [0; PARAM_COUNT];
        for (value, def) in values.iter_mut().zip(PARAMETERS.iter()) {
            *value = def.default;
        }
        Self { values }
    }
}

impl ParamValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: ParamId) -> i16 {
        self.values[id.index()]
    }

    /// Store a raw value, clamped into the parameter's domain
    pub fn set(&mut self, id: ParamId, raw: i16) {
        self.values[id.index()] = id.def().clamp(raw);
    }

    pub fn as_slice(&self) -> &[i16] {
        &self.values
    }
}

// =============================================================================
// Volt-valued fields
// =============================================================================

type VoltField = fn(&mut EngineState) -> &mut f32;

fn x_amplitude(state: &mut EngineState) -> &mut f32 {
    &mut state.shape.amplitude.x
}

fn y_amplitude(state: &mut EngineState) -> &mut f32 {
    &mut state.shape.amplitude.y
}

fn x_offset(state: &mut EngineState) -> &mut f32 {
    &mut state.offset.x
}

fn y_offset(state: &mut EngineState) -> &mut f32 {
    &mut state.offset.y
}

fn x_rotation_center(state: &mut EngineState) -> &mut f32 {
    &mut state.rotation_center.x
}

fn y_rotation_center(state: &mut EngineState) -> &mut f32 {
    &mut state.rotation_center.y
}

/// Parameters sharing the clamp-to-±10V rule, with the field each one drives
static VOLT_FIELDS: [(ParamId, VoltField); 6] = [
    (ParamId::XAmplitude, x_amplitude),
    (ParamId::YAmplitude, y_amplitude),
    (ParamId::XOffset, x_offset),
    (ParamId::YOffset, y_offset),
    (ParamId::XRotationCenter, x_rotation_center),
    (ParamId::YRotationCenter, y_rotation_center),
];

fn volt_field(id: ParamId) -> Option<VoltField> {
    VOLT_FIELDS
        .iter()
        .find(|(param, _)| *param == id)
        .map(|(_, field)| *field)
}

// =============================================================================
// Mapping
// =============================================================================

/// Update the engine fields derived from parameter `id`.
///
/// `sample_rate` is only consulted when a spin-rate change advances the
/// spin angle; non-positive rates fall back to 1 kHz.
pub fn apply(state: &mut EngineState, values: &ParamValues, id: ParamId, sample_rate: f32) {
    let raw = values.get(id);
    let value = raw as f32;

    if let Some(field) = volt_field(id) {
        let volts = (value / VOLTAGE_SCALING).clamp(-VOLTAGE_LIMIT, VOLTAGE_LIMIT);
        *field(state) = volts;
        tracing::debug!(param = id.def().name, volts, "voltage changed");
        return;
    }

    match id {
        ParamId::Frequency => {
            state.frequency_param_v = (value / FREQ_SCALING).clamp(MIN_PITCH_V, MAX_PITCH_V);
            tracing::debug!(raw, volts = state.frequency_param_v, "frequency changed");
        }
        ParamId::NumSides => {
            state.shape.num_vertices = raw.clamp(MIN_VERTICES as i16, MAX_VERTICES as i16) as u8;
            tracing::debug!(sides = state.shape.num_vertices, "side count changed");
        }
        ParamId::AngleOffset => {
            state.shape.angle_offset_rad = value * PI / 180.0;
            tracing::debug!(degrees = raw, "angle offset changed");
        }
        ParamId::InnerRadius => {
            state.shape.set_inner_radius_mult(value / PERCENT_SCALING);
            tracing::debug!(
                mult = state.shape.inner_radius_mult,
                star = state.shape.use_inner_vertices,
                "inner radius changed"
            );
        }
        ParamId::InnerAngle => {
            state.shape.inner_angle_mult = value / PERCENT_SCALING;
            tracing::debug!(mult = state.shape.inner_angle_mult, "inner angle changed");
        }
        ParamId::Rotation => {
            state.rotation_param_deg = value;
            state
                .rotation
                .on_param_changed(value, effective_sample_rate(sample_rate));
            tracing::debug!(raw, degrees = state.rotation.degrees(), "rotation changed");
        }
        ParamId::Spin => {
            let mode = if raw > 0 {
                RotationMode::Spin
            } else {
                RotationMode::Absolute
            };
            // Re-read the live rotation value at the moment of the switch
            let param_deg = values.get(ParamId::Rotation) as f32;
            state.rotation_param_deg = param_deg;
            state.rotation.set_mode(mode, param_deg);
            tracing::debug!(?mode, degrees = state.rotation.degrees(), "rotation mode changed");
        }
        ParamId::TopBar => {
            state.top_bar_on = raw > 0;
        }
        _ => {
            // Routing is read directly from the mirror when processing
        }
    }
}

/// Push every parameter through [`apply`], in table order
pub fn apply_all(state: &mut EngineState, values: &ParamValues, sample_rate: f32) {
    for id in ParamId::ALL {
        apply(state, values, id, sample_rate);
    }
}

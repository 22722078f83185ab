//! Bidirectional codec between raw data points and the typed AC state
//!
//! Decoding is total over valid snapshots: a complete [`RawState`] from a
//! live device always yields exactly one [`AcState`]. The reverse direction
//! is deliberately partial; the [`payloads`] builders produce only the keys a
//! command intends to change, and those go through constraint filtering
//! before hitting the network.

use crate::error::{AcError, Result};
use crate::protocol::{require, DataPoint, RawState, RawValue};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire sentinel the firmware uses for the vertical swing motion.
pub(crate) const SWING_ON: &str = "un_down";
/// Wire value for a disabled swing axis.
pub(crate) const SWING_OFF: &str = "off";

/// Lowest accepted set point in degrees Celsius.
pub const SET_POINT_MIN: f64 = 16.0;
/// Highest accepted set point in degrees Celsius.
pub const SET_POINT_MAX: f64 = 31.0;

/// Operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Auto,
    Cool,
    Heat,
    Dry,
    Vent,
}

impl Mode {
    /// Firmware wire value for this mode.
    pub fn wire(&self) -> &'static str {
        match self {
            Mode::Auto => "auto",
            Mode::Cool => "cold",
            Mode::Heat => "heat",
            Mode::Dry => "wet",
            Mode::Vent => "fan",
        }
    }

    fn from_wire(value: &str) -> Option<Self> {
        match value {
            "auto" => Some(Mode::Auto),
            "cold" => Some(Mode::Cool),
            "heat" => Some(Mode::Heat),
            "wet" => Some(Mode::Dry),
            "fan" => Some(Mode::Vent),
            _ => None,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire())
    }
}

/// Fan speed, quiet through turbo with five discrete levels in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FanSpeed {
    Auto,
    Quiet,
    L1,
    L2,
    L3,
    L4,
    L5,
    Turbo,
}

impl FanSpeed {
    /// Firmware wire value for this speed.
    pub fn wire(&self) -> &'static str {
        match self {
            FanSpeed::Auto => "auto",
            FanSpeed::Quiet => "mute",
            FanSpeed::L1 => "low",
            FanSpeed::L2 => "low_mid",
            FanSpeed::L3 => "mid",
            FanSpeed::L4 => "mid_high",
            FanSpeed::L5 => "high",
            FanSpeed::Turbo => "turbo",
        }
    }

    fn from_wire(value: &str) -> Option<Self> {
        match value {
            "auto" => Some(FanSpeed::Auto),
            "mute" => Some(FanSpeed::Quiet),
            "low" => Some(FanSpeed::L1),
            "low_mid" => Some(FanSpeed::L2),
            "mid" => Some(FanSpeed::L3),
            "mid_high" => Some(FanSpeed::L4),
            "high" => Some(FanSpeed::L5),
            "turbo" => Some(FanSpeed::Turbo),
            _ => None,
        }
    }
}

impl fmt::Display for FanSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire())
    }
}

/// Calibration offsets applied on top of the raw ÷10 scaling.
///
/// Units report temperatures that can drift a degree or two from a trusted
/// thermometer; offsets correct the displayed values without touching what
/// the firmware stores. Decoding adds the offset, encoding subtracts it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Offsets {
    /// Added to the decoded set point, subtracted before encoding one.
    #[serde(default)]
    pub set_point: f64,
    /// Added to the decoded room temperature.
    #[serde(default)]
    pub temp: f64,
}

/// Strongly-typed view of the air conditioner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcState {
    pub power: bool,
    pub set_point: f64,
    pub temp: f64,
    pub mode: Mode,
    pub fan_speed: FanSpeed,
    pub eco: bool,
    pub light: bool,
    pub swing: bool,
    pub sleep: bool,
    pub health: bool,
}

impl AcState {
    /// Decode a complete raw snapshot.
    ///
    /// Fails with [`AcError::Decoding`] when a required key is missing or a
    /// value falls outside its known domain; both indicate a device with a
    /// different data-point layout.
    pub fn decode(raw: &RawState, offsets: &Offsets) -> Result<Self> {
        Ok(Self {
            power: decode_bool(raw, DataPoint::Power)?,
            set_point: decode_tenths(raw, DataPoint::SetPoint)? + offsets.set_point,
            temp: decode_tenths(raw, DataPoint::Temp)? + offsets.temp,
            mode: decode_enum(raw, DataPoint::Mode, Mode::from_wire)?,
            fan_speed: decode_enum(raw, DataPoint::Fan, FanSpeed::from_wire)?,
            eco: decode_bool(raw, DataPoint::Eco)?,
            light: decode_bool(raw, DataPoint::Light)?,
            swing: decode_swing(raw)?,
            sleep: decode_bool(raw, DataPoint::Sleep)?,
            health: decode_bool(raw, DataPoint::Health)?,
        })
    }
}

fn decode_bool(raw: &RawState, key: DataPoint) -> Result<bool> {
    require(raw, key)?
        .as_bool()
        .ok_or_else(|| AcError::decoding(format!("data point {key} is not a boolean")))
}

/// Temperatures travel as integers in tenths of a degree.
fn decode_tenths(raw: &RawState, key: DataPoint) -> Result<f64> {
    let value = require(raw, key)?
        .as_int()
        .ok_or_else(|| AcError::decoding(format!("data point {key} is not an integer")))?;
    Ok(value as f64 / 10.0)
}

fn decode_enum<T>(raw: &RawState, key: DataPoint, parse: fn(&str) -> Option<T>) -> Result<T> {
    let value = require(raw, key)?
        .as_str()
        .ok_or_else(|| AcError::decoding(format!("data point {key} is not a string")))?;
    parse(value)
        .ok_or_else(|| AcError::decoding(format!("unknown value {value:?} for data point {key}")))
}

/// The firmware spreads the single swing boolean across two data points:
/// SWING carries the motion sentinel and SWING_DIRECTION must name the SWING
/// key itself. Any other combination means swing is off. Intentional firmware
/// quirk; both halves are reproduced verbatim on encode.
fn decode_swing(raw: &RawState) -> Result<bool> {
    let swing = require(raw, DataPoint::Swing)?;
    let direction = require(raw, DataPoint::SwingDirection)?;
    Ok(swing.as_str() == Some(SWING_ON) && direction.as_str() == Some(DataPoint::Swing.id()))
}

/// Partial-state builders for every attribute command.
///
/// Each returns only the keys the command changes; nothing here consults the
/// current device state, that is the orchestrator's job.
pub mod payloads {
    use super::*;

    pub fn power(on: bool) -> RawState {
        RawState::from([(DataPoint::Power, RawValue::Bool(on))])
    }

    /// Encode a set point, clamping to the device's physical range.
    ///
    /// The firmware rejects out-of-range set points outright, so the clamp
    /// happens here, before any network round trip. Rounding is half-up at
    /// the integer boundary and applies after the calibration offset is
    /// removed.
    pub fn set_point(temp: f64, offsets: &Offsets) -> RawState {
        let device_temp = (temp - offsets.set_point)
            .round()
            .clamp(SET_POINT_MIN, SET_POINT_MAX);
        RawState::from([(DataPoint::SetPoint, RawValue::Int(device_temp as i64 * 10))])
    }

    pub fn mode(mode: Mode) -> RawState {
        RawState::from([(DataPoint::Mode, RawValue::from(mode.wire()))])
    }

    pub fn fan_speed(speed: FanSpeed) -> RawState {
        RawState::from([(DataPoint::Fan, RawValue::from(speed.wire()))])
    }

    pub fn eco(on: bool) -> RawState {
        RawState::from([(DataPoint::Eco, RawValue::Bool(on))])
    }

    pub fn light(on: bool) -> RawState {
        RawState::from([(DataPoint::Light, RawValue::Bool(on))])
    }

    /// Both halves of the joint swing encoding, kept in lockstep.
    pub fn swing(on: bool) -> RawState {
        if on {
            RawState::from([
                (DataPoint::Swing, RawValue::from(SWING_ON)),
                (DataPoint::SwingDirection, RawValue::from(DataPoint::Swing.id())),
            ])
        } else {
            RawState::from([
                (DataPoint::Swing, RawValue::from(SWING_OFF)),
                (DataPoint::SwingDirection, RawValue::from(SWING_OFF)),
            ])
        }
    }

    pub fn sleep(on: bool) -> RawState {
        RawState::from([(DataPoint::Sleep, RawValue::Bool(on))])
    }

    pub fn health(on: bool) -> RawState {
        RawState::from([(DataPoint::Health, RawValue::Bool(on))])
    }
}

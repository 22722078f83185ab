//! Raw data-point vocabulary and the LAN protocol client seam
//!
//! The vendor firmware exposes the unit as an untyped map of numeric
//! data-point keys to scalar values. This module pins down that vocabulary
//! ([`DataPoint`], [`RawValue`], [`RawState`]) and the [`TuyaClient`] trait
//! behind which the encrypted transport lives. Everything above this seam is
//! transport-agnostic; the crate ships a mock implementation for tests and
//! expects a real client from the embedding application.

use crate::error::{AcError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// One addressable attribute slot in the vendor protocol.
///
/// The wire identifiers are fixed by the device firmware; this crate only
/// supports the Airton data-point layout (see the crate-level non-goals).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataPoint {
    Power,
    SetPoint,
    Temp,
    Mode,
    Fan,
    Eco,
    Light,
    Swing,
    SwingDirection,
    Sleep,
    Health,
}

impl DataPoint {
    /// Firmware key for this data point.
    pub fn id(&self) -> &'static str {
        match self {
            DataPoint::Power => "1",
            DataPoint::SetPoint => "2",
            DataPoint::Temp => "3",
            DataPoint::Mode => "4",
            DataPoint::Fan => "5",
            DataPoint::Eco => "8",
            DataPoint::Light => "13",
            DataPoint::Swing => "15",
            DataPoint::SwingDirection => "107",
            DataPoint::Sleep => "109",
            DataPoint::Health => "110",
        }
    }

    /// Resolve a firmware key back to a data point.
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "1" => Some(DataPoint::Power),
            "2" => Some(DataPoint::SetPoint),
            "3" => Some(DataPoint::Temp),
            "4" => Some(DataPoint::Mode),
            "5" => Some(DataPoint::Fan),
            "8" => Some(DataPoint::Eco),
            "13" => Some(DataPoint::Light),
            "15" => Some(DataPoint::Swing),
            "107" => Some(DataPoint::SwingDirection),
            "109" => Some(DataPoint::Sleep),
            "110" => Some(DataPoint::Health),
            _ => None,
        }
    }
}

impl fmt::Display for DataPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// A raw scalar as the firmware reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl RawValue {
    /// Interpret as a boolean. Integers are truthy when non-zero, matching
    /// how the firmware reports switch-like data points on some revisions.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            RawValue::Bool(b) => Some(*b),
            RawValue::Int(i) => Some(*i != 0),
            RawValue::Str(_) => None,
        }
    }

    /// Interpret as an integer, accepting numeric strings.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            RawValue::Int(i) => Some(*i),
            RawValue::Str(s) => s.parse().ok(),
            RawValue::Bool(_) => None,
        }
    }

    /// Interpret as a string slice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RawValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for RawValue {
    fn from(v: bool) -> Self {
        RawValue::Bool(v)
    }
}

impl From<i64> for RawValue {
    fn from(v: i64) -> Self {
        RawValue::Int(v)
    }
}

impl From<&str> for RawValue {
    fn from(v: &str) -> Self {
        RawValue::Str(v.to_string())
    }
}

/// Snapshot of device data points.
///
/// Complete (every key present) when read from a live device, partial when
/// expressing a desired update.
pub type RawState = HashMap<DataPoint, RawValue>;

/// Fetch a required key from a complete snapshot.
pub fn require(raw: &RawState, key: DataPoint) -> Result<&RawValue> {
    raw.get(&key)
        .ok_or_else(|| AcError::decoding(format!("missing data point {key}")))
}

/// Client for the encrypted LAN protocol session.
///
/// Implementations own handshake, framing and timeouts. The session is not
/// re-entrant: callers serialize access, which the `&mut self` receivers
/// make explicit.
#[async_trait]
pub trait TuyaClient: Send {
    /// Read the complete current state of the device.
    async fn read_state(&mut self) -> Result<RawState>;

    /// Send a partial state update to the device.
    async fn send(&mut self, payload: &RawState) -> Result<()>;
}

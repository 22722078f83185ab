//! Shared test doubles for the integration tests
//!
//! An in-memory protocol client and host runtime, plus a baseline session
//! configuration. Kept independent from the crate's `mock` module so these
//! tests exercise the same public surface an embedding application sees.

use airton_lan::plugin::{HostRuntime, WidgetSpec, WidgetValue};
use airton_lan::{
    AcError, DataPoint, DeviceConfig, PluginConfig, RawState, RawValue, Result, TuyaClient,
};
use async_trait::async_trait;
use std::collections::HashMap;

/// Heating at 20.0°C, room at 21.5°C, everything else off except the light.
pub fn baseline_raw_state() -> RawState {
    RawState::from([
        (DataPoint::Power, RawValue::Bool(true)),
        (DataPoint::SetPoint, RawValue::Int(200)),
        (DataPoint::Temp, RawValue::Int(215)),
        (DataPoint::Mode, RawValue::from("heat")),
        (DataPoint::Fan, RawValue::from("low")),
        (DataPoint::Eco, RawValue::Bool(false)),
        (DataPoint::Light, RawValue::Bool(true)),
        (DataPoint::Swing, RawValue::from("off")),
        (DataPoint::SwingDirection, RawValue::from("off")),
        (DataPoint::Sleep, RawValue::Bool(false)),
        (DataPoint::Health, RawValue::Bool(false)),
    ])
}

pub fn baseline_config() -> PluginConfig {
    serde_json::from_value(serde_json::json!({
        "name": "Living room AC",
        "device": {"id": "bf1234", "address": "192.168.1.40", "local_key": "secret"},
        "refresh_interval": "1h"
    }))
    .expect("valid baseline config")
}

/// In-memory protocol client; writes fold back into the served state.
pub struct TestClient {
    pub state: RawState,
    pub sent: Vec<RawState>,
    pub reads: usize,
    pub fail: bool,
}

impl TestClient {
    pub fn new(state: RawState) -> Self {
        Self {
            state,
            sent: Vec::new(),
            reads: 0,
            fail: false,
        }
    }
}

#[async_trait]
impl TuyaClient for TestClient {
    async fn read_state(&mut self) -> Result<RawState> {
        if self.fail {
            return Err(AcError::communication("test read failure"));
        }
        self.reads += 1;
        Ok(self.state.clone())
    }

    async fn send(&mut self, payload: &RawState) -> Result<()> {
        if self.fail {
            return Err(AcError::communication("test send failure"));
        }
        self.state.extend(payload.clone());
        self.sent.push(payload.clone());
        Ok(())
    }
}

/// Host runtime recording widget creations and updates.
#[derive(Default)]
pub struct TestHost {
    pub widgets: HashMap<u8, WidgetSpec>,
    pub updates: Vec<(u8, WidgetValue)>,
    pub created: usize,
}

impl TestHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// A host that already persisted widgets from an earlier run.
    pub fn with_existing(specs: impl IntoIterator<Item = WidgetSpec>) -> Self {
        Self {
            widgets: specs.into_iter().map(|s| (s.unit_id, s)).collect(),
            ..Self::default()
        }
    }

    pub fn updates_for(&self, unit_id: u8) -> Vec<&WidgetValue> {
        self.updates
            .iter()
            .filter(|(id, _)| *id == unit_id)
            .map(|(_, value)| value)
            .collect()
    }
}

impl HostRuntime for TestHost {
    fn widget_exists(&self, unit_id: u8) -> bool {
        self.widgets.contains_key(&unit_id)
    }

    fn create_widget(&mut self, spec: &WidgetSpec) -> Result<()> {
        self.created += 1;
        self.widgets.insert(spec.unit_id, spec.clone());
        Ok(())
    }

    fn update_widget(&mut self, unit_id: u8, value: &WidgetValue) -> Result<()> {
        self.updates.push((unit_id, value.clone()));
        Ok(())
    }
}

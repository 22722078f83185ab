//! Mock implementations for testing
//!
//! This module provides an in-memory protocol client and host runtime so the
//! orchestration and synchronization layers can be exercised without a
//! physical unit or a plugin host.

use crate::error::{AcError, Result};
use crate::plugin::host::{HostRuntime, WidgetSpec, WidgetValue};
use crate::protocol::{DataPoint, RawState, RawValue, TuyaClient};
use async_trait::async_trait;
use std::collections::HashMap;

/// A complete, valid raw snapshot: heating at 20.0 with the room at 21.5.
pub fn sample_raw_state() -> RawState {
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

/// Mock LAN client backed by an in-memory raw state.
///
/// Writes fold back into the state so a post-write read confirms them, the
/// way a real unit echoes accepted commands.
pub struct MockTuyaClient {
    state: RawState,
    sent: Vec<RawState>,
    reads: usize,
    fail: bool,
}

impl MockTuyaClient {
    /// Create a mock serving the given snapshot.
    pub fn with_state(state: RawState) -> Self {
        Self {
            state,
            sent: Vec::new(),
            reads: 0,
            fail: false,
        }
    }

    /// Create a mock whose every operation fails with a communication error.
    pub fn failing() -> Self {
        Self {
            state: RawState::new(),
            sent: Vec::new(),
            reads: 0,
            fail: true,
        }
    }

    /// Every payload sent so far, in order.
    pub fn sent(&self) -> &[RawState] {
        &self.sent
    }

    /// Number of state reads performed.
    pub fn reads(&self) -> usize {
        self.reads
    }
}

#[async_trait]
impl TuyaClient for MockTuyaClient {
    async fn read_state(&mut self) -> Result<RawState> {
        if self.fail {
            return Err(AcError::communication("mock read failure"));
        }
        self.reads += 1;
        Ok(self.state.clone())
    }

    async fn send(&mut self, payload: &RawState) -> Result<()> {
        if self.fail {
            return Err(AcError::communication("mock send failure"));
        }
        self.state.extend(payload.clone());
        self.sent.push(payload.clone());
        Ok(())
    }
}

/// Mock host runtime recording widget creations and updates.
#[derive(Default)]
pub struct MockHost {
    widgets: HashMap<u8, WidgetSpec>,
    updates: Vec<(u8, WidgetValue)>,
}

impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-register a widget id, as a host restoring persisted widgets would.
    pub fn with_existing(ids: impl IntoIterator<Item = u8>) -> Self {
        let widgets = ids
            .into_iter()
            .map(|id| {
                (
                    id,
                    WidgetSpec {
                        name: format!("pre-existing {id}"),
                        unit_id: id,
                        icon: 0,
                        kind: crate::plugin::host::WidgetKind::Switch,
                        options: None,
                    },
                )
            })
            .collect();
        Self {
            widgets,
            updates: Vec::new(),
        }
    }

    /// All widget ids the host knows, sorted.
    pub fn created(&self) -> Vec<u8> {
        let mut ids: Vec<u8> = self.widgets.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// All widget updates issued so far, in order.
    pub fn updates(&self) -> &[(u8, WidgetValue)] {
        &self.updates
    }

    /// Updates issued for one widget.
    pub fn updates_for(&self, unit_id: u8) -> Vec<&WidgetValue> {
        self.updates
            .iter()
            .filter(|(id, _)| *id == unit_id)
            .map(|(_, value)| value)
            .collect()
    }
}

impl HostRuntime for MockHost {
    fn widget_exists(&self, unit_id: u8) -> bool {
        self.widgets.contains_key(&unit_id)
    }

    fn create_widget(&mut self, spec: &WidgetSpec) -> Result<()> {
        self.widgets.insert(spec.unit_id, spec.clone());
        Ok(())
    }

    fn update_widget(&mut self, unit_id: u8, value: &WidgetValue) -> Result<()> {
        self.updates.push((unit_id, value.clone()));
        Ok(())
    }
}

//! Host runtime seam for widget creation and updates
//!
//! The plugin host owns the process lifecycle and renders the widgets; this
//! crate only tells it what to create and when a displayed value changed.
//! Everything crosses this trait so tests can run against [`crate::mock::MockHost`].

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How the host should render a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WidgetKind {
    Switch,
    SelectorSwitch,
    SetPoint,
    Temperature,
}

/// Creation-time widget metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetSpec {
    /// Display name, device name included.
    pub name: String,
    /// Numeric widget id, stable across restarts.
    pub unit_id: u8,
    /// Host icon index.
    pub icon: u8,
    pub kind: WidgetKind,
    /// Extra options, e.g. selector level labels.
    pub options: Option<HashMap<String, String>>,
}

/// A displayed value, split the way plugin hosts split it: a small numeric
/// state and a string representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetValue {
    pub n_value: i32,
    pub s_value: String,
}

impl WidgetValue {
    pub fn new(n_value: i32, s_value: impl Into<String>) -> Self {
        Self {
            n_value,
            s_value: s_value.into(),
        }
    }
}

/// The host-side operations this crate needs.
pub trait HostRuntime: Send {
    /// Whether a widget with this id already exists (survives restarts).
    fn widget_exists(&self, unit_id: u8) -> bool;

    /// Create a widget. Only called when [`Self::widget_exists`] is false.
    fn create_widget(&mut self, spec: &WidgetSpec) -> Result<()>;

    /// Push a new displayed value for a widget.
    fn update_widget(&mut self, unit_id: u8, value: &WidgetValue) -> Result<()>;
}

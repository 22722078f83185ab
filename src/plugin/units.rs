//! Host widget counterparts of the AC attributes
//!
//! One [`Unit`] per controllable or displayed attribute. Units come in four
//! shapes (switch, selector, set point, read-only sensor), dispatched
//! through an exhaustive match rather than an open hierarchy. Each unit
//! remembers the last representation it pushed to the host so identical
//! updates are no-ops and never re-trigger host-side logging.

use crate::error::Result;
use crate::filters::{FilterConfig, Pipeline};
use crate::plugin::host::{HostRuntime, WidgetKind, WidgetSpec, WidgetValue};
use crate::protocol::RawState;
use crate::state::{payloads, AcState, FanSpeed, Mode, Offsets};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Stable widget ids, part of the host-side contract across restarts.
pub mod unit_ids {
    pub const POWER: u8 = 1;
    pub const MODE: u8 = 2;
    pub const FAN: u8 = 3;
    pub const SET_POINT: u8 = 4;
    pub const TEMP: u8 = 5;
    pub const ECO: u8 = 6;
    pub const LIGHT: u8 = 7;
    pub const SWING: u8 = 8;
    pub const SLEEP: u8 = 9;
    pub const HEALTH: u8 = 10;
}

/// Which boolean attribute a switch unit drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchAttribute {
    Power,
    Eco,
    Light,
    Swing,
    Sleep,
    Health,
}

impl SwitchAttribute {
    fn value(&self, state: &AcState) -> bool {
        match self {
            SwitchAttribute::Power => state.power,
            SwitchAttribute::Eco => state.eco,
            SwitchAttribute::Light => state.light,
            SwitchAttribute::Swing => state.swing,
            SwitchAttribute::Sleep => state.sleep,
            SwitchAttribute::Health => state.health,
        }
    }

    fn payload(&self, on: bool) -> RawState {
        match self {
            SwitchAttribute::Power => payloads::power(on),
            SwitchAttribute::Eco => payloads::eco(on),
            SwitchAttribute::Light => payloads::light(on),
            SwitchAttribute::Swing => payloads::swing(on),
            SwitchAttribute::Sleep => payloads::sleep(on),
            SwitchAttribute::Health => payloads::health(on),
        }
    }
}

/// Which bounded attribute a selector unit drives.
///
/// Selector levels are multiples of ten with an implicit hidden OFF at zero
/// that has no counterpart in the domain enums.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorKind {
    Mode,
    Fan,
}

impl SelectorKind {
    fn labels(&self) -> &'static [&'static str] {
        match self {
            SelectorKind::Mode => &["Off", "Auto", "Cool", "Heat", "Dry", "Vent"],
            SelectorKind::Fan => &[
                "Off", "Auto", "Quiet", "L1", "L2", "L3", "L4", "L5", "Turbo",
            ],
        }
    }

    fn level_for(&self, state: &AcState) -> u8 {
        match self {
            SelectorKind::Mode => match state.mode {
                Mode::Auto => 10,
                Mode::Cool => 20,
                Mode::Heat => 30,
                Mode::Dry => 40,
                Mode::Vent => 50,
            },
            SelectorKind::Fan => match state.fan_speed {
                FanSpeed::Auto => 10,
                FanSpeed::Quiet => 20,
                FanSpeed::L1 => 30,
                FanSpeed::L2 => 40,
                FanSpeed::L3 => 50,
                FanSpeed::L4 => 60,
                FanSpeed::L5 => 70,
                FanSpeed::Turbo => 80,
            },
        }
    }

    fn payload_for(&self, level: f64) -> Option<RawState> {
        let level = level as i64;
        match self {
            SelectorKind::Mode => {
                let mode = match level {
                    10 => Mode::Auto,
                    20 => Mode::Cool,
                    30 => Mode::Heat,
                    40 => Mode::Dry,
                    50 => Mode::Vent,
                    _ => return None,
                };
                Some(payloads::mode(mode))
            }
            SelectorKind::Fan => {
                let speed = match level {
                    10 => FanSpeed::Auto,
                    20 => FanSpeed::Quiet,
                    30 => FanSpeed::L1,
                    40 => FanSpeed::L2,
                    50 => FanSpeed::L3,
                    60 => FanSpeed::L4,
                    70 => FanSpeed::L5,
                    80 => FanSpeed::Turbo,
                    _ => return None,
                };
                Some(payloads::fan_speed(speed))
            }
        }
    }

    fn options(&self) -> HashMap<String, String> {
        let labels = self.labels();
        HashMap::from([
            (
                "LevelActions".to_string(),
                vec![""; labels.len()].join("|"),
            ),
            ("LevelNames".to_string(), labels.join("|")),
            ("LevelOffHidden".to_string(), "true".to_string()),
            ("SelectorStyle".to_string(), "0".to_string()),
        ])
    }
}

/// The unit shapes, one variant per widget kind.
#[derive(Debug)]
pub enum UnitKind {
    Switch(SwitchAttribute),
    Selector(SelectorKind),
    SetPoint,
    Sensor(Pipeline),
}

/// One host widget mirroring one AC attribute.
#[derive(Debug)]
pub struct Unit {
    id: u8,
    label: &'static str,
    icon: u8,
    kind: UnitKind,
    displayed: Option<WidgetValue>,
}

impl Unit {
    fn new(id: u8, label: &'static str, icon: u8, kind: UnitKind) -> Self {
        Self {
            id,
            label,
            icon,
            kind,
            displayed: None,
        }
    }

    /// The full unit set for one AC, temperature filtering as configured.
    pub fn standard_set(filters: &FilterConfig) -> Vec<Unit> {
        vec![
            Unit::new(
                unit_ids::POWER,
                "Power",
                9,
                UnitKind::Switch(SwitchAttribute::Power),
            ),
            Unit::new(unit_ids::MODE, "Mode", 19, UnitKind::Selector(SelectorKind::Mode)),
            Unit::new(unit_ids::FAN, "Fan", 7, UnitKind::Selector(SelectorKind::Fan)),
            Unit::new(unit_ids::SET_POINT, "Set point", 15, UnitKind::SetPoint),
            Unit::new(
                unit_ids::TEMP,
                "Temperature",
                15,
                UnitKind::Sensor(filters.build()),
            ),
            Unit::new(unit_ids::ECO, "Eco", 9, UnitKind::Switch(SwitchAttribute::Eco)),
            Unit::new(
                unit_ids::LIGHT,
                "Light",
                9,
                UnitKind::Switch(SwitchAttribute::Light),
            ),
            Unit::new(
                unit_ids::SWING,
                "Swing",
                9,
                UnitKind::Switch(SwitchAttribute::Swing),
            ),
            Unit::new(
                unit_ids::SLEEP,
                "Sleep",
                9,
                UnitKind::Switch(SwitchAttribute::Sleep),
            ),
            Unit::new(
                unit_ids::HEALTH,
                "Health",
                9,
                UnitKind::Switch(SwitchAttribute::Health),
            ),
        ]
    }

    /// Numeric widget id.
    pub fn id(&self) -> u8 {
        self.id
    }

    fn spec(&self, device_name: &str) -> WidgetSpec {
        let (kind, options) = match &self.kind {
            UnitKind::Switch(_) => (WidgetKind::Switch, None),
            UnitKind::Selector(selector) => (WidgetKind::SelectorSwitch, Some(selector.options())),
            UnitKind::SetPoint => (WidgetKind::SetPoint, None),
            UnitKind::Sensor(_) => (WidgetKind::Temperature, None),
        };
        WidgetSpec {
            name: format!("{device_name} {}", self.label),
            unit_id: self.id,
            icon: self.icon,
            kind,
            options,
        }
    }

    /// Create the host widget unless one already exists.
    ///
    /// The existence check, not a stored flag, governs creation, so restarts
    /// against a host that persisted its widgets create nothing.
    pub fn ensure_created(&self, device_name: &str, host: &mut dyn HostRuntime) -> Result<()> {
        if host.widget_exists(self.id) {
            return Ok(());
        }
        let spec = self.spec(device_name);
        info!("creating {} unit", spec.name);
        host.create_widget(&spec)
    }

    /// Reconcile the displayed value with the latest domain state.
    ///
    /// A sensor whose pipeline suppresses the sample keeps its previous
    /// display; anything else updates only when the representation actually
    /// changed.
    pub fn refresh(&mut self, state: &AcState, host: &mut dyn HostRuntime) -> Result<()> {
        let target = match &mut self.kind {
            UnitKind::Switch(attr) => Some(if attr.value(state) {
                WidgetValue::new(1, "On")
            } else {
                WidgetValue::new(0, "Off")
            }),
            UnitKind::Selector(selector) => {
                let level = selector.level_for(state);
                Some(WidgetValue::new(i32::from(level != 0), level.to_string()))
            }
            UnitKind::SetPoint => Some(WidgetValue::new(0, state.set_point.to_string())),
            UnitKind::Sensor(pipeline) => pipeline
                .feed(state.temp)
                .map(|value| WidgetValue::new(0, value.to_string())),
        };

        if let Some(target) = target {
            if self.displayed.as_ref() != Some(&target) {
                debug!("updating {} unit to {:?}", self.label, target.s_value);
                host.update_widget(self.id, &target)?;
                self.displayed = Some(target);
            }
        }
        Ok(())
    }

    /// Translate an inbound host command into a device payload.
    ///
    /// Sensors are host-read-only and selector level zero is the hidden OFF
    /// entry; both map to `None`.
    pub fn command_payload(&self, command: &str, level: f64, offsets: &Offsets) -> Option<RawState> {
        match &self.kind {
            UnitKind::Switch(attr) => Some(attr.payload(command.eq_ignore_ascii_case("on"))),
            UnitKind::Selector(selector) => {
                let payload = selector.payload_for(level);
                if payload.is_none() && level != 0.0 {
                    warn!("ignoring unknown {} selector level {level}", self.label);
                }
                payload
            }
            UnitKind::SetPoint => Some(payloads::set_point(level, offsets)),
            UnitKind::Sensor(_) => None,
        }
    }
}

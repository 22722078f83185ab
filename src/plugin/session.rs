//! Owned session context bridging host callbacks to the device
//!
//! One [`PluginSession`] per AC. It owns the device, every unit, the
//! heartbeat and the optional command buffer, and all host entry points run
//! through `&mut self`, which serializes device access: the protocol client
//! is never entered re-entrantly.

use crate::config::PluginConfig;
use crate::device::AcDevice;
use crate::error::Result;
use crate::plugin::heartbeat::{CommandBuffer, Heartbeat};
use crate::plugin::host::HostRuntime;
use crate::plugin::units::Unit;
use crate::protocol::TuyaClient;
use crate::state::AcState;
use tracing::{debug, warn};

/// A live plugin session for one device.
pub struct PluginSession<C: TuyaClient, H: HostRuntime> {
    name: String,
    device: AcDevice<C>,
    host: H,
    units: Vec<Unit>,
    heartbeat: Heartbeat,
    commands: Option<CommandBuffer>,
}

impl<C: TuyaClient, H: HostRuntime> PluginSession<C, H> {
    /// Create units, then run the initial refresh.
    ///
    /// Widget creation is existence-checked, so restarting against a host
    /// that persisted its widgets creates nothing new.
    pub async fn start(config: &PluginConfig, client: C, host: H) -> Result<Self> {
        let mut session = Self {
            name: config.name.clone(),
            device: AcDevice::new(client, config.device.offsets()),
            host,
            units: Unit::standard_set(&config.temp_filters),
            heartbeat: Heartbeat::new(config.refresh_interval),
            commands: config.debounce_commands.map(CommandBuffer::new),
        };
        for unit in &session.units {
            unit.ensure_created(&session.name, &mut session.host)?;
        }
        session.on_heartbeat().await?;
        Ok(session)
    }

    /// Host command callback.
    ///
    /// Routes by widget id, translates the command into a device payload and
    /// either applies it immediately or parks it in the command buffer.
    /// After a successful apply every unit is re-synchronized: one attribute
    /// change can move the displayed value of several widgets.
    pub async fn on_command(&mut self, unit_id: u8, command: &str, level: f64) -> Result<()> {
        let Some(unit) = self.units.iter().find(|u| u.id() == unit_id) else {
            warn!("command for unknown unit id {unit_id}");
            return Ok(());
        };
        let Some(payload) = unit.command_payload(command, level, self.device.offsets()) else {
            debug!("unit {unit_id} ignored command {command:?} at level {level}");
            return Ok(());
        };

        match &mut self.commands {
            Some(buffer) => {
                buffer.push(payload);
                self.flush_pending().await
            }
            None => {
                let state = self.device.apply(&payload).await?;
                self.sync_units(&state)
            }
        }
    }

    /// Host heartbeat callback.
    ///
    /// Flushes any due batched commands, then refreshes at most once per
    /// configured interval. A failed refresh leaves the interval marker
    /// untouched so the next tick retries.
    pub async fn on_heartbeat(&mut self) -> Result<()> {
        self.flush_pending().await?;
        if self.heartbeat.due() {
            self.refresh().await?;
            self.heartbeat.mark();
        }
        Ok(())
    }

    /// Read the device and reconcile every unit.
    pub async fn refresh(&mut self) -> Result<()> {
        let state = self.device.read().await?;
        self.sync_units(&state)
    }

    async fn flush_pending(&mut self) -> Result<()> {
        let batch = match &mut self.commands {
            Some(buffer) => buffer.take_due(),
            None => None,
        };
        if let Some(batch) = batch {
            debug!("flushing {} batched data point(s)", batch.len());
            let state = self.device.apply(&batch).await?;
            self.sync_units(&state)?;
        }
        Ok(())
    }

    fn sync_units(&mut self, state: &AcState) -> Result<()> {
        for unit in &mut self.units {
            unit.refresh(state, &mut self.host)?;
        }
        Ok(())
    }

    /// The host runtime, mainly for test inspection.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The underlying device.
    pub fn device_mut(&mut self) -> &mut AcDevice<C> {
        &mut self.device
    }
}

//! Update orchestration for a single AC session
//!
//! [`AcDevice`] owns the protocol client and is the only path through which
//! domain state is mutated. Every write follows the same shape: read the
//! confirmed state, diff the request against it, filter the diff through the
//! constraint engine, and only touch the network when something survives.
//! Re-reading after a write makes the returned state authoritative rather
//! than assumed.

use crate::constraints::{airton_rules, ConstraintSet};
use crate::error::Result;
use crate::protocol::{RawState, TuyaClient};
use crate::state::{payloads, AcState, FanSpeed, Mode, Offsets};
use tracing::{debug, info};

/// A LAN-connected Airton air conditioner.
pub struct AcDevice<C: TuyaClient> {
    client: C,
    constraints: ConstraintSet,
    offsets: Offsets,
}

impl<C: TuyaClient> AcDevice<C> {
    /// Wrap a protocol client with the Airton rule table.
    pub fn new(client: C, offsets: Offsets) -> Self {
        Self {
            client,
            constraints: airton_rules(),
            offsets,
        }
    }

    /// Read and decode the current device state without writing anything.
    pub async fn read(&mut self) -> Result<AcState> {
        let raw = self.client.read_state().await?;
        AcState::decode(&raw, &self.offsets)
    }

    /// Apply a partial desired state and return the authoritative result.
    ///
    /// Keys already at their requested value are dropped first, then the
    /// constraint engine removes anything the current mode forbids. An empty
    /// remainder short-circuits: no write is issued and the unmodified
    /// current state is returned. Either the whole filtered diff is written
    /// or, on failure, nothing is.
    pub async fn apply(&mut self, desired: &RawState) -> Result<AcState> {
        let current = self.client.read_state().await?;

        let changed: RawState = desired
            .iter()
            .filter(|&(key, value)| current.get(key) != Some(value))
            .map(|(key, value)| (*key, value.clone()))
            .collect();
        let validated = self.constraints.filter(&changed, &current);

        if validated.is_empty() {
            debug!("nothing to send, all requested changes redundant or blocked");
            return AcState::decode(&current, &self.offsets);
        }

        info!("sending {} data point update(s)", validated.len());
        self.client.send(&validated).await?;
        let confirmed = self.client.read_state().await?;
        AcState::decode(&confirmed, &self.offsets)
    }

    /// Turn the unit on or off.
    pub async fn set_power(&mut self, on: bool) -> Result<AcState> {
        self.apply(&payloads::power(on)).await
    }

    /// Set the target temperature, clamped to the device range.
    pub async fn set_temperature(&mut self, temp: f64) -> Result<AcState> {
        self.apply(&payloads::set_point(temp, &self.offsets)).await
    }

    /// Set the operating mode.
    pub async fn set_mode(&mut self, mode: Mode) -> Result<AcState> {
        self.apply(&payloads::mode(mode)).await
    }

    /// Set the fan speed.
    pub async fn set_fan_speed(&mut self, speed: FanSpeed) -> Result<AcState> {
        self.apply(&payloads::fan_speed(speed)).await
    }

    /// Toggle low-power heating.
    pub async fn set_eco(&mut self, on: bool) -> Result<AcState> {
        self.apply(&payloads::eco(on)).await
    }

    /// Toggle the display light.
    pub async fn set_light(&mut self, on: bool) -> Result<AcState> {
        self.apply(&payloads::light(on)).await
    }

    /// Toggle vertical swing.
    pub async fn set_swing(&mut self, on: bool) -> Result<AcState> {
        self.apply(&payloads::swing(on)).await
    }

    /// Toggle sleep mode.
    pub async fn set_sleep(&mut self, on: bool) -> Result<AcState> {
        self.apply(&payloads::sleep(on)).await
    }

    /// Toggle the health (ionizer) function.
    pub async fn set_health(&mut self, on: bool) -> Result<AcState> {
        self.apply(&payloads::health(on)).await
    }

    /// Calibration offsets this device decodes with.
    pub fn offsets(&self) -> &Offsets {
        &self.offsets
    }

    /// The underlying protocol client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Mutable access to the protocol client.
    pub fn client_mut(&mut self) -> &mut C {
        &mut self.client
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{sample_raw_state, MockTuyaClient};
    use crate::protocol::{DataPoint, RawValue};
    use pretty_assertions::assert_eq;

    fn device() -> AcDevice<MockTuyaClient> {
        AcDevice::new(
            MockTuyaClient::with_state(sample_raw_state()),
            Offsets::default(),
        )
    }

    #[tokio::test]
    async fn test_read_decodes_live_state() {
        let mut dev = device();
        let state = dev.read().await.unwrap();
        assert!(state.power);
        assert_eq!(state.mode, Mode::Heat);
        assert_eq!(state.set_point, 20.0);
    }

    #[tokio::test]
    async fn test_apply_identical_state_sends_nothing() {
        let mut dev = device();
        let desired = sample_raw_state();
        let state = dev.apply(&desired).await.unwrap();
        assert!(state.power);
        assert!(dev.client.sent().is_empty());
    }

    #[tokio::test]
    async fn test_apply_empty_desired_sends_nothing() {
        let mut dev = device();
        dev.apply(&RawState::new()).await.unwrap();
        assert!(dev.client.sent().is_empty());
    }

    #[tokio::test]
    async fn test_apply_sends_only_changed_keys() {
        let mut dev = device();
        let desired = RawState::from([
            (DataPoint::Power, RawValue::Bool(true)),  // unchanged
            (DataPoint::Health, RawValue::Bool(true)), // flips
        ]);
        dev.apply(&desired).await.unwrap();
        assert_eq!(
            dev.client.sent(),
            [RawState::from([(DataPoint::Health, RawValue::Bool(true))])]
        );
    }

    #[tokio::test]
    async fn test_apply_blocked_change_short_circuits() {
        let mut state = sample_raw_state();
        state.insert(DataPoint::Eco, RawValue::Bool(true));
        let mut dev = AcDevice::new(MockTuyaClient::with_state(state), Offsets::default());

        // Set point is frozen under eco; nothing must hit the network.
        let result = dev.set_temperature(18.0).await.unwrap();
        assert_eq!(result.set_point, 20.0);
        assert!(dev.client.sent().is_empty());
    }

    #[tokio::test]
    async fn test_setter_round_trips_through_device() {
        let mut dev = device();
        let state = dev.set_temperature(22.0).await.unwrap();
        assert_eq!(
            dev.client.sent(),
            [RawState::from([(DataPoint::SetPoint, RawValue::Int(220))])]
        );
        // The mock folds writes back into its state, so the re-read confirms.
        assert_eq!(state.set_point, 22.0);
    }

    #[tokio::test]
    async fn test_communication_error_propagates() {
        let mut dev = AcDevice::new(MockTuyaClient::failing(), Offsets::default());
        let err = dev.set_power(true).await.unwrap_err();
        assert!(err.is_retryable());
    }
}

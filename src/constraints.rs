//! Constraint validation against the device's current operating mode
//!
//! The firmware silently ignores commands that are incompatible with the
//! active mode instead of reporting an error. Sending them anyway leaves the
//! host widgets out of step with reality, so this engine drops such changes
//! before they reach the network. Dropping is *not* a failure: the filter
//! mirrors what the hardware would do, minus the wasted round trip.
//!
//! Rules only ever consult the device's current confirmed state, never other
//! desired values in the same batch, so two attributes cannot unblock each
//! other within one call.

use crate::protocol::{DataPoint, RawState, RawValue};
use crate::state::{FanSpeed, Mode};
use tracing::debug;

/// One (key, forbidden current values) blocker.
///
/// Matches when the device currently reports any of the forbidden values for
/// the key. A missing key never matches.
#[derive(Debug, Clone)]
pub struct Exclusion {
    pub key: DataPoint,
    pub forbidden: Vec<RawValue>,
}

impl Exclusion {
    pub fn new(key: DataPoint, forbidden: impl IntoIterator<Item = RawValue>) -> Self {
        Self {
            key,
            forbidden: forbidden.into_iter().collect(),
        }
    }

    fn matches(&self, current: &RawState) -> bool {
        current.get(&self.key).is_some_and(|value| {
            self.forbidden
                .iter()
                .any(|forbidden| values_match(forbidden, value))
        })
    }
}

/// Switch-like data points arrive as integers on some firmware revisions, so
/// boolean exclusions compare through the same truthiness coercion the codec
/// uses. Everything else is strict equality.
fn values_match(forbidden: &RawValue, current: &RawValue) -> bool {
    match forbidden {
        RawValue::Bool(b) => current.as_bool() == Some(*b),
        _ => forbidden == current,
    }
}

/// A rule blocking changes to one data point.
///
/// With a `restrict_to` allow-list the rule governs only those desired
/// values; without one it governs every change to the target key. Exclusions
/// are OR-combined: any single match blocks.
#[derive(Debug, Clone)]
pub struct Constraint {
    pub target: DataPoint,
    pub restrict_to: Option<Vec<RawValue>>,
    pub exclusions: Vec<Exclusion>,
}

impl Constraint {
    pub fn new(target: DataPoint, exclusions: impl IntoIterator<Item = Exclusion>) -> Self {
        Self {
            target,
            restrict_to: None,
            exclusions: exclusions.into_iter().collect(),
        }
    }

    /// Limit the rule to specific desired values of the target key.
    pub fn restrict_to(mut self, values: impl IntoIterator<Item = RawValue>) -> Self {
        self.restrict_to = Some(values.into_iter().collect());
        self
    }

    fn governs(&self, value: &RawValue) -> bool {
        match &self.restrict_to {
            Some(values) => values.contains(value),
            None => true,
        }
    }

    fn blocks(&self, value: &RawValue, current: &RawState) -> bool {
        self.governs(value) && self.exclusions.iter().any(|e| e.matches(current))
    }
}

/// Immutable ordered rule table, declared once at session start.
///
/// Multiple constraints on the same key are AND-combined: a desired value
/// survives only if every governing rule passes. Evaluation order does not
/// affect the outcome.
#[derive(Debug, Clone, Default)]
pub struct ConstraintSet {
    rules: Vec<Constraint>,
}

impl ConstraintSet {
    pub fn new(rules: impl IntoIterator<Item = Constraint>) -> Self {
        Self {
            rules: rules.into_iter().collect(),
        }
    }

    /// Drop every desired change blocked by the current device state.
    ///
    /// Never errors; blocked pairs disappear silently, with a debug log for
    /// troubleshooting.
    pub fn filter(&self, desired: &RawState, current: &RawState) -> RawState {
        desired
            .iter()
            .filter(|&(key, value)| {
                let blocked = self
                    .rules
                    .iter()
                    .any(|rule| rule.target == *key && rule.blocks(value, current));
                if blocked {
                    debug!("dropping blocked update for data point {key}: {value:?}");
                }
                !blocked
            })
            .map(|(key, value)| (*key, value.clone()))
            .collect()
    }
}

fn modes(values: impl IntoIterator<Item = Mode>) -> Vec<RawValue> {
    values.into_iter().map(|m| RawValue::from(m.wire())).collect()
}

/// The Airton rule table.
///
/// Reproduced from observed device behavior:
/// - the set point is fixed while the unit picks its own target (auto/vent
///   modes, eco),
/// - fan speed is managed by the unit while drying, turbo being the nominal
///   escape hatch,
/// - turbo itself is refused in auto/dry or under eco, which in practice
///   leaves no way to force turbo while drying (kept as the firmware has it),
/// - eco only applies to cool and heat,
/// - sleep follows the same availability as the set point.
pub fn airton_rules() -> ConstraintSet {
    ConstraintSet::new([
        Constraint::new(
            DataPoint::SetPoint,
            [
                Exclusion::new(DataPoint::Mode, modes([Mode::Auto, Mode::Vent])),
                Exclusion::new(DataPoint::Eco, [RawValue::Bool(true)]),
            ],
        ),
        Constraint::new(
            DataPoint::Fan,
            [Exclusion::new(DataPoint::Mode, modes([Mode::Dry]))],
        )
        .restrict_to(
            [
                FanSpeed::Auto,
                FanSpeed::Quiet,
                FanSpeed::L1,
                FanSpeed::L2,
                FanSpeed::L3,
                FanSpeed::L4,
                FanSpeed::L5,
            ]
            .map(|s| RawValue::from(s.wire())),
        ),
        Constraint::new(
            DataPoint::Fan,
            [
                Exclusion::new(DataPoint::Mode, modes([Mode::Auto, Mode::Dry])),
                Exclusion::new(DataPoint::Eco, [RawValue::Bool(true)]),
            ],
        )
        .restrict_to([RawValue::from(FanSpeed::Turbo.wire())]),
        Constraint::new(
            DataPoint::Eco,
            [Exclusion::new(
                DataPoint::Mode,
                modes([Mode::Auto, Mode::Dry, Mode::Vent]),
            )],
        ),
        Constraint::new(
            DataPoint::Sleep,
            [
                Exclusion::new(DataPoint::Mode, modes([Mode::Auto, Mode::Vent])),
                Exclusion::new(DataPoint::Eco, [RawValue::Bool(true)]),
            ],
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn current(mode: Mode, eco: bool) -> RawState {
        RawState::from([
            (DataPoint::Mode, RawValue::from(mode.wire())),
            (DataPoint::Eco, RawValue::Bool(eco)),
            (DataPoint::SetPoint, RawValue::Int(170)),
        ])
    }

    fn set_point_change() -> RawState {
        RawState::from([(DataPoint::SetPoint, RawValue::Int(160))])
    }

    #[rstest]
    // Set point cannot be set while the unit picks its own target.
    #[case(Mode::Auto, false, false)]
    #[case(Mode::Vent, false, false)]
    // Or under eco, regardless of mode.
    #[case(Mode::Heat, true, false)]
    // Other modes pass unchanged.
    #[case(Mode::Heat, false, true)]
    #[case(Mode::Cool, false, true)]
    fn test_set_point_rules(#[case] mode: Mode, #[case] eco: bool, #[case] passes: bool) {
        let filtered = airton_rules().filter(&set_point_change(), &current(mode, eco));
        assert_eq!(filtered, if passes { set_point_change() } else { RawState::new() });
    }

    #[rstest]
    #[case(FanSpeed::L3, Mode::Dry, false, false)]
    #[case(FanSpeed::L3, Mode::Heat, false, true)]
    #[case(FanSpeed::L3, Mode::Heat, true, true)]
    // Turbo escapes the dry-mode rule but trips its own exclusions.
    #[case(FanSpeed::Turbo, Mode::Dry, false, false)]
    #[case(FanSpeed::Turbo, Mode::Auto, false, false)]
    #[case(FanSpeed::Turbo, Mode::Heat, true, false)]
    #[case(FanSpeed::Turbo, Mode::Heat, false, true)]
    fn test_fan_rules(
        #[case] speed: FanSpeed,
        #[case] mode: Mode,
        #[case] eco: bool,
        #[case] passes: bool,
    ) {
        let desired = RawState::from([(DataPoint::Fan, RawValue::from(speed.wire()))]);
        let filtered = airton_rules().filter(&desired, &current(mode, eco));
        assert_eq!(filtered.len(), usize::from(passes));
    }

    #[rstest]
    #[case(Mode::Auto, false)]
    #[case(Mode::Dry, false)]
    #[case(Mode::Vent, false)]
    #[case(Mode::Heat, true)]
    fn test_eco_rules(#[case] mode: Mode, #[case] passes: bool) {
        let desired = RawState::from([(DataPoint::Eco, RawValue::Bool(true))]);
        let filtered = airton_rules().filter(&desired, &current(mode, false));
        assert_eq!(filtered.len(), usize::from(passes));
    }

    #[rstest]
    #[case(Mode::Auto, false, false)]
    #[case(Mode::Vent, false, false)]
    #[case(Mode::Cool, true, false)]
    #[case(Mode::Cool, false, true)]
    fn test_sleep_rules(#[case] mode: Mode, #[case] eco: bool, #[case] passes: bool) {
        let desired = RawState::from([(DataPoint::Sleep, RawValue::Bool(true))]);
        let filtered = airton_rules().filter(&desired, &current(mode, eco));
        assert_eq!(filtered.len(), usize::from(passes));
    }

    /// Unconstrained keys always pass, and surviving keys keep their values.
    #[test]
    fn test_mixed_batch_partial_drop() {
        let desired = RawState::from([
            (DataPoint::SetPoint, RawValue::Int(160)),
            (DataPoint::Light, RawValue::Bool(false)),
        ]);
        let filtered = airton_rules().filter(&desired, &current(Mode::Auto, false));
        assert_eq!(
            filtered,
            RawState::from([(DataPoint::Light, RawValue::Bool(false))])
        );
    }

    /// Eco reported as an integer blocks the same way the codec decodes it.
    #[rstest]
    #[case(RawValue::Int(1), false)]
    #[case(RawValue::Int(0), true)]
    #[case(RawValue::Bool(true), false)]
    fn test_integer_switch_values_match_boolean_exclusions(
        #[case] eco: RawValue,
        #[case] passes: bool,
    ) {
        let mut current = current(Mode::Heat, false);
        current.insert(DataPoint::Eco, eco);
        let filtered = airton_rules().filter(&set_point_change(), &current);
        assert_eq!(filtered.len(), usize::from(passes));
    }

    /// A key named by an exclusion but absent from the snapshot never blocks.
    #[test]
    fn test_missing_exclusion_key_does_not_block() {
        let current = RawState::from([(DataPoint::Mode, RawValue::from(Mode::Heat.wire()))]);
        let filtered = airton_rules().filter(&set_point_change(), &current);
        assert_eq!(filtered, set_point_change());
    }

    #[test]
    fn test_empty_desired_is_empty() {
        let filtered = airton_rules().filter(&RawState::new(), &current(Mode::Heat, false));
        assert!(filtered.is_empty());
    }
}

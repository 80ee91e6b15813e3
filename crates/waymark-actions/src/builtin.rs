//! The simulator's native action set.

use waymark_core::action::{ActuationMap, ActuationSpec, names};
use waymark_core::config::ActionsConfig;

/// Built-in actions in id order.
pub const BUILTIN_ACTIONS: [&str; 6] = [
    names::STOP,
    names::MOVE_FORWARD,
    names::TURN_LEFT,
    names::TURN_RIGHT,
    names::LOOK_UP,
    names::LOOK_DOWN,
];

/// Native actuation specs for the built-ins, taken verbatim from config.
///
/// `stop` carries a zero amount; it ends the episode and moves nothing.
#[must_use]
pub fn builtin_actuation(config: &ActionsConfig) -> ActuationMap {
    let look = ActuationSpec {
        body_action: false,
        ..ActuationSpec::native(config.tilt_angle)
    };

    [
        (names::STOP, ActuationSpec::native(0.0)),
        (names::MOVE_FORWARD, ActuationSpec::native(config.forward_step)),
        (names::TURN_LEFT, ActuationSpec::native(config.turn_angle)),
        (names::TURN_RIGHT, ActuationSpec::native(config.turn_angle)),
        (names::LOOK_UP, look.clone()),
        (names::LOOK_DOWN, look),
    ]
    .into_iter()
    .map(|(name, spec)| (name.to_string(), spec))
    .collect()
}

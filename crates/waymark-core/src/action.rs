//! Action value types shared between the catalog, the simulator and the
//! control loop.
//!
//! An [`Action`] is a tagged variant: built-in actions are executed natively
//! by the simulator, custom actions carry their own behavior handles in
//! [`CustomAction`].

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::SimError;
use crate::traits::Simulator;
use crate::types::{Observation, SceneNode};

/// Names of the simulator's built-in actions.
pub mod names {
    pub const STOP: &str = "stop";
    pub const MOVE_FORWARD: &str = "move_forward";
    pub const TURN_LEFT: &str = "turn_left";
    pub const TURN_RIGHT: &str = "turn_right";
    pub const LOOK_UP: &str = "look_up";
    pub const LOOK_DOWN: &str = "look_down";

    pub const MOVE_BACKWARD: &str = "move_backward";
    pub const LOOK_LEFTISH: &str = "look_leftish";
    pub const LOOK_RIGHTISH: &str = "look_rightish";
}

// ---------------------------------------------------------------------------
// Behavior handles
// ---------------------------------------------------------------------------

/// Low-level motion applied to a scene node with an actuation amount.
pub type MotionBehavior = Arc<dyn Fn(&mut SceneNode, f32) + Send + Sync>;

/// Task-level step handler for a custom action.
pub type TaskHandler =
    Arc<dyn Fn(&mut dyn Simulator, &Action) -> Result<Observation, SimError> + Send + Sync>;

// ---------------------------------------------------------------------------
// ActionId
// ---------------------------------------------------------------------------

/// Stable identifier of an action within one catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionId(pub u32);

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// ActuationSpec
// ---------------------------------------------------------------------------

/// Simulator-level description of how an action moves the agent.
#[derive(Clone)]
pub struct ActuationSpec {
    /// Magnitude (degrees for rotations, metres for translations).
    pub amount: f32,
    /// `true` moves the agent body, `false` moves only the sensor mount.
    pub body_action: bool,
    /// Motion primitive; `None` for built-ins the simulator executes natively.
    pub motion: Option<MotionBehavior>,
}

impl ActuationSpec {
    /// Spec for a built-in action.
    #[must_use]
    pub const fn native(amount: f32) -> Self {
        Self {
            amount,
            body_action: true,
            motion: None,
        }
    }
}

impl fmt::Debug for ActuationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActuationSpec")
            .field("amount", &self.amount)
            .field("body_action", &self.body_action)
            .field("motion", &self.motion.is_some())
            .finish()
    }
}

/// Action name to actuation spec, merged over built-ins and custom actions.
pub type ActuationMap = BTreeMap<String, ActuationSpec>;

// ---------------------------------------------------------------------------
// ActionKind
// ---------------------------------------------------------------------------

/// Dispatch details of a custom action.
#[derive(Clone)]
pub struct CustomAction {
    pub motion: Option<MotionBehavior>,
    pub task_handler: Option<TaskHandler>,
    pub actuation_amount: f32,
    pub body_action: bool,
}

impl fmt::Debug for CustomAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomAction")
            .field("motion", &self.motion.is_some())
            .field("task_handler", &self.task_handler.is_some())
            .field("actuation_amount", &self.actuation_amount)
            .field("body_action", &self.body_action)
            .finish()
    }
}

/// Discriminator between simulator-native and declared actions.
#[derive(Clone, Debug)]
pub enum ActionKind {
    Builtin,
    Custom(CustomAction),
}

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// A named, identified operation the agent can perform in one step.
#[derive(Clone, Debug)]
pub struct Action {
    name: String,
    id: ActionId,
    kind: ActionKind,
}

impl Action {
    #[must_use]
    pub fn new(name: impl Into<String>, id: ActionId, kind: ActionKind) -> Self {
        Self {
            name: name.into(),
            id,
            kind,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn id(&self) -> ActionId {
        self.id
    }

    #[must_use]
    pub const fn kind(&self) -> &ActionKind {
        &self.kind
    }

    #[must_use]
    pub const fn is_builtin(&self) -> bool {
        matches!(self.kind, ActionKind::Builtin)
    }

    /// Custom dispatch details, if any.
    #[must_use]
    pub const fn custom(&self) -> Option<&CustomAction> {
        match &self.kind {
            ActionKind::Custom(custom) => Some(custom),
            ActionKind::Builtin => None,
        }
    }

    /// Whether this is the terminal "stop" action.
    #[must_use]
    pub fn is_stop(&self) -> bool {
        self.name == names::STOP
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_action_has_no_custom_details() {
        let action = Action::new(names::STOP, ActionId(0), ActionKind::Builtin);
        assert!(action.is_builtin());
        assert!(action.is_stop());
        assert!(action.custom().is_none());
    }

    #[test]
    fn custom_action_exposes_details() {
        let custom = CustomAction {
            motion: Some(Arc::new(|node: &mut SceneNode, amount: f32| {
                node.translation.x += amount;
            })),
            task_handler: None,
            actuation_amount: 0.5,
            body_action: true,
        };
        let action = Action::new(names::MOVE_BACKWARD, ActionId(6), ActionKind::Custom(custom));
        assert!(!action.is_builtin());
        assert!(!action.is_stop());

        let details = action.custom().unwrap();
        let mut node = SceneNode::identity();
        (details.motion.as_ref().unwrap())(&mut node, details.actuation_amount);
        assert!((node.translation.x - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn custom_action_debug_hides_closures() {
        let custom = CustomAction {
            motion: None,
            task_handler: None,
            actuation_amount: 10.0,
            body_action: false,
        };
        let debug = format!("{custom:?}");
        assert!(debug.contains("motion: false"));
        assert!(debug.contains("actuation_amount: 10.0"));
    }

    #[test]
    fn action_id_display() {
        assert_eq!(ActionId(7).to_string(), "7");
    }
}

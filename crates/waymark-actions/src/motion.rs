//! Low-level motion primitives bound to custom actions.
//!
//! Each primitive is a [`MotionBehavior`] closure that mutates a single
//! [`SceneNode`]'s local transform. Whether the node is the agent body or
//! the sensor mount is decided by the action's `body_action` flag, not by
//! the primitive.

use std::sync::Arc;

use nalgebra::Vector3;
use waymark_core::action::MotionBehavior;
use waymark_core::config::MotionKind;
use waymark_core::types::SceneNode;

/// Rotate about the node's local vertical (+Y) axis by `amount` degrees.
#[must_use]
pub fn yaw() -> MotionBehavior {
    Arc::new(|node: &mut SceneNode, amount: f32| {
        node.rotate_local(amount.to_radians(), &Vector3::y_axis());
    })
}

/// Rotate about the node's local lateral (+X) axis by `amount` degrees.
#[must_use]
pub fn pitch() -> MotionBehavior {
    Arc::new(|node: &mut SceneNode, amount: f32| {
        node.rotate_local(amount.to_radians(), &Vector3::x_axis());
    })
}

/// Translate along the node's local +Z (backward) axis by `amount` metres.
#[must_use]
pub fn translate_backward() -> MotionBehavior {
    Arc::new(|node: &mut SceneNode, amount: f32| {
        node.translate_local(&Vector3::new(0.0, 0.0, amount));
    })
}

/// Primitive and `body_action` flag for a configured motion kind.
#[must_use]
pub fn for_kind(kind: MotionKind) -> (MotionBehavior, bool) {
    match kind {
        MotionKind::YawSensor => (yaw(), false),
        MotionKind::PitchSensor => (pitch(), false),
        MotionKind::TranslateBody => (translate_backward(), true),
    }
}

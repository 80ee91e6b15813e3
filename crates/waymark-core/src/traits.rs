use crate::action::{Action, ActuationMap};
use crate::error::{InputError, SimError};
use crate::types::{AgentState, FrameBuffer, InputCode, Observation};

// ---------------------------------------------------------------------------
// Simulator
// ---------------------------------------------------------------------------

/// The embodied-agent simulator driven by a recording session.
///
/// Physics, rendering and the built-in movement primitives live behind this
/// trait. The session only decides which action fires and captures the
/// resulting state.
pub trait Simulator {
    /// Reset to the start of a new episode and return the first observation.
    fn reset(&mut self) -> Result<Observation, SimError>;

    /// Execute one action and return the resulting observation.
    fn step(&mut self, action: &Action) -> Result<Observation, SimError>;

    /// Current agent body and sensor state.
    fn agent_state(&self) -> AgentState;

    /// Whether the episode has ended (step budget, stop called, goal reached).
    fn episode_over(&self) -> bool;

    /// Distance to the episode goal, for tasks with a goal-distance criterion.
    fn goal_distance(&self) -> Option<f32> {
        None
    }

    /// Install the merged built-in + custom actuation specs.
    fn configure_actions(&mut self, _actuation: &ActuationMap) {}

    /// Human-readable name for this simulator.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

// ---------------------------------------------------------------------------
// FrameDisplay
// ---------------------------------------------------------------------------

/// Sink that shows the latest camera image to the operator.
pub trait FrameDisplay {
    /// Show a frame. `step` is 0 for the post-reset observation.
    fn show(&mut self, step: u32, image: &FrameBuffer);
}

/// Display that discards every frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullDisplay;

impl FrameDisplay for NullDisplay {
    fn show(&mut self, _step: u32, _image: &FrameBuffer) {}
}

// ---------------------------------------------------------------------------
// InputSource
// ---------------------------------------------------------------------------

/// Blocking source of operator key presses.
pub trait InputSource {
    /// Wait for the next key press. `Ok(None)` means the source is closed
    /// (window closed, script exhausted, escape pressed).
    fn next_code(&mut self) -> Result<Option<InputCode>, InputError>;
}

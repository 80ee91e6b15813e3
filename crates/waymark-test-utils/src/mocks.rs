//! Mock implementations of collaborator traits for testing.
//!
//! [`MockSimulator`] records every action it is stepped with and can be
//! configured to end the episode or fail at a given step. [`RecordingDisplay`]
//! remembers which steps were shown.

use waymark_core::action::{Action, ActuationMap};
use waymark_core::error::SimError;
use waymark_core::traits::{FrameDisplay, Simulator};
use waymark_core::types::{AgentState, FrameBuffer, Observation, PixelFormat};

// ---------------------------------------------------------------------------
// MockSimulator
// ---------------------------------------------------------------------------

/// A simulator that moves nothing and records what it was asked to do.
#[derive(Debug, Default)]
pub struct MockSimulator {
    stepped: Vec<String>,
    resets: u32,
    stop_called: bool,
    max_steps: Option<usize>,
    fail_at: Option<usize>,
    goal_distance: Option<f32>,
    state: AgentState,
    configured: Vec<String>,
}

impl MockSimulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// End the episode after `steps` steps.
    #[must_use]
    pub const fn with_max_steps(mut self, steps: usize) -> Self {
        self.max_steps = Some(steps);
        self
    }

    /// Fail the `step`-th call to [`Simulator::step`] (1-based).
    #[must_use]
    pub const fn failing_at(mut self, step: usize) -> Self {
        self.fail_at = Some(step);
        self
    }

    /// Report a fixed goal distance.
    #[must_use]
    pub const fn with_goal_distance(mut self, distance: f32) -> Self {
        self.goal_distance = Some(distance);
        self
    }

    /// Report a fixed agent state.
    #[must_use]
    pub const fn with_state(mut self, state: AgentState) -> Self {
        self.state = state;
        self
    }

    /// Names of actions stepped so far, in order.
    pub fn stepped(&self) -> &[String] {
        &self.stepped
    }

    pub const fn resets(&self) -> u32 {
        self.resets
    }

    /// Action names received through [`Simulator::configure_actions`].
    pub fn configured(&self) -> &[String] {
        &self.configured
    }

    #[allow(clippy::cast_possible_truncation)]
    fn observation(&self) -> Observation {
        let shade = self.stepped.len() as u8;
        let image = FrameBuffer::from_raw(2, 2, PixelFormat::Rgb8, vec![shade; 12])
            .unwrap_or_else(|| FrameBuffer::new(2, 2, PixelFormat::Rgb8));
        Observation::new(image)
    }
}

impl Simulator for MockSimulator {
    fn reset(&mut self) -> Result<Observation, SimError> {
        self.resets += 1;
        self.stepped.clear();
        self.stop_called = false;
        Ok(self.observation())
    }

    fn step(&mut self, action: &Action) -> Result<Observation, SimError> {
        if self.fail_at == Some(self.stepped.len() + 1) {
            return Err(SimError::StepFailed(format!(
                "mock failure on {}",
                action.name()
            )));
        }
        self.stepped.push(action.name().to_string());
        if action.is_stop() {
            self.stop_called = true;
        }
        Ok(self.observation())
    }

    fn agent_state(&self) -> AgentState {
        self.state
    }

    fn episode_over(&self) -> bool {
        self.stop_called || self.max_steps.is_some_and(|max| self.stepped.len() >= max)
    }

    fn goal_distance(&self) -> Option<f32> {
        self.goal_distance
    }

    fn configure_actions(&mut self, actuation: &ActuationMap) {
        self.configured = actuation.keys().cloned().collect();
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "MockSimulator"
    }
}

// ---------------------------------------------------------------------------
// RecordingDisplay
// ---------------------------------------------------------------------------

/// A display that remembers the step index of every frame shown.
#[derive(Debug, Default)]
pub struct RecordingDisplay {
    shown: Vec<u32>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shown(&self) -> &[u32] {
        &self.shown
    }
}

impl FrameDisplay for RecordingDisplay {
    fn show(&mut self, step: u32, _image: &FrameBuffer) {
        self.shown.push(step);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! The session control loop.
//!
//! [`ControlLoop`] blocks on one key press at a time, maps it to an action,
//! steps the simulator, extracts the camera pose and hands the frame to the
//! recorder and the display. It is strictly sequential: one action in flight,
//! frames written in step order.

use std::path::PathBuf;

use tracing::{error, info, warn};
use waymark_core::action::{Action, names};
use waymark_core::error::{SessionError, SimError};
use waymark_core::pose::PoseExtractor;
use waymark_core::traits::{FrameDisplay, InputSource, Simulator};
use waymark_core::types::Observation;
use waymark_record::{Frame, SessionRecorder};
use waymark_teleop::{InputActionMapper, MappedInput};

// ---------------------------------------------------------------------------
// LoopState
// ---------------------------------------------------------------------------

/// Lifecycle state of a control loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LoopState {
    /// Before [`ControlLoop::run`].
    #[default]
    Idle,
    /// Accepting input and stepping.
    Running,
    /// Episode over, input closed, `stop` issued or a fatal error.
    Finished,
}

impl LoopState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Finished)
    }
}

// ---------------------------------------------------------------------------
// SessionSummary
// ---------------------------------------------------------------------------

/// Success judgement for tasks with a goal-distance criterion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// `stop` was the last action and the agent ended inside the goal radius.
    Success,
    Failure,
    /// The task exposes no goal distance.
    NotApplicable,
}

/// What a finished session did.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionSummary {
    /// Frames recorded.
    pub steps: u32,
    pub last_action: Option<String>,
    pub outcome: Outcome,
    pub goal_distance: Option<f32>,
    /// Directory holding the frames and pose records.
    pub output_dir: PathBuf,
}

// ---------------------------------------------------------------------------
// ControlLoop
// ---------------------------------------------------------------------------

/// Drives one recording session to completion.
pub struct ControlLoop<S, I, D> {
    simulator: S,
    input: I,
    display: D,
    mapper: InputActionMapper,
    recorder: SessionRecorder,
    success_distance: f32,
    state: LoopState,
    steps: u32,
    last_action: Option<String>,
}

impl<S, I, D> ControlLoop<S, I, D>
where
    S: Simulator,
    I: InputSource,
    D: FrameDisplay,
{
    pub fn new(
        simulator: S,
        input: I,
        display: D,
        mapper: InputActionMapper,
        recorder: SessionRecorder,
    ) -> Self {
        Self {
            simulator,
            input,
            display,
            mapper,
            recorder,
            success_distance: 0.2,
            state: LoopState::Idle,
            steps: 0,
            last_action: None,
        }
    }

    /// Goal radius used for the success judgement.
    #[must_use]
    pub const fn with_success_distance(mut self, distance: f32) -> Self {
        self.success_distance = distance;
        self
    }

    /// Run until the session finishes.
    ///
    /// The recorder is closed on every exit path. Calling `run` again after
    /// the loop has finished returns the same summary without stepping.
    ///
    /// # Errors
    ///
    /// Simulator step failures, recorder I/O failures and input failures are
    /// fatal and propagated after the recorder has been closed.
    pub fn run(&mut self) -> Result<SessionSummary, SessionError> {
        if self.state.is_finished() {
            return Ok(self.summary());
        }

        let result = self.drive();
        self.state = LoopState::Finished;
        let closed = self.recorder.close();

        match (result, closed) {
            (Ok(()), Ok(())) => {
                let summary = self.summary();
                info!(steps = summary.steps, outcome = ?summary.outcome, "session finished");
                Ok(summary)
            }
            (Ok(()), Err(e)) => {
                error!("failed to close recorder: {e}");
                Err(e.into())
            }
            (Err(e), closed) => {
                if let Err(close_err) = closed {
                    warn!("failed to close recorder after error: {close_err}");
                }
                error!("session aborted: {e}");
                Err(e)
            }
        }
    }

    fn drive(&mut self) -> Result<(), SessionError> {
        let first = self.simulator.reset()?;
        self.display.show(0, &first.image);
        self.state = LoopState::Running;
        info!(simulator = self.simulator.name(), "episode started");

        while !self.simulator.episode_over() {
            let Some(code) = self.input.next_code()? else {
                info!("input closed");
                break;
            };
            let action = match self.mapper.map(code) {
                MappedInput::Action(action) => action.clone(),
                MappedInput::Unrecognized(code) => {
                    warn!(key = %code, "unrecognized input");
                    continue;
                }
            };

            info!(action = action.name(), id = action.id().0, "action");
            let observation = self.dispatch(&action)?;

            let step = self.recorder.next_step_index();
            let pose = PoseExtractor::extract_state(&self.simulator.agent_state());
            let frame = Frame::new(step, observation.image, pose, action.name());
            self.recorder.append_frame(&frame)?;
            self.steps = step;
            self.display.show(step, frame.image());
            self.last_action = Some(action.name().to_string());

            if action.is_stop() {
                break;
            }
        }
        Ok(())
    }

    fn dispatch(&mut self, action: &Action) -> Result<Observation, SimError> {
        match action.custom().and_then(|custom| custom.task_handler.as_ref()) {
            Some(handler) => handler(&mut self.simulator, action),
            None => self.simulator.step(action),
        }
    }

    fn summary(&self) -> SessionSummary {
        let goal_distance = self.simulator.goal_distance();
        let stopped = self.last_action.as_deref() == Some(names::STOP);
        let outcome = match goal_distance {
            None => Outcome::NotApplicable,
            Some(distance) if stopped && distance < self.success_distance => Outcome::Success,
            Some(_) => Outcome::Failure,
        };
        SessionSummary {
            steps: self.steps,
            last_action: self.last_action.clone(),
            outcome,
            goal_distance,
            output_dir: self.recorder.poses_dir().to_path_buf(),
        }
    }

    pub const fn state(&self) -> LoopState {
        self.state
    }

    pub const fn simulator(&self) -> &S {
        &self.simulator
    }

    pub const fn display(&self) -> &D {
        &self.display
    }

    pub const fn recorder(&self) -> &SessionRecorder {
        &self.recorder
    }

    pub const fn mapper(&self) -> &InputActionMapper {
        &self.mapper
    }
}

impl<S, I, D> std::fmt::Debug for ControlLoop<S, I, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlLoop")
            .field("state", &self.state)
            .field("steps", &self.steps)
            .field("last_action", &self.last_action)
            .field("recorder", &self.recorder)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

// waymark-core: Types, traits, config, pose extraction and errors for Waymark session recording.

pub mod action;
pub mod config;
pub mod error;
pub mod pose;
pub mod traits;
pub mod types;

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        action::{
            Action, ActionId, ActionKind, ActuationMap, ActuationSpec, CustomAction,
            MotionBehavior, TaskHandler, names,
        },
        config::{
            ActionsConfig, BindingConfig, CustomActionConfig, MotionKind, PoseLayout,
            SessionConfig,
        },
        error::{CatalogError, ConfigError, InputError, RecordError, SessionError, SimError},
        pose::{Pose, PoseExtractor},
        traits::{FrameDisplay, InputSource, NullDisplay, Simulator},
        types::{AgentState, FrameBuffer, InputCode, Observation, PixelFormat, SceneNode},
    };
}

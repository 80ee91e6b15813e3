//! Session driver and reference simulator for Waymark.
//!
//! - [`ControlLoop`]: reads input, steps the simulator, records frames
//!   until `stop`, episode end or input close
//! - [`KinematicSim`]: kinematics-only [`Simulator`](waymark_core::traits::Simulator)
//!   with a synthetic camera
//! - [`build_session`] / [`kinematic_session`]: wire a loop from
//!   [`SessionConfig`](waymark_core::config::SessionConfig)
//!
//! # Example
//!
//! ```no_run
//! use waymark_core::config::SessionConfig;
//! use waymark_core::traits::NullDisplay;
//! use waymark_sim::prelude::*;
//! use waymark_teleop::ScriptedInput;
//!
//! let config = SessionConfig::default();
//! let keys = ScriptedInput::parse("wwaf");
//! let mut session = kinematic_session(&config, keys, NullDisplay).unwrap();
//! let summary = session.run().unwrap();
//! assert_eq!(summary.steps, 4);
//! ```

pub mod control;
pub mod kinematic;
pub mod session;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use control::{ControlLoop, LoopState, Outcome, SessionSummary};
pub use kinematic::KinematicSim;
pub use session::{build_session, kinematic_session, session_bindings};

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        ControlLoop, KinematicSim, LoopState, Outcome, SessionSummary, build_session,
        kinematic_session, session_bindings,
    };
}

//! Keyboard teleoperation for Waymark sessions.
//!
//! This crate separates input capture from action selection:
//!
//! - [`BindingTable`]: input code to action name, defaults plus config overrides
//! - [`InputActionMapper`]: input code to catalog [`Action`](waymark_core::action::Action),
//!   or [`MappedInput::Unrecognized`]
//! - [`ScriptedInput`] / [`TerminalKeys`]: [`InputSource`](waymark_core::traits::InputSource)
//!   implementations for replayed key strings and the interactive terminal
//!
//! # Example
//!
//! ```
//! use waymark_actions::ActionSpaceExtender;
//! use waymark_core::config::ActionsConfig;
//! use waymark_core::traits::InputSource;
//! use waymark_teleop::prelude::*;
//!
//! let space = ActionSpaceExtender::from_config(&ActionsConfig::default()).build().unwrap();
//! let mapper = InputActionMapper::new(&space.catalog, &BindingTable::defaults()).unwrap();
//! let mut keys = ScriptedInput::parse("w<f");
//!
//! let mut names = Vec::new();
//! while let Some(code) = keys.next_code().unwrap() {
//!     if let MappedInput::Action(action) = mapper.map(code) {
//!         names.push(action.name().to_string());
//!     }
//! }
//! assert_eq!(names, ["move_forward", "look_leftish", "stop"]);
//! ```

pub mod bindings;
pub mod mapper;
pub mod source;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use bindings::{BindingTable, KeyBinding, parse_key};
pub use mapper::{InputActionMapper, MappedInput};
pub use source::{KeyOutcome, ScriptedInput, TerminalKeys, translate_key};

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        BindingTable, InputActionMapper, KeyBinding, MappedInput, ScriptedInput, TerminalKeys,
    };
}

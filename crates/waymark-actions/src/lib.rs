//! Extensible action space for Waymark sessions.
//!
//! - [`ActionCatalog`]: per-session name -> action registry with stable ids,
//!   append-only until frozen
//! - [`ActionSpaceExtender`]: registers custom actions on top of the
//!   built-ins and derives the simulator/task wiring
//! - [`motion`]: scene-node motion primitives custom actions bind to
//!
//! # Example
//!
//! ```
//! use waymark_actions::prelude::*;
//! use waymark_core::config::ActionsConfig;
//!
//! let space = ActionSpaceExtender::from_config(&ActionsConfig::default())
//!     .build()
//!     .unwrap();
//! assert!(space.catalog.resolve("look_leftish").is_ok());
//! ```

pub mod builtin;
pub mod catalog;
pub mod extender;
pub mod motion;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use builtin::{BUILTIN_ACTIONS, builtin_actuation};
pub use catalog::ActionCatalog;
pub use extender::{
    ActionSpaceExtender, CustomActionSpec, ExtendedActionSpace, forward_to_simulator,
};

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        ActionCatalog, ActionSpaceExtender, BUILTIN_ACTIONS, CustomActionSpec,
        ExtendedActionSpace, forward_to_simulator, motion,
    };
}

//! Startup-time construction of the extended action space.
//!
//! [`ActionSpaceExtender`] takes the built-in actuation config plus an
//! explicit, ordered list of [`CustomActionSpec`] declarations and produces
//! an [`ExtendedActionSpace`]:
//!
//! - a frozen [`ActionCatalog`] holding built-ins then customs,
//! - the merged [`ActuationMap`] handed to the simulator,
//! - the name -> [`TaskHandler`] map for the task layer.
//!
//! Registration is explicit data; nothing is discovered implicitly.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;
use waymark_core::action::{
    Action, ActionKind, ActuationMap, ActuationSpec, CustomAction, MotionBehavior, TaskHandler,
};
use waymark_core::config::ActionsConfig;
use waymark_core::error::CatalogError;
use waymark_core::traits::Simulator;

use crate::builtin::builtin_actuation;
use crate::catalog::ActionCatalog;
use crate::motion;

// ---------------------------------------------------------------------------
// CustomActionSpec
// ---------------------------------------------------------------------------

/// Declaration of one custom action.
#[derive(Clone)]
pub struct CustomActionSpec {
    pub name: String,
    /// Magnitude passed verbatim to the motion primitive.
    pub actuation_amount: f32,
    pub motion: Option<MotionBehavior>,
    /// Task-level handler; defaults to [`forward_to_simulator`].
    pub task_handler: Option<TaskHandler>,
    /// `false` moves only the sensor mount, never the agent root frame.
    pub body_action: bool,
}

impl CustomActionSpec {
    /// A declaration with no motion primitive and the default handler.
    #[must_use]
    pub fn new(name: impl Into<String>, actuation_amount: f32) -> Self {
        Self {
            name: name.into(),
            actuation_amount,
            motion: None,
            task_handler: None,
            body_action: true,
        }
    }

    /// Attach a motion primitive and the node it acts on.
    #[must_use]
    pub fn with_motion(mut self, motion: MotionBehavior, body_action: bool) -> Self {
        self.motion = Some(motion);
        self.body_action = body_action;
        self
    }

    /// Override the task-level step handler.
    #[must_use]
    pub fn with_task_handler(mut self, handler: TaskHandler) -> Self {
        self.task_handler = Some(handler);
        self
    }
}

impl std::fmt::Debug for CustomActionSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomActionSpec")
            .field("name", &self.name)
            .field("actuation_amount", &self.actuation_amount)
            .field("motion", &self.motion.is_some())
            .field("task_handler", &self.task_handler.is_some())
            .field("body_action", &self.body_action)
            .finish()
    }
}

/// Default task handler: forward the action to the simulator's step.
#[must_use]
pub fn forward_to_simulator() -> TaskHandler {
    Arc::new(|sim: &mut dyn Simulator, action: &Action| sim.step(action))
}

// ---------------------------------------------------------------------------
// ExtendedActionSpace
// ---------------------------------------------------------------------------

/// Output of [`ActionSpaceExtender::build`].
pub struct ExtendedActionSpace {
    /// Frozen catalog: built-ins first, then customs in declaration order.
    pub catalog: ActionCatalog,
    /// Built-in actuation merged with every custom action's spec.
    pub actuation: ActuationMap,
    /// Step handler per custom action name.
    pub handlers: BTreeMap<String, TaskHandler>,
}

impl std::fmt::Debug for ExtendedActionSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtendedActionSpace")
            .field("catalog", &self.catalog)
            .field("actuation", &self.actuation)
            .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// ActionSpaceExtender
// ---------------------------------------------------------------------------

/// Builds the session's action space from built-ins plus declarations.
///
/// # Example
///
/// ```
/// use waymark_actions::{ActionSpaceExtender, CustomActionSpec, motion};
/// use waymark_core::config::ActionsConfig;
///
/// let actions = ActionsConfig { custom: Vec::new(), ..ActionsConfig::default() };
/// let space = ActionSpaceExtender::new(&actions)
///     .with_action(CustomActionSpec::new("look_leftish", 10.0).with_motion(motion::yaw(), false))
///     .build()
///     .unwrap();
///
/// assert!(space.catalog.is_frozen());
/// assert!(!space.actuation["look_leftish"].body_action);
/// ```
pub struct ActionSpaceExtender {
    builtin: ActuationMap,
    specs: Vec<CustomActionSpec>,
}

impl ActionSpaceExtender {
    /// Start from the built-in actuation amounts in `config`.
    ///
    /// `config.custom` is ignored here; see [`from_config`](Self::from_config).
    #[must_use]
    pub fn new(config: &ActionsConfig) -> Self {
        Self {
            builtin: builtin_actuation(config),
            specs: Vec::new(),
        }
    }

    /// Built-ins plus every `[[actions.custom]]` declaration in `config`.
    #[must_use]
    pub fn from_config(config: &ActionsConfig) -> Self {
        config.custom.iter().fold(Self::new(config), |extender, custom| {
            let (behavior, body_action) = motion::for_kind(custom.motion);
            extender.with_action(
                CustomActionSpec::new(custom.name.clone(), custom.amount)
                    .with_motion(behavior, body_action),
            )
        })
    }

    /// Append a declaration. Order determines id assignment.
    #[must_use]
    pub fn with_action(mut self, spec: CustomActionSpec) -> Self {
        self.specs.push(spec);
        self
    }

    /// Number of pending custom declarations.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.specs.len()
    }

    /// Register every declaration and freeze the catalog.
    ///
    /// # Errors
    ///
    /// [`CatalogError::DuplicateAction`] if a declared name collides with a
    /// built-in or an earlier declaration. Startup must abort on error.
    pub fn build(self) -> Result<ExtendedActionSpace, CatalogError> {
        let mut catalog = ActionCatalog::with_builtins();
        let mut actuation = self.builtin;
        let mut handlers = BTreeMap::new();

        for spec in self.specs {
            let handler = spec.task_handler.unwrap_or_else(forward_to_simulator);
            let action = catalog.register(
                spec.name.clone(),
                ActionKind::Custom(CustomAction {
                    motion: spec.motion.clone(),
                    task_handler: Some(Arc::clone(&handler)),
                    actuation_amount: spec.actuation_amount,
                    body_action: spec.body_action,
                }),
            )?;
            debug!(
                name = action.name(),
                id = action.id().0,
                amount = spec.actuation_amount,
                body_action = spec.body_action,
                "registered custom action"
            );

            actuation.insert(
                spec.name.clone(),
                ActuationSpec {
                    amount: spec.actuation_amount,
                    body_action: spec.body_action,
                    motion: spec.motion,
                },
            );
            handlers.insert(spec.name, handler);
        }

        catalog.freeze();
        Ok(ExtendedActionSpace {
            catalog,
            actuation,
            handlers,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

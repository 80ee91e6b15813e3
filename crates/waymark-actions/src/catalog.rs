//! Per-session action registry.
//!
//! [`ActionCatalog`] maps action names to [`Action`]s with stable ids. It is
//! append-only while the action space is being built and read-only once
//! [`freeze`](ActionCatalog::freeze) has been called.

use std::collections::HashMap;

use waymark_core::action::{Action, ActionId, ActionKind};
use waymark_core::error::CatalogError;

use crate::builtin::BUILTIN_ACTIONS;

// ---------------------------------------------------------------------------
// ActionCatalog
// ---------------------------------------------------------------------------

/// Insertion-ordered registry of actions.
///
/// # Example
///
/// ```
/// use waymark_actions::ActionCatalog;
/// use waymark_core::action::ActionKind;
///
/// let mut catalog = ActionCatalog::with_builtins();
/// let id = catalog.register("strafe", ActionKind::Builtin).unwrap().id();
/// assert_eq!(id.0, 6);
///
/// catalog.freeze();
/// assert!(catalog.register("late", ActionKind::Builtin).is_err());
/// assert!(catalog.resolve("strafe").is_ok());
/// ```
#[derive(Debug, Default)]
pub struct ActionCatalog {
    actions: Vec<Action>,
    index: HashMap<String, usize>,
    next_id: u32,
    frozen: bool,
}

impl ActionCatalog {
    /// Create an empty, unfrozen catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog pre-populated with the simulator's built-in actions.
    ///
    /// Built-ins take ids `0..6` so every custom id comes after them.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut catalog = Self::new();
        for name in BUILTIN_ACTIONS {
            // Fresh catalog: neither frozen nor holding duplicates.
            let _ = catalog.register(name, ActionKind::Builtin);
        }
        catalog
    }

    /// Register a new action under the next unused id.
    ///
    /// # Errors
    ///
    /// [`CatalogError::CatalogFrozen`] after [`freeze`](Self::freeze),
    /// [`CatalogError::DuplicateAction`] if `name` is already present. The
    /// catalog is unchanged on error.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        kind: ActionKind,
    ) -> Result<&Action, CatalogError> {
        let name = name.into();
        if self.frozen {
            return Err(CatalogError::CatalogFrozen(name));
        }
        if self.index.contains_key(&name) {
            return Err(CatalogError::DuplicateAction(name));
        }

        let id = ActionId(self.next_id);
        self.next_id += 1;

        let slot = self.actions.len();
        self.index.insert(name.clone(), slot);
        self.actions.push(Action::new(name, id, kind));
        Ok(&self.actions[slot])
    }

    /// Look up an action by name.
    ///
    /// # Errors
    ///
    /// [`CatalogError::UnknownAction`] if no action has that name.
    pub fn resolve(&self, name: &str) -> Result<&Action, CatalogError> {
        self.index
            .get(name)
            .map(|&slot| &self.actions[slot])
            .ok_or_else(|| CatalogError::UnknownAction(name.to_string()))
    }

    /// Look up an action by id.
    #[must_use]
    pub fn resolve_id(&self, id: ActionId) -> Option<&Action> {
        self.actions.iter().find(|a| a.id() == id)
    }

    /// Make the catalog read-only. Idempotent.
    pub const fn freeze(&mut self) {
        self.frozen = true;
    }

    #[must_use]
    pub const fn is_frozen(&self) -> bool {
        self.frozen
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Actions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Input code to catalog action.

use std::collections::BTreeMap;

use tracing::debug;
use waymark_actions::ActionCatalog;
use waymark_core::action::Action;
use waymark_core::error::CatalogError;
use waymark_core::types::InputCode;

use crate::bindings::BindingTable;

/// Result of mapping one input code.
#[derive(Clone, Copy, Debug)]
pub enum MappedInput<'a> {
    Action(&'a Action),
    /// No binding for this code. Not an error.
    Unrecognized(InputCode),
}

impl MappedInput<'_> {
    #[must_use]
    pub const fn is_recognized(&self) -> bool {
        matches!(self, Self::Action(_))
    }
}

// ---------------------------------------------------------------------------
// InputActionMapper
// ---------------------------------------------------------------------------

/// Maps raw key codes to actions through a binding table.
///
/// Bindings are resolved against the catalog once, when the mapper is built,
/// so [`map`](Self::map) is a pure lookup that cannot fail.
///
/// # Example
///
/// ```
/// use waymark_actions::ActionSpaceExtender;
/// use waymark_core::config::ActionsConfig;
/// use waymark_core::types::InputCode;
/// use waymark_teleop::{BindingTable, InputActionMapper, MappedInput};
///
/// let space = ActionSpaceExtender::from_config(&ActionsConfig::default()).build().unwrap();
/// let mapper = InputActionMapper::new(&space.catalog, &BindingTable::defaults()).unwrap();
///
/// match mapper.map(InputCode::from_char('w')) {
///     MappedInput::Action(action) => assert_eq!(action.name(), "move_forward"),
///     MappedInput::Unrecognized(_) => unreachable!(),
/// }
/// assert!(!mapper.map(InputCode::from_char('z')).is_recognized());
/// ```
#[derive(Debug, Clone)]
pub struct InputActionMapper {
    bound: BTreeMap<InputCode, Action>,
}

impl InputActionMapper {
    /// Resolve every binding in `bindings` against `catalog`.
    ///
    /// # Errors
    ///
    /// [`CatalogError::UnknownAction`] if a binding names an action the
    /// catalog does not contain.
    pub fn new(catalog: &ActionCatalog, bindings: &BindingTable) -> Result<Self, CatalogError> {
        let bound = bindings
            .iter()
            .map(|binding| -> Result<_, CatalogError> {
                let action = catalog.resolve(&binding.action)?;
                debug!(key = %binding.code, action = action.name(), "bound key");
                Ok((binding.code, action.clone()))
            })
            .collect::<Result<BTreeMap<_, _>, _>>()?;
        Ok(Self { bound })
    }

    /// Map one input code.
    #[must_use]
    pub fn map(&self, code: InputCode) -> MappedInput<'_> {
        self.bound
            .get(&code)
            .map_or(MappedInput::Unrecognized(code), MappedInput::Action)
    }

    /// Bound codes and their actions, ordered by code.
    pub fn bindings(&self) -> impl Iterator<Item = (InputCode, &Action)> {
        self.bound.iter().map(|(&code, action)| (code, action))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

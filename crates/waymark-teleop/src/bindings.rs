//! Static key binding table.
//!
//! [`BindingTable`] maps an [`InputCode`] to an action name. It starts from
//! [`BindingTable::defaults`] and accepts overrides from `[[bindings]]`
//! config tables.

use std::collections::BTreeMap;

use tracing::debug;
use waymark_core::action::names;
use waymark_core::config::BindingConfig;
use waymark_core::error::ConfigError;
use waymark_core::types::InputCode;

// ---------------------------------------------------------------------------
// Key parsing
// ---------------------------------------------------------------------------

/// Parse a config key: a single character, an arrow name or `code:<n>`.
///
/// # Errors
///
/// [`ConfigError::InvalidKey`] for anything else.
pub fn parse_key(key: &str) -> Result<InputCode, ConfigError> {
    match key.to_ascii_lowercase().as_str() {
        "up" => return Ok(InputCode::UP),
        "down" => return Ok(InputCode::DOWN),
        "left" => return Ok(InputCode::LEFT),
        "right" => return Ok(InputCode::RIGHT),
        _ => {}
    }

    if let Some(raw) = key.strip_prefix("code:") {
        return raw
            .trim()
            .parse::<u32>()
            .map(InputCode)
            .map_err(|_| ConfigError::InvalidKey(key.to_string()));
    }

    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if !c.is_control() => Ok(InputCode::from_char(c)),
        _ => Err(ConfigError::InvalidKey(key.to_string())),
    }
}

// ---------------------------------------------------------------------------
// KeyBinding
// ---------------------------------------------------------------------------

/// One input code bound to one action name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyBinding {
    pub code: InputCode,
    pub action: String,
}

impl KeyBinding {
    #[must_use]
    pub fn new(code: InputCode, action: impl Into<String>) -> Self {
        Self {
            code,
            action: action.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// BindingTable
// ---------------------------------------------------------------------------

/// Input code to action name, one action per code.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BindingTable {
    entries: BTreeMap<InputCode, String>,
}

impl BindingTable {
    /// Empty table: every code is unrecognized.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// WASD movement, `f` to finish, arrows to look around.
    #[must_use]
    pub fn defaults() -> Self {
        [
            (InputCode::from_char('w'), names::MOVE_FORWARD),
            (InputCode::from_char('s'), names::MOVE_BACKWARD),
            (InputCode::from_char('a'), names::TURN_LEFT),
            (InputCode::from_char('d'), names::TURN_RIGHT),
            (InputCode::from_char('f'), names::STOP),
            (InputCode::UP, names::LOOK_UP),
            (InputCode::DOWN, names::LOOK_DOWN),
            (InputCode::LEFT, names::LOOK_LEFTISH),
            (InputCode::RIGHT, names::LOOK_RIGHTISH),
        ]
        .into_iter()
        .fold(Self::new(), |table, (code, action)| table.with_binding(code, action))
    }

    /// Bind `code`, replacing any previous binding for it.
    #[must_use]
    pub fn with_binding(mut self, code: InputCode, action: impl Into<String>) -> Self {
        self.entries.insert(code, action.into());
        self
    }

    /// Drop bindings whose action `keep` rejects.
    ///
    /// Used to prune defaults that point at actions the configured catalog
    /// does not declare; explicit overrides are applied afterwards and stay
    /// strict.
    #[must_use]
    pub fn retain(mut self, mut keep: impl FnMut(&str) -> bool) -> Self {
        self.entries.retain(|code, action| {
            let kept = keep(action);
            if !kept {
                debug!(key = %code, action = action.as_str(), "dropped default binding");
            }
            kept
        });
        self
    }

    /// Apply `[[bindings]]` overrides on top of this table.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidKey`] if a key does not parse.
    pub fn with_config(self, overrides: &[BindingConfig]) -> Result<Self, ConfigError> {
        overrides.iter().try_fold(self, |table, binding| {
            let code = parse_key(&binding.key)?;
            Ok(table.with_binding(code, binding.action.clone()))
        })
    }

    /// Action name bound to `code`.
    #[must_use]
    pub fn get(&self, code: InputCode) -> Option<&str> {
        self.entries.get(&code).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bindings in input-code order.
    pub fn iter(&self) -> impl Iterator<Item = KeyBinding> + '_ {
        self.entries
            .iter()
            .map(|(&code, action)| KeyBinding::new(code, action.clone()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_single_char() {
        assert_eq!(parse_key("w").unwrap(), InputCode::from_char('w'));
        assert_eq!(parse_key("^").unwrap(), InputCode::from_char('^'));
    }

    #[test]
    fn parse_arrow_names() {
        assert_eq!(parse_key("up").unwrap(), InputCode::UP);
        assert_eq!(parse_key("Down").unwrap(), InputCode::DOWN);
        assert_eq!(parse_key("LEFT").unwrap(), InputCode::LEFT);
        assert_eq!(parse_key("right").unwrap(), InputCode::RIGHT);
    }

    #[test]
    fn parse_numeric_code() {
        assert_eq!(parse_key("code:27").unwrap(), InputCode(27));
        assert!(matches!(parse_key("code:x"), Err(ConfigError::InvalidKey(_))));
    }

    #[test]
    fn parse_rejects_words_and_empty() {
        assert!(parse_key("").is_err());
        assert!(parse_key("ctrl+q").is_err());
        assert!(parse_key("\n").is_err());
    }

    #[test]
    fn defaults_cover_all_nine_keys() {
        let table = BindingTable::defaults();
        assert_eq!(table.len(), 9);
        assert_eq!(table.get(InputCode::from_char('w')), Some(names::MOVE_FORWARD));
        assert_eq!(table.get(InputCode::from_char('f')), Some(names::STOP));
        assert_eq!(table.get(InputCode::LEFT), Some(names::LOOK_LEFTISH));
        assert_eq!(table.get(InputCode::from_char('x')), None);
    }

    #[test]
    fn config_overrides_replace_and_extend() {
        let overrides = vec![
            BindingConfig {
                key: "w".into(),
                action: names::STOP.into(),
            },
            BindingConfig {
                key: "q".into(),
                action: names::LOOK_LEFTISH.into(),
            },
        ];
        let table = BindingTable::defaults().with_config(&overrides).unwrap();
        assert_eq!(table.len(), 10);
        assert_eq!(table.get(InputCode::from_char('w')), Some(names::STOP));
        assert_eq!(table.get(InputCode::from_char('q')), Some(names::LOOK_LEFTISH));
    }

    #[test]
    fn config_with_bad_key_fails() {
        let overrides = vec![BindingConfig {
            key: "pgup".into(),
            action: names::LOOK_UP.into(),
        }];
        let err = BindingTable::defaults().with_config(&overrides).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidKey(ref k) if k == "pgup"));
    }

    #[test]
    fn retain_drops_rejected_actions() {
        let table = BindingTable::defaults()
            .retain(|action| action != names::LOOK_LEFTISH && action != names::LOOK_RIGHTISH);
        assert_eq!(table.len(), 7);
        assert_eq!(table.get(InputCode::LEFT), None);
        assert_eq!(table.get(InputCode::UP), Some(names::LOOK_UP));
    }

    #[test]
    fn iter_is_ordered_by_code() {
        let codes: Vec<_> = BindingTable::defaults().iter().map(|b| b.code.0).collect();
        let mut sorted = codes.clone();
        sorted.sort_unstable();
        assert_eq!(codes, sorted);
    }
}

//! Input sources: scripted key strings and the interactive terminal.

use std::collections::VecDeque;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use tracing::debug;
use waymark_core::error::InputError;
use waymark_core::traits::InputSource;
use waymark_core::types::InputCode;

// ---------------------------------------------------------------------------
// ScriptedInput
// ---------------------------------------------------------------------------

/// Replays a fixed sequence of codes, then reports the source closed.
#[derive(Clone, Debug, Default)]
pub struct ScriptedInput {
    codes: VecDeque<InputCode>,
}

impl ScriptedInput {
    pub fn new(codes: impl IntoIterator<Item = InputCode>) -> Self {
        Self {
            codes: codes.into_iter().collect(),
        }
    }

    /// Parse a key string such as `"wwa<f"`.
    ///
    /// `^ v < >` stand for the arrow keys; whitespace is skipped; every other
    /// character is sent as itself.
    #[must_use]
    pub fn parse(script: &str) -> Self {
        Self::new(script.chars().filter(|c| !c.is_whitespace()).map(|c| match c {
            '^' => InputCode::UP,
            'v' => InputCode::DOWN,
            '<' => InputCode::LEFT,
            '>' => InputCode::RIGHT,
            other => InputCode::from_char(other),
        }))
    }

    /// Codes not yet delivered.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.codes.len()
    }
}

impl InputSource for ScriptedInput {
    fn next_code(&mut self) -> Result<Option<InputCode>, InputError> {
        Ok(self.codes.pop_front())
    }
}

// ---------------------------------------------------------------------------
// TerminalKeys
// ---------------------------------------------------------------------------

/// What a terminal key event means to a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    Code(InputCode),
    /// Escape or Ctrl-C: close the input source.
    Quit,
    /// Releases, repeats and keys with no code.
    Ignore,
}

/// Translate a crossterm key event.
#[must_use]
pub fn translate_key(key: &KeyEvent) -> KeyOutcome {
    if key.kind != KeyEventKind::Press {
        return KeyOutcome::Ignore;
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return KeyOutcome::Quit;
    }
    match key.code {
        KeyCode::Esc => KeyOutcome::Quit,
        KeyCode::Up => KeyOutcome::Code(InputCode::UP),
        KeyCode::Down => KeyOutcome::Code(InputCode::DOWN),
        KeyCode::Left => KeyOutcome::Code(InputCode::LEFT),
        KeyCode::Right => KeyOutcome::Code(InputCode::RIGHT),
        KeyCode::Char(c) => KeyOutcome::Code(InputCode::from_char(c)),
        KeyCode::Enter => KeyOutcome::Code(InputCode::from_char('\n')),
        KeyCode::Tab => KeyOutcome::Code(InputCode::from_char('\t')),
        _ => KeyOutcome::Ignore,
    }
}

/// Restores cooked mode when dropped.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> std::io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        // Best-effort restore; nothing useful to do on failure.
        let _ = terminal::disable_raw_mode();
    }
}

/// Blocking key reader on the controlling terminal.
///
/// The terminal stays in raw mode for the lifetime of this value.
pub struct TerminalKeys {
    _raw: RawModeGuard,
}

impl TerminalKeys {
    /// Put the terminal into raw mode.
    ///
    /// # Errors
    ///
    /// [`InputError::Io`] if the terminal cannot be switched.
    pub fn open() -> Result<Self, InputError> {
        Ok(Self {
            _raw: RawModeGuard::enable()?,
        })
    }
}

impl std::fmt::Debug for TerminalKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalKeys").finish_non_exhaustive()
    }
}

impl InputSource for TerminalKeys {
    fn next_code(&mut self) -> Result<Option<InputCode>, InputError> {
        loop {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            match translate_key(&key) {
                KeyOutcome::Code(code) => return Ok(Some(code)),
                KeyOutcome::Quit => {
                    debug!("terminal input closed by operator");
                    return Ok(None);
                }
                KeyOutcome::Ignore => {}
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Dialogue sessions for NPC conversations.
//!
//! This module provides:
//! - Dialogue scripts (ordered lines, loadable from RON)
//! - Sessions that step through a script with a cursor
//! - Typewriter reveal of the current line

use glade_common::InteractableId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default typewriter speed in characters per second.
pub const DEFAULT_CHARS_PER_SECOND: f32 = 50.0;

/// Error types for dialogue operations.
#[derive(Debug, Error)]
pub enum DialogueError {
    /// Script has no lines
    #[error("Dialogue script has no lines")]
    EmptyScript,
    /// Script failed to parse
    #[error("Failed to parse dialogue script: {0}")]
    Parse(String),
}

/// Result type for dialogue operations.
pub type DialogueResult<T> = Result<T, DialogueError>;

/// An ordered list of dialogue lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueScript {
    /// Lines shown one after another.
    pub lines: Vec<String>,
}

impl DialogueScript {
    /// Create a script from lines.
    #[must_use]
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a script from RON, e.g. `(lines: ["Hello", "Bye"])`.
    pub fn from_ron(source: &str) -> DialogueResult<Self> {
        ron::from_str(source).map_err(|e| DialogueError::Parse(e.to_string()))
    }

    /// Number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the script has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Result of pressing advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogueStep {
    /// The current line is still being revealed; input ignored.
    StillRevealing,
    /// Moved on to the line at this index.
    NextLine(usize),
    /// The last line was acknowledged and the session closed.
    Closed,
    /// The session was already closed.
    NotOpen,
}

/// Why a session closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DialogueCloseReason {
    /// Every line was shown.
    Exhausted,
    /// Skip was pressed.
    Skipped,
    /// A newer session took its place.
    Replaced,
    /// Cancelled from outside (death, forced cancel).
    Cancelled,
}

/// A running conversation.
#[derive(Debug, Clone, PartialEq)]
pub struct DialogueSession {
    script: DialogueScript,
    cursor: usize,
    open: bool,
    revealed: f32,
    chars_per_second: f32,
    source: Option<InteractableId>,
}

impl DialogueSession {
    /// Open a session on the first line.
    ///
    /// `chars_per_second <= 0` reveals each line instantly.
    pub fn open(
        script: DialogueScript,
        chars_per_second: f32,
        source: Option<InteractableId>,
    ) -> DialogueResult<Self> {
        if script.is_empty() {
            return Err(DialogueError::EmptyScript);
        }
        let mut session = Self {
            script,
            cursor: 0,
            open: true,
            revealed: 0.0,
            chars_per_second,
            source,
        };
        if chars_per_second <= 0.0 {
            session.reveal_all();
        }
        Ok(session)
    }

    /// Advance the typewriter.
    pub fn tick(&mut self, dt: f32) {
        if !self.open || self.is_line_revealed() {
            return;
        }
        self.revealed = (self.revealed + dt * self.chars_per_second).min(self.line_chars() as f32);
    }

    /// Acknowledge the current line.
    ///
    /// Ignored while the line is still being typed. On the last line this
    /// closes the session.
    pub fn advance(&mut self) -> DialogueStep {
        if !self.open {
            return DialogueStep::NotOpen;
        }
        if !self.is_line_revealed() {
            return DialogueStep::StillRevealing;
        }
        if self.cursor + 1 >= self.script.len() {
            self.close();
            return DialogueStep::Closed;
        }
        self.cursor += 1;
        self.revealed = 0.0;
        if self.chars_per_second <= 0.0 {
            self.reveal_all();
        }
        DialogueStep::NextLine(self.cursor)
    }

    /// Close immediately regardless of cursor position.
    ///
    /// Returns false if the session was already closed.
    pub fn skip(&mut self) -> bool {
        if !self.open {
            return false;
        }
        self.close();
        true
    }

    /// Show the rest of the current line at once.
    pub fn reveal_all(&mut self) {
        self.revealed = self.line_chars() as f32;
    }

    /// Whether the session is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Index of the current line.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of lines in the script.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.script.len()
    }

    /// The interactable that started the session, if any.
    #[must_use]
    pub fn source(&self) -> Option<InteractableId> {
        self.source
    }

    /// Full text of the current line.
    #[must_use]
    pub fn current_line(&self) -> Option<&str> {
        if !self.open {
            return None;
        }
        self.script.lines.get(self.cursor).map(String::as_str)
    }

    /// The part of the current line revealed so far.
    #[must_use]
    pub fn visible_text(&self) -> &str {
        let Some(line) = self.current_line() else {
            return "";
        };
        let shown = self.revealed.floor() as usize;
        match line.char_indices().nth(shown) {
            Some((byte, _)) => &line[..byte],
            None => line,
        }
    }

    /// Whether the whole current line is visible.
    #[must_use]
    pub fn is_line_revealed(&self) -> bool {
        self.revealed.floor() as usize >= self.line_chars()
    }

    fn line_chars(&self) -> usize {
        self.script
            .lines
            .get(self.cursor)
            .map_or(0, |line| line.chars().count())
    }

    fn close(&mut self) {
        self.open = false;
        self.revealed = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script() -> DialogueScript {
        DialogueScript::new(["Hello there.", "The gate is north.", "Good luck!"])
    }

    #[test]
    fn test_empty_script_rejected() {
        let result = DialogueSession::open(DialogueScript::default(), 0.0, None);
        assert!(matches!(result, Err(DialogueError::EmptyScript)));
    }

    #[test]
    fn test_exhaust_lines_closes() {
        let mut session = DialogueSession::open(script(), 0.0, None).expect("non-empty script");
        assert!(session.is_open());
        assert_eq!(session.current_line(), Some("Hello there."));

        assert_eq!(session.advance(), DialogueStep::NextLine(1));
        assert_eq!(session.advance(), DialogueStep::NextLine(2));
        assert_eq!(session.advance(), DialogueStep::Closed);
        assert!(!session.is_open());
        assert_eq!(session.advance(), DialogueStep::NotOpen);
        assert_eq!(session.current_line(), None);
    }

    #[test]
    fn test_skip_closes_anywhere() {
        let mut session = DialogueSession::open(script(), 0.0, None).expect("non-empty script");
        session.advance();
        assert!(session.skip());
        assert!(!session.is_open());
        assert!(!session.skip());
    }

    #[test]
    fn test_typewriter_reveal() {
        let mut session = DialogueSession::open(DialogueScript::new(["abcd"]), 10.0, None).expect("non-empty script");
        assert_eq!(session.visible_text(), "");
        assert_eq!(session.advance(), DialogueStep::StillRevealing);

        session.tick(0.25);
        assert_eq!(session.visible_text(), "ab");

        session.tick(0.2);
        assert_eq!(session.visible_text(), "abcd");
        assert!(session.is_line_revealed());
        assert_eq!(session.advance(), DialogueStep::Closed);
    }

    #[test]
    fn test_typewriter_multibyte() {
        let mut session = DialogueSession::open(DialogueScript::new(["héllo"]), 1.0, None).expect("non-empty script");
        session.tick(2.0);
        assert_eq!(session.visible_text(), "hé");
    }

    #[test]
    fn test_reveal_resets_per_line() {
        let mut session = DialogueSession::open(DialogueScript::new(["ab", "cd"]), 100.0, None).expect("non-empty script");
        session.tick(1.0);
        assert_eq!(session.advance(), DialogueStep::NextLine(1));
        assert_eq!(session.visible_text(), "");
        session.reveal_all();
        assert_eq!(session.visible_text(), "cd");
    }

    #[test]
    fn test_from_ron() {
        let script = DialogueScript::from_ron(r#"(lines: ["One", "Two"])"#).expect("valid RON");
        assert_eq!(script.len(), 2);
        assert_eq!(script.lines[1], "Two");

        assert!(matches!(DialogueScript::from_ron("(lines: 3)"), Err(DialogueError::Parse(_))));
    }

    #[test]
    fn test_source_kept() {
        let id = InteractableId::new(4);
        let session = DialogueSession::open(script(), 0.0, Some(id)).expect("non-empty script");
        assert_eq!(session.source(), Some(id));
    }
}

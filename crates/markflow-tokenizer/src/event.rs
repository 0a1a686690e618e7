//! # Tokenizer Events
//!
//! Events are the tokenizer's only output. Instead of building a tree, the
//! tokenizer emits a **flat sequence** of enter/exit events:
//!
//! ```text
//! Enter(LABEL_IMAGE)        ← `![`
//!   Enter(LABEL_IMAGE_MARKER)
//!   Exit(LABEL_IMAGE_MARKER)
//!   Enter(LABEL_MARKER)
//!   Exit(LABEL_MARKER)
//! Exit(LABEL_IMAGE)
//! ```
//!
//! Nesting is implied by balancing: every `Enter` has exactly one later
//! `Exit` of the same kind, and pairs never cross. Keeping the log flat
//! lets resolvers rewrite it with plain splices, and lets the engine undo a
//! failed attempt by truncating it.

use crate::token::{ContentType, TokenKind};

/// A position in the original source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    /// 1-indexed line.
    pub line: usize,
    /// 1-indexed column, counted in codes.
    pub column: usize,
    /// Byte offset into the source.
    pub offset: usize,
    /// Index into the preprocessed codes.
    pub index: usize,
}

impl Point {
    /// Create a point.
    pub fn new(line: usize, column: usize, offset: usize, index: usize) -> Self {
        Self {
            line,
            column,
            offset,
            index,
        }
    }
}

/// A typed, positioned span of the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// What this token is.
    pub kind: TokenKind,
    /// Where it starts.
    pub start: Point,
    /// Where it ends (equal to `start` while the token is still open).
    pub end: Point,
    /// Set on chunks whose interior must be re-tokenized.
    pub content_type: Option<ContentType>,
    /// Event index of the `Enter` of the previous linked chunk.
    pub previous: Option<usize>,
    /// Event index of the `Enter` of the next linked chunk.
    pub next: Option<usize>,
}

impl Token {
    /// A zero-width token at `point`.
    pub fn new(kind: TokenKind, point: Point) -> Self {
        Self {
            kind,
            start: point,
            end: point,
            content_type: None,
            previous: None,
            next: None,
        }
    }

    /// A token spanning `start..end`.
    pub fn spanning(kind: TokenKind, start: Point, end: Point) -> Self {
        Self {
            end,
            ..Self::new(kind, start)
        }
    }
}

/// Whether an event opens or closes its token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// The token starts here.
    Enter,
    /// The token ends here.
    Exit,
}

/// One entry in the event log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Enter or exit.
    pub kind: EventKind,
    /// The token being entered or exited.
    pub token: Token,
}

impl Event {
    /// Create an enter event.
    pub fn enter(token: Token) -> Self {
        Self {
            kind: EventKind::Enter,
            token,
        }
    }

    /// Create an exit event.
    pub fn exit(token: Token) -> Self {
        Self {
            kind: EventKind::Exit,
            token,
        }
    }

    /// The point this event sits at: start for enter, end for exit.
    pub fn point(&self) -> Point {
        match self.kind {
            EventKind::Enter => self.token.start,
            EventKind::Exit => self.token.end,
        }
    }

    /// Whether this is an enter event.
    pub fn is_enter(&self) -> bool {
        self.kind == EventKind::Enter
    }

    /// Whether this is an exit event.
    pub fn is_exit(&self) -> bool {
        self.kind == EventKind::Exit
    }
}

/// Check that `events` are balanced: every enter has a matching exit of the
/// same kind, nesting is LIFO, and nothing is left open.
///
/// Returns the index of the first offending event on failure.
pub fn check_balanced(events: &[Event]) -> Result<(), usize> {
    let mut stack: Vec<TokenKind> = Vec::new();

    for (index, event) in events.iter().enumerate() {
        match event.kind {
            EventKind::Enter => stack.push(event.token.kind),
            EventKind::Exit => {
                if stack.pop() != Some(event.token.kind) {
                    return Err(index);
                }
            }
        }
    }

    if stack.is_empty() {
        Ok(())
    } else {
        Err(events.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn point(index: usize) -> Point {
        Point::new(1, index + 1, index, index)
    }

    #[test]
    fn event_enter_creation() {
        let token = Token::new(TokenKind::DATA, point(0));
        let event = Event::enter(token.clone());
        assert_eq!(event.kind, EventKind::Enter);
        assert_eq!(event.point(), point(0));
        assert!(event.is_enter());
        assert_eq!(event.token, token);
    }

    #[test]
    fn exit_point_is_token_end() {
        let event = Event::exit(Token::spanning(TokenKind::DATA, point(0), point(3)));
        assert!(event.is_exit());
        assert_eq!(event.point(), point(3));
    }

    #[test]
    fn balanced_log_passes() {
        let outer = Token::spanning(TokenKind::LABEL_IMAGE, point(0), point(2));
        let inner = Token::spanning(TokenKind::LABEL_IMAGE_MARKER, point(0), point(1));
        let events = vec![
            Event::enter(outer.clone()),
            Event::enter(inner.clone()),
            Event::exit(inner),
            Event::exit(outer),
        ];
        assert_eq!(check_balanced(&events), Ok(()));
    }

    #[test]
    fn crossed_pairs_are_reported() {
        let a = Token::new(TokenKind::LINK, point(0));
        let b = Token::new(TokenKind::DATA, point(0));
        let events = vec![
            Event::enter(a.clone()),
            Event::enter(b.clone()),
            Event::exit(a),
            Event::exit(b),
        ];
        assert_eq!(check_balanced(&events), Err(2));
    }

    #[test]
    fn unclosed_token_is_reported() {
        let events = vec![Event::enter(Token::new(TokenKind::PARAGRAPH, point(0)))];
        assert_eq!(check_balanced(&events), Err(1));
    }
}

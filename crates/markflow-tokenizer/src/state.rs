//! # States
//!
//! A state is a plain function of the tokenizer. It inspects
//! [`Tokenizer::current`], optionally calls the effects (`enter`, `consume`,
//! `exit`), and returns a [`State`] telling the engine what to do next:
//!
//! ```text
//! State::Next(f)   ← "I consumed the current code, give `f` the next one"
//! State::Retry(f)  ← "I did not consume it, give `f` this same code"
//! State::Ok        ← this state machine matched
//! State::Nok       ← this state machine did not match
//! ```
//!
//! The engine drives states in a loop, one transition at a time, so deep
//! grammar nesting never grows the call stack. `Ok` and `Nok` are routed to
//! the continuations of the innermost pending attempt; see
//! [`Tokenizer::attempt`].

use crate::tokenizer::Tokenizer;

/// A state function.
pub type StateFn = fn(&mut Tokenizer<'_>) -> State;

/// What a state function returns.
#[derive(Debug, Clone, Copy)]
pub enum State {
    /// Move to the next code and call this function.
    ///
    /// Returned by a state after `consume`. Also the form continuations are
    /// passed to `attempt`/`check` in: the engine then calls the function with
    /// the code at the current position.
    Next(StateFn),
    /// Call this function with the same code.
    Retry(StateFn),
    /// The state machine matched.
    Ok,
    /// The state machine did not match.
    Nok,
}

impl State {
    /// Whether this is `Ok`.
    pub fn is_ok(&self) -> bool {
        matches!(self, State::Ok)
    }

    /// Whether this is `Nok`.
    pub fn is_nok(&self) -> bool {
        matches!(self, State::Nok)
    }

    /// Turn a continuation into a state for the code at hand.
    ///
    /// Continuations are written as `Next(f)`; when a trampoline state (one
    /// that did not consume) hands over to one, it must be a `Retry`.
    pub fn into_retry(self) -> State {
        match self {
            State::Next(f) => State::Retry(f),
            other => other,
        }
    }
}

//! Space: a run of spaces and tabs as one token.

use crate::code::markdown_space;
use crate::state::{State, StateFn};
use crate::token::TokenKind;
use crate::tokenizer::Tokenizer;

/// Set up a space run of at most `max` codes, emitted as `kind`.
///
/// Returns the start state. Matches zero codes too, so it never fails.
pub fn space_or_tab(tokenizer: &mut Tokenizer<'_>, kind: TokenKind, max: usize) -> StateFn {
    tokenizer.tokenize_state.space_kind = kind;
    tokenizer.tokenize_state.space_max = max;
    tokenizer.tokenize_state.space_size = 0;
    start
}

fn start(tokenizer: &mut Tokenizer<'_>) -> State {
    if markdown_space(tokenizer.current) && tokenizer.tokenize_state.space_max > 0 {
        tokenizer.enter(tokenizer.tokenize_state.space_kind);
        State::Retry(inside)
    } else {
        State::Ok
    }
}

fn inside(tokenizer: &mut Tokenizer<'_>) -> State {
    let state = &tokenizer.tokenize_state;
    if markdown_space(tokenizer.current) && state.space_size < state.space_max {
        tokenizer.consume();
        tokenizer.tokenize_state.space_size += 1;
        State::Next(inside)
    } else {
        tokenizer.exit(tokenizer.tokenize_state.space_kind);
        tokenizer.tokenize_state.space_size = 0;
        State::Ok
    }
}

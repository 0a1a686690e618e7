//! Whitespace: spaces, tabs, and line endings between parts of a construct.
//!
//! Space before the first line ending is `LINE_SUFFIX`, space after one is
//! `LINE_PREFIX`.

use crate::code::{Code, markdown_space};
use crate::factory::space::space_or_tab;
use crate::state::{State, StateFn};
use crate::token::TokenKind;
use crate::tokenizer::Tokenizer;

/// Set up the whitespace factory. Returns the start state; never fails.
pub fn whitespace(tokenizer: &mut Tokenizer<'_>) -> StateFn {
    tokenizer.tokenize_state.whitespace_seen = false;
    start
}

fn start(tokenizer: &mut Tokenizer<'_>) -> State {
    match tokenizer.current {
        Code::LineEnding => {
            tokenizer.enter(TokenKind::LINE_ENDING);
            tokenizer.consume();
            tokenizer.exit(TokenKind::LINE_ENDING);
            tokenizer.tokenize_state.whitespace_seen = true;
            State::Next(start)
        }
        code if markdown_space(code) => {
            let kind = if tokenizer.tokenize_state.whitespace_seen {
                TokenKind::LINE_PREFIX
            } else {
                TokenKind::LINE_SUFFIX
            };
            tokenizer.attempt(State::Next(start), State::Nok);
            State::Retry(space_or_tab(tokenizer, kind, usize::MAX))
        }
        _ => {
            tokenizer.tokenize_state.whitespace_seen = false;
            State::Ok
        }
    }
}

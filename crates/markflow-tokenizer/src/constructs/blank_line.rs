//! Blank line: optional whitespace, then a line ending or the end.

use crate::code::{Code, markdown_space};
use crate::construct::Construct;
use crate::factory::space::space_or_tab;
use crate::state::State;
use crate::token::TokenKind;
use crate::tokenizer::Tokenizer;

/// Blank line, tried by flow at the start of every line.
pub const BLANK_LINE: Construct = Construct::new("blankLine", start).partial();

fn start(tokenizer: &mut Tokenizer<'_>) -> State {
    if markdown_space(tokenizer.current) {
        tokenizer.attempt(State::Next(after), State::Nok);
        State::Retry(space_or_tab(tokenizer, TokenKind::LINE_PREFIX, usize::MAX))
    } else {
        State::Retry(after)
    }
}

fn after(tokenizer: &mut Tokenizer<'_>) -> State {
    match tokenizer.current {
        Code::Eof | Code::LineEnding => State::Ok,
        _ => State::Nok,
    }
}

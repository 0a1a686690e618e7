//! Title: `"text"`, `'text'` or `(text)`.
//!
//! Tokens are set in `tokenize_state`: `token_1` wraps the whole title,
//! `token_2` is each quote or paren and `token_3` the text, held in linked
//! `CHUNK_STRING` chunks, one per line.

use crate::code::Code;
use crate::state::State;
use crate::token::{ContentType, TokenKind};
use crate::tokenizer::Tokenizer;

/// At `"`, `'` or `(`.
pub fn start(tokenizer: &mut Tokenizer<'_>) -> State {
    let closing = match tokenizer.current {
        Code::Char('"') => '"',
        Code::Char('\'') => '\'',
        Code::Char('(') => ')',
        _ => return State::Nok,
    };
    let state = &tokenizer.tokenize_state;
    let (title, marker) = (state.token_1, state.token_2);
    tokenizer.tokenize_state.marker = Some(closing);
    tokenizer.enter(title);
    tokenizer.enter(marker);
    tokenizer.consume();
    tokenizer.exit(marker);
    State::Next(begin)
}

/// After the opening marker, or after the text.
fn begin(tokenizer: &mut Tokenizer<'_>) -> State {
    if is_closing(tokenizer) {
        let state = &tokenizer.tokenize_state;
        let (title, marker) = (state.token_1, state.token_2);
        tokenizer.enter(marker);
        tokenizer.consume();
        tokenizer.exit(marker);
        tokenizer.exit(title);
        tokenizer.tokenize_state.marker = None;
        State::Ok
    } else {
        tokenizer.enter(tokenizer.tokenize_state.token_3);
        State::Retry(at_break)
    }
}

fn at_break(tokenizer: &mut Tokenizer<'_>) -> State {
    if is_closing(tokenizer) {
        tokenizer.exit(tokenizer.tokenize_state.token_3);
        tokenizer.end_chain();
        return State::Retry(begin);
    }
    match tokenizer.current {
        Code::Eof => {
            tokenizer.tokenize_state.marker = None;
            tokenizer.end_chain();
            State::Nok
        }
        Code::LineEnding => {
            tokenizer.enter(TokenKind::LINE_ENDING);
            tokenizer.consume();
            tokenizer.exit(TokenKind::LINE_ENDING);
            State::Next(at_break)
        }
        Code::Char(_) => {
            tokenizer.enter_with_content(TokenKind::CHUNK_STRING, ContentType::String);
            State::Retry(inside)
        }
    }
}

fn inside(tokenizer: &mut Tokenizer<'_>) -> State {
    if is_closing(tokenizer) || matches!(tokenizer.current, Code::Eof | Code::LineEnding) {
        tokenizer.exit(TokenKind::CHUNK_STRING);
        return State::Retry(at_break);
    }
    let escape = tokenizer.current.is('\\');
    tokenizer.consume();
    if escape {
        State::Next(escape_state)
    } else {
        State::Next(inside)
    }
}

fn escape_state(tokenizer: &mut Tokenizer<'_>) -> State {
    if is_closing(tokenizer) || tokenizer.current.is('\\') {
        tokenizer.consume();
        State::Next(inside)
    } else {
        State::Retry(inside)
    }
}

fn is_closing(tokenizer: &Tokenizer<'_>) -> bool {
    tokenizer
        .tokenize_state
        .marker
        .is_some_and(|marker| tokenizer.current.is(marker))
}

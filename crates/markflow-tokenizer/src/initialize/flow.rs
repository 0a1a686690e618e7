//! Flow: the block structure of a document.
//!
//! Each line is a blank line, a flow construct from the registry (thematic
//! break, ATX heading), or content. Line endings between them are
//! `LINE_ENDING`, after blank lines `BLANK_LINE_ENDING`.

use crate::code::{Code, markdown_space};
use crate::construct::Hook;
use crate::constructs::{blank_line::BLANK_LINE, content::CONTENT};
use crate::factory::space::space_or_tab;
use crate::state::State;
use crate::token::TokenKind;
use crate::tokenizer::Tokenizer;

/// Start of a line.
pub fn start(tokenizer: &mut Tokenizer<'_>) -> State {
    match tokenizer.current {
        Code::Eof => State::Ok,
        _ => tokenizer.attempt_construct(
            BLANK_LINE,
            State::Next(blank_line_after),
            State::Next(initial),
        ),
    }
}

fn blank_line_after(tokenizer: &mut Tokenizer<'_>) -> State {
    match tokenizer.current {
        Code::LineEnding => {
            tokenizer.enter(TokenKind::BLANK_LINE_ENDING);
            tokenizer.consume();
            tokenizer.exit(TokenKind::BLANK_LINE_ENDING);
            State::Next(start)
        }
        _ => State::Ok,
    }
}

fn initial(tokenizer: &mut Tokenizer<'_>) -> State {
    if markdown_space(tokenizer.current) {
        tokenizer.attempt(State::Next(before), State::Nok);
        State::Retry(space_or_tab(tokenizer, TokenKind::LINE_PREFIX, usize::MAX))
    } else {
        State::Retry(before)
    }
}

fn before(tokenizer: &mut Tokenizer<'_>) -> State {
    tokenizer.attempt_hook(Hook::Flow, State::Next(after), State::Next(before_content))
}

fn before_content(tokenizer: &mut Tokenizer<'_>) -> State {
    tokenizer.attempt_construct(CONTENT, State::Next(after), State::Nok)
}

fn after(tokenizer: &mut Tokenizer<'_>) -> State {
    match tokenizer.current {
        Code::Eof => State::Ok,
        Code::LineEnding => {
            tokenizer.enter(TokenKind::LINE_ENDING);
            tokenizer.consume();
            tokenizer.exit(TokenKind::LINE_ENDING);
            State::Next(start)
        }
        // An extension construct stopped mid-line: the rest is content.
        _ => State::Retry(before),
    }
}

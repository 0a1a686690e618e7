//! Content: definitions, then at most one paragraph.

use crate::code::Code;
use crate::construct::Hook;
use crate::constructs::paragraph::PARAGRAPH;
use crate::state::State;
use crate::token::TokenKind;
use crate::tokenizer::Tokenizer;

/// Start of a line of content.
pub fn start(tokenizer: &mut Tokenizer<'_>) -> State {
    match tokenizer.current {
        Code::Eof => State::Ok,
        _ => tokenizer.attempt_hook(
            Hook::Content,
            State::Next(definition_after),
            State::Next(paragraph),
        ),
    }
}

fn definition_after(tokenizer: &mut Tokenizer<'_>) -> State {
    match tokenizer.current {
        Code::Eof => State::Ok,
        Code::LineEnding => {
            tokenizer.enter(TokenKind::LINE_ENDING);
            tokenizer.consume();
            tokenizer.exit(TokenKind::LINE_ENDING);
            State::Next(start)
        }
        _ => State::Retry(paragraph),
    }
}

fn paragraph(tokenizer: &mut Tokenizer<'_>) -> State {
    tokenizer.attempt_construct(PARAGRAPH, State::Next(after), State::Nok)
}

fn after(tokenizer: &mut Tokenizer<'_>) -> State {
    match tokenizer.current {
        Code::Eof => State::Ok,
        _ => unreachable!("a paragraph runs to the end of its content"),
    }
}

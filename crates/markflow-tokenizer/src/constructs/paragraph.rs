//! Paragraph: the rest of a content block once no definition matches.
//!
//! Every line is a `CHUNK_TEXT`, line ending included, linked to the next so
//! the text tokenizer can match links and emphasis across lines.

use crate::code::Code;
use crate::construct::Construct;
use crate::state::State;
use crate::token::{ContentType, TokenKind};
use crate::tokenizer::Tokenizer;

/// Paragraph, the fallback of content.
pub const PARAGRAPH: Construct = Construct::new("paragraph", start).partial();

fn start(tokenizer: &mut Tokenizer<'_>) -> State {
    match tokenizer.current {
        Code::Eof => State::Nok,
        _ => {
            tokenizer.enter(TokenKind::PARAGRAPH);
            State::Retry(line_start)
        }
    }
}

fn line_start(tokenizer: &mut Tokenizer<'_>) -> State {
    match tokenizer.current {
        Code::Eof => {
            tokenizer.exit(TokenKind::PARAGRAPH);
            tokenizer.end_chain();
            State::Ok
        }
        _ => {
            tokenizer.enter_with_content(TokenKind::CHUNK_TEXT, ContentType::Text);
            State::Retry(inside)
        }
    }
}

fn inside(tokenizer: &mut Tokenizer<'_>) -> State {
    match tokenizer.current {
        Code::Eof => {
            tokenizer.exit(TokenKind::CHUNK_TEXT);
            State::Retry(line_start)
        }
        Code::LineEnding => {
            tokenizer.consume();
            tokenizer.exit(TokenKind::CHUNK_TEXT);
            State::Next(line_start)
        }
        Code::Char(_) => {
            tokenizer.consume();
            State::Next(inside)
        }
    }
}

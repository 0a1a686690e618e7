//! ATX heading: one to six `#`, then text, then optionally a closing run of
//! `#`.
//!
//! The text is not tokenized here. The local resolver wraps everything
//! between the opening sequence and the closing one (with the whitespace
//! around it) in `ATX_HEADING_TEXT` holding a single `CHUNK_TEXT`:
//!
//! ```text
//! # a #b ##
//! ATX_HEADING
//!   ATX_HEADING_SEQUENCE  "#"
//!   WHITESPACE            " "
//!   ATX_HEADING_TEXT      "a #b"
//!     CHUNK_TEXT
//!   WHITESPACE            " "
//!   ATX_HEADING_SEQUENCE  "##"
//! ```

use crate::code::{ATX_HEADING_OPENING_FENCE_SIZE_MAX, Code, markdown_line_ending_or_space, markdown_space};
use crate::construct::Construct;
use crate::event::{Event, Token};
use crate::factory::space::space_or_tab;
use crate::state::State;
use crate::token::{ContentType, TokenKind};
use crate::tokenizer::Tokenizer;

/// ATX heading.
pub const HEADING_ATX: Construct = Construct::new("headingAtx", start).with_resolve(resolve);

fn start(tokenizer: &mut Tokenizer<'_>) -> State {
    if !tokenizer.current.is('#') {
        return State::Nok;
    }
    tokenizer.enter(TokenKind::ATX_HEADING);
    tokenizer.enter(TokenKind::ATX_HEADING_SEQUENCE);
    tokenizer.tokenize_state.size = 0;
    State::Retry(sequence_open)
}

fn sequence_open(tokenizer: &mut Tokenizer<'_>) -> State {
    let size = tokenizer.tokenize_state.size;
    if tokenizer.current.is('#') && size < ATX_HEADING_OPENING_FENCE_SIZE_MAX {
        tokenizer.consume();
        tokenizer.tokenize_state.size += 1;
        State::Next(sequence_open)
    } else if size > 0
        && (tokenizer.current == Code::Eof || markdown_line_ending_or_space(tokenizer.current))
    {
        tokenizer.tokenize_state.size = 0;
        tokenizer.exit(TokenKind::ATX_HEADING_SEQUENCE);
        State::Retry(at_break)
    } else {
        tokenizer.tokenize_state.size = 0;
        State::Nok
    }
}

fn at_break(tokenizer: &mut Tokenizer<'_>) -> State {
    match tokenizer.current {
        Code::Char('#') => {
            tokenizer.enter(TokenKind::ATX_HEADING_SEQUENCE);
            State::Retry(sequence_further)
        }
        Code::Eof | Code::LineEnding => {
            tokenizer.exit(TokenKind::ATX_HEADING);
            State::Ok
        }
        code if markdown_space(code) => {
            tokenizer.attempt(State::Next(at_break), State::Nok);
            State::Retry(space_or_tab(tokenizer, TokenKind::WHITESPACE, usize::MAX))
        }
        Code::Char(_) => {
            tokenizer.enter(TokenKind::DATA);
            State::Retry(data)
        }
    }
}

fn sequence_further(tokenizer: &mut Tokenizer<'_>) -> State {
    if tokenizer.current.is('#') {
        tokenizer.consume();
        State::Next(sequence_further)
    } else {
        tokenizer.exit(TokenKind::ATX_HEADING_SEQUENCE);
        State::Retry(at_break)
    }
}

fn data(tokenizer: &mut Tokenizer<'_>) -> State {
    match tokenizer.current {
        Code::Eof | Code::Char('#') => {
            tokenizer.exit(TokenKind::DATA);
            State::Retry(at_break)
        }
        code if markdown_line_ending_or_space(code) => {
            tokenizer.exit(TokenKind::DATA);
            State::Retry(at_break)
        }
        _ => {
            tokenizer.consume();
            State::Next(data)
        }
    }
}

/// Replace the tokens between the opening and closing sequence with
/// `ATX_HEADING_TEXT` > `CHUNK_TEXT`.
fn resolve(tokenizer: &mut Tokenizer<'_>, from: usize) {
    let events = &mut tokenizer.context.events;
    let is = |index: usize, kind: TokenKind| events[index].token.kind == kind;

    // events[from] enters the heading, `+ 1`/`+ 2` are the opening sequence.
    let mut content_start = from + 3;
    let mut content_end = events.len() - 2;

    if content_start < content_end && is(content_start, TokenKind::WHITESPACE) {
        content_start += 2;
    }
    if content_end >= 2
        && content_end - 2 > content_start
        && is(content_end, TokenKind::WHITESPACE)
    {
        content_end -= 2;
    }
    if content_end > content_start
        && is(content_end, TokenKind::ATX_HEADING_SEQUENCE)
        && (content_start == content_end - 1
            || (content_end - 4 > content_start && is(content_end - 2, TokenKind::WHITESPACE)))
    {
        content_end -= if content_start + 1 == content_end { 2 } else { 4 };
    }

    if content_end > content_start {
        let start = events[content_start].token.start;
        let end = events[content_end].token.end;
        let text = Token::spanning(TokenKind::ATX_HEADING_TEXT, start, end);
        let mut chunk = Token::spanning(TokenKind::CHUNK_TEXT, start, end);
        chunk.content_type = Some(ContentType::Text);
        events.splice(
            content_start..=content_end,
            [
                Event::enter(text.clone()),
                Event::enter(chunk.clone()),
                Event::exit(chunk),
                Event::exit(text),
            ],
        );
    }
}

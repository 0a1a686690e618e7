//! Text and string: inline content.
//!
//! Both loop over their input trying the constructs of their hook at every
//! character that can start one, and collect everything else as `DATA`.
//! Text is what paragraphs and headings hold; string is the restricted form
//! inside labels, destinations and titles, where only escapes apply.
//!
//! Two resolvers tidy the result: adjacent `DATA` (left over when a
//! construct did not match) is merged, and in text, whitespace before a line
//! ending becomes `LINE_SUFFIX`, or `HARD_BREAK_TRAILING` for two or more
//! spaces.

use crate::code::Code;
use crate::construct::Hook;
use crate::edit_map::EditMap;
use crate::event::{Event, Point, Token};
use crate::state::State;
use crate::token::{ContentType, TokenKind};
use crate::tokenizer::Tokenizer;

fn hook(tokenizer: &Tokenizer<'_>) -> Hook {
    match tokenizer.content_type() {
        ContentType::String => Hook::String,
        _ => Hook::Text,
    }
}

fn can_start(tokenizer: &Tokenizer<'_>) -> bool {
    tokenizer
        .context
        .parse_state
        .constructs
        .hook(hook(tokenizer))
        .can_start(tokenizer.current)
}

/// Start of text.
pub fn text_start(tokenizer: &mut Tokenizer<'_>) -> State {
    start(tokenizer)
}

/// Start of a string.
pub fn string_start(tokenizer: &mut Tokenizer<'_>) -> State {
    start(tokenizer)
}

fn start(tokenizer: &mut Tokenizer<'_>) -> State {
    match tokenizer.current {
        Code::Eof => State::Ok,
        Code::LineEnding => {
            tokenizer.enter(TokenKind::LINE_ENDING);
            tokenizer.consume();
            tokenizer.exit(TokenKind::LINE_ENDING);
            State::Next(start)
        }
        _ if can_start(tokenizer) => {
            let hook = hook(tokenizer);
            tokenizer.attempt_hook(hook, State::Next(start), State::Next(data))
        }
        _ => State::Retry(data),
    }
}

/// At a character no construct matched: it is data.
fn data(tokenizer: &mut Tokenizer<'_>) -> State {
    tokenizer.enter(TokenKind::DATA);
    tokenizer.consume();
    State::Next(data_inside)
}

fn data_inside(tokenizer: &mut Tokenizer<'_>) -> State {
    match tokenizer.current {
        Code::Eof | Code::LineEnding => {
            tokenizer.exit(TokenKind::DATA);
            State::Retry(start)
        }
        _ if can_start(tokenizer) => {
            tokenizer.exit(TokenKind::DATA);
            State::Retry(start)
        }
        _ => {
            tokenizer.consume();
            State::Next(data_inside)
        }
    }
}

/// Merge runs of adjacent `DATA` tokens.
pub fn resolve_data(tokenizer: &mut Tokenizer<'_>) {
    let events = &mut tokenizer.context.events;
    let mut map = EditMap::new();
    let mut index = 0;

    while index < events.len() {
        if events[index].is_enter() && events[index].token.kind == TokenKind::DATA {
            let mut exit = index + 1;
            while exit + 2 < events.len()
                && events[exit + 1].is_enter()
                && events[exit + 1].token.kind == TokenKind::DATA
            {
                exit += 2;
            }
            if exit > index + 1 {
                let start = events[index].token.start;
                let end = events[exit].token.end;
                events[index].token.end = end;
                events[exit].token.start = start;
                map.add(index + 1, exit - index - 1, Vec::new());
            }
            index = exit + 1;
        } else {
            index += 1;
        }
    }

    map.consume(events);
}

/// Split trailing whitespace off `DATA` before a line ending or the end.
pub fn resolve_line_suffixes(tokenizer: &mut Tokenizer<'_>) {
    let input = tokenizer.context.parse_state.input;
    let events = &mut tokenizer.context.events;
    let mut map = EditMap::new();

    for exit in 1..events.len() {
        let event = &events[exit];
        if !event.is_exit() || event.token.kind != TokenKind::DATA {
            continue;
        }
        let before_line_ending = match events.get(exit + 1) {
            None => false,
            Some(next) if next.is_enter() && next.token.kind == TokenKind::LINE_ENDING => true,
            Some(_) => continue,
        };

        let (start, end) = (event.token.start, event.token.end);
        let mut size = 0;
        let mut tabs = false;
        while start.index + size < end.index {
            match input.code(end.index - size - 1) {
                Code::Char(' ') => {}
                Code::Char('\t') => tabs = true,
                _ => break,
            }
            size += 1;
        }
        if size == 0 {
            continue;
        }

        let kind = if before_line_ending && size >= 2 && !tabs {
            TokenKind::HARD_BREAK_TRAILING
        } else {
            TokenKind::LINE_SUFFIX
        };

        if start.index + size == end.index {
            events[exit - 1].token.kind = kind;
            events[exit].token.kind = kind;
        } else {
            let index = end.index - size;
            let split = Point::new(end.line, end.column - size, input.offset(index), index);
            events[exit - 1].token.end = split;
            events[exit].token.end = split;
            let suffix = Token::spanning(kind, split, end);
            map.add(exit + 1, 0, vec![Event::enter(suffix.clone()), Event::exit(suffix)]);
        }
    }

    map.consume(events);
}

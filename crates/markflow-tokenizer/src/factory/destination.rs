//! Destination: `<enclosed>` or a raw run with balanced parentheses.
//!
//! Tokens are set in `tokenize_state`: `token_1` wraps the whole
//! destination, `token_2` an enclosed one, `token_3` its angle brackets,
//! `token_4` a raw one and `token_5` the text, which holds one
//! `CHUNK_STRING`. `size_b` is the maximum paren depth of a raw destination.

use crate::code::{Code, ascii_control, markdown_line_ending_or_space};
use crate::state::State;
use crate::token::{ContentType, TokenKind};
use crate::tokenizer::Tokenizer;

/// At the start of a destination.
pub fn start(tokenizer: &mut Tokenizer<'_>) -> State {
    let state = &tokenizer.tokenize_state;
    let (destination, literal, marker, raw, string) =
        (state.token_1, state.token_2, state.token_3, state.token_4, state.token_5);

    match tokenizer.current {
        Code::Char('<') => {
            tokenizer.enter(destination);
            tokenizer.enter(literal);
            tokenizer.enter(marker);
            tokenizer.consume();
            tokenizer.exit(marker);
            State::Next(enclosed_before)
        }
        Code::Eof | Code::Char(')') => State::Nok,
        code if markdown_line_ending_or_space(code) || ascii_control(code) => State::Nok,
        _ => {
            tokenizer.enter(destination);
            tokenizer.enter(raw);
            tokenizer.enter(string);
            tokenizer.enter_with_content(TokenKind::CHUNK_STRING, ContentType::String);
            State::Retry(raw_inside)
        }
    }
}

/// After `<`, or after the text of an enclosed destination.
fn enclosed_before(tokenizer: &mut Tokenizer<'_>) -> State {
    if tokenizer.current.is('>') {
        let state = &tokenizer.tokenize_state;
        let (destination, literal, marker) = (state.token_1, state.token_2, state.token_3);
        tokenizer.enter(marker);
        tokenizer.consume();
        tokenizer.exit(marker);
        tokenizer.exit(literal);
        tokenizer.exit(destination);
        State::Ok
    } else {
        tokenizer.enter(tokenizer.tokenize_state.token_5);
        tokenizer.enter_with_content(TokenKind::CHUNK_STRING, ContentType::String);
        State::Retry(enclosed)
    }
}

fn enclosed(tokenizer: &mut Tokenizer<'_>) -> State {
    match tokenizer.current {
        Code::Eof | Code::LineEnding | Code::Char('<') => nok(tokenizer),
        Code::Char('>') => {
            tokenizer.exit(TokenKind::CHUNK_STRING);
            tokenizer.exit(tokenizer.tokenize_state.token_5);
            tokenizer.end_chain();
            State::Retry(enclosed_before)
        }
        Code::Char('\\') => {
            tokenizer.consume();
            State::Next(enclosed_escape)
        }
        Code::Char(_) => {
            tokenizer.consume();
            State::Next(enclosed)
        }
    }
}

fn enclosed_escape(tokenizer: &mut Tokenizer<'_>) -> State {
    match tokenizer.current {
        Code::Char('<' | '>' | '\\') => {
            tokenizer.consume();
            State::Next(enclosed)
        }
        _ => State::Retry(enclosed),
    }
}

fn raw_inside(tokenizer: &mut Tokenizer<'_>) -> State {
    let depth = tokenizer.tokenize_state.size;
    let limit = tokenizer.tokenize_state.size_b;
    let code = tokenizer.current;

    if depth == 0 && (code == Code::Eof || code.is(')') || markdown_line_ending_or_space(code)) {
        let state = &tokenizer.tokenize_state;
        let (destination, raw, string) = (state.token_1, state.token_4, state.token_5);
        tokenizer.exit(TokenKind::CHUNK_STRING);
        tokenizer.exit(string);
        tokenizer.exit(raw);
        tokenizer.exit(destination);
        tokenizer.end_chain();
        tokenizer.tokenize_state.size = 0;
        State::Ok
    } else if depth < limit && code.is('(') {
        tokenizer.consume();
        tokenizer.tokenize_state.size += 1;
        State::Next(raw_inside)
    } else if code.is(')') {
        tokenizer.consume();
        tokenizer.tokenize_state.size -= 1;
        State::Next(raw_inside)
    } else if code == Code::Eof
        || code.is('(')
        || markdown_line_ending_or_space(code)
        || ascii_control(code)
    {
        nok(tokenizer)
    } else {
        tokenizer.consume();
        if code.is('\\') {
            State::Next(raw_escape)
        } else {
            State::Next(raw_inside)
        }
    }
}

fn raw_escape(tokenizer: &mut Tokenizer<'_>) -> State {
    match tokenizer.current {
        Code::Char('(' | ')' | '\\') => {
            tokenizer.consume();
            State::Next(raw_inside)
        }
        _ => State::Retry(raw_inside),
    }
}

fn nok(tokenizer: &mut Tokenizer<'_>) -> State {
    tokenizer.tokenize_state.size = 0;
    tokenizer.end_chain();
    State::Nok
}

#[cfg(test)]
mod tests {
    use crate::parser::{ParseOptions, tokenize};
    use crate::token::TokenKind;
    use rstest::rstest;

    fn destination(value: &str) -> Option<String> {
        let events = tokenize(value, &ParseOptions::default());
        events
            .iter()
            .find(|e| e.is_exit() && e.token.kind == TokenKind::RESOURCE_DESTINATION_STRING)
            .map(|e| value[e.token.start.offset..e.token.end.offset].to_string())
    }

    #[rstest]
    #[case("[a](b)", Some("b"))]
    #[case("[a](<b c>)", Some("b c"))]
    #[case("[a](b(c)d)", Some("b(c)d"))]
    #[case("[a](b\\)c)", Some("b\\)c"))]
    #[case("[a](<b\nc>)", None)]
    #[case("[a](b(c)", None)]
    fn resource_destinations(#[case] value: &str, #[case] expected: Option<&str>) {
        assert_eq!(destination(value).as_deref(), expected);
    }

    #[test]
    fn paren_depth_is_limited() {
        let deep = format!("[a]({}x{})", "(".repeat(32), ")".repeat(32));
        let too_deep = format!("[a]({}x{})", "(".repeat(33), ")".repeat(33));
        assert!(destination(&deep).is_some());
        assert!(destination(&too_deep).is_none());
    }
}

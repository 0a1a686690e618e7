//! Thematic break: three or more of the same `*`, `-` or `_`, optionally
//! separated by spaces, alone on a line.

use crate::code::{Code, THEMATIC_BREAK_MARKER_COUNT_MIN, markdown_space};
use crate::construct::Construct;
use crate::factory::space::space_or_tab;
use crate::state::State;
use crate::token::TokenKind;
use crate::tokenizer::Tokenizer;

/// Thematic break.
pub const THEMATIC_BREAK: Construct = Construct::new("thematicBreak", start);

fn start(tokenizer: &mut Tokenizer<'_>) -> State {
    match tokenizer.current {
        Code::Char(marker @ ('*' | '-' | '_')) => {
            tokenizer.enter(TokenKind::THEMATIC_BREAK);
            tokenizer.tokenize_state.marker = Some(marker);
            tokenizer.tokenize_state.size = 0;
            State::Retry(at_break)
        }
        _ => State::Nok,
    }
}

fn at_break(tokenizer: &mut Tokenizer<'_>) -> State {
    let state = &tokenizer.tokenize_state;
    if state.marker.is_some_and(|marker| tokenizer.current.is(marker)) {
        tokenizer.enter(TokenKind::THEMATIC_BREAK_SEQUENCE);
        State::Retry(sequence)
    } else if matches!(tokenizer.current, Code::Eof | Code::LineEnding)
        && state.size >= THEMATIC_BREAK_MARKER_COUNT_MIN
    {
        tokenizer.exit(TokenKind::THEMATIC_BREAK);
        reset(tokenizer);
        State::Ok
    } else {
        reset(tokenizer);
        State::Nok
    }
}

fn sequence(tokenizer: &mut Tokenizer<'_>) -> State {
    if tokenizer
        .tokenize_state
        .marker
        .is_some_and(|marker| tokenizer.current.is(marker))
    {
        tokenizer.consume();
        tokenizer.tokenize_state.size += 1;
        State::Next(sequence)
    } else {
        tokenizer.exit(TokenKind::THEMATIC_BREAK_SEQUENCE);
        if markdown_space(tokenizer.current) {
            tokenizer.attempt(State::Next(at_break), State::Nok);
            State::Retry(space_or_tab(tokenizer, TokenKind::WHITESPACE, usize::MAX))
        } else {
            State::Retry(at_break)
        }
    }
}

fn reset(tokenizer: &mut Tokenizer<'_>) {
    tokenizer.tokenize_state.marker = None;
    tokenizer.tokenize_state.size = 0;
}

#[cfg(test)]
mod tests {
    use crate::parser::{ParseOptions, tokenize};
    use crate::token::TokenKind;
    use rstest::rstest;

    #[rstest]
    #[case("***", true)]
    #[case("- - -", true)]
    #[case("_____  ", true)]
    #[case("  ***", true)]
    #[case("**", false)]
    #[case("*-*", false)]
    #[case("*** a", false)]
    fn thematic_breaks(#[case] value: &str, #[case] expected: bool) {
        let events = tokenize(value, &ParseOptions::default());
        let found = events.iter().any(|e| e.token.kind == TokenKind::THEMATIC_BREAK);
        assert_eq!(found, expected);
    }
}

//! Label: `[` text `]`, as in definitions and full references.
//!
//! Tokens are set in `tokenize_state`: `token_1` wraps the whole label,
//! `token_2` is each bracket and `token_3` the text between them. The text
//! is held in linked `CHUNK_STRING` chunks, one per line, re-tokenized as
//! string later.
//!
//! A label fails on an unescaped `[`, when it holds only whitespace, at the
//! end of input, or once it grows past `label_size_max` characters. The size
//! check happens before each character is accepted, so a failing label never
//! reads more than one character past the limit.

use crate::code::{Code, markdown_space};
use crate::state::State;
use crate::token::{ContentType, TokenKind};
use crate::tokenizer::Tokenizer;

/// At `[`.
pub fn start(tokenizer: &mut Tokenizer<'_>) -> State {
    debug_assert!(tokenizer.current.is('['));
    let state = &tokenizer.tokenize_state;
    let (label, marker, string) = (state.token_1, state.token_2, state.token_3);
    tokenizer.enter(label);
    tokenizer.enter(marker);
    tokenizer.consume();
    tokenizer.exit(marker);
    tokenizer.enter(string);
    State::Next(at_break)
}

fn at_break(tokenizer: &mut Tokenizer<'_>) -> State {
    let max = tokenizer.options().label_size_max;
    let footnotes = tokenizer.options().hidden_footnote_support;
    let state = &tokenizer.tokenize_state;

    let fails = match tokenizer.current {
        Code::Eof => true,
        Code::Char('[') => true,
        Code::Char(']') => !state.seen,
        Code::Char('^') => footnotes && state.size == 0,
        _ => false,
    };
    if fails || state.size > max {
        return nok(tokenizer);
    }

    match tokenizer.current {
        Code::Char(']') => {
            let state = &tokenizer.tokenize_state;
            let (label, marker, string) = (state.token_1, state.token_2, state.token_3);
            tokenizer.exit(string);
            tokenizer.enter(marker);
            tokenizer.consume();
            tokenizer.exit(marker);
            tokenizer.exit(label);
            reset(tokenizer);
            State::Ok
        }
        Code::LineEnding => {
            tokenizer.enter(TokenKind::LINE_ENDING);
            tokenizer.consume();
            tokenizer.exit(TokenKind::LINE_ENDING);
            State::Next(at_break)
        }
        _ => {
            tokenizer.enter_with_content(TokenKind::CHUNK_STRING, ContentType::String);
            State::Retry(inside)
        }
    }
}

fn inside(tokenizer: &mut Tokenizer<'_>) -> State {
    match tokenizer.current {
        Code::Eof | Code::LineEnding | Code::Char('[' | ']') => {
            tokenizer.exit(TokenKind::CHUNK_STRING);
            State::Retry(at_break)
        }
        code => {
            let over = tokenizer.tokenize_state.size > tokenizer.options().label_size_max;
            tokenizer.tokenize_state.size += 1;
            if over {
                tokenizer.exit(TokenKind::CHUNK_STRING);
                return State::Retry(at_break);
            }
            tokenizer.consume();
            if !markdown_space(code) {
                tokenizer.tokenize_state.seen = true;
            }
            if code.is('\\') {
                State::Next(escape)
            } else {
                State::Next(inside)
            }
        }
    }
}

fn escape(tokenizer: &mut Tokenizer<'_>) -> State {
    match tokenizer.current {
        Code::Char('[' | '\\' | ']') => {
            tokenizer.consume();
            tokenizer.tokenize_state.size += 1;
            State::Next(inside)
        }
        _ => State::Retry(inside),
    }
}

fn nok(tokenizer: &mut Tokenizer<'_>) -> State {
    reset(tokenizer);
    State::Nok
}

fn reset(tokenizer: &mut Tokenizer<'_>) {
    tokenizer.tokenize_state.size = 0;
    tokenizer.tokenize_state.seen = false;
    tokenizer.end_chain();
}

#[cfg(test)]
mod tests {
    use crate::parser::{ParseOptions, tokenize};
    use crate::token::TokenKind;
    use rstest::rstest;

    fn options(max: usize) -> ParseOptions {
        ParseOptions {
            label_size_max: max,
            ..ParseOptions::default()
        }
    }

    fn has_definition(value: &str, options: &ParseOptions) -> bool {
        tokenize(value, options)
            .iter()
            .any(|event| event.token.kind == TokenKind::DEFINITION)
    }

    #[rstest]
    #[case(4, true)]
    #[case(5, false)]
    #[case(8, false)]
    fn size_guard_is_exact(#[case] length: usize, #[case] matches: bool) {
        let value = format!("[{}]: /u", "a".repeat(length));
        assert_eq!(has_definition(&value, &options(4)), matches);
    }

    #[test]
    fn whitespace_only_label_fails() {
        assert!(!has_definition("[ \t]: /u", &ParseOptions::default()));
    }

    #[test]
    fn escaped_brackets_stay_inside() {
        let events = tokenize("[a\\]b]: /u", &ParseOptions::default());
        let string = events
            .iter()
            .find(|e| e.is_exit() && e.token.kind == TokenKind::DEFINITION_LABEL_STRING)
            .map(|e| (e.token.start.offset, e.token.end.offset));
        assert_eq!(string, Some((1, 5)));
        assert!(events.iter().any(|e| e.token.kind == TokenKind::CHARACTER_ESCAPE));
    }

    #[test]
    fn labels_span_lines() {
        assert!(has_definition("[a\nb]: /u", &ParseOptions::default()));
    }

    #[test]
    fn caret_start_is_reserved_for_footnotes() {
        let footnotes = ParseOptions {
            hidden_footnote_support: true,
            ..ParseOptions::default()
        };
        assert!(has_definition("[^a]: /u", &ParseOptions::default()));
        assert!(!has_definition("[^a]: /u", &footnotes));
    }
}

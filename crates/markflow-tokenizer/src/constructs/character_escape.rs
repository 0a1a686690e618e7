//! Character escape: `\` before ASCII punctuation.

use crate::code::ascii_punctuation;
use crate::construct::Construct;
use crate::state::State;
use crate::token::TokenKind;
use crate::tokenizer::Tokenizer;

/// Character escape, in text and in strings.
pub const CHARACTER_ESCAPE: Construct = Construct::new("characterEscape", start);

fn start(tokenizer: &mut Tokenizer<'_>) -> State {
    if !tokenizer.current.is('\\') {
        return State::Nok;
    }
    tokenizer.enter(TokenKind::CHARACTER_ESCAPE);
    tokenizer.enter(TokenKind::CHARACTER_ESCAPE_MARKER);
    tokenizer.consume();
    tokenizer.exit(TokenKind::CHARACTER_ESCAPE_MARKER);
    State::Next(inside)
}

fn inside(tokenizer: &mut Tokenizer<'_>) -> State {
    if ascii_punctuation(tokenizer.current) {
        tokenizer.enter(TokenKind::CHARACTER_ESCAPE_VALUE);
        tokenizer.consume();
        tokenizer.exit(TokenKind::CHARACTER_ESCAPE_VALUE);
        tokenizer.exit(TokenKind::CHARACTER_ESCAPE);
        State::Ok
    } else {
        State::Nok
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::{ParseOptions, tokenize};
    use crate::token::TokenKind;
    use rstest::rstest;

    #[rstest]
    #[case("\\*", true)]
    #[case("\\[", true)]
    #[case("\\a", false)]
    #[case("\\", false)]
    #[case("\\\n", false)]
    fn escapes(#[case] value: &str, #[case] expected: bool) {
        let events = tokenize(value, &ParseOptions::default());
        let found = events.iter().any(|e| e.token.kind == TokenKind::CHARACTER_ESCAPE);
        assert_eq!(found, expected);
    }

    #[test]
    fn escaped_marker_is_not_emphasis() {
        let events = tokenize("\\*a*", &ParseOptions::default());
        assert!(!events.iter().any(|e| e.token.kind == TokenKind::EMPHASIS));
    }
}

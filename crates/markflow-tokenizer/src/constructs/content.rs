//! Content: a run of lines that is not a blank line or another flow
//! construct.
//!
//! Each line becomes a `CHUNK_CONTENT` chunk. The chunks are linked, so the
//! content tokenizer later reads them as one stream, and the indentation of
//! continuation lines stays outside as `LINE_PREFIX`.
//!
//! ```text
//! CONTENT
//!   CHUNK_CONTENT  "a\n"
//!   LINE_PREFIX    "  "
//!   CHUNK_CONTENT  "b"
//! ```
//!
//! A line continues the content unless it is blank or a flow construct
//! matches it, which is checked without keeping any events.

use crate::code::{Code, markdown_space};
use crate::construct::{Construct, Hook};
use crate::factory::space::space_or_tab;
use crate::state::State;
use crate::token::{ContentType, TokenKind};
use crate::tokenizer::Tokenizer;

/// Content, the fallback of flow.
pub const CONTENT: Construct = Construct::new("content", start).partial();

fn start(tokenizer: &mut Tokenizer<'_>) -> State {
    match tokenizer.current {
        Code::Eof | Code::LineEnding => State::Nok,
        _ => {
            tokenizer.enter(TokenKind::CONTENT);
            State::Retry(chunk_start)
        }
    }
}

fn chunk_start(tokenizer: &mut Tokenizer<'_>) -> State {
    tokenizer.enter_with_content(TokenKind::CHUNK_CONTENT, ContentType::Content);
    State::Retry(inside)
}

fn inside(tokenizer: &mut Tokenizer<'_>) -> State {
    match tokenizer.current {
        Code::Eof => State::Retry(end),
        Code::LineEnding => {
            tokenizer.check(State::Next(continuation), State::Next(end));
            State::Retry(continuation_start)
        }
        Code::Char(_) => {
            tokenizer.consume();
            State::Next(inside)
        }
    }
}

fn continuation_start(tokenizer: &mut Tokenizer<'_>) -> State {
    tokenizer.enter(TokenKind::LINE_ENDING);
    tokenizer.consume();
    tokenizer.exit(TokenKind::LINE_ENDING);
    State::Next(continuation_prefix)
}

fn continuation_prefix(tokenizer: &mut Tokenizer<'_>) -> State {
    if markdown_space(tokenizer.current) {
        tokenizer.attempt(State::Next(continuation_after), State::Nok);
        State::Retry(space_or_tab(tokenizer, TokenKind::LINE_PREFIX, usize::MAX))
    } else {
        State::Retry(continuation_after)
    }
}

fn continuation_after(tokenizer: &mut Tokenizer<'_>) -> State {
    match tokenizer.current {
        Code::Eof | Code::LineEnding => State::Nok,
        // Interrupted when any flow construct starts here.
        Code::Char(_) => tokenizer.check_hook(Hook::Flow, State::Nok, State::Ok),
    }
}

fn continuation(tokenizer: &mut Tokenizer<'_>) -> State {
    tokenizer.consume();
    tokenizer.exit(TokenKind::CHUNK_CONTENT);
    State::Next(line_start)
}

fn line_start(tokenizer: &mut Tokenizer<'_>) -> State {
    if markdown_space(tokenizer.current) {
        tokenizer.attempt(State::Next(chunk_start), State::Nok);
        State::Retry(space_or_tab(tokenizer, TokenKind::LINE_PREFIX, usize::MAX))
    } else {
        State::Retry(chunk_start)
    }
}

fn end(tokenizer: &mut Tokenizer<'_>) -> State {
    tokenizer.exit(TokenKind::CHUNK_CONTENT);
    tokenizer.exit(TokenKind::CONTENT);
    tokenizer.end_chain();
    State::Ok
}

#[cfg(test)]
mod tests {
    use crate::event::Event;
    use crate::parser::{ParseOptions, tokenize};
    use crate::token::TokenKind;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn enters(value: &str) -> Vec<TokenKind> {
        let events: Vec<Event> = tokenize(value, &ParseOptions::default());
        events
            .iter()
            .filter(|e| e.is_enter())
            .map(|e| e.token.kind)
            .filter(|kind| {
                matches!(
                    kind,
                    TokenKind::PARAGRAPH | TokenKind::THEMATIC_BREAK | TokenKind::ATX_HEADING
                )
            })
            .collect()
    }

    #[rstest]
    #[case("a\n***", vec![TokenKind::PARAGRAPH, TokenKind::THEMATIC_BREAK])]
    #[case("a\n# b", vec![TokenKind::PARAGRAPH, TokenKind::ATX_HEADING])]
    #[case("a\n  ---", vec![TokenKind::PARAGRAPH, TokenKind::THEMATIC_BREAK])]
    #[case("a\n#b", vec![TokenKind::PARAGRAPH])]
    #[case("a\n**b**", vec![TokenKind::PARAGRAPH])]
    #[case("a\n\nb", vec![TokenKind::PARAGRAPH, TokenKind::PARAGRAPH])]
    fn flow_constructs_interrupt(#[case] value: &str, #[case] expected: Vec<TokenKind>) {
        assert_eq!(enters(value), expected);
    }

    #[test]
    fn lookahead_keeps_nothing_of_a_match() {
        // The heading matches during the lookahead on the line ending, then
        // is tokenized again for real: it must appear exactly once.
        let value = "a\n# b";
        let events = tokenize(value, &ParseOptions::default());
        let headings = events
            .iter()
            .filter(|e| e.is_enter() && e.token.kind == TokenKind::ATX_HEADING)
            .count();
        assert_eq!(headings, 1);
        let paragraph = events
            .iter()
            .find(|e| e.is_exit() && e.token.kind == TokenKind::PARAGRAPH)
            .map(|e| (e.token.start.offset, e.token.end.offset));
        assert_eq!(paragraph, Some((0, 1)));
    }

    #[test]
    fn continuation_lines_keep_their_prefix_outside() {
        let value = "a\n  b";
        let events = tokenize(value, &ParseOptions::default());
        let prefix = events
            .iter()
            .find(|e| e.is_exit() && e.token.kind == TokenKind::LINE_PREFIX)
            .map(|e| (e.token.start.offset, e.token.end.offset));
        assert_eq!(prefix, Some((2, 4)));
        let data: Vec<&str> = events
            .iter()
            .filter(|e| e.is_exit() && e.token.kind == TokenKind::DATA)
            .map(|e| &value[e.token.start.offset..e.token.end.offset])
            .collect();
        assert_eq!(data, vec!["a", "b"]);
    }
}

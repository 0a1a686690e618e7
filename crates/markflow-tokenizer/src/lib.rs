//! # markflow-tokenizer
//!
//! A resumable, extensible CommonMark tokenizer. Markdown goes in, a flat
//! log of enter/exit [`Event`]s comes out.
//!
//! ## Architecture Overview
//!
//! ```text
//! Source → preprocess → Codes → Tokenizer (flow) → Events
//!                                   │
//!                     subtokenize ◄─┘  (content, text, string chunks)
//!                                   │
//!                     resolvers  ◄──┘  (labels, attention, data)
//! ```
//!
//! ### 1. State machine ([`tokenizer`], [`state`])
//!
//! Every construct is a set of plain functions `fn(&mut Tokenizer) -> State`.
//! A state either asks for the next character ([`State::Next`]), hands the
//! current one to another state ([`State::Retry`]), or settles the current
//! attempt ([`State::Ok`] / [`State::Nok`]). The engine drives these states
//! one code at a time, so there is no recursion and no lookahead buffer.
//!
//! ### 2. Attempts and checks
//!
//! Trying a construct takes a checkpoint. If the construct fails, the
//! tokenizer rewinds to it: the position, the event log, and the open-token
//! stack all go back to how they were. A *check* always rewinds, and is used
//! for lookahead.
//!
//! ### 3. Content types ([`subtokenize`])
//!
//! Block structure is tokenized first. Paragraphs, headings, labels and
//! titles leave linked chunks behind; each chain of chunks is then run
//! through a child tokenizer of the right [`ContentType`] and its events are
//! spliced back in. Chains can span several lines with gaps between them,
//! which the child sees as one continuous input.
//!
//! ### 4. Resolvers ([`edit_map`])
//!
//! Some structure is only known once a whole text has been seen: which `[`
//! belongs to which `]`, which `*` closes which. Constructs register
//! resolvers that rewrite the event log at the end.
//!
//! ## Module Structure
//!
//! ```text
//! markflow-tokenizer/
//! ├── lib.rs           # Public API and cross-cutting tests
//! ├── code.rs          # Codes, constants, character predicates
//! ├── preprocess.rs    # Source → codes with byte offsets
//! ├── classify.rs      # Whitespace / punctuation / other
//! ├── token.rs         # TokenKind and ContentType
//! ├── event.rs         # Point, Token, Event
//! ├── state.rs         # State and StateFn
//! ├── construct.rs     # Construct, hooks, registry, extensions
//! ├── tokenizer.rs     # The engine
//! ├── parser.rs        # ParseOptions and tokenize()
//! ├── subtokenize.rs   # Chunk expansion
//! ├── edit_map.rs      # Batched event splices
//! ├── render.rs        # Text views of events
//! ├── util.rs          # Identifier normalization
//! ├── initialize/      # Entry states per content type
//! ├── factory/         # Shared sub-machines (label, destination, title...)
//! └── constructs/      # One module per construct
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use markflow_tokenizer::{ParseOptions, TokenKind, tokenize};
//!
//! let events = tokenize("[a](b)", &ParseOptions::default());
//! assert!(events.iter().any(|event| event.token.kind == TokenKind::LINK));
//! ```
//!
//! ## Extensions
//!
//! Extra constructs are plugged in through [`ParseOptions::extensions`], and
//! built-in ones can be turned off by name with [`ParseOptions::disable`]:
//!
//! ```
//! use markflow_tokenizer::{ParseOptions, TokenKind, tokenize};
//!
//! let options = ParseOptions {
//!     disable: vec!["labelStartImage".to_string()],
//!     ..ParseOptions::default()
//! };
//! let events = tokenize("![a](b)", &options);
//! assert!(!events.iter().any(|event| event.token.kind == TokenKind::IMAGE));
//! ```

pub mod classify;
pub mod code;
pub mod construct;
pub mod constructs;
pub mod edit_map;
pub mod event;
pub mod factory;
pub mod initialize;
pub mod parser;
pub mod preprocess;
pub mod render;
pub mod state;
pub mod subtokenize;
pub mod token;
pub mod tokenizer;
pub mod util;

pub use classify::{CharacterKind, classify};
pub use code::Code;
pub use construct::{Construct, Extension, Hook};
pub use event::{Event, EventKind, Point, Token, check_balanced};
pub use parser::{ParseOptions, tokenize};
pub use render::{format_event_log, format_events};
pub use state::{State, StateFn};
pub use token::{ContentType, TokenKind};
pub use tokenizer::Tokenizer;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn kinds(events: &[Event]) -> Vec<(EventKind, TokenKind)> {
        events.iter().map(|e| (e.kind, e.token.kind)).collect()
    }

    #[rstest]
    #[case("")]
    #[case("\n\n\n")]
    #[case("   \n")]
    #[case("# Heading #\n\nText")]
    #[case("***\n---\n___")]
    #[case("[a]: <b> 'c'\n\n[a] and [a][] and [x][a]")]
    #[case("[a [b](c) d](e)")]
    #[case("![a ![b](c)](d)")]
    #[case("*a **b** _c_*")]
    #[case("[a\\]b]")]
    #[case("\\*not emphasis\\*")]
    #[case("a  \nb\\\nc \n")]
    #[case("]]] [[[ ))) ((( ***")]
    #[case("[a](<b c> \"d\ne\")")]
    #[case("\u{feff}# bom\r\nline\rline")]
    fn output_is_balanced(#[case] value: &str) {
        let events = tokenize(value, &ParseOptions::default());
        assert_eq!(check_balanced(&events), Ok(()));
        assert!(events.iter().all(|e| e.token.content_type.is_none()));
    }

    #[rstest]
    #[case("a")]
    #[case("[a](b) *c*")]
    #[case("# [a] *b*")]
    #[case("[x]: y\n\n[x] a")]
    fn output_is_deterministic(#[case] value: &str) {
        let options = ParseOptions::default();
        assert_eq!(tokenize(value, &options), tokenize(value, &options));
    }

    /// Consumes a character, then gives up.
    fn give_up(tokenizer: &mut Tokenizer<'_>) -> State {
        tokenizer.enter(TokenKind::EXTENSION("giveUp"));
        tokenizer.consume();
        State::Next(give_up_after)
    }

    fn give_up_after(_tokenizer: &mut Tokenizer<'_>) -> State {
        State::Nok
    }

    #[rstest]
    #[case(Hook::Text, Some('a'))]
    #[case(Hook::Text, Some('['))]
    #[case(Hook::Flow, None)]
    #[case(Hook::Content, None)]
    fn failed_extension_leaves_no_trace(#[case] hook: Hook, #[case] trigger: Option<char>) {
        let value = "# a\n\n[x]: y\n\na [b](c) [x] *d*\n***";
        let plain = tokenize(value, &ParseOptions::default());
        let options = ParseOptions {
            extensions: vec![Extension {
                hook,
                trigger,
                construct: Construct::new("giveUp", give_up),
            }],
            ..ParseOptions::default()
        };
        assert_eq!(tokenize(value, &options), plain);
    }

    #[test]
    fn blank_line_with_spaces() {
        let events = tokenize("   \n", &ParseOptions::default());
        assert_eq!(
            kinds(&events),
            vec![
                (EventKind::Enter, TokenKind::LINE_PREFIX),
                (EventKind::Exit, TokenKind::LINE_PREFIX),
                (EventKind::Enter, TokenKind::BLANK_LINE_ENDING),
                (EventKind::Exit, TokenKind::BLANK_LINE_ENDING),
            ]
        );
    }

    #[test]
    fn image_start_without_end_is_data() {
        let value = "![";
        let events = tokenize(value, &ParseOptions::default());
        assert_eq!(
            format_events(&events, value),
            "CONTENT@0..2\n  PARAGRAPH@0..2\n    DATA@0..2 \"![\"\n"
        );
    }

    #[test]
    fn escaped_bracket_stays_in_label() {
        let value = "[a\\]b]: c\n\n[a\\]b]";
        let events = tokenize(value, &ParseOptions::default());
        let escapes = events
            .iter()
            .filter(|e| e.is_enter() && e.token.kind == TokenKind::CHARACTER_ESCAPE)
            .count();
        // One in the definition label, one in the reference.
        assert_eq!(escapes, 2);
        assert!(events.iter().any(|e| e.token.kind == TokenKind::DEFINITION));
        assert!(events.iter().any(|e| e.token.kind == TokenKind::LINK));
    }

    #[rstest]
    #[case(4, true)]
    #[case(3, false)]
    fn label_size_limit(#[case] label_size_max: usize, #[case] link: bool) {
        let options = ParseOptions {
            label_size_max,
            ..ParseOptions::default()
        };
        let events = tokenize("[abcd]: x\n\n[abcd]", &options);
        assert_eq!(events.iter().any(|e| e.token.kind == TokenKind::LINK), link);
    }

    #[test]
    fn links_and_emphasis_nest() {
        let value = "*[a **b**](c)*";
        let events = tokenize(value, &ParseOptions::default());
        let groups: Vec<TokenKind> = events
            .iter()
            .filter(|e| e.is_enter())
            .map(|e| e.token.kind)
            .filter(|kind| {
                matches!(
                    kind,
                    TokenKind::EMPHASIS | TokenKind::STRONG | TokenKind::LINK | TokenKind::LABEL_TEXT
                )
            })
            .collect();
        assert_eq!(
            groups,
            vec![
                TokenKind::EMPHASIS,
                TokenKind::LINK,
                TokenKind::LABEL_TEXT,
                TokenKind::STRONG,
            ]
        );
    }
}

//! Label end: `]`, optionally followed by a resource or a reference.
//!
//! A label end closes the nearest label start that is still open. It forms a
//! link or image when what follows it is one of:
//!
//! ```text
//! [a](b "c")   resource
//! [a][b]       full reference    (b must be defined)
//! [a][]        collapsed reference (a must be defined)
//! [a]          shortcut reference  (a must be defined)
//! ```
//!
//! When nothing matches, the start it tried becomes *loose*: it can no
//! longer open a label and ends up as data. Matching a link also deactivates
//! every earlier link start, because links cannot contain links.
//!
//! Grouping happens in [`resolve`], once the whole text is tokenized:
//!
//! ```text
//! LINK
//!   LABEL
//!     LABEL_LINK
//!     LABEL_TEXT
//!     LABEL_END
//!   RESOURCE
//! ```

use crate::code::{Code, LINK_RESOURCE_DESTINATION_BALANCE_MAX, markdown_line_ending_or_space};
use crate::construct::Construct;
use crate::edit_map::EditMap;
use crate::event::{Event, Token};
use crate::factory::{destination, label, title, whitespace::whitespace};
use crate::state::State;
use crate::token::TokenKind;
use crate::tokenizer::{Label, LabelKind, Tokenizer};
use crate::util::normalize_identifier;

/// Label end.
pub const LABEL_END: Construct = Construct::new("labelEnd", start).with_resolve_all(resolve);

fn start(tokenizer: &mut Tokenizer<'_>) -> State {
    if !tokenizer.current.is(']') {
        return State::Nok;
    }
    let Some(label_start) = tokenizer.tokenize_state.label_starts.last().copied() else {
        return State::Nok;
    };

    tokenizer.tokenize_state.end = tokenizer.context.events.len();

    if label_start.inactive {
        return State::Retry(nok);
    }

    tokenizer.enter(TokenKind::LABEL_END);
    tokenizer.enter(TokenKind::LABEL_MARKER);
    tokenizer.consume();
    tokenizer.exit(TokenKind::LABEL_MARKER);
    tokenizer.exit(TokenKind::LABEL_END);
    State::Next(after)
}

fn after(tokenizer: &mut Tokenizer<'_>) -> State {
    let defined = label_is_defined(tokenizer);

    if tokenizer.current.is('(') {
        let nok_state = if defined { State::Next(ok) } else { State::Next(nok) };
        tokenizer.attempt(State::Next(ok), nok_state);
        State::Retry(resource_start)
    } else if tokenizer.current.is('[') {
        let nok_state = if defined {
            State::Next(reference_not_full)
        } else {
            State::Next(nok)
        };
        tokenizer.attempt(State::Next(ok), nok_state);
        State::Retry(reference_full)
    } else if defined {
        State::Retry(ok)
    } else {
        State::Retry(nok)
    }
}

/// Whether the text between the open label start and this label end is a
/// defined identifier.
///
/// Text longer than a label can be is never looked up.
fn label_is_defined(tokenizer: &Tokenizer<'_>) -> bool {
    let Some(label_start) = tokenizer.tokenize_state.label_starts.last() else {
        return false;
    };
    let events = &tokenizer.context.events;
    let from = events[label_start.start.1].token.end;
    let to = events[tokenizer.tokenize_state.end].token.start;
    if !fits_in_label(tokenizer, from.index, to.index) {
        return false;
    }
    let identifier = normalize_identifier(&tokenizer.slice_serialize(&from, &to));
    tokenizer.context.is_defined(&identifier)
}

/// Whether the codes in `from..to`, line endings aside, fit in a label.
fn fits_in_label(tokenizer: &Tokenizer<'_>, from: usize, to: usize) -> bool {
    let max = tokenizer.options().label_size_max;
    if to - from <= max {
        return true;
    }
    let input = &tokenizer.context.parse_state.input;
    let mut size = 0;
    for index in from..to {
        if input.code(index) != Code::LineEnding {
            size += 1;
            if size > max {
                return false;
            }
        }
    }
    true
}

fn reference_not_full(tokenizer: &mut Tokenizer<'_>) -> State {
    tokenizer.attempt(State::Next(ok), State::Next(nok));
    State::Retry(reference_collapsed)
}

/// Matched: record the label for the resolver.
fn ok(tokenizer: &mut Tokenizer<'_>) -> State {
    let Some(label_start) = tokenizer.tokenize_state.label_starts.pop() else {
        unreachable!("a label end only matches with an open label start");
    };

    if label_start.kind == LabelKind::Link {
        for earlier in &mut tokenizer.tokenize_state.label_starts {
            if earlier.kind == LabelKind::Link {
                earlier.inactive = true;
            }
        }
    }

    tokenizer.tokenize_state.labels.push(Label {
        kind: label_start.kind,
        start: label_start.start,
        end: (tokenizer.tokenize_state.end, tokenizer.context.events.len() - 1),
    });
    tokenizer.tokenize_state.end = 0;
    tokenizer.register_resolver_before(resolve);
    State::Ok
}

/// Not a link: the label start can no longer be closed.
///
/// This change is kept when the engine rolls back this attempt, and undone
/// when an enclosing attempt is rolled back.
fn nok(tokenizer: &mut Tokenizer<'_>) -> State {
    let depth = tokenizer.attempt_depth().saturating_sub(1);
    if let Some(mut label_start) = tokenizer.tokenize_state.label_starts.pop() {
        label_start.inactive = true;
        tokenizer
            .tokenize_state
            .label_starts_loose
            .push((label_start, depth));
    }
    tokenizer.tokenize_state.end = 0;
    State::Nok
}

fn resource_start(tokenizer: &mut Tokenizer<'_>) -> State {
    debug_assert!(tokenizer.current.is('('));
    tokenizer.enter(TokenKind::RESOURCE);
    tokenizer.enter(TokenKind::RESOURCE_MARKER);
    tokenizer.consume();
    tokenizer.exit(TokenKind::RESOURCE_MARKER);
    State::Next(resource_before)
}

fn resource_before(tokenizer: &mut Tokenizer<'_>) -> State {
    if markdown_line_ending_or_space(tokenizer.current) {
        tokenizer.attempt(State::Next(resource_open), State::Next(resource_open));
        State::Retry(whitespace(tokenizer))
    } else {
        State::Retry(resource_open)
    }
}

fn resource_open(tokenizer: &mut Tokenizer<'_>) -> State {
    if tokenizer.current.is(')') {
        return State::Retry(resource_end);
    }
    let state = &mut tokenizer.tokenize_state;
    state.token_1 = TokenKind::RESOURCE_DESTINATION;
    state.token_2 = TokenKind::RESOURCE_DESTINATION_LITERAL;
    state.token_3 = TokenKind::RESOURCE_DESTINATION_LITERAL_MARKER;
    state.token_4 = TokenKind::RESOURCE_DESTINATION_RAW;
    state.token_5 = TokenKind::RESOURCE_DESTINATION_STRING;
    state.size = 0;
    state.size_b = LINK_RESOURCE_DESTINATION_BALANCE_MAX;
    tokenizer.attempt(State::Next(resource_destination_after), State::Nok);
    State::Retry(destination::start)
}

fn resource_destination_after(tokenizer: &mut Tokenizer<'_>) -> State {
    if markdown_line_ending_or_space(tokenizer.current) {
        tokenizer.attempt(State::Next(resource_between), State::Next(resource_end));
        State::Retry(whitespace(tokenizer))
    } else {
        State::Retry(resource_end)
    }
}

fn resource_between(tokenizer: &mut Tokenizer<'_>) -> State {
    if matches!(tokenizer.current.as_char(), Some('"' | '\'' | '(')) {
        let state = &mut tokenizer.tokenize_state;
        state.token_1 = TokenKind::RESOURCE_TITLE;
        state.token_2 = TokenKind::RESOURCE_TITLE_MARKER;
        state.token_3 = TokenKind::RESOURCE_TITLE_STRING;
        tokenizer.attempt(State::Next(resource_title_after), State::Nok);
        State::Retry(title::start)
    } else {
        State::Retry(resource_end)
    }
}

fn resource_title_after(tokenizer: &mut Tokenizer<'_>) -> State {
    if markdown_line_ending_or_space(tokenizer.current) {
        tokenizer.attempt(State::Next(resource_end), State::Next(resource_end));
        State::Retry(whitespace(tokenizer))
    } else {
        State::Retry(resource_end)
    }
}

fn resource_end(tokenizer: &mut Tokenizer<'_>) -> State {
    if tokenizer.current.is(')') {
        tokenizer.enter(TokenKind::RESOURCE_MARKER);
        tokenizer.consume();
        tokenizer.exit(TokenKind::RESOURCE_MARKER);
        tokenizer.exit(TokenKind::RESOURCE);
        State::Ok
    } else {
        State::Nok
    }
}

fn reference_full(tokenizer: &mut Tokenizer<'_>) -> State {
    debug_assert!(tokenizer.current.is('['));
    let state = &mut tokenizer.tokenize_state;
    state.token_1 = TokenKind::REFERENCE;
    state.token_2 = TokenKind::REFERENCE_MARKER;
    state.token_3 = TokenKind::REFERENCE_STRING;
    tokenizer.attempt(State::Next(reference_full_after), State::Nok);
    State::Retry(label::start)
}

fn reference_full_after(tokenizer: &mut Tokenizer<'_>) -> State {
    let defined = tokenizer
        .last_exited(TokenKind::REFERENCE_STRING)
        .map(|token| normalize_identifier(&tokenizer.slice_serialize(&token.start, &token.end)))
        .is_some_and(|identifier| tokenizer.context.is_defined(&identifier));
    if defined { State::Ok } else { State::Nok }
}

fn reference_collapsed(tokenizer: &mut Tokenizer<'_>) -> State {
    if !tokenizer.current.is('[') {
        return State::Nok;
    }
    tokenizer.enter(TokenKind::REFERENCE);
    tokenizer.enter(TokenKind::REFERENCE_MARKER);
    tokenizer.consume();
    tokenizer.exit(TokenKind::REFERENCE_MARKER);
    State::Next(reference_collapsed_open)
}

fn reference_collapsed_open(tokenizer: &mut Tokenizer<'_>) -> State {
    if tokenizer.current.is(']') {
        tokenizer.enter(TokenKind::REFERENCE_MARKER);
        tokenizer.consume();
        tokenizer.exit(TokenKind::REFERENCE_MARKER);
        tokenizer.exit(TokenKind::REFERENCE);
        State::Ok
    } else {
        State::Nok
    }
}

/// Group matched labels into links and images, and turn label starts that
/// never matched into data.
pub fn resolve(tokenizer: &mut Tokenizer<'_>) {
    let state = &mut tokenizer.tokenize_state;
    let mut left: Vec<_> = std::mem::take(&mut state.label_starts_loose)
        .into_iter()
        .map(|(label_start, _)| label_start)
        .collect();
    left.append(&mut state.label_starts);
    let mut labels = std::mem::take(&mut state.labels);
    labels.sort_by_key(|label| label.start.0);

    let events = &tokenizer.context.events;
    let mut map = EditMap::new();

    // Enters go after earlier insertions at the same index, exits before
    // them, so outer groups wrap inner ones and a group closes before the
    // next one opens.
    for label in &labels {
        let kind = match label.kind {
            LabelKind::Image => TokenKind::IMAGE,
            LabelKind::Link => TokenKind::LINK,
        };
        let label_end_exit = label.end.0 + 3;
        let group = Token::spanning(
            kind,
            events[label.start.0].token.start,
            events[label.end.1].token.end,
        );
        let whole = Token::spanning(
            TokenKind::LABEL,
            events[label.start.0].token.start,
            events[label_end_exit].token.end,
        );

        map.add(
            label.start.0,
            0,
            vec![Event::enter(group.clone()), Event::enter(whole.clone())],
        );

        if label.start.1 + 1 < label.end.0 {
            let text = Token::spanning(
                TokenKind::LABEL_TEXT,
                events[label.start.1].token.end,
                events[label.end.0].token.start,
            );
            map.add(label.start.1 + 1, 0, vec![Event::enter(text.clone())]);
            map.add_before(label.end.0, 0, vec![Event::exit(text)]);
        }

        if label.end.1 == label_end_exit {
            map.add_before(
                label_end_exit + 1,
                0,
                vec![Event::exit(whole), Event::exit(group)],
            );
        } else {
            map.add_before(label_end_exit + 1, 0, vec![Event::exit(whole)]);
            map.add_before(label.end.1 + 1, 0, vec![Event::exit(group)]);
        }
    }

    for label_start in left {
        let (enter, exit) = label_start.start;
        let data = Token::spanning(
            TokenKind::DATA,
            events[enter].token.start,
            events[exit].token.end,
        );
        map.add(
            enter,
            exit - enter + 1,
            vec![Event::enter(data.clone()), Event::exit(data)],
        );
    }

    map.consume(&mut tokenizer.context.events);
}

#[cfg(test)]
mod tests {
    use crate::event::{Event, check_balanced};
    use crate::parser::{ParseOptions, tokenize};
    use crate::token::TokenKind;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn parse(value: &str) -> Vec<Event> {
        let events = tokenize(value, &ParseOptions::default());
        assert_eq!(check_balanced(&events), Ok(()));
        events
    }

    fn count(events: &[Event], kind: TokenKind) -> usize {
        events
            .iter()
            .filter(|e| e.is_enter() && e.token.kind == kind)
            .count()
    }

    fn spans(value: &str, kind: TokenKind) -> Vec<String> {
        parse(value)
            .iter()
            .filter(|e| e.is_enter() && e.token.kind == kind)
            .map(|e| value[e.token.start.offset..e.token.end.offset].to_string())
            .collect()
    }

    #[test]
    fn resource_link() {
        assert_eq!(spans("a [b](c) d", TokenKind::LINK), vec!["[b](c)"]);
        assert_eq!(spans("a [b](c) d", TokenKind::LABEL_TEXT), vec!["b"]);
    }

    #[test]
    fn resource_image_with_title() {
        assert_eq!(spans("![b](c \"t\")", TokenKind::IMAGE), vec!["![b](c \"t\")"]);
        assert_eq!(spans("![b](c \"t\")", TokenKind::RESOURCE_TITLE_STRING), vec!["t"]);
    }

    #[test]
    fn references_need_a_definition() {
        let defined = "[x]: /u\n\n[x] [x][] [y][x]";
        assert_eq!(spans(defined, TokenKind::LINK), vec!["[x]", "[x][]", "[y][x]"]);
        assert_eq!(count(&parse("[x] [x][] [y][x]"), TokenKind::LINK), 0);
    }

    #[test]
    fn definitions_later_in_the_document_count() {
        assert_eq!(spans("[x]\n\n[x]: /u", TokenKind::LINK), vec!["[x]"]);
    }

    #[rstest]
    #[case("[a b]: x\n\n[a b]", true)]
    #[case("[a b]: x\n\n[a\nb]", true)]
    #[case("[a b]: x\n\n[a    b]", false)]
    fn shortcut_text_longer_than_a_label_is_never_looked_up(
        #[case] value: &str,
        #[case] link: bool,
    ) {
        let options = ParseOptions {
            label_size_max: 3,
            ..ParseOptions::default()
        };
        let events = tokenize(value, &options);
        assert_eq!(check_balanced(&events), Ok(()));
        assert_eq!(count(&events, TokenKind::LINK) == 1, link);
    }

    #[test]
    fn shortcut_text_past_the_default_limit() {
        let value = format!("[a{}b]\n\n[a b]: c", " ".repeat(1000));
        assert_eq!(count(&parse(&value), TokenKind::LINK), 0);
        let value = format!("[a{}b]\n\n[a b]: c", " ".repeat(900));
        assert_eq!(count(&parse(&value), TokenKind::LINK), 1);
    }

    #[test]
    fn links_do_not_nest() {
        let value = "[a [b](c)](d)";
        assert_eq!(spans(value, TokenKind::LINK), vec!["[b](c)"]);
    }

    #[test]
    fn images_may_hold_links() {
        let value = "![a [b](c)](d)";
        assert_eq!(spans(value, TokenKind::IMAGE), vec![value]);
        assert_eq!(spans(value, TokenKind::LINK), vec!["[b](c)"]);
    }

    #[test]
    fn unmatched_starts_become_data() {
        let events = parse("[a ![b");
        assert_eq!(count(&events, TokenKind::LABEL_LINK), 0);
        assert_eq!(count(&events, TokenKind::LABEL_IMAGE), 0);
        assert_eq!(count(&events, TokenKind::DATA), 1);
    }

    #[test]
    fn label_spans_lines() {
        assert_eq!(spans("[a\nb](c)", TokenKind::LINK), vec!["[a\nb](c)"]);
    }

    #[test]
    fn empty_resource() {
        assert_eq!(spans("[a]()", TokenKind::LINK), vec!["[a]()"]);
    }

    #[test]
    fn footnote_like_labels_are_reserved() {
        let options = ParseOptions {
            hidden_footnote_support: true,
            ..ParseOptions::default()
        };
        let events = tokenize("[^a](b) ![^a](b)", &options);
        assert!(!events.iter().any(|e| e.token.kind == TokenKind::LINK));
        assert!(!events.iter().any(|e| e.token.kind == TokenKind::IMAGE));
        assert_eq!(count(&parse("[^a](b)"), TokenKind::LINK), 1);
    }
}

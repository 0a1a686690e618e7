//! Attention: runs of `*` or `_` that pair up into emphasis and strong.
//!
//! Tokenizing only records each run as an `ATTENTION_SEQUENCE`. Whether a
//! run can open or close depends on the characters around it (the flanking
//! rules), and pairing needs the whole text, so both happen in [`resolve`]:
//!
//! ```text
//! **a**   →  STRONG(STRONG_SEQUENCE, STRONG_TEXT(DATA), STRONG_SEQUENCE)
//! *a*     →  EMPHASIS(EMPHASIS_SEQUENCE, EMPHASIS_TEXT(DATA), EMPHASIS_SEQUENCE)
//! ```
//!
//! Runs are only paired within the same link or image label, so emphasis
//! never crosses a label boundary. Whatever is left unpaired becomes data.

use std::collections::HashMap;

use crate::classify::{CharacterKind, classify};
use crate::construct::Construct;
use crate::edit_map::EditMap;
use crate::event::{Event, Point, Token};
use crate::state::State;
use crate::token::TokenKind;
use crate::tokenizer::Tokenizer;

/// Attention.
pub const ATTENTION: Construct = Construct::new("attention", start).with_resolve_all(resolve);

fn start(tokenizer: &mut Tokenizer<'_>) -> State {
    match tokenizer.current.as_char() {
        Some(marker @ ('*' | '_')) => {
            tokenizer.tokenize_state.marker = Some(marker);
            tokenizer.enter(TokenKind::ATTENTION_SEQUENCE);
            State::Retry(inside)
        }
        _ => State::Nok,
    }
}

fn inside(tokenizer: &mut Tokenizer<'_>) -> State {
    match tokenizer.tokenize_state.marker {
        Some(marker) if tokenizer.current.is(marker) => {
            tokenizer.consume();
            State::Next(inside)
        }
        _ => {
            tokenizer.exit(TokenKind::ATTENTION_SEQUENCE);
            tokenizer.tokenize_state.marker = None;
            State::Ok
        }
    }
}

/// A run of markers waiting to be paired.
#[derive(Debug)]
struct Sequence {
    /// Index of its `Enter` event.
    index: usize,
    marker: char,
    /// Markers not yet used by a pair.
    size: usize,
    original: usize,
    start: Point,
    end: Point,
    open: bool,
    close: bool,
    /// Innermost enclosing label text, if any.
    group: Option<usize>,
    /// Events closing groups, in the order they were paired.
    closes: Vec<Event>,
    /// Events opening groups, innermost first.
    opens: Vec<Vec<Event>>,
}

fn advance(point: Point, by: usize) -> Point {
    Point::new(point.line, point.column + by, point.offset + by, point.index + by)
}

fn retreat(point: Point, by: usize) -> Point {
    Point::new(point.line, point.column - by, point.offset - by, point.index - by)
}

/// Pair attention sequences into emphasis and strong.
pub fn resolve(tokenizer: &mut Tokenizer<'_>) {
    let input = tokenizer.context.parse_state.input;
    let events = &tokenizer.context.events;
    let mut sequences = Vec::new();
    let mut labels: Vec<usize> = Vec::new();

    for (index, event) in events.iter().enumerate() {
        match event.token.kind {
            TokenKind::LABEL_TEXT if event.is_enter() => labels.push(index),
            TokenKind::LABEL_TEXT => {
                labels.pop();
            }
            TokenKind::ATTENTION_SEQUENCE if event.is_enter() => {
                let (start, end) = (event.token.start, event.token.end);
                let Some(marker) = input.code(start.index).as_char() else {
                    continue;
                };
                let before = if start.index == 0 {
                    CharacterKind::Whitespace
                } else {
                    classify(input.code(start.index - 1))
                };
                let after = classify(input.code(end.index));
                let left = after != CharacterKind::Whitespace
                    && (after != CharacterKind::Punctuation || before != CharacterKind::Other);
                let right = before != CharacterKind::Whitespace
                    && (before != CharacterKind::Punctuation || after != CharacterKind::Other);
                let (open, close) = if marker == '_' {
                    (
                        left && (!right || before == CharacterKind::Punctuation),
                        right && (!left || after == CharacterKind::Punctuation),
                    )
                } else {
                    (left, right)
                };
                let size = end.index - start.index;
                sequences.push(Sequence {
                    index,
                    marker,
                    size,
                    original: size,
                    start,
                    end,
                    open,
                    close,
                    group: labels.last().copied(),
                    closes: Vec::new(),
                    opens: Vec::new(),
                });
            }
            _ => {}
        }
    }

    if sequences.is_empty() {
        return;
    }

    pair(&mut sequences);

    let mut map = EditMap::new();
    for sequence in sequences {
        let mut replacement = sequence.closes;
        if sequence.size > 0 {
            let data = Token::spanning(TokenKind::DATA, sequence.start, sequence.end);
            replacement.push(Event::enter(data.clone()));
            replacement.push(Event::exit(data));
        }
        for opening in sequence.opens.into_iter().rev() {
            replacement.extend(opening);
        }
        map.add(sequence.index, 2, replacement);
    }
    map.consume(&mut tokenizer.context.events);
}

/// Pair the sequences of each label separately.
fn pair(sequences: &mut [Sequence]) {
    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut slots: HashMap<Option<usize>, usize> = HashMap::new();
    for (index, sequence) in sequences.iter().enumerate() {
        let slot = *slots.entry(sequence.group).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(index);
    }
    for members in &groups {
        pair_group(sequences, members);
    }
}

/// Walk closers left to right, pairing each with the nearest usable opener.
///
/// Sequences that are used up, or that can no longer take part, are
/// unlinked from the `previous` chain so later searches skip them. A failed
/// search raises the floor for closers of the same marker, openness and
/// length modulo three: they would fail the same way below it.
fn pair_group(sequences: &mut [Sequence], members: &[usize]) {
    let count = members.len();
    let mut previous: Vec<Option<usize>> = (0..count).map(|at| at.checked_sub(1)).collect();
    let mut floor = [[[0usize; 3]; 2]; 2];
    let mut close = 0;

    while close < count {
        let closer = &sequences[members[close]];
        if !closer.close || closer.size == 0 {
            if !closer.open || closer.size == 0 {
                unlink(&mut previous, close);
            }
            close += 1;
            continue;
        }

        let key = (
            usize::from(closer.marker == '_'),
            usize::from(closer.open),
            closer.original % 3,
        );
        let bottom = floor[key.0][key.1][key.2];
        let mut cursor = previous[close];
        let mut found = None;
        while let Some(at) = cursor {
            if at < bottom {
                break;
            }
            let opener = &sequences[members[at]];
            if opener.open
                && opener.size > 0
                && opener.marker == closer.marker
                // Rule of three.
                && !((opener.close || closer.open)
                    && (opener.original + closer.original) % 3 == 0
                    && (opener.original % 3 != 0 || closer.original % 3 != 0))
            {
                found = Some(at);
                break;
            }
            cursor = previous[at];
        }

        let Some(open) = found else {
            floor[key.0][key.1][key.2] = close;
            if !closer.open {
                unlink(&mut previous, close);
            }
            close += 1;
            continue;
        };

        join(sequences, members[open], members[close]);

        // Runs between the pair can no longer pair with anything.
        previous[close] = Some(open);
        if sequences[members[open]].size == 0 {
            previous[close] = previous[open];
        }
        if sequences[members[close]].size == 0 {
            unlink(&mut previous, close);
            close += 1;
        }
    }
}

/// Drop `at` from the chain; only the entry right after it can point at it.
fn unlink(previous: &mut [Option<usize>], at: usize) {
    if at + 1 < previous.len() {
        previous[at + 1] = previous[at];
    }
}

/// Use markers of `open` and `close` for one emphasis or strong.
fn join(sequences: &mut [Sequence], open: usize, close: usize) {
    let take = if sequences[open].size > 1 && sequences[close].size > 1 {
        2
    } else {
        1
    };
    let (group, sequence_kind, text_kind) = if take == 2 {
        (TokenKind::STRONG, TokenKind::STRONG_SEQUENCE, TokenKind::STRONG_TEXT)
    } else {
        (TokenKind::EMPHASIS, TokenKind::EMPHASIS_SEQUENCE, TokenKind::EMPHASIS_TEXT)
    };

    let open_end = sequences[open].end;
    let open_start = retreat(open_end, take);
    let close_start = sequences[close].start;
    let close_end = advance(close_start, take);

    let group = Token::spanning(group, open_start, close_end);
    let open_sequence = Token::spanning(sequence_kind, open_start, open_end);
    let close_sequence = Token::spanning(sequence_kind, close_start, close_end);

    let mut opening = vec![
        Event::enter(group.clone()),
        Event::enter(open_sequence.clone()),
        Event::exit(open_sequence),
    ];
    let mut closing = Vec::with_capacity(4);
    if open_end.index < close_start.index {
        let text = Token::spanning(text_kind, open_end, close_start);
        opening.push(Event::enter(text.clone()));
        closing.push(Event::exit(text));
    }
    closing.push(Event::enter(close_sequence.clone()));
    closing.push(Event::exit(close_sequence));
    closing.push(Event::exit(group));

    let opener = &mut sequences[open];
    opener.size -= take;
    opener.end = open_start;
    opener.opens.push(opening);

    let closer = &mut sequences[close];
    closer.size -= take;
    closer.start = close_end;
    closer.closes.extend(closing);
}

//! # Subtokenization
//!
//! The flow pass leaves paragraphs and headings as opaque chunks carrying a
//! [`ContentType`]. A pass of [`subtokenize`] finds every chain of linked
//! chunks, runs a child tokenizer over the chain's ranges, and splices the
//! child's events in place of the chunks:
//!
//! ```text
//! Enter(CHUNK_TEXT) Exit(CHUNK_TEXT)          ← before
//! Enter(DATA) Exit(DATA) Enter(LINK) ...      ← after
//! ```
//!
//! Child output can hold chunks again (a link label is a string chunk inside
//! text), so passes repeat until none are left. Content chains run first
//! within a pass and publish their definitions, so text in the same pass can
//! already refer to a definition that appears later in the document.

use std::collections::HashMap;

use crate::event::{Event, Point};
use crate::parser::ParseState;
use crate::token::ContentType;
use crate::tokenizer::Tokenizer;

/// Run one pass. Returns `true` when there was nothing left to expand.
pub fn subtokenize(events: &mut Vec<Event>, parse_state: &mut ParseState<'_>) -> bool {
    let mut chains: Vec<Vec<usize>> = events
        .iter()
        .enumerate()
        .filter(|(_, event)| {
            event.is_enter() && event.token.content_type.is_some() && event.token.previous.is_none()
        })
        .map(|(head, _)| chain_from(&events[..], head))
        .collect();

    if chains.is_empty() {
        return true;
    }

    chains.sort_by_key(|chain| events[chain[0]].token.content_type != Some(ContentType::Content));

    let mut by_enter: HashMap<usize, (usize, usize)> = HashMap::new();
    let mut slices: Vec<Vec<Vec<(usize, Event)>>> = Vec::with_capacity(chains.len());
    let mut child_lens: Vec<usize> = Vec::with_capacity(chains.len());

    for (chain_index, chain) in chains.iter().enumerate() {
        let Some(content_type) = events[chain[0]].token.content_type else {
            unreachable!("chain heads carry a content type");
        };
        let ranges: Vec<(Point, usize)> = chain
            .iter()
            .map(|&enter| {
                let token = &events[enter].token;
                (token.start, token.end.index)
            })
            .collect();

        let result = Tokenizer::new(parse_state, content_type, ranges.clone()).run();
        for definition in result.definitions {
            log::trace!("definition {definition:?}");
            parse_state.definitions.insert(definition);
        }

        child_lens.push(result.events.len());
        slices.push(divide(result.events, &ranges));
        for (k, &enter) in chain.iter().enumerate() {
            by_enter.insert(enter, (chain_index, k));
        }
    }

    splice_children(events, &by_enter, slices, &child_lens);
    false
}

/// Enter indices of the chain starting at `head`, following `next` links.
fn chain_from(events: &[Event], head: usize) -> Vec<usize> {
    let mut chain = vec![head];
    let mut index = head;
    while let Some(next) = events[index].token.next {
        chain.push(next);
        index = next;
    }
    chain
}

/// Assign each child event to the chunk it belongs to.
///
/// Enters go to the chunk whose range they start in; exits stay with the
/// chunk they end at, so a token ending exactly on a chunk boundary is not
/// moved into the next chunk.
fn divide(events: Vec<Event>, ranges: &[(Point, usize)]) -> Vec<Vec<(usize, Event)>> {
    let mut slices: Vec<Vec<(usize, Event)>> = vec![Vec::new(); ranges.len()];
    let mut k = 0;

    for (index, event) in events.into_iter().enumerate() {
        let at = event.point().index;
        while k + 1 < ranges.len()
            && ((event.is_enter() && at >= ranges[k + 1].0.index)
                || (event.is_exit() && at > ranges[k].1))
        {
            k += 1;
        }
        slices[k].push((index, event));
    }

    slices
}

/// Rebuild `events` with each chunk replaced by its slice of child events,
/// then re-target links inside the child events.
fn splice_children(
    events: &mut Vec<Event>,
    by_enter: &HashMap<usize, (usize, usize)>,
    mut slices: Vec<Vec<Vec<(usize, Event)>>>,
    child_lens: &[usize],
) {
    let mut maps: Vec<Vec<usize>> = child_lens.iter().map(|&len| vec![0; len]).collect();
    let mut placed: Vec<Vec<usize>> = vec![Vec::new(); child_lens.len()];

    let old = std::mem::take(events);
    let mut result = Vec::with_capacity(old.len() + child_lens.iter().sum::<usize>());
    let mut skip_exit = false;

    for (index, event) in old.into_iter().enumerate() {
        if let Some(&(chain, k)) = by_enter.get(&index) {
            for (child_index, child_event) in std::mem::take(&mut slices[chain][k]) {
                maps[chain][child_index] = result.len();
                placed[chain].push(result.len());
                result.push(child_event);
            }
            skip_exit = true;
            continue;
        }
        if skip_exit {
            debug_assert!(event.is_exit(), "chunks hold no events of their own");
            skip_exit = false;
            continue;
        }
        result.push(event);
    }

    for (chain, positions) in placed.iter().enumerate() {
        for &position in positions {
            let token = &mut result[position].token;
            token.previous = token.previous.map(|p| maps[chain][p]);
            token.next = token.next.map(|n| maps[chain][n]);
        }
    }

    *events = result;
}

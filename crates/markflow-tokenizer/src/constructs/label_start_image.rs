//! Label start of an image: `![`.
//!
//! Only records the start; whether it becomes an image is decided by a later
//! label end.

use crate::construct::Construct;
use crate::constructs::label_end::resolve;
use crate::state::State;
use crate::token::TokenKind;
use crate::tokenizer::{LabelKind, LabelStart, Tokenizer};

/// Label start (image).
pub const LABEL_START_IMAGE: Construct =
    Construct::new("labelStartImage", start).with_resolve_all(resolve);

fn start(tokenizer: &mut Tokenizer<'_>) -> State {
    if !tokenizer.current.is('!') {
        return State::Nok;
    }
    tokenizer.enter(TokenKind::LABEL_IMAGE);
    tokenizer.enter(TokenKind::LABEL_IMAGE_MARKER);
    tokenizer.consume();
    tokenizer.exit(TokenKind::LABEL_IMAGE_MARKER);
    State::Next(open)
}

fn open(tokenizer: &mut Tokenizer<'_>) -> State {
    if !tokenizer.current.is('[') {
        return State::Nok;
    }
    tokenizer.enter(TokenKind::LABEL_MARKER);
    tokenizer.consume();
    tokenizer.exit(TokenKind::LABEL_MARKER);
    tokenizer.exit(TokenKind::LABEL_IMAGE);
    State::Next(after)
}

fn after(tokenizer: &mut Tokenizer<'_>) -> State {
    // `![^` is reserved for footnotes when they are on.
    if tokenizer.current.is('^') && tokenizer.options().hidden_footnote_support {
        return State::Nok;
    }
    let end = tokenizer.context.events.len() - 1;
    tokenizer.tokenize_state.label_starts.push(LabelStart {
        kind: LabelKind::Image,
        start: (end - 5, end),
        inactive: false,
    });
    // Labels group before anything that nests inside them resolves.
    tokenizer.register_resolver_before(resolve);
    State::Ok
}

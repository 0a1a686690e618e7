//! Label start of a link: `[`.

use crate::construct::Construct;
use crate::constructs::label_end::resolve;
use crate::state::State;
use crate::token::TokenKind;
use crate::tokenizer::{LabelKind, LabelStart, Tokenizer};

/// Label start (link).
pub const LABEL_START_LINK: Construct =
    Construct::new("labelStartLink", start).with_resolve_all(resolve);

fn start(tokenizer: &mut Tokenizer<'_>) -> State {
    if !tokenizer.current.is('[') {
        return State::Nok;
    }
    tokenizer.enter(TokenKind::LABEL_LINK);
    tokenizer.enter(TokenKind::LABEL_MARKER);
    tokenizer.consume();
    tokenizer.exit(TokenKind::LABEL_MARKER);
    tokenizer.exit(TokenKind::LABEL_LINK);
    State::Next(after)
}

fn after(tokenizer: &mut Tokenizer<'_>) -> State {
    // `[^` is reserved for footnotes when they are on.
    if tokenizer.current.is('^') && tokenizer.options().hidden_footnote_support {
        return State::Nok;
    }
    let end = tokenizer.context.events.len() - 1;
    tokenizer.tokenize_state.label_starts.push(LabelStart {
        kind: LabelKind::Link,
        start: (end - 3, end),
        inactive: false,
    });
    // Labels group before anything that nests inside them resolves.
    tokenizer.register_resolver_before(resolve);
    State::Ok
}

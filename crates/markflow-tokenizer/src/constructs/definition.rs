//! Definition: `[label]: destination "title"`.
//!
//! Found at the start of content. The label is normalized and recorded so
//! references anywhere in the document can resolve against it; the first
//! definition of a label wins.

use crate::code::{Code, markdown_line_ending_or_space, markdown_space};
use crate::construct::Construct;
use crate::factory::{destination, label, space::space_or_tab, title, whitespace::whitespace};
use crate::state::State;
use crate::token::TokenKind;
use crate::tokenizer::Tokenizer;
use crate::util::normalize_identifier;

/// Definition.
pub const DEFINITION: Construct = Construct::new("definition", start);

fn start(tokenizer: &mut Tokenizer<'_>) -> State {
    if !tokenizer.current.is('[') {
        return State::Nok;
    }
    tokenizer.enter(TokenKind::DEFINITION);
    let state = &mut tokenizer.tokenize_state;
    state.token_1 = TokenKind::DEFINITION_LABEL;
    state.token_2 = TokenKind::DEFINITION_LABEL_MARKER;
    state.token_3 = TokenKind::DEFINITION_LABEL_STRING;
    tokenizer.attempt(State::Next(label_after), State::Nok);
    State::Retry(label::start)
}

fn label_after(tokenizer: &mut Tokenizer<'_>) -> State {
    let identifier = tokenizer
        .last_exited(TokenKind::DEFINITION_LABEL_STRING)
        .map(|token| tokenizer.slice_serialize(&token.start, &token.end))
        .map(|label| normalize_identifier(&label));
    tokenizer.tokenize_state.identifier = identifier;

    if tokenizer.current.is(':') {
        tokenizer.enter(TokenKind::DEFINITION_MARKER);
        tokenizer.consume();
        tokenizer.exit(TokenKind::DEFINITION_MARKER);
        State::Next(marker_after)
    } else {
        State::Nok
    }
}

fn marker_after(tokenizer: &mut Tokenizer<'_>) -> State {
    if markdown_line_ending_or_space(tokenizer.current) {
        tokenizer.attempt(State::Next(destination_before), State::Next(destination_before));
        State::Retry(whitespace(tokenizer))
    } else {
        State::Retry(destination_before)
    }
}

fn destination_before(tokenizer: &mut Tokenizer<'_>) -> State {
    let state = &mut tokenizer.tokenize_state;
    state.token_1 = TokenKind::DEFINITION_DESTINATION;
    state.token_2 = TokenKind::DEFINITION_DESTINATION_LITERAL;
    state.token_3 = TokenKind::DEFINITION_DESTINATION_LITERAL_MARKER;
    state.token_4 = TokenKind::DEFINITION_DESTINATION_RAW;
    state.token_5 = TokenKind::DEFINITION_DESTINATION_STRING;
    state.size = 0;
    state.size_b = usize::MAX;
    tokenizer.attempt(State::Next(destination_after), State::Nok);
    State::Retry(destination::start)
}

fn destination_after(tokenizer: &mut Tokenizer<'_>) -> State {
    tokenizer.attempt(State::Next(after), State::Next(after));
    State::Retry(title_before)
}

fn after(tokenizer: &mut Tokenizer<'_>) -> State {
    if markdown_space(tokenizer.current) {
        tokenizer.attempt(State::Next(after_whitespace), State::Nok);
        State::Retry(space_or_tab(tokenizer, TokenKind::WHITESPACE, usize::MAX))
    } else {
        State::Retry(after_whitespace)
    }
}

fn after_whitespace(tokenizer: &mut Tokenizer<'_>) -> State {
    match tokenizer.current {
        Code::Eof | Code::LineEnding => {
            tokenizer.exit(TokenKind::DEFINITION);
            if let Some(identifier) = tokenizer.tokenize_state.identifier.take() {
                log::trace!("defined {identifier:?}");
                tokenizer.context.definitions.insert(identifier);
            }
            State::Ok
        }
        Code::Char(_) => State::Nok,
    }
}

/// A title must be separated from the destination by whitespace.
fn title_before(tokenizer: &mut Tokenizer<'_>) -> State {
    if markdown_line_ending_or_space(tokenizer.current) {
        tokenizer.attempt(State::Next(title_marker), State::Nok);
        State::Retry(whitespace(tokenizer))
    } else {
        State::Nok
    }
}

fn title_marker(tokenizer: &mut Tokenizer<'_>) -> State {
    let state = &mut tokenizer.tokenize_state;
    state.token_1 = TokenKind::DEFINITION_TITLE;
    state.token_2 = TokenKind::DEFINITION_TITLE_MARKER;
    state.token_3 = TokenKind::DEFINITION_TITLE_STRING;
    tokenizer.attempt(State::Next(title_after), State::Nok);
    State::Retry(title::start)
}

fn title_after(tokenizer: &mut Tokenizer<'_>) -> State {
    if markdown_space(tokenizer.current) {
        tokenizer.attempt(State::Next(title_after_whitespace), State::Nok);
        State::Retry(space_or_tab(tokenizer, TokenKind::WHITESPACE, usize::MAX))
    } else {
        State::Retry(title_after_whitespace)
    }
}

fn title_after_whitespace(tokenizer: &mut Tokenizer<'_>) -> State {
    match tokenizer.current {
        Code::Eof | Code::LineEnding => State::Ok,
        Code::Char(_) => State::Nok,
    }
}

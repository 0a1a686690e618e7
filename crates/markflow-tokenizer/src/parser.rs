//! Entry point: source text in, resolved events out.

use std::collections::HashSet;

use crate::code::LINK_REFERENCE_SIZE_MAX;
use crate::construct::{ConstructRegistry, Extension};
use crate::event::Event;
use crate::preprocess::{Input, preprocess};
use crate::subtokenize::subtokenize;
use crate::tokenizer::Tokenizer;

/// Options that change how a document is tokenized.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Reserve `[^` for footnotes: labels may not start with `^`.
    pub hidden_footnote_support: bool,
    /// Maximum number of characters in a link label.
    pub label_size_max: usize,
    /// Names of constructs to turn off (e.g. `"labelStartImage"`).
    pub disable: Vec<String>,
    /// Constructs added after the built-ins.
    pub extensions: Vec<Extension>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            hidden_footnote_support: false,
            label_size_max: LINK_REFERENCE_SIZE_MAX,
            disable: Vec::new(),
            extensions: Vec::new(),
        }
    }
}

/// Everything tokenizers of one document share.
#[derive(Debug)]
pub struct ParseState<'a> {
    /// Preprocessed source.
    pub input: &'a Input,
    /// Options.
    pub options: &'a ParseOptions,
    /// Constructs per hook point.
    pub constructs: ConstructRegistry,
    /// Identifiers of all definitions found by earlier passes.
    pub definitions: HashSet<String>,
}

impl<'a> ParseState<'a> {
    /// Shared state for a parse of `input`.
    pub fn new(input: &'a Input, options: &'a ParseOptions) -> Self {
        Self {
            input,
            options,
            constructs: ConstructRegistry::new(options),
            definitions: HashSet::new(),
        }
    }
}

/// Tokenize a markdown document into balanced, resolved events.
///
/// Runs the flow tokenizer over the whole input, then re-tokenizes content
/// chunks pass by pass until no chunk is left.
pub fn tokenize(value: &str, options: &ParseOptions) -> Vec<Event> {
    let input = preprocess(value);
    let mut parse_state = ParseState::new(&input, options);

    let mut events = Tokenizer::document(&parse_state).run().events;
    log::debug!("flow pass: {} events", events.len());

    let mut pass = 1;
    while !subtokenize(&mut events, &mut parse_state) {
        log::debug!("subtokenize pass {pass}: {} events", events.len());
        pass += 1;
    }

    events
}

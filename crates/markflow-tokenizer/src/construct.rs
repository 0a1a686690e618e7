//! # Constructs and the Registry
//!
//! A [`Construct`] is one pluggable grammar rule: a state machine entry
//! point plus optional resolution hooks. Constructs are registered at a
//! [`Hook`] point under the character that can start them:
//!
//! | Hook | Tried at | Built-in constructs |
//! |------|----------|---------------------|
//! | `Flow` | the start of every non-blank line | thematic break, ATX heading |
//! | `Content` | the start of each line of a content block | definition |
//! | `Text` | every position in inline text | label starts/end, escapes, attention |
//! | `String` | every position in a label, destination, title | escapes |
//!
//! When several constructs can start at the same position the engine tries
//! them in registration order and commits to the first that matches. That is
//! a first-match-wins policy, so specific rules must come before general
//! ones. Extensions are appended after the built-ins for the same trigger.

use std::collections::HashMap;

use crate::code::Code;
use crate::constructs;
use crate::parser::ParseOptions;
use crate::state::StateFn;
use crate::tokenizer::Tokenizer;

/// Rewrites the events a construct just produced, `events[from..]`.
pub type Resolve = fn(&mut Tokenizer<'_>, usize);

/// Rewrites the whole event log of a pass once it is final.
pub type ResolveAll = fn(&mut Tokenizer<'_>);

/// A named, pluggable grammar rule.
#[derive(Debug, Clone, Copy)]
pub struct Construct {
    /// Name used by [`ParseOptions::disable`].
    pub name: Option<&'static str>,
    /// Initial state of the construct's state machine.
    pub tokenize: StateFn,
    /// Partial constructs only run inside other constructs and never stand
    /// alone at a hook point.
    pub partial: bool,
    /// Runs right after the construct matched, on the events it produced.
    pub resolve: Option<Resolve>,
    /// Runs once, after the whole pass, on every event.
    pub resolve_all: Option<ResolveAll>,
}

impl Construct {
    /// A construct with no hooks.
    pub const fn new(name: &'static str, tokenize: StateFn) -> Self {
        Self {
            name: Some(name),
            tokenize,
            partial: false,
            resolve: None,
            resolve_all: None,
        }
    }

    /// Mark the construct as partial.
    pub const fn partial(mut self) -> Self {
        self.partial = true;
        self
    }

    /// Attach a local resolver.
    pub const fn with_resolve(mut self, resolve: Resolve) -> Self {
        self.resolve = Some(resolve);
        self
    }

    /// Attach a deferred resolver.
    pub const fn with_resolve_all(mut self, resolve_all: ResolveAll) -> Self {
        self.resolve_all = Some(resolve_all);
        self
    }
}

/// Where a construct is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hook {
    /// Line starts in flow.
    Flow,
    /// Line starts in content.
    Content,
    /// Positions in text.
    Text,
    /// Positions in strings.
    String,
}

/// One registration contributed by an extension grammar.
#[derive(Debug, Clone, Copy)]
pub struct Extension {
    /// Hook point.
    pub hook: Hook,
    /// Character that can start the construct; `None` means any character.
    pub trigger: Option<char>,
    /// The construct.
    pub construct: Construct,
}

/// Constructs of one hook point, keyed by trigger character.
#[derive(Debug, Clone, Default)]
pub struct ConstructMap {
    by_char: HashMap<char, Vec<Construct>>,
    any: Vec<Construct>,
}

impl ConstructMap {
    /// Register `construct` after the ones already registered for `trigger`.
    ///
    /// # Panics
    /// Panics if the construct is partial: those are only reachable from
    /// inside other constructs.
    pub fn add(&mut self, trigger: Option<char>, construct: Construct) {
        assert!(
            !construct.partial,
            "cannot register partial construct {:?} at a hook point",
            construct.name
        );
        match trigger {
            Some(c) => self.by_char.entry(c).or_default().push(construct),
            None => self.any.push(construct),
        }
    }

    /// Constructs that may start at `code`, in the order to try them.
    pub fn lookup(&self, code: Code) -> Vec<Construct> {
        let Code::Char(c) = code else {
            return Vec::new();
        };
        let mut list = self.by_char.get(&c).cloned().unwrap_or_default();
        list.extend(self.any.iter().copied());
        list
    }

    /// Whether any construct may start at `code`.
    pub fn can_start(&self, code: Code) -> bool {
        match code {
            Code::Char(c) => !self.any.is_empty() || self.by_char.contains_key(&c),
            Code::LineEnding | Code::Eof => false,
        }
    }

    fn retain(&mut self, keep: impl Fn(&Construct) -> bool) {
        for list in self.by_char.values_mut() {
            list.retain(&keep);
        }
        self.by_char.retain(|_, list| !list.is_empty());
        self.any.retain(&keep);
    }
}

/// All hook points of one document, built once per parse.
#[derive(Debug, Clone, Default)]
pub struct ConstructRegistry {
    /// Flow hook.
    pub flow: ConstructMap,
    /// Content hook.
    pub content: ConstructMap,
    /// Text hook.
    pub text: ConstructMap,
    /// String hook.
    pub string: ConstructMap,
}

impl ConstructRegistry {
    /// The built-in CommonMark constructs, then `options.extensions`, minus
    /// anything named in `options.disable`.
    pub fn new(options: &ParseOptions) -> Self {
        let mut registry = Self::default();

        for c in ['*', '-', '_'] {
            registry.add(Hook::Flow, Some(c), constructs::thematic_break::THEMATIC_BREAK);
        }
        registry.add(Hook::Flow, Some('#'), constructs::heading_atx::HEADING_ATX);

        registry.add(Hook::Content, Some('['), constructs::definition::DEFINITION);

        registry.add(Hook::Text, Some('!'), constructs::label_start_image::LABEL_START_IMAGE);
        registry.add(Hook::Text, Some('['), constructs::label_start_link::LABEL_START_LINK);
        registry.add(Hook::Text, Some(']'), constructs::label_end::LABEL_END);
        registry.add(Hook::Text, Some('\\'), constructs::character_escape::CHARACTER_ESCAPE);
        registry.add(Hook::Text, Some('*'), constructs::attention::ATTENTION);
        registry.add(Hook::Text, Some('_'), constructs::attention::ATTENTION);

        registry.add(Hook::String, Some('\\'), constructs::character_escape::CHARACTER_ESCAPE);

        for extension in &options.extensions {
            registry.add(extension.hook, extension.trigger, extension.construct);
        }

        if !options.disable.is_empty() {
            let keep = |construct: &Construct| {
                construct
                    .name
                    .is_none_or(|name| !options.disable.iter().any(|d| d == name))
            };
            registry.flow.retain(keep);
            registry.content.retain(keep);
            registry.text.retain(keep);
            registry.string.retain(keep);
        }

        registry
    }

    /// Register a construct at a hook point.
    pub fn add(&mut self, hook: Hook, trigger: Option<char>, construct: Construct) {
        self.hook_mut(hook).add(trigger, construct);
    }

    /// The constructs of one hook point.
    pub fn hook(&self, hook: Hook) -> &ConstructMap {
        match hook {
            Hook::Flow => &self.flow,
            Hook::Content => &self.content,
            Hook::Text => &self.text,
            Hook::String => &self.string,
        }
    }

    fn hook_mut(&mut self, hook: Hook) -> &mut ConstructMap {
        match hook {
            Hook::Flow => &mut self.flow,
            Hook::Content => &mut self.content,
            Hook::Text => &mut self.text,
            Hook::String => &mut self.string,
        }
    }
}

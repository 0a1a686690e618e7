//! # The Tokenizer Engine
//!
//! The engine feeds [`Code`]s to state functions and keeps the bookkeeping
//! they rely on:
//!
//! - **Effects**: [`enter`](Tokenizer::enter), [`consume`](Tokenizer::consume)
//!   and [`exit`](Tokenizer::exit) append to the event log of the active
//!   [`TokenizeContext`].
//! - **Attempts**: [`attempt`](Tokenizer::attempt) and
//!   [`check`](Tokenizer::check) save a checkpoint, run a sub-machine, and on
//!   failure roll the log, the open-token stack and the position back to that
//!   checkpoint. `check` rolls back on success too, so it is pure lookahead.
//! - **Hooks**: [`attempt_hook`](Tokenizer::attempt_hook) tries every
//!   construct registered for the current code in order, first match wins.
//! - **Jumps**: a tokenizer can be fed several disjoint ranges of the input
//!   (the lines of a paragraph, minus their indentation). Codes flow as one
//!   stream; the gaps never appear inside a token.
//!
//! ## Rollback
//!
//! A checkpoint is cheap: a [`Point`], the event count and a copy of the
//! open-token stack, whose depth is bounded by grammar nesting.
//!
//! ```text
//! attempt ──► save { point, events.len(), stack }
//!     Ok  ──► keep everything, run the construct's resolver
//!     Nok ──► events.truncate(len), stack = saved, point = saved
//! ```
//!
//! Construct scratch data in [`TokenizeState`] survives a rollback, except
//! label bookkeeping: starts and labels recorded after the checkpoint are
//! dropped, and label starts they had taken are put back. A start that
//! became loose stays loose when only its own label end is rolled back.

use std::collections::HashSet;

use crate::code::Code;
use crate::construct::{Construct, Hook, ResolveAll};
use crate::event::{Event, Point, Token};
use crate::initialize;
use crate::parser::{ParseOptions, ParseState};
use crate::state::{State, StateFn};
use crate::token::{ContentType, TokenKind};

/// Which kind of label start a [`LabelStart`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    /// `![`
    Image,
    /// `[`
    Link,
}

/// A label start waiting for its label end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelStart {
    /// Image or link.
    pub kind: LabelKind,
    /// Event indices of the enter and exit of the label start token.
    pub start: (usize, usize),
    /// Set once the start can no longer form a link.
    pub inactive: bool,
}

/// A matched label: start, end, and what came after the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Label {
    /// Image or link.
    pub kind: LabelKind,
    /// Event indices of the enter and exit of the label start token.
    pub start: (usize, usize),
    /// Event index of the enter of the label end, and of the last event of
    /// the resource or reference after it.
    pub end: (usize, usize),
}

/// Per-document mutable state of one tokenizer.
#[derive(Debug)]
pub struct TokenizeContext<'a> {
    /// Shared, read-only configuration and registry.
    pub parse_state: &'a ParseState<'a>,
    /// The event log.
    pub events: Vec<Event>,
    /// Indices of the enter events of open tokens.
    pub stack: Vec<usize>,
    /// Identifiers of definitions found by this tokenizer.
    pub definitions: HashSet<String>,
    /// Enter index of the last chunk, when a chain of linked chunks is open.
    chunk_previous: Option<usize>,
}

impl<'a> TokenizeContext<'a> {
    fn new(parse_state: &'a ParseState<'a>) -> Self {
        Self {
            parse_state,
            events: Vec::new(),
            stack: Vec::new(),
            definitions: HashSet::new(),
            chunk_previous: None,
        }
    }

    /// Whether `identifier` (normalized) is defined in this document.
    pub fn is_defined(&self, identifier: &str) -> bool {
        self.definitions.contains(identifier) || self.parse_state.definitions.contains(identifier)
    }
}

/// Scratch space shared by constructs and factories.
///
/// Fields are set by a construct before it hands over to a factory and reset
/// when the factory finishes. Only the label fields are restored on rollback.
#[derive(Debug)]
pub struct TokenizeState {
    // Space factory.
    pub space_kind: TokenKind,
    pub space_max: usize,
    pub space_size: usize,

    // Whitespace factory.
    pub whitespace_seen: bool,

    // Label, destination and title factories.
    pub token_1: TokenKind,
    pub token_2: TokenKind,
    pub token_3: TokenKind,
    pub token_4: TokenKind,
    pub token_5: TokenKind,
    /// Counter: label size, paren depth, sequence length.
    pub size: usize,
    /// Second limit, e.g. maximum paren depth of a destination.
    pub size_b: usize,
    pub seen: bool,
    pub marker: Option<char>,

    // Definitions.
    pub identifier: Option<String>,

    // Labels in text.
    pub label_starts: Vec<LabelStart>,
    /// Starts that can no longer be closed, with the depth of the label end
    /// attempt that gave up on them.
    pub label_starts_loose: Vec<(LabelStart, usize)>,
    pub labels: Vec<Label>,
    /// Enter index of the label end being tokenized.
    pub end: usize,
}

impl Default for TokenizeState {
    fn default() -> Self {
        Self {
            space_kind: TokenKind::WHITESPACE,
            space_max: usize::MAX,
            space_size: 0,
            whitespace_seen: false,
            token_1: TokenKind::DATA,
            token_2: TokenKind::DATA,
            token_3: TokenKind::DATA,
            token_4: TokenKind::DATA,
            token_5: TokenKind::DATA,
            size: 0,
            size_b: 0,
            seen: false,
            marker: None,
            identifier: None,
            label_starts: Vec::new(),
            label_starts_loose: Vec::new(),
            labels: Vec::new(),
            end: 0,
        }
    }
}

impl TokenizeState {
    /// Undo label bookkeeping done inside an attempt at `depth` that is being
    /// rolled back to `checkpoint`.
    fn rollback_labels(&mut self, checkpoint: &Checkpoint, depth: usize) {
        let events_len = checkpoint.events_len;
        while self
            .label_starts
            .last()
            .is_some_and(|start| start.start.0 >= events_len)
        {
            self.label_starts.pop();
        }

        let mut reopened = Vec::new();
        if checkpoint.labels_len < self.labels.len() {
            for label in self.labels.split_off(checkpoint.labels_len) {
                if label.start.0 < events_len {
                    reopened.push(LabelStart {
                        kind: label.kind,
                        start: label.start,
                        inactive: false,
                    });
                }
            }
        }
        if checkpoint.loose_len < self.label_starts_loose.len() {
            for (start, given_up_at) in self.label_starts_loose.split_off(checkpoint.loose_len) {
                if start.start.0 >= events_len {
                    continue;
                }
                if given_up_at > depth {
                    reopened.push(start);
                } else {
                    self.label_starts_loose.push((start, given_up_at));
                }
            }
        }
        if reopened.is_empty() {
            return;
        }

        self.label_starts.append(&mut reopened);
        self.label_starts.sort_by_key(|start| start.start.0);
        // A link start is inactive iff a kept link opens after it.
        let last_link = self
            .labels
            .iter()
            .filter(|label| label.kind == LabelKind::Link)
            .map(|label| label.start.0)
            .max();
        for start in &mut self.label_starts {
            start.inactive = start.kind == LabelKind::Link
                && last_link.is_some_and(|link| link > start.start.0);
        }
    }
}

/// What a finished tokenizer hands back.
#[derive(Debug)]
pub struct TokenizeResult {
    /// Resolved events.
    pub events: Vec<Event>,
    /// Identifiers of definitions found.
    pub definitions: HashSet<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttemptKind {
    Attempt,
    Check,
}

#[derive(Debug, Clone)]
struct Checkpoint {
    point: Point,
    range: usize,
    events_len: usize,
    stack: Vec<usize>,
    chunk_previous: Option<usize>,
    lists_len: usize,
    labels_len: usize,
    loose_len: usize,
}

#[derive(Debug)]
struct Attempt {
    kind: AttemptKind,
    ok: State,
    nok: State,
    construct: Option<Construct>,
    checkpoint: Checkpoint,
}

/// Constructs of a hook still to be tried at one position.
#[derive(Debug)]
struct ConstructList {
    kind: AttemptKind,
    constructs: Vec<Construct>,
    index: usize,
    ok: State,
    nok: State,
}

/// A streaming tokenizer over one or more ranges of the input.
#[derive(Debug)]
pub struct Tokenizer<'a> {
    /// Code offered to the current state.
    pub current: Code,
    /// Position of `current`, or the end of the last range when a jump is
    /// pending.
    pub point: Point,
    /// Events, open tokens, definitions.
    pub context: TokenizeContext<'a>,
    /// Construct scratch data.
    pub tokenize_state: TokenizeState,
    content_type: ContentType,
    consumed: bool,
    /// Ranges of codes to feed: start point and exclusive end index.
    ranges: Vec<(Point, usize)>,
    range: usize,
    attempts: Vec<Attempt>,
    lists: Vec<ConstructList>,
    resolvers: Vec<ResolveAll>,
}

impl<'a> Tokenizer<'a> {
    /// A tokenizer that reads the given ranges of the input, in order.
    ///
    /// Empty ranges are skipped.
    pub fn new(
        parse_state: &'a ParseState<'a>,
        content_type: ContentType,
        ranges: Vec<(Point, usize)>,
    ) -> Self {
        let mut ranges: Vec<(Point, usize)> = ranges
            .into_iter()
            .filter(|(start, end)| start.index < *end)
            .collect();
        if ranges.is_empty() {
            let start = Point::new(1, 1, parse_state.input.offset(0), 0);
            ranges.push((start, 0));
        }
        let point = ranges[0].0;

        Self {
            current: Code::Eof,
            point,
            context: TokenizeContext::new(parse_state),
            tokenize_state: TokenizeState::default(),
            content_type,
            consumed: true,
            ranges,
            range: 0,
            attempts: Vec::new(),
            lists: Vec::new(),
            resolvers: Vec::new(),
        }
    }

    /// A tokenizer over the whole input.
    pub fn document(parse_state: &'a ParseState<'a>) -> Self {
        let start = Point::new(1, 1, parse_state.input.offset(0), 0);
        let end = parse_state.input.len();
        Self::new(parse_state, ContentType::Flow, vec![(start, end)])
    }

    /// Number of unsettled attempts; the innermost one has index
    /// `attempt_depth() - 1`.
    pub fn attempt_depth(&self) -> usize {
        self.attempts.len()
    }

    /// The content type this tokenizer parses.
    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    /// Options of this parse.
    pub fn options(&self) -> &'a ParseOptions {
        self.context.parse_state.options
    }

    /// Run the initializer of this tokenizer's content type to the end of the
    /// input, then run every deferred resolver.
    ///
    /// # Panics
    /// Panics if a state breaks an engine invariant: consuming twice, moving
    /// on without consuming, or leaving a token open at the end.
    pub fn run(mut self) -> TokenizeResult {
        let initializer = initialize::initializer(self.content_type);
        log::trace!("tokenize {:?} over {} range(s)", self.content_type, self.ranges.len());

        let end = self.drive(State::Next(initializer.start));
        assert!(end.is_ok(), "expected {:?} to match its input", self.content_type);
        assert!(
            self.context.stack.is_empty(),
            "expected all tokens to be exited, {} still open",
            self.context.stack.len()
        );
        assert!(self.attempts.is_empty(), "expected all attempts to be settled");

        let resolvers = std::mem::take(&mut self.resolvers);
        for resolve_all in resolvers.into_iter().chain(initializer.resolve_all.iter().copied()) {
            resolve_all(&mut self);
        }

        TokenizeResult {
            events: self.context.events,
            definitions: self.context.definitions,
        }
    }

    /// Drive states until the outermost machine settles.
    fn drive(&mut self, mut state: State) -> State {
        loop {
            match state {
                State::Next(f) => {
                    self.fetch();
                    state = self.call(f);
                }
                State::Retry(f) => {
                    assert!(
                        !self.consumed,
                        "expected current code to not be consumed before retry"
                    );
                    state = self.call(f);
                }
                State::Ok | State::Nok => match self.attempts.pop() {
                    Some(attempt) => state = self.settle(attempt, state.is_ok()),
                    None => return state,
                },
            }
        }
    }

    fn call(&mut self, f: StateFn) -> State {
        let state = f(self);
        if matches!(state, State::Next(_)) {
            assert!(
                self.consumed,
                "expected code {:?} at {}:{} to be consumed before moving on",
                self.current, self.point.line, self.point.column
            );
        }
        state
    }

    /// Load the code at the current position.
    fn fetch(&mut self) {
        self.consumed = false;
        let (index, end) = if self.jump_pending() {
            let (start, end) = self.ranges[self.range + 1];
            (start.index, end)
        } else {
            (self.point.index, self.ranges[self.range].1)
        };
        self.current = if index < end {
            self.context.parse_state.input.code(index)
        } else {
            Code::Eof
        };
    }

    fn jump_pending(&self) -> bool {
        self.point.index >= self.ranges[self.range].1 && self.range + 1 < self.ranges.len()
    }

    fn apply_jump(&mut self) {
        while self.jump_pending() {
            self.range += 1;
            self.point = self.ranges[self.range].0;
        }
    }

    // ---------------------------------------------------------------------
    // Effects
    // ---------------------------------------------------------------------

    /// Open a token of `kind` at the current position.
    pub fn enter(&mut self, kind: TokenKind) {
        self.apply_jump();
        let index = self.context.events.len();
        self.context
            .events
            .push(Event::enter(Token::new(kind, self.point)));
        self.context.stack.push(index);
    }

    /// Open a chunk whose interior is re-tokenized as `content_type`.
    ///
    /// The chunk is linked after the previous chunk of the open chain, if
    /// any. Call [`end_chain`](Self::end_chain) after the last chunk.
    pub fn enter_with_content(&mut self, kind: TokenKind, content_type: ContentType) {
        self.enter(kind);
        let index = self.context.events.len() - 1;
        self.context.events[index].token.content_type = Some(content_type);
        if let Some(previous) = self.context.chunk_previous {
            self.link(previous, index);
        }
        self.context.chunk_previous = Some(index);
    }

    /// Close the open chain of linked chunks.
    pub fn end_chain(&mut self) {
        self.context.chunk_previous = None;
    }

    /// Link the chunk entered at `previous` to the one entered at `next`.
    pub fn link(&mut self, previous: usize, next: usize) {
        let events = &mut self.context.events;
        debug_assert!(events[previous].is_enter() && events[next].is_enter());
        events[previous].token.next = Some(next);
        events[next].token.previous = Some(previous);
    }

    /// Accept the current code.
    ///
    /// # Panics
    /// Panics when called twice for one code, or on `Eof`.
    pub fn consume(&mut self) {
        assert!(!self.consumed, "expected code {:?} to not be consumed yet", self.current);
        assert!(self.current != Code::Eof, "cannot consume eof");
        self.apply_jump();

        if self.current == Code::LineEnding {
            self.point.line += 1;
            self.point.column = 1;
        } else {
            self.point.column += 1;
        }
        self.point.index += 1;
        self.point.offset = self.context.parse_state.input.offset(self.point.index);
        self.consumed = true;
    }

    /// Close the innermost open token, which must be of `kind`.
    ///
    /// # Panics
    /// Panics when no token is open or the open token is of another kind.
    pub fn exit(&mut self, kind: TokenKind) {
        let Some(index) = self.context.stack.pop() else {
            panic!("cannot exit {kind:?}: no open token");
        };
        let point = self.point;
        let token = &mut self.context.events[index].token;
        assert_eq!(token.kind, kind, "expected to exit the innermost open token");
        token.end = point;
        let token = token.clone();
        self.context.events.push(Event::exit(token));
    }

    // ---------------------------------------------------------------------
    // Attempts
    // ---------------------------------------------------------------------

    /// Run a sub-machine; keep its events on `Ok`, roll back on `Nok`.
    ///
    /// The caller returns `State::Retry(start)` of the sub-machine right
    /// after. `ok` and `nok` are continuations written as `State::Next(f)`,
    /// or `State::Ok`/`State::Nok` to settle the enclosing machine.
    pub fn attempt(&mut self, ok: State, nok: State) {
        self.push_attempt(AttemptKind::Attempt, ok, nok, None);
    }

    /// Like [`attempt`](Self::attempt) but always rolls back.
    pub fn check(&mut self, ok: State, nok: State) {
        self.push_attempt(AttemptKind::Check, ok, nok, None);
    }

    /// Attempt a construct, running its resolvers when it matches.
    pub fn attempt_construct(&mut self, construct: Construct, ok: State, nok: State) -> State {
        self.push_attempt(AttemptKind::Attempt, ok, nok, Some(construct));
        State::Retry(construct.tokenize)
    }

    /// Attempt the constructs registered at `hook` for the current code.
    pub fn attempt_hook(&mut self, hook: Hook, ok: State, nok: State) -> State {
        self.start_list(AttemptKind::Attempt, hook, ok, nok)
    }

    /// Check whether any construct registered at `hook` matches here.
    pub fn check_hook(&mut self, hook: Hook, ok: State, nok: State) -> State {
        self.start_list(AttemptKind::Check, hook, ok, nok)
    }

    /// Register a deferred resolver, once.
    pub fn register_resolver(&mut self, resolve_all: ResolveAll) {
        if !self.resolvers.iter().any(|r| std::ptr::fn_addr_eq(*r, resolve_all)) {
            self.resolvers.push(resolve_all);
        }
    }

    /// Register a deferred resolver to run before all others.
    pub fn register_resolver_before(&mut self, resolve_all: ResolveAll) {
        self.resolvers
            .retain(|r| !std::ptr::fn_addr_eq(*r, resolve_all));
        self.resolvers.insert(0, resolve_all);
    }

    fn start_list(&mut self, kind: AttemptKind, hook: Hook, ok: State, nok: State) -> State {
        let constructs = self
            .context
            .parse_state
            .constructs
            .hook(hook)
            .lookup(self.current);
        if constructs.is_empty() {
            return nok.into_retry();
        }
        self.lists.push(ConstructList {
            kind,
            constructs,
            index: 0,
            ok,
            nok,
        });
        self.try_list_item()
    }

    fn try_list_item(&mut self) -> State {
        let Some(list) = self.lists.last() else {
            unreachable!("expected a construct list");
        };
        let kind = list.kind;
        let construct = list.constructs[list.index];
        self.push_attempt(kind, State::Next(list_ok), State::Next(list_next), Some(construct));
        State::Retry(construct.tokenize)
    }

    fn push_attempt(&mut self, kind: AttemptKind, ok: State, nok: State, construct: Option<Construct>) {
        debug_assert!(
            !matches!(ok, State::Retry(_)) && !matches!(nok, State::Retry(_)),
            "continuations must be `Next`, `Ok`, or `Nok`"
        );
        let checkpoint = self.checkpoint();
        self.attempts.push(Attempt {
            kind,
            ok,
            nok,
            construct,
            checkpoint,
        });
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            point: self.point,
            range: self.range,
            events_len: self.context.events.len(),
            stack: self.context.stack.clone(),
            chunk_previous: self.context.chunk_previous,
            lists_len: self.lists.len(),
            labels_len: self.tokenize_state.labels.len(),
            loose_len: self.tokenize_state.label_starts_loose.len(),
        }
    }

    fn restore(&mut self, checkpoint: Checkpoint) {
        self.tokenize_state
            .rollback_labels(&checkpoint, self.attempts.len());
        self.point = checkpoint.point;
        self.range = checkpoint.range;
        self.context.events.truncate(checkpoint.events_len);
        self.context.stack = checkpoint.stack;
        for &index in &self.context.stack {
            let token = &mut self.context.events[index].token;
            token.end = token.start;
        }
        self.context.chunk_previous = checkpoint.chunk_previous;
        self.lists.truncate(checkpoint.lists_len);
    }

    /// Settle the innermost attempt with the outcome of its machine.
    fn settle(&mut self, attempt: Attempt, ok: bool) -> State {
        let name = attempt.construct.and_then(|c| c.name);
        log::trace!(
            "{:?} {} at {}:{}: {}",
            attempt.kind,
            name.unwrap_or("<sub>"),
            attempt.checkpoint.point.line,
            attempt.checkpoint.point.column,
            if ok { "ok" } else { "nok" }
        );

        let from = attempt.checkpoint.events_len;
        if attempt.kind == AttemptKind::Check || !ok {
            self.restore(attempt.checkpoint);
        } else if let Some(construct) = attempt.construct {
            if let Some(resolve) = construct.resolve {
                resolve(self, from);
            }
            if let Some(resolve_all) = construct.resolve_all {
                self.register_resolver(resolve_all);
            }
        }

        // The continuation reads the code at the (possibly restored) point.
        self.consumed = true;
        if ok { attempt.ok } else { attempt.nok }
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    /// The codes between two points, line endings as `\n`.
    pub fn slice_serialize(&self, start: &Point, end: &Point) -> String {
        let input = &self.context.parse_state.input;
        (start.index..end.index)
            .filter_map(|index| match input.code(index) {
                Code::Char(c) => Some(c),
                Code::LineEnding => Some('\n'),
                Code::Eof => None,
            })
            .collect()
    }

    /// The token of the last exited `kind`, if any.
    pub fn last_exited(&self, kind: TokenKind) -> Option<&Token> {
        self.context
            .events
            .iter()
            .rev()
            .find(|event| event.is_exit() && event.token.kind == kind)
            .map(|event| &event.token)
    }
}

#[cfg(test)]
impl Tokenizer<'_> {
    /// Drive `start` from the first code until it settles.
    pub(crate) fn run_machine(&mut self, start: StateFn) -> State {
        self.drive(State::Next(start))
    }
}

/// A construct of the current list matched.
fn list_ok(tokenizer: &mut Tokenizer<'_>) -> State {
    let Some(list) = tokenizer.lists.pop() else {
        unreachable!("expected a construct list");
    };
    list.ok.into_retry()
}

/// A construct of the current list did not match: try the next one.
fn list_next(tokenizer: &mut Tokenizer<'_>) -> State {
    let Some(list) = tokenizer.lists.last_mut() else {
        unreachable!("expected a construct list");
    };
    list.index += 1;
    if list.index < list.constructs.len() {
        tokenizer.try_list_item()
    } else {
        let nok = list.nok;
        tokenizer.lists.pop();
        nok.into_retry()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::construct::{ConstructRegistry, Extension};
    use crate::preprocess::preprocess;
    use pretty_assertions::assert_eq;

    fn kinds(events: &[Event]) -> Vec<(bool, TokenKind)> {
        events.iter().map(|e| (e.is_enter(), e.token.kind)).collect()
    }

    const WORD: TokenKind = TokenKind::EXTENSION("word");

    // A tiny grammar: runs of letters become `word`, anything else `DATA`.
    fn word_start(tokenizer: &mut Tokenizer<'_>) -> State {
        match tokenizer.current {
            Code::Eof => State::Ok,
            Code::Char(c) if c.is_ascii_alphabetic() => {
                tokenizer.enter(WORD);
                State::Retry(word_inside)
            }
            _ => {
                tokenizer.enter(TokenKind::DATA);
                tokenizer.consume();
                tokenizer.exit(TokenKind::DATA);
                State::Next(word_start)
            }
        }
    }

    fn word_inside(tokenizer: &mut Tokenizer<'_>) -> State {
        match tokenizer.current {
            Code::Char(c) if c.is_ascii_alphabetic() => {
                tokenizer.consume();
                State::Next(word_inside)
            }
            _ => {
                tokenizer.exit(WORD);
                State::Retry(word_start)
            }
        }
    }

    fn state_for(value: &str) -> (crate::preprocess::Input, ParseOptions) {
        (preprocess(value), ParseOptions::default())
    }

    #[test]
    fn drives_a_machine_to_the_end() {
        let (input, options) = state_for("ab c");
        let parse_state = ParseState::new(&input, &options);
        let mut tokenizer = Tokenizer::document(&parse_state);
        let end = tokenizer.drive(State::Next(word_start));
        assert!(end.is_ok());
        assert_eq!(
            kinds(&tokenizer.context.events),
            vec![
                (true, WORD),
                (false, WORD),
                (true, TokenKind::DATA),
                (false, TokenKind::DATA),
                (true, WORD),
                (false, WORD),
            ]
        );
        let word = &tokenizer.context.events[1].token;
        assert_eq!((word.start.column, word.end.column), (1, 3));
    }

    #[test]
    fn jumps_skip_gaps_between_ranges() {
        // Feed "ab" and "cd" out of "ab--cd".
        let (input, options) = state_for("ab--cd");
        let parse_state = ParseState::new(&input, &options);
        let ranges = vec![
            (Point::new(1, 1, 0, 0), 2),
            (Point::new(1, 5, 4, 4), 6),
        ];
        let mut tokenizer = Tokenizer::new(&parse_state, ContentType::Text, ranges);
        tokenizer.drive(State::Next(word_start));

        let events = &tokenizer.context.events;
        // The gap is invisible to states: one run of letters spans both
        // ranges.
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].token.start.offset, 0);
        assert_eq!(events[1].token.end.offset, 6);
    }

    fn reject_after_one(tokenizer: &mut Tokenizer<'_>) -> State {
        tokenizer.enter(WORD);
        tokenizer.consume();
        State::Next(reject_now)
    }

    fn reject_now(_tokenizer: &mut Tokenizer<'_>) -> State {
        State::Nok
    }

    fn after_rejected(tokenizer: &mut Tokenizer<'_>) -> State {
        tokenizer.enter(TokenKind::DATA);
        tokenizer.consume();
        tokenizer.exit(TokenKind::DATA);
        State::Next(word_start)
    }

    fn attempt_rejecting(tokenizer: &mut Tokenizer<'_>) -> State {
        tokenizer.attempt(State::Next(word_start), State::Next(after_rejected));
        State::Retry(reject_after_one)
    }

    #[test]
    fn failed_attempt_leaves_no_trace() {
        let (input, options) = state_for("xy");
        let parse_state = ParseState::new(&input, &options);
        let mut tokenizer = Tokenizer::document(&parse_state);
        let end = tokenizer.drive(State::Next(attempt_rejecting));
        assert!(end.is_ok());
        // The rejected `WORD` enter is gone and `x` was re-read as data.
        assert_eq!(tokenizer.context.events[0].token.kind, TokenKind::DATA);
        assert_eq!(tokenizer.context.events[0].token.start.offset, 0);
        assert_eq!(tokenizer.context.events[2].token.kind, WORD);
        assert!(tokenizer.context.stack.is_empty());
    }

    #[test]
    fn hook_without_constructs_takes_nok() {
        let (input, options) = state_for("z");
        let mut parse_state = ParseState::new(&input, &options);
        parse_state.constructs = ConstructRegistry::default();
        let mut tokenizer = Tokenizer::document(&parse_state);
        tokenizer.fetch();
        let state = tokenizer.attempt_hook(Hook::Text, State::Next(reject_now), State::Next(word_start));
        assert!(matches!(state, State::Retry(_)));
    }

    #[test]
    fn resolvers_are_registered_once() {
        fn resolve(_tokenizer: &mut Tokenizer<'_>) {}
        fn other(_tokenizer: &mut Tokenizer<'_>) {}
        let (input, options) = state_for("");
        let parse_state = ParseState::new(&input, &options);
        let mut tokenizer = Tokenizer::document(&parse_state);
        tokenizer.register_resolver(resolve);
        tokenizer.register_resolver(other);
        tokenizer.register_resolver(resolve);
        assert_eq!(tokenizer.resolvers.len(), 2);
        tokenizer.register_resolver_before(other);
        assert!(std::ptr::fn_addr_eq(tokenizer.resolvers[0], other as ResolveAll));
        assert_eq!(tokenizer.resolvers.len(), 2);
    }

    #[test]
    #[should_panic(expected = "cannot consume eof")]
    fn consuming_eof_panics() {
        let (input, options) = state_for("");
        let parse_state = ParseState::new(&input, &options);
        let mut tokenizer = Tokenizer::document(&parse_state);
        tokenizer.fetch();
        tokenizer.consume();
    }

    #[test]
    #[should_panic(expected = "to not be consumed yet")]
    fn consuming_twice_panics() {
        let (input, options) = state_for("ab");
        let parse_state = ParseState::new(&input, &options);
        let mut tokenizer = Tokenizer::document(&parse_state);
        tokenizer.fetch();
        tokenizer.consume();
        tokenizer.consume();
    }

    #[test]
    #[should_panic(expected = "expected to exit the innermost open token")]
    fn exiting_the_wrong_kind_panics() {
        let (input, options) = state_for("a");
        let parse_state = ParseState::new(&input, &options);
        let mut tokenizer = Tokenizer::document(&parse_state);
        tokenizer.fetch();
        tokenizer.enter(TokenKind::DATA);
        tokenizer.exit(TokenKind::LINK);
    }

    #[test]
    fn extension_registry_is_consulted() {
        fn never(_tokenizer: &mut Tokenizer<'_>) -> State {
            State::Nok
        }
        let input = preprocess("q");
        let options = ParseOptions {
            extensions: vec![Extension {
                hook: Hook::Text,
                trigger: Some('q'),
                construct: Construct::new("never", never),
            }],
            ..ParseOptions::default()
        };
        let parse_state = ParseState::new(&input, &options);
        let mut tokenizer = Tokenizer::document(&parse_state);
        let end = tokenizer.drive(State::Next(hook_then_data));
        assert!(end.is_ok());
        assert_eq!(
            kinds(&tokenizer.context.events),
            vec![(true, TokenKind::DATA), (false, TokenKind::DATA)]
        );
    }

    fn hook_then_data(tokenizer: &mut Tokenizer<'_>) -> State {
        if tokenizer.current == Code::Eof {
            return State::Ok;
        }
        tokenizer.attempt_hook(Hook::Text, State::Next(hook_then_data), State::Next(after_rejected_end))
    }

    fn after_rejected_end(tokenizer: &mut Tokenizer<'_>) -> State {
        tokenizer.enter(TokenKind::DATA);
        tokenizer.consume();
        tokenizer.exit(TokenKind::DATA);
        State::Next(hook_then_data)
    }
}

//! Initial state machines, one per [`ContentType`].
//!
//! An initializer loops until `Eof`, handing each position to the hook of
//! its content type and falling back to its own default (content, a
//! paragraph, data). Its deferred resolvers run after those of the
//! constructs it met.

pub mod content;
pub mod flow;
pub mod text;

use crate::construct::ResolveAll;
use crate::state::StateFn;
use crate::token::ContentType;

/// Entry point and deferred resolvers of a content type.
#[derive(Debug, Clone, Copy)]
pub struct Initializer {
    /// First state.
    pub start: StateFn,
    /// Resolvers run once the pass is done, after those of constructs.
    pub resolve_all: &'static [ResolveAll],
}

/// The initializer for `content_type`.
pub fn initializer(content_type: ContentType) -> Initializer {
    match content_type {
        ContentType::Flow => Initializer {
            start: flow::start,
            resolve_all: &[],
        },
        ContentType::Content => Initializer {
            start: content::start,
            resolve_all: &[],
        },
        ContentType::Text => Initializer {
            start: text::text_start,
            resolve_all: &[text::resolve_data, text::resolve_line_suffixes],
        },
        ContentType::String => Initializer {
            start: text::string_start,
            resolve_all: &[text::resolve_data],
        },
    }
}

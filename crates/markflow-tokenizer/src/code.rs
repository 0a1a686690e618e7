//! # Codes - The Tokenizer Alphabet
//!
//! State functions never look at raw bytes. They look at [`Code`]s: one
//! Unicode scalar value of input, or one of two virtual codes.
//!
//! ```text
//! "a\r\nb"  →  [Char('a'), LineEnding, Char('b'), Eof]
//! ```
//!
//! Every flavor of line ending (`\n`, `\r`, `\r\n`) is folded into a single
//! [`Code::LineEnding`] by [`preprocess`](crate::preprocess), and the end of
//! the input is [`Code::Eof`]. Because these are variants rather than magic
//! integers, a `match` on a code is checked for exhaustiveness by the compiler.

/// One unit of input offered to a state function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Code {
    /// A real character from the source.
    Char(char),
    /// A normalized line ending (`\n`, `\r`, or `\r\n` in the source).
    LineEnding,
    /// End of input.
    Eof,
}

impl Code {
    /// The character, if this is a real character.
    pub fn as_char(self) -> Option<char> {
        match self {
            Code::Char(c) => Some(c),
            Code::LineEnding | Code::Eof => None,
        }
    }

    /// Whether this is exactly the character `c`.
    pub fn is(self, c: char) -> bool {
        self == Code::Char(c)
    }
}

/// Maximum number of characters in a link label (`[...]`).
///
/// Guards against unbounded work on pathological input such as a `[`
/// followed by thousands of characters and no closing bracket.
pub const LINK_REFERENCE_SIZE_MAX: usize = 999;

/// Minimum number of markers in a thematic break (`***`).
pub const THEMATIC_BREAK_MARKER_COUNT_MIN: usize = 3;

/// Maximum number of `#` in an ATX heading opening sequence.
pub const ATX_HEADING_OPENING_FENCE_SIZE_MAX: usize = 6;

/// Maximum depth of unescaped parentheses in a raw destination.
pub const LINK_RESOURCE_DESTINATION_BALANCE_MAX: usize = 32;

/// Space or tab.
pub fn markdown_space(code: Code) -> bool {
    matches!(code, Code::Char(' ' | '\t'))
}

/// A normalized line ending.
pub fn markdown_line_ending(code: Code) -> bool {
    code == Code::LineEnding
}

/// Space, tab, or line ending.
pub fn markdown_line_ending_or_space(code: Code) -> bool {
    markdown_space(code) || markdown_line_ending(code)
}

/// ASCII punctuation: `!` through `/`, `:` through `@`, `[` through `` ` ``,
/// and `{` through `~`.
pub fn ascii_punctuation(code: Code) -> bool {
    matches!(code, Code::Char(c) if c.is_ascii_punctuation())
}

/// ASCII control characters (including delete).
pub fn ascii_control(code: Code) -> bool {
    matches!(code, Code::Char(c) if c.is_ascii_control())
}

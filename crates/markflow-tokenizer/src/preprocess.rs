//! Turns source text into the [`Code`] sequence the tokenizer consumes.
//!
//! Normalization happens once, up front, so state functions never see a
//! carriage return or have to special-case `\r\n`.

use crate::code::Code;

/// Preprocessed input: the codes plus the byte offset where each one starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input {
    /// One code per character, line endings folded. Does not include `Eof`.
    pub codes: Vec<Code>,
    /// `offsets[i]` is the byte offset of `codes[i]` in the source.
    pub offsets: Vec<usize>,
    /// Byte length of the source (the offset of `Eof`).
    pub end: usize,
}

impl Input {
    /// Number of codes.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Whether there are no codes at all.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Code at `index`, or `Eof` past the end.
    pub fn code(&self, index: usize) -> Code {
        self.codes.get(index).copied().unwrap_or(Code::Eof)
    }

    /// Byte offset of the code at `index` (`end` past the last code).
    pub fn offset(&self, index: usize) -> usize {
        self.offsets.get(index).copied().unwrap_or(self.end)
    }
}

/// Preprocess `value` into codes.
///
/// A leading byte order mark is dropped from the codes; offsets still point
/// into the original string, so slicing the source with them stays valid.
pub fn preprocess(value: &str) -> Input {
    let mut codes = Vec::with_capacity(value.len());
    let mut offsets = Vec::with_capacity(value.len());
    let mut chars = value.char_indices().peekable();

    if let Some(&(_, '\u{feff}')) = chars.peek() {
        chars.next();
    }

    while let Some((offset, c)) = chars.next() {
        offsets.push(offset);
        match c {
            '\r' => {
                if let Some(&(_, '\n')) = chars.peek() {
                    chars.next();
                }
                codes.push(Code::LineEnding);
            }
            '\n' => codes.push(Code::LineEnding),
            _ => codes.push(Code::Char(c)),
        }
    }

    Input {
        codes,
        offsets,
        end: value.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn preprocess_empty() {
        let input = preprocess("");
        assert!(input.is_empty());
        assert_eq!(input.end, 0);
        assert_eq!(input.code(0), Code::Eof);
    }

    #[test]
    fn line_endings_are_folded() {
        let input = preprocess("a\r\nb\rc\nd");
        assert_eq!(
            input.codes,
            vec![
                Code::Char('a'),
                Code::LineEnding,
                Code::Char('b'),
                Code::LineEnding,
                Code::Char('c'),
                Code::LineEnding,
                Code::Char('d'),
            ]
        );
        assert_eq!(input.offsets, vec![0, 1, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn tabs_are_preserved() {
        let input = preprocess("\tx");
        assert_eq!(input.codes, vec![Code::Char('\t'), Code::Char('x')]);
    }

    #[test]
    fn offsets_are_byte_offsets() {
        let input = preprocess("é!");
        assert_eq!(input.offsets, vec![0, 2]);
        assert_eq!(input.offset(2), 3);
    }

    #[test]
    fn byte_order_mark_is_skipped() {
        let input = preprocess("\u{feff}a");
        assert_eq!(input.codes, vec![Code::Char('a')]);
        assert_eq!(input.offsets, vec![3]);
    }
}

//! Character classification for flanking rules.
//!
//! Emphasis and strong (`*`, `_`) open or close depending on what surrounds
//! the delimiter run. [`classify`] reduces a code to one of three groups.
//! `Eof` counts as whitespace.

use crate::code::{Code, markdown_line_ending_or_space};

/// The group a character belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharacterKind {
    /// Whitespace, line endings, and the end of input.
    Whitespace,
    /// Unicode punctuation.
    Punctuation,
    /// Anything else.
    Other,
}

/// Classify `code` as whitespace, punctuation, or other.
pub fn classify(code: Code) -> CharacterKind {
    match code {
        Code::Eof | Code::LineEnding => CharacterKind::Whitespace,
        Code::Char(c) if markdown_line_ending_or_space(code) || c.is_whitespace() => {
            CharacterKind::Whitespace
        }
        Code::Char(c) if unicode_punctuation(c) => CharacterKind::Punctuation,
        Code::Char(_) => CharacterKind::Other,
    }
}

/// Whether `c` is in one of the Unicode `P*` general categories
/// (connector, dash, open, close, initial, final, other punctuation), or is
/// ASCII punctuation.
pub fn unicode_punctuation(c: char) -> bool {
    if c.is_ascii() {
        return c.is_ascii_punctuation();
    }

    PUNCTUATION
        .binary_search_by(|&(start, end)| {
            if end < c {
                std::cmp::Ordering::Less
            } else if start > c {
                std::cmp::Ordering::Greater
            } else {
                std::cmp::Ordering::Equal
            }
        })
        .is_ok()
}

/// Sorted, non-overlapping ranges of non-ASCII punctuation.
const PUNCTUATION: &[(char, char)] = &[
    ('\u{a1}', '\u{a1}'),
    ('\u{a7}', '\u{a7}'),
    ('\u{ab}', '\u{ab}'),
    ('\u{b6}', '\u{b7}'),
    ('\u{bb}', '\u{bb}'),
    ('\u{bf}', '\u{bf}'),
    ('\u{37e}', '\u{37e}'),
    ('\u{387}', '\u{387}'),
    ('\u{55a}', '\u{55f}'),
    ('\u{589}', '\u{58a}'),
    ('\u{5be}', '\u{5be}'),
    ('\u{5c0}', '\u{5c0}'),
    ('\u{5c3}', '\u{5c3}'),
    ('\u{5c6}', '\u{5c6}'),
    ('\u{5f3}', '\u{5f4}'),
    ('\u{609}', '\u{60a}'),
    ('\u{60c}', '\u{60d}'),
    ('\u{61b}', '\u{61b}'),
    ('\u{61d}', '\u{61f}'),
    ('\u{66a}', '\u{66d}'),
    ('\u{6d4}', '\u{6d4}'),
    ('\u{700}', '\u{70d}'),
    ('\u{7f7}', '\u{7f9}'),
    ('\u{830}', '\u{83e}'),
    ('\u{85e}', '\u{85e}'),
    ('\u{964}', '\u{965}'),
    ('\u{970}', '\u{970}'),
    ('\u{9fd}', '\u{9fd}'),
    ('\u{a76}', '\u{a76}'),
    ('\u{af0}', '\u{af0}'),
    ('\u{c77}', '\u{c77}'),
    ('\u{c84}', '\u{c84}'),
    ('\u{df4}', '\u{df4}'),
    ('\u{e4f}', '\u{e4f}'),
    ('\u{e5a}', '\u{e5b}'),
    ('\u{f04}', '\u{f12}'),
    ('\u{f14}', '\u{f14}'),
    ('\u{f3a}', '\u{f3d}'),
    ('\u{f85}', '\u{f85}'),
    ('\u{fd0}', '\u{fd4}'),
    ('\u{fd9}', '\u{fda}'),
    ('\u{104a}', '\u{104f}'),
    ('\u{10fb}', '\u{10fb}'),
    ('\u{1360}', '\u{1368}'),
    ('\u{1400}', '\u{1400}'),
    ('\u{166e}', '\u{166e}'),
    ('\u{169b}', '\u{169c}'),
    ('\u{16eb}', '\u{16ed}'),
    ('\u{1735}', '\u{1736}'),
    ('\u{17d4}', '\u{17d6}'),
    ('\u{17d8}', '\u{17da}'),
    ('\u{1800}', '\u{180a}'),
    ('\u{1944}', '\u{1945}'),
    ('\u{1a1e}', '\u{1a1f}'),
    ('\u{1aa0}', '\u{1aa6}'),
    ('\u{1aa8}', '\u{1aad}'),
    ('\u{1b5a}', '\u{1b60}'),
    ('\u{1bfc}', '\u{1bff}'),
    ('\u{1c3b}', '\u{1c3f}'),
    ('\u{1c7e}', '\u{1c7f}'),
    ('\u{1cc0}', '\u{1cc7}'),
    ('\u{1cd3}', '\u{1cd3}'),
    ('\u{2010}', '\u{2027}'),
    ('\u{2030}', '\u{2043}'),
    ('\u{2045}', '\u{2051}'),
    ('\u{2053}', '\u{205e}'),
    ('\u{207d}', '\u{207e}'),
    ('\u{208d}', '\u{208e}'),
    ('\u{2308}', '\u{230b}'),
    ('\u{2329}', '\u{232a}'),
    ('\u{2768}', '\u{2775}'),
    ('\u{27c5}', '\u{27c6}'),
    ('\u{27e6}', '\u{27ef}'),
    ('\u{2983}', '\u{2998}'),
    ('\u{29d8}', '\u{29db}'),
    ('\u{29fc}', '\u{29fd}'),
    ('\u{2cf9}', '\u{2cfc}'),
    ('\u{2cfe}', '\u{2cff}'),
    ('\u{2d70}', '\u{2d70}'),
    ('\u{2e00}', '\u{2e2e}'),
    ('\u{2e30}', '\u{2e4f}'),
    ('\u{2e52}', '\u{2e5d}'),
    ('\u{3001}', '\u{3003}'),
    ('\u{3008}', '\u{3011}'),
    ('\u{3014}', '\u{301f}'),
    ('\u{3030}', '\u{3030}'),
    ('\u{303d}', '\u{303d}'),
    ('\u{30a0}', '\u{30a0}'),
    ('\u{30fb}', '\u{30fb}'),
    ('\u{a4fe}', '\u{a4ff}'),
    ('\u{a60d}', '\u{a60f}'),
    ('\u{a673}', '\u{a673}'),
    ('\u{a67e}', '\u{a67e}'),
    ('\u{a6f2}', '\u{a6f7}'),
    ('\u{a874}', '\u{a877}'),
    ('\u{a8ce}', '\u{a8cf}'),
    ('\u{a8f8}', '\u{a8fa}'),
    ('\u{a8fc}', '\u{a8fc}'),
    ('\u{a92e}', '\u{a92f}'),
    ('\u{a95f}', '\u{a95f}'),
    ('\u{a9c1}', '\u{a9cd}'),
    ('\u{a9de}', '\u{a9df}'),
    ('\u{aa5c}', '\u{aa5f}'),
    ('\u{aade}', '\u{aadf}'),
    ('\u{aaf0}', '\u{aaf1}'),
    ('\u{abeb}', '\u{abeb}'),
    ('\u{fd3e}', '\u{fd3f}'),
    ('\u{fe10}', '\u{fe19}'),
    ('\u{fe30}', '\u{fe52}'),
    ('\u{fe54}', '\u{fe61}'),
    ('\u{fe63}', '\u{fe63}'),
    ('\u{fe68}', '\u{fe68}'),
    ('\u{fe6a}', '\u{fe6b}'),
    ('\u{ff01}', '\u{ff03}'),
    ('\u{ff05}', '\u{ff0a}'),
    ('\u{ff0c}', '\u{ff0f}'),
    ('\u{ff1a}', '\u{ff1b}'),
    ('\u{ff1f}', '\u{ff20}'),
    ('\u{ff3b}', '\u{ff3d}'),
    ('\u{ff3f}', '\u{ff3f}'),
    ('\u{ff5b}', '\u{ff5b}'),
    ('\u{ff5d}', '\u{ff5d}'),
    ('\u{ff5f}', '\u{ff65}'),
    ('\u{10100}', '\u{10102}'),
    ('\u{1039f}', '\u{1039f}'),
    ('\u{103d0}', '\u{103d0}'),
    ('\u{1056f}', '\u{1056f}'),
    ('\u{10857}', '\u{10857}'),
    ('\u{1091f}', '\u{1091f}'),
    ('\u{1093f}', '\u{1093f}'),
    ('\u{10a50}', '\u{10a58}'),
    ('\u{10a7f}', '\u{10a7f}'),
    ('\u{10af0}', '\u{10af6}'),
    ('\u{10b39}', '\u{10b3f}'),
    ('\u{10b99}', '\u{10b9c}'),
    ('\u{11047}', '\u{1104d}'),
    ('\u{110bb}', '\u{110bc}'),
    ('\u{110be}', '\u{110c1}'),
    ('\u{11140}', '\u{11143}'),
    ('\u{11174}', '\u{11175}'),
    ('\u{111c5}', '\u{111c8}'),
    ('\u{111cd}', '\u{111cd}'),
    ('\u{111db}', '\u{111db}'),
    ('\u{111dd}', '\u{111df}'),
    ('\u{11238}', '\u{1123d}'),
    ('\u{1144b}', '\u{1144f}'),
    ('\u{1145a}', '\u{1145b}'),
    ('\u{1145d}', '\u{1145d}'),
    ('\u{114c6}', '\u{114c6}'),
    ('\u{115c1}', '\u{115d7}'),
    ('\u{11641}', '\u{11643}'),
    ('\u{11660}', '\u{1166c}'),
    ('\u{1173c}', '\u{1173e}'),
    ('\u{1183b}', '\u{1183b}'),
    ('\u{11a3f}', '\u{11a46}'),
    ('\u{11a9a}', '\u{11a9c}'),
    ('\u{11a9e}', '\u{11aa2}'),
    ('\u{11c41}', '\u{11c45}'),
    ('\u{11c70}', '\u{11c71}'),
    ('\u{11ef7}', '\u{11ef8}'),
    ('\u{12470}', '\u{12474}'),
    ('\u{16a6e}', '\u{16a6f}'),
    ('\u{16af5}', '\u{16af5}'),
    ('\u{16b37}', '\u{16b3b}'),
    ('\u{16b44}', '\u{16b44}'),
    ('\u{16e97}', '\u{16e9a}'),
    ('\u{1bc9f}', '\u{1bc9f}'),
    ('\u{1da87}', '\u{1da8b}'),
    ('\u{1e95e}', '\u{1e95f}'),
];

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Code::Eof, CharacterKind::Whitespace)]
    #[case(Code::LineEnding, CharacterKind::Whitespace)]
    #[case(Code::Char(' '), CharacterKind::Whitespace)]
    #[case(Code::Char('\t'), CharacterKind::Whitespace)]
    #[case(Code::Char('\u{a0}'), CharacterKind::Whitespace)]
    #[case(Code::Char('\u{3000}'), CharacterKind::Whitespace)]
    #[case(Code::Char('*'), CharacterKind::Punctuation)]
    #[case(Code::Char('!'), CharacterKind::Punctuation)]
    #[case(Code::Char('\u{201c}'), CharacterKind::Punctuation)]
    #[case(Code::Char('\u{3001}'), CharacterKind::Punctuation)]
    #[case(Code::Char('a'), CharacterKind::Other)]
    #[case(Code::Char('7'), CharacterKind::Other)]
    #[case(Code::Char('é'), CharacterKind::Other)]
    #[case(Code::Char('\u{1f600}'), CharacterKind::Other)]
    fn classify_codes(#[case] code: Code, #[case] expected: CharacterKind) {
        assert_eq!(classify(code), expected);
    }

    #[test]
    fn punctuation_table_is_sorted() {
        for pair in PUNCTUATION.windows(2) {
            assert!(pair[0].0 <= pair[0].1);
            assert!(pair[0].1 < pair[1].0, "{:?} overlaps {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn classify_is_total_over_ascii() {
        for byte in 0u8..=127 {
            let kind = classify(Code::Char(byte as char));
            assert!(matches!(
                kind,
                CharacterKind::Whitespace | CharacterKind::Punctuation | CharacterKind::Other
            ));
        }
    }
}

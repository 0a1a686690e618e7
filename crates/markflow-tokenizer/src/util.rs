//! Small helpers shared by constructs.

/// Normalize a link label so equal references compare equal.
///
/// Collapses whitespace runs (line endings included) to one space, trims the
/// ends, and case-folds. Lowercasing before uppercasing makes `ẞ`, `ß` and
/// `ss` all fold to `SS`.
pub fn normalize_identifier(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
        .to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Foo", "FOO")]
    #[case("  a \n\t b  ", "A B")]
    #[case("ẞ", "SS")]
    #[case("ss", "SS")]
    #[case("", "")]
    fn normalizes(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_identifier(input), expected);
    }
}

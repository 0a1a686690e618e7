//! Text views of an event log, used by the CLI and in snapshot tests.

use crate::event::Event;

/// Format `events` as an indented tree.
///
/// Tokens with nothing nested inside them are printed on one line together
/// with the source text they cover:
///
/// ```text
/// CONTENT@0..3
///   PARAGRAPH@0..3
///     DATA@0..3 "a b"
/// ```
pub fn format_events(events: &[Event], source: &str) -> String {
    let mut result = String::new();
    let mut depth: usize = 0;
    let mut index = 0;

    while index < events.len() {
        let event = &events[index];
        if event.is_exit() {
            depth = depth.saturating_sub(1);
            index += 1;
            continue;
        }

        let token = &event.token;
        let prefix = "  ".repeat(depth);
        let leaf = events
            .get(index + 1)
            .is_some_and(|next| next.is_exit() && next.token.kind == token.kind);

        result.push_str(&format!(
            "{}{:?}@{}..{}",
            prefix, token.kind, token.start.offset, token.end.offset
        ));
        if leaf {
            let text = source
                .get(token.start.offset..token.end.offset)
                .unwrap_or_default();
            result.push_str(&format!(" {text:?}\n"));
            index += 2;
        } else {
            result.push('\n');
            depth += 1;
            index += 1;
        }
    }

    result
}

/// Format `events` one per line, with line and column positions.
pub fn format_event_log(events: &[Event]) -> String {
    let mut result = String::new();
    for event in events {
        let token = &event.token;
        let direction = if event.is_enter() { "enter" } else { "exit" };
        result.push_str(&format!(
            "{:<5} {:?} {}:{}-{}:{}\n",
            direction,
            token.kind,
            token.start.line,
            token.start.column,
            token.end.line,
            token.end.column
        ));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{ParseOptions, tokenize};
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;

    #[test]
    fn tree_of_a_paragraph_with_emphasis() {
        let value = "a *b*";
        let events = tokenize(value, &ParseOptions::default());
        assert_snapshot!(format_events(&events, value), @r#"
        CONTENT@0..5
          PARAGRAPH@0..5
            DATA@0..2 "a "
            EMPHASIS@2..5
              EMPHASIS_SEQUENCE@2..3 "*"
              EMPHASIS_TEXT@3..4
                DATA@3..4 "b"
              EMPHASIS_SEQUENCE@4..5 "*"
        "#);
    }

    #[test]
    fn event_log_lists_every_event() {
        let events = tokenize("***", &ParseOptions::default());
        assert_eq!(
            format_event_log(&events),
            "enter THEMATIC_BREAK 1:1-1:4\n\
             enter THEMATIC_BREAK_SEQUENCE 1:1-1:4\n\
             exit  THEMATIC_BREAK_SEQUENCE 1:1-1:4\n\
             exit  THEMATIC_BREAK 1:1-1:4\n"
        );
    }

    #[test]
    fn empty_log_formats_to_nothing() {
        assert_eq!(format_events(&[], ""), "");
        assert_eq!(format_event_log(&[]), "");
    }
}

//! TokenKind enum for every token the built-in constructs produce.
//!
//! A single enum covers leaf tokens (markers, data, whitespace) and group
//! tokens (links, headings, paragraphs). Nesting is expressed by the
//! enter/exit events, not by the kind itself.

/// All token kinds.
///
/// We use SCREAMING_CASE, mirroring the names downstream consumers match on.
/// Extension grammars that need their own kinds use [`TokenKind::EXTENSION`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum TokenKind {
    // === Whitespace and line structure ===
    /// Line ending between lines of a construct
    LINE_ENDING,
    /// Line ending of a blank line
    BLANK_LINE_ENDING,
    /// Whitespace at the start of a line
    LINE_PREFIX,
    /// Whitespace at the end of a line
    LINE_SUFFIX,
    /// Whitespace inside a construct
    WHITESPACE,
    /// Two or more spaces before a line ending in text
    HARD_BREAK_TRAILING,

    // === Content chunks ===
    /// Group of lines that may hold definitions and a paragraph
    CONTENT,
    /// One line of content (content type: content)
    CHUNK_CONTENT,
    /// One line of paragraph or heading text (content type: text)
    CHUNK_TEXT,
    /// A run of string content, e.g. a label (content type: string)
    CHUNK_STRING,
    /// Plain characters
    DATA,

    // === Flow ===
    /// Paragraph
    PARAGRAPH,
    /// Thematic break (`***`)
    THEMATIC_BREAK,
    /// Run of thematic break markers
    THEMATIC_BREAK_SEQUENCE,
    /// ATX heading (`# a`)
    ATX_HEADING,
    /// Opening or closing `#` run
    ATX_HEADING_SEQUENCE,
    /// Heading text between the sequences
    ATX_HEADING_TEXT,

    // === Definitions ===
    /// Link reference definition (`[a]: b "c"`)
    DEFINITION,
    /// Definition label (`[a]`)
    DEFINITION_LABEL,
    /// `[` or `]` of a definition label
    DEFINITION_LABEL_MARKER,
    /// Text of a definition label
    DEFINITION_LABEL_STRING,
    /// `:` after the label
    DEFINITION_MARKER,
    /// Definition destination
    DEFINITION_DESTINATION,
    /// Enclosed destination (`<b>`)
    DEFINITION_DESTINATION_LITERAL,
    /// `<` or `>` of an enclosed destination
    DEFINITION_DESTINATION_LITERAL_MARKER,
    /// Bare destination (`b`)
    DEFINITION_DESTINATION_RAW,
    /// Text of a destination
    DEFINITION_DESTINATION_STRING,
    /// Definition title (`"c"`)
    DEFINITION_TITLE,
    /// Quote or paren around a definition title
    DEFINITION_TITLE_MARKER,
    /// Text of a definition title
    DEFINITION_TITLE_STRING,

    // === Labels, links, images ===
    /// Label start of an image (`![`)
    LABEL_IMAGE,
    /// `!` of an image label start
    LABEL_IMAGE_MARKER,
    /// Label start of a link (`[`)
    LABEL_LINK,
    /// `[` or `]` of a label
    LABEL_MARKER,
    /// Label end (`]`)
    LABEL_END,
    /// Whole label, start through end
    LABEL,
    /// Text between the label start and end
    LABEL_TEXT,
    /// Link
    LINK,
    /// Image
    IMAGE,
    /// Resource (`(b "c")`)
    RESOURCE,
    /// `(` or `)` of a resource
    RESOURCE_MARKER,
    /// Resource destination
    RESOURCE_DESTINATION,
    /// Enclosed resource destination (`<b>`)
    RESOURCE_DESTINATION_LITERAL,
    /// `<` or `>` of an enclosed resource destination
    RESOURCE_DESTINATION_LITERAL_MARKER,
    /// Bare resource destination
    RESOURCE_DESTINATION_RAW,
    /// Text of a resource destination
    RESOURCE_DESTINATION_STRING,
    /// Resource title
    RESOURCE_TITLE,
    /// Quote or paren around a resource title
    RESOURCE_TITLE_MARKER,
    /// Text of a resource title
    RESOURCE_TITLE_STRING,
    /// Full or collapsed reference (`[b]`, `[]`)
    REFERENCE,
    /// `[` or `]` of a reference
    REFERENCE_MARKER,
    /// Text of a full reference
    REFERENCE_STRING,

    // === Escapes ===
    /// Character escape (`\*`)
    CHARACTER_ESCAPE,
    /// `\` of a character escape
    CHARACTER_ESCAPE_MARKER,
    /// Escaped character
    CHARACTER_ESCAPE_VALUE,

    // === Attention ===
    /// Unresolved run of `*` or `_`
    ATTENTION_SEQUENCE,
    /// Emphasis (`*a*`)
    EMPHASIS,
    /// Emphasis delimiter
    EMPHASIS_SEQUENCE,
    /// Text inside emphasis
    EMPHASIS_TEXT,
    /// Strong (`**a**`)
    STRONG,
    /// Strong delimiter
    STRONG_SEQUENCE,
    /// Text inside strong
    STRONG_TEXT,

    /// Token defined by an extension grammar
    EXTENSION(&'static str),
}

impl TokenKind {
    /// Returns true for kinds that only hold whitespace or line endings.
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::LINE_ENDING
                | Self::BLANK_LINE_ENDING
                | Self::LINE_PREFIX
                | Self::LINE_SUFFIX
                | Self::WHITESPACE
        )
    }

    /// Returns true for chunk kinds, whose interior is re-tokenized later.
    pub fn is_chunk(self) -> bool {
        matches!(
            self,
            Self::CHUNK_CONTENT | Self::CHUNK_TEXT | Self::CHUNK_STRING
        )
    }
}

/// How the interior of a chunk token is re-tokenized after the outer pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// Block structure: blank lines, headings, breaks, content.
    Flow,
    /// Definitions followed by a paragraph.
    Content,
    /// Character escapes and data, nothing else (labels, destinations, titles).
    String,
    /// Full inline syntax (links, images, emphasis, escapes).
    Text,
}

//! ML Parser Tokens
//!
//! Token kinds produced by the markup lexer and consumed by the parser

use serde::Serialize;

use crate::parse_util::TextRange;

/// Token types for HTML-family parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenType {
    /// `<`
    StartTagStart,
    /// `</`
    EndTagStart,
    Name,
    /// `>`
    TagEnd,
    /// `/>`
    EmptyElementEnd,
    /// Whitespace inside tag headers, PIs and doctypes; skipped by the builder
    WhiteSpace,
    /// Whitespace in content; significant
    RealWhiteSpace,
    DataCharacters,
    /// `&#123;` or `&#x7B;`
    CharEntityRef,
    /// `&amp;`
    EntityRefToken,
    Eq,
    AttributeValueStartDelimiter,
    AttributeValueToken,
    AttributeValueEndDelimiter,
    /// Garbage inside a tag header
    TagCharacters,
    CommentStart,
    CommentCharacters,
    CommentEnd,
    ConditionalCommentStart,
    ConditionalCommentStartEnd,
    ConditionalCommentEndStart,
    ConditionalCommentEnd,
    CdataStart,
    CdataEnd,
    PiStart,
    PiTarget,
    PiEnd,
    DoctypeStart,
    DoctypeEnd,
    BadCharacter,
    /// Region lexed by an embedded dialect; kept as an opaque leaf
    Custom(&'static str),
    /// Region whose content is parsed lazily by an embedded dialect
    Lazy(&'static str),
}

impl TokenType {
    /// Tokens the builder steps over transparently
    pub fn is_skipped_whitespace(self) -> bool {
        self == TokenType::WhiteSpace
    }

    pub fn is_entity_ref(self) -> bool {
        matches!(self, TokenType::CharEntityRef | TokenType::EntityRefToken)
    }

    /// Extension token kinds that the tag loop consumes as opaque children
    pub fn is_custom(self) -> bool {
        matches!(self, TokenType::Custom(_) | TokenType::Lazy(_))
    }

    pub fn debug_name(self) -> String {
        let name = match self {
            TokenType::StartTagStart => "XML_START_TAG_START",
            TokenType::EndTagStart => "XML_END_TAG_START",
            TokenType::Name => "XML_NAME",
            TokenType::TagEnd => "XML_TAG_END",
            TokenType::EmptyElementEnd => "XML_EMPTY_ELEMENT_END",
            TokenType::WhiteSpace => "WHITE_SPACE",
            TokenType::RealWhiteSpace => "XML_REAL_WHITE_SPACE",
            TokenType::DataCharacters => "XML_DATA_CHARACTERS",
            TokenType::CharEntityRef => "XML_CHAR_ENTITY_REF",
            TokenType::EntityRefToken => "XML_ENTITY_REF_TOKEN",
            TokenType::Eq => "XML_EQ",
            TokenType::AttributeValueStartDelimiter => "XML_ATTRIBUTE_VALUE_START_DELIMITER",
            TokenType::AttributeValueToken => "XML_ATTRIBUTE_VALUE_TOKEN",
            TokenType::AttributeValueEndDelimiter => "XML_ATTRIBUTE_VALUE_END_DELIMITER",
            TokenType::TagCharacters => "XML_TAG_CHARACTERS",
            TokenType::CommentStart => "XML_COMMENT_START",
            TokenType::CommentCharacters => "XML_COMMENT_CHARACTERS",
            TokenType::CommentEnd => "XML_COMMENT_END",
            TokenType::ConditionalCommentStart => "XML_CONDITIONAL_COMMENT_START",
            TokenType::ConditionalCommentStartEnd => "XML_CONDITIONAL_COMMENT_START_END",
            TokenType::ConditionalCommentEndStart => "XML_CONDITIONAL_COMMENT_END_START",
            TokenType::ConditionalCommentEnd => "XML_CONDITIONAL_COMMENT_END",
            TokenType::CdataStart => "XML_CDATA_START",
            TokenType::CdataEnd => "XML_CDATA_END",
            TokenType::PiStart => "XML_PI_START",
            TokenType::PiTarget => "XML_PI_TARGET",
            TokenType::PiEnd => "XML_PI_END",
            TokenType::DoctypeStart => "XML_DOCTYPE_START",
            TokenType::DoctypeEnd => "XML_DOCTYPE_END",
            TokenType::BadCharacter => "XML_BAD_CHARACTER",
            TokenType::Custom(name) => return format!("CUSTOM:{}", name),
            TokenType::Lazy(name) => return format!("LAZY:{}", name),
        };
        name.to_string()
    }
}

/// A lexeme: its kind and where it sits in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenType,
    pub range: TextRange,
}

impl Token {
    pub fn new(kind: TokenType, range: TextRange) -> Self {
        Token { kind, range }
    }

    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.range.start..self.range.end]
    }
}

/// Build a source text and its token list from `(kind, text)` pairs.
///
/// Used by dialects that lex their own regions and by tests that need
/// token streams the reference lexer does not produce.
pub fn token_sequence(parts: &[(TokenType, &str)]) -> (String, Vec<Token>) {
    let mut source = String::new();
    let mut tokens = Vec::with_capacity(parts.len());
    for (kind, text) in parts {
        let start = source.len();
        source.push_str(text);
        tokens.push(Token::new(*kind, TextRange::new(start, source.len())));
    }
    (source, tokens)
}

//! Character Codes
//!
//! Character constants and classification helpers used by the markup lexer

pub const TAB: char = '\t';
pub const LF: char = '\n';
pub const VTAB: char = '\x0B';
pub const FF: char = '\x0C';
pub const CR: char = '\r';
pub const SPACE: char = ' ';

pub const DQ: char = '"';
pub const HASH: char = '#';
pub const AMPERSAND: char = '&';
pub const SQ: char = '\'';
pub const MINUS: char = '-';
pub const SLASH: char = '/';
pub const SEMICOLON: char = ';';
pub const LT: char = '<';
pub const EQ: char = '=';
pub const GT: char = '>';
pub const QUESTION: char = '?';

/// Check if character is markup whitespace
pub fn is_whitespace(ch: char) -> bool {
    matches!(ch, SPACE | TAB | LF | CR | VTAB | FF)
}

/// Check if character is a digit
pub fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}

/// Check if character is ASCII letter
pub fn is_ascii_letter(ch: char) -> bool {
    ch.is_ascii_alphabetic()
}

/// Check if character is ASCII hex digit
pub fn is_ascii_hex_digit(ch: char) -> bool {
    ch.is_ascii_hexdigit()
}

/// Check if character is a quote
pub fn is_quote(ch: char) -> bool {
    ch == SQ || ch == DQ
}

/// Check if character can start a tag name right after `<` or `</`
pub fn is_tag_name_start(ch: char) -> bool {
    is_ascii_letter(ch) || ch == HASH || ch == '_' || ch == ':' || !ch.is_ascii()
}

/// Check if character ends a name inside a tag header
pub fn is_name_end(ch: char) -> bool {
    is_whitespace(ch) || matches!(ch, GT | SLASH | EQ | LT | DQ | SQ)
}

/// Check if character can be part of an entity name (`&amp;`)
pub fn is_entity_name_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == MINUS || ch == '.'
}

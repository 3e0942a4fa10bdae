//! ML Parser Lexer
//!
//! Reference tokenizer for HTML-family markup. It never fails: every byte of
//! the input ends up in exactly one token, and malformed constructs are left
//! for the parser to report.

use serde::{Deserialize, Serialize};

use super::tokens::{Token, TokenType};
use crate::chars;
use crate::parse_util::TextRange;

/// Tokenization options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TokenizeOptions {
    /// Split `<!--[if IE]> ... <![endif]-->` into conditional comment delimiters
    pub conditional_comments: bool,
}

impl Default for TokenizeOptions {
    fn default() -> Self {
        TokenizeOptions {
            conditional_comments: true,
        }
    }
}

/// Tokenize markup source
pub fn tokenize(source: &str, options: &TokenizeOptions) -> Vec<Token> {
    let mut tokenizer = Tokenizer::new(source, options);
    tokenizer.tokenize();
    log::trace!(
        target: "markup.lexer",
        "tokenized {} bytes into {} tokens",
        source.len(),
        tokenizer.tokens.len()
    );
    tokenizer.tokens
}

struct Tokenizer<'s> {
    source: &'s str,
    pos: usize,
    tokens: Vec<Token>,
    conditional_comments: bool,
}

impl<'s> Tokenizer<'s> {
    fn new(source: &'s str, options: &TokenizeOptions) -> Self {
        Tokenizer {
            source,
            pos: 0,
            tokens: Vec::new(),
            conditional_comments: options.conditional_comments,
        }
    }

    fn tokenize(&mut self) {
        while let Some(ch) = self.peek() {
            let loop_start = self.pos;

            if ch == chars::LT {
                if self.starts_with("<!--") {
                    self.consume_comment();
                } else if self.starts_with("<![CDATA[") {
                    self.consume_cdata();
                } else if self.starts_with_ignore_case("<!DOCTYPE") {
                    self.consume_doc_type();
                } else if self.starts_with("<?") {
                    self.consume_processing_instruction();
                } else if self.starts_with("</") && self.peek_at(2).is_some_and(chars::is_tag_name_start) {
                    self.emit_len(TokenType::EndTagStart, 2);
                    self.consume_tag();
                } else if self.peek_at(1).is_some_and(chars::is_tag_name_start) {
                    self.emit_len(TokenType::StartTagStart, 1);
                    self.consume_tag();
                } else {
                    self.consume_text();
                }
            } else if ch == chars::AMPERSAND {
                self.consume_entity();
            } else if chars::is_whitespace(ch) {
                self.consume_whitespace(TokenType::RealWhiteSpace);
            } else {
                self.consume_text();
            }

            // Every branch consumes at least one character
            debug_assert!(self.pos > loop_start, "lexer is stuck at offset {}", loop_start);
        }
    }

    // Cursor helpers

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.source[self.pos..].chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn starts_with(&self, s: &str) -> bool {
        self.source[self.pos..].starts_with(s)
    }

    fn starts_with_ignore_case(&self, s: &str) -> bool {
        self.source
            .get(self.pos..self.pos + s.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(s))
    }

    fn emit(&mut self, kind: TokenType, start: usize) {
        if self.pos > start {
            self.tokens.push(Token::new(kind, TextRange::new(start, self.pos)));
        }
    }

    fn emit_len(&mut self, kind: TokenType, len: usize) {
        let start = self.pos;
        self.pos += len;
        self.emit(kind, start);
    }

    fn emit_while(&mut self, kind: TokenType, pred: impl Fn(char) -> bool) {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
        self.emit(kind, start);
    }

    /// Emit everything up to (not including) `terminator`, or up to the end
    /// of input. Returns whether the terminator was found.
    fn emit_until(&mut self, kind: TokenType, terminator: &str) -> bool {
        let start = self.pos;
        match self.source[self.pos..].find(terminator) {
            Some(idx) => {
                self.pos += idx;
                self.emit(kind, start);
                true
            }
            None => {
                self.pos = self.source.len();
                self.emit(kind, start);
                false
            }
        }
    }

    // Content

    fn at_markup_start(&self) -> bool {
        if !self.starts_with("<") {
            return false;
        }
        self.starts_with("<!--")
            || self.starts_with("<![CDATA[")
            || self.starts_with_ignore_case("<!DOCTYPE")
            || self.starts_with("<?")
            || (self.starts_with("</") && self.peek_at(2).is_some_and(chars::is_tag_name_start))
            || self.peek_at(1).is_some_and(chars::is_tag_name_start)
    }

    fn consume_text(&mut self) {
        let start = self.pos;
        // The first character is consumed unconditionally: it may be a `<`
        // that does not open any markup.
        self.bump();
        while let Some(ch) = self.peek() {
            if chars::is_whitespace(ch) || ch == chars::AMPERSAND || self.at_markup_start() {
                break;
            }
            self.bump();
        }
        self.emit(TokenType::DataCharacters, start);
    }

    fn consume_whitespace(&mut self, kind: TokenType) {
        self.emit_while(kind, chars::is_whitespace);
    }

    /// `&#123;`, `&#x7B;` and `&name;`; a lone `&` is a bad character
    fn consume_entity(&mut self) {
        let start = self.pos;
        let rest = &self.source[self.pos + 1..];

        let char_ref_len = if let Some(hex) = rest.strip_prefix("#x").or_else(|| rest.strip_prefix("#X")) {
            let digits = hex.chars().take_while(|c| chars::is_ascii_hex_digit(*c)).count();
            (digits > 0 && hex[digits..].starts_with(chars::SEMICOLON)).then_some(2 + digits + 1)
        } else if let Some(dec) = rest.strip_prefix('#') {
            let digits = dec.chars().take_while(|c| chars::is_digit(*c)).count();
            (digits > 0 && dec[digits..].starts_with(chars::SEMICOLON)).then_some(1 + digits + 1)
        } else {
            None
        };

        if let Some(len) = char_ref_len {
            self.pos += 1 + len;
            self.emit(TokenType::CharEntityRef, start);
            return;
        }

        let name_len = rest
            .chars()
            .take_while(|c| chars::is_entity_name_char(*c))
            .map(char::len_utf8)
            .sum::<usize>();
        let starts_with_letter = rest.chars().next().is_some_and(chars::is_ascii_letter);
        if name_len > 0 && starts_with_letter && rest[name_len..].starts_with(chars::SEMICOLON) {
            self.pos += 1 + name_len + 1;
            self.emit(TokenType::EntityRefToken, start);
        } else {
            self.bump();
            self.emit(TokenType::BadCharacter, start);
        }
    }

    // Comments and CDATA

    fn consume_comment(&mut self) {
        self.emit_len(TokenType::CommentStart, "<!--".len());

        if self.conditional_comments && self.starts_with("[if") && self.consume_conditional_comment() {
            return;
        }

        if self.emit_until(TokenType::CommentCharacters, "-->") {
            self.emit_len(TokenType::CommentEnd, "-->".len());
        }
    }

    /// `[if IE]> ... <![endif]-->`; returns false and consumes nothing when
    /// the header is incomplete, leaving a plain comment to be lexed instead
    fn consume_conditional_comment(&mut self) -> bool {
        let rest = &self.source[self.pos..];
        let Some(header_end) = rest.find("]>") else {
            return false;
        };
        if rest[..header_end].contains("-->") {
            return false;
        }

        self.emit_len(TokenType::ConditionalCommentStart, "[if".len());
        let condition_start = self.pos;
        self.pos += header_end - "[if".len();
        self.emit(TokenType::CommentCharacters, condition_start);
        self.emit_len(TokenType::ConditionalCommentStartEnd, "]>".len());

        if self.emit_until(TokenType::CommentCharacters, "<![endif]") {
            self.emit_len(TokenType::ConditionalCommentEndStart, "<![".len());
            self.emit_len(TokenType::ConditionalCommentEnd, "endif]".len());
            if self.starts_with("-->") {
                self.emit_len(TokenType::CommentEnd, "-->".len());
            } else if self.emit_until(TokenType::CommentCharacters, "-->") {
                self.emit_len(TokenType::CommentEnd, "-->".len());
            }
        }
        true
    }

    fn consume_cdata(&mut self) {
        self.emit_len(TokenType::CdataStart, "<![CDATA[".len());
        if self.emit_until(TokenType::DataCharacters, "]]>") {
            self.emit_len(TokenType::CdataEnd, "]]>".len());
        }
    }

    // Prolog

    fn consume_doc_type(&mut self) {
        self.emit_len(TokenType::DoctypeStart, "<!DOCTYPE".len());
        while let Some(ch) = self.peek() {
            if ch == chars::GT {
                self.emit_len(TokenType::DoctypeEnd, 1);
                return;
            } else if ch == chars::LT {
                return;
            } else if chars::is_whitespace(ch) {
                self.consume_whitespace(TokenType::WhiteSpace);
            } else if chars::is_quote(ch) {
                let start = self.pos;
                self.bump();
                while let Some(c) = self.bump() {
                    if c == ch {
                        break;
                    }
                }
                self.emit(TokenType::AttributeValueToken, start);
            } else {
                self.emit_while(TokenType::Name, |c| {
                    !chars::is_whitespace(c) && c != chars::GT && c != chars::LT && !chars::is_quote(c)
                });
            }
        }
    }

    fn consume_processing_instruction(&mut self) {
        self.emit_len(TokenType::PiStart, "<?".len());
        self.emit_while(TokenType::PiTarget, |c| !chars::is_name_end(c) && c != chars::QUESTION);

        while let Some(ch) = self.peek() {
            if self.starts_with("?>") {
                self.emit_len(TokenType::PiEnd, 2);
                return;
            } else if ch == chars::LT {
                return;
            } else if chars::is_whitespace(ch) {
                self.consume_whitespace(TokenType::WhiteSpace);
            } else if ch == chars::EQ {
                self.emit_len(TokenType::Eq, 1);
            } else if chars::is_quote(ch) {
                self.consume_quoted_value(ch);
            } else if !chars::is_name_end(ch) && ch != chars::QUESTION {
                self.emit_while(TokenType::Name, |c| !chars::is_name_end(c) && c != chars::QUESTION);
            } else {
                let start = self.pos;
                self.bump();
                self.emit(TokenType::TagCharacters, start);
            }
        }
    }

    // Tags

    /// Tag name plus header, after `<` or `</` was emitted
    fn consume_tag(&mut self) {
        self.emit_while(TokenType::Name, |c| !chars::is_name_end(c));

        while let Some(ch) = self.peek() {
            if chars::is_whitespace(ch) {
                self.consume_whitespace(TokenType::WhiteSpace);
            } else if ch == chars::GT {
                self.emit_len(TokenType::TagEnd, 1);
                return;
            } else if self.starts_with("/>") {
                self.emit_len(TokenType::EmptyElementEnd, 2);
                return;
            } else if ch == chars::LT {
                return;
            } else if ch == chars::EQ {
                self.emit_len(TokenType::Eq, 1);
                self.consume_whitespace(TokenType::WhiteSpace);
                self.consume_attribute_value();
            } else if chars::is_name_end(ch) {
                let start = self.pos;
                self.bump();
                self.emit(TokenType::TagCharacters, start);
            } else {
                self.emit_while(TokenType::Name, |c| !chars::is_name_end(c));
            }
        }
    }

    fn consume_attribute_value(&mut self) {
        match self.peek() {
            Some(quote) if chars::is_quote(quote) => self.consume_quoted_value(quote),
            Some(_) => self.emit_while(TokenType::AttributeValueToken, |c| {
                !chars::is_whitespace(c) && c != chars::GT && c != chars::LT
            }),
            None => {}
        }
    }

    fn consume_quoted_value(&mut self, quote: char) {
        self.emit_len(TokenType::AttributeValueStartDelimiter, quote.len_utf8());
        loop {
            match self.peek() {
                None => return,
                Some(ch) if ch == quote => {
                    self.emit_len(TokenType::AttributeValueEndDelimiter, quote.len_utf8());
                    return;
                }
                Some(chars::AMPERSAND) => self.consume_entity(),
                Some(_) => self.emit_while(TokenType::AttributeValueToken, |c| {
                    c != quote && c != chars::AMPERSAND
                }),
            }
        }
    }
}

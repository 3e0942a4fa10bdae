//! ML Parser
//!
//! Error-tolerant HTML parser over a token stream. Builds a concrete syntax
//! tree through the marker protocol of [`SyntaxBuilder`] and never fails:
//! malformed input becomes error nodes.
//!
//! Tag nesting is tracked on an explicit [`TagStack`]; the tag loop is
//! iterative, so deeply nested markup does not grow the native stack.

use super::ast::{ElementType, NodeKind, SyntaxTree};
use super::builder::{Marker, SyntaxBuilder};
use super::hooks::{DefaultHooks, ParsingHooks};
use super::html_tags::DefaultHtmlTagRules;
use super::messages::ParseMessage;
use super::tag_matching;
use super::tag_stack::{TagStack, TagStackStats};
use super::tags::{normalize_tag_name, HtmlTagRules};
use super::tokens::TokenType;

/// A parsed document
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    pub tree: SyntaxTree,
    pub stats: TagStackStats,
}

/// Main parser
pub struct HtmlParsing<H = DefaultHooks, R = DefaultHtmlTagRules> {
    builder: SyntaxBuilder,
    tags: TagStack,
    hooks: H,
    rules: R,
    /// Lowercased identifier an editor splices in at the caret
    completion_placeholder: Option<String>,
}

impl HtmlParsing {
    pub fn new(builder: SyntaxBuilder) -> Self {
        HtmlParsing::with_hooks(builder, DefaultHooks, DefaultHtmlTagRules)
    }
}

impl<H: ParsingHooks, R: HtmlTagRules> HtmlParsing<H, R> {
    pub fn with_hooks(builder: SyntaxBuilder, hooks: H, rules: R) -> Self {
        HtmlParsing {
            builder,
            tags: TagStack::new(),
            hooks,
            rules,
            completion_placeholder: None,
        }
    }

    /// End tags whose name ends with `placeholder` never trigger implicit
    /// closing; they are being typed.
    pub fn with_completion_placeholder(mut self, placeholder: Option<&str>) -> Self {
        self.completion_placeholder = placeholder
            .filter(|p| !p.is_empty())
            .map(normalize_tag_name);
        self
    }

    pub fn builder(&self) -> &SyntaxBuilder {
        &self.builder
    }

    pub fn tags(&self) -> &TagStack {
        &self.tags
    }

    // Document

    pub fn parse_document(mut self) -> ParsedDocument {
        let document = self.builder.mark();

        while self.token() == Some(TokenType::CommentStart) {
            self.parse_comment();
        }

        self.parse_prolog();

        let mut error: Option<Marker> = None;
        while self.should_continue_main_loop() {
            let Some(tt) = self.token() else { break };
            match tt {
                TokenType::StartTagStart => {
                    self.flush_error(&mut error);
                    self.parse_tag();
                }
                TokenType::CommentStart => {
                    self.flush_error(&mut error);
                    self.parse_comment();
                }
                TokenType::PiStart => {
                    self.flush_error(&mut error);
                    self.parse_processing_instruction();
                }
                TokenType::CharEntityRef | TokenType::EntityRefToken => {
                    self.parse_reference();
                }
                TokenType::RealWhiteSpace | TokenType::DataCharacters => {
                    self.flush_error(&mut error);
                    self.advance();
                }
                TokenType::EndTagStart => {
                    let stray = self.builder.mark();
                    self.advance();
                    if self.token() == Some(TokenType::Name) {
                        self.advance();
                        if self.token() == Some(TokenType::TagEnd) {
                            self.advance();
                        }
                    }
                    self.builder.error(stray, ParseMessage::ClosingTagMatchesNothing);
                }
                _ if self.hooks.has_custom_top_level_content(&self.builder, &self.tags) => {
                    error = self
                        .hooks
                        .parse_custom_top_level_content(&mut self.builder, &self.tags, error);
                }
                _ => {
                    if error.is_none() {
                        error = Some(self.builder.mark());
                    }
                    self.advance();
                }
            }
        }

        self.flush_open_tags();

        if let Some(error) = error {
            self.builder
                .error(error, ParseMessage::TopLevelElementNotCompleted);
        }

        self.builder
            .done(document, NodeKind::Element(ElementType::HtmlDocument));

        let stats = self.tags.stats();
        log::debug!(
            target: "markup.parser",
            "parsed document: {} tags opened, max depth {}",
            stats.pushes,
            stats.max_depth
        );

        ParsedDocument {
            tree: self.builder.finish(),
            stats,
        }
    }

    fn flush_error(&mut self, error: &mut Option<Marker>) {
        if let Some(marker) = error.take() {
            self.builder.error(marker, ParseMessage::UnexpectedTokens);
        }
    }

    /// Close every tag still open, innermost first
    pub fn flush_open_tags(&mut self) {
        while !self.tags.is_empty() {
            if self
                .hooks
                .is_end_tag_required(self.tags.peek_name(), &self.rules)
            {
                let original = self.tags.peek_original_name().to_string();
                log::trace!(target: "markup.parser", "<{}> left open at end of input", original);
                self.builder
                    .error_here(ParseMessage::ElementNotClosed(original));
            }
            self.done_tag();
        }
    }

    // Tag loop

    /// Parse from a start tag until the input runs out or a hook stops the
    /// loop. Content after the outermost tag closes is handled here too.
    pub fn parse_tag(&mut self) {
        debug_assert_eq!(self.token(), Some(TokenType::StartTagStart), "tag start expected");

        let mut text: Option<Marker> = None;
        while self.should_continue_main_loop()
            && self
                .hooks
                .should_continue_parsing_tag(&self.builder, &self.tags)
        {
            let Some(tt) = self.token() else { break };
            match tt {
                TokenType::StartTagStart => {
                    self.terminate_text(&mut text);
                    self.parse_start_tag();
                }
                TokenType::PiStart => {
                    self.terminate_text(&mut text);
                    self.parse_processing_instruction();
                }
                tt if tt.is_entity_ref() => {
                    self.terminate_text(&mut text);
                    self.parse_reference();
                }
                TokenType::CdataStart => {
                    self.terminate_text(&mut text);
                    self.parse_cdata();
                }
                TokenType::CommentStart => {
                    self.terminate_text(&mut text);
                    self.parse_comment();
                }
                TokenType::BadCharacter => {
                    self.terminate_text(&mut text);
                    let error = self.builder.mark();
                    self.advance();
                    self.builder.error(error, ParseMessage::UnescapedAmpersand);
                }
                tt if tt.is_custom() => {
                    self.terminate_text(&mut text);
                    self.hooks.remap_token(&mut self.builder, tt);
                    self.advance();
                }
                TokenType::EndTagStart => {
                    self.terminate_text(&mut text);
                    self.parse_end_tag();
                }
                TokenType::RealWhiteSpace | TokenType::DataCharacters if self.tags.is_empty() => {
                    self.terminate_text(&mut text);
                    self.advance();
                }
                _ if self.hooks.has_custom_tag_content(&self.builder, &self.tags) => {
                    text = self
                        .hooks
                        .parse_custom_tag_content(&mut self.builder, &self.tags, text);
                }
                _ => {
                    self.start_text(&mut text);
                    self.advance();
                }
            }
        }
        self.terminate_text(&mut text);
    }

    fn parse_start_tag(&mut self) {
        let tag = self.builder.mark();
        self.advance();

        let original_name = self.parse_open_tag_name();
        let name = normalize_tag_name(&original_name);

        while self.child_terminates_parent_in_stack(&name) {
            if !self.rules.is_optional_end(self.tags.peek_name()) {
                let message = ParseMessage::ElementNotClosed(self.tags.peek_original_name().to_string());
                let error = self.builder.precede(tag);
                self.builder.error_before(error, message, tag);
            }
            let top = self.tags.pop();
            log::trace!(
                target: "markup.parser",
                "<{}> implicitly closes <{}>",
                name,
                top.name
            );
            self.builder
                .done_before(top.marker, NodeKind::Element(self.hooks.tag_element_type()), tag);
        }

        self.push_tag(tag, name.clone(), original_name.clone());

        self.parse_tag_header(&name);

        match self.token() {
            Some(TokenType::EmptyElementEnd) => {
                self.advance();
                self.done_tag();
                return;
            }
            Some(TokenType::TagEnd) => self.advance(),
            _ => {
                self.builder.error_here(ParseMessage::TagStartNotClosed);
                self.done_tag();
                return;
            }
        }

        if self.hooks.is_single_tag(&name, &original_name, &self.rules) {
            // <br></br> collapses into a single element
            let footer = self.builder.mark();
            while self.token() == Some(TokenType::RealWhiteSpace) {
                self.advance();
            }
            if self.token() == Some(TokenType::EndTagStart) {
                self.advance();
                let matches = self.token() == Some(TokenType::Name)
                    && self
                        .builder
                        .token_text()
                        .is_some_and(|text| normalize_tag_name(text) == name);
                if matches {
                    self.advance();
                    self.builder.drop_marker(footer);
                    if self.token() == Some(TokenType::TagEnd) {
                        self.advance();
                    }
                    self.done_tag();
                    return;
                }
            }
            self.builder.rollback_to(footer);
            self.done_tag();
        }
    }

    fn parse_end_tag(&mut self) {
        let footer = self.builder.mark();
        self.advance();

        match self.parse_end_tag_name() {
            Some(end_name) => {
                let parent_name = self.tags.peek().map_or("", |entry| entry.name.as_str());
                if parent_name != end_name && !self.is_completion_name(&end_name) {
                    let parent_optional = self.rules.is_optional_end(parent_name);
                    let has_chances_to_match = !self.tags.is_empty()
                        && if self.rules.is_optional_end(&end_name) {
                            self.child_terminates_parent_in_stack(&end_name)
                        } else {
                            self.hooks.is_tag_name_further_in_stack(&end_name, &self.tags)
                        };

                    if has_chances_to_match {
                        self.builder.rollback_to(footer);
                        if !parent_optional {
                            let original = self.tags.peek_original_name().to_string();
                            self.builder
                                .error_here(ParseMessage::ElementNotClosed(original));
                        }
                        self.done_tag();
                    } else {
                        if self.token() == Some(TokenType::TagEnd) {
                            self.advance();
                        }
                        self.builder
                            .error(footer, ParseMessage::ClosingTagMatchesNothing);
                    }
                    return;
                }

                while !matches!(
                    self.token(),
                    None | Some(TokenType::TagEnd | TokenType::StartTagStart | TokenType::EndTagStart)
                ) {
                    self.builder.error_here(ParseMessage::UnexpectedToken);
                    self.advance();
                }
            }
            None => {
                self.builder.error_here(ParseMessage::ClosingTagNameMissing);
            }
        }
        self.builder.drop_marker(footer);

        if self.token() == Some(TokenType::TagEnd) {
            self.advance();
        } else {
            self.builder.error_here(ParseMessage::ClosingTagNotDone);
        }

        if self.hooks.has_real_tags(&self.tags) {
            self.done_tag();
        }
    }

    /// Name after `<`, or an error and the empty name
    pub fn parse_open_tag_name(&mut self) -> String {
        let name = match self.token() {
            Some(TokenType::Name) => self.builder.token_text().map(str::to_string),
            _ => None,
        };
        match name {
            Some(name) => {
                self.advance();
                name
            }
            None => {
                self.builder.error_here(ParseMessage::TagNameExpected);
                String::new()
            }
        }
    }

    /// Normalized name after `</`, if any
    pub fn parse_end_tag_name(&mut self) -> Option<String> {
        if self.token() != Some(TokenType::Name) {
            return None;
        }
        let name = self.builder.token_text().map(normalize_tag_name);
        self.advance();
        name
    }

    fn is_completion_name(&self, end_name: &str) -> bool {
        self.completion_placeholder
            .as_deref()
            .is_some_and(|placeholder| end_name.ends_with(placeholder))
    }

    fn should_continue_main_loop(&self) -> bool {
        self.hooks.should_continue_main_loop(&self.builder, &self.tags)
    }

    // Tag stack

    pub fn push_tag(&mut self, marker: Marker, name: String, original_name: String) {
        self.tags.push(marker, name, original_name);
    }

    /// Pop the innermost tag without sealing it
    pub fn close_tag(&mut self) -> Marker {
        self.tags.pop().marker
    }

    /// Pop and seal the innermost tag, then let it end its parent
    pub fn done_tag(&mut self) {
        let entry = self.tags.pop();
        self.builder
            .done(entry.marker, NodeKind::Element(self.hooks.tag_element_type()));
        self.terminate_auto_closing_parent_tag(entry.marker, &entry.name);
    }

    /// `<p>a<center>b</center>` ends the paragraph before `center`: a block
    /// element cannot live in an inline container whose end tag is optional.
    pub fn terminate_auto_closing_parent_tag(&mut self, tag: Marker, name: &str) {
        let Some(parent) = self.tags.peek() else { return };
        let parent_name = parent.name.as_str();

        let is_valid_parent =
            self.rules.is_inline_tag_container(parent_name) && self.rules.is_optional_end(parent_name);
        if is_valid_parent && self.rules.is_block_tag(name) && !self.rules.is_possibly_inline(name) {
            log::trace!(
                target: "markup.parser",
                "</{}> ends inline container <{}>",
                name,
                parent_name
            );
            let top = self.close_tag();
            self.builder
                .done_before(top, NodeKind::Element(self.hooks.tag_element_type()), tag);
        }
    }

    pub fn child_terminates_parent_in_stack(&self, child: &str) -> bool {
        let hooks = &self.hooks;
        let rules = &self.rules;
        tag_matching::child_terminates_parent_in_stack(child, self.tags.names(), |child, parent, level| {
            hooks.child_terminates_parent(child, parent, level, rules)
        })
    }

    // Header

    fn parse_tag_header(&mut self, name: &str) {
        // Template directives such as <#if cond> have free-form headers
        let opaque = name.starts_with('#');

        loop {
            let tt = self.token();
            if opaque {
                if matches!(
                    tt,
                    Some(
                        TokenType::EmptyElementEnd
                            | TokenType::TagEnd
                            | TokenType::EndTagStart
                            | TokenType::StartTagStart
                    )
                ) {
                    break;
                }
                self.advance();
            } else {
                match tt {
                    Some(TokenType::Name) => self.parse_attribute(),
                    Some(TokenType::CharEntityRef | TokenType::EntityRefToken) => self.parse_reference(),
                    _ if self
                        .hooks
                        .has_custom_tag_header_content(&self.builder, &self.tags) =>
                    {
                        self.hooks
                            .parse_custom_tag_header_content(&mut self.builder, &self.tags);
                    }
                    _ => break,
                }
            }

            if self.builder.eof() {
                break;
            }
        }
    }

    pub fn parse_attribute(&mut self) {
        debug_assert_eq!(self.token(), Some(TokenType::Name));
        let attribute = self.builder.mark();
        self.advance();
        if self.token() == Some(TokenType::Eq) {
            self.advance();
            self.parse_attribute_value();
        }
        self.builder
            .done(attribute, NodeKind::Element(self.hooks.attribute_element_type()));
    }

    pub fn parse_attribute_value(&mut self) {
        let value = self.builder.mark();

        if self.token() == Some(TokenType::AttributeValueStartDelimiter) {
            loop {
                match self.token() {
                    None
                    | Some(
                        TokenType::AttributeValueEndDelimiter
                        | TokenType::EndTagStart
                        | TokenType::EmptyElementEnd
                        | TokenType::StartTagStart,
                    ) => break,
                    Some(TokenType::BadCharacter) => {
                        let error = self.builder.mark();
                        self.advance();
                        self.builder.error(error, ParseMessage::UnescapedAmpersand);
                    }
                    Some(TokenType::EntityRefToken) => self.parse_reference(),
                    Some(tt) => {
                        self.hooks.remap_token(&mut self.builder, tt);
                        self.advance();
                    }
                }
            }

            if self.token() == Some(TokenType::AttributeValueEndDelimiter) {
                self.advance();
            } else {
                self.builder.error_here(ParseMessage::UnclosedAttributeValue);
            }
        } else if self.hooks.has_custom_attribute_value(&self.builder, &self.tags) {
            self.hooks
                .parse_custom_attribute_value(&mut self.builder, &self.tags);
        } else {
            match self.token() {
                None | Some(TokenType::TagEnd | TokenType::EmptyElementEnd) => {}
                Some(tt) => {
                    // Single token value
                    self.hooks.remap_token(&mut self.builder, tt);
                    self.advance();
                }
            }
        }

        self.builder.done(
            value,
            NodeKind::Element(self.hooks.attribute_value_element_type()),
        );
    }

    // Leaf constructs

    pub fn parse_prolog(&mut self) {
        loop {
            match self.token() {
                Some(TokenType::CommentStart) => self.parse_comment(),
                Some(TokenType::RealWhiteSpace) => self.advance(),
                _ => break,
            }
        }

        let prolog = self.builder.mark();
        loop {
            match self.token() {
                Some(TokenType::PiStart) => self.parse_processing_instruction(),
                Some(TokenType::DoctypeStart) => self.parse_doctype(),
                Some(TokenType::CommentStart) => self.parse_comment(),
                Some(TokenType::RealWhiteSpace) => self.advance(),
                _ => break,
            }
        }
        self.builder
            .done(prolog, NodeKind::Element(ElementType::XmlProlog));
    }

    pub fn parse_doctype(&mut self) {
        debug_assert_eq!(self.token(), Some(TokenType::DoctypeStart), "doctype start expected");
        let doctype = self.builder.mark();
        self.advance();

        while self.token() != Some(TokenType::DoctypeEnd) && !self.builder.eof() {
            self.advance();
        }
        if self.builder.eof() {
            self.builder.error_here(ParseMessage::UnexpectedEndOfFile);
        } else {
            self.advance();
        }

        self.builder
            .done(doctype, NodeKind::Element(ElementType::XmlDoctype));
    }

    pub fn parse_processing_instruction(&mut self) {
        debug_assert_eq!(self.token(), Some(TokenType::PiStart));
        let pi = self.builder.mark();
        self.advance();
        if matches!(self.token(), Some(TokenType::Name | TokenType::PiTarget)) {
            self.advance();
        }

        while self.token() == Some(TokenType::Name) {
            self.advance();
            if self.token() == Some(TokenType::Eq) {
                self.advance();
            } else {
                self.builder.error_here(ParseMessage::ExpectedAttributeEqSign);
            }
            self.parse_attribute_value();
        }

        if self.token() == Some(TokenType::PiEnd) {
            self.advance();
        } else {
            self.builder
                .error_here(ParseMessage::UnterminatedProcessingInstruction);
        }

        self.builder
            .done(pi, NodeKind::Element(ElementType::XmlProcessingInstruction));
    }

    pub fn parse_comment(&mut self) {
        let comment = self.builder.mark();
        self.advance();
        loop {
            match self.token() {
                Some(
                    TokenType::CommentCharacters
                    | TokenType::ConditionalCommentStart
                    | TokenType::ConditionalCommentStartEnd
                    | TokenType::ConditionalCommentEndStart
                    | TokenType::ConditionalCommentEnd,
                ) => self.advance(),
                Some(TokenType::EntityRefToken | TokenType::CharEntityRef) => self.parse_reference(),
                Some(TokenType::BadCharacter) => {
                    let error = self.builder.mark();
                    self.advance();
                    self.builder.error(error, ParseMessage::BadCharacter);
                }
                Some(TokenType::CommentEnd) => {
                    self.advance();
                    break;
                }
                _ => break,
            }
        }
        self.builder
            .done(comment, NodeKind::Element(ElementType::XmlComment));
    }

    pub fn parse_cdata(&mut self) {
        debug_assert_eq!(self.token(), Some(TokenType::CdataStart));
        let cdata = self.builder.mark();
        while self.token() != Some(TokenType::CdataEnd) && !self.builder.eof() {
            self.advance();
        }
        if !self.builder.eof() {
            self.advance();
        }
        self.builder
            .done(cdata, NodeKind::Element(ElementType::XmlCdata));
    }

    pub fn parse_reference(&mut self) {
        match self.token() {
            Some(TokenType::CharEntityRef) => self.advance(),
            Some(TokenType::EntityRefToken) => {
                let reference = self.builder.mark();
                self.advance();
                self.builder
                    .done(reference, NodeKind::Element(ElementType::XmlEntityRef));
            }
            other => panic!("entity reference expected, found {:?}", other),
        }
    }

    // Text runs

    fn start_text(&mut self, text: &mut Option<Marker>) {
        if text.is_none() {
            *text = Some(self.builder.mark());
        }
    }

    fn terminate_text(&mut self, text: &mut Option<Marker>) {
        if let Some(marker) = text.take() {
            self.builder
                .done(marker, NodeKind::Element(ElementType::XmlText));
        }
    }

    // Cursor

    fn token(&self) -> Option<TokenType> {
        self.builder.token()
    }

    fn advance(&mut self) {
        self.builder.advance();
    }
}

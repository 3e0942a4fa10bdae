//! Parsing hooks
//!
//! Override points for markup dialects embedded in HTML (template
//! languages and the like). Every method has a default that gives plain
//! HTML behaviour, so a dialect only implements what it changes.

use super::ast::ElementType;
use super::builder::{Marker, SyntaxBuilder};
use super::tag_matching;
use super::tag_stack::TagStack;
use super::tags::HtmlTagRules;
use super::tokens::TokenType;

/// Dialect strategy consulted by [`HtmlParsing`](super::parser::HtmlParsing).
///
/// Content hooks come in pairs: `has_*` is asked first and, when it answers
/// `true`, the matching `parse_*` must consume at least one token or the
/// surrounding loop will not make progress.
pub trait ParsingHooks {
    fn has_custom_top_level_content(&self, _builder: &SyntaxBuilder, _tags: &TagStack) -> bool {
        false
    }

    /// Handle top-level content. `error` is the pending "unexpected tokens"
    /// span; return it (possibly opened or sealed) to continue it.
    fn parse_custom_top_level_content(
        &mut self,
        _builder: &mut SyntaxBuilder,
        _tags: &TagStack,
        error: Option<Marker>,
    ) -> Option<Marker> {
        error
    }

    fn has_custom_tag_content(&self, _builder: &SyntaxBuilder, _tags: &TagStack) -> bool {
        false
    }

    /// Handle tag content. `text` is the pending text run marker.
    fn parse_custom_tag_content(
        &mut self,
        _builder: &mut SyntaxBuilder,
        _tags: &TagStack,
        text: Option<Marker>,
    ) -> Option<Marker> {
        text
    }

    fn has_custom_tag_header_content(&self, _builder: &SyntaxBuilder, _tags: &TagStack) -> bool {
        false
    }

    fn parse_custom_tag_header_content(&mut self, _builder: &mut SyntaxBuilder, _tags: &TagStack) {}

    fn has_custom_attribute_value(&self, _builder: &SyntaxBuilder, _tags: &TagStack) -> bool {
        false
    }

    fn parse_custom_attribute_value(&mut self, _builder: &mut SyntaxBuilder, _tags: &TagStack) {}

    /// Called before an opaque token is consumed; may call
    /// [`SyntaxBuilder::remap_current_token`]
    fn remap_token(&mut self, _builder: &mut SyntaxBuilder, _token: TokenType) {}

    fn tag_element_type(&self) -> ElementType {
        ElementType::HtmlTag
    }

    fn attribute_element_type(&self) -> ElementType {
        ElementType::XmlAttribute
    }

    fn attribute_value_element_type(&self) -> ElementType {
        ElementType::XmlAttributeValue
    }

    fn is_single_tag(&self, name: &str, _original_name: &str, rules: &dyn HtmlTagRules) -> bool {
        rules.is_single_tag(name)
    }

    /// Whether an element left open at end of input gets a diagnostic
    fn is_end_tag_required(&self, name: &str, rules: &dyn HtmlTagRules) -> bool {
        !rules.is_optional_end(name) && name != "html" && name != "body"
    }

    /// Per-level matching policy; `level` is the 1-based stack depth of
    /// `parent`
    fn child_terminates_parent(
        &self,
        child: &str,
        parent: &str,
        _level: usize,
        rules: &dyn HtmlTagRules,
    ) -> Option<bool> {
        tag_matching::child_terminates_parent(child, parent, rules)
    }

    /// Whether an end tag named `end_name` could still close some open tag
    fn is_tag_name_further_in_stack(&self, end_name: &str, tags: &TagStack) -> bool {
        tags.contains_name(end_name)
    }

    fn should_continue_main_loop(&self, builder: &SyntaxBuilder, _tags: &TagStack) -> bool {
        !builder.eof()
    }

    fn should_continue_parsing_tag(&self, _builder: &SyntaxBuilder, _tags: &TagStack) -> bool {
        true
    }

    /// Whether the stack holds tags an end tag may close. Dialects that push
    /// synthetic entries can exclude them here.
    fn has_real_tags(&self, tags: &TagStack) -> bool {
        !tags.is_empty()
    }
}

/// Plain HTML
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHooks;

impl ParsingHooks for DefaultHooks {}

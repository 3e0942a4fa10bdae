/**
 * Parsing Hooks Tests
 *
 * A small template dialect exercising every override point of
 * `ParsingHooks`: custom tokens, remapping, custom node types, content
 * hooks and stop conditions.
 */

#[path = "util/mod.rs"]
mod utils;

#[cfg(test)]
mod tests {
    use super::utils::*;
    use markup_parser::ml_parser::ast::{ElementType, NodeKind};
    use markup_parser::ml_parser::builder::{Marker, SyntaxBuilder};
    use markup_parser::ml_parser::hooks::{DefaultHooks, ParsingHooks};
    use markup_parser::ml_parser::html_parser::{HtmlParser, ParseOptions, ParseTreeResult};
    use markup_parser::ml_parser::html_tags::DefaultHtmlTagRules;
    use markup_parser::ml_parser::tag_stack::TagStack;
    use markup_parser::ml_parser::tags::HtmlTagRules;
    use markup_parser::ml_parser::tokens::{token_sequence, TokenType};

    const EXPRESSION: TokenType = TokenType::Custom("TEMPLATE_EXPRESSION");

    fn parse_with<H: ParsingHooks + Clone>(hooks: H, parts: &[(TokenType, &str)]) -> ParseTreeResult {
        let (text, tokens) = token_sequence(parts);
        HtmlParser::with_hooks(ParseOptions::default(), hooks, DefaultHtmlTagRules).parse_tokens(&text, tokens)
    }

    fn parse_source_with<H: ParsingHooks + Clone>(hooks: H, source: &str) -> ParseTreeResult {
        HtmlParser::with_hooks(ParseOptions::default(), hooks, DefaultHtmlTagRules).parse(source)
    }

    mod custom_tokens {
        use super::*;

        #[test]
        fn should_keep_custom_tokens_as_leaves_between_text_runs() {
            let result = parse_token_sequence(&[
                (TokenType::StartTagStart, "<"),
                (TokenType::Name, "div"),
                (TokenType::TagEnd, ">"),
                (TokenType::DataCharacters, "a"),
                (EXPRESSION, "{{x}}"),
                (TokenType::DataCharacters, "b"),
                (TokenType::EndTagStart, "</"),
                (TokenType::Name, "div"),
                (TokenType::TagEnd, ">"),
            ]);
            assert!(!result.has_errors());
            assert_eq!(
                result.tree.debug_dump(),
                [
                    "HTML_DOCUMENT",
                    "  XML_PROLOG",
                    "  HTML_TAG",
                    "    XML_START_TAG_START('<')",
                    "    XML_NAME('div')",
                    "    XML_TAG_END('>')",
                    "    XML_TEXT",
                    "      XML_DATA_CHARACTERS('a')",
                    "    CUSTOM:TEMPLATE_EXPRESSION('{{x}}')",
                    "    XML_TEXT",
                    "      XML_DATA_CHARACTERS('b')",
                    "    XML_END_TAG_START('</')",
                    "    XML_NAME('div')",
                    "    XML_TAG_END('>')",
                    "",
                ]
                .join("\n")
            );
        }

        #[derive(Clone, Default)]
        struct ExpressionRemapper;

        impl ParsingHooks for ExpressionRemapper {
            fn remap_token(&mut self, builder: &mut SyntaxBuilder, token: TokenType) {
                if token == TokenType::Lazy("TEMPLATE_BLOCK") {
                    builder.remap_current_token(EXPRESSION);
                }
            }
        }

        #[test]
        fn should_remap_lazy_tokens() {
            let result = parse_with(
                ExpressionRemapper,
                &[
                    (TokenType::StartTagStart, "<"),
                    (TokenType::Name, "p"),
                    (TokenType::TagEnd, ">"),
                    (TokenType::Lazy("TEMPLATE_BLOCK"), "{% x %}"),
                ],
            );
            let kinds: Vec<TokenType> = result
                .tree
                .root()
                .descendants()
                .filter_map(|node| node.token_type())
                .collect();
            assert!(kinds.contains(&EXPRESSION));
            assert!(!kinds.contains(&TokenType::Lazy("TEMPLATE_BLOCK")));
        }
    }

    mod node_types {
        use super::*;

        #[derive(Clone, Default)]
        struct TemplateNodeTypes;

        impl ParsingHooks for TemplateNodeTypes {
            fn tag_element_type(&self) -> ElementType {
                ElementType::Custom("TEMPLATE_TAG")
            }

            fn attribute_element_type(&self) -> ElementType {
                ElementType::Custom("TEMPLATE_ATTRIBUTE")
            }

            fn attribute_value_element_type(&self) -> ElementType {
                ElementType::Custom("TEMPLATE_ATTRIBUTE_VALUE")
            }
        }

        #[test]
        fn should_build_dialect_node_types() {
            let result = parse_source_with(TemplateNodeTypes, "<p a=b>x<p>y");
            assert_eq!(
                humanize_tree(&result.tree),
                rows(&[
                    &["TEMPLATE_TAG", "<p a=b>x", "0"],
                    &["TEMPLATE_ATTRIBUTE", "a=b", "1"],
                    &["TEMPLATE_ATTRIBUTE_VALUE", "b", "2"],
                    &["XML_TEXT", "x", "1"],
                    &["TEMPLATE_TAG", "<p>y", "0"],
                    &["XML_TEXT", "y", "1"],
                ])
            );
        }
    }

    mod tag_rules {
        use super::*;

        #[derive(Clone, Default)]
        struct IconsAreVoid;

        impl ParsingHooks for IconsAreVoid {
            fn is_single_tag(&self, name: &str, original_name: &str, rules: &dyn HtmlTagRules) -> bool {
                name == "icon" || DefaultHooks.is_single_tag(name, original_name, rules)
            }
        }

        #[test]
        fn should_treat_dialect_tags_as_void() {
            let result = parse_source_with(IconsAreVoid, "<icon><b>x</b>");
            assert_eq!(
                humanize_tree(&result.tree),
                rows(&[&["HTML_TAG", "icon", "0"], &["HTML_TAG", "b", "0"], &["XML_TEXT", "x", "1"]])
            );
            assert!(!result.has_errors());
        }

        #[derive(Clone, Default)]
        struct UmlautVoid;

        impl ParsingHooks for UmlautVoid {
            fn is_single_tag(&self, name: &str, _original_name: &str, _rules: &dyn HtmlTagRules) -> bool {
                name == "äbc"
            }
        }

        #[test]
        fn should_fold_void_end_tag_with_non_ascii_case() {
            let result = parse_source_with(UmlautVoid, "<äbc></ÄBC>");
            assert_eq!(humanize_tree(&result.tree), rows(&[&["HTML_TAG", "äbc", "0"]]));
            assert!(!result.has_errors());
            let tag = result.tree.root().children_of(ElementType::HtmlTag).next().unwrap();
            assert_eq!(tag.text(), "<äbc></ÄBC>");
        }

        #[derive(Clone, Default)]
        struct Lenient;

        impl ParsingHooks for Lenient {
            fn is_end_tag_required(&self, _name: &str, _rules: &dyn HtmlTagRules) -> bool {
                false
            }
        }

        #[test]
        fn should_not_require_end_tags_in_lenient_dialect() {
            let result = parse_source_with(Lenient, "<div><span>");
            assert!(!result.has_errors());
            assert_eq!(result.stats.pushes, result.stats.pops);
        }

        #[derive(Clone, Default)]
        struct FlatSections;

        impl ParsingHooks for FlatSections {
            fn child_terminates_parent(
                &self,
                child: &str,
                parent: &str,
                level: usize,
                rules: &dyn HtmlTagRules,
            ) -> Option<bool> {
                if child == "section" && parent == "section" && level == 1 {
                    return Some(true);
                }
                DefaultHooks.child_terminates_parent(child, parent, level, rules)
            }
        }

        #[test]
        fn should_consult_per_level_policy() {
            let result = parse_source_with(FlatSections, "<section>a<section>b");
            assert_eq!(
                humanize_tree(&result.tree),
                rows(&[
                    &["HTML_TAG", "section", "0"],
                    &["XML_TEXT", "a", "1"],
                    &["ERROR", "Element section is not closed", "1"],
                    &["HTML_TAG", "section", "0"],
                    &["XML_TEXT", "b", "1"],
                    &["ERROR", "Element section is not closed", "1"],
                ])
            );
        }

        #[derive(Clone, Default)]
        struct NoFurtherLookup;

        impl ParsingHooks for NoFurtherLookup {
            fn is_tag_name_further_in_stack(&self, _end_name: &str, _tags: &TagStack) -> bool {
                false
            }
        }

        #[test]
        fn should_consult_stack_lookup_for_mismatched_end_tags() {
            let result = parse_source_with(NoFurtherLookup, "<div><span></div>");
            assert_eq!(
                error_messages(&result),
                vec![
                    "Closing tag matches nothing",
                    "Element span is not closed",
                    "Element div is not closed",
                ]
            );
        }
    }

    mod content_hooks {
        use super::*;

        const DIRECTIVE: ElementType = ElementType::Custom("TEMPLATE_DIRECTIVE");

        /// `@if`-style directives in content, `@click` bindings in headers,
        /// `{{ ... }}` attribute values split across tokens and `---` front
        /// matter before the document
        #[derive(Clone, Default)]
        struct Directives;

        fn current_text_starts_with(builder: &SyntaxBuilder, prefix: &str) -> bool {
            builder.token_text().is_some_and(|text| text.starts_with(prefix))
        }

        fn single_token_node(builder: &mut SyntaxBuilder, kind: ElementType) {
            let marker = builder.mark();
            builder.advance();
            builder.done(marker, NodeKind::Element(kind));
        }

        impl ParsingHooks for Directives {
            fn has_custom_top_level_content(&self, builder: &SyntaxBuilder, _tags: &TagStack) -> bool {
                builder.token() == Some(TokenType::TagCharacters) && current_text_starts_with(builder, "---")
            }

            fn parse_custom_top_level_content(
                &mut self,
                builder: &mut SyntaxBuilder,
                _tags: &TagStack,
                error: Option<Marker>,
            ) -> Option<Marker> {
                single_token_node(builder, ElementType::Custom("FRONT_MATTER"));
                error
            }

            fn has_custom_tag_content(&self, builder: &SyntaxBuilder, _tags: &TagStack) -> bool {
                builder.token() == Some(TokenType::DataCharacters) && current_text_starts_with(builder, "@")
            }

            fn parse_custom_tag_content(
                &mut self,
                builder: &mut SyntaxBuilder,
                _tags: &TagStack,
                text: Option<Marker>,
            ) -> Option<Marker> {
                if let Some(text) = text {
                    builder.done(text, NodeKind::Element(ElementType::XmlText));
                }
                single_token_node(builder, DIRECTIVE);
                None
            }

            fn has_custom_tag_header_content(&self, builder: &SyntaxBuilder, _tags: &TagStack) -> bool {
                builder.token() == Some(TokenType::TagCharacters)
            }

            fn parse_custom_tag_header_content(&mut self, builder: &mut SyntaxBuilder, _tags: &TagStack) {
                single_token_node(builder, ElementType::Custom("EVENT_BINDING"));
            }

            fn has_custom_attribute_value(&self, builder: &SyntaxBuilder, _tags: &TagStack) -> bool {
                current_text_starts_with(builder, "{{")
            }

            fn parse_custom_attribute_value(&mut self, builder: &mut SyntaxBuilder, _tags: &TagStack) {
                while let Some(text) = builder.token_text() {
                    let closed = text.ends_with("}}");
                    builder.advance();
                    if closed {
                        break;
                    }
                }
            }
        }

        #[test]
        fn should_parse_custom_tag_content() {
            let result = parse_with(
                Directives,
                &[
                    (TokenType::StartTagStart, "<"),
                    (TokenType::Name, "div"),
                    (TokenType::TagEnd, ">"),
                    (TokenType::DataCharacters, "a"),
                    (TokenType::DataCharacters, "@if"),
                    (TokenType::DataCharacters, "b"),
                    (TokenType::EndTagStart, "</"),
                    (TokenType::Name, "div"),
                    (TokenType::TagEnd, ">"),
                ],
            );
            assert_eq!(
                humanize_tree(&result.tree),
                rows(&[
                    &["HTML_TAG", "div", "0"],
                    &["XML_TEXT", "a", "1"],
                    &["TEMPLATE_DIRECTIVE", "@if", "1"],
                    &["XML_TEXT", "b", "1"],
                ])
            );
            assert!(!result.has_errors());
        }

        #[test]
        fn should_parse_custom_tag_header_content() {
            let parts = [
                (TokenType::StartTagStart, "<"),
                (TokenType::Name, "div"),
                (TokenType::WhiteSpace, " "),
                (TokenType::TagCharacters, "@click"),
                (TokenType::TagEnd, ">"),
                (TokenType::EndTagStart, "</"),
                (TokenType::Name, "div"),
                (TokenType::TagEnd, ">"),
            ];
            let result = parse_with(Directives, &parts);
            assert_eq!(
                humanize_tree(&result.tree),
                rows(&[&["HTML_TAG", "div", "0"], &["EVENT_BINDING", "@click", "1"]])
            );
            assert!(!result.has_errors());

            let plain = parse_token_sequence(&parts);
            assert_eq!(
                error_messages(&plain),
                vec!["Tag start is not closed", "Closing tag matches nothing"]
            );
        }

        #[test]
        fn should_parse_custom_attribute_values() {
            let parts = [
                (TokenType::StartTagStart, "<"),
                (TokenType::Name, "a"),
                (TokenType::WhiteSpace, " "),
                (TokenType::Name, "href"),
                (TokenType::Eq, "="),
                (TokenType::AttributeValueToken, "{{"),
                (TokenType::AttributeValueToken, "x"),
                (TokenType::AttributeValueToken, "}}"),
                (TokenType::TagEnd, ">"),
                (TokenType::EndTagStart, "</"),
                (TokenType::Name, "a"),
                (TokenType::TagEnd, ">"),
            ];
            let result = parse_with(Directives, &parts);
            assert_eq!(
                humanize_tree(&result.tree),
                rows(&[
                    &["HTML_TAG", "a", "0"],
                    &["XML_ATTRIBUTE", "href={{x}}", "1"],
                    &["XML_ATTRIBUTE_VALUE", "{{x}}", "2"],
                ])
            );
            assert!(!result.has_errors());
        }

        #[test]
        fn should_parse_custom_top_level_content() {
            let result = parse_with(
                Directives,
                &[
                    (TokenType::TagCharacters, "---"),
                    (TokenType::StartTagStart, "<"),
                    (TokenType::Name, "a"),
                    (TokenType::TagEnd, ">"),
                    (TokenType::EndTagStart, "</"),
                    (TokenType::Name, "a"),
                    (TokenType::TagEnd, ">"),
                ],
            );
            assert_eq!(
                humanize_tree(&result.tree),
                rows(&[&["FRONT_MATTER", "---", "0"], &["HTML_TAG", "a", "0"]])
            );
            assert!(!result.has_errors());
        }
    }

    mod stop_conditions {
        use super::*;

        /// Stops at a `STOP` marker, leaving the rest to an outer parser
        #[derive(Clone, Default)]
        struct StopAtMarker;

        impl ParsingHooks for StopAtMarker {
            fn should_continue_main_loop(&self, builder: &SyntaxBuilder, _tags: &TagStack) -> bool {
                !builder.eof() && builder.token_text() != Some("STOP")
            }
        }

        #[test]
        fn should_stop_main_loop_and_keep_remaining_tokens() {
            let source = "<div>a</div>STOP<p>b";
            let result = parse_source_with(StopAtMarker, source);
            assert_eq!(
                humanize_tree(&result.tree),
                rows(&[&["HTML_TAG", "div", "0"], &["XML_TEXT", "a", "1"]])
            );
            assert_eq!(result.tree.leaf_text(), source);
            assert_eq!(result.stats.pushes, result.stats.pops);
        }

        #[test]
        fn should_flush_open_tags_when_stopped() {
            let result = parse_source_with(StopAtMarker, "<div><span>a STOP</span></div>");
            assert_eq!(
                error_messages(&result),
                vec!["Element span is not closed", "Element div is not closed"]
            );
            assert_eq!(result.stats.pushes, 2);
            assert_eq!(result.stats.pops, 2);
        }

        /// Hands control back once the stack is three deep
        #[derive(Clone, Default)]
        struct ShallowTags;

        impl ParsingHooks for ShallowTags {
            fn should_continue_parsing_tag(&self, _builder: &SyntaxBuilder, tags: &TagStack) -> bool {
                tags.level() < 3
            }

            fn should_continue_main_loop(&self, builder: &SyntaxBuilder, tags: &TagStack) -> bool {
                !builder.eof() && tags.level() < 3
            }
        }

        #[test]
        fn should_stop_tag_loop() {
            let result = parse_source_with(ShallowTags, "<a><b><c><d></d></c></b></a>");
            assert_eq!(result.stats.max_depth, 3);
            assert_eq!(result.stats.pushes, result.stats.pops);
            assert_eq!(result.tree.leaf_text(), "<a><b><c><d></d></c></b></a>");
        }
    }
}

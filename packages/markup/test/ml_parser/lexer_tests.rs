/**
 * Markup Lexer Tests
 *
 * Token streams produced by the reference lexer for every construct the
 * parser consumes, including the malformed ones.
 */

#[path = "util/mod.rs"]
mod utils;

#[cfg(test)]
mod markup_lexer_tests {
    use super::utils::*;
    use markup_parser::ml_parser::lexer::{tokenize, TokenizeOptions};

    fn humanize(source: &str) -> Vec<Vec<String>> {
        tokenize_and_humanize(source, TokenizeOptions::default())
    }

    mod tags {
        use super::*;

        #[test]
        fn should_tokenize_start_and_end_tags() {
            assert_eq!(
                humanize("<div>a</div>"),
                rows(&[
                    &["XML_START_TAG_START", "<"],
                    &["XML_NAME", "div"],
                    &["XML_TAG_END", ">"],
                    &["XML_DATA_CHARACTERS", "a"],
                    &["XML_END_TAG_START", "</"],
                    &["XML_NAME", "div"],
                    &["XML_TAG_END", ">"],
                ])
            );
        }

        #[test]
        fn should_tokenize_empty_element_end() {
            assert_eq!(
                humanize("<br/>"),
                rows(&[
                    &["XML_START_TAG_START", "<"],
                    &["XML_NAME", "br"],
                    &["XML_EMPTY_ELEMENT_END", "/>"],
                ])
            );
        }

        #[test]
        fn should_keep_whitespace_inside_headers_as_white_space() {
            assert_eq!(
                humanize("<a  b>"),
                rows(&[
                    &["XML_START_TAG_START", "<"],
                    &["XML_NAME", "a"],
                    &["WHITE_SPACE", "  "],
                    &["XML_NAME", "b"],
                    &["XML_TAG_END", ">"],
                ])
            );
        }

        #[test]
        fn should_stop_an_unterminated_header_at_the_next_tag() {
            assert_eq!(
                humanize("<div <span>"),
                rows(&[
                    &["XML_START_TAG_START", "<"],
                    &["XML_NAME", "div"],
                    &["WHITE_SPACE", " "],
                    &["XML_START_TAG_START", "<"],
                    &["XML_NAME", "span"],
                    &["XML_TAG_END", ">"],
                ])
            );
        }

        #[test]
        fn should_accept_template_directive_names() {
            assert_eq!(
                humanize("</#if>"),
                rows(&[
                    &["XML_END_TAG_START", "</"],
                    &["XML_NAME", "#if"],
                    &["XML_TAG_END", ">"],
                ])
            );
        }

        #[test]
        fn should_treat_a_lone_less_than_as_text() {
            assert_eq!(
                humanize("1 < 2"),
                rows(&[
                    &["XML_DATA_CHARACTERS", "1"],
                    &["XML_REAL_WHITE_SPACE", " "],
                    &["XML_DATA_CHARACTERS", "<"],
                    &["XML_REAL_WHITE_SPACE", " "],
                    &["XML_DATA_CHARACTERS", "2"],
                ])
            );
        }
    }

    mod attributes {
        use super::*;

        #[test]
        fn should_tokenize_unquoted_values() {
            assert_eq!(
                humanize("<input type=text disabled>"),
                rows(&[
                    &["XML_START_TAG_START", "<"],
                    &["XML_NAME", "input"],
                    &["WHITE_SPACE", " "],
                    &["XML_NAME", "type"],
                    &["XML_EQ", "="],
                    &["XML_ATTRIBUTE_VALUE_TOKEN", "text"],
                    &["WHITE_SPACE", " "],
                    &["XML_NAME", "disabled"],
                    &["XML_TAG_END", ">"],
                ])
            );
        }

        #[test]
        fn should_tokenize_quoted_values_with_entities() {
            assert_eq!(
                humanize("<a title='x&amp;y'>"),
                rows(&[
                    &["XML_START_TAG_START", "<"],
                    &["XML_NAME", "a"],
                    &["WHITE_SPACE", " "],
                    &["XML_NAME", "title"],
                    &["XML_EQ", "="],
                    &["XML_ATTRIBUTE_VALUE_START_DELIMITER", "'"],
                    &["XML_ATTRIBUTE_VALUE_TOKEN", "x"],
                    &["XML_ENTITY_REF_TOKEN", "&amp;"],
                    &["XML_ATTRIBUTE_VALUE_TOKEN", "y"],
                    &["XML_ATTRIBUTE_VALUE_END_DELIMITER", "'"],
                    &["XML_TAG_END", ">"],
                ])
            );
        }

        #[test]
        fn should_leave_an_unclosed_value_open() {
            assert_eq!(
                humanize("<a href=\"x"),
                rows(&[
                    &["XML_START_TAG_START", "<"],
                    &["XML_NAME", "a"],
                    &["WHITE_SPACE", " "],
                    &["XML_NAME", "href"],
                    &["XML_EQ", "="],
                    &["XML_ATTRIBUTE_VALUE_START_DELIMITER", "\""],
                    &["XML_ATTRIBUTE_VALUE_TOKEN", "x"],
                ])
            );
        }

        #[test]
        fn should_allow_whitespace_after_eq() {
            assert_eq!(
                humanize("<a b= c>"),
                rows(&[
                    &["XML_START_TAG_START", "<"],
                    &["XML_NAME", "a"],
                    &["WHITE_SPACE", " "],
                    &["XML_NAME", "b"],
                    &["XML_EQ", "="],
                    &["WHITE_SPACE", " "],
                    &["XML_ATTRIBUTE_VALUE_TOKEN", "c"],
                    &["XML_TAG_END", ">"],
                ])
            );
        }
    }

    mod entities {
        use super::*;

        #[test]
        fn should_tokenize_named_and_character_references() {
            assert_eq!(
                humanize("&amp;&#38;&#x26;"),
                rows(&[
                    &["XML_ENTITY_REF_TOKEN", "&amp;"],
                    &["XML_CHAR_ENTITY_REF", "&#38;"],
                    &["XML_CHAR_ENTITY_REF", "&#x26;"],
                ])
            );
        }

        #[test]
        fn should_mark_a_lone_ampersand_as_bad_character() {
            assert_eq!(
                humanize("a & b"),
                rows(&[
                    &["XML_DATA_CHARACTERS", "a"],
                    &["XML_REAL_WHITE_SPACE", " "],
                    &["XML_BAD_CHARACTER", "&"],
                    &["XML_REAL_WHITE_SPACE", " "],
                    &["XML_DATA_CHARACTERS", "b"],
                ])
            );
        }

        #[test]
        fn should_mark_unterminated_references_as_bad_character() {
            assert_eq!(
                humanize("&amp &#12"),
                rows(&[
                    &["XML_BAD_CHARACTER", "&"],
                    &["XML_DATA_CHARACTERS", "amp"],
                    &["XML_REAL_WHITE_SPACE", " "],
                    &["XML_BAD_CHARACTER", "&"],
                    &["XML_DATA_CHARACTERS", "#12"],
                ])
            );
        }
    }

    mod comments {
        use super::*;

        #[test]
        fn should_tokenize_comments() {
            assert_eq!(
                humanize("<!-- a -->"),
                rows(&[
                    &["XML_COMMENT_START", "<!--"],
                    &["XML_COMMENT_CHARACTERS", " a "],
                    &["XML_COMMENT_END", "-->"],
                ])
            );
        }

        #[test]
        fn should_leave_an_unterminated_comment_open() {
            assert_eq!(
                humanize("<!-- a"),
                rows(&[
                    &["XML_COMMENT_START", "<!--"],
                    &["XML_COMMENT_CHARACTERS", " a"],
                ])
            );
        }

        #[test]
        fn should_split_conditional_comments() {
            assert_eq!(
                humanize("<!--[if IE]><p>x</p><![endif]-->"),
                rows(&[
                    &["XML_COMMENT_START", "<!--"],
                    &["XML_CONDITIONAL_COMMENT_START", "[if"],
                    &["XML_COMMENT_CHARACTERS", " IE"],
                    &["XML_CONDITIONAL_COMMENT_START_END", "]>"],
                    &["XML_COMMENT_CHARACTERS", "<p>x</p>"],
                    &["XML_CONDITIONAL_COMMENT_END_START", "<!["],
                    &["XML_CONDITIONAL_COMMENT_END", "endif]"],
                    &["XML_COMMENT_END", "-->"],
                ])
            );
        }

        #[test]
        fn should_not_split_conditional_comments_when_disabled() {
            let options = TokenizeOptions {
                conditional_comments: false,
            };
            assert_eq!(
                tokenize_and_humanize("<!--[if IE]>x<![endif]-->", options),
                rows(&[
                    &["XML_COMMENT_START", "<!--"],
                    &["XML_COMMENT_CHARACTERS", "[if IE]>x<![endif]"],
                    &["XML_COMMENT_END", "-->"],
                ])
            );
        }
    }

    mod cdata_and_prolog {
        use super::*;

        #[test]
        fn should_tokenize_cdata() {
            assert_eq!(
                humanize("<![CDATA[a<b]]>"),
                rows(&[
                    &["XML_CDATA_START", "<![CDATA["],
                    &["XML_DATA_CHARACTERS", "a<b"],
                    &["XML_CDATA_END", "]]>"],
                ])
            );
        }

        #[test]
        fn should_tokenize_doctype_case_insensitively() {
            assert_eq!(
                humanize("<!doctype html>"),
                rows(&[
                    &["XML_DOCTYPE_START", "<!doctype"],
                    &["WHITE_SPACE", " "],
                    &["XML_NAME", "html"],
                    &["XML_DOCTYPE_END", ">"],
                ])
            );
        }

        #[test]
        fn should_tokenize_processing_instructions() {
            assert_eq!(
                humanize("<?xml version=\"1.0\"?>"),
                rows(&[
                    &["XML_PI_START", "<?"],
                    &["XML_PI_TARGET", "xml"],
                    &["WHITE_SPACE", " "],
                    &["XML_NAME", "version"],
                    &["XML_EQ", "="],
                    &["XML_ATTRIBUTE_VALUE_START_DELIMITER", "\""],
                    &["XML_ATTRIBUTE_VALUE_TOKEN", "1.0"],
                    &["XML_ATTRIBUTE_VALUE_END_DELIMITER", "\""],
                    &["XML_PI_END", "?>"],
                ])
            );
        }
    }

    mod coverage {
        use super::*;

        #[test]
        fn should_cover_every_byte_of_malformed_input() {
            let inputs = [
                "<div <p class=\"a>b</",
                "<!-- <![CDATA[ &",
                "<?php <?= &#x; ?>",
                "</ >< / >",
                "<t a='&' b=\"&bogus\" c=>",
                "ünïcödé <é>ü</é>",
            ];
            for source in inputs {
                let joined: String = humanize(source).into_iter().map(|row| row[1].clone()).collect();
                assert_eq!(joined, source, "tokens of {:?}", source);
            }
        }
    }
}

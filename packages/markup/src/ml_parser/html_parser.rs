//! HTML Parser
//!
//! Front door: tokenize, parse and lift diagnostics out of the tree

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ast::SyntaxTree;
use super::builder::SyntaxBuilder;
use super::hooks::{DefaultHooks, ParsingHooks};
use super::html_tags::DefaultHtmlTagRules;
use super::lexer::{tokenize, TokenizeOptions};
use super::parser::HtmlParsing;
use super::tag_stack::TagStackStats;
use super::tags::HtmlTagRules;
use super::tokens::Token;
use crate::parse_util::{ParseError, ParseSourceFile};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid parser options: {0}")]
    Json(#[from] serde_json::Error),
    #[error("completion placeholder must not be empty")]
    EmptyPlaceholder,
}

/// Parser options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParseOptions {
    /// Identifier an editor inserts at the caret during completion; end tags
    /// ending with it never trigger implicit closing
    pub completion_placeholder: Option<String>,
    pub tokenize: TokenizeOptions,
    /// Shown in located error messages
    pub url: String,
}

impl ParseOptions {
    /// Options from a JSON object; missing keys keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let options: ParseOptions = serde_json::from_str(json)?;
        if options.completion_placeholder.as_deref() == Some("") {
            return Err(ConfigError::EmptyPlaceholder);
        }
        Ok(options)
    }
}

/// Parse tree result
#[derive(Debug, Clone)]
pub struct ParseTreeResult {
    pub tree: SyntaxTree,
    pub errors: Vec<ParseError>,
    pub stats: TagStackStats,
}

impl ParseTreeResult {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// HTML parser with pluggable dialect hooks and tag tables
pub struct HtmlParser<H = DefaultHooks, R = DefaultHtmlTagRules> {
    options: ParseOptions,
    hooks: H,
    rules: R,
}

impl HtmlParser {
    pub fn new() -> Self {
        Self::with_options(ParseOptions::default())
    }

    pub fn with_options(options: ParseOptions) -> Self {
        HtmlParser {
            options,
            hooks: DefaultHooks,
            rules: DefaultHtmlTagRules,
        }
    }
}

impl Default for HtmlParser {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: ParsingHooks + Clone, R: HtmlTagRules + Clone> HtmlParser<H, R> {
    pub fn with_hooks(options: ParseOptions, hooks: H, rules: R) -> Self {
        HtmlParser {
            options,
            hooks,
            rules,
        }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse HTML source
    pub fn parse(&self, source: &str) -> ParseTreeResult {
        let tokens = tokenize(source, &self.options.tokenize);
        self.parse_tokens(source, tokens)
    }

    /// Parse a token stream produced by another lexer. Token ranges must
    /// cover `text` in order.
    pub fn parse_tokens(&self, text: &str, tokens: Vec<Token>) -> ParseTreeResult {
        let builder = SyntaxBuilder::new(text.to_string(), tokens);
        let document = HtmlParsing::with_hooks(builder, self.hooks.clone(), self.rules.clone())
            .with_completion_placeholder(self.options.completion_placeholder.as_deref())
            .parse_document();

        let file = ParseSourceFile::new(text.to_string(), self.options.url.clone());
        let errors: Vec<ParseError> = document
            .tree
            .diagnostics()
            .into_iter()
            .map(|diagnostic| ParseError::new(file.span(diagnostic.range), diagnostic.message))
            .collect();

        if !errors.is_empty() {
            let structural = errors.iter().filter(|e| e.message.is_structural()).count();
            log::debug!(
                target: "markup.parser",
                "{} diagnostics ({} structural) in {}",
                errors.len(),
                structural,
                if file.url.is_empty() { "<input>" } else { file.url.as_str() }
            );
        }

        ParseTreeResult {
            tree: document.tree,
            errors,
            stats: document.stats,
        }
    }
}

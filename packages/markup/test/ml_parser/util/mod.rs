#![allow(dead_code)]

//! ML Parser Test Utilities
//!
//! Helpers shared by the ml_parser integration tests

use markup_parser::ml_parser::ast::{ElementType, NodeKind, SyntaxNode, SyntaxTree};
use markup_parser::ml_parser::html_parser::{HtmlParser, ParseTreeResult};
use markup_parser::ml_parser::lexer::{tokenize, TokenizeOptions};
use markup_parser::ml_parser::tokens::{token_sequence, TokenType};

pub fn parse(source: &str) -> ParseTreeResult {
    HtmlParser::new().parse(source)
}

/// Parse a hand-built token stream with the default hooks
pub fn parse_token_sequence(parts: &[(TokenType, &str)]) -> ParseTreeResult {
    let (text, tokens) = token_sequence(parts);
    HtmlParser::new().parse_tokens(&text, tokens)
}

/// One row per composite or error node: `[kind, label, depth]`.
///
/// Tags are labelled with their name, errors with their message and every
/// other node with its source text. Leaf tokens and empty prologs are
/// skipped; children of the document have depth 0.
pub fn humanize_tree(tree: &SyntaxTree) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    for child in tree.root().children() {
        humanize_node(child, 0, &mut rows);
    }
    rows
}

fn humanize_node(node: SyntaxNode<'_>, depth: usize, rows: &mut Vec<Vec<String>>) {
    let label = match node.kind() {
        NodeKind::Token(_) => return,
        NodeKind::Element(ElementType::XmlProlog) if node.range().is_empty() => return,
        NodeKind::Element(ElementType::HtmlTag) => node.tag_name().unwrap_or("").to_string(),
        NodeKind::Element(_) => node.text().to_string(),
        NodeKind::Error(message) => message.to_string(),
    };
    rows.push(vec![node.kind().debug_name(), label, depth.to_string()]);
    for child in node.children() {
        humanize_node(child, depth + 1, rows);
    }
}

pub fn humanize_dom(source: &str) -> Vec<Vec<String>> {
    humanize_tree(&parse(source).tree)
}

pub fn error_messages(result: &ParseTreeResult) -> Vec<String> {
    result.errors.iter().map(|e| e.msg()).collect()
}

/// `[TOKEN_KIND, text]` per token
pub fn tokenize_and_humanize(source: &str, options: TokenizeOptions) -> Vec<Vec<String>> {
    tokenize(source, &options)
        .iter()
        .map(|token| vec![token.kind.debug_name(), token.text(source).to_string()])
        .collect()
}

/// Build expected rows from string literals
pub fn rows(expected: &[&[&str]]) -> Vec<Vec<String>> {
    expected
        .iter()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect()
}

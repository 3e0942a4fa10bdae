//! ML (Markup Language) Parser Module
//!
//! Error-tolerant HTML parsing into a concrete syntax tree

pub mod ast;
pub mod builder;
pub mod hooks;
pub mod html_parser;
pub mod html_tags;
pub mod lexer;
pub mod messages;
pub mod parser;
pub mod tag_matching;
pub mod tag_stack;
pub mod tags;
pub mod tokens;

pub use ast::{Diagnostic, ElementType, NodeId, NodeKind, SyntaxNode, SyntaxTree};
pub use builder::{Marker, SyntaxBuilder};
pub use hooks::{DefaultHooks, ParsingHooks};
pub use html_parser::{ConfigError, HtmlParser, ParseOptions, ParseTreeResult};
pub use html_tags::{get_html_tag_definition, DefaultHtmlTagRules, HtmlTagDefinition, TagFlags};
pub use lexer::{tokenize, TokenizeOptions};
pub use messages::ParseMessage;
pub use parser::{HtmlParsing, ParsedDocument};
pub use tag_matching::{child_terminates_parent, child_terminates_parent_in_stack};
pub use tag_stack::{TagStack, TagStackEntry, TagStackStats};
pub use tags::{normalize_tag_name, HtmlTagRules};
pub use tokens::{token_sequence, Token, TokenType};

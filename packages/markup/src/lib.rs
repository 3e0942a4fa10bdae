#![deny(clippy::all)]

//! Markup Parser
//!
//! Resilient HTML-family parser for editor front ends. Malformed input never
//! fails the parse; it produces a best-effort concrete syntax tree with
//! error nodes. Embedded template dialects plug in through
//! [`ml_parser::ParsingHooks`].

pub mod chars;
pub mod ml_parser;
pub mod parse_util;

pub use ml_parser::{HtmlParser, ParseOptions, ParseTreeResult};

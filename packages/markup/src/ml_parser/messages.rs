//! Parse messages
//!
//! Catalog of every diagnostic the markup parser can attach to the tree

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
#[serde(tag = "code", content = "arg", rename_all = "kebab-case")]
pub enum ParseMessage {
    // Structural
    #[error("Element {0} is not closed")]
    ElementNotClosed(String),
    #[error("Tag start is not closed")]
    TagStartNotClosed,
    #[error("Closing tag matches nothing")]
    ClosingTagMatchesNothing,
    #[error("Unexpected tokens")]
    UnexpectedTokens,
    #[error("Top level element is not completed")]
    TopLevelElementNotCompleted,
    #[error("Tag name expected")]
    TagNameExpected,
    #[error("Closing tag name missing")]
    ClosingTagNameMissing,
    #[error("Closing tag is not done")]
    ClosingTagNotDone,
    #[error("Unexpected token")]
    UnexpectedToken,

    // Lexical
    #[error("Unescaped & or nonterminated character/entity reference")]
    UnescapedAmpersand,
    #[error("Bad character")]
    BadCharacter,
    #[error("Unclosed attribute value")]
    UnclosedAttributeValue,
    #[error("Unterminated processing instruction")]
    UnterminatedProcessingInstruction,
    #[error("Unexpected end of file")]
    UnexpectedEndOfFile,

    // Attribute
    #[error("'=' expected")]
    ExpectedAttributeEqSign,

    /// Free-form message reported by a dialect hook
    #[error("{0}")]
    Custom(String),
}

impl ParseMessage {
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            ParseMessage::ElementNotClosed(_)
                | ParseMessage::TagStartNotClosed
                | ParseMessage::ClosingTagMatchesNothing
                | ParseMessage::UnexpectedTokens
                | ParseMessage::TopLevelElementNotCompleted
                | ParseMessage::TagNameExpected
                | ParseMessage::ClosingTagNameMissing
                | ParseMessage::ClosingTagNotDone
                | ParseMessage::UnexpectedToken
        )
    }
}

//! Core token type
//!
//!     Token kinds, in the precedence the tokenizer applies them:
//!
//!         - Variable: `$name`
//!         - Identifier: words, including `\` separated namespace paths
//!         - StringLiteral: single or double quoted, backslash escapes, never spans lines
//!         - Number: decimal, decimal with fraction, hexadecimal
//!         - Comment: `//` to the end of the line
//!         - Operator: multi character operators first, then single character ones
//!         - Whitespace: spaces, tabs, carriage returns, newlines
//!         - SingleChar: anything else, one token per character
//!
//!     Delimiters such as `(` `)` `;` `,` are not operators and come out as SingleChar.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::mover::line::LineId;

/// The semantic category of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    Variable,
    Identifier,
    StringLiteral,
    Number,
    Comment,
    Operator,
    Whitespace,
    SingleChar,
}

impl TokenKind {
    /// String literals and comments hide their contents from delimiter balancing.
    pub fn is_opaque(&self) -> bool {
        matches!(self, TokenKind::StringLiteral | TokenKind::Comment)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Variable => "VARIABLE",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::StringLiteral => "STRING_LITERAL",
            TokenKind::Number => "NUMBER",
            TokenKind::Comment => "COMMENT",
            TokenKind::Operator => "OPERATOR",
            TokenKind::Whitespace => "WHITESPACE",
            TokenKind::SingleChar => "SINGLE_CHAR",
        };
        write!(f, "{}", name)
    }
}

/// A classified substring of a line.
///
/// Tokens are immutable. `origin` is a lookup handle, not ownership: resolve it through the
/// collection that holds the line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    kind: TokenKind,
    value: String,
    origin: LineId,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, origin: LineId) -> Self {
        Self {
            kind,
            value: value.into(),
            origin,
        }
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Id of the line this token was cut from
    pub fn origin(&self) -> LineId {
        self.origin
    }

    pub fn is_kind(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind, self.value)
    }
}

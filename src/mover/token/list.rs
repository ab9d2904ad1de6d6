//! Ordered token container and search cursor

use std::fmt;

use serde::{Deserialize, Serialize};

use super::core::{Token, TokenKind};
use crate::mover::collection::LineSelection;
use crate::mover::error::{MoverError, MoverResult};
use crate::mover::line::LineId;

/// An ordered sequence of tokens, in source appearance order.
///
/// Filtering returns new lists and keeps the relative order of the survivors. Nothing is ever
/// de-duplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenList {
    tokens: Vec<Token>,
}

impl TokenList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    /// Tokens of the given kind, order preserved
    pub fn filter_by_kind(&self, kind: TokenKind) -> TokenList {
        self.tokens
            .iter()
            .filter(|token| token.is_kind(kind))
            .cloned()
            .collect()
    }

    /// Values of the tokens of the given kind, order preserved
    pub fn values_by_kind(&self, kind: TokenKind) -> Vec<&str> {
        self.tokens
            .iter()
            .filter(|token| token.is_kind(kind))
            .map(Token::value)
            .collect()
    }

    pub fn values(&self) -> Vec<&str> {
        self.tokens.iter().map(Token::value).collect()
    }

    /// Concatenated token values. For a freshly tokenized span this is the span's text.
    pub fn text(&self) -> String {
        self.tokens.iter().map(Token::value).collect()
    }

    /// `(KIND, value)` pairs, handy for assertions and dumps
    pub fn kinds_and_values(&self) -> Vec<(String, String)> {
        self.tokens
            .iter()
            .map(|token| (token.kind().to_string(), token.value().to_string()))
            .collect()
    }

    /// Cursor at the first token of the given kind
    pub fn seek_kind(&self, kind: TokenKind) -> MoverResult<TokenCursor<'_>> {
        self.seek_from(0, |token| token.is_kind(kind))
            .ok_or_else(|| MoverError::NotFound(format!("Could not find token of kind {}", kind)))
    }

    /// Cursor at the first token with exactly this value
    pub fn seek_value(&self, value: &str) -> MoverResult<TokenCursor<'_>> {
        self.seek_from(0, |token| token.value() == value).ok_or_else(|| {
            MoverError::NotFound(format!("Could not find token with value {:?}", value))
        })
    }

    /// The first token
    pub fn token(&self) -> MoverResult<&Token> {
        self.tokens
            .first()
            .ok_or_else(|| MoverError::NotFound("No token found at offset 0".to_string()))
    }

    /// Distinct origin lines, in first-seen order
    pub fn lines(&self) -> LineSelection {
        let mut ids: Vec<LineId> = Vec::new();
        for token in &self.tokens {
            if !ids.contains(&token.origin()) {
                ids.push(token.origin());
            }
        }
        LineSelection::from_ids(ids)
    }

    fn seek_from<F>(&self, start: usize, predicate: F) -> Option<TokenCursor<'_>>
    where
        F: Fn(&Token) -> bool,
    {
        self.tokens
            .iter()
            .enumerate()
            .skip(start)
            .find(|(_, token)| predicate(token))
            .map(|(position, _)| TokenCursor {
                list: self,
                position,
            })
    }
}

impl fmt::Display for TokenList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.tokens.iter().map(Token::to_string).collect();
        write!(f, "{}", rendered.join(" "))
    }
}

impl FromIterator<Token> for TokenList {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        Self {
            tokens: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<Token>> for TokenList {
    fn from(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }
}

impl Extend<Token> for TokenList {
    fn extend<I: IntoIterator<Item = Token>>(&mut self, iter: I) {
        self.tokens.extend(iter);
    }
}

impl IntoIterator for TokenList {
    type Item = Token;
    type IntoIter = std::vec::IntoIter<Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.into_iter()
    }
}

impl<'a> IntoIterator for &'a TokenList {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

/// A position inside a [TokenList], produced by a seek.
///
/// Always points at an existing token.
#[derive(Debug, Clone, Copy)]
pub struct TokenCursor<'a> {
    list: &'a TokenList,
    position: usize,
}

impl<'a> TokenCursor<'a> {
    pub fn token(&self) -> &'a Token {
        &self.list.tokens[self.position]
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// The cursor one token further on, if any
    pub fn advance(&self) -> Option<TokenCursor<'a>> {
        let position = self.position + 1;
        (position < self.list.len()).then_some(TokenCursor {
            list: self.list,
            position,
        })
    }

    /// Next token of the given kind strictly after this cursor
    pub fn seek_kind(&self, kind: TokenKind) -> MoverResult<TokenCursor<'a>> {
        self.list
            .seek_from(self.position + 1, |token| token.is_kind(kind))
            .ok_or_else(|| {
                MoverError::NotFound(format!(
                    "Could not find token of kind {} after offset {}",
                    kind, self.position
                ))
            })
    }

    /// Next token with this value strictly after this cursor
    pub fn seek_value(&self, value: &str) -> MoverResult<TokenCursor<'a>> {
        self.list
            .seek_from(self.position + 1, |token| token.value() == value)
            .ok_or_else(|| {
                MoverError::NotFound(format!(
                    "Could not find token with value {:?} after offset {}",
                    value, self.position
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mover::error::ErrorKind;

    fn sample() -> (LineId, TokenList) {
        let line = LineId::next();
        let list = TokenList::from(vec![
            Token::new(TokenKind::Identifier, "arf", line),
            Token::new(TokenKind::Operator, "barf", line),
            Token::new(TokenKind::Identifier, "garf", line),
        ]);
        (line, list)
    }

    #[test]
    fn test_filter_by_kind() {
        let (_, list) = sample();
        let filtered = list.filter_by_kind(TokenKind::Identifier);
        assert_eq!(filtered.values(), vec!["arf", "garf"]);
    }

    #[test]
    fn test_values_by_kind() {
        let (_, list) = sample();
        assert_eq!(list.values_by_kind(TokenKind::Identifier), vec!["arf", "garf"]);
        assert!(list.values_by_kind(TokenKind::Number).is_empty());
    }

    #[test]
    fn test_seek_kind() {
        let (_, list) = sample();
        let cursor = list.seek_kind(TokenKind::Operator).unwrap();
        assert_eq!(cursor.token().value(), "barf");
        assert_eq!(cursor.position(), 1);
    }

    #[test]
    fn test_seek_value() {
        let (_, list) = sample();
        let token = list.seek_value("barf").unwrap().token();
        assert_eq!(token.kind(), TokenKind::Operator);
    }

    #[test]
    fn test_seek_not_found() {
        let (_, list) = sample();
        let err = list.seek_value("NOTKNOWN").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.to_string().contains("Could not find token"));

        let err = list.seek_kind(TokenKind::Number).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_cursor_continues_after_position() {
        let (_, list) = sample();
        let first = list.seek_kind(TokenKind::Identifier).unwrap();
        let second = first.seek_kind(TokenKind::Identifier).unwrap();
        assert_eq!(second.token().value(), "garf");
        assert!(second.seek_kind(TokenKind::Identifier).is_err());
        assert_eq!(first.advance().unwrap().token().value(), "barf");
        assert!(second.advance().is_none());
    }

    #[test]
    fn test_token() {
        let (_, list) = sample();
        assert_eq!(list.token().unwrap().value(), "arf");

        let err = TokenList::new().token().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.to_string().contains("No token found at offset"));
    }

    #[test]
    fn test_lines_are_distinct_in_first_seen_order() {
        let (line, mut list) = sample();
        let other = LineId::next();
        list.push(Token::new(TokenKind::Whitespace, " ", other));
        list.push(Token::new(TokenKind::Identifier, "again", line));

        let lines = list.lines();
        assert_eq!(lines.ids(), &[line, other]);
    }
}

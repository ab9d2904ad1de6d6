//! Tokenization of lines and multi-line statements
//!
//! Raw tokenization uses the logos lexer. Anything logos does not recognize (a stray `(`, a
//! `;`, the quote of an unterminated string) becomes a one character [TokenKind::SingleChar]
//! token and lexing resumes right after it, so tokenization never fails and the concatenated
//! token values always reproduce the input.
//!
//! On top of that sit the statement helpers. A statement is one or more adjacent lines whose
//! delimiter balance comes back to zero: `$options = array(` opens a parenthesis and the
//! statement runs until the line holding the matching `)`. Balancing ignores string literals
//! and comments. When the lines run out before the balance closes, the tokens gathered so far
//! are returned; an unterminated statement is a valid partial result.

use logos::Logos;

use crate::mover::config::DelimiterPair;
use crate::mover::error::{MoverError, MoverResult};
use crate::mover::line::{Line, LineId};
use crate::mover::token::{Token, TokenKind, TokenList};

/// Lexical rules, in the order of precedence logos resolves them by (longest match first).
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum RawToken {
    #[regex(r"\$[A-Za-z_][A-Za-z0-9_]*")]
    Variable,

    #[regex(r"[A-Za-z_\\][A-Za-z0-9_\\]*")]
    Identifier,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    #[regex(r#"'([^'\\\n]|\\.)*'"#)]
    StringLiteral,

    #[regex(r"[0-9]+(\.[0-9]+)?")]
    #[regex(r"0[xX][0-9a-fA-F]+")]
    Number,

    #[regex(r"//[^\n]*")]
    Comment,

    // Multi character operators
    #[token("===")]
    #[token("!==")]
    #[token("<=>")]
    #[token("**=")]
    #[token("??=")]
    #[token("==")]
    #[token("!=")]
    #[token("<>")]
    #[token("<=")]
    #[token(">=")]
    #[token("=>")]
    #[token("->")]
    #[token("::")]
    #[token("&&")]
    #[token("||")]
    #[token("??")]
    #[token("++")]
    #[token("--")]
    #[token("+=")]
    #[token("-=")]
    #[token("*=")]
    #[token("/=")]
    #[token(".=")]
    #[token("%=")]
    #[token("**")]
    #[token("<<")]
    #[token(">>")]
    // Single character operators
    #[token("=")]
    #[token("+")]
    #[token("-")]
    #[token("*")]
    #[token("/")]
    #[token("%")]
    #[token("<")]
    #[token(">")]
    #[token("!")]
    #[token(".")]
    #[token("&")]
    #[token("|")]
    #[token("^")]
    #[token("~")]
    #[token("?")]
    #[token(":")]
    #[token("@")]
    Operator,

    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,
}

impl RawToken {
    fn kind(self) -> TokenKind {
        match self {
            RawToken::Variable => TokenKind::Variable,
            RawToken::Identifier => TokenKind::Identifier,
            RawToken::StringLiteral => TokenKind::StringLiteral,
            RawToken::Number => TokenKind::Number,
            RawToken::Comment => TokenKind::Comment,
            RawToken::Operator => TokenKind::Operator,
            RawToken::Whitespace => TokenKind::Whitespace,
        }
    }
}

/// Tokenize `text`, recording `origin` as the source line of every token.
pub fn tokenize(text: &str, origin: LineId) -> TokenList {
    let mut tokens = TokenList::new();
    let mut offset = 0;

    'restart: while offset < text.len() {
        let mut lexer = RawToken::lexer(&text[offset..]);

        while let Some(result) = lexer.next() {
            match result {
                Ok(raw) => tokens.push(Token::new(raw.kind(), lexer.slice(), origin)),
                Err(()) => {
                    let start = offset + lexer.span().start;
                    let Some(ch) = text[start..].chars().next() else {
                        break 'restart;
                    };
                    tokens.push(Token::new(TokenKind::SingleChar, ch.to_string(), origin));
                    offset = start + ch.len_utf8();
                    continue 'restart;
                }
            }
        }

        break;
    }

    tokens
}

/// +1 per occurrence of `open`, -1 per occurrence of `close`, skipping string literals and
/// comments.
///
/// Punctuation delimiters are counted inside token values. Word delimiters (`begin`/`end`)
/// only count as whole tokens, so `$legend` or `endpoint` leave the balance alone.
pub fn delimiter_balance(tokens: &TokenList, open: &str, close: &str) -> isize {
    tokens
        .iter()
        .filter(|token| !token.kind().is_opaque())
        .map(|token| occurrences(token.value(), open) - occurrences(token.value(), close))
        .sum()
}

fn occurrences(value: &str, delimiter: &str) -> isize {
    if is_word(delimiter) {
        isize::from(value == delimiter)
    } else {
        value.matches(delimiter).count() as isize
    }
}

fn is_word(delimiter: &str) -> bool {
    delimiter
        .chars()
        .all(|ch| ch.is_alphanumeric() || ch == '_')
}

pub(crate) fn validate_delimiters(open: &str, close: &str) -> MoverResult<()> {
    if open.is_empty() || close.is_empty() {
        return Err(MoverError::InvalidOperand(
            "Delimiters must not be empty".to_string(),
        ));
    }
    if open == close {
        return Err(MoverError::InvalidOperand(format!(
            "Open and close delimiters must differ, both are {:?}",
            open
        )));
    }
    Ok(())
}

/// Tokenize successive lines until the `open`/`close` balance, counted from the first line,
/// drops back to zero or the lines run out.
pub fn tokenize_between<'a, I>(lines: I, open: &str, close: &str) -> MoverResult<TokenList>
where
    I: IntoIterator<Item = &'a Line>,
{
    validate_delimiters(open, close)?;

    let mut tokens = TokenList::new();
    let mut balance = 0;
    let mut consumed = 0;

    for line in lines {
        let line_tokens = line.tokenize();
        balance += delimiter_balance(&line_tokens, open, close);
        tokens.extend(line_tokens);
        consumed += 1;

        if balance <= 0 {
            break;
        }
    }

    tracing::trace!(consumed, balance, open, close, "tokenize_between finished");
    Ok(tokens)
}

/// Tokenize the first line and keep pulling lines while any delimiter pair is left open.
pub fn tokenize_statement<'a, I>(lines: I, delimiters: &[DelimiterPair]) -> MoverResult<TokenList>
where
    I: IntoIterator<Item = &'a Line>,
{
    for pair in delimiters {
        validate_delimiters(&pair.open, &pair.close)?;
    }

    let mut tokens = TokenList::new();
    let mut balances = vec![0isize; delimiters.len()];
    let mut consumed = 0;

    for line in lines {
        let line_tokens = line.tokenize();
        for (balance, pair) in balances.iter_mut().zip(delimiters) {
            *balance += delimiter_balance(&line_tokens, &pair.open, &pair.close);
        }
        tokens.extend(line_tokens);
        consumed += 1;

        if balances.iter().all(|balance| *balance <= 0) {
            break;
        }
    }

    tracing::trace!(consumed, ?balances, "tokenize_statement finished");
    Ok(tokens)
}

//! Token types shared by the tokenizer, lines and collections.
//!
//!     A token is the smallest classified unit of text: a kind, the exact substring it was cut
//!     from, and the id of the line it came from. Tokens are produced only by the
//!     [tokenizer](crate::mover::tokenizer) and are never edited afterwards; edits happen on
//!     lines, and a fresh token stream is produced on demand.
//!
//!     The stream is flat. There is no tree and no grammar beyond delimiter balancing, which is
//!     enough to locate the pieces of a statement that a pattern driven edit needs.
//!
//!     The back reference from a token to its line is a [LineId](crate::mover::line::LineId),
//!     resolved through the owning [LineCollection](crate::mover::collection::LineCollection).
//!     Many tokens share one line and a line outlives any token list built from it.

pub mod core;
pub mod list;

pub use self::core::{Token, TokenKind};
pub use self::list::{TokenCursor, TokenList};

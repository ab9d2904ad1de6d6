//! Main module for codemover functionality
//!
//! Layout, leaves first:
//!
//!     token        Token, TokenKind, TokenList and the search cursor
//!     tokenizer    logos based tokenization, delimiter balancing, statements
//!     pattern      ordered pattern sets, match results and replacements
//!     line         Line, LineId and the owner bound LineRef / LineMut views
//!     collection   LineCollection and LineSelection
//!     file         MoverFile, the lazy file backed collection
//!     config       layered TOML configuration
//!     error        MoverError

pub mod collection;
pub mod config;
pub mod error;
pub mod file;
pub mod line;
pub mod pattern;
pub mod token;
pub mod tokenizer;

pub use collection::{LineCollection, LineSelection};
pub use error::{ErrorKind, MoverError, MoverResult};
pub use file::MoverFile;
pub use line::{Line, LineId, LineMut, LineRef};
pub use pattern::{IntoPatterns, LineMatch, Patterns, Replacement};
pub use token::{Token, TokenCursor, TokenKind, TokenList};

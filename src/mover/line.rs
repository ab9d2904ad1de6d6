//! Lines and line handles
//!
//!     A [Line] is one mutable unit of text. It keeps the text it was created with next to the
//!     current text, so `has_changed` is always `text != original`, no matter how many rewrites
//!     happened in between.
//!
//!     Identity: every line gets a [LineId] from a process wide counter when it is created. The
//!     id, not the content, is what collections use for removal and neighbor lookups, so two
//!     lines with the same text at different positions stay distinct. Lines are not `Clone`;
//!     a copy would share the identity of its source.
//!
//!     Ownership: a [LineCollection] owns its lines. Operations that need the owner (neighbors,
//!     statements, deletion) go through two borrowed views:
//!
//!         - [LineRef]: shared view, navigation and tokenization
//!         - [LineMut]: exclusive view, rewriting and deletion
//!
//!     Both resolve the line's position from its id when they are created. Any insertion or
//!     removal needs `&mut LineCollection`, which ends the borrow of every outstanding view, so
//!     a view never points at a stale position.

use std::fmt;
use std::ops::Deref;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::mover::collection::LineCollection;
use crate::mover::error::MoverResult;
use crate::mover::pattern::{IntoPatterns, LineMatch, Replacement};
use crate::mover::token::TokenList;
use crate::mover::tokenizer;

static NEXT_LINE_ID: AtomicU64 = AtomicU64::new(1);

/// Stable identity of a [Line]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LineId(u64);

impl LineId {
    /// Allocate an id no other line has
    pub fn next() -> Self {
        LineId(NEXT_LINE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One line of text with change tracking
#[derive(Debug)]
pub struct Line {
    id: LineId,
    text: String,
    original: String,
}

impl Line {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            id: LineId::next(),
            original: text.clone(),
            text,
        }
    }

    pub fn id(&self) -> LineId {
        self.id
    }

    /// Current text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Text as it was when the line was created
    pub fn original_line(&self) -> &str {
        &self.original
    }

    pub fn has_changed(&self) -> bool {
        self.text != self.original
    }

    pub fn set_text(&mut self, text: impl Into<String>) -> &mut Self {
        self.text = text.into();
        self
    }

    /// Match the first pattern that matches the current text
    pub fn captures(&self, patterns: impl IntoPatterns) -> MoverResult<Option<LineMatch>> {
        let patterns = patterns.into_patterns()?;
        Ok(patterns
            .captures(&self.text)
            .map(|groups| LineMatch::new(self.id, groups)))
    }

    pub fn matches(&self, patterns: impl IntoPatterns) -> MoverResult<bool> {
        Ok(patterns.into_patterns()?.is_match(&self.text))
    }

    /// Apply every pattern in turn to the current text. The original text is untouched.
    pub fn replace<'r>(
        &mut self,
        patterns: impl IntoPatterns,
        replacement: impl Into<Replacement<'r>>,
    ) -> MoverResult<&mut Self> {
        let patterns = patterns.into_patterns()?;
        let replacement = replacement.into();
        self.text = patterns.replace(&self.text, &replacement);
        Ok(self)
    }

    pub fn tokenize(&self) -> TokenList {
        tokenizer::tokenize(&self.text, self.id)
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<&str> for Line {
    fn from(text: &str) -> Self {
        Line::new(text)
    }
}

impl From<String> for Line {
    fn from(text: String) -> Self {
        Line::new(text)
    }
}

/// Shared view of a line inside its owning collection
#[derive(Debug, Clone, Copy)]
pub struct LineRef<'a> {
    owner: &'a LineCollection,
    index: usize,
}

impl<'a> LineRef<'a> {
    pub(crate) fn new(owner: &'a LineCollection, index: usize) -> Self {
        Self { owner, index }
    }

    pub fn line(&self) -> &'a Line {
        &self.owner.as_slice()[self.index]
    }

    pub fn owner(&self) -> &'a LineCollection {
        self.owner
    }

    /// 1-based position in the owner
    pub fn line_no(&self) -> usize {
        self.index + 1
    }

    pub fn next_line(&self) -> Option<LineRef<'a>> {
        let index = self.index + 1;
        (index < self.owner.len()).then(|| LineRef::new(self.owner, index))
    }

    pub fn prev_line(&self) -> Option<LineRef<'a>> {
        self.index
            .checked_sub(1)
            .map(|index| LineRef::new(self.owner, index))
    }

    /// Tokens of this line and of the following lines needed to close its delimiters
    pub fn tokenize_statement(&self) -> MoverResult<TokenList> {
        tokenizer::tokenize_statement(
            &self.owner.as_slice()[self.index..],
            &self.owner.config().statement.delimiters,
        )
    }

    /// Tokens from this line on, until the `open`/`close` balance is back to zero
    pub fn tokenize_between(&self, open: &str, close: &str) -> MoverResult<TokenList> {
        tokenizer::tokenize_between(&self.owner.as_slice()[self.index..], open, close)
    }
}

impl Deref for LineRef<'_> {
    type Target = Line;

    fn deref(&self) -> &Line {
        self.line()
    }
}

/// Exclusive view of a line inside its owning collection
#[derive(Debug)]
pub struct LineMut<'a> {
    owner: &'a mut LineCollection,
    index: usize,
}

impl<'a> LineMut<'a> {
    pub(crate) fn new(owner: &'a mut LineCollection, index: usize) -> Self {
        Self { owner, index }
    }

    pub fn line_mut(&mut self) -> &mut Line {
        &mut self.owner.as_mut_slice()[self.index]
    }

    pub fn set_text(&mut self, text: impl Into<String>) -> &mut Self {
        self.line_mut().set_text(text);
        self
    }

    pub fn replace<'r>(
        &mut self,
        patterns: impl IntoPatterns,
        replacement: impl Into<Replacement<'r>>,
    ) -> MoverResult<&mut Self> {
        self.line_mut().replace(patterns, replacement)?;
        Ok(self)
    }

    /// Shared view, for navigation and tokenization
    pub fn view(&self) -> LineRef<'_> {
        LineRef::new(self.owner, self.index)
    }

    /// Remove the line from its owner and hand it back
    pub fn delete(self) -> MoverResult<Line> {
        let id = self.owner.as_slice()[self.index].id();
        self.owner.delete_line(id)
    }
}

impl Deref for LineMut<'_> {
    type Target = Line;

    fn deref(&self) -> &Line {
        &self.owner.as_slice()[self.index]
    }
}

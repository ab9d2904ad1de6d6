//! Ordered line collections
//!
//!     A [LineCollection] owns its lines in order. Order is load bearing: it decides adjacency
//!     for neighbor lookups and which lines a statement spans. Positions are dense, insertion
//!     and removal recompact the sequence, and positions are never cached: every call that
//!     takes a [LineId] resolves it to its current index first.
//!
//!     Searches return a [LineSelection], the ids of the matching lines in collection order.
//!     A selection does not own anything; its bulk operations (delete, replace, tokenize) are
//!     handed the collection to act on.
//!
//! Removal
//!
//!     There are two ways to take a line out:
//!
//!         - `remove_element`: lenient, removing a line that is not a member is a no-op that
//!           still reports success.
//!         - `delete_line` (and [LineMut::delete]): strict, fails with PreconditionFailed when
//!           the collection does not hold the line, so deleting twice is an error.

pub mod selection;

pub use selection::LineSelection;

use std::fmt;

use crate::mover::config::MoverConfig;
use crate::mover::error::{MoverError, MoverResult};
use crate::mover::line::{Line, LineId, LineMut, LineRef};
use crate::mover::pattern::{IntoPatterns, LineMatch, Replacement};
use crate::mover::token::TokenList;

/// Ordered owner of [Line]s
#[derive(Debug, Default)]
pub struct LineCollection {
    lines: Vec<Line>,
    config: MoverConfig,
}

impl LineCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MoverConfig) -> Self {
        Self {
            lines: Vec::new(),
            config,
        }
    }

    /// Split `text` on `'\n'` into lines. Empty text gives an empty collection.
    pub fn from_text(text: &str) -> Self {
        Self::from_text_with_config(text, MoverConfig::default())
    }

    pub fn from_text_with_config(text: &str, config: MoverConfig) -> Self {
        let mut collection = Self::with_config(config);
        if !text.is_empty() {
            collection.lines = text.split('\n').map(Line::new).collect();
        }
        collection
    }

    pub fn config(&self) -> &MoverConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Line> {
        self.lines.iter()
    }

    pub fn as_slice(&self) -> &[Line] {
        &self.lines
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [Line] {
        &mut self.lines
    }

    /// Ids of all members, in order
    pub fn ids(&self) -> LineSelection {
        LineSelection::from_ids(self.lines.iter().map(Line::id).collect())
    }

    /// Current position of a line, by identity
    pub fn index_of(&self, id: LineId) -> Option<usize> {
        self.lines.iter().position(|line| line.id() == id)
    }

    pub fn contains(&self, id: LineId) -> bool {
        self.index_of(id).is_some()
    }

    /// 1-based line number
    pub fn line_no(&self, id: LineId) -> Option<usize> {
        self.index_of(id).map(|index| index + 1)
    }

    pub fn line(&self, id: LineId) -> Option<&Line> {
        self.index_of(id).map(|index| &self.lines[index])
    }

    pub fn line_mut(&mut self, id: LineId) -> Option<&mut Line> {
        let index = self.index_of(id)?;
        self.lines.get_mut(index)
    }

    /// Owner bound view of a member; fails for ids this collection does not hold.
    pub fn get(&self, id: LineId) -> MoverResult<LineRef<'_>> {
        let index = self.member_index(id)?;
        Ok(LineRef::new(self, index))
    }

    pub fn get_mut(&mut self, id: LineId) -> MoverResult<LineMut<'_>> {
        let index = self.member_index(id)?;
        Ok(LineMut::new(self, index))
    }

    fn member_index(&self, id: LineId) -> MoverResult<usize> {
        self.index_of(id).ok_or_else(|| {
            MoverError::InvalidOperand(format!(
                "Line {} is not a member of this collection",
                id
            ))
        })
    }

    fn target_index(&self, target: LineId) -> MoverResult<usize> {
        self.index_of(target).ok_or_else(|| {
            MoverError::NotFound(format!("Target line {} is not in this collection", target))
        })
    }

    /// The first line matching any of the patterns, or an empty selection
    pub fn find_line(&self, patterns: impl IntoPatterns) -> MoverResult<LineSelection> {
        let patterns = patterns.into_patterns()?;
        let ids = self
            .lines
            .iter()
            .find(|line| patterns.is_match(line.text()))
            .map(Line::id)
            .into_iter()
            .collect();
        Ok(LineSelection::from_ids(ids))
    }

    /// Every line matching any of the patterns, in order
    pub fn find_lines(&self, patterns: impl IntoPatterns) -> MoverResult<LineSelection> {
        let patterns = patterns.into_patterns()?;
        let ids = self
            .lines
            .iter()
            .filter(|line| patterns.is_match(line.text()))
            .map(Line::id)
            .collect();
        Ok(LineSelection::from_ids(ids))
    }

    /// Lines whose text differs from their original text
    pub fn changed_lines(&self) -> LineSelection {
        LineSelection::from_ids(
            self.lines
                .iter()
                .filter(|line| line.has_changed())
                .map(Line::id)
                .collect(),
        )
    }

    /// Match result of the first line that matches
    pub fn captures(&self, patterns: impl IntoPatterns) -> MoverResult<Option<LineMatch>> {
        let patterns = patterns.into_patterns()?;
        Ok(self.lines.iter().find_map(|line| {
            patterns
                .captures(line.text())
                .map(|groups| LineMatch::new(line.id(), groups))
        }))
    }

    /// Rewrite every line
    pub fn replace<'r>(
        &mut self,
        patterns: impl IntoPatterns,
        replacement: impl Into<Replacement<'r>>,
    ) -> MoverResult<&mut Self> {
        let patterns = patterns.into_patterns()?;
        let replacement = replacement.into();
        for line in &mut self.lines {
            let replaced = patterns.replace(line.text(), &replacement);
            line.set_text(replaced);
        }
        Ok(self)
    }

    pub fn add_line(&mut self, line: impl Into<Line>, offset: Option<usize>) -> &mut Self {
        self.add_lines([line], offset)
    }

    /// Insert lines at `offset` (`None` or past the end appends). Text is wrapped into new
    /// lines, prebuilt lines are moved in as they are.
    pub fn add_lines<I, L>(&mut self, lines: I, offset: Option<usize>) -> &mut Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Line>,
    {
        let offset = offset.unwrap_or(self.lines.len()).min(self.lines.len());
        let before = self.lines.len();
        self.lines
            .splice(offset..offset, lines.into_iter().map(Into::into));
        tracing::debug!(
            inserted = self.lines.len() - before,
            offset,
            "Inserted lines"
        );
        self
    }

    pub fn add_lines_before<I, L>(&mut self, target: LineId, lines: I) -> MoverResult<&mut Self>
    where
        I: IntoIterator<Item = L>,
        L: Into<Line>,
    {
        let offset = self.target_index(target)?;
        Ok(self.add_lines(lines, Some(offset)))
    }

    pub fn add_lines_after<I, L>(&mut self, target: LineId, lines: I) -> MoverResult<&mut Self>
    where
        I: IntoIterator<Item = L>,
        L: Into<Line>,
    {
        let offset = self.target_index(target)? + 1;
        Ok(self.add_lines(lines, Some(offset)))
    }

    pub fn add_line_before(
        &mut self,
        target: LineId,
        line: impl Into<Line>,
    ) -> MoverResult<&mut Self> {
        self.add_lines_before(target, [line])
    }

    pub fn add_line_after(
        &mut self,
        target: LineId,
        line: impl Into<Line>,
    ) -> MoverResult<&mut Self> {
        self.add_lines_after(target, [line])
    }

    /// Remove a line by identity. Always reports success; a non-member is left alone.
    pub fn remove_element(&mut self, id: LineId) -> bool {
        match self.index_of(id) {
            Some(index) => {
                self.lines.remove(index);
                tracing::debug!(line = %id, index, "Removed line");
            }
            None => tracing::warn!(line = %id, "remove_element on a line that is not a member"),
        }
        true
    }

    /// Remove a line by identity and hand it back
    pub fn delete_line(&mut self, id: LineId) -> MoverResult<Line> {
        let index = self.index_of(id).ok_or_else(|| {
            MoverError::PreconditionFailed(format!("Could not delete element {}", id))
        })?;
        tracing::debug!(line = %id, index, "Deleted line");
        Ok(self.lines.remove(index))
    }

    /// Delete every member
    pub fn delete(&mut self) -> &mut Self {
        tracing::debug!(count = self.lines.len(), "Deleting all lines");
        self.lines.clear();
        self
    }

    /// The line right before (`before = true`) or after a member, `None` at the boundaries or
    /// for non-members
    pub fn get_line_neighbor(&self, id: LineId, before: bool) -> Option<&Line> {
        let index = self.index_of(id)?;
        let neighbor = if before {
            index.checked_sub(1)?
        } else {
            index + 1
        };
        self.lines.get(neighbor)
    }

    pub fn next_line(&self, id: LineId) -> Option<&Line> {
        self.get_line_neighbor(id, false)
    }

    pub fn prev_line(&self, id: LineId) -> Option<&Line> {
        self.get_line_neighbor(id, true)
    }

    /// Tokens of every line, in order
    pub fn tokenize(&self) -> TokenList {
        self.lines.iter().flat_map(Line::tokenize).collect()
    }

    pub fn tokenize_statement(&self, id: LineId) -> MoverResult<TokenList> {
        self.get(id)?.tokenize_statement()
    }

    pub fn tokenize_between(&self, id: LineId, open: &str, close: &str) -> MoverResult<TokenList> {
        self.get(id)?.tokenize_between(open, close)
    }

    /// Current text of every line, joined with the configured separator
    pub fn raw(&self) -> String {
        self.join(self.lines.iter())
    }

    pub fn dump(&self) -> String {
        self.raw()
    }

    pub(crate) fn join<'a>(&self, lines: impl Iterator<Item = &'a Line>) -> String {
        lines
            .map(Line::text)
            .collect::<Vec<_>>()
            .join(&self.config.output.line_separator)
    }
}

impl fmt::Display for LineCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw())
    }
}

impl<'a> IntoIterator for &'a LineCollection {
    type Item = &'a Line;
    type IntoIter = std::slice::Iter<'a, Line>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

impl<L: Into<Line>> FromIterator<L> for LineCollection {
    fn from_iter<I: IntoIterator<Item = L>>(iter: I) -> Self {
        let mut collection = Self::new();
        collection.add_lines(iter, None);
        collection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mover::error::ErrorKind;

    fn texts(collection: &LineCollection) -> Vec<&str> {
        collection.iter().map(Line::text).collect()
    }

    #[test]
    fn test_from_text_round_trips() {
        let text = "<?php\n\nnamespace Foo;\n";
        let collection = LineCollection::from_text(text);
        assert_eq!(collection.len(), 4);
        assert_eq!(collection.raw(), text);
        assert!(LineCollection::from_text("").is_empty());
    }

    #[test]
    fn test_add_lines_at_offset() {
        let mut collection: LineCollection = ["a", "d"].into_iter().collect();
        collection.add_lines(["b", "c"], Some(1));
        collection.add_line("e", None);
        collection.add_line("z", Some(99));
        assert_eq!(texts(&collection), vec!["a", "b", "c", "d", "e", "z"]);
    }

    #[test]
    fn test_prebuilt_line_keeps_identity() {
        let mut collection = LineCollection::from_text("a\nc");
        let line = Line::new("b");
        let id = line.id();
        collection.add_line(line, Some(1));
        assert_eq!(collection.index_of(id), Some(1));
    }

    #[test]
    fn test_add_before_and_after_target() {
        let mut collection = LineCollection::from_text("one\nthree");
        let one = collection.as_slice()[0].id();
        let three = collection.as_slice()[1].id();

        collection
            .add_line_after(one, "two")
            .unwrap()
            .add_line_before(one, "zero")
            .unwrap()
            .add_lines_after(three, ["four", "five"])
            .unwrap();

        assert_eq!(
            texts(&collection),
            vec!["zero", "one", "two", "three", "four", "five"]
        );
        assert_eq!(collection.next_line(one).unwrap().text(), "two");
        assert_eq!(collection.prev_line(one).unwrap().text(), "zero");
    }

    #[test]
    fn test_add_relative_to_non_member_fails() {
        let mut collection = LineCollection::from_text("one");
        let stranger = Line::new("stranger");
        let err = collection
            .add_line_before(stranger.id(), "x")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn test_remove_element_is_lenient() {
        let mut collection = LineCollection::from_text("a\nb\nc");
        let b = collection.as_slice()[1].id();
        assert!(collection.remove_element(b));
        assert_eq!(texts(&collection), vec!["a", "c"]);
        assert!(collection.remove_element(b));
        assert_eq!(texts(&collection), vec!["a", "c"]);
    }

    #[test]
    fn test_delete_line_is_strict() {
        let mut collection = LineCollection::from_text("a\nb");
        let a = collection.as_slice()[0].id();
        let removed = collection.delete_line(a).unwrap();
        assert_eq!(removed.text(), "a");

        let err = collection.delete_line(a).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PreconditionFailed);
        assert!(err.to_string().contains("Could not delete element"));
    }

    #[test]
    fn test_identity_not_content() {
        let mut collection = LineCollection::from_text("same\nsame\nsame");
        let middle = collection.as_slice()[1].id();
        collection.delete_line(middle).unwrap();
        assert_eq!(collection.len(), 2);
        assert!(!collection.contains(middle));
        assert!(collection.iter().all(|line| line.id() != middle));
    }

    #[test]
    fn test_neighbors_at_boundaries() {
        let collection = LineCollection::from_text("first\nlast");
        let first = collection.as_slice()[0].id();
        let last = collection.as_slice()[1].id();
        assert!(collection.get_line_neighbor(first, true).is_none());
        assert!(collection.get_line_neighbor(last, false).is_none());
        assert_eq!(collection.get_line_neighbor(first, false).unwrap().id(), last);
        assert!(collection.next_line(Line::new("x").id()).is_none());
    }

    #[test]
    fn test_find_line_returns_empty_selection() {
        let collection = LineCollection::from_text("foo1\nbar1");
        assert!(collection.find_line("/nope/").unwrap().is_empty());
        assert_eq!(collection.find_line("/1/").unwrap().len(), 1);
    }

    #[test]
    fn test_captures_across_lines() {
        let collection = LineCollection::from_text("<?php\nnamespace Foo\\Bar;");
        let found = collection.captures("/namespace (.*);/").unwrap().unwrap();
        assert_eq!(found.get(1), Some("Foo\\Bar"));
        assert_eq!(collection.line_no(found.line()), Some(2));
    }

    #[test]
    fn test_replace_every_line_and_track_changes() {
        let mut collection = LineCollection::from_text("use Foo;\nuse Bar;\n$x = 1;");
        collection.replace("/^use (\\w+);/", "use Legacy\\$1;").unwrap();
        assert_eq!(collection.raw(), "use Legacy\\Foo;\nuse Legacy\\Bar;\n$x = 1;");
        assert_eq!(collection.changed_lines().len(), 2);
    }

    #[test]
    fn test_tokenize_concatenates_lines() {
        let collection = LineCollection::from_text("$a;\n$b;");
        let tokens = collection.tokenize();
        assert_eq!(tokens.text(), "$a;$b;");
        assert_eq!(tokens.lines().len(), 2);
    }

    #[test]
    fn test_stale_id_is_rejected() {
        let mut collection = LineCollection::from_text("foo(\n);");
        let first = collection.as_slice()[0].id();
        collection.delete_line(first).unwrap();
        let err = collection.tokenize_statement(first).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOperand);
    }

    #[test]
    fn test_delete_all() {
        let mut collection = LineCollection::from_text("a\nb");
        assert!(collection.delete().is_empty());
        assert_eq!(collection.raw(), "");
    }

    #[test]
    fn test_configured_separator() {
        let mut config = MoverConfig::default();
        config.output.line_separator = "\r\n".to_string();
        let collection = LineCollection::from_text_with_config("a\nb", config);
        assert_eq!(collection.raw(), "a\r\nb");
    }
}

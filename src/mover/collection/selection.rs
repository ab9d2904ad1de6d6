//! Search results over a [LineCollection]

use serde::{Deserialize, Serialize};

use crate::mover::collection::LineCollection;
use crate::mover::error::{MoverError, MoverResult};
use crate::mover::line::{Line, LineId, LineRef};
use crate::mover::pattern::{IntoPatterns, LineMatch, Replacement};
use crate::mover::token::TokenList;

/// Ordered line ids, in the order the search or token stream produced them.
///
/// A selection borrows nothing. Every operation takes the collection it should act on, and
/// ids that are no longer members are either skipped (read only views) or rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineSelection {
    ids: Vec<LineId>,
}

impl LineSelection {
    pub fn from_ids(ids: Vec<LineId>) -> Self {
        Self { ids }
    }

    pub fn ids(&self) -> &[LineId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = LineId> + '_ {
        self.ids.iter().copied()
    }

    pub fn first(&self) -> Option<LineId> {
        self.ids.first().copied()
    }

    pub fn contains(&self, id: LineId) -> bool {
        self.ids.contains(&id)
    }

    /// The only id of a one-line selection
    pub fn single(&self) -> MoverResult<LineId> {
        self.single_for("single")
    }

    fn single_for(&self, method: &str) -> MoverResult<LineId> {
        match self.ids.as_slice() {
            [id] => Ok(*id),
            ids => Err(MoverError::requires_single_element(method, ids.len())),
        }
    }

    /// Selected lines still held by `owner`, in selection order
    pub fn lines<'a>(&'a self, owner: &'a LineCollection) -> impl Iterator<Item = &'a Line> + 'a {
        self.ids.iter().filter_map(move |id| owner.line(*id))
    }

    pub fn texts<'a>(&self, owner: &'a LineCollection) -> Vec<&'a str> {
        self.ids
            .iter()
            .filter_map(|id| owner.line(*id))
            .map(Line::text)
            .collect()
    }

    /// Selected text joined with the owner's line separator
    pub fn raw(&self, owner: &LineCollection) -> String {
        owner.join(self.lines(owner))
    }

    /// Match result of the first selected line that matches
    pub fn captures(
        &self,
        owner: &LineCollection,
        patterns: impl IntoPatterns,
    ) -> MoverResult<Option<LineMatch>> {
        let patterns = patterns.into_patterns()?;
        Ok(self.lines(owner).find_map(|line| {
            patterns
                .captures(line.text())
                .map(|groups| LineMatch::new(line.id(), groups))
        }))
    }

    /// Rewrite every selected line
    pub fn replace<'r>(
        &self,
        owner: &mut LineCollection,
        patterns: impl IntoPatterns,
        replacement: impl Into<Replacement<'r>>,
    ) -> MoverResult<&Self> {
        let patterns = patterns.into_patterns()?;
        let replacement = replacement.into();
        for id in &self.ids {
            let line = owner.line_mut(*id).ok_or_else(|| not_a_member(*id))?;
            let replaced = patterns.replace(line.text(), &replacement);
            line.set_text(replaced);
        }
        Ok(self)
    }

    /// Delete every selected line. Stops at the first line the owner does not hold; lines
    /// deleted before that stay deleted.
    pub fn delete(&self, owner: &mut LineCollection) -> MoverResult<()> {
        for id in &self.ids {
            owner.delete_line(*id)?;
        }
        Ok(())
    }

    pub fn tokenize(&self, owner: &LineCollection) -> MoverResult<TokenList> {
        let mut tokens = TokenList::new();
        for id in &self.ids {
            let line = owner.line(*id).ok_or_else(|| not_a_member(*id))?;
            tokens.extend(line.tokenize());
        }
        Ok(tokens)
    }

    pub fn tokenize_statement(&self, owner: &LineCollection) -> MoverResult<TokenList> {
        let id = self.single_for("tokenize_statement")?;
        owner.get(id)?.tokenize_statement()
    }

    pub fn tokenize_between(
        &self,
        owner: &LineCollection,
        open: &str,
        close: &str,
    ) -> MoverResult<TokenList> {
        let id = self.single_for("tokenize_between")?;
        owner.get(id)?.tokenize_between(open, close)
    }

    pub fn next_line<'a>(&self, owner: &'a LineCollection) -> MoverResult<Option<LineRef<'a>>> {
        let id = self.single_for("next_line")?;
        Ok(owner.get(id)?.next_line())
    }

    pub fn prev_line<'a>(&self, owner: &'a LineCollection) -> MoverResult<Option<LineRef<'a>>> {
        let id = self.single_for("prev_line")?;
        Ok(owner.get(id)?.prev_line())
    }

    pub fn line_no(&self, owner: &LineCollection) -> MoverResult<usize> {
        let id = self.single_for("line_no")?;
        Ok(owner.get(id)?.line_no())
    }
}

fn not_a_member(id: LineId) -> MoverError {
    MoverError::InvalidOperand(format!("Line {} is not a member of this collection", id))
}

impl<'a> IntoIterator for &'a LineSelection {
    type Item = &'a LineId;
    type IntoIter = std::slice::Iter<'a, LineId>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter()
    }
}

impl FromIterator<LineId> for LineSelection {
    fn from_iter<I: IntoIterator<Item = LineId>>(iter: I) -> Self {
        Self::from_ids(iter.into_iter().collect())
    }
}

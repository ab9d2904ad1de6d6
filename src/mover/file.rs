//! Files as line collections
//!
//!     [MoverFile] wraps a path. Nothing is read until the lines are first needed; from then
//!     on the file's text is held as the original next to the live [LineCollection]. `commit`
//!     moves the original forward to the current text, `write` persists and commits.

use std::fs;
use std::path::{Path, PathBuf};

use crate::mover::collection::{LineCollection, LineSelection};
use crate::mover::config::MoverConfig;
use crate::mover::error::{MoverError, MoverResult};
use crate::mover::pattern::IntoPatterns;

#[derive(Debug)]
pub struct MoverFile {
    path: PathBuf,
    config: MoverConfig,
    lines: Option<LineCollection>,
    original: Option<String>,
}

impl MoverFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self::with_config(path, MoverConfig::default())
    }

    pub fn with_config(path: impl AsRef<Path>, config: MoverConfig) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            config,
            lines: None,
            original: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Test the path against the patterns
    pub fn name_matches(&self, patterns: impl IntoPatterns) -> MoverResult<bool> {
        let patterns = patterns.into_patterns()?;
        Ok(patterns.is_match(&self.path.to_string_lossy()))
    }

    pub fn is_loaded(&self) -> bool {
        self.lines.is_some()
    }

    /// The file's lines, read on first access
    pub fn lines(&mut self) -> MoverResult<&mut LineCollection> {
        let lines = match self.lines.take() {
            Some(lines) => lines,
            None => self.load()?,
        };
        Ok(self.lines.insert(lines))
    }

    fn load(&mut self) -> MoverResult<LineCollection> {
        let text = fs::read_to_string(&self.path).map_err(|source| MoverError::Io {
            path: self.path.clone(),
            source,
        })?;
        let lines = LineCollection::from_text_with_config(&text, self.config.clone());
        tracing::debug!(path = %self.path.display(), lines = lines.len(), "Loaded file");
        self.original = Some(text);
        Ok(lines)
    }

    pub fn find_line(&mut self, patterns: impl IntoPatterns) -> MoverResult<LineSelection> {
        self.lines()?.find_line(patterns)
    }

    pub fn find_lines(&mut self, patterns: impl IntoPatterns) -> MoverResult<LineSelection> {
        self.lines()?.find_lines(patterns)
    }

    /// Current text of the file
    pub fn dump(&mut self) -> MoverResult<String> {
        Ok(self.lines()?.raw())
    }

    /// Text as read from disk, or as of the last commit. `None` before the first read.
    pub fn original_file(&self) -> Option<&str> {
        self.original.as_deref()
    }

    /// Make the current text the new original
    pub fn commit(&mut self) {
        if let Some(lines) = &self.lines {
            self.original = Some(lines.raw());
        }
    }

    pub fn is_modified(&self) -> bool {
        match (&self.lines, &self.original) {
            (Some(lines), Some(original)) => lines.raw() != *original,
            _ => false,
        }
    }

    /// Persist the current text and commit it
    pub fn write(&mut self) -> MoverResult<()> {
        let text = self.dump()?;
        fs::write(&self.path, &text).map_err(|source| MoverError::Io {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(path = %self.path.display(), bytes = text.len(), "Wrote file");
        self.original = Some(text);
        Ok(())
    }
}

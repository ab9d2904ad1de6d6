//! Configuration loading
//!
//! `defaults/codemover.default.toml` is embedded into the crate so that the documented
//! defaults and [MoverConfig::default] stay in sync. Callers layer their own files on top
//! via [Loader] before deserializing into [MoverConfig].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat};
use serde::Deserialize;
use std::path::Path;

use super::error::MoverResult;
use super::tokenizer;

const DEFAULT_TOML: &str = include_str!("../../defaults/codemover.default.toml");

/// Top-level configuration consumed by line collections.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MoverConfig {
    pub statement: StatementConfig,
    pub output: OutputConfig,
}

/// Controls how statements are grouped across lines.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatementConfig {
    pub delimiters: Vec<DelimiterPair>,
}

/// An open/close delimiter pair, e.g. `(` and `)`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DelimiterPair {
    pub open: String,
    pub close: String,
}

impl DelimiterPair {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OutputConfig {
    pub line_separator: String,
}

impl Default for MoverConfig {
    fn default() -> Self {
        Self {
            statement: StatementConfig {
                delimiters: vec![
                    DelimiterPair::new("(", ")"),
                    DelimiterPair::new("[", "]"),
                    DelimiterPair::new("{", "}"),
                ],
            },
            output: OutputConfig {
                line_separator: "\n".to_string(),
            },
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
///
/// Delimiter pairs set with [Loader::with_delimiters] replace whatever the files configured,
/// since TOML arrays from separate layers do not combine into a meaningful pair list.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
    delimiters: Option<Vec<DelimiterPair>>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self {
            builder,
            delimiters: None,
        }
    }

    /// Layer a configuration file. Missing files trigger an error on build.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Separator used when collections are rendered back to text.
    pub fn with_line_separator(mut self, separator: &str) -> MoverResult<Self> {
        self.builder = self
            .builder
            .set_override("output.line_separator", separator)?;
        Ok(self)
    }

    /// Statement delimiter pairs, replacing the configured ones.
    pub fn with_delimiters<I>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = DelimiterPair>,
    {
        self.delimiters = Some(pairs.into_iter().collect());
        self
    }

    /// Finalize the builder and deserialize the resulting configuration. Delimiter pairs
    /// that could never balance (empty, or open equal to close) are rejected here.
    pub fn build(self) -> MoverResult<MoverConfig> {
        let mut config: MoverConfig = self.builder.build()?.try_deserialize()?;
        if let Some(delimiters) = self.delimiters {
            config.statement.delimiters = delimiters;
        }
        for pair in &config.statement.delimiters {
            tokenizer::validate_delimiters(&pair.open, &pair.close)?;
        }
        tracing::debug!("Loaded codemover configuration: {:?}", config);
        Ok(config)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> MoverResult<MoverConfig> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn embedded_defaults_match_default_impl() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config, MoverConfig::default());
    }

    #[test]
    fn sets_line_separator() {
        let config = Loader::new()
            .with_line_separator("\r\n")
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.output.line_separator, "\r\n");
        assert_eq!(config.statement.delimiters.len(), 3);
    }

    #[test]
    fn replaces_delimiters() {
        let config = Loader::new()
            .with_delimiters([DelimiterPair::new("begin", "end")])
            .build()
            .expect("config to build");
        assert_eq!(
            config.statement.delimiters,
            vec![DelimiterPair::new("begin", "end")]
        );
    }

    #[test]
    fn rejects_unbalanceable_delimiters() {
        let err = Loader::new()
            .with_delimiters([DelimiterPair::new("|", "|")])
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), crate::mover::ErrorKind::InvalidOperand);
    }

    #[test]
    fn layers_user_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        writeln!(
            file,
            "[[statement.delimiters]]\nopen = \"<<<\"\nclose = \">>>\""
        )
        .expect("write config");

        let config = Loader::new()
            .with_file(file.path())
            .build()
            .expect("config to build");
        assert_eq!(
            config.statement.delimiters[0],
            DelimiterPair::new("<<<", ">>>")
        );
        assert_eq!(config.output.line_separator, "\n");
    }

    #[test]
    fn missing_optional_file_is_ignored() {
        let config = Loader::new()
            .with_optional_file("/definitely/not/here/codemover.toml")
            .build()
            .expect("config to build");
        assert_eq!(config, MoverConfig::default());
    }

    #[test]
    fn missing_required_file_fails() {
        let err = Loader::new()
            .with_file("/definitely/not/here/codemover.toml")
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), crate::mover::ErrorKind::Config);
    }
}

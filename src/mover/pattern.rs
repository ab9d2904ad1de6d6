//! Patterns, match results and replacements
//!
//!     Every search and rewrite takes one pattern or an ordered set of patterns. Sets are
//!     OR-combined: for matching the first pattern that matches wins, for replacing every
//!     pattern is applied in turn.
//!
//!     Pattern syntax is that of the regex crate. Patterns written with PHP style delimiters
//!     (`/fox/`, `#^use #i`) are accepted as well; the delimiters are stripped and trailing
//!     `i m s x U` flags become inline flags.
//!
//!     A replacement is either a template or a closure computing the substitution from the
//!     captures. Templates follow `preg_replace`: `\1`, `$1` and `${1}` (at most two digits)
//!     are group references and `${name}` names a group. Every other `$` is literal, so
//!     `$this->bar` survives a rewrite and `$1bar` is group 1 followed by `bar`.

use std::fmt;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::mover::error::{MoverError, MoverResult};
use crate::mover::line::LineId;

static DELIMITED_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([/#~!@%|])(?s:(.*))([/#~!@%|])([imsxU]*)$").unwrap());

static TEMPLATE_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\(\d{1,2})|\$(\d{1,2})|\$\{(\d+|[A-Za-z_][A-Za-z0-9_]*)\}|\$").unwrap()
});

/// Compile one pattern, accepting the PHP delimiter form.
pub fn compile(pattern: &str) -> MoverResult<Regex> {
    let source = match DELIMITED_PATTERN.captures(pattern) {
        Some(caps) if caps[1] == caps[3] => {
            let flags = &caps[4];
            if flags.is_empty() {
                caps[2].to_string()
            } else {
                format!("(?{}){}", flags, &caps[2])
            }
        }
        _ => pattern.to_string(),
    };

    Regex::new(&source).map_err(|source| MoverError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// An ordered set of compiled patterns
#[derive(Debug, Clone)]
pub struct Patterns {
    regexes: Vec<Regex>,
}

impl Patterns {
    pub fn new<I, S>(patterns: I) -> MoverResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let regexes = patterns
            .into_iter()
            .map(|pattern| compile(pattern.as_ref()))
            .collect::<MoverResult<Vec<_>>>()?;
        Ok(Self { regexes })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regexes.iter().any(|regex| regex.is_match(text))
    }

    /// Groups of the first pattern that matches. Group 0 is the whole match.
    pub fn captures(&self, text: &str) -> Option<Vec<Option<String>>> {
        self.regexes.iter().find_map(|regex| {
            regex.captures(text).map(|caps| {
                caps.iter()
                    .map(|group| group.map(|m| m.as_str().to_string()))
                    .collect()
            })
        })
    }

    /// Apply every pattern in sequence, each replacing all of its matches.
    pub fn replace(&self, text: &str, replacement: &Replacement<'_>) -> String {
        self.regexes
            .iter()
            .fold(text.to_string(), |current, regex| replacement.apply(regex, &current))
    }
}

/// Anything that can be turned into an ordered pattern set
pub trait IntoPatterns {
    fn into_patterns(self) -> MoverResult<Patterns>;
}

impl IntoPatterns for Patterns {
    fn into_patterns(self) -> MoverResult<Patterns> {
        Ok(self)
    }
}

impl IntoPatterns for &Patterns {
    fn into_patterns(self) -> MoverResult<Patterns> {
        Ok(self.clone())
    }
}

impl IntoPatterns for Regex {
    fn into_patterns(self) -> MoverResult<Patterns> {
        Ok(Patterns {
            regexes: vec![self],
        })
    }
}

impl IntoPatterns for &str {
    fn into_patterns(self) -> MoverResult<Patterns> {
        Patterns::new([self])
    }
}

impl IntoPatterns for String {
    fn into_patterns(self) -> MoverResult<Patterns> {
        Patterns::new([self])
    }
}

impl IntoPatterns for &String {
    fn into_patterns(self) -> MoverResult<Patterns> {
        Patterns::new([self])
    }
}

impl<const N: usize> IntoPatterns for [&str; N] {
    fn into_patterns(self) -> MoverResult<Patterns> {
        Patterns::new(self)
    }
}

impl IntoPatterns for &[&str] {
    fn into_patterns(self) -> MoverResult<Patterns> {
        Patterns::new(self)
    }
}

impl IntoPatterns for Vec<&str> {
    fn into_patterns(self) -> MoverResult<Patterns> {
        Patterns::new(self)
    }
}

impl IntoPatterns for Vec<String> {
    fn into_patterns(self) -> MoverResult<Patterns> {
        Patterns::new(self)
    }
}

/// The result of a successful match against a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMatch {
    line: LineId,
    groups: Vec<Option<String>>,
}

impl LineMatch {
    pub(crate) fn new(line: LineId, groups: Vec<Option<String>>) -> Self {
        Self { line, groups }
    }

    /// The line that matched
    pub fn line(&self) -> LineId {
        self.line
    }

    /// Group `index`, `None` when the group did not take part in the match
    pub fn get(&self, index: usize) -> Option<&str> {
        self.groups.get(index).and_then(|group| group.as_deref())
    }

    pub fn groups(&self) -> &[Option<String>] {
        &self.groups
    }

    /// All groups, with non-participating ones as empty strings
    pub fn matches(&self) -> Vec<&str> {
        self.groups
            .iter()
            .map(|group| group.as_deref().unwrap_or(""))
            .collect()
    }
}

/// Substitution applied by `replace`
pub enum Replacement<'a> {
    /// Template in regex crate syntax, expanded per match. Build it with
    /// [Replacement::template] to get `preg_replace` reference rules.
    Template(String),
    /// Closure computing the substitution from the captures of each match
    Computed(Box<dyn Fn(&Captures<'_>) -> String + 'a>),
}

impl<'a> Replacement<'a> {
    pub fn template(template: impl AsRef<str>) -> Self {
        let template = TEMPLATE_REFERENCE
            .replace_all(template.as_ref(), |caps: &Captures<'_>| {
                match caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)) {
                    Some(group) => format!("${{{}}}", group.as_str()),
                    None => "$$".to_string(),
                }
            })
            .into_owned();
        Replacement::Template(template)
    }

    pub fn computed<F>(compute: F) -> Self
    where
        F: Fn(&Captures<'_>) -> String + 'a,
    {
        Replacement::Computed(Box::new(compute))
    }

    pub fn apply(&self, regex: &Regex, text: &str) -> String {
        match self {
            Replacement::Template(template) => {
                regex.replace_all(text, template.as_str()).into_owned()
            }
            Replacement::Computed(compute) => regex
                .replace_all(text, |caps: &Captures<'_>| compute(caps))
                .into_owned(),
        }
    }
}

impl fmt::Debug for Replacement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Replacement::Template(template) => f.debug_tuple("Template").field(template).finish(),
            Replacement::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl From<&str> for Replacement<'_> {
    fn from(template: &str) -> Self {
        Replacement::template(template)
    }
}

impl From<String> for Replacement<'_> {
    fn from(template: String) -> Self {
        Replacement::template(template)
    }
}

impl From<&String> for Replacement<'_> {
    fn from(template: &String) -> Self {
        Replacement::template(template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mover::error::ErrorKind;

    #[test]
    fn test_delimited_patterns_are_stripped() {
        assert_eq!(compile("/fox/").unwrap().as_str(), "fox");
        assert_eq!(compile("#^use #i").unwrap().as_str(), "(?i)^use ");
        assert_eq!(compile("/a|b/").unwrap().as_str(), "a|b");
    }

    #[test]
    fn test_plain_patterns_are_kept() {
        assert_eq!(compile("namespace (.*)").unwrap().as_str(), "namespace (.*)");
        assert_eq!(compile("/abc|").unwrap().as_str(), "/abc|");
    }

    #[test]
    fn test_invalid_pattern() {
        let err = compile("/(/").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPattern);
        assert!(err.to_string().contains("/(/"));
    }

    #[test]
    fn test_first_matching_pattern_wins() {
        let patterns = Patterns::new(["/(dabd)/", "/(b)rown/", "/(q)uick/"]).unwrap();
        let groups = patterns.captures("The quick brown fox").unwrap();
        assert_eq!(groups[1].as_deref(), Some("b"));
    }

    #[test]
    fn test_replace_applies_every_pattern() {
        let patterns = Patterns::new(["/quick/", "/brown/"]).unwrap();
        let replaced = patterns.replace("The quick brown fox", &Replacement::from("x"));
        assert_eq!(replaced, "The x x fox");
    }

    #[test]
    fn test_backslash_references() {
        let regex = compile("/quick (.*) fox/").unwrap();
        let replacement = Replacement::from(r"slow \1 elephant");
        assert_eq!(
            replacement.apply(&regex, "The quick brown fox"),
            "The slow brown elephant"
        );
    }

    #[test]
    fn test_template_translation() {
        let translated = |template: &str| match Replacement::template(template) {
            Replacement::Template(template) => template,
            Replacement::Computed(_) => unreachable!(),
        };
        assert_eq!(translated(r"\1-$2-${3}"), "${1}-${2}-${3}");
        assert_eq!(translated("$1bar"), "${1}bar");
        assert_eq!(translated("$this->bar"), "$$this->bar");
        assert_eq!(translated("${name} costs $"), "${name} costs $$");
    }

    #[test]
    fn test_literal_dollar_survives() {
        let regex = compile("/foo/").unwrap();
        let replacement = Replacement::from("$this->bar");
        assert_eq!(replacement.apply(&regex, "foo();"), "$this->bar();");
    }

    #[test]
    fn test_computed_replacement() {
        let regex = compile("/quick (.*) fox/").unwrap();
        let replacement = Replacement::computed(|caps| format!("slow {} elephant", &caps[1]));
        assert_eq!(
            replacement.apply(&regex, "The quick brown fox"),
            "The slow brown elephant"
        );
    }

    #[test]
    fn test_line_match_groups() {
        let line = LineId::next();
        let found = LineMatch::new(line, vec![Some("ab".to_string()), None]);
        assert_eq!(found.line(), line);
        assert_eq!(found.get(0), Some("ab"));
        assert_eq!(found.get(1), None);
        assert_eq!(found.matches(), vec!["ab", ""]);
    }
}

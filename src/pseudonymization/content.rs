//! Regex-driven text pseudonymization
//!
//! Patterns use `fancy_regex`, which accepts look-around and back-references on
//! top of the `regex` syntax. All patterns are compiled up front so a bad pattern
//! is reported before any file is touched.
//!
//! Patterns run one after another: every pass sees the output of the previous
//! pass, so a later pattern can match inside an earlier replacement.

use fancy_regex::Regex;

use super::generator::Pseudonymizer;
use crate::domain::{PalosaError, Result};

/// Ordered set of compiled patterns
#[derive(Debug, Clone)]
pub struct ContentAnonymizer {
    patterns: Vec<Regex>,
}

impl ContentAnonymizer {
    /// Compiles every pattern
    ///
    /// # Errors
    ///
    /// Returns [`PalosaError::PatternCompile`] naming the first pattern that
    /// does not compile.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| compile_pattern(p.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { patterns })
    }

    /// Number of compiled patterns
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Runs every pattern over the text in order
    pub fn apply(&self, pseudonymizer: &Pseudonymizer, text: &str) -> Result<String> {
        let mut current = text.to_string();
        for regex in &self.patterns {
            current = apply_pattern(pseudonymizer, regex, &current)?;
        }
        Ok(current)
    }
}

fn apply_pattern(pseudonymizer: &Pseudonymizer, regex: &Regex, text: &str) -> Result<String> {
    let mut spans = Vec::new();
    for found in regex.find_iter(text) {
        let found = found.map_err(|e| {
            PalosaError::ContentTransform(format!("Matching '{}' failed: {e}", regex.as_str()))
        })?;
        if found.start() < found.end() {
            spans.push((found.start(), found.end()));
        }
    }

    if spans.is_empty() {
        return Ok(text.to_string());
    }

    let mut output = String::with_capacity(text.len());
    let mut last = 0;
    for (start, end) in spans {
        output.push_str(&text[last..start]);
        output.push_str(&pseudonymizer.pseudonymize_str(&text[start..end])?);
        last = end;
    }
    output.push_str(&text[last..]);

    Ok(output)
}

fn compile_pattern(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| PalosaError::PatternCompile {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

/// Compiles `patterns` and applies them to `text` in one call
pub fn pseudo_content_regex<S: AsRef<str>>(
    pseudonymizer: &Pseudonymizer,
    text: &str,
    patterns: &[S],
) -> Result<String> {
    ContentAnonymizer::new(patterns)?.apply(pseudonymizer, text)
}

use std::fmt;

use log::warn;

use crate::error::{CiGateError, Result};

/// Marker phrase introducing a build-type directive inside a commit message.
pub const DEFAULT_MARKER: &str = "CI build types:";

/// Distribution names substituted for "linux" during pattern expansion.
pub const DEFAULT_LINUX_ALIASES: [&str; 4] = ["almalinux", "amazonlinux", "centos", "ubuntu"];

/// A single validated build-type pattern token.
///
/// Only ASCII letters, digits, `-`, `_` and `*` survive validation, so a
/// `Pattern` is always safe to hand to the glob matcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern(String);

impl Pattern {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A parsed build-type directive: the ordered, validated pattern tokens
/// extracted from a commit message. Parsed once, matched many times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    patterns: Vec<Pattern>,
}

impl Directive {
    /// Parses the build-type directive out of a commit message.
    ///
    /// Returns `Ok(None)` when the marker phrase is absent (build everything).
    /// The directive text is everything after the first occurrence of the
    /// marker, split on commas with each piece trimmed; empty pieces are
    /// dropped. Every piece containing "linux" additionally yields one
    /// variant per alias, appended after the raw list.
    ///
    /// Validation is batched: every invalid token is logged as a warning
    /// before parsing fails, so CI logs show all offenders in one run.
    pub fn parse(message: &str, marker: &str, linux_aliases: &[String]) -> Result<Option<Self>> {
        let Some(at) = message.find(marker) else {
            return Ok(None);
        };

        let raw: Vec<&str> = message[at + marker.len()..]
            .split(',')
            .map(str::trim)
            .filter(|piece| !piece.is_empty())
            .collect();

        if raw.is_empty() {
            return Err(CiGateError::Directive(format!(
                "'{marker}' is present but no patterns follow it"
            )));
        }

        let mut tokens: Vec<String> = raw.iter().map(|piece| (*piece).to_owned()).collect();
        for piece in &raw {
            if piece.contains("linux") {
                for alias in linux_aliases {
                    tokens.push(piece.replace("linux", alias));
                }
            }
        }

        let mut invalid = 0usize;
        let mut patterns = Vec::with_capacity(tokens.len());
        for token in tokens {
            if is_valid_pattern(&token) {
                patterns.push(Pattern(token));
            } else {
                warn!(
                    "Invalid build type pattern '{token}' \
                     (allowed: letters, digits, '-', '_', '*')"
                );
                invalid += 1;
            }
        }

        if invalid > 0 {
            return Err(CiGateError::InvalidPatterns { count: invalid });
        }

        Ok(Some(Self { patterns }))
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }
}

fn is_valid_pattern(token: &str) -> bool {
    token
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '*'))
}

use std::fmt;

use chrono::{DateTime, Utc};
use globset::Glob;
use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{CiGateError, Result};

use super::directive::{Directive, Pattern};

/// Whether the current build variant should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Proceed,
    Skip,
}

impl Decision {
    pub fn is_proceed(self) -> bool {
        matches!(self, Self::Proceed)
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Proceed => f.write_str("proceed"),
            Self::Skip => f.write_str("skip"),
        }
    }
}

/// One evaluated pattern and whether it matched the build type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternOutcome {
    pub pattern: String,
    pub matched: bool,
}

/// The full record of one filter evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterReport {
    pub build_type: String,
    pub decision: Decision,
    pub evaluated_at: DateTime<Utc>,
    pub patterns: Vec<PatternOutcome>,
}

/// Evaluates a parsed directive against a build type identifier.
///
/// Every pattern is wrapped as `*pattern*` and tested with glob semantics;
/// the decision is the OR across all matches. The loop never short-circuits,
/// so the report and the log both record every pattern's outcome. With no
/// directive the decision is always `Proceed`.
pub fn evaluate(directive: Option<&Directive>, build_type: &str) -> Result<FilterReport> {
    let Some(directive) = directive else {
        info!("No build type filter in commit message, proceeding with {build_type}");
        return Ok(FilterReport {
            build_type: build_type.to_owned(),
            decision: Decision::Proceed,
            evaluated_at: Utc::now(),
            patterns: Vec::new(),
        });
    };

    let mut any_match = false;
    let mut outcomes = Vec::with_capacity(directive.patterns().len());
    for pattern in directive.patterns() {
        let matched = matches_build_type(pattern, build_type)?;
        if matched {
            info!("Build type {build_type} matches pattern '{pattern}'");
        } else {
            info!("Build type {build_type} does not match pattern '{pattern}'");
        }
        any_match |= matched;
        outcomes.push(PatternOutcome {
            pattern: pattern.as_str().to_owned(),
            matched,
        });
    }

    Ok(FilterReport {
        build_type: build_type.to_owned(),
        decision: if any_match {
            Decision::Proceed
        } else {
            Decision::Skip
        },
        evaluated_at: Utc::now(),
        patterns: outcomes,
    })
}

fn matches_build_type(pattern: &Pattern, build_type: &str) -> Result<bool> {
    let glob = Glob::new(&format!("*{pattern}*"))
        .map_err(|e| CiGateError::Directive(format!("cannot compile pattern '{pattern}': {e}")))?;
    Ok(glob.compile_matcher().is_match(build_type))
}

use std::io::Read;
use std::path::Path;
use std::process::Command;

use log::debug;

use crate::error::{CiGateError, Result};

/// Resolves the commit message to filter on.
///
/// Precedence: an inline message, then a message file (`-` reads stdin),
/// then the body of the latest non-merge commit in the working directory.
pub fn resolve(inline: Option<&str>, file: Option<&Path>) -> Result<String> {
    if let Some(message) = inline {
        return Ok(message.to_owned());
    }
    if let Some(path) = file {
        return read_message_file(path);
    }
    latest_commit_message()
}

fn read_message_file(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        debug!("Reading commit message from stdin");
        let mut message = String::new();
        std::io::stdin().read_to_string(&mut message)?;
        return Ok(message);
    }
    debug!("Reading commit message from {}", path.display());
    Ok(std::fs::read_to_string(path)?)
}

fn latest_commit_message() -> Result<String> {
    debug!("Reading commit message from git");
    let output = Command::new("git")
        .args(["log", "--no-merges", "-1", "--format=%B"])
        .output()
        .map_err(|e| CiGateError::Commit(format!("failed to run git: {e}")))?;

    if !output.status.success() {
        return Err(CiGateError::Commit(format!(
            "git log exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

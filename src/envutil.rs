use crate::error::{CiGateError, Result};

/// Reads a boolean environment variable. Unset means false; anything that is
/// not a recognized true/false spelling is a configuration error.
pub fn bool_env_var(name: &str) -> Result<bool> {
    match std::env::var(name) {
        Ok(value) => parse_bool(&value).ok_or_else(|| {
            CiGateError::Config(format!("Invalid boolean value '{value}' for {name}"))
        }),
        Err(std::env::VarError::NotPresent) => Ok(false),
        Err(e) => Err(CiGateError::Config(format!("{name}: {e}"))),
    }
}

pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Reads a colon-separated directory list from an environment variable.
/// Unset yields an empty list; blank entries are dropped.
pub fn dir_list_env_var(name: &str) -> Vec<String> {
    std::env::var(name)
        .map(|value| {
            value
                .split(':')
                .map(str::trim)
                .filter(|dir| !dir.is_empty())
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

/// Quotes a value for use in a POSIX shell `export` line.
pub fn shell_quote(value: &str) -> String {
    let safe = !value.is_empty()
        && value.chars().all(|c| {
            c.is_ascii_alphanumeric()
                || matches!(c, '_' | '-' | '.' | '/' | ':' | '=' | '+' | '@' | '%' | ',')
        });
    if safe {
        value.to_owned()
    } else {
        format!("'{}'", value.replace('\'', r"'\''"))
    }
}

use std::collections::BTreeMap;
use std::fmt::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::{info, warn};

use crate::config::DispatchConfig;
use crate::envutil::{bool_env_var, dir_list_env_var, shell_quote};
use crate::error::{CiGateError, Result};

/// Environment variables worth snapshotting before handing off to a build
/// script, alongside anything prefixed `CI_`.
const ENV_VARS_TO_SAVE: [&str; 14] = [
    "AR",
    "AS",
    "ASAN_OPTIONS",
    "CC",
    "CFLAGS",
    "CPPFLAGS",
    "CXX",
    "CXXFLAGS",
    "LANG",
    "LD",
    "LDFLAGS",
    "NM",
    "PATH",
    "PYTHONPATH",
];

/// Colon-separated list of directories searched for a bare script name.
const SCRIPT_PATH_ENV_VAR: &str = "CIGATE_SCRIPT_PATH";

/// When truthy, log the dispatch instead of executing it.
const DRY_RUN_ENV_VAR: &str = "CIGATE_DRY_RUN";

/// Invokes the platform build entry point for the host OS family.
///
/// Returns the child's exit code. Exactly one entry point is selected; an
/// OS family without one is a fatal error.
pub fn dispatch(config: &DispatchConfig, build_type: &str) -> Result<i32> {
    let script = locate_script(&select_script(config)?);

    if let Some(env_file) = &config.save_env_file {
        write_env_snapshot(env_file)?;
    }

    if bool_env_var(DRY_RUN_ENV_VAR)? {
        info!("{DRY_RUN_ENV_VAR} is set, not invoking {}", script.display());
        return Ok(0);
    }

    info!("Dispatching build type {build_type} to {}", script.display());
    let status = Command::new(&script)
        .env("CI_BUILD_TYPE", build_type)
        .status()
        .map_err(|e| CiGateError::Dispatch(format!("failed to run {}: {e}", script.display())))?;

    Ok(status.code().unwrap_or_else(|| {
        warn!("{} terminated by a signal", script.display());
        1
    }))
}

fn select_script(config: &DispatchConfig) -> Result<PathBuf> {
    if cfg!(target_os = "linux") {
        Ok(PathBuf::from(&config.linux_script))
    } else if cfg!(target_os = "macos") {
        Ok(PathBuf::from(&config.macos_script))
    } else {
        Err(CiGateError::Dispatch(format!(
            "no build entry point for host OS '{}'",
            std::env::consts::OS
        )))
    }
}

/// Resolves a bare script name against `CIGATE_SCRIPT_PATH`. Paths with any
/// directory component are used as-is.
fn locate_script(script: &Path) -> PathBuf {
    if script.components().count() > 1 {
        return script.to_path_buf();
    }
    for dir in dir_list_env_var(SCRIPT_PATH_ENV_VAR) {
        let candidate = Path::new(&dir).join(script);
        if candidate.exists() {
            return candidate;
        }
    }
    script.to_path_buf()
}

/// Writes the build-relevant environment as sorted shell `export` lines.
fn write_env_snapshot(path: &Path) -> Result<()> {
    let mut vars = BTreeMap::new();
    for (key, value) in std::env::vars() {
        if ENV_VARS_TO_SAVE.contains(&key.as_str()) || key.starts_with("CI_") {
            vars.insert(key, value);
        }
    }

    let mut script = String::new();
    for (key, value) in &vars {
        let _ = writeln!(script, "export {}={}", key, shell_quote(value));
    }
    std::fs::write(path, script)?;
    info!(
        "Saved {} environment variables to {}",
        vars.len(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_script_for_host_os() {
        let config = DispatchConfig::default();
        let script = select_script(&config);
        if cfg!(target_os = "linux") {
            assert_eq!(script.unwrap(), PathBuf::from("./linux_build.sh"));
        } else if cfg!(target_os = "macos") {
            assert_eq!(script.unwrap(), PathBuf::from("./macos_build.sh"));
        } else {
            assert!(script.is_err());
        }
    }

    #[test]
    fn test_locate_script_keeps_paths_with_directories() {
        assert_eq!(
            locate_script(Path::new("./linux_build.sh")),
            PathBuf::from("./linux_build.sh")
        );
        assert_eq!(
            locate_script(Path::new("/opt/ci/build.sh")),
            PathBuf::from("/opt/ci/build.sh")
        );
    }

    #[test]
    fn test_locate_script_searches_script_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let script_path = temp_dir.path().join("variant_build.sh");
        std::fs::write(&script_path, "#!/bin/sh\n").unwrap();

        std::env::set_var(SCRIPT_PATH_ENV_VAR, temp_dir.path());
        let located = locate_script(Path::new("variant_build.sh"));
        std::env::remove_var(SCRIPT_PATH_ENV_VAR);

        assert_eq!(located, script_path);
    }

    #[test]
    fn test_env_snapshot_is_sorted_and_quoted() {
        std::env::set_var("CI_SNAPSHOT_TEST_B", "two words");
        std::env::set_var("CI_SNAPSHOT_TEST_A", "plain");

        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("build_env.sh");
        write_env_snapshot(&path).unwrap();

        std::env::remove_var("CI_SNAPSHOT_TEST_A");
        std::env::remove_var("CI_SNAPSHOT_TEST_B");

        let contents = std::fs::read_to_string(&path).unwrap();
        let a = contents.find("export CI_SNAPSHOT_TEST_A=plain").unwrap();
        let b = contents.find("export CI_SNAPSHOT_TEST_B='two words'").unwrap();
        assert!(a < b);
    }
}

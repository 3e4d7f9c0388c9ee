use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration file structure for CIGate.
///
/// Lets a repository pin the filter marker, alias expansion, and build
/// entry points next to its CI configuration. Loaded from the current
/// directory or a specified path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// Build-type filter settings
    #[serde(default)]
    pub filter: FilterConfig,

    /// Platform build dispatch settings
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// Output format preferences
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FilterConfig {
    /// Marker phrase that introduces the directive in a commit message
    #[serde(default = "default_marker")]
    pub marker: String,

    /// Distribution names substituted for "linux" during pattern expansion
    #[serde(default = "default_linux_aliases")]
    pub linux_aliases: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DispatchConfig {
    /// Build entry point invoked on Linux hosts
    #[serde(default = "default_linux_script")]
    pub linux_script: String,

    /// Build entry point invoked on macOS hosts
    #[serde(default = "default_macos_script")]
    pub macos_script: String,

    /// Write build-relevant environment variables to this file before
    /// dispatching, for CI-log debugging
    #[serde(default)]
    pub save_env_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Default report format
    #[serde(default)]
    pub format: OutputFormat,

    /// Pretty-print JSON reports
    #[serde(default)]
    pub pretty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Summary,
    Json,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            filter: FilterConfig::default(),
            dispatch: DispatchConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            marker: default_marker(),
            linux_aliases: default_linux_aliases(),
        }
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            linux_script: default_linux_script(),
            macos_script: default_macos_script(),
            save_env_file: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Summary,
            pretty: false,
        }
    }
}

fn default_marker() -> String {
    crate::filter::DEFAULT_MARKER.to_string()
}

fn default_linux_aliases() -> Vec<String> {
    crate::filter::DEFAULT_LINUX_ALIASES
        .iter()
        .map(|alias| (*alias).to_string())
        .collect()
}

fn default_linux_script() -> String {
    "./linux_build.sh".to_string()
}

fn default_macos_script() -> String {
    "./macos_build.sh".to_string()
}

impl Config {
    /// Load configuration from a file.
    ///
    /// Searches for configuration files in this order:
    /// 1. Specified path
    /// 2. ./cigate.toml
    /// 3. ./cigate.json
    /// 4. ./cigate.yaml
    /// 5. ./cigate.yml
    ///
    /// Returns default configuration if no file is found.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_path(path);
        }

        // Try common configuration file names
        let candidates = ["cigate.toml", "cigate.json", "cigate.yaml", "cigate.yml"];

        for candidate in &candidates {
            let path = Path::new(candidate);
            if path.exists() {
                return Self::load_from_path(path);
            }
        }

        // No config file found, return defaults
        Ok(Self::default())
    }

    /// Load configuration from a specific file path.
    fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

        match extension {
            "toml" => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display())),
            "json" => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display())),
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display())),
            _ => {
                // Try TOML first, then JSON, then YAML
                toml::from_str(&contents)
                    .or_else(|_| serde_json::from_str(&contents))
                    .or_else(|_| serde_yaml::from_str(&contents))
                    .with_context(|| format!("Failed to parse config file: {}", path.display()))
            }
        }
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::to_string_pretty(self)?,
            Some("yaml") | Some("yml") => serde_yaml::to_string(self)?,
            _ => toml::to_string_pretty(self)?,
        };

        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.filter.marker, "CI build types:");
        assert_eq!(
            config.filter.linux_aliases,
            vec!["almalinux", "amazonlinux", "centos", "ubuntu"]
        );
        assert_eq!(config.dispatch.linux_script, "./linux_build.sh");
        assert_eq!(config.dispatch.macos_script, "./macos_build.sh");
        assert_eq!(config.output.format, OutputFormat::Summary);
        assert!(!config.output.pretty);
    }

    #[test]
    fn test_load_toml_config() {
        let mut temp_file = NamedTempFile::with_suffix(".toml").unwrap();
        let toml_content = r#"
[filter]
marker = "Build variants:"
linux-aliases = ["debian", "fedora"]

[dispatch]
linux-script = "ci/build_linux.sh"
save-env-file = "build_env.sh"

[output]
format = "json"
pretty = true
"#;
        write!(temp_file, "{}", toml_content).unwrap();

        let config = Config::load_from_path(temp_file.path()).unwrap();
        assert_eq!(config.filter.marker, "Build variants:");
        assert_eq!(config.filter.linux_aliases, vec!["debian", "fedora"]);
        assert_eq!(config.dispatch.linux_script, "ci/build_linux.sh");
        assert_eq!(
            config.dispatch.save_env_file,
            Some(PathBuf::from("build_env.sh"))
        );
        // Unset fields keep their defaults
        assert_eq!(config.dispatch.macos_script, "./macos_build.sh");
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(config.output.pretty);
    }

    #[test]
    fn test_load_json_config() {
        let mut temp_file = NamedTempFile::with_suffix(".json").unwrap();
        let json_content = r#"{
  "filter": {
    "marker": "Run only:"
  },
  "output": {
    "format": "json"
  }
}"#;
        write!(temp_file, "{}", json_content).unwrap();

        let config = Config::load_from_path(temp_file.path()).unwrap();
        assert_eq!(config.filter.marker, "Run only:");
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_load_yaml_config() {
        let mut temp_file = NamedTempFile::with_suffix(".yaml").unwrap();
        let yaml_content = r"
dispatch:
  macos-script: ci/build_macos.sh
";
        write!(temp_file, "{}", yaml_content).unwrap();

        let config = Config::load_from_path(temp_file.path()).unwrap();
        assert_eq!(config.dispatch.macos_script, "ci/build_macos.sh");
    }

    #[test]
    fn test_load_explicit_missing_path_is_an_error() {
        let result = Config::load(Some(Path::new("no-such-cigate-config.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("cigate.toml");

        let mut config = Config::default();
        config.filter.marker = "Variants:".to_string();
        config.dispatch.save_env_file = Some(PathBuf::from("env.sh"));
        config.save(&path).unwrap();

        let reloaded = Config::load(Some(&path)).unwrap();
        assert_eq!(reloaded.filter.marker, "Variants:");
        assert_eq!(reloaded.dispatch.save_env_file, Some(PathBuf::from("env.sh")));
    }
}

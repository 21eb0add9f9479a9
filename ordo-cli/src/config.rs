/// Config file loading and creation for the ordo CLI.
///
/// Config lives at ~/.config/ordo/config.toml.
/// All fields are optional — CLI args override config values.
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::bail;

#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct OrdoConfig {
    pub curve: Option<String>,
    pub json: Option<bool>,
    pub limit: Option<f64>,
    pub precision: Option<usize>,
    pub max_fit_iterations: Option<usize>,
}

const DEFAULT_CONFIG_TEMPLATE: &str = "\
# ordo configuration
# All values here can be overridden by CLI flags.

# Value curve to use without asking: \"linear\" or \"exponential\"
# curve = \"linear\"

# Print the summary as JSON instead of a table
# json = false

# Hide items whose price - value is above this number
# limit = 50

# Decimal places shown in the summary table
# precision = 0

# Iteration cap for the exponential fit
# max_fit_iterations = 200
";

/// Returns the default config path: ~/.config/ordo/config.toml
pub fn config_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| bail("HOME environment variable not set"));
    PathBuf::from(home).join(".config").join("ordo").join("config.toml")
}

pub fn parse_config(content: &str) -> Result<OrdoConfig, toml::de::Error> {
    toml::from_str(content)
}

/// Load config from a file path. Returns default (all None) if file doesn't exist.
pub fn load_config(path: &Path) -> OrdoConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_config(&content)
            .unwrap_or_else(|e| bail(format!("Failed to parse config at {}: {e}", path.display()))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => OrdoConfig::default(),
        Err(e) => bail(format!("Failed to read config at {}: {e}", path.display())),
    }
}

/// Create the default config file. Errors if it already exists.
pub fn create_default_config() -> PathBuf {
    let path = config_path();

    if path.exists() {
        bail(format!("Config file already exists at {}", path.display()));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .unwrap_or_else(|e| bail(format!("Failed to create directory {}: {e}", parent.display())));
    }

    std::fs::write(&path, DEFAULT_CONFIG_TEMPLATE)
        .unwrap_or_else(|e| bail(format!("Failed to write config to {}: {e}", path.display())));

    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_parses_to_defaults() {
        assert_eq!(parse_config(DEFAULT_CONFIG_TEMPLATE).unwrap(), OrdoConfig::default());
    }

    #[test]
    fn test_parse_all_fields() {
        let cfg = parse_config(
            "curve = \"exponential\"\njson = true\nlimit = 12.5\nprecision = 2\nmax_fit_iterations = 50\n",
        )
        .unwrap();
        assert_eq!(cfg.curve.as_deref(), Some("exponential"));
        assert_eq!(cfg.json, Some(true));
        assert_eq!(cfg.limit, Some(12.5));
        assert_eq!(cfg.precision, Some(2));
        assert_eq!(cfg.max_fit_iterations, Some(50));
    }

    #[test]
    fn test_unknown_type_is_error() {
        assert!(parse_config("json = \"yes\"").is_err());
    }

    #[test]
    fn test_missing_file_gives_default() {
        let cfg = load_config(Path::new("/nonexistent/ordo/config.toml"));
        assert_eq!(cfg, OrdoConfig::default());
    }
}

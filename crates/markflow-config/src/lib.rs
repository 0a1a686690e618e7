use markflow_tokenizer::ParseOptions;
use markflow_tokenizer::code::LINK_REFERENCE_SIZE_MAX;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tokenizer: TokenizerConfig,
}

/// The `[tokenizer]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerConfig {
    /// Reserve `[^` for footnotes.
    pub hidden_footnote_support: bool,
    /// Maximum number of characters in a link label.
    pub label_size_max: usize,
    /// Names of built-in constructs to turn off, e.g. `"attention"`.
    pub disable: Vec<String>,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            hidden_footnote_support: false,
            label_size_max: LINK_REFERENCE_SIZE_MAX,
            disable: Vec::new(),
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/markflow");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Expand `~` and environment variables in a user supplied path.
    pub fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }

    /// Tokenizer options described by this config.
    pub fn to_parse_options(&self) -> ParseOptions {
        let tokenizer = &self.tokenizer;
        ParseOptions {
            hidden_footnote_support: tokenizer.hidden_footnote_support,
            label_size_max: tokenizer.label_size_max,
            disable: tokenizer.disable.clone(),
            ..ParseOptions::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use markflow_tokenizer::{TokenKind, tokenize};
    use pretty_assertions::assert_eq;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/markflow/config.toml"));
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.tokenizer.label_size_max, 999);
    }

    #[test]
    fn test_partial_tokenizer_table() {
        let config_content = r#"
[tokenizer]
disable = ["labelStartImage", "attention"]
"#;

        let config: Config = toml::from_str(config_content).unwrap();

        assert!(!config.tokenizer.hidden_footnote_support);
        assert_eq!(config.tokenizer.label_size_max, 999);
        assert_eq!(config.tokenizer.disable, vec!["labelStartImage", "attention"]);
    }

    #[test]
    fn test_to_parse_options() {
        let config = Config {
            tokenizer: TokenizerConfig {
                hidden_footnote_support: true,
                label_size_max: 10,
                disable: vec!["headingAtx".to_string()],
            },
        };

        let options = config.to_parse_options();

        assert!(options.hidden_footnote_support);
        assert_eq!(options.label_size_max, 10);
        assert_eq!(options.disable, vec!["headingAtx".to_string()]);
        assert!(options.extensions.is_empty());
    }

    #[test]
    fn test_options_change_tokenizing() {
        let config: Config = toml::from_str("[tokenizer]\ndisable = [\"headingAtx\"]\n").unwrap();
        let events = tokenize("# a", &config.to_parse_options());

        assert!(!events.iter().any(|e| e.token.kind == TokenKind::ATX_HEADING));
        assert!(events.iter().any(|e| e.token.kind == TokenKind::PARAGRAPH));
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let path = PathBuf::from("~/test/path");
        let expanded = Config::expand_path(&path);

        assert!(expanded.is_some());
        let expanded = expanded.unwrap();
        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.to_string_lossy().contains("test/path"));
    }

    #[test]
    fn test_expand_path_with_env_var() {
        unsafe {
            env::set_var("MARKFLOW_TEST_DIR", "/test/env/path");
        }

        let path = PathBuf::from("$MARKFLOW_TEST_DIR/config.toml");
        let expanded = Config::expand_path(&path);

        assert_eq!(expanded, Some(PathBuf::from("/test/env/path/config.toml")));

        unsafe {
            env::remove_var("MARKFLOW_TEST_DIR");
        }
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_load_invalid_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "[tokenizer]\nlabel_size_max = \"many\"\n").unwrap();

        let error = Config::load_from_path(&config_file).unwrap_err();

        assert!(matches!(error, ConfigError::ConfigParseError { .. }));
        assert!(error.to_string().contains("config.toml"));
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("config.toml");
        let test_config = Config {
            tokenizer: TokenizerConfig {
                hidden_footnote_support: true,
                label_size_max: 42,
                disable: vec!["attention".to_string()],
            },
        };

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
    }
}

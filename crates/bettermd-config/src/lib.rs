use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

const DEFAULT_TEMPLATE: &str = "default";

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

/// User settings for BetterMD, stored as TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory new and saved documents live in.
    pub documents_path: PathBuf,
    /// Preview template sent with every render request.
    #[serde(default = "default_template")]
    pub template: String,
    /// Plugin ids to enable at session start, in order.
    #[serde(default)]
    pub enabled_plugins: Vec<String>,
}

fn default_template() -> String {
    DEFAULT_TEMPLATE.to_string()
}

impl Config {
    pub fn new(documents_path: impl Into<PathBuf>) -> Self {
        Self {
            documents_path: documents_path.into(),
            template: default_template(),
            enabled_plugins: Vec::new(),
        }
    }

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

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the loaded documents path
        config.documents_path =
            Self::expand_path(&config.documents_path).unwrap_or(config.documents_path);

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        Self::load_from_path(Self::config_path())
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

    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to_path(Self::config_path())
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/bettermd");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Resolve a document name against [`documents_path`](Self::documents_path).
    /// Absolute paths are returned unchanged.
    pub fn document_path(&self, name: impl AsRef<Path>) -> PathBuf {
        self.documents_path.join(name)
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/bettermd/config.toml"));
    }

    #[test]
    fn test_defaults_when_fields_missing() {
        let config: Config = toml::from_str(r#"documents_path = "/tmp/docs""#).unwrap();

        assert_eq!(config, Config::new("/tmp/docs"));
        assert_eq!(config.template, "default");
        assert!(config.enabled_plugins.is_empty());
    }

    #[test]
    fn test_full_config_parses() {
        let config_content = r#"
documents_path = "/srv/md"
template = "academic"
enabled_plugins = ["math-formula", "code-highlight"]
"#;

        let config: Config = toml::from_str(config_content).unwrap();

        assert_eq!(config.template, "academic");
        assert_eq!(config.enabled_plugins, vec!["math-formula", "code-highlight"]);
    }

    #[test]
    fn test_expand_path_with_env_var() {
        unsafe {
            env::set_var("BETTERMD_TEST_VAR", "/test/env/path");
        }

        let expanded = Config::expand_path(Path::new("$BETTERMD_TEST_VAR/subdir")).unwrap();
        assert_eq!(expanded, PathBuf::from("/test/env/path/subdir"));

        unsafe {
            env::remove_var("BETTERMD_TEST_VAR");
        }
    }

    #[test]
    fn test_expand_path_leaves_plain_paths() {
        for path in ["/absolute/path", "relative/path"] {
            assert_eq!(Config::expand_path(Path::new(path)).unwrap(), PathBuf::from(path));
        }
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let result = Config::load_from_path(temp_dir.path().join("nonexistent.toml")).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_load_invalid_toml_reports_path() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "documents_path = [").unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();

        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested/config.toml");
        let mut config = Config::new("/tmp/test-docs");
        config.template = "minimal".to_string();
        config.enabled_plugins = vec!["task-management".to_string()];

        config.save_to_path(&config_file).unwrap();
        let loaded = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_tilde_expanded_on_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, r#"documents_path = "~/bettermd-docs""#).unwrap();

        let loaded = Config::load_from_path(&config_file).unwrap().unwrap();
        let path = loaded.documents_path.to_string_lossy();

        assert!(!path.starts_with('~'));
        assert!(path.ends_with("bettermd-docs"));
    }

    #[test]
    fn test_document_path() {
        let config = Config::new("/srv/md");
        assert_eq!(config.document_path("notes.md"), PathBuf::from("/srv/md/notes.md"));
        assert_eq!(config.document_path("/abs/x.md"), PathBuf::from("/abs/x.md"));
    }
}

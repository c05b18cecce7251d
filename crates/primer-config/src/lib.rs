//! Configuration management for Primer.
//!
//! Parses `primer.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 7979
//!
//! [site]
//! title = "GCE A Level Physics"
//!
//! [docs]
//! source_dir = "content"
//! navigation = "navigation.toml"
//!
//! [blocks]
//! PracticeMCQ_Homogenity = "practice-mcq"
//!
//! [pages."/physics/measurements/physical_quantities_prefixes"]
//! blocks = ["BaseUnitTable", "PracticeMCQ_Homogenity"]
//! ```
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `server.host`
//! - `site.title`

mod expand;

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use primer_nav::Route;
use primer_renderer::BuiltinBlock;
use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override content directory.
    pub source_dir: Option<PathBuf>,
    /// Override navigation file.
    pub navigation: Option<PathBuf>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "primer.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Site presentation.
    pub site: SiteSection,
    /// Content locations (paths are relative strings from TOML).
    docs: DocsConfigRaw,
    /// Component name to built-in kind, as written in TOML.
    blocks: BTreeMap<String, String>,
    /// Per-route block restrictions, as written in TOML.
    pages: BTreeMap<String, PageConfigRaw>,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Resolved block aliases (set after loading).
    #[serde(skip)]
    pub aliases: BTreeMap<String, BuiltinBlock>,
    /// Resolved per-route block lists (set after loading).
    #[serde(skip)]
    pub page_blocks: HashMap<Route, Vec<String>>,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7979,
        }
    }
}

/// `[site]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteSection {
    /// Title shown in the sidebar and the browser tab.
    pub title: String,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            title: "Primer".to_owned(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    source_dir: Option<String>,
    navigation: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct PageConfigRaw {
    blocks: Vec<String>,
}

/// Resolved content locations with absolute paths.
#[derive(Debug, Default)]
pub struct DocsConfig {
    /// Directory holding lesson documents.
    pub source_dir: PathBuf,
    /// Navigation tree file.
    pub navigation: PathBuf,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`site.title`").
        field: String,
        /// Error message.
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `primer.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(source_dir) = &settings.source_dir {
            self.docs_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(navigation) = &settings.navigation {
            self.docs_resolved.navigation.clone_from(navigation);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            server: ServerConfig::default(),
            site: SiteSection::default(),
            docs: DocsConfigRaw::default(),
            blocks: BTreeMap::new(),
            pages: BTreeMap::new(),
            docs_resolved: DocsConfig {
                source_dir: base.join("content"),
                navigation: base.join("navigation.toml"),
            },
            aliases: BTreeMap::new(),
            page_blocks: HashMap::new(),
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve(config_dir)?;
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        require_non_empty(&self.site.title, "site.title")?;
        self.validate_pages()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        // Port 0 lets the OS pick; never what a config file means.
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        Ok(())
    }

    /// Every name listed for a page must be a built-in default name or a
    /// configured alias.
    fn validate_pages(&self) -> Result<(), ConfigError> {
        for (route, names) in &self.page_blocks {
            for name in names {
                let builtin = BuiltinBlock::ALL
                    .iter()
                    .any(|b| b.default_name() == name.as_str());
                if !builtin && !self.aliases.contains_key(name) {
                    return Err(ConfigError::Validation(format!(
                        "pages.\"{route}\".blocks: unknown block {name:?}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;
        self.site.title = expand::expand_env(&self.site.title, "site.title")?;
        Ok(())
    }

    /// Resolve relative paths against the config directory and parse block
    /// kinds and page routes.
    fn resolve(&mut self, config_dir: &Path) -> Result<(), ConfigError> {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.docs_resolved = DocsConfig {
            source_dir: resolve(self.docs.source_dir.as_deref(), "content"),
            navigation: resolve(self.docs.navigation.as_deref(), "navigation.toml"),
        };

        self.aliases = self
            .blocks
            .iter()
            .map(|(name, kind)| {
                let block = kind.parse::<BuiltinBlock>().map_err(|err| {
                    ConfigError::Validation(format!("blocks.{name}: {err}"))
                })?;
                Ok((name.clone(), block))
            })
            .collect::<Result<_, ConfigError>>()?;

        self.page_blocks = self
            .pages
            .iter()
            .map(|(raw, page)| {
                let route = Route::parse(raw)
                    .map_err(|err| ConfigError::Validation(format!("pages.\"{raw}\": {err}")))?;
                Ok((route, page.blocks.clone()))
            })
            .collect::<Result<_, ConfigError>>()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 7979);
        assert_eq!(config.site.title, "Primer");
        assert_eq!(config.docs_resolved.source_dir, PathBuf::from("/test/content"));
        assert_eq!(
            config.docs_resolved.navigation,
            PathBuf::from("/test/navigation.toml")
        );
        assert!(config.aliases.is_empty());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 7979);
    }

    #[test]
    fn test_parse_server_config() {
        let toml = r#"
[server]
host = "0.0.0.0"
port = 9000
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[docs]
source_dir = "app/physics"
navigation = "nav/sidebar.toml"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve(Path::new("/project")).unwrap();

        assert_eq!(
            config.docs_resolved.source_dir,
            PathBuf::from("/project/app/physics")
        );
        assert_eq!(
            config.docs_resolved.navigation,
            PathBuf::from("/project/nav/sidebar.toml")
        );
    }

    #[test]
    fn test_resolve_blocks_and_pages() {
        let toml = r#"
[blocks]
PracticeMCQ_Homogenity = "practice-mcq"
ExamTip = "callout"

[pages."/physics/measurements/physical_quantities_prefixes/"]
blocks = ["BaseUnitTable", "PracticeMCQ_Homogenity"]
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve(Path::new("/project")).unwrap();

        assert_eq!(
            config.aliases,
            BTreeMap::from([
                ("ExamTip".to_owned(), BuiltinBlock::Callout),
                ("PracticeMCQ_Homogenity".to_owned(), BuiltinBlock::PracticeMcq),
            ])
        );
        let route = Route::parse("/physics/measurements/physical_quantities_prefixes").unwrap();
        assert_eq!(
            config.page_blocks.get(&route),
            Some(&vec![
                "BaseUnitTable".to_owned(),
                "PracticeMCQ_Homogenity".to_owned()
            ])
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_block_kind_rejected() {
        let toml = r#"
[blocks]
Quiz = "quiz"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let err = config.resolve(Path::new("/project")).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("blocks.Quiz"));
    }

    #[test]
    fn test_invalid_page_route_rejected() {
        let toml = r#"
[pages."../secrets"]
blocks = []
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let err = config.resolve(Path::new("/project")).unwrap_err();
        assert!(err.to_string().contains("../secrets"));
    }

    #[test]
    fn test_unknown_page_field_rejected() {
        let toml = r#"
[pages."/a"]
components = ["Callout"]
"#;
        assert!(toml::from_str::<Config>(toml).is_err());
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            port: Some(9000),
            source_dir: Some(PathBuf::from("/custom/content")),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(
            config.docs_resolved.source_dir,
            PathBuf::from("/custom/content")
        );
        assert_eq!(
            config.docs_resolved.navigation,
            PathBuf::from("/test/navigation.toml")
        );
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.apply_cli_settings(&CliSettings::default());
        assert_eq!(config.server.port, 7979);
        assert_eq!(config.docs_resolved.source_dir, PathBuf::from("/test/content"));
    }

    #[test]
    fn test_expand_env_vars_default() {
        let toml = r#"
[site]
title = "${PRIMER_CONFIG_TEST_TITLE:-GCE A Level Physics}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();
        assert_eq!(config.site.title, "GCE A Level Physics");
    }

    #[test]
    fn test_expand_env_vars_missing_required_var() {
        let toml = r#"
[server]
host = "${PRIMER_CONFIG_TEST_MISSING_HOST}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let err = config.expand_env_vars().unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("PRIMER_CONFIG_TEST_MISSING_HOST"));
        assert!(err.to_string().contains("server.host"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("primer.toml");
        std::fs::write(
            &path,
            r#"
[site]
title = "GCE A Level Physics"

[docs]
source_dir = "lessons"
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.site.title, "GCE A Level Physics");
        assert_eq!(config.docs_resolved.source_dir, dir.path().join("lessons"));
        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let err = Config::load(Some(Path::new("/nonexistent/primer.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_validates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("primer.toml");
        std::fs::write(
            &path,
            r#"
[pages."/physics"]
blocks = ["PracticeMCQ_Homogenity"]
"#,
        )
        .unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();
        assert_validation_error(&err, &["/physics", "PracticeMCQ_Homogenity"]);
    }

    #[test]
    fn test_validate_default_config_passes() {
        let config = Config::default_with_base(Path::new("/test"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_server_port_zero() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.server.port = 0;
        assert_validation_error(&config.validate().unwrap_err(), &["server.port"]);
    }

    #[test]
    fn test_validate_empty_title() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.site.title = "  ".to_owned();
        assert_validation_error(&config.validate().unwrap_err(), &["site.title", "empty"]);
    }

    /// Assert a validation error containing every expected substring.
    fn assert_validation_error(err: &ConfigError, expected_substrings: &[&str]) {
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        let msg = err.to_string();
        for s in expected_substrings {
            assert!(
                msg.contains(s),
                "Expected error to contain '{s}', got: {msg}"
            );
        }
    }
}

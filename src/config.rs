//! Project configuration
//!
//! A project can be described by a TOML file; every key is optional and
//! falls back to the defaults of the command-line tool:
//!
//! ```toml
//! dir = "src/templates"
//! namespace = "MyApp.templates"
//! extension = ".jstml"
//! component = false
//! out_dir = "dist"
//!
//! [compiler]
//! strict = true
//! class_prefix = "c-"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::template::CompilerConfig;

/// Default root namespace for compiled templates
pub const DEFAULT_NAMESPACE: &str = "APP.TEMPLATE";

/// Default template file extension
pub const DEFAULT_EXTENSION: &str = ".jstml";

/// Errors that can occur when loading a project configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Settings for one compilation run over a template directory
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectConfig {
    /// Directory searched recursively for templates
    pub dir: PathBuf,
    /// Root namespace; empty emits bare function declarations
    pub namespace: String,
    /// File name suffix selecting template files
    pub extension: String,
    /// Compile files as components instead of plain templates
    pub component: bool,
    /// Directory receiving component output files
    pub out_dir: PathBuf,
    /// Code generation settings
    pub compiler: CompilerConfig,
}

/// TOML structure for deserializing project configs
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlProjectConfig {
    dir: Option<PathBuf>,
    namespace: Option<String>,
    extension: Option<String>,
    component: Option<bool>,
    out_dir: Option<PathBuf>,
    compiler: Option<CompilerConfig>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            namespace: DEFAULT_NAMESPACE.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
            component: false,
            out_dir: PathBuf::from("."),
            compiler: CompilerConfig::default(),
        }
    }
}

impl ProjectConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlProjectConfig = toml::from_str(content)?;
        let defaults = Self::default();

        Ok(ProjectConfig {
            dir: parsed.dir.unwrap_or(defaults.dir),
            namespace: parsed.namespace.unwrap_or(defaults.namespace),
            extension: parsed.extension.unwrap_or(defaults.extension),
            component: parsed.component.unwrap_or(defaults.component),
            out_dir: parsed.out_dir.unwrap_or(defaults.out_dir),
            compiler: parsed.compiler.unwrap_or(defaults.compiler),
        })
    }

    /// Set the template directory
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = dir.into();
        self
    }

    /// Set the root namespace
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Set the template file extension
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Enable or disable component mode
    pub fn with_component(mut self, component: bool) -> Self {
        self.component = component;
        self
    }

    /// Set the component output directory
    pub fn with_out_dir(mut self, out_dir: impl Into<PathBuf>) -> Self {
        self.out_dir = out_dir.into();
        self
    }

    /// Set the code generation settings
    pub fn with_compiler(mut self, compiler: CompilerConfig) -> Self {
        self.compiler = compiler;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ProjectConfig::default();
        assert_eq!(config.dir, PathBuf::from("."));
        assert_eq!(config.namespace, "APP.TEMPLATE");
        assert_eq!(config.extension, ".jstml");
        assert!(!config.component);
        assert_eq!(config.compiler, CompilerConfig::default());
    }

    #[test]
    fn test_parse_full_toml() {
        let toml_str = r#"
dir = "src/templates"
namespace = "MyApp.templates"
extension = ".tpl"
component = true
out_dir = "dist"

[compiler]
strict = true
class_prefix = "cmp-"
"#;
        let config = ProjectConfig::from_str(toml_str).expect("Should parse");
        assert_eq!(config.dir, PathBuf::from("src/templates"));
        assert_eq!(config.namespace, "MyApp.templates");
        assert_eq!(config.extension, ".tpl");
        assert!(config.component);
        assert_eq!(config.out_dir, PathBuf::from("dist"));
        assert!(config.compiler.strict);
        assert_eq!(config.compiler.class_prefix, "cmp-");
        // unspecified compiler keys keep their defaults
        assert_eq!(config.compiler.variable, "__jstml");
    }

    #[test]
    fn test_parse_empty_toml_gives_defaults() {
        let config = ProjectConfig::from_str("").expect("Should parse");
        assert_eq!(config, ProjectConfig::default());
    }

    #[test]
    fn test_empty_namespace_allowed() {
        let config = ProjectConfig::from_str(r#"namespace = """#).expect("Should parse");
        assert_eq!(config.namespace, "");
    }

    #[test]
    fn test_unknown_key_error() {
        let result = ProjectConfig::from_str("directory = \"x\"");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_invalid_toml_error() {
        let result = ProjectConfig::from_str("this is not valid toml {{{{");
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_pattern() {
        let config = ProjectConfig::new()
            .with_dir("views")
            .with_namespace("UI")
            .with_extension(".html")
            .with_component(true)
            .with_out_dir("build")
            .with_compiler(CompilerConfig::new().with_strict(true));

        assert_eq!(config.dir, PathBuf::from("views"));
        assert_eq!(config.namespace, "UI");
        assert_eq!(config.extension, ".html");
        assert!(config.component);
        assert_eq!(config.out_dir, PathBuf::from("build"));
        assert!(config.compiler.strict);
    }
}

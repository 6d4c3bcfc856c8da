//! Tool configuration
//!
//! `defaults/pipp.default.toml` is embedded into the binary so the documented defaults
//! and the runtime behavior cannot drift apart. Callers layer a user file and command
//! line overrides on top via [Loader] before deserializing into [PippConfig].

use super::diagnostics::Severity;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../../defaults/pipp.default.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct PippConfig {
    pub compiler: CompilerConfig,
    pub diagnostics: DiagnosticsConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompilerConfig {
    /// Style guide for documents that declare none
    pub default_style: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiagnosticsConfig {
    pub minimum_severity: Severity,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub pretty: bool,
}

/// Settings given on the command line; `None` keeps the configured value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    pub default_style: Option<String>,
    pub minimum_severity: Option<String>,
    /// Print single-line JSON
    pub compact: bool,
}

/// Builds a [PippConfig]: embedded defaults, then `pipp.toml` style files, then the
/// command line
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    fn layer(mut self, path: &Path, required: bool) -> Self {
        let source = File::from(path).format(FileFormat::Toml).required(required);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer a configuration file that must exist
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path.as_ref(), true)
    }

    /// Layer a configuration file, skipping it when absent
    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path.as_ref(), false)
    }

    /// Apply a single key/value override
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Apply the command line settings over every file layer
    pub fn with_cli(self, overrides: &CliOverrides) -> Result<Self, ConfigError> {
        let mut loader = self;
        if let Some(style) = &overrides.default_style {
            loader = loader.set_override("compiler.default_style", style.as_str())?;
        }
        if let Some(severity) = &overrides.minimum_severity {
            loader = loader.set_override("diagnostics.minimum_severity", severity.as_str())?;
        }
        if overrides.compact {
            loader = loader.set_override("output.pretty", false)?;
        }
        Ok(loader)
    }

    pub fn build(self) -> Result<PippConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

pub fn load_defaults() -> Result<PippConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.compiler.default_style, "pipp");
        assert_eq!(config.diagnostics.minimum_severity, Severity::Low);
        assert!(config.output.pretty);
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("compiler.default_style", "MLA9")
            .expect("override to apply")
            .set_override("diagnostics.minimum_severity", "high")
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.compiler.default_style, "MLA9");
        assert_eq!(config.diagnostics.minimum_severity, Severity::High);
    }

    #[test]
    fn applies_command_line_settings() {
        let overrides = CliOverrides {
            default_style: Some("MLA9".to_string()),
            minimum_severity: None,
            compact: true,
        };
        let config = Loader::new()
            .with_cli(&overrides)
            .expect("overrides to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.compiler.default_style, "MLA9");
        assert_eq!(config.diagnostics.minimum_severity, Severity::Low);
        assert!(!config.output.pretty);
    }

    #[test]
    fn empty_command_line_keeps_defaults() {
        let config = Loader::new()
            .with_cli(&CliOverrides::default())
            .expect("overrides to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.compiler.default_style, "pipp");
        assert!(config.output.pretty);
    }

    #[test]
    fn unknown_severity_fails_to_build() {
        let overrides = CliOverrides {
            minimum_severity: Some("urgent".to_string()),
            ..CliOverrides::default()
        };
        let result = Loader::new().with_cli(&overrides).and_then(Loader::build);
        assert!(result.is_err());
    }

    #[test]
    fn missing_required_file_fails() {
        let result = Loader::new()
            .with_file("/nonexistent/pipp/config.toml")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn missing_optional_file_is_skipped() {
        let config = Loader::new()
            .with_optional_file("/nonexistent/pipp/config.toml")
            .build()
            .expect("config to build");
        assert!(config.output.pretty);
    }
}

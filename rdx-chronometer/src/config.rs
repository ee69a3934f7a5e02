//! Defines the configuration structures for chronometer tooling.
//!
//! These structs are deserialized with `serde` from layered sources: built-in
//! defaults, an optional TOML file, then `CHRONO__`-prefixed environment
//! variables (for example `CHRONO__TASKS__AUTO_START=false`).

use crate::common::SortOrder;
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::Path;

/// The top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChronoConfig {
    /// Flags applied by `TaskRegistry::create_task`.
    pub tasks: TaskDefaults,

    /// How readings are shown to a human.
    pub display: DisplayConfig,
}

/// Default flags for newly created tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TaskDefaults {
    /// Read the monotonic clock instead of the wall clock.
    pub high_resolution: bool,
    /// Start the chronometer as soon as the task is created.
    pub auto_start: bool,
}

/// Display settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Fractional-second digits, at most 9.
    pub precision: usize,
    /// Order used when listing laps.
    pub lap_order: SortOrder,
}

impl Default for TaskDefaults {
    fn default() -> Self {
        Self {
            high_resolution: true,
            auto_start: true,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            precision: 6,
            lap_order: SortOrder::Ascending,
        }
    }
}

impl ChronoConfig {
    /// Loads the configuration, reading `path` when given.
    ///
    /// A missing file at `path` is an error; environment overrides always apply.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }
        let config: Self = builder
            .add_source(Environment::with_prefix("CHRONO").separator("__"))
            .build()?
            .try_deserialize()?;
        Ok(config.normalized())
    }

    /// Parses a TOML document without consulting the environment.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        Ok(config.normalized())
    }

    #[doc(hidden)]
    fn normalized(mut self) -> Self {
        self.display.precision = self.display.precision.min(9);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ChronoConfig::default();
        assert!(config.tasks.high_resolution);
        assert!(config.tasks.auto_start);
        assert_eq!(config.display.precision, 6);
        assert_eq!(config.display.lap_order, SortOrder::Ascending);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ChronoConfig::from_toml(
            r#"
            [tasks]
            auto_start = false

            [display]
            lap_order = "descending"
            "#,
        )
        .unwrap();
        assert!(config.tasks.high_resolution);
        assert!(!config.tasks.auto_start);
        assert_eq!(config.display.precision, 6);
        assert_eq!(config.display.lap_order, SortOrder::Descending);
    }

    #[test]
    fn test_precision_is_clamped() {
        let config = ChronoConfig::from_toml("[display]\nprecision = 12\n").unwrap();
        assert_eq!(config.display.precision, 9);
    }

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(ChronoConfig::from_toml("").unwrap(), ChronoConfig::default());
    }

    #[test]
    fn test_bad_type_is_an_error() {
        assert!(ChronoConfig::from_toml("[tasks]\nauto_start = \"sometimes\"\n").is_err());
    }

    #[test]
    fn test_load_layers_environment_over_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[tasks]\nhigh_resolution = false\nauto_start = true\n\n[display]\nprecision = 3"
        )
        .unwrap();

        let from_file = ChronoConfig::load(Some(file.path())).unwrap();
        assert!(!from_file.tasks.high_resolution);
        assert!(from_file.tasks.auto_start);
        assert_eq!(from_file.display.precision, 3);

        env::set_var("CHRONO__TASKS__AUTO_START", "false");
        let layered = ChronoConfig::load(Some(file.path()));
        env::remove_var("CHRONO__TASKS__AUTO_START");

        let layered = layered.unwrap();
        assert!(!layered.tasks.high_resolution);
        assert!(!layered.tasks.auto_start);
        assert_eq!(layered.display.precision, 3);
        assert_eq!(layered.display.lap_order, SortOrder::Ascending);
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(ChronoConfig::load(Some(missing.as_path())).is_err());
    }
}

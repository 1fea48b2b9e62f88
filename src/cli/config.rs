//! Configuration file
//!
//! Every key is optional. Command-line options override the file.
//!
//! ```json
//! {
//!   "dataset": "books",
//!   "data_file": "/srv/library/Books_data.csv",
//!   "output_file": "library_output.csv",
//!   "display_limit": 50,
//!   "log_level": "warn"
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::observability::{log_event_with_fields, Event, Severity};
use crate::schema::{presets, Schema, SchemaLoader};
use crate::storage::{resolve_data_path, resolve_output_path};

use super::args::GlobalArgs;
use super::errors::{CliError, CliResult};

/// Built-in datasets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Dataset {
    Students,
    Books,
}

impl Dataset {
    pub fn schema(&self) -> Schema {
        match self {
            Dataset::Students => presets::students_performance(),
            Dataset::Books => presets::library_books(),
        }
    }

    pub fn default_data_file(&self) -> &'static str {
        match self {
            Dataset::Students => presets::STUDENTS_DATA_FILE,
            Dataset::Books => presets::BOOKS_DATA_FILE,
        }
    }

    pub fn default_output_file(&self) -> &'static str {
        match self {
            Dataset::Students => presets::STUDENTS_OUTPUT_FILE,
            Dataset::Books => presets::BOOKS_OUTPUT_FILE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Built-in dataset (default: students)
    #[serde(default = "default_dataset")]
    pub dataset: Dataset,

    /// JSON schema file; replaces the dataset's built-in schema
    #[serde(default)]
    pub schema_path: Option<PathBuf>,

    /// Input file (default: the dataset's file next to the executable)
    #[serde(default)]
    pub data_file: Option<PathBuf>,

    /// Save target (default: the dataset's output file in the working directory)
    #[serde(default)]
    pub output_file: Option<PathBuf>,

    /// Max records printed by `show` (default 200)
    #[serde(default = "default_display_limit")]
    pub display_limit: usize,

    /// trace | info | warn | error (default info)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_dataset() -> Dataset {
    Dataset::Students
}
fn default_display_limit() -> usize {
    200
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset: default_dataset(),
            schema_path: None,
            data_file: None,
            output_file: None,
            display_limit: default_display_limit(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CliError::config_error(format!("Failed to read config '{}': {}", path.display(), e))
        })?;

        let config = Self::parse(&content)?;
        log_event_with_fields(
            Event::ConfigLoaded,
            &[("path", path.display().to_string().as_str())],
        );
        Ok(config)
    }

    /// Parse and validate configuration text
    pub fn parse(content: &str) -> CliResult<Self> {
        let config: Config = serde_json::from_str(content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the file if given, else defaults, then applies command-line overrides.
    pub fn resolve(global: &GlobalArgs) -> CliResult<Self> {
        let mut config = match &global.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_overrides(global);
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.display_limit == 0 {
            return Err(CliError::config_error("display_limit must be > 0"));
        }
        if Severity::parse(&self.log_level).is_none() {
            return Err(CliError::config_error(format!(
                "Invalid log_level: '{}'. Must be one of trace, info, warn, error.",
                self.log_level
            )));
        }
        Ok(())
    }

    fn apply_overrides(&mut self, global: &GlobalArgs) {
        if let Some(dataset) = global.dataset {
            self.dataset = dataset;
        }
        if let Some(schema) = &global.schema {
            self.schema_path = Some(schema.clone());
        }
        if let Some(data) = &global.data {
            self.data_file = Some(data.clone());
        }
        if global.quiet {
            self.log_level = "error".to_string();
        } else if global.verbose {
            self.log_level = "trace".to_string();
        }
    }

    /// Severity threshold for the process logger
    pub fn min_severity(&self) -> Severity {
        Severity::parse(&self.log_level).unwrap_or(Severity::Info)
    }

    /// The schema file if configured, else the dataset's built-in schema
    pub fn schema(&self) -> CliResult<Schema> {
        match &self.schema_path {
            Some(path) => Ok(SchemaLoader::load_file(path)?),
            None => Ok(self.dataset.schema()),
        }
    }

    pub fn data_path(&self) -> PathBuf {
        resolve_data_path(self.data_file.as_deref(), self.dataset.default_data_file())
    }

    /// `out` if given, else the configured or default output file
    pub fn output_path(&self, out: Option<&Path>) -> PathBuf {
        let configured = out.or(self.output_file.as_deref());
        resolve_output_path(configured, self.dataset.default_output_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = Config::parse("{}").unwrap();
        assert_eq!(config.dataset, Dataset::Students);
        assert_eq!(config.display_limit, 200);
        assert_eq!(config.min_severity(), Severity::Info);
        assert_eq!(
            config.output_path(None),
            PathBuf::from("students_performance_updated.csv")
        );
    }

    #[test]
    fn test_full_config() {
        let config = Config::parse(
            r#"{"dataset":"books","output_file":"out.csv","display_limit":5,"log_level":"warn"}"#,
        )
        .unwrap();
        assert_eq!(config.dataset, Dataset::Books);
        assert_eq!(config.output_path(None), PathBuf::from("out.csv"));
        assert_eq!(config.output_path(Some(Path::new("x.csv"))), PathBuf::from("x.csv"));
        assert_eq!(config.min_severity(), Severity::Warn);
        assert_eq!(config.schema().unwrap().name, "books");
    }

    #[test]
    fn test_invalid_values_rejected() {
        for bad in [
            r#"{"display_limit":0}"#,
            r#"{"log_level":"loud"}"#,
            r#"{"dataset":"movies"}"#,
            r#"{"unknown_key":1}"#,
            "not json",
        ] {
            let err = Config::parse(bad).unwrap_err();
            assert_eq!(err.code(), "TAB_CLI_CONFIG_ERROR", "input: {bad}");
        }
    }

    #[test]
    fn test_overrides() {
        let global = GlobalArgs {
            dataset: Some(Dataset::Books),
            data: Some(PathBuf::from("/tmp/b.csv")),
            quiet: true,
            ..GlobalArgs::default()
        };
        let config = Config::resolve(&global).unwrap();
        assert_eq!(config.dataset, Dataset::Books);
        assert_eq!(config.data_path(), PathBuf::from("/tmp/b.csv"));
        assert_eq!(config.min_severity(), Severity::Error);
    }

    #[test]
    fn test_blank_data_file_uses_default() {
        let config = Config::parse(r#"{"dataset":"books","data_file":""}"#).unwrap();
        assert_eq!(config.data_path().file_name().unwrap(), "Books_data.csv");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"dataset":"books"}}"#).unwrap();
        let global = GlobalArgs {
            config: Some(file.path().to_path_buf()),
            ..GlobalArgs::default()
        };
        assert_eq!(Config::resolve(&global).unwrap().dataset, Dataset::Books);
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load(Path::new("/nonexistent/tabstore.json")).unwrap_err();
        assert_eq!(err.code(), "TAB_CLI_CONFIG_ERROR");
    }
}

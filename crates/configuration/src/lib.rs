use crate::error::ConfigError;
use crate::settings::Settings;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{
    AnalyticsConfig, ColumnMap, DatasetSettings, LoggingSettings, OutputFormat, OutputSettings,
    ScoreRange, SegmentRuleConfig, SegmentationConfig, SeriesSettings,
};

/// Prefix of the environment variables that override file settings,
/// e.g. `SHOPLENS_DATASET__PATH=orders.csv`.
pub const ENV_PREFIX: &str = "SHOPLENS";

/// Loads the application configuration.
///
/// Values come from the TOML file at `path` (skipped when it does not exist and
/// `required` is false), then from `SHOPLENS_*` environment variables. Every
/// setting has a default, so an empty source set yields a usable `Settings`.
pub fn load_config(path: &Path, required: bool) -> Result<Settings, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(required))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Settings` struct
    let settings = builder.try_deserialize::<Settings>()?;
    settings.validate()?;

    tracing::debug!(path = %path.display(), "Configuration loaded.");
    Ok(settings)
}

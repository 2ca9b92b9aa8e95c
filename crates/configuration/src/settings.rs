use crate::error::ConfigError;
use core_types::Granularity;
use serde::Deserialize;
use std::path::PathBuf;

/// Scores are always within `1..=MAX_SCORE`.
pub const MAX_SCORE: u8 = 5;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub dataset: DatasetSettings,
    pub analytics: AnalyticsConfig,
    pub output: OutputSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Checks the cross-field rules that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.dataset.validate()?;
        self.analytics.validate()?;
        Ok(())
    }
}

/// Where the order file lives and how to read it.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatasetSettings {
    /// Path of the delimited order file.
    pub path: PathBuf,
    /// Field delimiter, a single ASCII character.
    pub delimiter: char,
    /// `chrono` formats tried in order for the date column. Day-first formats
    /// take precedence over month-first ones.
    pub date_formats: Vec<String>,
    pub columns: ColumnMap,
}

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("ecommerce_analysis.csv"),
            delimiter: ',',
            date_formats: vec![
                "%Y-%m-%d".to_string(),
                "%d/%m/%Y".to_string(),
                "%d-%m-%Y".to_string(),
                "%d.%m.%Y".to_string(),
            ],
            columns: ColumnMap::default(),
        }
    }
}

impl DatasetSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if !self.delimiter.is_ascii() {
            return Err(ConfigError::ValidationError(format!(
                "dataset.delimiter '{}' must be an ASCII character",
                self.delimiter
            )));
        }
        if self.date_formats.is_empty() {
            return Err(ConfigError::ValidationError(
                "dataset.date_formats must list at least one format".to_string(),
            ));
        }
        self.columns.validate()
    }
}

/// Header names of the order file.
///
/// `unit_price` and `amount` are alternatives: the unit price is used when
/// present, otherwise it is derived from the line amount and the quantity.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    pub order_id: String,
    pub order_date: String,
    pub customer_id: String,
    pub quantity: String,
    pub unit_price: String,
    pub amount: String,
    pub country: String,
    pub product: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            order_id: "Invoice_Number".to_string(),
            order_date: "Invoice_Date".to_string(),
            customer_id: "Customer_ID".to_string(),
            quantity: "Quantity".to_string(),
            unit_price: "Unit_Price".to_string(),
            amount: "Amount".to_string(),
            country: "Country".to_string(),
            product: "Product".to_string(),
        }
    }
}

impl ColumnMap {
    fn validate(&self) -> Result<(), ConfigError> {
        let named = [
            ("order_id", &self.order_id),
            ("order_date", &self.order_date),
            ("customer_id", &self.customer_id),
            ("quantity", &self.quantity),
            ("unit_price", &self.unit_price),
            ("amount", &self.amount),
            ("country", &self.country),
            ("product", &self.product),
        ];
        for (field, header) in named {
            if header.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "dataset.columns.{} must not be blank",
                    field
                )));
            }
        }
        Ok(())
    }
}

/// Settings consumed by the analytics engine.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub series: SeriesSettings,
    pub segmentation: SegmentationConfig,
}

impl AnalyticsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.series.validate()?;
        self.segmentation.validate()
    }
}

/// Shape of the chart series.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SeriesSettings {
    /// How many products the top-products chart keeps.
    pub top_products: usize,
    /// How many countries the revenue-by-country chart keeps. `0` keeps all.
    pub top_countries: usize,
    pub granularity: Granularity,
    /// Emit zero-valued points for periods without sales.
    pub fill_gaps: bool,
}

impl Default for SeriesSettings {
    fn default() -> Self {
        Self {
            top_products: 10,
            top_countries: 10,
            granularity: Granularity::Day,
            fill_gaps: true,
        }
    }
}

impl SeriesSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.top_products == 0 {
            return Err(ConfigError::ValidationError(
                "analytics.series.top_products must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// The ordered segment rule table. The first matching rule names the segment;
/// customers matching none get `fallback_label`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    pub fallback_label: String,
    pub rules: Vec<SegmentRuleConfig>,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            fallback_label: "Others".to_string(),
            rules: vec![
                SegmentRuleConfig::new("Champions", (4, 5), (4, 5), (4, 5)),
                SegmentRuleConfig::new("New Customers", (4, 5), (1, 2), (1, 5)),
                SegmentRuleConfig::new("Recent Customers", (4, 5), (1, 5), (1, 5)),
                SegmentRuleConfig::new("At Risk", (1, 2), (4, 5), (1, 5)),
                SegmentRuleConfig::new("Lost", (1, 2), (1, 2), (1, 2)),
            ],
        }
    }
}

impl SegmentationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fallback_label.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "analytics.segmentation.fallback_label must not be blank".to_string(),
            ));
        }
        for (i, rule) in self.rules.iter().enumerate() {
            if rule.label.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "segment rule #{} has a blank label",
                    i + 1
                )));
            }
            for (metric, range) in [("r", &rule.r), ("f", &rule.f), ("m", &rule.m)] {
                range.validate().map_err(|reason| {
                    ConfigError::ValidationError(format!(
                        "segment rule '{}': {} {}",
                        rule.label, metric, reason
                    ))
                })?;
            }
        }
        Ok(())
    }
}

/// One row of the segment table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SegmentRuleConfig {
    pub label: String,
    #[serde(default)]
    pub r: ScoreRange,
    #[serde(default)]
    pub f: ScoreRange,
    #[serde(default)]
    pub m: ScoreRange,
}

impl SegmentRuleConfig {
    pub fn new(label: &str, r: (u8, u8), f: (u8, u8), m: (u8, u8)) -> Self {
        Self {
            label: label.to_string(),
            r: ScoreRange { min: r.0, max: r.1 },
            f: ScoreRange { min: f.0, max: f.1 },
            m: ScoreRange { min: m.0, max: m.1 },
        }
    }
}

/// An inclusive score interval. Omitted bounds default to the full `1..=5` scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScoreRange {
    pub min: u8,
    pub max: u8,
}

impl Default for ScoreRange {
    fn default() -> Self {
        Self { min: 1, max: MAX_SCORE }
    }
}

impl ScoreRange {
    pub fn contains(&self, score: u8) -> bool {
        self.min <= score && score <= self.max
    }

    fn validate(&self) -> Result<(), String> {
        if self.min < 1 || self.max > MAX_SCORE {
            return Err(format!(
                "range {}..={} is outside 1..={}",
                self.min, self.max, MAX_SCORE
            ));
        }
        if self.min > self.max {
            return Err(format!("range {}..={} is empty", self.min, self.max));
        }
        Ok(())
    }
}

/// How results are printed by the command-line front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub format: OutputFormat,
    /// Rows shown by the segmentation preview.
    pub preview_rows: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// An `EnvFilter` directive; `RUST_LOG` takes precedence when set.
    pub level: String,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
            file_prefix: "shoplens.log".to_string(),
        }
    }
}

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::errors::ApplicationError;
use crate::ranking::{RankingWeights, DEFAULT_WEIGHTS};
use crate::suggestions::{AdvisorSettings, MAX_SUGGESTIONS, MIN_PROMO_SAVING, PROMO_DISCOUNT_RATE};

pub const DEFAULT_CONFIG_FILE: &str = "xfinds.toml";
pub const NESTED_CONFIG_FILE: &str = "config/xfinds.toml";

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AppConfig {
    pub catalog: CatalogConfig,
    pub ranking: RankingConfig,
    pub advisor: AdvisorConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CatalogConfig {
    pub data_dir: PathBuf,
    pub cart_path: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RankingConfig {
    pub price_weight: f64,
    pub shipping_weight: f64,
    pub promo_weight: f64,
    pub rating_weight: f64,
    pub speed_weight: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AdvisorConfig {
    pub max_suggestions: usize,
    pub promo_discount_rate: f64,
    pub min_promo_saving: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub data_dir: Option<PathBuf>,
    pub cart_path: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl From<ConfigError> for ApplicationError {
    fn from(value: ConfigError) -> Self {
        Self::Configuration(value.to_string())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig { data_dir: PathBuf::from("data"), cart_path: None },
            ranking: RankingConfig {
                price_weight: DEFAULT_WEIGHTS.price,
                shipping_weight: DEFAULT_WEIGHTS.shipping,
                promo_weight: DEFAULT_WEIGHTS.promo,
                rating_weight: DEFAULT_WEIGHTS.rating,
                speed_weight: DEFAULT_WEIGHTS.speed,
            },
            advisor: AdvisorConfig {
                max_suggestions: MAX_SUGGESTIONS,
                promo_discount_rate: PROMO_DISCOUNT_RATE,
                min_promo_saving: MIN_PROMO_SAVING,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn ranking_weights(&self) -> RankingWeights {
        RankingWeights {
            price: self.ranking.price_weight,
            shipping: self.ranking.shipping_weight,
            promo: self.ranking.promo_weight,
            rating: self.ranking.rating_weight,
            speed: self.ranking.speed_weight,
        }
    }

    pub fn advisor_settings(&self) -> AdvisorSettings {
        AdvisorSettings {
            max_suggestions: self.advisor.max_suggestions,
            promo_discount_rate: self.advisor.promo_discount_rate,
            min_promo_saving: self.advisor.min_promo_saving,
        }
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(catalog) = patch.catalog {
            if let Some(data_dir) = catalog.data_dir {
                self.catalog.data_dir = data_dir;
            }
            if let Some(cart_path) = catalog.cart_path {
                self.catalog.cart_path = Some(cart_path);
            }
        }

        if let Some(ranking) = patch.ranking {
            if let Some(weight) = ranking.price_weight {
                self.ranking.price_weight = weight;
            }
            if let Some(weight) = ranking.shipping_weight {
                self.ranking.shipping_weight = weight;
            }
            if let Some(weight) = ranking.promo_weight {
                self.ranking.promo_weight = weight;
            }
            if let Some(weight) = ranking.rating_weight {
                self.ranking.rating_weight = weight;
            }
            if let Some(weight) = ranking.speed_weight {
                self.ranking.speed_weight = weight;
            }
        }

        if let Some(advisor) = patch.advisor {
            if let Some(max_suggestions) = advisor.max_suggestions {
                self.advisor.max_suggestions = max_suggestions;
            }
            if let Some(rate) = advisor.promo_discount_rate {
                self.advisor.promo_discount_rate = rate;
            }
            if let Some(saving) = advisor.min_promo_saving {
                self.advisor.min_promo_saving = saving;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("XFINDS_CATALOG_DATA_DIR") {
            self.catalog.data_dir = PathBuf::from(value);
        }
        if let Some(value) = read_env("XFINDS_CATALOG_CART_PATH") {
            self.catalog.cart_path = Some(PathBuf::from(value));
        }

        if let Some(value) = read_env("XFINDS_RANKING_PRICE_WEIGHT") {
            self.ranking.price_weight = parse_f64("XFINDS_RANKING_PRICE_WEIGHT", &value)?;
        }
        if let Some(value) = read_env("XFINDS_RANKING_SHIPPING_WEIGHT") {
            self.ranking.shipping_weight = parse_f64("XFINDS_RANKING_SHIPPING_WEIGHT", &value)?;
        }
        if let Some(value) = read_env("XFINDS_RANKING_PROMO_WEIGHT") {
            self.ranking.promo_weight = parse_f64("XFINDS_RANKING_PROMO_WEIGHT", &value)?;
        }
        if let Some(value) = read_env("XFINDS_RANKING_RATING_WEIGHT") {
            self.ranking.rating_weight = parse_f64("XFINDS_RANKING_RATING_WEIGHT", &value)?;
        }
        if let Some(value) = read_env("XFINDS_RANKING_SPEED_WEIGHT") {
            self.ranking.speed_weight = parse_f64("XFINDS_RANKING_SPEED_WEIGHT", &value)?;
        }

        if let Some(value) = read_env("XFINDS_ADVISOR_MAX_SUGGESTIONS") {
            self.advisor.max_suggestions = parse_usize("XFINDS_ADVISOR_MAX_SUGGESTIONS", &value)?;
        }
        if let Some(value) = read_env("XFINDS_ADVISOR_PROMO_DISCOUNT_RATE") {
            self.advisor.promo_discount_rate =
                parse_f64("XFINDS_ADVISOR_PROMO_DISCOUNT_RATE", &value)?;
        }
        if let Some(value) = read_env("XFINDS_ADVISOR_MIN_PROMO_SAVING") {
            self.advisor.min_promo_saving = parse_f64("XFINDS_ADVISOR_MIN_PROMO_SAVING", &value)?;
        }

        let log_level = read_env("XFINDS_LOGGING_LEVEL").or_else(|| read_env("XFINDS_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("XFINDS_LOGGING_FORMAT").or_else(|| read_env("XFINDS_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(data_dir) = overrides.data_dir {
            self.catalog.data_dir = data_dir;
        }
        if let Some(cart_path) = overrides.cart_path {
            self.catalog.cart_path = Some(cart_path);
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_catalog(&self.catalog)?;
        validate_ranking(&self.ranking)?;
        validate_advisor(&self.advisor)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

/// Config file that `load` would read for the given explicit path, if any exists.
pub fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from(NESTED_CONFIG_FILE)]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_catalog(catalog: &CatalogConfig) -> Result<(), ConfigError> {
    if catalog.data_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation("catalog.data_dir must not be empty".to_string()));
    }

    Ok(())
}

fn validate_ranking(ranking: &RankingConfig) -> Result<(), ConfigError> {
    let weights = [
        ("ranking.price_weight", ranking.price_weight),
        ("ranking.shipping_weight", ranking.shipping_weight),
        ("ranking.promo_weight", ranking.promo_weight),
        ("ranking.rating_weight", ranking.rating_weight),
        ("ranking.speed_weight", ranking.speed_weight),
    ];

    for (key, weight) in weights {
        if !weight.is_finite() || weight < 0.0 {
            return Err(ConfigError::Validation(format!(
                "{key} must be a finite, non-negative number (got {weight})"
            )));
        }
    }

    Ok(())
}

fn validate_advisor(advisor: &AdvisorConfig) -> Result<(), ConfigError> {
    if advisor.max_suggestions == 0 {
        return Err(ConfigError::Validation(
            "advisor.max_suggestions must be greater than zero".to_string(),
        ));
    }

    if !(0.0..=1.0).contains(&advisor.promo_discount_rate) {
        return Err(ConfigError::Validation(
            "advisor.promo_discount_rate must be in range 0..=1".to_string(),
        ));
    }

    if !advisor.min_promo_saving.is_finite() || advisor.min_promo_saving < 0.0 {
        return Err(ConfigError::Validation(
            "advisor.min_promo_saving must be a finite, non-negative amount".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_f64(key: &str, value: &str) -> Result<f64, ConfigError> {
    value.trim().parse::<f64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.trim().parse::<usize>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    catalog: Option<CatalogPatch>,
    ranking: Option<RankingPatch>,
    advisor: Option<AdvisorPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogPatch {
    data_dir: Option<PathBuf>,
    cart_path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct RankingPatch {
    price_weight: Option<f64>,
    shipping_weight: Option<f64>,
    promo_weight: Option<f64>,
    rating_weight: Option<f64>,
    speed_weight: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct AdvisorPatch {
    max_suggestions: Option<usize>,
    promo_discount_rate: Option<f64>,
    min_promo_saving: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

use std::env;
use std::fs;
use std::path::Path;

use serde::Serialize;
use toml::Value;
use xfinds_core::config::{resolve_config_path, AppConfig, LoadOptions};
use xfinds_core::ApplicationError;

use super::CommandResult;

const COMMAND: &str = "config";

#[derive(Debug, Serialize)]
struct ConfigEntry {
    key: &'static str,
    value: String,
    source: String,
}

struct FieldSpec {
    key: &'static str,
    env_keys: &'static [&'static str],
    flag: Option<&'static str>,
}

const FIELDS: &[FieldSpec] = &[
    FieldSpec {
        key: "catalog.data_dir",
        env_keys: &["XFINDS_CATALOG_DATA_DIR"],
        flag: Some("--data-dir"),
    },
    FieldSpec {
        key: "catalog.cart_path",
        env_keys: &["XFINDS_CATALOG_CART_PATH"],
        flag: Some("--cart"),
    },
    FieldSpec {
        key: "ranking.price_weight",
        env_keys: &["XFINDS_RANKING_PRICE_WEIGHT"],
        flag: None,
    },
    FieldSpec {
        key: "ranking.shipping_weight",
        env_keys: &["XFINDS_RANKING_SHIPPING_WEIGHT"],
        flag: None,
    },
    FieldSpec {
        key: "ranking.promo_weight",
        env_keys: &["XFINDS_RANKING_PROMO_WEIGHT"],
        flag: None,
    },
    FieldSpec {
        key: "ranking.rating_weight",
        env_keys: &["XFINDS_RANKING_RATING_WEIGHT"],
        flag: None,
    },
    FieldSpec {
        key: "ranking.speed_weight",
        env_keys: &["XFINDS_RANKING_SPEED_WEIGHT"],
        flag: None,
    },
    FieldSpec {
        key: "advisor.max_suggestions",
        env_keys: &["XFINDS_ADVISOR_MAX_SUGGESTIONS"],
        flag: None,
    },
    FieldSpec {
        key: "advisor.promo_discount_rate",
        env_keys: &["XFINDS_ADVISOR_PROMO_DISCOUNT_RATE"],
        flag: None,
    },
    FieldSpec {
        key: "advisor.min_promo_saving",
        env_keys: &["XFINDS_ADVISOR_MIN_PROMO_SAVING"],
        flag: None,
    },
    FieldSpec {
        key: "logging.level",
        env_keys: &["XFINDS_LOGGING_LEVEL", "XFINDS_LOG_LEVEL"],
        flag: Some("--log-level"),
    },
    FieldSpec {
        key: "logging.format",
        env_keys: &["XFINDS_LOGGING_FORMAT", "XFINDS_LOG_FORMAT"],
        flag: Some("--log-format"),
    },
];

pub fn run(options: &LoadOptions) -> CommandResult {
    execute(options).unwrap_or_else(|error| CommandResult::from_error(COMMAND, &error))
}

fn execute(options: &LoadOptions) -> Result<CommandResult, ApplicationError> {
    let config = AppConfig::load(options.clone())?;

    let config_file_path = resolve_config_path(options.config_path.as_deref());
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let entries: Vec<ConfigEntry> = FIELDS
        .iter()
        .map(|field| ConfigEntry {
            key: field.key,
            value: render_value(&config, field.key),
            source: field_source(
                field,
                options,
                config_file_doc.as_ref(),
                config_file_path.as_deref(),
            ),
        })
        .collect();

    Ok(CommandResult::success_with_data(
        COMMAND,
        "effective config (source precedence: flag > env > file > default)",
        entries,
    ))
}

fn render_value(config: &AppConfig, key: &str) -> String {
    match key {
        "catalog.data_dir" => config.catalog.data_dir.display().to_string(),
        "catalog.cart_path" => config
            .catalog
            .cart_path
            .as_ref()
            .map_or_else(|| "<unset>".to_string(), |path| path.display().to_string()),
        "ranking.price_weight" => config.ranking.price_weight.to_string(),
        "ranking.shipping_weight" => config.ranking.shipping_weight.to_string(),
        "ranking.promo_weight" => config.ranking.promo_weight.to_string(),
        "ranking.rating_weight" => config.ranking.rating_weight.to_string(),
        "ranking.speed_weight" => config.ranking.speed_weight.to_string(),
        "advisor.max_suggestions" => config.advisor.max_suggestions.to_string(),
        "advisor.promo_discount_rate" => config.advisor.promo_discount_rate.to_string(),
        "advisor.min_promo_saving" => config.advisor.min_promo_saving.to_string(),
        "logging.level" => config.logging.level.clone(),
        "logging.format" => format!("{:?}", config.logging.format).to_lowercase(),
        _ => "<unknown>".to_string(),
    }
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    field: &FieldSpec,
    options: &LoadOptions,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(flag) = field.flag {
        let overridden = match field.key {
            "catalog.data_dir" => options.overrides.data_dir.is_some(),
            "catalog.cart_path" => options.overrides.cart_path.is_some(),
            "logging.level" => options.overrides.log_level.is_some(),
            "logging.format" => options.overrides.log_format.is_some(),
            _ => false,
        };
        if overridden {
            return format!("flag ({flag})");
        }
    }

    let set_env_key =
        field.env_keys.iter().find(|key| env::var(key).is_ok_and(|value| !value.trim().is_empty()));
    if let Some(env_key) = set_env_key {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, field.key) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use serde_json::Value;
use tempfile::TempDir;
use xfinds_cli::commands::{cart, config, rank, score, suggest};
use xfinds_core::config::{ConfigOverrides, LoadOptions, LogFormat};

const AGENTS: &str = r#"[
    { "id": "kakobuy", "name": "KakoBuy", "slug": "kakobuy", "rating": 4.8, "badges": ["verified"],
      "speedTag": "fast", "logo": "/agents/kakobuy.png", "siteUrl": "https://www.kakobuy.com" },
    { "id": "mulebuy", "name": "MuleBuy", "slug": "mulebuy", "rating": 4.2, "badges": [],
      "speedTag": "standard", "logo": "", "siteUrl": "https://mulebuy.com",
      "promoText": "New users get 10% off shipping" },
    { "id": "hipobuy", "name": "HipoBuy", "slug": "hipobuy", "rating": 3.9, "badges": [],
      "speedTag": "standard", "logo": "", "siteUrl": "https://hipobuy.com" }
]"#;

const PRODUCTS: &str = r#"[
    { "id": "p1", "slug": "retro-sneaker", "title": "Retro Sneaker",
      "createdAt": "2024-05-01T00:00:00Z",
      "offers": [
        { "agentId": "kakobuy", "title": "Retro Sneaker", "price": 199, "shipFee": 35,
          "estDays": 8, "currency": "CNY", "link": "https://kakobuy.example.com/p1",
          "inStock": true },
        { "agentId": "mulebuy", "title": "Retro Sneaker", "price": 189, "shipFee": 42,
          "estDays": 12, "currency": "CNY", "link": "https://mulebuy.example.com/p1",
          "inStock": true },
        { "agentId": "hipobuy", "title": "Retro Sneaker", "price": 205, "shipFee": 15,
          "estDays": 14, "currency": "CNY", "link": "https://hipobuy.example.com/p1",
          "inStock": true }
      ] },
    { "id": "p2", "slug": "cargo-pants", "title": "Cargo Pants",
      "createdAt": "2024-04-01T00:00:00Z",
      "offers": [
        { "agentId": "kakobuy", "price": 220, "shipFee": 30,
          "link": "https://kakobuy.example.com/p2" },
        { "agentId": "mulebuy", "price": 180, "shipFee": 30,
          "link": "https://mulebuy.example.com/p2" }
      ] },
    { "id": "p3", "slug": "dad-cap", "title": "Dad Cap", "createdAt": "2024-03-01T00:00:00Z",
      "offers": [
        { "agentId": "hipobuy", "price": 80, "shipFee": 15,
          "link": "https://hipobuy.example.com/p3" }
      ] }
]"#;

const CART: &str = r#"{ "items": [
    { "productId": "p2", "offerId": "p2-0", "agentId": "kakobuy", "price": 220, "shipFee": 30,
      "link": "https://kakobuy.example.com/p2" },
    { "productId": "p3", "offerId": "p3-0", "agentId": "hipobuy", "price": 80, "shipFee": 15,
      "link": "https://hipobuy.example.com/p3" }
] }"#;

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().expect("tempdir should be created");
        fs::write(dir.path().join("agents.json"), AGENTS)
            .expect("agents fixture should be written");
        fs::write(dir.path().join("products.json"), PRODUCTS)
            .expect("products fixture should be written");
        fs::write(dir.path().join("cart.json"), CART).expect("cart fixture should be written");
        Self { dir }
    }

    fn data_dir(&self) -> &Path {
        self.dir.path()
    }

    fn cart_path(&self) -> PathBuf {
        self.dir.path().join("cart.json")
    }

    fn options(&self) -> LoadOptions {
        options_for(self.data_dir(), None)
    }

    fn cart_options(&self) -> LoadOptions {
        options_for(self.data_dir(), Some(self.cart_path()))
    }
}

fn options_for(data_dir: &Path, cart_path: Option<PathBuf>) -> LoadOptions {
    LoadOptions {
        overrides: ConfigOverrides {
            data_dir: Some(data_dir.to_path_buf()),
            cart_path,
            ..ConfigOverrides::default()
        },
        ..LoadOptions::default()
    }
}

#[test]
fn rank_orders_offers_by_score() {
    let fixture = Fixture::new();
    with_env(&[], || {
        let result = rank::run(&fixture.options(), "retro-sneaker");
        assert_eq!(result.exit_code, 0, "expected successful rank");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "rank");
        assert_eq!(payload["status"], "ok");

        let offers = payload["data"]["offers"].as_array().expect("offers should be an array");
        let agents: Vec<&str> =
            offers.iter().filter_map(|offer| offer["agentId"].as_str()).collect();
        assert_eq!(agents, vec!["mulebuy", "hipobuy", "kakobuy"]);
        assert_eq!(offers[0]["rank"], 1);
        assert_eq!(offers[0]["score"], 65);
        assert_eq!(offers[0]["scoreReason"], "promo_available");
        assert_eq!(offers[2]["score"], 42);
    });
}

#[test]
fn rank_accepts_product_id() {
    let fixture = Fixture::new();
    with_env(&[], || {
        let result = rank::run(&fixture.options(), "p3");
        assert_eq!(result.exit_code, 0, "expected lookup by id to succeed");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["data"]["slug"], "dad-cap");
        assert_eq!(payload["data"]["offers"][0]["scoreReason"], "best_value");
    });
}

#[test]
fn rank_returns_lookup_failure_for_unknown_product() {
    let fixture = Fixture::new();
    with_env(&[], || {
        let result = rank::run(&fixture.options(), "missing-product");
        assert_eq!(result.exit_code, 4, "expected lookup failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "lookup");
        assert!(payload.get("data").is_none());
    });
}

#[test]
fn rank_returns_catalog_failure_for_missing_data_dir() {
    let fixture = Fixture::new();
    let missing = fixture.data_dir().join("nowhere");
    with_env(&[], || {
        let result = rank::run(&options_for(&missing, None), "retro-sneaker");
        assert_eq!(result.exit_code, 3, "expected catalog load failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "catalog");
        assert!(payload["message"].as_str().is_some_and(|message| message.contains("agents.json")));
    });
}

#[test]
fn ranking_weights_follow_environment() {
    let fixture = Fixture::new();
    with_env(
        &[
            ("XFINDS_RANKING_PRICE_WEIGHT", "0"),
            ("XFINDS_RANKING_SHIPPING_WEIGHT", "1"),
            ("XFINDS_RANKING_PROMO_WEIGHT", "0"),
            ("XFINDS_RANKING_RATING_WEIGHT", "0"),
            ("XFINDS_RANKING_SPEED_WEIGHT", "0"),
        ],
        || {
            let result = rank::run(&fixture.options(), "retro-sneaker");
            let payload = parse_payload(&result.output);
            assert_eq!(payload["data"]["offers"][0]["agentId"], "hipobuy");
            assert_eq!(payload["data"]["offers"][0]["score"], 100);
        },
    );
}

#[test]
fn invalid_weight_returns_config_failure() {
    let fixture = Fixture::new();
    with_env(&[("XFINDS_RANKING_PROMO_WEIGHT", "-1")], || {
        let result = rank::run(&fixture.options(), "retro-sneaker");
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "configuration");
        assert!(payload["message"]
            .as_str()
            .is_some_and(|message| message.contains("ranking.promo_weight")));
    });
}

#[test]
fn score_reports_breakdown_and_tracking_link() {
    let fixture = Fixture::new();
    with_env(&[], || {
        let result = score::run(&fixture.options(), "retro-sneaker", "kakobuy");
        assert_eq!(result.exit_code, 0, "expected successful score");

        let payload = parse_payload(&result.output);
        let data = &payload["data"];
        assert_eq!(data["agent_found"], true);
        assert_eq!(data["result"]["score"], 42);
        assert_eq!(data["result"]["breakdown"]["ratingScore"], 96);
        assert_eq!(data["result"]["breakdown"]["speedScore"], 100);
        assert_eq!(
            data["tracking_url"],
            "https://kakobuy.example.com/p1?source=xfinds&utm_medium=bridge&utm_agent=kakobuy"
        );
    });
}

#[test]
fn score_returns_lookup_failure_when_agent_has_no_offer() {
    let fixture = Fixture::new();
    with_env(&[], || {
        let result = score::run(&fixture.options(), "dad-cap", "mulebuy");
        assert_eq!(result.exit_code, 4, "expected lookup failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "lookup");
        assert_eq!(payload["message"], "agent mulebuy has no offer for product p3");
    });
}

#[test]
fn score_returns_lookup_failure_for_unknown_agent() {
    let fixture = Fixture::new();
    with_env(&[], || {
        let result = score::run(&fixture.options(), "dad-cap", "tigbuy");
        assert_eq!(result.exit_code, 4, "expected lookup failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "lookup");
        assert_eq!(payload["message"], "agent tigbuy not found in directory");
    });
}

#[test]
fn cart_groups_items_by_agent() {
    let fixture = Fixture::new();
    with_env(&[], || {
        let result = cart::run(&fixture.cart_options());
        assert_eq!(result.exit_code, 0, "expected successful cart grouping");

        let payload = parse_payload(&result.output);
        let data = &payload["data"];
        assert_eq!(data["item_count"], 2);
        assert_eq!(data["total"], 345.0);

        let groups = data["groups"].as_array().expect("groups should be an array");
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0]["agentId"], "hipobuy");
        assert_eq!(groups[0]["total"], 95.0);
        assert_eq!(groups[1]["agentId"], "kakobuy");
        assert_eq!(groups[1]["estimatedShipping"]["min"], 30.0);
        assert_eq!(groups[1]["estimatedShipping"]["currency"], "CNY");
    });
}

#[test]
fn cart_path_can_come_from_environment() {
    let fixture = Fixture::new();
    let cart_path = fixture.cart_path();
    let cart_path = cart_path.to_str().expect("tempdir path should be utf-8");
    with_env(&[("XFINDS_CATALOG_CART_PATH", cart_path)], || {
        let result = cart::run(&fixture.options());
        assert_eq!(result.exit_code, 0, "expected cart path from env");
    });
}

#[test]
fn cart_without_cart_path_is_a_config_failure() {
    let fixture = Fixture::new();
    with_env(&[], || {
        let result = cart::run(&fixture.options());
        assert_eq!(result.exit_code, 2, "expected config failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "configuration");
    });
}

#[test]
fn suggest_proposes_promo_switch() {
    let fixture = Fixture::new();
    with_env(&[], || {
        let result = suggest::run(&fixture.cart_options());
        assert_eq!(result.exit_code, 0, "expected successful suggest");

        let payload = parse_payload(&result.output);
        let data = &payload["data"];
        assert_eq!(data["current_total"], 345.0);

        let suggestions = data["suggestions"].as_array().expect("suggestions should be an array");
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0]["id"], "promo-p2-0-mulebuy");
        assert_eq!(suggestions[0]["type"], "promo_optimization");
        assert_eq!(suggestions[0]["savings"], 40.0);
        assert_eq!(suggestions[0]["affectedItems"][0], "p2-0");
    });
}

#[test]
fn suggest_honors_advisor_settings() {
    let fixture = Fixture::new();
    with_env(&[("XFINDS_ADVISOR_MIN_PROMO_SAVING", "50")], || {
        let result = suggest::run(&fixture.cart_options());
        assert_eq!(result.exit_code, 0, "expected successful suggest");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["data"]["suggestions"].as_array().map(Vec::len), Some(0));
        assert_eq!(payload["message"], "no cheaper agent assignment found");
    });
}

#[test]
fn suggest_rejects_cart_with_duplicate_lines() {
    let fixture = Fixture::new();
    let duplicated = fixture.data_dir().join("duplicated.json");
    let line = r#"{ "productId": "p3", "offerId": "p3-0", "agentId": "hipobuy",
        "price": 80, "shipFee": 15 }"#;
    fs::write(&duplicated, format!("[{line}, {line}]")).expect("cart fixture should be written");

    with_env(&[], || {
        let result = suggest::run(&options_for(fixture.data_dir(), Some(duplicated.clone())));
        assert_eq!(result.exit_code, 3, "expected catalog failure code");
    });
}

#[test]
fn config_reports_sources() {
    let fixture = Fixture::new();
    with_env(&[("XFINDS_LOG_LEVEL", "debug")], || {
        let result = config::run(&fixture.options());
        assert_eq!(result.exit_code, 0, "expected config inspection to succeed");

        let payload = parse_payload(&result.output);
        let entries = payload["data"].as_array().expect("config entries should be an array");
        let entry = |key: &str| {
            entries
                .iter()
                .find(|entry| entry["key"] == key)
                .cloned()
                .expect("config key should be listed")
        };

        assert_eq!(entry("catalog.data_dir")["source"], "flag (--data-dir)");
        assert_eq!(entry("logging.level")["value"], "debug");
        assert_eq!(entry("logging.level")["source"], "env (XFINDS_LOG_LEVEL)");
        assert_eq!(entry("ranking.price_weight")["value"], "0.4");
        assert_eq!(entry("ranking.price_weight")["source"], "default");
        assert_eq!(entry("catalog.cart_path")["value"], "<unset>");
    });
}

#[test]
fn config_attributes_file_values() {
    let fixture = Fixture::new();
    let config_path = fixture.data_dir().join("xfinds.toml");
    fs::write(&config_path, "[advisor]\nmax_suggestions = 3\n")
        .expect("config fixture should be written");

    with_env(&[], || {
        let mut options = fixture.options();
        options.config_path = Some(config_path.clone());

        let result = config::run(&options);
        let payload = parse_payload(&result.output);
        let entries = payload["data"].as_array().expect("config entries should be an array");
        let max = entries
            .iter()
            .find(|entry| entry["key"] == "advisor.max_suggestions")
            .expect("advisor.max_suggestions should be listed");

        assert_eq!(max["value"], "3");
        assert_eq!(max["source"], format!("file ({})", config_path.display()));
    });
}

#[test]
fn config_attributes_log_flags_over_env() {
    let fixture = Fixture::new();
    with_env(&[("XFINDS_LOG_LEVEL", "warn"), ("XFINDS_LOG_FORMAT", "pretty")], || {
        let mut options = fixture.options();
        options.overrides.log_level = Some("debug".to_string());
        options.overrides.log_format = Some(LogFormat::Json);

        let result = config::run(&options);
        let payload = parse_payload(&result.output);
        let entries = payload["data"].as_array().expect("config entries should be an array");
        let entry = |key: &str| {
            entries
                .iter()
                .find(|entry| entry["key"] == key)
                .cloned()
                .expect("config key should be listed")
        };

        assert_eq!(entry("logging.level")["value"], "debug");
        assert_eq!(entry("logging.level")["source"], "flag (--log-level)");
        assert_eq!(entry("logging.format")["value"], "json");
        assert_eq!(entry("logging.format")["source"], "flag (--log-format)");
    });
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "XFINDS_CATALOG_DATA_DIR",
        "XFINDS_CATALOG_CART_PATH",
        "XFINDS_RANKING_PRICE_WEIGHT",
        "XFINDS_RANKING_SHIPPING_WEIGHT",
        "XFINDS_RANKING_PROMO_WEIGHT",
        "XFINDS_RANKING_RATING_WEIGHT",
        "XFINDS_RANKING_SPEED_WEIGHT",
        "XFINDS_ADVISOR_MAX_SUGGESTIONS",
        "XFINDS_ADVISOR_PROMO_DISCOUNT_RATE",
        "XFINDS_ADVISOR_MIN_PROMO_SAVING",
        "XFINDS_LOGGING_LEVEL",
        "XFINDS_LOGGING_FORMAT",
        "XFINDS_LOG_LEVEL",
        "XFINDS_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use storefront_core::config::{AppConfig, LoadOptions};
use toml::Value;

pub fn run(options: LoadOptions) -> String {
    let explicit_path = options.config_path.clone();
    let overrides = options.overrides.clone();
    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path(explicit_path);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let catalog_path = config
        .catalog
        .path
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "<built-in>".to_string());

    let fields: [(&str, String, Option<&str>, &[&str]); 5] = [
        (
            "catalog.path",
            catalog_path,
            overrides.catalog_path.is_some().then_some("--catalog"),
            &["STOREFRONT_CATALOG_PATH"],
        ),
        ("display.title", config.display.title.clone(), None, &["STOREFRONT_DISPLAY_TITLE"]),
        (
            "display.currency_symbol",
            config.display.currency_symbol.clone(),
            overrides.currency_symbol.is_some().then_some("--currency"),
            &["STOREFRONT_DISPLAY_CURRENCY_SYMBOL", "STOREFRONT_CURRENCY_SYMBOL"],
        ),
        (
            "logging.level",
            config.logging.level.clone(),
            overrides.log_level.is_some().then_some("--log-level"),
            &["STOREFRONT_LOGGING_LEVEL", "STOREFRONT_LOG_LEVEL"],
        ),
        (
            "logging.format",
            format!("{:?}", config.logging.format),
            overrides.log_format.is_some().then_some("--log-format"),
            &["STOREFRONT_LOGGING_FORMAT", "STOREFRONT_LOG_FORMAT"],
        ),
    ];

    let mut lines =
        vec!["effective config (source precedence: flag > env > file > default):".to_string()];
    for (key, value, flag, env_keys) in fields {
        let source = field_source(
            key,
            flag,
            env_keys,
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        );
        lines.push(render_line(key, &value, source));
    }

    lines.join("\n")
}

fn detect_config_path(explicit_path: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path);
    }

    let root = PathBuf::from("storefront.toml");
    if root.exists() {
        return Some(root);
    }

    let nested = PathBuf::from("config/storefront.toml");
    if nested.exists() {
        return Some(nested);
    }

    None
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    flag: Option<&str>,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(flag) = flag {
        return format!("flag ({flag})");
    }

    // The loader ignores blank env values.
    let env_key = env_keys
        .iter()
        .find(|key| env::var(key).is_ok_and(|value| !value.trim().is_empty()));
    if let Some(env_key) = env_key {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
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

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

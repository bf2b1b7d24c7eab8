use std::env;
use std::fs;
use std::io::Cursor;
use std::sync::{Mutex, OnceLock};

use serde_json::Value;
use storefront_cli::commands::{catalog, config, doctor, shop};
use storefront_core::config::{ConfigOverrides, LoadOptions};
use storefront_core::view::PageRenderer;
use storefront_core::{Catalog, Storefront};
use tempfile::TempDir;

const LAMP_CATALOG: &str = r#"
[[products]]
id = 7
name = "Lamp"
price = "25.00"
stock = 2
image = "lamp.png"
weight_kg = "1.2"

[[products]]
id = 8
name = "Manual"
price = "4.50"
stock = 50
kind = "digital"
download_url = "https://example.com/manual.pdf"
"#;

#[test]
fn catalog_json_lists_seeded_products() {
    with_env(&[], || {
        let result = catalog::run(LoadOptions::default(), true);
        assert_eq!(result.exit_code, 0, "expected catalog listing to succeed");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "catalog");
        assert_eq!(payload["status"], "ok");
        assert_eq!(payload["message"], "3 products");
        assert_eq!(payload["data"][0]["name"], "Laptop");
        assert_eq!(payload["data"][2]["name"], "Headphones");
    });
}

#[test]
fn catalog_reads_products_from_env_path() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("products.toml");
    fs::write(&path, LAMP_CATALOG).expect("write catalog");
    let path = path.display().to_string();

    let vars = [("STOREFRONT_CATALOG_PATH", path.as_str()), ("STOREFRONT_CURRENCY_SYMBOL", "€")];
    with_env(&vars, || {
        let result = catalog::run(LoadOptions::default(), false);
        assert_eq!(result.exit_code, 0);

        let output = &result.output;
        assert!(output.contains("(2 products)"), "output: {output}");
        assert!(output.contains("- [7] Lamp €25.00 (stock: 2)"), "output: {output}");
        assert!(output.contains("- [8] Manual €4.50 (stock: 50)"));
    });
}

#[test]
fn catalog_reports_config_failure() {
    with_env(&[("STOREFRONT_CATALOG_PATH", "/definitely/not/here.toml")], || {
        let result = catalog::run(LoadOptions::default(), true);
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn catalog_reports_unreadable_catalog() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[[products]]\nid = \"one\"\n").expect("write catalog");
    let path = path.display().to_string();

    with_env(&[("STOREFRONT_CATALOG_PATH", path.as_str())], || {
        let result = catalog::run(LoadOptions::default(), true);
        assert_eq!(result.exit_code, 3);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "catalog_load");
    });
}

#[test]
fn shop_session_adds_laptops_and_shows_cart() {
    let (output, report) = run_shop("details 1\nqty 3\nadd\ncart\nquit\n");

    assert!(output.contains("+-- Laptop"), "detail panel should open: {output}");
    assert!(output.contains("[1] Laptop - $999.99 x 3 = $2999.97"), "output: {output}");
    assert!(output.contains("Total: $2999.97"));
    assert!(output.contains("[cart: 3]"));
    assert_eq!(report.summary.item_count, 3);
    assert_eq!(report.alerts, 0);
}

#[test]
fn shop_session_rejects_quantities_above_stock() {
    let (output, report) = run_shop("details 1\nadd 11\ncart\n");

    assert!(output.contains("! Not enough stock"), "output: {output}");
    assert!(output.contains("(empty)"));
    assert_eq!(report.alerts, 1);
    assert_eq!(report.summary.item_count, 0);
}

#[test]
fn shop_session_line_controls_update_totals() {
    let (output, report) = run_shop("details 2\nadd 2\ndetails 3\nadd\ncart\ninc 3\ndec 2\nrm 2\n");

    assert!(output.contains("[3] Headphones - $199.99 x 2 = $399.98"), "output: {output}");
    assert!(output.contains("Total: $399.98"));
    assert_eq!(report.summary.item_count, 2);
}

#[test]
fn shop_session_exports_cart_json() {
    let (output, _) = run_shop("details 3\nadd 2\nexport\n");

    let start = output.find("{\n").expect("export should print a JSON object");
    let end = output.rfind('}').expect("closing brace");
    let payload: Value = serde_json::from_str(&output[start..=end]).expect("valid export json");

    assert_eq!(payload["item_count"], 2);
    assert_eq!(payload["lines"][0]["name"], "Headphones");
    assert_eq!(payload["lines"][0]["quantity"], 2);
}

#[test]
fn shop_session_reports_unknown_commands() {
    let (output, report) = run_shop("checkout\nhelp\n");

    assert!(output.contains("? unknown command `checkout`"), "output: {output}");
    assert!(output.contains("export              print the cart as JSON"));
    assert_eq!(report.events, 0);
}

#[test]
fn config_shows_env_sources() {
    let vars = [("STOREFRONT_DISPLAY_TITLE", "Corner Shop"), ("STOREFRONT_LOG_LEVEL", "debug")];
    with_env(&vars, || {
        let output = config::run(LoadOptions::default());

        assert!(output.starts_with("effective config"));
        assert!(output.contains(
            "- display.title = Corner Shop (source: env (STOREFRONT_DISPLAY_TITLE))"
        ));
        assert!(output.contains("- logging.level = debug (source: env (STOREFRONT_LOG_LEVEL))"));
        assert!(output.contains("- catalog.path = <built-in> (source: default)"));
    });
}

#[test]
fn config_attributes_file_values() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("storefront.toml");
    fs::write(&path, "[display]\ncurrency_symbol = \"£\"\n").expect("write config");

    with_env(&[], || {
        let options = LoadOptions { config_path: Some(path.clone()), ..LoadOptions::default() };
        let output = config::run(options);

        let expected = format!("- display.currency_symbol = £ (source: file ({}))", path.display());
        assert!(output.contains(&expected), "output: {output}");
    });
}

#[test]
fn config_attributes_flag_overrides_before_env() {
    with_env(&[("STOREFRONT_LOG_LEVEL", "debug")], || {
        let options = LoadOptions {
            overrides: ConfigOverrides {
                currency_symbol: Some("€".to_string()),
                log_level: Some("error".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        };
        let output = config::run(options);

        assert!(output.starts_with("effective config (source precedence: flag > env > file"));
        assert!(
            output.contains("- display.currency_symbol = € (source: flag (--currency))"),
            "output: {output}"
        );
        assert!(output.contains("- logging.level = error (source: flag (--log-level))"));
        assert!(output.contains("- display.title = Storefront (source: default)"));
    });
}

#[test]
fn config_ignores_blank_env_values_as_a_source() {
    with_env(&[("STOREFRONT_CURRENCY_SYMBOL", "  ")], || {
        let output = config::run(LoadOptions::default());

        assert!(
            output.contains("- display.currency_symbol = $ (source: default)"),
            "output: {output}"
        );
    });
}

#[test]
fn doctor_passes_with_seeded_catalog() {
    with_env(&[], || {
        let payload = parse_payload(&doctor::run(LoadOptions::default(), true));

        assert_eq!(payload["overall_status"], "pass");
        let checks = payload["checks"].as_array().expect("checks array");
        assert_eq!(checks.len(), 3);
        assert!(checks.iter().all(|check| check["status"] == "pass"));
    });
}

#[test]
fn doctor_skips_downstream_checks_on_config_failure() {
    with_env(&[("STOREFRONT_LOGGING_LEVEL", "chatty")], || {
        let payload = parse_payload(&doctor::run(LoadOptions::default(), true));

        assert_eq!(payload["overall_status"], "fail");
        assert_eq!(payload["checks"][0]["status"], "fail");
        assert_eq!(payload["checks"][1]["status"], "skipped");
        assert_eq!(payload["checks"][2]["status"], "skipped");

        let human = doctor::run(LoadOptions::default(), false);
        assert!(human.contains("- [fail] config_validation"));
    });
}

fn run_shop(script: &str) -> (String, shop::SessionReport) {
    let renderer = PageRenderer::new("Storefront", "$").expect("templates compile");
    let mut output = Vec::new();
    let report = shop::run_session(
        Storefront::new(Catalog::seeded()),
        &renderer,
        Cursor::new(script.as_bytes()),
        &mut output,
    )
    .expect("session should finish");

    (String::from_utf8(output).expect("utf8 output"), report)
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "STOREFRONT_CATALOG_PATH",
        "STOREFRONT_DISPLAY_TITLE",
        "STOREFRONT_DISPLAY_CURRENCY_SYMBOL",
        "STOREFRONT_CURRENCY_SYMBOL",
        "STOREFRONT_LOGGING_LEVEL",
        "STOREFRONT_LOGGING_FORMAT",
        "STOREFRONT_LOG_LEVEL",
        "STOREFRONT_LOG_FORMAT",
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

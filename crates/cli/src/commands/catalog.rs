use storefront_core::config::{AppConfig, LoadOptions};
use storefront_core::pricing::format_money;

use crate::commands::CommandResult;

pub fn run(options: LoadOptions, json_output: bool) -> CommandResult {
    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "catalog",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let catalog = match config.load_catalog() {
        Ok(catalog) => catalog,
        Err(error) => {
            return CommandResult::failure("catalog", "catalog_load", error.to_string(), 3);
        }
    };

    if json_output {
        let data = match serde_json::to_value(catalog.products()) {
            Ok(data) => data,
            Err(error) => {
                return CommandResult::failure("catalog", "serialization", error.to_string(), 4);
            }
        };
        return CommandResult::success_with_data(
            "catalog",
            format!("{} products", catalog.len()),
            Some(data),
        );
    }

    let symbol = &config.display.currency_symbol;
    let mut lines = vec![format!("{} ({} products)", config.display.title, catalog.len())];
    lines.extend(catalog.products().iter().map(|product| {
        format!(
            "- [{}] {} {} (stock: {})",
            product.id,
            product.name,
            format_money(symbol, product.price),
            product.stock
        )
    }));

    CommandResult::plain(0, lines.join("\n"))
}

//! Full-page text rendering.
//!
//! Every redraw renders the whole visible screen from scratch through the
//! built-in templates; nothing is patched incrementally.

use std::collections::HashMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;
use tera::{Context, Tera};
use thiserror::Error;

use crate::domain::product::Product;
use crate::errors::ApplicationError;
use crate::pricing::{format_money, snapshot, LineSnapshot};
use crate::view::controller::Storefront;
use crate::view::states::Screen;

const PAGE_TEMPLATE: &str = "\
{{ title }}  [cart: {{ item_count }}]
{% if screen == \"products\" %}{% include \"products.txt\" %}\
{% if detail %}{% include \"detail.txt\" %}{% endif %}\
{% else %}{% include \"cart.txt\" %}{% endif %}";

const PRODUCTS_TEMPLATE: &str = "\
Products
{% for product in products -%}
[{{ product.id }}] {{ product.name }}  {{ product.price | money }}  Available: {{ product.stock }}
{% endfor -%}
";

const DETAIL_TEMPLATE: &str = "\
+-- {{ detail.name }}
| {{ detail.image }}
| Price: {{ detail.price | money }}
| Available Stock: {{ detail.stock }}
{% if detail.weight_kg %}| Weight: {{ detail.weight_kg }} kg
{% endif -%}
{% if detail.download_url %}| Download: {{ detail.download_url }}
{% endif -%}
| Quantity: {{ detail.quantity_input }}
+--
";

const CART_TEMPLATE: &str = "\
Cart
{% if lines | length == 0 %}  (empty)
{% endif -%}
{% for line in lines -%}
[{{ line.product_id }}] {{ line.name }} - {{ line.unit_price | money }} x {{ line.quantity }} = {{ line.subtotal | money }}
{% endfor -%}
Items: {{ item_count }}
Total: {{ total | money }}
";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template error: {0}")]
    Template(#[from] tera::Error),
}

impl From<RenderError> for ApplicationError {
    fn from(value: RenderError) -> Self {
        ApplicationError::Render(value.to_string())
    }
}

#[derive(Serialize)]
struct PageModel<'a> {
    title: &'a str,
    screen: Screen,
    item_count: u32,
    total: Decimal,
    products: &'a [Product],
    detail: Option<DetailModel<'a>>,
    lines: Vec<LineSnapshot>,
}

#[derive(Serialize)]
struct DetailModel<'a> {
    name: &'a str,
    image: &'a str,
    price: Decimal,
    stock: u32,
    weight_kg: Option<Decimal>,
    download_url: Option<&'a str>,
    quantity_input: &'a str,
}

pub struct PageRenderer {
    tera: Tera,
    title: String,
}

impl PageRenderer {
    pub fn new(
        title: impl Into<String>,
        currency_symbol: impl Into<String>,
    ) -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("page.txt", PAGE_TEMPLATE),
            ("products.txt", PRODUCTS_TEMPLATE),
            ("detail.txt", DETAIL_TEMPLATE),
            ("cart.txt", CART_TEMPLATE),
        ])?;

        let symbol = currency_symbol.into();
        tera.register_filter(
            "money",
            move |value: &tera::Value, _args: &HashMap<String, tera::Value>| {
                money_filter(&symbol, value)
            },
        );

        Ok(Self { tera, title: title.into() })
    }

    pub fn render(&self, store: &Storefront) -> Result<String, RenderError> {
        let cart = snapshot(store.cart());
        let detail = store.detail().and_then(|detail| {
            store.selected_product().map(|product| DetailModel {
                name: &product.name,
                image: &product.image,
                price: product.price,
                stock: product.stock,
                weight_kg: product.weight_kg,
                download_url: product.download_url.as_deref(),
                quantity_input: &detail.quantity_input,
            })
        });

        let model = PageModel {
            title: &self.title,
            screen: store.screen(),
            item_count: cart.item_count,
            total: cart.total,
            products: store.catalog().products(),
            detail,
            lines: cart.lines,
        };

        let context = Context::from_serialize(&model)?;
        Ok(self.tera.render("page.txt", &context)?)
    }
}

fn money_filter(symbol: &str, value: &tera::Value) -> tera::Result<tera::Value> {
    let amount = match value {
        tera::Value::String(raw) => Decimal::from_str(raw).map_err(|error| {
            tera::Error::msg(format!("money filter: `{raw}` is not a decimal: {error}"))
        })?,
        tera::Value::Number(number) => Decimal::from_str(&number.to_string())
            .map_err(|error| tera::Error::msg(format!("money filter: {error}")))?,
        tera::Value::Null => Decimal::ZERO,
        other => {
            return Err(tera::Error::msg(format!("money filter expects a number, got {other}")))
        }
    };
    Ok(tera::Value::String(format_money(symbol, amount)))
}

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u32);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductKind {
    #[default]
    Physical,
    Digital,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub stock: u32,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub kind: ProductKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

impl Product {
    pub fn new(
        id: u32,
        name: impl Into<String>,
        price: Decimal,
        stock: u32,
        image: impl Into<String>,
    ) -> Self {
        Self {
            id: ProductId(id),
            name: name.into(),
            price,
            stock,
            image: image.into(),
            kind: ProductKind::Physical,
            weight_kg: None,
            download_url: None,
        }
    }

    pub fn digital(mut self, download_url: impl Into<String>) -> Self {
        self.kind = ProductKind::Digital;
        self.weight_kg = None;
        self.download_url = Some(download_url.into());
        self
    }

    pub fn with_weight(mut self, weight_kg: Decimal) -> Self {
        self.weight_kg = Some(weight_kg);
        self
    }
}

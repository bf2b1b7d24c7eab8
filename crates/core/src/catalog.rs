use std::collections::HashSet;
use std::fs;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::product::{Product, ProductId};
use crate::errors::{ApplicationError, DomainError};

pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/200";

/// Read-only, ordered product list. Seeded once and never mutated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    products: Vec<Product>,
}

impl Catalog {
    /// Rejects duplicate ids, negative prices, and catalogs whose full stock
    /// could not be counted or priced in a single cart.
    pub fn new(products: Vec<Product>) -> Result<Self, DomainError> {
        let mut seen = HashSet::with_capacity(products.len());
        let mut total_stock: u32 = 0;
        let mut total_value = Decimal::ZERO;
        for product in &products {
            if !seen.insert(product.id) {
                return Err(DomainError::DuplicateProduct(product.id));
            }
            if product.price.is_sign_negative() {
                return Err(DomainError::InvalidPrice {
                    product_id: product.id,
                    price: product.price,
                });
            }

            let too_large = DomainError::CatalogTooLarge { product_id: product.id };
            total_stock = total_stock.checked_add(product.stock).ok_or(too_large.clone())?;
            total_value = product
                .price
                .checked_mul(Decimal::from(product.stock))
                .and_then(|value| total_value.checked_add(value))
                .ok_or(too_large)?;
        }

        Ok(Self { products })
    }

    pub fn seeded() -> Self {
        Self {
            products: vec![
                Product::new(1, "Laptop", Decimal::new(99999, 2), 10, PLACEHOLDER_IMAGE),
                Product::new(2, "Phone", Decimal::new(49999, 2), 15, PLACEHOLDER_IMAGE),
                Product::new(3, "Headphones", Decimal::new(19999, 2), 20, PLACEHOLDER_IMAGE),
            ],
        }
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ApplicationError> {
        let file = toml::from_str::<CatalogFile>(raw)
            .map_err(|error| ApplicationError::Catalog(error.to_string()))?;
        Ok(Self::new(file.products)?)
    }

    pub fn load(path: &Path) -> Result<Self, ApplicationError> {
        let raw = fs::read_to_string(path).map_err(|error| {
            ApplicationError::Catalog(format!("could not read `{}`: {error}", path.display()))
        })?;
        let catalog = Self::from_toml_str(&raw)?;
        tracing::debug!(
            event_name = "catalog.loaded",
            path = %path.display(),
            products = catalog.len(),
            "catalog file loaded"
        );
        Ok(catalog)
    }

    pub fn find_by_id(&self, product_id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == product_id)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

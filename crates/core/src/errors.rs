use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::product::ProductId;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("product not found: {0}")]
    ProductNotFound(ProductId),
    #[error("insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock { product_id: ProductId, requested: u32, available: u32 },
    #[error("invalid quantity: {0}")]
    InvalidQuantity(u32),
    #[error("cart line not found at index {0}")]
    LineNotFound(usize),
    #[error("duplicate product id in catalog: {0}")]
    DuplicateProduct(ProductId),
    #[error("invalid price {price} for product {product_id}")]
    InvalidPrice { product_id: ProductId, price: Decimal },
    #[error("catalog too large: buying all stock of product {product_id} overflows cart totals")]
    CatalogTooLarge { product_id: ProductId },
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("catalog failure: {0}")]
    Catalog(String),
    #[error("configuration failure: {0}")]
    Configuration(String),
    #[error("render failure: {0}")]
    Render(String),
}

impl DomainError {
    /// Text shown to the shopper in a blocking notice.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InsufficientStock { .. } => "Not enough stock",
            Self::ProductNotFound(_) => "Product not found",
            Self::InvalidQuantity(_) => "Quantity must be a positive number",
            Self::LineNotFound(_) => "That item is no longer in the cart",
            Self::DuplicateProduct(_)
            | Self::InvalidPrice { .. }
            | Self::CatalogTooLarge { .. } => "The catalog is invalid",
        }
    }
}

impl ApplicationError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Domain(error) => error.user_message(),
            Self::Catalog(_) => "The catalog could not be loaded.",
            Self::Configuration(_) => "The storefront is misconfigured.",
            Self::Render(_) => "An unexpected internal error occurred.",
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::product::ProductId;
    use crate::errors::{ApplicationError, DomainError};

    #[test]
    fn insufficient_stock_maps_to_not_enough_stock_notice() {
        let error = ApplicationError::from(DomainError::InsufficientStock {
            product_id: ProductId(1),
            requested: 11,
            available: 10,
        });

        assert_eq!(error.user_message(), "Not enough stock");
    }

    #[test]
    fn domain_error_display_carries_quantities() {
        let error =
            DomainError::InsufficientStock { product_id: ProductId(2), requested: 16, available: 15 };

        assert_eq!(
            error.to_string(),
            "insufficient stock for product 2: requested 16, available 15"
        );
    }

    #[test]
    fn render_failure_has_user_safe_message() {
        let error = ApplicationError::Render("template `cart` missing".to_owned());

        assert_eq!(error.user_message(), "An unexpected internal error occurred.");
    }
}

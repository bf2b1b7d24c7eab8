use serde::{Deserialize, Serialize};

use crate::domain::product::ProductId;
use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    #[default]
    Products,
    Cart,
}

/// The open product detail modal. Discarded as a whole on close.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailView {
    pub product_id: ProductId,
    pub quantity_input: String,
}

impl DetailView {
    pub fn open(product_id: ProductId) -> Self {
        Self { product_id, quantity_input: "1".to_string() }
    }

    /// Positive integer quantity, or `None` for anything the add button ignores.
    pub fn requested_quantity(&self) -> Option<u32> {
        self.quantity_input.trim().parse::<u32>().ok().filter(|quantity| *quantity > 0)
    }
}

/// Every user action the page can raise. Cart line events carry the product
/// identity rather than a row position so they survive redraws.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UiEvent {
    ViewDetails(ProductId),
    SetQuantity(String),
    AddToCart,
    CloseDetails,
    ViewCart,
    CloseCart,
    Increment(ProductId),
    Decrement(ProductId),
    Remove(ProductId),
    SetLineQuantity(ProductId, u32),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EventOutcome {
    /// State changed; the page must be redrawn.
    Redraw,
    /// Nothing changed.
    Ignored,
    /// Blocking notice. State is left exactly as it was.
    Alert(DomainError),
}

impl EventOutcome {
    pub fn needs_redraw(&self) -> bool {
        matches!(self, Self::Redraw)
    }
}

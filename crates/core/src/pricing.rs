use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::cart::Cart;
use crate::domain::product::ProductId;

/// Derived cart values. Always recomputed from the lines, never cached.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSummary {
    pub item_count: u32,
    pub total: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSnapshot {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub subtotal: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub lines: Vec<LineSnapshot>,
    pub item_count: u32,
    pub total: Decimal,
}

pub fn item_count(cart: &Cart) -> u32 {
    cart.lines().iter().map(|line| line.quantity).sum()
}

pub fn cart_total(cart: &Cart) -> Decimal {
    cart.lines().iter().map(|line| line.unit_price * Decimal::from(line.quantity)).sum()
}

pub fn summarize(cart: &Cart) -> CartSummary {
    CartSummary { item_count: item_count(cart), total: cart_total(cart) }
}

pub fn snapshot(cart: &Cart) -> CartSnapshot {
    let summary = summarize(cart);
    CartSnapshot {
        lines: cart
            .lines()
            .iter()
            .map(|line| LineSnapshot {
                product_id: line.product_id,
                name: line.name.clone(),
                unit_price: line.unit_price,
                quantity: line.quantity,
                subtotal: line.subtotal(),
            })
            .collect(),
        item_count: summary.item_count,
        total: summary.total,
    }
}

/// Two decimal places, midpoints rounded away from zero.
pub fn format_money(symbol: &str, amount: Decimal) -> String {
    let rounded =
        amount.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero);
    format!("{symbol}{rounded:.2}")
}

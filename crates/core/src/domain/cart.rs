use rust_decimal::Decimal;

use crate::catalog::Catalog;
use crate::domain::product::{Product, ProductId};
use crate::errors::DomainError;
use crate::pricing::{summarize, CartSummary};

/// A chosen product. Name and price are snapshotted when the line is created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
}

impl CartLine {
    fn snapshot(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            unit_price: product.price,
            quantity,
        }
    }

    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// What a single cart mutation did to its line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineChange {
    Added { quantity: u32 },
    Updated { from: u32, to: u32 },
    Removed,
    Unchanged,
}

/// Ordered cart lines, at most one per product.
///
/// Every line satisfies `1 <= quantity <= stock` of its product. Mutations that
/// would break that either fail without touching the cart or, on the way down,
/// remove the line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, index: usize) -> Option<&CartLine> {
        self.lines.get(index)
    }

    pub fn line_index(&self, product_id: ProductId) -> Option<usize> {
        self.lines.iter().position(|line| line.product_id == product_id)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn summary(&self) -> CartSummary {
        summarize(self)
    }

    pub fn add(
        &mut self,
        catalog: &Catalog,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<LineChange, DomainError> {
        if quantity == 0 {
            return Err(DomainError::InvalidQuantity(quantity));
        }
        let product =
            catalog.find_by_id(product_id).ok_or(DomainError::ProductNotFound(product_id))?;

        let existing = self.line_index(product_id).map(|index| self.lines[index].quantity);
        let requested = existing.unwrap_or(0).saturating_add(quantity);
        if requested > product.stock {
            return Err(DomainError::InsufficientStock {
                product_id,
                requested,
                available: product.stock,
            });
        }

        let change = match self.line_index(product_id) {
            Some(index) => {
                let line = &mut self.lines[index];
                let from = line.quantity;
                line.quantity = requested;
                LineChange::Updated { from, to: requested }
            }
            None => {
                self.lines.push(CartLine::snapshot(product, quantity));
                LineChange::Added { quantity }
            }
        };

        tracing::debug!(
            event_name = "cart.line_added",
            product_id = %product_id,
            quantity = requested,
            "cart line added"
        );
        Ok(change)
    }

    /// Raises the quantity by one unless the line is already at its stock ceiling.
    pub fn increment(
        &mut self,
        catalog: &Catalog,
        index: usize,
    ) -> Result<LineChange, DomainError> {
        let line = self.lines.get_mut(index).ok_or(DomainError::LineNotFound(index))?;
        let ceiling =
            catalog.find_by_id(line.product_id).map(|product| product.stock).unwrap_or(0);

        if line.quantity >= ceiling {
            return Ok(LineChange::Unchanged);
        }

        let from = line.quantity;
        line.quantity += 1;
        tracing::debug!(
            event_name = "cart.line_incremented",
            product_id = %line.product_id,
            quantity = line.quantity,
            "cart line incremented"
        );
        Ok(LineChange::Updated { from, to: line.quantity })
    }

    /// Lowers the quantity by one; a line at quantity one is removed.
    pub fn decrement(&mut self, index: usize) -> Result<LineChange, DomainError> {
        let line = self.lines.get_mut(index).ok_or(DomainError::LineNotFound(index))?;

        if line.quantity > 1 {
            let from = line.quantity;
            line.quantity -= 1;
            tracing::debug!(
                event_name = "cart.line_decremented",
                product_id = %line.product_id,
                quantity = line.quantity,
                "cart line decremented"
            );
            return Ok(LineChange::Updated { from, to: line.quantity });
        }

        self.remove(index)?;
        Ok(LineChange::Removed)
    }

    pub fn set_quantity(
        &mut self,
        catalog: &Catalog,
        index: usize,
        quantity: u32,
    ) -> Result<LineChange, DomainError> {
        let product_id =
            self.lines.get(index).ok_or(DomainError::LineNotFound(index))?.product_id;
        if quantity == 0 {
            self.remove(index)?;
            return Ok(LineChange::Removed);
        }

        let available =
            catalog.find_by_id(product_id).ok_or(DomainError::ProductNotFound(product_id))?.stock;
        if quantity > available {
            return Err(DomainError::InsufficientStock {
                product_id,
                requested: quantity,
                available,
            });
        }

        let line = &mut self.lines[index];
        let from = line.quantity;
        line.quantity = quantity;
        Ok(if from == quantity {
            LineChange::Unchanged
        } else {
            LineChange::Updated { from, to: quantity }
        })
    }

    pub fn remove(&mut self, index: usize) -> Result<CartLine, DomainError> {
        if index >= self.lines.len() {
            return Err(DomainError::LineNotFound(index));
        }
        let line = self.lines.remove(index);
        tracing::debug!(
            event_name = "cart.line_removed",
            product_id = %line.product_id,
            "cart line removed"
        );
        Ok(line)
    }
}

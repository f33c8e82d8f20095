use serde::Serialize;

use super::{Cents, ItemError, LineItem, Rate};

/// Tax charged on the subtotal: 5%.
pub const TAX_RATE: Rate = Rate::from_basis_points(500);

/// Discount granted on the subtotal: 10%.
pub const DISCOUNT_RATE: Rate = Rate::from_basis_points(1000);

/// Largest subtotal a bill may reach, leaving room for tax on top.
pub const MAX_SUBTOTAL: Cents = Cents::MAX / 2;

/// Aggregate amounts for a bill, all in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Totals {
    pub subtotal: Cents,
    pub tax: Cents,
    pub discount: Cents,
    pub final_total: Cents,
}

impl Totals {
    /// Derive tax, discount and final amount from a subtotal.
    pub fn from_subtotal(subtotal: Cents) -> Self {
        let tax = TAX_RATE.apply(subtotal);
        let discount = DISCOUNT_RATE.apply(subtotal);
        Self {
            subtotal,
            tax,
            discount,
            final_total: subtotal.saturating_sub(discount).saturating_add(tax),
        }
    }
}

/// Compute the totals for a list of items.
/// Subtotal = sum of line totals; tax and discount are taken on the subtotal.
/// A sum beyond `Cents::MAX` saturates; a [`Ledger`] never gets that far.
pub fn compute_totals(items: &[LineItem]) -> Totals {
    let subtotal = items
        .iter()
        .map(LineItem::line_total)
        .fold(0, Cents::saturating_add);
    Totals::from_subtotal(subtotal)
}

/// The ordered, append-only list of items billed in one session.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    items: Vec<LineItem>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item and return a reference to it as stored.
    ///
    /// Fails, leaving the ledger unchanged, when the item would take the
    /// subtotal past [`MAX_SUBTOTAL`].
    pub fn push(&mut self, item: LineItem) -> Result<&LineItem, ItemError> {
        let fits = compute_totals(&self.items)
            .subtotal
            .checked_add(item.line_total())
            .is_some_and(|subtotal| subtotal <= MAX_SUBTOTAL);
        if !fits {
            return Err(ItemError::SubtotalTooLarge(item.name().to_string()));
        }
        self.items.push(item);
        let last = self.items.len() - 1;
        Ok(&self.items[last])
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Totals are recomputed on every call, never cached.
    pub fn totals(&self) -> Totals {
        compute_totals(&self.items)
    }
}

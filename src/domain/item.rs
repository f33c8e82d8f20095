use serde::Serialize;
use thiserror::Error;

use super::{Cents, ParseCentsError, parse_cents};

/// Reasons raw input cannot become a [`LineItem`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ItemError {
    #[error("Item name must not be empty")]
    EmptyName,

    #[error("Invalid price '{input}': {reason}")]
    InvalidPrice {
        input: String,
        reason: ParseCentsError,
    },

    #[error("Invalid quantity '{0}': expected a non-negative whole number")]
    InvalidQuantity(String),

    #[error("Line total for '{0}' is too large")]
    LineTotalOverflow(String),

    #[error("Adding '{0}' would make the bill total too large")]
    SubtotalTooLarge(String),
}

/// One billed line: name, unit price and quantity.
///
/// Fields are private so the line total can only ever be derived from the
/// stored price and quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItem {
    name: String,
    unit_price: Cents,
    quantity: u32,
}

impl LineItem {
    /// Build an item from already-typed values. The name is trimmed.
    pub fn new(name: &str, unit_price: Cents, quantity: u32) -> Result<Self, ItemError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ItemError::EmptyName);
        }
        if unit_price < 0 {
            return Err(ItemError::InvalidPrice {
                input: unit_price.to_string(),
                reason: ParseCentsError::Negative,
            });
        }
        if unit_price.checked_mul(Cents::from(quantity)).is_none() {
            return Err(ItemError::LineTotalOverflow(name.to_string()));
        }
        Ok(Self {
            name: name.to_string(),
            unit_price,
            quantity,
        })
    }

    /// Validate the three raw text fields a user typed.
    pub fn parse(name: &str, price: &str, quantity: &str) -> Result<Self, ItemError> {
        if name.trim().is_empty() {
            return Err(ItemError::EmptyName);
        }

        let unit_price = parse_cents(price).map_err(|reason| ItemError::InvalidPrice {
            input: price.trim().to_string(),
            reason,
        })?;

        let quantity: u32 = quantity
            .trim()
            .parse()
            .map_err(|_| ItemError::InvalidQuantity(quantity.trim().to_string()))?;

        Self::new(name, unit_price, quantity)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit_price(&self) -> Cents {
        self.unit_price
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn line_total(&self) -> Cents {
        self.unit_price * Cents::from(self.quantity)
    }
}

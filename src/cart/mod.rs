//! Point-of-sale cart aggregation.
//!
//! The cart is a flat sequence of selected items, possibly repeated; the
//! aggregator collapses duplicates into counted entries in first-seen order
//! and keeps a running total that gates purchase submission against the
//! account's available balance. Prices are exact decimals, so the running
//! total never drifts.
//!
//! All instances of one item identity are fungible: removing one instance
//! decrements its count by exactly one, and the entry disappears when the
//! count reaches zero.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{CartError, CartResult};

// =============================================================================
// Cart Line
// =============================================================================

/// One addition of an item to the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Opaque item identity.
    pub item_id: String,
    /// Unit price at selection time.
    pub unit_price: Decimal,
    /// Maximum permitted count for this identity (stock on hand).
    pub stock_ceiling: u32,
}

impl CartLine {
    pub fn new(item_id: impl Into<String>, unit_price: Decimal, stock_ceiling: u32) -> Self {
        Self {
            item_id: item_id.into(),
            unit_price,
            stock_ceiling,
        }
    }
}

/// One identity's counted group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedCartEntry {
    pub item_id: String,
    pub unit_price: Decimal,
    /// Number of occurrences; positive and never above the stock ceiling.
    pub count: u32,
    /// `unit_price * count`.
    pub subtotal: Decimal,
}

/// One line of the purchase payload handed to the submission collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseLine {
    pub product_id: String,
    pub quantity: u32,
}

// =============================================================================
// Cart
// =============================================================================

/// A flat, append-ordered sequence of selected items.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one instance of an item.
    ///
    /// Rejects the add with [`CartError::StockExceeded`] when the identity's
    /// aggregated count already equals its stock ceiling, so the cart can
    /// never over-sell even if the caller forgot to disable the action.
    pub fn add_item(&mut self, line: CartLine) -> CartResult<()> {
        let current = self.count_of(&line.item_id);
        if current >= line.stock_ceiling {
            return Err(CartError::StockExceeded {
                item_id: line.item_id,
                ceiling: line.stock_ceiling,
            });
        }
        self.lines.push(line);
        Ok(())
    }

    /// Remove exactly one occurrence of the given identity (the most
    /// recently added instance; all instances are fungible). Returns false
    /// if the identity is not present.
    pub fn remove_one_item(&mut self, item_id: &str) -> bool {
        match self.lines.iter().rposition(|line| line.item_id == item_id) {
            Some(index) => {
                self.lines.remove(index);
                true
            }
            None => false,
        }
    }

    /// Number of occurrences of one identity.
    pub fn count_of(&self, item_id: &str) -> u32 {
        self.lines.iter().filter(|line| line.item_id == item_id).count() as u32
    }

    /// Collapse duplicates into counted entries, preserving first-seen order
    /// across distinct identities.
    pub fn aggregate(&self) -> Vec<AggregatedCartEntry> {
        let mut entries: Vec<AggregatedCartEntry> = Vec::new();
        for line in &self.lines {
            if let Some(index) = entries.iter().position(|entry| entry.item_id == line.item_id) {
                let entry = &mut entries[index];
                entry.count += 1;
                entry.subtotal = entry.unit_price * Decimal::from(entry.count);
            } else {
                entries.push(AggregatedCartEntry {
                    item_id: line.item_id.clone(),
                    unit_price: line.unit_price,
                    count: 1,
                    subtotal: line.unit_price,
                });
            }
        }
        entries
    }

    /// Sum of all line prices; equals the sum of aggregated subtotals.
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(|line| line.unit_price).sum()
    }

    /// The purchase payload for the submission collaborator, one line per
    /// identity.
    pub fn purchase_lines(&self) -> Vec<PurchaseLine> {
        self.aggregate()
            .into_iter()
            .map(|entry| PurchaseLine {
                product_id: entry.item_id,
                quantity: entry.count,
            })
            .collect()
    }

    /// Whether this cart's total can be submitted against a balance.
    pub fn can_submit_against(&self, available_balance: Decimal) -> bool {
        can_submit(self.total(), available_balance)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Empty the cart (after a successful purchase).
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

/// Purchase gate: the total must be positive and covered by the balance.
pub fn can_submit(total: Decimal, available_balance: Decimal) -> bool {
    total > Decimal::ZERO && total <= available_balance
}

// =============================================================================
// Tests
// =============================================================================

//! The session cart.
//!
//! The cart is client-owned state: lines live in the shopper's session (the
//! durable analogue of the old localStorage keys) and the platform only sees
//! them at validation and order time. One invariant matters: at most one
//! line per product - adding an existing product replaces its line.

pub mod pricing;

pub use pricing::{Quote, quote};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use polar_scoop_core::ProductId;

use crate::api::types::Product;

/// One product-quantity pairing in the shopping cart.
///
/// `price` and `stock` are snapshots from the product fetch that created or
/// last refreshed the line; the platform reprices authoritatively at order
/// time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product this line holds.
    pub product_id: ProductId,
    /// Name snapshot for display.
    pub name: String,
    /// Unit price snapshot.
    pub price: Decimal,
    /// Desired quantity.
    pub quantity: u32,
    /// Stock snapshot from the last product fetch.
    pub stock: i64,
    /// Thumbnail snapshot.
    pub image: Option<String>,
}

impl CartLine {
    /// Build a line from a fetched product.
    #[must_use]
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            quantity,
            stock: product.stock,
            image: product.thumbnail().map(ToOwned::to_owned),
        }
    }

    /// Whether the desired quantity exceeds the last-known stock.
    ///
    /// Such a line is ineligible for checkout until the shopper reduces or
    /// removes it. Display-time guard only; the platform revalidates stock
    /// at order creation.
    #[must_use]
    pub fn exceeds_stock(&self) -> bool {
        i64::from(self.quantity) > self.stock
    }
}

/// The shopping cart: an ordered set of lines keyed by product id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    /// Lines in insertion order.
    pub lines: Vec<CartLine>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add a line, replacing any existing line for the same product.
    ///
    /// Replacement keeps the original position so the cart does not reorder
    /// under the shopper.
    pub fn upsert(&mut self, line: CartLine) {
        match self
            .lines
            .iter_mut()
            .find(|l| l.product_id == line.product_id)
        {
            Some(existing) => *existing = line,
            None => self.lines.push(line),
        }
    }

    /// Remove the line for a product. Removing an absent product is a no-op.
    ///
    /// Returns whether a line was actually removed.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| &l.product_id != product_id);
        self.lines.len() != before
    }

    /// Change the quantity on an existing line.
    ///
    /// Returns `false` when the product is not in the cart.
    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: u32) -> bool {
        match self.lines.iter_mut().find(|l| &l.product_id == product_id) {
            Some(line) => {
                line.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Update the stock snapshot for a product, if it is in the cart.
    pub fn refresh_stock(&mut self, product_id: &ProductId, stock: i64) {
        if let Some(line) = self.lines.iter_mut().find(|l| &l.product_id == product_id) {
            line.stock = stock;
        }
    }

    /// Look up a line by product.
    #[must_use]
    pub fn get(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.product_id == product_id)
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total units across all lines.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Products whose desired quantity exceeds their stock snapshot.
    #[must_use]
    pub fn conflicted_products(&self) -> Vec<&ProductId> {
        self.lines
            .iter()
            .filter(|l| l.exceeds_stock())
            .map(|l| &l.product_id)
            .collect()
    }

    /// Whether any line blocks checkout.
    #[must_use]
    pub fn has_conflicts(&self) -> bool {
        self.lines.iter().any(CartLine::exceeds_stock)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(product: &str, price: i64, quantity: u32, stock: i64) -> CartLine {
        CartLine {
            product_id: ProductId::new(product),
            name: format!("Scoop {product}"),
            price: Decimal::new(price, 0),
            quantity,
            stock,
            image: None,
        }
    }

    #[test]
    fn test_upsert_new_product_appends() {
        let mut cart = Cart::new();
        cart.upsert(line("p1", 100, 2, 10));
        assert_eq!(cart.len(), 1);

        cart.upsert(line("p2", 250, 1, 5));
        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn test_upsert_existing_product_replaces_without_duplicating() {
        let mut cart = Cart::new();
        cart.upsert(line("p1", 100, 2, 10));
        cart.upsert(line("p2", 250, 1, 5));

        cart.upsert(line("p1", 120, 5, 8));

        assert_eq!(cart.len(), 2);
        let replaced = cart.get(&ProductId::new("p1")).unwrap();
        assert_eq!(replaced.quantity, 5);
        assert_eq!(replaced.price, Decimal::new(120, 0));
        assert_eq!(replaced.stock, 8);
        // Position preserved
        assert_eq!(cart.lines.first().unwrap().product_id.as_str(), "p1");
    }

    #[test]
    fn test_remove_absent_product_is_noop() {
        let mut cart = Cart::new();
        cart.upsert(line("p1", 100, 2, 10));

        assert!(!cart.remove(&ProductId::new("ghost")));
        assert_eq!(cart.len(), 1);

        assert!(cart.remove(&ProductId::new("p1")));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity() {
        let mut cart = Cart::new();
        cart.upsert(line("p1", 100, 2, 10));

        assert!(cart.set_quantity(&ProductId::new("p1"), 7));
        assert_eq!(cart.get(&ProductId::new("p1")).unwrap().quantity, 7);

        assert!(!cart.set_quantity(&ProductId::new("ghost"), 1));
    }

    #[test]
    fn test_stock_conflict_detection() {
        let mut cart = Cart::new();
        cart.upsert(line("p1", 100, 2, 10));
        assert!(!cart.has_conflicts());

        // Quantity within the snapshot boundary is fine
        cart.set_quantity(&ProductId::new("p1"), 10);
        assert!(!cart.has_conflicts());

        cart.set_quantity(&ProductId::new("p1"), 11);
        assert!(cart.has_conflicts());
        assert_eq!(cart.conflicted_products(), vec![&ProductId::new("p1")]);
    }

    #[test]
    fn test_refresh_stock_can_create_and_clear_conflicts() {
        let mut cart = Cart::new();
        cart.upsert(line("p1", 100, 4, 10));

        cart.refresh_stock(&ProductId::new("p1"), 2);
        assert!(cart.has_conflicts());

        cart.refresh_stock(&ProductId::new("p1"), 6);
        assert!(!cart.has_conflicts());
    }

    #[test]
    fn test_total_quantity() {
        let mut cart = Cart::new();
        cart.upsert(line("p1", 100, 2, 10));
        cart.upsert(line("p2", 250, 3, 5));
        assert_eq!(cart.total_quantity(), 5);
    }
}

//! Catalog types: product, snapshot, scored search hit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Separator between segments of [`Product::family`] (e.g. `Perifericos>Mouse`).
pub const FAMILY_SEPARATOR: char = '>';

/// A product as listed by the catalog endpoint. Read-only to the assistant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Store code; stable across refreshes and unique within one listing.
    pub code: String,
    pub description: String,
    /// Category path, top-level segment first.
    pub family: String,
    /// Sale price; `None` when the listing carried no parseable number.
    pub price: Option<f64>,
    /// Units available; `<= 0` means out of stock.
    pub stock: i64,
}

impl Product {
    pub fn is_available(&self) -> bool {
        self.stock > 0
    }

    /// First segment of the family path, trimmed. Empty family gives an empty string.
    pub fn top_level_family(&self) -> &str {
        self.family
            .split(FAMILY_SEPARATOR)
            .next()
            .unwrap_or_default()
            .trim()
    }
}

/// The live listing and when it was fetched. Replaced wholesale on each successful refresh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogSnapshot {
    pub products: Vec<Product>,
    /// `None` until the first successful fetch.
    pub fetched_at: Option<DateTime<Utc>>,
}

impl CatalogSnapshot {
    pub fn new(products: Vec<Product>, fetched_at: DateTime<Utc>) -> Self {
        Self {
            products,
            fetched_at: Some(fetched_at),
        }
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// A product matched by [`crate::search`] with the number of query tokens it contains.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredProduct {
    pub product: Product,
    pub score: usize,
}

//! # Catalog
//!
//! Product listing for the assistant: the [`Product`] model and its lenient JSON parsing, a
//! [`CatalogSource`] that fetches the listing (HTTP in production), the [`CatalogCache`] that
//! refreshes it when stale, and the lexical retriever ([`search`]).
//!
//! ## External interactions
//!
//! - **Catalog endpoint**: `GET <url>` returning a JSON array of product objects.

mod cache;
mod error;
mod parse;
mod source;
mod types;

pub mod search;

pub use cache::{CatalogCache, DEFAULT_REFRESH_INTERVAL};
pub use error::CatalogError;
pub use parse::parse_listing;
pub use search::{search, tokenize, MAX_RESULTS, MIN_TOKEN_CHARS};
pub use source::{CatalogSource, HttpCatalogSource, DEFAULT_FETCH_TIMEOUT};
pub use types::{CatalogSnapshot, Product, ScoredProduct, FAMILY_SEPARATOR};

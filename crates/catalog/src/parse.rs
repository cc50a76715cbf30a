//! Lenient parsing of the catalog payload.
//!
//! The endpoint exports spreadsheet rows: upper-case Spanish keys (`CODIGO`, `DETALLE`, `FAMILIA`,
//! `P.VENTA`, `STOCK`), numbers that often arrive as strings, and the price either under a flat
//! `"P.VENTA"` key or nested as `{"P": {"VENTA": ..}}`. English keys are accepted as aliases.
//! A payload that is not a JSON array is an error; individual rows that cannot be read are skipped.

use serde::de::Error;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

use crate::error::CatalogError;
use crate::types::Product;

#[derive(Deserialize)]
struct RawProduct {
    #[serde(rename = "CODIGO", alias = "code", deserialize_with = "text")]
    code: String,
    #[serde(rename = "DETALLE", alias = "description", default, deserialize_with = "text")]
    description: String,
    #[serde(rename = "FAMILIA", alias = "family", default, deserialize_with = "text")]
    family: String,
    #[serde(rename = "P.VENTA", alias = "price", default)]
    price: Option<Value>,
    #[serde(rename = "P", default)]
    nested_price: Option<Value>,
    #[serde(rename = "STOCK", alias = "stock", default)]
    stock: Option<Value>,
}

impl From<RawProduct> for Product {
    fn from(raw: RawProduct) -> Self {
        let price = raw
            .price
            .or_else(|| raw.nested_price.and_then(|p| p.get("VENTA").cloned()))
            .as_ref()
            .and_then(number_from_value);
        let stock = raw.stock.as_ref().map(integer_from_value).unwrap_or(0);
        Product {
            code: raw.code.trim().to_string(),
            description: raw.description,
            family: raw.family,
            price,
            stock,
        }
    }
}

/// Accepts strings, numbers, booleans and null (as empty) for text fields.
fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(String::new()),
        _ => Err(Error::custom("expected a string or a number")),
    }
}

/// Longest leading decimal number in `s` (`"1500.50 ARS"` → 1500.5). `None` when there is none.
fn leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > frac_start {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }
    s[..end].parse().ok()
}

/// Leading integer in `s` (`"3 u."` → 3, `"2.9"` → 2). Zero when there is none.
fn leading_integer(s: &str) -> i64 {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return 0;
    }
    s[..end].parse().unwrap_or(0)
}

fn number_from_value(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => leading_float(s),
        _ => None,
    };
    n.filter(|n| n.is_finite())
}

fn integer_from_value(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Value::String(s) => leading_integer(s),
        _ => 0,
    }
}

/// Parses the catalog response body into products, in listing order.
///
/// Returns [`CatalogError::Parse`] when the body is not a JSON array. Rows that are not objects
/// or lack a code are skipped with a warning.
pub fn parse_listing(body: &str) -> Result<Vec<Product>, CatalogError> {
    let rows: Vec<Value> =
        serde_json::from_str(body).map_err(|e| CatalogError::Parse(e.to_string()))?;
    let total = rows.len();
    let mut products = Vec::with_capacity(total);
    for (index, row) in rows.into_iter().enumerate() {
        match serde_json::from_value::<RawProduct>(row) {
            Ok(raw) if !raw.code.trim().is_empty() => products.push(Product::from(raw)),
            Ok(_) => warn!(index, "Skipping catalog row without code"),
            Err(e) => warn!(index, error = %e, "Skipping unreadable catalog row"),
        }
    }
    if products.len() < total {
        warn!(
            parsed = products.len(),
            total, "Some catalog rows were skipped"
        );
    }
    Ok(products)
}

//! Customer-facing rendering of product fields.

use catalog::Product;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left as-is in a URI component; everything else is percent-encoded.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Abbreviations always written in capitals.
const UPPERCASE_WORDS: &[&str] = &[
    "hdmi", "vga", "rca", "gb", "rgb", "led", "otg", "ps2", "pc", "sata", "sd", "usb",
];

/// Connectors kept in lower case.
const LOWERCASE_WORDS: &[&str] = &["y", "a", "o", "de", "para", "en", "con"];

/// Title-cases a catalog description: `"MOUSE USB GAMER"` → `"Mouse USB Gamer"`.
///
/// Words are split on single spaces (runs of spaces are preserved).
pub fn title_case(text: &str) -> String {
    text.to_lowercase()
        .split(' ')
        .map(|word| {
            if UPPERCASE_WORDS.contains(&word) {
                word.to_uppercase()
            } else if LOWERCASE_WORDS.contains(&word) {
                word.to_string()
            } else {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Groups thousands with `,` and keeps up to two decimals: `1500` → `1,500`, `1234.5` → `1,234.5`.
pub fn format_price(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3 + 4);
    if value < 0.0 && cents > 0 {
        grouped.push('-');
    }
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if fraction > 0 {
        let decimals = format!("{:02}", fraction);
        grouped.push('.');
        grouped.push_str(decimals.trim_end_matches('0'));
    }
    grouped
}

/// `$1,500`, or `precio a consultar` when the listing had no usable price.
pub fn price_label(price: Option<f64>) -> String {
    match price {
        Some(value) => format!("${}", format_price(value)),
        None => "precio a consultar".to_string(),
    }
}

/// `✅ 3 en stock` when units are available, `❌ Sin stock` otherwise.
pub fn stock_label(product: &Product) -> String {
    if product.is_available() {
        format!("✅ {} en stock", product.stock)
    } else {
        "❌ Sin stock".to_string()
    }
}

/// Store page for a product: `base_url` followed by the percent-encoded code.
pub fn product_link(base_url: &str, code: &str) -> String {
    format!("{}{}", base_url, utf8_percent_encode(code, URI_COMPONENT))
}

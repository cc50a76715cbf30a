//! Grounding block: the retrieved products (or their absence) appended to the customer's text.

use catalog::ScoredProduct;

use crate::format::{price_label, product_link, stock_label, title_case};

/// First line of the block when products matched.
pub const MATCHES_HEADER: &str =
    "📦 PRODUCTOS ENCONTRADOS (usá estos datos y links en tu respuesta):";

/// Sentence used when nothing matched; `{query}` is replaced with the customer's text.
pub const NO_MATCHES_TEMPLATE: &str =
    "📦 No encontré productos que coincidan con \"{query}\" en el catálogo.";

/// One entry per product: `• name | $price | stock` and an indented link line.
pub fn format_products(base_url: &str, matches: &[ScoredProduct]) -> String {
    matches
        .iter()
        .map(|hit| {
            let p = &hit.product;
            format!(
                "• {} | {} | {}\n  🔗 {}",
                title_case(&p.description),
                price_label(p.price),
                stock_label(p),
                product_link(base_url, &p.code)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub(crate) fn build_grounding_block(base_url: &str, query: &str, matches: &[ScoredProduct]) -> String {
    if matches.is_empty() {
        format!("\n\n{}", NO_MATCHES_TEMPLATE.replace("{query}", query))
    } else {
        format!("\n\n{}\n{}", MATCHES_HEADER, format_products(base_url, matches))
    }
}

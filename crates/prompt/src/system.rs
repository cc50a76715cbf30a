//! Store system message: persona, rules, and the category summary of the live listing.

use catalog::Product;

/// Store name used when none is configured.
pub const DEFAULT_STORE_NAME: &str = "Nova Center";

/// Product page prefix; the product code is appended percent-encoded.
pub const DEFAULT_PRODUCT_BASE_URL: &str = "https://www.novacenter.ar/tienda/?producto=";

const DEFAULT_STORE_DESCRIPTION: &str = "una tienda de accesorios tecnológicos en Argentina";

/// Store-specific values injected into prompts.
#[derive(Debug, Clone)]
pub struct PromptConfig {
    pub store_name: String,
    /// Short "what the store is" phrase, e.g. `una tienda de accesorios tecnológicos en Argentina`.
    pub store_description: String,
    pub product_base_url: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            store_name: DEFAULT_STORE_NAME.to_string(),
            store_description: DEFAULT_STORE_DESCRIPTION.to_string(),
            product_base_url: DEFAULT_PRODUCT_BASE_URL.to_string(),
        }
    }
}

/// One `- {category} ({n} productos)` line per top-level family, in order of first appearance.
pub fn category_summary(listing: &[Product]) -> String {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for product in listing {
        let family = product.top_level_family();
        match counts.iter_mut().find(|(name, _)| *name == family) {
            Some((_, count)) => *count += 1,
            None => counts.push((family, 1)),
        }
    }
    counts
        .iter()
        .map(|(family, count)| format!("- {} ({} productos)", family, count))
        .collect::<Vec<_>>()
        .join("\n")
}

pub(crate) fn build_system_prompt(config: &PromptConfig, listing: &[Product]) -> String {
    format!(
        "Sos un asistente de ventas amigable de {store}, {description}.
Tu trabajo es ayudar a los clientes a encontrar productos, consultar precios, stock y ver el producto en la tienda online.

INSTRUCCIONES:
- Respondé siempre en español argentino, de forma cordial y concisa (máximo 4-5 líneas).
- Cuando menciones un producto, SIEMPRE incluí su link 🔗 para que el cliente pueda verlo en la tienda.
- Formato: nombre del producto, precio, stock disponible, y el link.
- Si hay varios productos similares, mostrá hasta 3 opciones con su link cada una.
- Si no hay stock, avisá amablemente con el link igual, por si quieren guardarlo para después.
- Los precios son en pesos argentinos ($).
- No inventes productos ni links que no existan en el catálogo provisto.
- Sé breve: el cliente está chateando desde el celular.

CATEGORÍAS DISPONIBLES EN LA TIENDA:
{summary}",
        store = config.store_name,
        description = config.store_description,
        summary = category_summary(listing),
    )
}

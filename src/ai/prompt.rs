//! Prompt builders for the four AI flows.
//!
//! Prompt text stays in Spanish, matching the storefront's language; the
//! catalog and store registry are serialized as compact JSON context.

use serde::Serialize;

use crate::domain::component::Component;
use crate::domain::store::STORES;

/// Catalog entry trimmed down to what the model needs for picking parts.
#[derive(Serialize)]
struct CatalogEntry<'a> {
    slug: &'a str,
    name: &'a str,
    category: &'a str,
    brand: &'a str,
    price: f64,
    specs: &'a std::collections::BTreeMap<String, String>,
}

/// Serializes the catalog into the compact JSON context shared by prompts.
pub fn catalog_context(components: &[Component]) -> String {
    let entries: Vec<CatalogEntry> = components
        .iter()
        .map(|c| CatalogEntry {
            slug: c.slug.as_str(),
            name: c.name.as_str(),
            category: c.category.as_str(),
            brand: c.brand.as_str(),
            price: c.best_price(),
            specs: &c.specs,
        })
        .collect();
    serde_json::to_string(&entries).unwrap_or_else(|_| "[]".to_string())
}

fn stores_context() -> String {
    serde_json::to_string(&STORES).unwrap_or_else(|_| "[]".to_string())
}

pub fn build_pc_system(catalog: &str) -> String {
    format!(
        "Eres un experto de clase mundial en hardware de computadoras y armado de PCs. \
Tu tarea es ayudar a un usuario a construir una PC recomendando una lista de componentes \
compatibles basada en su descripción de necesidades y presupuesto.\n\n\
Aquí tienes la lista de componentes disponibles en formato JSON:\n{catalog}\n\n\
Reglas importantes que DEBES seguir:\n\
1. Compatibilidad es REY: el socket de la CPU debe coincidir con la Placa Madre, el tipo de \
memoria de la placa con la RAM, la Fuente de Poder debe tener potencia suficiente con margen, \
y todos los componentes deben caber en el Gabinete (factores de forma).\n\
2. Analiza la petición del usuario para entender su objetivo (gaming, trabajo, estudio, \
edición) y su presupuesto.\n\
3. Selecciona UN componente para CADA una de las 7 categorías: 'CPU', 'Motherboard', 'RAM', \
'GPU', 'Storage', 'Power Supply', 'Case'. Usa exclusivamente slugs de la lista.\n\
4. Si el objetivo es gaming prioriza la GPU; si es productividad prioriza CPU y RAM; con \
presupuesto bajo busca el mejor valor, no siempre lo más barato.\n\
5. Tu respuesta DEBE ser un objeto JSON con la forma \
{{\"build\":{{\"CPU\":\"<slug>\",\"Motherboard\":\"<slug>\",\"RAM\":\"<slug>\",\"GPU\":\"<slug>\",\
\"Storage\":\"<slug>\",\"Power Supply\":\"<slug>\",\"Case\":\"<slug>\"}}}}. \
No incluyas nada más en tu respuesta."
    )
}

pub fn build_pc_user(description: &str) -> String {
    format!("Petición del usuario:\n\"{description}\"")
}

pub fn find_prices_system() -> String {
    format!(
        "Eres un asistente experto en comparación de precios de hardware de PC en Chile. \
Tu tarea es encontrar los precios de un producto específico en las tiendas chilenas \
disponibles.\n\n\
Aquí está la lista de tiendas disponibles en formato JSON. DEBES usar los 'id' de estas \
tiendas en tu respuesta:\n{}\n\n\
Reglas que DEBES seguir:\n\
1. Busca en tu conocimiento los precios actuales del producto en las tiendas listadas.\n\
2. Para cada precio crea un objeto con el 'storeId' correcto, el 'price' como número y la \
'url' directa al producto.\n\
3. Si no encuentras un precio para una tienda, no la incluyas.\n\
4. El 'storeId' debe coincidir exactamente con uno de los 'id' del JSON de tiendas.\n\
5. Tu respuesta DEBE ser un objeto JSON con la forma \
{{\"prices\":[{{\"storeId\":\"store-1\",\"price\":0,\"url\":\"https://...\"}}]}}. \
No incluyas nada más.",
        stores_context()
    )
}

pub fn find_prices_user(product_name: &str) -> String {
    format!("Busca los mejores precios para el producto: \"{product_name}\".")
}

pub fn compatibility_system() -> String {
    "Eres un asistente que ayuda a encontrar piezas de PC compatibles. \
Dado un componente, sugiere una lista de piezas compatibles explicando la razón de cada una, \
y lista posibles problemas de compatibilidad si los hay.\n\
Tu respuesta DEBE ser un objeto JSON con la forma \
{\"compatibleParts\":[{\"partType\":\"...\",\"partName\":\"...\",\"reason\":\"...\"}],\
\"potentialIssues\":[\"...\"]}. No incluyas nada más."
        .to_string()
}

pub fn compatibility_user(
    component_type: &str,
    component_name: &str,
    component_details: Option<&str>,
) -> String {
    format!(
        "Tipo de componente: {component_type}\nNombre del componente: {component_name}\n\
Detalles del componente: {}",
        component_details.unwrap_or("(sin detalles)")
    )
}

pub fn product_details_system() -> String {
    "Eres un asistente experto en hardware de PC encargado de poblar un catálogo de productos. \
Dado el nombre de un producto, busca en tu conocimiento y devuelve un objeto JSON con todos \
sus detalles.\n\n\
Reglas importantes:\n\
1. Completa TODOS los campos: 'sku', 'brand', 'category', 'description', 'imageUrl', \
'price', 'stock' y 'specs'.\n\
2. Sé preciso; la información debe ser lo más actualizada posible.\n\
3. El precio debe ser un número entero en pesos chilenos, sin separadores de miles.\n\
4. Incluye solo las 3-5 especificaciones más importantes para ese tipo de componente.\n\
5. 'category' debe ser una de: 'CPU', 'GPU', 'Motherboard', 'RAM', 'Storage', \
'Power Supply', 'Case', 'Cooling', 'Other'.\n\
Tu respuesta DEBE ser un único objeto JSON con exactamente esos campos."
        .to_string()
}

pub fn product_details_user(product_name: &str) -> String {
    format!("Nombre del producto: \"{product_name}\"")
}

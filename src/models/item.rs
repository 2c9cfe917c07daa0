use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One catalog entry, normalized from either envelope item shape
/// (`{id, attributes: {...}}` or flat `{id, ...}`) at the client boundary
/// so no view ever sees the raw wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub stock: i64,
    pub featured: bool,
    pub description: String,
    /// Raw media field, kept as-is until render time; the image resolver
    /// accepts every shape the CMS has been seen to produce.
    pub image: Option<Value>,
}

impl CatalogItem {
    /// Normalize one envelope item. Returns `None` when the entry has no
    /// name — such records exist in practice and are skipped, not errors.
    pub fn from_entry(entry: &Value) -> Option<Self> {
        let attrs = match entry.get("attributes") {
            Some(a) if a.is_object() => a,
            _ => entry,
        };

        let name = attrs.get("name").and_then(|v| v.as_str())?.to_string();

        let category = attrs
            .get("category")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .unwrap_or("Uncategorized")
            .to_string();

        let image = attrs
            .get("image")
            .or_else(|| attrs.get("images"))
            .or_else(|| attrs.get("picture"))
            .filter(|v| !v.is_null())
            .cloned();

        Some(CatalogItem {
            id: id_string(entry.get("id")),
            name,
            category,
            price: attrs.get("price").and_then(|v| v.as_f64()).unwrap_or(0.0),
            stock: attrs.get("stock").and_then(|v| v.as_i64()).unwrap_or(0),
            featured: attrs
                .get("featured")
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
            description: flatten_description(attrs.get("description")),
            image,
        })
    }

    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// Flatten a description field to plain text. The CMS sends either a plain
/// string, a rich-text document (list of blocks with child text spans), or
/// a single block object. Formatting is lost, which is acceptable for
/// display.
pub fn flatten_description(field: Option<&Value>) -> String {
    match field {
        None => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(blocks)) => blocks
            .iter()
            .map(block_text)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" "),
        Some(block) if block.get("children").is_some() => block_text(block),
        Some(_) => String::new(),
    }
}

fn block_text(block: &Value) -> String {
    block
        .get("children")
        .and_then(|c| c.as_array())
        .map(|children| {
            children
                .iter()
                .filter_map(|c| c.get("text").and_then(|t| t.as_str()))
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default()
}

/// CMS ids arrive as numbers from live deployments and as strings from
/// older exports; the storefront treats them as opaque either way.
pub fn id_string(id: Option<&Value>) -> String {
    match id {
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    }
}

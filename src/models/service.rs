use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::item::id_string;

/// One service entry, normalized from either envelope item shape.
/// Unlike catalog items the description keeps its markup: the modal view
/// renders it untruncated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceItem {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Emoji or short icon text shown when no image is available.
    pub icon: Option<String>,
    pub image: Option<Value>,
}

impl ServiceItem {
    pub fn from_entry(entry: &Value) -> Option<Self> {
        let attrs = match entry.get("attributes") {
            Some(a) if a.is_object() => a,
            _ => entry,
        };

        let title = attrs.get("title").and_then(|v| v.as_str())?.to_string();

        Some(ServiceItem {
            id: id_string(entry.get("id")),
            title,
            description: attrs
                .get("description")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string(),
            icon: attrs
                .get("icon")
                .and_then(|v| v.as_str())
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string()),
            image: attrs.get("image").filter(|v| !v.is_null()).cloned(),
        })
    }
}

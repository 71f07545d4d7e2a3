//! Provider candidate shape.

use serde_json::json;

use super::{EntityKind, ImportEntity, Owner};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProviderCandidate {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub icon_url: Option<String>,
    pub pricing_page_url: Option<String>,
    /// Label names, normalized from either a native array or a
    /// comma-separated string.
    pub labels: Vec<String>,
    pub owner: Owner,
}

impl ImportEntity for ProviderCandidate {
    const KIND: EntityKind = EntityKind::Provider;

    fn payload(&self) -> serde_json::Value {
        let mut obj = json!({
            "name": self.name.clone().unwrap_or_default(),
            "owner": self.owner.payload(),
        });
        if let Some(id) = &self.id {
            obj["id"] = json!(id);
        }
        if let Some(description) = &self.description {
            obj["description"] = json!(description);
        }
        if let Some(url) = &self.url {
            obj["url"] = json!(url);
        }
        if let Some(icon_url) = &self.icon_url {
            obj["iconUrl"] = json!(icon_url);
        }
        if let Some(pricing_page_url) = &self.pricing_page_url {
            obj["pricingPageUrl"] = json!(pricing_page_url);
        }
        if !self.labels.is_empty() {
            obj["labels"] = json!(self.labels);
        }
        obj
    }
}

//! Label candidate shape.

use serde_json::json;

use super::{EntityKind, ImportEntity, Owner};

/// Mapped-but-not-yet-validated label row. `color` is normalized to a
/// leading-`#` form by the mapper when it matches the hex pattern;
/// otherwise the raw text survives for validation to report.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LabelCandidate {
    pub id: Option<String>,
    pub name: Option<String>,
    pub color: Option<String>,
    pub owner: Owner,
}

impl ImportEntity for LabelCandidate {
    const KIND: EntityKind = EntityKind::Label;

    fn payload(&self) -> serde_json::Value {
        let mut obj = json!({
            "name": self.name.clone().unwrap_or_default(),
            "color": self.color.clone().unwrap_or_default(),
            "owner": self.owner.payload(),
        });
        if let Some(id) = &self.id {
            obj["id"] = json!(id);
        }
        obj
    }
}

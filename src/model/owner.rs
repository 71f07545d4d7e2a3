//! Ownership and payer discriminators shared by all entity types.

use super::FieldValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerType {
    Personal,
    Family,
    System,
}

impl OwnerType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "personal" => Some(Self::Personal),
            "family" => Some(Self::Family),
            "system" => Some(Self::System),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Personal => "personal",
            Self::Family => "family",
            Self::System => "system",
        }
    }
}

/// Entity ownership. A missing owner type is defaulted to `personal` by the
/// mappers; `family` ownership additionally requires `family_id`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Owner {
    pub owner_type: FieldValue<OwnerType>,
    pub family_id: Option<String>,
}

impl Owner {
    pub fn payload(&self) -> serde_json::Value {
        let owner_type = self
            .owner_type
            .value()
            .copied()
            .unwrap_or(OwnerType::Personal);
        let mut obj = serde_json::json!({ "type": owner_type.as_str() });
        if let Some(family_id) = &self.family_id {
            obj["familyId"] = serde_json::Value::String(family_id.clone());
        }
        obj
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayerType {
    Family,
    FamilyMember,
}

impl PayerType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "family" => Some(Self::Family),
            "family_member" | "family-member" | "familymember" => Some(Self::FamilyMember),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Family => "family",
            Self::FamilyMember => "family_member",
        }
    }
}

/// Who pays for a subscription. Only materialized when at least one payer
/// field is present in the source row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Payer {
    pub payer_type: FieldValue<PayerType>,
    pub member_id: Option<String>,
}

impl Payer {
    pub fn payload(&self) -> serde_json::Value {
        let mut obj = serde_json::Map::new();
        if let Some(payer_type) = self.payer_type.value() {
            obj.insert(
                "type".to_string(),
                serde_json::Value::String(payer_type.as_str().to_string()),
            );
        }
        if let Some(member_id) = &self.member_id {
            obj.insert(
                "memberId".to_string(),
                serde_json::Value::String(member_id.clone()),
            );
        }
        serde_json::Value::Object(obj)
    }
}

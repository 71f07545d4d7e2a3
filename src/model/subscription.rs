//! Subscription candidate shape.

use chrono::NaiveDate;
use serde_json::json;

use super::{EntityKind, FieldValue, ImportEntity, Owner, Payer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recurrency {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
    Custom,
}

impl Recurrency {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            "quarterly" => Some(Self::Quarterly),
            "yearly" => Some(Self::Yearly),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
            Self::Custom => "custom",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SubscriptionCandidate {
    pub id: Option<String>,
    pub provider_key: Option<String>,
    pub friendly_name: Option<String>,
    pub start_date: FieldValue<NaiveDate>,
    pub end_date: FieldValue<NaiveDate>,
    pub recurrency: FieldValue<Recurrency>,
    /// Interval in days; only meaningful with `recurrency = custom`.
    pub custom_recurrency: FieldValue<u32>,
    pub custom_price_amount: FieldValue<f64>,
    pub custom_price_currency: Option<String>,
    pub owner: Owner,
    pub payer: Option<Payer>,
    pub free_trial_start: FieldValue<NaiveDate>,
    pub free_trial_end: FieldValue<NaiveDate>,
    pub family_users: Vec<String>,
}

impl ImportEntity for SubscriptionCandidate {
    const KIND: EntityKind = EntityKind::Subscription;

    fn payload(&self) -> serde_json::Value {
        let mut obj = json!({
            "providerKey": self.provider_key.clone().unwrap_or_default(),
            "startDate": self
                .start_date
                .value()
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            "recurrency": self
                .recurrency
                .value()
                .map(|r| r.as_str())
                .unwrap_or_default(),
            "owner": self.owner.payload(),
        });
        if let Some(id) = &self.id {
            obj["id"] = json!(id);
        }
        if let Some(friendly_name) = &self.friendly_name {
            obj["friendlyName"] = json!(friendly_name);
        }
        if let Some(end_date) = self.end_date.value() {
            obj["endDate"] = json!(end_date.format("%Y-%m-%d").to_string());
        }
        if let Some(interval) = self.custom_recurrency.value() {
            obj["customRecurrency"] = json!(interval);
        }
        if let (Some(amount), Some(currency)) = (
            self.custom_price_amount.value(),
            self.custom_price_currency.as_deref(),
        ) {
            obj["customPrice"] = json!({
                "amount": amount,
                "currency": currency.to_uppercase(),
            });
        }
        if let Some(payer) = &self.payer {
            obj["payer"] = payer.payload();
        }
        if let (Some(start), Some(end)) =
            (self.free_trial_start.value(), self.free_trial_end.value())
        {
            obj["freeTrial"] = json!({
                "startDate": start.format("%Y-%m-%d").to_string(),
                "endDate": end.format("%Y-%m-%d").to_string(),
            });
        }
        if !self.family_users.is_empty() {
            obj["familyUsers"] = json!(self.family_users);
        }
        obj
    }
}

//! Subscription field mapping and validation.
//!
//! The richest entity type: besides the shared owner rules it carries a
//! recurrency enum with a custom-interval companion, an optional custom
//! price (amount and currency travel together), an optional payer, and an
//! optional free-trial window.

use serde_json::Value;

use crate::model::{
    FieldValue, Payer, PayerType, Recurrency, SubscriptionCandidate, ValidationError,
};
use crate::parser::RawRow;

use super::value::{
    coerce_date, coerce_number, date_field, integer_field, list_field, number_field, raw_field,
    scalar_string, string_field,
};
use super::{map_owner, validate_id, validate_owner, FieldMapper};

pub struct SubscriptionMapper;

impl FieldMapper for SubscriptionMapper {
    type Entity = SubscriptionCandidate;

    fn map_fields(&self, row: &RawRow) -> SubscriptionCandidate {
        let (custom_price_amount, custom_price_currency) = map_custom_price(row);
        let (free_trial_start, free_trial_end) = map_free_trial(row);

        SubscriptionCandidate {
            id: string_field(row, &["id", "subscriptionId", "subscription_id"]),
            provider_key: string_field(
                row,
                &["providerKey", "provider_key", "providerId", "provider_id", "provider"],
            ),
            friendly_name: string_field(row, &["friendlyName", "friendly_name", "name"]),
            start_date: date_field(row, &["startDate", "start_date"]),
            end_date: date_field(row, &["endDate", "end_date"]),
            recurrency: map_recurrency(row),
            custom_recurrency: integer_field(
                row,
                &["customRecurrency", "custom_recurrency", "customRecurrencyDays"],
            ),
            custom_price_amount,
            custom_price_currency,
            owner: map_owner(row),
            payer: map_payer(row),
            free_trial_start,
            free_trial_end,
            family_users: list_field(row, &["familyUsers", "family_users"]),
        }
    }

    fn validate(&self, entity: &SubscriptionCandidate) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        // Required fields, in declaration order.
        if entity.provider_key.is_none() {
            errors.push(ValidationError::error("providerKey", "provider is required"));
        }
        if entity.start_date.is_missing() {
            errors.push(ValidationError::error("startDate", "start date is required"));
        }
        if entity.recurrency.is_missing() {
            errors.push(ValidationError::error("recurrency", "recurrency is required"));
        }

        // Format checks, in declaration order.
        validate_id(&entity.id, &mut errors);
        validate_date("startDate", &entity.start_date, &mut errors);
        validate_date("endDate", &entity.end_date, &mut errors);
        if let Some(raw) = entity.recurrency.invalid_raw() {
            errors.push(ValidationError::error(
                "recurrency",
                format!("'{raw}' is not one of daily, weekly, monthly, quarterly, yearly, custom"),
            ));
        }
        match &entity.custom_recurrency {
            FieldValue::Invalid(raw) => errors.push(ValidationError::error(
                "customRecurrency",
                format!("'{raw}' is not a positive integer"),
            )),
            FieldValue::Value(0) => errors.push(ValidationError::error(
                "customRecurrency",
                "custom recurrency must be a positive integer",
            )),
            _ => {}
        }
        match &entity.custom_price_amount {
            FieldValue::Invalid(raw) => errors.push(ValidationError::error(
                "customPriceAmount",
                format!("'{raw}' is not a number"),
            )),
            FieldValue::Value(amount) if *amount < 0.0 => errors.push(ValidationError::error(
                "customPriceAmount",
                "price amount must not be negative",
            )),
            _ => {}
        }
        if let Some(currency) = &entity.custom_price_currency {
            if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
                errors.push(ValidationError::error(
                    "customPriceCurrency",
                    format!("'{currency}' is not a 3-letter currency code"),
                ));
            }
        }
        validate_owner(&entity.owner, &mut errors);
        validate_payer(entity.payer.as_ref(), &mut errors);
        validate_date("freeTrialStartDate", &entity.free_trial_start, &mut errors);
        validate_date("freeTrialEndDate", &entity.free_trial_end, &mut errors);

        // Cross-field rules, evaluated only when both sides are present.
        if let (Some(start), Some(end)) = (entity.start_date.value(), entity.end_date.value()) {
            if end < start {
                errors.push(ValidationError::error(
                    "endDate",
                    "end date must not be before start date",
                ));
            }
        }
        match (entity.recurrency.value(), &entity.custom_recurrency) {
            (Some(Recurrency::Custom), FieldValue::Missing) => {
                errors.push(ValidationError::error(
                    "customRecurrency",
                    "custom recurrency is required when recurrency is custom",
                ));
            }
            (Some(r), interval) if *r != Recurrency::Custom && interval.is_present() => {
                errors.push(ValidationError::error(
                    "customRecurrency",
                    "custom recurrency is only allowed when recurrency is custom",
                ));
            }
            _ => {}
        }
        let amount_present = entity.custom_price_amount.is_present();
        let currency_present = entity.custom_price_currency.is_some();
        if amount_present && !currency_present {
            errors.push(ValidationError::error(
                "customPriceCurrency",
                "currency is required when a custom price amount is given",
            ));
        }
        if currency_present && !amount_present {
            errors.push(ValidationError::error(
                "customPriceAmount",
                "amount is required when a custom price currency is given",
            ));
        }
        let trial_start = entity.free_trial_start.is_present();
        let trial_end = entity.free_trial_end.is_present();
        if trial_start != trial_end {
            let field = if trial_start {
                "freeTrialEndDate"
            } else {
                "freeTrialStartDate"
            };
            errors.push(ValidationError::error(
                field,
                "free trial needs both a start and an end date",
            ));
        }
        if let (Some(start), Some(end)) = (
            entity.free_trial_start.value(),
            entity.free_trial_end.value(),
        ) {
            if end <= start {
                errors.push(ValidationError::error(
                    "freeTrialEndDate",
                    "free trial end must be after its start",
                ));
            }
        }

        errors
    }
}

fn validate_date(
    field: &str,
    value: &FieldValue<chrono::NaiveDate>,
    errors: &mut Vec<ValidationError>,
) {
    if let Some(raw) = value.invalid_raw() {
        errors.push(ValidationError::error(
            field,
            format!("'{raw}' is not a date (expected YYYY-MM-DD)"),
        ));
    }
}

fn map_recurrency(row: &RawRow) -> FieldValue<Recurrency> {
    match string_field(row, &["recurrency", "recurrence", "billingCycle", "billing_cycle"]) {
        None => FieldValue::Missing,
        Some(raw) => match Recurrency::parse(&raw) {
            Some(r) => FieldValue::Value(r),
            None => FieldValue::Invalid(raw),
        },
    }
}

/// Custom price arrives either nested (`customPrice: {amount, currency}`)
/// or flat (`customPriceAmount` / `customPriceCurrency`).
fn map_custom_price(row: &RawRow) -> (FieldValue<f64>, Option<String>) {
    if let Some(Value::Object(obj)) = raw_field(row, &["customPrice", "custom_price"]) {
        let amount = obj
            .get("amount")
            .map(coerce_number)
            .unwrap_or(FieldValue::Missing);
        let currency = obj.get("currency").and_then(scalar_string);
        return (amount, currency);
    }
    (
        number_field(row, &["customPriceAmount", "custom_price_amount"]),
        string_field(row, &["customPriceCurrency", "custom_price_currency"]),
    )
}

/// Payer is optional as a whole; it is materialized as soon as any payer
/// field is present so validation can judge the combination.
fn map_payer(row: &RawRow) -> Option<Payer> {
    let (type_raw, member_id) = match raw_field(row, &["payer"]) {
        Some(Value::Object(obj)) => (
            obj.get("type").and_then(scalar_string),
            obj.get("memberId")
                .or_else(|| obj.get("member_id"))
                .and_then(scalar_string),
        ),
        Some(other) => (scalar_string(other), None),
        None => (
            string_field(row, &["payerType", "payer_type"]),
            string_field(row, &["payerMemberId", "payer_member_id"]),
        ),
    };

    if type_raw.is_none() && member_id.is_none() {
        return None;
    }
    let payer_type = match type_raw {
        None => FieldValue::Missing,
        Some(raw) => match PayerType::parse(&raw) {
            Some(t) => FieldValue::Value(t),
            None => FieldValue::Invalid(raw),
        },
    };
    Some(Payer {
        payer_type,
        member_id,
    })
}

fn validate_payer(payer: Option<&Payer>, errors: &mut Vec<ValidationError>) {
    let Some(payer) = payer else { return };
    match &payer.payer_type {
        FieldValue::Missing => errors.push(ValidationError::error(
            "payerType",
            "payer type is required when payer fields are given",
        )),
        FieldValue::Invalid(raw) => errors.push(ValidationError::error(
            "payerType",
            format!("'{raw}' is not one of family, family_member"),
        )),
        FieldValue::Value(PayerType::FamilyMember) => {
            if payer.member_id.is_none() {
                errors.push(ValidationError::error(
                    "payerMemberId",
                    "a member id is required when the payer is a family member",
                ));
            }
        }
        FieldValue::Value(PayerType::Family) => {}
    }
}

/// Free trial arrives either nested (`freeTrial: {startDate, endDate}`) or
/// flat (`freeTrialStartDate` / `freeTrialEndDate`).
fn map_free_trial(
    row: &RawRow,
) -> (FieldValue<chrono::NaiveDate>, FieldValue<chrono::NaiveDate>) {
    if let Some(Value::Object(obj)) = raw_field(row, &["freeTrial", "free_trial"]) {
        let start = obj
            .get("startDate")
            .or_else(|| obj.get("start_date"))
            .map(coerce_date)
            .unwrap_or(FieldValue::Missing);
        let end = obj
            .get("endDate")
            .or_else(|| obj.get("end_date"))
            .map(coerce_date)
            .unwrap_or(FieldValue::Missing);
        return (start, end);
    }
    (
        date_field(row, &["freeTrialStartDate", "free_trial_start_date"]),
        date_field(row, &["freeTrialEndDate", "free_trial_end_date"]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ImportEntity;
    use crate::parser::{parse_str, FileFormat};

    fn parse_one(json: &str) -> crate::model::ParsedImportRecord<SubscriptionCandidate> {
        let rows = parse_str(FileFormat::Json, json, None).unwrap();
        SubscriptionMapper.parse_records(&rows).remove(0)
    }

    #[test]
    fn test_minimal_valid_subscription() {
        let record = parse_one(
            r#"[{"providerKey":"netflix","startDate":"2024-01-01","recurrency":"monthly"}]"#,
        );
        assert!(record.is_valid(), "errors: {:?}", record.validation_errors);
        let payload = record.data.payload();
        assert_eq!(payload["providerKey"], "netflix");
        assert_eq!(payload["startDate"], "2024-01-01");
        assert_eq!(payload["recurrency"], "monthly");
        assert_eq!(payload["owner"]["type"], "personal");
    }

    #[test]
    fn test_missing_required_fields_in_order() {
        let record = parse_one(r#"[{}]"#);
        let fields: Vec<&str> = record
            .validation_errors
            .iter()
            .map(|e| e.field.as_str())
            .collect();
        assert_eq!(fields, vec!["providerKey", "startDate", "recurrency"]);
    }

    #[test]
    fn test_end_date_before_start_date() {
        let record = parse_one(
            r#"[{"providerKey":"x","startDate":"2024-06-01","endDate":"2024-01-01","recurrency":"monthly"}]"#,
        );
        assert!(!record.is_valid());
        assert_eq!(record.validation_errors[0].field, "endDate");
    }

    #[test]
    fn test_missing_end_date_triggers_no_cross_field_error() {
        let record = parse_one(
            r#"[{"providerKey":"x","startDate":"2024-06-01","recurrency":"monthly"}]"#,
        );
        assert!(record.is_valid());
    }

    #[test]
    fn test_custom_recurrency_required_iff_custom() {
        let record = parse_one(
            r#"[{"providerKey":"x","startDate":"2024-01-01","recurrency":"custom"}]"#,
        );
        assert!(!record.is_valid());
        assert_eq!(record.validation_errors[0].field, "customRecurrency");

        let record = parse_one(
            r#"[{"providerKey":"x","startDate":"2024-01-01","recurrency":"monthly","customRecurrency":14}]"#,
        );
        assert!(!record.is_valid());
        assert_eq!(record.validation_errors[0].field, "customRecurrency");

        let record = parse_one(
            r#"[{"providerKey":"x","startDate":"2024-01-01","recurrency":"custom","customRecurrency":"14"}]"#,
        );
        assert!(record.is_valid(), "errors: {:?}", record.validation_errors);
        assert_eq!(record.data.custom_recurrency.value(), Some(&14));
    }

    #[test]
    fn test_custom_price_both_or_neither() {
        let record = parse_one(
            r#"[{"providerKey":"x","startDate":"2024-01-01","recurrency":"monthly","customPriceAmount":"9.99"}]"#,
        );
        assert!(!record.is_valid());
        assert_eq!(record.validation_errors[0].field, "customPriceCurrency");

        let record = parse_one(
            r#"[{"providerKey":"x","startDate":"2024-01-01","recurrency":"monthly","customPrice":{"amount":9.99,"currency":"eur"}}]"#,
        );
        assert!(record.is_valid(), "errors: {:?}", record.validation_errors);
        assert_eq!(record.data.payload()["customPrice"]["currency"], "EUR");
    }

    #[test]
    fn test_negative_price_rejected() {
        let record = parse_one(
            r#"[{"providerKey":"x","startDate":"2024-01-01","recurrency":"monthly","customPriceAmount":-1,"customPriceCurrency":"EUR"}]"#,
        );
        assert!(!record.is_valid());
        assert_eq!(record.validation_errors[0].field, "customPriceAmount");
    }

    #[test]
    fn test_payer_member_requires_member_id() {
        let record = parse_one(
            r#"[{"providerKey":"x","startDate":"2024-01-01","recurrency":"monthly","payerType":"family_member"}]"#,
        );
        assert!(!record.is_valid());
        assert_eq!(record.validation_errors[0].field, "payerMemberId");
    }

    #[test]
    fn test_free_trial_window_rules() {
        let record = parse_one(
            r#"[{"providerKey":"x","startDate":"2024-01-01","recurrency":"monthly","freeTrial":{"startDate":"2024-01-01"}}]"#,
        );
        assert!(!record.is_valid());
        assert_eq!(record.validation_errors[0].field, "freeTrialEndDate");

        let record = parse_one(
            r#"[{"providerKey":"x","startDate":"2024-01-01","recurrency":"monthly","freeTrial":{"startDate":"2024-02-01","endDate":"2024-01-01"}}]"#,
        );
        assert!(!record.is_valid());
        assert_eq!(record.validation_errors[0].field, "freeTrialEndDate");

        let record = parse_one(
            r#"[{"providerKey":"x","startDate":"2024-01-01","recurrency":"monthly","freeTrial":{"startDate":"2024-01-01","endDate":"2024-01-15"}}]"#,
        );
        assert!(record.is_valid(), "errors: {:?}", record.validation_errors);
    }

    #[test]
    fn test_unparsable_date_keeps_raw_value_in_message() {
        let record = parse_one(
            r#"[{"providerKey":"x","startDate":"next week","recurrency":"monthly"}]"#,
        );
        assert!(!record.is_valid());
        let error = &record.validation_errors[0];
        assert_eq!(error.field, "startDate");
        assert!(error.message.contains("next week"));
    }
}

//! Provider field mapping and validation.

use crate::model::{ProviderCandidate, ValidationError};
use crate::parser::RawRow;

use super::value::{list_field, string_field};
use super::{map_owner, validate_id, validate_owner, validate_url, FieldMapper};

pub struct ProviderMapper;

impl FieldMapper for ProviderMapper {
    type Entity = ProviderCandidate;

    fn map_fields(&self, row: &RawRow) -> ProviderCandidate {
        ProviderCandidate {
            id: string_field(row, &["id", "providerId", "provider_id"]),
            name: string_field(row, &["name", "providerName", "provider_name"]),
            description: string_field(row, &["description", "notes"]),
            url: string_field(row, &["url", "website"]),
            icon_url: string_field(row, &["iconUrl", "icon_url", "icon"]),
            pricing_page_url: string_field(row, &["pricingPageUrl", "pricing_page_url"]),
            labels: list_field(row, &["labels", "labelNames", "label_names"]),
            owner: map_owner(row),
        }
    }

    fn validate(&self, entity: &ProviderCandidate) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if entity.name.is_none() {
            errors.push(ValidationError::error("name", "name is required"));
        }

        validate_id(&entity.id, &mut errors);
        validate_url("url", &entity.url, &mut errors);
        validate_url("iconUrl", &entity.icon_url, &mut errors);
        validate_url("pricingPageUrl", &entity.pricing_page_url, &mut errors);
        validate_owner(&entity.owner, &mut errors);

        errors
    }
}

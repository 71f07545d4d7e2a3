//! Candidate entity shapes and record-level types shared across the
//! import pipeline.

mod label;
mod owner;
mod provider;
mod record;
mod subscription;

pub use label::LabelCandidate;
pub use owner::{Owner, OwnerType, Payer, PayerType};
pub use provider::ProviderCandidate;
pub use record::{FieldValue, ParsedImportRecord, Severity, ValidationError};
pub use subscription::{Recurrency, SubscriptionCandidate};

/// The entity types the tracker API can create in bulk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Label,
    Provider,
    Subscription,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Label => "label",
            Self::Provider => "provider",
            Self::Subscription => "subscription",
        }
    }

    /// REST collection segment for the create endpoint.
    pub fn collection(&self) -> &'static str {
        match self {
            Self::Label => "labels",
            Self::Provider => "providers",
            Self::Subscription => "subscriptions",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A mapped candidate that can be turned into a create-mutation payload.
///
/// `payload` is only invoked for records that passed validation, so
/// implementations may serialize required fields unconditionally.
pub trait ImportEntity {
    const KIND: EntityKind;

    fn payload(&self) -> serde_json::Value;
}

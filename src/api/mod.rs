//! The create-mutation collaborator consumed by the import manager.

mod client;

pub use client::TrackerClient;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::SubmitError;
use crate::model::EntityKind;

/// One create-mutation per entity kind. The import manager treats any
/// rejection as the unit of failure and only inspects it for the
/// duplicate/conflict signal.
#[async_trait]
pub trait RecordSubmitter: Send + Sync {
    async fn submit(&self, kind: EntityKind, payload: Value) -> Result<Value, SubmitError>;
}

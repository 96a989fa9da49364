use serde::{Deserialize, Deserializer, Serialize};

use crate::error::AppError;
use crate::models::TraceId;

/// Published once per inserted product to trigger image processing.
///
/// Wire form is JSON with the product id as a string, e.g.
/// `{"product_id":"42","trace_id":"..."}`. Any other fields a producer embeds
/// (such as a product snapshot) are ignored; the id is authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductEvent {
    #[serde(deserialize_with = "id_as_string")]
    pub product_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<TraceId>,
}

impl ProductEvent {
    pub fn new(product_id: i64, trace_id: Option<TraceId>) -> Self {
        Self {
            product_id: product_id.to_string(),
            trace_id,
        }
    }

    /// Routing key for the broker.
    pub fn key(&self) -> &str {
        &self.product_id
    }

    /// Numeric id used against the product store.
    pub fn product_id(&self) -> Result<i64, AppError> {
        self.product_id.trim().parse().map_err(|_| {
            AppError::Validation(format!("invalid product id in event: {:?}", self.product_id))
        })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    pub fn from_bytes(payload: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(payload)
    }
}

/// Accept the id as a JSON string or a JSON integer.
fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

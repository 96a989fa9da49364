use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use uuid::Uuid;

/// Correlation token supplied by the caller and carried through every error
/// and log line produced on behalf of one request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraceId(String);

impl TraceId {
    pub fn generate() -> Self {
        TraceId(Uuid::new_v4().to_string())
    }

    /// Use the header value when it is a valid UUID, otherwise generate a fresh one.
    pub fn from_header(value: Option<&str>) -> Self {
        match value.map(str::trim).map(Uuid::parse_str) {
            Some(Ok(id)) => TraceId(id.to_string()),
            _ => Self::generate(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TraceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl From<&str> for TraceId {
    fn from(s: &str) -> Self {
        TraceId(s.to_string())
    }
}

impl From<String> for TraceId {
    fn from(s: String) -> Self {
        TraceId(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_valid_uuid_header() {
        let id = "6f1c1b1e-2f7a-4a53-9a43-1b0f0e3c2d11";
        assert_eq!(TraceId::from_header(Some(id)).as_str(), id);
    }

    #[test]
    fn replaces_invalid_or_missing_header() {
        let generated = TraceId::from_header(Some("not-a-uuid"));
        assert_ne!(generated.as_str(), "not-a-uuid");
        assert!(Uuid::parse_str(generated.as_str()).is_ok());
        assert!(Uuid::parse_str(TraceId::from_header(None).as_str()).is_ok());
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Owner of products, as submitted for insertion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub mobile: String,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewUser {
    pub fn stamped(name: String, mobile: String, latitude: f64, longitude: f64) -> Self {
        let now = Utc::now();
        Self {
            name,
            mobile,
            latitude,
            longitude,
            created_at: now,
            updated_at: now,
        }
    }
}

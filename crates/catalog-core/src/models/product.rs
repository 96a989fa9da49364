use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A product about to be inserted. The store assigns the id.
///
/// Field presence is checked by the ingress layer; nothing here re-validates it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewProduct {
    pub product_name: String,
    pub product_description: String,
    pub product_images: Vec<String>,
    pub product_price: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewProduct {
    /// Build a new product with both timestamps set to the current UTC time.
    pub fn stamped(
        product_name: String,
        product_description: String,
        product_images: Vec<String>,
        product_price: i64,
        user_id: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            product_name,
            product_description,
            product_images,
            product_price,
            user_id,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamped_sets_equal_timestamps() {
        let p = NewProduct::stamped(
            "lamp".into(),
            "desk lamp".into(),
            vec!["http://img/1.png".into()],
            1200,
            7,
        );
        assert_eq!(p.created_at, p.updated_at);
        assert_eq!(p.user_id, 7);
    }
}

/// Header carrying the per-request correlation token.
pub const TRANSACTION_ID_HEADER: &str = "transaction-id";

/// Default topic for product creation events.
pub const DEFAULT_PRODUCT_TOPIC: &str = "product-events";

/// Default consumer group of the image worker.
pub const DEFAULT_CONSUMER_GROUP: &str = "image-worker";

/// Output extensions the image worker can encode.
pub const SUPPORTED_OUTPUT_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

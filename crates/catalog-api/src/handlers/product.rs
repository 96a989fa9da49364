//! Product creation handler

use axum::{extract::State, Extension, Json};
use catalog_core::TraceId;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidateUrl, ValidationError};

use crate::error::{HttpAppError, ValidatedJson};
use crate::services::ProductDetails;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 255, message = "product_name must not be empty"))]
    pub product_name: String,
    #[validate(length(min = 1, message = "product_description must not be empty"))]
    pub product_description: String,
    #[validate(custom(function = "validate_image_urls"))]
    pub product_images: Vec<String>,
    #[validate(range(min = 0, message = "product_price must not be negative"))]
    pub product_price: i64,
    #[validate(range(min = 1, message = "user_id must be positive"))]
    pub user_id: i64,
}

#[derive(Debug, Serialize)]
pub struct CreateProductResponse {
    pub product_id: i64,
    pub product_name: String,
}

fn validate_image_urls(urls: &[String]) -> Result<(), ValidationError> {
    if urls.is_empty() {
        return Err(ValidationError::new("product_images")
            .with_message("at least one product image is required".into()));
    }
    if let Some(bad) = urls.iter().find(|url| !url.validate_url()) {
        let mut err = ValidationError::new("product_images")
            .with_message("product_images must be absolute URLs".into());
        err.add_param("value".into(), bad);
        return Err(err);
    }
    Ok(())
}

#[tracing::instrument(skip(state, request), fields(trace_id = %trace, user_id = request.user_id))]
pub async fn create_product(
    State(state): State<AppState>,
    Extension(trace): Extension<TraceId>,
    ValidatedJson(request): ValidatedJson<CreateProductRequest>,
) -> Result<Json<CreateProductResponse>, HttpAppError> {
    let product_name = request.product_name.clone();
    let details = ProductDetails {
        name: request.product_name,
        description: request.product_description,
        image_urls: request.product_images,
        price: request.product_price,
        owner_id: request.user_id,
    };

    let product_id = state.products.create_product(details, &trace).await?;

    Ok(Json(CreateProductResponse {
        product_id,
        product_name,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(images: Vec<&str>) -> CreateProductRequest {
        CreateProductRequest {
            product_name: "lamp".into(),
            product_description: "desk lamp".into(),
            product_images: images.into_iter().map(String::from).collect(),
            product_price: 1200,
            user_id: 1,
        }
    }

    #[test]
    fn accepts_absolute_urls() {
        assert!(request(vec!["http://img.example.com/a.png"]).validate().is_ok());
    }

    #[test]
    fn rejects_missing_or_relative_images() {
        assert!(request(vec![]).validate().is_err());
        assert!(request(vec!["http://img/a.png", "a.png"]).validate().is_err());
    }

    #[test]
    fn rejects_negative_price() {
        let mut req = request(vec!["http://img/a.png"]);
        req.product_price = -1;
        assert!(req.validate().is_err());
    }
}

use catalog_core::models::NewProduct;
use catalog_core::AppError;
use chrono::Utc;
use sqlx::{PgPool, Postgres};

use super::classify::{classify_violation, ViolationMessages};

const PRODUCT_VIOLATIONS: ViolationMessages = ViolationMessages {
    unique: "product already added",
    foreign_key: "user id is not found",
    check: "product price must not be negative",
};

/// Repository for managing products
#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a product and return the id assigned by the database
    #[tracing::instrument(skip(self, product), fields(db.table = "products", db.operation = "insert", user_id = product.user_id))]
    pub async fn insert(&self, product: &NewProduct) -> Result<i64, AppError> {
        sqlx::query_scalar::<Postgres, i64>(
            r#"
            INSERT INTO products (
                product_name, product_description, product_images,
                product_price, user_id, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING product_id
            "#,
        )
        .bind(&product.product_name)
        .bind(&product.product_description)
        .bind(&product.product_images)
        .bind(product.product_price)
        .bind(product.user_id)
        .bind(product.created_at)
        .bind(product.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| classify_violation(e, PRODUCT_VIOLATIONS))
    }

    /// Source image URLs in their stored order
    #[tracing::instrument(skip(self), fields(db.table = "products", db.operation = "select", db.record_id = id))]
    pub async fn fetch_source_image_urls(&self, id: i64) -> Result<Vec<String>, AppError> {
        let urls = sqlx::query_scalar::<Postgres, Vec<String>>(
            "SELECT product_images FROM products WHERE product_id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        urls.ok_or_else(|| AppError::NotFound(format!("product {} not found", id)))
    }

    /// Append derived image paths; existing entries are kept
    #[tracing::instrument(skip(self, paths), fields(db.table = "products", db.operation = "update", db.record_id = id, paths = paths.len()))]
    pub async fn update_derived_images(&self, id: i64, paths: &[String]) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET derived_images = array_cat(derived_images, $2::TEXT[]),
                updated_at = $3
            WHERE product_id = $1
            "#,
        )
        .bind(id)
        .bind(paths)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("product {} not found", id)));
        }

        Ok(())
    }
}

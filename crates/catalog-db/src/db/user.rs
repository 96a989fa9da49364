use catalog_core::models::NewUser;
use catalog_core::AppError;
use sqlx::{PgPool, Postgres};

use super::classify::{classify_violation, ViolationMessages};

const USER_VIOLATIONS: ViolationMessages = ViolationMessages {
    unique: "user already added",
    foreign_key: "user reference is invalid",
    check: "user fields are out of range",
};

/// Repository for managing product owners
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self, user), fields(db.table = "users", db.operation = "insert"))]
    pub async fn insert(&self, user: &NewUser) -> Result<i64, AppError> {
        sqlx::query_scalar::<Postgres, i64>(
            r#"
            INSERT INTO users (name, mobile, latitude, longitude, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&user.name)
        .bind(&user.mobile)
        .bind(user.latitude)
        .bind(user.longitude)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| classify_violation(e, USER_VIOLATIONS))
    }
}

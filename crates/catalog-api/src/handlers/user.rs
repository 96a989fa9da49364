use axum::{extract::State, Extension, Json};
use catalog_core::{NewUser, TraceId};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{HttpAppError, ValidatedJson};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 5, max = 20))]
    pub mobile: String,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

#[derive(Debug, Serialize)]
pub struct CreateUserResponse {
    pub user_id: i64,
    pub name: String,
}

#[tracing::instrument(skip(state, request), fields(trace_id = %trace))]
pub async fn create_user(
    State(state): State<AppState>,
    Extension(trace): Extension<TraceId>,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> Result<Json<CreateUserResponse>, HttpAppError> {
    let user = NewUser::stamped(
        request.name.clone(),
        request.mobile,
        request.latitude,
        request.longitude,
    );
    let user_id = state.users.insert_user(&user, &trace).await?;
    tracing::info!(user_id, "User created");

    Ok(Json(CreateUserResponse {
        user_id,
        name: request.name,
    }))
}

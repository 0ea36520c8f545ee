use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::error::ApiError;
use crate::models::User;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_users))
        .route("/{id}", axum::routing::put(update_user).delete(delete_user))
}

// GET /api/users
async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let users = User::find_all(&state.db).await?;
    Ok((StatusCode::OK, Json(users)))
}

// PUT /api/users/{id}
#[derive(Debug, Deserialize)]
struct UpdateUserRequest {
    username: String,
    email: String,
    department: String,
}

async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let updated = sqlx::query(
        "UPDATE users SET username = $1, email = $2, department = $3 WHERE id = $4",
    )
    .bind(&req.username)
    .bind(&req.email)
    .bind(&req.department)
    .bind(id)
    .execute(&state.db.pool)
    .await?
    .rows_affected();

    if updated == 0 {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    Ok((
        StatusCode::OK,
        Json(json!({ "message": "User updated successfully" })),
    ))
}

// DELETE /api/users/{id}
async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(&state.db.pool)
        .await?;

    Ok((
        StatusCode::OK,
        Json(json!({ "message": "User deleted successfully" })),
    ))
}

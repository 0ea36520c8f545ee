use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
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
        .route("/signup", post(signup))
        .route("/login", post(login))
}

// POST /api/auth/signup
#[derive(Debug, Deserialize)]
struct SignupRequest {
    username: String,
    email: String,
    password: String,
    department: String,
    role: String,
}

async fn signup(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let any_blank = [&req.username, &req.email, &req.password, &req.department, &req.role]
        .iter()
        .any(|f| f.trim().is_empty());
    if any_blank {
        return Err(ApiError::BadRequest("All fields are required".to_string()));
    }

    if User::find_by_email(&req.email, &state.db).await?.is_some() {
        return Err(ApiError::Conflict("Email already used".to_string()));
    }

    let hashed = bcrypt::hash(&req.password, 10).map_err(|e| {
        tracing::error!("bcrypt hash failed: {:?}", e);
        ApiError::BadRequest("Password could not be processed".to_string())
    })?;

    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (username, email, password_hash, department, role)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING *",
    )
    .bind(&req.username)
    .bind(&req.email)
    .bind(&hashed)
    .bind(&req.department)
    .bind(&req.role)
    .fetch_one(&state.db.pool)
    .await?;

    tracing::info!("new account: {} ({})", user.username, user.email);

    Ok((
        StatusCode::OK,
        Json(json!({
            "message": "Account created successfully!",
            "user": { "id": user.id, "username": user.username, "email": user.email }
        })),
    ))
}

// POST /api/auth/login
#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.email.trim().is_empty() || req.password.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Email and password are required".to_string(),
        ));
    }

    // Unknown email and wrong password answer identically
    let user = User::find_by_email(&req.email, &state.db)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    if !user.verify_password(&req.password) {
        return Err(ApiError::Unauthorized);
    }

    Ok((
        StatusCode::OK,
        Json(json!({
            "message": "Login successful",
            "user": {
                "id": user.id,
                "username": user.username,
                "email": user.email,
                "role": user.role,
                "department": user.department
            }
        })),
    ))
}

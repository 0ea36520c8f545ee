use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
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
        .route("/faculties", get(get_all_faculties))
        .route("/sendEmail", post(send_email))
}

// GET /api/faculties
//
// The admin mail form lists every account as a recipient candidate, roles
// included.
async fn get_all_faculties(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let faculties = User::find_all(&state.db).await?;
    Ok((StatusCode::OK, Json(faculties)))
}

// POST /api/sendEmail
#[derive(Debug, Deserialize)]
struct SendEmailRequest {
    #[serde(default)]
    to: String,
    #[serde(default)]
    subject: String,
    #[serde(default)]
    message: String,
}

async fn send_email(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SendEmailRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.to.trim().is_empty() || req.subject.trim().is_empty() || req.message.trim().is_empty() {
        return Err(ApiError::BadRequest("Missing required fields".to_string()));
    }

    state
        .mailer
        .send(&req.to, &req.subject, &req.message)
        .await?;

    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Email sent successfully" })),
    ))
}

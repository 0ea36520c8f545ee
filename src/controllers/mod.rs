pub mod auth;
pub mod bookings;
pub mod email;
pub mod users;

use axum::Router;
use std::sync::Arc;

pub fn routes() -> Router<Arc<crate::AppState>> {
    Router::new()
        .nest("/auth", auth::routes())
        .nest("/users", users::routes())
        .merge(bookings::routes())
        .merge(email::routes())
}

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use crate::availability;
use crate::error::ApiError;
use crate::models::Booking;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/book", post(create_booking))
        .route("/allbookings", get(get_all_bookings))
        .route("/bookings", get(get_bookings_for_report))
        .route("/mybookings/{facultyName}", get(get_by_faculty))
        .route("/updateStatus/{id}", put(update_status))
        .route("/updateSeen/{id}", put(update_seen))
        .route("/bookingsByHall/{hallName}", get(bookings_by_hall))
        .route("/availability/{hallName}", get(hall_availability))
}

/* ---------- BOOKINGS ---------- */

// POST /api/book
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateBookingRequest {
    #[serde(default)]
    event_name: String,
    #[serde(default)]
    hall_name: String,
    #[serde(default)]
    faculty_name: String,
    department: Option<String>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    #[serde(default)]
    slot: String,
    speaker: Option<String>,
    attendees: Option<String>,
    collaboration: Option<String>,
    description: Option<String>,
    user_id: Option<i64>,
}

// Required fields, and a sane date range. The form enforces the same rules
// client-side; the model marks them required regardless.
fn validate_booking_request(req: &CreateBookingRequest) -> Result<(NaiveDate, NaiveDate), String> {
    if req.event_name.trim().is_empty()
        || req.hall_name.trim().is_empty()
        || req.faculty_name.trim().is_empty()
        || req.slot.trim().is_empty()
    {
        return Err("eventName, hallName, facultyName and slot are required".to_string());
    }
    let start = req.start_date.ok_or("startDate is required")?;
    let end = req.end_date.unwrap_or(start);
    if end < start {
        return Err("endDate cannot be before startDate".to_string());
    }
    Ok((start, end))
}

async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (start, end) = validate_booking_request(&req).map_err(ApiError::BadRequest)?;

    // Reject requests colliding with an accepted booking for the same hall.
    // Check-then-insert: concurrent requests can still race, matching the
    // last-write-wins posture everywhere else in this service.
    let accepted = Booking::accepted_for_hall(&req.hall_name, &state.db).await?;
    let calendar = availability::derive(&accepted);
    if availability::range_conflicts(&calendar, start, end, &req.slot) {
        return Err(ApiError::Conflict(
            "The hall is already booked for the selected dates and slot".to_string(),
        ));
    }

    let booking = sqlx::query_as::<_, Booking>(
        "INSERT INTO bookings
            (event_name, hall_name, faculty_name, department, start_date, end_date,
             slot, speaker, attendees, collaboration, description, user_id)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
         RETURNING *",
    )
    .bind(&req.event_name)
    .bind(&req.hall_name)
    .bind(&req.faculty_name)
    .bind(&req.department)
    .bind(start)
    .bind(end)
    .bind(&req.slot)
    .bind(&req.speaker)
    .bind(&req.attendees)
    .bind(&req.collaboration)
    .bind(&req.description)
    .bind(req.user_id)
    .fetch_one(&state.db.pool)
    .await?;

    tracing::info!(
        "booking {} submitted: {} at {} ({} to {}, {})",
        booking.id, booking.event_name, booking.hall_name, start, end, booking.slot
    );

    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Booking submitted successfully!", "booking": booking })),
    ))
}

// GET /api/allbookings
async fn get_all_bookings(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let bookings = Booking::find_all(&state.db).await?;
    Ok((StatusCode::OK, Json(bookings)))
}

// GET /api/bookings?start=YYYY-MM-DD&end=YYYY-MM-DD
#[derive(Debug, Deserialize)]
struct ReportQuery {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

// Report rows are selected by where the booking starts; either bound may be
// absent. Built the same way whether zero, one or both bounds are present.
fn report_sql(start: Option<NaiveDate>, end: Option<NaiveDate>) -> String {
    let mut q = String::from("SELECT * FROM bookings");
    let mut bind_idx = 1;
    if start.is_some() {
        q.push_str(&format!(" WHERE start_date >= ${}", bind_idx));
        bind_idx += 1;
    }
    if end.is_some() {
        q.push_str(if bind_idx == 1 { " WHERE" } else { " AND" });
        q.push_str(&format!(" start_date <= ${}", bind_idx));
    }
    q.push_str(" ORDER BY created_at DESC");
    q
}

async fn get_bookings_for_report(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let q = report_sql(params.start, params.end);
    let mut dbq = sqlx::query_as::<_, Booking>(&q);
    if let Some(start) = params.start {
        dbq = dbq.bind(start);
    }
    if let Some(end) = params.end {
        dbq = dbq.bind(end);
    }

    let bookings = dbq.fetch_all(&state.db.pool).await?;
    Ok((StatusCode::OK, Json(bookings)))
}

// GET /api/mybookings/{facultyName}
async fn get_by_faculty(
    State(state): State<Arc<AppState>>,
    Path(faculty_name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let bookings = Booking::find_by_faculty(&faculty_name, &state.db).await?;
    Ok((StatusCode::OK, Json(bookings)))
}

/* ---------- STATUS / SEEN ---------- */

// PUT /api/updateStatus/{id}
#[derive(Debug, Deserialize)]
struct UpdateStatusRequest {
    status: String,
}

async fn update_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // Plain overwrite, no transition guard: re-approving a rejected booking
    // is permitted.
    let booking = sqlx::query_as::<_, Booking>(
        "UPDATE bookings SET status = $1 WHERE id = $2 RETURNING *",
    )
    .bind(&req.status)
    .bind(id)
    .fetch_optional(&state.db.pool)
    .await?
    .ok_or_else(|| ApiError::NotFound("Booking not found".to_string()))?;

    tracing::info!("booking {} status set to {}", id, booking.status);

    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Status updated successfully", "booking": booking })),
    ))
}

// PUT /api/updateSeen/{id}
#[derive(Debug, Deserialize)]
struct UpdateSeenRequest {
    seen: bool,
}

async fn update_seen(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateSeenRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let booking = sqlx::query_as::<_, Booking>(
        "UPDATE bookings SET seen = $1 WHERE id = $2 RETURNING *",
    )
    .bind(req.seen)
    .bind(id)
    .fetch_optional(&state.db.pool)
    .await?
    .ok_or_else(|| ApiError::NotFound("Booking not found".to_string()))?;

    let label = if req.seen { "Seen" } else { "Unseen" };
    Ok((
        StatusCode::OK,
        Json(json!({
            "message": format!("Booking marked as {}", label),
            "booking": booking
        })),
    ))
}

/* ---------- HALL CALENDAR ---------- */

// GET /api/bookingsByHall/{hallName}
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HallBooking {
    hall_name: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    slot: String,
    status: String,
}

async fn bookings_by_hall(
    State(state): State<Arc<AppState>>,
    Path(hall_name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let bookings = Booking::accepted_for_hall(&hall_name, &state.db).await?;

    let payload: Vec<HallBooking> = bookings
        .into_iter()
        .map(|b| HallBooking {
            hall_name: b.hall_name,
            start_date: b.start_date,
            end_date: b.end_date,
            slot: b.slot,
            status: b.status,
        })
        .collect();

    Ok((StatusCode::OK, Json(payload)))
}

// GET /api/availability/{hallName}
//
// The derived calendar the booking form colors its dates from, keyed by
// YYYY-MM-DD.
async fn hall_availability(
    State(state): State<Arc<AppState>>,
    Path(hall_name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let bookings = Booking::accepted_for_hall(&hall_name, &state.db).await?;
    let calendar = availability::derive(&bookings);
    Ok((StatusCode::OK, Json(calendar)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(event: &str, hall: &str, faculty: &str, slot: &str) -> CreateBookingRequest {
        CreateBookingRequest {
            event_name: event.to_string(),
            hall_name: hall.to_string(),
            faculty_name: faculty.to_string(),
            department: None,
            start_date: Some("2024-01-01".parse().unwrap()),
            end_date: None,
            slot: slot.to_string(),
            speaker: None,
            attendees: None,
            collaboration: None,
            description: None,
            user_id: None,
        }
    }

    #[test]
    fn missing_required_fields_are_rejected() {
        let req = request("", "Main Auditorium", "Dr. Rao", "Morning");
        assert!(validate_booking_request(&req).is_err());

        let req = request("Seminar", "Main Auditorium", "Dr. Rao", "  ");
        assert!(validate_booking_request(&req).is_err());

        let mut req = request("Seminar", "Main Auditorium", "Dr. Rao", "Morning");
        req.start_date = None;
        assert!(validate_booking_request(&req).is_err());
    }

    #[test]
    fn end_date_defaults_to_start_date() {
        let req = request("Seminar", "Main Auditorium", "Dr. Rao", "Morning");
        let (start, end) = validate_booking_request(&req).unwrap();
        assert_eq!(start, end);
    }

    #[test]
    fn end_before_start_is_rejected() {
        let mut req = request("Seminar", "Main Auditorium", "Dr. Rao", "Morning");
        req.end_date = Some("2023-12-31".parse().unwrap());
        assert!(validate_booking_request(&req).is_err());
    }

    #[test]
    fn report_sql_covers_all_bound_combinations() {
        let start: NaiveDate = "2024-01-01".parse().unwrap();
        let end: NaiveDate = "2024-02-01".parse().unwrap();

        assert_eq!(
            report_sql(None, None),
            "SELECT * FROM bookings ORDER BY created_at DESC"
        );
        assert_eq!(
            report_sql(Some(start), None),
            "SELECT * FROM bookings WHERE start_date >= $1 ORDER BY created_at DESC"
        );
        assert_eq!(
            report_sql(None, Some(end)),
            "SELECT * FROM bookings WHERE start_date <= $1 ORDER BY created_at DESC"
        );
        assert_eq!(
            report_sql(Some(start), Some(end)),
            "SELECT * FROM bookings WHERE start_date >= $1 AND start_date <= $2 ORDER BY created_at DESC"
        );
    }

    #[test]
    fn create_request_accepts_camel_case_payload() {
        let req: CreateBookingRequest = serde_json::from_str(
            r#"{
                "eventName": "Guest Lecture",
                "hallName": "Main Auditorium",
                "facultyName": "Dr. Rao",
                "startDate": "2024-01-01",
                "endDate": "2024-01-02",
                "slot": "Full Day"
            }"#,
        )
        .unwrap();
        let (start, end) = validate_booking_request(&req).unwrap();
        assert_eq!(start.to_string(), "2024-01-01");
        assert_eq!(end.to_string(), "2024-01-02");
    }
}

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: i64,
    pub event_name: String,
    pub hall_name: String,
    pub faculty_name: String,
    pub department: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub slot: String,
    pub speaker: Option<String>,
    pub attendees: Option<String>,
    pub collaboration: Option<String>,
    pub description: Option<String>,
    pub status: String,
    pub seen: bool,
    pub user_id: Option<i64>,
    pub created_at: NaiveDateTime,
}

impl Booking {
    pub async fn find_all(db: &crate::database::Database) -> Result<Vec<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings ORDER BY created_at DESC")
            .fetch_all(&db.pool)
            .await
    }

    pub async fn find_by_faculty(
        faculty_name: &str,
        db: &crate::database::Database,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE faculty_name = $1 ORDER BY created_at DESC",
        )
        .bind(faculty_name)
        .fetch_all(&db.pool)
        .await
    }

    // Only accepted bookings count against a hall's calendar
    pub async fn accepted_for_hall(
        hall_name: &str,
        db: &crate::database::Database,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE hall_name = $1 AND status = 'Accepted'",
        )
        .bind(hall_name)
        .fetch_all(&db.pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_format_is_camel_case() {
        let booking = Booking {
            id: 7,
            event_name: "Guest Lecture".to_string(),
            hall_name: "Main Auditorium".to_string(),
            faculty_name: "Dr. Rao".to_string(),
            department: Some("CSE".to_string()),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            slot: "Morning".to_string(),
            speaker: None,
            attendees: None,
            collaboration: None,
            description: None,
            status: "Pending".to_string(),
            seen: false,
            user_id: None,
            created_at: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(8, 30, 0)
                .unwrap(),
        };

        let json = serde_json::to_value(&booking).unwrap();
        assert_eq!(json["eventName"], "Guest Lecture");
        assert_eq!(json["hallName"], "Main Auditorium");
        assert_eq!(json["startDate"], "2024-01-01");
        assert_eq!(json["endDate"], "2024-01-02");
        assert_eq!(json["seen"], false);
        assert!(json.get("event_name").is_none());
    }
}

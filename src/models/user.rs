use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub department: String,
    pub role: String,
    pub created_at: NaiveDateTime,
}

impl User {
    pub async fn find_by_email(
        email: &str,
        db: &crate::database::Database,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&db.pool)
            .await
    }

    pub async fn find_all(db: &crate::database::Database) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at DESC")
            .fetch_all(&db.pool)
            .await
    }

    pub fn verify_password(&self, password: &str) -> bool {
        bcrypt::verify(password, &self.password_hash).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user(hash: String) -> User {
        User {
            id: 1,
            username: "asha".to_string(),
            email: "asha@example.edu".to_string(),
            password_hash: hash,
            department: "Physics".to_string(),
            role: "Faculty".to_string(),
            created_at: chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn password_verification_round_trip() {
        // low cost keeps the test fast; runtime signups use DEFAULT_COST
        let hash = bcrypt::hash("s3cret", 4).unwrap();
        let user = sample_user(hash);
        assert!(user.verify_password("s3cret"));
        assert!(!user.verify_password("wrong"));
    }

    #[test]
    fn verify_password_tolerates_garbage_hash() {
        let user = sample_user("not-a-bcrypt-hash".to_string());
        assert!(!user.verify_password("anything"));
    }

    #[test]
    fn serialization_never_leaks_the_hash() {
        let user = sample_user("$2b$10$abcdefghijklmnopqrstuv".to_string());
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "asha");
    }
}

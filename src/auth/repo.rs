use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::error::AuthError;
use crate::auth::password::PasswordHash;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: PasswordHash,
    #[serde(skip_serializing)]
    pub created_at: OffsetDateTime,
}

impl User {
    /// Insert a new user in one durable write. A unique-constraint conflict
    /// on username or email comes back as `AuthError::Duplicate`; the
    /// database serializes concurrent inserts, so two racing registrations
    /// for the same identity cannot both succeed.
    pub async fn insert(
        db: &PgPool,
        username: &str,
        email: &str,
        password_hash: &PasswordHash,
    ) -> Result<User, AuthError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, password_hash, created_at
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password_hash.as_str())
        .fetch_one(db)
        .await
        .map_err(classify_write_error)?;
        Ok(user)
    }

    /// Look up a user by username or email. Emails are stored lowercased, so
    /// the email arm matches case-insensitively; usernames are exact.
    pub async fn find_by_identifier(
        db: &PgPool,
        identifier: &str,
    ) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE username = $1 OR email = LOWER($1)
            "#,
        )
        .bind(identifier)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Re-persist the record. The password hash is written back verbatim, so
    /// saving a user any number of times leaves the stored hash unchanged;
    /// hashing happens only in `CredentialStore::register`, where a plaintext
    /// is actually supplied.
    pub async fn save(&self, db: &PgPool) -> Result<(), AuthError> {
        sqlx::query(
            r#"
            UPDATE users
            SET username = $2, email = $3, password_hash = $4
            WHERE id = $1
            "#,
        )
        .bind(self.id)
        .bind(&self.username)
        .bind(&self.email)
        .bind(self.password_hash.as_str())
        .execute(db)
        .await
        .map_err(classify_write_error)?;
        Ok(())
    }
}

fn classify_write_error(err: sqlx::Error) -> AuthError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.is_unique_violation() {
            return AuthError::Duplicate(duplicate_field(db_err.constraint()));
        }
    }
    AuthError::Storage(err)
}

/// Postgres names the constraints `users_username_key` / `users_email_key`.
fn duplicate_field(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some(c) if c.contains("email") => "email",
        _ => "username",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_field_from_constraint_name() {
        assert_eq!(duplicate_field(Some("users_email_key")), "email");
        assert_eq!(duplicate_field(Some("users_username_key")), "username");
        // no constraint name reported: blame the first unique column
        assert_eq!(duplicate_field(None), "username");
    }

    #[test]
    fn user_serialization_omits_password_hash() {
        let user = User {
            id: Uuid::new_v4(),
            username: "alice".into(),
            email: "a@x.com".into(),
            password_hash: crate::auth::password::hash("secret123").unwrap(),
            created_at: OffsetDateTime::now_utc(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("alice"));
        assert!(!json.contains("password"));
        assert!(!json.contains("argon2"));
    }
}

//! User Repository Implementation
//!
//! PostgreSQL implementation of the UserDirectory trait.
//! Maps between the database schema and domain User entity.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::PgTripRepository;
use crate::domain::{Role, Trip, User, UserDirectory};
use crate::shared::error::AppError;

const USER_SELECT: &str = r#"
    SELECT u.id, u.username, u.email, u.created_at,
           COALESCE(
               ARRAY_AGG(r.role::TEXT) FILTER (WHERE r.role IS NOT NULL),
               ARRAY[]::TEXT[]
           ) AS roles
    FROM users u
    LEFT JOIN user_roles r ON r.user_id = u.id
"#;

/// Database row representation of a user with its aggregated roles.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    email: String,
    created_at: DateTime<Utc>,
    roles: Vec<String>,
}

impl UserRow {
    /// Convert database row to domain User entity.
    fn into_user(self) -> User {
        let mut roles: Vec<Role> = self.roles.iter().map(|r| Role::from_str(r)).collect();
        if roles.is_empty() {
            roles.push(Role::User);
        }

        User {
            id: self.id,
            username: self.username,
            email: self.email,
            roles,
            created_at: self.created_at,
        }
    }
}

/// PostgreSQL user directory implementation.
///
/// Read-only: accounts are provisioned elsewhere.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new PgUserRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PgUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "{} WHERE u.username = $1 GROUP BY u.id",
            USER_SELECT
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_user()))
    }

    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<User>, AppError> {
        // A username match wins over an email match on another account
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "{} WHERE u.username = $1 OR u.email = $2 GROUP BY u.id \
             ORDER BY (u.username = $1) DESC LIMIT 1",
            USER_SELECT
        ))
        .bind(username)
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_user()))
    }

    async fn find_trips_by_user_id(&self, user_id: i64) -> Result<Vec<Trip>, AppError> {
        PgTripRepository::new(self.pool.clone())
            .find_by_member(user_id)
            .await
    }
}

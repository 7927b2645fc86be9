//! Trip Repository Implementation
//!
//! PostgreSQL implementation of the TripStore trait.
//! A trip is stored across `trips`, `destinations` and `trip_members`;
//! every write touching more than one of them runs in a transaction.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgConnection, PgPool};

use super::destination_repository::delete_destination;
use super::notification_repository::insert_notification;
use crate::domain::{Destination, Notification, Page, Trip, TripMember, TripStore};
use crate::shared::error::AppError;

const TRIP_SELECT: &str = r#"
    SELECT t.id, t.name, t.owner, t.begin_date, t.end_date, t.notify_before,
           t.is_public, t.created_at, t.updated_at,
           d.id AS destination_id, d.name AS destination_name
    FROM trips t
    LEFT JOIN destinations d ON d.trip_id = t.id
"#;

const TRIP_ORDER: &str = "ORDER BY t.begin_date, t.id";

/// Database row for a trip joined with its destination.
#[derive(Debug, sqlx::FromRow)]
struct TripRow {
    id: i64,
    name: String,
    owner: String,
    begin_date: NaiveDate,
    end_date: Option<NaiveDate>,
    notify_before: i32,
    is_public: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    destination_id: Option<i64>,
    destination_name: Option<String>,
}

impl TripRow {
    fn into_trip(self, members: Vec<TripMember>) -> Trip {
        let destination = match (self.destination_id, self.destination_name) {
            (Some(id), Some(name)) => Some(Destination { id, name }),
            _ => None,
        };

        Trip {
            id: self.id,
            name: self.name,
            owner: self.owner,
            begin_date: self.begin_date,
            end_date: self.end_date,
            notify_before: self.notify_before,
            is_public: self.is_public,
            destination,
            members,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MemberRow {
    trip_id: i64,
    user_id: i64,
    username: String,
    email: String,
}

/// PostgreSQL trip repository implementation.
#[derive(Clone)]
pub struct PgTripRepository {
    pool: PgPool,
}

impl PgTripRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Attach member sets to trip rows with one query.
    async fn hydrate(&self, rows: Vec<TripRow>) -> Result<Vec<Trip>, AppError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let member_rows = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT tm.trip_id, u.id AS user_id, u.username, u.email
            FROM trip_members tm
            JOIN users u ON u.id = tm.user_id
            WHERE tm.trip_id = ANY($1)
            ORDER BY tm.joined_at, u.id
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut members: HashMap<i64, Vec<TripMember>> = HashMap::new();
        for row in member_rows {
            members.entry(row.trip_id).or_default().push(TripMember {
                user_id: row.user_id,
                username: row.username,
                email: row.email,
            });
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let trip_members = members.remove(&row.id).unwrap_or_default();
                row.into_trip(trip_members)
            })
            .collect())
    }

    async fn load(&self, id: i64) -> Result<Trip, AppError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Trip {} not found", id)))
    }

    async fn page(
        &self,
        filter: &str,
        page_index: i64,
        page_size: i64,
    ) -> Result<Page<Trip>, AppError> {
        let offset = Page::<Trip>::offset(page_index, page_size)
            .ok_or_else(|| AppError::BadRequest("Page is out of range".into()))?;

        let total: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM trips t {}", filter))
                .fetch_one(&self.pool)
                .await?;

        let rows = sqlx::query_as::<_, TripRow>(&format!(
            "{} {} {} LIMIT $1 OFFSET $2",
            TRIP_SELECT, filter, TRIP_ORDER
        ))
        .bind(page_size)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let trips = self.hydrate(rows).await?;
        Ok(Page::from_index(trips, page_index, page_size, total))
    }

    /// All trips `user_id` belongs to, owned or joined.
    pub async fn find_by_member(&self, user_id: i64) -> Result<Vec<Trip>, AppError> {
        let rows = sqlx::query_as::<_, TripRow>(&format!(
            "{} JOIN trip_members m ON m.trip_id = t.id WHERE m.user_id = $1 {}",
            TRIP_SELECT, TRIP_ORDER
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        self.hydrate(rows).await
    }
}

/// Insert or update the trip row, its destination and its member set.
/// Returns the trip id.
async fn write_trip(conn: &mut PgConnection, trip: &Trip) -> Result<i64, AppError> {
    let id = if trip.id == 0 {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO trips (name, owner, begin_date, end_date, notify_before, is_public)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&trip.name)
        .bind(&trip.owner)
        .bind(trip.begin_date)
        .bind(trip.end_date)
        .bind(trip.notify_before)
        .bind(trip.is_public)
        .fetch_one(&mut *conn)
        .await?
    } else {
        let result = sqlx::query(
            r#"
            UPDATE trips
            SET name = $2, begin_date = $3, end_date = $4, notify_before = $5,
                is_public = $6, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(trip.id)
        .bind(&trip.name)
        .bind(trip.begin_date)
        .bind(trip.end_date)
        .bind(trip.notify_before)
        .bind(trip.is_public)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Trip {} not found", trip.id)));
        }
        trip.id
    };

    match &trip.destination {
        Some(destination) => {
            sqlx::query(
                r#"
                INSERT INTO destinations (trip_id, name)
                VALUES ($1, $2)
                ON CONFLICT (trip_id) DO UPDATE SET name = EXCLUDED.name
                "#,
            )
            .bind(id)
            .bind(&destination.name)
            .execute(&mut *conn)
            .await?;
        }
        None => {
            sqlx::query("DELETE FROM destinations WHERE trip_id = $1")
                .bind(id)
                .execute(&mut *conn)
                .await?;
        }
    }

    let member_ids: Vec<i64> = trip.members.iter().map(|m| m.user_id).collect();

    sqlx::query("DELETE FROM trip_members WHERE trip_id = $1 AND NOT (user_id = ANY($2))")
        .bind(id)
        .bind(&member_ids)
        .execute(&mut *conn)
        .await?;

    // Existing rows keep their joined_at
    sqlx::query(
        r#"
        INSERT INTO trip_members (trip_id, user_id)
        SELECT $1, UNNEST($2::BIGINT[])
        ON CONFLICT (trip_id, user_id) DO NOTHING
        "#,
    )
    .bind(id)
    .bind(&member_ids)
    .execute(&mut *conn)
    .await?;

    Ok(id)
}

#[async_trait]
impl TripStore for PgTripRepository {
    async fn save(&self, trip: &Trip) -> Result<Trip, AppError> {
        let mut tx = self.pool.begin().await?;
        let id = write_trip(&mut tx, trip).await?;
        tx.commit().await?;

        self.load(id).await
    }

    async fn save_replacing_destination(
        &self,
        trip: &Trip,
        replaced: &Destination,
    ) -> Result<Trip, AppError> {
        let mut tx = self.pool.begin().await?;
        delete_destination(&mut tx, replaced).await?;
        let id = write_trip(&mut tx, trip).await?;
        tx.commit().await?;

        self.load(id).await
    }

    async fn save_with_notification(
        &self,
        trip: &Trip,
        notification: &Notification,
    ) -> Result<(Trip, Notification), AppError> {
        let mut tx = self.pool.begin().await?;
        let id = write_trip(&mut tx, trip).await?;
        let notification = insert_notification(
            &mut tx,
            &Notification {
                trip_id: id,
                ..notification.clone()
            },
        )
        .await?;
        tx.commit().await?;

        Ok((self.load(id).await?, notification))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Trip>, AppError> {
        let row = sqlx::query_as::<_, TripRow>(&format!("{} WHERE t.id = $1", TRIP_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(self.hydrate(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM trips WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    async fn delete(&self, trip: &Trip) -> Result<(), AppError> {
        // Destination and memberships go with the trip (ON DELETE CASCADE)
        let result = sqlx::query("DELETE FROM trips WHERE id = $1")
            .bind(trip.id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Trip {} not found", trip.id)));
        }

        Ok(())
    }

    async fn find_all(&self, page_index: i64, page_size: i64) -> Result<Page<Trip>, AppError> {
        self.page("WHERE t.is_public", page_index, page_size).await
    }

    async fn find_all_including_admin_only(
        &self,
        page_index: i64,
        page_size: i64,
    ) -> Result<Page<Trip>, AppError> {
        self.page("", page_index, page_size).await
    }

    async fn find_trips_notifying_on(&self, day: NaiveDate) -> Result<Vec<Trip>, AppError> {
        let rows = sqlx::query_as::<_, TripRow>(&format!(
            "{} WHERE $1 BETWEEN t.begin_date - t.notify_before AND t.begin_date {}",
            TRIP_SELECT, TRIP_ORDER
        ))
        .bind(day)
        .fetch_all(&self.pool)
        .await?;

        self.hydrate(rows).await
    }

    async fn search_by_name_pattern(&self, pattern: &str) -> Result<Vec<Trip>, AppError> {
        let rows = sqlx::query_as::<_, TripRow>(&format!(
            "{} WHERE t.is_public AND LOWER(t.name) LIKE $1 {}",
            TRIP_SELECT, TRIP_ORDER
        ))
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        self.hydrate(rows).await
    }
}

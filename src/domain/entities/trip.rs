//! Trip entity, its destination, and the storage traits for both.
//!
//! Maps to the `trips`, `destinations` and `trip_members` tables in the
//! database schema.

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{Notification, User};
use crate::domain::value_objects::Page;
use crate::shared::error::AppError;

/// Where a trip is headed.
///
/// Maps to the `destinations` table:
/// - id: BIGSERIAL PRIMARY KEY
/// - trip_id: BIGINT NOT NULL UNIQUE REFERENCES trips(id) ON DELETE CASCADE
/// - name: VARCHAR(255) NOT NULL
///
/// A destination belongs to exactly one trip and is removed with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    /// 0 until the destination has been stored
    pub id: i64,
    pub name: String,
}

impl Destination {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id != 0
    }
}

/// A user as seen from a trip's membership set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripMember {
    pub user_id: i64,
    pub username: String,
    pub email: String,
}

impl From<&User> for TripMember {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

/// A planned journey owned by one user and shared with its members.
///
/// Maps to the `trips` table:
/// - id: BIGSERIAL PRIMARY KEY
/// - name: VARCHAR(255) NOT NULL
/// - owner: VARCHAR(64) NOT NULL (username of the creator)
/// - begin_date: DATE NOT NULL
/// - end_date: DATE NULL, never before begin_date
/// - notify_before: INTEGER NOT NULL, at least 1
/// - is_public: BOOLEAN NOT NULL DEFAULT TRUE
/// - created_at / updated_at: TIMESTAMPTZ
///
/// Membership lives in the `trip_members` junction table and always
/// includes the owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    /// 0 until the trip has been stored
    pub id: i64,

    pub name: String,

    /// Username of the creator
    pub owner: String,

    pub begin_date: NaiveDate,

    pub end_date: Option<NaiveDate>,

    /// Days before `begin_date` that reminders start
    pub notify_before: i32,

    /// Private trips only show up in admin listings
    pub is_public: bool,

    pub destination: Option<Destination>,

    #[serde(default)]
    pub members: Vec<TripMember>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Trip {
    /// Membership test by exact username.
    pub fn has_member(&self, username: &str) -> bool {
        self.members.iter().any(|m| m.username == username)
    }

    pub fn is_owned_by(&self, username: &str) -> bool {
        self.owner == username
    }

    /// Add a user to the membership set. Returns false if already a member.
    pub fn add_member(&mut self, user: &User) -> bool {
        if self.has_member(&user.username) {
            return false;
        }
        self.members.push(TripMember::from(user));
        true
    }

    /// Remove a user from the membership set. Returns false if not a member.
    pub fn remove_member(&mut self, username: &str) -> bool {
        let before = self.members.len();
        self.members.retain(|m| m.username != username);
        self.members.len() != before
    }

    /// First day on which reminders for this trip go out.
    pub fn reminder_start(&self) -> NaiveDate {
        self.begin_date - Duration::days(i64::from(self.notify_before))
    }

    /// Whether `day` falls inside the reminder window, the trip's start day included.
    pub fn notifies_on(&self, day: NaiveDate) -> bool {
        day >= self.reminder_start() && day <= self.begin_date
    }
}

impl Default for Trip {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            name: String::new(),
            owner: String::new(),
            begin_date: now.date_naive(),
            end_date: None,
            notify_before: 1,
            is_public: true,
            destination: None,
            members: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Repository trait for Trip data access operations.
///
/// `save` persists the trip row, its destination and its full membership
/// set in one transaction and returns the stored trip.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TripStore: Send + Sync {
    /// Insert (id 0) or update a trip.
    async fn save(&self, trip: &Trip) -> Result<Trip, AppError>;

    /// Save a trip whose stored destination `replaced` gives way to a new
    /// one. The old destination is deleted in the same transaction.
    async fn save_replacing_destination(
        &self,
        trip: &Trip,
        replaced: &Destination,
    ) -> Result<Trip, AppError>;

    /// Save a trip and insert a notification in the same transaction.
    async fn save_with_notification(
        &self,
        trip: &Trip,
        notification: &Notification,
    ) -> Result<(Trip, Notification), AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Trip>, AppError>;

    async fn exists_by_id(&self, id: i64) -> Result<bool, AppError>;

    /// Delete a trip together with its destination and memberships.
    async fn delete(&self, trip: &Trip) -> Result<(), AppError>;

    /// Public trips, 0-indexed page.
    async fn find_all(&self, page_index: i64, page_size: i64) -> Result<Page<Trip>, AppError>;

    /// Every trip including private ones, 0-indexed page.
    async fn find_all_including_admin_only(
        &self,
        page_index: i64,
        page_size: i64,
    ) -> Result<Page<Trip>, AppError>;

    /// Trips whose reminder window contains `day`.
    async fn find_trips_notifying_on(&self, day: NaiveDate) -> Result<Vec<Trip>, AppError>;

    /// Public trips whose lowercased name matches a SQL LIKE pattern.
    /// Private trips never match.
    async fn search_by_name_pattern(&self, pattern: &str) -> Result<Vec<Trip>, AppError>;
}

//! Trip Service
//!
//! Handles trip creation, update, deletion, search, trip-mate invitation
//! and removal, and reminder dispatch.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use crate::domain::{
    Destination, MailKind, Mailer, Notification, NotificationStore,
    NotificationType, Page, Principal, Trip, TripMember, TripStore, User, UserDirectory,
};
use crate::infrastructure::metrics;
use crate::shared::error::AppError;

/// Largest page size a listing will ask the store for.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Trip service trait defining the trip workflow.
#[async_trait]
pub trait TripService: Send + Sync {
    /// Resolve the authenticated principal to a stored user.
    async fn current_user(&self, principal: &Principal) -> Result<User, TripError>;

    /// Resolve the principal and require the ADMIN role.
    async fn require_admin(&self, principal: &Principal) -> Result<User, TripError>;

    /// Create a trip owned by the caller.
    async fn create_trip(
        &self,
        principal: &Principal,
        request: Option<TripRequest>,
    ) -> Result<Trip, TripError>;

    /// Public trips, 1-indexed page.
    async fn list_trips(&self, page: i64, page_size: i64) -> Result<Page<Trip>, TripError>;

    /// Every trip including private ones. Admin only.
    async fn list_trips_admin(
        &self,
        principal: &Principal,
        page: i64,
        page_size: i64,
    ) -> Result<Page<Trip>, TripError>;

    /// Delete a trip the caller belongs to, or any trip for admins.
    async fn delete_trip(
        &self,
        principal: &Principal,
        trip_id: Option<i64>,
    ) -> Result<TripDeletion, TripError>;

    /// Replace a trip's fields. Members only, no admin bypass.
    async fn update_trip(
        &self,
        principal: &Principal,
        trip_id: i64,
        request: Option<TripRequest>,
    ) -> Result<Trip, TripError>;

    async fn get_trip(&self, trip_id: i64) -> Result<Trip, TripError>;

    async fn trip_exists(&self, trip_id: i64) -> Result<bool, TripError>;

    /// Trips whose reminder window contains today.
    async fn trips_notifying_today(&self) -> Result<Vec<Trip>, TripError>;

    /// Add a user to a trip, record the invitation and mail the invitee.
    async fn invite_trip_mate(
        &self,
        principal: &Principal,
        trip_id: i64,
        username_or_email: &str,
    ) -> Result<Invitation, TripError>;

    /// Remove a non-owner member from a trip.
    async fn remove_trip_mate(
        &self,
        principal: &Principal,
        trip_id: i64,
        username: &str,
    ) -> Result<Trip, TripError>;

    /// Case-insensitive substring search over public trip names.
    async fn search(&self, keyword: Option<&str>) -> Result<Vec<Trip>, TripError>;

    /// Mail every member of every trip notifying today.
    async fn send_trip_reminders(&self) -> Result<ReminderReport, TripError>;
}

/// Input for creating or updating a trip.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRequest {
    pub name: Option<String>,
    pub destination: Option<String>,
    pub begin_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub notify_before: i32,
    pub is_public: bool,
}

impl Default for TripRequest {
    fn default() -> Self {
        Self {
            name: None,
            destination: None,
            begin_date: None,
            end_date: None,
            notify_before: 1,
            is_public: true,
        }
    }
}

/// A request that passed validation.
#[derive(Debug)]
struct TripFields {
    name: String,
    destination: String,
    begin_date: NaiveDate,
    end_date: Option<NaiveDate>,
    notify_before: i32,
    is_public: bool,
}

impl TripFields {
    fn apply_to(self, trip: &mut Trip) {
        trip.name = self.name;
        trip.destination = Some(Destination::new(self.destination));
        trip.begin_date = self.begin_date;
        trip.end_date = self.end_date;
        trip.notify_before = self.notify_before;
        trip.is_public = self.is_public;
        trip.updated_at = Utc::now();
    }
}

/// Check the fields shared by create and update.
fn validate_trip_request(request: Option<TripRequest>) -> Result<TripFields, TripError> {
    let request =
        request.ok_or_else(|| TripError::Validation("Trip information is required".into()))?;

    let name = request
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .ok_or_else(|| TripError::Validation("Trip's name is required".into()))?;

    let destination = request
        .destination
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
        .ok_or_else(|| TripError::Validation("Trip's destination is required".into()))?;

    let begin_date = request
        .begin_date
        .ok_or_else(|| TripError::Validation("Trip's start day is required".into()))?;

    if request.end_date.is_some_and(|end| end < begin_date) {
        return Err(TripError::Validation(
            "Trip's end date must not be before trip's start day".into(),
        ));
    }

    if request.notify_before < 1 {
        return Err(TripError::Validation(
            "Trip should be announced at least 1 day earlier than its starting".into(),
        ));
    }

    Ok(TripFields {
        name,
        destination,
        begin_date,
        end_date: request.end_date,
        notify_before: request.notify_before,
        is_public: request.is_public,
    })
}

/// Check 1-indexed paging input and convert it to the store's 0-indexed page.
fn store_page(page: i64, page_size: i64) -> Result<(i64, i64), TripError> {
    if page < 1 {
        return Err(TripError::Validation("Page must be at least 1".into()));
    }
    if page_size < 1 {
        return Err(TripError::Validation("Page size must be at least 1".into()));
    }
    let page_index = page - 1;
    let page_size = page_size.min(MAX_PAGE_SIZE);
    if Page::<Trip>::offset(page_index, page_size).is_none() {
        return Err(TripError::Validation("Page is out of range".into()));
    }
    Ok((page_index, page_size))
}

/// Outcome of an authorized delete.
#[derive(Debug, Clone, PartialEq)]
pub enum TripDeletion {
    Deleted(Trip),
    /// The store refused the delete; the trip may still exist.
    Failed { trip: Trip, reason: String },
}

impl TripDeletion {
    pub fn trip(&self) -> &Trip {
        match self {
            TripDeletion::Deleted(trip) | TripDeletion::Failed { trip, .. } => trip,
        }
    }

    pub fn is_deleted(&self) -> bool {
        matches!(self, TripDeletion::Deleted(_))
    }
}

/// Result of a successful invitation.
#[derive(Debug, Clone, PartialEq)]
pub struct Invitation {
    pub trip: Trip,
    pub notification: Notification,
    /// False when the membership was stored but the mail did not go out.
    pub mail_delivered: bool,
}

/// Counters from one reminder run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReminderReport {
    pub trips: usize,
    pub sent: usize,
    pub failed: usize,
}

/// Trip service errors.
#[derive(Debug, thiserror::Error)]
pub enum TripError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl TripError {
    fn label(&self) -> &'static str {
        match self {
            TripError::Validation(_) => "validation",
            TripError::Unauthenticated(_) => "unauthenticated",
            TripError::Forbidden(_) => "forbidden",
            TripError::NotFound(_) => "not_found",
            TripError::Internal(_) => "error",
        }
    }
}

impl From<TripError> for AppError {
    fn from(err: TripError) -> Self {
        match err {
            TripError::Validation(msg) => AppError::Validation(msg),
            TripError::Unauthenticated(msg) => AppError::Unauthorized(msg),
            TripError::Forbidden(msg) => AppError::Forbidden(msg),
            TripError::NotFound(msg) => AppError::NotFound(msg),
            TripError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

fn internal(err: AppError) -> TripError {
    TripError::Internal(err.to_string())
}

fn trip_not_found(trip_id: i64) -> TripError {
    TripError::NotFound(format!("Trip with ID \"{}\" doesn't exist", trip_id))
}

fn observe<T>(operation: &str, result: Result<T, TripError>) -> Result<T, TripError> {
    let outcome = match &result {
        Ok(_) => "ok",
        Err(e) => e.label(),
    };
    metrics::record_trip_operation(operation, outcome);
    result
}

/// Implementation of TripService.
pub struct TripServiceImpl<U, T, N, M>
where
    U: UserDirectory,
    T: TripStore,
    N: NotificationStore,
    M: Mailer,
{
    users: Arc<U>,
    trips: Arc<T>,
    notifications: Arc<N>,
    mailer: Arc<M>,
    frontend_url: String,
}

impl<U, T, N, M> TripServiceImpl<U, T, N, M>
where
    U: UserDirectory + 'static,
    T: TripStore + 'static,
    N: NotificationStore + 'static,
    M: Mailer + 'static,
{
    pub fn new(
        users: Arc<U>,
        trips: Arc<T>,
            notifications: Arc<N>,
        mailer: Arc<M>,
        frontend_url: impl Into<String>,
    ) -> Self {
        Self {
            users,
            trips,
            notifications,
            mailer,
            frontend_url: frontend_url.into(),
        }
    }

    /// The trip with `trip_id` among the trips `user` belongs to.
    async fn member_trip(
        &self,
        user: &User,
        trip_id: i64,
        denied: &str,
    ) -> Result<Trip, TripError> {
        self.users
            .find_trips_by_user_id(user.id)
            .await
            .map_err(internal)?
            .into_iter()
            .find(|t| t.id == trip_id)
            .ok_or_else(|| TripError::Forbidden(denied.to_string()))
    }

    async fn find_trip(&self, trip_id: i64) -> Result<Trip, TripError> {
        self.trips
            .find_by_id(trip_id)
            .await
            .map_err(internal)?
            .ok_or_else(|| trip_not_found(trip_id))
    }

    async fn resolve_user(&self, username_or_email: &str) -> Result<User, TripError> {
        self.users
            .find_by_username_or_email(username_or_email, username_or_email)
            .await
            .map_err(internal)?
            .ok_or_else(|| {
                TripError::Validation(format!(
                    "User with username or email \"{}\" doesn't exist",
                    username_or_email
                ))
            })
    }

    /// Render and send one mail. Failures are logged and counted, never raised.
    async fn deliver(&self, kind: MailKind<'_>) -> bool {
        let content = kind.render(&self.frontend_url);
        match self.mailer.send(&content).await {
            Ok(()) => {
                metrics::record_mail_delivery(kind.label(), true);
                true
            }
            Err(e) => {
                tracing::warn!(kind = kind.label(), to = %content.to, error = %e, "Mail delivery failed");
                metrics::record_mail_delivery(kind.label(), false);
                false
            }
        }
    }

    async fn insert_trip(
        &self,
        principal: &Principal,
        request: Option<TripRequest>,
    ) -> Result<Trip, TripError> {
        if request.is_none() {
            return Err(TripError::Validation("Trip information is required".into()));
        }
        let user = self.current_user(principal).await?;
        let fields = validate_trip_request(request)?;

        let mut trip = Trip {
            owner: user.username.clone(),
            ..Trip::default()
        };
        fields.apply_to(&mut trip);
        trip.add_member(&user);

        let saved = self.trips.save(&trip).await.map_err(internal)?;
        tracing::info!(trip_id = saved.id, owner = %saved.owner, "Trip created");
        Ok(saved)
    }

    async fn remove_trip(
        &self,
        principal: &Principal,
        trip_id: Option<i64>,
    ) -> Result<TripDeletion, TripError> {
        let trip_id =
            trip_id.ok_or_else(|| TripError::Validation("Removed trip's ID is required".into()))?;
        let user = self.current_user(principal).await?;

        let trip = if user.is_admin() {
            self.find_trip(trip_id).await?
        } else {
            self.member_trip(&user, trip_id, "You have no permission to delete this trip")
                .await?
        };

        match self.trips.delete(&trip).await {
            Ok(()) => {
                tracing::info!(trip_id, by = %user.username, "Trip deleted");
                Ok(TripDeletion::Deleted(trip))
            }
            Err(e) => {
                tracing::error!(trip_id, error = %e, "Failed to delete trip");
                Ok(TripDeletion::Failed {
                    trip,
                    reason: e.to_string(),
                })
            }
        }
    }

    async fn modify_trip(
        &self,
        principal: &Principal,
        trip_id: i64,
        request: Option<TripRequest>,
    ) -> Result<Trip, TripError> {
        let user = self.current_user(principal).await?;
        let mut trip = self
            .member_trip(&user, trip_id, "You have no permission to update this trip")
            .await?;
        let fields = validate_trip_request(request)?;

        let replaced = trip.destination.take().filter(Destination::is_persisted);
        fields.apply_to(&mut trip);

        let saved = match replaced {
            Some(old) => self.trips.save_replacing_destination(&trip, &old).await,
            None => self.trips.save(&trip).await,
        };
        saved.map_err(internal)
    }

    async fn add_trip_mate(
        &self,
        principal: &Principal,
        trip_id: i64,
        username_or_email: &str,
    ) -> Result<Invitation, TripError> {
        let user = self.current_user(principal).await?;
        self.member_trip(
            &user,
            trip_id,
            "You have no permission to invite trip mate for this trip",
        )
        .await?;
        let mut trip = self.find_trip(trip_id).await?;
        let invitee = self.resolve_user(username_or_email).await?;

        if trip.is_owned_by(&invitee.username) {
            return Err(TripError::Validation(format!(
                "{} is this trip's owner",
                username_or_email
            )));
        }
        if !trip.add_member(&invitee) {
            return Err(TripError::Validation(format!(
                "{} was invited to join this trip before",
                username_or_email
            )));
        }

        let notification = Notification::new(NotificationType::Invitation, trip.id, invitee.id);
        let (trip, notification) = self
            .trips
            .save_with_notification(&trip, &notification)
            .await
            .map_err(internal)?;

        let recipient = TripMember::from(&invitee);
        let mail_delivered = self
            .deliver(MailKind::TripInvitation {
                trip: &trip,
                recipient: &recipient,
                inviter: &user.username,
            })
            .await;

        tracing::info!(
            trip_id,
            invitee = %invitee.username,
            mail_delivered,
            "Trip mate invited"
        );

        Ok(Invitation {
            trip,
            notification,
            mail_delivered,
        })
    }

    async fn drop_trip_mate(
        &self,
        principal: &Principal,
        trip_id: i64,
        username: &str,
    ) -> Result<Trip, TripError> {
        let user = self.current_user(principal).await?;
        self.member_trip(
            &user,
            trip_id,
            "You have no permission to invite trip mate for this trip",
        )
        .await?;
        let mut trip = self.find_trip(trip_id).await?;
        let mate = self.resolve_user(username).await?;

        if trip.is_owned_by(&mate.username) {
            return Err(TripError::Validation(format!(
                "{} is this trip's owner",
                username
            )));
        }
        if !trip.remove_member(&mate.username) {
            return Err(TripError::Validation(format!(
                "{} was not invited to join this trip before",
                username
            )));
        }

        self.trips.save(&trip).await.map_err(internal)
    }

    async fn dispatch_reminders(&self) -> Result<ReminderReport, TripError> {
        let trips = self.trips_notifying_today().await?;
        let mut report = ReminderReport {
            trips: trips.len(),
            ..ReminderReport::default()
        };

        for trip in &trips {
            for member in &trip.members {
                let notification =
                    Notification::new(NotificationType::Reminder, trip.id, member.user_id);
                self.notifications
                    .save(&notification)
                    .await
                    .map_err(internal)?;

                let delivered = self
                    .deliver(MailKind::TripReminder {
                        trip,
                        recipient: member,
                    })
                    .await;
                if delivered {
                    report.sent += 1;
                } else {
                    report.failed += 1;
                }
            }
        }

        tracing::info!(
            trips = report.trips,
            sent = report.sent,
            failed = report.failed,
            "Trip reminders dispatched"
        );
        Ok(report)
    }
}

#[async_trait]
impl<U, T, N, M> TripService for TripServiceImpl<U, T, N, M>
where
    U: UserDirectory + 'static,
    T: TripStore + 'static,
    N: NotificationStore + 'static,
    M: Mailer + 'static,
{
    async fn current_user(&self, principal: &Principal) -> Result<User, TripError> {
        self.users
            .find_by_username(&principal.username)
            .await
            .map_err(internal)?
            .ok_or_else(|| TripError::Unauthenticated("Unauthorized user".into()))
    }

    async fn require_admin(&self, principal: &Principal) -> Result<User, TripError> {
        let user = self.current_user(principal).await?;
        if !user.is_admin() {
            return Err(TripError::Forbidden("Admin role is required".into()));
        }
        Ok(user)
    }

    async fn create_trip(
        &self,
        principal: &Principal,
        request: Option<TripRequest>,
    ) -> Result<Trip, TripError> {
        observe("create", self.insert_trip(principal, request).await)
    }

    async fn list_trips(&self, page: i64, page_size: i64) -> Result<Page<Trip>, TripError> {
        let (index, size) = store_page(page, page_size)?;
        self.trips.find_all(index, size).await.map_err(internal)
    }

    async fn list_trips_admin(
        &self,
        principal: &Principal,
        page: i64,
        page_size: i64,
    ) -> Result<Page<Trip>, TripError> {
        self.require_admin(principal).await?;
        let (index, size) = store_page(page, page_size)?;
        self.trips
            .find_all_including_admin_only(index, size)
            .await
            .map_err(internal)
    }

    async fn delete_trip(
        &self,
        principal: &Principal,
        trip_id: Option<i64>,
    ) -> Result<TripDeletion, TripError> {
        let result = self.remove_trip(principal, trip_id).await;
        if let Ok(TripDeletion::Failed { .. }) = &result {
            metrics::record_trip_operation("delete", "store_failure");
            return result;
        }
        observe("delete", result)
    }

    async fn update_trip(
        &self,
        principal: &Principal,
        trip_id: i64,
        request: Option<TripRequest>,
    ) -> Result<Trip, TripError> {
        observe("update", self.modify_trip(principal, trip_id, request).await)
    }

    async fn get_trip(&self, trip_id: i64) -> Result<Trip, TripError> {
        self.find_trip(trip_id).await
    }

    async fn trip_exists(&self, trip_id: i64) -> Result<bool, TripError> {
        self.trips.exists_by_id(trip_id).await.map_err(internal)
    }

    async fn trips_notifying_today(&self) -> Result<Vec<Trip>, TripError> {
        let today = Utc::now().date_naive();
        self.trips
            .find_trips_notifying_on(today)
            .await
            .map_err(internal)
    }

    async fn invite_trip_mate(
        &self,
        principal: &Principal,
        trip_id: i64,
        username_or_email: &str,
    ) -> Result<Invitation, TripError> {
        observe(
            "invite",
            self.add_trip_mate(principal, trip_id, username_or_email).await,
        )
    }

    async fn remove_trip_mate(
        &self,
        principal: &Principal,
        trip_id: i64,
        username: &str,
    ) -> Result<Trip, TripError> {
        observe(
            "remove_mate",
            self.drop_trip_mate(principal, trip_id, username).await,
        )
    }

    async fn search(&self, keyword: Option<&str>) -> Result<Vec<Trip>, TripError> {
        let keyword = match keyword {
            None | Some("") => return Ok(Vec::new()),
            Some(k) => k,
        };
        let pattern = format!("%{}%", keyword.to_lowercase());
        self.trips
            .search_by_name_pattern(&pattern)
            .await
            .map_err(internal)
    }

    async fn send_trip_reminders(&self) -> Result<ReminderReport, TripError> {
        observe("reminders", self.dispatch_reminders().await)
    }
}

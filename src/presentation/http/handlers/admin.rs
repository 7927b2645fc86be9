//! Admin Handlers
//!
//! Routes restricted to users holding the ADMIN role.

use axum::{
    extract::{Extension, Query, State},
    Json,
};

use crate::application::dto::request::ListQuery;
use crate::application::dto::response::{PageResponse, ReminderReportResponse, TripResponse};
use crate::domain::Principal;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// List every trip, private ones included
pub async fn list_all_trips(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<ListQuery>,
) -> Result<Json<PageResponse<TripResponse>>, AppError> {
    let page = state
        .trips
        .list_trips_admin(&principal, query.page, query.size)
        .await?;

    Ok(Json(PageResponse::from(page)))
}

/// Trips whose reminder window contains today
pub async fn trips_notifying_today(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Vec<TripResponse>>, AppError> {
    state.trips.require_admin(&principal).await?;

    let trips = state.trips.trips_notifying_today().await?;

    Ok(Json(trips.into_iter().map(TripResponse::from).collect()))
}

/// Send today's reminder mails
pub async fn send_reminders(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<ReminderReportResponse>, AppError> {
    let admin = state.trips.require_admin(&principal).await?;
    tracing::info!(by = %admin.username, "Reminder run requested");

    let report = state.trips.send_trip_reminders().await?;

    Ok(Json(ReminderReportResponse::from(report)))
}

//! Trip Handlers

use axum::{
    body::Bytes,
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::application::dto::request::{InviteBody, ListQuery, SearchQuery, TripBody};
use crate::application::dto::response::{
    DeleteTripResponse, ExistsResponse, InvitationResponse, PageResponse, TripResponse,
};
use crate::application::services::TripRequest;
use crate::domain::Principal;
use crate::shared::error::AppError;
use crate::shared::validation::validation_error;
use crate::startup::AppState;

/// Parse a trip id path segment.
pub(super) fn parse_trip_id(raw: &str) -> Result<i64, AppError> {
    raw.parse()
        .map_err(|_| AppError::BadRequest("Invalid trip ID".into()))
}

/// Read an optional trip body. An empty body or JSON `null` means no request.
fn parse_trip_body(body: &Bytes) -> Result<Option<TripRequest>, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    let body: Option<TripBody> = serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("Invalid request body: {}", e)))?;

    match body {
        Some(body) => {
            body.validate().map_err(validation_error)?;
            Ok(Some(body.into()))
        }
        None => Ok(None),
    }
}

/// Create a new trip owned by the caller
pub async fn create_trip(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    body: Bytes,
) -> Result<(StatusCode, Json<TripResponse>), AppError> {
    let request = parse_trip_body(&body)?;

    let trip = state.trips.create_trip(&principal, request).await?;

    Ok((StatusCode::CREATED, Json(TripResponse::from(trip))))
}

/// List public trips
pub async fn list_trips(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<PageResponse<TripResponse>>, AppError> {
    let page = state.trips.list_trips(query.page, query.size).await?;

    Ok(Json(PageResponse::from(page)))
}

/// Search public trips by name
pub async fn search_trips(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<TripResponse>>, AppError> {
    let trips = state.trips.search(query.keyword.as_deref()).await?;

    Ok(Json(trips.into_iter().map(TripResponse::from).collect()))
}

/// Get trip by ID
pub async fn get_trip(
    State(state): State<AppState>,
    Path(trip_id): Path<String>,
) -> Result<Json<TripResponse>, AppError> {
    let trip_id = parse_trip_id(&trip_id)?;

    let trip = state.trips.get_trip(trip_id).await?;

    Ok(Json(TripResponse::from(trip)))
}

/// Check whether a trip exists
pub async fn trip_exists(
    State(state): State<AppState>,
    Path(trip_id): Path<String>,
) -> Result<Json<ExistsResponse>, AppError> {
    let trip_id = parse_trip_id(&trip_id)?;

    let exists = state.trips.trip_exists(trip_id).await?;

    Ok(Json(ExistsResponse { exists }))
}

/// Update a trip the caller belongs to
pub async fn update_trip(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(trip_id): Path<String>,
    body: Bytes,
) -> Result<Json<TripResponse>, AppError> {
    let trip_id = parse_trip_id(&trip_id)?;
    let request = parse_trip_body(&body)?;

    let trip = state.trips.update_trip(&principal, trip_id, request).await?;

    Ok(Json(TripResponse::from(trip)))
}

/// Delete a trip. Responds 500 with the targeted trip if the store refused.
pub async fn delete_trip(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(trip_id): Path<String>,
) -> Result<(StatusCode, Json<DeleteTripResponse>), AppError> {
    let trip_id = parse_trip_id(&trip_id)?;

    let deletion = state.trips.delete_trip(&principal, Some(trip_id)).await?;

    let status = if deletion.is_deleted() {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    Ok((status, Json(DeleteTripResponse::from(deletion))))
}

/// Invite a user to a trip by username or email
pub async fn invite_trip_mate(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(trip_id): Path<String>,
    Json(body): Json<InviteBody>,
) -> Result<(StatusCode, Json<InvitationResponse>), AppError> {
    let trip_id = parse_trip_id(&trip_id)?;
    body.validate().map_err(validation_error)?;

    let invitation = state
        .trips
        .invite_trip_mate(&principal, trip_id, body.username_or_email.trim())
        .await?;

    Ok((StatusCode::CREATED, Json(InvitationResponse::from(invitation))))
}

/// Remove a trip mate
pub async fn remove_trip_mate(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((trip_id, username)): Path<(String, String)>,
) -> Result<Json<TripResponse>, AppError> {
    let trip_id = parse_trip_id(&trip_id)?;

    let trip = state
        .trips
        .remove_trip_mate(&principal, trip_id, &username)
        .await?;

    Ok(Json(TripResponse::from(trip)))
}

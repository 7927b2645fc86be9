//! Request DTOs
//!
//! Data structures for API request bodies and query strings.

use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::application::services::TripRequest;

fn default_notify_before() -> i32 {
    1
}

fn default_true() -> bool {
    true
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    10
}

/// Create or update trip request.
///
/// Presence of name, destination and begin date is checked by the trip
/// service so that missing and blank fields report the same message.
#[derive(Debug, Deserialize, Validate)]
pub struct TripBody {
    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 255, message = "Destination must be at most 255 characters"))]
    pub destination: Option<String>,

    pub begin_date: Option<NaiveDate>,

    pub end_date: Option<NaiveDate>,

    #[serde(default = "default_notify_before")]
    #[validate(range(max = 365, message = "Notify before must be at most 365 days"))]
    pub notify_before: i32,

    #[serde(default = "default_true")]
    pub is_public: bool,
}

impl From<TripBody> for TripRequest {
    fn from(body: TripBody) -> Self {
        Self {
            name: body.name,
            destination: body.destination,
            begin_date: body.begin_date,
            end_date: body.end_date,
            notify_before: body.notify_before,
            is_public: body.is_public,
        }
    }
}

/// Invite trip mate request
#[derive(Debug, Deserialize, Validate)]
pub struct InviteBody {
    #[validate(length(min = 1, max = 255, message = "Username or email must be 1-255 characters"))]
    pub username_or_email: String,
}

/// Paging query parameters (1-indexed page)
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_page")]
    pub page: i64,

    #[serde(default = "default_page_size")]
    pub size: i64,
}

/// Trip search query parameters
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub keyword: Option<String>,
}

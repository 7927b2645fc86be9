//! Response DTOs
//!
//! Data structures for API response bodies.

use chrono::NaiveDate;
use serde::Serialize;

use crate::application::services::{Invitation, ReminderReport, TripDeletion};
use crate::domain::{Page, Trip, TripMember};

/// Trip member as shown to clients (no email)
#[derive(Debug, Serialize)]
pub struct TripMateResponse {
    pub id: i64,
    pub username: String,
}

impl From<TripMember> for TripMateResponse {
    fn from(member: TripMember) -> Self {
        Self {
            id: member.user_id,
            username: member.username,
        }
    }
}

/// Trip response
#[derive(Debug, Serialize)]
pub struct TripResponse {
    pub id: i64,
    pub name: String,
    pub owner: String,
    pub destination: Option<String>,
    pub begin_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub notify_before: i32,
    pub is_public: bool,
    pub members: Vec<TripMateResponse>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Trip> for TripResponse {
    fn from(trip: Trip) -> Self {
        Self {
            id: trip.id,
            name: trip.name,
            owner: trip.owner,
            destination: trip.destination.map(|d| d.name),
            begin_date: trip.begin_date,
            end_date: trip.end_date,
            notify_before: trip.notify_before,
            is_public: trip.is_public,
            members: trip.members.into_iter().map(TripMateResponse::from).collect(),
            created_at: trip.created_at.to_rfc3339(),
            updated_at: trip.updated_at.to_rfc3339(),
        }
    }
}

/// Paged listing response
#[derive(Debug, Serialize)]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub page_size: i64,
    pub total_items: i64,
    pub total_pages: i64,
    pub has_next: bool,
}

impl From<Page<Trip>> for PageResponse<TripResponse> {
    fn from(page: Page<Trip>) -> Self {
        let has_next = page.has_next();
        let page = page.map(TripResponse::from);
        Self {
            items: page.items,
            page: page.page,
            page_size: page.page_size,
            total_items: page.total_items,
            total_pages: page.total_pages,
            has_next,
        }
    }
}

/// Delete trip response. `deleted` is false when the store refused the delete.
#[derive(Debug, Serialize)]
pub struct DeleteTripResponse {
    pub deleted: bool,
    pub trip: TripResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<TripDeletion> for DeleteTripResponse {
    fn from(deletion: TripDeletion) -> Self {
        match deletion {
            TripDeletion::Deleted(trip) => Self {
                deleted: true,
                trip: trip.into(),
                reason: None,
            },
            TripDeletion::Failed { trip, reason } => Self {
                deleted: false,
                trip: trip.into(),
                reason: Some(reason),
            },
        }
    }
}

/// Invitation response
#[derive(Debug, Serialize)]
pub struct InvitationResponse {
    pub trip: TripResponse,
    pub notification_id: i64,
    pub mail_delivered: bool,
}

impl From<Invitation> for InvitationResponse {
    fn from(invitation: Invitation) -> Self {
        Self {
            trip: invitation.trip.into(),
            notification_id: invitation.notification.id,
            mail_delivered: invitation.mail_delivered,
        }
    }
}

/// Trip existence response
#[derive(Debug, Serialize)]
pub struct ExistsResponse {
    pub exists: bool,
}

/// Reminder run summary
#[derive(Debug, Serialize)]
pub struct ReminderReportResponse {
    pub trips: usize,
    pub sent: usize,
    pub failed: usize,
}

impl From<ReminderReport> for ReminderReportResponse {
    fn from(report: ReminderReport) -> Self {
        Self {
            trips: report.trips,
            sent: report.sent,
            failed: report.failed,
        }
    }
}

//! Application Services
//!
//! Business logic services that coordinate domain operations.
//!
//! ## Available Services
//!
//! - **TripService**: Trip lifecycle, trip-mate membership, search and reminders

pub mod trip_service;

pub use trip_service::{
    Invitation, ReminderReport, TripDeletion, TripError, TripRequest, TripService,
    TripServiceImpl, MAX_PAGE_SIZE,
};

//! Mail content construction and the mailer trait.
//!
//! Every mail the server sends is one [`MailKind`]. Rendering is a pure
//! function from the kind and the frontend base URL to a [`MailContent`];
//! delivery is left to a [`Mailer`] implementation.

use async_trait::async_trait;

use crate::domain::{Trip, TripMember};

/// A rendered mail ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailContent {
    /// Recipient address
    pub to: String,
    pub subject: String,
    /// HTML body
    pub body: String,
}

/// The mails this server knows how to write.
#[derive(Debug, Clone, Copy)]
pub enum MailKind<'a> {
    /// `inviter` added `recipient` to `trip`.
    TripInvitation {
        trip: &'a Trip,
        recipient: &'a TripMember,
        inviter: &'a str,
    },
    /// `trip` starts soon and `recipient` is a member.
    TripReminder {
        trip: &'a Trip,
        recipient: &'a TripMember,
    },
}

impl MailKind<'_> {
    /// Label used in logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            MailKind::TripInvitation { .. } => "trip_invitation",
            MailKind::TripReminder { .. } => "trip_reminder",
        }
    }

    /// Render subject and body. `frontend_url` is the web app's base URL.
    pub fn render(&self, frontend_url: &str) -> MailContent {
        match *self {
            MailKind::TripInvitation {
                trip,
                recipient,
                inviter,
            } => {
                let link = trip_link(frontend_url, trip.id);
                MailContent {
                    to: recipient.email.clone(),
                    subject: format!("{} invited you to join \"{}\"", inviter, trip.name),
                    body: format!(
                        "<p>Hi {recipient},</p>\
                         <p>{inviter} added you to the trip <strong>{name}</strong>{destination}, \
                         starting on {begin}.</p>\
                         <p><a href=\"{link}\">Open the trip</a></p>",
                        recipient = escape_html(&recipient.username),
                        inviter = escape_html(inviter),
                        name = escape_html(&trip.name),
                        destination = destination_clause(trip),
                        begin = trip.begin_date.format("%Y-%m-%d"),
                        link = link,
                    ),
                }
            }
            MailKind::TripReminder { trip, recipient } => {
                let link = trip_link(frontend_url, trip.id);
                MailContent {
                    to: recipient.email.clone(),
                    subject: format!("Reminder: \"{}\" starts on {}", trip.name, trip.begin_date),
                    body: format!(
                        "<p>Hi {recipient},</p>\
                         <p>Your trip <strong>{name}</strong>{destination} starts on {begin}.</p>\
                         <p><a href=\"{link}\">Review your plans</a></p>",
                        recipient = escape_html(&recipient.username),
                        name = escape_html(&trip.name),
                        destination = destination_clause(trip),
                        begin = trip.begin_date.format("%Y-%m-%d"),
                        link = link,
                    ),
                }
            }
        }
    }
}

fn trip_link(frontend_url: &str, trip_id: i64) -> String {
    format!("{}/trips/{}", frontend_url.trim_end_matches('/'), trip_id)
}

fn destination_clause(trip: &Trip) -> String {
    trip.destination
        .as_ref()
        .map(|d| format!(" to {}", escape_html(&d.name)))
        .unwrap_or_default()
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Mail delivery errors.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Mail transport failed: {0}")]
    Transport(String),

    #[error("Mail relay rejected the message with status {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("Mail configuration error: {0}")]
    Configuration(String),
}

/// Delivers rendered mails.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: &MailContent) -> Result<(), MailError>;
}

//! # Domain Entities
//!
//! Core domain entities representing the main business objects of the trip
//! diary. All entities map directly to their corresponding database tables.
//!
//! ## Entities
//!
//! - **User**: Account read from the user directory, with its roles
//! - **Trip**: A planned journey with an owned destination and a member set
//! - **Notification**: Append-only record of an invitation or reminder
//!
//! ## Repository Traits
//!
//! Each entity has an associated storage trait defining data access
//! operations. These traits are implemented in the infrastructure layer,
//! following the dependency inversion principle.

mod notification;
mod trip;
mod user;

pub use user::{Role, User, UserDirectory};

pub use trip::{Destination, Trip, TripMember, TripStore};

pub use notification::{Notification, NotificationStore, NotificationType};

#[cfg(test)]
pub use notification::MockNotificationStore;
#[cfg(test)]
pub use trip::MockTripStore;
#[cfg(test)]
pub use user::MockUserDirectory;

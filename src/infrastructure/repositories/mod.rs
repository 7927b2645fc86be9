//! Repository Implementations
//!
//! PostgreSQL implementations of domain repository traits.
//!
//! This module provides concrete implementations of the storage traits
//! defined in the domain layer.
//!
//! ## Available Repositories
//!
//! - **UserRepository** - Read-only user directory with roles and trip memberships
//! - **TripRepository** - Trips with their destination and member set
//! - **destination_repository** - Destination removal inside trip writes
//! - **NotificationRepository** - Append-only notifications
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use sqlx::PgPool;
//! use crate::infrastructure::repositories::{PgTripRepository, PgUserRepository};
//!
//! async fn setup_repositories(pool: PgPool) {
//!     let user_repo = PgUserRepository::new(pool.clone());
//!     let trip_repo = PgTripRepository::new(pool.clone());
//! }
//! ```

mod destination_repository;
pub mod notification_repository;
pub mod trip_repository;
pub mod user_repository;

pub use notification_repository::PgNotificationRepository;
pub use trip_repository::PgTripRepository;
pub use user_repository::PgUserRepository;

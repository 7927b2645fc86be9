//! # Trip Diary Library
//!
//! Backend for a trip-planning application:
//! - Trips with a destination, a reminder window and a set of trip mates
//! - Invitations recorded as notifications and announced by mail
//! - RESTful HTTP API behind JWT bearer authentication
//! - PostgreSQL for persistent storage
//!
//! ## Architecture
//!
//! - **Domain Layer**: Entities, storage traits and mail rendering
//! - **Application Layer**: The trip workflow service and DTOs
//! - **Infrastructure Layer**: PostgreSQL stores, mail transports, metrics
//! - **Presentation Layer**: HTTP routes, handlers and middleware
//!
//! ## Module Structure
//!
//! ```text
//! trip_diary/
//! +-- config/         Configuration management
//! +-- domain/         Entities, value objects, and traits
//! +-- application/    Trip service and DTOs
//! +-- infrastructure/ Database, mail and metrics implementations
//! +-- presentation/   HTTP routes and middleware
//! +-- shared/         Errors and validation helpers
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;

//! # Domain Layer
//!
//! The domain layer contains the core business types of the trip diary.
//! It is independent of any external frameworks or infrastructure concerns.
//!
//! ## Structure
//!
//! - **entities**: Core domain entities (User, Trip, Notification) and their storage traits
//! - **value_objects**: Immutable value types (Page, Principal)
//! - **services**: Mail rendering and the mailer trait
//!
//! ## Design Principles
//!
//! - No dependencies on infrastructure or presentation layers
//! - Repository traits define data access contracts
//! - Entities encapsulate domain behavior

pub mod entities;
pub mod services;
pub mod value_objects;

// Re-export commonly used types
pub use entities::*;
pub use services::*;
pub use value_objects::*;

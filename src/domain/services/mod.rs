//! # Domain Services
//!
//! Domain services encapsulate logic that doesn't naturally belong to a
//! single entity.
//!
//! ## Services
//!
//! - **Mail**: Mail kinds, pure rendering, and the `Mailer` delivery trait

mod mail;

pub use mail::*;

//! # Domain Value Objects
//!
//! Immutable value types that represent domain concepts without identity.
//!
//! ## Value Objects
//!
//! - **Page**: One page of a paged result set
//! - **Principal**: The authenticated caller of an operation

mod page;
mod principal;

pub use page::*;
pub use principal::*;

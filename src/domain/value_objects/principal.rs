//! Authenticated caller identity.

/// The authenticated caller of an operation, as asserted by a verified token.
///
/// A principal only names a user. Services resolve it to a [`User`] through
/// the user directory before applying any rule, so a token for a user that no
/// longer exists is treated as unauthenticated.
///
/// [`User`]: crate::domain::User
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub username: String,
}

impl Principal {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }
}

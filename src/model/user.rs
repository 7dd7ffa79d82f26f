use secrecy::Secret;

use uuid::Uuid;

use crate::domain::{EmailAddress, Username};

/// New user record, credentials already hashed
#[derive(Debug)]
pub struct NewUser {
    pub username: Username,
    pub email: EmailAddress,
    pub password_hash: String,
}

/// Stored credentials fetched for login verification.
/// Username and email ride along because they become session claims.
#[derive(Debug)]
pub struct UserCredentials {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: Secret<String>,
}

/// Projection of a user record used by the notification workflow:
/// just the contact address and display name.
#[derive(Debug)]
pub struct NotificationProfile {
    pub username: String,
    pub email: String,
}

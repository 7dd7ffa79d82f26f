use std::future::{ready, Ready};

use actix_web::{dev, web, FromRequest, HttpRequest};

use serde::{Deserialize, Serialize};

use uuid::Uuid;

use crate::crypto::{SigningKey, Token};
use crate::error::RestError;

/// Name of the cookie carrying the signed session token
pub const TOKEN_COOKIE: &str = "token";

/// Claims embedded in a session token at login
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

/// An authenticated caller, resolved from the session cookie.
///
/// Resolution only verifies the token signature and expiry; whether a
/// backing user record still exists is the handler's concern.
#[derive(Debug)]
pub struct Identity(SessionClaims);

impl Identity {
    /// Resolve the caller identity from the request's session cookie
    pub fn resolve(req: &HttpRequest) -> Result<Self, RestError> {
        // NOTE: Must be registered with the application at startup
        let signing_key: &SigningKey = req
            .app_data::<web::Data<SigningKey>>()
            .expect("SigningKey not registered for application");

        let cookie = req.cookie(TOKEN_COOKIE).ok_or_else(|| {
            RestError::Unauthorized("Unauthorized: no session token provided.".into())
        })?;

        let token: Token = cookie.value().parse().map_err(|e| {
            tracing::warn!("Malformed session token: {}", e);
            RestError::Unauthorized("Invalid or expired session token.".into())
        })?;

        let claims: SessionClaims = token.verify(signing_key).map_err(|e| {
            tracing::warn!("Session token verification failed: {}", e);
            RestError::Unauthorized("Invalid or expired session token.".into())
        })?;

        Ok(Self(claims))
    }

    pub fn user_id(&self) -> Uuid {
        self.0.id
    }

    pub fn claims(&self) -> &SessionClaims {
        &self.0
    }

    pub fn into_claims(self) -> SessionClaims {
        self.0
    }
}

impl FromRequest for Identity {
    type Error = RestError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        ready(Identity::resolve(req))
    }
}

use actix_web::cookie::Cookie;
use actix_web::dev::HttpServiceFactory;
use actix_web::{get, post, web, HttpResponse};

use anyhow::Context;

use argon2::{Argon2, PasswordHash, PasswordVerifier};

use chrono::Duration;

use secrecy::Secret;

use serde::{Deserialize, Serialize};

use sqlx::SqlitePool;

use crate::auth::{Identity, SessionClaims, TOKEN_COOKIE};
use crate::crypto::{SigningKey, Token};
use crate::domain::{EmailAddress, Username};
use crate::error::{RestError, RestResult};
use crate::model::NewUser;
use crate::repo::UsersRepo;
use crate::telemetry::spawn_blocking_with_tracing;

const MIN_PASSWORD_LEN: usize = 8;

/// Session tokens are valid for one day
const SESSION_TTL_DAYS: i64 = 1;

#[derive(Debug, Serialize)]
struct MessageResponse {
    message: String,
    success: bool,
}

#[derive(Deserialize)]
pub struct SignupBody {
    username: String,
    email: String,
    password: Secret<String>,
}

#[tracing::instrument(name = "Sign up a new user", skip(body, pool))]
#[post("/signup")]
async fn signup(body: web::Json<SignupBody>, pool: web::Data<SqlitePool>) -> RestResult<HttpResponse> {
    use secrecy::ExposeSecret;

    let username: Username = body.username.parse().map_err(RestError::ParseError)?;
    let email: EmailAddress = body.email.parse().map_err(RestError::ParseError)?;

    if body.password.expose_secret().chars().count() < MIN_PASSWORD_LEN {
        return Err(RestError::ParseError(
            "Password must be at least 8 characters long.".into(),
        ));
    }

    let pool = pool.get_ref();

    if let Some((taken_email, _)) = UsersRepo::fetch_conflicting(pool, &email, &username).await? {
        let message = if taken_email == email.as_ref() {
            "A user with this email already exists"
        } else {
            "This username is already taken"
        };
        return Err(RestError::ParseError(message.into()));
    }

    let password = body.0.password;
    let password_hash = spawn_blocking_with_tracing(move || hash_password(password))
        .await
        .context("Failed to spawn blocking task")??;

    let new_user = NewUser {
        username,
        email,
        password_hash,
    };
    UsersRepo::insert(pool, &new_user).await?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "User has been created".into(),
        success: true,
    }))
}

#[derive(Deserialize)]
pub struct LoginBody {
    email: String,
    password: Secret<String>,
}

#[tracing::instrument(name = "Log in a user", skip(body, pool, signing_key))]
#[post("/login")]
async fn login(
    body: web::Json<LoginBody>,
    pool: web::Data<SqlitePool>,
    signing_key: web::Data<SigningKey>,
) -> RestResult<HttpResponse> {
    let email: EmailAddress = body.email.parse().map_err(RestError::ParseError)?;

    let credentials = UsersRepo::fetch_credentials_by_email(pool.get_ref(), &email)
        .await?
        .ok_or_else(|| RestError::InvalidCredentials("User does not exist".into()))?;

    let password = body.0.password;
    let password_hash = credentials.password_hash;
    spawn_blocking_with_tracing(move || verify_password_hash(password, password_hash))
        .await
        .context("Failed to spawn blocking task")??;

    let claims = SessionClaims {
        id: credentials.id,
        username: credentials.username,
        email: credentials.email,
    };
    let token = Token::builder(claims)
        .expires_in(Duration::days(SESSION_TTL_DAYS))
        .sign(signing_key.get_ref())
        .context("Failed to sign session token")?;

    let cookie = Cookie::build(TOKEN_COOKIE, token.to_string())
        .path("/")
        .http_only(true)
        .finish();

    Ok(HttpResponse::Ok().cookie(cookie).json(MessageResponse {
        message: "Login successful".into(),
        success: true,
    }))
}

#[tracing::instrument(name = "Log out")]
#[post("/logout")]
async fn logout() -> RestResult<HttpResponse> {
    let mut cookie = Cookie::new(TOKEN_COOKIE, "");
    cookie.set_path("/");
    cookie.make_removal();

    Ok(HttpResponse::Ok().cookie(cookie).json(MessageResponse {
        message: "Logout successful".into(),
        success: true,
    }))
}

#[derive(Debug, Serialize)]
struct SessionResponse {
    success: bool,
    message: String,
    user: SessionClaims,
}

/// Report the verified session claims without touching the store
#[tracing::instrument(name = "Check session", skip(identity))]
#[get("/session")]
async fn session(identity: Identity) -> RestResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(SessionResponse {
        success: true,
        message: "Authenticated".into(),
        user: identity.into_claims(),
    }))
}

fn hash_password(password: Secret<String>) -> anyhow::Result<String> {
    use argon2::password_hash::rand_core::OsRng;
    use argon2::password_hash::SaltString;
    use argon2::PasswordHasher;
    use secrecy::ExposeSecret;

    let salt = SaltString::generate(&mut OsRng);

    let password_hash = Argon2::default()
        .hash_password(password.expose_secret().as_bytes(), &salt)
        .context("Failed to hash password")?
        .to_string();

    Ok(password_hash)
}

#[tracing::instrument("Verify password hash", skip(password, password_hash))]
fn verify_password_hash(password: Secret<String>, password_hash: Secret<String>) -> RestResult<()> {
    use secrecy::ExposeSecret;

    let password_hash = PasswordHash::new(password_hash.expose_secret())
        .context("Failed to parse stored password hash")?;

    Argon2::default()
        .verify_password(password.expose_secret().as_bytes(), &password_hash)
        .map_err(|_| RestError::InvalidCredentials("Wrong password, try again".into()))?;

    Ok(())
}

/// Account API endpoints
pub fn scope() -> impl HttpServiceFactory {
    web::scope("/api/users")
        .service(signup)
        .service(login)
        .service(logout)
        .service(session)
}

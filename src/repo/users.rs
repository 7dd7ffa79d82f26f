use chrono::Utc;

use secrecy::Secret;

use sqlx::sqlite::SqliteExecutor;

use uuid::Uuid;

use crate::domain::{EmailAddress, Username};
use crate::model::{NewUser, NotificationProfile, UserCredentials};

use super::parse_stored_id;

pub struct UsersRepo;

impl UsersRepo {
    #[tracing::instrument("Insert a new user record", skip(executor))]
    pub async fn insert<'conn>(
        executor: impl SqliteExecutor<'conn>,
        new_user: &NewUser,
    ) -> sqlx::Result<Uuid> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            "insert into users(id, username, email, password_hash, created_at, updated_at) \
             values (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(id.to_string())
        .bind(new_user.username.as_ref())
        .bind(new_user.email.as_ref())
        .bind(&new_user.password_hash)
        .bind(now)
        .bind(now)
        .execute(executor)
        .await?;

        Ok(id)
    }

    pub async fn fetch_credentials_by_email<'conn>(
        executor: impl SqliteExecutor<'conn>,
        email: &EmailAddress,
    ) -> sqlx::Result<Option<UserCredentials>> {
        let row: Option<(String, String, String, String)> = sqlx::query_as(
            "select id, username, email, password_hash from users where email = ?1",
        )
        .bind(email.as_ref())
        .fetch_optional(executor)
        .await?;

        row.map(|(id, username, email, password_hash)| {
            Ok(UserCredentials {
                id: parse_stored_id(&id)?,
                username,
                email,
                password_hash: Secret::new(password_hash),
            })
        })
        .transpose()
    }

    /// Fetch just the fields the notification workflow needs
    pub async fn fetch_notification_profile<'conn>(
        executor: impl SqliteExecutor<'conn>,
        user_id: Uuid,
    ) -> sqlx::Result<Option<NotificationProfile>> {
        let row: Option<(String, String)> =
            sqlx::query_as("select username, email from users where id = ?1")
                .bind(user_id.to_string())
                .fetch_optional(executor)
                .await?;

        Ok(row.map(|(username, email)| NotificationProfile { username, email }))
    }

    pub async fn exists<'conn>(
        executor: impl SqliteExecutor<'conn>,
        user_id: Uuid,
    ) -> sqlx::Result<bool> {
        sqlx::query_scalar("select exists(select 1 from users where id = ?1)")
            .bind(user_id.to_string())
            .fetch_one(executor)
            .await
    }

    /// Find an existing record claiming the same email or username, if any
    pub async fn fetch_conflicting<'conn>(
        executor: impl SqliteExecutor<'conn>,
        email: &EmailAddress,
        username: &Username,
    ) -> sqlx::Result<Option<(String, String)>> {
        sqlx::query_as(
            "select email, username from users where email = ?1 or username = ?2 limit 1",
        )
        .bind(email.as_ref())
        .bind(username.as_ref())
        .fetch_optional(executor)
        .await
    }
}

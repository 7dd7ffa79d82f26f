use actix_web::dev::HttpServiceFactory;
use actix_web::{delete, get, post, web, HttpRequest, HttpResponse};

use serde::{Deserialize, Serialize};

use sqlx::SqlitePool;

use crate::auth::Identity;
use crate::client::{CatalogClient, Email, EmailClient};
use crate::domain::{NotificationDate, ShowId};
use crate::error::{RestError, RestResult};
use crate::model::{NewSubscription, Subscription};
use crate::repo::{NotificationsRepo, UsersRepo};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeBody {
    tv_show_id: Option<ShowId>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubscribeResponse {
    message: String,
    email_sent: bool,
    success: bool,
}

/// Subscribe the caller to a next-episode notification for a show.
///
/// The request body is validated before the caller identity is resolved, so
/// a missing show id is a 400 even on an unauthenticated request. The
/// subscription write is atomic and commits before any email is attempted;
/// a mail failure therefore never rolls back the record.
#[tracing::instrument(
    name = "Subscribe to next-episode notifications",
    skip(req, pool, catalog_client, email_client)
)]
#[post("")]
async fn subscribe(
    req: HttpRequest,
    body: web::Json<SubscribeBody>,
    pool: web::Data<SqlitePool>,
    catalog_client: web::Data<CatalogClient>,
    email_client: web::Data<EmailClient>,
) -> RestResult<HttpResponse> {
    let show_id = body.0.tv_show_id.ok_or_else(|| {
        RestError::ParseError("Missing TV show ID in request body.".into())
    })?;

    let identity = Identity::resolve(&req)?;
    let pool = pool.get_ref();

    let profile = UsersRepo::fetch_notification_profile(pool, identity.user_id())
        .await?
        .ok_or_else(|| RestError::Unauthorized("User not found or unauthorized".into()))?;

    let show = catalog_client.fetch_tv_show(&show_id).await?;

    let show_name = show.name.trim();
    if show_name.is_empty() {
        tracing::error!(
            "Catalog returned data for show {} with a missing or empty name",
            show_id
        );
        return Err(RestError::IncompleteUpstreamData);
    }

    if show.has_stopped_airing() {
        return Ok(HttpResponse::Ok().json(SubscribeResponse {
            message: format!(
                "{} is no longer airing new episodes (Status: {}).",
                show_name,
                show.status.as_deref().unwrap_or_default()
            ),
            email_sent: false,
            success: false,
        }));
    }

    let notification_date = NotificationDate::from_air_date(show.next_episode_air_date());

    let inserted = NotificationsRepo::insert_if_absent(
        pool,
        identity.user_id(),
        &NewSubscription {
            show_id,
            notification_date,
        },
    )
    .await?;

    if !inserted {
        return Ok(HttpResponse::Ok().json(SubscribeResponse {
            message: format!(
                "You are already subscribed to a notification for the next available episode of {}.",
                show_name
            ),
            email_sent: false,
            success: true,
        }));
    }

    let (message, email_sent) = match notification_date.long_form() {
        Some(air_date) => {
            let recipient = profile.email.parse().map_err(|e: String| {
                anyhow::anyhow!("Stored email address is not sendable: {}", e)
            })?;
            let email = confirmation_email(&profile.username, show_name, &air_date);

            email_client
                .send(&recipient, &email)
                .await
                .map_err(RestError::FailedToSendEmail)?;

            (
                format!(
                    "Success! Reminder set for {} on {}. An email confirmation has been sent.",
                    show_name, air_date
                ),
                true,
            )
        }
        None => (
            format!(
                "Subscription confirmed! We'll notify you when {} announces its next episode date.",
                show_name
            ),
            false,
        ),
    };

    Ok(HttpResponse::Ok().json(SubscribeResponse {
        message,
        email_sent,
        success: true,
    }))
}

fn confirmation_email(username: &str, show_name: &str, air_date: &str) -> Email {
    let subject = format!("Notification confirmed: {} is airing soon!", show_name);
    let html_body = format!(
        "<p>Hello {},</p>\
         <p>You have successfully signed up for notifications for <strong>{}</strong>!</p>\
         <p>The next episode is scheduled for <strong>{}</strong>. \
         We've sent this reminder to confirm your subscription.</p>\
         <p>If you wish to manage your notifications, please visit your profile page.</p>",
        username, show_name, air_date
    );
    let text_body = format!(
        "Hello {},\n\n\
         You have successfully signed up for notifications for {}!\n\
         The next episode is scheduled for {}. \
         We've sent this reminder to confirm your subscription.\n\n\
         If you wish to manage your notifications, please visit your profile page.\n",
        username, show_name, air_date
    );

    Email {
        subject,
        html_body,
        text_body,
    }
}

#[derive(Debug, Serialize)]
struct SubscriptionList {
    data: Vec<Subscription>,
    success: bool,
}

#[tracing::instrument(name = "List subscriptions", skip(identity, pool))]
#[get("")]
async fn list(identity: Identity, pool: web::Data<SqlitePool>) -> RestResult<HttpResponse> {
    let pool = pool.get_ref();

    if !UsersRepo::exists(pool, identity.user_id()).await? {
        return Err(RestError::NotFound("User not found or not logged in.".into()));
    }

    let data = NotificationsRepo::fetch_all_for_user(pool, identity.user_id()).await?;

    Ok(HttpResponse::Ok().json(SubscriptionList {
        data,
        success: true,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveBody {
    show_id: Option<ShowId>,
}

#[derive(Debug, Serialize)]
struct RemoveResponse {
    message: String,
}

#[tracing::instrument(name = "Remove subscriptions for a show", skip(identity, pool))]
#[delete("")]
async fn remove(
    identity: Identity,
    body: web::Json<RemoveBody>,
    pool: web::Data<SqlitePool>,
) -> RestResult<HttpResponse> {
    let show_id = body
        .0
        .show_id
        .ok_or_else(|| RestError::ParseError("Missing showId in request body.".into()))?;

    let pool = pool.get_ref();

    if !UsersRepo::exists(pool, identity.user_id()).await? {
        return Err(RestError::NotFound("User not found.".into()));
    }

    NotificationsRepo::delete_by_show(pool, identity.user_id(), &show_id).await?;

    Ok(HttpResponse::Ok().json(RemoveResponse {
        message: format!(
            "Notification for show ID {} successfully removed or already nonexistent.",
            show_id
        ),
    }))
}

/// Notification API endpoints
pub fn scope() -> impl HttpServiceFactory {
    web::scope("/api/users/notifications")
        .service(subscribe)
        .service(list)
        .service(remove)
}

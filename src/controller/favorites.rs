use actix_web::dev::HttpServiceFactory;
use actix_web::{delete, get, post, web, HttpResponse};

use serde::{Deserialize, Serialize};

use sqlx::SqlitePool;

use crate::auth::Identity;
use crate::error::{RestError, RestResult};
use crate::model::{FavoriteSet, MediaType};
use crate::repo::{FavoritesRepo, UsersRepo};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteBody {
    media_id: Option<i64>,
    media_type: Option<MediaType>,
}

impl FavoriteBody {
    fn into_parts(self) -> RestResult<(MediaType, i64)> {
        let media_id = self
            .media_id
            .ok_or_else(|| RestError::ParseError("Missing mediaId in request body.".into()))?;
        let media_type = self
            .media_type
            .ok_or_else(|| RestError::ParseError("Missing mediaType in request body.".into()))?;

        Ok((media_type, media_id))
    }
}

#[derive(Debug, Serialize)]
struct FavoritesResponse {
    message: String,
    success: bool,
    data: FavoriteSet,
}

#[tracing::instrument(name = "Add a favorite", skip(identity, pool))]
#[post("")]
async fn add(
    identity: Identity,
    body: web::Json<FavoriteBody>,
    pool: web::Data<SqlitePool>,
) -> RestResult<HttpResponse> {
    let (media_type, media_id) = body.0.into_parts()?;
    let pool = pool.get_ref();

    if !UsersRepo::exists(pool, identity.user_id()).await? {
        return Err(RestError::NotFound("User not found".into()));
    }

    FavoritesRepo::add(pool, identity.user_id(), media_type, media_id).await?;
    let data = FavoritesRepo::fetch_all_for_user(pool, identity.user_id()).await?;

    Ok(HttpResponse::Ok().json(FavoritesResponse {
        message: format!("{} added to favorites", media_type),
        success: true,
        data,
    }))
}

#[tracing::instrument(name = "Remove a favorite", skip(identity, pool))]
#[delete("")]
async fn remove(
    identity: Identity,
    body: web::Json<FavoriteBody>,
    pool: web::Data<SqlitePool>,
) -> RestResult<HttpResponse> {
    let (media_type, media_id) = body.0.into_parts()?;
    let pool = pool.get_ref();

    if !UsersRepo::exists(pool, identity.user_id()).await? {
        return Err(RestError::NotFound("User not found".into()));
    }

    FavoritesRepo::remove(pool, identity.user_id(), media_type, media_id).await?;
    let data = FavoritesRepo::fetch_all_for_user(pool, identity.user_id()).await?;

    Ok(HttpResponse::Ok().json(FavoritesResponse {
        message: format!("{} removed successfully", media_type),
        success: true,
        data,
    }))
}

#[tracing::instrument(name = "List favorites", skip(identity, pool))]
#[get("")]
async fn list(identity: Identity, pool: web::Data<SqlitePool>) -> RestResult<HttpResponse> {
    let pool = pool.get_ref();

    if !UsersRepo::exists(pool, identity.user_id()).await? {
        return Err(RestError::NotFound("User not found".into()));
    }

    let data = FavoritesRepo::fetch_all_for_user(pool, identity.user_id()).await?;

    Ok(HttpResponse::Ok().json(FavoritesResponse {
        message: "User favorites fetched successfully".into(),
        success: true,
        data,
    }))
}

/// Favorites API endpoints
pub fn scope() -> impl HttpServiceFactory {
    web::scope("/api/users/favorites")
        .service(add)
        .service(remove)
        .service(list)
}

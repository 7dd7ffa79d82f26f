use sqlx::sqlite::SqliteExecutor;

use uuid::Uuid;

use crate::model::{FavoriteSet, MediaType};

pub struct FavoritesRepo;

impl FavoritesRepo {
    /// Set-insert: adding an already-favorited entry is a no-op
    #[tracing::instrument("Add favorite", skip(executor))]
    pub async fn add<'conn>(
        executor: impl SqliteExecutor<'conn>,
        user_id: Uuid,
        media_type: MediaType,
        media_id: i64,
    ) -> sqlx::Result<()> {
        sqlx::query(
            "insert into favorites(user_id, media_type, media_id) values (?1, ?2, ?3) \
             on conflict(user_id, media_type, media_id) do nothing",
        )
        .bind(user_id.to_string())
        .bind(media_type.as_str())
        .bind(media_id)
        .execute(executor)
        .await?;

        Ok(())
    }

    #[tracing::instrument("Remove favorite", skip(executor))]
    pub async fn remove<'conn>(
        executor: impl SqliteExecutor<'conn>,
        user_id: Uuid,
        media_type: MediaType,
        media_id: i64,
    ) -> sqlx::Result<u64> {
        let result = sqlx::query(
            "delete from favorites where user_id = ?1 and media_type = ?2 and media_id = ?3",
        )
        .bind(user_id.to_string())
        .bind(media_type.as_str())
        .bind(media_id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    #[tracing::instrument("Fetch favorites for user", skip(executor))]
    pub async fn fetch_all_for_user<'conn>(
        executor: impl SqliteExecutor<'conn>,
        user_id: Uuid,
    ) -> sqlx::Result<FavoriteSet> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "select media_type, media_id from favorites where user_id = ?1 order by media_id",
        )
        .bind(user_id.to_string())
        .fetch_all(executor)
        .await?;

        let mut favorites = FavoriteSet::default();
        for (media_type, media_id) in rows {
            match media_type.as_str() {
                "movie" => favorites.favorite_movies.push(media_id),
                _ => favorites.favorite_tv_shows.push(media_id),
            }
        }

        Ok(favorites)
    }
}

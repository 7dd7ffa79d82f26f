use chrono::Utc;

use sqlx::sqlite::SqliteExecutor;

use uuid::Uuid;

use crate::domain::ShowId;
use crate::model::{NewSubscription, Subscription};

pub struct NotificationsRepo;

impl NotificationsRepo {
    /// Atomically insert a subscription unless an identical one exists.
    ///
    /// The conflict target is the unique `(user_id, show_id,
    /// notification_date)` index, so two racing requests cannot create
    /// duplicate records; any other constraint violation still surfaces as
    /// an error. Returns `false` when the record already existed.
    #[tracing::instrument("Insert subscription if absent", skip(executor))]
    pub async fn insert_if_absent<'conn>(
        executor: impl SqliteExecutor<'conn>,
        user_id: Uuid,
        new_subscription: &NewSubscription,
    ) -> sqlx::Result<bool> {
        let result = sqlx::query(
            "insert into notifications(user_id, show_id, date_created, notification_date) \
             values (?1, ?2, ?3, ?4) \
             on conflict(user_id, show_id, notification_date) do nothing",
        )
        .bind(user_id.to_string())
        .bind(new_subscription.show_id.as_ref())
        .bind(Utc::now())
        .bind(new_subscription.notification_date.to_string())
        .execute(executor)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument("Fetch subscriptions for user", skip(executor))]
    pub async fn fetch_all_for_user<'conn>(
        executor: impl SqliteExecutor<'conn>,
        user_id: Uuid,
    ) -> sqlx::Result<Vec<Subscription>> {
        sqlx::query_as(
            "select show_id, date_created, notification_date from notifications \
             where user_id = ?1 order by date_created, show_id",
        )
        .bind(user_id.to_string())
        .fetch_all(executor)
        .await
    }

    /// Remove every record for the show, regardless of notification date.
    /// Returns the number of records removed.
    #[tracing::instrument("Delete subscriptions for show", skip(executor))]
    pub async fn delete_by_show<'conn>(
        executor: impl SqliteExecutor<'conn>,
        user_id: Uuid,
        show_id: &ShowId,
    ) -> sqlx::Result<u64> {
        let result = sqlx::query("delete from notifications where user_id = ?1 and show_id = ?2")
            .bind(user_id.to_string())
            .bind(show_id.as_ref())
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }
}

mod favorites;
mod notifications;
mod users;

pub use favorites::FavoritesRepo;
pub use notifications::NotificationsRepo;
pub use users::UsersRepo;

/// Parse a TEXT primary key column back into a Uuid
fn parse_stored_id(id: &str) -> sqlx::Result<uuid::Uuid> {
    uuid::Uuid::parse_str(id).map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

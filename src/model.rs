mod favorite;
mod subscription;
mod user;

pub use favorite::{FavoriteSet, MediaType};
pub use subscription::{NewSubscription, Subscription};
pub use user::{NewUser, NotificationProfile, UserCredentials};

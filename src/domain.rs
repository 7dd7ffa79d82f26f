mod air_date;
mod email_address;
mod show_id;
mod username;

pub use air_date::NotificationDate;
pub use email_address::EmailAddress;
pub use show_id::ShowId;
pub use username::Username;

mod catalog_client;
mod email_client;

pub use catalog_client::{CatalogApiKey, CatalogClient, CatalogError, NextEpisodeToAir, TvShowDetails};
pub use email_client::{Email, EmailAuthorizationToken, EmailClient};

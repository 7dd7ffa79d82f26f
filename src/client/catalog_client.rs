use std::convert::Infallible;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;

use reqwest::Client;

use serde::Deserialize;

use secrecy::Secret;

use url::Url;

use crate::domain::ShowId;

/// Query-string language tag sent with every catalog lookup
const LANGUAGE: &str = "en-US";

/// Failure reaching or being refused by the external catalog.
/// Both cases abort a subscription the same way: the upstream is unavailable.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to build catalog request URL")]
    Url(#[from] url::ParseError),
    #[error("Catalog request failed")]
    Request(#[from] reqwest::Error),
}

/// Client for the external show-metadata catalog
#[derive(Debug)]
pub struct CatalogClient {
    client: Client,
    api_base_url: Url,
    api_key: CatalogApiKey,
}

impl CatalogClient {
    pub fn new(
        api_timeout: Duration,
        api_base_url: Url,
        api_key: CatalogApiKey,
    ) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(api_timeout)
            .build()
            .context("Failed to build http client")?;

        Ok(Self {
            client,
            api_base_url,
            api_key,
        })
    }

    /// Look up a TV show by catalog id
    #[tracing::instrument("Fetch show details", skip(self))]
    pub async fn fetch_tv_show(&self, show_id: &ShowId) -> Result<TvShowDetails, CatalogError> {
        use secrecy::ExposeSecret;

        let url = self.api_base_url.join(&format!("tv/{}", show_id))?;

        let details = self
            .client
            .get(url)
            .query(&[
                ("language", LANGUAGE),
                ("api_key", self.api_key.expose_secret().as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(details)
    }
}

#[derive(Debug)]
pub struct CatalogApiKey(Secret<String>);

impl FromStr for CatalogApiKey {
    type Err = Infallible;

    fn from_str(value: &str) -> Result<Self, Infallible> {
        let value = value.to_string();
        let value = Secret::new(value);

        Ok(Self(value))
    }
}

impl From<Secret<String>> for CatalogApiKey {
    fn from(value: Secret<String>) -> Self {
        Self(value)
    }
}

impl secrecy::ExposeSecret<String> for CatalogApiKey {
    fn expose_secret(&self) -> &String {
        self.0.expose_secret()
    }
}

/// Show metadata as returned by the catalog.
/// Every field is defaulted: upstream payloads with missing fields parse,
/// and data-quality checks happen in the workflow, not the transport layer.
#[derive(Debug, Deserialize)]
pub struct TvShowDetails {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub next_episode_to_air: Option<NextEpisodeToAir>,
}

impl TvShowDetails {
    pub fn next_episode_air_date(&self) -> Option<&str> {
        self.next_episode_to_air
            .as_ref()
            .and_then(|e| e.air_date.as_deref())
    }

    /// A canceled or ended show will never announce another episode
    pub fn has_stopped_airing(&self) -> bool {
        matches!(self.status.as_deref(), Some("Canceled") | Some("Ended"))
    }
}

#[derive(Debug, Deserialize)]
pub struct NextEpisodeToAir {
    #[serde(default)]
    pub air_date: Option<String>,
}

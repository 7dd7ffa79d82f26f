use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of catalog entry a favorite points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
}

impl MediaType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Movie => "movie",
            Self::Tv => "tv",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user's favorites, split by media type
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteSet {
    pub favorite_movies: Vec<i64>,
    pub favorite_tv_shows: Vec<i64>,
}

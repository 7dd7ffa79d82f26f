use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

const MAX_LEN: usize = 64;

/// External catalog identifier of a show.
///
/// The catalog hands out numeric ids, but subscription records store them as
/// strings; request bodies may carry either form, so deserialization accepts
/// both and coerces to the string representation.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ShowId(String);

impl AsRef<str> for ShowId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ShowId {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();

        if value.is_empty() {
            return Err("Show ID cannot be empty".into());
        }
        if value.len() > MAX_LEN {
            return Err("Show ID too long".into());
        }
        if value.chars().any(|c| c.is_whitespace()) {
            return Err("Show ID cannot contain whitespace".into());
        }
        Ok(Self(value.to_string()))
    }
}

impl From<u64> for ShowId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl Serialize for ShowId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ShowId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ShowIdVisitor;

        impl<'de> Visitor<'de> for ShowIdVisitor {
            type Value = ShowId;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a show id as a string or an integer")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<ShowId, E> {
                value.parse().map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<ShowId, E> {
                Ok(ShowId::from(value))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<ShowId, E> {
                Ok(ShowId(value.to_string()))
            }
        }

        deserializer.deserialize_any(ShowIdVisitor)
    }
}

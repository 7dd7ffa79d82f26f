use std::collections::HashSet;
use std::str::FromStr;

use unicode_segmentation::UnicodeSegmentation;

const MAX_LEN: usize = 64;

/// A user supplied display name, trimmed on parse
#[derive(Debug, PartialEq, Clone)]
pub struct Username(String);

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Username {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        lazy_static::lazy_static! {
            static ref INVALID_CHARS: HashSet<char> = vec!['/', '(', ')', '"', '<', '>', '\\', '{', '}']
                .into_iter()
                .collect();
        }

        let value = value.trim();

        if value.is_empty() {
            return Err("Username cannot be empty".into());
        }
        if value.graphemes(true).count() > MAX_LEN {
            return Err("Username too long".into());
        }
        if value.chars().any(|c| c.is_whitespace()) {
            return Err("Username cannot contain whitespace".into());
        }
        if value.chars().any(|c| INVALID_CHARS.contains(&c)) {
            return Err("Username contains invalid characters".into());
        }
        Ok(Self(value.to_string()))
    }
}

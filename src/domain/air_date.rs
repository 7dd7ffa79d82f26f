use std::fmt;

use chrono::NaiveDate;

/// Sentinel stored when a show has no announced air date
const NO_AIR_DATE: &str = "N/A";

/// The air date a subscription is waiting on.
///
/// Stored as text: either an ISO date (`2025-10-25`) or the `N/A` sentinel.
/// The sentinel means "air date not yet known", which is distinct from the
/// absence of a subscription record.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum NotificationDate {
    Scheduled(NaiveDate),
    Unknown,
}

impl NotificationDate {
    /// Build from the catalog's `next_episode_to_air.air_date` field.
    ///
    /// A missing, blank, or unparseable value all collapse to the sentinel.
    pub fn from_air_date(air_date: Option<&str>) -> Self {
        air_date
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
            .map(Self::Scheduled)
            .unwrap_or(Self::Unknown)
    }

    /// Long-form rendering for the confirmation email, e.g. "October 25, 2025".
    /// `None` when no air date is known.
    pub fn long_form(&self) -> Option<String> {
        match self {
            Self::Scheduled(date) => Some(date.format("%B %-d, %Y").to_string()),
            Self::Unknown => None,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Self::Scheduled(_))
    }
}

impl fmt::Display for NotificationDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scheduled(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Self::Unknown => f.write_str(NO_AIR_DATE),
        }
    }
}

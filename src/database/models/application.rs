use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a join application. Created as `Pending`,
/// transitions exactly once to `Approved` or `Rejected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown application status: {0}")]
pub struct ParseStatusError(String);

impl FromStr for ApplicationStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ApplicationStatus::Pending),
            "approved" => Ok(ApplicationStatus::Approved),
            "rejected" => Ok(ApplicationStatus::Rejected),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

impl TryFrom<String> for ApplicationStatus {
    type Error = ParseStatusError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A reviewer's verdict. Narrower than `ApplicationStatus`: `pending`
/// is not a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDecision {
    Approved,
    Rejected,
}

impl ReviewDecision {
    /// Parses the request-body literal. Anything but the two allowed
    /// values is an invalid status.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "approved" => Some(ReviewDecision::Approved),
            "rejected" => Some(ReviewDecision::Rejected),
            _ => None,
        }
    }

    pub fn status(&self) -> ApplicationStatus {
        match self {
            ReviewDecision::Approved => ApplicationStatus::Approved,
            ReviewDecision::Rejected => ApplicationStatus::Rejected,
        }
    }
}

/// A user's request to join a group.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GroupApplication {
    pub application_id: i32,
    pub group_id: i32,
    pub user_id: i32,
    pub message: String,
    #[sqlx(try_from = "String")]
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
}

/// Pending application joined with the applicant's username, the shape
/// the reviewer-facing listing responds with.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PendingApplication {
    pub application_id: i32,
    pub group_id: i32,
    pub user_id: i32,
    pub username: String,
    pub message: String,
    #[sqlx(try_from = "String")]
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            ApplicationStatus::Pending,
            ApplicationStatus::Approved,
            ApplicationStatus::Rejected,
        ] {
            assert_eq!(status.as_str().parse::<ApplicationStatus>().unwrap(), status);
        }
        assert!("maybe".parse::<ApplicationStatus>().is_err());
    }

    #[test]
    fn decision_rejects_everything_but_the_two_literals() {
        assert_eq!(ReviewDecision::parse("approved"), Some(ReviewDecision::Approved));
        assert_eq!(ReviewDecision::parse("rejected"), Some(ReviewDecision::Rejected));
        assert_eq!(ReviewDecision::parse("pending"), None);
        assert_eq!(ReviewDecision::parse("maybe"), None);
        assert_eq!(ReviewDecision::parse(""), None);
        assert_eq!(ReviewDecision::parse("Approved"), None);
    }
}

/// Field validation shared by the API handlers and the models
///
/// Length and format rules for request payloads are declared on the API's
/// request types with `validator`; this module holds the pieces that are not
/// plain attribute rules:
///
/// - [`ValidationError`]: a single violated rule, carried up to the HTTP layer
/// - the rule messages, so handlers and tests agree on wording
/// - [`parse_due_date`]: lenient ISO 8601 parsing for task due dates
///
/// Closed enumerations (project status, task status, task priority) validate
/// themselves through their `FromStr` implementations in `models`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

pub const USERNAME_TOO_SHORT: &str = "Username must be at least 3 characters long";
pub const EMAIL_INVALID: &str = "Invalid email address";
pub const PROJECT_NAME_TOO_SHORT: &str = "Project name must be at least 2 characters long";
pub const TASK_TITLE_TOO_SHORT: &str = "Task title must be at least 2 characters long";
pub const DUE_DATE_INVALID: &str = "Invalid due date format";

/// A rejected field value
///
/// Displayed as the bare rule message, which is what clients see.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Field that failed validation
    pub field: &'static str,

    /// Human-readable rule that was violated
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    /// Builds the "must be one of" error for a closed enumeration
    pub fn not_one_of(field: &'static str, label: &str, allowed: &[&str]) -> Self {
        Self::new(
            field,
            format!("{} must be one of: {}", label, allowed.join(", ")),
        )
    }
}

/// Parses a task due date
///
/// Accepted forms, all normalized to UTC:
///
/// - RFC 3339 with offset or trailing `Z` (`2025-03-01T09:30:00Z`)
/// - naive date-time, interpreted as UTC (`2025-03-01T09:30:00`, `2025-03-01 09:30`)
/// - bare date, midnight UTC (`2025-03-01`)
///
/// # Example
///
/// ```
/// use taskboard_shared::validation::parse_due_date;
///
/// let due = parse_due_date("2025-03-01T09:30:00Z").unwrap();
/// assert_eq!(due.to_rfc3339(), "2025-03-01T09:30:00+00:00");
///
/// assert!(parse_due_date("next tuesday").is_err());
/// ```
pub fn parse_due_date(raw: &str) -> Result<DateTime<Utc>, ValidationError> {
    let raw = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }

    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];

    let naive = raw.strip_suffix('Z').unwrap_or(raw);
    for format in NAIVE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(naive, format) {
            return Ok(parsed.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }

    Err(ValidationError::new("due_date", DUE_DATE_INVALID))
}

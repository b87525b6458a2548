//! Database value parsing utilities
//!
//! Provides error-safe parsing of stored values.

use chrono::{DateTime, Utc};
use rusqlite::Error as SqlError;
use uuid::Uuid;

use crate::models::{ApplicationStatus, Gender, HostelType};

/// Parse a UUID from a database string column
pub fn parse_uuid(s: &str) -> Result<Uuid, SqlError> {
    Uuid::parse_str(s).map_err(|e| {
        SqlError::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Parse a DateTime from an RFC3339 string
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, SqlError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            SqlError::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })
}

/// Parse a stored gender value
///
/// Unrecognized values degrade to `Other` rather than failing the row;
/// such entities never pass a single-gender hostel filter.
pub fn gender_from_str(s: &str) -> Gender {
    Gender::from_str(s).unwrap_or(Gender::Other)
}

/// Parse a stored hostel type; unknown values are a conversion failure
pub fn hostel_type_from_str(s: &str) -> Result<HostelType, SqlError> {
    HostelType::from_str(s).ok_or_else(|| {
        SqlError::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            format!("unknown hostel type: {s}").into(),
        )
    })
}

/// Parse a stored application status; unknown values are a conversion failure
pub fn status_from_str(s: &str) -> Result<ApplicationStatus, SqlError> {
    ApplicationStatus::from_str(s).ok_or_else(|| {
        SqlError::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            format!("unknown application status: {s}").into(),
        )
    })
}

/// Extension trait for converting rusqlite Results to Option
pub trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>, SqlError>;
}

impl<T> OptionalExt<T> for Result<T, SqlError> {
    fn optional(self) -> Result<Option<T>, SqlError> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(SqlError::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_degrades_to_other() {
        assert_eq!(gender_from_str("Male"), Gender::Male);
        assert_eq!(gender_from_str("Female"), Gender::Female);
        assert_eq!(gender_from_str("nonbinary"), Gender::Other);
        assert_eq!(gender_from_str(""), Gender::Other);
    }

    #[test]
    fn test_unknown_status_is_an_error() {
        assert!(status_from_str("Approved by Admin").is_ok());
        assert!(status_from_str("Approved").is_err());
    }
}

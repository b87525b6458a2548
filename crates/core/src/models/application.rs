//! Internship application model and approval statuses

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Gender;

/// Approval-chain position of an internship application
///
/// The stored strings are stable and load-bearing: the caretaker's
/// allocation pool is selected by the "Approved by Admin" value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplicationStatus {
    PendingFaculty,
    PendingHod,
    ApprovedByHod,
    ApprovedByAdmin,
    ApprovedByCaretaker,
    RejectedByFaculty,
    RejectedByHod,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::PendingFaculty => "Pending Faculty Approval",
            ApplicationStatus::PendingHod => "Pending HOD Approval",
            ApplicationStatus::ApprovedByHod => "Approved by HOD",
            ApplicationStatus::ApprovedByAdmin => "Approved by Admin",
            ApplicationStatus::ApprovedByCaretaker => "Approved by Caretaker",
            ApplicationStatus::RejectedByFaculty => "Rejected by Faculty",
            ApplicationStatus::RejectedByHod => "Rejected by HOD",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Pending Faculty Approval" => Some(ApplicationStatus::PendingFaculty),
            "Pending HOD Approval" => Some(ApplicationStatus::PendingHod),
            "Approved by HOD" => Some(ApplicationStatus::ApprovedByHod),
            "Approved by Admin" => Some(ApplicationStatus::ApprovedByAdmin),
            "Approved by Caretaker" => Some(ApplicationStatus::ApprovedByCaretaker),
            "Rejected by Faculty" => Some(ApplicationStatus::RejectedByFaculty),
            "Rejected by HOD" => Some(ApplicationStatus::RejectedByHod),
            _ => None,
        }
    }

    /// Rejections and the final caretaker approval admit no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ApplicationStatus::ApprovedByCaretaker
                | ApplicationStatus::RejectedByFaculty
                | ApplicationStatus::RejectedByHod
        )
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A room-exemption application filed by an internship student
///
/// Lives in a separate identity space from Student; the two pools are
/// allocated independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InternshipApplication {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub gender: Gender,
    /// Mentor who performs the first review
    pub faculty_email: String,
    pub status: ApplicationStatus,
    /// None until the caretaker stage allocates a room
    pub room_no: Option<String>,
    pub applied_at: DateTime<Utc>,
}

impl InternshipApplication {
    pub fn new(name: String, email: String, gender: Gender, faculty_email: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            gender,
            faculty_email,
            status: ApplicationStatus::PendingFaculty,
            room_no: None,
            applied_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_strings_roundtrip() {
        for status in [
            ApplicationStatus::PendingFaculty,
            ApplicationStatus::PendingHod,
            ApplicationStatus::ApprovedByHod,
            ApplicationStatus::ApprovedByAdmin,
            ApplicationStatus::ApprovedByCaretaker,
            ApplicationStatus::RejectedByFaculty,
            ApplicationStatus::RejectedByHod,
        ] {
            assert_eq!(ApplicationStatus::from_str(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(ApplicationStatus::RejectedByFaculty.is_terminal());
        assert!(ApplicationStatus::RejectedByHod.is_terminal());
        assert!(ApplicationStatus::ApprovedByCaretaker.is_terminal());
        assert!(!ApplicationStatus::ApprovedByAdmin.is_terminal());
    }

    #[test]
    fn test_new_application_starts_pending() {
        let app = InternshipApplication::new(
            "Asha Rao".into(),
            "asha@example.edu".into(),
            Gender::Female,
            "mentor@example.edu".into(),
        );
        assert_eq!(app.status, ApplicationStatus::PendingFaculty);
        assert!(app.room_no.is_none());
    }
}

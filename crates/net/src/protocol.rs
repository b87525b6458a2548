//! Network protocol message types
//!
//! All messages are JSON-serialized and length-prefixed on the wire.
//! Wire types mirror the core models but are deliberately decoupled;
//! the service layer converts at the boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role transmitted over the network (mirrors core Role but decoupled)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoleKind {
    Student,
    Caretaker,
    Faculty,
    Warden,
    Hod,
    Admin,
}

/// Caller identity attached to role-gated requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorInfo {
    pub name: String,
    pub role: RoleKind,
}

/// Hostel admission type on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HostelKind {
    Boys,
    Girls,
    Mixed,
}

/// Which pool an allocation request draws from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "pool")]
pub enum CohortSpec {
    Batch { batch_no: String },
    InternshipPool,
}

/// An allocatable entity in responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityInfo {
    pub id: String,
    pub name: String,
    pub gender: String,
}

/// Vacancy summary row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VacancyInfo {
    pub hostel_no: String,
    pub name: String,
    pub hostel_type: HostelKind,
    pub unoccupied_beds: u32,
}

/// An internship application in listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationInfo {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub gender: String,
    pub status: String,
    pub room_no: Option<String>,
    pub applied_at: DateTime<Utc>,
}

/// Requests a client can issue
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    /// Run the allocation engine for a cohort against one hostel
    Allocate {
        actor: ActorInfo,
        cohort: CohortSpec,
        hostel_no: String,
        hostel_type: HostelKind,
    },

    /// House one admin-approved applicant in a named room
    AssignIntern {
        actor: ActorInfo,
        application_id: Uuid,
        room_no: String,
    },

    /// Vacancy summary across hostels
    VacancyOverview { actor: ActorInfo },

    /// Students of a batch still without a room
    UnallocatedStudents { actor: ActorInfo, batch_no: String },

    /// Applications sitting at one chain position
    PendingApplications { actor: ActorInfo, status: String },

    /// Liveness check
    Ping,
}

/// Responses the server sends back, one per request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Response {
    /// Outcome of an Allocate request
    Allocation {
        success: bool,
        message: Option<String>,
        updated_entities: Option<Vec<EntityInfo>>,
    },

    /// An AssignIntern request succeeded
    Assigned { room_no: String },

    Vacancies { hostels: Vec<VacancyInfo> },

    Students { students: Vec<EntityInfo> },

    Applications { applications: Vec<ApplicationInfo> },

    Pong,

    /// The request failed; `message` says why
    Error { message: String },
}

impl Request {
    /// Serialize message to JSON bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Deserialize message from JSON bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

impl Response {
    /// Serialize message to JSON bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Deserialize message from JSON bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_roundtrip() {
        let req = Request::Allocate {
            actor: ActorInfo {
                name: "Mr. Singh".into(),
                role: RoleKind::Caretaker,
            },
            cohort: CohortSpec::Batch {
                batch_no: "2024CS".into(),
            },
            hostel_no: "BR".into(),
            hostel_type: HostelKind::Boys,
        };

        let bytes = req.to_bytes().unwrap();
        let decoded = Request::from_bytes(&bytes).unwrap();

        match decoded {
            Request::Allocate {
                cohort, hostel_no, ..
            } => {
                assert_eq!(
                    cohort,
                    CohortSpec::Batch {
                        batch_no: "2024CS".into()
                    }
                );
                assert_eq!(hostel_no, "BR");
            }
            _ => panic!("Wrong request type"),
        }
    }

    #[test]
    fn test_allocation_response_shape() {
        let resp = Response::Allocation {
            success: false,
            message: Some("Failed to allocate rooms.".into()),
            updated_entities: None,
        };

        let bytes = resp.to_bytes().unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Failed to allocate rooms.");
    }
}

//! Hostel model - the top-level accommodation unit

use serde::{Deserialize, Serialize};

/// Which genders a hostel admits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HostelType {
    /// Admits male students only
    Boys,
    /// Admits female students only
    Girls,
    /// Admits any gender
    Mixed,
}

impl HostelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            HostelType::Boys => "Boys",
            HostelType::Girls => "Girls",
            HostelType::Mixed => "Mixed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Boys" => Some(HostelType::Boys),
            "Girls" => Some(HostelType::Girls),
            "Mixed" => Some(HostelType::Mixed),
            _ => None,
        }
    }
}

impl std::fmt::Display for HostelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A hostel building with a fixed room inventory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hostel {
    /// Short unique code, e.g. "BR"
    pub hostel_no: String,
    pub name: String,
    pub hostel_type: HostelType,
    /// Total bed capacity across all rooms
    pub capacity: u32,
}

impl Hostel {
    pub fn new(hostel_no: String, name: String, hostel_type: HostelType, capacity: u32) -> Self {
        Self {
            hostel_no,
            name,
            hostel_type,
            capacity,
        }
    }
}

/// Vacancy summary for one hostel (derived, never stored)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostelVacancy {
    pub hostel_no: String,
    pub name: String,
    pub hostel_type: HostelType,
    /// Sum of free beds across the hostel's rooms
    pub unoccupied_beds: u32,
}

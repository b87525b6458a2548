//! Student and batch models

use serde::{Deserialize, Serialize};

/// Gender as recorded at registration
///
/// Stored as text; anything other than the two recognized values degrades
/// to `Other`, which never matches a single-gender hostel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Male" => Some(Gender::Male),
            "Female" => Some(Gender::Female),
            "Other" => Some(Gender::Other),
            _ => None,
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An admission batch grouping regular students
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Batch {
    /// Batch code, e.g. "2024CS"
    pub batch_no: String,
    pub number_of_students: u32,
}

impl Batch {
    pub fn new(batch_no: String, number_of_students: u32) -> Self {
        Self {
            batch_no,
            number_of_students,
        }
    }
}

/// A regular student in the accommodation roll
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    /// Institute roll number, e.g. "2024CSB1012"
    pub student_id: String,
    pub name: String,
    pub gender: Gender,
    pub batch_no: String,
    /// None while unallocated; set exactly once by an allocation path
    pub room_no: Option<String>,
}

impl Student {
    pub fn new(student_id: String, name: String, gender: Gender, batch_no: String) -> Self {
        Self {
            student_id,
            name,
            gender,
            batch_no,
            room_no: None,
        }
    }
}

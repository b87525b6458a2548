//! Storage repository traits
//!
//! These traits define the storage interface, allowing for different
//! implementations (SQLite, mock, future network backend).

use uuid::Uuid;

use crate::allocation::{Candidate, CohortSelector};
use crate::error::Result;
use crate::models::{
    ApplicationStatus, Batch, Hostel, HostelVacancy, InternshipApplication, Room, Student,
};

/// Hostel and room repository operations
pub trait HostelRepository {
    /// Create a new hostel
    fn create_hostel(&self, hostel: &Hostel) -> Result<()>;

    /// Find hostel by its code
    fn find_hostel(&self, hostel_no: &str) -> Result<Option<Hostel>>;

    /// List all hostels
    fn list_hostels(&self) -> Result<Vec<Hostel>>;

    /// Free beds across one hostel
    fn unoccupied_beds(&self, hostel_no: &str) -> Result<u32>;

    /// Vacancy summary for every hostel
    fn vacancy_overview(&self) -> Result<Vec<HostelVacancy>>;

    /// Create a new room
    fn create_room(&self, room: &Room) -> Result<()>;

    /// Find room by its code
    fn find_room(&self, room_no: &str) -> Result<Option<Room>>;

    /// List a hostel's rooms in insertion order
    fn list_rooms(&self, hostel_no: &str) -> Result<Vec<Room>>;

    /// List a hostel's rooms that still have free beds
    fn list_vacant_rooms(&self, hostel_no: &str) -> Result<Vec<Room>>;
}

/// Student and batch repository operations
pub trait StudentRepository {
    /// Create a new batch
    fn create_batch(&self, batch: &Batch) -> Result<()>;

    /// Find batch by its code
    fn find_batch(&self, batch_no: &str) -> Result<Option<Batch>>;

    /// List all batches
    fn list_batches(&self) -> Result<Vec<Batch>>;

    /// Create a new student
    fn create_student(&self, student: &Student) -> Result<()>;

    /// Find student by roll number
    fn find_student(&self, student_id: &str) -> Result<Option<Student>>;

    /// List a batch's students without a room
    fn list_unallocated_students(&self, batch_no: &str) -> Result<Vec<Student>>;
}

/// Internship application repository operations
pub trait ApplicationRepository {
    /// Create a new application
    fn create_application(&self, application: &InternshipApplication) -> Result<()>;

    /// Find application by ID
    fn find_application(&self, id: Uuid) -> Result<Option<InternshipApplication>>;

    /// List applications at a given chain position
    fn list_applications_by_status(
        &self,
        status: ApplicationStatus,
    ) -> Result<Vec<InternshipApplication>>;

    /// List applications awaiting a given mentor's review
    fn list_pending_for_faculty(&self, faculty_email: &str)
        -> Result<Vec<InternshipApplication>>;

    /// Move an application to a new chain position
    fn update_application_status(&self, id: Uuid, status: ApplicationStatus) -> Result<()>;
}

/// Boundary operations the allocation engine runs against
///
/// `commit_assignments` is the single mutation primitive: one atomic unit
/// of work per room, pairing every occupancy increment with exactly one
/// entity's room assignment.
pub trait AllocationStore {
    /// Fetch the unallocated cohort in stable source order
    fn fetch_unallocated(&self, selector: &CohortSelector) -> Result<Vec<Candidate>>;

    /// Fetch a hostel's rooms in stable source order
    fn fetch_rooms(&self, hostel_no: &str) -> Result<Vec<Room>>;

    /// Atomically assign candidates to one room, front first
    ///
    /// Re-reads the room's free capacity under the transaction and takes
    /// at most that many candidates; returns how many were assigned.
    fn commit_assignments(&self, room_no: &str, candidates: &[Candidate]) -> Result<usize>;
}

/// Combined storage interface
///
/// Provides access to all repository operations.
/// Implementations may be backed by SQLite, mocks, or network.
pub trait Storage:
    HostelRepository + StudentRepository + ApplicationRepository + AllocationStore
{
}

// Blanket implementation: any type implementing all traits implements Storage
impl<T> Storage for T where
    T: HostelRepository + StudentRepository + ApplicationRepository + AllocationStore
{
}

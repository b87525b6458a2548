//! SQLite storage layer for Domus

mod applications;
mod hostels;
mod migrations;
mod parse;
mod rooms;
mod students;
mod traits;

use rusqlite::{params, Connection};
use std::path::Path;
use tracing::instrument;
use uuid::Uuid;

use crate::allocation::{Candidate, CandidateId, CohortSelector};
use crate::error::{Error, Result};
use crate::models::{
    ApplicationStatus, Batch, Hostel, HostelVacancy, InternshipApplication, Room, Student,
};

pub use applications::ApplicationStore;
pub use hostels::HostelStore;
pub use rooms::RoomStore;
pub use students::StudentStore;
pub use traits::{
    AllocationStore, ApplicationRepository, HostelRepository, Storage, StudentRepository,
};

/// Main database handle
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database at the given path
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON")?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Open in-memory database (for testing)
    #[instrument]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON")?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initialize database schema via migrations
    fn init(&self) -> Result<()> {
        migrations::run_migrations(&self.conn)?;
        Ok(())
    }

    /// Get current schema version
    pub fn schema_version(&self) -> u32 {
        self.conn
            .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
                row.get(0)
            })
            .unwrap_or(0)
    }

    /// Get hostel store
    pub fn hostels(&self) -> HostelStore<'_> {
        HostelStore::new(&self.conn)
    }

    /// Get room store
    pub fn rooms(&self) -> RoomStore<'_> {
        RoomStore::new(&self.conn)
    }

    /// Get student store
    pub fn students(&self) -> StudentStore<'_> {
        StudentStore::new(&self.conn)
    }

    /// Get application store
    pub fn applications(&self) -> ApplicationStore<'_> {
        ApplicationStore::new(&self.conn)
    }
}

// Implement repository traits for Database
// This enables using Database through the trait interface

impl HostelRepository for Database {
    fn create_hostel(&self, hostel: &Hostel) -> Result<()> {
        self.hostels().create(hostel)
    }

    fn find_hostel(&self, hostel_no: &str) -> Result<Option<Hostel>> {
        self.hostels().find_by_no(hostel_no)
    }

    fn list_hostels(&self) -> Result<Vec<Hostel>> {
        self.hostels().list()
    }

    fn unoccupied_beds(&self, hostel_no: &str) -> Result<u32> {
        self.hostels().unoccupied_beds(hostel_no)
    }

    fn vacancy_overview(&self) -> Result<Vec<HostelVacancy>> {
        self.hostels().vacancy_overview()
    }

    fn create_room(&self, room: &Room) -> Result<()> {
        self.rooms().create(room)
    }

    fn find_room(&self, room_no: &str) -> Result<Option<Room>> {
        self.rooms().find_by_no(room_no)
    }

    fn list_rooms(&self, hostel_no: &str) -> Result<Vec<Room>> {
        self.rooms().list_for_hostel(hostel_no)
    }

    fn list_vacant_rooms(&self, hostel_no: &str) -> Result<Vec<Room>> {
        self.rooms().list_vacant_for_hostel(hostel_no)
    }
}

impl StudentRepository for Database {
    fn create_batch(&self, batch: &Batch) -> Result<()> {
        self.students().create_batch(batch)
    }

    fn find_batch(&self, batch_no: &str) -> Result<Option<Batch>> {
        self.students().find_batch(batch_no)
    }

    fn list_batches(&self) -> Result<Vec<Batch>> {
        self.students().list_batches()
    }

    fn create_student(&self, student: &Student) -> Result<()> {
        self.students().create(student)
    }

    fn find_student(&self, student_id: &str) -> Result<Option<Student>> {
        self.students().find_by_id(student_id)
    }

    fn list_unallocated_students(&self, batch_no: &str) -> Result<Vec<Student>> {
        self.students().list_unallocated(batch_no)
    }
}

impl ApplicationRepository for Database {
    fn create_application(&self, application: &InternshipApplication) -> Result<()> {
        self.applications().create(application)
    }

    fn find_application(&self, id: Uuid) -> Result<Option<InternshipApplication>> {
        self.applications().find_by_id(id)
    }

    fn list_applications_by_status(
        &self,
        status: ApplicationStatus,
    ) -> Result<Vec<InternshipApplication>> {
        self.applications().list_by_status(status)
    }

    fn list_pending_for_faculty(
        &self,
        faculty_email: &str,
    ) -> Result<Vec<InternshipApplication>> {
        self.applications().list_pending_for_faculty(faculty_email)
    }

    fn update_application_status(&self, id: Uuid, status: ApplicationStatus) -> Result<()> {
        self.applications().set_status(id, status)
    }
}

impl AllocationStore for Database {
    fn fetch_unallocated(&self, selector: &CohortSelector) -> Result<Vec<Candidate>> {
        match selector {
            CohortSelector::Batch(batch_no) => Ok(self
                .students()
                .list_unallocated(batch_no)?
                .into_iter()
                .map(|s| Candidate {
                    id: CandidateId::Student(s.student_id),
                    name: s.name,
                    gender: s.gender,
                })
                .collect()),
            CohortSelector::InternshipPool => Ok(self
                .applications()
                .list_unallocated_approved()?
                .into_iter()
                .map(|a| Candidate {
                    id: CandidateId::Application(a.id),
                    name: a.name,
                    gender: a.gender,
                })
                .collect()),
        }
    }

    fn fetch_rooms(&self, hostel_no: &str) -> Result<Vec<Room>> {
        self.rooms().list_for_hostel(hostel_no)
    }

    #[instrument(skip(self, candidates), fields(count = candidates.len()))]
    fn commit_assignments(&self, room_no: &str, candidates: &[Candidate]) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;

        // Re-read under the transaction so a concurrent commit cannot push
        // the room past capacity.
        let room = RoomStore::new(&tx)
            .find_by_no(room_no)?
            .ok_or_else(|| Error::NotFound(format!("room {room_no}")))?;

        let take = (room.free_beds() as usize).min(candidates.len());
        for candidate in &candidates[..take] {
            match &candidate.id {
                CandidateId::Student(student_id) => {
                    tx.execute(
                        "UPDATE students SET room_no = ?1 WHERE student_id = ?2",
                        params![room_no, student_id],
                    )?;
                }
                CandidateId::Application(id) => {
                    tx.execute(
                        "UPDATE internship_applications SET room_no = ?1, status = ?2 WHERE id = ?3",
                        params![
                            room_no,
                            ApplicationStatus::ApprovedByCaretaker.as_str(),
                            id.to_string(),
                        ],
                    )?;
                }
            }
        }

        if take > 0 {
            tx.execute(
                "UPDATE rooms SET current_occupancy = current_occupancy + ?1 WHERE room_no = ?2",
                params![take as u32, room_no],
            )?;
        }

        tx.commit()?;
        Ok(take)
    }
}

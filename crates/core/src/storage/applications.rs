//! Internship application storage operations

use rusqlite::{params, Connection, Row};
use tracing::instrument;
use uuid::Uuid;

use super::parse::{gender_from_str, parse_datetime, parse_uuid, status_from_str, OptionalExt};
use crate::error::Result;
use crate::models::{ApplicationStatus, InternshipApplication};

pub struct ApplicationStore<'a> {
    conn: &'a Connection,
}

fn application_from_row(row: &Row<'_>) -> std::result::Result<InternshipApplication, rusqlite::Error> {
    Ok(InternshipApplication {
        id: parse_uuid(&row.get::<_, String>(0)?)?,
        name: row.get(1)?,
        email: row.get(2)?,
        gender: gender_from_str(&row.get::<_, String>(3)?),
        faculty_email: row.get(4)?,
        status: status_from_str(&row.get::<_, String>(5)?)?,
        room_no: row.get(6)?,
        applied_at: parse_datetime(&row.get::<_, String>(7)?)?,
    })
}

const APPLICATION_COLUMNS: &str =
    "id, name, email, gender, faculty_email, status, room_no, applied_at";

impl<'a> ApplicationStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Create a new application
    #[instrument(skip(self, application), fields(applicant = %application.name))]
    pub fn create(&self, application: &InternshipApplication) -> Result<()> {
        self.conn.execute(
            "INSERT INTO internship_applications
             (id, name, email, gender, faculty_email, status, room_no, applied_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                application.id.to_string(),
                application.name,
                application.email,
                application.gender.as_str(),
                application.faculty_email,
                application.status.as_str(),
                application.room_no,
                application.applied_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Find application by ID
    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: Uuid) -> Result<Option<InternshipApplication>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM internship_applications WHERE id = ?1"
        ))?;

        let application = stmt
            .query_row(params![id.to_string()], application_from_row)
            .optional()?;

        Ok(application)
    }

    /// List applications at a given chain position, in insertion order
    #[instrument(skip(self))]
    pub fn list_by_status(&self, status: ApplicationStatus) -> Result<Vec<InternshipApplication>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM internship_applications
             WHERE status = ?1 ORDER BY rowid"
        ))?;

        let applications = stmt
            .query_map(params![status.as_str()], application_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(applications)
    }

    /// List applications awaiting a given mentor's review
    #[instrument(skip(self))]
    pub fn list_pending_for_faculty(
        &self,
        faculty_email: &str,
    ) -> Result<Vec<InternshipApplication>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM internship_applications
             WHERE faculty_email = ?1 AND status = ?2 ORDER BY rowid"
        ))?;

        let applications = stmt
            .query_map(
                params![faculty_email, ApplicationStatus::PendingFaculty.as_str()],
                application_from_row,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(applications)
    }

    /// The engine's internship cohort: admin-approved, not yet housed
    #[instrument(skip(self))]
    pub fn list_unallocated_approved(&self) -> Result<Vec<InternshipApplication>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM internship_applications
             WHERE status = ?1 AND room_no IS NULL ORDER BY rowid"
        ))?;

        let applications = stmt
            .query_map(
                params![ApplicationStatus::ApprovedByAdmin.as_str()],
                application_from_row,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(applications)
    }

    /// Move an application to a new chain position
    ///
    /// Legality of the transition is the approval chain's concern; the
    /// store only persists it.
    #[instrument(skip(self))]
    pub fn set_status(&self, id: Uuid, status: ApplicationStatus) -> Result<()> {
        self.conn.execute(
            "UPDATE internship_applications SET status = ?1 WHERE id = ?2",
            params![status.as_str(), id.to_string()],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gender;
    use crate::storage::Database;

    fn make_application(name: &str, mentor: &str) -> InternshipApplication {
        InternshipApplication::new(
            name.into(),
            format!("{}@example.edu", name.to_lowercase()),
            Gender::Male,
            mentor.into(),
        )
    }

    #[test]
    fn test_create_find_roundtrip() {
        let db = Database::open_in_memory().unwrap();
        let app = make_application("Dev", "mentor@example.edu");
        db.applications().create(&app).unwrap();

        let found = db.applications().find_by_id(app.id).unwrap().unwrap();
        assert_eq!(found.name, "Dev");
        assert_eq!(found.status, ApplicationStatus::PendingFaculty);
    }

    #[test]
    fn test_pending_for_faculty_scopes_by_mentor() {
        let db = Database::open_in_memory().unwrap();
        db.applications()
            .create(&make_application("Dev", "a@example.edu"))
            .unwrap();
        db.applications()
            .create(&make_application("Esha", "b@example.edu"))
            .unwrap();

        let pending = db
            .applications()
            .list_pending_for_faculty("a@example.edu")
            .unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].name, "Dev");
    }

    #[test]
    fn test_unallocated_approved_excludes_housed() {
        let db = Database::open_in_memory().unwrap();
        let a = make_application("Dev", "m@example.edu");
        let b = make_application("Esha", "m@example.edu");
        db.applications().create(&a).unwrap();
        db.applications().create(&b).unwrap();

        db.applications()
            .set_status(a.id, ApplicationStatus::ApprovedByAdmin)
            .unwrap();
        db.applications()
            .set_status(b.id, ApplicationStatus::ApprovedByAdmin)
            .unwrap();

        // House one of them directly
        db.hostels()
            .create(&crate::models::Hostel::new(
                "BR".into(),
                "Brahmaputra".into(),
                crate::models::HostelType::Mixed,
                2,
            ))
            .unwrap();
        db.rooms()
            .create(&crate::models::Room::new(
                "BR-1-101".into(),
                "BR".into(),
                1,
                2,
            ))
            .unwrap();
        db.conn
            .execute(
                "UPDATE internship_applications SET room_no = 'BR-1-101' WHERE id = ?1",
                params![a.id.to_string()],
            )
            .unwrap();

        let pool = db.applications().list_unallocated_approved().unwrap();
        assert_eq!(pool.len(), 1);
        assert_eq!(pool[0].id, b.id);
    }
}

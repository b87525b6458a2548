//! Student and batch storage operations

use rusqlite::{params, Connection};
use tracing::instrument;

use super::parse::{gender_from_str, OptionalExt};
use crate::error::Result;
use crate::models::{Batch, Student};

pub struct StudentStore<'a> {
    conn: &'a Connection,
}

impl<'a> StudentStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Create a new batch
    #[instrument(skip(self, batch), fields(batch_no = %batch.batch_no))]
    pub fn create_batch(&self, batch: &Batch) -> Result<()> {
        self.conn.execute(
            "INSERT INTO batches (batch_no, number_of_students) VALUES (?1, ?2)",
            params![batch.batch_no, batch.number_of_students],
        )?;
        Ok(())
    }

    /// Find batch by its code
    #[instrument(skip(self))]
    pub fn find_batch(&self, batch_no: &str) -> Result<Option<Batch>> {
        let mut stmt = self
            .conn
            .prepare("SELECT batch_no, number_of_students FROM batches WHERE batch_no = ?1")?;

        let batch = stmt
            .query_row(params![batch_no], |row| {
                Ok(Batch {
                    batch_no: row.get(0)?,
                    number_of_students: row.get(1)?,
                })
            })
            .optional()?;

        Ok(batch)
    }

    /// List all batches
    #[instrument(skip(self))]
    pub fn list_batches(&self) -> Result<Vec<Batch>> {
        let mut stmt = self
            .conn
            .prepare("SELECT batch_no, number_of_students FROM batches ORDER BY batch_no")?;

        let batches = stmt
            .query_map([], |row| {
                Ok(Batch {
                    batch_no: row.get(0)?,
                    number_of_students: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(batches)
    }

    /// Create a new student
    #[instrument(skip(self, student), fields(student_id = %student.student_id))]
    pub fn create(&self, student: &Student) -> Result<()> {
        self.conn.execute(
            "INSERT INTO students (student_id, name, gender, batch_no, room_no)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                student.student_id,
                student.name,
                student.gender.as_str(),
                student.batch_no,
                student.room_no,
            ],
        )?;
        Ok(())
    }

    /// Find student by roll number
    #[instrument(skip(self))]
    pub fn find_by_id(&self, student_id: &str) -> Result<Option<Student>> {
        let mut stmt = self.conn.prepare(
            "SELECT student_id, name, gender, batch_no, room_no FROM students WHERE student_id = ?1",
        )?;

        let student = stmt
            .query_row(params![student_id], |row| {
                Ok(Student {
                    student_id: row.get(0)?,
                    name: row.get(1)?,
                    gender: gender_from_str(&row.get::<_, String>(2)?),
                    batch_no: row.get(3)?,
                    room_no: row.get(4)?,
                })
            })
            .optional()?;

        Ok(student)
    }

    /// List a batch's students without a room, in insertion order
    ///
    /// This is the engine's batch cohort: the front of this list is
    /// allocated first.
    #[instrument(skip(self))]
    pub fn list_unallocated(&self, batch_no: &str) -> Result<Vec<Student>> {
        let mut stmt = self.conn.prepare(
            "SELECT student_id, name, gender, batch_no, room_no
             FROM students
             WHERE batch_no = ?1 AND room_no IS NULL
             ORDER BY rowid",
        )?;

        let students = stmt
            .query_map(params![batch_no], |row| {
                Ok(Student {
                    student_id: row.get(0)?,
                    name: row.get(1)?,
                    gender: gender_from_str(&row.get::<_, String>(2)?),
                    batch_no: row.get(3)?,
                    room_no: row.get(4)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(students)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gender;
    use crate::storage::Database;

    fn setup_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.students()
            .create_batch(&Batch::new("2024CS".into(), 3))
            .unwrap();
        db
    }

    #[test]
    fn test_unallocated_filters_and_orders() {
        let db = setup_db();
        db.hostels()
            .create(&crate::models::Hostel::new(
                "BR".into(),
                "Brahmaputra".into(),
                crate::models::HostelType::Boys,
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

        for (id, name) in [("s3", "Charu"), ("s1", "Arun"), ("s2", "Bala")] {
            db.students()
                .create(&Student::new(
                    id.into(),
                    name.into(),
                    Gender::Male,
                    "2024CS".into(),
                ))
                .unwrap();
        }
        db.conn
            .execute(
                "UPDATE students SET room_no = 'BR-1-101' WHERE student_id = 's1'",
                [],
            )
            .unwrap();

        let unallocated = db.students().list_unallocated("2024CS").unwrap();
        let ids: Vec<&str> = unallocated.iter().map(|s| s.student_id.as_str()).collect();
        assert_eq!(ids, ["s3", "s2"]);
    }

    #[test]
    fn test_unrecognized_gender_degrades() {
        let db = setup_db();
        db.conn
            .execute(
                "INSERT INTO students (student_id, name, gender, batch_no) VALUES ('s9', 'Kiran', 'X', '2024CS')",
                [],
            )
            .unwrap();

        let student = db.students().find_by_id("s9").unwrap().unwrap();
        assert_eq!(student.gender, Gender::Other);
    }
}

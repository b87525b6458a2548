//! Hostel storage operations

use rusqlite::{params, Connection};
use tracing::instrument;

use super::parse::{hostel_type_from_str, OptionalExt};
use crate::error::Result;
use crate::models::{Hostel, HostelVacancy};

pub struct HostelStore<'a> {
    conn: &'a Connection,
}

impl<'a> HostelStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Create a new hostel
    #[instrument(skip(self, hostel), fields(hostel_no = %hostel.hostel_no))]
    pub fn create(&self, hostel: &Hostel) -> Result<()> {
        self.conn.execute(
            "INSERT INTO hostels (hostel_no, name, hostel_type, capacity) VALUES (?1, ?2, ?3, ?4)",
            params![
                hostel.hostel_no,
                hostel.name,
                hostel.hostel_type.as_str(),
                hostel.capacity,
            ],
        )?;
        Ok(())
    }

    /// Find hostel by its code
    #[instrument(skip(self))]
    pub fn find_by_no(&self, hostel_no: &str) -> Result<Option<Hostel>> {
        let mut stmt = self.conn.prepare(
            "SELECT hostel_no, name, hostel_type, capacity FROM hostels WHERE hostel_no = ?1",
        )?;

        let hostel = stmt
            .query_row(params![hostel_no], |row| {
                Ok(Hostel {
                    hostel_no: row.get(0)?,
                    name: row.get(1)?,
                    hostel_type: hostel_type_from_str(&row.get::<_, String>(2)?)?,
                    capacity: row.get(3)?,
                })
            })
            .optional()?;

        Ok(hostel)
    }

    /// List all hostels
    #[instrument(skip(self))]
    pub fn list(&self) -> Result<Vec<Hostel>> {
        let mut stmt = self.conn.prepare(
            "SELECT hostel_no, name, hostel_type, capacity FROM hostels ORDER BY hostel_no",
        )?;

        let hostels = stmt
            .query_map([], |row| {
                Ok(Hostel {
                    hostel_no: row.get(0)?,
                    name: row.get(1)?,
                    hostel_type: hostel_type_from_str(&row.get::<_, String>(2)?)?,
                    capacity: row.get(3)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(hostels)
    }

    /// Free beds across one hostel, recomputed on every call
    #[instrument(skip(self))]
    pub fn unoccupied_beds(&self, hostel_no: &str) -> Result<u32> {
        let total: u32 = self.conn.query_row(
            "SELECT COALESCE(SUM(room_occupancy - current_occupancy), 0)
             FROM rooms WHERE hostel_no = ?1",
            params![hostel_no],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    /// Vacancy summary for every hostel
    #[instrument(skip(self))]
    pub fn vacancy_overview(&self) -> Result<Vec<HostelVacancy>> {
        let mut stmt = self.conn.prepare(
            "SELECT h.hostel_no, h.name, h.hostel_type,
                    COALESCE(SUM(r.room_occupancy - r.current_occupancy), 0)
             FROM hostels h
             LEFT JOIN rooms r ON r.hostel_no = h.hostel_no
             GROUP BY h.hostel_no
             ORDER BY h.hostel_no",
        )?;

        let overview = stmt
            .query_map([], |row| {
                Ok(HostelVacancy {
                    hostel_no: row.get(0)?,
                    name: row.get(1)?,
                    hostel_type: hostel_type_from_str(&row.get::<_, String>(2)?)?,
                    unoccupied_beds: row.get(3)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(overview)
    }

    /// Vacancy summary restricted to hostels that still have free beds
    #[instrument(skip(self))]
    pub fn vacancy_overview_available(&self) -> Result<Vec<HostelVacancy>> {
        let overview = self.vacancy_overview()?;
        Ok(overview
            .into_iter()
            .filter(|h| h.unoccupied_beds > 0)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HostelType;
    use crate::storage::Database;

    #[test]
    fn test_create_and_find() {
        let db = Database::open_in_memory().unwrap();
        let hostel = Hostel::new("BR".into(), "Brahmaputra".into(), HostelType::Boys, 234);
        db.hostels().create(&hostel).unwrap();

        let found = db.hostels().find_by_no("BR").unwrap().unwrap();
        assert_eq!(found.name, "Brahmaputra");
        assert_eq!(found.hostel_type, HostelType::Boys);

        assert!(db.hostels().find_by_no("XX").unwrap().is_none());
    }

    #[test]
    fn test_vacancy_sums_over_rooms() {
        let db = Database::open_in_memory().unwrap();
        db.hostels()
            .create(&Hostel::new(
                "BR".into(),
                "Brahmaputra".into(),
                HostelType::Boys,
                6,
            ))
            .unwrap();

        for (room_no, beds, taken) in [("BR-1-101", 2, 1), ("BR-1-102", 2, 2), ("BR-1-103", 2, 0)]
        {
            db.conn
                .execute(
                    "INSERT INTO rooms (room_no, hostel_no, floor, room_occupancy, current_occupancy)
                     VALUES (?1, 'BR', 1, ?2, ?3)",
                    params![room_no, beds, taken],
                )
                .unwrap();
        }

        assert_eq!(db.hostels().unoccupied_beds("BR").unwrap(), 3);

        let overview = db.hostels().vacancy_overview().unwrap();
        assert_eq!(overview.len(), 1);
        assert_eq!(overview[0].unoccupied_beds, 3);
    }

    #[test]
    fn test_available_filter_drops_full_hostels() {
        let db = Database::open_in_memory().unwrap();
        db.hostels()
            .create(&Hostel::new(
                "CH".into(),
                "Chenab".into(),
                HostelType::Girls,
                2,
            ))
            .unwrap();
        db.conn
            .execute(
                "INSERT INTO rooms (room_no, hostel_no, floor, room_occupancy, current_occupancy)
                 VALUES ('CH-1-101', 'CH', 1, 2, 2)",
                [],
            )
            .unwrap();

        assert!(db.hostels().vacancy_overview_available().unwrap().is_empty());
    }
}

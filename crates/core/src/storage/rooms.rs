//! Room storage operations
//!
//! Room rows are provisioned at setup time; occupancy is the only column
//! that changes afterwards, and only through the allocation commit path.

use rusqlite::{params, Connection};
use tracing::instrument;

use super::parse::OptionalExt;
use crate::error::Result;
use crate::models::Room;

pub struct RoomStore<'a> {
    conn: &'a Connection,
}

impl<'a> RoomStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Create a new room
    #[instrument(skip(self, room), fields(room_no = %room.room_no))]
    pub fn create(&self, room: &Room) -> Result<()> {
        self.conn.execute(
            "INSERT INTO rooms (room_no, hostel_no, floor, room_occupancy, current_occupancy)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                room.room_no,
                room.hostel_no,
                room.floor,
                room.room_occupancy,
                room.current_occupancy,
            ],
        )?;
        Ok(())
    }

    /// Find room by its code
    #[instrument(skip(self))]
    pub fn find_by_no(&self, room_no: &str) -> Result<Option<Room>> {
        let mut stmt = self.conn.prepare(
            "SELECT room_no, hostel_no, floor, room_occupancy, current_occupancy
             FROM rooms WHERE room_no = ?1",
        )?;

        let room = stmt
            .query_row(params![room_no], |row| {
                Ok(Room {
                    room_no: row.get(0)?,
                    hostel_no: row.get(1)?,
                    floor: row.get(2)?,
                    room_occupancy: row.get(3)?,
                    current_occupancy: row.get(4)?,
                })
            })
            .optional()?;

        Ok(room)
    }

    /// List a hostel's rooms in insertion order
    ///
    /// The allocation engine fills rooms in exactly this order.
    #[instrument(skip(self))]
    pub fn list_for_hostel(&self, hostel_no: &str) -> Result<Vec<Room>> {
        let mut stmt = self.conn.prepare(
            "SELECT room_no, hostel_no, floor, room_occupancy, current_occupancy
             FROM rooms WHERE hostel_no = ?1 ORDER BY rowid",
        )?;

        let rooms = stmt
            .query_map(params![hostel_no], |row| {
                Ok(Room {
                    room_no: row.get(0)?,
                    hostel_no: row.get(1)?,
                    floor: row.get(2)?,
                    room_occupancy: row.get(3)?,
                    current_occupancy: row.get(4)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rooms)
    }

    /// List a hostel's rooms that still have free beds
    #[instrument(skip(self))]
    pub fn list_vacant_for_hostel(&self, hostel_no: &str) -> Result<Vec<Room>> {
        let mut stmt = self.conn.prepare(
            "SELECT room_no, hostel_no, floor, room_occupancy, current_occupancy
             FROM rooms
             WHERE hostel_no = ?1 AND current_occupancy < room_occupancy
             ORDER BY rowid",
        )?;

        let rooms = stmt
            .query_map(params![hostel_no], |row| {
                Ok(Room {
                    room_no: row.get(0)?,
                    hostel_no: row.get(1)?,
                    floor: row.get(2)?,
                    room_occupancy: row.get(3)?,
                    current_occupancy: row.get(4)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rooms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Hostel, HostelType};
    use crate::storage::Database;

    fn setup_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.hostels()
            .create(&Hostel::new(
                "BR".into(),
                "Brahmaputra".into(),
                HostelType::Boys,
                8,
            ))
            .unwrap();
        db
    }

    #[test]
    fn test_listing_preserves_insertion_order() {
        let db = setup_db();
        for room_no in ["BR-2-201", "BR-1-101", "BR-3-301"] {
            db.rooms()
                .create(&Room::new(room_no.into(), "BR".into(), 1, 2))
                .unwrap();
        }

        let rooms = db.rooms().list_for_hostel("BR").unwrap();
        let order: Vec<&str> = rooms.iter().map(|r| r.room_no.as_str()).collect();
        assert_eq!(order, ["BR-2-201", "BR-1-101", "BR-3-301"]);
    }

    #[test]
    fn test_vacant_listing_excludes_full_rooms() {
        let db = setup_db();
        db.rooms()
            .create(&Room::new("BR-1-101".into(), "BR".into(), 1, 2))
            .unwrap();
        db.rooms()
            .create(&Room::new("BR-1-102".into(), "BR".into(), 1, 2))
            .unwrap();
        db.conn
            .execute(
                "UPDATE rooms SET current_occupancy = 2 WHERE room_no = 'BR-1-101'",
                [],
            )
            .unwrap();

        let vacant = db.rooms().list_vacant_for_hostel("BR").unwrap();
        assert_eq!(vacant.len(), 1);
        assert_eq!(vacant[0].room_no, "BR-1-102");
    }

    #[test]
    fn test_occupancy_check_constraint() {
        let db = setup_db();
        db.rooms()
            .create(&Room::new("BR-1-101".into(), "BR".into(), 1, 2))
            .unwrap();

        // Pushing occupancy past capacity violates the table constraint
        let over = db.conn.execute(
            "UPDATE rooms SET current_occupancy = 3 WHERE room_no = 'BR-1-101'",
            [],
        );
        assert!(over.is_err());
    }
}

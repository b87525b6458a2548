//! Demo data provisioning
//!
//! Sets up a small campus: two single-gender hostels and one mixed
//! hostel with double rooms, two batches of students, and a pair of
//! internship applications at the start of the chain.

use domus_core::{
    Batch, Database, Gender, Hostel, HostelType, InternshipApplication, Result, Room, Student,
};
use tracing::{info, warn};

/// Rooms per floor in the seeded hostels
const ROOMS_PER_FLOOR: u32 = 6;
/// Beds per seeded room
const BEDS_PER_ROOM: u32 = 2;

pub fn run(db: &Database) -> Result<()> {
    if db.hostels().find_by_no("BR")?.is_some() {
        warn!("Database already seeded, leaving it untouched");
        return Ok(());
    }

    let hostels = [
        ("BR", "Brahmaputra", HostelType::Boys, 3),
        ("CH", "Chenab", HostelType::Girls, 3),
        ("ST", "Sutlej", HostelType::Mixed, 2),
    ];

    for (hostel_no, name, hostel_type, floors) in hostels {
        let capacity = floors * ROOMS_PER_FLOOR * BEDS_PER_ROOM;
        db.hostels().create(&Hostel::new(
            hostel_no.into(),
            name.into(),
            hostel_type,
            capacity,
        ))?;

        for floor in 1..=floors {
            for room in 101..101 + ROOMS_PER_FLOOR {
                db.rooms().create(&Room::new(
                    format!("{hostel_no}-{floor}-{room}"),
                    hostel_no.into(),
                    floor,
                    BEDS_PER_ROOM,
                ))?;
            }
        }
        info!(hostel_no, name, "Hostel provisioned");
    }

    let students: &[(&str, &str, Gender, &str)] = &[
        ("2023CSB1041", "Arun Mehta", Gender::Male, "2023CS"),
        ("2023CSB1042", "Bala Krishnan", Gender::Male, "2023CS"),
        ("2023CSB1043", "Charu Verma", Gender::Female, "2023CS"),
        ("2024CSB1011", "Divya Pillai", Gender::Female, "2024CS"),
        ("2024CSB1012", "Eshan Gupta", Gender::Male, "2024CS"),
        ("2024CSB1013", "Farah Khan", Gender::Female, "2024CS"),
    ];

    for batch_no in ["2023CS", "2024CS"] {
        let count = students.iter().filter(|(_, _, _, b)| *b == batch_no).count();
        db.students()
            .create_batch(&Batch::new(batch_no.into(), count as u32))?;
    }
    for (student_id, name, gender, batch_no) in students {
        db.students().create(&Student::new(
            (*student_id).into(),
            (*name).into(),
            *gender,
            (*batch_no).into(),
        ))?;
    }
    info!(count = students.len(), "Students enrolled");

    let applications = [
        ("Gita Rao", "gita@example.edu", Gender::Female),
        ("Harsh Patel", "harsh@example.edu", Gender::Male),
    ];
    for (name, email, gender) in applications {
        db.applications().create(&InternshipApplication::new(
            name.into(),
            email.into(),
            gender,
            "mentor@example.edu".into(),
        ))?;
    }
    info!(count = applications.len(), "Internship applications filed");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_provisions_campus() {
        let db = Database::open_in_memory().unwrap();
        run(&db).unwrap();

        assert_eq!(db.hostels().list().unwrap().len(), 3);
        assert_eq!(db.rooms().list_for_hostel("BR").unwrap().len(), 18);
        assert_eq!(db.hostels().unoccupied_beds("BR").unwrap(), 36);
        assert_eq!(db.students().list_batches().unwrap().len(), 2);
        assert_eq!(db.students().list_unallocated("2024CS").unwrap().len(), 3);
    }

    #[test]
    fn test_seed_is_refused_on_seeded_database() {
        let db = Database::open_in_memory().unwrap();
        run(&db).unwrap();
        run(&db).unwrap();

        // Second run must not duplicate anything
        assert_eq!(db.hostels().list().unwrap().len(), 3);
    }
}

//! Developer guardrails and invariants
//!
//! Debug assertions for detecting impossible states during development.
//! These checks are compiled out in release builds.

use crate::models::{ApplicationStatus, Hostel, Room};

/// Validate that a Room's state is internally consistent
pub fn assert_room_invariants(room: &Room) {
    debug_assert!(
        room.current_occupancy <= room.room_occupancy,
        "Room {} holds {} in {} beds",
        room.room_no,
        room.current_occupancy,
        room.room_occupancy
    );

    debug_assert!(
        !room.room_no.trim().is_empty(),
        "Room in hostel {} has empty room_no",
        room.hostel_no
    );

    debug_assert!(
        !room.hostel_no.trim().is_empty(),
        "Room {} has empty hostel_no",
        room.room_no
    );
}

/// Validate that a Hostel's state is internally consistent
pub fn assert_hostel_invariants(hostel: &Hostel) {
    debug_assert!(
        !hostel.hostel_no.trim().is_empty(),
        "Hostel '{}' has empty hostel_no",
        hostel.name
    );

    debug_assert!(
        !hostel.name.trim().is_empty(),
        "Hostel {} has empty name",
        hostel.hostel_no
    );
}

/// Is `from → to` a move the approval chain can legally make?
pub fn is_legal_transition(from: ApplicationStatus, to: ApplicationStatus) -> bool {
    use ApplicationStatus::*;
    matches!(
        (from, to),
        (PendingFaculty, PendingHod)
            | (PendingFaculty, RejectedByFaculty)
            | (PendingHod, ApprovedByHod)
            | (PendingHod, RejectedByHod)
            | (ApprovedByHod, ApprovedByAdmin)
            | (ApprovedByAdmin, ApprovedByCaretaker)
    )
}

/// Validate a status move before it is persisted
pub fn assert_status_transition(from: ApplicationStatus, to: ApplicationStatus) {
    debug_assert!(
        is_legal_transition(from, to),
        "Illegal status transition '{}' -> '{}'",
        from,
        to
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HostelType;

    #[test]
    fn test_valid_room() {
        let mut room = Room::new("BR-1-101".into(), "BR".into(), 1, 2);
        assert_room_invariants(&room);
        room.current_occupancy = 2;
        assert_room_invariants(&room);
    }

    #[test]
    #[should_panic(expected = "beds")]
    fn test_overfull_room_panics() {
        let mut room = Room::new("BR-1-101".into(), "BR".into(), 1, 2);
        room.current_occupancy = 3;
        assert_room_invariants(&room);
    }

    #[test]
    fn test_valid_hostel() {
        let hostel = Hostel::new("BR".into(), "Brahmaputra".into(), HostelType::Boys, 200);
        assert_hostel_invariants(&hostel);
    }

    #[test]
    fn test_legal_transitions() {
        use ApplicationStatus::*;
        assert!(is_legal_transition(PendingFaculty, PendingHod));
        assert!(is_legal_transition(PendingHod, RejectedByHod));
        assert!(is_legal_transition(ApprovedByAdmin, ApprovedByCaretaker));

        assert!(!is_legal_transition(PendingFaculty, ApprovedByAdmin));
        assert!(!is_legal_transition(RejectedByFaculty, PendingHod));
        assert!(!is_legal_transition(ApprovedByCaretaker, ApprovedByAdmin));
    }
}

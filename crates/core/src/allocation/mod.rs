//! Room allocation engine
//!
//! Deterministic first-fit assignment of unallocated students or
//! admin-approved internship applicants to a hostel's rooms. Rooms are
//! filled in fetched order from the front of the gender-eligible list;
//! each room's assignments are committed as one transaction before the
//! next room is touched, so partial progress survives a mid-run failure.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::Result;
use crate::invariants::assert_room_invariants;
use crate::models::{Gender, HostelType};
use crate::storage::AllocationStore;

/// Which pool of unallocated entities one allocation call draws from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CohortSelector {
    /// Regular students of one admission batch
    Batch(String),
    /// Internship applicants approved by the admin and not yet housed
    InternshipPool,
}

impl std::fmt::Display for CohortSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CohortSelector::Batch(batch_no) => write!(f, "batch {batch_no}"),
            CohortSelector::InternshipPool => write!(f, "internship pool"),
        }
    }
}

/// Identity of an allocatable entity
///
/// Students and internship applications live in separate identity spaces;
/// the commit path dispatches on this to update the right table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CandidateId {
    Student(String),
    Application(Uuid),
}

impl std::fmt::Display for CandidateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CandidateId::Student(id) => write!(f, "{id}"),
            CandidateId::Application(id) => write!(f, "{id}"),
        }
    }
}

/// An allocatable entity as the engine sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    pub gender: Gender,
}

/// Result of one allocation call
///
/// The two non-`Allocated` variants are defined outcomes, not errors;
/// neither leaves any state change behind.
#[derive(Debug, Clone)]
pub enum AllocationOutcome {
    /// At least the engine ran to completion; carries the cohort snapshot
    /// fetched at the start of the call (assigned or not) and the number
    /// of beds handed out.
    Allocated {
        updated: Vec<Candidate>,
        assigned: usize,
    },
    /// The cohort had no unallocated entities, or the hostel has no rooms
    NothingToAllocate,
    /// The cohort is nonempty but nobody passes the gender filter
    NoEligibleByGender,
}

impl AllocationOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(self, AllocationOutcome::Allocated { .. })
    }

    /// Human-readable reason for the two defined failure outcomes
    pub fn failure_message(&self) -> Option<&'static str> {
        match self {
            AllocationOutcome::Allocated { .. } => None,
            AllocationOutcome::NothingToAllocate => Some("Failed to allocate rooms."),
            AllocationOutcome::NoEligibleByGender => {
                Some("No students to allocate based on gender.")
            }
        }
    }
}

/// Does this gender pass the hostel's admission rule?
///
/// Mixed admits everyone; Boys and Girls admit exactly one gender, and
/// anything else never matches.
pub fn gender_matches(gender: Gender, hostel_type: HostelType) -> bool {
    match hostel_type {
        HostelType::Mixed => true,
        HostelType::Boys => gender == Gender::Male,
        HostelType::Girls => gender == Gender::Female,
    }
}

/// Allocate a cohort into one hostel's rooms.
///
/// `hostel_type` is the caller's admission filter; it is taken as given
/// and not re-checked against the stored hostel record. Rooms fill in
/// fetched order, first-fit from the front of the eligible list, one
/// committed transaction per room. A commit failure propagates after the
/// rooms already committed; they stay allocated.
#[instrument(skip(store), fields(cohort = %selector))]
pub fn allocate<S: AllocationStore>(
    store: &S,
    selector: &CohortSelector,
    hostel_no: &str,
    hostel_type: HostelType,
) -> Result<AllocationOutcome> {
    let cohort = store.fetch_unallocated(selector)?;
    let rooms = store.fetch_rooms(hostel_no)?;

    if cohort.is_empty() || rooms.is_empty() {
        info!(hostel_no, "Nothing to allocate");
        return Ok(AllocationOutcome::NothingToAllocate);
    }

    // Partition once up front; a cursor walks the eligible list so no
    // collection is mutated while rooms iterate.
    let eligible: Vec<&Candidate> = cohort
        .iter()
        .filter(|c| gender_matches(c.gender, hostel_type))
        .collect();

    if eligible.is_empty() {
        info!(hostel_no, "No candidates pass the gender filter");
        return Ok(AllocationOutcome::NoEligibleByGender);
    }

    let mut next = 0usize;
    let mut assigned = 0usize;

    for room in &rooms {
        assert_room_invariants(room);
        if next >= eligible.len() {
            break;
        }
        if room.is_full() {
            continue;
        }

        let end = (next + room.free_beds() as usize).min(eligible.len());
        let wave: Vec<Candidate> = eligible[next..end].iter().map(|c| (*c).clone()).collect();
        let taken = store.commit_assignments(&room.room_no, &wave)?;
        // taken falls short of the wave when the room had less capacity
        // than fetched; the remainder stays for the following rooms.
        next += taken;
        assigned += taken;
    }

    info!(hostel_no, assigned, "Room allocation complete");
    Ok(AllocationOutcome::Allocated {
        updated: cohort,
        assigned,
    })
}

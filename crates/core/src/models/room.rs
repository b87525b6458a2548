//! Room model

use serde::{Deserialize, Serialize};

/// A single room within a hostel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    /// Unique room code, e.g. "BR-3-104"
    pub room_no: String,
    pub hostel_no: String,
    pub floor: u32,
    /// Number of beds in the room
    pub room_occupancy: u32,
    /// Beds currently taken; never exceeds `room_occupancy`
    pub current_occupancy: u32,
}

impl Room {
    pub fn new(room_no: String, hostel_no: String, floor: u32, room_occupancy: u32) -> Self {
        Self {
            room_no,
            hostel_no,
            floor,
            room_occupancy,
            current_occupancy: 0,
        }
    }

    pub fn free_beds(&self) -> u32 {
        self.room_occupancy.saturating_sub(self.current_occupancy)
    }

    pub fn is_full(&self) -> bool {
        self.current_occupancy >= self.room_occupancy
    }
}

//! Data models for Domus

mod application;
mod hostel;
mod room;
mod student;

pub use application::*;
pub use hostel::*;
pub use room::*;
pub use student::*;

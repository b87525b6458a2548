//! Domus Core Library
//!
//! Core models, permissions, allocation engine, approval chain, and
//! storage for the Domus hostel accommodation platform.

pub mod allocation;
pub mod approval;
pub mod error;
pub mod invariants;
pub mod models;
pub mod notify;
pub mod permissions;
pub mod storage;

pub use allocation::{
    allocate, gender_matches, AllocationOutcome, Candidate, CandidateId, CohortSelector,
};
pub use approval::{ApprovalChain, ChainContacts};
pub use error::{Error, Result};
pub use models::*;
pub use notify::{LogNotifier, Notice, Notifier};
pub use permissions::{Actor, HostelAction, PermissionMatrix, Role};
pub use storage::{
    AllocationStore, ApplicationRepository, Database, HostelRepository, Storage,
    StudentRepository,
};

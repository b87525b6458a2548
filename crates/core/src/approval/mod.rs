//! Internship application approval chain
//!
//! Faculty → HOD → admin → caretaker. Each transition is a role-gated
//! status move persisted through the application repository; the HOD and
//! admin hand-offs also produce a notice for the next reviewer. Only the
//! caretaker stage touches rooms, and it does so through the same atomic
//! commit primitive the allocation engine uses.

use tracing::{info, instrument};
use uuid::Uuid;

use crate::allocation::{Candidate, CandidateId};
use crate::error::{Error, Result};
use crate::invariants::assert_status_transition;
use crate::models::{ApplicationStatus, InternshipApplication};
use crate::notify::{Notice, Notifier};
use crate::permissions::{Actor, HostelAction, PermissionMatrix};
use crate::storage::{AllocationStore, ApplicationRepository, HostelRepository};

/// Where hand-off notices go
///
/// Supplied by configuration; the chain never reads ambient state to
/// find its reviewers.
#[derive(Debug, Clone)]
pub struct ChainContacts {
    pub hod_email: String,
    pub admin_email: String,
}

/// The approval chain over a storage backend and a notifier
pub struct ApprovalChain<'a, S, N> {
    store: &'a S,
    notifier: &'a N,
    contacts: ChainContacts,
}

impl<'a, S, N> ApprovalChain<'a, S, N>
where
    S: ApplicationRepository + HostelRepository + AllocationStore,
    N: Notifier,
{
    pub fn new(store: &'a S, notifier: &'a N, contacts: ChainContacts) -> Self {
        Self {
            store,
            notifier,
            contacts,
        }
    }

    fn authorize(&self, actor: &Actor, action: HostelAction) -> Result<()> {
        if !PermissionMatrix::can_perform(actor.role, action) {
            return Err(Error::PermissionDenied(format!(
                "{} ({}) may not perform this action",
                actor.name, actor.role
            )));
        }
        Ok(())
    }

    fn load(&self, id: Uuid) -> Result<InternshipApplication> {
        self.store
            .find_application(id)?
            .ok_or_else(|| Error::NotFound(format!("application {id}")))
    }

    fn expect_status(
        application: &InternshipApplication,
        expected: ApplicationStatus,
    ) -> Result<()> {
        if application.status != expected {
            return Err(Error::InvalidOperation(format!(
                "application {} is '{}', expected '{}'",
                application.id, application.status, expected
            )));
        }
        Ok(())
    }

    fn transition(&self, application: &InternshipApplication, to: ApplicationStatus) -> Result<()> {
        assert_status_transition(application.status, to);
        self.store.update_application_status(application.id, to)?;
        info!(
            application = %application.id,
            from = %application.status,
            to = %to,
            "Application moved along the chain"
        );
        Ok(())
    }

    /// Mentor accepts the application and forwards it to the HOD
    #[instrument(skip(self, actor), fields(actor = %actor.name))]
    pub fn faculty_approve(&self, actor: &Actor, id: Uuid) -> Result<()> {
        self.authorize(actor, HostelAction::FacultyReview)?;
        let application = self.load(id)?;
        Self::expect_status(&application, ApplicationStatus::PendingFaculty)?;

        self.transition(&application, ApplicationStatus::PendingHod)?;

        self.notifier.deliver(&Notice::new(
            self.contacts.hod_email.clone(),
            "New Internship Application for HOD Approval".into(),
            format!(
                "Dear HOD,\n\n\
                 A new internship application has been submitted by {} and approved by {}.\n\n\
                 Please review and approve the application.\n\n\
                 Thank you!",
                application.name, actor.name
            ),
        ))?;
        Ok(())
    }

    /// Mentor turns the application down; a terminal state
    #[instrument(skip(self, actor), fields(actor = %actor.name))]
    pub fn faculty_reject(&self, actor: &Actor, id: Uuid) -> Result<()> {
        self.authorize(actor, HostelAction::FacultyReview)?;
        let application = self.load(id)?;
        Self::expect_status(&application, ApplicationStatus::PendingFaculty)?;
        self.transition(&application, ApplicationStatus::RejectedByFaculty)
    }

    /// HOD accepts and forwards to the admin office
    #[instrument(skip(self, actor), fields(actor = %actor.name))]
    pub fn hod_approve(&self, actor: &Actor, id: Uuid) -> Result<()> {
        self.authorize(actor, HostelAction::HodReview)?;
        let application = self.load(id)?;
        Self::expect_status(&application, ApplicationStatus::PendingHod)?;

        self.transition(&application, ApplicationStatus::ApprovedByHod)?;

        self.notifier.deliver(&Notice::new(
            self.contacts.admin_email.clone(),
            "New Internship Application for Admin Approval".into(),
            format!(
                "Dear Admin,\n\n\
                 A new internship application has been submitted by {} and approved by {}.\n\n\
                 Please review and approve the application.\n\n\
                 Thank you!",
                application.name, actor.name
            ),
        ))?;
        Ok(())
    }

    /// HOD turns the application down; a terminal state
    #[instrument(skip(self, actor), fields(actor = %actor.name))]
    pub fn hod_reject(&self, actor: &Actor, id: Uuid) -> Result<()> {
        self.authorize(actor, HostelAction::HodReview)?;
        let application = self.load(id)?;
        Self::expect_status(&application, ApplicationStatus::PendingHod)?;
        self.transition(&application, ApplicationStatus::RejectedByHod)
    }

    /// Admin clears the application for housing
    ///
    /// From here the application is visible to the allocation engine's
    /// internship pool; no notice is sent.
    #[instrument(skip(self, actor), fields(actor = %actor.name))]
    pub fn admin_approve(&self, actor: &Actor, id: Uuid) -> Result<()> {
        self.authorize(actor, HostelAction::AdminReview)?;
        let application = self.load(id)?;
        Self::expect_status(&application, ApplicationStatus::ApprovedByHod)?;
        self.transition(&application, ApplicationStatus::ApprovedByAdmin)
    }

    /// Caretaker houses one admin-approved applicant in a named room
    ///
    /// Room assignment, status move, and the occupancy increment commit
    /// as one unit. A full room is refused rather than over-filled.
    #[instrument(skip(self, actor), fields(actor = %actor.name))]
    pub fn caretaker_assign(&self, actor: &Actor, id: Uuid, room_no: &str) -> Result<()> {
        self.authorize(actor, HostelAction::AssignInternRoom)?;
        let application = self.load(id)?;
        Self::expect_status(&application, ApplicationStatus::ApprovedByAdmin)?;

        let room = self
            .store
            .find_room(room_no)?
            .ok_or_else(|| Error::NotFound(format!("room {room_no}")))?;

        let candidate = Candidate {
            id: CandidateId::Application(application.id),
            name: application.name.clone(),
            gender: application.gender,
        };
        let taken = self.store.commit_assignments(room_no, &[candidate])?;
        if taken == 0 {
            return Err(Error::InvalidOperation(format!(
                "room {room_no} has no free beds"
            )));
        }

        info!(application = %application.id, room_no, "Applicant housed");

        self.notifier.deliver(&Notice::new(
            application.email.clone(),
            "Internship Application Approved and Room Allocated".into(),
            format!(
                "Dear {},\n\n\
                 Your internship application has been approved by the caretaker.\n\
                 You have been allocated room number {} in hostel {}.\n\n\
                 Thank you!",
                application.name, room_no, room.hostel_no
            ),
        ))?;
        Ok(())
    }
}

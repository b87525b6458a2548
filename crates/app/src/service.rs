//! Service glue between the wire protocol and the core
//!
//! Converts decoupled wire types to core types at the boundary, applies
//! the permission matrix, and turns core results back into responses.
//! Every failure becomes a structured `Response::Error`; nothing panics
//! across the wire.

use std::sync::{Arc, Mutex};

use domus_core::{
    allocate, Actor, AllocationOutcome, ApplicationStatus, ApprovalChain, Candidate,
    ChainContacts, CohortSelector, Database, Error, HostelAction, HostelType,
    InternshipApplication, LogNotifier, PermissionMatrix, Role,
};
use domus_net::{
    ActorInfo, ApplicationInfo, CohortSpec, EntityInfo, HostelKind, Request, RequestHandler,
    Response, RoleKind, VacancyInfo,
};

/// The Domus service: one handler shared by all connections
pub struct HostelService {
    db: Arc<Mutex<Database>>,
    notifier: LogNotifier,
    contacts: ChainContacts,
}

impl HostelService {
    pub fn new(db: Arc<Mutex<Database>>, contacts: ChainContacts) -> Self {
        Self {
            db,
            notifier: LogNotifier,
            contacts,
        }
    }

    fn authorize(actor: &ActorInfo, action: HostelAction) -> Result<Actor, Error> {
        let actor = actor_from_wire(actor);
        if !PermissionMatrix::can_perform(actor.role, action) {
            return Err(Error::PermissionDenied(format!(
                "{} ({}) may not perform this action",
                actor.name, actor.role
            )));
        }
        Ok(actor)
    }

    fn dispatch(&self, request: Request) -> Result<Response, Error> {
        match request {
            Request::Ping => Ok(Response::Pong),

            Request::Allocate {
                actor,
                cohort,
                hostel_no,
                hostel_type,
            } => {
                let action = match cohort {
                    CohortSpec::Batch { .. } => HostelAction::RunBatchAllocation,
                    CohortSpec::InternshipPool => HostelAction::RunInternAllocation,
                };
                Self::authorize(&actor, action)?;

                let selector = cohort_from_wire(&cohort);
                let db = self.db.lock().unwrap();
                let outcome = allocate(
                    &*db,
                    &selector,
                    &hostel_no,
                    hostel_type_from_wire(hostel_type),
                )?;

                Ok(match outcome {
                    AllocationOutcome::Allocated { updated, .. } => Response::Allocation {
                        success: true,
                        message: None,
                        updated_entities: Some(updated.iter().map(entity_to_wire).collect()),
                    },
                    other => Response::Allocation {
                        success: false,
                        message: other.failure_message().map(str::to_owned),
                        updated_entities: None,
                    },
                })
            }

            Request::AssignIntern {
                actor,
                application_id,
                room_no,
            } => {
                let actor = Self::authorize(&actor, HostelAction::AssignInternRoom)?;
                let db = self.db.lock().unwrap();
                let chain = ApprovalChain::new(&*db, &self.notifier, self.contacts.clone());
                chain.caretaker_assign(&actor, application_id, &room_no)?;
                Ok(Response::Assigned { room_no })
            }

            Request::VacancyOverview { actor } => {
                Self::authorize(&actor, HostelAction::ViewOccupancy)?;
                let db = self.db.lock().unwrap();
                let hostels = db
                    .hostels()
                    .vacancy_overview()?
                    .into_iter()
                    .map(|v| VacancyInfo {
                        hostel_no: v.hostel_no,
                        name: v.name,
                        hostel_type: hostel_type_to_wire(v.hostel_type),
                        unoccupied_beds: v.unoccupied_beds,
                    })
                    .collect();
                Ok(Response::Vacancies { hostels })
            }

            Request::UnallocatedStudents { actor, batch_no } => {
                Self::authorize(&actor, HostelAction::ViewOccupancy)?;
                let db = self.db.lock().unwrap();
                let students = db
                    .students()
                    .list_unallocated(&batch_no)?
                    .into_iter()
                    .map(|s| EntityInfo {
                        id: s.student_id,
                        name: s.name,
                        gender: s.gender.as_str().into(),
                    })
                    .collect();
                Ok(Response::Students { students })
            }

            Request::PendingApplications { actor, status } => {
                let status = ApplicationStatus::from_str(&status).ok_or_else(|| {
                    Error::InvalidOperation(format!("unknown application status: {status}"))
                })?;
                Self::authorize(&actor, queue_action(status))?;

                let db = self.db.lock().unwrap();
                let applications = db
                    .applications()
                    .list_by_status(status)?
                    .iter()
                    .map(application_to_wire)
                    .collect();
                Ok(Response::Applications { applications })
            }
        }
    }
}

impl RequestHandler for HostelService {
    fn handle(&self, request: Request) -> Response {
        match self.dispatch(request) {
            Ok(response) => response,
            Err(e) => Response::Error {
                message: e.to_string(),
            },
        }
    }
}

/// Each review queue is gated by the role that owns it
fn queue_action(status: ApplicationStatus) -> HostelAction {
    match status {
        ApplicationStatus::PendingFaculty => HostelAction::FacultyReview,
        ApplicationStatus::PendingHod => HostelAction::HodReview,
        ApplicationStatus::ApprovedByHod => HostelAction::AdminReview,
        ApplicationStatus::ApprovedByAdmin => HostelAction::AssignInternRoom,
        // Terminal queues are ordinary staff dashboards
        _ => HostelAction::ViewOccupancy,
    }
}

fn cohort_from_wire(spec: &CohortSpec) -> CohortSelector {
    match spec {
        CohortSpec::Batch { batch_no } => CohortSelector::Batch(batch_no.clone()),
        CohortSpec::InternshipPool => CohortSelector::InternshipPool,
    }
}

fn actor_from_wire(info: &ActorInfo) -> Actor {
    Actor::new(info.name.clone(), role_from_wire(info.role))
}

fn role_from_wire(role: RoleKind) -> Role {
    match role {
        RoleKind::Student => Role::Student,
        RoleKind::Caretaker => Role::Caretaker,
        RoleKind::Faculty => Role::Faculty,
        RoleKind::Warden => Role::Warden,
        RoleKind::Hod => Role::Hod,
        RoleKind::Admin => Role::Admin,
    }
}

fn hostel_type_from_wire(kind: HostelKind) -> HostelType {
    match kind {
        HostelKind::Boys => HostelType::Boys,
        HostelKind::Girls => HostelType::Girls,
        HostelKind::Mixed => HostelType::Mixed,
    }
}

fn hostel_type_to_wire(hostel_type: HostelType) -> HostelKind {
    match hostel_type {
        HostelType::Boys => HostelKind::Boys,
        HostelType::Girls => HostelKind::Girls,
        HostelType::Mixed => HostelKind::Mixed,
    }
}

fn entity_to_wire(candidate: &Candidate) -> EntityInfo {
    EntityInfo {
        id: candidate.id.to_string(),
        name: candidate.name.clone(),
        gender: candidate.gender.as_str().into(),
    }
}

fn application_to_wire(application: &InternshipApplication) -> ApplicationInfo {
    ApplicationInfo {
        id: application.id,
        name: application.name.clone(),
        email: application.email.clone(),
        gender: application.gender.as_str().into(),
        status: application.status.as_str().into(),
        room_no: application.room_no.clone(),
        applied_at: application.applied_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domus_core::{Batch, Gender, Hostel, Room, Student};

    fn service_with_data() -> HostelService {
        let db = Database::open_in_memory().unwrap();
        db.hostels()
            .create(&Hostel::new(
                "BR".into(),
                "Brahmaputra".into(),
                HostelType::Boys,
                2,
            ))
            .unwrap();
        db.rooms()
            .create(&Room::new("BR-1-101".into(), "BR".into(), 1, 2))
            .unwrap();
        db.students()
            .create_batch(&Batch::new("2024CS".into(), 2))
            .unwrap();
        db.students()
            .create(&Student::new(
                "s1".into(),
                "Arun".into(),
                Gender::Male,
                "2024CS".into(),
            ))
            .unwrap();

        HostelService::new(
            Arc::new(Mutex::new(db)),
            ChainContacts {
                hod_email: "hod@example.edu".into(),
                admin_email: "admin@example.edu".into(),
            },
        )
    }

    fn caretaker() -> ActorInfo {
        ActorInfo {
            name: "Mr. Singh".into(),
            role: RoleKind::Caretaker,
        }
    }

    #[test]
    fn test_allocate_happy_path() {
        let service = service_with_data();
        let response = service.handle(Request::Allocate {
            actor: caretaker(),
            cohort: CohortSpec::Batch {
                batch_no: "2024CS".into(),
            },
            hostel_no: "BR".into(),
            hostel_type: HostelKind::Boys,
        });

        match response {
            Response::Allocation {
                success,
                updated_entities,
                ..
            } => {
                assert!(success);
                let entities = updated_entities.unwrap();
                assert_eq!(entities.len(), 1);
                assert_eq!(entities[0].id, "s1");
            }
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[test]
    fn test_allocate_empty_batch_reports_failure_message() {
        let service = service_with_data();
        let response = service.handle(Request::Allocate {
            actor: caretaker(),
            cohort: CohortSpec::Batch {
                batch_no: "1999ZZ".into(),
            },
            hostel_no: "BR".into(),
            hostel_type: HostelKind::Boys,
        });

        match response {
            Response::Allocation {
                success, message, ..
            } => {
                assert!(!success);
                assert_eq!(message.as_deref(), Some("Failed to allocate rooms."));
            }
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[test]
    fn test_students_may_not_allocate() {
        let service = service_with_data();
        let response = service.handle(Request::Allocate {
            actor: ActorInfo {
                name: "Arun".into(),
                role: RoleKind::Student,
            },
            cohort: CohortSpec::Batch {
                batch_no: "2024CS".into(),
            },
            hostel_no: "BR".into(),
            hostel_type: HostelKind::Boys,
        });

        assert!(matches!(response, Response::Error { .. }));
    }

    #[test]
    fn test_vacancy_overview() {
        let service = service_with_data();
        let response = service.handle(Request::VacancyOverview { actor: caretaker() });

        match response {
            Response::Vacancies { hostels } => {
                assert_eq!(hostels.len(), 1);
                assert_eq!(hostels[0].unoccupied_beds, 2);
            }
            other => panic!("unexpected response: {other:?}"),
        }
    }
}

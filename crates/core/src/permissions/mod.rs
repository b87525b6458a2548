//! Permission system for hostel operations

use serde::{Deserialize, Serialize};

/// Roles a user can hold
///
/// Warden and HOD are faculty members with additional duties, so both
/// carry every Faculty permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Student,
    Caretaker,
    Faculty,
    Warden,
    Hod,
    Admin,
}

impl Role {
    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Student => "Student",
            Role::Caretaker => "Caretaker",
            Role::Faculty => "Faculty",
            Role::Warden => "Warden",
            Role::Hod => "HOD",
            Role::Admin => "Admin",
        }
    }

    /// Faculty members including those with warden or HOD duties
    pub fn is_faculty(&self) -> bool {
        matches!(self, Role::Faculty | Role::Warden | Role::Hod)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// The caller of a role-gated operation
///
/// Always passed explicitly; nothing in the core derives identity from
/// ambient state.
#[derive(Debug, Clone)]
pub struct Actor {
    pub name: String,
    pub role: Role,
}

impl Actor {
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            role,
        }
    }
}

/// Actions that can be performed against the accommodation system
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostelAction {
    // Application lifecycle
    SubmitApplication,
    FacultyReview,
    HodReview,
    AdminReview,

    // Allocation
    AssignInternRoom,
    RunBatchAllocation,
    RunInternAllocation,

    // Read paths
    ViewOccupancy,

    // Provisioning
    ManageHostelSetup,
}

/// Permission matrix for hostel roles
pub struct PermissionMatrix;

impl PermissionMatrix {
    /// Check if a role has permission to perform an action
    pub fn can_perform(role: Role, action: HostelAction) -> bool {
        match action {
            // Students file applications; staff review them
            HostelAction::SubmitApplication => role == Role::Student,
            HostelAction::FacultyReview => role.is_faculty(),
            HostelAction::HodReview => role == Role::Hod,
            HostelAction::AdminReview => role == Role::Admin,

            // Caretakers own room-level assignment; wardens may run the
            // batch path for their hostel
            HostelAction::AssignInternRoom => role == Role::Caretaker,
            HostelAction::RunBatchAllocation => {
                matches!(role, Role::Warden | Role::Caretaker)
            }
            HostelAction::RunInternAllocation => role == Role::Caretaker,

            // Occupancy dashboards are staff-only
            HostelAction::ViewOccupancy => {
                matches!(role, Role::Caretaker | Role::Warden | Role::Hod | Role::Admin)
            }

            // Provisioning - Admin only
            HostelAction::ManageHostelSetup => role == Role::Admin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_chain_roles() {
        assert!(PermissionMatrix::can_perform(
            Role::Faculty,
            HostelAction::FacultyReview
        ));
        assert!(PermissionMatrix::can_perform(
            Role::Hod,
            HostelAction::FacultyReview
        ));
        assert!(!PermissionMatrix::can_perform(
            Role::Faculty,
            HostelAction::HodReview
        ));
        assert!(PermissionMatrix::can_perform(
            Role::Admin,
            HostelAction::AdminReview
        ));
        assert!(!PermissionMatrix::can_perform(
            Role::Caretaker,
            HostelAction::AdminReview
        ));
    }

    #[test]
    fn test_allocation_roles() {
        assert!(PermissionMatrix::can_perform(
            Role::Caretaker,
            HostelAction::RunInternAllocation
        ));
        assert!(PermissionMatrix::can_perform(
            Role::Warden,
            HostelAction::RunBatchAllocation
        ));
        assert!(!PermissionMatrix::can_perform(
            Role::Faculty,
            HostelAction::RunBatchAllocation
        ));
        assert!(!PermissionMatrix::can_perform(
            Role::Student,
            HostelAction::AssignInternRoom
        ));
    }

    #[test]
    fn test_student_permissions() {
        assert!(PermissionMatrix::can_perform(
            Role::Student,
            HostelAction::SubmitApplication
        ));
        assert!(!PermissionMatrix::can_perform(
            Role::Student,
            HostelAction::ViewOccupancy
        ));
    }
}

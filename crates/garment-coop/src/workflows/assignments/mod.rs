//! Project assignment ledger. Assigning a tailor marks them working, paying them out
//! returns them to idle, which is what the allocation engine sees on its next run.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Assignment, AssignmentId, AssignmentStatus, Project, ProjectId, ProjectProgress,
    ProjectStatus,
};
pub use repository::{AssignmentRepository, RepositoryError, RosterStatusStore};
pub use router::{assignment_router, AssignRequest, StatusRequest};
pub use service::{AssignmentError, AssignmentService, NewProject};

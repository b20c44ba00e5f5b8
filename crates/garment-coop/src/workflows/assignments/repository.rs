use crate::workflows::allocation::{AvailabilityProvider, TailorId, TailorStatus};

use super::domain::{Assignment, AssignmentId, Project, ProjectId};

/// Storage abstraction for projects and their assignments.
pub trait AssignmentRepository: Send + Sync {
    fn insert_project(&self, project: Project) -> Result<Project, RepositoryError>;
    fn project(&self, id: &ProjectId) -> Result<Option<Project>, RepositoryError>;
    fn update_project(&self, project: Project) -> Result<(), RepositoryError>;
    /// Stores every assignment or none of them.
    fn insert_all(&self, assignments: Vec<Assignment>) -> Result<Vec<Assignment>, RepositoryError>;
    fn update(&self, assignment: Assignment) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &AssignmentId) -> Result<Option<Assignment>, RepositoryError>;
    fn for_project(&self, id: &ProjectId) -> Result<Vec<Assignment>, RepositoryError>;
}

/// Writable roster status. Anything stored here is what the allocation engine reads back
/// as tailor availability.
pub trait RosterStatusStore: AvailabilityProvider {
    fn set_status(&self, id: &TailorId, status: TailorStatus) -> Result<(), RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

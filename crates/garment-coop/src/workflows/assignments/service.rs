use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::workflows::allocation::{
    AvailabilityError, AvailabilitySnapshot, GarmentCategory, OrderError, OrderRequest, TailorId,
    TailorStatus, TeamPlan,
};

use super::domain::{
    assigned_total, Assignment, AssignmentId, AssignmentStatus, Project, ProjectId,
    ProjectProgress, ProjectStatus,
};
use super::repository::{AssignmentRepository, RepositoryError, RosterStatusStore};

/// Records which tailor works on which project and keeps the roster status in step.
///
/// Writes go through one ledger lock, so the quota and idle checks of a commit hold until
/// its assignments are stored.
pub struct AssignmentService<R, S> {
    repository: Arc<R>,
    roster: Arc<S>,
    ledger_lock: Mutex<()>,
}

static PROJECT_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static ASSIGNMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_project_id() -> ProjectId {
    let id = PROJECT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ProjectId(format!("prj-{id:06}"))
}

fn next_assignment_id() -> AssignmentId {
    let id = ASSIGNMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AssignmentId(format!("asg-{id:06}"))
}

/// Intake payload for a new project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProject {
    pub name: String,
    pub category: GarmentCategory,
    pub quantity: u32,
    pub deadline: NaiveDate,
}

impl<R, S> AssignmentService<R, S>
where
    R: AssignmentRepository + 'static,
    S: RosterStatusStore + 'static,
{
    pub fn new(repository: Arc<R>, roster: Arc<S>) -> Self {
        Self {
            repository,
            roster,
            ledger_lock: Mutex::new(()),
        }
    }

    pub fn register_project(&self, intake: NewProject) -> Result<Project, AssignmentError> {
        let order = OrderRequest::new(intake.category, intake.quantity, intake.deadline)?;
        let project = Project {
            id: next_project_id(),
            name: intake.name,
            category: order.category,
            quantity: order.quantity,
            deadline: order.deadline,
            status: ProjectStatus::Ongoing,
        };

        let stored = self.repository.insert_project(project)?;
        info!(project = %stored.id, quantity = stored.quantity, "project registered");
        Ok(stored)
    }

    pub fn project(&self, project_id: &ProjectId) -> Result<Project, AssignmentError> {
        self.repository
            .project(project_id)?
            .ok_or_else(|| AssignmentError::ProjectNotFound(project_id.clone()))
    }

    /// Mark a project done. It accepts no further assignments; finishing twice is a no-op.
    pub fn complete_project(&self, project_id: &ProjectId) -> Result<Project, AssignmentError> {
        let _ledger = self.lock_ledger()?;
        let mut project = self.project(project_id)?;
        if project.status == ProjectStatus::Done {
            return Ok(project);
        }

        project.status = ProjectStatus::Done;
        self.repository.update_project(project.clone())?;
        info!(project = %project.id, "project completed");
        Ok(project)
    }

    /// Hand `pieces` of an ongoing project to an idle tailor, who becomes working.
    pub fn assign(
        &self,
        project_id: &ProjectId,
        tailor_id: &TailorId,
        pieces: u32,
    ) -> Result<Assignment, AssignmentError> {
        let mut created = self.commit(project_id, &[(tailor_id.clone(), pieces)])?;
        created.pop().ok_or(AssignmentError::ZeroPieces)
    }

    /// Record every member of a composed team who received pieces. The quota is checked for
    /// the whole plan before anything is written.
    pub fn commit_plan(
        &self,
        project_id: &ProjectId,
        plan: &TeamPlan,
    ) -> Result<Vec<Assignment>, AssignmentError> {
        let shares: Vec<(TailorId, u32)> = plan
            .members
            .iter()
            .filter(|member| member.assigned_pieces > 0)
            .map(|member| (member.tailor.profile.id.clone(), member.assigned_pieces))
            .collect();

        self.commit(project_id, &shares)
    }

    pub fn update_status(
        &self,
        assignment_id: &AssignmentId,
        status: AssignmentStatus,
    ) -> Result<Assignment, AssignmentError> {
        let _ledger = self.lock_ledger()?;
        let mut assignment = self
            .repository
            .fetch(assignment_id)?
            .ok_or_else(|| AssignmentError::AssignmentNotFound(assignment_id.clone()))?;

        let previous = assignment.status;
        assignment.status = status;
        self.repository.update(assignment.clone())?;

        if status == AssignmentStatus::Paid && previous != AssignmentStatus::Paid {
            self.roster
                .set_status(&assignment.tailor_id, TailorStatus::Idle)?;
            info!(
                assignment = %assignment.id,
                tailor = %assignment.tailor_id,
                "assignment paid, tailor released"
            );
        }

        Ok(assignment)
    }

    pub fn progress(&self, project_id: &ProjectId) -> Result<ProjectProgress, AssignmentError> {
        let project = self.project(project_id)?;
        let assignments = self.repository.for_project(project_id)?;
        Ok(ProjectProgress::from_assignments(&project, &assignments))
    }

    pub fn assignments(&self, project_id: &ProjectId) -> Result<Vec<Assignment>, AssignmentError> {
        self.project(project_id)?;
        Ok(self.repository.for_project(project_id)?)
    }

    fn commit(
        &self,
        project_id: &ProjectId,
        shares: &[(TailorId, u32)],
    ) -> Result<Vec<Assignment>, AssignmentError> {
        let _ledger = self.lock_ledger()?;
        let project = self.project(project_id)?;
        if !project.is_open() {
            return Err(AssignmentError::ProjectClosed(project_id.clone()));
        }
        if shares.is_empty() || shares.iter().any(|(_, pieces)| *pieces == 0) {
            return Err(AssignmentError::ZeroPieces);
        }

        let roster = self.roster.snapshot()?;
        ensure_idle(&roster, shares)?;

        let existing = self.repository.for_project(project_id)?;
        let remaining = project.quantity.saturating_sub(assigned_total(&existing));
        let requested = shares
            .iter()
            .fold(0u32, |total, (_, pieces)| total.saturating_add(*pieces));
        if requested > remaining {
            warn!(project = %project_id, requested, remaining, "assignment exceeds project quota");
            return Err(AssignmentError::OverCapacity {
                requested,
                remaining,
            });
        }

        self.occupy(shares)?;
        let batch = shares
            .iter()
            .map(|(tailor_id, pieces)| Assignment {
                id: next_assignment_id(),
                project_id: project_id.clone(),
                tailor_id: tailor_id.clone(),
                pieces: *pieces,
                status: AssignmentStatus::Assigned,
            })
            .collect();
        let created = match self.repository.insert_all(batch) {
            Ok(created) => created,
            Err(err) => {
                self.release(shares.iter().map(|(tailor_id, _)| tailor_id));
                return Err(err.into());
            }
        };

        for assignment in &created {
            info!(
                assignment = %assignment.id,
                project = %project_id,
                tailor = %assignment.tailor_id,
                pieces = assignment.pieces,
                "tailor assigned"
            );
        }
        Ok(created)
    }

    /// Marks every tailor working. On failure the tailors already flipped go back to idle.
    fn occupy(&self, shares: &[(TailorId, u32)]) -> Result<(), AssignmentError> {
        for (index, (tailor_id, _)) in shares.iter().enumerate() {
            if let Err(err) = self.roster.set_status(tailor_id, TailorStatus::Working) {
                warn!(tailor = %tailor_id, error = %err, "roster update failed, undoing commit");
                self.release(shares[..index].iter().map(|(earlier, _)| earlier));
                return Err(err.into());
            }
        }
        Ok(())
    }

    fn release<'a>(&self, tailors: impl Iterator<Item = &'a TailorId>) {
        for tailor_id in tailors {
            if let Err(err) = self.roster.set_status(tailor_id, TailorStatus::Idle) {
                warn!(tailor = %tailor_id, error = %err, "could not return tailor to idle");
            }
        }
    }

    fn lock_ledger(&self) -> Result<MutexGuard<'_, ()>, AssignmentError> {
        self.ledger_lock.lock().map_err(|_| {
            AssignmentError::Repository(RepositoryError::Unavailable(
                "assignment ledger lock poisoned".to_string(),
            ))
        })
    }
}

fn ensure_idle(
    roster: &AvailabilitySnapshot,
    shares: &[(TailorId, u32)],
) -> Result<(), AssignmentError> {
    for (index, (tailor_id, _)) in shares.iter().enumerate() {
        let repeated = shares[..index].iter().any(|(earlier, _)| earlier == tailor_id);
        if repeated || roster.status_of(tailor_id) == TailorStatus::Working {
            return Err(AssignmentError::TailorBusy(tailor_id.clone()));
        }
    }
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum AssignmentError {
    #[error("project {0} not found")]
    ProjectNotFound(ProjectId),
    #[error("project {0} is already done")]
    ProjectClosed(ProjectId),
    #[error("assignment {0} not found")]
    AssignmentNotFound(AssignmentId),
    #[error("an assignment needs at least one piece")]
    ZeroPieces,
    #[error("tailor {0} is already working")]
    TailorBusy(TailorId),
    #[error("over capacity: {requested} piece(s) requested but only {remaining} left")]
    OverCapacity { requested: u32, remaining: u32 },
    #[error(transparent)]
    InvalidOrder(#[from] OrderError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("roster unavailable: {0}")]
    Roster(#[from] AvailabilityError),
}

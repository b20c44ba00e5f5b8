use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::allocation::{
    AvailabilityError, AvailabilityProvider, AvailabilitySnapshot, GarmentCategory, TailorId,
    TailorStatus,
};
use crate::workflows::assignments::domain::{Assignment, AssignmentId, Project, ProjectId};
use crate::workflows::assignments::repository::{
    AssignmentRepository, RepositoryError, RosterStatusStore,
};
use crate::workflows::assignments::{AssignmentService, NewProject};

#[derive(Default)]
pub(super) struct MemoryLedger {
    projects: Mutex<HashMap<ProjectId, Project>>,
    assignments: Mutex<Vec<Assignment>>,
    query_delay: Option<Duration>,
}

impl AssignmentRepository for MemoryLedger {
    fn insert_project(&self, project: Project) -> Result<Project, RepositoryError> {
        let mut guard = self.projects.lock().expect("lock");
        if guard.contains_key(&project.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(project.id.clone(), project.clone());
        Ok(project)
    }

    fn project(&self, id: &ProjectId) -> Result<Option<Project>, RepositoryError> {
        Ok(self.projects.lock().expect("lock").get(id).cloned())
    }

    fn update_project(&self, project: Project) -> Result<(), RepositoryError> {
        let mut guard = self.projects.lock().expect("lock");
        match guard.get_mut(&project.id) {
            Some(slot) => {
                *slot = project;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn insert_all(&self, assignments: Vec<Assignment>) -> Result<Vec<Assignment>, RepositoryError> {
        let mut guard = self.assignments.lock().expect("lock");
        if assignments
            .iter()
            .any(|new| guard.iter().any(|existing| existing.id == new.id))
        {
            return Err(RepositoryError::Conflict);
        }
        guard.extend(assignments.iter().cloned());
        Ok(assignments)
    }

    fn update(&self, assignment: Assignment) -> Result<(), RepositoryError> {
        let mut guard = self.assignments.lock().expect("lock");
        match guard.iter_mut().find(|existing| existing.id == assignment.id) {
            Some(slot) => {
                *slot = assignment;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &AssignmentId) -> Result<Option<Assignment>, RepositoryError> {
        let guard = self.assignments.lock().expect("lock");
        Ok(guard.iter().find(|existing| &existing.id == id).cloned())
    }

    fn for_project(&self, id: &ProjectId) -> Result<Vec<Assignment>, RepositoryError> {
        let found: Vec<Assignment> = {
            let guard = self.assignments.lock().expect("lock");
            guard
                .iter()
                .filter(|assignment| &assignment.project_id == id)
                .cloned()
                .collect()
        };
        if let Some(delay) = self.query_delay {
            thread::sleep(delay);
        }
        Ok(found)
    }
}

impl MemoryLedger {
    /// Every quota lookup answers late, widening the gap between check and write.
    pub(super) fn sluggish(delay: Duration) -> Self {
        Self {
            query_delay: Some(delay),
            ..Self::default()
        }
    }

    pub(super) fn assignment_count(&self) -> usize {
        self.assignments.lock().expect("lock").len()
    }
}

#[derive(Default)]
pub(super) struct MemoryRoster {
    snapshot: Mutex<AvailabilitySnapshot>,
}

impl AvailabilityProvider for MemoryRoster {
    fn snapshot(&self) -> Result<AvailabilitySnapshot, AvailabilityError> {
        Ok(self.snapshot.lock().expect("lock").clone())
    }
}

impl RosterStatusStore for MemoryRoster {
    fn set_status(&self, id: &TailorId, status: TailorStatus) -> Result<(), RepositoryError> {
        self.snapshot.lock().expect("lock").set(id.clone(), status);
        Ok(())
    }
}

impl MemoryRoster {
    pub(super) fn status(&self, name: &str) -> TailorStatus {
        self.snapshot
            .lock()
            .expect("lock")
            .status_of(&TailorId::from_name(name))
    }
}

/// Roster that refuses to change one tailor's status.
pub(super) struct StubbornRoster {
    pub(super) inner: MemoryRoster,
    pub(super) refuse: TailorId,
}

impl AvailabilityProvider for StubbornRoster {
    fn snapshot(&self) -> Result<AvailabilitySnapshot, AvailabilityError> {
        self.inner.snapshot()
    }
}

impl RosterStatusStore for StubbornRoster {
    fn set_status(&self, id: &TailorId, status: TailorStatus) -> Result<(), RepositoryError> {
        if id == &self.refuse {
            return Err(RepositoryError::Unavailable("roster store offline".to_string()));
        }
        self.inner.set_status(id, status)
    }
}

pub(super) type Ledger = AssignmentService<MemoryLedger, MemoryRoster>;

pub(super) fn ledger() -> (Ledger, Arc<MemoryLedger>, Arc<MemoryRoster>) {
    ledger_over(MemoryLedger::default())
}

pub(super) fn ledger_over(
    repository: MemoryLedger,
) -> (Ledger, Arc<MemoryLedger>, Arc<MemoryRoster>) {
    let repository = Arc::new(repository);
    let roster = Arc::new(MemoryRoster::default());
    let service = AssignmentService::new(repository.clone(), roster.clone());
    (service, repository, roster)
}

pub(super) fn uniform_project(quantity: u32) -> NewProject {
    NewProject {
        name: "SDN 3 school uniforms".to_string(),
        category: GarmentCategory::SchoolUniform,
        quantity,
        deadline: NaiveDate::from_ymd_opt(2025, 4, 1).expect("valid date"),
    }
}

pub(super) fn tailor(name: &str) -> TailorId {
    TailorId::from_name(name)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

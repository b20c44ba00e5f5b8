use chrono::NaiveDate;
use garment_coop::error::AppError;
use garment_coop::workflows::allocation::{
    AvailabilityError, AvailabilityProvider, AvailabilitySnapshot, GarmentCategory, TailorId,
    TailorStatus,
};
use garment_coop::workflows::assignments::{
    Assignment, AssignmentId, AssignmentRepository, Project, ProjectId, RepositoryError,
    RosterStatusStore,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) catalog_path: PathBuf,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryAssignmentRepository {
    projects: Arc<Mutex<HashMap<ProjectId, Project>>>,
    assignments: Arc<Mutex<Vec<Assignment>>>,
}

impl AssignmentRepository for InMemoryAssignmentRepository {
    fn insert_project(&self, project: Project) -> Result<Project, RepositoryError> {
        let mut guard = self.projects.lock().expect("project mutex poisoned");
        if guard.contains_key(&project.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(project.id.clone(), project.clone());
        Ok(project)
    }

    fn project(&self, id: &ProjectId) -> Result<Option<Project>, RepositoryError> {
        let guard = self.projects.lock().expect("project mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn update_project(&self, project: Project) -> Result<(), RepositoryError> {
        let mut guard = self.projects.lock().expect("project mutex poisoned");
        let slot = guard.get_mut(&project.id).ok_or(RepositoryError::NotFound)?;
        *slot = project;
        Ok(())
    }

    fn insert_all(&self, assignments: Vec<Assignment>) -> Result<Vec<Assignment>, RepositoryError> {
        let mut guard = self.assignments.lock().expect("assignment mutex poisoned");
        let clash = assignments
            .iter()
            .any(|new| guard.iter().any(|existing| existing.id == new.id));
        if clash {
            return Err(RepositoryError::Conflict);
        }
        guard.extend(assignments.iter().cloned());
        Ok(assignments)
    }

    fn update(&self, assignment: Assignment) -> Result<(), RepositoryError> {
        let mut guard = self.assignments.lock().expect("assignment mutex poisoned");
        match guard.iter_mut().find(|existing| existing.id == assignment.id) {
            Some(slot) => {
                *slot = assignment;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &AssignmentId) -> Result<Option<Assignment>, RepositoryError> {
        let guard = self.assignments.lock().expect("assignment mutex poisoned");
        Ok(guard.iter().find(|existing| &existing.id == id).cloned())
    }

    fn for_project(&self, id: &ProjectId) -> Result<Vec<Assignment>, RepositoryError> {
        let guard = self.assignments.lock().expect("assignment mutex poisoned");
        Ok(guard
            .iter()
            .filter(|assignment| &assignment.project_id == id)
            .cloned()
            .collect())
    }
}

/// Live tailor status shared by the allocation engine and the assignment ledger.
#[derive(Default, Clone)]
pub(crate) struct InMemoryRosterStore {
    statuses: Arc<Mutex<AvailabilitySnapshot>>,
}

impl InMemoryRosterStore {
    pub(crate) fn seeded(snapshot: AvailabilitySnapshot) -> Self {
        Self {
            statuses: Arc::new(Mutex::new(snapshot)),
        }
    }

    /// Seeds from a `Name,Status` CSV when one is configured, otherwise everyone starts idle.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self, AppError> {
        match path {
            Some(path) => {
                let file = File::open(path)?;
                Ok(Self::seeded(AvailabilitySnapshot::from_csv_reader(file)?))
            }
            None => Ok(Self::default()),
        }
    }

    pub(crate) fn status_of(&self, id: &TailorId) -> TailorStatus {
        self.statuses
            .lock()
            .expect("roster mutex poisoned")
            .status_of(id)
    }
}

impl AvailabilityProvider for InMemoryRosterStore {
    fn snapshot(&self) -> Result<AvailabilitySnapshot, AvailabilityError> {
        let guard = self.statuses.lock().expect("roster mutex poisoned");
        Ok(guard.clone())
    }
}

impl RosterStatusStore for InMemoryRosterStore {
    fn set_status(&self, id: &TailorId, status: TailorStatus) -> Result<(), RepositoryError> {
        let mut guard = self.statuses.lock().expect("roster mutex poisoned");
        guard.set(id.clone(), status);
        Ok(())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_category(raw: &str) -> Result<GarmentCategory, String> {
    raw.parse::<GarmentCategory>().map_err(|err| err.to_string())
}

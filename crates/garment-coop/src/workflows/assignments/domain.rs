use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::workflows::allocation::{GarmentCategory, OrderError, OrderRequest, TailorId};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectId(pub String);

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssignmentId(pub String);

impl fmt::Display for AssignmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Ongoing,
    Done,
}

impl ProjectStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ProjectStatus::Ongoing => "ongoing",
            ProjectStatus::Done => "done",
        }
    }
}

/// A customer order accepted by the cooperative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub category: GarmentCategory,
    pub quantity: u32,
    pub deadline: NaiveDate,
    #[serde(default)]
    pub status: ProjectStatus,
}

impl Project {
    pub fn is_open(&self) -> bool {
        self.status == ProjectStatus::Ongoing
    }

    /// The allocation request this project corresponds to.
    pub fn order(&self) -> Result<OrderRequest, OrderError> {
        OrderRequest::new(self.category, self.quantity, self.deadline)
    }
}

/// Lifecycle of a batch of pieces handed to one tailor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    Assigned,
    Submitted,
    Paid,
}

impl AssignmentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            AssignmentStatus::Assigned => "assigned",
            AssignmentStatus::Submitted => "submitted",
            AssignmentStatus::Paid => "paid",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: AssignmentId,
    pub project_id: ProjectId,
    pub tailor_id: TailorId,
    pub pieces: u32,
    pub status: AssignmentStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectProgress {
    pub project_id: ProjectId,
    pub quantity: u32,
    pub assigned: u32,
    pub remaining: u32,
    pub active_tailors: usize,
}

impl ProjectProgress {
    pub(crate) fn from_assignments(project: &Project, assignments: &[Assignment]) -> Self {
        let assigned = assigned_total(assignments);
        let mut active: Vec<&TailorId> = assignments
            .iter()
            .filter(|assignment| assignment.status == AssignmentStatus::Assigned)
            .map(|assignment| &assignment.tailor_id)
            .collect();
        active.sort();
        active.dedup();

        Self {
            project_id: project.id.clone(),
            quantity: project.quantity,
            assigned,
            remaining: project.quantity.saturating_sub(assigned),
            active_tailors: active.len(),
        }
    }
}

pub(crate) fn assigned_total(assignments: &[Assignment]) -> u32 {
    assignments
        .iter()
        .fold(0u32, |total, assignment| total.saturating_add(assignment.pieces))
}

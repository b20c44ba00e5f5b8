use std::collections::HashMap;
use std::io::Read;

use serde::Deserialize;

use super::domain::{RosterEntry, TailorId, TailorStatus};
use crate::workflows::catalog::SkillCatalog;

/// Live roster source, queried once per allocation run.
pub trait AvailabilityProvider: Send + Sync {
    fn snapshot(&self) -> Result<AvailabilitySnapshot, AvailabilityError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AvailabilityError {
    #[error("roster store unavailable: {0}")]
    Unavailable(String),
    #[error("invalid roster status data: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid status '{status}' for tailor '{name}'")]
    InvalidStatus { name: String, status: String },
}

/// Point-in-time status of every tailor the roster store knows about.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AvailabilitySnapshot {
    statuses: HashMap<TailorId, TailorStatus>,
}

impl AvailabilitySnapshot {
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, TailorStatus)>,
        S: AsRef<str>,
    {
        let statuses = pairs
            .into_iter()
            .map(|(name, status)| (TailorId::from_name(name.as_ref()), status))
            .collect();
        Self { statuses }
    }

    /// Reads `Name,Status` rows, the shape of the roster store's status query.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, AvailabilityError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut statuses = HashMap::new();

        for record in csv_reader.deserialize::<StatusRow>() {
            let row = record?;
            let status = row
                .status
                .parse::<TailorStatus>()
                .map_err(|_| AvailabilityError::InvalidStatus {
                    name: row.name.clone(),
                    status: row.status.clone(),
                })?;
            statuses.insert(TailorId::from_name(&row.name), status);
        }

        Ok(Self { statuses })
    }

    /// Tailors unknown to the roster store count as idle.
    pub fn status_of(&self, id: &TailorId) -> TailorStatus {
        self.statuses.get(id).copied().unwrap_or_default()
    }

    pub fn set(&mut self, id: TailorId, status: TailorStatus) {
        self.statuses.insert(id, status);
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }
}

impl AvailabilityProvider for AvailabilitySnapshot {
    fn snapshot(&self) -> Result<AvailabilitySnapshot, AvailabilityError> {
        Ok(self.clone())
    }
}

#[derive(Debug, Deserialize)]
struct StatusRow {
    #[serde(rename = "Name", alias = "Nama", alias = "name")]
    name: String,
    #[serde(rename = "Status", alias = "status")]
    status: String,
}

/// Joins catalog profiles with live status, keeping catalog order.
pub fn join_roster(catalog: &SkillCatalog, snapshot: &AvailabilitySnapshot) -> Vec<RosterEntry> {
    catalog
        .profiles()
        .iter()
        .map(|profile| RosterEntry {
            status: snapshot.status_of(&profile.id),
            profile: profile.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn unknown_tailors_default_to_idle() {
        let snapshot = AvailabilitySnapshot::from_pairs([("Dewi", TailorStatus::Working)]);

        assert_eq!(
            snapshot.status_of(&TailorId::from_name("dewi")),
            TailorStatus::Working
        );
        assert_eq!(
            snapshot.status_of(&TailorId::from_name("Ayu")),
            TailorStatus::Idle
        );
    }

    #[test]
    fn csv_status_rows_are_matched_by_normalized_name() {
        let snapshot = AvailabilitySnapshot::from_csv_reader(Cursor::new(
            "Name,Status\n Sri  Wahyuni ,WORKING\nDewi,idle\n",
        ))
        .expect("parse statuses");

        assert_eq!(snapshot.len(), 2);
        assert_eq!(
            snapshot.status_of(&TailorId::from_name("sri wahyuni")),
            TailorStatus::Working
        );
    }

    #[test]
    fn csv_rejects_unknown_status_values() {
        let error = AvailabilitySnapshot::from_csv_reader(Cursor::new("Name,Status\nSri,on leave\n"))
            .expect_err("unknown status");

        match error {
            AvailabilityError::InvalidStatus { name, status } => {
                assert_eq!(name, "Sri");
                assert_eq!(status, "on leave");
            }
            other => panic!("expected invalid status, got {other:?}"),
        }
    }
}

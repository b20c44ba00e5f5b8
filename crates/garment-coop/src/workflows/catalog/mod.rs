//! Skill catalog import: the static, per-tailor capability profiles produced by the
//! cooperative's data-preparation step.

mod parser;

use crate::workflows::allocation::domain::{
    AttributeScores, SpeedColumn, TailorId, TailorProfile,
};
use std::collections::{BTreeMap, HashSet};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::warn;

use parser::CatalogRow;

#[derive(Debug)]
pub enum CatalogImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidRow { line: u64, reason: String },
}

impl std::fmt::Display for CatalogImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogImportError::Io(err) => write!(f, "failed to read skill catalog: {}", err),
            CatalogImportError::Csv(err) => write!(f, "invalid skill catalog CSV data: {}", err),
            CatalogImportError::InvalidRow { line, reason } => {
                write!(f, "skill catalog line {}: {}", line, reason)
            }
        }
    }
}

impl std::error::Error for CatalogImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogImportError::Io(err) => Some(err),
            CatalogImportError::Csv(err) => Some(err),
            CatalogImportError::InvalidRow { .. } => None,
        }
    }
}

impl From<std::io::Error> for CatalogImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for CatalogImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Immutable snapshot of every tailor profile, in catalog order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillCatalog {
    profiles: Vec<TailorProfile>,
}

impl SkillCatalog {
    pub fn new(profiles: Vec<TailorProfile>) -> Self {
        Self { profiles }
    }

    pub fn profiles(&self) -> &[TailorProfile] {
        &self.profiles
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn get(&self, id: &TailorId) -> Option<&TailorProfile> {
        self.profiles.iter().find(|profile| &profile.id == id)
    }
}

/// Anything able to hand the engine a fresh catalog snapshot.
pub trait CatalogSource: Send + Sync {
    fn load(&self) -> Result<SkillCatalog, CatalogImportError>;
}

impl CatalogSource for SkillCatalog {
    fn load(&self) -> Result<SkillCatalog, CatalogImportError> {
        Ok(self.clone())
    }
}

/// Reads the catalog file from disk on every load.
#[derive(Debug, Clone)]
pub struct CsvCatalogSource {
    path: PathBuf,
}

impl CsvCatalogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogSource for CsvCatalogSource {
    fn load(&self) -> Result<SkillCatalog, CatalogImportError> {
        SkillCatalogImporter::from_path(&self.path)
    }
}

pub struct SkillCatalogImporter;

impl SkillCatalogImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<SkillCatalog, CatalogImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<SkillCatalog, CatalogImportError> {
        let mut seen: HashSet<TailorId> = HashSet::new();
        let mut profiles = Vec::new();

        for record in parser::parse_records(reader)? {
            let profile = profile_from_row(record.line, record.row)?;
            if !seen.insert(profile.id.clone()) {
                warn!(line = record.line, tailor = %profile.id, "skipping duplicate catalog row");
                continue;
            }
            profiles.push(profile);
        }

        Ok(SkillCatalog::new(profiles))
    }
}

fn profile_from_row(line: u64, row: CatalogRow) -> Result<TailorProfile, CatalogImportError> {
    let invalid = |reason: String| CatalogImportError::InvalidRow { line, reason };

    let name = row.name.trim().to_string();
    if name.is_empty() {
        return Err(invalid("tailor name is blank".to_string()));
    }

    if !row.distance_km.is_finite() || row.distance_km < 0.0 {
        return Err(invalid(format!(
            "home distance {} km must be a non-negative number",
            row.distance_km
        )));
    }

    let columns = [
        (SpeedColumn::WhiteShirt, row.white_shirt),
        (SpeedColumn::ScoutShirt, row.scout_shirt),
        (SpeedColumn::ScoutTrousers, row.scout_trousers),
        (SpeedColumn::Skirt, row.skirt),
        (SpeedColumn::WorkShirt, row.work_shirt),
        (SpeedColumn::CustomDifficult, row.custom_difficult),
    ];

    let mut speeds = BTreeMap::new();
    for (column, value) in columns {
        let speed = value.unwrap_or(0.0);
        if !speed.is_finite() || speed < 0.0 {
            return Err(invalid(format!(
                "{} speed {} must be a non-negative number",
                column.label(),
                speed
            )));
        }
        speeds.insert(column, speed);
    }

    let rated = |label: &str, value: Option<f64>| {
        let value = value.unwrap_or(0.0);
        if (0.0..=1.0).contains(&value) {
            Ok(value)
        } else {
            Err(invalid(format!("{label} {value} must lie between 0 and 1")))
        }
    };
    let attributes = AttributeScores {
        neatness: rated("neatness", row.neatness)?,
        commitment: rated("commitment", row.commitment)?,
        punctuality: rated("punctuality", row.punctuality)?,
    };

    Ok(TailorProfile {
        id: TailorId::from_name(&name),
        name,
        age: row.age,
        home_distance_km: row.distance_km,
        speeds,
        attributes,
        specialty: row.specialty.unwrap_or_default(),
    })
}

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Join key shared by the skill catalog and the live roster store.
///
/// The two sources only share a display name, so the identifier is derived from it with
/// invisible characters stripped, whitespace collapsed and case folded.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TailorId(pub String);

impl TailorId {
    pub fn from_name(name: &str) -> Self {
        Self(normalize_key(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TailorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub(crate) fn normalize_key(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_lowercase()
}

/// Fixed capability columns published by the skill catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedColumn {
    WhiteShirt,
    ScoutShirt,
    ScoutTrousers,
    Skirt,
    WorkShirt,
    CustomDifficult,
}

impl SpeedColumn {
    pub const ALL: [SpeedColumn; 6] = [
        SpeedColumn::WhiteShirt,
        SpeedColumn::ScoutShirt,
        SpeedColumn::ScoutTrousers,
        SpeedColumn::Skirt,
        SpeedColumn::WorkShirt,
        SpeedColumn::CustomDifficult,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            SpeedColumn::WhiteShirt => "white shirt",
            SpeedColumn::ScoutShirt => "scout shirt",
            SpeedColumn::ScoutTrousers => "scout trousers",
            SpeedColumn::Skirt => "skirt",
            SpeedColumn::WorkShirt => "work shirt",
            SpeedColumn::CustomDifficult => "custom (difficult)",
        }
    }
}

/// Order categories offered by the cooperative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GarmentCategory {
    SchoolUniform,
    ScoutUniform,
    Skirt,
    ShirtBatik,
    CustomDifficult,
}

impl GarmentCategory {
    pub const ALL: [GarmentCategory; 5] = [
        GarmentCategory::SchoolUniform,
        GarmentCategory::ScoutUniform,
        GarmentCategory::Skirt,
        GarmentCategory::ShirtBatik,
        GarmentCategory::CustomDifficult,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            GarmentCategory::SchoolUniform => "School uniform",
            GarmentCategory::ScoutUniform => "Scout uniform",
            GarmentCategory::Skirt => "Uniform skirt",
            GarmentCategory::ShirtBatik => "Shirt / batik",
            GarmentCategory::CustomDifficult => "Custom / difficult",
        }
    }

    /// Catalog columns whose mean gives a tailor's speed for this category.
    pub const fn speed_columns(self) -> &'static [SpeedColumn] {
        match self {
            GarmentCategory::SchoolUniform => &[SpeedColumn::WhiteShirt, SpeedColumn::ScoutShirt],
            GarmentCategory::ScoutUniform => {
                &[SpeedColumn::ScoutShirt, SpeedColumn::ScoutTrousers]
            }
            GarmentCategory::Skirt => &[SpeedColumn::Skirt],
            GarmentCategory::ShirtBatik => &[SpeedColumn::WorkShirt],
            GarmentCategory::CustomDifficult => &[SpeedColumn::CustomDifficult],
        }
    }

    /// Uniform work covers the school, scout and skirt lines.
    pub const fn is_uniform(self) -> bool {
        matches!(
            self,
            GarmentCategory::SchoolUniform | GarmentCategory::ScoutUniform | GarmentCategory::Skirt
        )
    }

    /// Categories where a tailor without any recorded speed is dropped from the pool.
    pub const fn requires_capability(self) -> bool {
        matches!(self, GarmentCategory::CustomDifficult)
    }
}

impl fmt::Display for GarmentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown garment category '{}'", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for GarmentCategory {
    type Err = UnknownCategory;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let words = raw
            .split(|c: char| !c.is_alphanumeric())
            .filter(|word| !word.is_empty())
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join(" ");

        match words.as_str() {
            "school uniform" | "seragam sekolah" => Ok(GarmentCategory::SchoolUniform),
            "scout uniform" | "seragam pramuka" => Ok(GarmentCategory::ScoutUniform),
            "skirt" | "uniform skirt" | "rok" | "rok seragam" => Ok(GarmentCategory::Skirt),
            "shirt batik" | "shirt" | "batik" | "kemeja batik" => Ok(GarmentCategory::ShirtBatik),
            "custom difficult" | "custom" | "custom gamis sulit" => {
                Ok(GarmentCategory::CustomDifficult)
            }
            _ => Err(UnknownCategory(raw.trim().to_string())),
        }
    }
}

/// Live operational state of a tailor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TailorStatus {
    #[default]
    Idle,
    Working,
}

impl TailorStatus {
    pub const fn label(self) -> &'static str {
        match self {
            TailorStatus::Idle => "idle",
            TailorStatus::Working => "working",
        }
    }
}

impl FromStr for TailorStatus {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "idle" => Ok(TailorStatus::Idle),
            "working" => Ok(TailorStatus::Working),
            other => Err(format!("unknown tailor status '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeScores {
    pub neatness: f64,
    pub commitment: f64,
    pub punctuality: f64,
}

/// Static capability profile of one tailor, as published by the skill catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TailorProfile {
    pub id: TailorId,
    pub name: String,
    pub age: u32,
    pub home_distance_km: f64,
    pub speeds: BTreeMap<SpeedColumn, f64>,
    pub attributes: AttributeScores,
    pub specialty: String,
}

impl TailorProfile {
    pub fn speed(&self, column: SpeedColumn) -> f64 {
        self.speeds.get(&column).copied().unwrap_or(0.0)
    }

    /// Mean pieces per day over the columns mapped to `category`; absent columns count as 0.
    pub fn effective_speed(&self, category: GarmentCategory) -> f64 {
        let columns = category.speed_columns();
        if columns.is_empty() {
            return 0.0;
        }
        let total: f64 = columns.iter().map(|column| self.speed(*column)).sum();
        total / columns.len() as f64
    }
}

/// Catalog profile joined with the tailor's current availability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub profile: TailorProfile,
    pub status: TailorStatus,
}

/// A customer order as submitted for allocation. Never persisted by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub category: GarmentCategory,
    pub quantity: u32,
    pub deadline: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderError {
    ZeroQuantity,
}

impl fmt::Display for OrderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderError::ZeroQuantity => write!(f, "order quantity must be at least one piece"),
        }
    }
}

impl std::error::Error for OrderError {}

impl OrderRequest {
    pub fn new(
        category: GarmentCategory,
        quantity: u32,
        deadline: NaiveDate,
    ) -> Result<Self, OrderError> {
        if quantity == 0 {
            return Err(OrderError::ZeroQuantity);
        }

        Ok(Self {
            category,
            quantity,
            deadline,
        })
    }

    /// Production window as seen on `today`. A deadline today or already past still leaves
    /// one nominal work day.
    pub fn window(&self, today: NaiveDate) -> OrderWindow {
        let days_left = (self.deadline - today).num_days();
        let remaining_days = days_left.clamp(1, i64::from(u32::MAX)) as u32;

        OrderWindow {
            remaining_days,
            target_daily_throughput: f64::from(self.quantity) / f64::from(remaining_days),
            due_now: days_left <= 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderWindow {
    pub remaining_days: u32,
    pub target_daily_throughput: f64,
    pub due_now: bool,
}

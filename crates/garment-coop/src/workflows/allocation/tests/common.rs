use std::collections::BTreeMap;
use std::sync::Arc;

use axum::response::Response;
use chrono::{Duration, NaiveDate};
use serde_json::Value;

use crate::workflows::allocation::availability::{
    AvailabilityError, AvailabilityProvider, AvailabilitySnapshot,
};
use crate::workflows::allocation::domain::{
    AttributeScores, GarmentCategory, OrderRequest, RosterEntry, SpeedColumn, TailorId,
    TailorProfile, TailorStatus,
};
use crate::workflows::allocation::{AllocationService, ScoringPolicy};
use crate::workflows::catalog::{CatalogImportError, CatalogSource, SkillCatalog};

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).expect("valid date")
}

pub(super) fn order(category: GarmentCategory, quantity: u32, days: i64) -> OrderRequest {
    OrderRequest::new(category, quantity, today() + Duration::days(days)).expect("valid order")
}

pub(super) fn attributes(value: f64) -> AttributeScores {
    AttributeScores {
        neatness: value,
        commitment: value,
        punctuality: value,
    }
}

pub(super) fn profile(
    name: &str,
    age: u32,
    distance_km: f64,
    speeds: &[(SpeedColumn, f64)],
    specialty: &str,
) -> TailorProfile {
    TailorProfile {
        id: TailorId::from_name(name),
        name: name.to_string(),
        age,
        home_distance_km: distance_km,
        speeds: speeds.iter().copied().collect::<BTreeMap<_, _>>(),
        attributes: attributes(0.8),
        specialty: specialty.to_string(),
    }
}

/// A batik/shirt tailor with the given work-shirt speed.
pub(super) fn shirt_tailor(name: &str, speed: f64) -> TailorProfile {
    profile(name, 40, 5.0, &[(SpeedColumn::WorkShirt, speed)], "kemeja")
}

pub(super) fn entry(profile: TailorProfile, status: TailorStatus) -> RosterEntry {
    RosterEntry { profile, status }
}

pub(super) fn idle(profile: TailorProfile) -> RosterEntry {
    entry(profile, TailorStatus::Idle)
}

pub(super) fn working(profile: TailorProfile) -> RosterEntry {
    entry(profile, TailorStatus::Working)
}

pub(super) fn catalog(profiles: Vec<TailorProfile>) -> SkillCatalog {
    SkillCatalog::new(profiles)
}

pub(super) fn snapshot(working: &[&str]) -> AvailabilitySnapshot {
    AvailabilitySnapshot::from_pairs(working.iter().map(|name| (*name, TailorStatus::Working)))
}

pub(super) fn build_service(
    profiles: Vec<TailorProfile>,
    working: &[&str],
) -> AllocationService<SkillCatalog, AvailabilitySnapshot> {
    AllocationService::new(
        Arc::new(catalog(profiles)),
        Arc::new(snapshot(working)),
        ScoringPolicy::default(),
    )
}

pub(super) fn cooperative_roster() -> Vec<TailorProfile> {
    vec![
        profile(
            "Sri Wahyuni",
            44,
            2.5,
            &[
                (SpeedColumn::WhiteShirt, 6.0),
                (SpeedColumn::ScoutShirt, 5.0),
                (SpeedColumn::WorkShirt, 3.0),
            ],
            "seragam",
        ),
        profile(
            "Dewi Lestari",
            31,
            8.0,
            &[
                (SpeedColumn::WhiteShirt, 2.0),
                (SpeedColumn::Skirt, 5.0),
                (SpeedColumn::WorkShirt, 4.0),
                (SpeedColumn::CustomDifficult, 1.5),
            ],
            "semua",
        ),
        profile(
            "Ayu Puspita",
            52,
            1.0,
            &[(SpeedColumn::Skirt, 7.0), (SpeedColumn::WorkShirt, 2.0)],
            "atasan/rok/celana",
        ),
        profile(
            "Rina Marlina",
            39,
            12.0,
            &[
                (SpeedColumn::WhiteShirt, 4.0),
                (SpeedColumn::ScoutShirt, 4.0),
                (SpeedColumn::ScoutTrousers, 3.0),
            ],
            "seragam",
        ),
    ]
}

/// Catalog source whose file has gone missing.
pub(super) struct MissingCatalog;

impl CatalogSource for MissingCatalog {
    fn load(&self) -> Result<SkillCatalog, CatalogImportError> {
        Err(CatalogImportError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "skill_catalog.csv not found",
        )))
    }
}

/// Roster store that cannot be reached.
pub(super) struct OfflineRoster;

impl AvailabilityProvider for OfflineRoster {
    fn snapshot(&self) -> Result<AvailabilitySnapshot, AvailabilityError> {
        Err(AvailabilityError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

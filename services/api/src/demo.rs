use crate::infra::{InMemoryAssignmentRepository, InMemoryRosterStore};
use chrono::{Duration, Local, NaiveDate};
use clap::Args;
use garment_coop::config::AppConfig;
use garment_coop::error::AppError;
use garment_coop::workflows::allocation::{
    AllocationPlan, AllocationService, AvailabilitySnapshot, GarmentCategory, OrderRequest,
    Recommendation, ScoringPolicy, TeamPlan,
};
use garment_coop::workflows::assignments::{AssignmentService, AssignmentStatus, NewProject};
use garment_coop::workflows::catalog::{CatalogImportError, SkillCatalog, SkillCatalogImporter};
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::sync::Arc;

const DEMO_CATALOG: &str = include_str!("../../../data/skill_catalog.csv");
const DEMO_ROSTER: &str = include_str!("../../../data/roster_status.csv");

#[derive(Args, Debug)]
pub(crate) struct AllocateArgs {
    /// Garment category, e.g. school_uniform, skirt or "Seragam Pramuka"
    #[arg(long, value_parser = crate::infra::parse_category)]
    pub(crate) category: GarmentCategory,
    /// Number of pieces ordered
    #[arg(long)]
    pub(crate) quantity: u32,
    /// Delivery deadline (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) deadline: NaiveDate,
    /// Evaluation date (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Skill catalog CSV (defaults to ALLOC_CATALOG_PATH)
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Name,Status CSV with the live roster (defaults to ALLOC_STATUS_PATH)
    #[arg(long)]
    pub(crate) status_csv: Option<PathBuf>,
    /// Maximum pieces a single team member may receive
    #[arg(long)]
    pub(crate) per_person_cap: Option<NonZeroU32>,
    /// Number of ranked tailors to print
    #[arg(long, default_value_t = 5)]
    pub(crate) top: usize,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the evaluation date (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Maximum pieces a single team member may receive
    #[arg(long)]
    pub(crate) per_person_cap: Option<NonZeroU32>,
    /// Stop after the allocation walk-through without touching the ledger
    #[arg(long)]
    pub(crate) skip_ledger: bool,
}

pub(crate) fn demo_catalog() -> Result<SkillCatalog, CatalogImportError> {
    SkillCatalogImporter::from_reader(DEMO_CATALOG.as_bytes())
}

pub(crate) fn run_allocate(args: AllocateArgs) -> Result<(), AppError> {
    let AllocateArgs {
        category,
        quantity,
        deadline,
        today,
        catalog,
        status_csv,
        per_person_cap,
        top,
    } = args;

    let config = AppConfig::load()?;
    let catalog_path = catalog.unwrap_or(config.allocation.catalog_path);
    let status_path = status_csv.or(config.allocation.status_path);
    let cap = per_person_cap.unwrap_or(config.allocation.per_person_cap);
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    let order = OrderRequest::new(category, quantity, deadline)?;
    let catalog = SkillCatalogImporter::from_path(&catalog_path)?;
    let roster = InMemoryRosterStore::load(status_path.as_deref())?;
    let service = AllocationService::new(
        Arc::new(catalog),
        Arc::new(roster),
        ScoringPolicy::default(),
    );

    let plan = service.plan(&order, today, cap);
    for line in render_plan(&plan, top) {
        println!("{line}");
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        today,
        per_person_cap,
        skip_ledger,
    } = args;

    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let cap = per_person_cap
        .or(NonZeroU32::new(40))
        .unwrap_or(NonZeroU32::MIN);

    let catalog = demo_catalog()?;
    let roster = InMemoryRosterStore::seeded(AvailabilitySnapshot::from_csv_reader(
        DEMO_ROSTER.as_bytes(),
    )?);
    println!(
        "Garment cooperative allocation demo ({} tailors on file, evaluated {today})",
        catalog.len()
    );

    let roster = Arc::new(roster);
    let allocation = AllocationService::new(
        Arc::new(catalog),
        roster.clone(),
        ScoringPolicy::default(),
    );
    let ledger = AssignmentService::new(
        Arc::new(InMemoryAssignmentRepository::default()),
        roster.clone(),
    );

    let orders = [
        NewProject {
            name: "SD Negeri 5 school uniforms".to_string(),
            category: GarmentCategory::SchoolUniform,
            quantity: 120,
            deadline: today + Duration::days(6),
        },
        NewProject {
            name: "SMP 2 uniform skirts".to_string(),
            category: GarmentCategory::Skirt,
            quantity: 15,
            deadline: today + Duration::days(7),
        },
    ];

    for intake in orders {
        println!("\n== {} ==", intake.name);
        let order = OrderRequest::new(intake.category, intake.quantity, intake.deadline)?;
        let plan = allocation.plan(&order, today, cap);
        for line in render_plan(&plan, 3) {
            println!("{line}");
        }

        if skip_ledger {
            continue;
        }

        let project = match ledger.register_project(intake) {
            Ok(project) => project,
            Err(err) => {
                println!("  Project rejected: {err}");
                continue;
            }
        };

        let committed = match (&plan.team, plan.recommendation.solo_pick()) {
            (Some(team), _) => ledger.commit_plan(&project.id, team),
            (None, Some(solo)) => ledger
                .assign(&project.id, &solo.profile.id, project.quantity)
                .map(|assignment| vec![assignment]),
            (None, None) => {
                println!("  Nothing to commit for {}", project.id);
                continue;
            }
        };

        match committed {
            Ok(assignments) => {
                println!("  Ledger entries for {}:", project.id);
                for assignment in &assignments {
                    println!(
                        "    - {} -> {} ({} pcs, {})",
                        assignment.id,
                        assignment.tailor_id,
                        assignment.pieces,
                        assignment.status.label()
                    );
                }
                if let Some(first) = assignments.first() {
                    if let Err(err) = ledger.update_status(&first.id, AssignmentStatus::Paid) {
                        println!("  Payout failed: {err}");
                    } else {
                        println!(
                            "  Paid {} -> {} is {} again",
                            first.id,
                            first.tailor_id,
                            roster.status_of(&first.tailor_id).label()
                        );
                    }
                }
            }
            Err(err) => println!("  Assignment rejected: {err}"),
        }

        match ledger.progress(&project.id) {
            Ok(progress) => println!(
                "  Progress: {}/{} pcs assigned, {} remaining, {} tailor(s) active",
                progress.assigned, progress.quantity, progress.remaining, progress.active_tailors
            ),
            Err(err) => println!("  Progress unavailable: {err}"),
        }
    }

    Ok(())
}

pub(crate) fn render_plan(plan: &AllocationPlan, top: usize) -> Vec<String> {
    let mut lines = render_recommendation(&plan.recommendation, top);

    if let Some(solo) = plan.recommendation.solo_pick() {
        lines.push(format!(
            "Solo pick: {} ({:.1} pcs/day, score {:.2})",
            solo.profile.name, solo.effective_speed, solo.final_score
        ));
    }
    if let Some(team) = &plan.team {
        lines.extend(render_team(team));
    }
    lines
}

pub(crate) fn render_recommendation(recommendation: &Recommendation, top: usize) -> Vec<String> {
    let order = &recommendation.order;
    let mut lines = vec![format!(
        "Order: {} x {} due {} (evaluated {})",
        order.quantity, order.category, order.deadline, recommendation.evaluated_on
    )];
    lines.extend(recommendation.summary.lines().map(|line| format!("  {line}")));

    if let Some(issue) = &recommendation.issue {
        lines.push(format!("Issue ({}): {}", issue.kind(), issue.message()));
        return lines;
    }

    lines.push(format!(
        "{:>4}  {:<22} {:<8} {:>7} {:>5} {:>7} {:>11}",
        "Rank", "Tailor", "Status", "Speed", "Meets", "Km", "Score"
    ));
    for (index, tailor) in recommendation.candidates.iter().take(top).enumerate() {
        lines.push(format!(
            "{:>4}  {:<22} {:<8} {:>7.1} {:>5} {:>7.1} {:>11.2}",
            index + 1,
            tailor.profile.name,
            tailor.status.label(),
            tailor.effective_speed,
            if tailor.can_meet_deadline { "yes" } else { "no" },
            tailor.profile.home_distance_km,
            tailor.final_score
        ));
    }
    if recommendation.candidates.len() > top {
        lines.push(format!(
            "  ... {} more candidate(s)",
            recommendation.candidates.len() - top
        ));
    }
    lines
}

pub(crate) fn render_team(plan: &TeamPlan) -> Vec<String> {
    let mut lines = vec![format!(
        "Team of {} (cap {} pcs each): {:.1} pcs/day against a target of {:.1}",
        plan.members.len(),
        plan.per_person_cap,
        plan.total_capacity_per_day,
        plan.target_daily_throughput
    )];
    for member in &plan.members {
        lines.push(format!(
            "  - {}: {} pcs ({:.1} pcs/day)",
            member.tailor.profile.name, member.assigned_pieces, member.tailor.effective_speed
        ));
    }
    match plan.estimated_days_to_complete {
        Some(days) => lines.push(format!(
            "Estimated {days:.1} day(s) of {} remaining -> {}",
            plan.remaining_days,
            if plan.feasible_within_deadline {
                "on time"
            } else {
                "late"
            }
        )),
        None => lines.push("No measurable team speed for this category".to_string()),
    }
    for warning in &plan.warnings {
        lines.push(format!("Warning: {}", warning.summary()));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AllocationService<SkillCatalog, AvailabilitySnapshot> {
        AllocationService::new(
            Arc::new(demo_catalog().expect("embedded catalog parses")),
            Arc::new(AvailabilitySnapshot::default()),
            ScoringPolicy::default(),
        )
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn embedded_catalog_lists_every_tailor() {
        let catalog = demo_catalog().expect("embedded catalog parses");
        assert_eq!(catalog.len(), 8);
    }

    #[test]
    fn large_orders_render_a_team_plan() {
        let order = OrderRequest::new(GarmentCategory::SchoolUniform, 120, date(2025, 3, 16))
            .expect("valid order");
        let cap = NonZeroU32::new(40).expect("cap");

        let plan = service().plan(&order, date(2025, 3, 10), cap);
        let lines = render_plan(&plan, 3);

        assert!(lines[0].starts_with("Order: 120 x School uniform"));
        assert!(lines.iter().any(|line| line.starts_with("Team of ")));
        assert!(lines.iter().any(|line| line.contains("more candidate(s)")));
        assert!(!lines.iter().any(|line| line.starts_with("Solo pick")));
    }

    #[test]
    fn small_orders_render_a_solo_pick() {
        let order = OrderRequest::new(GarmentCategory::Skirt, 10, date(2025, 3, 20))
            .expect("valid order");
        let cap = NonZeroU32::new(40).expect("cap");

        let plan = service().plan(&order, date(2025, 3, 10), cap);
        let lines = render_plan(&plan, 8);

        assert!(lines.iter().any(|line| line.starts_with("Solo pick: ")));
        assert!(plan.team.is_none());
    }

    #[test]
    fn issues_replace_the_ranking_table() {
        let order = OrderRequest::new(GarmentCategory::CustomDifficult, 5, date(2025, 3, 20))
            .expect("valid order");
        let service = AllocationService::new(
            Arc::new(SkillCatalog::new(Vec::new())),
            Arc::new(AvailabilitySnapshot::default()),
            ScoringPolicy::default(),
        );

        let lines = render_recommendation(&service.recommend(&order, date(2025, 3, 10)), 5);

        assert!(lines
            .last()
            .is_some_and(|line| line.starts_with("Issue (no_eligible_candidates)")));
    }

    #[test]
    fn demo_runs_end_to_end() {
        let args = DemoArgs {
            today: Some(date(2025, 3, 10)),
            ..DemoArgs::default()
        };
        assert!(run_demo(args).is_ok());
    }
}

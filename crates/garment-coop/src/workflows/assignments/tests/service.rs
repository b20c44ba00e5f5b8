use std::num::NonZeroU32;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::NaiveDate;

use super::common::{
    ledger, ledger_over, tailor, uniform_project, MemoryLedger, MemoryRoster, StubbornRoster,
};
use crate::workflows::allocation::domain::{SpeedColumn, TailorProfile, TailorStatus};
use crate::workflows::allocation::{
    AttributeScores, RosterEntry, ScoringEngine, TailorId, TeamComposer,
};
use crate::workflows::assignments::{
    AssignmentError, AssignmentService, AssignmentStatus, ProjectId, ProjectStatus,
    RepositoryError,
};

#[test]
fn assigning_marks_the_tailor_working() {
    let (service, _, roster) = ledger();
    let project = service
        .register_project(uniform_project(100))
        .expect("project registered");

    let assignment = service
        .assign(&project.id, &tailor("Sri Wahyuni"), 30)
        .expect("assignment stored");

    assert_eq!(assignment.status, AssignmentStatus::Assigned);
    assert_eq!(assignment.pieces, 30);
    assert!(assignment.id.0.starts_with("asg-"));
    assert_eq!(roster.status("sri wahyuni"), TailorStatus::Working);

    let progress = service.progress(&project.id).expect("progress");
    assert_eq!(progress.assigned, 30);
    assert_eq!(progress.remaining, 70);
    assert_eq!(progress.active_tailors, 1);
}

#[test]
fn assigning_beyond_the_quota_reports_what_is_left() {
    let (service, repository, _) = ledger();
    let project = service
        .register_project(uniform_project(50))
        .expect("project registered");
    service
        .assign(&project.id, &tailor("A"), 40)
        .expect("first assignment");

    match service.assign(&project.id, &tailor("B"), 20) {
        Err(AssignmentError::OverCapacity {
            requested,
            remaining,
        }) => {
            assert_eq!(requested, 20);
            assert_eq!(remaining, 10);
        }
        other => panic!("expected over capacity, got {other:?}"),
    }
    assert_eq!(repository.assignment_count(), 1);
}

#[test]
fn busy_tailors_cannot_take_a_second_batch() {
    let (service, _, _) = ledger();
    let project = service
        .register_project(uniform_project(80))
        .expect("project registered");
    service
        .assign(&project.id, &tailor("A"), 10)
        .expect("first assignment");

    assert!(matches!(
        service.assign(&project.id, &tailor("A"), 10),
        Err(AssignmentError::TailorBusy(_))
    ));
}

#[test]
fn zero_pieces_and_unknown_projects_are_rejected() {
    let (service, _, _) = ledger();
    let project = service
        .register_project(uniform_project(10))
        .expect("project registered");

    assert!(matches!(
        service.assign(&project.id, &tailor("A"), 0),
        Err(AssignmentError::ZeroPieces)
    ));
    assert!(matches!(
        service.assign(&ProjectId("prj-missing".to_string()), &tailor("A"), 1),
        Err(AssignmentError::ProjectNotFound(_))
    ));
    assert!(matches!(
        service.register_project(uniform_project(0)),
        Err(AssignmentError::InvalidOrder(_))
    ));
}

#[test]
fn finished_projects_accept_no_assignments() {
    let (service, _, _) = ledger();
    let project = service
        .register_project(uniform_project(10))
        .expect("project registered");
    service
        .assign(&project.id, &tailor("A"), 4)
        .expect("early batch");

    let done = service.complete_project(&project.id).expect("completed");
    assert_eq!(done.status, ProjectStatus::Done);
    assert_eq!(
        service.project(&project.id).expect("stored").status,
        ProjectStatus::Done
    );

    assert!(matches!(
        service.assign(&project.id, &tailor("B"), 5),
        Err(AssignmentError::ProjectClosed(_))
    ));
    let progress = service.progress(&project.id).expect("progress");
    assert_eq!(progress.assigned, 4);
}

#[test]
fn completing_twice_is_harmless_and_unknown_projects_are_reported() {
    let (service, _, _) = ledger();
    let project = service
        .register_project(uniform_project(10))
        .expect("project registered");

    service.complete_project(&project.id).expect("first close");
    let again = service.complete_project(&project.id).expect("second close");
    assert_eq!(again.status, ProjectStatus::Done);

    assert!(matches!(
        service.complete_project(&ProjectId("prj-missing".to_string())),
        Err(AssignmentError::ProjectNotFound(_))
    ));
}

#[test]
fn concurrent_assignments_cannot_overbook_a_project() {
    let (service, repository, _) =
        ledger_over(MemoryLedger::sluggish(Duration::from_millis(50)));
    let project = service
        .register_project(uniform_project(10))
        .expect("project registered");

    let outcomes: Vec<bool> = thread::scope(|scope| {
        let handles: Vec<_> = ["Sri", "Dewi"]
            .into_iter()
            .map(|name| {
                let service = &service;
                let project_id = project.id.clone();
                scope.spawn(move || service.assign(&project_id, &tailor(name), 8).is_ok())
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("worker finished"))
            .collect()
    });

    assert_eq!(outcomes.iter().filter(|ok| **ok).count(), 1);
    assert_eq!(repository.assignment_count(), 1);
    let progress = service.progress(&project.id).expect("progress");
    assert_eq!(progress.assigned, 8);
    assert_eq!(progress.remaining, 2);
}

#[test]
fn concurrent_commits_cannot_double_book_a_tailor() {
    let (service, repository, _) =
        ledger_over(MemoryLedger::sluggish(Duration::from_millis(50)));
    let first = service
        .register_project(uniform_project(10))
        .expect("project registered");
    let second = service
        .register_project(uniform_project(10))
        .expect("project registered");

    let outcomes: Vec<bool> = thread::scope(|scope| {
        let handles: Vec<_> = [first.id.clone(), second.id.clone()]
            .into_iter()
            .map(|project_id| {
                let service = &service;
                scope.spawn(move || service.assign(&project_id, &tailor("Sri"), 5).is_ok())
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("worker finished"))
            .collect()
    });

    assert_eq!(outcomes.iter().filter(|ok| **ok).count(), 1);
    assert_eq!(repository.assignment_count(), 1);
}

#[test]
fn failed_roster_update_leaves_no_half_committed_plan() {
    let repository = Arc::new(MemoryLedger::default());
    let roster = Arc::new(StubbornRoster {
        inner: MemoryRoster::default(),
        refuse: tailor("C"),
    });
    let service = AssignmentService::new(repository.clone(), roster.clone());
    let project = service
        .register_project(uniform_project(60))
        .expect("project registered");
    let order = project.order().expect("valid order");
    let today = NaiveDate::from_ymd_opt(2025, 3, 28).expect("valid date");
    let ranked = ScoringEngine::default()
        .score(
            &order,
            &[roster_entry("A", 8.0), roster_entry("B", 6.0), roster_entry("C", 4.0)],
            today,
        )
        .candidates;
    let plan = TeamComposer::new(NonZeroU32::new(30).expect("cap")).compose_from(
        &ranked,
        order.quantity,
        order.window(today),
    );
    assert!(plan
        .members
        .iter()
        .any(|member| member.tailor.profile.name == "C" && member.assigned_pieces > 0));

    assert!(matches!(
        service.commit_plan(&project.id, &plan),
        Err(AssignmentError::Repository(RepositoryError::Unavailable(_)))
    ));
    assert_eq!(repository.assignment_count(), 0);
    assert_eq!(roster.inner.status("A"), TailorStatus::Idle);
    assert_eq!(roster.inner.status("B"), TailorStatus::Idle);
}

#[test]
fn paying_an_assignment_releases_the_tailor() {
    let (service, _, roster) = ledger();
    let project = service
        .register_project(uniform_project(20))
        .expect("project registered");
    let assignment = service
        .assign(&project.id, &tailor("Dewi"), 20)
        .expect("assignment stored");

    let submitted = service
        .update_status(&assignment.id, AssignmentStatus::Submitted)
        .expect("submitted");
    assert_eq!(submitted.status, AssignmentStatus::Submitted);
    assert_eq!(roster.status("Dewi"), TailorStatus::Working);

    service
        .update_status(&assignment.id, AssignmentStatus::Paid)
        .expect("paid");
    assert_eq!(roster.status("Dewi"), TailorStatus::Idle);

    let progress = service.progress(&project.id).expect("progress");
    assert_eq!(progress.remaining, 0);
    assert_eq!(progress.active_tailors, 0);
}

#[test]
fn unknown_assignment_cannot_change_status() {
    let (service, _, _) = ledger();

    assert!(matches!(
        service.update_status(
            &crate::workflows::assignments::AssignmentId("asg-missing".to_string()),
            AssignmentStatus::Paid
        ),
        Err(AssignmentError::AssignmentNotFound(_))
    ));
}

fn roster_entry(name: &str, speed: f64) -> RosterEntry {
    RosterEntry {
        profile: TailorProfile {
            id: TailorId::from_name(name),
            name: name.to_string(),
            age: 40,
            home_distance_km: 3.0,
            speeds: [(SpeedColumn::WhiteShirt, speed), (SpeedColumn::ScoutShirt, speed)]
                .into_iter()
                .collect(),
            attributes: AttributeScores {
                neatness: 0.9,
                commitment: 0.9,
                punctuality: 0.9,
            },
            specialty: "seragam".to_string(),
        },
        status: TailorStatus::Idle,
    }
}

#[test]
fn committing_a_team_plan_assigns_every_member() {
    let (service, repository, roster) = ledger();
    let project = service
        .register_project(uniform_project(60))
        .expect("project registered");
    let order = project.order().expect("valid order");
    let today = NaiveDate::from_ymd_opt(2025, 3, 28).expect("valid date");
    let ranked = ScoringEngine::default()
        .score(
            &order,
            &[roster_entry("A", 8.0), roster_entry("B", 6.0), roster_entry("C", 4.0)],
            today,
        )
        .candidates;
    let plan = TeamComposer::new(NonZeroU32::new(30).expect("cap")).compose_from(
        &ranked,
        order.quantity,
        order.window(today),
    );

    let created = service
        .commit_plan(&project.id, &plan)
        .expect("plan committed");

    assert_eq!(created.len(), plan.members.len());
    assert_eq!(repository.assignment_count(), created.len());
    let total: u32 = created.iter().map(|assignment| assignment.pieces).sum();
    assert_eq!(total, plan.assigned_pieces);
    for member in &plan.members {
        assert_eq!(roster.status(&member.tailor.profile.name), TailorStatus::Working);
    }
}

#[test]
fn plan_exceeding_the_remaining_quota_writes_nothing() {
    let (service, repository, roster) = ledger();
    let project = service
        .register_project(uniform_project(60))
        .expect("project registered");
    service
        .assign(&project.id, &tailor("Early bird"), 50)
        .expect("first assignment");

    let order = project.order().expect("valid order");
    let today = NaiveDate::from_ymd_opt(2025, 3, 28).expect("valid date");
    let ranked = ScoringEngine::default()
        .score(&order, &[roster_entry("A", 8.0), roster_entry("B", 6.0)], today)
        .candidates;
    let plan = TeamComposer::new(NonZeroU32::new(40).expect("cap")).compose_from(
        &ranked,
        order.quantity,
        order.window(today),
    );

    assert!(matches!(
        service.commit_plan(&project.id, &plan),
        Err(AssignmentError::OverCapacity { remaining: 10, .. })
    ));
    assert_eq!(repository.assignment_count(), 1);
    assert_eq!(roster.status("A"), TailorStatus::Idle);
}

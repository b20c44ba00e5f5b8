use std::num::NonZeroU32;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use super::availability::{join_roster, AvailabilityError, AvailabilityProvider};
use super::domain::{OrderRequest, RosterEntry};
use super::outcome::{AllocationIssue, AllocationPlan, Recommendation};
use super::scoring::{strategy_summary, ScoringEngine, ScoringPolicy};
use super::team::{TeamComposer, TeamPlan};
use crate::config::default_piece_cap;
use crate::workflows::catalog::{CatalogImportError, CatalogSource};

/// Service composing the skill catalog, the live roster and the scoring engine.
///
/// Every public method returns a well-formed result; failures are classified into
/// [`AllocationIssue`] instead of being raised.
pub struct AllocationService<C, A> {
    catalog: Arc<C>,
    availability: Arc<A>,
    engine: Arc<ScoringEngine>,
    per_person_cap: NonZeroU32,
}

impl<C, A> AllocationService<C, A>
where
    C: CatalogSource + 'static,
    A: AvailabilityProvider + 'static,
{
    pub fn new(catalog: Arc<C>, availability: Arc<A>, policy: ScoringPolicy) -> Self {
        Self {
            catalog,
            availability,
            engine: Arc::new(ScoringEngine::new(policy)),
            per_person_cap: default_piece_cap(),
        }
    }

    /// Cap used when a team request does not name one.
    pub fn with_per_person_cap(mut self, per_person_cap: NonZeroU32) -> Self {
        self.per_person_cap = per_person_cap;
        self
    }

    pub fn per_person_cap(&self) -> NonZeroU32 {
        self.per_person_cap
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    /// Rank every eligible tailor for the order as of `today`.
    pub fn recommend(&self, order: &OrderRequest, today: NaiveDate) -> Recommendation {
        let window = order.window(today);
        let mode = self.engine.mode_for(&window);

        let roster = match self.load_roster() {
            Ok(roster) => roster,
            Err(err) => {
                warn!(error = %err, category = ?order.category, "allocation data unavailable");
                let issue = AllocationIssue::DataUnavailable {
                    message: err.to_string(),
                };
                return Recommendation {
                    order: *order,
                    evaluated_on: today,
                    window,
                    mode,
                    candidates: Vec::new(),
                    summary: issue.message().to_string(),
                    issue: Some(issue),
                };
            }
        };

        let run = self.engine.score(order, &roster, today);

        if run.candidates.is_empty() {
            let message = if roster.is_empty() {
                "skill catalog does not list any tailors".to_string()
            } else {
                format!(
                    "no tailor has recorded capability for {} orders",
                    order.category
                )
            };
            warn!(category = ?order.category, roster = roster.len(), "no eligible candidates");
            return Recommendation {
                order: *order,
                evaluated_on: today,
                window: run.window,
                mode: run.mode,
                candidates: Vec::new(),
                summary: message.clone(),
                issue: Some(AllocationIssue::NoEligibleCandidates { message }),
            };
        }

        info!(
            category = ?order.category,
            quantity = order.quantity,
            candidates = run.candidates.len(),
            mode = ?run.mode,
            "scored tailors for order"
        );

        Recommendation {
            order: *order,
            evaluated_on: today,
            summary: strategy_summary(order, &run.window, run.mode),
            window: run.window,
            mode: run.mode,
            candidates: run.candidates,
            issue: None,
        }
    }

    /// Split the order over idle candidates from a previous recommendation.
    pub fn compose_team(
        &self,
        recommendation: &Recommendation,
        per_person_cap: NonZeroU32,
    ) -> TeamPlan {
        let plan = TeamComposer::new(per_person_cap).compose(recommendation);
        if let Some(issue) = plan.issue() {
            warn!(kind = issue.kind(), detail = issue.message(), "team composed with warnings");
        }
        plan
    }

    /// Recommend, then compose a team only when nobody can carry the order alone.
    pub fn plan(
        &self,
        order: &OrderRequest,
        today: NaiveDate,
        per_person_cap: NonZeroU32,
    ) -> AllocationPlan {
        let recommendation = self.recommend(order, today);
        let team = recommendation
            .needs_team()
            .then(|| self.compose_team(&recommendation, per_person_cap));

        AllocationPlan {
            recommendation,
            team,
        }
    }

    fn load_roster(&self) -> Result<Vec<RosterEntry>, AllocationDataError> {
        let catalog = self.catalog.load()?;
        let snapshot = self.availability.snapshot()?;
        Ok(join_roster(&catalog, &snapshot))
    }
}

#[derive(Debug, thiserror::Error)]
enum AllocationDataError {
    #[error("skill catalog unavailable: {0}")]
    Catalog(#[from] CatalogImportError),
    #[error("tailor availability unavailable: {0}")]
    Availability(#[from] AvailabilityError),
}

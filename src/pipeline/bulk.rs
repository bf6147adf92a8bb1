//! Bulk stage moves: apply one target stage across many applications with
//! per-item validation and continue-on-error reporting.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::activity::{ActivityLog, ActivityPayload, AtsActivity};
use super::domain::{ApplicationId, Actor, Stage};
use super::error::{PipelineError, ValidationError};
use super::repository::{ActivityRepository, JobApplicationRepository, JobPostingRepository};
use super::settings::EngineConfig;
use super::stage_machine::plan_stage_move;

/// One failed item of a bulk move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkMoveFailure {
    pub application_id: ApplicationId,
    pub error: String,
}

/// Outcome of a bulk move. Items are independent: a partial batch leaves
/// some applications updated and others not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkMoveOutcome {
    pub updated: usize,
    pub failed: usize,
    pub errors: Vec<BulkMoveFailure>,
}

impl BulkMoveOutcome {
    /// Overall success: false only when zero items succeeded.
    pub fn success(&self) -> bool {
        self.updated > 0
    }
}

/// Applies a stage change across many applications. Each item runs the same
/// enablement/ordering/sub-stage validation as the single-item path and
/// writes its own activity entry; no notifications are sent from this path.
pub struct BulkStageUpdater<J, A, L> {
    jobs: Arc<J>,
    applications: Arc<A>,
    activity: ActivityLog<L>,
    bulk_limit: usize,
}

impl<J, A, L> BulkStageUpdater<J, A, L>
where
    J: JobPostingRepository + 'static,
    A: JobApplicationRepository + 'static,
    L: ActivityRepository + 'static,
{
    pub fn new(
        jobs: Arc<J>,
        applications: Arc<A>,
        activity_repository: Arc<L>,
        config: EngineConfig,
    ) -> Self {
        let bulk_limit = config.bulk_limit;
        Self {
            jobs,
            applications,
            activity: ActivityLog::new(activity_repository, config),
            bulk_limit,
        }
    }

    /// Moves every listed application to `target_stage` (a raw stage label).
    ///
    /// A malformed stage label or an oversized batch fails the whole call;
    /// per-item failures are collected into the outcome and never abort the
    /// batch.
    pub fn bulk_move(
        &self,
        application_ids: &[ApplicationId],
        target_stage: &str,
        actor: &Actor,
    ) -> Result<BulkMoveOutcome, PipelineError> {
        let stage = Stage::parse(target_stage)
            .ok_or_else(|| ValidationError::UnknownStage(target_stage.to_string()))?;
        if application_ids.len() > self.bulk_limit {
            return Err(ValidationError::BulkTooLarge {
                limit: self.bulk_limit,
                got: application_ids.len(),
            }
            .into());
        }

        let mut outcome = BulkMoveOutcome {
            updated: 0,
            failed: 0,
            errors: Vec::new(),
        };
        for application_id in application_ids {
            match self.move_one(application_id, stage, actor) {
                Ok(()) => outcome.updated += 1,
                Err(error) => {
                    outcome.failed += 1;
                    outcome.errors.push(BulkMoveFailure {
                        application_id: application_id.clone(),
                        error: error.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            target_stage = %stage,
            updated = outcome.updated,
            failed = outcome.failed,
            "bulk stage move finished"
        );
        Ok(outcome)
    }

    fn move_one(
        &self,
        application_id: &ApplicationId,
        stage: Stage,
        actor: &Actor,
    ) -> Result<(), PipelineError> {
        let mut application = self
            .applications
            .find_by_id(application_id)?
            .ok_or_else(|| PipelineError::ApplicationNotFound(application_id.clone()))?;
        if application.company_id != actor.company_id {
            return Err(PipelineError::ForeignApplication(application_id.clone()));
        }
        let job = self
            .jobs
            .find_by_id(&application.job_id)?
            .ok_or_else(|| PipelineError::JobNotFound(application.job_id.clone()))?;

        let resolved = plan_stage_move(&job, &application, stage, None)?;

        let from_stage = application.stage;
        let from_sub_stage = application.sub_stage;
        application.apply_stage_move(stage, resolved, None);
        self.applications.update(&application)?;

        self.activity.append(AtsActivity::record(
            application.id.clone(),
            actor,
            ActivityPayload::StageChanged {
                from_stage,
                from_sub_stage,
                to_stage: application.stage,
                to_sub_stage: application.sub_stage,
            },
        ))?;
        Ok(())
    }
}

//! The per-application stage machine: validates and executes stage and
//! sub-stage transitions against the owning job's pipeline configuration.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;

use super::activity::{ActivityLog, ActivityPayload, AtsActivity};
use super::config::PipelineConfig;
use super::domain::{
    ApplicationId, Actor, JobApplication, JobId, JobPosting, SeekerId, Stage, SubStage,
};
use super::error::{PipelineError, ValidationError};
use super::repository::{
    ActivityRepository, JobApplicationRepository, JobPostingRepository, NotificationService,
    StageChangeNotification,
};
use super::settings::EngineConfig;

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_application_id() -> ApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("app-{id:06}"))
}

/// A requested stage move. `sub_stage` falls back to the catalog default for
/// the target stage when omitted; `rejection_reason` is stored only when the
/// target stage is [`Stage::Rejected`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageMoveRequest {
    pub next_stage: Stage,
    pub sub_stage: Option<SubStage>,
    pub rejection_reason: Option<String>,
}

impl StageMoveRequest {
    pub fn to(next_stage: Stage) -> Self {
        Self {
            next_stage,
            sub_stage: None,
            rejection_reason: None,
        }
    }
}

/// Validates a stage move against the job's enabled ordering and resolves
/// the destination sub-stage. Shared by the single-item and bulk paths so
/// both enforce identical rules.
///
/// A target stage must be enabled for the job or be a terminal system stage.
/// When both the current and target stages resolve to positions in the
/// job's ordering, the target may not sit earlier than the current one.
pub(crate) fn plan_stage_move(
    job: &JobPosting,
    application: &JobApplication,
    next_stage: Stage,
    requested_sub_stage: Option<SubStage>,
) -> Result<SubStage, ValidationError> {
    let next_idx = job.stage_index(next_stage);
    if next_idx.is_none() && !next_stage.is_terminal() {
        return Err(ValidationError::StageNotEnabled(next_stage));
    }

    if let (Some(current_idx), Some(next_idx)) = (job.stage_index(application.stage), next_idx) {
        if next_idx < current_idx {
            return Err(ValidationError::BackwardMove {
                from: application.stage,
                to: next_stage,
            });
        }
    }

    PipelineConfig::resolve(job).resolve_sub_stage(next_stage, requested_sub_stage)
}

/// Service executing stage and sub-stage transitions: fetch, validate,
/// persist, record activity, and (for stage changes) notify the seeker
/// best-effort.
pub struct StageMachine<J, A, L, N> {
    jobs: Arc<J>,
    applications: Arc<A>,
    activity: ActivityLog<L>,
    notifier: Arc<N>,
}

impl<J, A, L, N> StageMachine<J, A, L, N>
where
    J: JobPostingRepository + 'static,
    A: JobApplicationRepository + 'static,
    L: ActivityRepository + 'static,
    N: NotificationService + 'static,
{
    pub fn new(
        jobs: Arc<J>,
        applications: Arc<A>,
        activity_repository: Arc<L>,
        notifier: Arc<N>,
        config: EngineConfig,
    ) -> Self {
        Self {
            jobs,
            applications,
            activity: ActivityLog::new(activity_repository, config),
            notifier,
        }
    }

    fn owned_application(
        &self,
        application_id: &ApplicationId,
        actor: &Actor,
    ) -> Result<JobApplication, PipelineError> {
        let application = self
            .applications
            .find_by_id(application_id)?
            .ok_or_else(|| PipelineError::ApplicationNotFound(application_id.clone()))?;
        if application.company_id != actor.company_id {
            return Err(PipelineError::ForeignApplication(application_id.clone()));
        }
        Ok(application)
    }

    fn job_for(&self, job_id: &JobId) -> Result<JobPosting, PipelineError> {
        self.jobs
            .find_by_id(job_id)?
            .ok_or_else(|| PipelineError::JobNotFound(job_id.clone()))
    }

    /// Creates an application at the job's first enabled stage with that
    /// stage's default sub-stage, and records the `Applied` activity.
    pub fn submit_application(
        &self,
        job_id: &JobId,
        seeker_id: SeekerId,
        actor: &Actor,
    ) -> Result<JobApplication, PipelineError> {
        let job = self.job_for(job_id)?;
        if job.company_id != actor.company_id {
            return Err(PipelineError::ForeignJob(job_id.clone()));
        }

        let application =
            JobApplication::submit(next_application_id(), &job, seeker_id, Utc::now())
                .ok_or(ValidationError::JobHasNoStages)?;
        let stored = self.applications.insert(application)?;

        self.activity.append(AtsActivity::record(
            stored.id.clone(),
            actor,
            ActivityPayload::Applied {
                stage: stored.stage,
                sub_stage: stored.sub_stage,
            },
        ))?;
        Ok(stored)
    }

    /// Moves an application to another stage.
    ///
    /// Validation order: application exists and belongs to the actor's
    /// company, job exists, target stage is enabled (or terminal), the move
    /// is not backward, and the sub-stage resolves for the target stage.
    /// Persists with a version bump, records one activity entry, and sends
    /// at most one best-effort notification when the stage actually changed.
    pub fn move_stage(
        &self,
        application_id: &ApplicationId,
        request: StageMoveRequest,
        actor: &Actor,
    ) -> Result<JobApplication, PipelineError> {
        let mut application = self.owned_application(application_id, actor)?;
        let job = self.job_for(&application.job_id)?;

        let resolved =
            plan_stage_move(&job, &application, request.next_stage, request.sub_stage)?;

        let from_stage = application.stage;
        let from_sub_stage = application.sub_stage;
        application.apply_stage_move(request.next_stage, resolved, request.rejection_reason);
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

        if from_stage != application.stage {
            let notification = StageChangeNotification {
                application_id: application.id.clone(),
                seeker_id: application.seeker_id.clone(),
                job_id: job.id.clone(),
                job_title: job.title.clone(),
                from_stage,
                to_stage: application.stage,
                changed_at: Utc::now(),
            };
            // Best-effort only: a transition must succeed even when the
            // seeker cannot be reached.
            if let Err(error) = self.notifier.notify(notification) {
                tracing::warn!(
                    application_id = %application.id,
                    %error,
                    "stage change notification failed"
                );
            }
        }

        Ok(application)
    }

    /// Changes only the sub-stage, validated against the application's
    /// current stage. No notification is sent.
    pub fn move_sub_stage(
        &self,
        application_id: &ApplicationId,
        sub_stage: SubStage,
        actor: &Actor,
    ) -> Result<JobApplication, PipelineError> {
        let mut application = self.owned_application(application_id, actor)?;
        let job = self.job_for(&application.job_id)?;

        let resolved =
            PipelineConfig::resolve(&job).resolve_sub_stage(application.stage, Some(sub_stage))?;

        let from_sub_stage = application.sub_stage;
        application.apply_sub_stage(resolved);
        self.applications.update(&application)?;

        self.activity.append(AtsActivity::record(
            application.id.clone(),
            actor,
            ActivityPayload::SubStageChanged {
                stage: application.stage,
                from_sub_stage,
                to_sub_stage: application.sub_stage,
            },
        ))?;
        Ok(application)
    }

    /// Appends a free-form comment to the application's activity trail.
    pub fn add_comment(
        &self,
        application_id: &ApplicationId,
        comment: String,
        actor: &Actor,
    ) -> Result<(), PipelineError> {
        let application = self.owned_application(application_id, actor)?;
        self.activity.append(AtsActivity::record(
            application.id,
            actor,
            ActivityPayload::CommentAdded { comment },
        ))
    }

    /// Cursor-paginated activity history for an application.
    pub fn history(
        &self,
        application_id: &ApplicationId,
        limit: usize,
        cursor: Option<&super::activity::ActivityCursor>,
        actor: &Actor,
    ) -> Result<super::activity::ActivityPage, PipelineError> {
        let application = self.owned_application(application_id, actor)?;
        self.activity.history(&application.id, limit, cursor)
    }
}

use super::artifacts::{InterviewStatus, MeetingStatus, OfferStatus, TaskStatus};
use super::domain::{
    ApplicationId, InterviewId, JobId, MeetingId, OfferId, Stage, SubStage, TaskId,
};
use super::repository::RepositoryError;

/// Workflow rule violations surfaced to the caller as typed failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("unknown stage: {0}")]
    UnknownStage(String),
    #[error("stage {0} is not enabled for this job")]
    StageNotEnabled(Stage),
    #[error("cannot move to an earlier stage ({from} -> {to})")]
    BackwardMove { from: Stage, to: Stage },
    #[error("sub-stage {sub_stage} is not allowed for stage {stage}")]
    SubStageNotAllowed { stage: Stage, sub_stage: SubStage },
    #[error("no sub-stage configured for stage {0}")]
    NoSubStageConfigured(Stage),
    #[error("job has no enabled stages")]
    JobHasNoStages,
    #[error("bulk update of {got} applications exceeds the limit of {limit}")]
    BulkTooLarge { limit: usize, got: usize },
    #[error("interview is already {0}")]
    InterviewClosed(InterviewStatus),
    #[error("technical task cannot move from {from} to {to}")]
    TaskTransition { from: TaskStatus, to: TaskStatus },
    #[error("offer must be sent before it can be concluded")]
    OfferNotSent,
    #[error("offer has already been sent (status: {0})")]
    OfferAlreadySent(OfferStatus),
    #[error("offer is already {0}")]
    OfferClosed(OfferStatus),
    #[error("compensation meeting is already {0}")]
    MeetingClosed(MeetingStatus),
    #[error("rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(u8),
    #[error("rating has already been submitted")]
    RatingAlreadySubmitted,
    #[error("feedback has already been submitted")]
    FeedbackAlreadySubmitted,
    #[error("feedback update carries neither rating nor feedback")]
    EmptyFeedbackUpdate,
}

/// Failures raised by the pipeline services: missing entities, workflow rule
/// violations, company-scope authorization, and storage errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PipelineError {
    #[error("job posting not found: {0}")]
    JobNotFound(JobId),
    #[error("application not found: {0}")]
    ApplicationNotFound(ApplicationId),
    #[error("interview not found: {0}")]
    InterviewNotFound(InterviewId),
    #[error("technical task not found: {0}")]
    TaskNotFound(TaskId),
    #[error("offer not found: {0}")]
    OfferNotFound(OfferId),
    #[error("compensation meeting not found: {0}")]
    MeetingNotFound(MeetingId),
    #[error("job {0} does not belong to this company")]
    ForeignJob(JobId),
    #[error("application {0} does not belong to this company")]
    ForeignApplication(ApplicationId),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

//! Collaborator contracts the engine consumes. Storage technology, mail
//! transport, and profile lookups all live behind these traits so the
//! workflow services can be exercised in isolation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::activity::{ActivityCursor, AtsActivity};
use super::artifacts::{CompensationMeeting, Interview, Offer, TechnicalTask};
use super::domain::{
    ApplicationId, InterviewId, JobApplication, JobId, JobPosting, MeetingId, OfferId, SeekerId,
    Stage, TaskId,
};

/// Error enumeration for repository failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

pub trait JobPostingRepository: Send + Sync {
    fn find_by_id(&self, id: &JobId) -> Result<Option<JobPosting>, RepositoryError>;
}

/// Storage abstraction for the application aggregate.
///
/// `update` is a version-checked write: implementations must reject a write
/// whose `version` is not exactly one greater than the stored version with
/// [`RepositoryError::Conflict`], so stale-read races surface as typed
/// failures instead of silent lost updates.
pub trait JobApplicationRepository: Send + Sync {
    fn insert(&self, application: JobApplication) -> Result<JobApplication, RepositoryError>;
    fn update(&self, application: &JobApplication) -> Result<(), RepositoryError>;
    fn find_by_id(&self, id: &ApplicationId) -> Result<Option<JobApplication>, RepositoryError>;
    fn find_by_job(&self, job_id: &JobId) -> Result<Vec<JobApplication>, RepositoryError>;
}

/// Append-only activity storage.
///
/// `find_by_application` returns entries strictly older than `cursor` (per
/// [`ActivityCursor::admits`]), ordered newest-first, at most `limit` of
/// them. Entries are never updated or deleted.
pub trait ActivityRepository: Send + Sync {
    fn create(&self, activity: AtsActivity) -> Result<(), RepositoryError>;
    fn find_by_application(
        &self,
        application_id: &ApplicationId,
        limit: usize,
        cursor: Option<&ActivityCursor>,
    ) -> Result<Vec<AtsActivity>, RepositoryError>;
}

pub trait InterviewRepository: Send + Sync {
    fn create(&self, interview: Interview) -> Result<Interview, RepositoryError>;
    fn update(&self, interview: &Interview) -> Result<(), RepositoryError>;
    fn find_by_id(&self, id: &InterviewId) -> Result<Option<Interview>, RepositoryError>;
    fn find_by_application(
        &self,
        application_id: &ApplicationId,
    ) -> Result<Vec<Interview>, RepositoryError>;
}

pub trait TechnicalTaskRepository: Send + Sync {
    fn create(&self, task: TechnicalTask) -> Result<TechnicalTask, RepositoryError>;
    fn update(&self, task: &TechnicalTask) -> Result<(), RepositoryError>;
    fn find_by_id(&self, id: &TaskId) -> Result<Option<TechnicalTask>, RepositoryError>;
    fn find_by_application(
        &self,
        application_id: &ApplicationId,
    ) -> Result<Vec<TechnicalTask>, RepositoryError>;
}

pub trait OfferRepository: Send + Sync {
    fn create(&self, offer: Offer) -> Result<Offer, RepositoryError>;
    fn update(&self, offer: &Offer) -> Result<(), RepositoryError>;
    fn find_by_id(&self, id: &OfferId) -> Result<Option<Offer>, RepositoryError>;
    fn find_by_application(
        &self,
        application_id: &ApplicationId,
    ) -> Result<Vec<Offer>, RepositoryError>;
}

pub trait CompensationMeetingRepository: Send + Sync {
    fn create(&self, meeting: CompensationMeeting)
        -> Result<CompensationMeeting, RepositoryError>;
    fn update(&self, meeting: &CompensationMeeting) -> Result<(), RepositoryError>;
    fn find_by_id(&self, id: &MeetingId) -> Result<Option<CompensationMeeting>, RepositoryError>;
    fn find_by_application(
        &self,
        application_id: &ApplicationId,
    ) -> Result<Vec<CompensationMeeting>, RepositoryError>;
}

/// Read-only seeker display data used to enrich kanban cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeekerSummary {
    pub name: String,
    pub headline: Option<String>,
}

pub trait SeekerDirectory: Send + Sync {
    fn find_summary(&self, seeker_id: &SeekerId) -> Result<Option<SeekerSummary>, RepositoryError>;
}

/// Outbound stage-change notification handed to the mail/notification
/// collaborator. Delivery is best-effort; the engine never fails a
/// transition because a seeker could not be reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageChangeNotification {
    pub application_id: ApplicationId,
    pub seeker_id: SeekerId,
    pub job_id: JobId,
    pub job_title: String,
    pub from_stage: Stage,
    pub to_stage: Stage,
    pub changed_at: DateTime<Utc>,
}

/// Notification dispatch error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotificationError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

pub trait NotificationService: Send + Sync {
    fn notify(&self, notification: StageChangeNotification) -> Result<(), NotificationError>;
}

//! The ATS pipeline: per-job stage machines, artifact lifecycles, activity
//! trail, and the kanban/bulk views built on them.

pub mod activity;
pub mod artifacts;
pub mod bulk;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod error;
pub mod kanban;
pub mod repository;
pub mod settings;
pub mod stage_machine;

#[cfg(test)]
mod tests;

pub use activity::{ActivityCursor, ActivityLog, ActivityPage, ActivityPayload, AtsActivity};
pub use artifacts::{
    ArtifactEngine, CompensationMeeting, Interview, InterviewStatus, InterviewTransition,
    MeetingStatus, MeetingUpdate, Offer, OfferResolution, OfferStatus, TaskStatus, TaskTransition,
    TechnicalTask,
};
pub use bulk::{BulkMoveFailure, BulkMoveOutcome, BulkStageUpdater};
pub use config::PipelineConfig;
pub use domain::{
    ActivityId, ApplicationId, Actor, CompanyId, InterviewId, JobApplication, JobId, JobPosting,
    MeetingId, OfferId, SeekerId, Stage, SubStage, TaskId, UserId,
};
pub use error::{PipelineError, ValidationError};
pub use kanban::{KanbanBoard, KanbanCard, KanbanColumn, KanbanProjector};
pub use repository::{
    ActivityRepository, CompensationMeetingRepository, InterviewRepository,
    JobApplicationRepository, JobPostingRepository, NotificationError, NotificationService,
    OfferRepository, RepositoryError, SeekerDirectory, SeekerSummary, StageChangeNotification,
    TechnicalTaskRepository,
};
pub use settings::EngineConfig;
pub use stage_machine::{StageMachine, StageMoveRequest};

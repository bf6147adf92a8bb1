use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::catalog;

/// Top-level hiring phase for a job application.
///
/// The enum is the global vocabulary; which stages apply to a given job, and
/// in what order, is decided by [`JobPosting::enabled_stages`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    InReview,
    Shortlisted,
    Interview,
    TechnicalTask,
    Compensation,
    Offer,
    Hired,
    Rejected,
}

impl Stage {
    pub const fn all() -> [Self; 8] {
        [
            Self::InReview,
            Self::Shortlisted,
            Self::Interview,
            Self::TechnicalTask,
            Self::Compensation,
            Self::Offer,
            Self::Hired,
            Self::Rejected,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::InReview => "in_review",
            Self::Shortlisted => "shortlisted",
            Self::Interview => "interview",
            Self::TechnicalTask => "technical_task",
            Self::Compensation => "compensation",
            Self::Offer => "offer",
            Self::Hired => "hired",
            Self::Rejected => "rejected",
        }
    }

    /// Terminal system stages are always legal move targets, even for jobs
    /// whose enabled list omits them.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Hired | Self::Rejected)
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "in_review" => Some(Self::InReview),
            "shortlisted" => Some(Self::Shortlisted),
            "interview" => Some(Self::Interview),
            "technical_task" => Some(Self::TechnicalTask),
            "compensation" => Some(Self::Compensation),
            "offer" => Some(Self::Offer),
            "hired" => Some(Self::Hired),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Finer-grained status nested under a [`Stage`], drawn from the stage
/// catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubStage {
    ProfileReview,
    ApplicationReview,
    ShortlistedPendingAction,
    AwaitingHrReview,
    InterviewToBeScheduled,
    InterviewScheduled,
    InterviewCompleted,
    TaskToBeAssigned,
    TaskAssigned,
    TaskSubmitted,
    TaskUnderReview,
    TaskReviewed,
    MeetingToBeScheduled,
    MeetingScheduled,
    MeetingCompleted,
    OfferToBeDrafted,
    OfferDrafted,
    OfferSent,
    OfferSigned,
    OfferDeclined,
    HiredConfirmed,
    RejectedByCompany,
    WithdrawnBySeeker,
}

impl SubStage {
    pub const fn label(self) -> &'static str {
        match self {
            Self::ProfileReview => "profile_review",
            Self::ApplicationReview => "application_review",
            Self::ShortlistedPendingAction => "shortlisted_pending_action",
            Self::AwaitingHrReview => "awaiting_hr_review",
            Self::InterviewToBeScheduled => "interview_to_be_scheduled",
            Self::InterviewScheduled => "interview_scheduled",
            Self::InterviewCompleted => "interview_completed",
            Self::TaskToBeAssigned => "task_to_be_assigned",
            Self::TaskAssigned => "task_assigned",
            Self::TaskSubmitted => "task_submitted",
            Self::TaskUnderReview => "task_under_review",
            Self::TaskReviewed => "task_reviewed",
            Self::MeetingToBeScheduled => "meeting_to_be_scheduled",
            Self::MeetingScheduled => "meeting_scheduled",
            Self::MeetingCompleted => "meeting_completed",
            Self::OfferToBeDrafted => "offer_to_be_drafted",
            Self::OfferDrafted => "offer_drafted",
            Self::OfferSent => "offer_sent",
            Self::OfferSigned => "offer_signed",
            Self::OfferDeclined => "offer_declined",
            Self::HiredConfirmed => "hired_confirmed",
            Self::RejectedByCompany => "rejected_by_company",
            Self::WithdrawnBySeeker => "withdrawn_by_seeker",
        }
    }
}

impl fmt::Display for SubStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name(pub String);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Identifier wrapper for job postings.
    JobId
);
string_id!(
    /// Identifier wrapper for companies (the hiring side).
    CompanyId
);
string_id!(
    /// Identifier wrapper for job seekers.
    SeekerId
);
string_id!(
    /// Identifier wrapper for HR users acting on the pipeline.
    UserId
);
string_id!(
    /// Identifier wrapper for job applications.
    ApplicationId
);
string_id!(
    /// Identifier wrapper for activity trail entries.
    ActivityId
);
string_id!(
    /// Identifier wrapper for interviews.
    InterviewId
);
string_id!(
    /// Identifier wrapper for technical tasks.
    TaskId
);
string_id!(
    /// Identifier wrapper for offers.
    OfferId
);
string_id!(
    /// Identifier wrapper for compensation meetings.
    MeetingId
);

/// The HR user performing a pipeline action, with the company scope used for
/// authorization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: UserId,
    pub name: String,
    pub company_id: CompanyId,
}

/// The slice of a job posting the pipeline engine depends on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: JobId,
    pub company_id: CompanyId,
    pub title: String,
    /// Ordered, job-specific stage sequence chosen at job creation. Defines
    /// both the valid stage set and what "forward" means for this job.
    pub enabled_stages: Vec<Stage>,
}

impl JobPosting {
    /// Position of a stage in this job's ordering, when present.
    pub fn stage_index(&self, stage: Stage) -> Option<usize> {
        self.enabled_stages.iter().position(|&s| s == stage)
    }

    /// First enabled stage, where freshly submitted applications land.
    pub fn initial_stage(&self) -> Option<Stage> {
        self.enabled_stages.first().copied()
    }
}

/// Job application aggregate. Mutated only through the stage machine and the
/// artifact engines; never deleted (terminal lifecycle via `Hired`/`Rejected`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobApplication {
    pub id: ApplicationId,
    pub job_id: JobId,
    pub company_id: CompanyId,
    pub seeker_id: SeekerId,
    pub stage: Stage,
    pub sub_stage: SubStage,
    pub ats_score: u8,
    pub applied_at: DateTime<Utc>,
    pub rejection_reason: Option<String>,
    /// Optimistic-concurrency token. Every engine mutation bumps it by one;
    /// repositories reject non-consecutive writes with a conflict.
    pub version: u64,
}

impl JobApplication {
    /// Creates the aggregate at the job's first enabled stage with that
    /// stage's catalog default sub-stage.
    ///
    /// Returns `None` when the job has no enabled stages.
    pub fn submit(
        id: ApplicationId,
        job: &JobPosting,
        seeker_id: SeekerId,
        applied_at: DateTime<Utc>,
    ) -> Option<Self> {
        let stage = job.initial_stage()?;
        Some(Self {
            id,
            job_id: job.id.clone(),
            company_id: job.company_id.clone(),
            seeker_id,
            stage,
            sub_stage: catalog::default_sub_stage(stage),
            ats_score: 0,
            applied_at,
            rejection_reason: None,
            version: 1,
        })
    }

    pub(crate) fn apply_stage_move(
        &mut self,
        stage: Stage,
        sub_stage: SubStage,
        rejection_reason: Option<String>,
    ) {
        self.stage = stage;
        self.sub_stage = sub_stage;
        if stage == Stage::Rejected {
            self.rejection_reason = rejection_reason;
        }
        self.version += 1;
    }

    pub(crate) fn apply_sub_stage(&mut self, sub_stage: SubStage) {
        self.sub_stage = sub_stage;
        self.version += 1;
    }
}

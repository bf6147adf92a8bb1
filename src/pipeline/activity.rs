//! Append-only activity trail: every mutating pipeline action becomes one
//! immutable [`AtsActivity`] record, queried newest-first with a composite
//! `(created_at, id)` cursor so pagination stays total even with duplicate
//! timestamps.

use std::cmp::Ordering;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::artifacts::{InterviewStatus, MeetingStatus, OfferResolution, TaskStatus};
use super::domain::{
    ActivityId, ApplicationId, Actor, InterviewId, MeetingId, OfferId, Stage, SubStage, TaskId,
    UserId,
};
use super::error::PipelineError;
use super::repository::ActivityRepository;
use super::settings::EngineConfig;

static ACTIVITY_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_activity_id() -> ActivityId {
    let id = ACTIVITY_SEQUENCE.fetch_add(1, AtomicOrdering::Relaxed);
    ActivityId(format!("act-{id:08}"))
}

/// Discriminated description of what happened to an application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActivityPayload {
    Applied {
        stage: Stage,
        sub_stage: SubStage,
    },
    StageChanged {
        from_stage: Stage,
        from_sub_stage: SubStage,
        to_stage: Stage,
        to_sub_stage: SubStage,
    },
    SubStageChanged {
        stage: Stage,
        from_sub_stage: SubStage,
        to_sub_stage: SubStage,
    },
    CommentAdded {
        comment: String,
    },
    InterviewScheduled {
        interview_id: InterviewId,
        scheduled_at: DateTime<Utc>,
    },
    InterviewStatusChanged {
        interview_id: InterviewId,
        from_status: InterviewStatus,
        to_status: InterviewStatus,
    },
    InterviewFeedbackRecorded {
        interview_id: InterviewId,
        rating: Option<u8>,
    },
    TaskAssigned {
        task_id: TaskId,
        title: String,
    },
    TaskStatusChanged {
        task_id: TaskId,
        from_status: TaskStatus,
        to_status: TaskStatus,
    },
    TaskFeedbackRecorded {
        task_id: TaskId,
        rating: Option<u8>,
    },
    OfferDrafted {
        offer_id: OfferId,
    },
    OfferSent {
        offer_id: OfferId,
    },
    OfferConcluded {
        offer_id: OfferId,
        resolution: OfferResolution,
    },
    MeetingScheduled {
        meeting_id: MeetingId,
        scheduled_at: DateTime<Utc>,
    },
    MeetingRescheduled {
        meeting_id: MeetingId,
        scheduled_at: DateTime<Utc>,
    },
    MeetingStatusChanged {
        meeting_id: MeetingId,
        from_status: MeetingStatus,
        to_status: MeetingStatus,
    },
}

/// Immutable audit fact. Created by every mutating operation, never updated
/// or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtsActivity {
    pub id: ActivityId,
    pub application_id: ApplicationId,
    pub performed_by: UserId,
    pub performed_by_name: String,
    pub payload: ActivityPayload,
    pub created_at: DateTime<Utc>,
}

impl AtsActivity {
    pub fn record(application_id: ApplicationId, actor: &Actor, payload: ActivityPayload) -> Self {
        Self {
            id: next_activity_id(),
            application_id,
            performed_by: actor.id.clone(),
            performed_by_name: actor.name.clone(),
            payload,
            created_at: Utc::now(),
        }
    }

    /// Newest-first total order: descending `created_at`, ties broken by
    /// descending id.
    pub fn newest_first(a: &Self, b: &Self) -> Ordering {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    }
}

/// Composite pagination cursor pointing at the last entry of a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityCursor {
    pub created_at: DateTime<Utc>,
    pub id: ActivityId,
}

impl ActivityCursor {
    pub fn from_activity(activity: &AtsActivity) -> Self {
        Self {
            created_at: activity.created_at,
            id: activity.id.clone(),
        }
    }

    /// Whether an entry is strictly older than this cursor. Entries inserted
    /// concurrently sort above the cursor and are simply not yet visible to
    /// an in-flight walk.
    pub fn admits(&self, activity: &AtsActivity) -> bool {
        activity.created_at < self.created_at
            || (activity.created_at == self.created_at && activity.id < self.id)
    }
}

/// One page of an application's history, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityPage {
    pub entries: Vec<AtsActivity>,
    pub has_more: bool,
    pub next_cursor: Option<ActivityCursor>,
}

/// Read/write facade over the activity repository shared by the workflow
/// services.
pub struct ActivityLog<L> {
    repository: Arc<L>,
    config: EngineConfig,
}

impl<L> Clone for ActivityLog<L> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            config: self.config.clone(),
        }
    }
}

impl<L> ActivityLog<L>
where
    L: ActivityRepository,
{
    pub fn new(repository: Arc<L>, config: EngineConfig) -> Self {
        Self { repository, config }
    }

    /// Appends one immutable entry.
    pub fn append(&self, activity: AtsActivity) -> Result<(), PipelineError> {
        self.repository.create(activity)?;
        Ok(())
    }

    /// Cursor-paginated history for an application, newest first.
    ///
    /// `limit` is clamped to the configured cap; `0` selects the default
    /// page size. The repository is asked for one extra entry to decide
    /// `has_more` without a second round trip.
    pub fn history(
        &self,
        application_id: &ApplicationId,
        limit: usize,
        cursor: Option<&ActivityCursor>,
    ) -> Result<ActivityPage, PipelineError> {
        let limit = if limit == 0 {
            self.config.activity_page_size
        } else {
            limit.min(self.config.activity_page_size_max)
        };

        let mut entries = self
            .repository
            .find_by_application(application_id, limit + 1, cursor)?;

        let has_more = entries.len() > limit;
        entries.truncate(limit);
        let next_cursor = if has_more {
            entries.last().map(ActivityCursor::from_activity)
        } else {
            None
        };

        Ok(ActivityPage {
            entries,
            has_more,
            next_cursor,
        })
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::interview::apply_feedback;
use crate::pipeline::domain::{ApplicationId, TaskId};
use crate::pipeline::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Assigned,
    Submitted,
    UnderReview,
    Completed,
    Cancelled,
}

impl TaskStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Assigned => "assigned",
            Self::Submitted => "submitted",
            Self::UnderReview => "under_review",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lifecycle commands accepted by a technical task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskTransition {
    Submit { submission_url: Option<String> },
    StartReview,
    Complete,
    Cancel,
}

impl TaskTransition {
    const fn target(&self) -> TaskStatus {
        match self {
            Self::Submit { .. } => TaskStatus::Submitted,
            Self::StartReview => TaskStatus::UnderReview,
            Self::Complete => TaskStatus::Completed,
            Self::Cancel => TaskStatus::Cancelled,
        }
    }
}

/// A take-home technical task assigned to one application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnicalTask {
    pub id: TaskId,
    pub application_id: ApplicationId,
    pub title: String,
    pub status: TaskStatus,
    pub assigned_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub submission_url: Option<String>,
    pub rating: Option<u8>,
    pub feedback: Option<String>,
}

impl TechnicalTask {
    pub fn assign(id: TaskId, application_id: ApplicationId, title: String) -> Self {
        Self {
            id,
            application_id,
            title,
            status: TaskStatus::Assigned,
            assigned_at: Utc::now(),
            submitted_at: None,
            completed_at: None,
            cancelled_at: None,
            submission_url: None,
            rating: None,
            feedback: None,
        }
    }

    /// Applies a lifecycle command.
    ///
    /// Allowed paths: assigned → submitted → under_review → completed, with
    /// cancellation permitted from assigned or submitted only. Completed and
    /// cancelled are terminal; a task under review can no longer be
    /// cancelled.
    pub fn transition(
        &mut self,
        transition: TaskTransition,
    ) -> Result<(TaskStatus, TaskStatus), ValidationError> {
        let from = self.status;
        let to = transition.target();
        let allowed = matches!(
            (from, to),
            (TaskStatus::Assigned, TaskStatus::Submitted)
                | (TaskStatus::Assigned, TaskStatus::Cancelled)
                | (TaskStatus::Submitted, TaskStatus::UnderReview)
                | (TaskStatus::Submitted, TaskStatus::Cancelled)
                | (TaskStatus::UnderReview, TaskStatus::Completed)
        );
        if !allowed {
            return Err(ValidationError::TaskTransition { from, to });
        }

        let now = Utc::now();
        match transition {
            TaskTransition::Submit { submission_url } => {
                self.submitted_at = Some(now);
                self.submission_url = submission_url;
            }
            TaskTransition::StartReview => {}
            TaskTransition::Complete => self.completed_at = Some(now),
            TaskTransition::Cancel => self.cancelled_at = Some(now),
        }
        self.status = to;
        Ok((from, to))
    }

    /// Records rating and/or feedback; both fields are write-once.
    pub fn record_feedback(
        &mut self,
        rating: Option<u8>,
        feedback: Option<String>,
    ) -> Result<(), ValidationError> {
        apply_feedback(&mut self.rating, &mut self.feedback, rating, feedback)
    }
}

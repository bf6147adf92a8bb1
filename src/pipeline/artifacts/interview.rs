use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::pipeline::domain::{ApplicationId, InterviewId};
use crate::pipeline::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl InterviewStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for InterviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lifecycle commands accepted by a scheduled interview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewTransition {
    Complete,
    Cancel,
}

/// An interview scheduled against one application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interview {
    pub id: InterviewId,
    pub application_id: ApplicationId,
    pub status: InterviewStatus,
    pub scheduled_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub rating: Option<u8>,
    pub feedback: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Interview {
    pub fn schedule(
        id: InterviewId,
        application_id: ApplicationId,
        scheduled_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            application_id,
            status: InterviewStatus::Scheduled,
            scheduled_at,
            completed_at: None,
            cancelled_at: None,
            rating: None,
            feedback: None,
            created_at: Utc::now(),
        }
    }

    /// Applies a lifecycle command. Completed and cancelled are terminal:
    /// neither can be re-entered from the other.
    pub fn transition(
        &mut self,
        transition: InterviewTransition,
    ) -> Result<(InterviewStatus, InterviewStatus), ValidationError> {
        if self.status != InterviewStatus::Scheduled {
            return Err(ValidationError::InterviewClosed(self.status));
        }

        let from = self.status;
        let now = Utc::now();
        match transition {
            InterviewTransition::Complete => {
                self.status = InterviewStatus::Completed;
                self.completed_at = Some(now);
            }
            InterviewTransition::Cancel => {
                self.status = InterviewStatus::Cancelled;
                self.cancelled_at = Some(now);
            }
        }
        Ok((from, self.status))
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

/// Shared write-once rating/feedback rule for interviews and technical
/// tasks.
pub(super) fn apply_feedback(
    rating_slot: &mut Option<u8>,
    feedback_slot: &mut Option<String>,
    rating: Option<u8>,
    feedback: Option<String>,
) -> Result<(), ValidationError> {
    if rating.is_none() && feedback.is_none() {
        return Err(ValidationError::EmptyFeedbackUpdate);
    }
    if let Some(value) = rating {
        if !(1..=5).contains(&value) {
            return Err(ValidationError::RatingOutOfRange(value));
        }
        if rating_slot.is_some() {
            return Err(ValidationError::RatingAlreadySubmitted);
        }
    }
    if feedback.is_some() && feedback_slot.is_some() {
        return Err(ValidationError::FeedbackAlreadySubmitted);
    }

    if let Some(value) = rating {
        *rating_slot = Some(value);
    }
    if let Some(text) = feedback {
        *feedback_slot = Some(text);
    }
    Ok(())
}

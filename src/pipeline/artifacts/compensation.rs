use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::pipeline::domain::{ApplicationId, MeetingId};
use crate::pipeline::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeetingStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl MeetingStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for MeetingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Updates accepted by a compensation meeting while it is still scheduled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MeetingUpdate {
    Reschedule { scheduled_at: DateTime<Utc> },
    Complete,
    Cancel,
}

/// A compensation discussion scheduled against one application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompensationMeeting {
    pub id: MeetingId,
    pub application_id: ApplicationId,
    pub status: MeetingStatus,
    pub scheduled_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl CompensationMeeting {
    pub fn schedule(
        id: MeetingId,
        application_id: ApplicationId,
        scheduled_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            application_id,
            status: MeetingStatus::Scheduled,
            scheduled_at,
            completed_at: None,
            cancelled_at: None,
            created_at: Utc::now(),
        }
    }

    /// Applies an update. `completed_at` is stamped only on the transition
    /// to completed; completed and cancelled meetings reject every update.
    pub fn update(
        &mut self,
        update: MeetingUpdate,
    ) -> Result<(MeetingStatus, MeetingStatus), ValidationError> {
        if self.status != MeetingStatus::Scheduled {
            return Err(ValidationError::MeetingClosed(self.status));
        }

        let from = self.status;
        let now = Utc::now();
        match update {
            MeetingUpdate::Reschedule { scheduled_at } => self.scheduled_at = scheduled_at,
            MeetingUpdate::Complete => {
                self.status = MeetingStatus::Completed;
                self.completed_at = Some(now);
            }
            MeetingUpdate::Cancel => {
                self.status = MeetingStatus::Cancelled;
                self.cancelled_at = Some(now);
            }
        }
        Ok((from, self.status))
    }
}

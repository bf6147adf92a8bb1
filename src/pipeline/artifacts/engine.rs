//! Service wiring the artifact machines to their repositories and the
//! activity trail.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::compensation::{CompensationMeeting, MeetingUpdate};
use super::interview::{Interview, InterviewTransition};
use super::offer::{Offer, OfferResolution};
use super::technical_task::{TaskTransition, TechnicalTask};
use crate::pipeline::activity::{ActivityLog, ActivityPayload, AtsActivity};
use crate::pipeline::domain::{
    ApplicationId, Actor, InterviewId, JobApplication, MeetingId, OfferId, TaskId,
};
use crate::pipeline::error::PipelineError;
use crate::pipeline::repository::{
    ActivityRepository, CompensationMeetingRepository, InterviewRepository,
    JobApplicationRepository, OfferRepository, TechnicalTaskRepository,
};
use crate::pipeline::settings::EngineConfig;

static INTERVIEW_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static TASK_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static OFFER_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static MEETING_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_interview_id() -> InterviewId {
    InterviewId(format!(
        "int-{:06}",
        INTERVIEW_SEQUENCE.fetch_add(1, Ordering::Relaxed)
    ))
}

fn next_task_id() -> TaskId {
    TaskId(format!(
        "task-{:06}",
        TASK_SEQUENCE.fetch_add(1, Ordering::Relaxed)
    ))
}

fn next_offer_id() -> OfferId {
    OfferId(format!(
        "offer-{:06}",
        OFFER_SEQUENCE.fetch_add(1, Ordering::Relaxed)
    ))
}

fn next_meeting_id() -> MeetingId {
    MeetingId(format!(
        "comp-{:06}",
        MEETING_SEQUENCE.fetch_add(1, Ordering::Relaxed)
    ))
}

/// Service composing the four artifact repositories, the application
/// repository (for ownership checks), and the activity trail.
///
/// Artifact creation is intentionally not gated by the owning application's
/// current stage; only each artifact's own lifecycle is guarded.
pub struct ArtifactEngine<A, I, T, O, C, L> {
    applications: Arc<A>,
    interviews: Arc<I>,
    tasks: Arc<T>,
    offers: Arc<O>,
    meetings: Arc<C>,
    activity: ActivityLog<L>,
}

impl<A, I, T, O, C, L> ArtifactEngine<A, I, T, O, C, L>
where
    A: JobApplicationRepository + 'static,
    I: InterviewRepository + 'static,
    T: TechnicalTaskRepository + 'static,
    O: OfferRepository + 'static,
    C: CompensationMeetingRepository + 'static,
    L: ActivityRepository + 'static,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        applications: Arc<A>,
        interviews: Arc<I>,
        tasks: Arc<T>,
        offers: Arc<O>,
        meetings: Arc<C>,
        activity_repository: Arc<L>,
        config: EngineConfig,
    ) -> Self {
        Self {
            applications,
            interviews,
            tasks,
            offers,
            meetings,
            activity: ActivityLog::new(activity_repository, config),
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

    // --- Interview ---------------------------------------------------------

    pub fn schedule_interview(
        &self,
        application_id: &ApplicationId,
        scheduled_at: DateTime<Utc>,
        actor: &Actor,
    ) -> Result<Interview, PipelineError> {
        let application = self.owned_application(application_id, actor)?;
        let interview = Interview::schedule(
            next_interview_id(),
            application.id.clone(),
            scheduled_at,
        );
        let stored = self.interviews.create(interview)?;

        self.activity.append(AtsActivity::record(
            application.id,
            actor,
            ActivityPayload::InterviewScheduled {
                interview_id: stored.id.clone(),
                scheduled_at,
            },
        ))?;
        Ok(stored)
    }

    pub fn update_interview(
        &self,
        interview_id: &InterviewId,
        transition: InterviewTransition,
        actor: &Actor,
    ) -> Result<Interview, PipelineError> {
        let mut interview = self
            .interviews
            .find_by_id(interview_id)?
            .ok_or_else(|| PipelineError::InterviewNotFound(interview_id.clone()))?;
        self.owned_application(&interview.application_id, actor)?;

        let (from, to) = interview.transition(transition)?;
        self.interviews.update(&interview)?;

        self.activity.append(AtsActivity::record(
            interview.application_id.clone(),
            actor,
            ActivityPayload::InterviewStatusChanged {
                interview_id: interview.id.clone(),
                from_status: from,
                to_status: to,
            },
        ))?;
        Ok(interview)
    }

    pub fn record_interview_feedback(
        &self,
        interview_id: &InterviewId,
        rating: Option<u8>,
        feedback: Option<String>,
        actor: &Actor,
    ) -> Result<Interview, PipelineError> {
        let mut interview = self
            .interviews
            .find_by_id(interview_id)?
            .ok_or_else(|| PipelineError::InterviewNotFound(interview_id.clone()))?;
        self.owned_application(&interview.application_id, actor)?;

        interview.record_feedback(rating, feedback)?;
        self.interviews.update(&interview)?;

        self.activity.append(AtsActivity::record(
            interview.application_id.clone(),
            actor,
            ActivityPayload::InterviewFeedbackRecorded {
                interview_id: interview.id.clone(),
                rating,
            },
        ))?;
        Ok(interview)
    }

    // --- Technical task ----------------------------------------------------

    pub fn assign_task(
        &self,
        application_id: &ApplicationId,
        title: String,
        actor: &Actor,
    ) -> Result<TechnicalTask, PipelineError> {
        let application = self.owned_application(application_id, actor)?;
        let task = TechnicalTask::assign(next_task_id(), application.id.clone(), title);
        let stored = self.tasks.create(task)?;

        self.activity.append(AtsActivity::record(
            application.id,
            actor,
            ActivityPayload::TaskAssigned {
                task_id: stored.id.clone(),
                title: stored.title.clone(),
            },
        ))?;
        Ok(stored)
    }

    pub fn update_task(
        &self,
        task_id: &TaskId,
        transition: TaskTransition,
        actor: &Actor,
    ) -> Result<TechnicalTask, PipelineError> {
        let mut task = self
            .tasks
            .find_by_id(task_id)?
            .ok_or_else(|| PipelineError::TaskNotFound(task_id.clone()))?;
        self.owned_application(&task.application_id, actor)?;

        let (from, to) = task.transition(transition)?;
        self.tasks.update(&task)?;

        self.activity.append(AtsActivity::record(
            task.application_id.clone(),
            actor,
            ActivityPayload::TaskStatusChanged {
                task_id: task.id.clone(),
                from_status: from,
                to_status: to,
            },
        ))?;
        Ok(task)
    }

    pub fn record_task_feedback(
        &self,
        task_id: &TaskId,
        rating: Option<u8>,
        feedback: Option<String>,
        actor: &Actor,
    ) -> Result<TechnicalTask, PipelineError> {
        let mut task = self
            .tasks
            .find_by_id(task_id)?
            .ok_or_else(|| PipelineError::TaskNotFound(task_id.clone()))?;
        self.owned_application(&task.application_id, actor)?;

        task.record_feedback(rating, feedback)?;
        self.tasks.update(&task)?;

        self.activity.append(AtsActivity::record(
            task.application_id.clone(),
            actor,
            ActivityPayload::TaskFeedbackRecorded {
                task_id: task.id.clone(),
                rating,
            },
        ))?;
        Ok(task)
    }

    // --- Offer --------------------------------------------------------------

    pub fn draft_offer(
        &self,
        application_id: &ApplicationId,
        actor: &Actor,
    ) -> Result<Offer, PipelineError> {
        let application = self.owned_application(application_id, actor)?;
        let offer = Offer::draft(next_offer_id(), application.id.clone());
        let stored = self.offers.create(offer)?;

        self.activity.append(AtsActivity::record(
            application.id,
            actor,
            ActivityPayload::OfferDrafted {
                offer_id: stored.id.clone(),
            },
        ))?;
        Ok(stored)
    }

    pub fn send_offer(&self, offer_id: &OfferId, actor: &Actor) -> Result<Offer, PipelineError> {
        let mut offer = self
            .offers
            .find_by_id(offer_id)?
            .ok_or_else(|| PipelineError::OfferNotFound(offer_id.clone()))?;
        self.owned_application(&offer.application_id, actor)?;

        offer.send()?;
        self.offers.update(&offer)?;

        self.activity.append(AtsActivity::record(
            offer.application_id.clone(),
            actor,
            ActivityPayload::OfferSent {
                offer_id: offer.id.clone(),
            },
        ))?;
        Ok(offer)
    }

    pub fn conclude_offer(
        &self,
        offer_id: &OfferId,
        resolution: OfferResolution,
        actor: &Actor,
    ) -> Result<Offer, PipelineError> {
        let mut offer = self
            .offers
            .find_by_id(offer_id)?
            .ok_or_else(|| PipelineError::OfferNotFound(offer_id.clone()))?;
        self.owned_application(&offer.application_id, actor)?;

        offer.conclude(resolution)?;
        self.offers.update(&offer)?;

        self.activity.append(AtsActivity::record(
            offer.application_id.clone(),
            actor,
            ActivityPayload::OfferConcluded {
                offer_id: offer.id.clone(),
                resolution,
            },
        ))?;
        Ok(offer)
    }

    // --- Compensation meeting ------------------------------------------------

    pub fn schedule_meeting(
        &self,
        application_id: &ApplicationId,
        scheduled_at: DateTime<Utc>,
        actor: &Actor,
    ) -> Result<CompensationMeeting, PipelineError> {
        let application = self.owned_application(application_id, actor)?;
        let meeting = CompensationMeeting::schedule(
            next_meeting_id(),
            application.id.clone(),
            scheduled_at,
        );
        let stored = self.meetings.create(meeting)?;

        self.activity.append(AtsActivity::record(
            application.id,
            actor,
            ActivityPayload::MeetingScheduled {
                meeting_id: stored.id.clone(),
                scheduled_at,
            },
        ))?;
        Ok(stored)
    }

    pub fn update_meeting(
        &self,
        meeting_id: &MeetingId,
        update: MeetingUpdate,
        actor: &Actor,
    ) -> Result<CompensationMeeting, PipelineError> {
        let mut meeting = self
            .meetings
            .find_by_id(meeting_id)?
            .ok_or_else(|| PipelineError::MeetingNotFound(meeting_id.clone()))?;
        self.owned_application(&meeting.application_id, actor)?;

        let rescheduled_to = match &update {
            MeetingUpdate::Reschedule { scheduled_at } => Some(*scheduled_at),
            _ => None,
        };
        let (from, to) = meeting.update(update)?;
        self.meetings.update(&meeting)?;

        let payload = match rescheduled_to {
            Some(scheduled_at) => ActivityPayload::MeetingRescheduled {
                meeting_id: meeting.id.clone(),
                scheduled_at,
            },
            None => ActivityPayload::MeetingStatusChanged {
                meeting_id: meeting.id.clone(),
                from_status: from,
                to_status: to,
            },
        };
        self.activity.append(AtsActivity::record(
            meeting.application_id.clone(),
            actor,
            payload,
        ))?;
        Ok(meeting)
    }
}

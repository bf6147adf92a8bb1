use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::pipeline::activity::{ActivityCursor, AtsActivity};
use crate::pipeline::artifacts::{
    ArtifactEngine, CompensationMeeting, Interview, Offer, TechnicalTask,
};
use crate::pipeline::bulk::BulkStageUpdater;
use crate::pipeline::domain::{
    ApplicationId, Actor, CompanyId, InterviewId, JobApplication, JobId, JobPosting, MeetingId,
    OfferId, SeekerId, Stage, TaskId, UserId,
};
use crate::pipeline::kanban::KanbanProjector;
use crate::pipeline::repository::{
    ActivityRepository, CompensationMeetingRepository, InterviewRepository,
    JobApplicationRepository, JobPostingRepository, NotificationError, NotificationService,
    OfferRepository, RepositoryError, SeekerDirectory, SeekerSummary, StageChangeNotification,
    TechnicalTaskRepository,
};
use crate::pipeline::settings::EngineConfig;
use crate::pipeline::stage_machine::StageMachine;

pub(super) fn actor() -> Actor {
    Actor {
        id: UserId("hr-1".to_string()),
        name: "Dana Recruiter".to_string(),
        company_id: CompanyId("acme".to_string()),
    }
}

pub(super) fn foreign_actor() -> Actor {
    Actor {
        id: UserId("hr-9".to_string()),
        name: "Rival Recruiter".to_string(),
        company_id: CompanyId("globex".to_string()),
    }
}

pub(super) fn job_with_stages(id: &str, stages: &[Stage]) -> JobPosting {
    JobPosting {
        id: JobId(id.to_string()),
        company_id: CompanyId("acme".to_string()),
        title: "Senior Backend Engineer".to_string(),
        enabled_stages: stages.to_vec(),
    }
}

pub(super) fn standard_job() -> JobPosting {
    job_with_stages(
        "job-1",
        &[
            Stage::InReview,
            Stage::Shortlisted,
            Stage::Interview,
            Stage::Offer,
        ],
    )
}

#[derive(Default)]
pub(super) struct MemoryJobs {
    jobs: Mutex<HashMap<JobId, JobPosting>>,
}

impl MemoryJobs {
    pub(super) fn put(&self, job: JobPosting) {
        self.jobs
            .lock()
            .expect("job mutex poisoned")
            .insert(job.id.clone(), job);
    }
}

impl JobPostingRepository for MemoryJobs {
    fn find_by_id(&self, id: &JobId) -> Result<Option<JobPosting>, RepositoryError> {
        Ok(self
            .jobs
            .lock()
            .expect("job mutex poisoned")
            .get(id)
            .cloned())
    }
}

#[derive(Default)]
pub(super) struct MemoryApplications {
    records: Mutex<HashMap<ApplicationId, JobApplication>>,
}

impl MemoryApplications {
    pub(super) fn get(&self, id: &ApplicationId) -> Option<JobApplication> {
        self.records
            .lock()
            .expect("application mutex poisoned")
            .get(id)
            .cloned()
    }

    /// Overwrites a stored record without the version check, for staging
    /// race scenarios in tests.
    pub(super) fn put_raw(&self, application: JobApplication) {
        self.records
            .lock()
            .expect("application mutex poisoned")
            .insert(application.id.clone(), application);
    }
}

impl JobApplicationRepository for MemoryApplications {
    fn insert(&self, application: JobApplication) -> Result<JobApplication, RepositoryError> {
        let mut guard = self.records.lock().expect("application mutex poisoned");
        if guard.contains_key(&application.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(application.id.clone(), application.clone());
        Ok(application)
    }

    fn update(&self, application: &JobApplication) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("application mutex poisoned");
        match guard.get(&application.id) {
            Some(stored) if stored.version + 1 == application.version => {
                guard.insert(application.id.clone(), application.clone());
                Ok(())
            }
            Some(_) => Err(RepositoryError::Conflict),
            None => Err(RepositoryError::NotFound),
        }
    }

    fn find_by_id(&self, id: &ApplicationId) -> Result<Option<JobApplication>, RepositoryError> {
        Ok(self
            .records
            .lock()
            .expect("application mutex poisoned")
            .get(id)
            .cloned())
    }

    fn find_by_job(&self, job_id: &JobId) -> Result<Vec<JobApplication>, RepositoryError> {
        let guard = self.records.lock().expect("application mutex poisoned");
        let mut applications: Vec<JobApplication> = guard
            .values()
            .filter(|application| &application.job_id == job_id)
            .cloned()
            .collect();
        applications.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(applications)
    }
}

#[derive(Default)]
pub(super) struct MemoryActivities {
    entries: Mutex<Vec<AtsActivity>>,
}

impl MemoryActivities {
    pub(super) fn all_for(&self, application_id: &ApplicationId) -> Vec<AtsActivity> {
        self.entries
            .lock()
            .expect("activity mutex poisoned")
            .iter()
            .filter(|entry| &entry.application_id == application_id)
            .cloned()
            .collect()
    }
}

impl ActivityRepository for MemoryActivities {
    fn create(&self, activity: AtsActivity) -> Result<(), RepositoryError> {
        self.entries
            .lock()
            .expect("activity mutex poisoned")
            .push(activity);
        Ok(())
    }

    fn find_by_application(
        &self,
        application_id: &ApplicationId,
        limit: usize,
        cursor: Option<&ActivityCursor>,
    ) -> Result<Vec<AtsActivity>, RepositoryError> {
        let guard = self.entries.lock().expect("activity mutex poisoned");
        let mut entries: Vec<AtsActivity> = guard
            .iter()
            .filter(|entry| &entry.application_id == application_id)
            .filter(|entry| cursor.map_or(true, |c| c.admits(entry)))
            .cloned()
            .collect();
        entries.sort_by(AtsActivity::newest_first);
        entries.truncate(limit);
        Ok(entries)
    }
}

#[derive(Default)]
pub(super) struct MemoryNotifier {
    sent: Mutex<Vec<StageChangeNotification>>,
    failing: AtomicBool,
}

impl MemoryNotifier {
    pub(super) fn sent(&self) -> Vec<StageChangeNotification> {
        self.sent.lock().expect("notifier mutex poisoned").clone()
    }

    pub(super) fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Relaxed);
    }
}

impl NotificationService for MemoryNotifier {
    fn notify(&self, notification: StageChangeNotification) -> Result<(), NotificationError> {
        if self.failing.load(Ordering::Relaxed) {
            return Err(NotificationError::Transport("smtp offline".to_string()));
        }
        self.sent
            .lock()
            .expect("notifier mutex poisoned")
            .push(notification);
        Ok(())
    }
}

#[derive(Default)]
pub(super) struct MemorySeekers {
    summaries: Mutex<HashMap<SeekerId, SeekerSummary>>,
    failing: AtomicBool,
}

impl MemorySeekers {
    pub(super) fn put(&self, seeker_id: SeekerId, summary: SeekerSummary) {
        self.summaries
            .lock()
            .expect("seeker mutex poisoned")
            .insert(seeker_id, summary);
    }

    pub(super) fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Relaxed);
    }
}

impl SeekerDirectory for MemorySeekers {
    fn find_summary(
        &self,
        seeker_id: &SeekerId,
    ) -> Result<Option<SeekerSummary>, RepositoryError> {
        if self.failing.load(Ordering::Relaxed) {
            return Err(RepositoryError::Unavailable("profile store down".to_string()));
        }
        Ok(self
            .summaries
            .lock()
            .expect("seeker mutex poisoned")
            .get(seeker_id)
            .cloned())
    }
}

macro_rules! memory_artifact_repo {
    ($name:ident, $entity:ident, $id:ident, $trait_name:ident) => {
        #[derive(Default)]
        pub(super) struct $name {
            records: Mutex<HashMap<$id, $entity>>,
        }

        impl $trait_name for $name {
            fn create(&self, entity: $entity) -> Result<$entity, RepositoryError> {
                let mut guard = self.records.lock().expect("artifact mutex poisoned");
                if guard.contains_key(&entity.id) {
                    return Err(RepositoryError::Conflict);
                }
                guard.insert(entity.id.clone(), entity.clone());
                Ok(entity)
            }

            fn update(&self, entity: &$entity) -> Result<(), RepositoryError> {
                let mut guard = self.records.lock().expect("artifact mutex poisoned");
                if !guard.contains_key(&entity.id) {
                    return Err(RepositoryError::NotFound);
                }
                guard.insert(entity.id.clone(), entity.clone());
                Ok(())
            }

            fn find_by_id(&self, id: &$id) -> Result<Option<$entity>, RepositoryError> {
                Ok(self
                    .records
                    .lock()
                    .expect("artifact mutex poisoned")
                    .get(id)
                    .cloned())
            }

            fn find_by_application(
                &self,
                application_id: &ApplicationId,
            ) -> Result<Vec<$entity>, RepositoryError> {
                Ok(self
                    .records
                    .lock()
                    .expect("artifact mutex poisoned")
                    .values()
                    .filter(|entity| &entity.application_id == application_id)
                    .cloned()
                    .collect())
            }
        }
    };
}

memory_artifact_repo!(MemoryInterviews, Interview, InterviewId, InterviewRepository);
memory_artifact_repo!(MemoryTasks, TechnicalTask, TaskId, TechnicalTaskRepository);
memory_artifact_repo!(MemoryOffers, Offer, OfferId, OfferRepository);
memory_artifact_repo!(
    MemoryMeetings,
    CompensationMeeting,
    MeetingId,
    CompensationMeetingRepository
);

/// Everything the pipeline services need, backed by in-memory collaborators.
pub(super) struct Env {
    pub(super) jobs: Arc<MemoryJobs>,
    pub(super) applications: Arc<MemoryApplications>,
    pub(super) activities: Arc<MemoryActivities>,
    pub(super) notifier: Arc<MemoryNotifier>,
    pub(super) seekers: Arc<MemorySeekers>,
    pub(super) interviews: Arc<MemoryInterviews>,
    pub(super) tasks: Arc<MemoryTasks>,
    pub(super) offers: Arc<MemoryOffers>,
    pub(super) meetings: Arc<MemoryMeetings>,
}

impl Env {
    pub(super) fn new() -> Self {
        Self {
            jobs: Arc::new(MemoryJobs::default()),
            applications: Arc::new(MemoryApplications::default()),
            activities: Arc::new(MemoryActivities::default()),
            notifier: Arc::new(MemoryNotifier::default()),
            seekers: Arc::new(MemorySeekers::default()),
            interviews: Arc::new(MemoryInterviews::default()),
            tasks: Arc::new(MemoryTasks::default()),
            offers: Arc::new(MemoryOffers::default()),
            meetings: Arc::new(MemoryMeetings::default()),
        }
    }

    pub(super) fn with_job(job: JobPosting) -> Self {
        let env = Self::new();
        env.jobs.put(job);
        env
    }

    pub(super) fn stage_machine(
        &self,
    ) -> StageMachine<MemoryJobs, MemoryApplications, MemoryActivities, MemoryNotifier> {
        StageMachine::new(
            self.jobs.clone(),
            self.applications.clone(),
            self.activities.clone(),
            self.notifier.clone(),
            EngineConfig::default(),
        )
    }

    pub(super) fn artifact_engine(
        &self,
    ) -> ArtifactEngine<
        MemoryApplications,
        MemoryInterviews,
        MemoryTasks,
        MemoryOffers,
        MemoryMeetings,
        MemoryActivities,
    > {
        ArtifactEngine::new(
            self.applications.clone(),
            self.interviews.clone(),
            self.tasks.clone(),
            self.offers.clone(),
            self.meetings.clone(),
            self.activities.clone(),
            EngineConfig::default(),
        )
    }

    pub(super) fn kanban(
        &self,
    ) -> KanbanProjector<MemoryJobs, MemoryApplications, MemorySeekers> {
        KanbanProjector::new(
            self.jobs.clone(),
            self.applications.clone(),
            self.seekers.clone(),
        )
    }

    pub(super) fn bulk(
        &self,
    ) -> BulkStageUpdater<MemoryJobs, MemoryApplications, MemoryActivities> {
        BulkStageUpdater::new(
            self.jobs.clone(),
            self.applications.clone(),
            self.activities.clone(),
            EngineConfig::default(),
        )
    }

    /// Submits an application for the given job and seeker via the stage
    /// machine, as the default actor.
    pub(super) fn submit(&self, job_id: &str, seeker: &str) -> JobApplication {
        self.stage_machine()
            .submit_application(
                &JobId(job_id.to_string()),
                SeekerId(seeker.to_string()),
                &actor(),
            )
            .expect("submission succeeds")
    }
}

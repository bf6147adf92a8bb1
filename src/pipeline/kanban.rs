//! Kanban projection: groups a job's applications by current stage for
//! board rendering.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{ApplicationId, Actor, JobApplication, JobId, SeekerId, Stage, SubStage};
use super::error::PipelineError;
use super::repository::{JobApplicationRepository, JobPostingRepository, SeekerDirectory};

/// One application placed on the board, enriched with seeker display data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KanbanCard {
    pub application_id: ApplicationId,
    pub seeker_id: SeekerId,
    pub seeker_name: String,
    pub headline: Option<String>,
    pub sub_stage: SubStage,
    pub ats_score: u8,
    pub applied_at: DateTime<Utc>,
}

/// One board column. Stages with zero applications still appear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KanbanColumn {
    pub stage: Stage,
    pub applications: Vec<KanbanCard>,
}

/// The full board for one job, columns in the job's enabled-stage order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KanbanBoard {
    pub job_id: JobId,
    pub job_title: String,
    pub columns: Vec<KanbanColumn>,
}

/// Read-side projector building the board from the application repository
/// and the seeker directory.
pub struct KanbanProjector<J, A, S> {
    jobs: Arc<J>,
    applications: Arc<A>,
    seekers: Arc<S>,
}

impl<J, A, S> KanbanProjector<J, A, S>
where
    J: JobPostingRepository + 'static,
    A: JobApplicationRepository + 'static,
    S: SeekerDirectory + 'static,
{
    pub fn new(jobs: Arc<J>, applications: Arc<A>, seekers: Arc<S>) -> Self {
        Self {
            jobs,
            applications,
            seekers,
        }
    }

    /// Builds the board for a job owned by the actor's company.
    ///
    /// Every enabled stage gets a column even when empty; an application
    /// whose stage is somehow outside the enabled list still gets a column
    /// appended at the end. Seeker lookup failures degrade to "Unknown".
    pub fn project_for_job(
        &self,
        job_id: &JobId,
        actor: &Actor,
    ) -> Result<KanbanBoard, PipelineError> {
        let job = self
            .jobs
            .find_by_id(job_id)?
            .ok_or_else(|| PipelineError::JobNotFound(job_id.clone()))?;
        if job.company_id != actor.company_id {
            return Err(PipelineError::ForeignJob(job_id.clone()));
        }

        let mut columns: Vec<KanbanColumn> = job
            .enabled_stages
            .iter()
            .map(|&stage| KanbanColumn {
                stage,
                applications: Vec::new(),
            })
            .collect();

        for application in self.applications.find_by_job(&job.id)? {
            let card = self.card_for(&application);
            match columns
                .iter_mut()
                .find(|column| column.stage == application.stage)
            {
                Some(column) => column.applications.push(card),
                None => columns.push(KanbanColumn {
                    stage: application.stage,
                    applications: vec![card],
                }),
            }
        }

        Ok(KanbanBoard {
            job_id: job.id,
            job_title: job.title,
            columns,
        })
    }

    fn card_for(&self, application: &JobApplication) -> KanbanCard {
        let summary = match self.seekers.find_summary(&application.seeker_id) {
            Ok(summary) => summary,
            Err(error) => {
                tracing::debug!(
                    seeker_id = %application.seeker_id,
                    %error,
                    "seeker enrichment failed, degrading to unknown"
                );
                None
            }
        };
        let (seeker_name, headline) = summary
            .map(|s| (s.name, s.headline))
            .unwrap_or_else(|| ("Unknown".to_string(), None));

        KanbanCard {
            application_id: application.id.clone(),
            seeker_id: application.seeker_id.clone(),
            seeker_name,
            headline,
            sub_stage: application.sub_stage,
            ats_score: application.ats_score,
            applied_at: application.applied_at,
        }
    }
}

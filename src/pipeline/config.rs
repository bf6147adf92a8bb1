//! Per-job pipeline configuration, derived from a job's enabled stages
//! intersected with the static stage catalog.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::catalog;
use super::domain::{JobPosting, Stage, SubStage};
use super::error::ValidationError;

/// Mapping from each of a job's enabled stages to its allowed sub-stages.
///
/// Derived, never independently authored: resolved from
/// [`JobPosting::enabled_stages`] whenever the pipeline is read. Resolution
/// is cheap and job configuration is not assumed immutable, so nothing is
/// cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    stages: BTreeMap<Stage, Vec<SubStage>>,
}

impl PipelineConfig {
    /// Builds the config for a job. Stages contributing no sub-stages in the
    /// catalog are dropped silently.
    pub fn resolve(job: &JobPosting) -> Self {
        let mut stages = BTreeMap::new();
        for &stage in &job.enabled_stages {
            let allowed = catalog::sub_stages(stage);
            if !allowed.is_empty() {
                stages.insert(stage, allowed.to_vec());
            }
        }
        Self { stages }
    }

    #[cfg(test)]
    pub(crate) fn from_parts(stages: BTreeMap<Stage, Vec<SubStage>>) -> Self {
        Self { stages }
    }

    /// Allowed sub-stages for an enabled stage, in declared order.
    pub fn allowed(&self, stage: Stage) -> Option<&[SubStage]> {
        self.stages.get(&stage).map(Vec::as_slice)
    }

    /// Resolves the sub-stage an application lands in when entering `stage`.
    ///
    /// A supplied sub-stage must be valid for the stage in the catalog and
    /// present in this job's allowed set. When omitted, the catalog default
    /// is used, falling back to the first allowed sub-stage in declared
    /// order when the default is not allowed for this job. Terminal system
    /// stages outside the job's pipeline resolve against the catalog set.
    pub fn resolve_sub_stage(
        &self,
        stage: Stage,
        requested: Option<SubStage>,
    ) -> Result<SubStage, ValidationError> {
        let catalog_set = catalog::sub_stages(stage);
        let allowed = match self.allowed(stage) {
            Some(allowed) => allowed,
            // Hired/Rejected may be absent from the per-job config yet still
            // be legal targets; their sub-stages come straight from the
            // catalog.
            None if stage.is_terminal() => catalog_set,
            None => return Err(ValidationError::StageNotEnabled(stage)),
        };

        match requested {
            Some(sub_stage) => {
                if catalog::allows(stage, sub_stage) && allowed.contains(&sub_stage) {
                    Ok(sub_stage)
                } else {
                    Err(ValidationError::SubStageNotAllowed { stage, sub_stage })
                }
            }
            None => {
                let default = catalog::default_sub_stage(stage);
                if allowed.contains(&default) {
                    Ok(default)
                } else {
                    allowed
                        .first()
                        .copied()
                        .ok_or(ValidationError::NoSubStageConfigured(stage))
                }
            }
        }
    }
}

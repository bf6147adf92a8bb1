//! Static stage catalog: the process-wide table mapping each stage to its
//! valid sub-stages and canonical default.
//!
//! The table is fixed at compile time and shared by every job; per-job
//! narrowing happens in [`super::config`]. The first sub-stage in each slice
//! is the declared order used for fallback resolution.

use super::domain::{Stage, SubStage};

/// Valid sub-stages for a stage, in declared order.
pub const fn sub_stages(stage: Stage) -> &'static [SubStage] {
    match stage {
        Stage::InReview => &[SubStage::ProfileReview, SubStage::ApplicationReview],
        Stage::Shortlisted => &[
            SubStage::ShortlistedPendingAction,
            SubStage::AwaitingHrReview,
        ],
        Stage::Interview => &[
            SubStage::InterviewToBeScheduled,
            SubStage::InterviewScheduled,
            SubStage::InterviewCompleted,
        ],
        Stage::TechnicalTask => &[
            SubStage::TaskToBeAssigned,
            SubStage::TaskAssigned,
            SubStage::TaskSubmitted,
            SubStage::TaskUnderReview,
            SubStage::TaskReviewed,
        ],
        Stage::Compensation => &[
            SubStage::MeetingToBeScheduled,
            SubStage::MeetingScheduled,
            SubStage::MeetingCompleted,
        ],
        Stage::Offer => &[
            SubStage::OfferToBeDrafted,
            SubStage::OfferDrafted,
            SubStage::OfferSent,
            SubStage::OfferSigned,
            SubStage::OfferDeclined,
        ],
        Stage::Hired => &[SubStage::HiredConfirmed],
        Stage::Rejected => &[SubStage::RejectedByCompany, SubStage::WithdrawnBySeeker],
    }
}

/// Canonical default sub-stage an application lands in when entering a stage
/// without an explicit sub-stage.
pub const fn default_sub_stage(stage: Stage) -> SubStage {
    match stage {
        Stage::InReview => SubStage::ProfileReview,
        Stage::Shortlisted => SubStage::ShortlistedPendingAction,
        Stage::Interview => SubStage::InterviewToBeScheduled,
        Stage::TechnicalTask => SubStage::TaskToBeAssigned,
        Stage::Compensation => SubStage::MeetingToBeScheduled,
        Stage::Offer => SubStage::OfferToBeDrafted,
        Stage::Hired => SubStage::HiredConfirmed,
        Stage::Rejected => SubStage::RejectedByCompany,
    }
}

/// Whether the catalog permits `sub_stage` under `stage`.
pub fn allows(stage: Stage, sub_stage: SubStage) -> bool {
    sub_stages(stage).contains(&sub_stage)
}

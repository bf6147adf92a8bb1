//! Stage-linked artifact entities and their guarded lifecycles.
//!
//! Each artifact is owned by one application and mutated only by its own
//! machine: terminal states stay terminal and rating/feedback fields are
//! write-once. Creation is deliberately not gated by the application's
//! current stage; callers typically follow an artifact action with a
//! separate stage move.

mod compensation;
mod engine;
mod interview;
mod offer;
mod technical_task;

pub use compensation::{CompensationMeeting, MeetingStatus, MeetingUpdate};
pub use engine::ArtifactEngine;
pub use interview::{Interview, InterviewStatus, InterviewTransition};
pub use offer::{Offer, OfferResolution, OfferStatus};
pub use technical_task::{TaskStatus, TaskTransition, TechnicalTask};

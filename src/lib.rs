//! Applicant tracking pipeline engine for the job board.
//!
//! The crate owns the hiring workflow semantics: per-job configurable stage
//! pipelines, guarded artifact state machines (interviews, technical tasks,
//! offers, compensation meetings), an append-only activity trail, and the
//! kanban/bulk views built on top of them. Persistence, HTTP, and outbound
//! mail are external collaborators reached through the traits in
//! [`pipeline::repository`].

pub mod pipeline;

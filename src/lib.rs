//! cv-tailor: adapts a personal profile into a job-specific resume and
//! cover letter.
//!
//! The pipeline is deterministic end to end: the same posting, profile and
//! configuration produce the same documents. External text generation is an
//! optional override layer, never a requirement.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod generation;
pub mod input;
pub mod output;
pub mod pipeline;
pub mod processing;

pub use config::Config;
pub use error::{CvTailorError, Result};
pub use pipeline::{GenerateOutcome, GenerateRequest, Pipeline};

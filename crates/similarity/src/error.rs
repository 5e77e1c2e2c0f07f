//! Errors reported by the similarity pipeline before any work starts.

use data_loader::UserId;
use thiserror::Error;

/// Precondition failures detected when a pipeline run is requested.
///
/// Once the workers are running nothing can fail: scoring is total, and the
/// run either returns a complete index or does not return at all.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// A run needs at least one worker to drain the job queue
    #[error("worker count must be at least 1")]
    NoWorkers,

    /// A sampled user has no entry in the rating table
    #[error("user {user_id} is in the sample but not in the rating table")]
    UnknownUser { user_id: UserId },

    /// The same user appears twice in the sample, which would produce a self-pair
    #[error("user {user_id} appears more than once in the sample")]
    DuplicateUser { user_id: UserId },
}

pub type Result<T> = std::result::Result<T, PipelineError>;

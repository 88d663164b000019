//! Error types for the deployment sequencer.

use crate::exec::CommandError;

/// Fatal deployment failure. Any of these aborts the run before the
/// remaining steps; only the final journal tail survives its own errors.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// Bad or unusable configuration (unreadable file, invalid URL or
    /// unit name).
    #[error("config: {0}")]
    Config(String),

    /// A required file or runtime was missing before the step could run.
    #[error("precondition: {0}")]
    Precondition(String),

    /// An external command failed to spawn or exited non-zero.
    #[error(transparent)]
    Command(#[from] CommandError),

    /// HTTP probe failure: transport error or non-2xx status.
    #[error("http: {0}")]
    Http(String),

    /// Plumbing failures (lock files, task joins).
    #[error("internal: {0}")]
    Internal(String),

    /// A failure wrapped with the label of the step it aborted.
    #[error("{label}: {source}")]
    Step {
        label: String,
        source: Box<DeployError>,
    },
}

impl DeployError {
    /// Attach the step label to an error bubbling out of a step body.
    pub fn at_step(self, label: &str) -> Self {
        Self::Step {
            label: label.to_string(),
            source: Box::new(self),
        }
    }
}

pub type DeployResult<T> = Result<T, DeployError>;

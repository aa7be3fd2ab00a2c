//! Services coordinating report state transitions with remote reads.
//!
//! Every function here is synchronous and may block on the remote API; route
//! handlers run them on the blocking pool.

use thiserror::Error;

use crate::domain::report::ReportError;
use crate::repository::errors::RepositoryError;

pub mod certificate;
pub mod org_units;
pub mod period;
pub mod report;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Repository(#[from] RepositoryError),

    #[error("{0}")]
    Report(#[from] ReportError),

    #[error("{0}")]
    TypeConstraint(String),

    #[error("{0}")]
    Form(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

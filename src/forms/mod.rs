//! Form definitions backing the report routes.

use thiserror::Error;
use validator::ValidationErrors;

pub mod org_units;
pub mod period;
pub mod report;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid organisation unit id")]
    InvalidOrgUnitId,

    #[error("invalid organisation unit path")]
    InvalidPath,

    #[error("invalid name")]
    InvalidName,
}

//! DTO modules that bridge services with templates.

pub mod certificate;
pub mod main;
pub mod org_units;
pub mod period;

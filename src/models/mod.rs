//! Configuration and remote wire models.

pub mod config;
pub mod dhis2;

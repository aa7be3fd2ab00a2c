//! Domain types and state machines of the birth notification report.

pub mod catalog;
pub mod event;
pub mod org_unit;
pub mod period;
pub mod report;
pub mod types;

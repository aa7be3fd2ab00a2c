use crate::{
    domain::{
        event::EventPage,
        org_unit::OrgUnitNode,
        report::EventQuery,
        types::Uid,
    },
    repository::errors::RepositoryResult,
};

pub mod dhis2;
pub mod errors;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;

pub use dhis2::Dhis2Repository;

/// Read access to the remote org-unit hierarchy.
pub trait OrgUnitReader {
    /// Top-level units used to seed the tree.
    fn list_root_org_units(&self) -> RepositoryResult<Vec<OrgUnitNode>>;
    /// Immediate children of a unit, for tree expansion.
    fn list_org_unit_children(&self, id: &Uid) -> RepositoryResult<Vec<OrgUnitNode>>;
    /// Number of immediate children, used to classify the scope of a selection.
    fn count_org_unit_children(&self, id: &Uid) -> RepositoryResult<usize>;
}

/// Read access to the program's events.
pub trait EventReader {
    fn list_events(&self, query: &EventQuery) -> RepositoryResult<EventPage>;
}

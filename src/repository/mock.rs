//! Mock repository implementations for isolating services in tests.

use mockall::mock;

use crate::domain::event::EventPage;
use crate::domain::org_unit::OrgUnitNode;
use crate::domain::report::EventQuery;
use crate::domain::types::Uid;
use crate::repository::errors::RepositoryResult;
use crate::repository::{EventReader, OrgUnitReader};

mock! {
    pub Repository {}

    impl OrgUnitReader for Repository {
        fn list_root_org_units(&self) -> RepositoryResult<Vec<OrgUnitNode>>;
        fn list_org_unit_children(&self, id: &Uid) -> RepositoryResult<Vec<OrgUnitNode>>;
        fn count_org_unit_children(&self, id: &Uid) -> RepositoryResult<usize>;
    }

    impl EventReader for Repository {
        fn list_events(&self, query: &EventQuery) -> RepositoryResult<EventPage>;
    }
}

//! Org-unit picker: tree browsing, highlighting and confirmation.

use std::collections::BTreeSet;

use uuid::Uuid;
use validator::Validate;

use crate::domain::org_unit::{OrgUnit, OrgUnitNode};
use crate::dto::org_units::{OrgUnitPageData, OrgUnitTreeRow};
use crate::forms::org_units::{HighlightOrgUnitForm, TreePathForm};
use crate::repository::OrgUnitReader;
use crate::services::{ServiceError, ServiceResult};
use crate::sessions::ReportStore;

/// Lists the visible part of the tree: roots plus the children of every
/// expanded node.
pub fn load_org_unit_page<R>(
    repo: &R,
    store: &ReportStore,
    session_id: Uuid,
) -> ServiceResult<OrgUnitPageData>
where
    R: OrgUnitReader + ?Sized,
{
    let state = store.snapshot(session_id);
    let expanded = state.org_units.expanded().clone();
    let highlighted = state.org_units.highlighted().cloned();

    let roots = repo.list_root_org_units().map_err(|err| {
        log::error!("Failed to list root organisation units: {err}");
        err
    })?;

    let mut rows = Vec::new();
    for root in roots {
        push_subtree(repo, root, 0, &expanded, highlighted.as_ref(), &mut rows)?;
    }

    Ok(OrgUnitPageData {
        rows,
        highlighted,
        confirmed: state.org_unit().cloned(),
        lookup_error: state.org_units.lookup_error().map(str::to_string),
    })
}

fn push_subtree<R>(
    repo: &R,
    node: OrgUnitNode,
    depth: usize,
    expanded: &BTreeSet<String>,
    highlighted: Option<&OrgUnitNode>,
    rows: &mut Vec<OrgUnitTreeRow>,
) -> ServiceResult<()>
where
    R: OrgUnitReader + ?Sized,
{
    let is_expanded = node.has_children && expanded.contains(&node.path);
    let children = if is_expanded {
        repo.list_org_unit_children(&node.id).map_err(|err| {
            log::error!("Failed to list children of {}: {err}", node.id);
            err
        })?
    } else {
        Vec::new()
    };

    rows.push(OrgUnitTreeRow {
        highlighted: highlighted.is_some_and(|h| h.path == node.path),
        expanded: is_expanded,
        depth,
        node,
    });

    for child in children {
        push_subtree(repo, child, depth + 1, expanded, highlighted, rows)?;
    }
    Ok(())
}

pub fn expand_org_unit(store: &ReportStore, session_id: Uuid, form: TreePathForm) -> ServiceResult<()> {
    form.validate()?;
    store.with_state(session_id, |state| state.org_units.expand(form.path));
    Ok(())
}

pub fn collapse_org_unit(
    store: &ReportStore,
    session_id: Uuid,
    form: TreePathForm,
) -> ServiceResult<()> {
    form.validate()?;
    store.with_state(session_id, |state| state.org_units.collapse(&form.path));
    Ok(())
}

pub fn highlight_org_unit(
    store: &ReportStore,
    session_id: Uuid,
    form: HighlightOrgUnitForm,
) -> ServiceResult<()> {
    let node = OrgUnitNode::try_from(form)?;
    store.with_state(session_id, |state| state.org_units.highlight(node));
    Ok(())
}

/// Classifies the highlighted node and makes it the confirmed org unit.
///
/// A failed lookup blocks the confirmation: the error is kept for the picker
/// and any previously confirmed unit stays in place.
pub fn confirm_org_unit<R>(repo: &R, store: &ReportStore, session_id: Uuid) -> ServiceResult<OrgUnit>
where
    R: OrgUnitReader + ?Sized,
{
    let node = store
        .with_state(session_id, |state| state.org_units.highlighted().cloned())
        .ok_or_else(|| ServiceError::Form("Select an organisation unit first".to_string()))?;

    match repo.count_org_unit_children(&node.id) {
        Ok(child_count) => {
            let org_unit = OrgUnit::classify(node, child_count);
            log::info!(
                "Selected organisation unit {} ({})",
                org_unit.id,
                org_unit.scope_mode
            );
            store.with_state(session_id, |state| state.confirm_org_unit(org_unit.clone()));
            Ok(org_unit)
        }
        Err(err) => {
            log::error!("Failed to look up children of {}: {err}", node.id);
            let message = err.to_string();
            store.with_state(session_id, |state| state.org_units.fail_lookup(message));
            Err(err.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::domain::org_unit::ScopeMode;
    use crate::domain::types::{PageSize, Uid};
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;

    fn store() -> ReportStore {
        ReportStore::new(Duration::from_secs(60), PageSize::default())
    }

    fn node(id: &str, path: &str, has_children: bool) -> OrgUnitNode {
        OrgUnitNode {
            id: Uid::new(id).unwrap(),
            display_name: format!("Unit {id}"),
            path: path.into(),
            has_children,
        }
    }

    fn highlight(store: &ReportStore, session: Uuid, id: &str, path: &str) {
        highlight_org_unit(
            store,
            session,
            HighlightOrgUnitForm {
                id: id.into(),
                display_name: "Juba".into(),
                path: path.into(),
                has_children: false,
            },
        )
        .unwrap();
    }

    #[test]
    fn unit_with_children_is_queried_with_descendants() {
        let store = store();
        let session = Uuid::new_v4();
        highlight(&store, session, "ImspTQPwCqd", "/ImspTQPwCqd");

        let mut repo = MockRepository::new();
        repo.expect_count_org_unit_children()
            .withf(|id| id.as_str() == "ImspTQPwCqd")
            .times(1)
            .returning(|_| Ok(10));

        let unit = confirm_org_unit(&repo, &store, session).unwrap();
        assert_eq!(unit.scope_mode, ScopeMode::Descendants);
        assert_eq!(store.snapshot(session).org_unit(), Some(&unit));
    }

    #[test]
    fn leaf_unit_is_queried_alone() {
        let store = store();
        let session = Uuid::new_v4();
        highlight(&store, session, "O6uvpzGd5pu", "/ImspTQPwCqd/O6uvpzGd5pu");

        let mut repo = MockRepository::new();
        repo.expect_count_org_unit_children()
            .times(1)
            .returning(|_| Ok(0));

        let unit = confirm_org_unit(&repo, &store, session).unwrap();
        assert_eq!(unit.scope_mode, ScopeMode::Selected);
        assert_eq!(unit.path, "/ImspTQPwCqd/O6uvpzGd5pu");
    }

    #[test]
    fn failed_lookup_blocks_confirmation() {
        let store = store();
        let session = Uuid::new_v4();
        highlight(&store, session, "ImspTQPwCqd", "/ImspTQPwCqd");
        let mut repo = MockRepository::new();
        repo.expect_count_org_unit_children()
            .times(1)
            .returning(|_| Ok(2));
        confirm_org_unit(&repo, &store, session).unwrap();

        highlight(&store, session, "O6uvpzGd5pu", "/ImspTQPwCqd/O6uvpzGd5pu");
        let mut repo = MockRepository::new();
        repo.expect_count_org_unit_children()
            .times(1)
            .returning(|_| Err(RepositoryError::ConnectionError("refused".into())));

        let result = confirm_org_unit(&repo, &store, session);
        assert!(matches!(result, Err(ServiceError::Repository(_))));

        let state = store.snapshot(session);
        assert_eq!(state.org_unit().unwrap().id.as_str(), "ImspTQPwCqd");
        assert!(state.org_units.lookup_error().is_some());
    }

    #[test]
    fn confirm_without_highlight_is_rejected() {
        let store = store();
        let mut repo = MockRepository::new();
        repo.expect_count_org_unit_children().times(0);

        let result = confirm_org_unit(&repo, &store, Uuid::new_v4());
        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn tree_lists_children_of_expanded_nodes_only() {
        let store = store();
        let session = Uuid::new_v4();
        expand_org_unit(
            &store,
            session,
            TreePathForm {
                path: "/ImspTQPwCqd".into(),
            },
        )
        .unwrap();

        let mut repo = MockRepository::new();
        repo.expect_list_root_org_units().times(1).returning(|| {
            Ok(vec![
                node("ImspTQPwCqd", "/ImspTQPwCqd", true),
                node("Bk3v1dRnTjE", "/Bk3v1dRnTjE", true),
            ])
        });
        repo.expect_list_org_unit_children()
            .withf(|id| id.as_str() == "ImspTQPwCqd")
            .times(1)
            .returning(|_| Ok(vec![node("O6uvpzGd5pu", "/ImspTQPwCqd/O6uvpzGd5pu", false)]));

        let page = load_org_unit_page(&repo, &store, session).unwrap();
        let paths: Vec<_> = page
            .rows
            .iter()
            .map(|row| (row.node.path.as_str(), row.depth))
            .collect();
        assert_eq!(
            paths,
            vec![
                ("/ImspTQPwCqd", 0),
                ("/ImspTQPwCqd/O6uvpzGd5pu", 1),
                ("/Bk3v1dRnTjE", 0)
            ]
        );
        assert!(page.rows[0].expanded);
        assert!(!page.rows[2].expanded);
    }

    #[test]
    fn collapsed_node_hides_its_children() {
        let store = store();
        let session = Uuid::new_v4();
        let path = || TreePathForm {
            path: "/ImspTQPwCqd".into(),
        };
        expand_org_unit(&store, session, path()).unwrap();
        collapse_org_unit(&store, session, path()).unwrap();

        let mut repo = MockRepository::new();
        repo.expect_list_root_org_units()
            .returning(|| Ok(vec![node("ImspTQPwCqd", "/ImspTQPwCqd", true)]));
        repo.expect_list_org_unit_children().times(0);

        let page = load_org_unit_page(&repo, &store, session).unwrap();
        assert_eq!(page.rows.len(), 1);
    }

    #[test]
    fn root_listing_failure_is_reported() {
        let store = store();
        let mut repo = MockRepository::new();
        repo.expect_list_root_org_units().returning(|| {
            Err(RepositoryError::Status {
                status: 401,
                message: "Unauthorized".into(),
            })
        });

        let result = load_org_unit_page(&repo, &store, Uuid::new_v4());
        assert!(matches!(result, Err(ServiceError::Repository(_))));
    }
}

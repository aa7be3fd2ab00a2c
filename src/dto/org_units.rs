use serde::Serialize;

use crate::domain::org_unit::{OrgUnit, OrgUnitNode};

/// A visible line of the org-unit tree.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OrgUnitTreeRow {
    pub node: OrgUnitNode,
    pub depth: usize,
    pub expanded: bool,
    pub highlighted: bool,
}

/// Data required to render the org-unit picker.
#[derive(Debug, Serialize)]
pub struct OrgUnitPageData {
    pub rows: Vec<OrgUnitTreeRow>,
    pub highlighted: Option<OrgUnitNode>,
    pub confirmed: Option<OrgUnit>,
    pub lookup_error: Option<String>,
}

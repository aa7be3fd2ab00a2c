use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::domain::types::Uid;

/// Whether a query matches exactly one org unit or that unit and its subtree.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScopeMode {
    Selected,
    Descendants,
}

impl ScopeMode {
    /// Units with at least one child are queried together with their subtree.
    pub fn from_child_count(children: usize) -> Self {
        if children > 0 {
            ScopeMode::Descendants
        } else {
            ScopeMode::Selected
        }
    }

    /// Value of the remote `ouMode` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScopeMode::Selected => "SELECTED",
            ScopeMode::Descendants => "DESCENDANTS",
        }
    }
}

impl Display for ScopeMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tree node as listed by the remote platform.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrgUnitNode {
    pub id: Uid,
    pub display_name: String,
    /// Slash separated ancestry, e.g. `/ImspTQPwCqd/O6uvpzGd5pu`.
    pub path: String,
    pub has_children: bool,
}

/// A confirmed org-unit selection with its classified scope.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrgUnit {
    pub id: Uid,
    pub display_name: String,
    pub path: String,
    pub scope_mode: ScopeMode,
}

impl OrgUnit {
    /// Finalizes a highlighted node once its children have been counted.
    pub fn classify(node: OrgUnitNode, child_count: usize) -> Self {
        Self {
            id: node.id,
            display_name: node.display_name,
            path: node.path,
            scope_mode: ScopeMode::from_child_count(child_count),
        }
    }
}

/// Transient state of the org-unit picker.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrgUnitSelector {
    expanded: BTreeSet<String>,
    highlighted: Option<OrgUnitNode>,
    lookup_error: Option<String>,
}

impl OrgUnitSelector {
    pub fn expand(&mut self, path: impl Into<String>) {
        self.expanded.insert(path.into());
    }

    pub fn collapse(&mut self, path: &str) {
        self.expanded.remove(path);
    }

    pub fn is_expanded(&self, path: &str) -> bool {
        self.expanded.contains(path)
    }

    pub fn expanded(&self) -> &BTreeSet<String> {
        &self.expanded
    }

    /// Marks a node as the pending choice. Nothing is emitted until confirmation.
    pub fn highlight(&mut self, node: OrgUnitNode) {
        self.lookup_error = None;
        self.highlighted = Some(node);
    }

    pub fn highlighted(&self) -> Option<&OrgUnitNode> {
        self.highlighted.as_ref()
    }

    pub fn fail_lookup(&mut self, message: impl Into<String>) {
        self.lookup_error = Some(message.into());
    }

    pub fn lookup_error(&self) -> Option<&str> {
        self.lookup_error.as_deref()
    }

    pub fn clear_lookup_error(&mut self) {
        self.lookup_error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(path: &str, has_children: bool) -> OrgUnitNode {
        OrgUnitNode {
            id: Uid::new("O6uvpzGd5pu").unwrap(),
            display_name: "Juba Teaching Hospital".into(),
            path: path.into(),
            has_children,
        }
    }

    #[test]
    fn scope_mode_follows_child_count() {
        assert_eq!(ScopeMode::from_child_count(0), ScopeMode::Selected);
        assert_eq!(ScopeMode::from_child_count(1), ScopeMode::Descendants);
        assert_eq!(ScopeMode::from_child_count(42), ScopeMode::Descendants);
    }

    #[test]
    fn scope_mode_serializes_as_remote_parameter() {
        assert_eq!(
            serde_json::to_string(&ScopeMode::Descendants).unwrap(),
            "\"DESCENDANTS\""
        );
        assert_eq!(ScopeMode::Selected.to_string(), "SELECTED");
    }

    #[test]
    fn classify_keeps_node_identity() {
        let unit = OrgUnit::classify(node("/ImspTQPwCqd/O6uvpzGd5pu", false), 0);
        assert_eq!(unit.id.as_str(), "O6uvpzGd5pu");
        assert_eq!(unit.path, "/ImspTQPwCqd/O6uvpzGd5pu");
        assert_eq!(unit.scope_mode, ScopeMode::Selected);
    }

    #[test]
    fn collapse_removes_only_that_path() {
        let mut selector = OrgUnitSelector::default();
        selector.expand("/a");
        selector.expand("/a/b");
        selector.collapse("/a");
        assert!(!selector.is_expanded("/a"));
        assert!(selector.is_expanded("/a/b"));
    }

    #[test]
    fn highlight_clears_previous_lookup_error() {
        let mut selector = OrgUnitSelector::default();
        selector.fail_lookup("timeout");
        selector.highlight(node("/ImspTQPwCqd", true));
        assert!(selector.lookup_error().is_none());
        assert!(selector.highlighted().is_some());
    }
}

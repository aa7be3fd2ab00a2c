use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::domain::org_unit::OrgUnitNode;
use crate::domain::types::{NonEmptyString, Uid};
use crate::forms::FormError;

fn validate_path(path: &str) -> Result<(), ValidationError> {
    if path.starts_with('/') && path.len() > 1 {
        Ok(())
    } else {
        Err(ValidationError::new("path"))
    }
}

/// Expand or collapse a tree node.
#[derive(Debug, Deserialize, Validate)]
pub struct TreePathForm {
    #[validate(length(min = 2, max = 512), custom(function = "validate_path"))]
    pub path: String,
}

/// Pick a node of the tree; confirmation happens separately.
#[derive(Debug, Deserialize, Validate)]
pub struct HighlightOrgUnitForm {
    #[validate(length(equal = 11))]
    pub id: String,
    #[validate(length(min = 1, max = 230))]
    pub display_name: String,
    #[validate(length(min = 2, max = 512), custom(function = "validate_path"))]
    pub path: String,
    #[serde(default)]
    pub has_children: bool,
}

impl TryFrom<HighlightOrgUnitForm> for OrgUnitNode {
    type Error = FormError;

    fn try_from(form: HighlightOrgUnitForm) -> Result<Self, Self::Error> {
        form.validate()?;
        let id = Uid::new(form.id).map_err(|_| FormError::InvalidOrgUnitId)?;
        if !form.path.ends_with(id.as_str()) {
            return Err(FormError::InvalidPath);
        }
        let display_name = NonEmptyString::new(form.display_name)
            .map_err(|_| FormError::InvalidName)?
            .into_inner();
        Ok(OrgUnitNode {
            id,
            display_name,
            path: form.path,
            has_children: form.has_children,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(id: &str, path: &str) -> HighlightOrgUnitForm {
        HighlightOrgUnitForm {
            id: id.into(),
            display_name: " Juba County ".into(),
            path: path.into(),
            has_children: true,
        }
    }

    #[test]
    fn highlight_form_builds_node() {
        let node =
            OrgUnitNode::try_from(form("O6uvpzGd5pu", "/ImspTQPwCqd/O6uvpzGd5pu")).unwrap();
        assert_eq!(node.display_name, "Juba County");
        assert!(node.has_children);
    }

    #[test]
    fn path_must_end_with_the_node_id() {
        let result = OrgUnitNode::try_from(form("O6uvpzGd5pu", "/ImspTQPwCqd"));
        assert!(matches!(result, Err(FormError::InvalidPath)));
    }

    #[test]
    fn malformed_id_is_rejected() {
        let result = OrgUnitNode::try_from(form("0000000000a", "/0000000000a"));
        assert!(matches!(result, Err(FormError::InvalidOrgUnitId)));
    }

    #[test]
    fn tree_path_requires_leading_slash() {
        let bad = TreePathForm {
            path: "ImspTQPwCqd".into(),
        };
        assert!(bad.validate().is_err());
        let good = TreePathForm {
            path: "/ImspTQPwCqd".into(),
        };
        assert!(good.validate().is_ok());
    }
}

//! Wire shapes of the remote REST API and their conversion into domain types.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::domain::event::{EventPage, EventRecord};
use crate::domain::org_unit::OrgUnitNode;
use crate::domain::types::{TypeConstraintError, Uid};

#[derive(Debug, Deserialize)]
pub struct Pager {
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default, rename = "pageSize")]
    pub page_size: Option<usize>,
    #[serde(default)]
    pub total: Option<usize>,
    #[serde(default, rename = "pageCount")]
    pub page_count: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct DataValue {
    #[serde(rename = "dataElement")]
    pub data_element: String,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Event {
    pub event: String,
    #[serde(default, rename = "eventDate")]
    pub event_date: Option<String>,
    #[serde(default, rename = "orgUnit")]
    pub org_unit: Option<String>,
    #[serde(default, rename = "orgUnitName")]
    pub org_unit_name: Option<String>,
    #[serde(default, rename = "dataValues")]
    pub data_values: Vec<DataValue>,
}

#[derive(Debug, Deserialize)]
pub struct EventsResponse {
    #[serde(default)]
    pub pager: Option<Pager>,
    #[serde(default)]
    pub events: Vec<Event>,
}

impl From<Event> for EventRecord {
    fn from(event: Event) -> Self {
        let mut data_values = BTreeMap::new();
        for data_value in event.data_values {
            let Some(value) = data_value.value else {
                continue;
            };
            if data_values.contains_key(&data_value.data_element) {
                log::warn!(
                    "Event {} repeats data element {}; keeping the first value",
                    event.event,
                    data_value.data_element
                );
                continue;
            }
            data_values.insert(data_value.data_element, value);
        }

        EventRecord {
            event_id: event.event,
            event_date: event.event_date,
            org_unit_id: event.org_unit,
            org_unit_name: event.org_unit_name,
            data_values,
        }
    }
}

impl From<EventsResponse> for EventPage {
    fn from(response: EventsResponse) -> Self {
        let total = response
            .pager
            .and_then(|pager| pager.total)
            .unwrap_or_default();
        EventPage {
            records: response.events.into_iter().map(EventRecord::from).collect(),
            total,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OrganisationUnit {
    pub id: String,
    #[serde(default, rename = "displayName")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    /// `children::isNotEmpty` comes back as a boolean.
    #[serde(default)]
    pub children: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct OrganisationUnitsResponse {
    #[serde(default, rename = "organisationUnits")]
    pub organisation_units: Vec<OrganisationUnit>,
}

#[derive(Debug, Deserialize)]
pub struct ChildRef {
    pub id: String,
}

/// Response of the child classification lookup.
#[derive(Debug, Deserialize)]
pub struct OrganisationUnitChildIds {
    #[serde(default)]
    pub children: Vec<ChildRef>,
}

/// Response of the tree expansion lookup.
#[derive(Debug, Deserialize)]
pub struct OrganisationUnitChildren {
    #[serde(default)]
    pub children: Vec<OrganisationUnit>,
}

impl TryFrom<OrganisationUnit> for OrgUnitNode {
    type Error = TypeConstraintError;

    fn try_from(unit: OrganisationUnit) -> Result<Self, Self::Error> {
        let id = Uid::new(unit.id)?;
        let path = unit.path.unwrap_or_else(|| format!("/{id}"));
        let display_name = unit.display_name.unwrap_or_else(|| id.to_string());
        Ok(OrgUnitNode {
            id,
            display_name,
            path,
            has_children: unit.children.unwrap_or(false),
        })
    }
}

/// Converts a listing, skipping units with malformed identifiers.
pub fn into_nodes(units: Vec<OrganisationUnit>) -> Vec<OrgUnitNode> {
    let mut nodes: Vec<OrgUnitNode> = units
        .into_iter()
        .filter_map(|unit| match OrgUnitNode::try_from(unit) {
            Ok(node) => Some(node),
            Err(err) => {
                log::warn!("Skipping organisation unit: {err}");
                None
            }
        })
        .collect();
    nodes.sort_by(|a, b| a.display_name.cmp(&b.display_name));
    nodes
}

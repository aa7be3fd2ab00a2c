use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Rendered in place of any value the record does not carry.
pub const PLACEHOLDER: &str = "-";

/// One birth notification as returned by the remote event query.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventRecord {
    pub event_id: String,
    pub event_date: Option<String>,
    pub org_unit_id: Option<String>,
    pub org_unit_name: Option<String>,
    /// Field id to value; each id appears once.
    pub data_values: BTreeMap<String, String>,
}

impl EventRecord {
    /// Looks up a field, treating empty strings as absent.
    pub fn value(&self, field_id: &str) -> Option<&str> {
        self.data_values
            .get(field_id)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Value of a field or [`PLACEHOLDER`].
    pub fn value_or_placeholder(&self, field_id: &str) -> &str {
        self.value(field_id).unwrap_or(PLACEHOLDER)
    }

    /// Org-unit name, falling back to its id, then to [`PLACEHOLDER`].
    pub fn facility(&self) -> &str {
        self.org_unit_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .or(self.org_unit_id.as_deref().filter(|id| !id.is_empty()))
            .unwrap_or(PLACEHOLDER)
    }
}

/// One page of events plus the total reported by the remote pager.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventPage {
    pub records: Vec<EventRecord>,
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> EventRecord {
        EventRecord {
            event_id: "a1b2c3d4e5f".into(),
            event_date: Some("2024-01-15T00:00:00.000".into()),
            org_unit_id: Some("O6uvpzGd5pu".into()),
            org_unit_name: None,
            data_values: BTreeMap::from([
                ("ZVlvCTT6G4A".to_string(), "Akech".to_string()),
                ("cJ1lAdSRdOn".to_string(), String::new()),
            ]),
        }
    }

    #[test]
    fn missing_and_empty_values_render_placeholder() {
        let record = record();
        assert_eq!(record.value_or_placeholder("ZVlvCTT6G4A"), "Akech");
        assert_eq!(record.value_or_placeholder("cJ1lAdSRdOn"), PLACEHOLDER);
        assert_eq!(record.value_or_placeholder("J9i1DFTGnpb"), PLACEHOLDER);
    }

    #[test]
    fn facility_falls_back_to_org_unit_id() {
        let mut record = record();
        assert_eq!(record.facility(), "O6uvpzGd5pu");
        record.org_unit_name = Some("Juba Teaching Hospital".into());
        assert_eq!(record.facility(), "Juba Teaching Hospital");
        record.org_unit_name = None;
        record.org_unit_id = None;
        assert_eq!(record.facility(), PLACEHOLDER);
    }
}

use serde::Serialize;

use crate::domain::org_unit::OrgUnit;
use crate::domain::report::ReportPhase;
use crate::pagination::Paginated;

/// One table row: the event id for the detail link plus the rendered cells.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EventRow {
    pub event_id: String,
    pub cells: Vec<String>,
}

/// Data required to render the main report template.
#[derive(Debug, Serialize)]
pub struct IndexPageData {
    pub phase: ReportPhase,
    pub org_unit: Option<OrgUnit>,
    pub period_label: Option<String>,
    /// Period selection is offered only after an org unit is confirmed.
    pub can_select_period: bool,
    pub can_generate: bool,
    /// False until the first report is generated.
    pub show_table: bool,
    pub columns: Vec<String>,
    pub column_count: usize,
    pub events: Paginated<EventRow>,
    /// A successful fetch returned nothing.
    pub show_empty_row: bool,
    pub error: Option<String>,
    pub page_size_options: Vec<usize>,
}

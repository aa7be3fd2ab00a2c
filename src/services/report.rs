//! Report generation, pagination and the table view model.

use uuid::Uuid;
use validator::Validate;

use crate::domain::catalog::{FieldKind, ReportProfile};
use crate::domain::event::{EventRecord, PLACEHOLDER};
use crate::domain::report::{FetchOutcome, FetchTicket, ReportPhase, ReportState};
use crate::domain::types::{PAGE_SIZE_OPTIONS, PageNumber, PageSize};
use crate::dto::main::{EventRow, IndexPageData};
use crate::forms::report::{PageForm, PageSizeForm};
use crate::pagination::Paginated;
use crate::repository::EventReader;
use crate::services::ServiceResult;
use crate::sessions::ReportStore;

/// Builds the report page from the session's current state.
pub fn load_index_page(
    store: &ReportStore,
    session_id: Uuid,
    profile: &ReportProfile,
) -> IndexPageData {
    let state = store.snapshot(session_id);
    build_index_page(&state, profile)
}

pub fn build_index_page(state: &ReportState, profile: &ReportProfile) -> IndexPageData {
    let catalog = &profile.catalog;
    let mut columns = vec!["Event Date".to_string(), "Org Unit".to_string()];
    columns.extend(catalog.table_columns.iter().map(|f| f.label.to_string()));

    let rows = state
        .records()
        .iter()
        .map(|record| event_row(record, profile))
        .collect();
    let pagination = state.pagination();

    IndexPageData {
        phase: state.phase(),
        org_unit: state.org_unit().cloned(),
        period_label: state.period().map(|p| p.label()),
        can_select_period: state.org_unit().is_some(),
        can_generate: state.can_generate(),
        show_table: state.has_report(),
        show_empty_row: state.phase() == ReportPhase::Loaded && state.records().is_empty(),
        column_count: catalog.column_count(),
        columns,
        events: Paginated::new(
            rows,
            pagination.current_page,
            pagination.page_size,
            pagination.total,
        ),
        error: state.error().map(|e| format!("ERROR: {e}")),
        page_size_options: PAGE_SIZE_OPTIONS.to_vec(),
    }
}

fn event_row(record: &EventRecord, profile: &ReportProfile) -> EventRow {
    let mut cells = Vec::with_capacity(profile.catalog.column_count());
    cells.push(profile.display_value(
        FieldKind::Date,
        record.event_date.as_deref().unwrap_or(PLACEHOLDER),
    ));
    cells.push(record.facility().to_string());
    for field in profile.catalog.table_columns {
        cells.push(profile.display_value(field.kind, record.value_or_placeholder(field.id)));
    }
    EventRow {
        event_id: record.event_id.clone(),
        cells,
    }
}

/// Runs an issued fetch and applies its result unless it went stale.
///
/// A remote failure is not returned as an error: it moves the report into
/// its error phase, where the page shows it.
fn run_fetch<R>(
    repo: &R,
    store: &ReportStore,
    session_id: Uuid,
    ticket: FetchTicket,
) -> FetchOutcome
where
    R: EventReader + ?Sized,
{
    let result = repo.list_events(&ticket.query).map_err(|err| {
        log::error!(
            "Failed to fetch events for {} ({}), page {}: {err}",
            ticket.query.org_unit_id,
            ticket.query.scope_mode,
            ticket.query.page
        );
        err.to_string()
    });
    store.with_state(session_id, |state| state.complete(&ticket, result))
}

/// Fetches the first page for the confirmed org unit and period.
pub fn generate_report<R>(
    repo: &R,
    store: &ReportStore,
    session_id: Uuid,
) -> ServiceResult<FetchOutcome>
where
    R: EventReader + ?Sized,
{
    let ticket = store.with_state(session_id, |state| state.generate())?;
    Ok(run_fetch(repo, store, session_id, ticket))
}

pub fn change_page<R>(
    repo: &R,
    store: &ReportStore,
    session_id: Uuid,
    form: PageForm,
) -> ServiceResult<FetchOutcome>
where
    R: EventReader + ?Sized,
{
    form.validate()?;
    let page = PageNumber::new(form.page)?;
    let ticket = store.with_state(session_id, |state| state.change_page(page))?;
    Ok(run_fetch(repo, store, session_id, ticket))
}

/// Switches the page size and goes back to the first page.
pub fn change_page_size<R>(
    repo: &R,
    store: &ReportStore,
    session_id: Uuid,
    form: PageSizeForm,
) -> ServiceResult<FetchOutcome>
where
    R: EventReader + ?Sized,
{
    form.validate()?;
    let page_size = PageSize::new(form.page_size)?;
    let ticket = store.with_state(session_id, |state| state.change_page_size(page_size))?;
    Ok(run_fetch(repo, store, session_id, ticket))
}

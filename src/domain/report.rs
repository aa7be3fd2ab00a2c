//! Report orchestration state machine.
//!
//! Every state change goes through a method of [`ReportState`]. Fetches are
//! split into an issue step, which hands out a [`FetchTicket`], and a
//! completion step, which only applies the newest ticket. The remote call
//! itself happens in between, outside of any lock.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::domain::event::{EventPage, EventRecord};
use crate::domain::org_unit::{OrgUnit, OrgUnitSelector, ScopeMode};
use crate::domain::period::Period;
use crate::domain::types::{PageNumber, PageSize, Uid};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportPhase {
    Idle,
    AwaitingSelections,
    Loading,
    Loaded,
    Error,
}

/// Transitions the state machine refuses.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReportError {
    #[error("select an organisation unit first")]
    OrgUnitRequired,
    #[error("select an organisation unit and a period first")]
    SelectionsIncomplete,
    #[error("generate the report first")]
    NoReport,
    #[error("event {0} is not part of the current page")]
    RecordNotFound(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PaginationState {
    pub current_page: usize,
    pub page_size: usize,
    pub total: usize,
}

impl PaginationState {
    pub fn new(page_size: PageSize) -> Self {
        Self {
            current_page: 1,
            page_size: page_size.get(),
            total: 0,
        }
    }

    pub fn page_count(&self) -> usize {
        self.total.div_ceil(self.page_size)
    }
}

/// Parameters of one event page request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventQuery {
    pub org_unit_id: Uid,
    pub scope_mode: ScopeMode,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub page: usize,
    pub page_size: usize,
}

impl EventQuery {
    fn new(org_unit: &OrgUnit, period: &Period, page: usize, page_size: usize) -> Self {
        Self {
            org_unit_id: org_unit.id.clone(),
            scope_mode: org_unit.scope_mode,
            start_date: period.start_date,
            end_date: period.end_date,
            page,
            page_size,
        }
    }
}

/// Proof that a fetch was issued. Only the most recent ticket is applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub query: EventQuery,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    /// A newer fetch was issued meanwhile; the result was dropped.
    Stale,
}

/// Everything one browser session knows about its report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportState {
    phase: ReportPhase,
    pub org_units: OrgUnitSelector,
    org_unit: Option<OrgUnit>,
    period: Option<Period>,
    generated: bool,
    pagination: PaginationState,
    records: Vec<EventRecord>,
    error: Option<String>,
    latest_seq: u64,
    open_event: Option<String>,
}

impl ReportState {
    pub fn new(page_size: PageSize) -> Self {
        Self {
            phase: ReportPhase::Idle,
            org_units: OrgUnitSelector::default(),
            org_unit: None,
            period: None,
            generated: false,
            pagination: PaginationState::new(page_size),
            records: Vec::new(),
            error: None,
            latest_seq: 0,
            open_event: None,
        }
    }

    /// Idle → AwaitingSelections. No-op in any other phase.
    pub fn mount(&mut self) {
        if self.phase == ReportPhase::Idle {
            self.phase = ReportPhase::AwaitingSelections;
        }
    }

    pub fn phase(&self) -> ReportPhase {
        self.phase
    }

    pub fn org_unit(&self) -> Option<&OrgUnit> {
        self.org_unit.as_ref()
    }

    pub fn period(&self) -> Option<&Period> {
        self.period.as_ref()
    }

    pub fn pagination(&self) -> PaginationState {
        self.pagination
    }

    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether a report has been generated and its table should be shown.
    pub fn has_report(&self) -> bool {
        self.generated
    }

    pub fn can_generate(&self) -> bool {
        self.phase != ReportPhase::Idle && self.org_unit.is_some() && self.period.is_some()
    }

    /// Replaces the org unit wholesale. The shown table stays until the next generate.
    pub fn confirm_org_unit(&mut self, org_unit: OrgUnit) {
        self.org_units.clear_lookup_error();
        self.org_unit = Some(org_unit);
    }

    /// Period selection is only offered once an org unit is confirmed.
    pub fn confirm_period(&mut self, period: Period) -> Result<(), ReportError> {
        if self.org_unit.is_none() {
            return Err(ReportError::OrgUnitRequired);
        }
        self.period = Some(period);
        Ok(())
    }

    /// Starts a report for the confirmed selections on the first page.
    pub fn generate(&mut self) -> Result<FetchTicket, ReportError> {
        let (Some(org_unit), Some(period)) = (self.org_unit.as_ref(), self.period.as_ref()) else {
            return Err(ReportError::SelectionsIncomplete);
        };
        if self.phase == ReportPhase::Idle {
            return Err(ReportError::SelectionsIncomplete);
        }
        let query = EventQuery::new(org_unit, period, 1, self.pagination.page_size);
        self.generated = true;
        Ok(self.issue(query))
    }

    /// Requests another page of the generated report, keeping the page size.
    pub fn change_page(&mut self, page: PageNumber) -> Result<FetchTicket, ReportError> {
        let query = self.scoped_query(page.get(), self.pagination.page_size)?;
        Ok(self.issue(query))
    }

    /// Requests the first page with a new page size.
    pub fn change_page_size(&mut self, page_size: PageSize) -> Result<FetchTicket, ReportError> {
        let query = self.scoped_query(1, page_size.get())?;
        Ok(self.issue(query))
    }

    /// Query for the last confirmed org unit and period, once a report exists.
    fn scoped_query(&self, page: usize, page_size: usize) -> Result<EventQuery, ReportError> {
        if !self.generated {
            return Err(ReportError::NoReport);
        }
        let (Some(org_unit), Some(period)) = (self.org_unit.as_ref(), self.period.as_ref()) else {
            return Err(ReportError::SelectionsIncomplete);
        };
        Ok(EventQuery::new(org_unit, period, page, page_size))
    }

    fn issue(&mut self, query: EventQuery) -> FetchTicket {
        self.latest_seq += 1;
        self.phase = ReportPhase::Loading;
        FetchTicket {
            seq: self.latest_seq,
            query,
        }
    }

    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.seq == self.latest_seq
    }

    /// Applies the result of a fetch if no newer fetch was issued since.
    ///
    /// Success replaces the rows and takes page and size from the ticket. A
    /// failure keeps rows and pagination as they were before the fetch.
    pub fn complete(
        &mut self,
        ticket: &FetchTicket,
        result: Result<EventPage, String>,
    ) -> FetchOutcome {
        if !self.is_current(ticket) {
            log::warn!(
                "Discarding stale event page {} (seq {}, latest {})",
                ticket.query.page,
                ticket.seq,
                self.latest_seq
            );
            return FetchOutcome::Stale;
        }

        match result {
            Ok(page) => {
                self.pagination = PaginationState {
                    current_page: ticket.query.page,
                    page_size: ticket.query.page_size,
                    total: page.total,
                };
                self.records = page.records;
                self.error = None;
                self.phase = ReportPhase::Loaded;
                if self
                    .open_event
                    .as_deref()
                    .is_some_and(|id| !self.records.iter().any(|r| r.event_id == id))
                {
                    self.open_event = None;
                }
            }
            Err(message) => {
                self.error = Some(message);
                self.phase = ReportPhase::Error;
            }
        }
        FetchOutcome::Applied
    }

    /// Opens the certificate of one record on the current page.
    pub fn open_record(&mut self, event_id: &str) -> Result<&EventRecord, ReportError> {
        let record = self
            .records
            .iter()
            .find(|record| record.event_id == event_id)
            .ok_or_else(|| ReportError::RecordNotFound(event_id.to_string()))?;
        self.open_event = Some(record.event_id.clone());
        Ok(record)
    }

    pub fn open_event(&self) -> Option<&str> {
        self.open_event.as_deref()
    }

    /// Discards the detail view. Selections and pagination are untouched.
    pub fn close_record(&mut self) {
        self.open_event = None;
    }
}

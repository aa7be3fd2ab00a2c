use chrono::NaiveDate;
use uuid::Uuid;
use validator::Validate;

use crate::domain::period::{ISO_DATE_FORMAT, Period};
use crate::dto::period::PeriodPageData;
use crate::forms::period::PeriodForm;
use crate::services::ServiceResult;
use crate::sessions::ReportStore;

pub fn load_period_page(store: &ReportStore, session_id: Uuid, today: NaiveDate) -> PeriodPageData {
    let state = store.snapshot(session_id);
    let period = state.period();
    PeriodPageData {
        enabled: state.org_unit().is_some(),
        max_date: today.format(ISO_DATE_FORMAT).to_string(),
        start_date: period.map(|p| p.start_date.format(ISO_DATE_FORMAT).to_string()),
        end_date: period.map(|p| p.end_date.format(ISO_DATE_FORMAT).to_string()),
        label: period.map(Period::label),
    }
}

/// Validates the submitted dates against `today` and stores the period.
pub fn save_period(
    store: &ReportStore,
    session_id: Uuid,
    form: PeriodForm,
    today: NaiveDate,
) -> ServiceResult<Period> {
    form.validate()?;
    let period = form.into_period(today)?;
    store.with_state(session_id, |state| state.confirm_period(period))?;
    Ok(period)
}

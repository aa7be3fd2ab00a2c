use serde::Serialize;

/// Data required to render the period form.
#[derive(Debug, Serialize)]
pub struct PeriodPageData {
    pub enabled: bool,
    /// Upper bound for both date inputs, `YYYY-MM-DD`.
    pub max_date: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub label: Option<String>,
}

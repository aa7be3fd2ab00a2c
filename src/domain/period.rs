use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::types::TypeConstraintError;

/// Format of the `startDate`/`endDate` values exchanged with the browser and
/// the remote platform.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Inclusive reporting window.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Period {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Period {
    /// Builds a period whose bounds both lie on or before `today`.
    ///
    /// A start after the end is accepted as-is; the remote query simply
    /// returns nothing for it.
    pub fn new(
        start_date: NaiveDate,
        end_date: NaiveDate,
        today: NaiveDate,
    ) -> Result<Self, TypeConstraintError> {
        for date in [start_date, end_date] {
            if date > today {
                return Err(TypeConstraintError::FutureDate(
                    date.format(ISO_DATE_FORMAT).to_string(),
                ));
            }
        }
        if start_date > end_date {
            log::warn!("Accepting period with start {start_date} after end {end_date}");
        }
        Ok(Self {
            start_date,
            end_date,
        })
    }

    /// Parses `YYYY-MM-DD` inputs as submitted by date fields.
    pub fn parse(start: &str, end: &str, today: NaiveDate) -> Result<Self, TypeConstraintError> {
        Self::new(parse_iso_date(start)?, parse_iso_date(end)?, today)
    }

    /// Button label, e.g. `01-01-2024 to 31-01-2024`.
    pub fn label(&self) -> String {
        format!(
            "{} to {}",
            self.start_date.format("%d-%m-%Y"),
            self.end_date.format("%d-%m-%Y")
        )
    }
}

pub fn parse_iso_date(value: &str) -> Result<NaiveDate, TypeConstraintError> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, ISO_DATE_FORMAT)
        .map_err(|_| TypeConstraintError::InvalidDate(value.to_string()))
}

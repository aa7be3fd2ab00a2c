use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::domain::period::Period;
use crate::domain::types::TypeConstraintError;

/// Values of the two `<input type="date">` fields.
#[derive(Debug, Deserialize, Validate)]
pub struct PeriodForm {
    #[validate(length(equal = 10))]
    pub start_date: String,
    #[validate(length(equal = 10))]
    pub end_date: String,
}

impl PeriodForm {
    pub fn into_period(self, today: NaiveDate) -> Result<Period, TypeConstraintError> {
        Period::parse(&self.start_date, &self.end_date, today)
    }
}

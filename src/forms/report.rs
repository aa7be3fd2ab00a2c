use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct PageForm {
    #[validate(range(min = 1))]
    pub page: usize,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PageSizeForm {
    #[validate(range(min = 1, max = 100))]
    pub page_size: usize,
}

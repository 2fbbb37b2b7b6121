pub mod task;

pub use task::*;

use serde::Deserialize;

#[derive(serde::Serialize, serde::Deserialize, utoipa::ToSchema, validator::Validate, Debug, Clone, Copy)]
pub struct Page {
    #[validate(range(min = 1))]
    pub number: i64,
    #[validate(range(min = 1, max = 100))]
    pub size: i64,
}

impl Page {
    /// Rows skipped before this page, `None` if that does not fit an `i64`.
    pub fn offset(&self) -> Option<i64> {
        self.number
            .checked_sub(1)?
            .checked_mul(self.size)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            number: 1,
            size: 20,
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: Page,
    pub next_page: Option<i64>,
    pub total_items: i64,
    pub total_pages: i64,
}

impl<T> Paginated<T> {
    pub(crate) fn new(
        items: Vec<T>,
        page: Page,
        total_items: u64,
    ) -> Self {
        let total_items = total_items as i64;
        let total_pages = (total_items + page.size - 1) / page.size;
        let next_page = if page.number < total_pages {
            Some(page.number + 1)
        } else {
            None
        };

        Self {
            items,
            page,
            next_page,
            total_items,
            total_pages,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderDirection {
    Asc,
    #[default]
    Desc,
}

use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

pub const DEFAULT_PAGE_SIZE: i64 = 6;
pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl Pagination {
    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        let offset = (page - 1) * limit;
        (page, limit, offset)
    }

    /// Accepts `page` or `limit` from a raw query pair; returns false for other keys.
    pub(crate) fn accept(&mut self, key: &str, value: &str) -> AppResult<bool> {
        let slot = match key {
            "page" => &mut self.page,
            "limit" => &mut self.limit,
            _ => return Ok(false),
        };
        let parsed = value
            .parse::<i64>()
            .map_err(|_| AppError::bad_request(format!("{key} must be an integer")))?;
        *slot = Some(parsed);
        Ok(true)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct IngredientQuery {
    /// Case-insensitive name prefix.
    pub name: Option<String>,
}

/// Query of the subscription endpoints. Pagination fields are spelled out
/// rather than flattened because flattened query fields lose their numeric types.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SubscriptionQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Maximum number of recipes embedded per author.
    pub recipes_limit: Option<u64>,
}

impl SubscriptionQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            limit: self.limit,
        }
    }
}

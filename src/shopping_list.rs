//! Aggregation of the ingredients of every recipe in a user's shopping cart.

use std::collections::BTreeMap;

use crate::error::{AppError, AppResult};

pub const CONTENT_TYPE: &str = "text/plain; charset=utf-8";
pub const CONTENT_DISPOSITION: &str = "attachment; filename=\"shopping_cart.txt\"";

/// One ingredient usage by one recipe in the cart.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct CartIngredientRow {
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingLine {
    pub name: String,
    pub measurement_unit: String,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingList {
    pub lines: Vec<ShoppingLine>,
}

/// Merges rows sharing a name and unit, summing their amounts.
/// Output is ordered by name, then unit.
pub fn aggregate<I>(rows: I) -> Vec<ShoppingLine>
where
    I: IntoIterator<Item = CartIngredientRow>,
{
    let mut totals: BTreeMap<(String, String), i64> = BTreeMap::new();
    for row in rows {
        *totals
            .entry((row.name, row.measurement_unit))
            .or_insert(0) += i64::from(row.amount);
    }
    totals
        .into_iter()
        .map(|((name, measurement_unit), amount)| ShoppingLine {
            name,
            measurement_unit,
            amount,
        })
        .collect()
}

impl ShoppingList {
    pub fn from_rows<I>(rows: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = CartIngredientRow>,
    {
        let lines = aggregate(rows);
        if lines.is_empty() {
            return Err(AppError::bad_request(
                "Nothing to download, the shopping cart is empty",
            ));
        }
        Ok(Self { lines })
    }

    pub fn render(&self) -> String {
        self.lines
            .iter()
            .map(|line| {
                format!(
                    "{} ({}) — {}\n",
                    line.name, line.measurement_unit, line.amount
                )
            })
            .collect()
    }
}

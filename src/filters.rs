//! Query-string parsing and condition building for the recipe list.

use sea_orm::{
    ColumnTrait, Condition,
    sea_query::{Expr, Query},
};
use uuid::Uuid;

use crate::{
    entity::{favorites, recipe_tags, recipes, shopping_cart, tags},
    error::{AppError, AppResult},
    routes::params::Pagination,
};

/// Filters accepted by `GET /api/recipes`. All of them combine conjunctively.
#[derive(Debug, Default, Clone)]
pub struct RecipeQuery {
    pub pagination: Pagination,
    /// Tag slugs; a recipe matches when it carries any of them.
    pub tags: Vec<String>,
    pub author: Option<Uuid>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

impl RecipeQuery {
    /// Builds the query from raw key/value pairs so that `tags` may repeat.
    pub fn from_pairs<I, K, V>(pairs: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut query = RecipeQuery::default();
        for (key, value) in pairs {
            let (key, value) = (key.as_ref(), value.as_ref().trim());
            if query.pagination.accept(key, value)? {
                continue;
            }
            match key {
                "tags" => {
                    for slug in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                        if !query.tags.iter().any(|t| t == slug) {
                            query.tags.push(slug.to_string());
                        }
                    }
                }
                "author" => {
                    let author = Uuid::parse_str(value)
                        .map_err(|_| AppError::bad_request("author must be a user id"))?;
                    query.author = Some(author);
                }
                "is_favorited" => query.is_favorited = parse_flag(key, value)?,
                "is_in_shopping_cart" => query.is_in_shopping_cart = parse_flag(key, value)?,
                _ => {}
            }
        }
        Ok(query)
    }
}

/// Parses a query-string boolean (`1`, `0`, `true`, `false`, case-insensitive).
pub fn parse_flag(key: &str, value: &str) -> AppResult<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" => Ok(true),
        "0" | "false" | "" => Ok(false),
        _ => Err(AppError::bad_request(format!("{key} must be a boolean"))),
    }
}

/// Translates the query into a condition over `recipes`.
///
/// The favorite and cart flags only restrict the result for an authenticated
/// `viewer`; anonymous callers get the unrestricted set.
pub fn recipe_condition(query: &RecipeQuery, viewer: Option<Uuid>) -> Condition {
    let mut condition = Condition::all();

    if !query.tags.is_empty() {
        condition = condition.add(
            recipes::Column::Id.in_subquery(
                Query::select()
                    .column((recipe_tags::Entity, recipe_tags::Column::RecipeId))
                    .from(recipe_tags::Entity)
                    .inner_join(
                        tags::Entity,
                        Expr::col((tags::Entity, tags::Column::Id))
                            .equals((recipe_tags::Entity, recipe_tags::Column::TagId)),
                    )
                    .and_where(
                        Expr::col((tags::Entity, tags::Column::Slug)).is_in(query.tags.clone()),
                    )
                    .to_owned(),
            ),
        );
    }

    if let Some(author) = query.author {
        condition = condition.add(recipes::Column::AuthorId.eq(author));
    }

    if let Some(viewer) = viewer {
        if query.is_favorited {
            condition = condition.add(
                recipes::Column::Id.in_subquery(
                    Query::select()
                        .column(favorites::Column::RecipeId)
                        .from(favorites::Entity)
                        .and_where(favorites::Column::UserId.eq(viewer))
                        .to_owned(),
                ),
            );
        }
        if query.is_in_shopping_cart {
            condition = condition.add(
                recipes::Column::Id.in_subquery(
                    Query::select()
                        .column(shopping_cart::Column::RecipeId)
                        .from(shopping_cart::Entity)
                        .and_where(shopping_cart::Column::UserId.eq(viewer))
                        .to_owned(),
                ),
            );
        }
    }

    condition
}

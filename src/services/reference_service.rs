use sea_orm::{
    EntityTrait, QueryFilter, QueryOrder,
    sea_query::{Expr, extension::postgres::PgExpr},
};
use uuid::Uuid;

use crate::{
    dto::recipes::{IngredientList, TagList},
    entity::{
        ingredients::{Column as IngredientCol, Entity as Ingredients},
        tags::{Column as TagCol, Entity as Tags},
    },
    error::{AppError, AppResult},
    models::{Ingredient, Tag},
    response::ApiResponse,
};
use crate::state::AppState;

pub async fn list_tags(state: &AppState) -> AppResult<ApiResponse<TagList>> {
    let items = Tags::find()
        .order_by_asc(TagCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Tag::from)
        .collect();
    Ok(ApiResponse::success("Tags", TagList { items }, None))
}

pub async fn get_tag(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Tag>> {
    let tag = Tags::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Tag", Tag::from(tag), None))
}

/// Lists ingredients, optionally restricted to names starting with `prefix`.
pub async fn list_ingredients(
    state: &AppState,
    prefix: Option<&str>,
) -> AppResult<ApiResponse<IngredientList>> {
    let mut finder = Ingredients::find();
    if let Some(prefix) = prefix.map(str::trim).filter(|p| !p.is_empty()) {
        finder = finder.filter(Expr::col(IngredientCol::Name).ilike(prefix_pattern(prefix)));
    }
    let items = finder
        .order_by_asc(IngredientCol::Name)
        .order_by_asc(IngredientCol::MeasurementUnit)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Ingredient::from)
        .collect();
    Ok(ApiResponse::success(
        "Ingredients",
        IngredientList { items },
        None,
    ))
}

pub async fn get_ingredient(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Ingredient>> {
    let ingredient = Ingredients::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success(
        "Ingredient",
        Ingredient::from(ingredient),
        None,
    ))
}

/// LIKE pattern matching names that start with `prefix` literally.
pub fn prefix_pattern(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

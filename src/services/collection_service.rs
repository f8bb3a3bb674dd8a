use std::collections::HashSet;

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::{
    entity::{
        favorites::{Column as FavCol, Entity as Favorites},
        recipes::{Entity as Recipes, Model as RecipeModel},
        shopping_cart::{Column as CartCol, Entity as ShoppingCart},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::RecipeShort,
    response::{ApiResponse, Meta},
    shopping_list::{CartIngredientRow, ShoppingList},
    state::AppState,
};

/// Per-user recipe collections sharing the same add/remove contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeCollection {
    Favorites,
    ShoppingCart,
}

impl RecipeCollection {
    pub fn table(self) -> &'static str {
        match self {
            RecipeCollection::Favorites => "favorites",
            RecipeCollection::ShoppingCart => "shopping_cart",
        }
    }

    fn label(self) -> &'static str {
        match self {
            RecipeCollection::Favorites => "favorites",
            RecipeCollection::ShoppingCart => "shopping cart",
        }
    }
}

/// Recipe ids among `recipe_ids` that the viewer holds in `collection`.
pub async fn members<C: ConnectionTrait>(
    conn: &C,
    collection: RecipeCollection,
    viewer: Option<Uuid>,
    recipe_ids: &[Uuid],
) -> AppResult<HashSet<Uuid>> {
    let Some(viewer) = viewer else {
        return Ok(HashSet::new());
    };
    if recipe_ids.is_empty() {
        return Ok(HashSet::new());
    }
    let ids = recipe_ids.iter().copied();
    let members: HashSet<Uuid> = match collection {
        RecipeCollection::Favorites => Favorites::find()
            .filter(FavCol::UserId.eq(viewer))
            .filter(FavCol::RecipeId.is_in(ids))
            .all(conn)
            .await?
            .into_iter()
            .map(|row| row.recipe_id)
            .collect(),
        RecipeCollection::ShoppingCart => ShoppingCart::find()
            .filter(CartCol::UserId.eq(viewer))
            .filter(CartCol::RecipeId.is_in(ids))
            .all(conn)
            .await?
            .into_iter()
            .map(|row| row.recipe_id)
            .collect(),
    };
    Ok(members)
}

pub async fn add_recipe(
    state: &AppState,
    user: &AuthUser,
    collection: RecipeCollection,
    recipe_id: Uuid,
) -> AppResult<ApiResponse<RecipeShort>> {
    let recipe = find_recipe(state, recipe_id).await?;

    // The unique (user_id, recipe_id) constraint arbitrates concurrent adds.
    let sql = format!(
        "INSERT INTO {} (id, user_id, recipe_id) VALUES ($1, $2, $3) \
         ON CONFLICT (user_id, recipe_id) DO NOTHING",
        collection.table()
    );
    let result = sqlx::query(&sql)
        .bind(Uuid::new_v4())
        .bind(user.user_id)
        .bind(recipe.id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        tracing::warn!(
            user_id = %user.user_id,
            recipe_id = %recipe.id,
            collection = collection.table(),
            "recipe already in collection"
        );
        return Err(AppError::BadRequest(format!(
            "Recipe is already in your {}",
            collection.label()
        )));
    }

    tracing::info!(
        user_id = %user.user_id,
        recipe_id = %recipe.id,
        collection = collection.table(),
        "recipe added to collection"
    );
    Ok(ApiResponse::success(
        format!("Added to {}", collection.label()),
        RecipeShort::from(recipe),
        Some(Meta::empty()),
    ))
}

pub async fn remove_recipe(
    state: &AppState,
    user: &AuthUser,
    collection: RecipeCollection,
    recipe_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let recipe = find_recipe(state, recipe_id).await?;

    let sql = format!(
        "DELETE FROM {} WHERE user_id = $1 AND recipe_id = $2",
        collection.table()
    );
    let result = sqlx::query(&sql)
        .bind(user.user_id)
        .bind(recipe.id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::BadRequest(format!(
            "Recipe is not in your {}",
            collection.label()
        )));
    }

    tracing::info!(
        user_id = %user.user_id,
        recipe_id = %recipe.id,
        collection = collection.table(),
        "recipe removed from collection"
    );
    Ok(ApiResponse::done(format!(
        "Removed from {}",
        collection.label()
    )))
}

/// Sums the ingredients of every recipe in the caller's cart.
pub async fn shopping_list(state: &AppState, user: &AuthUser) -> AppResult<ShoppingList> {
    let rows = sqlx::query_as::<_, CartIngredientRow>(
        r#"
        SELECT i.name, i.measurement_unit, ri.amount
        FROM shopping_cart sc
        JOIN recipe_ingredients ri ON ri.recipe_id = sc.recipe_id
        JOIN ingredients i ON i.id = ri.ingredient_id
        WHERE sc.user_id = $1
        "#,
    )
    .bind(user.user_id)
    .fetch_all(&state.pool)
    .await?;

    let list = ShoppingList::from_rows(rows)?;
    tracing::info!(user_id = %user.user_id, lines = list.lines.len(), "shopping list built");
    Ok(list)
}

async fn find_recipe(state: &AppState, id: Uuid) -> AppResult<RecipeModel> {
    Recipes::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)
}

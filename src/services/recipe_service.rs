use std::collections::HashMap;

use chrono::Utc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
    ActiveValue::NotSet,
    sea_query::LockType,
};
use uuid::Uuid;

use crate::{
    dto::recipes::{RecipeList, RecipeWriteRequest},
    entity::{
        ingredients::{Column as IngredientCol, Entity as Ingredients},
        recipe_ingredients::{
            ActiveModel as RecipeIngredientActive, Column as RecipeIngredientCol,
            Entity as RecipeIngredients,
        },
        recipe_tags::{ActiveModel as RecipeTagActive, Column as RecipeTagCol, Entity as RecipeTags},
        recipes::{ActiveModel as RecipeActive, Column as RecipeCol, Entity as Recipes, Model as RecipeModel},
        tags::{Column as TagCol, Entity as Tags},
        users::{Column as UserCol, Entity as Users},
    },
    error::{AppError, AppResult},
    filters::{RecipeQuery, recipe_condition},
    middleware::auth::AuthUser,
    models::{Recipe, RecipeIngredient, Tag, User},
    response::{ApiResponse, Meta},
    services::{
        collection_service::{self, RecipeCollection},
        user_service::subscribed_to,
    },
    state::AppState,
};

pub async fn list_recipes(
    state: &AppState,
    viewer: Option<Uuid>,
    query: RecipeQuery,
) -> AppResult<ApiResponse<RecipeList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let finder = Recipes::find()
        .filter(recipe_condition(&query, viewer))
        .order_by_desc(RecipeCol::CreatedAt)
        .order_by_desc(RecipeCol::Id);

    let total = finder.clone().count(&state.orm).await? as i64;
    let models = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let items = hydrate(&state.orm, viewer, models).await?;
    Ok(ApiResponse::success(
        "Recipes",
        RecipeList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn get_recipe(
    state: &AppState,
    viewer: Option<Uuid>,
    id: Uuid,
) -> AppResult<ApiResponse<Recipe>> {
    let model = Recipes::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let recipe = hydrate_one(&state.orm, viewer, model).await?;
    Ok(ApiResponse::success("Recipe", recipe, None))
}

pub async fn create_recipe(
    state: &AppState,
    user: &AuthUser,
    payload: RecipeWriteRequest,
) -> AppResult<ApiResponse<Recipe>> {
    payload.validate()?;
    let txn = state.orm.begin().await?;

    let recipe = RecipeActive {
        id: Set(Uuid::new_v4()),
        author_id: Set(user.user_id),
        name: Set(payload.name.trim().to_string()),
        image: Set(payload.image.clone()),
        text: Set(payload.text.clone()),
        cooking_time: Set(payload.cooking_time),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    write_relations(&txn, recipe.id, &payload).await?;
    txn.commit().await?;

    tracing::info!(recipe_id = %recipe.id, author_id = %user.user_id, "recipe created");
    let recipe = hydrate_one(&state.orm, Some(user.user_id), recipe).await?;
    Ok(ApiResponse::success("Recipe created", recipe, Some(Meta::empty())))
}

/// Overwrites the recipe, replacing its tag links and ingredient rows wholesale.
pub async fn update_recipe(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: RecipeWriteRequest,
) -> AppResult<ApiResponse<Recipe>> {
    payload.validate()?;
    let txn = state.orm.begin().await?;

    let existing = Recipes::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    if existing.author_id != user.user_id {
        return Err(AppError::Forbidden);
    }

    let mut active: RecipeActive = existing.into();
    active.name = Set(payload.name.trim().to_string());
    active.image = Set(payload.image.clone());
    active.text = Set(payload.text.clone());
    active.cooking_time = Set(payload.cooking_time);
    let recipe = active.update(&txn).await?;

    RecipeTags::delete_many()
        .filter(RecipeTagCol::RecipeId.eq(recipe.id))
        .exec(&txn)
        .await?;
    RecipeIngredients::delete_many()
        .filter(RecipeIngredientCol::RecipeId.eq(recipe.id))
        .exec(&txn)
        .await?;
    write_relations(&txn, recipe.id, &payload).await?;
    txn.commit().await?;

    tracing::info!(recipe_id = %recipe.id, author_id = %user.user_id, "recipe updated");
    let recipe = hydrate_one(&state.orm, Some(user.user_id), recipe).await?;
    Ok(ApiResponse::success("Updated", recipe, Some(Meta::empty())))
}

pub async fn delete_recipe(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let existing = Recipes::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    if existing.author_id != user.user_id {
        return Err(AppError::Forbidden);
    }

    Recipes::delete_by_id(existing.id).exec(&state.orm).await?;

    tracing::info!(recipe_id = %id, author_id = %user.user_id, "recipe deleted");
    Ok(ApiResponse::done("Deleted"))
}

/// Attaches tags and ingredient amounts to a freshly written recipe.
async fn write_relations(
    txn: &DatabaseTransaction,
    recipe_id: Uuid,
    payload: &RecipeWriteRequest,
) -> AppResult<()> {
    let tag_ids = payload.unique_tags();
    let known_tags = Tags::find()
        .filter(TagCol::Id.is_in(tag_ids.clone()))
        .count(txn)
        .await?;
    if known_tags as usize != tag_ids.len() {
        return Err(AppError::bad_request("Unknown tag id"));
    }

    let ingredient_ids: Vec<Uuid> = payload.ingredients.iter().map(|i| i.id).collect();
    let known_ingredients = Ingredients::find()
        .filter(IngredientCol::Id.is_in(ingredient_ids.clone()))
        .count(txn)
        .await?;
    if known_ingredients as usize != ingredient_ids.len() {
        return Err(AppError::bad_request("Unknown ingredient id"));
    }

    RecipeTags::insert_many(tag_ids.into_iter().map(|tag_id| RecipeTagActive {
        recipe_id: Set(recipe_id),
        tag_id: Set(tag_id),
    }))
    .exec_without_returning(txn)
    .await?;

    RecipeIngredients::insert_many(payload.ingredients.iter().map(|item| {
        RecipeIngredientActive {
            id: Set(Uuid::new_v4()),
            recipe_id: Set(recipe_id),
            ingredient_id: Set(item.id),
            amount: Set(item.amount),
        }
    }))
    .exec_without_returning(txn)
    .await?;

    Ok(())
}

async fn hydrate_one<C: ConnectionTrait>(
    conn: &C,
    viewer: Option<Uuid>,
    model: RecipeModel,
) -> AppResult<Recipe> {
    hydrate(conn, viewer, vec![model])
        .await?
        .into_iter()
        .next()
        .ok_or(AppError::NotFound)
}

/// Expands recipe rows into the read shape, batching every lookup across the page.
pub async fn hydrate<C: ConnectionTrait>(
    conn: &C,
    viewer: Option<Uuid>,
    models: Vec<RecipeModel>,
) -> AppResult<Vec<Recipe>> {
    if models.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
    let mut author_ids: Vec<Uuid> = models.iter().map(|m| m.author_id).collect();
    author_ids.sort();
    author_ids.dedup();

    let authors: HashMap<Uuid, _> = Users::find()
        .filter(UserCol::Id.is_in(author_ids.clone()))
        .all(conn)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();
    let subscribed = subscribed_to(conn, viewer, &author_ids).await?;

    let mut tags: HashMap<Uuid, Vec<Tag>> = HashMap::new();
    for (link, tag) in RecipeTags::find()
        .filter(RecipeTagCol::RecipeId.is_in(ids.clone()))
        .find_also_related(Tags)
        .all(conn)
        .await?
    {
        if let Some(tag) = tag {
            tags.entry(link.recipe_id).or_default().push(Tag::from(tag));
        }
    }

    let mut ingredients: HashMap<Uuid, Vec<RecipeIngredient>> = HashMap::new();
    for (row, ingredient) in RecipeIngredients::find()
        .filter(RecipeIngredientCol::RecipeId.is_in(ids.clone()))
        .find_also_related(Ingredients)
        .all(conn)
        .await?
    {
        if let Some(ingredient) = ingredient {
            ingredients
                .entry(row.recipe_id)
                .or_default()
                .push(RecipeIngredient {
                    id: ingredient.id,
                    name: ingredient.name,
                    measurement_unit: ingredient.measurement_unit,
                    amount: row.amount,
                });
        }
    }

    let favorited =
        collection_service::members(conn, RecipeCollection::Favorites, viewer, &ids).await?;
    let in_cart =
        collection_service::members(conn, RecipeCollection::ShoppingCart, viewer, &ids).await?;

    models
        .into_iter()
        .map(|model| {
            let author = authors.get(&model.author_id).cloned().ok_or_else(|| {
                AppError::Internal(anyhow::anyhow!("recipe {} has no author", model.id))
            })?;
            let is_subscribed = subscribed.contains(&author.id);

            let mut recipe_tags = tags.remove(&model.id).unwrap_or_default();
            recipe_tags.sort_by(|a, b| a.name.cmp(&b.name));
            let mut recipe_ingredients = ingredients.remove(&model.id).unwrap_or_default();
            recipe_ingredients.sort_by(|a, b| a.name.cmp(&b.name));

            Ok(Recipe {
                id: model.id,
                author: User::from_entity(author, is_subscribed),
                name: model.name,
                image: model.image,
                text: model.text,
                ingredients: recipe_ingredients,
                tags: recipe_tags,
                cooking_time: model.cooking_time,
                is_favorited: favorited.contains(&model.id),
                is_in_shopping_cart: in_cart.contains(&model.id),
                created_at: model.created_at.with_timezone(&Utc),
            })
        })
        .collect()
}

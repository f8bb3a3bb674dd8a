use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::recipes::{RecipeList, RecipeWriteRequest},
    error::AppResult,
    filters::RecipeQuery,
    middleware::auth::{AuthUser, viewer_id},
    models::{Recipe, RecipeShort},
    response::ApiResponse,
    services::{
        collection_service::{self, RecipeCollection},
        recipe_service,
    },
    shopping_list,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_recipes).post(create_recipe))
        .route("/download_shopping_cart", get(download_shopping_cart))
        .route(
            "/{id}",
            get(get_recipe).patch(update_recipe).delete(delete_recipe),
        )
        .route(
            "/{id}/favorite",
            axum::routing::post(add_favorite).delete(remove_favorite),
        )
        .route(
            "/{id}/shopping_cart",
            axum::routing::post(add_to_shopping_cart).delete(remove_from_shopping_cart),
        )
}

#[utoipa::path(
    get,
    path = "/api/recipes",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("limit" = Option<i64>, Query, description = "Items per page, default 6"),
        ("tags" = Option<Vec<String>>, Query, description = "Tag slug, repeatable; matches any"),
        ("author" = Option<Uuid>, Query, description = "Author ID"),
        ("is_favorited" = Option<bool>, Query, description = "Only the caller's favorites (1/0)"),
        ("is_in_shopping_cart" = Option<bool>, Query, description = "Only recipes in the caller's cart (1/0)")
    ),
    responses(
        (status = 200, description = "List recipes", body = ApiResponse<RecipeList>),
        (status = 400, description = "Malformed filter")
    ),
    tag = "Recipes"
)]
pub async fn list_recipes(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<Json<ApiResponse<RecipeList>>> {
    let query = RecipeQuery::from_pairs(pairs)?;
    let resp = recipe_service::list_recipes(&state, viewer_id(user.as_ref()), query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/recipes/{id}",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Get recipe", body = ApiResponse<Recipe>),
        (status = 404, description = "Recipe not found"),
    ),
    tag = "Recipes"
)]
pub async fn get_recipe(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Recipe>>> {
    let resp = recipe_service::get_recipe(&state, viewer_id(user.as_ref()), id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/recipes",
    request_body = RecipeWriteRequest,
    responses(
        (status = 201, description = "Create recipe", body = ApiResponse<Recipe>),
        (status = 400, description = "Invalid recipe"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Recipes"
)]
pub async fn create_recipe(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<RecipeWriteRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Recipe>>)> {
    let resp = recipe_service::create_recipe(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    patch,
    path = "/api/recipes/{id}",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    request_body = RecipeWriteRequest,
    responses(
        (status = 200, description = "Updated recipe", body = ApiResponse<Recipe>),
        (status = 400, description = "Invalid recipe"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Recipe not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Recipes"
)]
pub async fn update_recipe(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<RecipeWriteRequest>,
) -> AppResult<Json<ApiResponse<Recipe>>> {
    let resp = recipe_service::update_recipe(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Deleted recipe", body = ApiResponse<serde_json::Value>),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Recipe not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Recipes"
)]
pub async fn delete_recipe(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = recipe_service::delete_recipe(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/recipes/{id}/favorite",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 201, description = "Added to favorites", body = ApiResponse<RecipeShort>),
        (status = 400, description = "Already in favorites"),
        (status = 404, description = "Recipe not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Favorites"
)]
pub async fn add_favorite(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<(StatusCode, Json<ApiResponse<RecipeShort>>)> {
    let resp =
        collection_service::add_recipe(&state, &user, RecipeCollection::Favorites, id).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/favorite",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Removed from favorites", body = ApiResponse<serde_json::Value>),
        (status = 400, description = "Not in favorites"),
        (status = 404, description = "Recipe not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Favorites"
)]
pub async fn remove_favorite(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp =
        collection_service::remove_recipe(&state, &user, RecipeCollection::Favorites, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/recipes/{id}/shopping_cart",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 201, description = "Added to shopping cart", body = ApiResponse<RecipeShort>),
        (status = 400, description = "Already in shopping cart"),
        (status = 404, description = "Recipe not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn add_to_shopping_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<(StatusCode, Json<ApiResponse<RecipeShort>>)> {
    let resp =
        collection_service::add_recipe(&state, &user, RecipeCollection::ShoppingCart, id).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/shopping_cart",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Removed from shopping cart", body = ApiResponse<serde_json::Value>),
        (status = 400, description = "Not in shopping cart"),
        (status = 404, description = "Recipe not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn remove_from_shopping_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = collection_service::remove_recipe(
        &state,
        &user,
        RecipeCollection::ShoppingCart,
        id,
    )
    .await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/recipes/download_shopping_cart",
    responses(
        (status = 200, description = "Summed ingredient list", body = String, content_type = "text/plain"),
        (status = 400, description = "Shopping cart is empty")
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn download_shopping_cart(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<impl IntoResponse> {
    let list = collection_service::shopping_list(&state, &user).await?;
    Ok((
        [
            (header::CONTENT_TYPE, shopping_list::CONTENT_TYPE),
            (header::CONTENT_DISPOSITION, shopping_list::CONTENT_DISPOSITION),
        ],
        list.render(),
    ))
}

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::recipes::IngredientList,
    error::AppResult,
    models::Ingredient,
    response::ApiResponse,
    routes::params::IngredientQuery,
    services::reference_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_ingredients))
        .route("/{id}", get(get_ingredient))
}

#[utoipa::path(
    get,
    path = "/api/ingredients",
    params(
        ("name" = Option<String>, Query, description = "Name prefix, case-insensitive")
    ),
    responses(
        (status = 200, description = "List ingredients", body = ApiResponse<IngredientList>)
    ),
    tag = "Ingredients"
)]
pub async fn list_ingredients(
    State(state): State<AppState>,
    Query(query): Query<IngredientQuery>,
) -> AppResult<Json<ApiResponse<IngredientList>>> {
    let resp = reference_service::list_ingredients(&state, query.name.as_deref()).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/ingredients/{id}",
    params(
        ("id" = Uuid, Path, description = "Ingredient ID")
    ),
    responses(
        (status = 200, description = "Get ingredient", body = ApiResponse<Ingredient>),
        (status = 404, description = "Ingredient not found"),
    ),
    tag = "Ingredients"
)]
pub async fn get_ingredient(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Ingredient>>> {
    let resp = reference_service::get_ingredient(&state, id).await?;
    Ok(Json(resp))
}

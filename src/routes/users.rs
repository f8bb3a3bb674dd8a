use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::{
        auth::SetPasswordRequest,
        users::{RegisterRequest, SubscriptionList, UserList},
    },
    error::AppResult,
    middleware::auth::{AuthUser, viewer_id},
    models::{Subscription, User},
    response::ApiResponse,
    routes::params::{Pagination, SubscriptionQuery},
    services::{auth_service, user_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(register))
        .route("/me", get(me))
        .route("/set_password", post(set_password))
        .route("/subscriptions", get(list_subscriptions))
        .route("/{id}", get(get_user))
        .route("/{id}/subscribe", post(subscribe).delete(unsubscribe))
}

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Register user", body = ApiResponse<User>),
        (status = 400, description = "Invalid or duplicate user data")
    ),
    tag = "Users"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<User>>)> {
    let resp = auth_service::register_user(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/users",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("limit" = Option<i64>, Query, description = "Items per page, default 6")
    ),
    responses(
        (status = 200, description = "List users", body = ApiResponse<UserList>)
    ),
    tag = "Users"
)]
pub async fn list_users(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<UserList>>> {
    let resp = user_service::list_users(&state, viewer_id(user.as_ref()), pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "Current user", body = ApiResponse<User>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn me(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<User>>> {
    let resp = user_service::me(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/users/set_password",
    request_body = SetPasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = ApiResponse<serde_json::Value>),
        (status = 400, description = "Wrong current password or invalid new one"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn set_password(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<SetPasswordRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = auth_service::set_password(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Get user", body = ApiResponse<User>),
        (status = 404, description = "User not found")
    ),
    tag = "Users"
)]
pub async fn get_user(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<User>>> {
    let resp = user_service::get_user(&state, viewer_id(user.as_ref()), id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/users/subscriptions",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("limit" = Option<i64>, Query, description = "Items per page, default 6"),
        ("recipes_limit" = Option<u64>, Query, description = "Recipes embedded per author")
    ),
    responses(
        (status = 200, description = "Authors the caller follows", body = ApiResponse<SubscriptionList>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn list_subscriptions(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<SubscriptionQuery>,
) -> AppResult<Json<ApiResponse<SubscriptionList>>> {
    let resp = user_service::list_subscriptions(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/users/{id}/subscribe",
    params(
        ("id" = Uuid, Path, description = "Author ID"),
        ("recipes_limit" = Option<u64>, Query, description = "Recipes embedded in the response")
    ),
    responses(
        (status = 201, description = "Subscribed", body = ApiResponse<Subscription>),
        (status = 400, description = "Self-subscription or already subscribed"),
        (status = 404, description = "Author not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn subscribe(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Query(query): Query<SubscriptionQuery>,
) -> AppResult<(StatusCode, Json<ApiResponse<Subscription>>)> {
    let resp = user_service::subscribe(&state, &user, id, query.recipes_limit).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}/subscribe",
    params(
        ("id" = Uuid, Path, description = "Author ID")
    ),
    responses(
        (status = 200, description = "Unsubscribed", body = ApiResponse<serde_json::Value>),
        (status = 400, description = "Not subscribed"),
        (status = 404, description = "Author not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn unsubscribe(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = user_service::unsubscribe(&state, &user, id).await?;
    Ok(Json(resp))
}

use std::collections::{HashMap, HashSet};

use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
    ActiveValue::NotSet,
    sea_query::{OnConflict, Query},
};
use uuid::Uuid;

use crate::{
    dto::users::{SubscriptionList, UserList},
    entity::{
        recipes::{Column as RecipeCol, Entity as Recipes},
        subscriptions::{self, Column as SubCol, Entity as Subscriptions},
        users::{Column as UserCol, Entity as Users, Model as UserModel},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{RecipeShort, Subscription, User},
    response::{ApiResponse, Meta},
    routes::params::{Pagination, SubscriptionQuery},
    state::AppState,
};

/// Which of `author_ids` the viewer follows.
pub async fn subscribed_to<C: ConnectionTrait>(
    conn: &C,
    viewer: Option<Uuid>,
    author_ids: &[Uuid],
) -> AppResult<HashSet<Uuid>> {
    let Some(viewer) = viewer else {
        return Ok(HashSet::new());
    };
    if author_ids.is_empty() {
        return Ok(HashSet::new());
    }
    let rows = Subscriptions::find()
        .filter(SubCol::UserId.eq(viewer))
        .filter(SubCol::AuthorId.is_in(author_ids.iter().copied()))
        .all(conn)
        .await?;
    Ok(rows.into_iter().map(|row| row.author_id).collect())
}

pub async fn list_users(
    state: &AppState,
    viewer: Option<Uuid>,
    pagination: Pagination,
) -> AppResult<ApiResponse<UserList>> {
    let (page, limit, offset) = pagination.normalize();
    let finder = Users::find().order_by_asc(UserCol::Username);
    let total = finder.clone().count(&state.orm).await? as i64;
    let users = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let ids: Vec<Uuid> = users.iter().map(|u| u.id).collect();
    let subscribed = subscribed_to(&state.orm, viewer, &ids).await?;
    let items = users
        .into_iter()
        .map(|u| {
            let is_subscribed = subscribed.contains(&u.id);
            User::from_entity(u, is_subscribed)
        })
        .collect();

    Ok(ApiResponse::success(
        "Users",
        UserList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn get_user(
    state: &AppState,
    viewer: Option<Uuid>,
    id: Uuid,
) -> AppResult<ApiResponse<User>> {
    let user = find_user(state, id).await?;
    let is_subscribed = subscribed_to(&state.orm, viewer, &[id]).await?.contains(&id);
    Ok(ApiResponse::success(
        "User",
        User::from_entity(user, is_subscribed),
        None,
    ))
}

pub async fn me(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<User>> {
    let model = find_user(state, user.user_id).await?;
    Ok(ApiResponse::success("User", User::from_entity(model, false), None))
}

pub async fn list_subscriptions(
    state: &AppState,
    user: &AuthUser,
    query: SubscriptionQuery,
) -> AppResult<ApiResponse<SubscriptionList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let finder = Users::find()
        .filter(
            UserCol::Id.in_subquery(
                Query::select()
                    .column(SubCol::AuthorId)
                    .from(Subscriptions)
                    .and_where(SubCol::UserId.eq(user.user_id))
                    .to_owned(),
            ),
        )
        .order_by_asc(UserCol::Username);

    let total = finder.clone().count(&state.orm).await? as i64;
    let authors = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let items = subscription_views(state, authors, query.recipes_limit).await?;
    Ok(ApiResponse::success(
        "Subscriptions",
        SubscriptionList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn subscribe(
    state: &AppState,
    user: &AuthUser,
    author_id: Uuid,
    recipes_limit: Option<u64>,
) -> AppResult<ApiResponse<Subscription>> {
    let author = find_user(state, author_id).await?;
    if author.id == user.user_id {
        return Err(AppError::bad_request("You cannot subscribe to yourself"));
    }

    let inserted = Subscriptions::insert(subscriptions::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        author_id: Set(author.id),
        created_at: NotSet,
    })
    .on_conflict(
        OnConflict::columns([SubCol::UserId, SubCol::AuthorId])
            .do_nothing()
            .to_owned(),
    )
    .exec_without_returning(&state.orm)
    .await?;

    if inserted == 0 {
        tracing::warn!(user_id = %user.user_id, author_id = %author.id, "duplicate subscription");
        return Err(AppError::bad_request(
            "You are already subscribed to this user",
        ));
    }

    tracing::info!(user_id = %user.user_id, author_id = %author.id, "subscribed");
    let view = subscription_views(state, vec![author], recipes_limit)
        .await?
        .into_iter()
        .next()
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Subscribed", view, Some(Meta::empty())))
}

pub async fn unsubscribe(
    state: &AppState,
    user: &AuthUser,
    author_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let author = find_user(state, author_id).await?;
    let result = Subscriptions::delete_many()
        .filter(SubCol::UserId.eq(user.user_id))
        .filter(SubCol::AuthorId.eq(author.id))
        .exec(&state.orm)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::bad_request(
            "You are not subscribed to this user",
        ));
    }

    tracing::info!(user_id = %user.user_id, author_id = %author.id, "unsubscribed");
    Ok(ApiResponse::done("Unsubscribed"))
}

async fn find_user(state: &AppState, id: Uuid) -> AppResult<UserModel> {
    Users::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)
}

/// Builds subscription cards for authors the caller already follows.
async fn subscription_views(
    state: &AppState,
    authors: Vec<UserModel>,
    recipes_limit: Option<u64>,
) -> AppResult<Vec<Subscription>> {
    if authors.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<Uuid> = authors.iter().map(|a| a.id).collect();
    let recipes = Recipes::find()
        .filter(RecipeCol::AuthorId.is_in(ids))
        .order_by_desc(RecipeCol::CreatedAt)
        .order_by_desc(RecipeCol::Id)
        .all(&state.orm)
        .await?;

    let mut by_author: HashMap<Uuid, Vec<RecipeShort>> = HashMap::new();
    for recipe in recipes {
        by_author
            .entry(recipe.author_id)
            .or_default()
            .push(RecipeShort::from(recipe));
    }

    Ok(authors
        .into_iter()
        .map(|author| {
            let mut recipes = by_author.remove(&author.id).unwrap_or_default();
            let recipes_count = recipes.len() as i64;
            if let Some(max) = recipes_limit {
                recipes.truncate(max as usize);
            }
            Subscription {
                author: User::from_entity(author, true),
                recipes,
                recipes_count,
            }
        })
        .collect())
}

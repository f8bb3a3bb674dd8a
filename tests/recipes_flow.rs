use std::collections::HashSet;

use recipe_share_api::{
    db::{create_pool, run_migrations},
    dto::{
        auth::{LoginRequest, SetPasswordRequest},
        recipes::{IngredientAmount, RecipeWriteRequest},
        users::RegisterRequest,
    },
    entity::{
        ingredients::ActiveModel as IngredientActive, recipe_ingredients,
        tags::ActiveModel as TagActive,
    },
    error::AppError,
    filters::RecipeQuery,
    middleware::auth::{AuthUser, verify_token},
    routes::params::SubscriptionQuery,
    services::{
        auth_service,
        collection_service::{self, RecipeCollection},
        recipe_service, reference_service, user_service,
    },
    state::AppState,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, Set,
    Statement,
};
use uuid::Uuid;

// Integration flow: two cooks publish recipes, follow each other, collect favorites
// and export a shopping list.
#[tokio::test]
async fn publish_follow_favorite_and_export_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;

    // Users
    let alice = register(&state, "alice", "alice@example.com").await?;
    let bob = register(&state, "bob", "bob@example.com").await?;
    assert!(matches!(
        auth_service::register_user(&state, registration("alice", "other@example.com")).await,
        Err(AppError::BadRequest(_))
    ));

    let login = auth_service::login_user(
        &state,
        LoginRequest {
            email: "alice@example.com".into(),
            password: "password123".into(),
        },
    )
    .await?;
    let token = login.data.expect("login token").token;
    assert_eq!(verify_token(&token, &state.jwt_secret)?.user_id, alice.user_id);
    assert!(matches!(
        auth_service::login_user(
            &state,
            LoginRequest {
                email: "alice@example.com".into(),
                password: "wrong".into(),
            },
        )
        .await,
        Err(AppError::BadRequest(_))
    ));

    assert!(matches!(
        auth_service::set_password(
            &state,
            &alice,
            SetPasswordRequest {
                current_password: "not-it".into(),
                new_password: "fresh-pass".into(),
            },
        )
        .await,
        Err(AppError::BadRequest(_))
    ));
    auth_service::set_password(
        &state,
        &alice,
        SetPasswordRequest {
            current_password: "password123".into(),
            new_password: "fresh-pass".into(),
        },
    )
    .await?;
    auth_service::login_user(
        &state,
        LoginRequest {
            email: "alice@example.com".into(),
            password: "fresh-pass".into(),
        },
    )
    .await?;

    // Reference data
    let breakfast = create_tag(&state, "Breakfast", "#E26C2D", "breakfast").await?;
    let lunch = create_tag(&state, "Lunch", "#49B64E", "lunch").await?;
    let dinner = create_tag(&state, "Dinner", "#8775D2", "dinner").await?;
    let egg = create_ingredient(&state, "egg", "pcs").await?;
    let flour = create_ingredient(&state, "flour", "g").await?;
    let milk = create_ingredient(&state, "milk", "ml").await?;

    let found = reference_service::list_ingredients(&state, Some("FL"))
        .await?
        .data
        .expect("ingredients");
    assert_eq!(found.items.len(), 1);
    assert_eq!(found.items[0].id, flour);

    // Recipes
    let omelette = recipe_service::create_recipe(
        &state,
        &alice,
        recipe("Omelette", vec![(egg, 2), (flour, 100)], vec![breakfast]),
    )
    .await?
    .data
    .expect("recipe");
    assert_eq!(omelette.author.id, alice.user_id);
    assert_eq!(omelette.ingredients.len(), 2);
    assert!(!omelette.is_favorited);

    let pancakes = recipe_service::create_recipe(
        &state,
        &bob,
        recipe("Pancakes", vec![(egg, 3), (milk, 200)], vec![lunch, lunch]),
    )
    .await?
    .data
    .expect("recipe");
    assert_eq!(pancakes.tags.len(), 1);

    let bread = recipe_service::create_recipe(
        &state,
        &bob,
        recipe("Bread", vec![(flour, 50)], vec![dinner]),
    )
    .await?
    .data
    .expect("recipe");

    assert!(matches!(
        recipe_service::create_recipe(
            &state,
            &alice,
            recipe("Twice egg", vec![(egg, 1), (egg, 2)], vec![breakfast]),
        )
        .await,
        Err(AppError::BadRequest(_))
    ));
    assert!(matches!(
        recipe_service::create_recipe(
            &state,
            &alice,
            recipe("Mystery", vec![(Uuid::new_v4(), 1)], vec![breakfast]),
        )
        .await,
        Err(AppError::BadRequest(_))
    ));

    // Filters
    let by_tags = list_ids(
        &state,
        None,
        &[("tags", "breakfast"), ("tags", "lunch")],
    )
    .await?;
    assert_eq!(by_tags, HashSet::from([omelette.id, pancakes.id]));

    let by_author = list_ids(&state, None, &[("author", &bob.user_id.to_string())]).await?;
    assert_eq!(by_author, HashSet::from([pancakes.id, bread.id]));

    let unknown_tag = list_ids(&state, None, &[("tags", "no-such-tag")]).await?;
    assert!(unknown_tag.is_empty());

    // Subscriptions
    assert!(matches!(
        user_service::subscribe(&state, &alice, alice.user_id, None).await,
        Err(AppError::BadRequest(_))
    ));
    assert!(matches!(
        user_service::subscribe(&state, &alice, Uuid::new_v4(), None).await,
        Err(AppError::NotFound)
    ));
    let followed = user_service::subscribe(&state, &alice, bob.user_id, Some(1))
        .await?
        .data
        .expect("subscription");
    assert_eq!(followed.recipes_count, 2);
    assert_eq!(followed.recipes.len(), 1);
    assert!(followed.author.is_subscribed);
    assert!(matches!(
        user_service::subscribe(&state, &alice, bob.user_id, None).await,
        Err(AppError::BadRequest(_))
    ));

    let subscriptions = user_service::list_subscriptions(&state, &alice, SubscriptionQuery::default())
        .await?
        .data
        .expect("subscriptions");
    assert_eq!(subscriptions.items.len(), 1);
    assert_eq!(subscriptions.items[0].author.id, bob.user_id);

    let bob_for_alice = user_service::get_user(&state, Some(alice.user_id), bob.user_id)
        .await?
        .data
        .expect("user");
    assert!(bob_for_alice.is_subscribed);
    let bob_for_anonymous = user_service::get_user(&state, None, bob.user_id)
        .await?
        .data
        .expect("user");
    assert!(!bob_for_anonymous.is_subscribed);

    user_service::unsubscribe(&state, &alice, bob.user_id).await?;
    assert!(matches!(
        user_service::unsubscribe(&state, &alice, bob.user_id).await,
        Err(AppError::BadRequest(_))
    ));

    // Favorites
    collection_service::add_recipe(&state, &alice, RecipeCollection::Favorites, pancakes.id)
        .await?;
    assert!(matches!(
        collection_service::add_recipe(&state, &alice, RecipeCollection::Favorites, pancakes.id)
            .await,
        Err(AppError::BadRequest(_))
    ));
    assert!(matches!(
        collection_service::add_recipe(&state, &alice, RecipeCollection::Favorites, Uuid::new_v4())
            .await,
        Err(AppError::NotFound)
    ));

    let favorited = list_ids(&state, Some(alice.user_id), &[("is_favorited", "1")]).await?;
    assert_eq!(favorited, HashSet::from([pancakes.id]));
    let anonymous = list_ids(&state, None, &[("is_favorited", "1")]).await?;
    assert_eq!(anonymous.len(), 3);
    let bobs_favorites = list_ids(&state, Some(bob.user_id), &[("is_favorited", "true")]).await?;
    assert!(bobs_favorites.is_empty());

    let seen_by_alice = recipe_service::get_recipe(&state, Some(alice.user_id), pancakes.id)
        .await?
        .data
        .expect("recipe");
    assert!(seen_by_alice.is_favorited);
    assert!(!seen_by_alice.is_in_shopping_cart);

    collection_service::remove_recipe(&state, &alice, RecipeCollection::Favorites, pancakes.id)
        .await?;
    assert!(matches!(
        collection_service::remove_recipe(&state, &alice, RecipeCollection::Favorites, pancakes.id)
            .await,
        Err(AppError::BadRequest(_))
    ));

    // Shopping cart
    assert!(matches!(
        collection_service::shopping_list(&state, &alice).await,
        Err(AppError::BadRequest(_))
    ));
    collection_service::add_recipe(&state, &alice, RecipeCollection::ShoppingCart, omelette.id)
        .await?;
    collection_service::add_recipe(&state, &alice, RecipeCollection::ShoppingCart, pancakes.id)
        .await?;
    let in_cart = list_ids(&state, Some(alice.user_id), &[("is_in_shopping_cart", "1")]).await?;
    assert_eq!(in_cart, HashSet::from([omelette.id, pancakes.id]));

    let list = collection_service::shopping_list(&state, &alice).await?;
    assert_eq!(
        list.render(),
        "egg (pcs) — 5\nflour (g) — 100\nmilk (ml) — 200\n"
    );

    // Updates replace ingredients wholesale and are author-only
    assert!(matches!(
        recipe_service::update_recipe(
            &state,
            &bob,
            omelette.id,
            recipe("Stolen", vec![(egg, 1)], vec![breakfast]),
        )
        .await,
        Err(AppError::Forbidden)
    ));
    let updated = recipe_service::update_recipe(
        &state,
        &alice,
        omelette.id,
        recipe("Milk omelette", vec![(milk, 50)], vec![breakfast, dinner]),
    )
    .await?
    .data
    .expect("recipe");
    assert_eq!(updated.name, "Milk omelette");
    assert_eq!(updated.ingredients.len(), 1);
    assert_eq!(updated.ingredients[0].id, milk);
    assert_eq!(updated.ingredients[0].amount, 50);
    assert_eq!(updated.tags.len(), 2);
    assert!(updated.is_in_shopping_cart);

    let rows = recipe_ingredients::Entity::find()
        .filter(recipe_ingredients::Column::RecipeId.eq(omelette.id))
        .count(&state.orm)
        .await?;
    assert_eq!(rows, 1);

    let list = collection_service::shopping_list(&state, &alice).await?;
    assert_eq!(list.render(), "egg (pcs) — 3\nmilk (ml) — 250\n");

    // Deletion
    assert!(matches!(
        recipe_service::delete_recipe(&state, &bob, omelette.id).await,
        Err(AppError::Forbidden)
    ));
    recipe_service::delete_recipe(&state, &alice, omelette.id).await?;
    assert!(matches!(
        recipe_service::get_recipe(&state, None, omelette.id).await,
        Err(AppError::NotFound)
    ));

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url, 5).await?;
    let state = AppState::new(pool, "test-secret");
    run_migrations(&state.orm).await?;

    // Reset tables to keep the flow deterministic.
    state
        .orm
        .execute(Statement::from_string(
            state.orm.get_database_backend(),
            "TRUNCATE TABLE shopping_cart, favorites, subscriptions, recipe_tags, \
             recipe_ingredients, recipes, ingredients, tags, users RESTART IDENTITY CASCADE"
                .to_string(),
        ))
        .await?;

    Ok(state)
}

fn registration(username: &str, email: &str) -> RegisterRequest {
    RegisterRequest {
        email: email.into(),
        username: username.into(),
        first_name: username.into(),
        last_name: "Tester".into(),
        password: "password123".into(),
    }
}

async fn register(state: &AppState, username: &str, email: &str) -> anyhow::Result<AuthUser> {
    let user = auth_service::register_user(state, registration(username, email))
        .await?
        .data
        .expect("registered user");
    Ok(AuthUser { user_id: user.id })
}

async fn create_tag(state: &AppState, name: &str, color: &str, slug: &str) -> anyhow::Result<Uuid> {
    let tag = TagActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.into()),
        color: Set(color.into()),
        slug: Set(slug.into()),
    }
    .insert(&state.orm)
    .await?;
    Ok(tag.id)
}

async fn create_ingredient(state: &AppState, name: &str, unit: &str) -> anyhow::Result<Uuid> {
    let ingredient = IngredientActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.into()),
        measurement_unit: Set(unit.into()),
    }
    .insert(&state.orm)
    .await?;
    Ok(ingredient.id)
}

fn recipe(name: &str, ingredients: Vec<(Uuid, i32)>, tags: Vec<Uuid>) -> RecipeWriteRequest {
    RecipeWriteRequest {
        ingredients: ingredients
            .into_iter()
            .map(|(id, amount)| IngredientAmount { id, amount })
            .collect(),
        tags,
        image: "data:image/png;base64,iVBORw0KGgo=".into(),
        name: name.into(),
        text: format!("How to make {name}."),
        cooking_time: 15,
    }
}

async fn list_ids(
    state: &AppState,
    viewer: Option<Uuid>,
    pairs: &[(&str, &str)],
) -> anyhow::Result<HashSet<Uuid>> {
    let query = RecipeQuery::from_pairs(pairs.iter().copied())?;
    let recipes = recipe_service::list_recipes(state, viewer, query)
        .await?
        .data
        .expect("recipes");
    Ok(recipes.items.into_iter().map(|r| r.id).collect())
}

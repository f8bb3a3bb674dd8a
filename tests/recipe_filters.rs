use recipe_share_api::{
    entity::Recipes,
    error::AppError,
    filters::{RecipeQuery, parse_flag, recipe_condition},
    routes::params::Pagination,
    services::reference_service::prefix_pattern,
};
use sea_orm::{
    EntityTrait, QueryFilter, QueryTrait,
    sea_query::{PostgresQueryBuilder, QueryStatementWriter},
};
use uuid::Uuid;

fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn recipe_sql(query: &RecipeQuery, viewer: Option<Uuid>) -> String {
    Recipes::find()
        .filter(recipe_condition(query, viewer))
        .into_query()
        .to_string(PostgresQueryBuilder)
}

/// No subquery and no author predicate; an empty condition renders as `WHERE TRUE`.
fn assert_unrestricted(sql: &str) {
    assert!(!sql.contains("IN (SELECT"), "{sql}");
    assert!(!sql.contains(r#""author_id" ="#), "{sql}");
}

#[test]
fn repeated_and_comma_separated_tags_are_collected() {
    let query = RecipeQuery::from_pairs(pairs(&[
        ("tags", "breakfast"),
        ("tags", "lunch,dinner"),
        ("tags", "breakfast"),
    ]))
    .unwrap();
    assert_eq!(query.tags, vec!["breakfast", "lunch", "dinner"]);
}

#[test]
fn parses_author_flags_and_pagination() {
    let author = Uuid::new_v4();
    let query = RecipeQuery::from_pairs(pairs(&[
        ("author", &author.to_string()),
        ("is_favorited", "1"),
        ("is_in_shopping_cart", "False"),
        ("page", "3"),
        ("limit", "12"),
        ("unrelated", "ignored"),
    ]))
    .unwrap();
    assert_eq!(query.author, Some(author));
    assert!(query.is_favorited);
    assert!(!query.is_in_shopping_cart);
    assert_eq!(query.pagination.normalize(), (3, 12, 24));
}

#[test]
fn malformed_values_are_bad_requests() {
    for bad in [
        pairs(&[("author", "not-a-uuid")]),
        pairs(&[("is_favorited", "maybe")]),
        pairs(&[("page", "two")]),
    ] {
        assert!(matches!(
            RecipeQuery::from_pairs(bad),
            Err(AppError::BadRequest(_))
        ));
    }
}

#[test]
fn flags_accept_numeric_and_word_forms() {
    assert!(parse_flag("is_favorited", "true").unwrap());
    assert!(parse_flag("is_favorited", "TRUE").unwrap());
    assert!(parse_flag("is_favorited", "1").unwrap());
    assert!(!parse_flag("is_favorited", "0").unwrap());
    assert!(!parse_flag("is_favorited", "false").unwrap());
}

#[test]
fn pagination_is_clamped() {
    let pagination = Pagination {
        page: Some(0),
        limit: Some(1_000),
    };
    assert_eq!(pagination.normalize(), (1, 100, 0));
    assert_eq!(Pagination::default().normalize(), (1, 6, 0));
}

#[test]
fn no_filters_leaves_the_condition_empty() {
    let viewer = Some(Uuid::new_v4());
    assert!(recipe_condition(&RecipeQuery::default(), viewer).is_empty());
    assert_unrestricted(&recipe_sql(&RecipeQuery::default(), viewer));
}

#[test]
fn tag_filter_matches_any_slug_through_the_join_table() {
    let query = RecipeQuery {
        tags: vec!["breakfast".into(), "lunch".into()],
        ..Default::default()
    };
    let sql = recipe_sql(&query, None);
    assert!(sql.contains(r#""recipes"."id" IN (SELECT"#), "{sql}");
    assert!(sql.contains(r#"FROM "recipe_tags""#), "{sql}");
    assert!(sql.contains(r#"INNER JOIN "tags""#), "{sql}");
    assert!(sql.contains("'breakfast'") && sql.contains("'lunch'"), "{sql}");
}

#[test]
fn author_filter_is_exact() {
    let author = Uuid::new_v4();
    let query = RecipeQuery {
        author: Some(author),
        ..Default::default()
    };
    let sql = recipe_sql(&query, None);
    assert!(sql.contains(r#""recipes"."author_id" = "#), "{sql}");
    assert!(sql.contains(&author.to_string()), "{sql}");
}

#[test]
fn collection_flags_restrict_to_the_viewer() {
    let viewer = Uuid::new_v4();
    let query = RecipeQuery {
        is_favorited: true,
        is_in_shopping_cart: true,
        ..Default::default()
    };
    let sql = recipe_sql(&query, Some(viewer));
    assert!(sql.contains(r#"FROM "favorites""#), "{sql}");
    assert!(sql.contains(r#"FROM "shopping_cart""#), "{sql}");
    assert!(sql.contains(&viewer.to_string()), "{sql}");
}

#[test]
fn collection_flags_are_ignored_for_anonymous_callers() {
    let query = RecipeQuery {
        is_favorited: true,
        is_in_shopping_cart: true,
        ..Default::default()
    };
    let sql = recipe_sql(&query, None);
    assert!(!sql.contains("favorites"), "{sql}");
    assert!(!sql.contains("shopping_cart"), "{sql}");
}

#[test]
fn false_flags_do_not_restrict() {
    let query = RecipeQuery {
        is_favorited: false,
        is_in_shopping_cart: false,
        ..Default::default()
    };
    let viewer = Some(Uuid::new_v4());
    assert!(recipe_condition(&query, viewer).is_empty());
    assert_unrestricted(&recipe_sql(&query, viewer));
}

#[test]
fn ingredient_prefix_escapes_like_wildcards() {
    assert_eq!(prefix_pattern("egg"), "egg%");
    assert_eq!(prefix_pattern("50%_off"), "50\\%\\_off%");
}

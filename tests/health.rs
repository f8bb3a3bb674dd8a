use recipe_share_api::{
    db::create_pool,
    routes::health::{HealthData, health_check},
    state::AppState,
};

#[test]
fn failed_probe_reports_degraded() {
    let data = HealthData::from_probe(Err(sqlx::Error::PoolTimedOut));
    assert!(!data.is_ok());
    assert_eq!(data.database, "down");
}

#[test]
fn successful_probe_reports_ok() {
    let data = HealthData::from_probe(Ok(()));
    assert!(data.is_ok());
    assert_eq!(data.database, "up");
}

#[tokio::test]
async fn health_check_reaches_the_database() -> anyhow::Result<()> {
    let Ok(database_url) =
        std::env::var("TEST_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL"))
    else {
        eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to probe the database.");
        return Ok(());
    };

    let state = AppState::new(create_pool(&database_url, 1).await?, "test-secret");
    let (status, response) = health_check(axum::extract::State(state)).await;
    assert_eq!(status, axum::http::StatusCode::OK);
    assert_eq!(response.0.message, "Health check");
    assert!(response.0.data.expect("health data").is_ok());
    Ok(())
}

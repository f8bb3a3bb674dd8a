//! Seeds the ingredient reference table from a `name,unit` CSV file.
//!
//! Usage: `import_ingredients [path]` (default `data/ingredients.csv`).

use anyhow::Context;
use recipe_share_api::{
    config::AppConfig,
    db::{create_pool, orm_from_pool, run_migrations},
    ingredient_csv::read_ingredients,
};
use uuid::Uuid;

const DEFAULT_PATH: &str = "data/ingredients.csv";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    let path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_PATH.to_string());

    let contents = tokio::fs::read(&path).await?;
    let records =
        read_ingredients(contents.as_slice()).with_context(|| format!("reading {path}"))?;

    let pool = create_pool(&config.database_url, 1).await?;
    run_migrations(&orm_from_pool(pool.clone())).await?;

    let mut imported = 0_u64;
    for record in &records {
        let result = sqlx::query(
            r#"
            INSERT INTO ingredients (id, name, measurement_unit)
            VALUES ($1, $2, $3)
            ON CONFLICT (name, measurement_unit) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&record.name)
        .bind(&record.measurement_unit)
        .execute(&pool)
        .await?;
        imported += result.rows_affected();
    }

    if imported > 0 {
        println!("Imported {imported} of {} ingredients from {path}", records.len());
    } else {
        println!("All ingredients from {path} already exist");
    }
    Ok(())
}

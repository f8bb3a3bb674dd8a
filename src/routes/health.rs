use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    db::DbPool,
    response::{ApiResponse, Meta},
    state::AppState,
};

#[derive(Debug, Serialize, ToSchema, PartialEq, Eq)]
pub struct HealthData {
    pub status: String,
    pub database: String,
}

impl HealthData {
    pub fn from_probe(probe: Result<(), sqlx::Error>) -> Self {
        match probe {
            Ok(()) => Self {
                status: "ok".to_string(),
                database: "up".to_string(),
            },
            Err(err) => {
                tracing::warn!(error = %err, "database probe failed");
                Self {
                    status: "degraded".to_string(),
                    database: "down".to_string(),
                }
            }
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

async fn probe_database(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await.map(|_| ())
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service and database are up", body = ApiResponse<HealthData>),
        (status = 503, description = "Database unreachable", body = ApiResponse<HealthData>),
    ),
    tag = "Health"
)]
pub async fn health_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<HealthData>>) {
    let data = HealthData::from_probe(probe_database(&state.pool).await);
    let status = if data.is_ok() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (
        status,
        Json(ApiResponse::success("Health check", data, Some(Meta::empty()))),
    )
}

use crate::adapters::api_handler::FormRegistry;
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub forms: usize,
}

pub struct HealthHandler {
    forms: FormRegistry,
    start_time: std::time::Instant,
}

impl HealthHandler {
    pub fn new(forms: FormRegistry) -> Self {
        Self {
            forms,
            start_time: std::time::Instant::now(),
        }
    }

    /// Basic health check - returns 200 if server is running
    pub async fn health(&self) -> impl IntoResponse {
        let status = HealthStatus {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            forms: self.forms.len(),
        };
        (StatusCode::OK, Json(status))
    }

    /// Readiness check - ready once at least one form is registered
    pub async fn ready(&self) -> impl IntoResponse {
        if self.forms.is_empty() {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({
                    "status": "not_ready",
                    "message": "No forms registered"
                })),
            )
        } else {
            (
                StatusCode::OK,
                Json(serde_json::json!({
                    "status": "ready",
                    "message": "Server is ready to accept submissions"
                })),
            )
        }
    }

    /// Liveness check - returns 200 if server is alive
    pub async fn live(&self) -> impl IntoResponse {
        (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "alive",
                "message": "Server is alive"
            })),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::api_handler::demo_registry;
    use std::collections::HashMap;
    use std::sync::Arc;

    #[tokio::test]
    async fn health_reports_registered_forms() {
        let handler = HealthHandler::new(demo_registry());
        let response = handler.health().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn ready_requires_at_least_one_form() {
        let empty = HealthHandler::new(Arc::new(HashMap::new()));
        let response = empty.ready().await.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let populated = HealthHandler::new(demo_registry());
        let response = populated.ready().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn live_always_succeeds() {
        let handler = HealthHandler::new(Arc::new(HashMap::new()));
        let response = handler.live().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

//! Webhook HTTP surface
//!
//! Exposes the solver operations as JSON endpoints so the orchestrator can
//! drive them over HTTP.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::{error, info};

use crate::challenge::ChallengeRequest;
use crate::error::DnsMadeEasyError;
use crate::solver::ChallengeSolver;

#[derive(Clone)]
pub struct AppState {
    pub solver: Arc<dyn ChallengeSolver>,
    pub group_name: String,
}

/// Build the webhook router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/name", get(name))
        .route("/present", post(present))
        .route("/cleanup", post(cleanup))
        .with_state(state)
}

async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

async fn name(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({ "name": state.solver.name(), "groupName": state.group_name }))
}

async fn present(
    State(state): State<AppState>,
    Json(challenge): Json<ChallengeRequest>,
) -> impl IntoResponse {
    info!(uid = %challenge.uid, fqdn = %challenge.resolved_fqdn, "Received present request");
    respond(state.solver.present(&challenge).await)
}

async fn cleanup(
    State(state): State<AppState>,
    Json(challenge): Json<ChallengeRequest>,
) -> impl IntoResponse {
    info!(uid = %challenge.uid, fqdn = %challenge.resolved_fqdn, "Received cleanup request");
    respond(state.solver.clean_up(&challenge).await)
}

fn respond(result: crate::Result<()>) -> (StatusCode, Json<serde_json::Value>) {
    match result {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ok" }))),
        Err(e) => {
            error!(error = %e, "Challenge operation failed");
            (status_for(&e), Json(json!({ "error": e.to_string() })))
        }
    }
}

fn status_for(err: &DnsMadeEasyError) -> StatusCode {
    if err.is_configuration() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// Serve the router on `listen` until the process is stopped
pub async fn serve(state: AppState, listen: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(listen).await?;
    info!("dnsmadeeasy-webhook listening on {listen}");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use std::sync::Mutex;
    use tower::ServiceExt;

    #[derive(Default)]
    struct RecordingSolver {
        calls: Mutex<Vec<String>>,
        fail_with_config_error: bool,
    }

    #[async_trait]
    impl ChallengeSolver for RecordingSolver {
        fn name(&self) -> &'static str {
            "recording"
        }

        async fn present(&self, challenge: &ChallengeRequest) -> crate::Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("present {}", challenge.resolved_fqdn));
            if self.fail_with_config_error {
                return Err(DnsMadeEasyError::NotInitialized);
            }
            Ok(())
        }

        async fn clean_up(&self, challenge: &ChallengeRequest) -> crate::Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("cleanup {}", challenge.resolved_fqdn));
            Err(DnsMadeEasyError::ZonePageCount(2))
        }
    }

    fn challenge_body() -> Body {
        Body::from(
            json!({
                "uid": "1",
                "key": "token",
                "resourceNamespace": "default",
                "resolvedFQDN": "_acme-challenge.example.com.",
                "resolvedZone": "example.com."
            })
            .to_string(),
        )
    }

    fn post(uri: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(challenge_body())
            .unwrap()
    }

    #[tokio::test]
    async fn test_healthz() {
        let state = AppState {
            solver: Arc::new(RecordingSolver::default()),
            group_name: "acme.example.com".into(),
        };
        let response = router(state)
            .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_name_endpoint() {
        let state = AppState {
            solver: Arc::new(RecordingSolver::default()),
            group_name: "acme.example.com".into(),
        };
        let response = router(state)
            .oneshot(Request::builder().uri("/name").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["name"], "recording");
        assert_eq!(value["groupName"], "acme.example.com");
    }

    #[tokio::test]
    async fn test_present_dispatches_to_solver() {
        let solver = Arc::new(RecordingSolver::default());
        let state = AppState {
            solver: solver.clone(),
            group_name: "acme.example.com".into(),
        };

        let response = router(state).oneshot(post("/present")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            *solver.calls.lock().unwrap(),
            vec!["present _acme-challenge.example.com.".to_string()]
        );
    }

    #[tokio::test]
    async fn test_error_status_mapping() {
        let solver = Arc::new(RecordingSolver {
            fail_with_config_error: true,
            ..Default::default()
        });
        let state = AppState {
            solver,
            group_name: "acme.example.com".into(),
        };

        let app = router(state);
        let response = app.clone().oneshot(post("/present")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app.oneshot(post("/cleanup")).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(value["error"].as_str().unwrap().contains("zone pages"));
    }
}

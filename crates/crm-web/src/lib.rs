//! CRM Web Server
//!
//! Axum-based REST API over the CRM graph.

pub mod error;
pub mod routes;
pub mod state;

use std::net::SocketAddr;

use axum::{routing::get, Router};
use crm_core::EntityKind;
use crm_graph::CrmGraph;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let entity_routes = EntityKind::ALL
        .into_iter()
        .fold(Router::new(), |router, kind| router.merge(routes::entities::router(kind)));

    Router::new()
        .route("/", get(routes::health::root))
        .route("/health", get(routes::health::health))
        .merge(entity_routes)
        .merge(routes::links::router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Run the web server until Ctrl+C.
pub async fn run_server(graph: CrmGraph, addr: SocketAddr) -> anyhow::Result<()> {
    let app = create_router(AppState::new(graph));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("CRM API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("CRM API shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use crm_graph::testing::{row, ScriptedSession};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> (Arc<ScriptedSession>, Router) {
        let session = Arc::new(ScriptedSession::new());
        let graph = CrmGraph::new(session.clone());
        (session, create_router(AppState::new(graph)))
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn read_body(resp: axum::http::Response<Body>) -> Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_root_returns_liveness_message() {
        let (_session, app) = app();
        let resp = app.oneshot(Request::get("/").body(Body::empty()).unwrap()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(read_body(resp).await, json!({"message": "CRM API is running"}));
    }

    #[tokio::test]
    async fn test_health_reports_unavailable_on_storage_error() {
        let (session, app) = app();
        session.push_error("connection refused");
        let resp = app.oneshot(Request::get("/health").body(Body::empty()).unwrap()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_create_user_then_shape_matches() {
        let (session, app) = app();
        session.push_rows(vec![row([
            ("id", json!("u1")),
            ("name", json!("Ann")),
            ("role", json!("rep")),
            ("region", json!(null)),
            ("email", json!(null)),
        ])]);

        let resp = app
            .oneshot(json_request("POST", "/users/", json!({"id": "u1", "name": "Ann", "role": "rep"})))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            read_body(resp).await,
            json!({"id": "u1", "name": "Ann", "role": "rep", "region": null, "email": null})
        );
        assert!(session.statements()[0].text.contains("MERGE (n:`User` {id: $id})"));
    }

    #[tokio::test]
    async fn test_create_without_trailing_slash() {
        let (session, app) = app();
        session.push_rows(vec![row([("id", json!("a1")), ("name", json!("Acme"))])]);
        let resp = app
            .oneshot(json_request("POST", "/accounts", json!({"id": "a1", "name": "Acme"})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_create_lead_with_unknown_account_returns_null_slot() {
        let (session, app) = app();
        session.push_rows(vec![row([
            ("id", json!("l1")),
            ("name", json!("Bob")),
            ("status", json!("New")),
            ("account_id", json!(null)),
            ("assigned_to", json!(null)),
        ])]);

        let resp = app
            .oneshot(json_request("POST", "/leads/", json!({"id": "l1", "name": "Bob", "account_id": "nope"})))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = read_body(resp).await;
        assert_eq!(body["account_id"], Value::Null);
        assert_eq!(body["status"], json!("New"));
    }

    #[tokio::test]
    async fn test_create_opportunity_with_missing_lead_is_404() {
        let (_session, app) = app();
        let resp = app
            .oneshot(json_request(
                "POST",
                "/opportunities/",
                json!({"id": "o1", "name": "Renewal", "lead_id": "ghost"}),
            ))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(read_body(resp).await, json!({"detail": "Lead not found for this Opportunity"}));
    }

    #[tokio::test]
    async fn test_create_with_invalid_payload_is_400_without_storage() {
        let (session, app) = app();
        let resp = app
            .oneshot(json_request("POST", "/users/", json!({"id": "u1", "name": "Ann"})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(session.statements().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_json_is_400() {
        let (_session, app) = app();
        let req = Request::builder()
            .method("POST")
            .uri("/users/")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_empty_patch_is_400_and_touches_nothing() {
        let (session, app) = app();
        let resp = app.oneshot(json_request("PATCH", "/leads/l1", json!({}))).await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(read_body(resp).await, json!({"detail": "No fields to update"}));
        assert!(session.statements().is_empty());
    }

    #[tokio::test]
    async fn test_patch_sets_only_supplied_fields() {
        let (session, app) = app();
        session.push_rows(vec![row([
            ("id", json!("l1")),
            ("name", json!("Bob")),
            ("email", json!("bob@example.com")),
            ("status", json!("Qualified")),
            ("score", json!(40.0)),
        ])]);

        let resp = app
            .oneshot(json_request("PATCH", "/leads/l1", json!({"status": "Qualified"})))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = read_body(resp).await;
        assert_eq!(body["score"], json!(40.0));

        let stmt = &session.statements()[0];
        assert!(stmt.text.contains("SET n.`status` = $p_status\n"));
    }

    #[tokio::test]
    async fn test_patch_missing_entity_is_404() {
        let (_session, app) = app();
        let resp = app
            .oneshot(json_request("PATCH", "/deals/d404", json!({"amount": 10})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_patch_unknown_field_is_400() {
        let (session, app) = app();
        let resp = app
            .oneshot(json_request("PATCH", "/users/u1", json!({"password": "x"})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(session.statements().is_empty());
    }

    #[tokio::test]
    async fn test_get_missing_is_404() {
        let (_session, app) = app();
        let resp = app.oneshot(Request::get("/users/u404").body(Body::empty()).unwrap()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(read_body(resp).await, json!({"detail": "User not found"}));
    }

    #[tokio::test]
    async fn test_list_empty_returns_empty_array() {
        let (_session, app) = app();
        let resp = app.oneshot(Request::get("/activities/").body(Body::empty()).unwrap()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(read_body(resp).await, json!([]));
    }

    #[tokio::test]
    async fn test_search_is_wired_to_its_own_label() {
        let (session, app) = app();
        let resp = app
            .oneshot(Request::get("/opportunities/search_name?name=renew").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(session.statements()[0].text.starts_with("MATCH (n:`Opportunity`)"));
    }

    #[tokio::test]
    async fn test_search_without_name_is_400() {
        let (_session, app) = app();
        let resp = app
            .oneshot(Request::get("/deals/search_name").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_link_lead_to_account() {
        let (session, app) = app();
        session.push_rows(vec![row([("source_id", json!("l1")), ("target_id", json!("a1"))])]);
        let resp = app
            .oneshot(Request::post("/accounts/a1/link-lead/l1").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(read_body(resp).await["message"], json!("Lead l1 linked to Account a1"));
    }

    #[tokio::test]
    async fn test_link_missing_endpoint_is_404() {
        let (_session, app) = app();
        let resp = app
            .oneshot(Request::post("/opportunities/o1/link-account/a404").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(read_body(resp).await, json!({"detail": "Opportunity or Account not found"}));
    }

    #[tokio::test]
    async fn test_storage_failure_is_generic_500() {
        let (session, app) = app();
        session.push_error("MATCH (n:`User`) exploded");
        let resp = app.oneshot(Request::get("/users/").body(Body::empty()).unwrap()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(read_body(resp).await, json!({"detail": "Internal storage error"}));
    }
}

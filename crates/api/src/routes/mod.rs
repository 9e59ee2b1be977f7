//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                                          - Liveness
//! GET  /health/ready                                    - Readiness (store ping)
//!
//! # Per resource: usuarios, enderecos, dispositivos, comodos, consumos, pontos
//! GET    /ecosave/{resource}                            - List
//! GET    /ecosave/{resource}/{id}                       - Fetch one
//! POST   /ecosave/{resource}                            - Create (201 + Location)
//! PUT    /ecosave/{resource}/{id}                       - Replace (204)
//! DELETE /ecosave/{resource}/{id}                       - Delete (204)
//!
//! # Users only
//! GET    /ecosave/usuarios/{id}/calcular-media-avaliacao - Spend evaluation
//! ```
//!
//! Users are listed and fetched as aggregates (devices, addresses, points);
//! every other resource is served by the generic handlers in [`crud`].

pub mod crud;
pub mod extract;
pub mod health;
pub mod resource;
pub mod users;

use axum::Router;
use axum::routing::get;

use crate::models::{Address, ConsumptionRecord, Device, LoyaltyPoint, Room};
use crate::state::AppState;

pub use resource::Resource;

/// All `/ecosave` resource routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(users::router())
        .merge(crud::router::<Address>())
        .merge(crud::router::<Device>())
        .merge(crud::router::<Room>())
        .merge(crud::router::<ConsumptionRecord>())
        .merge(crud::router::<LoyaltyPoint>())
}

/// The complete application: health checks plus resource routes, with state.
///
/// Tracing and Sentry layers are added by the binary.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(routes())
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use secrecy::SecretString;
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use url::Url;

    use super::*;
    use crate::config::{EcosaveConfig, OpenAiConfig, StorageConfig};
    use crate::db::{Database, MemoryStore};

    fn test_app() -> Router {
        let config = EcosaveConfig {
            storage: StorageConfig::Memory,
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            json_logs: false,
            openai: OpenAiConfig {
                api_key: SecretString::from("sk-test"),
                model: "gpt-4".to_string(),
                api_url: Url::parse("http://127.0.0.1:1/v1/chat/completions").unwrap(),
            },
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
        };
        let state = AppState::new(&config, Database::Memory(MemoryStore::new())).unwrap();
        app(state)
    }

    fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = test_app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = test_app()
            .oneshot(Request::get("/health/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_create_room_sets_location() {
        let response = test_app()
            .oneshot(json_request("POST", "/ecosave/comodos", &json!({"nome": "Cozinha"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/ecosave/comodos/1"
        );
        assert_eq!(body_json(response).await, json!({"id": 1, "nome": "Cozinha"}));
    }

    #[tokio::test]
    async fn test_missing_user_is_json_404() {
        let response = test_app()
            .oneshot(Request::get("/ecosave/usuarios/9").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            json!({"mensagem": "Usuário não encontrado."})
        );
    }

    #[tokio::test]
    async fn test_non_numeric_id_is_400() {
        let response = test_app()
            .oneshot(Request::get("/ecosave/dispositivos/abc").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await.get("mensagem").is_some());
    }

    #[tokio::test]
    async fn test_put_id_mismatch_is_400() {
        let response = test_app()
            .oneshot(json_request(
                "PUT",
                "/ecosave/usuarios/1",
                &json!({"id": 2, "nome": "Ana", "cpf": "1", "email": "a@b.c", "telefone": "2"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({"mensagem": "O ID informado não corresponde ao usuário."})
        );
    }

    #[tokio::test]
    async fn test_malformed_body_is_400() {
        let request = Request::builder()
            .method("POST")
            .uri("/ecosave/pontos")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"idUsuario\": "))
            .unwrap();

        let response = test_app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

//! Integration tests for Ecosave.
//!
//! # Running Tests
//!
//! ```bash
//! # In-process tests (memory backend, mocked tip endpoint)
//! cargo test -p ecosave-integration-tests
//!
//! # PostgreSQL-backed tests
//! ECOSAVE_TEST_DATABASE_URL=postgres://... cargo test -p ecosave-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `crud_resources` - HTTP contract of the six resources
//! - `spend_evaluation` - evaluation endpoint end to end
//! - `tip_client` - chat-completion client against a mock endpoint
//! - `postgres_repository` - generic repository against a real database

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use ecosave_api::config::{EcosaveConfig, OpenAiConfig, StorageConfig};
use ecosave_api::db::{Database, MemoryStore};
use ecosave_api::routes;
use ecosave_api::state::AppState;
use reqwest::Client;
use secrecy::SecretString;
use serde_json::{Value, json};
use url::Url;

/// Tip returned by [`MockTipEndpoint::tip`].
pub const MOCK_TIP: &str = "Reduza o uso de energia.";

/// Bearer key the test configuration sends.
pub const TEST_API_KEY: &str = "sk-test-9fQ2xL7mZp3R";

/// What the mock chat-completion endpoint answers.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// 200 with a well-formed completion carrying this content.
    Tip(String),
    /// Bare status code with an empty body.
    Status(u16),
    /// 200 with this raw body.
    Raw(String),
}

#[derive(Clone)]
struct MockState {
    reply: MockReply,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// A request the mock endpoint received.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub authorization: Option<String>,
    pub body: Value,
}

/// Local stand-in for the chat-completions API.
pub struct MockTipEndpoint {
    pub url: Url,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockTipEndpoint {
    /// Endpoint answering every request with [`MOCK_TIP`].
    pub async fn tip() -> Self {
        Self::start(MockReply::Tip(MOCK_TIP.to_string())).await
    }

    pub async fn start(reply: MockReply) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            reply,
            requests: Arc::clone(&requests),
        };
        let app = Router::new()
            .route("/v1/chat/completions", post(mock_completion))
            .with_state(state);
        let addr = serve(app).await;

        Self {
            url: Url::parse(&format!("http://{addr}/v1/chat/completions")).unwrap(),
            requests,
        }
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn mock_completion(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.requests.lock().unwrap().push(RecordedRequest {
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });

    match state.reply {
        MockReply::Tip(content) => Json(json!({
            "id": "chatcmpl-test",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }]
        }))
        .into_response(),
        MockReply::Status(code) => StatusCode::from_u16(code).unwrap().into_response(),
        MockReply::Raw(body) => body.into_response(),
    }
}

/// Serve `app` on an ephemeral local port.
async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Configuration for an in-memory API that asks `tip_url` for tips.
pub fn test_config(tip_url: Url) -> EcosaveConfig {
    EcosaveConfig {
        storage: StorageConfig::Memory,
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        json_logs: false,
        openai: OpenAiConfig {
            api_key: SecretString::from(TEST_API_KEY),
            model: "gpt-4".to_string(),
            api_url: tip_url,
        },
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 1.0,
    }
}

/// The API served on an ephemeral port with the memory backend.
pub struct TestServer {
    pub base_url: String,
    pub client: Client,
}

impl TestServer {
    pub async fn start(tip_url: Url) -> Self {
        let config = test_config(tip_url);
        let db = Database::Memory(MemoryStore::new());
        let state = AppState::new(&config, db).unwrap();
        let addr = serve(routes::app(state)).await;

        Self {
            base_url: format!("http://{addr}"),
            client: Client::new(),
        }
    }

    /// Absolute URL for a path such as `/ecosave/usuarios`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// POST a resource and return the created JSON. Panics unless 201.
    pub async fn create(&self, resource: &str, body: &Value) -> Value {
        let response = self
            .client
            .post(self.url(&format!("/ecosave/{resource}")))
            .json(body)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::CREATED, "POST {resource}");
        response.json().await.unwrap()
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }

    /// Create a user with an address, a room, and one device per cost, each
    /// with a single consumption reading of that cost. Returns the user id.
    pub async fn seed_user_with_costs(&self, costs: &[f64]) -> i64 {
        let user = self.create("usuarios", &sample_user("Ana")).await;
        let user_id = user["id"].as_i64().unwrap();
        let room = self.create("comodos", &json!({"nome": "Sala"})).await;

        for (i, cost) in costs.iter().enumerate() {
            let device = self
                .create(
                    "dispositivos",
                    &json!({
                        "idUsuario": user_id,
                        "idComodo": room["id"],
                        "nome": format!("Aparelho {i}"),
                        "modelo": "X1"
                    }),
                )
                .await;
            self.create(
                "consumos",
                &json!({"idDispositivo": device["id"], "consumoKWh": 250.5, "custo": cost}),
            )
            .await;
        }
        user_id
    }
}

/// Valid user payload.
pub fn sample_user(name: &str) -> Value {
    json!({
        "nome": name,
        "cpf": "123.456.789-00",
        "email": format!("{}@ecosave.test", name.to_lowercase()),
        "telefone": "11 99999-0000"
    })
}

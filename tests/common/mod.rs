use axum::{
    body::Bytes,
    extract::{RawQuery, State},
    http::StatusCode,
    response::IntoResponse,
    Router,
};
use food_image_analyzer::config::Config;
use food_image_analyzer::handlers::AnalysisHandler;
use food_image_analyzer::server::create_router;
use food_image_analyzer::services::{AIService, GeminiService};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Stand-in for the Gemini API: answers every request with a canned reply.
pub struct FakeGemini {
    pub status: StatusCode,
    pub body: String,
    pub hits: AtomicUsize,
    pub last_request: Mutex<Option<serde_json::Value>>,
    pub last_query: Mutex<Option<String>>,
    pub last_path: Mutex<Option<String>>,
    pub last_content_type: Mutex<Option<String>>,
}

impl FakeGemini {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

async fn fake_generate_content(
    State(fake): State<Arc<FakeGemini>>,
    uri: axum::http::Uri,
    headers: axum::http::HeaderMap,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> impl IntoResponse {
    fake.hits.fetch_add(1, Ordering::SeqCst);
    *fake.last_request.lock().unwrap() = serde_json::from_slice(&body).ok();
    *fake.last_query.lock().unwrap() = query;
    *fake.last_path.lock().unwrap() = Some(uri.path().to_string());
    *fake.last_content_type.lock().unwrap() = headers
        .get("content-type")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    (
        fake.status,
        [("content-type", "application/json")],
        fake.body.clone(),
    )
}

/// Wraps `text` the way Gemini returns a successful generation.
pub fn gemini_text_reply(text: &str) -> String {
    serde_json::json!({
        "candidates": [{
            "content": { "parts": [{ "text": text }], "role": "model" },
            "finishReason": "STOP"
        }]
    })
    .to_string()
}

pub async fn spawn_fake_gemini(status: StatusCode, body: String) -> (Arc<FakeGemini>, String) {
    let fake = Arc::new(FakeGemini {
        status,
        body,
        hits: AtomicUsize::new(0),
        last_request: Mutex::new(None),
        last_query: Mutex::new(None),
        last_path: Mutex::new(None),
        last_content_type: Mutex::new(None),
    });

    let router = Router::new()
        .fallback(fake_generate_content)
        .with_state(fake.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fake Gemini");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (fake, format!("http://{}/v1beta", addr))
}

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn(gemini_base_url: &str) -> Self {
        let base_url = gemini_base_url.to_string();
        let config = Config::from_lookup(move |key| match key {
            "GEMINI_API_KEY" => Some("test-api-key".to_string()),
            "GEMINI_MODEL" => Some("test-model".to_string()),
            "GEMINI_API_BASE_URL" => Some(base_url.clone()),
            _ => None,
        })
        .expect("Failed to build test configuration");

        let ai = Arc::new(GeminiService::new(&config)) as Arc<dyn AIService>;
        let app = create_router(Arc::new(AnalysisHandler::new(ai)), &config);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test app");
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            address: format!("http://{}", addr),
            client: reqwest::Client::new(),
        }
    }

    pub async fn post_image(&self, bytes: Vec<u8>, mime: &str) -> reqwest::Response {
        let form = reqwest::multipart::Form::new().part(
            "foodImage",
            reqwest::multipart::Part::bytes(bytes)
                .file_name("plate.jpg")
                .mime_str(mime)
                .unwrap(),
        );

        self.client
            .post(format!("{}/analyze-food", self.address))
            .multipart(form)
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

/// An address nothing is listening on.
pub async fn closed_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/v1beta", addr)
}

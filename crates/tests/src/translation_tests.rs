use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::{routing::post, Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use lingoroom_captions::translate::{
    HttpTranslator, TranslationEndpoint, TranslationRequest, Translator,
};

struct MockEndpoint {
    url: String,
    hits: Arc<AtomicUsize>,
}

impl MockEndpoint {
    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock endpoint");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Endpoint answering every request with a fixed status and body after
/// `delay`.
async fn spawn_fixed_endpoint(status: u16, response: Value, delay: Duration) -> MockEndpoint {
    let hits = Arc::new(AtomicUsize::new(0));
    let handler_hits = Arc::clone(&hits);
    let app = Router::new().route(
        "/",
        post(move |Json(_body): Json<Value>| {
            let response = response.clone();
            let hits = Arc::clone(&handler_hits);
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(delay).await;
                (
                    StatusCode::from_u16(status).unwrap(),
                    Json(response),
                )
            }
        }),
    );

    MockEndpoint {
        url: serve(app).await,
        hits,
    }
}

/// Endpoint echoing the request text back untranslated.
async fn spawn_echo_endpoint() -> MockEndpoint {
    let hits = Arc::new(AtomicUsize::new(0));
    let handler_hits = Arc::clone(&hits);
    let app = Router::new().route(
        "/",
        post(move |Json(body): Json<Value>| {
            let hits = Arc::clone(&handler_hits);
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                Json(json!({ "translated_text": body["text"] }))
            }
        }),
    );

    MockEndpoint {
        url: serve(app).await,
        hits,
    }
}

fn translator(endpoints: Vec<TranslationEndpoint>, timeout: Duration) -> HttpTranslator {
    HttpTranslator::new(endpoints, timeout, 2000, None)
}

fn request(text: &str) -> TranslationRequest {
    TranslationRequest {
        text: text.to_string(),
        source_lang: "auto".to_string(),
        target_lang: "en".to_string(),
        model: None,
    }
}

#[tokio::test]
async fn primary_endpoint_serves_the_translation() {
    let primary = spawn_fixed_endpoint(
        200,
        json!({ "translated_text": "hello", "detected_source_language": "fr" }),
        Duration::ZERO,
    )
    .await;

    let translator = translator(
        vec![TranslationEndpoint::new(&primary.url, None)],
        Duration::from_secs(1),
    );
    let result = translator.translate(request("bonjour")).await;

    assert_eq!(result.text, "hello");
    assert_eq!(result.detected_source_lang, "fr");
    assert!(!result.degraded);
    assert_eq!(primary.hits(), 1);
}

#[tokio::test]
async fn camel_case_response_field_is_accepted() {
    let primary =
        spawn_fixed_endpoint(200, json!({ "translatedText": "hallo" }), Duration::ZERO).await;

    let translator = translator(
        vec![TranslationEndpoint::new(&primary.url, None)],
        Duration::from_secs(1),
    );
    let result = translator.translate(request("hello")).await;

    assert_eq!(result.text, "hallo");
    assert!(!result.degraded);
}

#[tokio::test]
async fn same_language_roundtrip_never_reaches_the_fallback_tier() {
    let primary = spawn_echo_endpoint().await;
    let fallback =
        spawn_fixed_endpoint(200, json!({ "translated_text": "unused" }), Duration::ZERO).await;

    let translator = translator(
        vec![
            TranslationEndpoint::new(&primary.url, None),
            TranslationEndpoint::new(&fallback.url, None),
        ],
        Duration::from_secs(1),
    );
    let result = translator.translate(request("hello")).await;

    assert_eq!(result.text, "hello");
    assert!(!result.degraded);
    assert_eq!(primary.hits(), 1);
    assert_eq!(fallback.hits(), 0);
}

#[tokio::test]
async fn timed_out_primary_falls_back_in_order() {
    let primary = spawn_fixed_endpoint(
        200,
        json!({ "translated_text": "too late" }),
        Duration::from_millis(500),
    )
    .await;
    let fallback =
        spawn_fixed_endpoint(200, json!({ "translated_text": "hello" }), Duration::ZERO).await;

    let translator = translator(
        vec![
            TranslationEndpoint::new(&primary.url, None),
            TranslationEndpoint::new(&fallback.url, None),
        ],
        Duration::from_millis(100),
    );
    let result = translator.translate(request("bonjour")).await;

    assert_eq!(result.text, "hello");
    assert!(!result.degraded);
    assert_eq!(primary.hits(), 1);
    assert_eq!(fallback.hits(), 1);
}

#[tokio::test]
async fn all_endpoints_failing_degrades_to_source_text() {
    let primary = spawn_fixed_endpoint(500, json!({}), Duration::ZERO).await;
    let fallback = spawn_fixed_endpoint(502, json!({}), Duration::ZERO).await;

    let translator = translator(
        vec![
            TranslationEndpoint::new(&primary.url, None),
            TranslationEndpoint::new(&fallback.url, None),
        ],
        Duration::from_secs(1),
    );
    let result = translator.translate(request("bonjour")).await;

    assert_eq!(result.text, "bonjour");
    assert!(result.degraded);
    assert!(result.raw.get("error").is_some());
    assert_eq!(primary.hits(), 1);
    assert_eq!(fallback.hits(), 1);
}

#[tokio::test]
async fn response_without_any_text_field_counts_as_failure() {
    let primary = spawn_fixed_endpoint(200, json!({ "ok": true }), Duration::ZERO).await;

    let translator = translator(
        vec![TranslationEndpoint::new(&primary.url, None)],
        Duration::from_secs(1),
    );
    let result = translator.translate(request("bonjour")).await;

    assert_eq!(result.text, "bonjour");
    assert!(result.degraded);
}

#[tokio::test]
async fn api_key_is_sent_as_bearer_authorization() {
    let hits = Arc::new(AtomicUsize::new(0));
    let handler_hits = Arc::clone(&hits);
    let app = Router::new().route(
        "/",
        post(
            move |headers: axum::http::HeaderMap, Json(_body): Json<Value>| {
                let hits = Arc::clone(&handler_hits);
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    let auth = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    Json(json!({ "translated_text": auth }))
                }
            },
        ),
    );
    let url = serve(app).await;

    let translator = translator(
        vec![TranslationEndpoint::new(&url, Some("shhh".to_string()))],
        Duration::from_secs(1),
    );
    let result = translator.translate(request("hello")).await;

    assert_eq!(result.text, "Bearer shhh");
}

//! End-to-end tests for the site's pages, forms, and analytics
//! instrumentation, driven through the router with a recording
//! analytics sink in place of the Segment client.

#![allow(clippy::unwrap_used)]

use std::path::Path;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use secrecy::SecretString;
use serde_json::{Value, json};
use tower::ServiceExt;

use topspin_site::analytics::{AnalyticsSink, EventContext};
use topspin_site::config::{SegmentConfig, SiteConfig};
use topspin_site::content::ArticleStore;
use topspin_site::state::AppState;

// ============================================================================
// Test Harness
// ============================================================================

/// One recorded analytics call.
#[derive(Debug, Clone)]
enum Call {
    Page {
        name: String,
        user_id: Option<String>,
    },
    Identify {
        user_id: Option<String>,
        traits: Value,
    },
    Track {
        event: String,
        user_id: Option<String>,
        properties: Value,
    },
}

/// Records calls instead of delivering them.
#[derive(Default, Clone)]
struct RecordingSink {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl RecordingSink {
    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn page_names(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Page { name, .. } => Some(name),
                _ => None,
            })
            .collect()
    }

    fn identifies(&self) -> Vec<(Option<String>, Value)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Identify { user_id, traits } => Some((user_id, traits)),
                _ => None,
            })
            .collect()
    }

    fn tracks(&self) -> Vec<(String, Option<String>, Value)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Track {
                    event,
                    user_id,
                    properties,
                } => Some((event, user_id, properties)),
                _ => None,
            })
            .collect()
    }
}

impl AnalyticsSink for RecordingSink {
    fn page(&self, ctx: &EventContext, name: &str) {
        self.calls.lock().unwrap().push(Call::Page {
            name: name.to_owned(),
            user_id: ctx.user_id.as_ref().map(|id| id.as_str().to_owned()),
        });
    }

    fn identify(&self, ctx: &EventContext, traits: Value) {
        self.calls.lock().unwrap().push(Call::Identify {
            user_id: ctx.user_id.as_ref().map(|id| id.as_str().to_owned()),
            traits,
        });
    }

    fn track(&self, ctx: &EventContext, event: &str, properties: Value) {
        self.calls.lock().unwrap().push(Call::Track {
            event: event.to_owned(),
            user_id: ctx.user_id.as_ref().map(|id| id.as_str().to_owned()),
            properties,
        });
    }
}

/// Build the app with bundled content and a recording sink.
fn test_site() -> (Router, RecordingSink) {
    let config = SiteConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        base_url: "http://localhost:3000".to_string(),
        segment: SegmentConfig {
            write_key: SecretString::from("F3jNWbkBDsRFbrHAiSckIkBLuXwH4Fbn"),
        },
        sentry_dsn: None,
    };

    let content_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("content");
    let articles = ArticleStore::load(&content_dir).expect("bundled content should load");

    let sink = RecordingSink::default();
    let state = AppState::new(config, articles, Arc::new(sink.clone()));

    (topspin_site::app(state), sink)
}

async fn get(app: &Router, path: &str, cookie: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder().method("GET").uri(path);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let request = builder.body(Body::empty()).unwrap();
    app.clone().oneshot(request).await.unwrap()
}

async fn post_form(app: &Router, path: &str, body: &str, cookie: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let request = builder.body(Body::from(body.to_owned())).unwrap();
    app.clone().oneshot(request).await.unwrap()
}

/// Extract the session cookie from a response, if one was set.
fn session_cookie(response: &Response<Body>) -> Option<String> {
    let set_cookie = response.headers().get(header::SET_COOKIE)?;
    let value = set_cookie.to_str().ok()?;
    Some(value.split(';').next()?.to_owned())
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

// ============================================================================
// Pages & Page Views
// ============================================================================

#[tokio::test]
async fn test_home_page_renders_forms_and_nav() {
    let (app, _sink) = test_site();

    let response = get(&app, "/", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("Join the Newsletter"));
    assert!(body.contains("Book a Coaching Package"));
    assert!(body.contains("/article-serve"));
    assert!(body.contains("Serve Mastery"));
    assert!(body.contains("Footwork Pro"));
    assert!(body.contains("Beginner Boost"));
}

#[tokio::test]
async fn test_page_view_fires_once_for_unchanged_location() {
    let (app, sink) = test_site();

    let response = get(&app, "/", None).await;
    let cookie = session_cookie(&response).expect("first page view should establish a session");

    let _ = get(&app, "/", Some(&cookie)).await;
    let _ = get(&app, "/", Some(&cookie)).await;

    assert_eq!(sink.page_names(), vec!["Home Page"]);
}

#[tokio::test]
async fn test_page_views_fire_per_location_change() {
    let (app, sink) = test_site();

    let response = get(&app, "/", None).await;
    let cookie = session_cookie(&response).unwrap();

    let _ = get(&app, "/article-serve", Some(&cookie)).await;
    let _ = get(&app, "/", Some(&cookie)).await;

    assert_eq!(
        sink.page_names(),
        vec!["Home Page", "Serve Tips Page", "Home Page"]
    );
}

#[tokio::test]
async fn test_article_visit_fires_read_then_page_view() {
    let (app, sink) = test_site();

    let response = get(&app, "/article-serve", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("Serve Tips"));
    assert!(body.contains("repeatable toss"));

    let calls = sink.calls();
    assert_eq!(calls.len(), 2);
    // The click-initiated track precedes the settled page view.
    assert!(matches!(
        &calls[0],
        Call::Track { event, properties, .. }
            if event == "Article Read" && properties == &json!({ "article": "Serve Tips" })
    ));
    assert!(matches!(
        &calls[1],
        Call::Page { name, .. } if name == "Serve Tips Page"
    ));
}

#[tokio::test]
async fn test_all_articles_render() {
    let (app, sink) = test_site();

    for (path, title) in [
        ("/article-serve", "Serve Tips"),
        ("/article-footwork", "Footwork Tips"),
        ("/article-racket", "Racket Guide"),
    ] {
        let response = get(&app, path, None).await;
        assert_eq!(response.status(), StatusCode::OK, "{path} should render");
        let body = body_text(response).await;
        assert!(body.contains(title), "{path} should contain {title}");
    }

    let articles: Vec<_> = sink
        .tracks()
        .into_iter()
        .map(|(_, _, properties)| properties["article"].as_str().unwrap().to_owned())
        .collect();
    assert_eq!(articles, vec!["Serve Tips", "Footwork Tips", "Racket Guide"]);
}

#[tokio::test]
async fn test_unknown_route_renders_404_without_page_view() {
    let (app, sink) = test_site();

    let response = get(&app, "/pickleball", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_text(response).await;
    assert!(body.contains("Out of Bounds"));

    assert!(sink.calls().is_empty());
}

// ============================================================================
// Newsletter Form
// ============================================================================

#[tokio::test]
async fn test_newsletter_signup_identifies_and_tracks() {
    let (app, sink) = test_site();

    let response = post_form(
        &app,
        "/newsletter/subscribe",
        "first_name=Jane&last_name=Doe&email=jane%40x.com",
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("Thanks for signing up, Jane!"));

    let identifies = sink.identifies();
    assert_eq!(identifies.len(), 1);
    let (user_id, traits) = &identifies[0];
    assert_eq!(user_id.as_deref(), Some("user_1238705529"));
    assert_eq!(
        traits,
        &json!({
            "email": "jane@x.com",
            "firstName": "Jane",
            "lastName": "Doe",
        })
    );

    let tracks = sink.tracks();
    assert_eq!(tracks.len(), 1);
    let (event, user_id, properties) = &tracks[0];
    assert_eq!(event, "Newsletter Signup");
    assert_eq!(user_id.as_deref(), Some("user_1238705529"));
    assert_eq!(properties, &json!({ "email": "jane@x.com" }));
}

#[tokio::test]
async fn test_newsletter_blank_fields_rejected_without_analytics() {
    let (app, sink) = test_site();

    let response = post_form(
        &app,
        "/newsletter/subscribe",
        "first_name=&last_name=Doe&email=jane%40x.com",
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("First and last name are required."));
    // The form is re-rendered with what the visitor already typed.
    assert!(body.contains("jane@x.com"));

    assert!(sink.calls().is_empty());
}

#[tokio::test]
async fn test_newsletter_invalid_email_rejected_without_analytics() {
    let (app, sink) = test_site();

    let response = post_form(
        &app,
        "/newsletter/subscribe",
        "first_name=Jane&last_name=Doe&email=not-an-email",
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("Please enter a valid email address."));

    assert!(sink.calls().is_empty());
}

// ============================================================================
// Purchase Form
// ============================================================================

#[tokio::test]
async fn test_purchase_without_prior_identity_derives_from_email() {
    let (app, sink) = test_site();

    let response = post_form(
        &app,
        "/purchase",
        "email=bob%40y.com&package=Serve+Mastery",
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("Serve Mastery"));

    let identifies = sink.identifies();
    assert_eq!(identifies.len(), 1);
    let (user_id, traits) = &identifies[0];
    assert_eq!(user_id.as_deref(), Some("user_2131931071"));
    assert_eq!(traits, &json!({ "email": "bob@y.com" }));

    let tracks = sink.tracks();
    assert_eq!(tracks.len(), 1);
    let (event, user_id, properties) = &tracks[0];
    assert_eq!(event, "Coaching Package Purchased");
    assert_eq!(user_id.as_deref(), Some("user_2131931071"));
    assert_eq!(
        properties,
        &json!({ "package": "Serve Mastery", "email": "bob@y.com" })
    );
}

#[tokio::test]
async fn test_purchase_reuses_identity_from_newsletter_signup() {
    let (app, sink) = test_site();

    // Newsletter signup establishes the session identity.
    let response = post_form(
        &app,
        "/newsletter/subscribe",
        "first_name=Jane&last_name=Doe&email=jane%40x.com",
        None,
    )
    .await;
    let cookie = session_cookie(&response).expect("signup should establish a session");

    // A later purchase with a different email must not overwrite it.
    let response = post_form(
        &app,
        "/purchase",
        "email=bob%40y.com&package=Footwork+Pro",
        Some(&cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let identifies = sink.identifies();
    assert_eq!(identifies.len(), 2);
    let (purchase_user_id, purchase_traits) = &identifies[1];
    assert_eq!(purchase_user_id.as_deref(), Some("user_1238705529"));
    assert_eq!(purchase_traits, &json!({ "email": "bob@y.com" }));

    let tracks = sink.tracks();
    let (event, user_id, _) = &tracks[1];
    assert_eq!(event, "Coaching Package Purchased");
    assert_eq!(user_id.as_deref(), Some("user_1238705529"));
}

#[tokio::test]
async fn test_purchase_unknown_package_never_reaches_handler() {
    let (app, sink) = test_site();

    let response = post_form(
        &app,
        "/purchase",
        "email=bob%40y.com&package=Volley+Club",
        None,
    )
    .await;
    assert!(response.status().is_client_error());

    assert!(sink.calls().is_empty());
}

#[tokio::test]
async fn test_purchase_invalid_email_rejected_without_analytics() {
    let (app, sink) = test_site();

    let response = post_form(&app, "/purchase", "email=&package=Beginner+Boost", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("Please enter a valid email address."));

    assert!(sink.calls().is_empty());
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _sink) = test_site();

    let response = get(&app, "/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

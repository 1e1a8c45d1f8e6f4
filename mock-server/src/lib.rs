use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tracing::info;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Account {
    pub email: String,
    pub password: String,
    pub user_id: u64,
    pub plugin_hash: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PageRecord {
    pub id: u64,
    pub title: String,
    #[serde(skip_serializing)]
    pub html: String,
}

/// Everything the mock service knows about.
#[derive(Clone, Debug)]
pub struct Fixture {
    pub account: Account,
    pub pages: Vec<PageRecord>,
    /// Answer every service call with 503.
    pub offline: bool,
    /// Answer every service call with 302 to `/ajax/moved`, which itself
    /// serves a success envelope.
    pub relocated: bool,
}

impl Default for Fixture {
    fn default() -> Self {
        Self {
            account: Account {
                email: "login".to_string(),
                password: "password".to_string(),
                user_id: 976617,
                plugin_hash: "75f9179460cdb14751d68390f876b3e".to_string(),
            },
            pages: vec![
                PageRecord {
                    id: 330178,
                    title: "Landing".to_string(),
                    html: "<p>Page</p>".to_string(),
                },
                PageRecord {
                    id: 330179,
                    title: "Pricing".to_string(),
                    html: "<h1>Pricing</h1>".to_string(),
                },
            ],
            offline: false,
            relocated: false,
        }
    }
}

type Shared = Arc<Fixture>;

pub fn app() -> Router {
    app_with(Fixture::default())
}

pub fn app_with(fixture: Fixture) -> Router {
    Router::new()
        .route("/ajax/services/{service}", post(call_service))
        .route("/server/view-by-id/{page_id}", post(view_page))
        .route("/ajax/moved", get(moved).post(moved))
        .with_state(Arc::new(fixture))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with(listener: TcpListener, fixture: Fixture) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(fixture)).await
}

async fn call_service(
    State(fixture): State<Shared>,
    Path(service): Path<String>,
    Form(params): Form<HashMap<String, String>>,
) -> Response {
    info!(%service, "service call");
    if fixture.offline {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }
    if fixture.relocated {
        return (StatusCode::FOUND, [(header::LOCATION, "/ajax/moved")]).into_response();
    }
    if !params.contains_key("service-type") || !params.contains_key("version") {
        return Json(failure("Unsupported plugin version")).into_response();
    }

    let body = match service.as_str() {
        "user-login" => login(&fixture, &params),
        "my-pages" => my_pages(&fixture, &params),
        _ => failure("Unknown service"),
    };
    Json(body).into_response()
}

async fn moved() -> Json<Value> {
    info!("relocated service call");
    Json(ok(json!({})))
}

async fn view_page(State(fixture): State<Shared>, Path(page_id): Path<u64>) -> Response {
    info!(page_id, "page view");
    match fixture.pages.iter().find(|p| p.id == page_id) {
        Some(page) => ([(header::CONTENT_TYPE, "text/html")], page.html.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

fn login(fixture: &Fixture, params: &HashMap<String, String>) -> Value {
    let email = decode_field(params, "data[email]");
    let password = decode_field(params, "data[password]");
    let account = &fixture.account;
    if email.as_deref() == Some(account.email.as_str())
        && password.as_deref() == Some(account.password.as_str())
    {
        ok(json!({ "user_id": account.user_id, "plugin_hash": account.plugin_hash }))
    } else {
        denied("Login failed")
    }
}

fn my_pages(fixture: &Fixture, params: &HashMap<String, String>) -> Value {
    let account = &fixture.account;
    let user_id = params.get("data[user_id]").and_then(|v| v.parse::<u64>().ok());
    let hash = params.get("data[plugin_hash]");
    if user_id == Some(account.user_id) && hash == Some(&account.plugin_hash) {
        ok(json!({ "pages": fixture.pages }))
    } else {
        denied("Invalid plugin hash")
    }
}

fn decode_field(params: &HashMap<String, String>, key: &str) -> Option<String> {
    let raw = STANDARD.decode(params.get(key)?).ok()?;
    String::from_utf8(raw).ok()
}

fn ok(data: Value) -> Value {
    json!({ "message": "Ok", "data": data, "success": true, "error": false })
}

fn denied(error_message: &str) -> Value {
    json!({ "error_message": error_message, "success": false, "error": true })
}

fn failure(message: &str) -> Value {
    json!({ "message": message, "success": false, "error": false })
}

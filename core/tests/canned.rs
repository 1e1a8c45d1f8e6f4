//! Client behaviour against canned transport responses.
//!
//! A recording fake stands in for the network so each test can assert on the
//! exact request that went out as well as on the parsed result.

use std::cell::RefCell;

use pagebuilder_core::{
    ApiClient, ApiError, ClientConfig, ErrorKind, HttpRequest, HttpResponse, Transport,
};
use rstest::rstest;

const HASH: &str = "75f9179460cdb14751d68390f876b3e";

/// Answers every POST with one canned response and remembers what was sent.
struct Canned {
    status: u16,
    reason: &'static str,
    body: String,
    sent: RefCell<Vec<(String, HttpRequest)>>,
}

impl Canned {
    fn ok(body: impl Into<String>) -> Self {
        Self::status(200, "OK", body)
    }

    fn status(status: u16, reason: &'static str, body: impl Into<String>) -> Self {
        Self {
            status,
            reason,
            body: body.into(),
            sent: RefCell::new(Vec::new()),
        }
    }

    fn last(&self) -> (String, HttpRequest) {
        self.sent.borrow().last().cloned().expect("no request sent")
    }
}

impl Transport for Canned {
    fn post(&self, host: &str, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        self.sent.borrow_mut().push((host.to_string(), request.clone()));
        Ok(HttpResponse {
            status: self.status,
            reason: self.reason.to_string(),
            headers: Vec::new(),
            body: self.body.clone().into_bytes(),
        })
    }
}

fn client(transport: &Canned) -> ApiClient<&Canned> {
    ApiClient::with_transport(
        ClientConfig::new("pages.example.com", "http://127.0.0.1:8000/"),
        transport,
    )
}

fn form(body: &str) -> Vec<(String, String)> {
    url::form_urlencoded::parse(body.as_bytes()).into_owned().collect()
}

#[test]
fn successful_login() {
    let transport = Canned::ok(format!(
        r#"{{"message":"Ok","data":{{"user_id":976617,"plugin_hash":"{HASH}"}},"success":true,"error":false}}"#
    ));
    let creds = client(&transport).login("login", "password").unwrap();

    assert_eq!(creds.user_id, Some(976617));
    assert_eq!(creds.plugin_hash, HASH);

    let (host, req) = transport.last();
    assert_eq!(host, "pages.example.com");
    assert_eq!(req.path, "/ajax/services/user-login");
    assert_eq!(
        req.body,
        "service-type=Wordpress&service=http%3A%2F%2F127.0.0.1%3A8000%2F&version=2.21\
         &data%5Buser_id%5D=&data%5Bemail%5D=bG9naW4%3D&data%5Bpassword%5D=cGFzc3dvcmQ%3D"
    );
}

#[test]
fn incorrect_password() {
    let transport =
        Canned::ok(r#"{"error_message":"Login failed","success":false,"error":true}"#);
    let err = client(&transport).login("login", "password").unwrap_err();

    assert_eq!(err.kind(), ErrorKind::AuthenticationFailure);
    assert_eq!(err.to_string(), "Authentication failure: Login failed");
}

#[test]
fn get_user_pages_in_order() {
    let transport = Canned::ok(
        r#"{"message":"Ok","data":{"pages":["page1","page2","page3"]},"success":true,"error":false}"#,
    );
    let pages = client(&transport).get_user_pages(998475, HASH).unwrap();

    assert_eq!(pages, vec!["page1", "page2", "page3"]);
    let (_, req) = transport.last();
    assert_eq!(req.path, "/ajax/services/my-pages");
    let fields = form(&req.body);
    assert!(fields.contains(&("data[user_id]".to_string(), "998475".to_string())));
    assert!(fields.contains(&("data[plugin_hash]".to_string(), HASH.to_string())));
}

#[rstest]
#[case(404, "Not Found")]
#[case(500, "Internal Server Error")]
#[case(302, "Found")]
fn non_200_is_connection_failure(#[case] status: u16, #[case] reason: &'static str) {
    let transport = Canned::status(status, reason, "this is not json");
    let err = client(&transport).api_call("my-pages", &[]).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ConnectionFailure);
    assert_eq!(err.to_string(), format!("Connection failure: {reason}"));
}

#[test]
fn get_page_returns_body_verbatim() {
    let transport = Canned::ok("<p>Page</p>");
    let html = client(&transport).get_page(330178).unwrap();

    assert_eq!(html, "<p>Page</p>");
    let (_, req) = transport.last();
    assert_eq!(req.path, "/server/view-by-id/330178");
    assert!(req.body.is_empty());
}

#[test]
fn get_page_does_not_validate_status() {
    let transport = Canned::status(500, "Internal Server Error", "<h1>Server Error</h1>");
    let html = client(&transport).get_page(1).unwrap();
    assert_eq!(html, "<h1>Server Error</h1>");
}

#[test]
fn request_page_returns_raw_response() {
    let transport = Canned::ok("");
    let response = client(&transport)
        .request_page("http://pages.example.com/server/view-by-id/330178", &[])
        .unwrap();

    assert_eq!(response.status, 200);
    let (_, req) = transport.last();
    assert_eq!(req.path, "http://pages.example.com/server/view-by-id/330178");
}

#[test]
fn request_page_sends_params_unprefixed() {
    let transport = Canned::ok("");
    client(&transport)
        .request_page("/server/preview", &[("foo", "a b")])
        .unwrap();

    let (_, req) = transport.last();
    assert_eq!(req.body, "foo=a+b");
}

#[test]
fn api_call_names_params_with_data_brackets() {
    let transport = Canned::ok(r#"{"success":true,"error":false,"data":{}}"#);
    let envelope = client(&transport).api_call("my-pages", &[("foo", "bar")]).unwrap();
    assert!(envelope.success);

    let fields = form(&transport.last().1.body);
    assert!(fields.contains(&("data[foo]".to_string(), "bar".to_string())));
    assert!(!fields.iter().any(|(k, _)| k == "foo"));
}

#[test]
fn both_flags_set_reports_authentication() {
    let transport = Canned::ok(
        r#"{"error":true,"error_message":"Session expired","success":false,"message":"Denied"}"#,
    );
    let err = client(&transport).api_call("my-pages", &[]).unwrap_err();
    assert_eq!(err.to_string(), "Authentication failure: Session expired");
}

#[test]
fn malformed_body_is_parse_failure() {
    let transport = Canned::ok("{\"success\": tru");
    let err = client(&transport).api_call("my-pages", &[]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ParseFailure);
}

#[test]
fn page_operations_need_no_credential_encoder() {
    let transport = Canned::ok("<p>Page</p>");
    let client = client(&transport).with_encoder(());

    assert_eq!(client.get_page(330178).unwrap(), "<p>Page</p>");
    assert_eq!(client.request_page("/server/view-by-id/1", &[]).unwrap().status, 200);
}

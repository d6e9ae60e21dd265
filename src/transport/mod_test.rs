use serde_json::json;

use super::*;

// =============================================================================
// TransportError::message
// =============================================================================

#[test]
fn message_reads_error_field() {
    let err = TransportError::Status { status: 401, body: Some(json!({ "error": "bad credentials" })) };
    assert_eq!(err.message(), Some("bad credentials"));
}

#[test]
fn message_none_without_body() {
    let err = TransportError::Status { status: 500, body: None };
    assert_eq!(err.message(), None);
}

#[test]
fn message_none_when_error_not_string() {
    let err = TransportError::Status { status: 400, body: Some(json!({ "error": 17 })) };
    assert_eq!(err.message(), None);
}

#[test]
fn message_none_when_error_blank() {
    let err = TransportError::Status { status: 400, body: Some(json!({ "error": "  " })) };
    assert_eq!(err.message(), None);
}

#[test]
fn message_none_for_network_and_timeout() {
    assert_eq!(TransportError::Network("refused".into()).message(), None);
    assert_eq!(TransportError::Timeout.message(), None);
}

#[test]
fn status_only_for_status_variant() {
    assert_eq!(TransportError::Status { status: 404, body: None }.status(), Some(404));
    assert_eq!(TransportError::Timeout.status(), None);
}

#[test]
fn display_mentions_status() {
    let err = TransportError::Status { status: 503, body: None };
    assert_eq!(err.to_string(), "server returned status 503");
}

// =============================================================================
// Method
// =============================================================================

#[test]
fn method_display() {
    assert_eq!(Method::Get.to_string(), "GET");
    assert_eq!(Method::Post.to_string(), "POST");
}

// =============================================================================
// Arc<T> forwarding
// =============================================================================

struct Echo;

#[async_trait::async_trait]
impl Transport for Echo {
    async fn request(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Response, TransportError> {
        Ok(Response { status: 200, body: json!({ "method": method.as_str(), "path": path, "body": body }) })
    }
}

#[tokio::test]
async fn arc_transport_forwards_requests() {
    let transport: Arc<dyn Transport> = Arc::new(Echo);
    let resp = transport
        .request(Method::Post, "/api/auth/logout", None)
        .await
        .unwrap();
    assert_eq!(resp.body["method"], "POST");
    assert_eq!(resp.body["path"], "/api/auth/logout");
    assert!(resp.body["body"].is_null());
}

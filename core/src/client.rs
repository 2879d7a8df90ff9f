//! The request client every resource accessor goes through.
//!
//! # Design
//! `ApiClient` holds only its base origin and a transport; nothing mutable
//! is shared between calls, so one client can serve any number of threads.
//! A call is three steps: `build_request` normalizes the path, headers and
//! body; the transport executes the request exactly once; `parse_response`
//! maps the reply onto a JSON value or a `RequestError`. The first and last
//! steps are pure and public so they can be checked without a network.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::{ClientConfig, RequestConfig};
use crate::error::RequestError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{Transport, UreqTransport};

const JSON: &str = "application/json";

/// Client for the Spy Cat Agency REST backend.
#[derive(Debug, Clone)]
pub struct ApiClient<T = UreqTransport> {
    base_url: String,
    transport: T,
}

impl ApiClient<UreqTransport> {
    pub fn new(config: ClientConfig) -> Result<Self, RequestError> {
        let transport = UreqTransport::new(config.timeout);
        Self::with_transport(config, transport)
    }

    /// Build a client from `SPYCAT_API_URL` / `SPYCAT_API_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, RequestError> {
        Self::new(ClientConfig::from_env()?)
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Result<Self, RequestError> {
        config.validate()?;
        Ok(Self {
            base_url: config.base_url,
            transport,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Normalize a call into the request that will go on the wire.
    ///
    /// Caller headers are kept and `accept` defaults to JSON unless the
    /// caller set one. `content-type` is always `application/json`; a
    /// caller-supplied content type is dropped.
    pub fn build_request(&self, path: &str, config: RequestConfig) -> Result<HttpRequest, RequestError> {
        if !path.starts_with('/') {
            return Err(RequestError::configuration(format!(
                "endpoint must start with '/', got {path:?}"
            )));
        }

        let mut headers: Vec<(String, String)> = Vec::with_capacity(config.headers.len() + 2);
        for (name, value) in config.headers {
            if name.eq_ignore_ascii_case("content-type") {
                tracing::debug!(%value, "ignoring caller content-type");
                continue;
            }
            match headers.iter_mut().find(|(existing, _)| existing.eq_ignore_ascii_case(&name)) {
                Some(slot) => *slot = (name, value),
                None => headers.push((name, value)),
            }
        }
        if !headers.iter().any(|(name, _)| name.eq_ignore_ascii_case("accept")) {
            headers.push(("accept".to_string(), JSON.to_string()));
        }
        headers.push(("content-type".to_string(), JSON.to_string()));

        let body = config.body.map(|body| body.into_text()).transpose()?;

        Ok(HttpRequest {
            method: config.method,
            url: format!("{}{path}", self.base_url),
            headers,
            body,
        })
    }

    /// Map a response onto its decoded JSON body or an `Http` error.
    pub fn parse_response(&self, response: HttpResponse) -> Result<Value, RequestError> {
        if !response.is_success() {
            let body = serde_json::from_str(&response.body).ok();
            return Err(RequestError::Http {
                status: response.status,
                body,
            });
        }
        if response.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&response.body).map_err(|e| RequestError::decode(e.to_string()))
    }

    /// Send one request to `path` and return the decoded JSON body.
    pub fn request(&self, path: &str, config: RequestConfig) -> Result<Value, RequestError> {
        let request = self.build_request(path, config)?;
        tracing::debug!(method = %request.method, url = %request.url, "sending request");

        let response = match self.transport.execute(&request) {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(method = %request.method, url = %request.url, error = %err, "request failed");
                return Err(err);
            }
        };

        let outcome = self.parse_response(response);
        if let Err(err) = &outcome {
            tracing::warn!(method = %request.method, url = %request.url, error = %err, "request rejected");
        }
        outcome
    }

    /// Like [`ApiClient::request`], then narrow the JSON into `R`.
    pub fn request_as<R: DeserializeOwned>(&self, path: &str, config: RequestConfig) -> Result<R, RequestError> {
        let value = self.request(path, config)?;
        serde_json::from_value(value).map_err(|e| RequestError::decode(e.to_string()))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;
    use crate::error::ErrorKind;
    use crate::http::HttpMethod;

    /// Records every request and answers with a canned outcome.
    pub(crate) struct RecordingTransport {
        pub(crate) sent: Mutex<Vec<HttpRequest>>,
        reply: Result<HttpResponse, String>,
    }

    impl RecordingTransport {
        pub(crate) fn replying(status: u16, body: &str) -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                reply: Ok(HttpResponse::new(status, body)),
            }
        }

        pub(crate) fn failing(message: &str) -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                reply: Err(message.to_string()),
            }
        }

        pub(crate) fn last(&self) -> HttpRequest {
            self.sent.lock().unwrap().last().cloned().expect("no request sent")
        }

        pub(crate) fn count(&self) -> usize {
            self.sent.lock().unwrap().len()
        }
    }

    impl Transport for RecordingTransport {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, RequestError> {
            self.sent.lock().unwrap().push(request.clone());
            self.reply.clone().map_err(|message| RequestError::transport(message))
        }
    }

    pub(crate) fn client_with(transport: RecordingTransport) -> ApiClient<RecordingTransport> {
        ApiClient::with_transport(ClientConfig::new("http://localhost:8000"), transport).unwrap()
    }

    fn client() -> ApiClient<RecordingTransport> {
        client_with(RecordingTransport::replying(200, "{}"))
    }

    #[test]
    fn path_without_leading_slash_is_rejected_before_io() {
        let c = client();
        for path in ["", "spycat/", "http://elsewhere/spycat/"] {
            let err = c.request(path, RequestConfig::get()).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Configuration, "{path:?}");
        }
        assert_eq!(c.transport().count(), 0);
    }

    #[test]
    fn defaults_to_get_with_json_headers() {
        let req = client().build_request("/spycat/", RequestConfig::default()).unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:8000/spycat/");
        assert_eq!(req.header("accept"), Some("application/json"));
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert!(req.body.is_none());
    }

    #[test]
    fn accept_override_is_respected() {
        let config = RequestConfig::get().header("Accept", "text/plain");
        let req = client().build_request("/", config).unwrap();
        assert_eq!(req.header("accept"), Some("text/plain"));
        assert_eq!(req.headers.iter().filter(|(k, _)| k.eq_ignore_ascii_case("accept")).count(), 1);
    }

    #[test]
    fn repeated_header_in_other_case_is_sent_once() {
        let config = RequestConfig::get().header("Accept", "text/plain").header("accept", "text/csv");
        let req = client().build_request("/", config).unwrap();
        assert_eq!(req.headers.iter().filter(|(k, _)| k.eq_ignore_ascii_case("accept")).count(), 1);
        assert_eq!(req.header("accept"), Some("text/csv"));

        // Entries written straight into the map collapse too.
        let mut config = RequestConfig::get();
        config.headers.insert("X-Agent".to_string(), "tom".to_string());
        config.headers.insert("x-agent".to_string(), "jerry".to_string());
        let req = client().build_request("/", config).unwrap();
        assert_eq!(req.headers.iter().filter(|(k, _)| k.eq_ignore_ascii_case("x-agent")).count(), 1);
    }

    #[test]
    fn content_type_is_always_json() {
        let config = RequestConfig::post()
            .header("Content-Type", "text/plain")
            .header("X-Agent", "whiskers");
        let req = client().build_request("/note/1", config).unwrap();
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(
            req.headers.iter().filter(|(k, _)| k.eq_ignore_ascii_case("content-type")).count(),
            1
        );
        assert_eq!(req.header("x-agent"), Some("whiskers"));
    }

    #[test]
    fn structured_body_is_serialized() {
        let config = RequestConfig::post().json(json!({"a": 1}));
        let req = client().build_request("/spycat/", config).unwrap();
        assert_eq!(req.body.as_deref(), Some(r#"{"a":1}"#));
    }

    #[test]
    fn text_body_is_sent_unchanged() {
        let config = RequestConfig::put().text("{\"content\" : \"as typed\"}");
        let req = client().build_request("/note/3", config).unwrap();
        assert_eq!(req.body.as_deref(), Some("{\"content\" : \"as typed\"}"));
    }

    #[test]
    fn success_returns_decoded_body() {
        let body = json!({"spycats": [{"id": 1, "name": "Tom"}], "all_count": 1});
        let c = client_with(RecordingTransport::replying(200, &body.to_string()));
        assert_eq!(c.request("/spycat/", RequestConfig::get()).unwrap(), body);
        assert_eq!(c.transport().count(), 1);
    }

    #[test]
    fn empty_success_body_is_null() {
        let c = client_with(RecordingTransport::replying(204, ""));
        assert_eq!(c.request("/note/1", RequestConfig::delete()).unwrap(), Value::Null);
    }

    #[test]
    fn invalid_success_body_is_a_decode_error() {
        let c = client_with(RecordingTransport::replying(200, "<html>"));
        let err = c.request("/", RequestConfig::get()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[test]
    fn error_status_carries_json_detail() {
        let c = client_with(RecordingTransport::replying(404, r#"{"detail":"X"}"#));
        let err = c.request("/spycat/9", RequestConfig::get()).unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.body(), Some(&json!({"detail": "X"})));
    }

    #[test]
    fn non_json_error_body_is_absent() {
        let c = client_with(RecordingTransport::replying(500, "Internal Server Error"));
        let err = c.request("/mission/", RequestConfig::get()).unwrap_err();
        assert!(matches!(err, RequestError::Http { status: 500, body: None }));
    }

    #[test]
    fn transport_failure_is_reported_once() {
        let c = client_with(RecordingTransport::failing("connection refused"));
        let err = c.request("/spycat/", RequestConfig::get()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(err.to_string().contains("connection refused"));
        assert_eq!(c.transport().count(), 1);
    }

    #[test]
    fn request_as_rejects_wrong_shape() {
        let c = client_with(RecordingTransport::replying(200, r#"{"unexpected":true}"#));
        let err = c
            .request_as::<crate::types::SpyCat>("/spycat/1", RequestConfig::get())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let c = ApiClient::with_transport(
            ClientConfig::new("http://localhost:8000/"),
            RecordingTransport::replying(200, "{}"),
        )
        .unwrap();
        let req = c.build_request("/mission/", RequestConfig::get()).unwrap();
        assert_eq!(req.url, "http://localhost:8000/mission/");
    }
}

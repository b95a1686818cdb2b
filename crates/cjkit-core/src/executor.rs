//! Request execution: auth, caching, dispatch, decoding, classification.
//!
//! Every endpoint call funnels through [`RequestExecutor`]. It attaches the
//! bearer token and default headers, consults the response cache according
//! to the requested [`CacheMode`], hands the exchange to the injected
//! transport, and turns the raw response into either a normalized
//! [`serde_json::Value`] or a typed [`ApiError`].

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::cache::{CacheMode, ResponseCache};
use crate::decode::decode;
use crate::error::{classify, ApiError};
use crate::http_client::{HttpAuth, HttpClient, HttpRequest, HttpResponse, USER_AGENT};

/// Query or form parameters. The ordered map keeps encoded URLs canonical,
/// which in turn keeps cache keys stable.
pub type Params = BTreeMap<String, String>;

/// Payload of a POST request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Sent as `application/json`; GraphQL documents use `{"query": "..."}`.
    Json(Value),
    /// Sent as `application/x-www-form-urlencoded`.
    Form(Params),
}

/// Executes CJ API calls over an injected [`HttpClient`].
#[derive(Clone)]
pub struct RequestExecutor {
    transport: Arc<dyn HttpClient>,
    auth: HttpAuth,
    timeout: Duration,
    debug: bool,
    cache: ResponseCache,
}

impl fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `transport` is a trait object without a `Debug` bound.
        f.debug_struct("RequestExecutor")
            .field("auth", &self.auth)
            .field("timeout", &self.timeout)
            .field("debug", &self.debug)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl RequestExecutor {
    pub fn new(
        transport: Arc<dyn HttpClient>,
        access_token: impl Into<String>,
        timeout: Duration,
        debug: bool,
        cache: ResponseCache,
    ) -> Result<Self, ApiError> {
        let access_token: String = access_token.into();
        let access_token = access_token.trim();
        if access_token.is_empty() {
            return Err(ApiError::config("access token is required"));
        }
        Ok(Self {
            transport,
            auth: HttpAuth::BearerToken(access_token.to_owned()),
            timeout,
            debug,
            cache,
        })
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub async fn get(&self, url: &str, params: &Params) -> Result<Value, ApiError> {
        self.get_with(url, params, CacheMode::Use).await
    }

    pub async fn get_with(
        &self,
        url: &str,
        params: &Params,
        mode: CacheMode,
    ) -> Result<Value, ApiError> {
        let full_url = build_url(url, params);
        let cache_key = format!("GET {full_url}");
        if let Some(hit) = self.cached(&cache_key, mode) {
            return Ok(hit);
        }

        if self.debug {
            debug!(
                target: "cjkit",
                "GET {} (params: {})",
                full_url,
                joined_keys(params.keys())
            );
        }
        let request = self.base_request(HttpRequest::get(&full_url));
        let value = self.dispatch(request).await?;
        self.store(&cache_key, &value, mode);
        Ok(value)
    }

    pub async fn post(&self, url: &str, body: &RequestBody) -> Result<Value, ApiError> {
        self.post_with(url, body, CacheMode::Use).await
    }

    pub async fn post_with(
        &self,
        url: &str,
        body: &RequestBody,
        mode: CacheMode,
    ) -> Result<Value, ApiError> {
        let (payload, content_type) = encode_body(body)?;
        let cache_key = format!("POST {url} {payload}");
        if let Some(hit) = self.cached(&cache_key, mode) {
            return Ok(hit);
        }

        if self.debug {
            debug!(
                target: "cjkit",
                "POST {} ({}, keys: {}, {} bytes)",
                url,
                content_type,
                body_keys(body),
                payload.len()
            );
        }
        let request = self
            .base_request(HttpRequest::post(url))
            .with_header("content-type", content_type)
            .with_body(payload);
        let value = self.dispatch(request).await?;
        self.store(&cache_key, &value, mode);
        Ok(value)
    }

    fn base_request(&self, request: HttpRequest) -> HttpRequest {
        request
            .with_header("accept", "*/*")
            .with_header("user-agent", USER_AGENT)
            .with_auth(&self.auth)
            .with_timeout_ms(self.timeout.as_millis() as u64)
    }

    fn cached(&self, key: &str, mode: CacheMode) -> Option<Value> {
        if mode != CacheMode::Use {
            return None;
        }
        let hit = self.cache.get(key);
        if self.debug && hit.is_some() {
            debug!(target: "cjkit", "cache hit for {}", key);
        }
        hit
    }

    fn store(&self, key: &str, value: &Value, mode: CacheMode) {
        if mode == CacheMode::Bypass {
            return;
        }
        self.cache.set(key, value);
    }

    async fn dispatch(&self, request: HttpRequest) -> Result<Value, ApiError> {
        let response = self
            .transport
            .execute(request)
            .await
            .map_err(|error| ApiError::transport(error.message()))?;
        if self.debug {
            debug!(
                target: "cjkit",
                "response: status {}, type {}, {} bytes",
                response.status,
                response.content_type.as_deref().unwrap_or("-"),
                response.body.len()
            );
        }
        handle_response(&response)
    }
}

/// Turn a completed exchange into a value or an error. An empty body is its
/// own condition and takes precedence over status handling.
fn handle_response(response: &HttpResponse) -> Result<Value, ApiError> {
    if response.body.is_empty() {
        return Err(ApiError::EmptyResponse {
            http_code: response.status,
            content_type: response.content_type.clone(),
        });
    }
    if !response.is_success() {
        return Err(classify(
            response.status,
            &response.body,
            response.content_type.as_deref(),
        ));
    }
    decode(&response.body, response.content_type.as_deref())
}

fn build_url(url: &str, params: &Params) -> String {
    if params.is_empty() {
        return url.to_owned();
    }
    let query = encode_pairs(params);
    if url.contains('?') {
        format!("{url}&{query}")
    } else {
        format!("{url}?{query}")
    }
}

fn encode_pairs(params: &Params) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

fn encode_body(body: &RequestBody) -> Result<(String, &'static str), ApiError> {
    match body {
        RequestBody::Json(value) => {
            let payload = serde_json::to_string(value).map_err(|error| {
                ApiError::invalid_request(format!("failed to encode JSON body: {error}"))
            })?;
            Ok((payload, "application/json"))
        }
        RequestBody::Form(params) => {
            Ok((encode_pairs(params), "application/x-www-form-urlencoded"))
        }
    }
}

fn joined_keys<'a>(keys: impl Iterator<Item = &'a String>) -> String {
    let joined = keys.map(String::as_str).collect::<Vec<_>>().join(", ");
    if joined.is_empty() {
        String::from("-")
    } else {
        joined
    }
}

fn body_keys(body: &RequestBody) -> String {
    match body {
        RequestBody::Json(Value::Object(map)) => joined_keys(map.keys()),
        RequestBody::Json(_) => String::from("-"),
        RequestBody::Form(params) => joined_keys(params.keys()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::HttpError;
    use serde_json::json;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Mutex;

    struct RecordingHttpClient {
        response: Result<HttpResponse, HttpError>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl RecordingHttpClient {
        fn with_response(response: Result<HttpResponse, HttpError>) -> Self {
            Self {
                response,
                requests: Mutex::new(Vec::new()),
            }
        }

        fn success(body: &str) -> Self {
            Self::with_response(Ok(HttpResponse::ok_json(body)))
        }

        fn recorded_requests(&self) -> Vec<HttpRequest> {
            self.requests
                .lock()
                .map(|requests| requests.clone())
                .unwrap_or_default()
        }
    }

    impl HttpClient for RecordingHttpClient {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            let response = self.response.clone();
            if let Ok(mut requests) = self.requests.lock() {
                requests.push(request);
            }
            Box::pin(async move { response })
        }
    }

    fn executor(transport: Arc<RecordingHttpClient>) -> RequestExecutor {
        RequestExecutor::new(
            transport,
            "token-123",
            Duration::from_secs(30),
            false,
            ResponseCache::disabled(),
        )
        .expect("valid executor")
    }

    fn caching_executor(
        transport: Arc<RecordingHttpClient>,
        dir: &std::path::Path,
    ) -> RequestExecutor {
        RequestExecutor::new(
            transport,
            "token-123",
            Duration::from_secs(30),
            false,
            ResponseCache::new(true, Duration::from_secs(3600), dir.to_path_buf()),
        )
        .expect("valid executor")
    }

    fn params(pairs: &[(&str, &str)]) -> Params {
        pairs
            .iter()
            .map(|(key, value)| (String::from(*key), String::from(*value)))
            .collect()
    }

    #[test]
    fn blank_access_token_is_rejected() {
        let transport = Arc::new(RecordingHttpClient::success("{}"));
        let error = RequestExecutor::new(
            transport,
            "   ",
            Duration::from_secs(30),
            false,
            ResponseCache::disabled(),
        )
        .expect_err("blank token fails");

        assert!(matches!(error, ApiError::Config { .. }));
    }

    #[tokio::test]
    async fn padded_access_token_is_trimmed_before_the_auth_header() {
        let transport = Arc::new(RecordingHttpClient::success("{}"));
        let executor = RequestExecutor::new(
            transport.clone(),
            " token-123 ",
            Duration::from_secs(30),
            false,
            ResponseCache::disabled(),
        )
        .expect("padded token is usable");

        executor
            .get("https://example.test/query", &Params::new())
            .await
            .expect("request succeeds");

        assert_eq!(
            transport.recorded_requests()[0]
                .headers
                .get("authorization")
                .map(String::as_str),
            Some("Bearer token-123")
        );
    }

    #[test]
    fn debug_lines_list_ordered_parameter_keys() {
        let query = params(&[("website-id", "123"), ("keywords", "shoes")]);
        assert_eq!(joined_keys(query.keys()), "keywords, website-id");
        assert_eq!(joined_keys(Params::new().keys()), "-");

        assert_eq!(
            body_keys(&RequestBody::Json(json!({"query": "{ a }"}))),
            "query"
        );
        assert_eq!(
            body_keys(&RequestBody::Form(params(&[("b", "2"), ("a", "1")]))),
            "a, b"
        );
    }

    #[tokio::test]
    async fn get_attaches_auth_and_default_headers() {
        let transport = Arc::new(RecordingHttpClient::success(r#"{"ok":true}"#));
        let executor = executor(transport.clone());

        executor
            .get("https://example.test/v3/advertiser-lookup", &Params::new())
            .await
            .expect("request succeeds");

        let recorded = transport.recorded_requests();
        assert_eq!(recorded.len(), 1);
        let request = &recorded[0];
        assert_eq!(
            request.headers.get("authorization").map(String::as_str),
            Some("Bearer token-123")
        );
        assert_eq!(request.headers.get("accept").map(String::as_str), Some("*/*"));
        assert_eq!(
            request.headers.get("user-agent").map(String::as_str),
            Some(USER_AGENT)
        );
        assert_eq!(request.timeout_ms, 30_000);
    }

    #[tokio::test]
    async fn get_encodes_sorted_query_parameters() {
        let transport = Arc::new(RecordingHttpClient::success("{}"));
        let executor = executor(transport.clone());

        executor
            .get(
                "https://example.test/v2/link-search",
                &params(&[("website-id", "123"), ("keywords", "running shoes")]),
            )
            .await
            .expect("request succeeds");

        let recorded = transport.recorded_requests();
        assert_eq!(
            recorded[0].url,
            "https://example.test/v2/link-search?keywords=running%20shoes&website-id=123"
        );
    }

    #[tokio::test]
    async fn existing_query_string_is_extended_not_replaced() {
        let transport = Arc::new(RecordingHttpClient::success("{}"));
        let executor = executor(transport.clone());

        executor
            .get("https://example.test/query?v=3", &params(&[("page", "2")]))
            .await
            .expect("request succeeds");

        assert_eq!(
            transport.recorded_requests()[0].url,
            "https://example.test/query?v=3&page=2"
        );
    }

    #[tokio::test]
    async fn empty_body_maps_to_empty_response_with_status() {
        let transport = Arc::new(RecordingHttpClient::with_response(Ok(
            HttpResponse::ok_json(""),
        )));
        let executor = executor(transport);

        let error = executor
            .get("https://example.test/query", &Params::new())
            .await
            .expect_err("empty body fails");

        assert_eq!(
            error,
            ApiError::EmptyResponse {
                http_code: 200,
                content_type: Some(String::from("application/json")),
            }
        );
    }

    #[tokio::test]
    async fn error_status_is_classified_with_guidance() {
        let transport = Arc::new(RecordingHttpClient::with_response(Ok(
            HttpResponse::with_status(401, r#"{"message":"invalid token"}"#),
        )));
        let executor = executor(transport);

        let error = executor
            .get("https://example.test/query", &Params::new())
            .await
            .expect_err("401 fails");

        assert_eq!(error.http_code(), Some(401));
        let rendered = error.to_string();
        assert!(rendered.contains("HTTP 401"));
        assert!(rendered.contains("invalid token"));
        assert!(
            rendered.contains("token is invalid or expired"),
            "missing guidance: {rendered}"
        );
    }

    #[tokio::test]
    async fn transport_failure_maps_to_transport_error() {
        let transport = Arc::new(RecordingHttpClient::with_response(Err(HttpError::new(
            "connection failed: dns error",
        ))));
        let executor = executor(transport);

        let error = executor
            .get("https://example.test/query", &Params::new())
            .await
            .expect_err("transport failure");

        assert_eq!(
            error,
            ApiError::transport("connection failed: dns error")
        );
    }

    #[tokio::test]
    async fn second_get_is_served_from_cache() {
        let dir = tempfile::tempdir().expect("tempdir");
        let transport = Arc::new(RecordingHttpClient::success(r#"{"advertisers":[]}"#));
        let executor = caching_executor(transport.clone(), dir.path());
        let query = params(&[("advertiser-ids", "joined")]);

        let first = executor
            .get("https://example.test/v3/advertiser-lookup", &query)
            .await
            .expect("first request");
        let second = executor
            .get("https://example.test/v3/advertiser-lookup", &query)
            .await
            .expect("second request");

        assert_eq!(first, second);
        assert_eq!(transport.recorded_requests().len(), 1);
    }

    #[tokio::test]
    async fn refresh_mode_refetches_then_repopulates() {
        let dir = tempfile::tempdir().expect("tempdir");
        let transport = Arc::new(RecordingHttpClient::success(r#"{"n":1}"#));
        let executor = caching_executor(transport.clone(), dir.path());

        executor
            .get_with("https://example.test/q", &Params::new(), CacheMode::Refresh)
            .await
            .expect("first request");
        executor
            .get_with("https://example.test/q", &Params::new(), CacheMode::Refresh)
            .await
            .expect("second request");
        // Refresh rewrote the entry, so plain Use now hits the cache.
        executor
            .get("https://example.test/q", &Params::new())
            .await
            .expect("third request");

        assert_eq!(transport.recorded_requests().len(), 2);
    }

    #[tokio::test]
    async fn bypass_mode_neither_reads_nor_writes_the_cache() {
        let dir = tempfile::tempdir().expect("tempdir");
        let transport = Arc::new(RecordingHttpClient::success(r#"{"n":1}"#));
        let executor = caching_executor(transport.clone(), dir.path());

        executor
            .get_with("https://example.test/q", &Params::new(), CacheMode::Bypass)
            .await
            .expect("first request");
        executor
            .get("https://example.test/q", &Params::new())
            .await
            .expect("second request");

        assert_eq!(transport.recorded_requests().len(), 2);
    }

    #[tokio::test]
    async fn error_responses_are_not_cached() {
        let dir = tempfile::tempdir().expect("tempdir");
        let transport = Arc::new(RecordingHttpClient::with_response(Ok(
            HttpResponse::with_status(500, "oops"),
        )));
        let executor = caching_executor(transport.clone(), dir.path());

        for _ in 0..2 {
            executor
                .get("https://example.test/q", &Params::new())
                .await
                .expect_err("500 fails");
        }

        assert_eq!(transport.recorded_requests().len(), 2);
    }

    #[tokio::test]
    async fn post_json_sets_content_type_and_serializes_payload() {
        let transport = Arc::new(RecordingHttpClient::success(r#"{"data":{}}"#));
        let executor = executor(transport.clone());

        executor
            .post(
                "https://example.test/query",
                &RequestBody::Json(json!({"query": "{ products { resultCount } }"})),
            )
            .await
            .expect("request succeeds");

        let recorded = transport.recorded_requests();
        let request = &recorded[0];
        assert_eq!(
            request.headers.get("content-type").map(String::as_str),
            Some("application/json")
        );
        assert_eq!(
            request.body.as_deref(),
            Some(r#"{"query":"{ products { resultCount } }"}"#)
        );
    }

    #[tokio::test]
    async fn post_form_urlencodes_pairs() {
        let transport = Arc::new(RecordingHttpClient::success("{}"));
        let executor = executor(transport.clone());

        executor
            .post(
                "https://example.test/token",
                &RequestBody::Form(params(&[("grant_type", "client credentials")])),
            )
            .await
            .expect("request succeeds");

        let recorded = transport.recorded_requests();
        let request = &recorded[0];
        assert_eq!(
            request.headers.get("content-type").map(String::as_str),
            Some("application/x-www-form-urlencoded")
        );
        assert_eq!(request.body.as_deref(), Some("grant_type=client%20credentials"));
    }

    #[tokio::test]
    async fn identical_posts_share_a_cache_entry_but_different_payloads_do_not() {
        let dir = tempfile::tempdir().expect("tempdir");
        let transport = Arc::new(RecordingHttpClient::success(r#"{"data":{}}"#));
        let executor = caching_executor(transport.clone(), dir.path());
        let first_body = RequestBody::Json(json!({"query": "{ a }"}));
        let second_body = RequestBody::Json(json!({"query": "{ b }"}));

        executor
            .post("https://example.test/query", &first_body)
            .await
            .expect("first request");
        executor
            .post("https://example.test/query", &first_body)
            .await
            .expect("repeat request");
        executor
            .post("https://example.test/query", &second_body)
            .await
            .expect("different payload");

        assert_eq!(transport.recorded_requests().len(), 2);
    }
}

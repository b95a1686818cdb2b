//! Shared test support: a recording transport stub and client builders.

// Each integration test binary compiles its own copy and uses a subset.
#![allow(dead_code)]

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use cjkit_core::{CjClient, ClientConfig, HttpClient, HttpError, HttpRequest, HttpResponse};

/// Transport stub that records every request and replays one canned
/// response.
pub struct RecordingHttpClient {
    response: Result<HttpResponse, HttpError>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl RecordingHttpClient {
    pub fn with_response(response: Result<HttpResponse, HttpError>) -> Self {
        Self {
            response,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn json(body: &str) -> Self {
        Self::with_response(Ok(HttpResponse::ok_json(body)))
    }

    pub fn xml(body: &str) -> Self {
        Self::with_response(Ok(HttpResponse::ok_xml(body)))
    }

    pub fn status(status: u16, body: &str) -> Self {
        Self::with_response(Ok(HttpResponse::with_status(status, body)))
    }

    pub fn failing(message: &str) -> Self {
        Self::with_response(Err(HttpError::new(message)))
    }

    pub fn recorded_requests(&self) -> Vec<HttpRequest> {
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

pub fn test_config() -> ClientConfig {
    ClientConfig::new("token-123", "1234567", "7654321").expect("valid test credentials")
}

pub fn client_over(config: &ClientConfig, transport: Arc<RecordingHttpClient>) -> CjClient {
    CjClient::with_transport(config, transport).expect("client builds")
}

use serde_json::Value;
use thiserror::Error;

/// Errors surfaced by the CJ API client.
///
/// Every variant is terminal for the call that produced it; nothing is
/// retried internally and no partial result accompanies an error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Missing or malformed client configuration.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// A required request parameter was missing or invalid; no HTTP
    /// exchange took place.
    #[error("invalid request: {message}")]
    InvalidRequest { message: String },

    /// The upstream returned a zero-length body. This happens on some
    /// authentication failures even with a 2xx status, so it is reported
    /// separately from decode failures.
    #[error("empty response from API (HTTP {http_code}); check your credentials and API permissions")]
    EmptyResponse {
        http_code: u16,
        content_type: Option<String>,
    },

    /// The upstream returned a non-2xx status. `message` carries the text
    /// extracted from the error body plus remediation guidance for common
    /// status codes.
    #[error("HTTP {http_code}: {message}")]
    HttpStatus {
        http_code: u16,
        message: String,
        raw_response: String,
        content_type: Option<String>,
    },

    /// The response body could not be decoded as JSON or XML.
    #[error("failed to decode response: {message}")]
    Decode {
        message: String,
        raw_response: String,
        content_type: Option<String>,
    },

    /// The HTTP exchange itself failed (DNS, connect, timeout). There is
    /// no status code for these.
    #[error("transport error: {message}")]
    Transport { message: String },
}

impl ApiError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// HTTP status code, where one was received.
    pub const fn http_code(&self) -> Option<u16> {
        match self {
            Self::EmptyResponse { http_code, .. } | Self::HttpStatus { http_code, .. } => {
                Some(*http_code)
            }
            _ => None,
        }
    }

    /// Content type reported by the upstream, where one was received.
    pub fn content_type(&self) -> Option<&str> {
        match self {
            Self::EmptyResponse { content_type, .. }
            | Self::HttpStatus { content_type, .. }
            | Self::Decode { content_type, .. } => content_type.as_deref(),
            _ => None,
        }
    }

    /// Raw response snippet kept for diagnostics (truncated to 500 chars).
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Self::HttpStatus { raw_response, .. } | Self::Decode { raw_response, .. } => {
                Some(raw_response)
            }
            _ => None,
        }
    }
}

const MESSAGE_SNIPPET_CHARS: usize = 200;
pub(crate) const RAW_SNIPPET_CHARS: usize = 500;

/// Classify a non-2xx response into an [`ApiError::HttpStatus`].
///
/// Pure function: extracts a human-readable message from the error body and
/// appends remediation guidance for the status codes CJ commonly returns.
pub fn classify(status: u16, body: &str, content_type: Option<&str>) -> ApiError {
    let message = extract_message(body);
    let guidance = guidance_for(status, &message);

    ApiError::HttpStatus {
        http_code: status,
        message: format!("{message}{guidance}"),
        raw_response: truncate_chars(body, RAW_SNIPPET_CHARS),
        content_type: content_type.map(str::to_owned),
    }
}

/// Pull the most useful message out of an error body. JSON objects are
/// probed for the keys CJ uses; anything else falls back to a truncated
/// copy of the raw body.
fn extract_message(body: &str) -> String {
    if body.trim().is_empty() {
        return String::from("Request failed");
    }
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => ["message", "error", "error_description"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .map(str::to_owned)
            .unwrap_or_else(|| truncate_chars(body, MESSAGE_SNIPPET_CHARS)),
        _ => truncate_chars(body, MESSAGE_SNIPPET_CHARS),
    }
}

fn guidance_for(status: u16, message: &str) -> &'static str {
    match status {
        400 => {
            let lower = message.to_ascii_lowercase();
            if lower.contains("not authorized") && lower.contains("cid") {
                " Your access token was not generated for this publisher ID. \
                 Verify your publisher ID in the CJ Members portal, generate a new token at \
                 https://developers.cj.com/ while logged in with the matching account, and \
                 make sure the account that generated the token matches your publisher ID."
            } else {
                " Invalid parameters or request format. Check the error message for details."
            }
        }
        401 => {
            " Your access token is invalid or expired. \
             Generate a new token at https://developers.cj.com/"
        }
        403 => " Your account may not have API access or permission. Contact CJ Affiliate support.",
        404 => " The API endpoint was not found. Please check the SDK version.",
        406 => {
            " The API rejected the request format. This may indicate an invalid access token \
             format, missing required headers, or an API version mismatch."
        }
        code if code >= 500 => " CJ API is experiencing issues. Please try again later.",
        _ => "",
    }
}

/// Truncate on a char boundary, appending an ellipsis when shortened.
pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_owned()
    } else {
        let mut truncated: String = text.chars().take(max).collect();
        truncated.push_str("...");
        truncated
    }
}

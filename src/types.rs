use http::StatusCode;
use serde::Serialize;
use std::fmt::Display;
use std::time::Duration;
use url::Url;

/// Outcome of fetching a single URL.
///
/// Exactly one `FetchResult` is produced per requested URL, at the end of
/// that URL's request attempt, and it is immutable thereafter.
///
/// A `status_code` of `0` means no HTTP response was obtained at all
/// (DNS error, connection refused, timeout, ...). In that case, and only
/// in that case, `error_message` carries the failure description. A 4xx
/// or 5xx response is a failure too (`success == false`), but it carries
/// no error message since the status code already tells the story.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchResult {
    /// The requested URL (in parsed, normalized form)
    pub url: String,
    /// Full response body; empty if the request failed
    pub body: String,
    /// Seconds from issuing the request to determining the outcome
    pub elapsed_secs: f64,
    /// HTTP status code, or `0` if no response was obtained
    pub status_code: u16,
    /// Whether a response was obtained with a status below 400
    pub success: bool,
    /// Transport failure description; `None` for any completed exchange
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl FetchResult {
    /// Result for a completed HTTP exchange, whatever the status code.
    pub fn completed(url: &Url, status: StatusCode, body: String, elapsed: Duration) -> Self {
        FetchResult {
            url: url.as_str().to_string(),
            body,
            elapsed_secs: elapsed.as_secs_f64(),
            status_code: status.as_u16(),
            success: status.as_u16() < 400,
            error_message: None,
        }
    }

    /// Result for a request that never yielded an HTTP response.
    pub fn errored<E: Display>(url: &Url, error: E, elapsed: Duration) -> Self {
        FetchResult {
            url: url.as_str().to_string(),
            body: String::new(),
            elapsed_secs: elapsed.as_secs_f64(),
            status_code: 0,
            success: false,
            error_message: Some(error.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    /// No HTTP response was obtained for this URL
    pub fn is_transport_failure(&self) -> bool {
        self.status_code == 0
    }

    /// A response was obtained, but its status code was 4xx/5xx
    pub fn is_http_failure(&self) -> bool {
        self.status_code >= 400
    }
}

impl Display for FetchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_transport_failure() {
            write!(
                f,
                "⚡ {} ({}) after {:.2}s",
                self.url,
                self.error_message.as_deref().unwrap_or("unknown error"),
                self.elapsed_secs
            )
        } else if self.success {
            write!(
                f,
                "✅ {} [{}] ({} bytes in {:.2}s)",
                self.url,
                self.status_code,
                self.body.len(),
                self.elapsed_secs
            )
        } else {
            write!(
                f,
                "🚫 {} [{}] after {:.2}s",
                self.url, self.status_code, self.elapsed_secs
            )
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn url(s: &str) -> Url {
        Url::parse(s).expect("Expected valid URL")
    }

    #[test]
    fn test_completed_ok() {
        let result = FetchResult::completed(
            &url("https://example.com"),
            StatusCode::OK,
            "hello".to_string(),
            Duration::from_millis(120),
        );
        assert!(result.success);
        assert_eq!(result.status_code, 200);
        assert_eq!(result.body, "hello");
        assert_eq!(result.error_message, None);
        assert!(result.elapsed_secs > 0.0);
    }

    #[test]
    fn test_redirect_status_counts_as_success() {
        let result = FetchResult::completed(
            &url("https://example.com"),
            StatusCode::MOVED_PERMANENTLY,
            String::new(),
            Duration::from_millis(1),
        );
        assert!(result.success);
        assert_eq!(result.status_code, 301);
    }

    #[test]
    fn test_completed_http_failure_has_no_message() {
        let result = FetchResult::completed(
            &url("https://example.com/missing"),
            StatusCode::NOT_FOUND,
            String::new(),
            Duration::from_millis(5),
        );
        assert!(!result.success);
        assert!(result.is_http_failure());
        assert!(!result.is_transport_failure());
        assert_eq!(result.status_code, 404);
        assert_eq!(result.error_message, None);
    }

    #[test]
    fn test_errored() {
        let result = FetchResult::errored(
            &url("http://127.0.0.1:1"),
            "connection refused",
            Duration::from_millis(2),
        );
        assert!(!result.success);
        assert!(result.is_transport_failure());
        assert_eq!(result.status_code, 0);
        assert_eq!(result.body, "");
        assert_eq!(result.error_message.as_deref(), Some("connection refused"));
    }

    #[test]
    fn test_json_skips_absent_error_message() {
        let result = FetchResult::completed(
            &url("https://example.com"),
            StatusCode::OK,
            String::new(),
            Duration::from_millis(1),
        );
        let json = serde_json::to_string(&result).expect("Expected serializable result");
        assert!(!json.contains("error_message"));
    }
}

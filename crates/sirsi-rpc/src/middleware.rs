// crates/sirsi-rpc/src/middleware.rs
//
// Middleware for the RPC server: logging interceptor and per-request
// deadline parsing.

use std::time::Duration;

use tonic::{Request, Status};

use sirsi_core::error::AdminError;

/// Header carrying the caller's deadline in milliseconds.
pub const TIMEOUT_HEADER: &str = "connect-timeout-ms";

/// Logging interceptor for incoming requests.
///
/// Logs the metadata of each request using the `tracing` crate. Never
/// rejects: there is no authentication layer.
pub fn logging_interceptor(req: Request<()>) -> Result<Request<()>, Status> {
    tracing::debug!("Incoming RPC request: {:?}", req.metadata());
    Ok(req)
}

/// Resolve the deadline for one request.
///
/// Uses the `connect-timeout-ms` header when present, otherwise `default`.
/// A header that is not a positive integer is a `Validation` error.
pub fn request_timeout(
    headers: &http::HeaderMap,
    default: Duration,
) -> Result<Duration, AdminError> {
    let Some(raw) = headers.get(TIMEOUT_HEADER) else {
        return Ok(default);
    };
    raw.to_str()
        .ok()
        .and_then(|s| s.trim().parse::<u64>().ok())
        .filter(|ms| *ms > 0)
        .map(Duration::from_millis)
        .ok_or_else(|| {
            AdminError::Validation(format!("Invalid {} header: {:?}", TIMEOUT_HEADER, raw))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{HeaderMap, HeaderValue};

    const DEFAULT: Duration = Duration::from_secs(5);

    #[test]
    fn test_absent_header_uses_default() {
        assert_eq!(request_timeout(&HeaderMap::new(), DEFAULT).unwrap(), DEFAULT);
    }

    #[test]
    fn test_header_overrides_default() {
        let mut headers = HeaderMap::new();
        headers.insert(TIMEOUT_HEADER, HeaderValue::from_static("250"));
        assert_eq!(
            request_timeout(&headers, DEFAULT).unwrap(),
            Duration::from_millis(250)
        );
    }

    #[test]
    fn test_garbage_header_is_rejected() {
        for bad in ["soon", "-5", "0", ""] {
            let mut headers = HeaderMap::new();
            headers.insert(TIMEOUT_HEADER, HeaderValue::from_static(bad));
            assert!(
                matches!(request_timeout(&headers, DEFAULT), Err(AdminError::Validation(_))),
                "header {:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_interceptor_passes_requests_through() {
        assert!(logging_interceptor(Request::new(())).is_ok());
    }
}

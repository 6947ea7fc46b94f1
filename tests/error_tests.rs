// Error handling tests

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_relay::error::ProxyError;

#[test]
fn test_error_display_messages() {
    let errors = vec![
        ProxyError::Config("empty host".to_string()),
        ProxyError::PayloadTooLarge { limit: 1024 },
        ProxyError::BodyRead("stream reset".to_string()),
        ProxyError::Upstream("connection refused".to_string()),
        ProxyError::UpstreamTimeout,
        ProxyError::InterceptContract("bad payload".to_string()),
        ProxyError::ContentLengthMismatch {
            promised: 5,
            actual: 6,
        },
        ProxyError::CacheIo("disk full".to_string()),
        ProxyError::Internal("double write".to_string()),
    ];

    for error in errors {
        let display = format!("{}", error);
        assert!(!display.is_empty(), "Error should have display message");
    }
}

#[test]
fn test_config_error() {
    let error = ProxyError::Config("upstream host must not be empty".to_string());
    assert!(format!("{}", error).contains("must not be empty"));
}

#[test]
fn test_payload_too_large_reports_limit() {
    let error = ProxyError::PayloadTooLarge { limit: 1048576 };
    assert!(format!("{}", error).contains("1048576"));
}

#[test]
fn test_content_length_mismatch_reports_both_lengths() {
    let error = ProxyError::ContentLengthMismatch {
        promised: 5,
        actual: 11,
    };
    let display = format!("{}", error);
    assert!(display.contains('5'));
    assert!(display.contains("11"));
}

#[test]
fn test_status_code_mapping() {
    let cases = vec![
        (
            ProxyError::Config("x".to_string()),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
        (
            ProxyError::PayloadTooLarge { limit: 8 },
            StatusCode::PAYLOAD_TOO_LARGE,
        ),
        (ProxyError::BodyRead("x".to_string()), StatusCode::BAD_REQUEST),
        (ProxyError::Upstream("x".to_string()), StatusCode::BAD_GATEWAY),
        (ProxyError::UpstreamTimeout, StatusCode::GATEWAY_TIMEOUT),
        (
            ProxyError::CacheIo("x".to_string()),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
        (
            ProxyError::ContentLengthMismatch {
                promised: 1,
                actual: 2,
            },
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
    ];

    for (error, expected) in cases {
        assert_eq!(error.into_response().status(), expected);
    }
}

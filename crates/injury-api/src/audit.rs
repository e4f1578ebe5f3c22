//! Security audit logging
//!
//! Rejected credentials and rate-limit hits are logged at WARN level with the
//! "audit" target, so they can be filtered and routed separately.
//!
//! Author: hephaex@gmail.com

use axum::http::HeaderMap;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Security events raised at the HTTP edge
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum AuditEvent {
    /// Request carried no credential header
    MissingCredential {
        ip_address: Option<String>,
        path: String,
    },

    /// Plain API token did not match the configured token
    InvalidApiToken {
        ip_address: Option<String>,
        path: String,
    },

    /// Signed token failed validation
    InvalidToken {
        ip_address: Option<String>,
        path: String,
        reason: String,
    },

    /// Client exceeded its request window
    RateLimitExceeded {
        client: String,
        path: String,
        retry_after_secs: u64,
    },
}

/// Log an audit event
pub fn audit_log(event: &AuditEvent) {
    let timestamp = Utc::now();

    let event_json = serde_json::to_string(event)
        .unwrap_or_else(|e| format!("{{\"error\":\"Failed to serialize audit event: {e}\"}}"));

    match event {
        AuditEvent::MissingCredential { ip_address, path } => {
            warn!(
                target: "audit",
                timestamp = %timestamp,
                event = %event_json,
                ip_address = ?ip_address,
                path = %path,
                "Request without credential rejected"
            );
        }
        AuditEvent::InvalidApiToken { ip_address, path } => {
            warn!(
                target: "audit",
                timestamp = %timestamp,
                event = %event_json,
                ip_address = ?ip_address,
                path = %path,
                "Invalid API token rejected"
            );
        }
        AuditEvent::InvalidToken {
            ip_address,
            path,
            reason,
        } => {
            warn!(
                target: "audit",
                timestamp = %timestamp,
                event = %event_json,
                ip_address = ?ip_address,
                path = %path,
                reason = %reason,
                "Invalid signed token rejected"
            );
        }
        AuditEvent::RateLimitExceeded {
            client,
            path,
            retry_after_secs,
        } => {
            warn!(
                target: "audit",
                timestamp = %timestamp,
                event = %event_json,
                client = %client,
                path = %path,
                retry_after_secs,
                "Rate limit exceeded"
            );
        }
    }
}

/// Extract the client IP address from proxy headers
///
/// Checks `X-Forwarded-For` (first hop) and then `X-Real-IP`. Callers must
/// only trust the result behind a proxy that sets these headers.
pub fn extract_ip_address(headers: &HeaderMap) -> Option<String> {
    if let Some(xff) = headers.get("x-forwarded-for") {
        if let Ok(xff_str) = xff.to_str() {
            if let Some(first_ip) = xff_str.split(',').next() {
                let first_ip = first_ip.trim();
                if !first_ip.is_empty() {
                    return Some(first_ip.to_string());
                }
            }
        }
    }

    if let Some(real_ip) = headers.get("x-real-ip") {
        if let Ok(ip_str) = real_ip.to_str() {
            return Some(ip_str.trim().to_string());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_audit_event_serialization() {
        let event = AuditEvent::InvalidApiToken {
            ip_address: Some("192.168.1.1".to_string()),
            path: "/busca/grau-ferimento".to_string(),
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("invalid_api_token"));
        assert!(json.contains("192.168.1.1"));
    }

    #[test]
    fn test_audit_log_does_not_panic() {
        audit_log(&AuditEvent::RateLimitExceeded {
            client: "10.0.0.1".to_string(),
            path: "/busca/partes-corpo-afetadas".to_string(),
            retry_after_secs: 30,
        });
    }

    #[test]
    fn test_extract_ip_address() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_ip_address(&headers), None);

        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.2"));
        assert_eq!(extract_ip_address(&headers), Some("10.0.0.2".to_string()));

        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );
        assert_eq!(
            extract_ip_address(&headers),
            Some("203.0.113.7".to_string())
        );
    }
}

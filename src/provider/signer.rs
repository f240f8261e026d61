//! Request signing
//!
//! Every call carries the API key, the request date, and an HMAC-SHA1 of the
//! request date keyed with the account's shared secret. The date string is
//! the only signed payload.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use sha1::Sha1;

use super::types::ProviderCredentials;
use crate::error::{DnsMadeEasyError, Result};

type HmacSha1 = Hmac<Sha1>;

pub const API_KEY_HEADER: &str = "x-dnsme-apikey";
pub const REQUEST_DATE_HEADER: &str = "x-dnsme-requestdate";
pub const HMAC_HEADER: &str = "x-dnsme-hmac";

/// Format a timestamp as the provider expects, e.g. `Mon, 2 Jan 2006 15:04:05 UTC`
pub fn request_date(now: DateTime<Utc>) -> String {
    now.format("%a, %-d %b %Y %H:%M:%S UTC").to_string()
}

/// Hex-encoded HMAC-SHA1 of `request_date` keyed by `secret`
pub fn sign(secret: &str, request_date: &str) -> Result<String> {
    let mut mac = HmacSha1::new_from_slice(secret.as_bytes())
        .map_err(|e| DnsMadeEasyError::Configuration(format!("invalid HMAC key: {}", e)))?;
    mac.update(request_date.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Authentication headers for a request issued at `now`
pub fn auth_headers(credentials: &ProviderCredentials, now: DateTime<Utc>) -> Result<HeaderMap> {
    let date = request_date(now);
    let signature = sign(&credentials.secret_key, &date)?;

    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static(API_KEY_HEADER),
        header_value("api-key", &credentials.api_key)?,
    );
    headers.insert(
        HeaderName::from_static(REQUEST_DATE_HEADER),
        header_value("request date", &date)?,
    );
    headers.insert(
        HeaderName::from_static(HMAC_HEADER),
        header_value("hmac", &signature)?,
    );
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    Ok(headers)
}

fn header_value(what: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|_| {
        DnsMadeEasyError::Configuration(format!("{} is not a valid header value", what))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2006, 1, 2, 15, 4, 5).unwrap()
    }

    #[test]
    fn test_request_date_format() {
        assert_eq!(request_date(fixed_time()), "Mon, 2 Jan 2006 15:04:05 UTC");

        let later = Utc.with_ymd_and_hms(2024, 11, 23, 8, 0, 9).unwrap();
        assert_eq!(request_date(later), "Sat, 23 Nov 2024 08:00:09 UTC");
    }

    #[test]
    fn test_signature_known_vector() {
        // RFC 2202 test case 2
        assert_eq!(
            sign("Jefe", "what do ya want for nothing?").unwrap(),
            "effcdf6ae5eb2fa2d27416d5f184df9c259a7c79"
        );
    }

    #[test]
    fn test_signature_deterministic() {
        let date = request_date(fixed_time());
        let a = sign("shared-secret", &date).unwrap();
        let b = sign("shared-secret", &date).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 40);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_signature_changes_with_inputs() {
        let date = request_date(fixed_time());
        let other_date = request_date(fixed_time() + chrono::Duration::seconds(1));

        let base = sign("shared-secret", &date).unwrap();
        assert_ne!(base, sign("other-secret", &date).unwrap());
        assert_ne!(base, sign("shared-secret", &other_date).unwrap());
    }

    #[test]
    fn test_auth_headers() {
        let creds = ProviderCredentials {
            api_key: "api-key-123".into(),
            secret_key: "shared-secret".into(),
            api_url: "http://localhost".into(),
            zone_name: "example.com".into(),
        };

        let headers = auth_headers(&creds, fixed_time()).unwrap();
        assert_eq!(headers.get(API_KEY_HEADER).unwrap(), "api-key-123");
        assert_eq!(
            headers.get(REQUEST_DATE_HEADER).unwrap(),
            "Mon, 2 Jan 2006 15:04:05 UTC"
        );
        assert_eq!(
            headers.get(HMAC_HEADER).unwrap().to_str().unwrap(),
            sign("shared-secret", "Mon, 2 Jan 2006 15:04:05 UTC").unwrap()
        );
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
    }

    #[test]
    fn test_invalid_api_key_rejected() {
        let creds = ProviderCredentials {
            api_key: "bad\nkey".into(),
            secret_key: "secret".into(),
            api_url: "http://localhost".into(),
            zone_name: "example.com".into(),
        };
        assert!(auth_headers(&creds, fixed_time()).unwrap_err().is_configuration());
    }
}

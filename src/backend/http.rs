//! Request helpers shared by the row-store and identity clients.

use gloo_net::http::{RequestBuilder, Response};

use crate::config::RemoteConfig;
use crate::error::{AppError, Result};

/// Adds the project key and, when signed in, the bearer token.
pub fn authorized(builder: RequestBuilder, config: &RemoteConfig, token: Option<&str>) -> RequestBuilder {
    let bearer = format!("Bearer {}", token.unwrap_or(&config.anon_key));
    builder
        .header("apikey", &config.anon_key)
        .header("Authorization", &bearer)
}

pub fn eq_filter(value: impl std::fmt::Display) -> String {
    format!("eq.{}", value)
}

/// Turns a non-2xx answer into `AppError::Remote`, using whichever message
/// field the service put in its JSON body.
pub fn remote_error(status: u16, body: &str) -> AppError {
    if status == 401 {
        return AppError::Unauthorized;
    }
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| {
            ["message", "msg", "error_description", "error"]
                .iter()
                .find_map(|key| json.get(*key).and_then(|v| v.as_str()).map(str::to_string))
        })
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                format!("HTTP {}", status)
            } else {
                body.trim().to_string()
            }
        });
    AppError::Remote { status, message }
}

pub async fn ensure_ok(resp: Response) -> Result<Response> {
    if resp.ok() {
        return Ok(resp);
    }
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    Err(remote_error(status, &body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eq_filter() {
        assert_eq!(eq_filter("abc-123"), "eq.abc-123");
        assert_eq!(eq_filter(42), "eq.42");
    }

    #[test]
    fn test_remote_error_picks_message_field() {
        let err = remote_error(400, r#"{"code":"PGRST204","message":"column missing"}"#);
        assert_eq!(
            err,
            AppError::Remote { status: 400, message: "column missing".to_string() }
        );

        let err = remote_error(400, r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#);
        assert_eq!(
            err,
            AppError::Remote { status: 400, message: "Invalid login credentials".to_string() }
        );

        let err = remote_error(422, r#"{"code":422,"msg":"User already registered"}"#);
        assert_eq!(err.user_message(), "User already registered");
    }

    #[test]
    fn test_remote_error_without_json() {
        assert_eq!(
            remote_error(502, ""),
            AppError::Remote { status: 502, message: "HTTP 502".to_string() }
        );
        assert_eq!(
            remote_error(500, " upstream down "),
            AppError::Remote { status: 500, message: "upstream down".to_string() }
        );
        assert_eq!(remote_error(401, "{}"), AppError::Unauthorized);
    }
}

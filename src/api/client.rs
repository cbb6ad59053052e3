use serde_json::Value;
use yansi::Paint;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::RegionError;

static SILENT: AtomicBool = AtomicBool::new(false);

pub fn set_silent(silent: bool) {
    SILENT.store(silent, Ordering::Relaxed);
}

fn log_output(msg: String) {
    if !SILENT.load(Ordering::Relaxed) {
        eprintln!("{}", msg);
    }
}

fn log_request(method: &str, url: &str, bearer: bool, body: Option<&Value>) {
    let mut parts = Vec::new();
    parts.push(Paint::new("curl").fg(yansi::Color::Green).bold().to_string());
    parts.push(format!("-X {}", Paint::new(method).fg(yansi::Color::Yellow).bold()));
    parts.push(format!("'{}'", Paint::new(url).fg(yansi::Color::Cyan)));

    if bearer {
        // never echo the token itself
        parts.push(format!("{} {}",
            Paint::new("-H").fg(yansi::Color::Magenta),
            Paint::new("'Authorization: Bearer ***'").fg(yansi::Color::Magenta)
        ));
    }
    if let Some(d) = body {
        let json_str = serde_json::to_string_pretty(d).unwrap_or_default();
        let escaped_json = json_str.replace('\'', "'\\''");
        parts.push(format!("{} {}",
            Paint::new("-H").fg(yansi::Color::Magenta),
            Paint::new("'Content-Type: application/json'").fg(yansi::Color::Magenta)
        ));
        parts.push(format!("{} {}",
            Paint::new("-d").fg(yansi::Color::Blue),
            Paint::new(format!("'{}'", escaped_json)).fg(yansi::Color::White)
        ));
    }
    log_output(format!("Request:\n{}", parts.join(" ")));
}

/// Core HTTP call used by both the backend and geocoder clients.
///
/// Echoes a curl-equivalent of the request (unless silenced), sends it, and
/// decodes the JSON body. An empty success body decodes to `Value::Null`.
pub async fn api_call(
    client: &reqwest::Client,
    base_url: &str,
    token: &str,
    method: &str,
    endpoint: &str,
    body: Option<Value>,
    params: Option<Vec<(String, String)>>,
) -> Result<Value, RegionError> {
    let url = format!("{}{}", base_url, endpoint);
    let mut url_for_log = url.clone();
    if let Some(ref p) = params {
        if !p.is_empty() {
            url_for_log = format!("{}?{}", url_for_log, crate::utils::build_query_string(p));
        }
    }
    log_request(method, &url_for_log, !token.is_empty(), body.as_ref());

    let mut req = match method {
        "POST" => client.post(&url),
        "PUT" => client.put(&url),
        "DELETE" => client.delete(&url),
        _ => client.get(&url),
    };
    if !token.is_empty() {
        req = req.header("Authorization", format!("Bearer {}", token));
    }
    if let Some(ref p) = params {
        req = req.query(p);
    }
    if let Some(ref b) = body {
        req = req.json(b);
    }

    let response = req.send().await.map_err(|e| {
        tracing::warn!(%e, method, endpoint, "Request failed");
        RegionError::Network(e.to_string())
    })?;

    let status = response.status();
    let text = response.text().await.map_err(|e| RegionError::Network(e.to_string()))?;

    // Grayed out so the request line stays readable
    log_output(format!(
        "Response ({}):\n{}",
        status.as_u16(),
        Paint::new(&text).rgb(100, 100, 100)
    ));

    if !status.is_success() {
        tracing::debug!(status = status.as_u16(), endpoint, "Non-success response");
        return Err(RegionError::Api {
            status: status.as_u16(),
            body: text,
        });
    }

    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&text).map_err(|e| RegionError::Decode(e.to_string()))
}

/// Unwrap the `{ "data": ... }` envelope some backends use.
pub fn unwrap_data(payload: Value) -> Value {
    match payload {
        Value::Object(mut obj) if obj.contains_key("data") => {
            obj.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Build the shared HTTP client with the crate's user agent and timeout.
pub fn build_http_client() -> Result<reqwest::Client, RegionError> {
    reqwest::Client::builder()
        .user_agent(format!("dz/{} (delivery-zones)", env!("CARGO_PKG_VERSION")))
        .timeout(std::time::Duration::from_secs(30))
        .build()
        .map_err(|e| RegionError::Network(format!("Failed to create HTTP client: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwrap_data_envelope() {
        let wrapped = serde_json::json!({"code": "OKAY", "data": [1, 2]});
        assert_eq!(unwrap_data(wrapped), serde_json::json!([1, 2]));
        let bare = serde_json::json!([3]);
        assert_eq!(unwrap_data(bare), serde_json::json!([3]));
    }
}

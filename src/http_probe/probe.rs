use std::time::{Duration, Instant};

use chrono::Utc;
use serde_json::Value;
use url::Url;

use super::prelude::*;

pub const STATUS_PATH: &str = "/status";
const EXPECTED_STATUS: &str = "ok";

/// Builds `http://{host}:{port}/status`.
/// `host` must be a bare host name or IP literal; paths, userinfo and ports in it are rejected.
pub fn status_url(host: &str, port: u16) -> Result<Url, url::ParseError> {
    // set_host silently drops anything after a ':' outside an IPv6 literal
    if !host.starts_with('[') && host.contains(':') {
        return Err(url::ParseError::InvalidDomainCharacter);
    }
    let mut url = Url::parse("http://localhost")?;
    url.set_host(Some(host))?;
    // only fails for URLs that cannot carry a port, which an http URL with a host always can
    url.set_port(Some(port)).map_err(|()| url::ParseError::EmptyHost)?;
    url.set_path(STATUS_PATH);
    Ok(url)
}

/// HTTP client for the probe. Without a timeout a hung server hangs the probe.
pub fn build_client(timeout: Option<Duration>) -> reqwest::Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        .user_agent(concat!("statusprobe/", env!("CARGO_PKG_VERSION")))
        .no_proxy();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build()
}

/// Decides the outcome for a fully read response body.
///
/// `null` counts as an invalid body since it has no fields to look at. Any
/// other JSON value without a `status` string equal to `"ok"` is wrong data.
pub fn classify_body(body: &str) -> Outcome {
    match serde_json::from_str::<Value>(body) {
        Err(_) | Ok(Value::Null) => Outcome::Fail(ProbeError::InvalidBody),
        Ok(json) => match json.get("status").and_then(Value::as_str) {
            Some(EXPECTED_STATUS) => Outcome::Pass,
            _ => Outcome::Fail(ProbeError::WrongValue),
        },
    }
}

/// Issues one GET against `url` and classifies the response.
pub async fn probe_status(client: &reqwest::Client, url: &Url) -> ProbeResult {
    let start = Instant::now();
    let mut http_status = None;
    let mut raw_body = None;

    let outcome = match client.get(url.clone()).send().await {
        Ok(resp) => {
            http_status = Some(resp.status().as_u16());
            log::debug!("{url} answered {} ({:?})", resp.status(), resp.version());
            match resp.text().await {
                Ok(body) => {
                    let outcome = classify_body(&body);
                    raw_body = Some(body);
                    outcome
                }
                Err(e) => Outcome::connection(report(&e)),
            }
        }
        Err(e) => Outcome::connection(report(&e)),
    };

    ProbeResult {
        url: url.to_string(),
        outcome,
        raw_body,
        http_status,
        elapsed: start.elapsed(),
        finished_at: Utc::now(),
    }
}

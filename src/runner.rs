use std::fmt;
use std::io::Write;
use std::net::SocketAddr;
use std::time::Instant;

use chrono::Utc;
use tokio::time::sleep;

use crate::config::ProbeConfig;
use crate::http_probe::prelude::*;
use crate::server::App;

/// Boots `app`, probes its status endpoint once and closes it again.
///
/// Status lines go to `out`; the server is closed before this returns, so the
/// caller can exit right away with [`ProbeResult::exit_code`].
pub async fn run<A: App, W: Write>(app: &A, config: &ProbeConfig, out: &mut W) -> ProbeResult {
    let started = Instant::now();
    let bind_addr = SocketAddr::new(config.bind_address, config.port);

    let server = match app.listen(bind_addr).await {
        Ok(server) => server,
        Err(e) => {
            log::error!("Failed to start server on {bind_addr}: {e}");
            emit(out, format_args!("✗ Server failed to start: {e}"));
            let outcome = Outcome::connection(report(&e));
            return failed_result(config, config.port, outcome, started);
        }
    };
    let port = server.local_addr().port();

    sleep(config.warmup()).await;

    emit(out, format_args!("Running tests..."));
    let result = match status_url(&config.host, port) {
        Ok(url) => match build_client(config.request_timeout()) {
            Ok(client) => probe_status(&client, &url).await,
            Err(e) => failed_result(config, port, Outcome::connection(report(&e)), started),
        },
        Err(e) => failed_result(config, port, Outcome::connection(report(&e)), started),
    };

    emit(out, format_args!("{}", result.outcome));
    log_result(&result);

    sleep(config.shutdown_delay()).await;
    server.close().await;

    result
}

/// Writes one status line. A failed write is logged, never fatal.
fn emit<W: Write>(out: &mut W, line: fmt::Arguments<'_>) {
    if let Err(e) = writeln!(out, "{line}").and_then(|()| out.flush()) {
        log::warn!("Failed to write status line {:?}: {e}", line.to_string());
    }
}

fn failed_result(config: &ProbeConfig, port: u16, outcome: Outcome, started: Instant) -> ProbeResult {
    ProbeResult {
        url: format!("http://{}:{}{}", config.host, port, STATUS_PATH),
        outcome,
        raw_body: None,
        http_status: None,
        elapsed: started.elapsed(),
        finished_at: Utc::now(),
    }
}

fn log_result(result: &ProbeResult) {
    if result.outcome.is_pass() {
        log::info!(
            "{} passed in {:.2}ms at {}",
            result.url,
            result.elapsed.as_secs_f64() * 1000.0,
            result.finished_at.to_rfc3339()
        );
    } else {
        log::warn!(
            "{} failed after {:.2}ms: status {:?}, body {:?}",
            result.url,
            result.elapsed.as_secs_f64() * 1000.0,
            result.http_status,
            result.body_preview().unwrap_or("<none>")
        );
    }
}

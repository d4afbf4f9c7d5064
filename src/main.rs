use std::io::Write;
use std::process::ExitCode;

use statusprobe::config::{ConfigError, load_config};
use statusprobe::server::StatusApp;

fn init_logging() {
    let filter = std::env::var("STATUSPROBE_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_new(&filter)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(env_filter)
        .init();
}

fn report_config_error<W: Write>(err: &ConfigError, out: &mut W) {
    let _ = writeln!(out, "✗ Invalid configuration: {err}");
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_logging();

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {e}");
            report_config_error(&e, &mut std::io::stderr());
            return ExitCode::FAILURE;
        }
    };

    let app = StatusApp::new();
    let result = statusprobe::run(&app, &config, &mut std::io::stdout()).await;

    ExitCode::from(result.exit_code())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_is_printed() {
        let mut out = Vec::new();
        report_config_error(&ConfigError::InvalidPort("http".to_string()), &mut out);

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "✗ Invalid configuration: PROBE_PORT must be a port number, got \"http\"\n"
        );
    }
}

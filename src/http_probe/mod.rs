pub mod probe;
pub mod result;

pub mod prelude {
    pub use super::probe::{STATUS_PATH, build_client, classify_body, probe_status, status_url};
    pub use super::report;
    pub use super::result::{Outcome, ProbeError, ProbeResult};
}

use std::fmt::Write;

/// Renders an error and its whole `source()` chain on one line.
pub fn report(mut err: &(dyn std::error::Error + 'static)) -> String {
    let mut s = format!("{}", err);
    while let Some(src) = err.source() {
        let _ = write!(s, ": {}", src);
        err = src;
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("outer")]
    struct Outer(#[source] std::io::Error);

    #[test]
    fn test_report_flattens_source_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = Outer(io);
        assert_eq!(report(&err), "outer: refused");
    }

    #[test]
    fn test_report_single_error() {
        let io = std::io::Error::other("plain");
        assert_eq!(report(&io), "plain");
    }
}

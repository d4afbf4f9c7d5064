pub mod config;
pub mod http_probe;
pub mod runner;
pub mod server;

pub use runner::run;

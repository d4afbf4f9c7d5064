use std::convert::Infallible;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::header::{CONTENT_TYPE, HeaderValue};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinSet;

use super::{App, ServerHandle};
use crate::http_probe::prelude::STATUS_PATH;

const OK_BODY: &str = r#"{"status":"ok"}"#;

/// Minimal HTTP app exposing `GET /status`.
#[derive(Debug, Clone)]
pub struct StatusApp {
    body: Arc<str>,
}

impl Default for StatusApp {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusApp {
    pub fn new() -> Self {
        Self::with_body(OK_BODY)
    }

    /// Serves `body` verbatim from `/status`, whatever it contains.
    pub fn with_body(body: impl Into<Arc<str>>) -> Self {
        Self { body: body.into() }
    }
}

impl App for StatusApp {
    async fn listen(&self, addr: SocketAddr) -> io::Result<ServerHandle> {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(accept_loop(listener, self.body.clone(), shutdown_rx));

        log::info!("Status app listening on {local_addr}");
        Ok(ServerHandle::new(local_addr, shutdown_tx, task))
    }
}

async fn accept_loop(listener: TcpListener, body: Arc<str>, mut shutdown: oneshot::Receiver<()>) {
    let mut connections = JoinSet::new();

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            accepted = listener.accept() => {
                let (stream, peer) = match accepted {
                    Ok(conn) => conn,
                    Err(e) => {
                        log::warn!("Failed to accept connection: {e}");
                        continue;
                    }
                };
                let body = body.clone();
                connections.spawn(async move {
                    let service = service_fn(move |req| respond(req, body.clone()));
                    if let Err(e) = http1::Builder::new()
                        .serve_connection(TokioIo::new(stream), service)
                        .await
                    {
                        log::debug!("Connection from {peer} ended with error: {e}");
                    }
                });
            }
            // Reap finished connections so the set does not grow unbounded.
            Some(_) = connections.join_next(), if !connections.is_empty() => {}
        }
    }

    connections.shutdown().await;
}

async fn respond(req: Request<Incoming>, body: Arc<str>) -> Result<Response<Full<Bytes>>, Infallible> {
    log::debug!("{} {}", req.method(), req.uri().path());

    let response = match (req.method(), req.uri().path()) {
        (&Method::GET, STATUS_PATH) => {
            let mut response = Response::new(Full::new(Bytes::from(body.to_string())));
            response
                .headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            response
        }
        (_, STATUS_PATH) => with_status(StatusCode::METHOD_NOT_ALLOWED),
        _ => with_status(StatusCode::NOT_FOUND),
    };
    Ok(response)
}

fn with_status(status: StatusCode) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::new()));
    *response.status_mut() = status;
    response
}

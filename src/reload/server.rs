// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 assetflow contributors

//! Development server
//!
//! Serves the output directory, injects the reload client into HTML pages and
//! streams [`ReloadEvent`]s over SSE.

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::get,
    Router,
};
use colored::Colorize;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::net::TcpListener;
use tokio_stream::{wrappers::BroadcastStream, Stream, StreamExt};
use tower_http::services::ServeDir;

use super::{ReloadEvent, Reloader};
use crate::config::ServerConfig;
use crate::errors::{AssetflowError, AssetflowResult};

/// Route serving the browser client
pub const CLIENT_PATH: &str = "/__assetflow/client.js";

/// SSE route
pub const EVENTS_PATH: &str = "/__assetflow/events";

const CLIENT_JS: &str = include_str!("client.js");

/// System commands tried, in order, to open a URL
const OPENERS: &[&str] = &["xdg-open", "open", "wslview"];

/// Static file server with live reload
pub struct DevServer {
    dir: PathBuf,
    host: String,
    port: u16,
    open: bool,
    reloader: Reloader,
}

impl DevServer {
    pub fn new(dir: impl Into<PathBuf>, config: &ServerConfig, reloader: Reloader) -> Self {
        Self {
            dir: dir.into(),
            host: config.host.clone(),
            port: config.port,
            open: config.open,
            reloader,
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}:{}/", self.host, self.port)
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route(EVENTS_PATH, get(events))
            .route(CLIENT_PATH, get(client))
            .fallback_service(ServeDir::new(&self.dir))
            .layer(middleware::from_fn(inject_client))
            .with_state(self.reloader.clone())
    }

    /// Bind the configured address and serve until the process ends
    pub async fn run(self) -> AssetflowResult<()> {
        let addr = format!("{}:{}", self.host, self.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| AssetflowError::Server {
                message: format!("cannot bind {}: {}", addr, e),
            })?;

        println!(
            "  {} Serving {} at {}",
            "→".blue(),
            self.dir.display(),
            self.url().bold()
        );

        if self.open {
            open_browser(&self.url()).await;
        }

        self.serve_on(listener).await
    }

    /// Serve on an already bound listener
    pub async fn serve_on(self, listener: TcpListener) -> AssetflowResult<()> {
        axum::serve(listener, self.router())
            .await
            .map_err(|e| AssetflowError::Server {
                message: e.to_string(),
            })
    }
}

async fn events(
    State(reloader): State<Reloader>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let stream = BroadcastStream::new(reloader.subscribe()).filter_map(|received| match received {
        Ok(event) => Some(to_sse(&event)),
        Err(lagged) => {
            tracing::debug!("reload client lagged: {}", lagged);
            None
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

fn to_sse(event: &ReloadEvent) -> Result<Event, axum::Error> {
    Event::default().event(event.name()).json_data(event)
}

async fn client() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "application/javascript; charset=utf-8"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        CLIENT_JS,
    )
}

async fn inject_client(request: Request, next: Next) -> Response {
    let response = next.run(request).await;

    let is_html = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("text/html"));

    if !is_html || response.status() != StatusCode::OK {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!("failed to buffer page: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let page = inject_script(&String::from_utf8_lossy(&bytes));
    parts.headers.remove(header::CONTENT_LENGTH);
    Response::from_parts(parts, Body::from(page))
}

/// Insert the client tag before the last `</body>`, or append it
pub fn inject_script(html: &str) -> String {
    let tag = format!(r#"<script src="{}"></script>"#, CLIENT_PATH);

    match html.to_ascii_lowercase().rfind("</body>") {
        Some(at) => {
            let mut out = String::with_capacity(html.len() + tag.len());
            out.push_str(&html[..at]);
            out.push_str(&tag);
            out.push_str(&html[at..]);
            out
        }
        None => format!("{}{}", html, tag),
    }
}

/// Open `url` with the first system opener on `PATH`
pub async fn open_browser(url: &str) {
    let Some(opener) = OPENERS.iter().find_map(|name| which::which(name).ok()) else {
        tracing::warn!("no browser opener found; visit {} manually", url);
        return;
    };

    let spawned = tokio::process::Command::new(&opener)
        .arg(url)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();

    if let Err(e) = spawned {
        tracing::warn!("could not open browser with {}: {}", opener.display(), e);
    }
}

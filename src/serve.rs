//! HTTP server for the interactive dashboard
//!
//! `processos-dash serve` → loads the dataset once, writes the static charts,
//! opens the browser and answers requests one at a time. Every page request
//! re-runs the filter and rebuilds the panels from the shared dataset.

use crate::dataset::Dataset;
use crate::error::{DashError, Result};
use crate::filter::{FilterController, Query};
use crate::report::{StaticImage, StaticImages, StaticReport};
use crate::shell::{self, Download, HtmlPresenter, Layout};
use crate::view;
use chrono::NaiveDate;
use serde::Serialize;
use std::io;
use tiny_http::{Header, Method, Request, Response, Server};
use tracing::{error, info, warn};

#[derive(Serialize)]
struct ApiResponse<T> {
    ok: bool,
    data: Option<T>,
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self { ok: true, data: Some(data), error: None }
    }
}

#[derive(Debug, Clone)]
pub struct ServeConfig {
    pub host: String,
    pub port: u16,
    pub layout: Layout,
    pub open_browser: bool,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
            layout: Layout::default(),
            open_browser: true,
        }
    }
}

/// Everything a request handler reads. Built once, never mutated.
pub struct App {
    pub dataset: Dataset,
    pub report: StaticReport,
    pub images: StaticImages,
    pub controller: FilterController,
    pub layout: Layout,
}

impl App {
    pub fn new(dataset: Dataset, report: StaticReport, images: StaticImages, layout: Layout) -> Self {
        Self {
            dataset,
            report,
            images,
            controller: FilterController::new(layout.include_all_option()),
            layout,
        }
    }

    fn downloads(&self) -> Vec<Download> {
        StaticImage::ALL
            .into_iter()
            .map(|image| Download::new(image, image.file_name(self.images.format)))
            .collect()
    }

    /// Full dashboard page for one query.
    pub fn page(&self, query: &Query, today: NaiveDate) -> String {
        let view = view::render(&self.dataset, &self.controller, query, today, true);
        let mut presenter = HtmlPresenter::new();
        shell::present(&view, &self.downloads(), self.layout, &mut presenter);
        presenter.finish(self.layout)
    }
}

/// Bind, open the browser, serve until the process is stopped.
pub fn start(config: &ServeConfig, app: App) -> Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let server = Server::http(&addr).map_err(|e| DashError::Server(e.to_string()))?;

    let url = format!("http://{}:{}", display_host(&config.host), config.port);
    info!(
        %url,
        layout = ?config.layout,
        source = ?app.dataset.source(),
        rows = app.dataset.len(),
        "dashboard ready"
    );
    eprintln!("\n\x1b[1;32m📊 Análise de Processos\x1b[0m");
    eprintln!("   {}\n", url);

    if config.open_browser {
        if let Err(e) = open::that(&url) {
            warn!(error = %e, "could not open browser");
        }
    }

    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, &app) {
            error!(error = %e, "request failed");
        }
    }

    Ok(())
}

fn display_host(host: &str) -> &str {
    match host {
        "0.0.0.0" | "127.0.0.1" => "localhost",
        other => other,
    }
}

fn handle_request(request: Request, app: &App) -> io::Result<()> {
    let url = request.url().to_string();
    let mut parts = url.splitn(2, '?');
    let path = parts.next().unwrap_or("/");
    let query_string = parts.next().unwrap_or("");
    let method = request.method().clone();
    info!(%method, path, "request");

    match (&method, path) {
        (&Method::Get, "/") => {
            let query = Query::parse(query_string);
            let html = app.page(&query, today());
            let response = Response::from_string(html)
                .with_header(header("Content-Type", "text/html; charset=utf-8")?);
            request.respond(response)
        }

        // API: view model without chart markup
        (&Method::Get, "/api/view") => {
            let query = Query::parse(query_string);
            let view = view::render(&app.dataset, &app.controller, &query, today(), false);
            respond_json(request, &ApiResponse::success(view))
        }

        // API: whole-dataset aggregations
        (&Method::Get, "/api/report") => respond_json(request, &ApiResponse::success(&app.report)),

        (&Method::Get, p) if p.starts_with("/download/") || p.starts_with("/static/") => {
            let attachment = p.starts_with("/download/");
            let slug = p.rsplit('/').next().unwrap_or("");
            match StaticImage::from_slug(slug) {
                Some(image) => serve_image(request, app, image, attachment),
                None => not_found(request),
            }
        }

        _ => not_found(request),
    }
}

fn serve_image(request: Request, app: &App, image: StaticImage, attachment: bool) -> io::Result<()> {
    let path = app.images.path(image);
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "static image unavailable");
            return not_found(request);
        }
    };

    let file_name = image.file_name(app.images.format);
    let mut response = Response::from_data(bytes)
        .with_header(header("Content-Type", app.images.format.content_type())?);
    if attachment {
        response = response.with_header(header(
            "Content-Disposition",
            &format!("attachment; filename=\"{}\"", file_name),
        )?);
    }
    request.respond(response)
}

fn respond_json<T: Serialize>(request: Request, body: &T) -> io::Result<()> {
    let json = serde_json::to_string(body)?;
    let response = Response::from_string(json).with_header(header("Content-Type", "application/json")?);
    request.respond(response)
}

fn not_found(request: Request) -> io::Result<()> {
    request.respond(Response::from_string("Not found").with_status_code(404))
}

fn header(name: &str, value: &str) -> io::Result<Header> {
    Header::from_bytes(name.as_bytes(), value.as_bytes())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, format!("invalid header {}", name)))
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

//! Output formatting helpers for CLI commands

use crate::client::QueryResponse;
use crate::endpoints::{EndpointName, HttpMethod};
use crate::query::QuerySnapshot;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde_json::json;

/// View model for endpoint display
#[derive(Debug, Clone, serde::Serialize)]
pub struct EndpointView {
    pub name: String,
    pub method: HttpMethod,
    pub url: String,
}

impl From<EndpointName> for EndpointView {
    fn from(name: EndpointName) -> Self {
        let endpoint = name.endpoint();
        Self {
            name: name.to_string(),
            method: endpoint.method,
            url: endpoint.url.to_string(),
        }
    }
}

/// Format endpoints as a table
pub fn format_endpoints_table(endpoints: &[EndpointView]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "Method", "Path"]);

    for e in endpoints {
        let method = match e.method {
            HttpMethod::Get => "GET".green().to_string(),
            HttpMethod::Post => "POST".cyan().to_string(),
        };
        table.add_row(vec![Cell::new(&e.name), Cell::new(method), Cell::new(&e.url)]);
    }

    table.to_string()
}

/// Format endpoints as JSON
pub fn format_endpoints_json(endpoints: &[EndpointView]) -> String {
    json!({ "endpoints": endpoints }).to_string()
}

/// Render a response body; `compact` prints single-line JSON.
pub fn format_response(response: &QueryResponse, compact: bool) -> String {
    match response {
        QueryResponse::Json(value) if compact => value.to_string(),
        QueryResponse::Json(value) => {
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
        }
        QueryResponse::NoContent(raw) if compact => {
            json!({ "status": raw.status }).to_string()
        }
        QueryResponse::NoContent(raw) => format!("{} {}", raw.status, raw.status_text),
    }
}

/// One-line summary of a settled fetch for `orion watch`.
pub fn format_snapshot_line(snapshot: &QuerySnapshot, compact: bool) -> String {
    let at = snapshot
        .fetched_at
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--:--:--".to_string());

    if compact {
        let response = snapshot.response.as_ref().map(|r| match r {
            QueryResponse::Json(value) => value.clone(),
            QueryResponse::NoContent(raw) => json!({ "status": raw.status }),
        });
        return json!({
            "fetch": snapshot.fetch_count,
            "fetched_at": snapshot.fetched_at,
            "error": snapshot.error.as_ref().map(|e| e.to_string()),
            "response": response,
        })
        .to_string();
    }

    match (&snapshot.error, &snapshot.response) {
        (Some(error), _) => format!(
            "[{}] #{} {} {}",
            at,
            snapshot.fetch_count,
            "✗".red(),
            error
        ),
        (None, Some(response)) => format!(
            "[{}] #{} {} {}",
            at,
            snapshot.fetch_count,
            "✓".green(),
            summarize(response)
        ),
        (None, None) => format!("[{}] #{} {}", at, snapshot.fetch_count, "…".yellow()),
    }
}

fn summarize(response: &QueryResponse) -> String {
    match response {
        QueryResponse::Json(serde_json::Value::Array(items)) => format!("{} items", items.len()),
        QueryResponse::Json(serde_json::Value::Number(n)) => n.to_string(),
        QueryResponse::Json(value) => value.to_string(),
        QueryResponse::NoContent(raw) => format!("{} {}", raw.status, raw.status_text),
    }
}

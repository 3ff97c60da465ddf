//! Server-side HTML for the dashboards.
//!
//! Pages are plain strings built from the dashboard aggregates. Every value
//! that came from ETA goes through [`escape`] before it is written out.

use crate::dashboard::{AircraftStatus, DashboardLink, Overview, TypeCount, TypeDiagnostics};
use crate::models::AircraftRecord;
use std::fmt::Write;

const STYLE: &str = "body{font-family:system-ui,sans-serif;margin:2rem;color:#222}\
table{border-collapse:collapse;margin:1rem 0}\
th,td{border:1px solid #ccc;padding:.3rem .8rem;text-align:left}\
td.num{text-align:right}\
.error{background:#fde2e1;border:1px solid #e0a4a0;padding:.6rem 1rem;margin:1rem 0}\
.stat{display:inline-block;margin-right:2rem;font-size:1.2rem}";

/// Escapes text for use in HTML element content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title} | Fleet Dashboards</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <nav><a href=\"/\">Dashboards</a></nav>\n<h1>{title}</h1>\n{body}</body>\n</html>\n",
        title = escape(title),
    )
}

fn error_banner(error: Option<&str>) -> String {
    match error {
        Some(e) => format!(
            "<div class=\"error\"><strong>Live ETA data unavailable.</strong> {}</div>\n",
            escape(e)
        ),
        None => String::new(),
    }
}

fn aircraft_table(aircraft: &[AircraftRecord]) -> String {
    let mut html = String::from(
        "<table>\n<tr><th>Tail</th><th>Type</th><th>Hobbs</th></tr>\n",
    );
    for a in aircraft {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td class=\"num\">{:.1}</td></tr>",
            escape(&a.tail),
            escape(&a.aircraft_type),
            a.hobbs
        );
    }
    html.push_str("</table>\n");
    html
}

fn type_table(counts: &[TypeCount]) -> String {
    let mut html = String::from("<table>\n<tr><th>Type</th><th>Count</th></tr>\n");
    for t in counts {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td class=\"num\">{}</td></tr>",
            escape(&t.aircraft_type),
            t.count
        );
    }
    html.push_str("</table>\n");
    html
}

pub fn index(dashboards: &[DashboardLink], location: &str) -> String {
    let mut body = String::new();
    if !location.trim().is_empty() {
        let _ = writeln!(body, "<p>Location: {}</p>", escape(location.trim()));
    }
    body.push_str("<ul>\n");
    for d in dashboards {
        let _ = writeln!(
            body,
            "<li><a href=\"{}\">{}</a> &middot; {}</li>",
            escape(d.path),
            escape(d.name),
            escape(d.description)
        );
    }
    body.push_str("</ul>\n");
    layout("Fleet Dashboards", &body)
}

pub fn overview(overview: &Overview) -> String {
    let mut body = error_banner(overview.error.as_deref());
    let _ = writeln!(
        body,
        "<div><span class=\"stat\">Aircraft: <strong>{}</strong></span>\
         <span class=\"stat\">Total Hobbs: <strong>{:.1}</strong></span></div>",
        overview.total_aircraft, overview.total_hobbs
    );
    body.push_str("<h2>By type</h2>\n");
    body.push_str(&type_table(&overview.type_breakdown));
    body.push_str("<h2>Sample</h2>\n");
    body.push_str(&aircraft_table(&overview.sample_aircraft));
    layout("Overview", &body)
}

pub fn aircraft(status: &AircraftStatus) -> String {
    let mut body = error_banner(status.error.as_deref());
    body.push_str(&aircraft_table(&status.aircraft));
    layout("Aircraft Status", &body)
}

pub fn aircraft_types(diag: &TypeDiagnostics) -> String {
    let mut body = error_banner(diag.error.as_deref());
    body.push_str("<p>Unfiltered ETA export, counted by type.</p>\n");
    body.push_str(&type_table(&diag.type_counts));
    layout("Aircraft Types (debug)", &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::{FleetOutcome, DASHBOARDS};

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<b>"Piper" & Cessna's</b>"#),
            "&lt;b&gt;&quot;Piper&quot; &amp; Cessna&#39;s&lt;/b&gt;"
        );
        assert_eq!(escape("N101SIU"), "N101SIU");
    }

    #[test]
    fn test_aircraft_values_are_escaped() {
        let outcome = FleetOutcome::Live(vec![AircraftRecord::new("N1<script>", "C172", 1.25)]);
        let html = aircraft(&AircraftStatus::from_outcome(&outcome));
        assert!(html.contains("<td>N1&lt;script&gt;</td>"));
        assert!(!html.contains("N1<script>"));
    }

    #[test]
    fn test_error_banner_only_when_degraded() {
        let live = Overview::from_outcome(&FleetOutcome::Live(Vec::new()));
        assert!(!overview(&live).contains("class=\"error\""));

        let degraded = Overview::from_outcome(&FleetOutcome::Degraded {
            aircraft: Vec::new(),
            reason: "ETA returned HTTP 500: Internal Server Error".to_string(),
        });
        let html = overview(&degraded);
        assert!(html.contains("class=\"error\""));
        assert!(html.contains("HTTP 500"));
    }

    #[test]
    fn test_overview_totals() {
        let outcome = FleetOutcome::Live(vec![
            AircraftRecord::new("N1", "C172", 100.2),
            AircraftRecord::new("N2", "PA28", 50.0),
        ]);
        let html = overview(&Overview::from_outcome(&outcome));
        assert!(html.contains("Aircraft: <strong>2</strong>"));
        assert!(html.contains("Total Hobbs: <strong>150.2</strong>"));
    }

    #[test]
    fn test_index_location_line() {
        assert!(index(DASHBOARDS, "KMDH").contains("Location: KMDH"));
        assert!(!index(DASHBOARDS, "").contains("Location:"));
    }
}

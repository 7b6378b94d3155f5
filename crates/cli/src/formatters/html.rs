//! HTML formatter implementation.
//!
//! Responsibilities:
//! - Render a self-contained, minimally styled HTML report: metadata
//!   header, resource table, and failed-unit list.
//!
//! Does NOT handle:
//! - Other output formats. Interactive filtering and visual design are
//!   deliberately out of scope; the document is static.

use std::fmt::Write as _;

use anyhow::Result;

use awsmap_scanner::ScanResult;

use crate::formatters::common::{escape_html, tags_inline};
use crate::formatters::Formatter;

const STYLE: &str = "body{font-family:sans-serif;margin:2em}\
table{border-collapse:collapse;width:100%}\
th,td{border:1px solid #ccc;padding:4px 8px;text-align:left;font-size:14px}\
th{background:#f0f0f0}\
.meta{color:#555}\
.errors{color:#a00}";

/// Static HTML report formatter.
pub struct HtmlFormatter;

impl Formatter for HtmlFormatter {
    fn format_scan(&self, result: &ScanResult) -> Result<String> {
        let meta = &result.metadata;
        let mut html = String::new();

        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
        writeln!(
            html,
            "<title>AWS Inventory - {}</title>",
            escape_html(&meta.account_id)
        )?;
        writeln!(html, "<style>{STYLE}</style>")?;
        html.push_str("</head>\n<body>\n");

        writeln!(
            html,
            "<h1>AWS Inventory - {}</h1>",
            escape_html(&meta.account_id)
        )?;
        let alias = meta
            .account_alias
            .as_deref()
            .map(|a| format!(" ({})", escape_html(a)))
            .unwrap_or_default();
        writeln!(
            html,
            "<p class=\"meta\">Account {}{} &middot; {} resources &middot; {} services, {} regions &middot; generated {} in {:.1}s</p>",
            escape_html(&meta.account_id),
            alias,
            meta.resource_count,
            meta.services_scanned,
            meta.regions_scanned,
            escape_html(&meta.timestamp),
            meta.scan_duration_seconds,
        )?;

        html.push_str("<table>\n<tr><th>Service</th><th>Type</th><th>ID</th><th>Name</th><th>Region</th><th>ARN</th><th>Tags</th></tr>\n");
        for record in &result.resources {
            writeln!(
                html,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape_html(&record.service),
                escape_html(&record.resource_type),
                escape_html(&record.id),
                escape_html(record.name.as_deref().unwrap_or("")),
                escape_html(&record.region),
                escape_html(record.arn.as_deref().unwrap_or("")),
                escape_html(&tags_inline(&record.tags)),
            )?;
        }
        html.push_str("</table>\n");

        if !result.errors.is_empty() {
            writeln!(
                html,
                "<h2 class=\"errors\">Failed units ({})</h2>\n<ul>",
                result.errors.len()
            )?;
            for error in &result.errors {
                writeln!(
                    html,
                    "<li>{} [{}]: {}</li>",
                    escape_html(&error.service),
                    escape_html(&error.region),
                    escape_html(&error.message),
                )?;
            }
            html.push_str("</ul>\n");
        }

        html.push_str("</body>\n</html>\n");
        Ok(html)
    }
}

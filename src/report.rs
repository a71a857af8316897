//! Renders the digest as a plain-text or HTML report body.
//!
//! Both formats carry the same records; the HTML variant is produced from a
//! small embedded template with one table per section.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use chrono_humanize::HumanTime;
use clap::ValueEnum;
use minijinja::{Environment, context};
use serde::Serialize;

use crate::{error::RenderError, types::Digest};

/// Output format for the digest body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Text,
    Html,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ReportFormat::Text => "text",
            ReportFormat::Html => "html",
        })
    }
}

/// Renders the digest in the requested format.
pub fn render(digest: &Digest, format: ReportFormat) -> Result<String, RenderError> {
    match format {
        ReportFormat::Text => Ok(render_text(digest)),
        ReportFormat::Html => render_html(digest),
    }
}

fn format_timestamp(when: DateTime<Utc>) -> String {
    when.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Plain-text report: a header per section, then number, title, and the
/// section's timestamp for each record, separated by blank lines.
pub fn render_text(digest: &Digest) -> String {
    let mut out = String::new();

    for entry in &digest.sections {
        let _ = writeln!(out, "*{} Pull Requests*", entry.section.title());

        for pr in &entry.pulls {
            let _ = writeln!(out, "Request: #{} - {}", pr.number, pr.title);
            if let Some(when) = entry.section.window_value(pr) {
                let _ = writeln!(
                    out,
                    "{} Time: {} ({})",
                    entry.section.title(),
                    format_timestamp(when),
                    HumanTime::from(when)
                );
            }
            let _ = writeln!(out);
        }

        let _ = writeln!(out);
    }

    out
}

// The ".html" template name turns on minijinja's auto-escaping, so titles
// coming back from the API cannot inject markup.
const HTML_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<style>
  body { font-family: Helvetica, Arial, sans-serif; margin: 24px; color: #24292f; }
  h2 { border-bottom: 1px solid #d0d7de; padding-bottom: 4px; }
  table { border-collapse: collapse; margin-bottom: 24px; width: 100%; }
  th, td { border: 1px solid #d0d7de; padding: 6px 10px; text-align: left; }
  th { background: #f6f8fa; }
</style>
</head>
<body>
{% for section in sections %}
<h2>{{ section.title }} Pull Requests</h2>
<table>
  <tr><th>#</th><th>Title</th><th>URL</th></tr>
{% for row in section.rows %}
  <tr>
    <td>{{ row.number }}</td>
    <td>{{ row.title }}</td>
    <td><a href="{{ row.url }}">{{ row.url }}</a></td>
  </tr>
{% endfor %}
</table>
{% endfor %}
</body>
</html>
"#;

#[derive(Debug, Serialize)]
struct SectionContext {
    title: &'static str,
    rows: Vec<RowContext>,
}

#[derive(Debug, Serialize)]
struct RowContext {
    number: u64,
    title: String,
    url: String,
}

/// HTML report: one table per section with `#` / `Title` / `URL` columns.
pub fn render_html(digest: &Digest) -> Result<String, RenderError> {
    let mut env = Environment::new();
    env.add_template("digest.html", HTML_TEMPLATE)?;

    let sections: Vec<SectionContext> = digest
        .sections
        .iter()
        .map(|entry| SectionContext {
            title: entry.section.title(),
            rows: entry
                .pulls
                .iter()
                .map(|pr| RowContext {
                    number: pr.number,
                    title: pr.title.clone(),
                    url: pr.html_url.clone(),
                })
                .collect(),
        })
        .collect();

    let html = env
        .get_template("digest.html")?
        .render(context! { sections })?;
    Ok(html)
}

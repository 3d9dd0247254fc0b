use crate::domain::entities::Response;
use colored::{ColoredString, Colorize};
use serde_json::Value;
use std::fmt::Write;

/// Human label for a status code, falling back to the code's class
pub fn status_label(code: u16) -> &'static str {
    match code {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        301 => "Moved Permanently",
        302 => "Found",
        304 => "Not Modified",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        200..=299 => "OK",
        300..=399 => "Redirect",
        400..=499 => "Client Error",
        500..=599 => "Server Error",
        _ => "Unknown",
    }
}

/// Indented JSON when `pretty` is set and the body parses, otherwise the body as-is
pub fn format_body(body: &str, pretty: bool) -> String {
    if !pretty {
        return body.to_string();
    }
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| serde_json::to_string_pretty(&json).ok())
        .unwrap_or_else(|| body.to_string())
}

fn paint_status(text: String, code: u16) -> ColoredString {
    if code >= 400 {
        text.red().bold()
    } else {
        text.green().bold()
    }
}

/// Full report used by the interactive builder: status, headers, body
pub fn render_response(response: &Response, pretty: bool) -> String {
    let code = response.status.as_u16();
    let mut out = String::new();

    // Writing into a String cannot fail.
    let status = format!(
        "✔ {} {} ({:?})",
        code,
        status_label(code),
        response.elapsed
    );
    let _ = writeln!(out, "\n{}\n", paint_status(status, code));

    let _ = writeln!(out, "{}", "Response Headers:".blue());
    for (name, value) in &response.headers {
        let _ = writeln!(out, "  {}: {}", name.cyan(), value);
    }

    let _ = writeln!(out, "\n{}", "Response Body:".blue());
    let _ = writeln!(out, "{}", format_body(&response.body, pretty));
    out
}

/// Compact report used by the one-shot commands: status line and body
pub fn render_summary(response: &Response, pretty: bool) -> String {
    let code = response.status.as_u16();
    let status = format!(
        "Status: {} {} ({:?})",
        code,
        status_label(code),
        response.elapsed
    );

    let body = format_body(&response.body, pretty);
    let body = if pretty && body != response.body {
        body.green().to_string()
    } else {
        body
    };
    format!("\n{}\n\n{}\n", paint_status(status, code), body)
}

use crate::domain::entities::RequestDraft;
use colored::Colorize;
use std::fmt::Write;

const RULE_WIDTH: usize = 70;

/// Renders the summary shown before the operator confirms the send
pub fn render_preview(draft: &RequestDraft) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "\n{}", rule);
    let _ = writeln!(out, "PREVIEW");
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "{} {}", draft.method.as_str().cyan().bold(), draft.send_url());

    if !draft.headers.is_empty() {
        let _ = writeln!(out, "\nHeaders:");
        for (name, value) in &draft.headers {
            let _ = writeln!(out, "  {}: {}", name.green(), value);
        }
    }

    if !draft.body.is_empty() {
        let _ = writeln!(out, "\nBody:");
        for line in draft.body.split('\n') {
            let _ = writeln!(out, "  {}", line);
        }
    }

    let _ = write!(out, "{}", rule);
    out
}

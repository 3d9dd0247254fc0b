use crate::application::builders::request_builder::RequestBuilder;
use crate::application::services::HttpRequestService;
use crate::application::wizard::{Outcome, Prompter, Wizard, WizardError};
use crate::infrastructure::config::Config;
use crate::infrastructure::history::HistoryRecorder;
use crate::infrastructure::output;
use anyhow::Result;
use colored::Colorize;
use std::io::{BufRead, Write};

/// `hsp request`: run the builder, then send, report and record.
///
/// Dispatch failures are reported inline and end the session normally;
/// nothing is recorded for them.
pub async fn run_interactive<R: BufRead, W: Write>(
    config: &Config,
    request_service: &HttpRequestService,
    reader: R,
    mut writer: W,
) -> Result<()> {
    let outcome = match Wizard::new(Prompter::new(reader, &mut writer)).run() {
        Ok(outcome) => outcome,
        Err(err) if matches!(err.downcast_ref::<WizardError>(), Some(WizardError::InputClosed)) => {
            writeln!(writer, "\n{}", "Input closed, request not sent".yellow())?;
            return Ok(());
        }
        Err(err) => return Err(err),
    };

    let Outcome::Send(draft) = outcome else {
        return Ok(());
    };

    let request = match draft.to_request() {
        Ok(request) => request,
        Err(err) => {
            writeln!(writer, "{}", format!("✗ Request creation failed: {}", err).red())?;
            return Ok(());
        }
    };

    let response = match request_service.send_request(request).await {
        Ok(response) => response,
        Err(err) => {
            writeln!(writer, "{}", format!("✗ Request failed: {}", err).red())?;
            return Ok(());
        }
    };

    write!(writer, "{}", output::render_response(&response, draft.pretty_output))?;

    let recorder = HistoryRecorder::new(&config.history_dir);
    match recorder.record(&draft) {
        Ok(path) => writeln!(
            writer,
            "{}",
            format!("✓ Request saved to history: {}", path.display()).green()
        )?,
        Err(err) => tracing::warn!(
            dir = %recorder.dir().display(),
            error = %format!("{:#}", err),
            "could not save request history"
        ),
    }

    Ok(())
}

/// `hsp get`: one GET, no history
pub async fn run_get<W: Write>(
    request_service: &HttpRequestService,
    url: &str,
    headers: &[String],
    pretty: bool,
    mut writer: W,
) -> Result<()> {
    let request = RequestBuilder::new()
        .method("GET")?
        .url(url)?
        .headers(headers)
        .build()?;

    let response = request_service.send_request(request).await?;
    write!(writer, "{}", output::render_summary(&response, pretty))?;
    Ok(())
}

/// `hsp post`: one JSON POST, no history
pub async fn run_post<W: Write>(
    request_service: &HttpRequestService,
    url: &str,
    json: &Option<String>,
    headers: &[String],
    mut writer: W,
) -> Result<()> {
    let request = RequestBuilder::new()
        .method("POST")?
        .url(url)?
        .headers(headers)
        .json(json)?
        .build()?;

    let response = request_service.send_request(request).await?;
    write!(writer, "{}", output::render_summary(&response, true))?;
    Ok(())
}

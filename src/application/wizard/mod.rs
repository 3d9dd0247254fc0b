//! Interactive request builder.
//!
//! The builder is a small state machine: each [`Stage`] reads what it needs
//! through the [`Prompter`], updates the [`RequestDraft`] and names its
//! successor. Nothing here touches the network; the caller decides what to do
//! with the returned [`Outcome`].

pub mod preview;
pub mod prompter;

use crate::domain::entities::{BodyFormat, Method, RequestDraft};
use crate::domain::validators::{canonical_json, parse_method_choice, validate_url};
use anyhow::Result;
use std::io::{BufRead, Write};

pub use preview::render_preview;
pub use prompter::{Prompter, WizardError};

const DONE: &str = "done";

/// Indent for feedback printed inside the header, parameter, form and body prompts
const NESTED: &str = "  ";

/// The builder's stages, in the order they run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Url,
    Method,
    Headers,
    QueryParams,
    Body,
    PrettyPrint,
    Preview,
    Confirm,
}

impl Stage {
    /// Stage that follows `self`, or `None` once confirmation has been asked
    pub fn next(self, draft: &RequestDraft) -> Option<Stage> {
        match self {
            Stage::Url => Some(Stage::Method),
            Stage::Method => Some(Stage::Headers),
            Stage::Headers => Some(Stage::QueryParams),
            Stage::QueryParams if draft.method.accepts_body() => Some(Stage::Body),
            Stage::QueryParams | Stage::Body => Some(Stage::PrettyPrint),
            Stage::PrettyPrint => Some(Stage::Preview),
            Stage::Preview => Some(Stage::Confirm),
            Stage::Confirm => None,
        }
    }
}

/// How a builder session ended
#[derive(Debug, PartialEq)]
pub enum Outcome {
    Send(RequestDraft),
    Cancelled,
}

/// Which key/value loop is running; drives the prompt wording
#[derive(Clone, Copy)]
enum PairKind {
    Header,
    Param,
    Field,
}

impl PairKind {
    fn name_prompt(self) -> &'static str {
        match self {
            PairKind::Header => "  Header name (or 'done' to finish): ",
            PairKind::Param => "  Parameter name (or 'done' to finish): ",
            PairKind::Field => "  Form field name (or 'done' to finish): ",
        }
    }

    fn value_prompt(self) -> &'static str {
        match self {
            PairKind::Header => "  Header value: ",
            PairKind::Param => "  Parameter value: ",
            PairKind::Field => "  Field value: ",
        }
    }

    fn indent(self) -> &'static str {
        NESTED
    }

    fn empty_name(self) -> &'static str {
        match self {
            PairKind::Header => "Header name cannot be empty",
            PairKind::Param => "Parameter name cannot be empty",
            PairKind::Field => "Field name cannot be empty",
        }
    }

    fn describe(self, name: &str, value: &str) -> String {
        match self {
            PairKind::Header => format!("Added: {}: {}", name, value),
            PairKind::Param | PairKind::Field => format!("Added: {}={}", name, value),
        }
    }
}

pub struct Wizard<R, W> {
    prompter: Prompter<R, W>,
    draft: RequestDraft,
    confirmed: bool,
}

impl<R: BufRead, W: Write> Wizard<R, W> {
    pub fn new(prompter: Prompter<R, W>) -> Self {
        Self {
            prompter,
            draft: RequestDraft::new(),
            confirmed: false,
        }
    }

    /// Runs every stage in order and reports whether the operator confirmed
    pub fn run(mut self) -> Result<Outcome> {
        let mut stage = Some(Stage::Url);
        while let Some(current) = stage {
            tracing::trace!(stage = ?current, "entering stage");
            self.run_stage(current)?;
            stage = current.next(&self.draft);
        }

        if self.confirmed {
            Ok(Outcome::Send(self.draft))
        } else {
            self.prompter.say("\n❌ Request cancelled")?;
            Ok(Outcome::Cancelled)
        }
    }

    pub fn run_stage(&mut self, stage: Stage) -> Result<()> {
        match stage {
            Stage::Url => self.prompt_url(),
            Stage::Method => self.prompt_method(),
            Stage::Headers => self.prompt_headers(),
            Stage::QueryParams => self.prompt_query_params(),
            Stage::Body => self.prompt_body(),
            Stage::PrettyPrint => self.prompt_pretty_print(),
            Stage::Preview => {
                let preview = render_preview(&self.draft);
                self.prompter.say(&preview)
            }
            Stage::Confirm => {
                self.confirmed = self.prompter.confirm("\n? Send request? (y/n): ")?;
                Ok(())
            }
        }
    }

    #[cfg(test)]
    pub fn draft(&self) -> &RequestDraft {
        &self.draft
    }

    fn prompt_url(&mut self) -> Result<()> {
        loop {
            let url = self.prompter.ask("\n? URL: ")?;
            match validate_url(&url) {
                Ok(()) => {
                    self.draft.url = url;
                    return Ok(());
                }
                Err(e) => self.prompter.error(&e.to_string())?,
            }
        }
    }

    fn prompt_method(&mut self) -> Result<()> {
        self.prompter.say("\n? Method: (default: GET)")?;
        for (i, method) in Method::ALL.iter().enumerate() {
            self.prompter.say(&format!("  {}) {}", i + 1, method))?;
        }

        loop {
            let choice = self.prompter.ask("Choose (1-7) or type method: ")?;
            match parse_method_choice(&choice) {
                Some(method) => {
                    self.draft.method = method;
                    return self.prompter.success(&format!("Method: {}", method));
                }
                None => self.prompter.error("Invalid method")?,
            }
        }
    }

    fn prompt_headers(&mut self) -> Result<()> {
        if self.prompter.confirm("\n? Add headers? (y/n): ")? {
            for (name, value) in self.collect_pairs(PairKind::Header)? {
                self.draft.headers.insert(name, value);
            }
        }
        self.draft.ensure_accept();
        Ok(())
    }

    fn prompt_query_params(&mut self) -> Result<()> {
        if self.prompter.confirm("\n? Add query parameters? (y/n): ")? {
            for (name, value) in self.collect_pairs(PairKind::Param)? {
                self.draft.query_params.insert(name, value);
            }
        }
        Ok(())
    }

    fn prompt_body(&mut self) -> Result<()> {
        if !self.prompter.confirm("\n? Add request body? (y/n): ")? {
            return Ok(());
        }

        self.prompter.say("  Body format:")?;
        self.prompter.say("  1) JSON")?;
        self.prompter.say("  2) Form data")?;
        self.prompter.say("  3) Raw text")?;

        let format = loop {
            let choice = self.prompter.ask("  Choose (1-3): ")?;
            match choice.to_lowercase().as_str() {
                "1" | "json" => break BodyFormat::Json,
                "2" | "form" => break BodyFormat::Form,
                "3" | "raw" => break BodyFormat::Raw,
                _ => self.prompter.error_at(NESTED, "Invalid choice")?,
            }
        };

        self.draft.set_body_format(format);
        match format {
            BodyFormat::Json => self.prompt_json_body(),
            BodyFormat::Form => self.prompt_form_body(),
            BodyFormat::Raw => self.prompt_raw_body(),
            BodyFormat::None => Ok(()),
        }
    }

    /// Any parse failure throws away the whole entry and starts over
    fn prompt_json_body(&mut self) -> Result<()> {
        loop {
            self.prompter
                .say("\n  Enter JSON body (press Enter twice when done):")?;
            let text = self.prompter.read_block()?;

            if text.is_empty() {
                self.prompter.error_at(NESTED, "Body cannot be empty")?;
                continue;
            }

            match canonical_json(&text) {
                Ok(formatted) => {
                    self.draft.body = formatted;
                    return self.prompter.success_at(NESTED, "JSON body set");
                }
                Err(e) => self
                    .prompter
                    .error_at(NESTED, &format!("Invalid JSON: {}", e))?,
            }
        }
    }

    fn prompt_form_body(&mut self) -> Result<()> {
        let fields = self.collect_pairs(PairKind::Field)?;
        self.draft.body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();
        Ok(())
    }

    /// Unlike JSON, an empty raw body only warns
    fn prompt_raw_body(&mut self) -> Result<()> {
        self.prompter
            .say("  Enter raw body (press Enter twice when done):")?;
        self.draft.body = self.prompter.read_block()?;

        if self.draft.body.is_empty() {
            self.prompter.error_at(NESTED, "Body cannot be empty")
        } else {
            self.prompter.success_at(NESTED, "Raw body set")
        }
    }

    fn prompt_pretty_print(&mut self) -> Result<()> {
        let choice = self
            .prompter
            .ask("\n? Pretty-print response? (y/n, default: y): ")?;
        self.draft.pretty_output = !choice.eq_ignore_ascii_case("n");
        Ok(())
    }

    /// Reads name/value pairs until the name prompt gets `done`
    fn collect_pairs(&mut self, kind: PairKind) -> Result<Vec<(String, String)>> {
        let mut pairs = Vec::new();
        loop {
            let name = self.prompter.ask(kind.name_prompt())?;
            if name.eq_ignore_ascii_case(DONE) {
                return Ok(pairs);
            }
            if name.is_empty() {
                self.prompter.error_at(kind.indent(), kind.empty_name())?;
                continue;
            }

            let value = self.prompter.ask(kind.value_prompt())?;
            self.prompter
                .success_at(kind.indent(), &kind.describe(&name, &value))?;
            pairs.push((name, value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{CONTENT_TYPE, FORM_MIME, JSON_MIME};
    use std::io::Cursor;

    type ScriptedWizard = Wizard<Cursor<Vec<u8>>, Vec<u8>>;

    fn wizard(script: &[&str]) -> ScriptedWizard {
        let mut input = script.join("\n");
        input.push('\n');
        Wizard::new(Prompter::new(Cursor::new(input.into_bytes()), Vec::new()))
    }

    fn output(wizard: &mut ScriptedWizard) -> String {
        String::from_utf8_lossy(wizard.prompter.writer()).into_owned()
    }

    /// Output with ANSI color sequences removed
    fn plain_output(wizard: &mut ScriptedWizard) -> String {
        let mut plain = String::new();
        let mut chars = output(wizard).chars().collect::<Vec<_>>().into_iter();
        while let Some(c) = chars.next() {
            if c == '\x1b' {
                chars.by_ref().find(|&c| c == 'm');
            } else {
                plain.push(c);
            }
        }
        plain
    }

    fn sent(script: &[&str]) -> RequestDraft {
        match wizard(script).run().unwrap() {
            Outcome::Send(draft) => draft,
            Outcome::Cancelled => panic!("session was cancelled"),
        }
    }

    #[test]
    fn stage_order_skips_body_for_bodyless_methods() {
        let mut draft = RequestDraft::new();
        assert_eq!(Stage::QueryParams.next(&draft), Some(Stage::PrettyPrint));

        draft.method = Method::Put;
        assert_eq!(Stage::QueryParams.next(&draft), Some(Stage::Body));
        assert_eq!(Stage::Body.next(&draft), Some(Stage::PrettyPrint));
        assert_eq!(Stage::Confirm.next(&draft), None);
    }

    #[test]
    fn url_stage_reprompts_until_valid() {
        let mut w = wizard(&["", "example.com", "https://example.com/api"]);
        w.run_stage(Stage::Url).unwrap();

        assert_eq!(w.draft().url, "https://example.com/api");
        let out = output(&mut w);
        assert!(out.contains("✗ URL cannot be empty"));
        assert!(out.contains("✗ URL must start with http:// or https://"));
    }

    #[test]
    fn url_stage_accepts_valid_url_first_time() {
        let mut w = wizard(&["http://localhost:8080/health"]);
        w.run_stage(Stage::Url).unwrap();
        assert_eq!(w.draft().url, "http://localhost:8080/health");
        assert!(!output(&mut w).contains('✗'));
    }

    #[test]
    fn method_stage_rejects_then_accepts() {
        let mut w = wizard(&["9", "fetch", "patch"]);
        w.run_stage(Stage::Method).unwrap();

        assert_eq!(w.draft().method, Method::Patch);
        assert_eq!(output(&mut w).matches("✗ Invalid method").count(), 2);
    }

    #[test]
    fn method_stage_defaults_to_get() {
        let mut w = wizard(&[""]);
        w.draft.method = Method::Delete;
        w.run_stage(Stage::Method).unwrap();
        assert_eq!(w.draft().method, Method::Get);
    }

    #[test]
    fn declined_headers_still_get_accept() {
        let mut w = wizard(&["n"]);
        w.run_stage(Stage::Headers).unwrap();
        assert_eq!(w.draft().headers.len(), 1);
        assert_eq!(w.draft().headers["Accept"], "application/json");
    }

    #[test]
    fn header_loop_rejects_empty_names_and_keeps_last_write() {
        let mut w = wizard(&[
            "Y", "", "X-Token", "one", "X-Token", "two", "x-token", "three", "DONE",
        ]);
        w.run_stage(Stage::Headers).unwrap();

        let headers = &w.draft().headers;
        assert_eq!(headers["X-Token"], "two");
        assert_eq!(headers["x-token"], "three");
        assert_eq!(headers["Accept"], "application/json");
        assert!(output(&mut w).contains("✗ Header name cannot be empty"));
    }

    #[test]
    fn pair_loop_feedback_is_indented_like_its_prompts() {
        let mut w = wizard(&["y", "", "X-Token", "one", "done"]);
        w.run_stage(Stage::Headers).unwrap();

        let out = plain_output(&mut w);
        assert!(out.contains("(or 'done' to finish):   ✗ Header name cannot be empty\n"));
        assert!(out.contains("Header value:   ✓ Added: X-Token: one\n"));
    }

    #[test]
    fn body_feedback_is_indented() {
        let mut w = wizard(&["y", "9", "3", "text", "", ""]);
        w.run_stage(Stage::Body).unwrap();

        let out = plain_output(&mut w);
        assert!(out.contains("Choose (1-3):   ✗ Invalid choice\n"));
        assert!(out.contains("\n  ✓ Raw body set\n"));
    }

    #[test]
    fn explicit_accept_is_not_overridden() {
        let mut w = wizard(&["y", "Accept", "text/plain", "done"]);
        w.run_stage(Stage::Headers).unwrap();
        assert_eq!(w.draft().headers["Accept"], "text/plain");
    }

    #[test]
    fn header_values_are_taken_verbatim() {
        let mut w = wizard(&["y", "X-Odd", "spaces and :colons: ok", "done"]);
        w.run_stage(Stage::Headers).unwrap();
        assert_eq!(w.draft().headers["X-Odd"], "spaces and :colons: ok");
    }

    #[test]
    fn query_params_have_no_defaults() {
        let mut w = wizard(&["no"]);
        w.run_stage(Stage::QueryParams).unwrap();
        assert!(w.draft().query_params.is_empty());
        assert!(w.draft().headers.is_empty());
    }

    #[test]
    fn query_params_are_collected() {
        let mut w = wizard(&["y", "q", "a b", "n", "1", "done"]);
        w.run_stage(Stage::QueryParams).unwrap();

        w.draft.url = "https://example.com/search".into();
        assert_eq!(w.draft().send_url(), "https://example.com/search?n=1&q=a+b");
    }

    #[test]
    fn json_body_is_reformatted() {
        let mut w = wizard(&["y", "1", r#"{"x":1}"#, "", ""]);
        w.run_stage(Stage::Body).unwrap();

        let draft = w.draft();
        assert_eq!(draft.body_format, BodyFormat::Json);
        assert_eq!(draft.headers[CONTENT_TYPE], JSON_MIME);
        assert_eq!(draft.body, canonical_json(r#"{"x":1}"#).unwrap());
    }

    #[test]
    fn malformed_json_restarts_entry() {
        let mut w = wizard(&["y", "1", r#"{"a":}"#, "", "", "[1,", "2]", "", ""]);
        w.run_stage(Stage::Body).unwrap();

        assert_eq!(w.draft().body, "[\n  1,\n  2\n]");
        let out = output(&mut w);
        assert!(out.contains("✗ Invalid JSON"));
        assert_eq!(out.matches("Enter JSON body").count(), 2);
    }

    #[test]
    fn malformed_json_never_sets_body() {
        let mut w = wizard(&["y", "1", r#"{"a":}"#, "", ""]);
        assert!(w.run_stage(Stage::Body).is_err());
        assert!(w.draft().body.is_empty());
    }

    #[test]
    fn empty_json_body_is_asked_again() {
        let mut w = wizard(&["y", "json", "", "", "true", "", ""]);
        w.run_stage(Stage::Body).unwrap();
        assert_eq!(w.draft().body, "true");
        assert!(output(&mut w).contains("✗ Body cannot be empty"));
    }

    #[test]
    fn form_body_is_encoded_in_entry_order() {
        let mut w = wizard(&["y", "2", "name", "Jane Doe", "a", "x&y", "done"]);
        w.run_stage(Stage::Body).unwrap();

        let draft = w.draft();
        assert_eq!(draft.body_format, BodyFormat::Form);
        assert_eq!(draft.headers[CONTENT_TYPE], FORM_MIME);
        assert_eq!(draft.body, "name=Jane+Doe&a=x%26y");
    }

    #[test]
    fn raw_body_keeps_text_without_content_type() {
        let mut w = wizard(&["y", "5", "3", "line one", "line two", "", ""]);
        w.run_stage(Stage::Body).unwrap();

        let draft = w.draft();
        assert_eq!(draft.body_format, BodyFormat::Raw);
        assert_eq!(draft.body, "line one\nline two");
        assert!(!draft.headers.contains_key(CONTENT_TYPE));
        assert!(output(&mut w).contains("✗ Invalid choice"));
    }

    #[test]
    fn empty_raw_body_only_warns() {
        let mut w = wizard(&["y", "3", "", ""]);
        w.run_stage(Stage::Body).unwrap();
        assert!(w.draft().body.is_empty());
        assert!(output(&mut w).contains("✗ Body cannot be empty"));
    }

    #[test]
    fn declined_body_leaves_draft_alone() {
        let mut w = wizard(&[""]);
        w.run_stage(Stage::Body).unwrap();
        assert_eq!(w.draft().body_format, BodyFormat::None);
        assert!(w.draft().body.is_empty());
    }

    #[test]
    fn pretty_print_is_on_unless_n() {
        for (input, expected) in [("", true), ("y", true), ("maybe", true), ("n", false), (" N ", false)] {
            let mut w = wizard(&[input]);
            w.run_stage(Stage::PrettyPrint).unwrap();
            assert_eq!(w.draft().pretty_output, expected, "input {:?}", input);
        }
    }

    #[test]
    fn default_get_session() {
        let draft = sent(&["https://example.com/api", "", "n", "n", "", "y"]);

        assert_eq!(draft.method, Method::Get);
        assert_eq!(draft.send_url(), "https://example.com/api");
        assert_eq!(draft.headers.len(), 1);
        assert_eq!(draft.headers["Accept"], "application/json");
        assert!(draft.body.is_empty());
        assert!(draft.pretty_output);
    }

    #[test]
    fn post_json_session() {
        let draft = sent(&[
            "https://example.com/items",
            "2",
            "n",
            "n",
            "y",
            "1",
            r#"{"x":1}"#,
            "",
            "",
            "n",
            "y",
        ]);

        assert_eq!(draft.method, Method::Post);
        assert_eq!(draft.headers[CONTENT_TYPE], JSON_MIME);
        assert_eq!(draft.body, "{\n  \"x\": 1\n}");
        assert!(!draft.pretty_output);
    }

    #[test]
    fn declining_confirmation_cancels() {
        let mut w = wizard(&["https://example.com/api", "", "n", "n", "", ""]);
        for stage in [
            Stage::Url,
            Stage::Method,
            Stage::Headers,
            Stage::QueryParams,
            Stage::PrettyPrint,
            Stage::Preview,
            Stage::Confirm,
        ] {
            w.run_stage(stage).unwrap();
        }
        assert!(!w.confirmed);
        assert!(output(&mut w).contains("PREVIEW"));

        let outcome = wizard(&["https://example.com/api", "", "n", "n", "", "nope"])
            .run()
            .unwrap();
        assert_eq!(outcome, Outcome::Cancelled);
    }

    #[test]
    fn session_ends_when_input_closes() {
        let err = wizard(&["https://example.com/api"]).run().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<WizardError>(),
            Some(WizardError::InputClosed)
        ));
    }
}

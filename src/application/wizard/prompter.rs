use anyhow::Result;
use colored::Colorize;
use std::io::{BufRead, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WizardError {
    #[error("input closed before the request was complete")]
    InputClosed,
}

/// Line-oriented operator console.
///
/// Every stage of the builder reads through [`Prompter::ask`] or
/// [`Prompter::read_line`]; those are the only places the session waits for
/// the operator, so any `BufRead` can script a whole session.
pub struct Prompter<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Prints `prompt` without a newline and returns the trimmed answer
    pub fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.writer, "{}", prompt)?;
        self.writer.flush()?;
        Ok(self.read_line()?.trim().to_string())
    }

    /// Reads one raw line with the line terminator removed.
    /// Bytes that are not UTF-8 are replaced rather than rejected.
    pub fn read_line(&mut self) -> Result<String> {
        let mut raw = Vec::new();
        if self.reader.read_until(b'\n', &mut raw)? == 0 {
            return Err(WizardError::InputClosed.into());
        }
        let mut line = String::from_utf8_lossy(&raw).into_owned();
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(line)
    }

    /// Reads free text until two consecutive blank lines; blank lines are dropped
    pub fn read_block(&mut self) -> Result<String> {
        let mut lines = Vec::new();
        let mut blank_run = 0;

        while blank_run < 2 {
            let line = self.read_line()?;
            if line.is_empty() {
                blank_run += 1;
                continue;
            }
            blank_run = 0;
            lines.push(line);
        }

        Ok(lines.join("\n"))
    }

    /// Yes/no question where only `y` (any case) counts as yes
    pub fn confirm(&mut self, prompt: &str) -> Result<bool> {
        Ok(self.ask(prompt)?.eq_ignore_ascii_case("y"))
    }

    pub fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.writer, "{}", text)?;
        Ok(())
    }

    pub fn success(&mut self, message: &str) -> Result<()> {
        self.success_at("", message)
    }

    pub fn error(&mut self, message: &str) -> Result<()> {
        self.error_at("", message)
    }

    /// `success` with a leading indent, for lines inside a nested loop
    pub fn success_at(&mut self, indent: &str, message: &str) -> Result<()> {
        writeln!(self.writer, "{}{}", indent, format!("✓ {}", message).green())?;
        Ok(())
    }

    pub fn error_at(&mut self, indent: &str, message: &str) -> Result<()> {
        writeln!(self.writer, "{}{}", indent, format!("✗ {}", message).red())?;
        Ok(())
    }

    #[cfg(test)]
    pub fn writer(&mut self) -> &mut W {
        &mut self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(script: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(script.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn ask_trims_and_echoes_prompt() {
        let mut p = prompter("  hello \r\n");
        assert_eq!(p.ask("? Name: ").unwrap(), "hello");
        assert_eq!(String::from_utf8_lossy(p.writer()), "? Name: ");
    }

    #[test]
    fn end_of_input_is_reported() {
        let mut p = prompter("");
        let err = p.ask("? URL: ").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<WizardError>(),
            Some(WizardError::InputClosed)
        ));
    }

    #[test]
    fn invalid_utf8_line_is_read_lossily() {
        let mut p = Prompter::new(
            Cursor::new(b"\xff\xfe\nhttps://example.com\n".to_vec()),
            Vec::new(),
        );
        assert_eq!(p.ask("? URL: ").unwrap(), "\u{fffd}\u{fffd}");
        assert_eq!(p.ask("? URL: ").unwrap(), "https://example.com");
    }

    #[test]
    fn indented_lines_keep_indent_before_mark() {
        let mut p = prompter("");
        p.error_at("  ", "nope").unwrap();
        p.success_at("  ", "fine").unwrap();
        let out = String::from_utf8_lossy(p.writer()).into_owned();
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("  ") && lines[0].contains("✗ nope"));
        assert!(lines[1].starts_with("  ") && lines[1].contains("✓ fine"));
    }

    #[test]
    fn block_ends_after_two_blank_lines() {
        let mut p = prompter("{\n\n  \"a\": 1\n}\n\n\nleftover\n");
        assert_eq!(p.read_block().unwrap(), "{\n  \"a\": 1\n}");
        assert_eq!(p.read_line().unwrap(), "leftover");
    }

    #[test]
    fn block_of_only_blank_lines_is_empty() {
        let mut p = prompter("\n\n");
        assert_eq!(p.read_block().unwrap(), "");
    }

    #[test]
    fn confirm_requires_literal_y() {
        for (input, expected) in [("y\n", true), ("Y\n", true), (" y \n", true), ("yes\n", false), ("\n", false), ("n\n", false)] {
            let mut p = prompter(input);
            assert_eq!(p.confirm("? ").unwrap(), expected, "input {:?}", input);
        }
    }
}

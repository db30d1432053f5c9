//! Composing posts in $EDITOR, plus terminal prompts

use std::env;
use std::fs;
use std::io::{self, BufRead, Write};
use std::process::Command;

use anyhow::{bail, Context, Result};

/// Line separating the instruction header from the post body
///
/// Everything above the first occurrence is discarded; everything below it
/// is the post, HTML comments included.
pub const BODY_MARKER: &str = "<!-- ==== quill: post body below this line ==== -->";

/// Fallback when neither $VISUAL nor $EDITOR is set
const DEFAULT_EDITOR: &str = "vi";

/// Open a `.html` buffer in the user's editor and return the post body
///
/// `heading` lines are shown above the marker; `body` is the initial post
/// text. Fails if the saved body is blank, so an emptied buffer aborts the
/// command instead of saving nothing.
pub fn compose(heading: &[String], body: &str) -> Result<String> {
    let buffer = tempfile::Builder::new()
        .prefix("quill-")
        .suffix(".html")
        .tempfile()
        .context("Failed to create a buffer for the editor")?;

    fs::write(buffer.path(), render_buffer(heading, body))
        .with_context(|| format!("Failed to write editor buffer: {:?}", buffer.path()))?;

    let command_line = editor_command();
    let mut parts = command_line.split_whitespace();
    let program = parts.next().unwrap_or(DEFAULT_EDITOR);

    let status = Command::new(program)
        .args(parts)
        .arg(buffer.path())
        .status()
        .with_context(|| {
            format!(
                "Failed to run editor '{}'. Set $EDITOR or pass --content.",
                command_line
            )
        })?;
    if !status.success() {
        bail!("Editor '{}' exited with {}; post not saved.", command_line, status);
    }

    let saved = fs::read_to_string(buffer.path())
        .with_context(|| format!("Failed to read editor buffer: {:?}", buffer.path()))?;

    let content = extract_body(&saved);
    if content.is_empty() {
        bail!("Post body is empty; nothing saved.");
    }
    Ok(content)
}

fn render_buffer(heading: &[String], body: &str) -> String {
    let mut buffer = String::new();
    for line in heading {
        buffer.push_str(&format!("<!-- {} -->\n", line));
    }
    buffer.push_str(BODY_MARKER);
    buffer.push_str("\n\n");
    buffer.push_str(body);
    buffer.push('\n');
    buffer
}

/// Text below the first marker line, trimmed
///
/// A buffer whose marker was deleted is taken whole.
pub fn extract_body(buffer: &str) -> String {
    let body = match buffer.find(BODY_MARKER) {
        Some(pos) => &buffer[pos + BODY_MARKER.len()..],
        None => buffer,
    };
    body.trim().to_string()
}

fn editor_command() -> String {
    ["VISUAL", "EDITOR"]
        .iter()
        .filter_map(|var| env::var(var).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_EDITOR.to_string())
}

/// Ask a yes/no question on the terminal
///
/// Without a TTY on stdin nothing is read and the answer is no.
pub fn confirm(question: &str) -> Result<bool> {
    if !atty::is(atty::Stream::Stdin) {
        return Ok(false);
    }

    let answer = ask(&format!("{} [y/N] ", question))?;
    Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
}

/// Ask for a value, showing the current one; `None` keeps it
pub fn prompt_with_default(label: &str, current: &str) -> Result<Option<String>> {
    let prompt = if current.is_empty() {
        format!("{}: ", label)
    } else {
        format!("{} [{}]: ", label, current)
    };

    let answer = ask(&prompt)?;
    Ok(Some(answer).filter(|a| !a.is_empty()))
}

fn ask(prompt: &str) -> Result<String> {
    let mut stdout = io::stdout();
    stdout.write_all(prompt.as_bytes())?;
    stdout.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

use std::collections::HashMap;
use std::io::{self, Write};

use minirag_core::{
    AlertKind, AlertView, AppViewModel, IngestionMode, MessageId, MessageStatus, MessageView,
    Role,
};

/// Prints the parts of the view model that changed since the last render.
///
/// A terminal cannot rewrite earlier output, so a settled answer is printed
/// again below its placeholder, tagged with the same message id.
#[derive(Debug, Default)]
pub struct Renderer {
    printed: HashMap<MessageId, MessageStatus>,
    mode: Option<IngestionMode>,
    file_label: String,
    status: Option<AlertView>,
}

impl Renderer {
    pub fn render(&mut self, view: &AppViewModel, out: &mut impl Write) -> io::Result<()> {
        if self.mode != Some(view.mode) {
            let section = if view.text_section_visible {
                "text (/paste lines, then /index)"
            } else {
                "file (/pick a path, then /index)"
            };
            writeln!(out, "-- ingest: {section} --")?;
            self.mode = Some(view.mode);
        }

        if view.file_label != self.file_label {
            if !view.file_label.is_empty() {
                writeln!(out, "   file: {}", view.file_label)?;
            }
            self.file_label.clone_from(&view.file_label);
        }

        if view.status != self.status {
            if let Some(status) = &view.status {
                writeln!(out, "[{}] {}", kind_tag(status.kind), status.text)?;
            }
            self.status.clone_from(&view.status);
        }

        for message in &view.messages {
            if self.printed.get(&message.id) != Some(&message.status) {
                write_message(message, out)?;
                self.printed.insert(message.id, message.status);
            }
        }

        out.flush()
    }

    /// Prints the full passage behind citation `index` of the newest answer.
    pub fn show_citation(
        &self,
        view: &AppViewModel,
        index: usize,
        out: &mut impl Write,
    ) -> io::Result<()> {
        let citation = view
            .messages
            .iter()
            .rev()
            .find(|message| message.status == MessageStatus::Resolved)
            .and_then(|message| message.citations.get(index.checked_sub(1)?));
        match citation {
            Some(citation) => writeln!(out, "{}:\n{}", citation.label, citation.full_text)?,
            None => writeln!(out, "No source {index} in the latest answer.")?,
        }
        out.flush()
    }
}

/// Prompt for the query field; a continuation prompt while the question
/// spans several rows.
pub fn prompt(view: &AppViewModel) -> &'static str {
    if view.query_rows > 1 {
        "..> "
    } else {
        "> "
    }
}

fn write_message(message: &MessageView, out: &mut impl Write) -> io::Result<()> {
    let speaker = match message.role {
        Role::User => "you",
        Role::Assistant => "rag",
    };
    let head = format!("{speaker} [{}]> ", message.id);
    let indent = " ".repeat(head.len());

    for (idx, line) in message.lines.iter().enumerate() {
        if idx == 0 {
            writeln!(out, "{head}{line}")?;
        } else {
            writeln!(out, "{indent}{line}")?;
        }
    }
    for citation in &message.citations {
        writeln!(out, "{indent}[{}] {}", citation.label, citation.preview)?;
    }
    Ok(())
}

fn kind_tag(kind: AlertKind) -> &'static str {
    match kind {
        AlertKind::Progress => "..",
        AlertKind::Success => "ok",
        AlertKind::Warning => "!!",
        AlertKind::Error => "error",
    }
}

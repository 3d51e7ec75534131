use minirag_core::{AppViewModel, IngestionMode, Msg, SelectedFile};

pub const HELP: &str = "\
Commands:
  /text            switch ingestion to pasted text
  /file            switch ingestion to a file
  /paste <line>    append a line to the ingestion text
  /pick <path>     choose the file to ingest
  /unpick          clear the chosen file
  /index           send the text or file for indexing
  /cite <n>        show the full text of source n of the latest answer
  /help            show this help
  /quit            end the session
Anything else is asked as a question. End a line with \\ to continue the
question on the next line.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Dispatch(Vec<Msg>),
    ShowCitation(usize),
    Help,
    Quit,
    Unknown(String),
}

/// Translates one line of terminal input into UI messages.
///
/// `view` supplies the current field contents so edits can be expressed
/// as whole-field changes.
pub fn parse_line(line: &str, view: &AppViewModel) -> Command {
    let trimmed = line.trim();
    let Some(rest) = trimmed.strip_prefix('/') else {
        return compose(line, view);
    };
    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    match name {
        "text" => Command::Dispatch(vec![Msg::ModeSelected(IngestionMode::Text)]),
        "file" => Command::Dispatch(vec![Msg::ModeSelected(IngestionMode::File)]),
        "paste" => {
            let text = if view.ingest_text.is_empty() {
                arg.to_string()
            } else {
                format!("{}\n{}", view.ingest_text, arg)
            };
            Command::Dispatch(vec![Msg::IngestTextChanged(text)])
        }
        "pick" if !arg.is_empty() => Command::Dispatch(vec![Msg::FileSelected(Some(
            SelectedFile::from_path(arg),
        ))]),
        "unpick" => Command::Dispatch(vec![Msg::FileSelected(None)]),
        "index" => Command::Dispatch(vec![Msg::IngestSubmitted]),
        "cite" => match arg.parse::<usize>() {
            Ok(index) if index > 0 => Command::ShowCitation(index),
            _ => Command::Unknown(trimmed.to_string()),
        },
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => Command::Unknown(trimmed.to_string()),
    }
}

/// A plain line is typed into the query field followed by Enter. A
/// trailing backslash stands for Shift+Enter.
fn compose(line: &str, view: &AppViewModel) -> Command {
    let (typed, modifier) = match line.strip_suffix('\\') {
        Some(typed) => (typed, true),
        None => (line, false),
    };
    let text = format!("{}{}", view.query_text, typed);
    Command::Dispatch(vec![
        Msg::QueryChanged(text),
        Msg::EnterPressed { modifier },
    ])
}

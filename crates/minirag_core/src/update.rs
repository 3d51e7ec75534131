use crate::{
    AlertKind, AppState, Answer, AssistantState, Effect, Msg, QueryAnswer, QueryFailure,
    UploadFailure, UploadReceipt,
};

const INDEXING_TEXT: &str = "Indexing...";
const UPLOAD_FAILED_TEXT: &str = "Upload failed";
const UPLOAD_UNREACHABLE_TEXT: &str = "Upload failed. Check the server connection.";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    if state.is_closed() {
        // Nothing is accepted once the session has ended.
        return (state, Vec::new());
    }

    let effects = match msg {
        Msg::ModeSelected(mode) => {
            if state.ingest.switch_mode(mode) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::IngestTextChanged(text) => {
            state.ingest.set_text(text);
            state.mark_dirty();
            Vec::new()
        }
        Msg::FileSelected(file) => {
            state.ingest.select_file(file);
            state.mark_dirty();
            Vec::new()
        }
        Msg::IngestSubmitted => submit_ingest(&mut state),
        Msg::UploadFinished { request, result } => {
            if !state.ingest.finish(request) {
                return (state, Vec::new());
            }
            state.mark_dirty();
            vec![upload_finished(&mut state, result)]
        }
        Msg::QueryChanged(text) => {
            state.composer.set(text);
            state.mark_dirty();
            Vec::new()
        }
        Msg::EnterPressed { modifier: true } => {
            state.composer.insert_newline();
            state.mark_dirty();
            Vec::new()
        }
        Msg::EnterPressed { modifier: false } | Msg::AskSubmitted => ask(&mut state),
        Msg::AnswerReceived { request, result } => {
            let Some(message) = state.pending_answers.remove(&request) else {
                return (state, Vec::new());
            };
            let settled = match result {
                Ok(QueryAnswer { answer, sources }) => {
                    AssistantState::Resolved(Answer::new(&answer, sources))
                }
                Err(QueryFailure::Status(_) | QueryFailure::Transport) => AssistantState::Failed,
            };
            if state.transcript.replace(message, settled) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::AlertExpired { generation } => {
            if state.alert.expire(generation) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::SessionClosed => {
            state.close();
            state.mark_dirty();
            vec![Effect::CancelInFlight]
        }
    };

    (state, effects)
}

fn submit_ingest(state: &mut AppState) -> Vec<Effect> {
    // The submit control is disabled while an upload is pending.
    if state.ingest.is_busy() {
        return Vec::new();
    }

    match state.ingest.payload() {
        Err(invalid) => vec![show_alert(state, invalid.message(), AlertKind::Warning)],
        Ok(payload) => {
            let request = state.next_request();
            state.ingest.begin(request);
            // Bumps the generation so an older timer cannot erase it.
            state.alert.show(INDEXING_TEXT, AlertKind::Progress);
            state.mark_dirty();
            vec![Effect::Upload { request, payload }]
        }
    }
}

fn upload_finished(state: &mut AppState, result: Result<UploadReceipt, UploadFailure>) -> Effect {
    match result {
        Ok(receipt) => {
            state.ingest.clear_inputs();
            let text = match receipt.source {
                Some(source) => format!(
                    "Success! Indexed {} chunks from {}.",
                    receipt.chunks, source
                ),
                None => format!("Success! Indexed {} chunks.", receipt.chunks),
            };
            show_alert(state, text, AlertKind::Success)
        }
        Err(UploadFailure::Rejected { error }) => {
            let text = error
                .filter(|error| !error.is_empty())
                .unwrap_or_else(|| UPLOAD_FAILED_TEXT.to_string());
            show_alert(state, text, AlertKind::Error)
        }
        Err(UploadFailure::Transport) => {
            show_alert(state, UPLOAD_UNREACHABLE_TEXT, AlertKind::Error)
        }
    }
}

fn ask(state: &mut AppState) -> Vec<Effect> {
    let query = state.composer.text.trim().to_string();
    if query.is_empty() {
        return Vec::new();
    }

    state.transcript.append_user(query.clone());
    state.composer.clear();
    let message = state.transcript.append_placeholder();
    let request = state.next_request();
    state.pending_answers.insert(request, message);
    state.mark_dirty();

    vec![Effect::Query { request, query }]
}

fn show_alert(state: &mut AppState, text: impl Into<String>, kind: AlertKind) -> Effect {
    let generation = state.alert.show(text, kind);
    state.mark_dirty();
    Effect::ScheduleAlertClear {
        generation,
        after: state.config.alert_clear_delay,
    }
}

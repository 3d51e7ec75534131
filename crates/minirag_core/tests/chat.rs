use std::sync::Once;

use minirag_core::{
    update, AppState, Effect, MessageStatus, Msg, QueryAnswer, QueryFailure, RequestId, Role,
    APOLOGY_TEXT, THINKING_TEXT,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(minirag_logging::initialize_for_tests);
}

fn ask(state: AppState, query: &str) -> (AppState, Vec<Effect>) {
    let (state, _) = update(state, Msg::QueryChanged(query.to_string()));
    update(state, Msg::EnterPressed { modifier: false })
}

fn query_request(effects: &[Effect]) -> RequestId {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::Query { request, .. } => Some(*request),
            _ => None,
        })
        .expect("query effect")
}

fn answer(text: &str, sources: &[&str]) -> Result<QueryAnswer, QueryFailure> {
    Ok(QueryAnswer {
        answer: text.to_string(),
        sources: sources.iter().map(|s| s.to_string()).collect(),
    })
}

#[test]
fn ask_appends_user_then_placeholder_before_request_settles() {
    init_logging();
    let (state, effects) = ask(AppState::new(), "  What is RAG?  ");

    let request = query_request(&effects);
    assert_eq!(
        effects,
        vec![Effect::Query {
            request,
            query: "What is RAG?".to_string(),
        }]
    );

    let view = state.view();
    assert_eq!(view.messages.len(), 2);
    assert_eq!(view.messages[0].role, Role::User);
    assert_eq!(view.messages[0].lines, vec!["What is RAG?"]);
    assert_eq!(view.messages[1].role, Role::Assistant);
    assert_eq!(view.messages[1].status, MessageStatus::Pending);
    assert_eq!(view.messages[1].lines, vec![THINKING_TEXT]);
    assert_eq!(view.scroll_anchor, Some(view.messages[1].id));
    assert_eq!(view.query_text, "");
    assert_eq!(view.query_rows, 1);
}

#[test]
fn blank_questions_are_ignored() {
    init_logging();
    for query in ["", "   ", "\n\t "] {
        let (state, effects) = ask(AppState::new(), query);
        assert!(effects.is_empty());
        assert!(state.transcript().is_empty());
    }
}

#[test]
fn shift_enter_inserts_newline_without_asking() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::QueryChanged("first".into()));
    let (state, effects) = update(state, Msg::EnterPressed { modifier: true });

    assert!(effects.is_empty());
    assert!(state.transcript().is_empty());
    assert_eq!(state.query_text(), "first\n");
    assert_eq!(state.view().query_rows, 2);

    let (state, _) = update(state, Msg::QueryChanged("first\nsecond".into()));
    let (state, effects) = update(state, Msg::EnterPressed { modifier: false });
    let request = query_request(&effects);
    assert!(matches!(
        effects.as_slice(),
        [Effect::Query { query, .. }] if query == "first\nsecond"
    ));
    assert_eq!(state.pending_answer_count(), 1);
    assert_eq!(request, RequestId::new(1));
}

#[test]
fn answer_renders_lines_and_numbered_citations() {
    init_logging();
    let (state, effects) = ask(AppState::new(), "question");
    let request = query_request(&effects);
    let long_source = "x".repeat(80);

    let (state, effects) = update(
        state,
        Msg::AnswerReceived {
            request,
            result: answer("line1\nline2", &["src one text", long_source.as_str()]),
        },
    );
    assert!(effects.is_empty());

    let view = state.view();
    let reply = &view.messages[1];
    assert_eq!(reply.status, MessageStatus::Resolved);
    assert_eq!(reply.lines, vec!["line1", "line2"]);
    let labels: Vec<_> = reply.citations.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(labels, vec!["Source 1", "Source 2"]);
    assert_eq!(reply.citations[0].preview, "src one text");
    assert_eq!(reply.citations[0].full_text, "src one text");
    assert_eq!(reply.citations[1].preview, format!("{}...", "x".repeat(60)));
    assert_eq!(reply.citations[1].full_text, long_source);
    assert_eq!(state.pending_answer_count(), 0);
}

#[test]
fn answer_without_sources_has_no_citations() {
    init_logging();
    let (state, effects) = ask(AppState::new(), "question");
    let request = query_request(&effects);
    let (state, _) = update(
        state,
        Msg::AnswerReceived {
            request,
            result: answer("I don't have enough context.", &[]),
        },
    );
    let view = state.view();
    assert_eq!(view.messages[1].status, MessageStatus::Resolved);
    assert!(view.messages[1].citations.is_empty());
}

#[test]
fn failure_becomes_inline_apology() {
    init_logging();
    for failure in [QueryFailure::Transport, QueryFailure::Status(400)] {
        let (state, effects) = ask(AppState::new(), "question");
        let request = query_request(&effects);
        let (state, effects) = update(
            state,
            Msg::AnswerReceived {
                request,
                result: Err(failure),
            },
        );

        assert!(effects.is_empty());
        let view = state.view();
        assert_eq!(view.messages[1].status, MessageStatus::Failed);
        assert_eq!(view.messages[1].lines, vec![APOLOGY_TEXT]);
        assert!(view.messages[1].citations.is_empty());
        // The chat entry is the only error surface.
        assert!(view.status.is_none());
    }
}

#[test]
fn concurrent_asks_keep_invocation_order_and_settle_independently() {
    init_logging();
    let (state, effects_a) = ask(AppState::new(), "question A");
    let (mut state, effects_b) = ask(state, "question B");
    let request_a = query_request(&effects_a);
    let request_b = query_request(&effects_b);
    assert_ne!(request_a, request_b);
    assert!(state.consume_dirty());

    let view = state.view();
    let order: Vec<_> = view
        .messages
        .iter()
        .map(|m| (m.role, m.status, m.lines.join("\n")))
        .collect();
    assert_eq!(
        order,
        vec![
            (Role::User, MessageStatus::Sent, "question A".to_string()),
            (Role::Assistant, MessageStatus::Pending, THINKING_TEXT.to_string()),
            (Role::User, MessageStatus::Sent, "question B".to_string()),
            (Role::Assistant, MessageStatus::Pending, THINKING_TEXT.to_string()),
        ]
    );

    // B resolves first.
    let (mut state, _) = update(
        state,
        Msg::AnswerReceived {
            request: request_b,
            result: answer("answer B", &[]),
        },
    );
    assert!(state.consume_dirty());
    let view = state.view();
    assert_eq!(view.messages[1].status, MessageStatus::Pending);
    assert_eq!(view.messages[3].lines, vec!["answer B"]);

    let (state, _) = update(
        state,
        Msg::AnswerReceived {
            request: request_a,
            result: answer("answer A", &[]),
        },
    );
    let view = state.view();
    assert_eq!(view.messages[1].lines, vec!["answer A"]);
    assert_eq!(view.messages[3].lines, vec!["answer B"]);
}

#[test]
fn duplicate_resolution_is_ignored() {
    init_logging();
    let (state, effects) = ask(AppState::new(), "question");
    let request = query_request(&effects);
    let (mut state, _) = update(
        state,
        Msg::AnswerReceived {
            request,
            result: answer("first", &[]),
        },
    );
    assert!(state.consume_dirty());

    let (mut state, _) = update(
        state,
        Msg::AnswerReceived {
            request,
            result: Err(QueryFailure::Transport),
        },
    );
    assert!(!state.consume_dirty());
    assert_eq!(state.view().messages[1].lines, vec!["first"]);
}

#[test]
fn closing_the_session_cancels_and_freezes_state() {
    init_logging();
    let (state, _) = ask(AppState::new(), "question");
    let (state, effects) = update(state, Msg::SessionClosed);
    assert_eq!(effects, vec![Effect::CancelInFlight]);
    assert!(state.is_closed());

    let (state, effects) = ask(state, "another");
    assert!(effects.is_empty());
    assert_eq!(state.transcript().len(), 2);
}

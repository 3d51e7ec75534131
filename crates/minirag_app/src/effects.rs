use std::sync::mpsc;
use std::thread;

use minirag_core::{
    Effect, IngestionPayload, Msg, QueryAnswer, QueryFailure, RequestId, UploadFailure,
    UploadReceipt,
};
use minirag_engine::{
    BackendError, BackendSettings, EngineError, EngineEvent, EngineHandle, FailureKind,
    UploadSource,
};
use minirag_logging::{rag_debug, rag_info, rag_warn};

use crate::app::Inbound;

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(
        settings: BackendSettings,
        inbound: mpsc::Sender<Inbound>,
    ) -> Result<Self, EngineError> {
        let engine = EngineHandle::new(settings)?;
        let runner = Self { engine };
        runner.spawn_event_loop(inbound);
        Ok(runner)
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Upload { request, payload } => {
                    let source = match payload {
                        IngestionPayload::Text(text) => UploadSource::Text(text),
                        IngestionPayload::File(file) => UploadSource::File(file.path),
                    };
                    rag_info!("Upload request={}", request);
                    self.engine.upload(request.get(), source);
                }
                Effect::Query { request, query } => {
                    rag_info!("Query request={} query_len={}", request, query.len());
                    self.engine.query(request.get(), query);
                }
                Effect::ScheduleAlertClear { generation, after } => {
                    rag_debug!(
                        "ScheduleAlertClear generation={} after={:?}",
                        generation,
                        after
                    );
                    self.engine.schedule_timer(generation, after);
                }
                Effect::CancelInFlight => {
                    rag_info!("CancelInFlight");
                    self.engine.cancel_all();
                }
            }
        }
    }

    fn spawn_event_loop(&self, inbound: mpsc::Sender<Inbound>) {
        let engine = self.engine.clone();
        thread::spawn(move || {
            while let Some(event) = engine.recv() {
                if inbound.send(Inbound::Msg(event_to_msg(event))).is_err() {
                    break;
                }
            }
        });
    }
}

/// Alert timers are the only timers scheduled, so a timer token is always
/// an alert generation.
fn event_to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::UploadCompleted { token, result } => Msg::UploadFinished {
            request: RequestId::new(token),
            result: result
                .map(|response| UploadReceipt {
                    chunks: response.chunks,
                    source: response.source,
                })
                .map_err(upload_failure),
        },
        EngineEvent::QueryCompleted { token, result } => Msg::AnswerReceived {
            request: RequestId::new(token),
            result: result
                .map(|response| {
                    let (answer, sources) = response.into_parts();
                    QueryAnswer { answer, sources }
                })
                .map_err(query_failure),
        },
        EngineEvent::TimerElapsed { token } => Msg::AlertExpired { generation: token },
    }
}

fn upload_failure(err: BackendError) -> UploadFailure {
    match err.kind {
        FailureKind::Rejected { error, .. } => UploadFailure::Rejected { error },
        _ => {
            rag_warn!("upload transport failure: {}", err.message);
            UploadFailure::Transport
        }
    }
}

fn query_failure(err: BackendError) -> QueryFailure {
    match err.kind {
        FailureKind::Rejected { status, .. } => QueryFailure::Status(status),
        _ => QueryFailure::Transport,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minirag_engine::{QueryResponse, UploadResponse};
    use pretty_assertions::assert_eq;

    fn backend_error(kind: FailureKind) -> BackendError {
        BackendError {
            kind,
            message: "boom".to_string(),
        }
    }

    #[test]
    fn upload_events_map_to_receipts_and_failures() {
        let ok = event_to_msg(EngineEvent::UploadCompleted {
            token: 3,
            result: Ok(UploadResponse {
                chunks: 9,
                source: Some("a.txt".to_string()),
                status: Some("success".to_string()),
            }),
        });
        assert_eq!(
            ok,
            Msg::UploadFinished {
                request: RequestId::new(3),
                result: Ok(UploadReceipt {
                    chunks: 9,
                    source: Some("a.txt".to_string()),
                }),
            }
        );

        let rejected = event_to_msg(EngineEvent::UploadCompleted {
            token: 4,
            result: Err(backend_error(FailureKind::Rejected {
                status: 400,
                error: Some("No content provided".to_string()),
            })),
        });
        assert_eq!(
            rejected,
            Msg::UploadFinished {
                request: RequestId::new(4),
                result: Err(UploadFailure::Rejected {
                    error: Some("No content provided".to_string()),
                }),
            }
        );

        let transport = event_to_msg(EngineEvent::UploadCompleted {
            token: 5,
            result: Err(backend_error(FailureKind::Decode)),
        });
        assert!(matches!(
            transport,
            Msg::UploadFinished {
                result: Err(UploadFailure::Transport),
                ..
            }
        ));
    }

    #[test]
    fn query_events_default_missing_sources() {
        let msg = event_to_msg(EngineEvent::QueryCompleted {
            token: 8,
            result: Ok(QueryResponse {
                answer: "hi".to_string(),
                sources: None,
            }),
        });
        assert_eq!(
            msg,
            Msg::AnswerReceived {
                request: RequestId::new(8),
                result: Ok(QueryAnswer {
                    answer: "hi".to_string(),
                    sources: Vec::new(),
                }),
            }
        );

        let failed = event_to_msg(EngineEvent::QueryCompleted {
            token: 9,
            result: Err(backend_error(FailureKind::Network)),
        });
        assert!(matches!(
            failed,
            Msg::AnswerReceived {
                result: Err(QueryFailure::Transport),
                ..
            }
        ));
    }

    #[test]
    fn timers_become_alert_expiry() {
        assert_eq!(
            event_to_msg(EngineEvent::TimerElapsed { token: 12 }),
            Msg::AlertExpired { generation: 12 }
        );
    }
}

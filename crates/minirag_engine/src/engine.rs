use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use minirag_logging::{rag_info, rag_warn};
use tokio_util::sync::CancellationToken;

use crate::backend::{BackendSettings, RagBackend, ReqwestBackend};
use crate::{BackendError, EngineEvent, RequestToken, UploadSource};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("could not start engine runtime: {0}")]
    Runtime(#[source] std::io::Error),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

enum Job {
    Upload {
        token: RequestToken,
        source: UploadSource,
    },
    Query {
        token: RequestToken,
        query: String,
    },
    Timer {
        token: RequestToken,
        after: Duration,
    },
}

enum EngineCommand {
    Run(Job),
    CancelAll,
}

/// Runs backend requests and timers on a background tokio runtime.
///
/// Commands are accepted from any thread; every finished job is reported
/// exactly once as an [`EngineEvent`], unless it was cancelled first.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<EngineEvent>>>,
}

impl EngineHandle {
    pub fn new(settings: BackendSettings) -> Result<Self, EngineError> {
        let backend = ReqwestBackend::new(settings)?;
        Self::with_backend(Arc::new(backend))
    }

    pub fn with_backend(backend: Arc<dyn RagBackend>) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(EngineError::Runtime)?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let mut cancel = CancellationToken::new();
            while let Ok(command) = cmd_rx.recv() {
                let job = match command {
                    EngineCommand::Run(job) => job,
                    EngineCommand::CancelAll => {
                        rag_info!("cancelling all in-flight jobs");
                        cancel.cancel();
                        cancel = CancellationToken::new();
                        continue;
                    }
                };
                let backend = Arc::clone(&backend);
                let event_tx = event_tx.clone();
                let cancel = cancel.clone();
                runtime.spawn(async move {
                    tokio::select! {
                        () = cancel.cancelled() => {}
                        event = run_job(backend.as_ref(), job) => {
                            let _ = event_tx.send(event);
                        }
                    }
                });
            }
        });

        Ok(Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
        })
    }

    pub fn upload(&self, token: RequestToken, source: UploadSource) {
        self.send(Job::Upload { token, source });
    }

    pub fn query(&self, token: RequestToken, query: impl Into<String>) {
        self.send(Job::Query {
            token,
            query: query.into(),
        });
    }

    /// Emits `EngineEvent::TimerElapsed { token }` after `after`.
    pub fn schedule_timer(&self, token: RequestToken, after: Duration) {
        self.send(Job::Timer { token, after });
    }

    /// Drops every outstanding job; their events are never delivered.
    pub fn cancel_all(&self) {
        let _ = self.cmd_tx.send(EngineCommand::CancelAll);
    }

    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.recv_timeout(timeout).ok()
    }

    fn send(&self, job: Job) {
        let _ = self.cmd_tx.send(EngineCommand::Run(job));
    }
}

async fn run_job(backend: &dyn RagBackend, job: Job) -> EngineEvent {
    match job {
        Job::Upload { token, source } => {
            rag_info!("upload token={} source={}", token, describe(&source));
            let result = backend.upload(&source).await;
            match &result {
                Ok(response) => rag_info!(
                    "upload token={} chunks={} status={}",
                    token,
                    response.chunks,
                    response.status.as_deref().unwrap_or("-")
                ),
                Err(err) => rag_warn!("upload token={} failed: {}", token, err),
            }
            EngineEvent::UploadCompleted { token, result }
        }
        Job::Query { token, query } => {
            rag_info!("query token={} query_len={}", token, query.len());
            let result = backend.query(&query).await;
            match &result {
                Ok(response) => rag_info!(
                    "query token={} sources={}",
                    token,
                    response.sources.as_ref().map_or(0, Vec::len)
                ),
                Err(err) => rag_warn!("query token={} failed: {}", token, err),
            }
            EngineEvent::QueryCompleted { token, result }
        }
        Job::Timer { token, after } => {
            tokio::time::sleep(after).await;
            EngineEvent::TimerElapsed { token }
        }
    }
}

fn describe(source: &UploadSource) -> String {
    match source {
        UploadSource::Text(text) => format!("text({} bytes)", text.len()),
        UploadSource::File(path) => format!("file({})", path.display()),
    }
}

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use minirag_core::{ChatConfig, CITATION_PREVIEW_CHARS};
use minirag_engine::BackendSettings;
use minirag_logging::{LevelFilter, LogDestination};

/// Terminal client for a MiniRAG ingestion and question-answering backend.
#[derive(Debug, Parser)]
#[command(name = "minirag", version)]
pub struct Cli {
    /// Backend root; `upload` and `query` are resolved below it.
    #[arg(long, default_value = "http://127.0.0.1:8000/")]
    pub base_url: String,

    #[arg(long, default_value_t = 10)]
    pub connect_timeout_secs: u64,

    /// Seconds a status message stays visible.
    #[arg(long, default_value_t = 5)]
    pub alert_delay_secs: u64,

    /// Characters of a source passage shown on a citation.
    #[arg(long, default_value_t = CITATION_PREVIEW_CHARS)]
    pub preview_chars: usize,

    #[arg(long, value_enum, default_value_t = LogTarget::File)]
    pub log: LogTarget,

    #[arg(long, default_value = "minirag.log")]
    pub log_file: PathBuf,

    /// Log at debug level.
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    File,
    Terminal,
    Both,
}

impl Cli {
    pub fn chat_config(&self) -> ChatConfig {
        ChatConfig {
            alert_clear_delay: Duration::from_secs(self.alert_delay_secs),
            citation_preview_chars: self.preview_chars,
        }
    }

    pub fn backend_settings(&self) -> BackendSettings {
        BackendSettings {
            base_url: self.base_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: None,
        }
    }

    pub fn log_destination(&self) -> LogDestination {
        match self.log {
            LogTarget::File => LogDestination::File,
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both,
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}
